//! Configuration management for jobscript
//!
//! Settings are read from environment variables with sensible defaults. CLI flags
//! override them.
//!
//! # Environment Variables
//!
//! - `JOBSCRIPT_SHELL`: shell dialect name - default: the platform default (`bash`)
//! - `JOBSCRIPT_LOGIN_SHELL`: run the script in a login shell (true|false) - default: "false"
//! - `JOBSCRIPT_USER`: switch to this user before running the script - default: unset
//! - `JOBSCRIPT_LOG_LEVEL`: logging level - default: "info"
//!
//! # Example
//!
//! ```no_run
//! use jobscript::GeneratorConfig;
//!
//! let config = GeneratorConfig::default();
//! config.validate().expect("Invalid configuration");
//! ```

use crate::shell::{ShellRegistry, ShellType};
use std::env;
use std::fmt;
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid shell: {0}. Valid options: {1}")]
    InvalidShell(String, String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Dialect to generate for, `None` selects the platform default
    pub shell: Option<String>,

    pub login_shell: bool,

    /// Execution identity to switch to
    pub user: Option<String>,

    pub log_level: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let shell = env::var("JOBSCRIPT_SHELL")
            .ok()
            .filter(|s| !s.is_empty())
            .map(|s| s.to_lowercase());

        let login_shell = env::var("JOBSCRIPT_LOGIN_SHELL")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        let user = env::var("JOBSCRIPT_USER").ok().filter(|u| !u.is_empty());

        let log_level = env::var("JOBSCRIPT_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            shell,
            login_shell,
            user,
            log_level,
        }
    }
}

impl GeneratorConfig {
    /// Checks the configured shell exists in `registry` and the log level is known.
    pub fn validate_with(&self, registry: &ShellRegistry) -> Result<(), ConfigError> {
        if let Some(ref shell) = self.shell {
            if registry.get(shell).is_none() {
                return Err(ConfigError::InvalidShell(
                    shell.clone(),
                    registry.names().join(", "),
                ));
            }
        }

        if let Some(ref user) = self.user {
            if user.trim().is_empty() || user.starts_with('-') {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid user name: '{}'",
                    user
                )));
            }
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_with(&ShellRegistry::with_defaults())
    }

    pub fn shell_type(&self) -> ShellType {
        if self.login_shell {
            ShellType::Login
        } else {
            ShellType::Normal
        }
    }
}

impl fmt::Display for GeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Jobscript Configuration:")?;
        writeln!(f, "  Shell: {}", self.shell.as_deref().unwrap_or("default"))?;
        writeln!(f, "  Login Shell: {}", self.login_shell)?;
        if let Some(ref user) = self.user {
            writeln!(f, "  User: {}", user)?;
        }
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}

/// Parses a `NAME=VALUE` command-line argument.
pub fn parse_env_assignment(s: &str) -> Result<crate::job::EnvVariable, ConfigError> {
    crate::job::EnvVariable::parse(s).ok_or_else(|| ConfigError::ParseError {
        field: "environment".to_string(),
        error: format!("expected NAME=VALUE, got '{}'", s),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Helper to temporarily set environment variables for testing
    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn unset(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    fn config() -> GeneratorConfig {
        GeneratorConfig {
            shell: None,
            login_shell: false,
            user: None,
            log_level: "info".to_string(),
        }
    }

    #[test]
    #[serial]
    fn test_default_configuration() {
        let _guards = vec![
            EnvGuard::unset("JOBSCRIPT_SHELL"),
            EnvGuard::unset("JOBSCRIPT_LOGIN_SHELL"),
            EnvGuard::unset("JOBSCRIPT_USER"),
            EnvGuard::unset("JOBSCRIPT_LOG_LEVEL"),
        ];

        let config = GeneratorConfig::default();

        assert_eq!(config.shell, None);
        assert!(!config.login_shell);
        assert_eq!(config.user, None);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.shell_type(), ShellType::Normal);
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let _guards = vec![
            EnvGuard::set("JOBSCRIPT_SHELL", "Bash"),
            EnvGuard::set("JOBSCRIPT_LOGIN_SHELL", "true"),
            EnvGuard::set("JOBSCRIPT_USER", "builder"),
            EnvGuard::set("JOBSCRIPT_LOG_LEVEL", "DEBUG"),
        ];

        let config = GeneratorConfig::default();

        assert_eq!(config.shell.as_deref(), Some("bash"));
        assert!(config.login_shell);
        assert_eq!(config.user.as_deref(), Some("builder"));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.shell_type(), ShellType::Login);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_unknown_shell() {
        let mut config = config();
        config.shell = Some("fish".to_string());

        match config.validate() {
            Err(ConfigError::InvalidShell(name, valid)) => {
                assert_eq!(name, "fish");
                assert_eq!(valid, "bash");
            }
            other => panic!("Expected InvalidShell, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_invalid_user() {
        let mut config = config();
        config.user = Some("--login".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_validation_invalid_log_level() {
        let mut config = config();
        config.log_level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_env_assignment() {
        let var = parse_env_assignment("HOME=/home/ci").unwrap();
        assert_eq!(var.name, "HOME");
        assert_eq!(var.value, "/home/ci");
        assert!(matches!(
            parse_env_assignment("HOME"),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_config_display() {
        let mut config = config();
        config.user = Some("builder".to_string());
        let display = format!("{}", config);
        assert!(display.contains("Jobscript Configuration:"));
        assert!(display.contains("Shell: default"));
        assert!(display.contains("User: builder"));
    }
}
