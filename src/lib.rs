//! jobscript - shell script generation for CI build jobs
//!
//! This library turns a CI job description into one self-contained shell script
//! that prepares the repository, runs the job's commands and uploads artifacts,
//! together with the interpreter invocation needed to run it. Generation is a pure
//! function of its input: nothing is executed and nothing is read from the network.
//!
//! # Core Concepts
//!
//! - **Job description**: repository, commit, commands, artifact rules and
//!   credentials for one build ([`JobDescription`])
//! - **Shell dialect**: an implementation of [`Shell`] looked up by name in a
//!   [`ShellRegistry`]
//! - **Escaping**: every value from the job is passed through [`shell_escape`]
//!   before it reaches the script, except the job's own command lines
//!
//! # Example Usage
//!
//! ```
//! use jobscript::{JobDescription, ShellRegistry, ShellScriptInfo};
//!
//! let job = JobDescription {
//!     id: 1,
//!     repo_url: "https://example.com/group/project.git".to_string(),
//!     sha: "0123456789abcdef0123456789abcdef01234567".to_string(),
//!     ref_name: "main".to_string(),
//!     commands: "make\nmake test".to_string(),
//!     project_dir: "/builds/group/project".to_string(),
//!     ..Default::default()
//! };
//!
//! let registry = ShellRegistry::with_defaults();
//! let bash = registry.resolve("bash").unwrap();
//! let script = bash.generate_script(&ShellScriptInfo::new(&job)).unwrap();
//!
//! assert!(script.script.starts_with("#!/usr/bin/env bash\n"));
//! assert_eq!(script.command, "bash");
//! ```
//!
//! # Project Structure
//!
//! - [`job`]: job description types, artifact rules, CI variables, file loading
//! - [`shell`]: escaping, the script writer, dialects and the registry
//! - [`config`]: environment-driven generator configuration
//! - [`cli`]: command-line interface

pub mod cli;
pub mod config;
pub mod job;
pub mod shell;
pub mod util;

pub use config::{ConfigError, GeneratorConfig};
pub use job::{ArtifactRule, EnvVariable, JobDescription, JobError, RunnerSettings};
pub use shell::{
    shell_escape, BashShell, Shell, ShellError, ShellRegistry, ShellScript, ShellScriptInfo,
    ShellType,
};
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
