use super::bash::BashShell;
use super::types::{Shell, ShellError};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Lookup of shell dialects by name
///
/// Built once at startup and then only read, so a registry can be shared across
/// threads behind an `Arc`.
pub struct ShellRegistry {
    shells: BTreeMap<String, Arc<dyn Shell>>,
}

impl ShellRegistry {
    pub fn new() -> Self {
        Self {
            shells: BTreeMap::new(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(BashShell::new()));
        registry
    }

    /// Adds `shell`, replacing any dialect registered under the same name.
    pub fn register(&mut self, shell: Arc<dyn Shell>) {
        self.shells.insert(shell.name().to_string(), shell);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Shell> {
        self.shells.get(name).map(|s| s.as_ref())
    }

    pub fn resolve(&self, name: &str) -> Result<&dyn Shell, ShellError> {
        self.get(name)
            .ok_or_else(|| ShellError::UnknownShell(name.to_string(), self.names().join(", ")))
    }

    pub fn default_shell(&self) -> Result<&dyn Shell, ShellError> {
        self.shells
            .values()
            .find(|s| s.is_default())
            .map(|s| s.as_ref())
            .ok_or(ShellError::NoDefaultShell)
    }

    /// Resolves `name`, or the platform default when it is `None`.
    pub fn select(&self, name: Option<&str>) -> Result<&dyn Shell, ShellError> {
        match name {
            Some(name) => self.resolve(name),
            None => self.default_shell(),
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.shells.keys().map(String::as_str).collect()
    }

    pub fn all(&self) -> Vec<&dyn Shell> {
        self.shells.values().map(|s| s.as_ref()).collect()
    }
}

impl Default for ShellRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
