use crate::job::{EnvVariable, JobDescription};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("Unknown shell: {0}. Registered shells: {1}")]
    UnknownShell(String, String),

    #[error("No default shell is registered for this platform")]
    NoDefaultShell,
}

/// Whether the interpreter should behave as a login shell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShellType {
    #[default]
    Normal,
    Login,
}

/// Capabilities a dialect advertises to the coordinator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturesInfo {
    pub artifacts: bool,
}

/// Everything needed to generate one job script
#[derive(Debug, Clone)]
pub struct ShellScriptInfo<'a> {
    pub job: &'a JobDescription,
    /// Executor-supplied assignments exported before the CI variables
    pub environment: Vec<EnvVariable>,
    /// Drop privileges to this user before running the script
    pub user: Option<String>,
    pub shell_type: ShellType,
}

impl<'a> ShellScriptInfo<'a> {
    pub fn new(job: &'a JobDescription) -> Self {
        Self {
            job,
            environment: Vec::new(),
            user: None,
            shell_type: ShellType::Normal,
        }
    }
}

/// A generated script together with how to run it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellScript {
    pub script: String,
    pub environment: Vec<EnvVariable>,
    pub command: String,
    pub arguments: Vec<String>,
}

/// A shell dialect that can turn a job into a script
pub trait Shell: Send + Sync {
    /// Registry key (e.g. "bash")
    fn name(&self) -> &str;

    fn features(&self) -> FeaturesInfo;

    /// Option blocks of a job this dialect acts on
    fn supported_options(&self) -> &[&str] {
        &[]
    }

    /// Preferred dialect on the current platform
    fn is_default(&self) -> bool {
        false
    }

    fn generate_script(&self, info: &ShellScriptInfo<'_>) -> Result<ShellScript, ShellError>;
}
