//! Build environment variables
//!
//! Every dialect exports the same ordered variable list, so it is computed here
//! once rather than per shell.

use super::types::JobDescription;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single `NAME=value` assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVariable {
    pub name: String,
    pub value: String,
}

impl EnvVariable {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Parses `NAME=value`; the value may itself contain `=`.
    ///
    /// Returns `None` when there is no `=` or the name is empty.
    pub fn parse(assignment: &str) -> Option<Self> {
        let (name, value) = assignment.split_once('=')?;
        if name.is_empty() {
            return None;
        }
        Some(Self::new(name, value))
    }
}

impl fmt::Display for EnvVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// Computes the ordered environment for a job.
///
/// Order: executor-supplied `environment`, the predefined CI variables, then the
/// job's own variables. Later entries shadow earlier ones in the shell; nothing is
/// deduplicated.
pub fn build_variables(
    job: &JobDescription,
    project_dir: &str,
    environment: &[EnvVariable],
) -> Vec<EnvVariable> {
    let mut variables = environment.to_vec();

    variables.extend([
        EnvVariable::new("CI", "true"),
        EnvVariable::new("CI_BUILD_REF", &job.sha),
        EnvVariable::new("CI_BUILD_BEFORE_SHA", &job.before_sha),
        EnvVariable::new("CI_BUILD_REF_NAME", &job.ref_name),
        EnvVariable::new("CI_BUILD_ID", job.id.to_string()),
        EnvVariable::new("CI_BUILD_REPO", &job.repo_url),
        EnvVariable::new("CI_PROJECT_ID", job.project_id.to_string()),
        EnvVariable::new("CI_PROJECT_DIR", project_dir),
        EnvVariable::new("CI_SERVER", "yes"),
        EnvVariable::new("CI_SERVER_NAME", "GitLab CI"),
        EnvVariable::new("CI_SERVER_VERSION", ""),
        EnvVariable::new("CI_SERVER_REVISION", ""),
        EnvVariable::new("GITLAB_CI", "true"),
    ]);

    variables.extend(
        job.variables
            .iter()
            .map(|variable| EnvVariable::new(&variable.key, &variable.value)),
    );

    variables
}
