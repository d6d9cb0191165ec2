//! Job description types
//!
//! A [`JobDescription`] is everything the coordinator tells the agent about one
//! build. It is read-only input to script generation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Settings of the runner the job was assigned to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunnerSettings {
    /// Coordinator base URL, artifacts are uploaded below it
    #[serde(default)]
    pub url: String,

    /// Suppress the `$ <command>` narration lines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_verbose: Option<bool>,
}

impl RunnerSettings {
    pub fn verbose_disabled(&self) -> bool {
        self.disable_verbose.unwrap_or(false)
    }
}

/// A job-defined variable exported into the build environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobVariable {
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub public: bool,
}

/// One CI job as received from the coordinator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    pub id: u64,

    #[serde(default)]
    pub project_id: u64,

    pub repo_url: String,

    /// Commit to check out
    pub sha: String,

    #[serde(default)]
    pub before_sha: String,

    /// Branch or tag name, display only
    #[serde(default)]
    pub ref_name: String,

    /// Raw newline-separated build commands
    #[serde(default)]
    pub commands: String,

    #[serde(default)]
    pub allow_git_fetch: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    /// Untyped option blocks keyed by name (e.g. `artifacts`)
    #[serde(default)]
    pub options: BTreeMap<String, serde_json::Value>,

    #[serde(default)]
    pub token: String,

    #[serde(default)]
    pub variables: Vec<JobVariable>,

    /// Directory the repository is checked out into
    pub project_dir: String,

    #[serde(default)]
    pub runner: RunnerSettings,
}

impl JobDescription {
    /// Project directory with forward slashes
    pub fn full_project_dir(&self) -> String {
        self.project_dir.replace('\\', "/")
    }

    /// The commit SHA shortened for display
    pub fn short_sha(&self) -> &str {
        match self.sha.char_indices().nth(8) {
            Some((idx, _)) => &self.sha[..idx],
            None => &self.sha,
        }
    }

    /// Artifact upload endpoint for this job on its runner
    pub fn artifacts_upload_url(&self) -> String {
        format!(
            "{}/api/v1/builds/{}/artifacts",
            self.runner.url.trim_end_matches('/'),
            self.id
        )
    }
}
