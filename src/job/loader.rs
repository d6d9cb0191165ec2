//! Loading job descriptions from disk
//!
//! The format is chosen from the file extension: `.json`, `.yaml`/`.yml` or `.toml`.

use super::types::JobDescription;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("Failed to read job file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON job description: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML job description: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid TOML job description: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unsupported job file format: {0}. Valid extensions: json, yaml, yml, toml")]
    UnsupportedFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobFormat {
    Json,
    Yaml,
    Toml,
}

impl JobFormat {
    pub fn from_path(path: &Path) -> Result<Self, JobError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            _ => Err(JobError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

pub fn parse_job(content: &str, format: JobFormat) -> Result<JobDescription, JobError> {
    let job = match format {
        JobFormat::Json => serde_json::from_str(content)?,
        JobFormat::Yaml => serde_yaml::from_str(content)?,
        JobFormat::Toml => toml::from_str(content)?,
    };
    Ok(job)
}

pub fn load_job(path: &Path) -> Result<JobDescription, JobError> {
    let format = JobFormat::from_path(path)?;
    let content = fs::read_to_string(path).map_err(|source| JobError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), ?format, "Loading job description");
    parse_job(&content, format)
}
