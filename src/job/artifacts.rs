//! Artifact selection rules
//!
//! The `artifacts` option block arrives untyped. [`ArtifactRule::from_options`]
//! reads it leniently: anything with the wrong shape is treated as absent.

use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

pub const ARTIFACTS_OPTION: &str = "artifacts";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactRule {
    pub paths: Vec<String>,
    pub untracked: bool,
}

impl ArtifactRule {
    /// Extracts the rule from a job's option map.
    ///
    /// Returns `None` when the key is missing or is not an object. Inside the
    /// object, a non-array `paths`, non-string path entries and a non-bool
    /// `untracked` are skipped.
    pub fn from_options(options: &BTreeMap<String, Value>) -> Option<Self> {
        let block = options.get(ARTIFACTS_OPTION)?;
        let Some(hash) = block.as_object() else {
            warn!("Ignoring artifacts option that is not an object");
            return None;
        };

        let mut paths = Vec::new();
        if let Some(list) = hash.get("paths").and_then(Value::as_array) {
            for entry in list {
                match entry.as_str() {
                    Some(path) => paths.push(path.to_string()),
                    None => warn!(entry = %entry, "Skipping non-string artifact path"),
                }
            }
        }

        let untracked = hash
            .get("untracked")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        Some(Self { paths, untracked })
    }

    /// Declared paths cleaned and anchored at the working directory
    pub fn find_patterns(&self) -> Vec<String> {
        self.paths
            .iter()
            .map(|path| format!("./{}", clean_path(path)))
            .collect()
    }
}

/// Lexically simplifies a slash-separated path.
///
/// Collapses repeated slashes, drops `.` segments and resolves `..` against the
/// preceding segment. A rooted path never climbs above `/`; a relative path keeps
/// leading `..` segments. The empty result is `.`.
pub fn clean_path(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if rooted => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}
