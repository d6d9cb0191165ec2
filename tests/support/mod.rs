use jobscript::job::{load_job, JobDescription};
use std::path::{Path, PathBuf};
use std::process::Command;

#[allow(dead_code)]
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/jobs")
        .join(name)
}

#[allow(dead_code)]
pub fn load_fixture(name: &str) -> JobDescription {
    load_job(&fixture_path(name)).expect("fixture should load")
}

/// Runs `bash -n` on `source`. Returns `None` when bash is not installed.
#[allow(dead_code)]
pub fn bash_syntax_ok(source: &str) -> Option<bool> {
    let output = Command::new("bash").arg("-n").arg("-c").arg(source).output().ok()?;
    Some(output.status.success())
}

/// Runs `source` with bash and returns stdout. Returns `None` when bash is not installed.
#[allow(dead_code)]
pub fn bash_stdout(source: &str) -> Option<String> {
    let output = Command::new("bash").arg("-c").arg(source).output().ok()?;
    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}
