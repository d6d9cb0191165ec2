//! Job descriptions and the data derived from them

pub mod artifacts;
pub mod loader;
pub mod types;
pub mod variables;

pub use artifacts::{clean_path, ArtifactRule, ARTIFACTS_OPTION};
pub use loader::{load_job, parse_job, JobError, JobFormat};
pub use types::{JobDescription, JobVariable, RunnerSettings};
pub use variables::{build_variables, EnvVariable};
