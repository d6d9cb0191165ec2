//! Shell dialects and script generation
//!
//! A [`Shell`] turns a job into a [`ShellScript`]: the script text, the
//! environment it expects, and the interpreter invocation to run it with.
//! Dialects are looked up by name through a [`ShellRegistry`].
//!
//! # Example
//!
//! ```no_run
//! use jobscript::job::load_job;
//! use jobscript::shell::{ShellRegistry, ShellScriptInfo};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let job = load_job(Path::new("job.yaml"))?;
//! let registry = ShellRegistry::with_defaults();
//! let shell = registry.select(None)?;
//!
//! let script = shell.generate_script(&ShellScriptInfo::new(&job))?;
//! println!("{} {:?}", script.command, script.arguments);
//! # Ok(())
//! # }
//! ```

pub mod bash;
pub mod escape;
pub mod registry;
pub mod types;
pub mod writer;

pub use bash::BashShell;
pub use escape::shell_escape;
pub use registry::ShellRegistry;
pub use types::{FeaturesInfo, Shell, ShellError, ShellScript, ShellScriptInfo, ShellType};
pub use writer::ScriptWriter;
