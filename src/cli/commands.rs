use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::job::EnvVariable;

/// Safe, self-contained shell script generation for CI build jobs
#[derive(Parser, Debug)]
#[command(
    name = "jobscript",
    about = "Safe, self-contained shell script generation for CI build jobs",
    version,
    author,
    long_about = "jobscript turns a CI job description (repository, commit, build commands, \
                  artifact rules) into a single escaped shell script that fetches the \
                  repository, runs the commands and uploads artifacts, plus the interpreter \
                  invocation needed to run it."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

impl CliArgs {
    /// Log level requested on the command line, if any.
    ///
    /// `--log-level` wins, then `-v` (debug) and `-q` (error).
    pub fn log_level_override(&self) -> Option<String> {
        if let Some(level) = &self.log_level {
            Some(level.to_lowercase())
        } else if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Generate the script for a job description",
        long_about = "Reads a job description (JSON, YAML or TOML) and prints the generated \
                      script.\n\n\
                      Examples:\n  \
                      jobscript generate job.yaml\n  \
                      jobscript generate job.json --login --user builder\n  \
                      jobscript generate job.yaml --env HOME=/home/ci --format json"
    )]
    Generate(GenerateArgs),

    #[command(about = "List the registered shell dialects")]
    Shells(ShellsArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(value_name = "JOB_FILE", help = "Path to the job description")]
    pub job_file: PathBuf,

    #[arg(
        short = 's',
        long,
        value_name = "NAME",
        help = "Shell dialect (defaults to the platform default)"
    )]
    pub shell: Option<String>,

    #[arg(long, help = "Run the script in a login shell")]
    pub login: bool,

    #[arg(
        short = 'u',
        long,
        value_name = "USER",
        help = "Switch to this user before running the script"
    )]
    pub user: Option<String>,

    #[arg(
        short = 'e',
        long = "env",
        value_name = "NAME=VALUE",
        value_parser = parse_env,
        help = "Extra environment assignment, may be repeated"
    )]
    pub env: Vec<EnvVariable>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "script",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write output to file instead of stdout"
    )]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct ShellsArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Script,
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Script => super::output::OutputFormat::Script,
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

fn parse_env(s: &str) -> Result<EnvVariable, String> {
    crate::config::parse_env_assignment(s).map_err(|e| e.to_string())
}
