use anyhow::{Context, Result};
use std::fs;
use tracing::{debug, error, info};

use super::commands::{GenerateArgs, ShellsArgs};
use super::output::{OutputFormatter, ShellInfo};
use crate::config::GeneratorConfig;
use crate::job::load_job;
use crate::shell::{ShellRegistry, ShellScriptInfo};

/// Runs `generate` and returns the process exit code.
///
/// `log_level` is the level given on the command line; it replaces
/// `JOBSCRIPT_LOG_LEVEL` like the other flags replace their variables.
pub fn handle_generate(args: &GenerateArgs, log_level: Option<&str>) -> i32 {
    match generate(args, log_level) {
        Ok(()) => 0,
        Err(e) => {
            error!("{:#}", e);
            1
        }
    }
}

fn generate(args: &GenerateArgs, log_level: Option<&str>) -> Result<()> {
    let defaults = GeneratorConfig::default();
    let config = GeneratorConfig {
        shell: args.shell.clone().or(defaults.shell),
        login_shell: args.login || defaults.login_shell,
        user: args.user.clone().or(defaults.user),
        log_level: log_level.map(str::to_lowercase).unwrap_or(defaults.log_level),
    };

    let registry = ShellRegistry::with_defaults();
    config
        .validate_with(&registry)
        .context("Configuration error")?;
    debug!("{}", config);

    let job = load_job(&args.job_file)
        .with_context(|| format!("Failed to load job from {}", args.job_file.display()))?;

    let shell = registry.select(config.shell.as_deref())?;
    info!(job_id = job.id, shell = shell.name(), "Generating job script");

    let info = ShellScriptInfo {
        job: &job,
        environment: args.env.clone(),
        user: config.user.clone(),
        shell_type: config.shell_type(),
    };
    let script = shell.generate_script(&info)?;

    let formatter = OutputFormatter::new(args.format.into());
    let output = formatter.format_script(&script)?;

    match &args.output {
        Some(path) => {
            fs::write(path, &output)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            info!("Script written to {}", path.display());
        }
        None => print!("{}", output),
    }

    Ok(())
}

pub fn handle_shells(args: &ShellsArgs) -> i32 {
    let registry = ShellRegistry::with_defaults();
    let shells: Vec<ShellInfo> = registry
        .all()
        .into_iter()
        .map(ShellInfo::from_shell)
        .collect();

    match OutputFormatter::new(args.format.into()).format_shells(&shells) {
        Ok(output) => {
            print!("{}", output);
            0
        }
        Err(e) => {
            error!("{:#}", e);
            1
        }
    }
}
