use jobscript::cli::commands::{CliArgs, Commands};
use jobscript::cli::handlers::{handle_generate, handle_shells};
use jobscript::util::logging::{init_logging, LoggingConfig};
use jobscript::{NAME, VERSION};

use clap::Parser;
use std::process;
use tracing::debug;

fn main() {
    let args = CliArgs::parse();
    let log_level = args.log_level_override();
    init_logging(&LoggingConfig::resolve(log_level.as_deref()));

    debug!("{} v{} starting", NAME, VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Generate(generate_args) => handle_generate(generate_args, log_level.as_deref()),
        Commands::Shells(shells_args) => handle_shells(shells_args),
    };

    process::exit(exit_code);
}
