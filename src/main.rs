use extbuild::cli::commands::{CliArgs, Commands};
use extbuild::cli::handlers::{handle_build, handle_config, handle_discover};
use extbuild::util::logging::{init_logging, LoggingConfig};
use extbuild::{NAME, VERSION};

use clap::Parser;
use std::process;
use tracing::debug;

fn main() {
    let args = CliArgs::parse();
    init_logging(LoggingConfig::from_env().with_cli_overrides(
        args.log_level.as_deref(),
        args.verbose,
        args.quiet,
    ));

    debug!("{} v{} starting", NAME, VERSION);
    debug!("Arguments: {:?}", args);

    let config_path = args.config.as_deref();
    let exit_code = match &args.command {
        Commands::Build(build_args) => handle_build(build_args, config_path),
        Commands::Discover(discover_args) => handle_discover(discover_args, config_path),
        Commands::Config(config_args) => handle_config(config_args, config_path),
    };

    process::exit(exit_code);
}
