mod cli;
mod config;
mod logging;
mod run;

use std::process::ExitCode;

use clap::Parser;
use engine_logging::engine_error;

use crate::cli::Cli;
use crate::config::FileConfig;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(level) = engine_logging::parse_level(&cli.log_level) else {
        eprintln!("Error: unknown log level '{}'", cli.log_level);
        return ExitCode::from(2);
    };
    logging::initialize(level, cli.log_file.as_deref());

    let file = match cli.config.as_deref().map(FileConfig::load).transpose() {
        Ok(file) => file.unwrap_or_default(),
        Err(err) => {
            eprintln!("Error: {err:#}");
            return ExitCode::from(2);
        }
    };
    let config = match config::resolve(&cli, file) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err:#}");
            return ExitCode::from(2);
        }
    };

    match run::execute(config, cli.pick) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            engine_error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
