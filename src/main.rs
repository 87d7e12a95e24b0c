// Entrypoint for the todo CLI.
// - Keeps `main` small: parse arguments, load config, build the context and
//   dispatch one command.
// - Exit status: 1 when the guard rejects a command or config is broken,
//   0 otherwise (other failures are printed as `Error: ...`).

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use todo_cli::cli::Cli;
use todo_cli::commands::{self, Context};
use todo_cli::config::Config;
use todo_cli::error::TodoError;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            println!("Error: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    let mut ctx = Context::from_config(&config);
    match commands::dispatch(cli.command, &mut ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err @ TodoError::AuthenticationRequired) => {
            println!("{}", err);
            ExitCode::FAILURE
        }
        Err(err) => {
            println!("Error: {}", err);
            ExitCode::SUCCESS
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = Config::load()?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    Ok(config)
}

fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .init();
}
