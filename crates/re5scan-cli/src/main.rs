mod cli;
mod commands;
mod config;
mod shutdown;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Args, Command};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("re5scan=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = config::load(&args.config, &args.overrides());

    match args.command.unwrap_or(Command::Watch) {
        Command::Watch => commands::watch::run(config),
        Command::Identify { path } => commands::identify::run(path.as_deref(), &config),
        Command::Status => commands::status::run(&config),
    }
}
