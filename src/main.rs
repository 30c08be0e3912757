mod cli;
mod commands;
mod config;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use config::Config;
use reconciler::OperationStatus;
use std::io;
use std::process::ExitCode;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    match cli.command {
        Command::Invoke(args) => {
            let config = Config::load(cli.config.as_deref())?;
            match commands::invoke::run(&ctx, &config, &args)? {
                OperationStatus::Failed => Ok(ExitCode::FAILURE),
                OperationStatus::Success | OperationStatus::InProgress => Ok(ExitCode::SUCCESS),
            }
        }
        Command::Config => {
            let config = Config::load(cli.config.as_deref())?;
            commands::config::show(&ctx, &config)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "profilectl", &mut io::stdout());
            Ok(ExitCode::SUCCESS)
        }
    }
}
