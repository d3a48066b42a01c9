mod cli;
mod commands;
mod config;
mod engine;
mod paths;
mod progress;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;
use std::path::PathBuf;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
    /// Settings file given on the command line
    pub config: Option<PathBuf>,
}

fn main() -> Result<()> {
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
        config: cli.config,
    };

    let result = match cli.command {
        Command::Plan(args) => commands::plan::run(&ctx, &args),
        Command::Apply(args) => commands::apply::run(&ctx, &args),
        Command::Verify(args) => commands::verify::run(&ctx, &args),
        Command::Profiles => commands::profiles::run(&ctx),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "znt", &mut io::stdout());
            Ok(())
        }
    };

    if let Err(err) = &result
        && let Some(hint) = remote_hint(err)
    {
        ui::dim(&hint);
    }

    result
}

/// Advice for a Zuora client error anywhere in the error chain
fn remote_hint(err: &anyhow::Error) -> Option<String> {
    let remote = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<zuora::Error>())?;
    let category = remote.category();
    let retry = if category.is_retryable() {
        " (usually transient, re-running is safe)"
    } else {
        ""
    };
    Some(format!("{}: {}{}", category, category.advice(), retry))
}
