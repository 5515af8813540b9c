//! `phidb`: evaluate Phi specifications over JSON-lines relations.

mod commands;
mod table;

use clap::{Parser, Subcommand};
use commands::{CheckArgs, RunArgs};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "phidb")]
#[command(about = "Evaluate Extended Multi-Feature (EMF) queries described by Phi specifications")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a specification and write the result table
    Run(RunArgs),

    /// Parse a specification and print what it describes
    Check(CheckArgs),
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let outcome = match &cli.command {
        Command::Run(args) => commands::run(args),
        Command::Check(args) => commands::check(args),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");

            ExitCode::FAILURE
        }
    }
}
