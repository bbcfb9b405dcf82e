//! Macten CLI
//!
//! Command-line entry point for the macten macro preprocessor.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

mod clean;
mod generate;
mod run;

#[derive(Parser)]
#[command(name = "macten")]
#[command(about = "A source-to-source macro preprocessor", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate procedural macro artifacts into .macten/
    Generate {
        /// Path to the source file
        path: PathBuf,
    },

    /// Expand every macro in a source file
    Run {
        /// Path to the source file
        path: PathBuf,

        /// Output path (defaults to <stem>.macten<ext> next to the source)
        dest: Option<PathBuf>,
    },

    /// Remove the .macten/ artifact directory
    Clean,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate { path } => generate::generate(&path),
        Commands::Run { path, dest } => run::run(&path, dest.as_deref()),
        Commands::Clean => clean::clean(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            report_failure(&error);
            ExitCode::FAILURE
        }
    }
}

/// Prints a failure, expanding definition diagnostics line by line.
fn report_failure(error: &anyhow::Error) {
    if let Some(failure) = error.downcast_ref::<mt_parse::ParseFailure>() {
        for diagnostic in &failure.diagnostics {
            eprintln!("{} {diagnostic}", "ERROR".red().bold());
        }
        return;
    }
    eprintln!("{} {error:#}", "error:".red().bold());
}
