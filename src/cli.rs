//! Command-line interface for conduit.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "conduit")]
#[command(about = "Conduit pipe-expression language", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a program's `main` function
    Run {
        file: PathBuf,
        /// Skip the pipe-inlining optimizer
        #[arg(long)]
        no_opt: bool,
    },
    /// Print a program as the evaluator will see it
    Show {
        file: PathBuf,
        /// Print the parsed program without optimizing
        #[arg(long)]
        no_opt: bool,
    },
    /// Parse and optimize, reporting diagnostics only
    Check { file: PathBuf },
}
