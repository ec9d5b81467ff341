//! Conduit CLI entry point.

mod cli;

use clap::Parser;
use cli::{Cli, Command};
use conduit::pipeline::compile_with_diagnostics;
use conduit::pretty::print_program;
use conduit::{eval_program, ConduitDatabaseImpl, SourceFile, Value};
use salsa::Database;
use std::path::PathBuf;

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Run { file, no_opt } => run_file(file, !no_opt),
        Command::Show { file, no_opt } => show_file(file, !no_opt),
        Command::Check { file } => check_file(file),
    }
}

fn load_source(db: &dyn salsa::Database, path: &PathBuf) -> SourceFile {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading file: {e}");
            std::process::exit(1);
        }
    };
    SourceFile::new(db, path.clone(), text)
}

fn run_file(path: PathBuf, optimize: bool) {
    ConduitDatabaseImpl::default().attach(|db| {
        let source = load_source(db, &path);
        let result = compile_with_diagnostics(db, source, optimize);
        for diag in &result.diagnostics {
            eprintln!("[{:?}] {} at {}", diag.phase, diag.message, diag.span);
        }
        // Same meaning of "error" as `check`: compile errors stop the run.
        if result.has_errors() {
            std::process::exit(1);
        }
        match eval_program(db, result.program) {
            Ok(Value::Unit) => {}
            Ok(value) => println!("{value}"),
            Err(e) => {
                eprintln!("Runtime error: {e}");
                std::process::exit(1);
            }
        }
    });
}

fn show_file(path: PathBuf, optimize: bool) {
    ConduitDatabaseImpl::default().attach(|db| {
        let source = load_source(db, &path);
        let result = compile_with_diagnostics(db, source, optimize);
        for diag in &result.diagnostics {
            eprintln!("[{:?}] {} at {}", diag.phase, diag.message, diag.span);
        }
        print!("{}", print_program(db, result.program));
    });
}

fn check_file(path: PathBuf) {
    ConduitDatabaseImpl::default().attach(|db| {
        let source = load_source(db, &path);
        let result = compile_with_diagnostics(db, source, true);
        if result.diagnostics.is_empty() {
            println!("✓ No errors");
        } else {
            println!("Diagnostics ({} total):", result.diagnostics.len());
            for diag in &result.diagnostics {
                println!("  [{:?}] {} at {}", diag.phase, diag.message, diag.span);
            }
        }
        if result.has_errors() {
            std::process::exit(1);
        }
    });
}
