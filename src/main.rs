//! lighthouse-push CLI entrypoint.
//!
//! Provides a thin wrapper over the `cli` module: parse args, audit every
//! URL, push the batch, and exit with an appropriate status.
//! For programmatic use, prefer the library API (`lighthouse_push::api`).

use std::process::ExitCode;

use clap::Parser;

mod cli;

fn main() -> ExitCode {
    let args = cli::CliArgs::parse();
    match cli::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            let mut cause = e.source();
            while let Some(inner) = cause {
                eprintln!("  caused by: {inner}");
                cause = inner.source();
            }
            ExitCode::FAILURE
        }
    }
}
