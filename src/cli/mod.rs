//! Command Line Interface (CLI) layer for lighthouse-push.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) that validates options, sets up
//! logging and hands off to `lighthouse_push::api`.
//!
//! If you are embedding lighthouse-push into another application, prefer
//! the high-level `lighthouse_push::api` module instead of the CLI code.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
