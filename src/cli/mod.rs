//! Command Line Interface (CLI) layer.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) for single-file and batch
//! estimation. It wires user-provided options to the library functionality
//! exposed via `baresoil::api`.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
