//! Yearscan CLI library.
//!
//! This library provides the pieces behind the `yearscan` binary: argument
//! parsing, configuration loading, CSV input/output, metadata flattening and
//! chunked batch execution.

pub mod cli;
pub mod commands;
pub mod config;
pub mod confirm;
pub mod error;
pub mod io;
pub mod metadata;

pub use cli::{Cli, Command};
pub use config::CliConfig;
pub use error::{CliError, Result};
