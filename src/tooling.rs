//! Tooling layer
//!
//! Command-line surface over the controller: one-shot commands plus an interactive browser.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
