//! Command-line front end over the dashboard screens.

pub mod args;
pub mod commands;

pub use args::{Cli, Commands};
