//! CLI module for the autoscaler - command-line flags.

pub mod commands;

pub use commands::Cli;
