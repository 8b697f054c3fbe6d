//! CLI module - argument parsing, prompts and command implementations

pub mod args;
pub mod commands;
pub mod helpers;
pub mod prompt;

pub use args::{Cli, GlobalOpts};
