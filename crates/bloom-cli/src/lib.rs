//! bloom-cli library root.
//!
//! Re-exports the command-line modules so that integration tests can
//! exercise config loading and rendering without spawning the binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod render;
