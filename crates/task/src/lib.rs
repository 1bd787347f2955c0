//! Command execution for runway
//!
//! This crate parses command strings, resolves tools on the search path
//! and runs them, either to completion or in the background.

pub mod command;
pub mod command_executor;
pub mod runner;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use command::{resolve_tool, split_command, split_words};
pub use command_executor::CommandExecutor;
pub use runner::{BackgroundProcess, ProcessRunner, SystemProcessRunner};
