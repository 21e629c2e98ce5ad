//! Tool implementations for agentrelay.
//!
//! The tools agent never calls tools itself: it answers with a command, which
//! is picked out of its response and run through the shell.

pub mod command;
pub mod shell;

pub use command::extract_command;
pub use shell::ShellTool;
