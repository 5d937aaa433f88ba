//! Startup probe for external processes.
//!
//! A probe starts a command, waits for a grace period and checks whether the command is
//! still running. A command that is still up counts as started successfully and is
//! stopped again. A command that already exited counts as failed and its output is kept.

pub mod config;
pub mod probe;
pub mod report;
