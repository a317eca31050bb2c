//! # System Interaction Layer
//!
//! This module is the boundary between command lines and the operating system.
//!
//! ## Modules
//!
//! - **`executor`**: Spawns a finished command line, either through the target
//!   platform's shell or directly from its argument vector, feeds its standard input
//!   and captures its output and exit status.
//! - **`command`**: `Command`, an executable command line that keeps the result of
//!   its last run and picks the value `run` returns.

/// `Command` and the `run` shortcut.
pub mod command;
/// Spawning and output capture.
pub mod executor;
