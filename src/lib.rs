//! Builds command lines escaped for a Unix or Windows shell, and runs them.
//!
//! ```no_run
//! use syscmd::{DefinitionOptions, FragmentOptions, RunOptions};
//!
//! let mut cmd = syscmd::command("gs", &DefinitionOptions::new(), |cmd| {
//!     cmd.os_option("q", FragmentOptions::new())?;
//!     cmd.option("-sOutputFile", FragmentOptions::new().equal_file("out file.pdf"))?;
//!     cmd.file("input.ps", FragmentOptions::new());
//!     Ok(())
//! })
//! .unwrap();
//! let succeeded = cmd.run(&RunOptions::new()).unwrap();
//! ```

/// Names of configuration files, variables and shells.
pub mod constants;
/// Platform policy, escaping, replacements and the command builder.
pub mod core;
/// Plain data types shared by the builder and the executor.
pub mod models;
/// Process execution.
pub mod system;

pub use crate::core::builder::{CommandDefinition, UsageError, command};
pub use crate::core::escaper::{escape_filename, escape_value};
pub use crate::core::platform::{PlatformParseError, SplitError, except_on, execute, only_on};
pub use crate::core::replacements::CommandTable;
pub use crate::models::{
    DefinitionOptions, ErrorOutput, FragmentKind, FragmentOptions, Platform, PlatformFilter,
    ReturnKind, RunOptions,
};
pub use crate::system::command::{Command, RunError, RunValue, run};
pub use crate::system::executor::{ExecutionResult, LaunchError};
