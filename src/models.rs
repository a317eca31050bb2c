// src/models.rs

use crate::core::replacements::CommandTable;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;
use std::path::PathBuf;

// --- TARGET PLATFORM ---

/// The family of shell a command line is built for.
///
/// The policy attached to each variant (escaping, option switch, splitting)
/// lives in `core::platform`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// POSIX shells (`sh`, `bash`, ...).
    Unix,
    /// `cmd.exe`.
    Windows,
}

/// Restricts a fragment (or a block of code) to some platforms.
///
/// An empty `only_on` list places no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformFilter {
    /// The platforms the fragment is restricted to.
    pub only_on: Vec<Platform>,
    /// The platforms the fragment is left out on.
    pub except_on: Vec<Platform>,
}

impl PlatformFilter {
    /// A filter that accepts only the given platforms.
    pub fn only_on(platforms: &[Platform]) -> Self {
        Self {
            only_on: platforms.to_vec(),
            except_on: Vec::new(),
        }
    }

    /// A filter that accepts every platform but the given ones.
    pub fn except_on(platforms: &[Platform]) -> Self {
        Self {
            only_on: Vec::new(),
            except_on: platforms.to_vec(),
        }
    }
}

// --- BUILDER MODELS ---

/// What kind of fragment was appended last to a `CommandDefinition`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    /// Nothing but the command name has been written.
    Command,
    /// An option such as `-q` or `/o`.
    Option,
    /// A file name, escaped and slash-normalized for the platform.
    File,
    /// An escaped value.
    Value,
    /// Text appended verbatim.
    Argument,
}

/// Per-call options accepted by every builder operation.
///
/// Values are stringified when they are set, so anything implementing
/// `Display` can be passed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentOptions {
    /// Value separated from the option by a space.
    pub value: Option<String>,
    /// Value glued to the option.
    pub join_value: Option<String>,
    /// Value attached to the option with `=`.
    pub equal_value: Option<String>,
    /// File name separated from the option by a space.
    pub file: Option<String>,
    /// File name glued to the option.
    pub join_file: Option<String>,
    /// File name attached to the option with `=`.
    pub equal_file: Option<String>,
    /// See `FragmentOptions::only_on`.
    pub only_on: Vec<Platform>,
    /// See `FragmentOptions::except_on`.
    pub except_on: Vec<Platform>,
    /// Prefix a bare option name with the platform switch.
    pub os_prefix: bool,
}

impl FragmentOptions {
    /// Options that place no restriction and attach nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value separated from the option by a space: `-x 123`.
    pub fn value(mut self, value: impl Display) -> Self {
        self.value = Some(value.to_string());
        self
    }

    /// Value glued to the option: `-x123`.
    pub fn join_value(mut self, value: impl Display) -> Self {
        self.join_value = Some(value.to_string());
        self
    }

    /// Value attached with an equal sign: `-x=123`.
    pub fn equal_value(mut self, value: impl Display) -> Self {
        self.equal_value = Some(value.to_string());
        self
    }

    /// File name separated from the option by a space: `-o out.pdf`.
    pub fn file(mut self, name: impl Display) -> Self {
        self.file = Some(name.to_string());
        self
    }

    /// File name glued to the option: `-oout.pdf`.
    pub fn join_file(mut self, name: impl Display) -> Self {
        self.join_file = Some(name.to_string());
        self
    }

    /// File name attached with an equal sign: `-o=out.pdf`.
    pub fn equal_file(mut self, name: impl Display) -> Self {
        self.equal_file = Some(name.to_string());
        self
    }

    /// Include the fragment only when building for `platform`.
    /// Can be called several times to accept more platforms.
    pub fn only_on(mut self, platform: Platform) -> Self {
        self.only_on.push(platform);
        self
    }

    /// Leave the fragment out when building for `platform`.
    pub fn except_on(mut self, platform: Platform) -> Self {
        self.except_on.push(platform);
        self
    }

    /// Prefix a bare option name with the platform switch (`-` or `/`).
    pub fn os_prefix(mut self, os_prefix: bool) -> Self {
        self.os_prefix = os_prefix;
        self
    }

    pub(crate) fn filter(&self) -> PlatformFilter {
        PlatformFilter {
            only_on: self.only_on.clone(),
            except_on: self.except_on.clone(),
        }
    }
}

/// Construction-time configuration of a `CommandDefinition`.
#[derive(Debug, Clone, Default)]
pub struct DefinitionOptions {
    /// Target platform. The host platform is used when unset.
    pub platform: Option<Platform>,
    /// Replacements applied to the command name.
    pub replacements: CommandTable,
}

impl DefinitionOptions {
    /// The host platform and an empty replacement table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds for `platform` instead of the host.
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Sets the table applied to the command name.
    pub fn replacements(mut self, replacements: CommandTable) -> Self {
        self.replacements = replacements;
        self
    }
}

// --- EXECUTION MODELS ---

/// What happens to the standard error of an executed command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorOutput {
    /// Not captured: shown on the console.
    #[default]
    Console,
    /// Captured together with the standard output, interleaved.
    Mix,
    /// Captured into its own buffer.
    Separate,
}

/// Which piece of the execution result `Command::run` returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReturnKind {
    /// Whether the command succeeded; `None` if it could not be launched.
    #[default]
    Success,
    /// The exit status; `None` if the command could not be launched.
    Status,
    /// The numeric exit code.
    StatusValue,
    /// The captured standard output.
    Output,
    /// The captured standard error (with `ErrorOutput::Separate`).
    ErrorOutput,
}

/// Options for a single execution.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Spawn the program from its argument vector instead of through a shell.
    pub direct: bool,
    /// Where standard error goes.
    pub error_output: ErrorOutput,
    /// Data written to the standard input of the command.
    pub stdin_data: Option<Vec<u8>>,
    /// What `Command::run` returns.
    pub return_kind: ReturnKind,
    /// Working directory of the child process.
    pub current_dir: Option<PathBuf>,
    /// Variables added to the child environment.
    pub env: HashMap<String, String>,
}

impl RunOptions {
    /// Shell execution, stderr on the console, no stdin, `Success` returned.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bypass the shell when `direct` is set.
    pub fn direct(mut self, direct: bool) -> Self {
        self.direct = direct;
        self
    }

    /// Sets where standard error goes.
    pub fn error_output(mut self, error_output: ErrorOutput) -> Self {
        self.error_output = error_output;
        self
    }

    /// Writes `data` to the standard input of the command.
    pub fn stdin_data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.stdin_data = Some(data.into());
        self
    }

    /// Sets what `Command::run` returns.
    pub fn return_kind(mut self, return_kind: ReturnKind) -> Self {
        self.return_kind = return_kind;
        self
    }

    /// Runs the command in `dir`.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Sets an environment variable for the command.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}
