// EN: src/system/command.rs

use crate::{
    core::{
        builder::{self, CommandDefinition, UsageError},
        platform::SplitError,
    },
    models::{DefinitionOptions, Platform, ReturnKind, RunOptions},
    system::executor::{self, ExecutionResult, LaunchError},
};
use std::fmt;
use std::process::ExitStatus;
use thiserror::Error;

/// Why `run` could not build or start a command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    /// The command could not be built.
    #[error(transparent)]
    Usage(#[from] UsageError),
    /// The direct command line could not be split.
    #[error(transparent)]
    Split(#[from] SplitError),
}

/// The value `Command::run` returns, selected with `RunOptions::return_kind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunValue {
    /// `Some(true)` for a zero exit status, `Some(false)` otherwise, `None` if the
    /// command could not be launched.
    Success(Option<bool>),
    /// The exit status.
    Status(Option<ExitStatus>),
    /// The numeric exit code; `None` if killed by a signal.
    StatusValue(Option<i32>),
    /// The captured standard output.
    Output(Option<String>),
    /// The captured standard error.
    ErrorOutput(Option<String>),
}

impl RunValue {
    /// True only for `Success(Some(true))`.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(Some(true)))
    }
}

/// An executable command line, together with the result of its last run.
#[derive(Debug, Clone)]
pub struct Command {
    command: String,
    platform: Platform,
    result: ExecutionResult,
}

impl Command {
    /// Wraps an already built command line. The host platform is used when
    /// `platform` is `None`.
    pub fn new(command: impl Into<String>, platform: Option<Platform>) -> Self {
        Self {
            command: command.into(),
            platform: Platform::resolve(platform),
            result: ExecutionResult::default(),
        }
    }

    /// The command line.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// The platform the command line was built for.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Executes the command, replacing the result of any previous run.
    ///
    /// ```no_run
    /// use syscmd::{Command, ErrorOutput, RunOptions, RunValue};
    ///
    /// let mut cmd = Command::new("echo $HOME", None);
    /// cmd.run(&RunOptions::new()).unwrap();          // expanded by the shell
    /// cmd.run(&RunOptions::new().direct(true)).unwrap(); // prints `$HOME`
    ///
    /// let value = cmd
    ///     .run(&RunOptions::new().error_output(ErrorOutput::Separate).return_kind(syscmd::ReturnKind::ErrorOutput))
    ///     .unwrap();
    /// assert_eq!(value, RunValue::ErrorOutput(Some(String::new())));
    /// ```
    ///
    /// # Errors
    /// Only a direct command line that cannot be split fails; launch failures are
    /// recorded and reported as `Success(None)`.
    pub fn run(&mut self, options: &RunOptions) -> Result<RunValue, SplitError> {
        self.result = ExecutionResult::default();
        self.result = executor::execute(&self.command, self.platform, options)?;

        Ok(match options.return_kind {
            ReturnKind::Success => RunValue::Success(
                self.result
                    .status
                    .filter(|_| !self.result.is_error())
                    .map(|status| status.success()),
            ),
            ReturnKind::Status => RunValue::Status(self.result.status),
            ReturnKind::StatusValue => RunValue::StatusValue(self.result.status_value()),
            ReturnKind::Output => RunValue::Output(self.result.output.clone()),
            ReturnKind::ErrorOutput => RunValue::ErrorOutput(self.result.error_output.clone()),
        })
    }

    /// The result of the last run.
    pub fn result(&self) -> &ExecutionResult {
        &self.result
    }

    /// Standard output of the last run, if captured.
    pub fn output(&self) -> Option<&str> {
        self.result.output.as_deref()
    }

    /// Standard error of the last run, if captured separately.
    pub fn error_output(&self) -> Option<&str> {
        self.result.error_output.as_deref()
    }

    /// Exit status of the last run.
    pub fn status(&self) -> Option<ExitStatus> {
        self.result.status
    }

    /// Exit code of the last run.
    pub fn status_value(&self) -> Option<i32> {
        self.result.status_value()
    }

    /// Why the last run could not be launched.
    pub fn error(&self) -> Option<&LaunchError> {
        self.result.error.as_ref()
    }

    /// True if the last run could not be launched.
    pub fn is_error(&self) -> bool {
        self.result.is_error()
    }

    /// True if the last run exited with a zero status.
    pub fn is_success(&self) -> bool {
        self.result.is_success()
    }
}

impl From<CommandDefinition> for Command {
    fn from(definition: CommandDefinition) -> Self {
        definition.into_command()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command)
    }
}

/// Builds a command and runs it.
pub fn run<F>(
    name: &str,
    definition: &DefinitionOptions,
    build: F,
    options: &RunOptions,
) -> Result<RunValue, RunError>
where
    F: FnOnce(&mut CommandDefinition) -> Result<(), UsageError>,
{
    let mut command = builder::command(name, definition, build)?;
    Ok(command.run(options)?)
}
