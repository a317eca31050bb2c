// EN: src/system/executor.rs

use crate::{
    constants::{UNIX_SHELL, WINDOWS_SHELL},
    core::platform::SplitError,
    models::{ErrorOutput, Platform, RunOptions},
};
use std::io::{self, ErrorKind, Read, Write};
use std::process::{ChildStdin, Command as StdCommand, ExitStatus, Stdio};
use std::sync::Arc;
use std::thread::{self, ScopedJoinHandle};
use thiserror::Error;

/// Why a command could not be run. Stored in `ExecutionResult`, hence `Clone`.
#[derive(Error, Debug, Clone)]
pub enum LaunchError {
    /// The command line has no words.
    #[error("No command specified to run.")]
    EmptyCommand,
    /// The process could not be spawned.
    #[error("Command '{command}' could not be executed: {source}")]
    Spawn {
        /// The command line.
        command: String,
        /// The spawn error.
        #[source]
        source: Arc<io::Error>,
    },
    /// Reading from or writing to the process failed.
    #[error("I/O error while running command '{command}': {source}")]
    Io {
        /// The command line.
        command: String,
        /// The I/O error.
        #[source]
        source: Arc<io::Error>,
    },
}

impl LaunchError {
    /// The kind of the underlying I/O error, if any.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::EmptyCommand => None,
            Self::Spawn { source, .. } | Self::Io { source, .. } => Some(source.kind()),
        }
    }
}

/// Everything one execution produced.
///
/// When the command could not be launched only `error` is set.
#[derive(Debug, Clone, Default)]
pub struct ExecutionResult {
    /// Captured standard output (or both streams with `ErrorOutput::Mix`).
    pub output: Option<String>,
    /// Only set with `ErrorOutput::Separate`.
    pub error_output: Option<String>,
    /// Exit status; `None` if the command did not run.
    pub status: Option<ExitStatus>,
    /// Set when the command could not be launched.
    pub error: Option<LaunchError>,
}

impl ExecutionResult {
    fn launch_failure(error: LaunchError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    /// The numeric exit code. `None` if the command did not run or was killed by a
    /// signal.
    pub fn status_value(&self) -> Option<i32> {
        self.status.and_then(|status| status.code())
    }

    /// True if the command could not be launched.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// True if the command ran and exited with a zero status.
    pub fn is_success(&self) -> bool {
        !self.is_error() && self.status.is_some_and(|status| status.success())
    }
}

/// Runs a finished command line and waits for it.
///
/// By default the line is interpreted by the shell of `platform` (`sh -c` or
/// `cmd /C`). With `options.direct` it is split into words and the first one is
/// spawned directly, so unquoted arguments are not expanded.
///
/// A non-zero exit status is a normal outcome. A command that cannot be launched is
/// reported through `ExecutionResult::error`.
///
/// # Errors
/// Returns a `SplitError` if a direct command line cannot be split into words.
pub fn execute(
    command_line: &str,
    platform: Platform,
    options: &RunOptions,
) -> Result<ExecutionResult, SplitError> {
    let Some(process) = build_process(command_line, platform, options)? else {
        return Ok(ExecutionResult::launch_failure(LaunchError::EmptyCommand));
    };
    Ok(spawn_and_collect(process, command_line, options)
        .unwrap_or_else(ExecutionResult::launch_failure))
}

fn build_process(
    command_line: &str,
    platform: Platform,
    options: &RunOptions,
) -> Result<Option<StdCommand>, SplitError> {
    let mut process = if options.direct {
        let parts = platform.split(command_line)?;
        let Some((program, args)) = parts.split_first() else {
            return Ok(None);
        };
        log::debug!("Spawning '{}' directly with {} argument(s).", program, args.len());
        let mut process = StdCommand::new(program);
        process.args(args);
        process
    } else {
        if command_line.trim().is_empty() {
            return Ok(None);
        }
        log::debug!("Spawning '{}' through the {} shell.", command_line, platform);
        shell_process(command_line, platform)
    };

    if let Some(dir) = &options.current_dir {
        process.current_dir(dunce::simplified(dir));
    }
    process.envs(&options.env);
    Ok(Some(process))
}

fn shell_process(command_line: &str, platform: Platform) -> StdCommand {
    match platform {
        Platform::Unix => {
            let mut process = StdCommand::new(UNIX_SHELL);
            process.arg("-c").arg(command_line);
            process
        }
        Platform::Windows => {
            let mut process = StdCommand::new(WINDOWS_SHELL);
            process.arg("/C");
            push_raw_arg(&mut process, command_line);
            process
        }
    }
}

// cmd.exe does its own parsing; the line must reach it unquoted.
#[cfg(windows)]
fn push_raw_arg(process: &mut StdCommand, arg: &str) {
    use std::os::windows::process::CommandExt;
    process.raw_arg(arg);
}

#[cfg(not(windows))]
fn push_raw_arg(process: &mut StdCommand, arg: &str) {
    process.arg(arg);
}

/// Spawns the process, feeds its stdin and drains its output.
///
/// Stdin is written and stderr is read on scoped threads while stdout is read here,
/// so none of the pipes can fill up and stall the child.
fn spawn_and_collect(
    mut process: StdCommand,
    command_line: &str,
    options: &RunOptions,
) -> Result<ExecutionResult, LaunchError> {
    let io_error = |source: io::Error| LaunchError::Io {
        command: command_line.to_string(),
        source: Arc::new(source),
    };

    process
        .stdin(if options.stdin_data.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped());

    let merged_output = match options.error_output {
        ErrorOutput::Console => {
            process.stderr(Stdio::inherit());
            None
        }
        ErrorOutput::Separate => {
            process.stderr(Stdio::piped());
            None
        }
        ErrorOutput::Mix => {
            let (reader, writer) = io::pipe().map_err(io_error)?;
            process
                .stdout(writer.try_clone().map_err(io_error)?)
                .stderr(writer);
            Some(reader)
        }
    };

    let mut child = process.spawn().map_err(|source| LaunchError::Spawn {
        command: command_line.to_string(),
        source: Arc::new(source),
    })?;
    // `process` still owns the write ends of the merged pipe; reading would never
    // reach EOF while they are open.
    drop(process);

    let stdin = child.stdin.take();
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let stdin_data = options.stdin_data.as_deref();

    let (output, error_output) = thread::scope(|scope| {
        let writer = stdin
            .zip(stdin_data)
            .map(|(pipe, data)| scope.spawn(move || feed_stdin(pipe, data)));
        let error_reader = stderr.map(|pipe| scope.spawn(move || read_stream(pipe)));

        let output = match (merged_output, stdout) {
            (Some(reader), _) => read_stream(reader),
            (None, Some(pipe)) => read_stream(pipe),
            (None, None) => Ok(String::new()),
        };
        let error_output = error_reader.map(join_reader).transpose();
        if writer.is_some_and(|writer| writer.join().is_err()) {
            log::warn!("The stdin writer thread panicked.");
        }
        (output, error_output)
    });

    let status = child.wait().map_err(io_error)?;
    log::debug!("Command '{}' finished with {}.", command_line, status);

    Ok(ExecutionResult {
        output: Some(output.map_err(io_error)?),
        error_output: error_output.map_err(io_error)?,
        status: Some(status),
        error: None,
    })
}

/// Writes `data` and closes the pipe.
fn feed_stdin(mut pipe: ChildStdin, data: &[u8]) {
    match pipe.write_all(data) {
        Ok(()) => {}
        // The child exited or closed its stdin without reading everything.
        Err(e) if e.kind() == ErrorKind::BrokenPipe => {
            log::debug!("Child closed its stdin before all input was written.");
        }
        Err(e) => log::warn!("Failed to write to child stdin: {}", e),
    }
}

fn read_stream(mut stream: impl Read) -> io::Result<String> {
    let mut buffer = Vec::new();
    stream.read_to_end(&mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn join_reader(handle: ScopedJoinHandle<'_, io::Result<String>>) -> io::Result<String> {
    handle
        .join()
        .unwrap_or_else(|_| Err(io::Error::other("stream reader thread panicked")))
}
