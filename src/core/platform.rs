// EN: src/core/platform.rs

use crate::{
    core::tokenizer,
    models::{Platform, PlatformFilter},
};
use lazy_static::lazy_static;
use regex::Regex;
use std::{fmt, str::FromStr};
use thiserror::Error;

lazy_static! {
    /// Characters a POSIX shell reads literally; everything else gets a backslash.
    static ref UNSAFE_SHELL_CHAR: Regex =
        Regex::new(r"[^A-Za-z0-9_\-.,:+/@\n]").expect("shell escape pattern is valid");
}

/// Why a command line could not be split into words.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SplitError {
    /// A quoted run is never closed.
    #[error("Unmatched quote in command line: {0}")]
    UnmatchedQuote(String),
    /// Any other malformed command line.
    #[error("Command line could not be split into words: {0}")]
    Malformed(String),
}

/// An unknown platform name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown platform '{0}' (expected unix, windows, bash, linux, osx, macos or cmd).")]
pub struct PlatformParseError(pub String);

impl Platform {
    /// The platform of the running host.
    pub fn host() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Unix
        }
    }

    /// An explicit platform wins over the host platform.
    pub fn resolve(explicit: Option<Self>) -> Self {
        explicit.unwrap_or_else(Self::host)
    }

    /// The character that introduces an option: `-` on Unix, `/` on Windows.
    pub fn option_switch(self) -> &'static str {
        match self {
            Self::Unix => "-",
            Self::Windows => "/",
        }
    }

    /// The token that continues a command on the next line.
    pub fn line_continuation(self) -> &'static str {
        match self {
            Self::Unix => "\\\n",
            Self::Windows => "^\n",
        }
    }

    /// Quotes `text` so that the platform's shell reads it back as a single word.
    ///
    /// # Unix
    /// Every character outside `[A-Za-z0-9_-.,:+/@]` is escaped with a backslash
    /// (`output file` becomes `output\ file`). Newlines are wrapped in single quotes
    /// and the empty string becomes `''`.
    ///
    /// # Windows
    /// The text is wrapped in double quotes, doubling any embedded double quote.
    pub fn escape(self, text: &str) -> String {
        match self {
            Self::Unix => escape_posix(text),
            Self::Windows => format!("\"{}\"", text.replace('"', "\"\"")),
        }
    }

    /// Splits a command line into its argument vector, the way the platform's
    /// shell would.
    ///
    /// # Errors
    /// Returns a `SplitError` when a quoted run is never closed, or when a POSIX
    /// command line is otherwise malformed (e.g. a trailing backslash).
    pub fn split(self, text: &str) -> Result<Vec<String>, SplitError> {
        match self {
            Self::Unix => shlex::split(text).ok_or_else(|| SplitError::Malformed(text.to_string())),
            Self::Windows => tokenizer::split_windows(text),
        }
    }

    /// Checks a fragment filter against this platform.
    pub fn applies(self, filter: &PlatformFilter) -> bool {
        if !filter.only_on.is_empty() && !filter.only_on.contains(&self) {
            return false;
        }
        !filter.except_on.contains(&self)
    }

    /// Runs `f` when this platform is one of `platforms`.
    /// An empty list never runs it.
    pub fn only_on<R>(self, platforms: &[Self], f: impl FnOnce() -> R) -> Option<R> {
        if platforms.is_empty() {
            return None;
        }
        self.execute(&PlatformFilter::only_on(platforms), f)
    }

    /// Runs `f` unless this platform is one of `platforms`.
    pub fn except_on<R>(self, platforms: &[Self], f: impl FnOnce() -> R) -> Option<R> {
        self.execute(&PlatformFilter::except_on(platforms), f)
    }

    /// Runs `f` when this platform satisfies `filter`.
    pub fn execute<R>(self, filter: &PlatformFilter, f: impl FnOnce() -> R) -> Option<R> {
        self.applies(filter).then(f)
    }
}

fn escape_posix(text: &str) -> String {
    if text.is_empty() {
        return "''".to_string();
    }
    UNSAFE_SHELL_CHAR
        .replace_all(text, r"\$0")
        .replace('\n', "'\n'")
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unix => f.write_str("unix"),
            Self::Windows => f.write_str("windows"),
        }
    }
}

impl FromStr for Platform {
    type Err = PlatformParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unix" | "bash" | "linux" | "osx" | "macos" => Ok(Self::Unix),
            "windows" | "cmd" => Ok(Self::Windows),
            _ => Err(PlatformParseError(s.to_string())),
        }
    }
}

/// Runs `f` only when the host is one of `platforms`.
///
/// ```
/// use syscmd::{Platform, only_on};
///
/// let listing = only_on(&[Platform::Unix], || "ls").or(only_on(&[Platform::Windows], || "dir"));
/// assert!(listing.is_some());
/// ```
pub fn only_on<R>(platforms: &[Platform], f: impl FnOnce() -> R) -> Option<R> {
    Platform::host().only_on(platforms, f)
}

/// Runs `f` unless the host is one of `platforms`.
pub fn except_on<R>(platforms: &[Platform], f: impl FnOnce() -> R) -> Option<R> {
    Platform::host().except_on(platforms, f)
}

/// Runs `f` when the host satisfies `filter`.
pub fn execute<R>(filter: &PlatformFilter, f: impl FnOnce() -> R) -> Option<R> {
    Platform::host().execute(filter, f)
}
