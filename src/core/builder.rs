// EN: src/core/builder.rs

//! # Command Builder
//!
//! `CommandDefinition` accumulates a command line one fragment at a time. Every
//! fragment is escaped for the definition's target platform, so the finished string
//! can be handed to that platform's shell as is.
//!
//! ```
//! use syscmd::{FragmentOptions, Platform};
//!
//! let cmd = syscmd::command("ps2pdf", &syscmd::DefinitionOptions::new().platform(Platform::Unix), |cmd| {
//!     cmd.option("-dSAFER", FragmentOptions::new())?;
//!     cmd.file("input_file", FragmentOptions::new());
//!     cmd.file("output file", FragmentOptions::new());
//!     Ok(())
//! })
//! .unwrap();
//! assert_eq!(cmd.to_string(), r"ps2pdf -dSAFER input_file output\ file");
//! ```
//!
//! Each operation takes `FragmentOptions`, whose `only_on` / `except_on` lists make
//! the call a no-op when building for another platform. The operations that glue a
//! fragment to the previous option (`join_value`, `equal_value`, `join_file`,
//! `equal_file`) fail with a `UsageError` unless an option was the last fragment.

use crate::{
    core::escaper::{escape_filename, escape_value},
    models::{DefinitionOptions, FragmentKind, FragmentOptions, Platform},
    system::command::Command,
};
use log::trace;
use std::fmt::{self, Display};
use thiserror::Error;

/// Misuse of a `CommandDefinition` operation. The command line is left unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    /// A value or file operation was used without a preceding option.
    #[error("An option is required for {operation}.")]
    OptionRequired {
        /// The operation that was called.
        operation: &'static str,
    },
    /// More than one argument was given to an option.
    #[error("Invalid number of arguments ({given} given, 0 or 1 expected).")]
    TooManyArguments {
        /// How many arguments were given.
        given: usize,
    },
    /// Several attached files were given to one option.
    #[error("Only one of file, join_file and equal_file can be given to an option.")]
    ConflictingFileOptions,
}

/// A command line under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDefinition {
    command: String,
    platform: Platform,
    last_fragment: FragmentKind,
}

impl CommandDefinition {
    /// Starts a command line with `name`, after applying the replacement table.
    pub fn new(name: &str, options: &DefinitionOptions) -> Self {
        let platform = Platform::resolve(options.platform);
        let command = options.replacements.resolve(name, platform).to_string();
        Self {
            command,
            platform,
            last_fragment: FragmentKind::Command,
        }
    }

    /// The command line built so far.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// The platform the command line is built for.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// What was appended last.
    pub fn last_fragment(&self) -> FragmentKind {
        self.last_fragment
    }

    /// Finishes the definition into an executable `Command`.
    pub fn into_command(self) -> Command {
        Command::new(self.command, Some(self.platform))
    }

    /// Adds an option.
    ///
    /// A name starting with a letter gets the platform switch when `os_prefix` is
    /// set (`x` becomes `-x` or `/x`); any other name is used verbatim.
    ///
    /// Values are appended in order: `value` after a space, `join_value` with no
    /// separator, `equal_value` after `=`. Then at most one of `file`,
    /// `join_file`, `equal_file` is appended the same way, escaped as a filename:
    ///
    /// ```text
    /// option("-x", value 123)                     -x 123
    /// option("-x", join_value 123)                -x123
    /// option("-d", join_value x, equal_value 1)   -dx=1
    /// option("-i", equal_file "path/file")        -i=path/file
    /// ```
    pub fn option(&mut self, name: &str, opts: FragmentOptions) -> Result<&mut Self, UsageError> {
        self.option_args::<&str>(name, &[], opts)
    }

    /// Like `option`, with the value given positionally. At most one positional
    /// value is accepted and it takes precedence over `opts.value`.
    pub fn option_args<V: Display>(
        &mut self,
        name: &str,
        args: &[V],
        opts: FragmentOptions,
    ) -> Result<&mut Self, UsageError> {
        if args.len() > 1 {
            return Err(UsageError::TooManyArguments { given: args.len() });
        }
        let attached_file = attached_file(&opts)?;
        if !self.applicable(&opts) {
            return Ok(self);
        }

        let mut token = if opts.os_prefix && name.starts_with(|c: char| c.is_ascii_alphabetic()) {
            format!("{}{}", self.platform.option_switch(), name)
        } else {
            name.to_string()
        };

        let value = args.first().map(ToString::to_string).or(opts.value);
        if let Some(value) = value {
            token.push(' ');
            token.push_str(&escape_value(value, self.platform));
        }
        if let Some(value) = opts.join_value {
            token.push_str(&escape_value(value, self.platform));
        }
        if let Some(value) = opts.equal_value {
            token.push('=');
            token.push_str(&escape_value(value, self.platform));
        }
        if let Some((separator, file)) = attached_file {
            token.push_str(separator);
            token.push_str(&escape_filename(file, self.platform));
        }

        self.append(" ", &token, FragmentKind::Option);
        Ok(self)
    }

    /// Adds an option whose bare name always gets the platform switch.
    pub fn os_option(&mut self, name: &str, opts: FragmentOptions) -> Result<&mut Self, UsageError> {
        self.option(name, opts.os_prefix(true))
    }

    /// Adds a filename.
    pub fn file(&mut self, name: impl Display, opts: FragmentOptions) -> &mut Self {
        if self.applicable(&opts) {
            let escaped = escape_filename(name, self.platform);
            self.append(" ", &escaped, FragmentKind::File);
        }
        self
    }

    /// Glues a filename to the preceding option: `-ipath/output`.
    pub fn join_file(
        &mut self,
        name: impl Display,
        opts: FragmentOptions,
    ) -> Result<&mut Self, UsageError> {
        if self.applicable(&opts) {
            self.require_option("join_file")?;
            let escaped = escape_filename(name, self.platform);
            self.append("", &escaped, FragmentKind::File);
        }
        Ok(self)
    }

    /// Attaches a filename to the preceding option with `=`: `-i=path/output`.
    pub fn equal_file(
        &mut self,
        name: impl Display,
        opts: FragmentOptions,
    ) -> Result<&mut Self, UsageError> {
        if self.applicable(&opts) {
            self.require_option("equal_file")?;
            let escaped = escape_filename(name, self.platform);
            self.append("=", &escaped, FragmentKind::File);
        }
        Ok(self)
    }

    /// Adds a quoted value (the value of an option, or a quoted argument).
    pub fn value(&mut self, value: impl Display, opts: FragmentOptions) -> &mut Self {
        if self.applicable(&opts) {
            let escaped = escape_filename(value, self.platform);
            self.append(" ", &escaped, FragmentKind::Value);
        }
        self
    }

    /// Glues a value to the preceding option: `-x123`.
    pub fn join_value(
        &mut self,
        value: impl Display,
        opts: FragmentOptions,
    ) -> Result<&mut Self, UsageError> {
        if self.applicable(&opts) {
            self.require_option("join_value")?;
            let escaped = escape_value(value, self.platform);
            self.append("", &escaped, FragmentKind::Value);
        }
        Ok(self)
    }

    /// Attaches a value to the preceding option with `=`: `-x=123`.
    pub fn equal_value(
        &mut self,
        value: impl Display,
        opts: FragmentOptions,
    ) -> Result<&mut Self, UsageError> {
        if self.applicable(&opts) {
            self.require_option("equal_value")?;
            let escaped = escape_value(value, self.platform);
            self.append("=", &escaped, FragmentKind::Value);
        }
        Ok(self)
    }

    /// Adds an argument without any quoting.
    ///
    /// A shell will interpret it (`$PATH` gets expanded); when the command is run
    /// directly it is only split into words.
    pub fn argument(&mut self, value: impl Display, opts: FragmentOptions) -> &mut Self {
        if self.applicable(&opts) {
            self.append(" ", &value.to_string(), FragmentKind::Argument);
        }
        self
    }

    fn applicable(&self, opts: &FragmentOptions) -> bool {
        self.platform.applies(&opts.filter())
    }

    fn require_option(&self, operation: &'static str) -> Result<(), UsageError> {
        if self.last_fragment == FragmentKind::Option {
            Ok(())
        } else {
            Err(UsageError::OptionRequired { operation })
        }
    }

    fn append(&mut self, separator: &str, fragment: &str, kind: FragmentKind) {
        trace!("Appending {:?} fragment '{}{}'", kind, separator, fragment);
        self.command.push_str(separator);
        self.command.push_str(fragment);
        self.last_fragment = kind;
    }
}

impl Display for CommandDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command)
    }
}

/// The file attached to an option and its separator.
fn attached_file(opts: &FragmentOptions) -> Result<Option<(&'static str, String)>, UsageError> {
    let candidates = [
        (" ", opts.file.clone()),
        ("", opts.join_file.clone()),
        ("=", opts.equal_file.clone()),
    ];
    let mut given = candidates
        .into_iter()
        .filter_map(|(separator, file)| file.map(|file| (separator, file)));
    let first = given.next();
    if given.next().is_some() {
        return Err(UsageError::ConflictingFileOptions);
    }
    Ok(first)
}

/// Builds a command.
///
/// `build` receives the new `CommandDefinition`; usage errors it returns are passed
/// through.
pub fn command<F>(name: &str, options: &DefinitionOptions, build: F) -> Result<Command, UsageError>
where
    F: FnOnce(&mut CommandDefinition) -> Result<(), UsageError>,
{
    let mut definition = CommandDefinition::new(name, options);
    build(&mut definition)?;
    Ok(definition.into_command())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::replacements::CommandTable;

    fn unix() -> DefinitionOptions {
        DefinitionOptions::new().platform(Platform::Unix)
    }

    fn windows() -> DefinitionOptions {
        DefinitionOptions::new().platform(Platform::Windows)
    }

    fn opts() -> FragmentOptions {
        FragmentOptions::new()
    }

    #[test]
    fn test_command_generation_with_files() {
        let cmd = command("ps2pdf", &unix(), |cmd| {
            cmd.file("input_file", opts());
            cmd.file("output file", opts());
            Ok(())
        })
        .unwrap();
        assert_eq!(cmd.to_string(), r"ps2pdf input_file output\ file");

        let cmd = command("ps2pdf", &windows(), |cmd| {
            cmd.file("input_file", opts()).file("output file", opts());
            Ok(())
        })
        .unwrap();
        assert_eq!(cmd.to_string(), r#"ps2pdf "input_file" "output file""#);
    }

    #[test]
    fn test_option_value_forms() {
        let cases = [
            (opts().value(123), "-x 123"),
            (opts().join_value(123), "-x123"),
            (opts().equal_value(123), "-x=123"),
            (opts().join_value(123).equal_value(666), "-x123=666"),
            (opts().value(1).join_value(2).equal_value(3), "-x 12=3"),
        ];
        for (options, expected) in cases {
            let mut cmd = CommandDefinition::new("test", &unix());
            cmd.option("-x", options).unwrap();
            assert_eq!(cmd.command(), format!("test {expected}"));
            assert_eq!(cmd.last_fragment(), FragmentKind::Option);
        }
    }

    #[test]
    fn test_option_attached_files() {
        let mut cmd = CommandDefinition::new("gs", &unix());
        cmd.option("-o", opts().file("out put.pdf"))
            .unwrap()
            .option("-I", opts().join_file("lib dir"))
            .unwrap()
            .option("--input", opts().equal_file("in.ps"))
            .unwrap();
        assert_eq!(cmd.command(), r"gs -o out\ put.pdf -Ilib\ dir --input=in.ps");

        let mut cmd = CommandDefinition::new("gs", &windows());
        cmd.option("/I", opts().join_file("lib/dir")).unwrap();
        assert_eq!(cmd.command(), r#"gs /I"lib\dir""#);
    }

    #[test]
    fn test_option_rejects_several_files() {
        let mut cmd = CommandDefinition::new("gs", &unix());
        let result = cmd.option("-o", opts().file("a").equal_file("b"));
        assert_eq!(result.unwrap_err(), UsageError::ConflictingFileOptions);
        assert_eq!(cmd.command(), "gs");
        assert_eq!(cmd.last_fragment(), FragmentKind::Command);
    }

    #[test]
    fn test_option_prefix_depends_on_os_prefix() {
        let mut cmd = CommandDefinition::new("test", &unix());
        cmd.option("a", opts().value(111)).unwrap();
        assert_eq!(cmd.command(), "test a 111");

        let mut cmd = CommandDefinition::new("test", &unix());
        cmd.option("a", opts().value(111).os_prefix(true)).unwrap();
        assert_eq!(cmd.command(), "test -a 111");

        let mut cmd = CommandDefinition::new("test", &windows());
        cmd.os_option("a", opts().value(111)).unwrap();
        assert_eq!(cmd.command(), r#"test /a "111""#);
    }

    #[test]
    fn test_option_with_switch_is_kept_verbatim() {
        let mut cmd = CommandDefinition::new("test", &windows());
        cmd.os_option("-q", opts())
            .unwrap()
            .os_option("/Y", opts())
            .unwrap()
            .os_option("--all", opts())
            .unwrap();
        assert_eq!(cmd.command(), "test -q /Y --all");
    }

    #[test]
    fn test_option_args_positional_value() {
        let mut cmd = CommandDefinition::new("test", &unix());
        cmd.option_args("-n", &[5], opts().value(9)).unwrap();
        assert_eq!(cmd.command(), "test -n 5");

        let result = cmd.option_args("-n", &[1, 2], opts());
        assert_eq!(result.unwrap_err(), UsageError::TooManyArguments { given: 2 });
        assert_eq!(cmd.command(), "test -n 5");
    }

    #[test]
    fn test_join_and_equal_fragments_after_option() {
        let mut cmd = CommandDefinition::new("test", &unix());
        cmd.option("-x", opts()).unwrap().join_value(123, opts()).unwrap();
        cmd.option("-y", opts()).unwrap().equal_value("a b", opts()).unwrap();
        cmd.option("-i", opts()).unwrap().join_file("path/output", opts()).unwrap();
        cmd.option("-o", opts()).unwrap().equal_file("out file", opts()).unwrap();
        assert_eq!(
            cmd.command(),
            r"test -x123 -y=a\ b -ipath/output -o=out\ file"
        );
        assert_eq!(cmd.last_fragment(), FragmentKind::File);
    }

    #[test]
    fn test_join_without_option_is_a_usage_error() {
        let mut cmd = CommandDefinition::new("test", &unix());
        cmd.file("input", opts());

        assert_eq!(
            cmd.join_value(1, opts()).unwrap_err(),
            UsageError::OptionRequired { operation: "join_value" }
        );
        assert_eq!(
            cmd.equal_value(1, opts()).unwrap_err(),
            UsageError::OptionRequired { operation: "equal_value" }
        );
        assert_eq!(
            cmd.join_file("f", opts()).unwrap_err(),
            UsageError::OptionRequired { operation: "join_file" }
        );
        assert_eq!(
            cmd.equal_file("f", opts()).unwrap_err(),
            UsageError::OptionRequired { operation: "equal_file" }
        );
        assert_eq!(cmd.command(), "test input");
        assert_eq!(cmd.last_fragment(), FragmentKind::File);
    }

    #[test]
    fn test_join_right_after_command_is_a_usage_error() {
        let mut cmd = CommandDefinition::new("test", &unix());
        assert!(cmd.join_value("x", opts()).is_err());
        assert_eq!(cmd.command(), "test");
    }

    #[test]
    fn test_join_after_joined_value_is_a_usage_error() {
        let mut cmd = CommandDefinition::new("test", &unix());
        cmd.option("-x", opts()).unwrap().join_value(1, opts()).unwrap();
        assert!(cmd.equal_value(2, opts()).is_err());
        assert_eq!(cmd.command(), "test -x1");
    }

    #[test]
    fn test_value_and_argument() {
        let mut cmd = CommandDefinition::new("echo", &unix());
        cmd.value("$PATH", opts());
        assert_eq!(cmd.last_fragment(), FragmentKind::Value);
        cmd.argument("$PATH", opts());
        assert_eq!(cmd.last_fragment(), FragmentKind::Argument);
        assert_eq!(cmd.command(), r"echo \$PATH $PATH");

        let mut cmd = CommandDefinition::new("echo", &windows());
        cmd.value("%PATH%", opts()).argument("%PATH%", opts());
        assert_eq!(cmd.command(), r#"echo "%PATH%" %PATH%"#);
    }

    #[test]
    fn test_os_arguments() {
        let build = |cmd: &mut CommandDefinition| -> Result<(), UsageError> {
            cmd.option("-a", opts())?;
            cmd.option("-b", opts().only_on(Platform::Unix))?;
            cmd.option("-c", opts().only_on(Platform::Windows))?;
            cmd.option("-d", opts().except_on(Platform::Unix))?;
            cmd.option("-e", opts().except_on(Platform::Windows))?;
            Ok(())
        };
        assert_eq!(command("test", &unix(), build).unwrap().to_string(), "test -a -b -e");
        assert_eq!(command("test", &windows(), build).unwrap().to_string(), "test -a -c -d");
    }

    #[test]
    fn test_filtered_fragment_leaves_state_unchanged() {
        let mut cmd = CommandDefinition::new("test", &unix());
        cmd.option("-x", opts()).unwrap();
        cmd.file("skipped", opts().only_on(Platform::Windows));
        cmd.argument("skipped", opts().except_on(Platform::Unix));
        assert_eq!(cmd.command(), "test -x");
        assert_eq!(cmd.last_fragment(), FragmentKind::Option);

        // Still joined to the option, since nothing was appended in between.
        cmd.join_value(1, opts()).unwrap();
        assert_eq!(cmd.command(), "test -x1");
    }

    #[test]
    fn test_filtered_join_skips_precondition() {
        let mut cmd = CommandDefinition::new("test", &unix());
        assert!(cmd.join_value(1, opts().only_on(Platform::Windows)).is_ok());
        assert_eq!(cmd.command(), "test");
    }

    #[test]
    fn test_command_replacement() {
        let options = unix().replacements(CommandTable::new().with("gs", "/usr/local/bin/gs"));
        let cmd = command("gs", &options, |cmd| {
            cmd.option("-q", opts())?;
            Ok(())
        })
        .unwrap();
        assert_eq!(cmd.to_string(), "/usr/local/bin/gs -q");
    }

    #[test]
    fn test_os_command_replacement() {
        let table = CommandTable::new().with_platform(Platform::Windows, "gs", "gswin32c");

        let cmd = CommandDefinition::new("gs", &unix().replacements(table.clone()));
        assert_eq!(cmd.command(), "gs");

        let cmd = CommandDefinition::new("gs", &windows().replacements(table));
        assert_eq!(cmd.command(), "gswin32c");
    }

    #[test]
    fn test_command_passes_usage_errors_through() {
        let result = command("test", &unix(), |cmd| {
            cmd.equal_file("x", opts())?;
            Ok(())
        });
        assert_eq!(
            result.unwrap_err(),
            UsageError::OptionRequired { operation: "equal_file" }
        );
    }

    #[test]
    fn test_definition_defaults_to_host_platform() {
        let cmd = CommandDefinition::new("ls", &DefinitionOptions::new());
        assert_eq!(cmd.platform(), Platform::host());
        assert_eq!(cmd.last_fragment(), FragmentKind::Command);
        assert_eq!(cmd.to_string(), "ls");
    }
}
