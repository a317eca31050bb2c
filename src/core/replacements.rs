// EN: src/core/replacements.rs

//! The command replacement table: maps the logical name a command is built with
//! (`gs`) to the executable that should actually run (`/usr/local/bin/gs`,
//! `gswin32c`).
//!
//! ```toml
//! [commands]
//! gs = "/usr/local/bin/gs"
//!
//! [windows]
//! gs = "gswin32c"
//! ```

use crate::{core::paths, models::Platform};
use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::Path};

/// Logical command names mapped to the executables that run them.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandTable {
    /// Replacements for every platform.
    #[serde(default)]
    pub commands: HashMap<String, String>,
    /// Unix-only replacements, taking precedence over `commands`.
    #[serde(default)]
    pub unix: HashMap<String, String>,
    /// Windows-only replacements, taking precedence over `commands`.
    #[serde(default)]
    pub windows: HashMap<String, String>,
}

impl CommandTable {
    /// An empty table: every name resolves to itself.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a replacement for every platform.
    pub fn with(mut self, name: impl Into<String>, executable: impl Into<String>) -> Self {
        self.commands.insert(name.into(), executable.into());
        self
    }

    /// Adds a replacement used only when building for `platform`.
    pub fn with_platform(
        mut self,
        platform: Platform,
        name: impl Into<String>,
        executable: impl Into<String>,
    ) -> Self {
        self.platform_table_mut(platform)
            .insert(name.into(), executable.into());
        self
    }

    /// The entries specific to `platform`.
    pub fn platform_table(&self, platform: Platform) -> &HashMap<String, String> {
        match platform {
            Platform::Unix => &self.unix,
            Platform::Windows => &self.windows,
        }
    }

    fn platform_table_mut(&mut self, platform: Platform) -> &mut HashMap<String, String> {
        match platform {
            Platform::Unix => &mut self.unix,
            Platform::Windows => &mut self.windows,
        }
    }

    /// The table that applies to `platform`: the platform entries merged over the
    /// common ones.
    pub fn merged(&self, platform: Platform) -> HashMap<&str, &str> {
        self.commands
            .iter()
            .chain(self.platform_table(platform))
            .map(|(name, executable)| (name.as_str(), executable.as_str()))
            .collect()
    }

    /// The executable to use for `name` when building for `platform`.
    pub fn resolve<'a>(&'a self, name: &'a str, platform: Platform) -> &'a str {
        match self.merged(platform).get(name) {
            Some(&executable) => {
                debug!("Replacing command '{}' with '{}' ({})", name, executable, platform);
                executable
            }
            None => name,
        }
    }

    /// Parses a table from TOML text. Executables may use `~` and `$VAR`.
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut table: Self =
            toml::from_str(content).context("Failed to parse command replacement table")?;
        for map in [&mut table.commands, &mut table.unix, &mut table.windows] {
            for (name, executable) in map.iter_mut() {
                let expanded = shellexpand::full(executable.as_str()).with_context(|| {
                    format!("Failed to expand executable path for command '{}'", name)
                })?;
                *executable = expanded.into_owned();
            }
        }
        Ok(table)
    }

    /// Loads a table from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a valid table.
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading command replacement table from '{}'", path.display());
        let content = fs::read_to_string(path).with_context(|| {
            format!("Failed to read command replacement table '{}'", path.display())
        })?;
        Self::from_toml(&content)
            .with_context(|| format!("Invalid command replacement table '{}'", path.display()))
    }

    /// Loads the user's table: `$SYSCMD_COMMANDS` if set, otherwise
    /// `~/.config/syscmd/commands.toml`.
    ///
    /// A missing default file yields an empty table; a missing file named by
    /// `SYSCMD_COMMANDS` is an error.
    pub fn load_default() -> Result<Self> {
        let (path, explicit) = paths::get_commands_file()?;
        Self::load_located(&path, explicit)
    }

    fn load_located(path: &Path, explicit: bool) -> Result<Self> {
        if !explicit && !path.exists() {
            debug!(
                "No command replacement table at '{}', using an empty one.",
                path.display()
            );
            return Ok(Self::default());
        }
        Self::load(path)
    }
}
