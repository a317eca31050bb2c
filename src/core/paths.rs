// src/core/paths.rs

use crate::constants::{COMMANDS_ENV_VAR, COMMANDS_FILENAME, CONFIG_DIR_NAME};
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to locate configuration files.
#[derive(Error, Debug)]
pub enum PathError {
    /// The platform has no configuration directory.
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
}

/// Returns the path to the syscmd configuration directory (`~/.config/syscmd`).
/// The directory is not created.
pub fn get_config_dir() -> Result<PathBuf, PathError> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .ok_or(PathError::ConfigDirNotFound)
}

/// Where the command replacement table is read from, and whether the location was
/// set explicitly through `SYSCMD_COMMANDS`.
pub fn get_commands_file() -> Result<(PathBuf, bool), PathError> {
    locate_commands_file(env::var_os(COMMANDS_ENV_VAR), get_config_dir().ok())
}

/// `config_dir` is the syscmd configuration directory. An empty override counts
/// as unset.
pub(crate) fn locate_commands_file(
    override_path: Option<OsString>,
    config_dir: Option<PathBuf>,
) -> Result<(PathBuf, bool), PathError> {
    if let Some(path) = override_path.filter(|p| !p.is_empty()) {
        return Ok((PathBuf::from(path), true));
    }
    let config_dir = config_dir.ok_or(PathError::ConfigDirNotFound)?;
    Ok((config_dir.join(COMMANDS_FILENAME), false))
}
