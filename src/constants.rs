// src/constants.rs

/// The name of the directory holding syscmd configuration (in ~/.config/).
pub const CONFIG_DIR_NAME: &str = "syscmd";

/// The name of the command replacement table file (inside the config directory).
pub const COMMANDS_FILENAME: &str = "commands.toml";

/// Environment variable that points to an alternative replacement table file.
pub const COMMANDS_ENV_VAR: &str = "SYSCMD_COMMANDS";

/// Shell used to interpret command lines built for Unix.
pub const UNIX_SHELL: &str = "sh";

/// Shell used to interpret command lines built for Windows.
pub const WINDOWS_SHELL: &str = "cmd";
