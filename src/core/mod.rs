// src/core/mod.rs

/// `CommandDefinition` and the `command` entry point.
pub mod builder;
/// Value and file name escaping.
pub mod escaper;
/// Configuration file locations.
pub mod paths;
/// Per-platform rules for switches, escaping and splitting.
pub mod platform;
/// The command replacement table.
pub mod replacements;
pub(crate) mod tokenizer;
