//! Error types shared by the scanner, planner and mover.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The target path is missing or is not a directory.
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// An explicitly requested configuration file does not exist.
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// Invalid TOML syntax or structure.
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("Invalid glob pattern '{0}'")]
    InvalidGlobPattern(String),

    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidRegexPattern { pattern: String, reason: String },

    #[error("IO error reading configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while scanning the directory or moving files.
#[derive(Debug, Error)]
pub enum SortError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Error reading directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create directory {}: {source}", .path.display())]
    DirectoryCreation {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The destination already holds an entry with the same name.
    #[error("{} already exists", .0.display())]
    DestinationExists(PathBuf),

    #[error("Failed to move {} to {}: {source}", .from.display(), .to.display())]
    FileMove {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read answer: {0}")]
    Prompt(std::io::Error),
}

/// Result type for sorting operations.
pub type SortResult<T> = Result<T, SortError>;
