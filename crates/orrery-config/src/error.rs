//! Configuration error types.

use std::path::PathBuf;

/// Errors from loading, saving or parsing `config.ron`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not valid RON for [`Config`](crate::Config).
    #[error("invalid config in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[source] ron::Error),

    /// A parsed value is outside what the renderer or scene can use.
    #[error("invalid config value {field} = {value}: {reason}")]
    Invalid {
        field: &'static str,
        value: f32,
        reason: &'static str,
    },
}

/// Errors produced while reading the flat settings file.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Reading or writing the file failed.
    #[error("settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The file ended before every field was read.
    #[error("settings file truncated: expected {expected} values, found {found}")]
    Truncated { expected: usize, found: usize },

    /// A line could not be parsed as the expected type.
    #[error("settings line {line}: cannot parse {value:?} as {kind}")]
    InvalidValue {
        line: usize,
        value: String,
        kind: &'static str,
    },
}
