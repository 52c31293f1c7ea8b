//! Error types for nextgran

use thiserror::Error;

/// Error types shared by the nextgran crates.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A numeric value that does not map to a valid identifier.
    #[error("invalid {kind}: {value}")]
    InvalidId {
        /// Identifier kind (e.g. "LCID")
        kind: &'static str,
        /// Offending value
        value: usize,
    },

    /// File I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors.
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}
