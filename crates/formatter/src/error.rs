use thiserror::Error;

/// Result type for formatter setup and IO edges
pub type Result<T> = std::result::Result<T, FormatError>;

/// Errors raised while configuring the formatter or loading its inputs.
///
/// The pipeline functions themselves never fail; they degrade to empty output.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file is not valid TOML
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Payload is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// A configured label could not be compiled into a pattern
    #[error("Invalid label pattern {label:?}: {source}")]
    Pattern {
        label: String,
        #[source]
        source: regex::Error,
    },
}

impl FormatError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
