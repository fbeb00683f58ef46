use thiserror::Error;

/// Errors raised while loading or storing a [`TraceConfig`](crate::config::TraceConfig).
///
/// Applying options never fails; only the serde layer produces these.
#[derive(Error, Debug)]
pub enum TraceConfigError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
