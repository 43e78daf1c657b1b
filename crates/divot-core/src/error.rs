use thiserror::Error;

/// Anything that can go wrong while streaming a completion.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompletionError {
    #[error("no API key configured")]
    MissingApiKey,
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("provider error {code}: {message}")]
    Provider { code: i64, message: String },
    #[error("malformed response chunk: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid dashboard config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown log level {0:?}")]
    LogLevel(String),
}
