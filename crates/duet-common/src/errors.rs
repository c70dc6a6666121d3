use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum DuetError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A frame from a participant that does not decode as a client event.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl From<serde_json::Error> for DuetError {
    fn from(err: serde_json::Error) -> Self {
        DuetError::Protocol(err.to_string())
    }
}
