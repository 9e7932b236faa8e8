use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArcadeError
{
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error("Unknown game '{0}'. Run with --help.")]
    UnknownGame(String),
}

impl From<std::io::Error> for ArcadeError
{
    fn from(err: std::io::Error) -> Self
    {
        ArcadeError::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ArcadeError>;
