use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("exchange credentials are not configured: {0}")]
    Config(String),

    #[error("failed to connect to exchange: {0}")]
    Connect(String),

    #[error("exchange rejected the request (code {code}): {message}")]
    Upstream { code: i64, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response payload: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// The exchange's error envelope, e.g. `{"code":-1121,"msg":"Invalid symbol."}`.
#[derive(Debug, Deserialize)]
pub struct ApiErrorEnvelope {
    pub code: i64,
    pub msg: String,
}
