use minislot_core::SessionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("session error: {0}")]
    Session(String),
    #[error("invalid stop order: {0}")]
    StopOrder(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("serialize error: {0}")]
    Serialize(String),
}

impl From<SessionError> for SimError {
    fn from(value: SessionError) -> Self {
        Self::Session(value.to_string())
    }
}

impl From<std::io::Error> for SimError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

impl From<serde_json::Error> for SimError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value.to_string())
    }
}
