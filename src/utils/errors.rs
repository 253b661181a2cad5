use std::fmt;

use thiserror::Error;

/// Wire formats a `DebitCard` can be carried in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    Json,
    Cbor,
}

impl fmt::Display for PayloadFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadFormat::Json => write!(f, "JSON"),
            PayloadFormat::Cbor => write!(f, "CBOR"),
        }
    }
}

#[derive(Debug, Error)]
pub enum DeserializationError {
    #[error("Malformed {format} payload: {reason}")]
    MalformedPayload {
        format: PayloadFormat,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("Unable to encode {format} payload: {reason}")]
    EncodeFailed {
        format: PayloadFormat,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum CardRequestError {
    #[error("Debit card `{0}` not found")]
    CardNotFound(String),
    #[error("Card service is unavailable: {0}")]
    CardServiceUnavailable(String),
    #[error("Invalid debit card response body ({0})")]
    InvalidResponseBody(#[from] DeserializationError),
    #[error("Unexpected card service response: {0}")]
    UnexpectedCardRequestError(String),
    #[error("Invalid card service url `{0}`")]
    InvalidCardServerUrl(String),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Unable to load settings: {0}")]
    LoadFailed(#[from] config::ConfigError),
    #[error("Invalid value for `{key}`: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}
