use crate::utils::errors::{CardRequestError, DeserializationError, SerializationError, SettingsError};

#[derive(Default)]
pub struct ExitStatus {
    pub code: i32,
    pub reason: String,
}

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,

    CardRequestFailed = 10,
    MalformedPayload = 20,
    SettingsFailed = 30,
    EncodeFailed = 40,
}

impl ExitStatus {
    pub fn new(code: ExitCode, reason: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            reason: reason.into(),
        }
    }
}

impl From<CardRequestError> for ExitStatus {
    fn from(error: CardRequestError) -> Self {
        ExitStatus::new(ExitCode::CardRequestFailed, error.to_string())
    }
}

impl From<DeserializationError> for ExitStatus {
    fn from(error: DeserializationError) -> Self {
        ExitStatus::new(ExitCode::MalformedPayload, error.to_string())
    }
}

impl From<SettingsError> for ExitStatus {
    fn from(error: SettingsError) -> Self {
        ExitStatus::new(ExitCode::SettingsFailed, error.to_string())
    }
}

impl From<SerializationError> for ExitStatus {
    fn from(error: SerializationError) -> Self {
        ExitStatus::new(ExitCode::EncodeFailed, error.to_string())
    }
}
