use serde::{de::DeserializeOwned, Serialize};

use crate::utils::errors::{DeserializationError, PayloadFormat, SerializationError};

/// Serializes `value` into the given wire format.
///
/// # Arguments
/// * `value` - Any serializable record, usually a `DebitCard`.
/// * `format` - Target wire format.
///
/// # Returns
/// * `Ok(Vec<u8>)` - The encoded payload (UTF-8 text for JSON).
/// * `Err(SerializationError)` - If the encoder rejects the value.
pub fn encode<T: Serialize>(value: &T, format: PayloadFormat) -> Result<Vec<u8>, SerializationError> {
    let result = match format {
        PayloadFormat::Json => serde_json::to_vec(value).map_err(|e| e.to_string()),
        PayloadFormat::Cbor => serde_cbor::to_vec(value).map_err(|e| e.to_string()),
    };

    result.map_err(|reason| SerializationError::EncodeFailed { format, reason })
}

/// Parses a payload in the given wire format.
///
/// # Arguments
/// * `payload` - Raw bytes as received from the transport.
/// * `format` - Wire format the bytes are expected to be in.
///
/// # Returns
/// * `Ok(T)` - The decoded record.
/// * `Err(DeserializationError::MalformedPayload)` - If the bytes are not a valid payload for `T`.
pub fn decode<T: DeserializeOwned>(payload: &[u8], format: PayloadFormat) -> Result<T, DeserializationError> {
    let result = match format {
        PayloadFormat::Json => serde_json::from_slice::<T>(payload).map_err(|e| e.to_string()),
        PayloadFormat::Cbor => serde_cbor::from_slice::<T>(payload).map_err(|e| e.to_string()),
    };

    result.map_err(|reason| DeserializationError::MalformedPayload { format, reason })
}
