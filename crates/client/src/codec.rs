//! JSON payload codec for stored values.
//!
//! Values travel as UTF-8 JSON text inside the opaque `data` payload. An
//! empty or absent payload decodes to `None`, never to an error.

use plugindata_types::{PluginDataError, ResponseEnvelope, traits::Result};
use serde::{Serialize, de::DeserializeOwned};

/// Serialize `value` into a stored payload.
///
/// # Errors
///
/// Returns [`PluginDataError::Encode`] if `value` cannot be represented as
/// JSON (for example a map with non-string keys).
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(PluginDataError::Encode)
}

/// Decode the stored payload carried by `response`.
///
/// # Errors
///
/// Returns [`PluginDataError::InvalidUtf8`] or [`PluginDataError::Decode`]
/// for a non-empty payload that is not UTF-8 JSON of the expected shape.
pub fn decode<T: DeserializeOwned>(response: &ResponseEnvelope) -> Result<Option<T>> {
    let Some(payload) = response.payload() else {
        return Ok(None);
    };
    let text = std::str::from_utf8(payload)?;
    serde_json::from_str(text)
        .map(Some)
        .map_err(PluginDataError::Decode)
}
