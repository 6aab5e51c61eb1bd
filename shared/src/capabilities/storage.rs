use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

use crux_kv::KeyValue;

pub const MAX_KEY_LENGTH: usize = 128;
pub const MAX_VALUE_LENGTH: usize = 4 * 1024;

/// Key into the browser's local storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn new(key: impl Into<String>) -> Result<Self, StorageError> {
        let key = key.into();
        Self::validate_key(&key)?;
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate_key(key: &str) -> Result<(), StorageError> {
        if key.trim().is_empty() {
            return Err(StorageError::InvalidKey {
                key: key.to_string(),
                reason: "key cannot be empty".to_string(),
            });
        }

        if key.len() > MAX_KEY_LENGTH {
            return Err(StorageError::InvalidKey {
                key: key.chars().take(50).collect::<String>() + "...",
                reason: format!("key exceeds maximum length of {MAX_KEY_LENGTH} bytes"),
            });
        }

        if key.chars().any(char::is_control) {
            return Err(StorageError::InvalidKey {
                key: key.escape_default().to_string(),
                reason: "key contains control characters".to_string(),
            });
        }

        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageError {
    #[error("invalid storage key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("value too large: {size} bytes, max {max}")]
    ValueTooLarge { size: usize, max: usize },

    #[error("stored value is not UTF-8")]
    NotText,

    #[error("storage unavailable: {reason}")]
    Unavailable { reason: String },
}

impl StorageError {
    /// Wraps whatever the key-value shell reported.
    pub fn unavailable(error: impl Debug) -> Self {
        Self::Unavailable {
            reason: format!("{error:?}"),
        }
    }
}

/// Bytes read back from storage, as text.
pub type StoredText = Result<Option<String>, StorageError>;

/// String values in `localStorage`, carried over the key-value capability.
pub trait TextStore<Ev> {
    fn read_text<F>(&self, key: &StorageKey, make_event: F)
    where
        F: FnOnce(StoredText) -> Ev + Send + Sync + 'static;

    fn write_text<F>(&self, key: &StorageKey, value: &str, make_event: F)
    where
        F: FnOnce(Result<(), StorageError>) -> Ev + Send + Sync + 'static;
}

impl<Ev> TextStore<Ev> for KeyValue<Ev>
where
    Ev: 'static,
{
    fn read_text<F>(&self, key: &StorageKey, make_event: F)
    where
        F: FnOnce(StoredText) -> Ev + Send + Sync + 'static,
    {
        self.get(key.as_str().to_string(), move |result| {
            make_event(
                result
                    .map_err(StorageError::unavailable)
                    .and_then(decode_text),
            )
        });
    }

    fn write_text<F>(&self, key: &StorageKey, value: &str, make_event: F)
    where
        F: FnOnce(Result<(), StorageError>) -> Ev + Send + Sync + 'static,
    {
        match encode_text(value) {
            Ok(bytes) => self.set(key.as_str().to_string(), bytes, move |result| {
                make_event(result.map(|_| ()).map_err(StorageError::unavailable))
            }),
            Err(e) => {
                tracing::warn!(key = key.as_str(), error = %e, "value not written");
            }
        }
    }
}

pub fn encode_text(value: &str) -> Result<Vec<u8>, StorageError> {
    if value.len() > MAX_VALUE_LENGTH {
        return Err(StorageError::ValueTooLarge {
            size: value.len(),
            max: MAX_VALUE_LENGTH,
        });
    }
    Ok(value.as_bytes().to_vec())
}

pub fn decode_text(bytes: Option<Vec<u8>>) -> StoredText {
    bytes
        .map(|b| String::from_utf8(b).map_err(|_| StorageError::NotText))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_key_validation() {
        assert!(StorageKey::new("theme").is_ok());
        assert!(StorageKey::new("").is_err());
        assert!(StorageKey::new("   ").is_err());
        assert!(StorageKey::new("the\nme").is_err());
        assert!(StorageKey::new("k".repeat(MAX_KEY_LENGTH + 1)).is_err());
    }

    #[test]
    fn storage_error_messages() {
        let err = StorageError::ValueTooLarge { size: 10, max: 4 };
        assert_eq!(err.to_string(), "value too large: 10 bytes, max 4");
    }

    #[test]
    fn text_values_are_size_checked() {
        assert_eq!(encode_text("dark").unwrap(), b"dark".to_vec());
        assert!(matches!(
            encode_text(&"x".repeat(MAX_VALUE_LENGTH + 1)),
            Err(StorageError::ValueTooLarge { .. })
        ));
    }

    #[test]
    fn stored_bytes_decode_as_text() {
        assert_eq!(decode_text(None), Ok(None));
        assert_eq!(decode_text(Some(b"light".to_vec())), Ok(Some("light".into())));
        assert_eq!(decode_text(Some(vec![0xff, 0xfe])), Err(StorageError::NotText));
    }
}
