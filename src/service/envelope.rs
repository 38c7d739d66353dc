//! Request payloads and response envelopes.
//!
//! Clients branch on exactly one thing: whether the response object has
//! an `error` field.  `Envelope` serializes to either the bare success
//! payload or `{"error": "..."}`, never both.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::Result;

/// `createPassword` payload.
#[derive(Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct CreatePasswordRequest {
    pub password: String,
    pub master_key: String,
    pub website: String,
    #[serde(default)]
    pub nickname: Option<String>,
}

/// `getPasswords` payload.
#[derive(Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct GetPasswordsRequest {
    pub master_key: String,
}

/// `deletePassword` payload.
#[derive(Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct DeletePasswordRequest {
    pub website: String,
    pub password: String,
    #[serde(default)]
    pub nickname: Option<String>,
    pub master_key: String,
}

/// Success payload for mutating operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed: Option<usize>,
}

impl Ack {
    pub fn ok() -> Self {
        Self {
            ok: true,
            removed: None,
        }
    }

    pub fn removed(count: usize) -> Self {
        Self {
            ok: true,
            removed: Some(count),
        }
    }
}

/// Error payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Success payload xor `{error}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Ok(T),
    Err(ErrorBody),
}

impl<T> Envelope<T> {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Err(ErrorBody {
            error: message.into(),
        })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Err(_))
    }

    /// The error message, if this is an error envelope.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Ok(_) => None,
            Self::Err(body) => Some(&body.error),
        }
    }

    /// Convert back into a `Result`, with the message as the error.
    pub fn into_result(self) -> std::result::Result<T, String> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::Err(body) => Err(body.error),
        }
    }
}

impl<T: Serialize> Envelope<T> {
    /// Serialize for the wire.  Falls back to an error envelope if the
    /// payload itself cannot be serialized.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            serde_json::json!({ "error": format!("Serialization error: {e}") }).to_string()
        })
    }
}

impl<T> From<Result<T>> for Envelope<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(e) => Self::error(e.to_string()),
        }
    }
}
