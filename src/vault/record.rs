//! The credential record stored inside a vault.
//!
//! Records are immutable once created and carry no identity beyond
//! their position in the vault: two records for the same website are
//! perfectly valid.  The JSON form is exactly
//! `{"website", "password", "nickname"?}` because that is what clients
//! render.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::{PassVaultError, Result};

/// Upper bound on any single field, in bytes.
const MAX_FIELD_LEN: usize = 4_096;

/// One stored (website, password, nickname) entry.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct CredentialRecord {
    pub website: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

impl CredentialRecord {
    /// Build a validated record.
    ///
    /// An empty nickname is stored as no nickname, so a client that sends
    /// `""` for an untouched field can still delete the record later.
    pub fn new(website: &str, password: &str, nickname: Option<&str>) -> Result<Self> {
        let website = website.trim();
        if website.is_empty() {
            return Err(PassVaultError::InvalidRequest(
                "website cannot be empty".into(),
            ));
        }
        if password.is_empty() {
            return Err(PassVaultError::InvalidRequest(
                "password cannot be empty".into(),
            ));
        }
        let nickname = normalize_nickname(nickname);

        for (field, value) in [
            ("website", Some(website)),
            ("password", Some(password)),
            ("nickname", nickname),
        ] {
            if value.is_some_and(|v| v.len() > MAX_FIELD_LEN) {
                return Err(PassVaultError::InvalidRequest(format!(
                    "{field} cannot exceed {MAX_FIELD_LEN} bytes"
                )));
            }
        }

        Ok(Self {
            website: website.to_string(),
            password: password.to_string(),
            nickname: nickname.map(str::to_string),
        })
    }

    /// Display label, e.g. `example.com (work)`.
    pub fn label(&self) -> String {
        match &self.nickname {
            Some(nick) => format!("{} ({nick})", self.website),
            None => self.website.clone(),
        }
    }

    /// Whether this record is the website + nickname + password triple.
    pub fn matches(&self, website: &str, password: &str, nickname: Option<&str>) -> bool {
        self.website == website.trim()
            && self.password == password
            && self.nickname.as_deref() == normalize_nickname(nickname)
    }
}

impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("website", &self.website)
            .field("password", &"[REDACTED]")
            .field("nickname", &self.nickname)
            .finish()
    }
}

fn normalize_nickname(nickname: Option<&str>) -> Option<&str> {
    nickname.map(str::trim).filter(|n| !n.is_empty())
}
