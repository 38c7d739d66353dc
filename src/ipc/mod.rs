//! Inter-process bridge.
//!
//! A desktop shell talks to the vault over four named channels, sending
//! each payload as a JSON string and branching only on whether the reply
//! has an `error` field:
//!
//! | channel                | payload                                        | reply               |
//! |------------------------|------------------------------------------------|---------------------|
//! | `create-password`      | `{password, masterKey, website, nickname?}`    | `{ok}` / `{error}`  |
//! | `get-passwords`        | `{masterKey}`                                  | `[records]` / `{error}` |
//! | `delete-password`      | `{website, password, nickname?, masterKey}`    | `{ok, removed}` / `{error}` |
//! | `delete-all-passwords` | none                                           | `{ok}`              |
//!
//! `serve` carries those calls over line-delimited JSON, one request per
//! line in and one reply per line out:
//!
//! ```text
//! -> {"id":1,"channel":"get-passwords","payload":"{\"masterKey\":\"...\"}"}
//! <- {"id":1,"response":[{"website":"example.com","password":"...","nickname":"work"}]}
//! ```

use std::io::{BufRead, Write};
use std::str::FromStr;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::errors::{PassVaultError, Result};
use crate::service::{
    CreatePasswordRequest, DeletePasswordRequest, Envelope, GetPasswordsRequest, Session,
    VaultService,
};

/// The channels a client may invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    CreatePassword,
    GetPasswords,
    DeletePassword,
    DeleteAllPasswords,
}

impl Channel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreatePassword => "create-password",
            Self::GetPasswords => "get-passwords",
            Self::DeletePassword => "delete-password",
            Self::DeleteAllPasswords => "delete-all-passwords",
        }
    }
}

impl FromStr for Channel {
    type Err = PassVaultError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "create-password" | "createPassword" => Ok(Self::CreatePassword),
            "get-passwords" | "getPasswords" => Ok(Self::GetPasswords),
            "delete-password" | "deletePassword" => Ok(Self::DeletePassword),
            "delete-all-passwords" | "deleteAllPasswords" => Ok(Self::DeleteAllPasswords),
            other => Err(PassVaultError::UnknownChannel(other.to_string())),
        }
    }
}

/// Routes channel calls to a `VaultService`, keeping one `Session`.
///
/// Consecutive calls carrying the same master key reuse the session (and
/// its derived keys).  A different master key replaces it.
pub struct Bridge<'a> {
    service: &'a VaultService,
    session: Option<Session>,
}

impl<'a> Bridge<'a> {
    pub fn new(service: &'a VaultService) -> Self {
        Self {
            service,
            session: None,
        }
    }

    /// Handle one call whose payload is a JSON string, as clients send it.
    pub fn handle_str(&mut self, channel: &str, payload: &str) -> String {
        match decode_payload(Value::String(payload.to_string())) {
            Ok(payload) => self.handle(channel, payload).to_string(),
            Err(e) => envelope_err(e).to_string(),
        }
    }

    /// Handle one call and return the reply envelope as a JSON value.
    pub fn handle(&mut self, channel: &str, payload: Value) -> Value {
        let channel = match channel.parse::<Channel>() {
            Ok(c) => c,
            Err(e) => {
                warn!(channel, "unknown channel");
                return envelope_err(e);
            }
        };
        debug!(channel = channel.as_str(), "ipc call");

        let service = self.service;
        match channel {
            Channel::CreatePassword => match parse::<CreatePasswordRequest>(payload) {
                Ok(req) => {
                    let session = self.session_for(&req.master_key);
                    to_value(&service.create_password(
                        session,
                        &req.website,
                        &req.password,
                        req.nickname.as_deref(),
                    ))
                }
                Err(e) => envelope_err(e),
            },
            Channel::GetPasswords => match parse::<GetPasswordsRequest>(payload) {
                Ok(req) => {
                    let session = self.session_for(&req.master_key);
                    to_value(&service.get_passwords(session))
                }
                Err(e) => envelope_err(e),
            },
            Channel::DeletePassword => match parse::<DeletePasswordRequest>(payload) {
                Ok(req) => {
                    let session = self.session_for(&req.master_key);
                    to_value(&service.delete_password(
                        session,
                        &req.website,
                        &req.password,
                        req.nickname.as_deref(),
                    ))
                }
                Err(e) => envelope_err(e),
            },
            Channel::DeleteAllPasswords => to_value(&service.delete_all_passwords()),
        }
    }

    fn session_for(&mut self, master_key: &str) -> &Session {
        let reuse = self
            .session
            .as_ref()
            .is_some_and(|s| s.is_for(master_key));
        if !reuse {
            self.session = Some(Session::new(master_key));
        }
        self.session.get_or_insert_with(|| Session::new(master_key))
    }
}

/// One line of the stdio transport.
#[derive(Deserialize)]
struct Request {
    #[serde(default)]
    id: Value,
    channel: String,
    #[serde(default)]
    payload: Value,
}

/// Serve line-delimited requests from `reader` until EOF.
///
/// Malformed lines get an error reply; they never end the loop.  Returns
/// the number of requests answered.
pub fn serve<R: BufRead, W: Write>(service: &VaultService, mut reader: R, mut writer: W) -> Result<usize> {
    let mut bridge = Bridge::new(service);
    let mut answered = 0;

    info!("ipc bridge listening on stdio");
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        if line.trim_ascii().is_empty() {
            continue;
        }

        let reply = match serde_json::from_slice::<Request>(&line) {
            Ok(req) => {
                let response = match decode_payload(req.payload) {
                    Ok(payload) => bridge.handle(&req.channel, payload),
                    Err(e) => envelope_err(e),
                };
                json!({ "id": req.id, "response": response })
            }
            Err(e) => json!({
                "id": Value::Null,
                "response": envelope_err(PassVaultError::InvalidRequest(format!("bad request line: {e}"))),
            }),
        };

        writeln!(writer, "{reply}")?;
        writer.flush()?;
        answered += 1;
    }

    info!(answered, "ipc bridge input closed");
    Ok(answered)
}

/// Payloads arrive either as the JSON string clients send or inline.
fn decode_payload(payload: Value) -> Result<Value> {
    match payload {
        Value::String(s) if s.trim().is_empty() => Ok(Value::Null),
        Value::String(s) => serde_json::from_str(&s)
            .map_err(|e| PassVaultError::InvalidRequest(format!("payload is not JSON: {e}"))),
        other => Ok(other),
    }
}

fn parse<T: for<'de> Deserialize<'de>>(payload: Value) -> Result<T> {
    serde_json::from_value(payload)
        .map_err(|e| PassVaultError::InvalidRequest(format!("bad payload: {e}")))
}

fn to_value<T: serde::Serialize>(envelope: &Envelope<T>) -> Value {
    serde_json::to_value(envelope).unwrap_or_else(|e| {
        envelope_err(PassVaultError::SerializationError(e.to_string()))
    })
}

fn envelope_err(e: PassVaultError) -> Value {
    json!({ "error": e.to_string() })
}
