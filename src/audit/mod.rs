//! Audit log: SQLite-based operation history.
//!
//! Records which vault operations ran and whether they succeeded, in a
//! local SQLite database at `<vault_dir>/audit.db`.  Entries never carry
//! websites, nicknames, passwords or master keys: only the operation
//! name, its outcome and a short count-style detail.
//!
//! Designed for graceful degradation: if the database can't be opened or
//! written to, operations silently continue without logging.  Builds
//! without the `audit-log` feature keep the same API, but nothing is
//! recorded and `AuditLog::open` always returns `None`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

#[cfg(not(feature = "audit-log"))]
use crate::errors::Result;

/// A single audit log entry.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub operation: String,
    pub outcome: String,
    pub details: Option<String>,
}

/// Return the path to the audit database (for testing/display).
pub fn db_path(vault_dir: &Path) -> PathBuf {
    vault_dir.join("audit.db")
}

#[cfg(feature = "audit-log")]
mod sqlite {
    use std::path::Path;

    use chrono::{DateTime, Utc};
    use rusqlite::Connection;
    use tracing::debug;

    use super::{db_path, AuditEntry};
    use crate::errors::{PassVaultError, Result};

    /// SQLite-backed audit log.
    pub struct AuditLog {
        conn: Connection,
    }

    impl AuditLog {
        /// Open (or create) the audit database at `<vault_dir>/audit.db`.
        ///
        /// Returns `None` if the database can't be opened; callers should
        /// treat this as "audit logging unavailable" and continue normally.
        pub fn open(vault_dir: &Path) -> Option<Self> {
            let path = db_path(vault_dir);
            let conn = match Connection::open(&path) {
                Ok(conn) => conn,
                Err(e) => {
                    debug!(error = %e, "audit log unavailable");
                    return None;
                }
            };

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let perms = std::fs::Permissions::from_mode(0o600);
                let _ = std::fs::set_permissions(&path, perms);
            }

            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS audit_log (
                    id        INTEGER PRIMARY KEY AUTOINCREMENT,
                    timestamp TEXT NOT NULL,
                    operation TEXT NOT NULL,
                    outcome   TEXT NOT NULL,
                    details   TEXT
                );",
            )
            .ok()?;

            Some(Self { conn })
        }

        /// Record an operation. Fire-and-forget: errors are silently ignored.
        pub fn log(&self, operation: &str, outcome: &str, details: Option<&str>) {
            let now = Utc::now().to_rfc3339();
            let _ = self.conn.execute(
                "INSERT INTO audit_log (timestamp, operation, outcome, details)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![now, operation, outcome, details],
            );
        }

        /// Query recent audit entries, most recent first.
        ///
        /// - `limit`: maximum number of entries to return.
        /// - `since`: if provided, only return entries at or after this time.
        pub fn query(
            &self,
            limit: usize,
            since: Option<DateTime<Utc>>,
        ) -> Result<Vec<AuditEntry>> {
            let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
            // RFC 3339 strings in UTC sort lexically, so the epoch is "no filter".
            let since = since
                .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
                .to_rfc3339();

            let mut stmt = self
                .conn
                .prepare(
                    "SELECT id, timestamp, operation, outcome, details
                     FROM audit_log
                     WHERE timestamp >= ?1
                     ORDER BY id DESC
                     LIMIT ?2",
                )
                .map_err(|e| PassVaultError::AuditError(format!("query prepare: {e}")))?;

            let rows = stmt
                .query_map(rusqlite::params![since, limit_i64], |row| {
                    let ts: String = row.get(1)?;
                    let timestamp = DateTime::parse_from_rfc3339(&ts)
                        .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

                    Ok(AuditEntry {
                        id: row.get(0)?,
                        timestamp,
                        operation: row.get(2)?,
                        outcome: row.get(3)?,
                        details: row.get(4)?,
                    })
                })
                .map_err(|e| PassVaultError::AuditError(format!("query exec: {e}")))?;

            rows.collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| PassVaultError::AuditError(format!("row parse: {e}")))
        }
    }
}

#[cfg(feature = "audit-log")]
pub use sqlite::AuditLog;

/// Stand-in used when the crate is built without SQLite.
#[cfg(not(feature = "audit-log"))]
pub struct AuditLog;

#[cfg(not(feature = "audit-log"))]
impl AuditLog {
    pub fn open(_vault_dir: &Path) -> Option<Self> {
        None
    }

    pub fn log(&self, _operation: &str, _outcome: &str, _details: Option<&str>) {}

    pub fn query(&self, _limit: usize, _since: Option<DateTime<Utc>>) -> Result<Vec<AuditEntry>> {
        Ok(Vec::new())
    }
}

/// Convenience helper: log an audit event for `vault_dir`.
///
/// Opens the audit database, logs the event, and ignores any errors.
/// Safe to call from any command; it never fails the parent operation.
pub fn log_audit(vault_dir: &Path, op: &str, outcome: &str, details: Option<&str>) {
    if let Some(audit) = AuditLog::open(vault_dir) {
        audit.log(op, outcome, details);
    }
}

#[cfg(all(test, feature = "audit-log"))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_creates_database() {
        let dir = TempDir::new().unwrap();
        assert!(AuditLog::open(dir.path()).is_some());
        assert!(db_path(dir.path()).exists());
    }

    #[test]
    fn log_and_query_roundtrip() {
        let dir = TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path()).unwrap();

        audit.log("add", "ok", Some("3 total"));
        audit.log("list", "ok", None);
        audit.log("delete", "error", Some("Wrong master key"));

        let entries = audit.query(10, None).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].operation, "delete");
        assert_eq!(entries[0].outcome, "error");
        assert_eq!(entries[2].details.as_deref(), Some("3 total"));
    }

    #[test]
    fn query_with_limit() {
        let dir = TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path()).unwrap();
        for _ in 0..10 {
            audit.log("list", "ok", None);
        }
        assert_eq!(audit.query(3, None).unwrap().len(), 3);
    }

    #[test]
    fn query_with_since_filter() {
        let dir = TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path()).unwrap();
        audit.log("wipe", "ok", None);

        let past = Utc::now() - chrono::Duration::hours(1);
        assert_eq!(audit.query(10, Some(past)).unwrap().len(), 1);

        let future = Utc::now() + chrono::Duration::hours(1);
        assert!(audit.query(10, Some(future)).unwrap().is_empty());
    }

    #[test]
    fn open_returns_none_on_bad_path() {
        assert!(AuditLog::open(Path::new("/nonexistent/path/that/does/not/exist")).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn audit_db_has_restrictive_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let _audit = AuditLog::open(dir.path()).unwrap();

        let perms = std::fs::metadata(db_path(dir.path())).unwrap().permissions();
        assert_eq!(perms.mode() & 0o777, 0o600);
    }
}
