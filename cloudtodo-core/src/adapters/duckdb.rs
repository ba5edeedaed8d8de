//! DuckDB adapter - document database and identity provider in one file

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use duckdb::{params, Connection};
use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;

use super::clock::ServerClock;
use super::secret::{check_secret_strength, hash_secret, verify_secret_hash};
use crate::domain::result::{Error, Result};
use crate::domain::Account;
use crate::migrations::MIGRATIONS;
use crate::ports::document_db::{format_timestamp, resolve_fields};
use crate::ports::{Document, DocumentDatabase, Fields, IdentityProvider};
use crate::services::{MigrationResult, MigrationService};

/// Maximum number of retries when database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
        || lower.contains("could not set lock on file")
}

/// Field names are interpolated into a JSON path, so keep them plain
fn validate_field_name(field: &str) -> Result<()> {
    if field.is_empty() || !field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(Error::validation(format!("Invalid field name: {:?}", field)));
    }
    Ok(())
}

/// String form of a scalar as `json_extract_string` renders it
fn scalar_as_sql_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Bool(_) | JsonValue::Number(_) => Some(value.to_string()),
        _ => None,
    }
}

fn parse_fields(raw: &str) -> Result<Map<String, JsonValue>> {
    serde_json::from_str(raw)
        .map_err(|e| Error::storage(format!("Corrupt document body: {}", e)))
}

/// DuckDB-backed store
///
/// One mutex-guarded connection serves both ports; every call runs to
/// completion before the next one starts.
pub struct DuckDbStore {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
    clock: ServerClock,
}

impl DuckDbStore {
    /// Open (or create) a database file
    ///
    /// Retries with exponential backoff when another process holds the
    /// file lock.
    pub fn new(db_path: &Path) -> Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Mutex::new(conn),
                        db_path: Some(db_path.to_path_buf()),
                        clock: ServerClock::new(),
                    });
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        eprintln!(
                            "[cloudtodo] Database busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            Error::storage(format!("Failed to open database after {} retries", MAX_RETRIES))
        }))
    }

    /// In-memory database, mostly for tests
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Mutex::new(Connection::open_in_memory()?),
            db_path: None,
            clock: ServerClock::new(),
        })
    }

    fn try_open_connection(db_path: &Path) -> Result<Connection> {
        // Extension autoloading stays off; JSON is statically linked via the
        // "json" cargo feature.
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Ok(Connection::open_with_flags(db_path, config)?)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::storage(format!("Lock poisoned: {}", e)))
    }

    /// Path of the database file (None for in-memory databases)
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Run pending migrations
    pub fn run_migrations(&self) -> Result<MigrationResult> {
        let conn = self.lock()?;
        MigrationService::new(&conn, MIGRATIONS).run_pending()
    }

    /// Ensure database schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> Result<()> {
        self.run_migrations()?;
        Ok(())
    }

    fn fetch_fields(
        conn: &Connection,
        collection: &str,
        id: &str,
    ) -> Result<Option<Map<String, JsonValue>>> {
        let mut stmt = conn.prepare(
            "SELECT fields FROM sys_documents WHERE collection = ? AND document_id = ?",
        )?;
        let mut rows = stmt.query_map(params![collection, id], |row| row.get::<_, String>(0))?;

        let raw = match rows.next() {
            Some(raw) => raw?,
            None => return Ok(None),
        };
        Ok(Some(parse_fields(&raw)?))
    }

    fn row_to_account(row: &duckdb::Row) -> duckdb::Result<(String, String, String)> {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?))
    }
}

impl DocumentDatabase for DuckDbStore {
    fn name(&self) -> &str {
        "duckdb"
    }

    fn insert(&self, collection: &str, fields: Fields) -> Result<String> {
        let id = Uuid::new_v4().to_string();

        // Stamp under the lock so commit order matches timestamp order
        let conn = self.lock()?;
        let now = self.clock.now();
        let body = JsonValue::Object(resolve_fields(fields, now)).to_string();
        let ts = format_timestamp(now);

        conn.execute(
            "INSERT INTO sys_documents (collection, document_id, fields, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
            params![collection, id, body, ts, ts],
        )?;
        Ok(id)
    }

    fn get_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let conn = self.lock()?;
        Ok(Self::fetch_fields(&conn, collection, id)?.map(|fields| Document::new(id, fields)))
    }

    fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &JsonValue,
    ) -> Result<Vec<Document>> {
        validate_field_name(field)?;
        let conn = self.lock()?;

        // Scalars are pre-filtered in SQL; the exact JSON comparison below
        // keeps `"true"` and `true` apart.
        let raw: Vec<(String, String)> = match scalar_as_sql_text(value) {
            Some(text) => {
                let mut stmt = conn.prepare(
                    "SELECT document_id, fields FROM sys_documents
                     WHERE collection = ? AND json_extract_string(fields, ?) = ?
                     ORDER BY seq",
                )?;
                let path = format!("$.{}", field);
                let rows = stmt.query_map(params![collection, path, text], |row| {
                    Ok((row.get(0)?, row.get(1)?))
                })?;
                let collected = rows.collect::<duckdb::Result<Vec<_>>>()?;
                collected
            }
            None => {
                let mut stmt = conn.prepare(
                    "SELECT document_id, fields FROM sys_documents
                     WHERE collection = ?
                     ORDER BY seq",
                )?;
                let rows = stmt.query_map([collection], |row| Ok((row.get(0)?, row.get(1)?)))?;
                let collected = rows.collect::<duckdb::Result<Vec<_>>>()?;
                collected
            }
        };

        let mut docs = Vec::with_capacity(raw.len());
        for (id, body) in raw {
            let doc = Document::new(id, parse_fields(&body)?);
            if doc.field_equals(field, value) {
                docs.push(doc);
            }
        }
        Ok(docs)
    }

    fn update_fields(&self, collection: &str, id: &str, fields: Fields) -> Result<()> {
        let conn = self.lock()?;
        let now = self.clock.now();

        let mut current = Self::fetch_fields(&conn, collection, id)?
            .ok_or_else(|| Error::not_found(format!("{}/{}", collection, id)))?;
        current.extend(resolve_fields(fields, now));

        conn.execute(
            "UPDATE sys_documents SET fields = ?, updated_at = ?
             WHERE collection = ? AND document_id = ?",
            params![
                JsonValue::Object(current).to_string(),
                format_timestamp(now),
                collection,
                id
            ],
        )?;
        Ok(())
    }

    fn delete_by_id(&self, collection: &str, id: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "DELETE FROM sys_documents WHERE collection = ? AND document_id = ?",
            params![collection, id],
        )?;
        Ok(())
    }
}

impl IdentityProvider for DuckDbStore {
    fn name(&self) -> &str {
        "duckdb"
    }

    fn find_by_email(&self, email: &str) -> Result<Account> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT account_id, email, created_at FROM sys_identity_accounts WHERE email = ?",
        )?;
        let mut rows = stmt.query_map([email], Self::row_to_account)?;

        let (id, email, created_at) = rows
            .next()
            .ok_or_else(|| Error::not_found(format!("account {}", email)))??;

        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&chrono::Utc))
            .map_err(|e| Error::storage(format!("Corrupt account timestamp: {}", e)))?;

        Ok(Account {
            id,
            email,
            created_at,
        })
    }

    fn create_account(&self, email: &str, secret: &str) -> Result<Account> {
        check_secret_strength(secret)?;
        let secret_hash = hash_secret(secret)?;
        let account = Account::new(Uuid::new_v4().to_string(), email);

        let conn = self.lock()?;
        let existing: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sys_identity_accounts WHERE email = ?",
            [email],
            |row| row.get(0),
        )?;
        if existing > 0 {
            return Err(Error::already_exists(format!("account {}", email)));
        }

        conn.execute(
            "INSERT INTO sys_identity_accounts (account_id, email, secret_hash, created_at)
             VALUES (?, ?, ?, ?)",
            params![
                account.id,
                account.email,
                secret_hash,
                format_timestamp(account.created_at)
            ],
        )?;
        Ok(account)
    }

    fn verify_secret(&self, account_id: &str, secret: &str) -> Result<bool> {
        let stored: String = {
            let conn = self.lock()?;
            let mut stmt = conn
                .prepare("SELECT secret_hash FROM sys_identity_accounts WHERE account_id = ?")?;
            let mut rows = stmt.query_map([account_id], |row| row.get::<_, String>(0))?;
            let hash = rows
                .next()
                .ok_or_else(|| Error::not_found(format!("account {}", account_id)))??;
            hash
        };
        verify_secret_hash(secret, &stored)
    }
}
