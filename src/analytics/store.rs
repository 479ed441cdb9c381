//! Persisted session history store.
//!
//! The history is one JSON-serialized array of session snapshots held in a
//! single string-keyed slot, read and written wholesale with no incremental
//! update and no schema versioning. This mirrors the browser localStorage
//! slot the site used before, so an exported history stays interchangeable.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::{Mutex, PoisonError};

use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;
use tracing::warn;

use crate::analytics::errors::{AnalyticsError, AnalyticsResult};
use crate::analytics::record::SessionRecord;

/// Boxed future type for store operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Wholesale storage for the bounded session history.
pub trait SessionStore: Send + Sync {
    /// Load the full history. A missing slot is an empty history.
    ///
    /// # Errors
    /// Returns an error if the slot exists but cannot be read or parsed.
    fn load(&self) -> StoreFuture<'_, AnalyticsResult<Vec<SessionRecord>>>;

    /// Replace the full history.
    ///
    /// # Errors
    /// Returns an error if the payload cannot be serialized or written.
    fn save(&self, history: Vec<SessionRecord>) -> StoreFuture<'_, AnalyticsResult<()>>;
}

/// Load the history, degrading any failure to an empty history.
///
/// Read failures (missing database, corrupt payload) must never propagate to
/// reporting or session closing; they are logged and treated as having no
/// prior sessions.
pub async fn load_or_empty(store: &dyn SessionStore) -> Vec<SessionRecord> {
    match store.load().await {
        Ok(history) => history,
        Err(err) => {
            warn!("analytics history unreadable, treating as empty: {err}");
            Vec::new()
        }
    }
}

/// `SQLite` implementation holding the history in one key/value slot.
pub struct SqliteSessionStore {
    conn: Connection,
    slot: String,
}

impl SqliteSessionStore {
    /// Table holding the serialized slots.
    const TABLE: &'static str = "analytics_slots";

    /// Slot key for the chat session history.
    pub const DEFAULT_SLOT: &'static str = "hbrothers_chat_sessions";

    /// Open (or create) the backing database and slot table.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened.
    pub async fn new(path: &Path) -> AnalyticsResult<Self> {
        let conn = Connection::open(path).await?;
        conn.call(move |conn| {
            conn.execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {table} (
                    slot TEXT PRIMARY KEY,
                    payload TEXT NOT NULL
                )",
                table = Self::TABLE
            ))?;
            Ok(())
        })
        .await?;

        Ok(Self {
            conn,
            slot: Self::DEFAULT_SLOT.to_string(),
        })
    }
}

impl SessionStore for SqliteSessionStore {
    fn load(&self) -> StoreFuture<'_, AnalyticsResult<Vec<SessionRecord>>> {
        Box::pin(async move {
            let slot = self.slot.clone();
            let payload = self
                .conn
                .call(move |conn| {
                    let row = conn
                        .query_row(
                            &format!(
                                "SELECT payload FROM {table} WHERE slot = ?1",
                                table = Self::TABLE
                            ),
                            rusqlite::params![slot],
                            |row| row.get::<_, String>(0),
                        )
                        .optional()?;
                    Ok(row)
                })
                .await?;

            match payload {
                Some(raw) => Ok(serde_json::from_str(&raw)?),
                None => Ok(Vec::new()),
            }
        })
    }

    fn save(&self, history: Vec<SessionRecord>) -> StoreFuture<'_, AnalyticsResult<()>> {
        Box::pin(async move {
            let slot = self.slot.clone();
            let payload = serde_json::to_string(&history)?;
            self.conn
                .call(move |conn| {
                    conn.execute(
                        &format!(
                            "INSERT OR REPLACE INTO {table} (slot, payload) VALUES (?1, ?2)",
                            table = Self::TABLE
                        ),
                        rusqlite::params![slot, payload],
                    )?;
                    Ok(())
                })
                .await?;
            Ok(())
        })
    }
}

/// In-memory implementation of the same wholesale-JSON slot.
///
/// Used by tests and as the fallback when the database cannot be opened at
/// startup; the slot still holds a serialized payload so corrupt-history
/// handling can be exercised.
pub struct MemorySessionStore {
    payload: Mutex<Option<String>>,
    fail_saves: bool,
}

impl MemorySessionStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            payload: Mutex::new(None),
            fail_saves: false,
        }
    }

    /// Create a store whose slot already holds a raw payload, valid or not.
    #[must_use]
    pub fn with_payload(raw: impl Into<String>) -> Self {
        Self {
            payload: Mutex::new(Some(raw.into())),
            fail_saves: false,
        }
    }

    /// Create a store that rejects every save, for loss-handling tests.
    #[must_use]
    pub fn failing_saves() -> Self {
        Self {
            payload: Mutex::new(None),
            fail_saves: true,
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> StoreFuture<'_, AnalyticsResult<Vec<SessionRecord>>> {
        Box::pin(async move {
            let guard = self
                .payload
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            match guard.as_deref() {
                Some(raw) => Ok(serde_json::from_str(raw)?),
                None => Ok(Vec::new()),
            }
        })
    }

    fn save(&self, history: Vec<SessionRecord>) -> StoreFuture<'_, AnalyticsResult<()>> {
        Box::pin(async move {
            if self.fail_saves {
                return Err(AnalyticsError::Unavailable(
                    "save rejected by test store".to_string(),
                ));
            }
            let payload = serde_json::to_string(&history)?;
            let mut guard = self
                .payload
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            *guard = Some(payload);
            Ok(())
        })
    }
}
