//! Application state shared across all request handlers.

use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::warn;
use url::Url;

use crate::analytics::logger::AnalyticsLogger;
use crate::analytics::sink::{EventSink, NullSink, WebhookSink};
use crate::analytics::store::{MemorySessionStore, SessionStore, SqliteSessionStore};
use crate::catalog::MenuCatalog;
use crate::chat::session::{ChatSession, ChatSessionId};
use crate::chat::{ConciergeConfig, ConciergeService};

/// Environment variable for the analytics database path.
const DB_PATH_ENV: &str = "CONCIERGE_DB";

/// Environment variable for an optional menu JSON file.
const MENU_PATH_ENV: &str = "CONCIERGE_MENU";

/// Environment variable for an optional analytics webhook endpoint.
const EVENT_WEBHOOK_ENV: &str = "CONCIERGE_EVENT_WEBHOOK";

/// Default analytics database path.
const DEFAULT_DB_PATH: &str = "concierge.sqlite";

/// Shared application state.
pub struct AppState {
    /// Concierge chat service.
    pub service: ConciergeService,
    /// Live chat windows by session id.
    pub sessions: DashMap<String, Arc<Mutex<ChatSession>>>,
    /// Shared persisted session history.
    pub store: Arc<dyn SessionStore>,
    /// Shared best-effort event sink.
    pub sink: Arc<dyn EventSink>,
}

impl AppState {
    /// Create the application state from the process environment.
    ///
    /// The menu file and webhook are optional; a broken menu file or an
    /// unopenable database degrade (built-in menu, in-memory history) with a
    /// logged warning rather than failing startup.
    ///
    /// # Errors
    /// Returns an error if the service configuration is invalid.
    pub async fn new() -> Result<Arc<Self>, Box<dyn std::error::Error + Send + Sync>> {
        let catalog = Arc::new(load_catalog());
        let config = ConciergeConfig::from_env();
        let service = ConciergeService::new(config, catalog)
            .map_err(|e| format!("Failed to create concierge service: {e}"))?;

        let store = open_store().await;
        let sink = build_sink();

        Ok(Arc::new(Self {
            service,
            sessions: DashMap::new(),
            store,
            sink,
        }))
    }

    /// Open a new chat window and register it.
    pub fn open_session(&self) -> (ChatSessionId, Arc<Mutex<ChatSession>>) {
        let logger = AnalyticsLogger::new(Arc::clone(&self.store), Arc::clone(&self.sink));
        let session = ChatSession::open(&self.service, logger);
        let id = session.id();
        let handle = Arc::new(Mutex::new(session));
        self.sessions.insert(id.to_string(), Arc::clone(&handle));
        (id, handle)
    }

    /// Look up a live chat window.
    #[must_use]
    pub fn session(&self, id: &str) -> Option<Arc<Mutex<ChatSession>>> {
        self.sessions.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Remove a chat window from the registry.
    pub fn remove_session(&self, id: &str) -> Option<Arc<Mutex<ChatSession>>> {
        self.sessions.remove(id).map(|(_, handle)| handle)
    }
}

fn load_catalog() -> MenuCatalog {
    match std::env::var(MENU_PATH_ENV) {
        Ok(path) => {
            let path = PathBuf::from(path);
            match MenuCatalog::from_json_file(&path) {
                Ok(catalog) => catalog,
                Err(err) => {
                    warn!("menu file {} unusable, using built-in menu: {err}", path.display());
                    MenuCatalog::default_menu()
                }
            }
        }
        Err(_) => MenuCatalog::default_menu(),
    }
}

async fn open_store() -> Arc<dyn SessionStore> {
    let path = std::env::var(DB_PATH_ENV).unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
    match SqliteSessionStore::new(std::path::Path::new(&path)).await {
        Ok(store) => Arc::new(store),
        Err(err) => {
            warn!("analytics database {path} unavailable, history will not survive restarts: {err}");
            Arc::new(MemorySessionStore::new())
        }
    }
}

fn build_sink() -> Arc<dyn EventSink> {
    let Ok(raw) = std::env::var(EVENT_WEBHOOK_ENV) else {
        return Arc::new(NullSink);
    };
    match Url::parse(&raw) {
        Ok(endpoint) => match WebhookSink::new(endpoint) {
            Ok(sink) => Arc::new(sink),
            Err(err) => {
                warn!("analytics webhook client unusable, events disabled: {err}");
                Arc::new(NullSink)
            }
        },
        Err(err) => {
            warn!("analytics webhook url invalid, events disabled: {err}");
            Arc::new(NullSink)
        }
    }
}
