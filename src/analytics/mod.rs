//! Chat session analytics for the restaurant site.
//!
//! This module tracks what customers do in the concierge widget, organized
//! into:
//! - `record`: session identifiers and the persisted snapshot model
//! - `logger`: the per-window session state machine
//! - `store`: wholesale JSON persistence of the bounded history
//! - `report`: owner-facing summary and CSV export
//! - `sink`: best-effort external event notifications
//! - `errors`: subsystem error type
//!
//! Loggers are owned values injected into each chat window; only the
//! persisted history (capped at 100 sessions, strict FIFO) is shared.

pub mod errors;
pub mod logger;
pub mod record;
pub mod report;
pub mod sink;
pub mod store;

pub use errors::{AnalyticsError, AnalyticsResult};
pub use logger::{AnalyticsLogger, HISTORY_CAP};
pub use record::{SessionRecord, generate_session_id};
pub use report::{AnalyticsSummary, ItemCount, QuestionCount, export_csv, summarize};
pub use sink::{AnalyticsEvent, EventSink, NullSink, WebhookSink};
pub use store::{MemorySessionStore, SessionStore, SqliteSessionStore, load_or_empty};
