//! Chat session logger.
//!
//! A small state machine over one owned current-session slot:
//! `Closed -> Open -> Closed`. Tracking calls implicitly open a session when
//! needed (self-healing, they never fail), with one deliberate exception:
//! feedback for a closed session is dropped, because a score without a
//! session to attach it to is meaningless. Closing persists an immutable
//! snapshot into the bounded shared history and returns the slot to
//! `Closed`; a session is never double-closed.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::analytics::record::SessionRecord;
use crate::analytics::sink::{AnalyticsEvent, EventSink};
use crate::analytics::store::{SessionStore, load_or_empty};

/// Maximum number of sessions kept in the persisted history (strict FIFO).
pub const HISTORY_CAP: usize = 100;

/// Per-window analytics logger over a shared persisted history.
pub struct AnalyticsLogger {
    current: Option<SessionRecord>,
    store: Arc<dyn SessionStore>,
    sink: Arc<dyn EventSink>,
}

impl AnalyticsLogger {
    /// Create a logger with no open session.
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            current: None,
            store,
            sink,
        }
    }

    /// Open a fresh session with zeroed counters.
    ///
    /// Calling while a session is already open silently replaces it without
    /// persisting the old one; that matches the widget's historical behavior
    /// on reopen without close.
    pub fn start_session(&mut self) -> &SessionRecord {
        let record = SessionRecord::started_now();
        debug!(session_id = %record.session_id, "analytics session started");
        self.sink.record(&AnalyticsEvent::ChatSessionStart);
        self.current.insert(record)
    }

    /// The open session, if any.
    #[must_use]
    pub fn current(&self) -> Option<&SessionRecord> {
        self.current.as_ref()
    }

    /// True while a session is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    fn ensure_open(&mut self) -> &mut SessionRecord {
        if self.current.is_none() {
            let _ = self.start_session();
        }
        match self.current.as_mut() {
            Some(session) => session,
            // The slot was just filled when empty.
            None => unreachable!("analytics session slot is open"),
        }
    }

    /// Track one chat message. Bot messages are ignored; user messages
    /// count and their raw text joins the question list.
    pub fn track_message(&mut self, text: &str, is_user: bool) {
        if !is_user {
            return;
        }
        let session = self.ensure_open();
        session.message_count += 1;
        session.questions_asked.push(text.to_string());
        self.sink.record(&AnalyticsEvent::ChatInteraction {
            message_length: text.len(),
        });
    }

    /// Track a menu item view. Set semantics: each item counts once per
    /// session, insertion order preserved.
    pub fn track_menu_item_view(&mut self, item_id: &str) {
        let session = self.ensure_open();
        if session.menu_items_viewed.iter().any(|seen| seen == item_id) {
            return;
        }
        session.menu_items_viewed.push(item_id.to_string());
        self.sink.record(&AnalyticsEvent::ViewItem {
            item_id: item_id.to_string(),
        });
    }

    /// Track a quick action. List semantics: duplicates allowed.
    pub fn track_quick_action(&mut self, action_id: &str) {
        let session = self.ensure_open();
        session.quick_actions_used.push(action_id.to_string());
        self.sink.record(&AnalyticsEvent::SelectContent {
            action_id: action_id.to_string(),
        });
    }

    /// Track a click on the external order link. Idempotent.
    pub fn track_order_click(&mut self) {
        let session = self.ensure_open();
        session.order_link_clicked = true;
        self.sink.record(&AnalyticsEvent::BeginCheckout);
    }

    /// Record a feedback score, overwriting any prior one.
    ///
    /// Unlike the other tracking calls this does NOT implicitly open a
    /// session: feedback arriving after close is dropped on purpose.
    pub fn track_feedback(&mut self, rating: u8, comment: Option<String>) {
        let Some(session) = self.current.as_mut() else {
            return;
        };
        session.feedback_rating = Some(rating);
        session.feedback_comment = comment;
        self.sink.record(&AnalyticsEvent::PostScore { score: rating });
    }

    /// Close the open session: stamp the end time, append the snapshot to
    /// the persisted history (evicting the oldest past [`HISTORY_CAP`]) and
    /// clear the slot. No-op when already closed.
    ///
    /// A failed write is logged and swallowed: history loss is acceptable,
    /// aborting the caller is not.
    pub async fn end_session(&mut self) {
        let Some(mut session) = self.current.take() else {
            return;
        };
        session.end_time = Some(Utc::now());

        let mut history = load_or_empty(self.store.as_ref()).await;
        history.push(session);
        while history.len() > HISTORY_CAP {
            history.remove(0);
        }

        if let Err(err) = self.store.save(history).await {
            warn!("failed to persist session history, sessions lost: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::analytics::store::MemorySessionStore;

    /// Sink that records every event it is offered.
    struct RecordingSink {
        events: Mutex<Vec<AnalyticsEvent>>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                events: Mutex::new(Vec::new()),
            }
        }

        fn events(&self) -> Vec<AnalyticsEvent> {
            self.events
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .clone()
        }
    }

    impl EventSink for RecordingSink {
        fn record(&self, event: &AnalyticsEvent) {
            self.events
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .push(event.clone());
        }
    }

    fn logger_with(
        store: Arc<MemorySessionStore>,
        sink: Arc<RecordingSink>,
    ) -> AnalyticsLogger {
        AnalyticsLogger::new(store, sink)
    }

    fn fresh() -> (AnalyticsLogger, Arc<MemorySessionStore>, Arc<RecordingSink>) {
        let store = Arc::new(MemorySessionStore::new());
        let sink = Arc::new(RecordingSink::new());
        (
            logger_with(Arc::clone(&store), Arc::clone(&sink)),
            store,
            sink,
        )
    }

    #[tokio::test]
    async fn test_empty_session_persists_with_zeroed_counters() {
        let (mut logger, store, _sink) = fresh();
        let _ = logger.start_session();
        logger.end_session().await;

        let history = load_or_empty(store.as_ref()).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].message_count, 0);
        assert!(!history[0].order_link_clicked);
        assert!(history[0].end_time.is_some());
    }

    #[tokio::test]
    async fn test_history_is_capped_at_one_hundred_fifo() {
        let (mut logger, store, _sink) = fresh();
        let mut first_id = String::new();
        for n in 0..101 {
            let record = logger.start_session();
            if n == 0 {
                first_id = record.session_id.clone();
            }
            logger.end_session().await;
        }

        let history = load_or_empty(store.as_ref()).await;
        assert_eq!(history.len(), HISTORY_CAP);
        assert!(history.iter().all(|s| s.session_id != first_id));
    }

    #[test]
    fn test_duplicate_item_views_collapse() {
        let (mut logger, _store, _sink) = fresh();
        let _ = logger.start_session();
        logger.track_menu_item_view("burger");
        logger.track_menu_item_view("burger");

        let session = logger.current();
        assert!(
            matches!(session, Some(s) if s.menu_items_viewed == vec!["burger".to_string()])
        );
    }

    #[test]
    fn test_tracking_implicitly_opens_a_session() {
        let (mut logger, _store, sink) = fresh();
        assert!(!logger.is_open());
        logger.track_message("do you deliver?", true);

        assert!(logger.is_open());
        assert!(matches!(logger.current(), Some(s) if s.message_count == 1));
        assert_eq!(sink.events()[0], AnalyticsEvent::ChatSessionStart);
    }

    #[test]
    fn test_bot_messages_are_ignored() {
        let (mut logger, _store, _sink) = fresh();
        logger.track_message("welcome!", false);
        assert!(!logger.is_open());
    }

    #[tokio::test]
    async fn test_feedback_does_not_open_a_session() {
        let (mut logger, store, sink) = fresh();
        logger.track_feedback(5, Some("great".to_string()));
        assert!(!logger.is_open());
        assert!(sink.events().is_empty());
        assert!(load_or_empty(store.as_ref()).await.is_empty());
    }

    #[test]
    fn test_feedback_overwrites_prior_score() {
        let (mut logger, _store, _sink) = fresh();
        let _ = logger.start_session();
        logger.track_feedback(2, Some("meh".to_string()));
        logger.track_feedback(5, None);

        let session = logger.current();
        assert!(matches!(
            session,
            Some(s) if s.feedback_rating == Some(5) && s.feedback_comment.is_none()
        ));
    }

    #[tokio::test]
    async fn test_double_close_is_a_no_op() {
        let (mut logger, store, _sink) = fresh();
        let _ = logger.start_session();
        logger.end_session().await;
        logger.end_session().await;

        assert_eq!(load_or_empty(store.as_ref()).await.len(), 1);
    }

    #[tokio::test]
    async fn test_restart_replaces_the_open_session_silently() {
        let (mut logger, store, _sink) = fresh();
        let _ = logger.start_session();
        logger.track_message("first", true);
        let _ = logger.start_session();
        logger.end_session().await;

        let history = load_or_empty(store.as_ref()).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].message_count, 0);
    }

    #[tokio::test]
    async fn test_failed_save_is_swallowed() {
        let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::failing_saves());
        let mut logger = AnalyticsLogger::new(store, Arc::new(crate::analytics::sink::NullSink));
        let _ = logger.start_session();
        logger.end_session().await;
        assert!(!logger.is_open());
    }

    #[test]
    fn test_order_click_is_idempotent_and_quick_actions_accumulate() {
        let (mut logger, _store, sink) = fresh();
        logger.track_order_click();
        logger.track_order_click();
        logger.track_quick_action("see-menu");
        logger.track_quick_action("see-menu");

        let session = logger.current();
        assert!(matches!(
            session,
            Some(s) if s.order_link_clicked && s.quick_actions_used.len() == 2
        ));
        // Session start + two checkout events + two select events.
        assert_eq!(sink.events().len(), 5);
    }
}
