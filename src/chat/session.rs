//! Chat-window session controller.
//!
//! One [`ChatSession`] owns everything a single open chat window needs: the
//! ordered message list, the current [`ConversationContext`], and its own
//! [`AnalyticsLogger`]. Session state is explicitly owned and injected, so
//! independent windows never clobber each other's analytics; only the
//! persisted history behind the store is shared.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analytics::AnalyticsLogger;
use crate::chat::ConciergeService;
use crate::chat::context::ConversationContext;
use crate::chat::errors::{ChatError, ChatResult};
use crate::chat::message::{ChatMessage, ChatRole};

/// Identifier for one open chat window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct ChatSessionId(pub Uuid);

impl ChatSessionId {
    /// Create a new identifier.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ChatSessionId {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChatSessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChatSessionId {
    type Err = uuid::Error;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// State of one open chat window.
///
/// The in-memory message list grows for the lifetime of the window and is
/// never truncated; acceptable for one window, a ring buffer would be needed
/// for a long-lived analog.
pub struct ChatSession {
    id: ChatSessionId,
    messages: Vec<ChatMessage>,
    context: ConversationContext,
    analytics: AnalyticsLogger,
    interacted: bool,
}

impl ChatSession {
    /// Open a chat window: seed the greeting and start the analytics
    /// session.
    #[must_use]
    pub fn open(service: &ConciergeService, mut analytics: AnalyticsLogger) -> Self {
        analytics.start_session();
        Self {
            id: ChatSessionId::new(),
            messages: vec![service.greeting()],
            context: ConversationContext::new(),
            analytics,
            interacted: false,
        }
    }

    /// Window identifier.
    #[must_use]
    pub fn id(&self) -> ChatSessionId {
        self.id
    }

    /// All messages in order, greeting first.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Current conversation context.
    #[must_use]
    pub fn context(&self) -> &ConversationContext {
        &self.context
    }

    /// Send one customer message and run the full turn: track it, get the
    /// concierge reply, record item views, advance the context.
    ///
    /// Returns the appended model message.
    ///
    /// # Errors
    /// Returns an error if the message is empty after trimming. Remote
    /// failures do not surface here; the service degrades them to fallback
    /// replies.
    pub async fn send(
        &mut self,
        service: &ConciergeService,
        text: &str,
    ) -> ChatResult<&ChatMessage> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        self.interacted = true;
        self.analytics.track_message(trimmed, true);
        self.messages.push(ChatMessage::user(trimmed));

        let reply = service.respond(&self.messages, trimmed, &self.context).await;
        for item in &reply.menu_items {
            self.analytics.track_menu_item_view(&item.id);
        }

        self.context = service.advance_context(&self.context, trimmed, &reply.text);
        self.messages.push(reply.into_message());

        // The model message was just pushed, so the list cannot be empty.
        match self.messages.last() {
            Some(message) => Ok(message),
            None => Err(ChatError::EmptyMessage),
        }
    }

    /// Record that a suggested-reply chip was tapped.
    pub fn track_quick_action(&mut self, action_id: &str) {
        self.interacted = true;
        self.analytics.track_quick_action(action_id);
    }

    /// Record a click on the external ordering link.
    pub fn track_order_click(&mut self) {
        self.interacted = true;
        self.analytics.track_order_click();
    }

    /// Record a feedback score for the current analytics session.
    pub fn track_feedback(&mut self, rating: u8, comment: Option<String>) {
        self.analytics.track_feedback(rating, comment);
    }

    /// Close the window. The analytics session is persisted only when the
    /// customer actually interacted, matching the widget's close behavior.
    pub async fn close(&mut self) {
        if self.interacted {
            self.analytics.end_session().await;
        }
    }

    /// Role of the last message, for tests and diagnostics.
    #[must_use]
    pub fn last_role(&self) -> Option<ChatRole> {
        self.messages.last().map(|message| message.role)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::analytics::sink::NullSink;
    use crate::analytics::store::{MemorySessionStore, SessionStore};
    use crate::catalog::MenuCatalog;
    use crate::chat::ConciergeConfig;

    fn service() -> ConciergeService {
        let catalog = Arc::new(MenuCatalog::default_menu());
        match ConciergeService::new(ConciergeConfig::default(), catalog) {
            Ok(service) => service,
            Err(err) => unreachable!("default config must build: {err}"),
        }
    }

    fn logger(store: &Arc<MemorySessionStore>) -> AnalyticsLogger {
        AnalyticsLogger::new(
            Arc::clone(store) as Arc<dyn SessionStore>,
            Arc::new(NullSink),
        )
    }

    #[tokio::test]
    async fn test_open_seeds_the_greeting() {
        let store = Arc::new(MemorySessionStore::new());
        let session = ChatSession::open(&service(), logger(&store));
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.last_role(), Some(ChatRole::Model));
        assert_eq!(session.context().message_count, 0);
    }

    #[tokio::test]
    async fn test_send_appends_user_and_model_messages() {
        let store = Arc::new(MemorySessionStore::new());
        let mut session = ChatSession::open(&service(), logger(&store));

        // No key configured, so the reply is the offline fallback; the turn
        // flow itself is identical either way.
        let sent = session.send(&service(), "  hello  ").await.is_ok();
        assert!(sent);
        assert_eq!(session.last_role(), Some(ChatRole::Model));
        assert_eq!(session.messages().len(), 3);
        assert_eq!(session.messages()[1].text, "hello");
        assert_eq!(session.context().message_count, 1);
    }

    #[tokio::test]
    async fn test_empty_message_is_rejected() {
        let store = Arc::new(MemorySessionStore::new());
        let mut session = ChatSession::open(&service(), logger(&store));
        let result = session.send(&service(), "   ").await;
        assert!(matches!(result, Err(ChatError::EmptyMessage)));
        assert_eq!(session.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_close_without_interaction_persists_nothing() {
        let store = Arc::new(MemorySessionStore::new());
        let mut session = ChatSession::open(&service(), logger(&store));
        session.close().await;
        let history = crate::analytics::store::load_or_empty(store.as_ref()).await;
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_close_after_interaction_persists_the_session() {
        let store = Arc::new(MemorySessionStore::new());
        let mut session = ChatSession::open(&service(), logger(&store));
        let _ = session.send(&service(), "do you have burgers?").await;
        session.close().await;

        let history = crate::analytics::store::load_or_empty(store.as_ref()).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].message_count, 1);
        assert_eq!(history[0].questions_asked, vec!["do you have burgers?"]);
    }
}
