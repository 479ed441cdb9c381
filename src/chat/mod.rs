//! Concierge chat system for the restaurant site.
//!
//! This module provides the customer-facing chat flow:
//! - Conversation context tracking (topics covered, items mentioned)
//! - Suggested-reply heuristics over a keyword rule table
//! - Prompt assembly and the Gemini `generateContent` client
//! - The response service with safe degraded fallbacks
//! - The per-window session controller
//!
//! Failures never cross the service boundary as errors: the worst case a
//! customer can see is a fixed apology carrying the restaurant's phone
//! number.

pub mod config;
pub mod context;
pub mod errors;
pub mod gemini;
pub mod message;
pub mod prompt;
pub mod session;
pub mod suggestions;

pub use config::{ConciergeConfig, GeminiConfig, KeywordConfig, RestaurantInfo};
pub use context::{ContextKeywords, ConversationContext};
pub use errors::{ChatError, ChatResult};
pub use gemini::GeminiClient;
pub use message::{ChatMessage, ChatReply, ChatRole};
pub use session::{ChatSession, ChatSessionId};
pub use suggestions::{SuggestionRule, SuggestionRules};

use std::sync::Arc;

use tracing::{debug, error};

use crate::catalog::MenuCatalog;

/// Suggested replies attached to the greeting message.
const WELCOME_SUGGESTIONS: [&str; 3] = ["See the menu", "Check hours", "Order food"];

/// Suggested reply attached to the offline (missing credential) fallback.
const OFFLINE_SUGGESTIONS: [&str; 1] = ["Call restaurant"];

/// Suggested replies attached to the degraded (remote failure) fallback.
const DEGRADED_SUGGESTIONS: [&str; 2] = ["Try again", "Show me the menu"];

/// Main chat service coordinating the remote model and the pure heuristics.
pub struct ConciergeService {
    config: ConciergeConfig,
    catalog: Arc<MenuCatalog>,
    gemini: GeminiClient,
    system_prompt: String,
}

impl ConciergeService {
    /// Create a service from validated configuration and a loaded catalog.
    ///
    /// The instruction block is assembled once here; the catalog never
    /// changes at runtime.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: ConciergeConfig, catalog: Arc<MenuCatalog>) -> ChatResult<Self> {
        config.validate()?;
        let gemini = GeminiClient::new(config.gemini.clone())?;
        let system_prompt = prompt::build_system_prompt(&config.restaurant, &catalog);
        Ok(Self {
            config,
            catalog,
            gemini,
            system_prompt,
        })
    }

    /// The service configuration.
    #[must_use]
    pub fn config(&self) -> &ConciergeConfig {
        &self.config
    }

    /// The loaded menu catalog.
    #[must_use]
    pub fn catalog(&self) -> &MenuCatalog {
        &self.catalog
    }

    /// The greeting shown when a chat window opens.
    #[must_use]
    pub fn greeting(&self) -> ChatMessage {
        ChatMessage::model(
            format!(
                "Hi! 👋 Welcome to {}. How can I help you today?",
                self.config.restaurant.name
            ),
            Vec::new(),
            WELCOME_SUGGESTIONS.map(str::to_string).to_vec(),
        )
    }

    /// Answer one customer message.
    ///
    /// `_history` is accepted for parity with the widget API; each call is
    /// stateless and prior turns are not replayed to the remote model beyond
    /// what the combined prompt carries.
    ///
    /// This never fails: a missing credential short-circuits to the offline
    /// fallback without a network attempt, and any remote failure degrades
    /// to the apology fallback with a logged diagnostic.
    pub async fn respond(
        &self,
        _history: &[ChatMessage],
        user_message: &str,
        context: &ConversationContext,
    ) -> ChatReply {
        if !self.gemini.has_credentials() {
            error!("no gemini api key configured; returning offline fallback");
            return self.offline_reply();
        }

        let turn_prompt = prompt::build_turn_prompt(
            &self.system_prompt,
            &self.config.restaurant.name,
            user_message,
        );

        match self.gemini.generate(&turn_prompt).await {
            Ok(text) => {
                debug!(chars = text.len(), "gemini reply received");
                let menu_items = self
                    .catalog
                    .detect_in_text(&text)
                    .into_iter()
                    .cloned()
                    .collect();
                let suggested_replies =
                    self.config.keywords.suggestions.suggest(&text, context);
                ChatReply {
                    text,
                    menu_items,
                    suggested_replies,
                }
            }
            Err(err) => {
                error!("gemini call failed: {err}");
                self.degraded_reply()
            }
        }
    }

    /// Produce the successor context for one completed turn.
    #[must_use]
    pub fn advance_context(
        &self,
        context: &ConversationContext,
        user_message: &str,
        bot_response: &str,
    ) -> ConversationContext {
        context.updated(
            &self.config.keywords.context,
            &self.catalog,
            user_message,
            bot_response,
        )
    }

    fn offline_reply(&self) -> ChatReply {
        ChatReply {
            text: format!(
                "I'm having trouble connecting. Please call us at {}!",
                self.config.restaurant.phone
            ),
            menu_items: Vec::new(),
            suggested_replies: OFFLINE_SUGGESTIONS.map(str::to_string).to_vec(),
        }
    }

    fn degraded_reply(&self) -> ChatReply {
        ChatReply {
            text: format!(
                "Sorry, I'm having trouble right now. Please call us at {}!",
                self.config.restaurant.phone
            ),
            menu_items: Vec::new(),
            suggested_replies: DEGRADED_SUGGESTIONS.map(str::to_string).to_vec(),
        }
    }
}
