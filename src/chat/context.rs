//! Conversation context accumulated across one chat window.
//!
//! The context is a small summary of what has been discussed so far. It is
//! replaced, never mutated in place: every turn produces a new value via
//! [`ConversationContext::updated`], so message count and the mentioned-item
//! set only ever grow and the topic flags are sticky.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::MenuCatalog;

/// Keyword table driving topic detection in user messages.
///
/// Matching is a case-insensitive substring test. The defaults reproduce the
/// production triggers; the table is configuration so a smarter classifier
/// can replace it later without touching call sites.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContextKeywords {
    /// Substrings that mark a message as asking about opening hours.
    pub hours: Vec<String>,
    /// Substrings that mark a message as asking about the location.
    pub location: Vec<String>,
}

impl Default for ContextKeywords {
    fn default() -> Self {
        Self {
            hours: vec!["hour".to_string()],
            location: vec!["where".to_string(), "location".to_string()],
        }
    }
}

impl ContextKeywords {
    fn any_match(needles: &[String], haystack_lower: &str) -> bool {
        needles
            .iter()
            .any(|needle| haystack_lower.contains(&needle.to_lowercase()))
    }
}

/// Accumulated summary of one chat window's conversation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationContext {
    /// Menu item names mentioned by the concierge, first-seen order, unique.
    pub mentioned_items: Vec<String>,
    /// Free-form customer preferences. Carried in the data model but not yet
    /// populated by any tracker.
    pub preferences: Vec<String>,
    /// Sticky flag: the customer asked about opening hours at some point.
    pub asked_about_hours: bool,
    /// Sticky flag: the customer asked about the location at some point.
    pub asked_about_location: bool,
    /// Number of turns processed so far.
    pub message_count: u32,
    /// When this chat window started.
    pub session_start: DateTime<Utc>,
}

impl ConversationContext {
    /// Fresh context for a newly opened chat window.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mentioned_items: Vec::new(),
            preferences: Vec::new(),
            asked_about_hours: false,
            asked_about_location: false,
            message_count: 0,
            session_start: Utc::now(),
        }
    }

    /// Produce the successor context for one completed turn.
    ///
    /// Pure copy-and-update: increments the message count, sets the sticky
    /// topic flags when the user message matches the keyword table, and
    /// records catalog items newly mentioned in the bot response. Any input
    /// text, including empty, is accepted.
    #[must_use]
    pub fn updated(
        &self,
        keywords: &ContextKeywords,
        catalog: &MenuCatalog,
        user_message: &str,
        bot_response: &str,
    ) -> Self {
        let mut next = self.clone();
        let user_lower = user_message.to_lowercase();

        next.message_count += 1;
        if ContextKeywords::any_match(&keywords.hours, &user_lower) {
            next.asked_about_hours = true;
        }
        if ContextKeywords::any_match(&keywords.location, &user_lower) {
            next.asked_about_location = true;
        }

        for item in catalog.detect_in_text(bot_response) {
            if !next.mentioned_items.contains(&item.name) {
                next.mentioned_items.push(item.name.clone());
            }
        }

        next
    }
}

impl Default for ConversationContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (ContextKeywords, MenuCatalog) {
        (ContextKeywords::default(), MenuCatalog::default_menu())
    }

    #[test]
    fn test_hours_flag_is_sticky() {
        let (keywords, catalog) = fixture();
        let context = ConversationContext::new();
        let context = context.updated(&keywords, &catalog, "What are your HOURS?", "We open at 11.");
        assert!(context.asked_about_hours);

        let context = context.updated(&keywords, &catalog, "thanks!", "Any time.");
        assert!(context.asked_about_hours);
        assert_eq!(context.message_count, 2);
    }

    #[test]
    fn test_location_triggers() {
        let (keywords, catalog) = fixture();
        let context = ConversationContext::new();
        let context = context.updated(&keywords, &catalog, "Where are you?", "Escondido.");
        assert!(context.asked_about_location);
        assert!(!context.asked_about_hours);

        let fresh = ConversationContext::new();
        let fresh = fresh.updated(&keywords, &catalog, "what's your LOCATION", "Escondido.");
        assert!(fresh.asked_about_location);
    }

    #[test]
    fn test_mentioned_items_are_unique_in_first_seen_order() {
        let (keywords, catalog) = fixture();
        let context = ConversationContext::new();
        let context = context.updated(
            &keywords,
            &catalog,
            "any recommendations?",
            "Try the Loaded Fries or the Brisket Melt!",
        );
        assert_eq!(
            context.mentioned_items,
            vec!["Brisket Melt".to_string(), "Loaded Fries".to_string()]
        );

        let context = context.updated(
            &keywords,
            &catalog,
            "tell me more",
            "The Loaded Fries come with brisket and cheese sauce.",
        );
        assert_eq!(
            context.mentioned_items,
            vec!["Brisket Melt".to_string(), "Loaded Fries".to_string()]
        );
    }

    #[test]
    fn test_empty_inputs_still_count_the_turn() {
        let (keywords, catalog) = fixture();
        let context = ConversationContext::new();
        let context = context.updated(&keywords, &catalog, "", "");
        assert_eq!(context.message_count, 1);
        assert!(context.mentioned_items.is_empty());
        assert!(!context.asked_about_hours);
    }
}
