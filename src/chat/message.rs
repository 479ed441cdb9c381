//! Chat message model for one concierge window.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::MenuItem;

/// Role of a chat message.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    /// Customer input.
    User,
    /// Concierge response.
    Model,
}

impl ChatRole {
    /// Stable string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One turn in the chat window.
///
/// Messages are appended to the window's ordered list and never mutated after
/// creation. Detected menu items and suggested replies ride along on model
/// messages so the widget can render cards and reply chips.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Who produced the message.
    pub role: ChatRole,
    /// Message text.
    pub text: String,
    /// Creation time, stamped by the constructors.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Catalog items detected in a model response.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub menu_items: Vec<MenuItem>,
    /// Suggested follow-up prompts for a model response.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggested_replies: Vec<String>,
}

impl ChatMessage {
    /// Build a user message stamped with the current time.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
            timestamp: Some(Utc::now()),
            menu_items: Vec::new(),
            suggested_replies: Vec::new(),
        }
    }

    /// Build a model message stamped with the current time.
    #[must_use]
    pub fn model(
        text: impl Into<String>,
        menu_items: Vec<MenuItem>,
        suggested_replies: Vec<String>,
    ) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
            timestamp: Some(Utc::now()),
            menu_items,
            suggested_replies,
        }
    }
}

/// Result of one concierge turn, before it is wrapped into a [`ChatMessage`].
#[derive(Clone, Debug, PartialEq)]
pub struct ChatReply {
    /// Response text.
    pub text: String,
    /// Catalog items detected in the response text.
    pub menu_items: Vec<MenuItem>,
    /// Suggested follow-up prompts.
    pub suggested_replies: Vec<String>,
}

impl ChatReply {
    /// Wrap the reply into a model [`ChatMessage`].
    #[must_use]
    pub fn into_message(self) -> ChatMessage {
        ChatMessage::model(self.text, self.menu_items, self.suggested_replies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_stamp_a_timestamp() {
        let message = ChatMessage::user("hello");
        assert_eq!(message.role, ChatRole::User);
        assert!(message.timestamp.is_some());
    }

    #[test]
    fn test_empty_extras_are_omitted_from_json() {
        let message = ChatMessage::user("hello");
        let json = serde_json::to_string(&message).unwrap_or_default();
        assert!(!json.contains("menuItems"));
        assert!(!json.contains("suggestedReplies"));
    }
}
