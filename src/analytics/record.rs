//! Analytics session records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generate an opaque session identifier.
///
/// Composed from a millisecond timestamp plus a random suffix, which is
/// unique with overwhelming probability across the process lifetime and
/// sorts roughly by start time.
#[must_use]
pub fn generate_session_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("session_{millis}_{}", &suffix[..9])
}

/// Everything tracked for one chat session, persisted on close.
///
/// Field names serialize in camelCase to stay compatible with the history
/// format the site's previous client-side logger wrote.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Opaque session identifier.
    pub session_id: String,
    /// When the session opened.
    pub start_time: DateTime<Utc>,
    /// When the session closed; absent while the session is open.
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    /// Number of user messages.
    pub message_count: u32,
    /// Raw user questions in the order asked.
    pub questions_asked: Vec<String>,
    /// Viewed menu item ids, unique, insertion order.
    pub menu_items_viewed: Vec<String>,
    /// Quick action ids used, duplicates allowed.
    pub quick_actions_used: Vec<String>,
    /// Whether the external order link was clicked.
    pub order_link_clicked: bool,
    /// Feedback rating, when given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_rating: Option<u8>,
    /// Feedback comment, when given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_comment: Option<String>,
}

impl SessionRecord {
    /// Start a fresh session record with zeroed counters.
    #[must_use]
    pub fn started_now() -> Self {
        Self {
            session_id: generate_session_id(),
            start_time: Utc::now(),
            end_time: None,
            message_count: 0,
            questions_asked: Vec::new(),
            menu_items_viewed: Vec::new(),
            quick_actions_used: Vec::new(),
            order_link_clicked: false,
            feedback_rating: None,
            feedback_comment: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_ids_are_unique() {
        let a = generate_session_id();
        let b = generate_session_id();
        assert_ne!(a, b);
        assert!(a.starts_with("session_"));
    }

    #[test]
    fn test_record_serializes_in_camel_case() {
        let record = SessionRecord::started_now();
        let json = serde_json::to_string(&record).unwrap_or_default();
        assert!(json.contains("\"sessionId\""));
        assert!(json.contains("\"orderLinkClicked\":false"));
        assert!(!json.contains("\"feedbackRating\""));
    }
}
