//! Best-effort external event sink.
//!
//! Mirrors the site's old GA4 wiring: every tracked interaction is also
//! offered to a sink as a typed event. Delivery is fire-and-forget; the
//! absence or failure of a sink never affects any other behavior.

use tracing::debug;
use url::Url;

use crate::analytics::errors::AnalyticsResult;

/// A typed analytics event, named after the GA4 events the site used to emit.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AnalyticsEvent {
    /// A chat session opened.
    ChatSessionStart,
    /// A user message was tracked.
    ChatInteraction {
        /// Length of the message; the text itself is not exported.
        message_length: usize,
    },
    /// A menu item card was shown for the first time this session.
    ViewItem {
        /// Menu item identifier.
        item_id: String,
    },
    /// A quick action was used.
    SelectContent {
        /// Quick action identifier.
        action_id: String,
    },
    /// The external order link was clicked.
    BeginCheckout,
    /// A feedback score was recorded.
    PostScore {
        /// The rating given.
        score: u8,
    },
}

/// Destination for best-effort event notifications.
pub trait EventSink: Send + Sync {
    /// Offer one event to the sink. Must never block or fail the caller.
    fn record(&self, event: &AnalyticsEvent);
}

/// Sink that drops every event; the default when nothing is configured.
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _event: &AnalyticsEvent) {}
}

/// Sink that posts each event as JSON to a webhook endpoint.
///
/// Requests are spawned onto the runtime and forgotten; failures are logged
/// at debug level only. Must be used from within a tokio runtime.
pub struct WebhookSink {
    client: reqwest::Client,
    endpoint: Url,
}

impl WebhookSink {
    /// Create a webhook sink for an endpoint.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(endpoint: Url) -> AnalyticsResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(5))
            .build()?;
        Ok(Self { client, endpoint })
    }
}

impl EventSink for WebhookSink {
    fn record(&self, event: &AnalyticsEvent) {
        let request = self.client.post(self.endpoint.clone()).json(event);
        tokio::spawn(async move {
            if let Err(err) = request.send().await {
                debug!("analytics webhook delivery failed: {err}");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_serialize_with_ga4_names() {
        let event = AnalyticsEvent::ChatInteraction { message_length: 12 };
        let json = serde_json::to_string(&event).unwrap_or_default();
        assert_eq!(json, "{\"event\":\"chat_interaction\",\"message_length\":12}");

        let event = AnalyticsEvent::ChatSessionStart;
        let json = serde_json::to_string(&event).unwrap_or_default();
        assert_eq!(json, "{\"event\":\"chat_session_start\"}");
    }

    #[test]
    fn test_null_sink_accepts_everything() {
        NullSink.record(&AnalyticsEvent::BeginCheckout);
        NullSink.record(&AnalyticsEvent::PostScore { score: 5 });
    }
}
