//! Configuration for the concierge chat service.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::chat::context::ContextKeywords;
use crate::chat::errors::{ChatError, ChatResult};
use crate::chat::suggestions::SuggestionRules;

/// Environment variable holding the Gemini API key.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Top-level configuration for the concierge service.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConciergeConfig {
    /// Restaurant facts injected into the system prompt and fallbacks.
    pub restaurant: RestaurantInfo,
    /// Remote generation settings.
    pub gemini: GeminiConfig,
    /// Keyword tables for topic detection and reply suggestions.
    pub keywords: KeywordConfig,
}

impl ConciergeConfig {
    /// Create a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a config from the process environment.
    ///
    /// Reads the API key from `GEMINI_API_KEY` (trimmed; an empty value
    /// counts as absent). Everything else keeps its defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let api_key = std::env::var(GEMINI_API_KEY_ENV)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        Self {
            gemini: GeminiConfig {
                api_key,
                ..GeminiConfig::default()
            },
            ..Self::default()
        }
    }

    /// Set the Gemini API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.gemini.api_key = Some(key.into());
        self
    }

    /// Set the Gemini model name.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.gemini.model = model.into();
        self
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any values are out of range or invalid.
    pub fn validate(&self) -> ChatResult<()> {
        if self.restaurant.name.trim().is_empty() {
            return Err(ChatError::InvalidConfig(
                "restaurant.name must not be empty".to_string(),
            ));
        }
        if self.restaurant.phone.trim().is_empty() {
            return Err(ChatError::InvalidConfig(
                "restaurant.phone must not be empty".to_string(),
            ));
        }
        Url::parse(&self.restaurant.order_url)?;

        if self.gemini.model.trim().is_empty() {
            return Err(ChatError::InvalidConfig(
                "gemini.model must not be empty".to_string(),
            ));
        }
        Url::parse(&self.gemini.base_url)?;

        if self.keywords.context.hours.is_empty() || self.keywords.context.location.is_empty() {
            return Err(ChatError::InvalidConfig(
                "context keyword lists must not be empty".to_string(),
            ));
        }
        if self.keywords.suggestions.fallback.is_empty() {
            return Err(ChatError::InvalidConfig(
                "suggestions.fallback must not be empty".to_string(),
            ));
        }
        for rule in &self.keywords.suggestions.rules {
            if rule.triggers.is_empty() || rule.replies.is_empty() {
                return Err(ChatError::InvalidConfig(
                    "suggestion rules need at least one trigger and one reply".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Static facts about the restaurant.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RestaurantInfo {
    /// Restaurant name.
    pub name: String,
    /// Street address, city, state and zip.
    pub address: String,
    /// Opening hours in display form.
    pub hours: String,
    /// Phone number in display form.
    pub phone: String,
    /// Online ordering site.
    pub order_url: String,
}

impl Default for RestaurantInfo {
    fn default() -> Self {
        Self {
            name: "H Brothers".to_string(),
            address: "212 E. Grand Ave, Escondido, CA 92025".to_string(),
            hours: "Tuesday-Saturday 11AM-9PM, Closed Sunday & Monday".to_string(),
            phone: "(442) 999-5542".to_string(),
            order_url: "https://www.hbrotherstogo.com/".to_string(),
        }
    }
}

/// Remote generation settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key; `None` short-circuits every call to the offline fallback.
    pub api_key: Option<String>,
    /// Model name for `generateContent`.
    pub model: String,
    /// API base URL.
    pub base_url: String,
    /// Request timeout.
    #[serde(with = "duration_serde")]
    pub request_timeout: Duration,
    /// Connection timeout.
    #[serde(with = "duration_serde")]
    pub connect_timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.0-flash-exp".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Keyword tables for the pure matching heuristics.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordConfig {
    /// Topic triggers for the conversation context tracker.
    pub context: ContextKeywords,
    /// Rule table for follow-up suggestions.
    pub suggestions: SuggestionRules,
}

/// Serde module for Duration serialization.
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ConciergeConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_has_no_api_key() {
        assert!(ConciergeConfig::default().gemini.api_key.is_none());
    }

    #[test]
    fn test_builder() {
        let config = ConciergeConfig::new()
            .with_api_key("test-key")
            .with_model("gemini-test");
        assert_eq!(config.gemini.api_key.as_deref(), Some("test-key"));
        assert_eq!(config.gemini.model, "gemini-test");
    }

    #[test]
    fn test_bad_order_url_is_rejected() {
        let mut config = ConciergeConfig::default();
        config.restaurant.order_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_fallback_is_rejected() {
        let mut config = ConciergeConfig::default();
        config.keywords.suggestions.fallback.clear();
        assert!(matches!(
            config.validate(),
            Err(ChatError::InvalidConfig(_))
        ));
    }
}
