//! Suggested-reply heuristics driven by an ordered keyword rule table.

use serde::{Deserialize, Serialize};

use crate::chat::context::ConversationContext;

/// Upper bound on the number of suggestions returned per call.
pub const MAX_SUGGESTIONS: usize = 3;

/// One suggestion rule: if any trigger appears in the bot message, the rule's
/// replies are offered.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SuggestionRule {
    /// Case-insensitive substrings that activate the rule.
    pub triggers: Vec<String>,
    /// Replies offered when the rule fires.
    pub replies: Vec<String>,
}

/// Ordered rule table for follow-up suggestions.
///
/// Exactly one branch fires per call: the first rule whose trigger matches
/// wins, and the fallback covers everything else. The defaults reproduce the
/// production prompts; the table is configuration so a smarter ranker can
/// replace it later without touching call sites.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SuggestionRules {
    /// Rules checked in order.
    pub rules: Vec<SuggestionRule>,
    /// Replies offered when no rule matches.
    pub fallback: Vec<String>,
}

impl Default for SuggestionRules {
    fn default() -> Self {
        Self {
            rules: vec![
                SuggestionRule {
                    triggers: vec!["menu".to_string(), "recommend".to_string()],
                    replies: vec![
                        "What's most popular?".to_string(),
                        "Tell me about the brisket".to_string(),
                    ],
                },
                SuggestionRule {
                    triggers: vec!["hour".to_string(), "open".to_string()],
                    replies: vec![
                        "Where are you located?".to_string(),
                        "Can I order online?".to_string(),
                    ],
                },
                SuggestionRule {
                    triggers: vec!["escondido".to_string(), "grand ave".to_string()],
                    replies: vec![
                        "What are your hours?".to_string(),
                        "Show me the menu".to_string(),
                    ],
                },
            ],
            fallback: vec![
                "Show me the menu".to_string(),
                "What are your hours?".to_string(),
                "Where are you located?".to_string(),
            ],
        }
    }
}

impl SuggestionRules {
    /// Suggest up to [`MAX_SUGGESTIONS`] follow-up prompts for the last bot
    /// message.
    ///
    /// Deterministic for identical input. `_context` is accepted so a future
    /// ranker can vary suggestions by conversation state, but the current
    /// table does not use it; this mirrors the production behavior and is a
    /// known gap rather than an oversight here.
    #[must_use]
    pub fn suggest(&self, last_bot_message: &str, _context: &ConversationContext) -> Vec<String> {
        let lower = last_bot_message.to_lowercase();

        let replies = self
            .rules
            .iter()
            .find(|rule| {
                rule.triggers
                    .iter()
                    .any(|trigger| lower.contains(&trigger.to_lowercase()))
            })
            .map_or(&self.fallback, |rule| &rule.replies);

        replies.iter().take(MAX_SUGGESTIONS).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggest(message: &str) -> Vec<String> {
        SuggestionRules::default().suggest(message, &ConversationContext::new())
    }

    #[test]
    fn test_menu_branch() {
        let replies = suggest("Here is our menu overview.");
        assert_eq!(replies[0], "What's most popular?");
        assert_eq!(replies.len(), 2);
    }

    #[test]
    fn test_hours_branch() {
        let replies = suggest("We're OPEN Tuesday through Saturday.");
        assert_eq!(replies[0], "Where are you located?");
    }

    #[test]
    fn test_address_branch() {
        let replies = suggest("Find us in Escondido on Grand Ave.");
        assert_eq!(replies[0], "What are your hours?");
    }

    #[test]
    fn test_fallback_branch() {
        let replies = suggest("Glad to help!");
        assert_eq!(replies.len(), 3);
        assert_eq!(replies[0], "Show me the menu");
    }

    #[test]
    fn test_first_matching_rule_wins() {
        // "menu" and "hour" both appear; the menu rule is ordered first.
        let replies = suggest("Our menu is available during opening hours.");
        assert_eq!(replies[0], "What's most popular?");
    }

    #[test]
    fn test_never_more_than_three() {
        let rules = SuggestionRules {
            rules: Vec::new(),
            fallback: (0..10).map(|n| format!("reply {n}")).collect(),
        };
        let replies = rules.suggest("anything", &ConversationContext::new());
        assert_eq!(replies.len(), MAX_SUGGESTIONS);
    }
}
