//! Prompt assembly for the concierge model call.
//!
//! Every call is stateless: the outbound request is one string combining the
//! fixed instruction block with the customer's raw message.

use crate::catalog::MenuCatalog;
use crate::chat::config::RestaurantInfo;

/// Build the fixed instruction block: restaurant facts, the hard
/// templated-menu-reply rule, and the serialized catalog.
#[must_use]
pub fn build_system_prompt(restaurant: &RestaurantInfo, catalog: &MenuCatalog) -> String {
    let mut out = String::with_capacity(1024 + catalog.len() * 96);

    out.push_str("You are the ");
    out.push_str(&restaurant.name);
    out.push_str(" Concierge, a friendly AI assistant for ");
    out.push_str(&restaurant.name);
    out.push_str(" restaurant in Escondido, CA.\n\n");

    out.push_str("Location: ");
    out.push_str(&restaurant.address);
    out.push('\n');
    out.push_str("Hours: ");
    out.push_str(&restaurant.hours);
    out.push('\n');
    out.push_str("Phone: ");
    out.push_str(&restaurant.phone);
    out.push('\n');
    out.push_str("Order online: ");
    out.push_str(&restaurant.order_url);
    out.push_str("\n\n");

    out.push_str(
        "IMPORTANT: When users ask to \"see the menu\" or \"show me the menu\", respond with:\n",
    );
    out.push_str("\"You can view our full menu and order online at ");
    out.push_str(&restaurant.order_url);
    out.push_str(" 🍔\"\n\n");

    out.push_str("Menu items:\n");
    for item in catalog.items() {
        out.push_str("- ");
        out.push_str(&item.name);
        out.push_str(" (");
        out.push_str(&item.price);
        out.push_str("): ");
        out.push_str(&item.description);
        out.push('\n');
    }

    out.push_str(
        "\nKeep responses short (1-3 sentences). Be friendly and helpful. Never make up menu items.",
    );

    out
}

/// Combine the instruction block with one customer message.
#[must_use]
pub fn build_turn_prompt(system_prompt: &str, restaurant_name: &str, user_message: &str) -> String {
    format!(
        "{system_prompt}\n\nCustomer says: \"{user_message}\"\n\nRespond as the {restaurant_name} Concierge:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_carries_restaurant_facts() {
        let prompt =
            build_system_prompt(&RestaurantInfo::default(), &MenuCatalog::default_menu());
        assert!(prompt.contains("(442) 999-5542"));
        assert!(prompt.contains("Tuesday-Saturday"));
        assert!(prompt.contains("https://www.hbrotherstogo.com/"));
    }

    #[test]
    fn test_system_prompt_serializes_every_item() {
        let catalog = MenuCatalog::default_menu();
        let prompt = build_system_prompt(&RestaurantInfo::default(), &catalog);
        for item in catalog.items() {
            assert!(prompt.contains(&format!("- {} ({}):", item.name, item.price)));
        }
    }

    #[test]
    fn test_turn_prompt_quotes_the_customer_message() {
        let prompt = build_turn_prompt("SYSTEM", "H Brothers", "do you have fries?");
        assert!(prompt.starts_with("SYSTEM\n\nCustomer says: \"do you have fries?\""));
        assert!(prompt.ends_with("Respond as the H Brothers Concierge:"));
    }
}
