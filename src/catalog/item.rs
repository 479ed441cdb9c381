//! Menu item model shared by the catalog, the chat layer, and the API.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Display category of a menu item.
///
/// The set matches what the site's menu card renderer distinguishes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Rotating house specials.
    Specials,
    /// Burgers.
    Burgers,
    /// Sandwiches and melts.
    Sandwiches,
    /// Starters and shareables.
    Starters,
    /// Sides.
    Sides,
}

impl Category {
    /// Stable string form for storage and templating.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Specials => "specials",
            Self::Burgers => "burgers",
            Self::Sandwiches => "sandwiches",
            Self::Starters => "starters",
            Self::Sides => "sides",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single orderable menu item with display metadata.
///
/// Items are immutable once the catalog is loaded; the price is kept as a
/// display string exactly as it should appear on the site.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Stable identifier used by analytics and ordering links.
    pub id: String,
    /// Display name, also the needle for in-text detection.
    pub name: String,
    /// Short description shown on the item card.
    pub description: String,
    /// Display price string (e.g. `"$12.99"`).
    pub price: String,
    /// Display category.
    pub category: Category,
    /// Image reference for the item card.
    pub image_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip_json() {
        let json = serde_json::to_string(&Category::Sandwiches).unwrap_or_default();
        assert_eq!(json, "\"sandwiches\"");
    }

    #[test]
    fn test_menu_item_uses_camel_case_keys() {
        let item = MenuItem {
            id: "loaded-fries".to_string(),
            name: "Loaded Fries".to_string(),
            description: "Fries with all the fixings".to_string(),
            price: "$8.99".to_string(),
            category: Category::Sides,
            image_url: "/images/menu/loaded-fries.jpg".to_string(),
        };
        let json = serde_json::to_string(&item).unwrap_or_default();
        assert!(json.contains("\"imageUrl\""));
        assert!(!json.contains("\"image_url\""));
    }
}
