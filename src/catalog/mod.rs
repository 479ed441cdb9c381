//! Static menu catalog for the restaurant.
//!
//! The catalog is loaded once at startup (built-in menu, optionally replaced
//! from a JSON file) and never mutated at runtime. Besides lookups it offers
//! case-insensitive name detection over free text, which both the
//! conversation context tracker and the chat response service rely on.

pub mod item;

pub use item::{Category, MenuItem};

use std::path::Path;

use thiserror::Error;

/// Errors raised while loading a catalog from external configuration.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The menu file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The menu file is not valid JSON for a list of items.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// The menu file parsed but contained no items.
    #[error("menu file contains no items")]
    Empty,
}

/// The immutable menu catalog.
pub struct MenuCatalog {
    items: Vec<MenuItem>,
}

impl MenuCatalog {
    /// Build a catalog from a list of items.
    #[must_use]
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self { items }
    }

    /// Load a catalog from a JSON file holding an array of items.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// contains no items.
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        let items: Vec<MenuItem> = serde_json::from_str(&raw)?;
        if items.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self::new(items))
    }

    /// The built-in menu used when no menu file is configured.
    #[must_use]
    pub fn default_menu() -> Self {
        Self::new(default_items())
    }

    /// All items in menu order.
    #[must_use]
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Number of items in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if the catalog has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an item by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Find every catalog item whose name appears in `text` as a
    /// case-insensitive substring, in menu order.
    #[must_use]
    pub fn detect_in_text(&self, text: &str) -> Vec<&MenuItem> {
        let lower = text.to_lowercase();
        self.items
            .iter()
            .filter(|item| lower.contains(&item.name.to_lowercase()))
            .collect()
    }
}

impl Default for MenuCatalog {
    fn default() -> Self {
        Self::default_menu()
    }
}

fn menu_item(
    id: &str,
    name: &str,
    description: &str,
    price: &str,
    category: Category,
) -> MenuItem {
    MenuItem {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        price: price.to_string(),
        category,
        image_url: format!("/images/menu/{id}.jpg"),
    }
}

fn default_items() -> Vec<MenuItem> {
    vec![
        menu_item(
            "brisket-melt",
            "Brisket Melt",
            "Slow-smoked brisket, melted cheddar and caramelized onions on grilled sourdough",
            "$14.99",
            Category::Specials,
        ),
        menu_item(
            "h-brothers-burger",
            "H Brothers Burger",
            "Our classic smash burger with house sauce, lettuce, tomato and pickles",
            "$11.99",
            Category::Burgers,
        ),
        menu_item(
            "double-stack-burger",
            "Double Stack Burger",
            "Two smashed patties, double American cheese, grilled onions",
            "$13.99",
            Category::Burgers,
        ),
        menu_item(
            "hangover-burger",
            "Hangover Burger",
            "Smash burger topped with a fried egg, bacon and hash browns",
            "$13.49",
            Category::Burgers,
        ),
        menu_item(
            "smoked-brisket-sandwich",
            "Smoked Brisket Sandwich",
            "Chopped smoked brisket with tangy barbecue sauce and slaw on a brioche bun",
            "$14.49",
            Category::Sandwiches,
        ),
        menu_item(
            "crispy-chicken-sandwich",
            "Crispy Chicken Sandwich",
            "Buttermilk fried chicken, spicy mayo and pickles",
            "$12.49",
            Category::Sandwiches,
        ),
        menu_item(
            "house-wings",
            "House Wings",
            "Crispy wings tossed in buffalo or barbecue sauce with ranch",
            "$10.99",
            Category::Starters,
        ),
        menu_item(
            "fried-pickles",
            "Fried Pickles",
            "Beer-battered pickle chips with house ranch",
            "$7.49",
            Category::Starters,
        ),
        menu_item(
            "loaded-fries",
            "Loaded Fries",
            "Fries piled with chopped brisket, cheese sauce and jalapeños",
            "$8.99",
            Category::Sides,
        ),
        menu_item(
            "garlic-parmesan-fries",
            "Garlic Parmesan Fries",
            "Hand-cut fries tossed in garlic butter and parmesan",
            "$6.99",
            Category::Sides,
        ),
        menu_item(
            "onion-rings",
            "Onion Rings",
            "Thick-cut battered onion rings",
            "$5.99",
            Category::Sides,
        ),
    ]
}
