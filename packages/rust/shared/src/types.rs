//! Core domain types for extracted menu catalogs.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Current schema version for the run manifest format.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// VegStatus
// ---------------------------------------------------------------------------

/// Dietary marker of a dish as advertised by the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VegStatus {
    #[serde(rename = "Veg")]
    Veg,
    #[serde(rename = "Non-Veg")]
    NonVeg,
    #[default]
    #[serde(rename = "Unknown")]
    Unknown,
}

impl VegStatus {
    /// Label used in the exported JSON and CSV.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Veg => "Veg",
            Self::NonVeg => "Non-Veg",
            Self::Unknown => "Unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Combine two observations of the same dish.
    ///
    /// A known status is never replaced; `Unknown` is upgraded by whatever the
    /// incoming record knows.
    pub fn merge(self, incoming: VegStatus) -> VegStatus {
        if self.is_known() { self } else { incoming }
    }
}

impl std::fmt::Display for VegStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MenuItem
// ---------------------------------------------------------------------------

/// One dish record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Dish name, never empty after trimming.
    pub name: String,
    /// Free-text description, possibly empty.
    #[serde(default)]
    pub description: String,
    /// Currency-tagged price as shown (normalized to `₹<digits>` when parsed), possibly empty.
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub veg_status: VegStatus,
    /// Image source, when the page exposes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl MenuItem {
    /// Create an item with only a name and price set.
    pub fn new(name: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            price: price.into(),
            veg_status: VegStatus::Unknown,
            image_url: None,
        }
    }

    /// Identity used to detect duplicate records of the same dish.
    pub fn key(&self) -> ItemKey {
        ItemKey {
            name: self.name.trim().to_string(),
            price: self.price.trim().to_string(),
        }
    }
}

/// `(name, price)` identity of a [`MenuItem`], both trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemKey {
    pub name: String,
    pub price: String,
}

// ---------------------------------------------------------------------------
// MenuCategory
// ---------------------------------------------------------------------------

/// A named group of dishes, items in page order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuCategory {
    pub name: String,
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

impl MenuCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// RestaurantInfo
// ---------------------------------------------------------------------------

/// Static details of the restaurant being scraped, supplied once per run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: String,
    /// Operating hours, free text (e.g. `12:00 PM to 1:00 AM (Mon-Sun)`).
    #[serde(default)]
    pub hours: String,
    #[serde(default)]
    pub contact: String,
    /// Ordering page the snapshot was taken from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

// ---------------------------------------------------------------------------
// MenuCatalog
// ---------------------------------------------------------------------------

/// The normalized, read-only result of one extraction run.
///
/// Categories keep first-seen order and none of them is empty. Serializes as
/// an object mapping category name to its item list, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuCatalog {
    restaurant: RestaurantInfo,
    categories: Vec<MenuCategory>,
}

impl MenuCatalog {
    /// Assemble a catalog, dropping any category without items.
    pub fn new(restaurant: RestaurantInfo, categories: Vec<MenuCategory>) -> Self {
        let categories = categories
            .into_iter()
            .filter(|c| !c.items.is_empty())
            .collect();
        Self {
            restaurant,
            categories,
        }
    }

    /// A catalog with no categories at all.
    pub fn empty(restaurant: RestaurantInfo) -> Self {
        Self {
            restaurant,
            categories: Vec::new(),
        }
    }

    pub fn restaurant(&self) -> &RestaurantInfo {
        &self.restaurant
    }

    pub fn categories(&self) -> &[MenuCategory] {
        &self.categories
    }

    /// Look up a category by exact name.
    pub fn category(&self, name: &str) -> Option<&MenuCategory> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Total number of items across all categories.
    pub fn item_count(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Iterate `(category name, item)` pairs in catalog order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &MenuItem)> {
        self.categories
            .iter()
            .flat_map(|c| c.items.iter().map(move |item| (c.name.as_str(), item)))
    }
}

impl Serialize for MenuCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for category in &self.categories {
            map.serialize_entry(&category.name, &category.items)?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// ExtractionReport
// ---------------------------------------------------------------------------

/// Counters describing how an extraction run went.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// Name of the category strategy that produced the categories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    /// Categories proposed by the winning strategy.
    pub candidate_categories: usize,
    /// Item boundary containers handed to the field extractor.
    pub containers_examined: usize,
    /// Containers rejected for lack of a usable name.
    pub rejected_candidates: usize,
    /// Units (items or categories) skipped because node access failed.
    pub skipped_units: usize,
    /// Records folded into an existing record by the merge phase.
    pub merged_duplicates: usize,
    /// Categories in the final catalog.
    pub categories: usize,
    /// Items in the final catalog.
    pub items: usize,
}
