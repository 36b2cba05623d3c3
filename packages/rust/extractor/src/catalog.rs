//! Working catalog accumulated during one extraction pass.

use std::collections::HashMap;

use menucat_shared::{MenuCatalog, MenuCategory, MenuItem, RestaurantInfo};

use crate::merge::dedup_items;

/// Accumulates items per category, first-seen category order.
///
/// Adding to a category name that already exists appends to it.
#[derive(Debug, Clone)]
pub struct CatalogBuilder {
    restaurant: RestaurantInfo,
    categories: Vec<MenuCategory>,
    index: HashMap<String, usize>,
}

impl CatalogBuilder {
    pub fn new(restaurant: RestaurantInfo) -> Self {
        Self {
            restaurant,
            categories: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register `name` without adding items, fixing its position.
    pub fn open_category(&mut self, name: &str) -> &mut MenuCategory {
        let at = match self.index.get(name) {
            Some(&at) => at,
            None => {
                self.index.insert(name.to_string(), self.categories.len());
                self.categories.push(MenuCategory::new(name));
                self.categories.len() - 1
            }
        };
        &mut self.categories[at]
    }

    pub fn push_item(&mut self, category: &str, item: MenuItem) {
        self.open_category(category).items.push(item);
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Deduplicate every category, drop empty ones, and freeze the result.
    ///
    /// Also returns the number of records merged away.
    pub fn normalize(self) -> (MenuCatalog, usize) {
        let mut merged = 0;
        let categories = self
            .categories
            .into_iter()
            .map(|category| {
                let (items, folded) = dedup_items(category.items);
                merged += folded;
                MenuCategory {
                    name: category.name,
                    items,
                }
            })
            .collect();
        (MenuCatalog::new(self.restaurant, categories), merged)
    }
}
