//! Heuristic menu extraction from rendered ordering pages.
//!
//! This crate provides:
//! - [`dom`]: the read-only [`DocumentNode`] view and its `scraper` snapshot
//! - [`strategies`]: category discovery, tried in priority order
//! - [`boundary`]: which nodes hold exactly one dish
//! - [`fields`]: name, price, description, veg status and image of a dish
//! - [`merge`] and [`catalog`]: deduplication and normalization
//! - [`engine`]: the single extraction pass tying them together

pub mod boundary;
pub mod catalog;
pub mod dom;
pub mod engine;
pub mod fields;
pub mod heuristics;
pub mod merge;
pub mod strategies;

pub use catalog::CatalogBuilder;
pub use dom::{DocumentNode, HtmlNode, HtmlSnapshot, NodeError, NodeQuery, NodeResult};
pub use engine::{Extraction, MenuExtractor, extract_html, extract_menu};
pub use heuristics::Heuristics;
pub use merge::{dedup_items, merge_records};
pub use strategies::{
    CategoryCandidate, CategoryStrategy, ChipActivator, FlatStrategy, HeadingLandmarkStrategy,
    LabeledChipStrategy, ScopeKind, SectionHeadingStrategy, StaticChipActivator, StrategyChain,
    StrategySurvey,
};

#[cfg(test)]
mod tests {
    use super::*;
    use menucat_shared::{ExtractionConfig, RestaurantInfo, VegStatus};

    fn load_fixture(name: &str) -> String {
        let path = format!("{}/../../../fixtures/html/{name}", env!("CARGO_MANIFEST_DIR"));
        std::fs::read_to_string(&path).unwrap_or_else(|_| panic!("missing fixture: {path}"))
    }

    fn extract_fixture(name: &str) -> Extraction {
        extract_html(
            &load_fixture(name),
            RestaurantInfo::default(),
            &ExtractionConfig::default(),
        )
    }

    fn category_names(extraction: &Extraction) -> Vec<&str> {
        extraction
            .catalog
            .categories()
            .iter()
            .map(|c| c.name.as_str())
            .collect()
    }

    // -----------------------------------------------------------------------
    // Page layouts
    // -----------------------------------------------------------------------

    #[test]
    fn section_layout() {
        let extraction = extract_fixture("sections.html");
        assert_eq!(extraction.report.strategy.as_deref(), Some("section-heading"));
        // The price-chip section is rejected and the empty one pruned.
        assert_eq!(extraction.report.candidate_categories, 3);
        assert_eq!(category_names(&extraction), vec!["Starters", "Main Course"]);
        assert_eq!(extraction.report.merged_duplicates, 1);

        let starters = extraction.catalog.category("Starters").unwrap();
        assert_eq!(starters.items.len(), 2);
        assert_eq!(starters.items[0].name, "Tandoori Chicken Tikka");
        assert_eq!(starters.items[0].veg_status, VegStatus::NonVeg);
        assert_eq!(
            starters.items[1].description,
            "Cottage cheese cubes grilled in the tandoor"
        );
        assert_eq!(starters.items[1].veg_status, VegStatus::Veg);

        let mains = extraction.catalog.category("Main Course").unwrap();
        let dal = &mains.items[0];
        assert_eq!(dal.price, "₹395");
        assert_eq!(dal.description, "Black lentils simmered overnight, finished with cream");
        assert_eq!(dal.veg_status, VegStatus::Unknown);
        let chicken = &mains.items[1];
        assert_eq!(chicken.veg_status, VegStatus::NonVeg);
        assert_eq!(
            chicken.image_url.as_deref(),
            Some("https://cdn.example.com/menu/butter-chicken.jpg")
        );
    }

    #[test]
    fn chip_layout() {
        let extraction = extract_fixture("chips.html");
        assert_eq!(extraction.report.strategy.as_deref(), Some("labeled-chip"));
        assert_eq!(category_names(&extraction), vec!["Soups", "Desserts"]);

        let soups = extraction.catalog.category("Soups").unwrap();
        assert_eq!(soups.items.len(), 2);
        assert_eq!(soups.items[0].veg_status, VegStatus::Veg);
        assert_eq!(soups.items[0].image_url.as_deref(), Some("/img/tomato-shorba.jpg"));
        assert_eq!(soups.items[1].veg_status, VegStatus::NonVeg);
        assert_eq!(extraction.catalog.category("Desserts").unwrap().items.len(), 1);
    }

    #[test]
    fn landmark_layout() {
        let extraction = extract_fixture("landmarks.html");
        assert_eq!(extraction.report.strategy.as_deref(), Some("heading-landmark"));
        assert_eq!(category_names(&extraction), vec!["Cocktails", "Bar Bites"]);
        assert_eq!(extraction.report.rejected_candidates, 1);

        let cocktails = extraction.catalog.category("Cocktails").unwrap();
        let names: Vec<_> = cocktails.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Tamasha Sour", "Kokum Mojito"]);
        assert_eq!(cocktails.items[0].description, "Whisky, lemon, egg white");

        let bites = extraction.catalog.category("Bar Bites").unwrap();
        assert_eq!(bites.items[0].veg_status, VegStatus::NonVeg);
        assert_eq!(bites.items[1].veg_status, VegStatus::Veg);
    }

    #[test]
    fn flat_layout() {
        let extraction = extract_fixture("flat.html");
        assert_eq!(extraction.report.strategy.as_deref(), Some("flat"));
        assert_eq!(category_names(&extraction), vec!["Menu Items"]);

        let all = extraction.catalog.category("Menu Items").unwrap();
        let names: Vec<_> = all.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Veg Biryani", "Chicken Biryani", "Boondi Raita"]);
        assert_eq!(all.items[0].description, "Fragrant basmati layered with vegetables");
        assert_eq!(extraction.report.merged_duplicates, 1);
    }

    #[test]
    fn fallback_category_name_is_configurable() {
        let extraction = extract_html(
            &load_fixture("flat.html"),
            RestaurantInfo::default(),
            &ExtractionConfig {
                fallback_category: "All Items".into(),
                ..ExtractionConfig::default()
            },
        );
        assert_eq!(category_names(&extraction), vec!["All Items"]);
    }

    // -----------------------------------------------------------------------
    // Catalog invariants
    // -----------------------------------------------------------------------

    #[test]
    fn every_fixture_keeps_catalog_invariants() {
        for fixture in ["sections.html", "chips.html", "landmarks.html", "flat.html"] {
            let extraction = extract_fixture(fixture);
            for category in extraction.catalog.categories() {
                assert!(!category.items.is_empty(), "{fixture}: empty {}", category.name);
                let mut keys = std::collections::HashSet::new();
                for item in &category.items {
                    assert!(!item.name.trim().is_empty(), "{fixture}: unnamed item");
                    assert!(keys.insert(item.key()), "{fixture}: duplicate {}", item.name);
                }
            }
            assert_eq!(extraction.report.items, extraction.catalog.item_count());
        }
    }
}
