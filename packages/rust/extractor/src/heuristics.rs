//! Compiled form of [`ExtractionConfig`]: the node queries and patterns every
//! stage of the engine shares.

use std::sync::LazyLock;

use regex::Regex;

use menucat_shared::ExtractionConfig;

use crate::dom::NodeQuery;

/// `Label (12)` at the end of a chip's text.
static CHIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)\s*\((\d+)\)$").expect("valid regex"));

/// Queries and patterns derived once per run from an [`ExtractionConfig`].
#[derive(Debug, Clone)]
pub struct Heuristics {
    config: ExtractionConfig,
    /// Heading-level nodes (dish and section names).
    pub heading: NodeQuery,
    /// Section containers holding at least one heading.
    pub section: NodeQuery,
    /// Content regions a heading may belong to.
    pub landmark: NodeQuery,
    /// Item containers: item tags wrapping at least one heading.
    pub item_container: NodeQuery,
    /// Nodes that may carry a `Label (N)` chip.
    pub chip: NodeQuery,
    /// Price-tagged nodes holding the currency symbol.
    pub price: NodeQuery,
    pub paragraph: NodeQuery,
    /// Generic content elements (styled-component class names).
    pub content_element: NodeQuery,
    pub image: NodeQuery,
    price_re: Regex,
    bare_price_re: Regex,
}

impl Heuristics {
    pub fn new(config: ExtractionConfig) -> Self {
        let heading = NodeQuery::tags(config.heading_tags.iter().cloned());
        let symbol = regex::escape(&config.currency_symbol);

        Self {
            section: NodeQuery::tags(config.section_tags.iter().cloned())
                .containing(heading.clone()),
            landmark: NodeQuery::tags(config.landmark_tags.iter().cloned()),
            item_container: NodeQuery::tags(config.item_container_tags.iter().cloned())
                .containing(heading.clone()),
            chip: NodeQuery::tags(config.chip_tags.iter().cloned()),
            price: NodeQuery::tags(config.price_tags.iter().cloned())
                .with_text(config.currency_symbol.clone()),
            paragraph: NodeQuery::tags(config.description_tags.iter().cloned()),
            content_element: NodeQuery::any()
                .with_attr_containing("class", config.content_class_marker.clone()),
            image: NodeQuery::tag("img"),
            price_re: Regex::new(&format!(r"{symbol}\s*(\d+)"))
                .expect("escaped currency symbol forms a valid regex"),
            bare_price_re: Regex::new(&format!(r"^{symbol}\s*\d+$"))
                .expect("escaped currency symbol forms a valid regex"),
            heading,
            config,
        }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn currency_symbol(&self) -> &str {
        &self.config.currency_symbol
    }

    pub fn max_depth(&self) -> usize {
        self.config.max_ancestor_depth
    }

    /// Find `<symbol>\s*<digits>` anywhere in `text` and normalize it to
    /// `<symbol><digits>`.
    pub fn normalize_price(&self, text: &str) -> Option<String> {
        self.price_re
            .captures(text)
            .map(|caps| format!("{}{}", self.config.currency_symbol, &caps[1]))
    }

    /// Whether `text` is nothing but a price, e.g. a price chip picked up as a name.
    pub fn is_bare_price(&self, text: &str) -> bool {
        self.bare_price_re.is_match(text.trim())
    }

    /// Split a `Label (N)` chip into its label and advertised count.
    pub fn parse_chip(text: &str) -> Option<(String, usize)> {
        let caps = CHIP_RE.captures(text.trim())?;
        let label = caps[1].trim();
        if label.is_empty() {
            return None;
        }
        let count = caps[2].parse().ok()?;
        Some((label.to_string(), count))
    }
}

impl Default for Heuristics {
    fn default() -> Self {
        Self::new(ExtractionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_normalization() {
        let h = Heuristics::default();
        assert_eq!(h.normalize_price("Rs ₹  120 only").as_deref(), Some("₹120"));
        assert_eq!(h.normalize_price("₹1,250").as_deref(), Some("₹1"));
        assert_eq!(h.normalize_price("MRP 120"), None);
    }

    #[test]
    fn price_normalization_follows_symbol() {
        let h = Heuristics::new(ExtractionConfig {
            currency_symbol: "$".into(),
            ..ExtractionConfig::default()
        });
        assert_eq!(h.normalize_price("now $ 12.50").as_deref(), Some("$12"));
        assert_eq!(h.normalize_price("₹120"), None);
    }

    #[test]
    fn bare_price_detection() {
        let h = Heuristics::default();
        assert!(h.is_bare_price("₹250"));
        assert!(h.is_bare_price(" ₹ 250 "));
        assert!(!h.is_bare_price("Thali ₹250"));
    }

    #[test]
    fn chip_parsing() {
        assert_eq!(
            Heuristics::parse_chip("  Soups & Salads (12) "),
            Some(("Soups & Salads".to_string(), 12))
        );
        assert_eq!(Heuristics::parse_chip("Starters(3)"), Some(("Starters".to_string(), 3)));
        assert_eq!(Heuristics::parse_chip("(3)"), None);
        assert_eq!(Heuristics::parse_chip("Starters (3) new"), None);
    }
}
