//! One extraction pass: locate categories, resolve item boundaries, extract
//! fields, then merge and normalize.

use tracing::{debug, info, instrument, warn};

use menucat_shared::{ExtractionConfig, ExtractionReport, MenuCatalog, RestaurantInfo};

use crate::boundary::resolve_items;
use crate::catalog::CatalogBuilder;
use crate::dom::{DocumentNode, HtmlNode, HtmlSnapshot};
use crate::fields::extract_item;
use crate::heuristics::Heuristics;
use crate::strategies::{
    CategoryCandidate, ChipActivator, ScopeKind, StaticChipActivator, StrategyChain,
    StrategySurvey,
};

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Output of one pass: the read-only catalog and how it was obtained.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub catalog: MenuCatalog,
    pub report: ExtractionReport,
}

// ---------------------------------------------------------------------------
// MenuExtractor
// ---------------------------------------------------------------------------

/// Heuristic menu extractor over any [`DocumentNode`] implementation.
pub struct MenuExtractor<N: DocumentNode> {
    rules: Heuristics,
    chain: StrategyChain<N>,
}

impl<N: DocumentNode> MenuExtractor<N> {
    /// Extractor with the standard strategy chain.
    pub fn new(config: ExtractionConfig) -> Self {
        Self::with_chain(config, StrategyChain::standard())
    }

    pub fn with_chain(config: ExtractionConfig, chain: StrategyChain<N>) -> Self {
        Self {
            rules: Heuristics::new(config),
            chain,
        }
    }

    pub fn rules(&self) -> &Heuristics {
        &self.rules
    }

    /// Extract the catalog of `page`. Never fails: the worst outcome is an
    /// empty catalog.
    pub fn extract(
        &self,
        page: &N,
        restaurant: RestaurantInfo,
        activator: &dyn ChipActivator<N>,
    ) -> Extraction {
        self.extract_observed(page, restaurant, activator, &mut |_, _| {})
    }

    /// Like [`extract`](Self::extract), calling `on_category` with each
    /// category name and the number of items found for it before merging.
    #[instrument(skip_all, fields(restaurant = %restaurant.name))]
    pub fn extract_observed(
        &self,
        page: &N,
        restaurant: RestaurantInfo,
        activator: &dyn ChipActivator<N>,
        on_category: &mut dyn FnMut(&str, usize),
    ) -> Extraction {
        let located = self.chain.locate(page, &self.rules);
        let mut report = ExtractionReport {
            strategy: Some(located.strategy.to_string()),
            candidate_categories: located.candidates.len(),
            ..ExtractionReport::default()
        };
        info!(
            strategy = located.strategy,
            categories = located.candidates.len(),
            "located categories"
        );

        let mut builder = CatalogBuilder::new(restaurant);
        for candidate in located.candidates {
            let name = candidate.name.trim().to_string();
            if name.is_empty() {
                continue;
            }
            let found = self.fill_category(&mut builder, &name, candidate, activator, &mut report);
            on_category(&name, found);
        }

        let (catalog, merged) = builder.normalize();
        report.merged_duplicates = merged;
        report.categories = catalog.categories().len();
        report.items = catalog.item_count();

        info!(
            categories = report.categories,
            items = report.items,
            merged = report.merged_duplicates,
            skipped = report.skipped_units,
            "extraction finished"
        );
        Extraction { catalog, report }
    }

    /// Dry run: what every strategy would propose for `page`.
    pub fn survey(&self, page: &N) -> Vec<StrategySurvey> {
        self.chain.survey(page, &self.rules)
    }

    /// Resolve and extract one category's items into `builder`. Returns how
    /// many items were added.
    fn fill_category(
        &self,
        builder: &mut CatalogBuilder,
        name: &str,
        candidate: CategoryCandidate<N>,
        activator: &dyn ChipActivator<N>,
        report: &mut ExtractionReport,
    ) -> usize {
        builder.open_category(name);

        let scope = match candidate.kind {
            ScopeKind::Chip => match activator.activate(&candidate.scope, &self.rules) {
                Ok(Some(scope)) => scope,
                Ok(None) => {
                    debug!(category = name, "chip has no content scope");
                    return 0;
                }
                Err(e) => {
                    warn!(category = name, error = %e, "skipping category: chip activation failed");
                    report.skipped_units += 1;
                    return 0;
                }
            },
            ScopeKind::Subtree | ScopeKind::WholePage => candidate.scope,
        };

        let containers = match resolve_items(
            &scope,
            candidate.kind == ScopeKind::WholePage,
            candidate.heading.as_ref(),
            &self.rules,
        ) {
            Ok(containers) => containers,
            Err(e) => {
                warn!(category = name, error = %e, "skipping category: scope unreadable");
                report.skipped_units += 1;
                return 0;
            }
        };

        let mut found = 0;
        for container in containers {
            report.containers_examined += 1;
            match extract_item(&container, &self.rules) {
                Ok(Some(item)) => {
                    builder.push_item(name, item);
                    found += 1;
                }
                Ok(None) => report.rejected_candidates += 1,
                Err(e) => {
                    warn!(category = name, error = %e, "skipping item: node unreadable");
                    report.skipped_units += 1;
                }
            }
        }
        debug!(category = name, items = found, "category resolved");
        found
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Extract `page` with the standard chain.
pub fn extract_menu<N: DocumentNode>(
    page: &N,
    restaurant: RestaurantInfo,
    config: &ExtractionConfig,
    activator: &dyn ChipActivator<N>,
) -> Extraction {
    MenuExtractor::new(config.clone()).extract(page, restaurant, activator)
}

/// Extract a saved, fully rendered page.
pub fn extract_html(html: &str, restaurant: RestaurantInfo, config: &ExtractionConfig) -> Extraction {
    let snapshot = HtmlSnapshot::parse(html);
    let root: HtmlNode<'_> = snapshot.root();
    extract_menu(&root, restaurant, config, &StaticChipActivator)
}
