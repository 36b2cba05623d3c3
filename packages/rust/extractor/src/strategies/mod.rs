//! Category discovery strategies and the chain that orders them.
//!
//! Each strategy looks at the whole page and proposes `(name, scope)`
//! candidates. Strategies are tried in priority order; the first one that
//! proposes anything wins the page and later ones are never consulted.
//! [`FlatStrategy`] always proposes its catch-all category, so the chain
//! always ends with a result.

mod chips;
mod flat;
mod landmarks;
mod sections;

use tracing::{debug, warn};

use crate::dom::{DocumentNode, NodeResult};
use crate::heuristics::Heuristics;

pub use chips::{ChipActivator, LabeledChipStrategy, StaticChipActivator};
pub use flat::FlatStrategy;
pub use landmarks::HeadingLandmarkStrategy;
pub use sections::SectionHeadingStrategy;

// ---------------------------------------------------------------------------
// Candidates
// ---------------------------------------------------------------------------

/// How a candidate's scope node is to be searched for items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// The scope is the category's own subtree.
    Subtree,
    /// The scope is a category chip that must be activated first.
    Chip,
    /// The scope is the entire page, no category structure known.
    WholePage,
}

/// One proposed category.
#[derive(Debug, Clone)]
pub struct CategoryCandidate<N> {
    pub name: String,
    pub scope: N,
    pub kind: ScopeKind,
    /// The heading node that named this category, if any. It is never an item.
    pub heading: Option<N>,
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// A category discovery strategy.
pub trait CategoryStrategy<N: DocumentNode> {
    /// Short name for tracing and reports.
    fn name(&self) -> &'static str;

    /// Propose categories for `page`. An empty result means "not applicable".
    fn locate(&self, page: &N, rules: &Heuristics) -> NodeResult<Vec<CategoryCandidate<N>>>;
}

// ---------------------------------------------------------------------------
// Chain
// ---------------------------------------------------------------------------

/// Result of running the chain over a page.
#[derive(Debug, Clone)]
pub struct Located<N> {
    /// Name of the strategy that produced the candidates.
    pub strategy: &'static str,
    pub candidates: Vec<CategoryCandidate<N>>,
}

/// What one strategy would propose, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategySurvey {
    pub strategy: &'static str,
    pub categories: Vec<String>,
    pub error: Option<String>,
}

/// Holds strategies in priority order.
pub struct StrategyChain<N: DocumentNode> {
    strategies: Vec<Box<dyn CategoryStrategy<N>>>,
}

impl<N: DocumentNode> StrategyChain<N> {
    /// Section headings, then labeled chips, then heading landmarks, then the
    /// flat catch-all.
    pub fn standard() -> Self {
        Self {
            strategies: vec![
                Box::new(SectionHeadingStrategy),
                Box::new(LabeledChipStrategy),
                Box::new(HeadingLandmarkStrategy),
                Box::new(FlatStrategy),
            ],
        }
    }

    /// A chain with caller-chosen strategies. [`FlatStrategy`] is appended
    /// when missing so that the chain always produces a result.
    pub fn with_strategies(mut strategies: Vec<Box<dyn CategoryStrategy<N>>>) -> Self {
        let has_flat = strategies.iter().any(|s| s.name() == FlatStrategy::NAME);
        if !has_flat {
            strategies.push(Box::new(FlatStrategy));
        }
        Self { strategies }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Run strategies in order and return the first non-empty result.
    ///
    /// A strategy whose page query fails counts as having found nothing.
    pub fn locate(&self, page: &N, rules: &Heuristics) -> Located<N> {
        for strategy in &self.strategies {
            match strategy.locate(page, rules) {
                Ok(candidates) if !candidates.is_empty() => {
                    debug!(
                        strategy = strategy.name(),
                        candidates = candidates.len(),
                        "category strategy matched"
                    );
                    return Located {
                        strategy: strategy.name(),
                        candidates,
                    };
                }
                Ok(_) => debug!(strategy = strategy.name(), "category strategy found nothing"),
                Err(e) => warn!(strategy = strategy.name(), error = %e, "category strategy failed"),
            }
        }

        // Only reachable with a chain built around a custom flat strategy that
        // returned nothing; fall back to the built-in one.
        Located {
            strategy: FlatStrategy::NAME,
            candidates: FlatStrategy.candidates(page, rules),
        }
    }

    /// Run every strategy, reporting what each would propose.
    pub fn survey(&self, page: &N, rules: &Heuristics) -> Vec<StrategySurvey> {
        self.strategies
            .iter()
            .map(|strategy| match strategy.locate(page, rules) {
                Ok(candidates) => StrategySurvey {
                    strategy: strategy.name(),
                    categories: candidates.into_iter().map(|c| c.name).collect(),
                    error: None,
                },
                Err(e) => StrategySurvey {
                    strategy: strategy.name(),
                    categories: Vec::new(),
                    error: Some(e.to_string()),
                },
            })
            .collect()
    }
}

impl<N: DocumentNode> Default for StrategyChain<N> {
    fn default() -> Self {
        Self::standard()
    }
}

/// Trimmed text of the first heading under `node`, if non-empty.
pub(crate) fn first_heading<N: DocumentNode>(
    node: &N,
    rules: &Heuristics,
) -> NodeResult<Option<(String, N)>> {
    for heading in node.find_all(&rules.heading)? {
        let text = match heading.text() {
            Ok(t) => t.trim().to_string(),
            Err(_) => continue,
        };
        if !text.is_empty() {
            return Ok(Some((text, heading)));
        }
    }
    Ok(None)
}
