use crate::dom::{DocumentNode, NodeResult};
use crate::heuristics::Heuristics;

use super::{CategoryCandidate, CategoryStrategy, ScopeKind};

/// The catch-all: one category spanning the whole page.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatStrategy;

impl FlatStrategy {
    pub const NAME: &'static str = "flat";

    pub fn candidates<N: DocumentNode>(&self, page: &N, rules: &Heuristics) -> Vec<CategoryCandidate<N>> {
        vec![CategoryCandidate {
            name: rules.config().fallback_category.clone(),
            scope: page.clone(),
            kind: ScopeKind::WholePage,
            heading: None,
        }]
    }
}

impl<N: DocumentNode> CategoryStrategy<N> for FlatStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn locate(&self, page: &N, rules: &Heuristics) -> NodeResult<Vec<CategoryCandidate<N>>> {
        Ok(self.candidates(page, rules))
    }
}
