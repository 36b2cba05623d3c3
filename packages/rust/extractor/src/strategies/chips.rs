use std::collections::HashSet;

use tracing::{debug, trace};

use crate::dom::{DocumentNode, NodeResult};
use crate::heuristics::Heuristics;

use super::{CategoryCandidate, CategoryStrategy, ScopeKind};

/// Category chips advertising their item count, e.g. `Starters (12)`.
///
/// The candidate's scope is the chip itself; a [`ChipActivator`] turns it into
/// the content scope when the category is resolved.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabeledChipStrategy;

impl<N: DocumentNode> CategoryStrategy<N> for LabeledChipStrategy {
    fn name(&self) -> &'static str {
        "labeled-chip"
    }

    fn locate(&self, page: &N, rules: &Heuristics) -> NodeResult<Vec<CategoryCandidate<N>>> {
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        for chip in page.find_all(&rules.chip)? {
            let Ok(text) = chip.text() else {
                continue;
            };
            let Some((name, count)) = Heuristics::parse_chip(&text) else {
                continue;
            };
            if !seen.insert(name.clone()) {
                trace!(name = %name, "duplicate chip");
                continue;
            }
            debug!(name = %name, advertised = count, "found category chip");
            candidates.push(CategoryCandidate {
                name,
                scope: chip,
                kind: ScopeKind::Chip,
                heading: None,
            });
        }

        Ok(candidates)
    }
}

// ---------------------------------------------------------------------------
// Activation
// ---------------------------------------------------------------------------

/// Expands a category chip into the scope holding its items.
///
/// A live session clicks the chip and waits for the re-render before
/// returning; the returned node must reflect the page after that.
pub trait ChipActivator<N: DocumentNode> {
    /// `Ok(None)` when the chip leads nowhere.
    fn activate(&self, chip: &N, rules: &Heuristics) -> NodeResult<Option<N>>;
}

/// Activator for saved snapshots, where every category is already rendered.
///
/// The scope is the nearest ancestor of the chip that contains a heading,
/// i.e. the chip together with its sibling content.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticChipActivator;

impl<N: DocumentNode> ChipActivator<N> for StaticChipActivator {
    fn activate(&self, chip: &N, rules: &Heuristics) -> NodeResult<Option<N>> {
        for ancestor in chip.ancestors(rules.max_depth())? {
            if ancestor.has_descendant(&rules.heading)? {
                return Ok(Some(ancestor));
            }
        }
        Ok(None)
    }
}
