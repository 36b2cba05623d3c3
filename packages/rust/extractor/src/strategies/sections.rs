use tracing::{debug, trace};

use crate::dom::{DocumentNode, NodeResult};
use crate::heuristics::Heuristics;

use super::{CategoryCandidate, CategoryStrategy, ScopeKind, first_heading};

/// Section containers with a heading; the first heading names the category.
///
/// Short sections that carry a price are price chips styled as sections and
/// are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct SectionHeadingStrategy;

impl<N: DocumentNode> CategoryStrategy<N> for SectionHeadingStrategy {
    fn name(&self) -> &'static str {
        "section-heading"
    }

    fn locate(&self, page: &N, rules: &Heuristics) -> NodeResult<Vec<CategoryCandidate<N>>> {
        let mut candidates = Vec::new();

        for section in page.find_all(&rules.section)? {
            let text = match section.text() {
                Ok(text) => text,
                Err(e) => {
                    debug!(error = %e, "skipping unreadable section");
                    continue;
                }
            };
            if text.contains(rules.currency_symbol())
                && text.chars().count() < rules.config().short_section_len
            {
                trace!(text = %text, "rejecting price chip section");
                continue;
            }

            match first_heading(&section, rules) {
                Ok(Some((name, heading))) => candidates.push(CategoryCandidate {
                    name,
                    scope: section,
                    kind: ScopeKind::Subtree,
                    heading: Some(heading),
                }),
                Ok(None) => {}
                Err(e) => debug!(error = %e, "skipping section without readable heading"),
            }
        }

        Ok(candidates)
    }
}
