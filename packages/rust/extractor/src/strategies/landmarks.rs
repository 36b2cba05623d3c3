use std::collections::HashSet;

use tracing::debug;

use crate::dom::{DocumentNode, NodeResult};
use crate::heuristics::Heuristics;

use super::{CategoryCandidate, CategoryStrategy, ScopeKind};

/// Headings found directly, each walked upward to the content landmark that
/// holds it. The first heading reached inside a landmark names it.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadingLandmarkStrategy;

impl<N: DocumentNode> CategoryStrategy<N> for HeadingLandmarkStrategy {
    fn name(&self) -> &'static str {
        "heading-landmark"
    }

    fn locate(&self, page: &N, rules: &Heuristics) -> NodeResult<Vec<CategoryCandidate<N>>> {
        let mut claimed: Vec<N> = Vec::new();
        let mut names = HashSet::new();
        let mut candidates = Vec::new();

        for heading in page.find_all(&rules.heading)? {
            let name = match heading.text() {
                Ok(text) => text.trim().to_string(),
                Err(_) => continue,
            };
            if name.is_empty() {
                continue;
            }

            let ancestors = match heading.ancestors(rules.max_depth()) {
                Ok(chain) => chain,
                Err(e) => {
                    debug!(error = %e, "abandoning heading walk");
                    continue;
                }
            };
            let Some(landmark) = ancestors
                .into_iter()
                .find(|node| node.matches(&rules.landmark).unwrap_or(false))
            else {
                continue;
            };

            if claimed.contains(&landmark) {
                continue;
            }
            claimed.push(landmark.clone());
            if !names.insert(name.clone()) {
                continue;
            }

            candidates.push(CategoryCandidate {
                name,
                scope: landmark,
                kind: ScopeKind::Subtree,
                heading: Some(heading),
            });
        }

        Ok(candidates)
    }
}
