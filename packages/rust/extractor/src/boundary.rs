//! Item boundary resolution: which nodes inside a category scope each hold
//! exactly one dish.

use tracing::{debug, trace};

use crate::dom::{DocumentNode, NodeResult};
use crate::heuristics::Heuristics;

/// Find the item containers in `scope`.
///
/// Unless `whole_page` is set, item containers wrapping a single heading are
/// used directly. When there are none (or for a whole-page scope) every price
/// and heading node is walked upward instead. `category_heading` is the node
/// that named the category and never counts as an item.
///
/// Fails only when `scope` itself cannot be queried.
pub fn resolve_items<N: DocumentNode>(
    scope: &N,
    whole_page: bool,
    category_heading: Option<&N>,
    rules: &Heuristics,
) -> NodeResult<Vec<N>> {
    if !whole_page {
        let containers = heading_containers(scope, category_heading, rules)?;
        if !containers.is_empty() {
            debug!(count = containers.len(), "resolved item containers directly");
            return Ok(containers);
        }
    }

    let containers = walk_from_seeds(scope, category_heading, rules)?;
    debug!(count = containers.len(), "resolved item containers by ancestor walk");
    Ok(containers)
}

/// Item containers holding exactly one heading, outermost first.
fn heading_containers<N: DocumentNode>(
    scope: &N,
    category_heading: Option<&N>,
    rules: &Heuristics,
) -> NodeResult<Vec<N>> {
    let mut claimed: Vec<N> = Vec::new();
    let mut containers = Vec::new();

    // Document order puts every container before the ones nested in it.
    for container in scope.find_all(&rules.item_container)? {
        let headings = match container.find_all(&rules.heading) {
            Ok(headings) => headings,
            Err(e) => {
                trace!(error = %e, "skipping unreadable container");
                continue;
            }
        };
        let [heading] = headings.as_slice() else {
            continue;
        };
        if category_heading == Some(heading) || claimed.contains(heading) {
            continue;
        }
        claimed.push(heading.clone());
        containers.push(container);
    }

    Ok(containers)
}

/// Bounded ancestor walk from every price and heading node in `scope`.
fn walk_from_seeds<N: DocumentNode>(
    scope: &N,
    category_heading: Option<&N>,
    rules: &Heuristics,
) -> NodeResult<Vec<N>> {
    let mut containers: Vec<N> = Vec::new();

    for seed in scope.descendants()? {
        let kind = if seed.matches(&rules.price).unwrap_or(false) {
            Seed::Price
        } else if seed.matches(&rules.heading).unwrap_or(false) {
            Seed::Heading
        } else {
            continue;
        };
        if category_heading == Some(&seed) {
            continue;
        }

        match enclosing_item(&seed, kind, scope, category_heading, rules) {
            Ok(Some(container)) => {
                if !containers.contains(&container) {
                    containers.push(container);
                }
            }
            Ok(None) => trace!("no item container within reach"),
            Err(e) => debug!(error = %e, "abandoning seed"),
        }
    }

    Ok(containers)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Seed {
    Price,
    Heading,
}

/// First ancestor of `seed`, up to the depth bound and strictly below
/// `scope`, whose text carries the currency symbol. Heading seeds also need
/// a heading other than the category's own.
fn enclosing_item<N: DocumentNode>(
    seed: &N,
    kind: Seed,
    scope: &N,
    category_heading: Option<&N>,
    rules: &Heuristics,
) -> NodeResult<Option<N>> {
    for node in seed.ancestors(rules.max_depth())? {
        if node == *scope {
            break;
        }
        if !node.text()?.contains(rules.currency_symbol()) {
            continue;
        }
        if kind == Seed::Price || has_item_heading(&node, category_heading, rules)? {
            return Ok(Some(node));
        }
    }

    Ok(None)
}

fn has_item_heading<N: DocumentNode>(
    node: &N,
    category_heading: Option<&N>,
    rules: &Heuristics,
) -> NodeResult<bool> {
    Ok(node
        .find_all(&rules.heading)?
        .iter()
        .any(|heading| category_heading != Some(heading)))
}
