//! Field extraction from a single item container.
//!
//! Every field is resolved by an ordered list of resolvers over the same
//! node; the first one that finds something wins. Node failures propagate so
//! the caller can skip the whole item.

use menucat_shared::{MenuItem, VegStatus};

use crate::dom::{DocumentNode, NodeResult};
use crate::heuristics::Heuristics;

/// Run `resolvers` in order, stopping at the first `Some`.
fn first_found<T>(resolvers: &[&dyn Fn() -> NodeResult<Option<T>>]) -> NodeResult<Option<T>> {
    for resolve in resolvers {
        if let Some(value) = resolve()? {
            return Ok(Some(value));
        }
    }
    Ok(None)
}

/// Build a [`MenuItem`] from one item container.
///
/// `Ok(None)` means the container is not an item: no usable name was found.
pub fn extract_item<N: DocumentNode>(container: &N, rules: &Heuristics) -> NodeResult<Option<MenuItem>> {
    let name = first_found::<String>(&[
        &|| name_from_heading(container, rules),
        &|| name_from_content_element(container, rules),
        &|| name_from_first_line(container, rules),
    ])?;
    let Some(name) = name else {
        return Ok(None);
    };
    if rules.is_bare_price(&name) {
        return Ok(None);
    }

    let price = first_found::<String>(&[
        &|| price_from_tagged_node(container, rules),
        &|| price_from_text(container, rules),
    ])?
    .unwrap_or_default();

    let description = first_found::<String>(&[
        &|| description_from_paragraph(container, &name, rules),
        &|| description_from_text(container, &name, &price, rules),
    ])?
    .unwrap_or_default();

    let veg_status = first_found::<VegStatus>(&[
        &|| veg_from_icon(container),
        &|| veg_from_text(container),
    ])?
    .unwrap_or_default();

    let image_url = if rules.config().capture_images {
        image_source(container, rules)?
    } else {
        None
    };

    Ok(Some(MenuItem {
        name,
        description,
        price,
        veg_status,
        image_url,
    }))
}

// ---------------------------------------------------------------------------
// Name
// ---------------------------------------------------------------------------

fn name_from_heading<N: DocumentNode>(container: &N, rules: &Heuristics) -> NodeResult<Option<String>> {
    match container.find_first(&rules.heading)? {
        Some(heading) => Ok(non_empty(heading.text()?.trim())),
        None => Ok(None),
    }
}

fn name_from_content_element<N: DocumentNode>(
    container: &N,
    rules: &Heuristics,
) -> NodeResult<Option<String>> {
    let limit = rules.config().short_name_len;
    for node in container.find_all(&rules.content_element)? {
        let text = node.text()?;
        let text = text.trim();
        if !text.is_empty() && text.chars().count() < limit {
            return Ok(Some(text.to_string()));
        }
    }
    Ok(None)
}

/// First line of the container's text, cut before a trailing price.
fn name_from_first_line<N: DocumentNode>(container: &N, rules: &Heuristics) -> NodeResult<Option<String>> {
    let text = container.text()?;
    let Some(line) = text.lines().next() else {
        return Ok(None);
    };
    let name = match line.find(rules.currency_symbol()) {
        Some(at) if !line[..at].trim().is_empty() => &line[..at],
        _ => line,
    };
    Ok(non_empty(name.trim()))
}

// ---------------------------------------------------------------------------
// Price
// ---------------------------------------------------------------------------

fn price_from_tagged_node<N: DocumentNode>(container: &N, rules: &Heuristics) -> NodeResult<Option<String>> {
    for node in container.find_all(&rules.price)? {
        if let Some(price) = rules.normalize_price(&node.text()?) {
            return Ok(Some(price));
        }
    }
    Ok(None)
}

fn price_from_text<N: DocumentNode>(container: &N, rules: &Heuristics) -> NodeResult<Option<String>> {
    Ok(rules.normalize_price(&container.text()?))
}

// ---------------------------------------------------------------------------
// Description
// ---------------------------------------------------------------------------

fn description_from_paragraph<N: DocumentNode>(
    container: &N,
    name: &str,
    rules: &Heuristics,
) -> NodeResult<Option<String>> {
    for node in container.find_all(&rules.paragraph)? {
        let text = node.text()?;
        let text = text.trim();
        if !text.is_empty() && text != name && !text.contains(rules.currency_symbol()) {
            return Ok(Some(text.to_string()));
        }
    }
    Ok(None)
}

fn description_from_text<N: DocumentNode>(
    container: &N,
    name: &str,
    price: &str,
    rules: &Heuristics,
) -> NodeResult<Option<String>> {
    let full = container.text()?;
    Ok(Some(derive_description(
        &full,
        name,
        price,
        &rules.config().read_more_marker,
    )))
}

/// What is left of a container's text once its name and price are removed.
///
/// Only the first occurrence of each is removed, name first. Anything from
/// `read_more` onward is dropped.
pub fn derive_description(full_text: &str, name: &str, price: &str, read_more: &str) -> String {
    let mut rest = full_text.to_string();
    if !name.is_empty() {
        rest = rest.replacen(name, "", 1);
    }
    if !price.is_empty() {
        rest = rest.replacen(price, "", 1);
    }
    let mut rest = rest.trim();
    if !read_more.is_empty() {
        if let Some(at) = rest.find(read_more) {
            rest = rest[..at].trim();
        }
    }
    rest.to_string()
}

// ---------------------------------------------------------------------------
// Veg status
// ---------------------------------------------------------------------------

/// Explicit marker: `type="veg|non-veg"`, or an SVG `<use>` pointing at a
/// veg icon. The first marker in document order decides.
fn veg_from_icon<N: DocumentNode>(container: &N) -> NodeResult<Option<VegStatus>> {
    for node in container.descendants()? {
        match node.attr("type")?.as_deref() {
            Some("non-veg") => return Ok(Some(VegStatus::NonVeg)),
            Some("veg") => return Ok(Some(VegStatus::Veg)),
            _ => {}
        }
        if node.tag_name()? != "use" {
            continue;
        }
        if let Some(href) = node.attr("href")? {
            // "#non-veg-icon" also contains "veg-icon".
            if href.contains("#non-veg-icon") {
                return Ok(Some(VegStatus::NonVeg));
            }
            if href.contains("#veg-icon") {
                return Ok(Some(VegStatus::Veg));
            }
        }
    }
    Ok(None)
}

fn veg_from_text<N: DocumentNode>(container: &N) -> NodeResult<Option<VegStatus>> {
    Ok(lexical_veg_status(&container.text()?))
}

/// Non-veg wording beats a bare "Veg", which it contains.
fn lexical_veg_status(text: &str) -> Option<VegStatus> {
    if text.contains("Non-Veg") || text.contains("Non Veg") {
        Some(VegStatus::NonVeg)
    } else if text.contains("Veg") {
        Some(VegStatus::Veg)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Image
// ---------------------------------------------------------------------------

fn image_source<N: DocumentNode>(container: &N, rules: &Heuristics) -> NodeResult<Option<String>> {
    let Some(img) = container.find_first(&rules.image)? else {
        return Ok(None);
    };
    for attr in ["src", "data-src"] {
        if let Some(src) = img.attr(attr)?.as_deref().and_then(non_empty) {
            return Ok(Some(src));
        }
    }
    Ok(None)
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
