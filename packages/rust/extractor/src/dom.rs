//! Read-only view over a rendered document tree.
//!
//! The engine only ever talks to [`DocumentNode`]: a handle that can report its
//! tag, text, attributes, parent, and descendants, any of which may fail if
//! the page changed after the handle was captured. [`HtmlSnapshot`] is the
//! `scraper`-backed implementation used for saved pages; a live browser
//! session can provide its own.

use scraper::{ElementRef, Html, Node};
use tracing::trace;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure to query a node. Always recoverable: the caller skips the unit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NodeError {
    /// The document changed after this handle was captured.
    #[error("stale node: the document changed after it was captured")]
    Stale,

    /// The node cannot answer this kind of query.
    #[error("node does not support {capability}")]
    Unsupported { capability: &'static str },
}

pub type NodeResult<T> = std::result::Result<T, NodeError>;

// ---------------------------------------------------------------------------
// NodeQuery
// ---------------------------------------------------------------------------

/// Structural predicate over nodes. All clauses must hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeQuery {
    tags: Vec<String>,
    attr_contains: Vec<(String, String)>,
    attr_equals: Vec<(String, String)>,
    text_contains: Option<String>,
    has_descendant: Option<Box<NodeQuery>>,
}

impl NodeQuery {
    /// Matches every node.
    pub fn any() -> Self {
        Self::default()
    }

    /// Matches nodes whose tag is any of `tags` (case-insensitive).
    pub fn tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn tag(tag: impl Into<String>) -> Self {
        Self::tags([tag])
    }

    /// Require attribute `name` to contain `fragment`.
    pub fn with_attr_containing(mut self, name: impl Into<String>, fragment: impl Into<String>) -> Self {
        self.attr_contains.push((name.into(), fragment.into()));
        self
    }

    /// Require attribute `name` to equal `value` exactly.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attr_equals.push((name.into(), value.into()));
        self
    }

    /// Require the node's text to contain `fragment`.
    pub fn with_text(mut self, fragment: impl Into<String>) -> Self {
        self.text_contains = Some(fragment.into());
        self
    }

    /// Require at least one descendant matching `inner`.
    pub fn containing(mut self, inner: NodeQuery) -> Self {
        self.has_descendant = Some(Box::new(inner));
        self
    }
}

// ---------------------------------------------------------------------------
// DocumentNode
// ---------------------------------------------------------------------------

/// Handle into a rendered document tree. The engine never mutates the tree.
///
/// Equality is node identity: two handles to the same element are equal.
pub trait DocumentNode: Clone + PartialEq + Sized {
    /// Lowercase tag name.
    fn tag_name(&self) -> NodeResult<String>;

    /// Rendered text of the node and its subtree, normalized by [`clean_text`].
    fn text(&self) -> NodeResult<String>;

    fn attr(&self, name: &str) -> NodeResult<Option<String>>;

    /// The parent element, `None` at the root.
    fn parent(&self) -> NodeResult<Option<Self>>;

    /// Element descendants in document order, excluding the node itself.
    fn descendants(&self) -> NodeResult<Vec<Self>>;

    /// Test the node against `query`.
    fn matches(&self, query: &NodeQuery) -> NodeResult<bool> {
        if !query.tags.is_empty() {
            let tag = self.tag_name()?;
            if !query.tags.iter().any(|t| t.eq_ignore_ascii_case(&tag)) {
                return Ok(false);
            }
        }
        for (name, fragment) in &query.attr_contains {
            match self.attr(name)? {
                Some(value) if value.contains(fragment.as_str()) => {}
                _ => return Ok(false),
            }
        }
        for (name, expected) in &query.attr_equals {
            match self.attr(name)? {
                Some(value) if value == *expected => {}
                _ => return Ok(false),
            }
        }
        if let Some(fragment) = &query.text_contains {
            if !self.text()?.contains(fragment.as_str()) {
                return Ok(false);
            }
        }
        if let Some(inner) = &query.has_descendant {
            if !self.has_descendant(inner)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// All descendants matching `query`, in document order.
    ///
    /// Fails only if this node cannot enumerate its subtree. A descendant that
    /// fails its own test is left out.
    fn find_all(&self, query: &NodeQuery) -> NodeResult<Vec<Self>> {
        let mut found = Vec::new();
        for node in self.descendants()? {
            match node.matches(query) {
                Ok(true) => found.push(node),
                Ok(false) => {}
                Err(e) => trace!(error = %e, "skipping unreadable node"),
            }
        }
        Ok(found)
    }

    /// First descendant matching `query`.
    fn find_first(&self, query: &NodeQuery) -> NodeResult<Option<Self>> {
        for node in self.descendants()? {
            match node.matches(query) {
                Ok(true) => return Ok(Some(node)),
                Ok(false) => {}
                Err(e) => trace!(error = %e, "skipping unreadable node"),
            }
        }
        Ok(None)
    }

    fn has_descendant(&self, query: &NodeQuery) -> NodeResult<bool> {
        Ok(self.find_first(query)?.is_some())
    }

    /// Up to `max_depth` ancestors, nearest first.
    fn ancestors(&self, max_depth: usize) -> NodeResult<Vec<Self>> {
        let mut chain = Vec::new();
        let mut current = self.parent()?;
        while let Some(node) = current {
            if chain.len() == max_depth {
                break;
            }
            current = node.parent()?;
            chain.push(node);
        }
        Ok(chain)
    }
}

/// Collapse runs of horizontal whitespace, drop blank lines, and join the
/// remaining lines with `\n`. Approximates what a browser reports as the
/// rendered text of an element.
pub fn clean_text(raw: &str) -> String {
    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// scraper-backed snapshot
// ---------------------------------------------------------------------------

/// A saved, fully rendered page parsed with `scraper`.
pub struct HtmlSnapshot {
    document: Html,
}

impl HtmlSnapshot {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// The `<html>` element.
    pub fn root(&self) -> HtmlNode<'_> {
        HtmlNode {
            element: self.document.root_element(),
        }
    }
}

/// Element handle into an [`HtmlSnapshot`]. Never stale.
#[derive(Debug, Clone, Copy)]
pub struct HtmlNode<'a> {
    element: ElementRef<'a>,
}

impl<'a> HtmlNode<'a> {
    pub fn element(&self) -> ElementRef<'a> {
        self.element
    }
}

impl PartialEq for HtmlNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.element.id() == other.element.id()
    }
}

/// Elements whose text a browser never renders.
const NON_RENDERED_TAGS: &[&str] = &["script", "style", "noscript", "template"];

fn collect_rendered_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if !NON_RENDERED_TAGS.contains(&el.name()) => {
                if let Some(child) = ElementRef::wrap(child) {
                    collect_rendered_text(child, out);
                }
            }
            _ => {}
        }
    }
}

impl DocumentNode for HtmlNode<'_> {
    fn tag_name(&self) -> NodeResult<String> {
        Ok(self.element.value().name().to_ascii_lowercase())
    }

    fn text(&self) -> NodeResult<String> {
        let mut raw = String::new();
        collect_rendered_text(self.element, &mut raw);
        Ok(clean_text(&raw))
    }

    fn attr(&self, name: &str) -> NodeResult<Option<String>> {
        Ok(self.element.value().attr(name).map(str::to_string))
    }

    fn parent(&self) -> NodeResult<Option<Self>> {
        Ok(self
            .element
            .parent()
            .and_then(ElementRef::wrap)
            .map(|element| HtmlNode { element }))
    }

    fn descendants(&self) -> NodeResult<Vec<Self>> {
        Ok(self
            .element
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .map(|element| HtmlNode { element })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Test support
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Wraps an [`HtmlNode`] so that any element carrying `data-stale`
    /// behaves like a handle invalidated by a re-render: everything but its
    /// tag name fails with [`NodeError::Stale`].
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub(crate) struct StaleNode<'a>(pub HtmlNode<'a>);

    impl StaleNode<'_> {
        fn check(&self) -> NodeResult<()> {
            if self.0.element.value().attr("data-stale").is_some() {
                Err(NodeError::Stale)
            } else {
                Ok(())
            }
        }
    }

    impl DocumentNode for StaleNode<'_> {
        fn tag_name(&self) -> NodeResult<String> {
            self.0.tag_name()
        }

        fn text(&self) -> NodeResult<String> {
            self.check()?;
            self.0.text()
        }

        fn attr(&self, name: &str) -> NodeResult<Option<String>> {
            self.check()?;
            self.0.attr(name)
        }

        fn parent(&self) -> NodeResult<Option<Self>> {
            self.check()?;
            Ok(self.0.parent()?.map(StaleNode))
        }

        fn descendants(&self) -> NodeResult<Vec<Self>> {
            self.check()?;
            Ok(self.0.descendants()?.into_iter().map(StaleNode).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::StaleNode;
    use super::*;

    const PAGE: &str = r#"<html><body>
        <section class="sc-menu">
            <h4>Starters</h4>
            <div class="sc-card" data-id="1"><h4>Paneer Tikka</h4><span>₹250</span></div>
            <div class="sc-card" data-id="2"><h4>Hara Kebab</h4><span>₹220</span></div>
        </section>
        <div class="footer">No prices here</div>
    </body></html>"#;

    #[test]
    fn clean_text_collapses_whitespace() {
        let raw = "\n   Paneer   Tikka \n\n\t ₹250\n  ";
        assert_eq!(clean_text(raw), "Paneer Tikka\n₹250");
        assert_eq!(clean_text("   "), "");
    }

    #[test]
    fn text_leaves_out_scripts_and_styles() {
        let html = r#"<html><head><style>.sc-card { color: red }</style></head><body>
            <div class="sc-card"><h4>Paneer Tikka</h4><script>window.__menu = {"price": "₹1"};</script>
            <noscript>Enable JavaScript</noscript><span>₹250</span></div>
        </body></html>"#;
        let snap = HtmlSnapshot::parse(html);
        let card = snap.root().find_first(&NodeQuery::tag("div")).unwrap().unwrap();

        assert_eq!(card.text().unwrap(), "Paneer Tikka\n₹250");
        assert!(!snap.root().text().unwrap().contains("color"));
    }

    #[test]
    fn find_all_by_tag_and_descendant() {
        let snap = HtmlSnapshot::parse(PAGE);
        let root = snap.root();

        let headings = root.find_all(&NodeQuery::tag("h4")).unwrap();
        assert_eq!(headings.len(), 3);
        assert_eq!(headings[0].text().unwrap(), "Starters");

        let cards = root
            .find_all(&NodeQuery::tag("div").containing(NodeQuery::tag("h4")))
            .unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1].attr("data-id").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn attribute_and_text_clauses() {
        let snap = HtmlSnapshot::parse(PAGE);
        let root = snap.root();

        let by_class = root
            .find_all(&NodeQuery::any().with_attr_containing("class", "sc-"))
            .unwrap();
        assert_eq!(by_class.len(), 3);

        let exact = root
            .find_all(&NodeQuery::tag("div").with_attr("data-id", "2"))
            .unwrap();
        assert_eq!(exact.len(), 1);

        let priced = root
            .find_all(&NodeQuery::tag("span").with_text("₹"))
            .unwrap();
        assert_eq!(priced.len(), 2);
    }

    #[test]
    fn parent_and_identity() {
        let snap = HtmlSnapshot::parse(PAGE);
        let root = snap.root();
        let first = root.find_first(&NodeQuery::tag("span")).unwrap().unwrap();
        let card = first.parent().unwrap().unwrap();
        assert_eq!(card.tag_name().unwrap(), "div");

        let again = root
            .find_first(&NodeQuery::tag("div").with_attr("data-id", "1"))
            .unwrap()
            .unwrap();
        assert!(card == again);
        assert!(root.parent().unwrap().is_none());
    }

    #[test]
    fn ancestors_are_bounded() {
        let snap = HtmlSnapshot::parse(PAGE);
        let span = snap.root().find_first(&NodeQuery::tag("span")).unwrap().unwrap();

        let tags: Vec<String> = span
            .ancestors(10)
            .unwrap()
            .iter()
            .map(|n| n.tag_name().unwrap())
            .collect();
        assert_eq!(tags, vec!["div", "section", "body", "html"]);
        assert_eq!(span.ancestors(2).unwrap().len(), 2);
        assert!(span.ancestors(0).unwrap().is_empty());
    }

    #[test]
    fn stale_nodes_are_left_out_of_queries() {
        let html = r#"<html><body>
            <div data-stale="1"><h4>Gone</h4></div>
            <div><h4>Still Here</h4></div>
        </body></html>"#;
        let snap = HtmlSnapshot::parse(html);
        let root = StaleNode(snap.root());

        let cards = root
            .find_all(&NodeQuery::tag("div").containing(NodeQuery::tag("h4")))
            .unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].text().unwrap(), "Still Here");
    }

    #[test]
    fn stale_node_queries_fail() {
        let html = r#"<html><body><div data-stale="1"><h4>Gone</h4></div></body></html>"#;
        let snap = HtmlSnapshot::parse(html);
        let div = snap.root().find_first(&NodeQuery::tag("div")).unwrap().unwrap();
        let stale = StaleNode(div);

        assert_eq!(stale.text(), Err(NodeError::Stale));
        assert_eq!(
            stale.find_all(&NodeQuery::tag("h4")).unwrap_err(),
            NodeError::Stale
        );
        assert_eq!(stale.tag_name().unwrap(), "div");
    }
}
