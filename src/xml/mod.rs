//! Read-only access to hierarchical XML documents.
//!
//! Everything that validates or renders a document works against the
//! [`XmlNode`] trait rather than a specific parser, so any tree that can
//! answer "what is your label, your children, your attributes" can be fed
//! through the pipeline.
//!
//! - [`XmlNode`] - the capability trait
//! - [`find_child_by_tag`] and friends - child lookup helpers used everywhere
//! - [`tree`] - an owned tree built from raw XML text with `quick-xml`

pub mod tree;

pub use tree::{parse_document, Node, XmlError};

/// A node in an ordered XML tree.
///
/// A node is either a tag (an element) or a text leaf. For a text leaf,
/// [`label`](XmlNode::label) is the text itself and the node has no children
/// and no attributes. A tag holding simple text content has a text leaf as
/// its first child.
pub trait XmlNode: Sized {
    /// Tag name for elements, text content for leaves.
    fn label(&self) -> &str;

    /// `true` for elements, `false` for text leaves.
    fn is_tag(&self) -> bool;

    /// Children in document order.
    fn children(&self) -> &[Self];

    /// Value of the named attribute, if present.
    fn attribute(&self, name: &str) -> Option<&str>;

    fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }
}

/// Returns the index of the first child of `node` labelled `tag`.
///
/// `None` when no child matches, including when `node` has no children.
///
/// # Panics
///
/// In debug builds, panics if `node` is a text leaf. Asking a leaf for its
/// tagged children is a caller bug.
pub fn find_child_by_tag<N: XmlNode>(node: &N, tag: &str) -> Option<usize> {
    debug_assert!(node.is_tag(), "find_child_by_tag called on a text leaf");
    node.children()
        .iter()
        .position(|child| child.is_tag() && child.label() == tag)
}

/// Returns the first child of `node` labelled `tag`.
pub fn child_by_tag<'a, N: XmlNode>(node: &'a N, tag: &str) -> Option<&'a N> {
    find_child_by_tag(node, tag).map(|i| &node.children()[i])
}

/// Iterates over every child of `node` labelled `tag`, in document order.
pub fn children_by_tag<'a, N: XmlNode>(
    node: &'a N,
    tag: &'a str,
) -> impl Iterator<Item = &'a N> + 'a {
    node.children()
        .iter()
        .filter(move |child| child.is_tag() && child.label() == tag)
}

/// Text content carried by the first child of `node`, if that child is a leaf.
pub fn leaf_text<N: XmlNode>(node: &N) -> Option<&str> {
    node.children()
        .first()
        .filter(|child| !child.is_tag())
        .map(XmlNode::label)
}

/// Leaf text of the first child of `node` labelled `tag`.
pub fn child_text<'a, N: XmlNode>(node: &'a N, tag: &str) -> Option<&'a str> {
    child_by_tag(node, tag).and_then(leaf_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn element(name: &str, children: Vec<Node>) -> Node {
        Node::element(name, Vec::new(), children)
    }

    #[test]
    fn test_find_child_returns_first_match() {
        let node = element(
            "channel",
            vec![
                element("title", vec![]),
                element("item", vec![]),
                element("item", vec![]),
            ],
        );
        assert_eq!(find_child_by_tag(&node, "item"), Some(1));
        assert_eq!(find_child_by_tag(&node, "title"), Some(0));
    }

    #[test]
    fn test_find_child_not_found() {
        let node = element("channel", vec![element("title", vec![])]);
        assert_eq!(find_child_by_tag(&node, "link"), None);
    }

    #[test]
    fn test_find_child_no_children() {
        let node = element("channel", vec![]);
        assert_eq!(find_child_by_tag(&node, "title"), None);
    }

    #[test]
    fn test_text_leaf_never_matches_tag() {
        // A leaf whose text happens to equal the tag name is not a tag.
        let node = element("title", vec![Node::text("item"), element("item", vec![])]);
        assert_eq!(find_child_by_tag(&node, "item"), Some(1));
    }

    #[test]
    #[should_panic(expected = "text leaf")]
    #[cfg(debug_assertions)]
    fn test_find_child_on_leaf_panics_in_debug() {
        let leaf = Node::text("hello");
        let _ = find_child_by_tag(&leaf, "title");
    }

    #[test]
    fn test_leaf_text() {
        let with_text = element("title", vec![Node::text("Hello")]);
        let empty = element("title", vec![]);
        let nested = element("title", vec![element("b", vec![Node::text("x")])]);

        assert_eq!(leaf_text(&with_text), Some("Hello"));
        assert_eq!(leaf_text(&empty), None);
        assert_eq!(leaf_text(&nested), None);
    }

    #[test]
    fn test_children_by_tag_preserves_order() {
        let node = element(
            "channel",
            vec![
                element("item", vec![Node::text("a")]),
                element("title", vec![]),
                element("item", vec![Node::text("b")]),
            ],
        );
        let texts: Vec<_> = children_by_tag(&node, "item").filter_map(leaf_text).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[test]
    fn test_child_text() {
        let node = element(
            "item",
            vec![element("pubDate", vec![Node::text("Mon")])],
        );
        assert_eq!(child_text(&node, "pubDate"), Some("Mon"));
        assert_eq!(child_text(&node, "title"), None);
    }

    proptest! {
        #[test]
        fn prop_find_child_is_smallest_matching_index(
            labels in proptest::collection::vec(prop_oneof!["a", "b", "c"], 0..12),
            tag in prop_oneof!["a", "b", "c", "d"],
        ) {
            let children = labels.iter().map(|l| element(l, vec![])).collect();
            let node = element("root", children);

            let expected = labels.iter().position(|l| *l == tag);
            prop_assert_eq!(find_child_by_tag(&node, &tag), expected);
            // Idempotent
            prop_assert_eq!(find_child_by_tag(&node, &tag), expected);
        }
    }
}
