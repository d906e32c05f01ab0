//! Tree lookups used by the mapper.
//!
//! Elements are matched on their local name, so `<ts:worksheet>` and
//! `<worksheet>` are the same thing. Lookups never include the starting node
//! itself, matching `.//tag` path semantics.

use roxmltree::Node;

/// Every descendant element named `tag`, in document order.
pub(crate) fn descendants<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.descendants().skip(1).filter(move |n| n.is_element() && n.tag_name().name() == tag)
}

/// First descendant element named `tag`.
pub(crate) fn first<'a, 'input>(node: Node<'a, 'input>, tag: &'static str) -> Option<Node<'a, 'input>> {
    descendants(node, tag).next()
}

/// Every descendant element carrying `attr`, in document order.
pub(crate) fn with_attribute<'a, 'input>(
    node: Node<'a, 'input>,
    attr: &'static str,
) -> impl Iterator<Item = (Node<'a, 'input>, &'a str)> {
    node.descendants().skip(1).filter_map(move |n| n.attribute(attr).map(|v| (n, v)))
}

/// Attribute value, or `default` when absent.
pub(crate) fn attr_or<'a>(node: Node<'a, '_>, attr: &str, default: &'a str) -> &'a str {
    node.attribute(attr).unwrap_or(default)
}

/// Attribute value when present and non-empty.
pub(crate) fn non_empty<'a>(node: Node<'a, '_>, attr: &str) -> Option<&'a str> {
    node.attribute(attr).filter(|v| !v.is_empty())
}
