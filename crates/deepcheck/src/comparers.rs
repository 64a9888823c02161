//! Built-in equality comparers.

use deepcheck_values::{NodeRef, ValueKind};
use unicode_normalization::UnicodeNormalization;

use crate::comparer::EqualityComparer;

pub const DOM_NODE_COMPARER: &str = "dom-node";
pub const UNICODE_EQUIVALENCE_COMPARER: &str = "unicode-equivalence";

/// Compares DOM-like nodes by type, name, text, attributes and children.
///
/// Attribute order is irrelevant; child order is not.
pub fn dom_node_comparer() -> EqualityComparer {
    EqualityComparer::new(DOM_NODE_COMPARER, |ctx| {
        Ok(match (ctx.a.as_node(), ctx.b.as_node()) {
            (Some(a), Some(b)) => nodes_equal(a, b),
            _ => false,
        })
    })
    .prototype("Node")
}

fn nodes_equal(a: &NodeRef, b: &NodeRef) -> bool {
    if a.ptr_eq(b) {
        return true;
    }

    if a.node_type() != b.node_type()
        || a.name() != b.name()
        || a.text_content() != b.text_content()
        || a.attributes().len() != b.attributes().len()
        || a.children().len() != b.children().len()
    {
        return false;
    }

    let mut attrs_a = a.attributes().to_vec();
    let mut attrs_b = b.attributes().to_vec();
    attrs_a.sort();
    attrs_b.sort();
    if attrs_a != attrs_b {
        return false;
    }

    a.children()
        .iter()
        .zip(b.children())
        .all(|(x, y)| nodes_equal(x, y))
}

/// Treats strings as equal when they are canonically equivalent Unicode,
/// e.g. a precomposed `é` and `e` followed by a combining acute accent.
///
/// Honours `ignore_case`. Not part of the standard registry.
pub fn unicode_equivalence_comparer() -> EqualityComparer {
    EqualityComparer::new(UNICODE_EQUIVALENCE_COMPARER, |ctx| {
        let (Some(a), Some(b)) = (ctx.a.as_str(), ctx.b.as_str()) else {
            return Ok(false);
        };
        let fold = |s: &str| {
            let normalized: String = s.nfc().collect();
            if ctx.options.ignore_case {
                normalized.to_lowercase()
            } else {
                normalized
            }
        };
        Ok(fold(a) == fold(b))
    })
    .type_of(ValueKind::String)
}
