//! Conversion rules from raw nodes to accessor result types.
//!
//! These functions are pure; failures are reported as `None` and turned into
//! `ConfigError::Coercion` by the accessors.

use std::collections::BTreeMap;

use super::node::{Node, Scalar};

/// Textual form of a scalar node. Null and containers have none.
pub(crate) fn to_text(node: &Node) -> Option<String> {
    node.as_scalar().map(Scalar::to_string)
}

/// Textual form of any node: scalars as text, null as `null`, containers as
/// compact JSON.
pub(crate) fn to_display_text(node: &Node) -> String {
    match node {
        Node::Scalar(scalar) => scalar.to_string(),
        Node::Null => "null".to_string(),
        // map keys are always strings, so this cannot fail
        _ => serde_json::to_string(node).unwrap_or_default(),
    }
}

pub(crate) fn parse_int(text: &str) -> Option<isize> {
    text.parse().ok()
}

pub(crate) fn parse_bool(text: &str) -> Option<bool> {
    match text.to_lowercase().as_str() {
        "" | "0" | "false" | "no" => Some(false),
        "1" | "true" | "yes" => Some(true),
        _ => None,
    }
}

pub(crate) fn parse_float(text: &str) -> Option<f64> {
    text.parse().ok()
}

/// Every element of a sequence as an integer; one bad element fails the lot.
pub(crate) fn to_ints(node: &Node) -> Option<Vec<isize>> {
    match node {
        Node::Seq(items) => items
            .iter()
            .map(|item| to_text(item).as_deref().and_then(parse_int))
            .collect(),
        _ => None,
    }
}

pub(crate) fn to_strings(node: &Node) -> Option<Vec<String>> {
    match node {
        Node::Seq(items) => Some(items.iter().map(to_display_text).collect()),
        _ => None,
    }
}

/// Converts every value of a map node, with keys in textual form.
pub(crate) fn to_map<V, F>(node: &Node, mut convert: F) -> Option<BTreeMap<String, V>>
where
    F: FnMut(&Node) -> Option<V>,
{
    match node {
        Node::Map(map) => map
            .iter()
            .map(|(key, value)| Some((key.clone(), convert(value)?)))
            .collect(),
        Node::AnyMap(entries) => entries
            .iter()
            .map(|(key, value)| Some((key.to_string(), convert(value)?)))
            .collect(),
        _ => None,
    }
}

pub(crate) fn to_int_map(node: &Node) -> Option<BTreeMap<String, isize>> {
    to_map(node, |value| to_text(value).as_deref().and_then(parse_int))
}

pub(crate) fn to_string_map(node: &Node) -> Option<BTreeMap<String, String>> {
    to_map(node, |value| Some(to_display_text(value)))
}
