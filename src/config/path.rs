//! Dotted key path resolution.
//!
//! A key such as `servers.0.port` is walked one segment at a time: map nodes
//! are indexed by key, sequence nodes by a non-negative integer.

use super::node::{Node, Table};
use super::ConfigError;

/// Trims surrounding whitespace, then surrounding `.` separators.
pub(crate) fn normalize(key: &str) -> &str {
    key.trim().trim_matches('.')
}

/// Resolves `key` against the store.
///
/// A key present verbatim at the top level always wins, so top-level keys
/// containing dots stay reachable. With `by_path` disabled nothing else is tried.
pub(crate) fn resolve<'a>(
    table: &'a Table,
    key: &str,
    by_path: bool,
) -> Result<&'a Node, ConfigError> {
    let key = normalize(key);
    if key.is_empty() {
        return Err(ConfigError::InvalidKey(key.to_string()));
    }

    if let Some(value) = table.get(key) {
        return Ok(value);
    }

    let not_found = || ConfigError::NotFound(key.to_string());

    if !by_path || !key.contains('.') {
        return Err(not_found());
    }

    let mut segments = key.split('.');
    let first = segments.next().ok_or_else(not_found)?;
    let mut current = table.get(first).ok_or_else(not_found)?;

    for segment in segments {
        current = match current {
            Node::Map(map) => map.get(segment).ok_or_else(not_found)?,
            Node::AnyMap(entries) => entries
                .iter()
                .find(|(k, _)| k.to_string() == segment)
                .map(|(_, v)| v)
                .ok_or_else(not_found)?,
            Node::Seq(items) => {
                let index_error = || ConfigError::IndexError {
                    key: key.to_string(),
                    segment: segment.to_string(),
                };
                let index: usize = segment.parse().map_err(|_| index_error())?;
                items.get(index).ok_or_else(index_error)?
            }
            Node::Null | Node::Scalar(_) => {
                return Err(ConfigError::UnsupportedPath {
                    key: key.to_string(),
                    segment: segment.to_string(),
                })
            }
        };
    }

    Ok(current)
}
