//! The value tree held by a [`Config`](super::Config).
//!
//! Decoders for different formats hand over differently shaped trees (YAML
//! produces maps with arbitrary keys, TOML and JSON produce string-keyed maps,
//! callers of `set` hand over typed vectors and maps). Everything is normalized
//! into [`Node`] when it enters the store, so lookups only deal with one shape.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::ConfigError;

/// Top-level store: unique keys mapped to nodes.
pub type Table = BTreeMap<String, Node>;

/// A leaf value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::String(s) => f.write_str(s),
        }
    }
}

/// A node of the config tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Scalar(Scalar),
    /// String-keyed map.
    Map(BTreeMap<String, Node>),
    /// Map with scalar keys of any kind, compared by their textual form.
    AnyMap(Vec<(Scalar, Node)>),
    Seq(Vec<Node>),
}

impl Node {
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Node::Scalar(Scalar::Int(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    /// Short name of the node's shape, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Scalar(Scalar::Bool(_)) => "bool",
            Node::Scalar(Scalar::Int(_)) => "integer",
            Node::Scalar(Scalar::Float(_)) => "float",
            Node::Scalar(Scalar::String(_)) => "string",
            Node::Map(_) | Node::AnyMap(_) => "map",
            Node::Seq(_) => "sequence",
        }
    }

    /// Converts a map node into a string-keyed table.
    ///
    /// Keys of an [`Node::AnyMap`] are replaced by their textual form.
    pub fn into_table(self) -> Result<Table, ConfigError> {
        match self {
            Node::Map(map) => Ok(map),
            Node::AnyMap(entries) => Ok(entries
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect()),
            _ => Err(ConfigError::NonTableRoot),
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Null => serializer.serialize_unit(),
            Node::Scalar(scalar) => scalar.serialize(serializer),
            Node::Map(map) => map.serialize(serializer),
            Node::AnyMap(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(&key.to_string(), value)?;
                }
                map.end()
            }
            Node::Seq(items) => items.serialize(serializer),
        }
    }
}

impl From<Scalar> for Node {
    fn from(value: Scalar) -> Self {
        Node::Scalar(value)
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Scalar(Scalar::Bool(value))
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Scalar(Scalar::Int(value))
    }
}

impl From<i32> for Node {
    fn from(value: i32) -> Self {
        Node::Scalar(Scalar::Int(value.into()))
    }
}

impl From<isize> for Node {
    fn from(value: isize) -> Self {
        // isize is at most 64 bits on every supported target
        Node::Scalar(Scalar::Int(value as i64))
    }
}

impl From<u32> for Node {
    fn from(value: u32) -> Self {
        Node::Scalar(Scalar::Int(value.into()))
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Node::Scalar(Scalar::Float(value))
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Scalar(Scalar::String(value))
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Scalar(Scalar::String(value.to_string()))
    }
}

impl<T: Into<Node>> From<Vec<T>> for Node {
    fn from(values: Vec<T>) -> Self {
        Node::Seq(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Node>> From<BTreeMap<String, T>> for Node {
    fn from(map: BTreeMap<String, T>) -> Self {
        Node::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<Node>> From<HashMap<String, T>> for Node {
    fn from(map: HashMap<String, T>) -> Self {
        Node::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl From<toml::Value> for Node {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => Node::from(s),
            toml::Value::Integer(i) => Node::from(i),
            toml::Value::Float(f) => Node::from(f),
            toml::Value::Boolean(b) => Node::from(b),
            toml::Value::Datetime(dt) => Node::from(dt.to_string()),
            toml::Value::Array(arr) => Node::Seq(arr.into_iter().map(Node::from).collect()),
            toml::Value::Table(table) => Node::from(table),
        }
    }
}

impl From<toml::Table> for Node {
    fn from(table: toml::Table) -> Self {
        Node::Map(table.into_iter().map(|(k, v)| (k, Node::from(v))).collect())
    }
}

impl From<serde_json::Value> for Node {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match value {
            Json::Null => Node::Null,
            Json::Bool(b) => Node::from(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Node::from(i),
                None => n.as_f64().map_or(Node::Null, Node::from),
            },
            Json::String(s) => Node::from(s),
            Json::Array(arr) => Node::Seq(arr.into_iter().map(Node::from).collect()),
            Json::Object(obj) => {
                Node::Map(obj.into_iter().map(|(k, v)| (k, Node::from(v))).collect())
            }
        }
    }
}

impl From<serde_yaml::Value> for Node {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value as Yaml;

        match value {
            Yaml::Null => Node::Null,
            Yaml::Bool(b) => Node::from(b),
            Yaml::Number(n) => yaml_number(&n).map_or(Node::Null, Node::Scalar),
            Yaml::String(s) => Node::from(s),
            Yaml::Sequence(seq) => Node::Seq(seq.into_iter().map(Node::from).collect()),
            Yaml::Mapping(mapping) => Node::AnyMap(
                mapping
                    .into_iter()
                    .filter_map(|(key, value)| Some((yaml_key(key)?, Node::from(value))))
                    .collect(),
            ),
            Yaml::Tagged(tagged) => Node::from(tagged.value),
        }
    }
}

fn yaml_number(n: &serde_yaml::Number) -> Option<Scalar> {
    match n.as_i64() {
        Some(i) => Some(Scalar::Int(i)),
        None => n.as_f64().map(Scalar::Float),
    }
}

fn yaml_key(key: serde_yaml::Value) -> Option<Scalar> {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::Null => Some(Scalar::String("null".to_string())),
        Yaml::Bool(b) => Some(Scalar::Bool(b)),
        Yaml::Number(n) => yaml_number(&n),
        Yaml::String(s) => Some(Scalar::String(s)),
        Yaml::Tagged(tagged) => yaml_key(tagged.value),
        other => {
            tracing::warn!(?other, "dropping yaml map entry with non-scalar key");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_display() {
        assert_eq!(Scalar::Bool(true).to_string(), "true");
        assert_eq!(Scalar::Int(-42).to_string(), "-42");
        assert_eq!(Scalar::Float(1.5).to_string(), "1.5");
        assert_eq!(Scalar::Float(3.0).to_string(), "3");
        assert_eq!(Scalar::String("x y".into()).to_string(), "x y");
    }

    #[test]
    fn test_from_toml() {
        let table: toml::Table = toml::from_str(
            r#"
            name = "app"
            ports = [80, 443]

            [db]
            host = "localhost"
            "#,
        )
        .unwrap();

        let node = Node::from(table);
        let Node::Map(map) = node else {
            panic!("expected map");
        };
        assert_eq!(map["name"], Node::from("app"));
        assert_eq!(map["ports"], Node::from(vec![80i64, 443]));
        assert!(matches!(map["db"], Node::Map(_)));
    }

    #[test]
    fn test_from_json_numbers() {
        let node = Node::from(json!({ "int": 5, "float": 2.5, "big": u64::MAX, "none": null }));
        let table = node.into_table().unwrap();

        assert_eq!(table["int"], Node::from(5i64));
        assert_eq!(table["float"], Node::from(2.5));
        assert!(matches!(table["big"], Node::Scalar(Scalar::Float(_))));
        assert!(table["none"].is_null());
    }

    #[test]
    fn test_from_yaml_keeps_scalar_keys() {
        let yaml: serde_yaml::Value = serde_yaml::from_str(
            r#"
            1: one
            true: yes
            name: app
            "#,
        )
        .unwrap();

        let Node::AnyMap(entries) = Node::from(yaml) else {
            panic!("expected map with arbitrary keys");
        };
        assert_eq!(entries.len(), 3);
        assert!(entries.contains(&(Scalar::Int(1), Node::from("one"))));
        assert!(entries.contains(&(Scalar::Bool(true), Node::from("yes"))));
    }

    #[test]
    fn test_any_map_into_table_stringifies_keys() {
        let node = Node::AnyMap(vec![
            (Scalar::Int(7), Node::from("seven")),
            (Scalar::String("k".into()), Node::from(1i64)),
        ]);
        let table = node.into_table().unwrap();

        assert_eq!(table["7"], Node::from("seven"));
        assert_eq!(table["k"], Node::from(1i64));
    }

    #[test]
    fn test_non_map_root_rejected() {
        let result = Node::from(vec!["a", "b"]).into_table();
        assert!(matches!(result, Err(ConfigError::NonTableRoot)));
    }

    #[test]
    fn test_serialize_any_map_uses_string_keys() {
        let node = Node::AnyMap(vec![(Scalar::Int(1), Node::from(true))]);
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value, json!({ "1": true }));
    }
}
