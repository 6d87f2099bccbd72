//! Typed accessors on [`Config`].
//!
//! Every accessor resolves a dotted key and converts the value it finds.
//! `None` means the key is missing or the value has the wrong shape; accessors
//! never panic on bad keys or bad data.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;

use super::cache::KindCache;
use super::{coerce, env, path, Config, ConfigError, Node};

impl Config {
    /// Resolves `key` and returns a copy of the raw node.
    ///
    /// With `by_path` set to `false` only top-level keys are considered.
    pub fn lookup(&self, key: &str, by_path: bool) -> Result<Node, ConfigError> {
        self.resolve_with(key, by_path, Node::clone)
    }

    /// Returns the raw node at a dotted key.
    pub fn get(&self, key: &str) -> Option<Node> {
        self.get_with(key, true)
    }

    pub fn get_with(&self, key: &str, by_path: bool) -> Option<Node> {
        self.checked(self.lookup(key, by_path))
    }

    pub fn string(&self, key: &str) -> Option<String> {
        self.cached(&self.cache.strings, key, || {
            let (text, is_string) = self.convert(key, "string", |node| {
                Some((coerce::to_text(node)?, node.as_str().is_some()))
            })?;

            if is_string && self.options.parse_env {
                Some(env::interpolate(&text).into_owned())
            } else {
                Some(text)
            }
        })
    }

    pub fn def_string(&self, key: &str, default: &str) -> String {
        self.string(key).unwrap_or_else(|| default.to_string())
    }

    pub fn must_string(&self, key: &str) -> String {
        self.string(key).unwrap_or_default()
    }

    pub fn int(&self, key: &str) -> Option<isize> {
        self.parse_string(key, "integer", coerce::parse_int)
    }

    pub fn def_int(&self, key: &str, default: isize) -> isize {
        self.int(key).unwrap_or(default)
    }

    pub fn must_int(&self, key: &str) -> isize {
        self.int(key).unwrap_or_default()
    }

    pub fn int64(&self, key: &str) -> Option<i64> {
        self.int(key).and_then(|value| i64::try_from(value).ok())
    }

    pub fn def_int64(&self, key: &str, default: i64) -> i64 {
        self.int64(key).unwrap_or(default)
    }

    pub fn must_int64(&self, key: &str) -> i64 {
        self.int64(key).unwrap_or_default()
    }

    /// Reads a boolean. Accepted forms (case-insensitive) are `true`, `yes`,
    /// `1` and `false`, `no`, `0`, or the empty string.
    pub fn bool(&self, key: &str) -> Option<bool> {
        self.parse_string(key, "bool", coerce::parse_bool)
    }

    pub fn def_bool(&self, key: &str, default: bool) -> bool {
        self.bool(key).unwrap_or(default)
    }

    pub fn must_bool(&self, key: &str) -> bool {
        self.bool(key).unwrap_or_default()
    }

    pub fn float(&self, key: &str) -> Option<f64> {
        self.parse_string(key, "float", coerce::parse_float)
    }

    pub fn def_float(&self, key: &str, default: f64) -> f64 {
        self.float(key).unwrap_or(default)
    }

    /// Reads a sequence whose every element is an integer or integer text.
    pub fn ints(&self, key: &str) -> Option<Vec<isize>> {
        self.convert(key, "integer list", coerce::to_ints)
    }

    pub fn def_ints(&self, key: &str, default: Vec<isize>) -> Vec<isize> {
        self.ints(key).unwrap_or(default)
    }

    /// Reads a sequence as strings. Null elements become `null` and nested
    /// containers their JSON text. No env interpolation is applied.
    pub fn strings(&self, key: &str) -> Option<Vec<String>> {
        self.cached(&self.cache.string_seqs, key, || {
            self.convert(key, "string list", coerce::to_strings)
        })
    }

    pub fn def_strings(&self, key: &str, default: Vec<String>) -> Vec<String> {
        self.strings(key).unwrap_or(default)
    }

    /// Reads a map whose every value is an integer or integer text.
    pub fn int_map(&self, key: &str) -> Option<BTreeMap<String, isize>> {
        self.cached(&self.cache.int_maps, key, || {
            self.convert(key, "integer map", coerce::to_int_map)
        })
    }

    pub fn def_int_map(
        &self,
        key: &str,
        default: BTreeMap<String, isize>,
    ) -> BTreeMap<String, isize> {
        self.int_map(key).unwrap_or(default)
    }

    /// Reads a map with every value as text, stringified like [`strings`](Self::strings).
    pub fn string_map(&self, key: &str) -> Option<BTreeMap<String, String>> {
        self.cached(&self.cache.string_maps, key, || {
            self.convert(key, "string map", coerce::to_string_map)
        })
    }

    pub fn def_string_map(
        &self,
        key: &str,
        default: BTreeMap<String, String>,
    ) -> BTreeMap<String, String> {
        self.string_map(key).unwrap_or(default)
    }

    /// Deserializes the value at `key` into `T`.
    ///
    /// An empty key maps the whole tree. Unlike the other accessors this
    /// reports why it failed: [`ConfigError::NotFound`] for a missing key,
    /// [`ConfigError::Encoding`] when the value does not fit `T`.
    ///
    /// ```
    /// use dragon_cfg::Config;
    /// use serde::Deserialize;
    /// use serde_json::json;
    ///
    /// #[derive(Deserialize)]
    /// struct Database {
    ///     host: String,
    ///     port: u16,
    /// }
    ///
    /// let config = Config::builder()
    ///     .with_data(json!({ "db": { "host": "x", "port": 5432 } }))
    ///     .build()?;
    ///
    /// let db: Database = config.structure("db")?;
    /// assert_eq!(db.port, 5432);
    /// # Ok::<(), dragon_cfg::ConfigError>(())
    /// ```
    pub fn structure<T: DeserializeOwned>(&self, key: &str) -> Result<T, ConfigError> {
        let value = if path::normalize(key).is_empty() {
            self.store.read(|table| serde_json::to_value(table))?
        } else {
            self.resolve_with(key, true, |node| serde_json::to_value(node))??
        };

        serde_json::from_value(value).map_err(|err| {
            tracing::debug!(key, error = %err, "config value does not fit target type");
            ConfigError::Encoding(err)
        })
    }

    fn checked<T>(&self, result: Result<T, ConfigError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                if !err.is_not_found() {
                    self.record(err);
                }
                None
            }
        }
    }

    /// Resolves `key` and converts the node, recording a failed conversion.
    fn convert<T>(
        &self,
        key: &str,
        target: &'static str,
        f: impl FnOnce(&Node) -> Option<T>,
    ) -> Option<T> {
        let converted = self.checked(self.resolve_with(key, true, f))?;
        if converted.is_none() {
            self.record(ConfigError::Coercion {
                key: key.to_string(),
                target,
            });
        }
        converted
    }

    /// Reads `key` as a string and parses it.
    fn parse_string<T>(
        &self,
        key: &str,
        target: &'static str,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Option<T> {
        let text = self.string(key)?;
        let parsed = parse(&text);
        if parsed.is_none() {
            self.record(ConfigError::Coercion {
                key: key.to_string(),
                target,
            });
        }
        parsed
    }

    fn cached<V: Clone>(
        &self,
        cache: &KindCache<V>,
        key: &str,
        load: impl FnOnce() -> Option<V>,
    ) -> Option<V> {
        if !self.options.enable_cache {
            return load();
        }

        if let Some(hit) = cache.get(key) {
            tracing::trace!(key, "config cache hit");
            return Some(hit);
        }

        let value = load()?;
        cache.insert(key, value.clone());
        Some(value)
    }
}
