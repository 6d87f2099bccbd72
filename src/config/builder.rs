use super::node::{Node, Table};
use super::{path, store, Config, ConfigError, Options};

/// Data handed to the builder, applied in registration order.
#[derive(Debug)]
enum Source {
    Root(Node),
    Value { key: String, value: Node },
}

/// Builder for a [`Config`].
///
/// Data comes already decoded: a `toml::Table`, a `serde_json::Value`, a
/// `serde_yaml::Value` or anything else convertible into a [`Node`]. Sources
/// are applied in registration order; a later top-level key replaces an
/// earlier one as a whole.
///
/// ## Example
///
/// ```
/// use dragon_cfg::Config;
///
/// let table: toml::Table = toml::from_str(r#"
///     [server]
///     host = "localhost"
///     port = 8080
/// "#).unwrap();
///
/// let config = Config::builder()
///     .read_only(true)
///     .with_data(table)
///     .with_value("server.port", 9090i64)
///     .build()?;
///
/// assert_eq!(config.int("server.port"), Some(9090));
/// # Ok::<(), dragon_cfg::ConfigError>(())
/// ```
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct ConfigBuilder {
    options: Options,
    sources: Vec<Source>,
}

impl ConfigBuilder {
    /// Replaces all options at once.
    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.options.read_only = read_only;
        self
    }

    pub fn enable_cache(mut self, enable_cache: bool) -> Self {
        self.options.enable_cache = enable_cache;
        self
    }

    pub fn parse_env(mut self, parse_env: bool) -> Self {
        self.options.parse_env = parse_env;
        self
    }

    /// Adds a decoded tree. Its root must be a map.
    pub fn with_data(mut self, data: impl Into<Node>) -> Self {
        self.sources.push(Source::Root(data.into()));
        self
    }

    /// Sets a single value at a dotted key.
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Node>) -> Self {
        self.sources.push(Source::Value {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    pub fn build(self) -> Result<Config, ConfigError> {
        let mut table = Table::new();

        for source in self.sources {
            match source {
                Source::Root(node) => table.extend(node.into_table()?),
                Source::Value { key, value } => {
                    let normalized = path::normalize(&key);
                    if normalized.is_empty() {
                        return Err(ConfigError::InvalidKey(key));
                    }
                    let segments: Vec<&str> = normalized.split('.').collect();
                    store::insert_at_path(&mut table, &segments, value);
                }
            }
        }

        tracing::debug!(
            keys = table.len(),
            read_only = self.options.read_only,
            enable_cache = self.options.enable_cache,
            parse_env = self.options.parse_env,
            "config built"
        );
        Ok(Config::from_table(table, self.options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_empty() {
        let config = Config::builder().build().unwrap();
        assert!(config.is_empty());
        assert_eq!(config.options(), Options::default());
    }

    #[test]
    fn test_option_setters() {
        let config = Config::builder()
            .read_only(true)
            .enable_cache(true)
            .parse_env(true)
            .build()
            .unwrap();

        assert_eq!(
            config.options(),
            Options {
                read_only: true,
                enable_cache: true,
                parse_env: true,
            }
        );
    }

    #[test]
    fn test_later_sources_replace_top_level_keys() {
        let config = Config::builder()
            .with_data(json!({ "db": { "host": "a", "port": 1 }, "name": "x" }))
            .with_data(json!({ "db": { "host": "b" } }))
            .build()
            .unwrap();

        assert_eq!(config.string("db.host").as_deref(), Some("b"));
        assert_eq!(config.int("db.port"), None);
        assert_eq!(config.string("name").as_deref(), Some("x"));
    }

    #[test]
    fn test_with_value_nested() {
        let config = Config::builder()
            .with_data(json!({ "db": { "host": "a" } }))
            .with_value("db.port", 5432i64)
            .build()
            .unwrap();

        assert_eq!(config.string("db.host").as_deref(), Some("a"));
        assert_eq!(config.int("db.port"), Some(5432));
    }

    #[test]
    fn test_non_map_root_fails() {
        let result = Config::builder().with_data(json!([1, 2])).build();
        assert!(matches!(result, Err(ConfigError::NonTableRoot)));
    }

    #[test]
    fn test_empty_value_key_fails() {
        let result = Config::builder().with_value(" . ", 1i64).build();
        assert!(matches!(result, Err(ConfigError::InvalidKey(_))));
    }
}
