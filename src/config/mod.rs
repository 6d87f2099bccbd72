//! Typed access to a loosely structured configuration tree.

mod accessor;
mod builder;
mod cache;
mod coerce;
pub mod env;
mod error;
mod node;
mod options;
mod path;
mod store;

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use cache::ResultCache;
use store::Store;

pub use builder::ConfigBuilder;
pub use error::ConfigError;
pub use node::{Node, Scalar, Table};
pub use options::Options;

/// A configuration tree with typed, path-based accessors.
///
/// Keys are dotted paths (`db.host`, `servers.0.port`). Accessors return
/// `None` when a key is missing or its value cannot be converted; the reason
/// for anything other than a missing key is kept in an error log that can be
/// drained with [`take_errors`](Self::take_errors). The log is unbounded:
/// a long-running process that keeps reading bad keys should drain it
/// periodically.
///
/// `Config` is `Send + Sync` and every method takes `&self`, so one instance
/// can be shared between threads behind an `Arc`.
///
/// ## Example
///
/// ```
/// use dragon_cfg::Config;
/// use serde_json::json;
///
/// let config = Config::builder()
///     .enable_cache(true)
///     .with_data(json!({
///         "db": { "host": "localhost", "port": 5432 },
///         "replicas": ["a", "b"]
///     }))
///     .build()?;
///
/// assert_eq!(config.string("db.host").as_deref(), Some("localhost"));
/// assert_eq!(config.int("db.port"), Some(5432));
/// assert_eq!(config.string("replicas.1").as_deref(), Some("b"));
/// assert_eq!(config.def_int("db.timeout", 30), 30);
/// # Ok::<(), dragon_cfg::ConfigError>(())
/// ```
///
/// ## Caching
///
/// With [`Options::enable_cache`] set, string, string list and map results are
/// remembered per key. Cached results are *not* invalidated by
/// [`set`](Self::set); call [`clear_cache`](Self::clear_cache) after mutating a
/// cached config.
#[derive(Debug)]
pub struct Config {
    store: Store,
    options: Options,
    cache: ResultCache,
    errors: Mutex<Vec<ConfigError>>,
    resolutions: AtomicUsize,
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl Config {
    /// Creates an empty config.
    pub fn new(options: Options) -> Self {
        Self::from_table(Table::new(), options)
    }

    /// Creates a new configuration builder.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub(crate) fn from_table(table: Table, options: Options) -> Self {
        Self {
            store: Store::new(table, options.read_only),
            options,
            cache: ResultCache::default(),
            errors: Mutex::new(Vec::new()),
            resolutions: AtomicUsize::new(0),
        }
    }

    pub fn options(&self) -> Options {
        self.options
    }

    /// Sets the value at a dotted key, creating intermediate maps.
    ///
    /// Fails with [`ConfigError::ReadOnly`] on a read-only config. Cached
    /// results for the key are left untouched.
    pub fn set(&self, key: &str, value: impl Into<Node>) -> Result<(), ConfigError> {
        let normalized = path::normalize(key);
        if normalized.is_empty() {
            return Err(ConfigError::InvalidKey(key.to_string()));
        }

        let segments: Vec<&str> = normalized.split('.').collect();
        let value = value.into();
        tracing::trace!(key = normalized, kind = value.kind(), "setting config value");
        self.store
            .write(|table| store::insert_at_path(table, &segments, value))
    }

    pub fn is_empty(&self) -> bool {
        self.store.read(|table| table.is_empty())
    }

    /// Returns a copy of the whole tree.
    pub fn data(&self) -> Table {
        self.store.read(Table::clone)
    }

    /// Drops every cached accessor result.
    pub fn clear_cache(&self) {
        tracing::debug!(entries = self.cache.len(), "clearing config cache");
        self.cache.clear();
    }

    /// Number of cached accessor results across all kinds.
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    /// Number of times the tree has been walked to resolve a key.
    pub fn resolution_count(&self) -> usize {
        self.resolutions.load(Ordering::Relaxed)
    }

    /// Drains the errors recorded by failed lookups and conversions.
    ///
    /// Nothing else ever shrinks the log, so every failed access keeps its
    /// error until the next call.
    pub fn take_errors(&self) -> Vec<ConfigError> {
        std::mem::take(&mut *self.errors.lock())
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.lock().is_empty()
    }

    /// Resolves `key` and runs `f` on the node while the store is borrowed.
    pub(crate) fn resolve_with<R>(
        &self,
        key: &str,
        by_path: bool,
        f: impl FnOnce(&Node) -> R,
    ) -> Result<R, ConfigError> {
        self.resolutions.fetch_add(1, Ordering::Relaxed);
        self.store
            .read(|table| path::resolve(table, key, by_path).map(f))
    }

    pub(crate) fn record(&self, err: ConfigError) {
        tracing::debug!(error = %err, "config access failed");
        self.errors.lock().push(err);
    }
}
