use serde::Deserialize;

use super::ConfigError;

/// Behaviour switches of a [`Config`](super::Config), fixed at construction.
///
/// Can be embedded in an application's own settings file:
///
/// ```
/// use dragon_cfg::Options;
///
/// let options = Options::from_toml_str("enable_cache = true\nparse_env = true")?;
/// assert!(options.enable_cache && options.parse_env && !options.read_only);
/// # Ok::<(), dragon_cfg::ConfigError>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// The store is never written after construction; reads skip locking.
    #[serde(alias = "readonly")]
    pub read_only: bool,
    /// Remember converted string, string list and map results per key.
    pub enable_cache: bool,
    /// Expand `${NAME}` / `${NAME|default}` in string values.
    pub parse_env: bool,
}

impl Options {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }
}
