use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid config key: {0:?}")]
    InvalidKey(String),

    #[error("key not found: {0}")]
    NotFound(String),

    #[error("invalid index '{segment}' in key '{key}'")]
    IndexError { key: String, segment: String },

    #[error("cannot descend into '{segment}' of key '{key}': value is not a map or sequence")]
    UnsupportedPath { key: String, segment: String },

    #[error("value of key '{key}' cannot be converted to {target}")]
    Coercion { key: String, target: &'static str },

    #[error("failed to map config value onto target: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("config is read-only")]
    ReadOnly,

    #[error("config root must be a map")]
    NonTableRoot,

    #[error("failed to parse config options: {0}")]
    InvalidOptions(#[from] toml::de::Error),
}

impl ConfigError {
    /// Returns `true` for the plain "nothing at this key" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::NotFound(_))
    }
}
