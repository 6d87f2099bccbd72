//! Typed, path-based access to decoded configuration trees.
//!
//! Hand a [`Config`] a tree decoded from TOML, JSON or YAML, then read values
//! by dotted key (`db.host`, `servers.0.port`) as the type you need.

pub mod config;

pub use config::{env, Config, ConfigBuilder, ConfigError, Node, Options, Scalar, Table};
