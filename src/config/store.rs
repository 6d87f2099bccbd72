use parking_lot::RwLock;

use super::node::{Node, Table};
use super::ConfigError;

/// Backing storage of a config.
///
/// A read-only config owns its table outright and is never written, so reads
/// need no lock. Otherwise every read and write goes through one lock.
#[derive(Debug)]
pub(crate) enum Store {
    Shared(RwLock<Table>),
    Frozen(Table),
}

impl Store {
    pub(crate) fn new(table: Table, read_only: bool) -> Self {
        if read_only {
            Store::Frozen(table)
        } else {
            Store::Shared(RwLock::new(table))
        }
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&Table) -> R) -> R {
        match self {
            Store::Shared(lock) => f(&lock.read()),
            Store::Frozen(table) => f(table),
        }
    }

    pub(crate) fn write<R>(&self, f: impl FnOnce(&mut Table) -> R) -> Result<R, ConfigError> {
        match self {
            Store::Shared(lock) => Ok(f(&mut lock.write())),
            Store::Frozen(_) => Err(ConfigError::ReadOnly),
        }
    }
}

/// Inserts `value` at `path`, creating intermediate maps as needed.
///
/// An intermediate node that is not a map is replaced by an empty one.
pub(crate) fn insert_at_path(table: &mut Table, path: &[&str], value: Node) {
    let Some((first, rest)) = path.split_first() else {
        return;
    };

    if rest.is_empty() {
        table.insert(first.to_string(), value);
        return;
    }

    let slot = table
        .entry(first.to_string())
        .or_insert_with(|| Node::Map(Table::new()));

    if !matches!(slot, Node::Map(_)) {
        let previous = std::mem::replace(slot, Node::Null);
        // keep the entries of a map with arbitrary keys, drop anything else
        *slot = Node::Map(previous.into_table().unwrap_or_default());
    }

    if let Node::Map(nested) = slot {
        insert_at_path(nested, rest, value);
    }
}
