//! Named accessors for native decorations, memoized per aggregator.
//!
//! Resolving a decoration name (`isIsolated_<wp>`) is done once per working
//! point and reused for every later object. The table belongs to the
//! aggregator instance that created it; there is no process-wide state.

use std::collections::HashMap;

use ph_core::{AuxStore, AuxValue};

use crate::features::MISSING_FLAG;

/// Accessor for one named `char` decoration.
///
/// Only [`AuxValue::Char`] values count as available; a decoration of the
/// same name with another type reads as missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuxAccessor {
    name: String,
}

impl AuxAccessor {
    /// Accessor for decoration `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Decoration name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether `store` carries this decoration as a `char`.
    pub fn is_available(&self, store: &AuxStore) -> bool {
        matches!(store.get(&self.name), Some(AuxValue::Char(_)))
    }

    /// Decoration value, if present with the `char` type.
    pub fn get(&self, store: &AuxStore) -> Option<f64> {
        match store.get(&self.name)? {
            AuxValue::Char(v) => Some(f64::from(v)),
            other => {
                log::debug!("decoration '{}' has type {other:?}, expected char", self.name);
                None
            }
        }
    }
}

/// Lazily populated working point → accessor table.
#[derive(Debug, Clone, Default)]
pub struct AccessorCache {
    prefix: String,
    accessors: HashMap<String, AuxAccessor>,
}

impl AccessorCache {
    /// Cache whose accessors read `prefix + <wp>`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), accessors: HashMap::new() }
    }

    /// Accessor for `wp`, created on first use.
    pub fn accessor(&mut self, wp: &str) -> &AuxAccessor {
        if !self.accessors.contains_key(wp) {
            let acc = AuxAccessor::new(format!("{}{}", self.prefix, wp));
            self.accessors.insert(wp.to_string(), acc);
        }
        &self.accessors[wp]
    }

    /// Tri-state flag for `wp`: the decoration value if present,
    /// [`MISSING_FLAG`] otherwise.
    pub fn read_flag(&mut self, wp: &str, store: &AuxStore) -> f64 {
        let acc = self.accessor(wp);
        match acc.get(store) {
            Some(v) => v,
            None => {
                log::trace!("decoration '{}' not available, filling {MISSING_FLAG}", acc.name());
                MISSING_FLAG
            }
        }
    }

    /// Number of accessors created so far.
    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    /// Whether no accessor has been created yet.
    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }
}

/// The two accessor tables used by the native electron path.
#[derive(Debug, Clone)]
pub struct ElectronAccessors {
    /// `isIsolated_<wp>` decorations.
    pub isolation: AccessorCache,
    /// `<wp>` PID decorations.
    pub pid: AccessorCache,
}

impl Default for ElectronAccessors {
    fn default() -> Self {
        Self { isolation: AccessorCache::new("isIsolated_"), pid: AccessorCache::new("") }
    }
}
