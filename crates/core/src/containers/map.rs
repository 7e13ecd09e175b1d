//! Managed mapping with string keys

use crate::conform::{admit, guard};
use crate::contract::Kind;
use crate::error::{Error, Result};
use crate::immutable::Immutable;
use crate::node::{Data, Managed};
use crate::value::{Input, Value};
use std::collections::BTreeMap;

/// Immutable mapping
///
/// Keys are strings and iterate in sorted order.
#[derive(Debug, Clone)]
pub struct ImmutableMap(Managed);

container_handle!(ImmutableMap, Kind::Map, "mapping");

impl ImmutableMap {
    /// A fresh transient master with no entries
    pub fn new() -> Self {
        Self::blank()
    }

    /// Locked mapping built from `entries`
    pub fn from_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: Into<String>,
        V: Into<Input>,
    {
        Self::create().build(|map| map.extend(entries))
    }

    /// Locked mapping with every key set to its own copy of `value`
    ///
    /// Each key gets an independently conformed value: managed objects in
    /// `value`, nested ones included, are deep-cloned per key and left
    /// untouched themselves.
    pub fn from_keys<K: Into<String>>(
        keys: impl IntoIterator<Item = K>,
        value: impl Into<Input>,
    ) -> Result<Self> {
        let value = value.into();
        Self::create().build(|map| {
            guard(&map.0, &value)?;
            for key in keys {
                map.insert(key, value.detached())?;
            }
            Ok(())
        })
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Value stored under `key`
    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.with_entries(|entries| entries.get(key).cloned())
    }

    /// Check if `key` is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.with_entries(|entries| entries.contains_key(key))
    }

    /// Keys, sorted
    pub fn keys(&self) -> Vec<String> {
        self.0.with_entries(|entries| entries.keys().cloned().collect())
    }

    /// Values, in key order
    pub fn values(&self) -> Vec<Value> {
        self.0.with_entries(|entries| entries.values().cloned().collect())
    }

    /// Entries, in key order
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.0.with_entries(|entries| {
            entries
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        })
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.with_entries(BTreeMap::len)
    }

    /// Check if the mapping has no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Set `key`, returning the previous value
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Input>) -> Result<Option<Value>> {
        let value = admit(&self.0, value.into())?;
        let key = key.into();
        self.0.with_entries_mut(|entries| entries.insert(key, value))
    }

    /// Delete `key`, failing if it is absent
    pub fn remove(&self, key: &str) -> Result<Value> {
        self.0
            .with_entries_mut(|entries| entries.remove(key))?
            .ok_or_else(|| Error::KeyNotFound(key.to_string()))
    }

    /// Delete `key` if present
    pub fn pop(&self, key: &str) -> Result<Option<Value>> {
        self.0.with_entries_mut(|entries| entries.remove(key))
    }

    /// Delete and return the entry with the greatest key
    pub fn pop_last(&self) -> Result<(String, Value)> {
        self.0
            .with_entries_mut(|entries| entries.pop_last())?
            .ok_or(Error::Empty(Kind::Map))
    }

    /// Delete every entry
    pub fn clear(&self) -> Result<()> {
        self.0.with_entries_mut(BTreeMap::clear)
    }

    /// Insert every entry of `entries`
    pub fn extend<K, V>(&self, entries: impl IntoIterator<Item = (K, V)>) -> Result<()>
    where
        K: Into<String>,
        V: Into<Input>,
    {
        for (key, value) in entries {
            self.insert(key, value)?;
        }
        Ok(())
    }

    /// Value under `key`, inserting `default` first if it is absent
    ///
    /// An existing key is returned without touching the state gate.
    pub fn get_or_insert(&self, key: &str, default: impl Into<Input>) -> Result<Value> {
        if let Some(existing) = self.get(key) {
            return Ok(existing);
        }
        let value = admit(&self.0, default.into())?;
        self.0.with_entries_mut(|entries| {
            entries.insert(key.to_string(), value.clone());
        })?;
        Ok(value)
    }

    /// Shallow copy as a new locked master
    ///
    /// Fails with `Error::ContractViolation` unless this mapping is locked.
    pub fn copy(&self) -> Result<Self> {
        self.0.shallow_copy().map(ImmutableMap)
    }
}

impl Immutable for ImmutableMap {
    type Context = ();

    fn managed(&self) -> &Managed {
        &self.0
    }

    fn into_managed(self) -> Managed {
        self.0
    }

    fn from_managed(managed: Managed) -> Self {
        ImmutableMap(managed)
    }

    fn blank() -> Self {
        ImmutableMap(Managed::from_parts(Data::Map(BTreeMap::new()), None))
    }
}
