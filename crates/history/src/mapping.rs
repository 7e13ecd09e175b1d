//! Keyed collection of revision histories
//!
//! Each key owns its own `SimpleRevisionManager`. Assigning a key starts a
//! fresh history for it; reading a key returns that history's current
//! revision.

use crate::clock::{Clock, SystemClock};
use crate::config::ManagerConfig;
use crate::simple::SimpleRevisionManager;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use strata_immutable_core::{Error, Result, RevisionManager, RevisionedObject};
use tracing::debug;

/// Map from keys to revisioned entities
pub struct RevisionedMapping {
    entries: RwLock<BTreeMap<String, Arc<SimpleRevisionManager>>>,
    clock: Arc<dyn Clock>,
    config: ManagerConfig,
}

impl RevisionedMapping {
    /// Empty mapping on the system clock
    pub fn new() -> Self {
        Self::with_clock_and_config(Arc::new(SystemClock::new()), ManagerConfig::default())
    }

    /// Empty mapping whose managers share `clock` and `config`
    pub fn with_clock_and_config(clock: Arc<dyn Clock>, config: ManagerConfig) -> Self {
        RevisionedMapping {
            entries: RwLock::new(BTreeMap::new()),
            clock,
            config,
        }
    }

    /// Start a new history for `key` with `revision` as its first entry
    ///
    /// Any previous history under `key` is dropped. Returns the new manager.
    ///
    /// # Errors
    ///
    /// `Error::ContractViolation` if `revision` is not locked.
    pub fn insert(
        &self,
        key: impl Into<String>,
        revision: &RevisionedObject,
    ) -> Result<Arc<SimpleRevisionManager>> {
        let key = key.into();
        let manager =
            SimpleRevisionManager::with_clock_and_config(self.clock.clone(), self.config.clone());
        manager.add_revision(revision, None)?;

        let replaced = self
            .entries
            .write()
            .insert(key.clone(), manager.clone())
            .is_some();
        debug!(
            target: "strata::im::history",
            key = %key,
            version = revision.version(),
            replaced,
            "History started"
        );
        Ok(manager)
    }

    /// Current revision under `key`
    ///
    /// `None` if the key is absent or its newest revision was retired.
    pub fn get(&self, key: &str) -> Option<RevisionedObject> {
        self.entries
            .read()
            .get(key)
            .and_then(|manager| manager.current_revision())
    }

    /// Manager tracking `key`
    ///
    /// # Errors
    ///
    /// `Error::NotFound` if the key is absent.
    pub fn revision_manager(&self, key: &str) -> Result<Arc<SimpleRevisionManager>> {
        self.entries
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("no revisioned entry for key {}", key)))
    }

    /// Drop the history under `key`
    ///
    /// # Errors
    ///
    /// `Error::NotFound` if the key is absent.
    pub fn remove(&self, key: &str) -> Result<Arc<SimpleRevisionManager>> {
        let removed = self.entries.write().remove(key);
        removed.ok_or_else(|| Error::NotFound(format!("no revisioned entry for key {}", key)))
    }

    /// Check if `key` has a history
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Keys, sorted
    pub fn keys(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the mapping has no keys
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RevisionedMapping {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RevisionedMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevisionedMapping")
            .field("keys", &self.keys())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
