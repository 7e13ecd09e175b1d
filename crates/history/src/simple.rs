//! In-memory revision manager
//!
//! `SimpleRevisionManager` keeps the revisions of one entity in an ordered
//! list (oldest first). It implements the full `RevisionManager` contract:
//!
//! - `add_revision` retires the previous revision and stamps the new one
//!   from the injected `Clock`
//! - `current_revision` is the newest revision, unless it was retired
//! - `revision_history` answers a `HistoryQuery` over a snapshot
//! - `rollback_to_revision` truncates the list after the target
//!
//! Managers are always handed out as `Arc<SimpleRevisionManager>`: revisions
//! hold a weak back-reference to the manager that tracks them.

use crate::clock::{Clock, SystemClock};
use crate::config::ManagerConfig;
use parking_lot::{Mutex, RwLock};
use std::sync::{Arc, Weak};
use strata_immutable_core::{
    Error, HistoryQuery, Immutable, Result, RevisionHistory, RevisionManager, RevisionedObject,
    State, Timestamp,
};
use tracing::{debug, info};

/// Reference revision manager for one entity
pub struct SimpleRevisionManager {
    revisions: RwLock<Vec<RevisionedObject>>,
    clock: Arc<dyn Clock>,
    last_stamp: Mutex<Option<Timestamp>>,
    config: ManagerConfig,
    me: Weak<SimpleRevisionManager>,
}

impl SimpleRevisionManager {
    /// Manager on the system clock with default settings
    pub fn new() -> Arc<Self> {
        Self::with_clock_and_config(Arc::new(SystemClock::new()), ManagerConfig::default())
    }

    /// Manager on an injected clock
    pub fn with_clock(clock: Arc<dyn Clock>) -> Arc<Self> {
        Self::with_clock_and_config(clock, ManagerConfig::default())
    }

    /// Manager on the system clock with `config`
    pub fn with_config(config: ManagerConfig) -> Arc<Self> {
        Self::with_clock_and_config(Arc::new(SystemClock::new()), config)
    }

    /// Manager on an injected clock with `config`
    pub fn with_clock_and_config(clock: Arc<dyn Clock>, config: ManagerConfig) -> Arc<Self> {
        Arc::new_cyclic(|me| SimpleRevisionManager {
            revisions: RwLock::new(Vec::new()),
            clock,
            last_stamp: Mutex::new(None),
            config,
            me: me.clone(),
        })
    }

    /// Settings in effect
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Every tracked revision, oldest first
    pub fn revisions(&self) -> Vec<RevisionedObject> {
        self.revisions.read().clone()
    }

    /// Check whether `revision` is tracked here
    pub fn tracks(&self, revision: &RevisionedObject) -> bool {
        self.position(revision).is_some()
    }

    fn position(&self, revision: &RevisionedObject) -> Option<usize> {
        self.revisions
            .read()
            .iter()
            .position(|r| r.is_same(revision))
    }

    /// Next timestamp from the clock
    ///
    /// With `strict_timestamps`, a reading that does not move past the last
    /// stamp is replaced by the last stamp plus one microsecond.
    fn next_stamp(&self) -> Timestamp {
        let now = self.clock.now();
        let mut last = self.last_stamp.lock();
        let stamp = match *last {
            Some(prev) if self.config.strict_timestamps && !now.is_after(prev) => prev.next(),
            _ => now,
        };
        *last = Some(stamp);
        stamp
    }
}

impl RevisionManager for SimpleRevisionManager {
    fn add_revision(&self, new: &RevisionedObject, old: Option<&RevisionedObject>) -> Result<()> {
        if new.state() != State::Locked {
            return Err(Error::ContractViolation(format!(
                "only locked revisions can be added, got a {} one",
                new.state()
            )));
        }
        if self.tracks(new) {
            return Err(Error::ContractViolation(format!(
                "revision {} is already tracked",
                new.version()
            )));
        }

        if let Some(old) = old {
            let is_current = self
                .current_revision()
                .is_some_and(|current| current.is_same(old));
            if !is_current {
                return Err(Error::ContractViolation(format!(
                    "revision {} is not current and cannot be superseded",
                    old.version()
                )));
            }
        }

        let now = self.next_stamp();
        if let Some(old) = old {
            old.retire(now);
        }
        new.stamp_started(now);
        let me: Weak<dyn RevisionManager> = self.me.clone();
        new.bind_manager(me);

        let count = {
            let mut revisions = self.revisions.write();
            revisions.push(new.clone());
            revisions.len()
        };
        debug!(
            target: "strata::im::history",
            version = new.version(),
            retired = ?old.map(RevisionedObject::version),
            started_at = %now,
            count,
            "Revision added"
        );
        Ok(())
    }

    fn current_revision(&self) -> Option<RevisionedObject> {
        self.revisions
            .read()
            .last()
            .filter(|r| r.ended_at().is_none())
            .cloned()
    }

    fn revision_count(&self) -> usize {
        self.revisions.read().len()
    }

    fn revision_history(&self, query: &HistoryQuery) -> RevisionHistory {
        let mut query = query.clone();
        if query.batch_size.is_none() {
            query.batch_size = self.config.default_batch_size;
        }
        RevisionHistory::new(self.revisions(), query)
    }

    fn rollback_to_revision(&self, revision: &RevisionedObject, activate: bool) -> Result<()> {
        let idx = self.position(revision).ok_or_else(|| {
            Error::NotFound(format!(
                "revision {} is not tracked by this manager",
                revision.version()
            ))
        })?;

        let truncated = {
            let mut revisions = self.revisions.write();
            let removed = revisions.len() - (idx + 1);
            revisions.truncate(idx + 1);
            removed
        };
        if activate {
            revision.reactivate();
        }
        info!(
            target: "strata::im::history",
            version = revision.version(),
            truncated,
            activate,
            "Rolled back to revision"
        );
        Ok(())
    }
}

impl std::fmt::Debug for SimpleRevisionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleRevisionManager")
            .field("revisions", &self.revision_count())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
