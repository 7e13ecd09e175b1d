//! The revision manager contract
//!
//! A revisioned object holds a weak back-reference to the manager tracking
//! its entity and notifies it when an update commits. Any backing store can
//! implement the trait; `strata-immutable-history` ships the in-memory
//! reference implementation.
//!
//! One manager instance tracks one logical entity, so none of the methods
//! take the entity as a parameter.

use super::history::{HistoryQuery, RevisionHistory};
use crate::error::Result;
use crate::revisioned::RevisionedObject;

/// History keeper for one revisioned entity
pub trait RevisionManager: Send + Sync {
    /// Accept a newly committed revision
    ///
    /// `new` must be locked. When `old` is given it is retired (its
    /// `ended_at` stamped). `new` gets its `started_at` and a back-reference
    /// to this manager, then becomes the current revision.
    fn add_revision(&self, new: &RevisionedObject, old: Option<&RevisionedObject>) -> Result<()>;

    /// The active revision, if the newest one has not been retired
    fn current_revision(&self) -> Option<RevisionedObject>;

    /// Number of tracked revisions
    fn revision_count(&self) -> usize;

    /// Query the tracked revisions
    fn revision_history(&self, query: &HistoryQuery) -> RevisionHistory;

    /// Drop every revision newer than `revision`
    ///
    /// Fails with `Error::NotFound` when `revision` is not tracked. With
    /// `activate`, the target is reopened (`ended_at` cleared, state back to
    /// locked) and becomes current again.
    fn rollback_to_revision(&self, revision: &RevisionedObject, activate: bool) -> Result<()>;
}
