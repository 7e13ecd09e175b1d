//! Revisioned extension
//!
//! A `RevisionedObject` is an `ImmutableObject` that carries revision
//! bookkeeping: a version number, a validity window, creator/comment
//! metadata and a back-reference to the manager tracking its entity.
//!
//! ## State machine
//!
//! ```text
//! Transient --finalize--> Locked --retire--> Retired
//!                           ^                   |
//!                           +----reactivate-----+   (rollback only)
//! ```
//!
//! Each successful `update` produces a new revision with `version + 1` and
//! the creator/comment passed in the `RevisionInfo` context. If the source
//! revision is bound to a manager, the manager is told about the new
//! revision once it is locked, and retires the source.
//!
//! Bookkeeping is written regardless of state: it belongs to the manager,
//! not to the object's content.

use crate::contract::{Kind, RevisionManager, State, Timestamp};
use crate::error::{Error, Result};
use crate::immutable::Immutable;
use crate::node::{Data, Managed, RevisionMeta};
use crate::object::{remove_field, set_field};
use crate::value::{Input, Value};
use serde::ser::{Serialize, Serializer};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::{Arc, Weak};
use tracing::{debug, warn};

/// Who made a revision and why
///
/// The context of `RevisionedObject` construction and updates. Passed
/// explicitly; there is no ambient default.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, Deserialize)]
#[serde(default)]
pub struct RevisionInfo {
    /// Author of the revision
    pub creator: Option<String>,
    /// Free-form description of the change
    pub comment: Option<String>,
}

impl RevisionInfo {
    /// Empty metadata
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the creator
    pub fn creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    /// Set the comment
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Immutable object with revision history support
#[derive(Debug, Clone)]
pub struct RevisionedObject(Managed);

impl RevisionedObject {
    /// A fresh transient master at version 0
    pub fn new() -> Self {
        Self::blank()
    }

    // =========================================================================
    // Fields
    // =========================================================================

    /// Value of a field
    pub fn get(&self, name: &str) -> Option<Value> {
        self.0.with_entries(|fields| fields.get(name).cloned())
    }

    /// Set a field (same rules as `ImmutableObject::set`)
    pub fn set(&self, name: &str, value: impl Into<Input>) -> Result<()> {
        set_field(&self.0, name, value.into())
    }

    /// Remove a field, returning its value
    pub fn remove(&self, name: &str) -> Result<Option<Value>> {
        remove_field(&self.0, name)
    }

    /// Check if a field is set
    pub fn contains(&self, name: &str) -> bool {
        self.0.with_entries(|fields| fields.contains_key(name))
    }

    /// Field names, sorted
    pub fn names(&self) -> Vec<String> {
        self.0.with_entries(|fields| fields.keys().cloned().collect())
    }

    // =========================================================================
    // Revision metadata
    // =========================================================================

    fn meta<R>(&self, f: impl FnOnce(&RevisionMeta) -> R) -> Option<R> {
        self.0.with_revision(f)
    }

    /// Revision number, starting at 0
    pub fn version(&self) -> u64 {
        self.meta(|m| m.version).unwrap_or_default()
    }

    /// When the manager accepted this revision
    pub fn started_at(&self) -> Option<Timestamp> {
        self.meta(|m| m.started_at).flatten()
    }

    /// When a newer revision superseded this one
    pub fn ended_at(&self) -> Option<Timestamp> {
        self.meta(|m| m.ended_at).flatten()
    }

    /// Author of this revision
    pub fn creator(&self) -> Option<String> {
        self.meta(|m| m.creator.clone()).flatten()
    }

    /// Comment of this revision
    pub fn comment(&self) -> Option<String> {
        self.meta(|m| m.comment.clone()).flatten()
    }

    /// Creator and comment together
    pub fn info(&self) -> RevisionInfo {
        RevisionInfo {
            creator: self.creator(),
            comment: self.comment(),
        }
    }

    /// The manager tracking this revision, if bound and still alive
    pub fn manager(&self) -> Option<Arc<dyn RevisionManager>> {
        self.meta(|m| m.manager.as_ref().and_then(Weak::upgrade)).flatten()
    }

    /// Check if this revision has not been superseded
    pub fn is_active(&self) -> bool {
        self.ended_at().is_none() && self.state() != State::Retired
    }

    // =========================================================================
    // Manager bookkeeping
    // =========================================================================

    /// Record when the manager accepted this revision
    pub fn stamp_started(&self, at: Timestamp) {
        self.0.with_revision_mut(|m| m.started_at = Some(at));
    }

    /// Bind this revision to the manager tracking it
    pub fn bind_manager(&self, manager: Weak<dyn RevisionManager>) {
        self.0.with_revision_mut(|m| m.manager = Some(manager));
    }

    /// Supersede this revision: stamp `ended_at` and move to `Retired`
    pub fn retire(&self, at: Timestamp) {
        self.0.with_revision_mut(|m| m.ended_at = Some(at));
        self.0.set_state(State::Retired);
    }

    /// Make this revision current again: clear `ended_at`, back to `Locked`
    pub fn reactivate(&self) {
        self.0.with_revision_mut(|m| m.ended_at = None);
        self.0.set_state(State::Locked);
    }
}

impl Default for RevisionedObject {
    fn default() -> Self {
        Self::new()
    }
}

impl Immutable for RevisionedObject {
    type Context = RevisionInfo;

    fn managed(&self) -> &Managed {
        &self.0
    }

    fn into_managed(self) -> Managed {
        self.0
    }

    fn from_managed(managed: Managed) -> Self {
        RevisionedObject(managed)
    }

    fn blank() -> Self {
        RevisionedObject(Managed::from_parts(
            Data::Fields(BTreeMap::new()),
            Some(RevisionMeta::default()),
        ))
    }

    fn after_create(&self, info: &RevisionInfo) -> Result<()> {
        self.0.with_revision_mut(|m| {
            m.creator = info.creator.clone();
            m.comment = info.comment.clone();
        });
        Ok(())
    }

    /// The clone carries a copy of the source's metadata: bump the version,
    /// take the new creator/comment and drop the inherited window.
    fn before_update(&self, info: &RevisionInfo) -> Result<()> {
        self.0.with_revision_mut(|m| {
            m.version += 1;
            m.creator = info.creator.clone();
            m.comment = info.comment.clone();
            m.started_at = None;
            m.ended_at = None;
        });
        Ok(())
    }

    fn on_commit(&self, previous: &Self) -> Result<()> {
        let bound = previous.meta(|m| m.manager.clone()).flatten();
        let Some(weak) = bound else {
            return Ok(());
        };
        match weak.upgrade() {
            Some(manager) => {
                debug!(
                    target: "strata::im::history",
                    version = self.version(),
                    previous = previous.version(),
                    "Notifying revision manager"
                );
                manager.add_revision(self, Some(previous))
            }
            None => {
                warn!(
                    target: "strata::im::history",
                    version = self.version(),
                    "Revision manager dropped before commit, new revision is untracked"
                );
                Ok(())
            }
        }
    }
}

impl TryFrom<Managed> for RevisionedObject {
    type Error = Error;

    fn try_from(managed: Managed) -> Result<Self> {
        match managed.kind() {
            Kind::Revisioned => Ok(RevisionedObject(managed)),
            other => Err(Error::ContractViolation(format!(
                "expected a revisioned object, found kind {}",
                other
            ))),
        }
    }
}

impl From<RevisionedObject> for Input {
    fn from(obj: RevisionedObject) -> Self {
        Input::Value(Value::Managed(obj.0))
    }
}

impl From<RevisionedObject> for Value {
    fn from(obj: RevisionedObject) -> Self {
        Value::Managed(obj.0)
    }
}

impl Serialize for RevisionedObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}
