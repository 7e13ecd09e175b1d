//! Shared object handle and the state engine
//!
//! A `Managed` is a reference-counted handle to one node of an object graph.
//! Cloning the handle shares identity; `deep_clone` produces a new,
//! identity-distinct graph. Every typed wrapper (`ImmutableObject`,
//! `ImmutableMap`, ...) is a thin view over a `Managed`.
//!
//! ## Locking
//!
//! Each node sits behind its own `parking_lot::RwLock`. A node's lock is
//! never held while another node is locked for writing: recursive operations
//! (state propagation, deep clone, reachability) snapshot the child handles,
//! release the parent, then recurse. Ownership rules keep the graph acyclic,
//! so recursion terminates.

use crate::contract::{Kind, Mode, RevisionManager, State, Timestamp};
use crate::error::{Error, Result};
use crate::value::Value;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Weak};

/// Storage of a node, by container shape
#[derive(Clone)]
pub(crate) enum Data {
    /// Named fields of an object
    Fields(BTreeMap<String, Value>),
    /// Mapping entries
    Map(BTreeMap<String, Value>),
    /// Sequence items
    List(Vec<Value>),
    /// Set elements, insertion-ordered, unique by `Value` equality
    Set(Vec<Value>),
}

impl Data {
    /// Every owned sub-object, in storage order
    fn children(&self) -> Vec<Managed> {
        let values: Box<dyn Iterator<Item = &Value>> = match self {
            Data::Fields(m) | Data::Map(m) => Box::new(m.values()),
            Data::List(v) | Data::Set(v) => Box::new(v.iter()),
        };
        values.filter_map(|v| v.as_managed().cloned()).collect()
    }

    /// Same storage with every sub-object deep-cloned
    fn deep_clone(&self) -> Data {
        fn clone_value(v: &Value) -> Value {
            match v {
                Value::Managed(m) => Value::Managed(m.deep_clone()),
                other => other.clone(),
            }
        }
        match self {
            Data::Fields(m) => Data::Fields(m.iter().map(|(k, v)| (k.clone(), clone_value(v))).collect()),
            Data::Map(m) => Data::Map(m.iter().map(|(k, v)| (k.clone(), clone_value(v))).collect()),
            Data::List(v) => Data::List(v.iter().map(clone_value).collect()),
            Data::Set(v) => Data::Set(v.iter().map(clone_value).collect()),
        }
    }
}

/// Revision bookkeeping carried by revisioned objects
///
/// These fields are internal: they are written regardless of state, by the
/// update protocol and by revision managers.
#[derive(Clone, Default)]
pub(crate) struct RevisionMeta {
    pub(crate) version: u64,
    pub(crate) started_at: Option<Timestamp>,
    pub(crate) ended_at: Option<Timestamp>,
    pub(crate) creator: Option<String>,
    pub(crate) comment: Option<String>,
    pub(crate) manager: Option<Weak<dyn RevisionManager>>,
}

pub(crate) struct Node {
    pub(crate) state: State,
    pub(crate) mode: Mode,
    pub(crate) data: Data,
    pub(crate) revision: Option<RevisionMeta>,
}

impl Node {
    pub(crate) fn kind(&self) -> Kind {
        match (&self.data, &self.revision) {
            (Data::Fields(_), Some(_)) => Kind::Revisioned,
            (Data::Fields(_), None) => Kind::Object,
            (Data::Map(_), _) => Kind::Map,
            (Data::List(_), _) => Kind::List,
            (Data::Set(_), _) => Kind::Set,
        }
    }

    /// Assignment guard: writes require the transient state
    pub(crate) fn ensure_transient(&self) -> Result<()> {
        if self.state.is_transient() {
            Ok(())
        } else {
            Err(Error::Locked {
                kind: self.kind(),
                state: self.state,
            })
        }
    }
}

/// Handle to a managed object of any kind
///
/// `Clone` shares the handle (same identity). Use `deep_clone` for a copy.
#[derive(Clone)]
pub struct Managed(Arc<RwLock<Node>>);

impl Managed {
    pub(crate) fn from_parts(data: Data, revision: Option<RevisionMeta>) -> Self {
        Managed(Arc::new(RwLock::new(Node {
            state: State::Transient,
            mode: Mode::Master,
            data,
            revision,
        })))
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Node> {
        self.0.read()
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, Node> {
        self.0.write()
    }

    // =========================================================================
    // Classification
    // =========================================================================

    /// Concrete shape of the object
    pub fn kind(&self) -> Kind {
        self.read().kind()
    }

    /// Current lifecycle state
    pub fn state(&self) -> State {
        self.read().state
    }

    /// Current ownership mode
    pub fn mode(&self) -> Mode {
        self.read().mode
    }

    /// Identity comparison
    #[inline]
    pub fn ptr_eq(&self, other: &Managed) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Check that nothing else holds this handle
    pub(crate) fn is_unshared(&self) -> bool {
        Arc::strong_count(&self.0) == 1 && Arc::weak_count(&self.0) == 0
    }

    /// Number of owned sub-objects held directly by this node
    pub fn child_count(&self) -> usize {
        self.read().data.children().len()
    }

    // =========================================================================
    // State engine
    // =========================================================================

    /// Lock this object and every owned sub-object
    ///
    /// Fails with `Error::InvalidState` unless the object is transient.
    pub fn finalize(&self) -> Result<()> {
        let state = self.state();
        if !state.is_transient() {
            return Err(Error::InvalidState(state));
        }
        self.set_state(State::Locked);
        Ok(())
    }

    /// Set the state of this object and, recursively, of every owned slave
    ///
    /// Does not validate the transition.
    pub(crate) fn set_state(&self, state: State) {
        let children = {
            let mut node = self.write();
            node.state = state;
            node.data.children()
        };
        for child in children {
            child.set_state(state);
        }
    }

    pub(crate) fn set_mode(&self, mode: Mode) {
        self.write().mode = mode;
    }

    // =========================================================================
    // Storage access
    // =========================================================================

    /// Read keyed storage (fields or mapping entries)
    pub(crate) fn with_entries<R>(&self, f: impl FnOnce(&BTreeMap<String, Value>) -> R) -> R {
        let node = self.read();
        match &node.data {
            Data::Fields(m) | Data::Map(m) => f(m),
            Data::List(_) | Data::Set(_) => f(&BTreeMap::new()),
        }
    }

    /// Write keyed storage, behind the state gate
    pub(crate) fn with_entries_mut<R>(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, Value>) -> R,
    ) -> Result<R> {
        let mut node = self.write();
        node.ensure_transient()?;
        Self::entries_of(&mut node).map(f)
    }

    /// Write keyed storage regardless of state, for bookkeeping fields
    pub(crate) fn with_entries_unguarded<R>(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, Value>) -> R,
    ) -> Result<R> {
        let mut node = self.write();
        Self::entries_of(&mut node).map(f)
    }

    fn entries_of<'a>(node: &'a mut RwLockWriteGuard<'_, Node>) -> Result<&'a mut BTreeMap<String, Value>> {
        let kind = node.kind();
        match &mut node.data {
            Data::Fields(m) | Data::Map(m) => Ok(m),
            Data::List(_) | Data::Set(_) => Err(Error::ContractViolation(format!(
                "kind {} has no keyed storage",
                kind
            ))),
        }
    }

    /// Read sequential storage (sequence items or set elements)
    pub(crate) fn with_items<R>(&self, f: impl FnOnce(&[Value]) -> R) -> R {
        let node = self.read();
        match &node.data {
            Data::List(v) | Data::Set(v) => f(v),
            Data::Fields(_) | Data::Map(_) => f(&[]),
        }
    }

    /// Write sequential storage, behind the state gate
    pub(crate) fn with_items_mut<R>(&self, f: impl FnOnce(&mut Vec<Value>) -> R) -> Result<R> {
        let mut node = self.write();
        node.ensure_transient()?;
        let kind = node.kind();
        match &mut node.data {
            Data::List(v) | Data::Set(v) => Ok(f(v)),
            Data::Fields(_) | Data::Map(_) => Err(Error::ContractViolation(format!(
                "kind {} has no sequential storage",
                kind
            ))),
        }
    }

    /// Check the state gate without writing
    pub(crate) fn ensure_transient(&self) -> Result<()> {
        self.read().ensure_transient()
    }

    /// Read revision bookkeeping, if this is a revisioned object
    pub(crate) fn with_revision<R>(&self, f: impl FnOnce(&RevisionMeta) -> R) -> Option<R> {
        self.read().revision.as_ref().map(f)
    }

    /// Write revision bookkeeping regardless of state
    pub(crate) fn with_revision_mut<R>(&self, f: impl FnOnce(&mut RevisionMeta) -> R) -> Option<R> {
        self.write().revision.as_mut().map(f)
    }

    /// Shallow copy of the storage as a new locked master
    ///
    /// Only sound on locked sources: every stored sub-object is then itself
    /// locked and safe to share.
    pub(crate) fn shallow_copy(&self) -> Result<Managed> {
        let node = self.read();
        if node.state != State::Locked {
            return Err(Error::ContractViolation(format!(
                "copy() requires a locked {}, found {}",
                node.kind(),
                node.state
            )));
        }
        let copy = Managed::from_parts(node.data.clone(), node.revision.clone());
        copy.write().state = State::Locked;
        Ok(copy)
    }

    /// Deep, identity-distinct copy in the transient state
    ///
    /// Every owned sub-object is cloned as well. The mode and any revision
    /// bookkeeping are copied from the source.
    pub fn deep_clone(&self) -> Managed {
        let (mode, data, revision) = {
            let node = self.read();
            (node.mode, node.data.clone(), node.revision.clone())
        };
        let clone = Managed::from_parts(data.deep_clone(), revision);
        clone.set_mode(mode);
        clone
    }

    /// Check whether `target` is this object or one of its owned descendants
    pub fn reaches(&self, target: &Managed) -> bool {
        if self.ptr_eq(target) {
            return true;
        }
        let children = self.read().data.children();
        children.iter().any(|child| child.reaches(target))
    }
}

impl fmt::Debug for Managed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.read();
        f.debug_struct("Managed")
            .field("kind", &node.kind())
            .field("state", &node.state)
            .field("mode", &node.mode)
            .finish_non_exhaustive()
    }
}

impl Serialize for Managed {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let node = self.read();
        match &node.data {
            Data::Fields(entries) | Data::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Data::List(items) | Data::Set(items) => serializer.collect_seq(items),
        }
    }
}
