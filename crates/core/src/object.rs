//! Plain immutable object with named fields
//!
//! Every write goes through `set`/`remove`, which apply the ownership guard,
//! the state gate and conformance. Reads are unrestricted.
//!
//! ## Internal names
//!
//! Names of the form `__name__` are bookkeeping fields. They bypass the
//! state gate, so they stay writable on locked objects, and they accept
//! primitives only: a managed object stored there would escape ownership
//! tracking.

use crate::conform::admit;
use crate::contract::Kind;
use crate::error::{Error, Result};
use crate::immutable::Immutable;
use crate::node::{Data, Managed};
use crate::value::{Input, Value};
use serde::ser::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Check if `name` is a bookkeeping field name (`__name__`)
pub fn is_internal_name(name: &str) -> bool {
    name.len() > 4 && name.starts_with("__") && name.ends_with("__")
}

/// Immutable object with named fields
#[derive(Debug, Clone)]
pub struct ImmutableObject(Managed);

impl ImmutableObject {
    /// A fresh transient master with no fields
    pub fn new() -> Self {
        Self::blank()
    }

    /// Value of a field
    pub fn get(&self, name: &str) -> Option<Value> {
        self.0.with_entries(|fields| fields.get(name).cloned())
    }

    /// Set a field
    ///
    /// # Errors
    ///
    /// - `Error::OwnershipViolation` if `value` is (or contains) a slave or
    ///   this object itself
    /// - `Error::Locked` unless this object is transient
    /// - `Error::Unconformable` / `Error::ContractViolation` from conversion
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

    /// Number of fields
    pub fn len(&self) -> usize {
        self.0.with_entries(BTreeMap::len)
    }

    /// Check if no field is set
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Field write shared by every object with named fields
pub(crate) fn set_field(host: &Managed, name: &str, input: Input) -> Result<()> {
    if is_internal_name(name) {
        return set_internal(host, name, input);
    }
    let value = admit(host, input)?;
    host.with_entries_mut(|fields| {
        fields.insert(name.to_string(), value);
    })
}

pub(crate) fn remove_field(host: &Managed, name: &str) -> Result<Option<Value>> {
    if is_internal_name(name) {
        return host.with_entries_unguarded(|fields| fields.remove(name));
    }
    host.with_entries_mut(|fields| fields.remove(name))
}

/// Write a bookkeeping field, bypassing the state gate
fn set_internal(host: &Managed, name: &str, input: Input) -> Result<()> {
    match input {
        Input::Value(value) if value.is_primitive() => host.with_entries_unguarded(|fields| {
            fields.insert(name.to_string(), value);
        }),
        other => Err(Error::ContractViolation(format!(
            "internal field {} only holds primitives, got {:?}",
            name, other
        ))),
    }
}

impl Default for ImmutableObject {
    fn default() -> Self {
        Self::new()
    }
}

impl Immutable for ImmutableObject {
    type Context = ();

    fn managed(&self) -> &Managed {
        &self.0
    }

    fn into_managed(self) -> Managed {
        self.0
    }

    fn from_managed(managed: Managed) -> Self {
        ImmutableObject(managed)
    }

    fn blank() -> Self {
        ImmutableObject(Managed::from_parts(Data::Fields(BTreeMap::new()), None))
    }
}

impl TryFrom<Managed> for ImmutableObject {
    type Error = Error;

    fn try_from(managed: Managed) -> Result<Self> {
        match managed.kind() {
            Kind::Object => Ok(ImmutableObject(managed)),
            other => Err(Error::ContractViolation(format!(
                "expected an object, found kind {}",
                other
            ))),
        }
    }
}

impl From<ImmutableObject> for Input {
    fn from(obj: ImmutableObject) -> Self {
        Input::Value(Value::Managed(obj.0))
    }
}

impl From<ImmutableObject> for Value {
    fn from(obj: ImmutableObject) -> Self {
        Value::Managed(obj.0)
    }
}

impl Serialize for ImmutableObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}
