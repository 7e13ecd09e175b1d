//! Managed set

use crate::conform::admit;
use crate::contract::Kind;
use crate::error::{Error, Result};
use crate::immutable::Immutable;
use crate::node::{Data, Managed};
use crate::value::{Input, Value};

/// Immutable set
///
/// Elements keep insertion order and are unique by `Value` equality. Owned
/// sub-objects compare by identity, so each one is its own element.
#[derive(Debug, Clone)]
pub struct ImmutableSet(Managed);

container_handle!(ImmutableSet, Kind::Set, "set");

impl ImmutableSet {
    /// A fresh transient master with no elements
    pub fn new() -> Self {
        Self::blank()
    }

    /// Locked set built from `values`
    pub fn from_values<V: Into<Input>>(values: impl IntoIterator<Item = V>) -> Result<Self> {
        Self::create().build(|set| set.union_update(values))
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Check membership
    pub fn contains(&self, value: &Value) -> bool {
        self.0.with_items(|elements| elements.contains(value))
    }

    /// Every element, in insertion order
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.with_items(<[Value]>::to_vec)
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.0.with_items(<[Value]>::len)
    }

    /// Check if the set has no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Add an element; returns false if an equal one was already present
    pub fn add(&self, value: impl Into<Input>) -> Result<bool> {
        let value = admit(&self.0, value.into())?;
        self.0.with_items_mut(|elements| {
            if elements.contains(&value) {
                false
            } else {
                elements.push(value);
                true
            }
        })
    }

    /// Remove an element if present; returns whether it was
    pub fn discard(&self, value: &Value) -> Result<bool> {
        self.0.with_items_mut(|elements| match elements.iter().position(|v| v == value) {
            Some(at) => {
                elements.remove(at);
                true
            }
            None => false,
        })
    }

    /// Remove an element, failing if it is absent
    pub fn remove(&self, value: &Value) -> Result<()> {
        if self.discard(value)? {
            Ok(())
        } else {
            Err(Error::KeyNotFound(value.to_string()))
        }
    }

    /// Remove and return the most recently added element
    pub fn pop(&self) -> Result<Value> {
        self.0
            .with_items_mut(|elements| elements.pop())?
            .ok_or(Error::Empty(Kind::Set))
    }

    /// Remove every element
    pub fn clear(&self) -> Result<()> {
        self.0.with_items_mut(Vec::clear)
    }

    // =========================================================================
    // In-place set algebra
    // =========================================================================

    /// Add every value (`|=`)
    pub fn union_update<V: Into<Input>>(&self, values: impl IntoIterator<Item = V>) -> Result<()> {
        for value in values {
            self.add(value)?;
        }
        Ok(())
    }

    /// Keep only elements equal to one of `values` (`&=`)
    pub fn intersection_update<V: Into<Value>>(
        &self,
        values: impl IntoIterator<Item = V>,
    ) -> Result<()> {
        let keep: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.0.with_items_mut(|elements| elements.retain(|e| keep.contains(e)))
    }

    /// Remove every element equal to one of `values` (`-=`)
    pub fn difference_update<V: Into<Value>>(
        &self,
        values: impl IntoIterator<Item = V>,
    ) -> Result<()> {
        let unwanted: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.0.with_items_mut(|elements| elements.retain(|e| !unwanted.contains(e)))
    }

    /// Toggle membership of every value (`^=`)
    ///
    /// Values already present are removed; the rest are added through
    /// conformance.
    pub fn symmetric_difference_update<V: Into<Input>>(
        &self,
        values: impl IntoIterator<Item = V>,
    ) -> Result<()> {
        self.0.ensure_transient()?;
        for value in values {
            match value.into() {
                Input::Value(v) if self.contains(&v) => {
                    self.discard(&v)?;
                }
                other => {
                    self.add(other)?;
                }
            }
        }
        Ok(())
    }
}

impl Immutable for ImmutableSet {
    type Context = ();

    fn managed(&self) -> &Managed {
        &self.0
    }

    fn into_managed(self) -> Managed {
        self.0
    }

    fn from_managed(managed: Managed) -> Self {
        ImmutableSet(managed)
    }

    fn blank() -> Self {
        ImmutableSet(Managed::from_parts(Data::Set(Vec::new()), None))
    }
}
