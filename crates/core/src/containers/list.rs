//! Managed sequence

use super::ensure_no_slaves;
use crate::conform::admit;
use crate::contract::Kind;
use crate::error::{Error, Result};
use crate::immutable::Immutable;
use crate::node::{Data, Managed};
use crate::value::{Input, Value};
use std::cmp::Ordering;

/// Immutable sequence
#[derive(Debug, Clone)]
pub struct ImmutableList(Managed);

container_handle!(ImmutableList, Kind::List, "sequence");

impl ImmutableList {
    /// A fresh transient master with no items
    pub fn new() -> Self {
        Self::blank()
    }

    /// Locked sequence built from `values`
    pub fn from_values<V: Into<Input>>(values: impl IntoIterator<Item = V>) -> Result<Self> {
        Self::create().build(|list| list.extend(values))
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Item at `index`
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.with_items(|items| items.get(index).cloned())
    }

    /// Every item, in order
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.with_items(<[Value]>::to_vec)
    }

    /// Check if an equal item is present
    pub fn contains(&self, value: &Value) -> bool {
        self.0.with_items(|items| items.contains(value))
    }

    /// Position of the first equal item
    pub fn index_of(&self, value: &Value) -> Option<usize> {
        self.0.with_items(|items| items.iter().position(|v| v == value))
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.0.with_items(<[Value]>::len)
    }

    /// Check if the sequence has no items
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Replace the item at `index`
    ///
    /// An out-of-range `index` fails before `value` is conformed, so a
    /// master argument keeps its mode.
    pub fn set(&self, index: usize, value: impl Into<Input>) -> Result<()> {
        self.0.ensure_transient()?;
        let len = self.len();
        if index >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        let value = admit(&self.0, value.into())?;
        self.0.with_items_mut(|items| match items.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Error::IndexOutOfRange {
                index,
                len: items.len(),
            }),
        })?
    }

    /// Delete and return the item at `index`
    pub fn remove_at(&self, index: usize) -> Result<Value> {
        self.0.with_items_mut(|items| {
            if index < items.len() {
                Ok(items.remove(index))
            } else {
                Err(Error::IndexOutOfRange {
                    index,
                    len: items.len(),
                })
            }
        })?
    }

    /// Add an item at the end
    pub fn append(&self, value: impl Into<Input>) -> Result<()> {
        let value = admit(&self.0, value.into())?;
        self.0.with_items_mut(|items| items.push(value))
    }

    /// Append every value
    pub fn extend<V: Into<Input>>(&self, values: impl IntoIterator<Item = V>) -> Result<()> {
        for value in values {
            self.append(value)?;
        }
        Ok(())
    }

    /// Insert before `index`; past the end appends
    pub fn insert(&self, index: usize, value: impl Into<Input>) -> Result<()> {
        let value = admit(&self.0, value.into())?;
        self.0.with_items_mut(|items| {
            let at = index.min(items.len());
            items.insert(at, value);
        })
    }

    /// Delete and return the last item
    pub fn pop(&self) -> Result<Value> {
        self.0
            .with_items_mut(|items| items.pop())?
            .ok_or(Error::Empty(Kind::List))
    }

    /// Delete the first item equal to `value`
    pub fn remove(&self, value: &Value) -> Result<()> {
        self.0.with_items_mut(|items| match items.iter().position(|v| v == value) {
            Some(at) => {
                items.remove(at);
                Ok(())
            }
            None => Err(Error::ValueNotFound(value.to_string())),
        })?
    }

    /// Delete every item
    pub fn clear(&self) -> Result<()> {
        self.0.with_items_mut(Vec::clear)
    }

    /// Reverse in place
    pub fn reverse(&self) -> Result<()> {
        self.0.with_items_mut(|items| items.reverse())
    }

    /// Sort in place by natural order
    ///
    /// Fails with `Error::Incomparable` (leaving the sequence unchanged)
    /// when two items have no common order.
    pub fn sort(&self) -> Result<()> {
        self.0.ensure_transient()?;
        let mut sorted = self.to_vec();
        let mut failure = None;
        sorted.sort_by(|a, b| {
            a.compare(b).unwrap_or_else(|| {
                failure.get_or_insert(Error::Incomparable(a.type_name(), b.type_name()));
                Ordering::Equal
            })
        });
        if let Some(err) = failure {
            return Err(err);
        }
        self.0.with_items_mut(|items| *items = sorted)
    }

    /// Sort in place with a comparator
    ///
    /// `compare` runs on a snapshot outside the node lock and may read this
    /// sequence.
    pub fn sort_by<F>(&self, compare: F) -> Result<()>
    where
        F: FnMut(&Value, &Value) -> Ordering,
    {
        self.0.ensure_transient()?;
        let mut sorted = self.to_vec();
        sorted.sort_by(compare);
        self.0.with_items_mut(|items| *items = sorted)
    }

    /// Grow in place to `times` repetitions of the current items
    ///
    /// Fails with `Error::OwnershipViolation` when an item is an owned
    /// sub-object.
    pub fn repeat_in_place(&self, times: usize) -> Result<()> {
        self.0.ensure_transient()?;
        ensure_no_slaves(&self.to_vec(), "repetition")?;
        self.0.with_items_mut(|items| *items = repeated(items, times))
    }

    // =========================================================================
    // Derived sequences
    // =========================================================================

    /// New locked sequence: these items followed by `values`
    ///
    /// Fails with `Error::OwnershipViolation` when an item here is an owned
    /// sub-object.
    pub fn concat<V: Into<Input>>(&self, values: impl IntoIterator<Item = V>) -> Result<Self> {
        let own = self.to_vec();
        ensure_no_slaves(&own, "concatenation")?;
        Self::create().build(|list| {
            list.extend(own)?;
            list.extend(values)
        })
    }

    /// New locked sequence: these items repeated `times` times
    pub fn repeat(&self, times: usize) -> Result<Self> {
        let own = self.to_vec();
        ensure_no_slaves(&own, "repetition")?;
        Self::create().build(|list| list.extend(repeated(&own, times)))
    }

    /// Shallow copy as a new locked master
    ///
    /// Fails with `Error::ContractViolation` unless this sequence is locked.
    pub fn copy(&self) -> Result<Self> {
        self.0.shallow_copy().map(ImmutableList)
    }
}

fn repeated(items: &[Value], times: usize) -> Vec<Value> {
    let mut out = Vec::with_capacity(items.len() * times);
    for _ in 0..times {
        out.extend_from_slice(items);
    }
    out
}

impl Immutable for ImmutableList {
    type Context = ();

    fn managed(&self) -> &Managed {
        &self.0
    }

    fn into_managed(self) -> Managed {
        self.0
    }

    fn from_managed(managed: Managed) -> Self {
        ImmutableList(managed)
    }

    fn blank() -> Self {
        ImmutableList(Managed::from_parts(Data::List(Vec::new()), None))
    }
}
