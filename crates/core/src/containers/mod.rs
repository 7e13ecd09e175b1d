//! Managed containers
//!
//! Mapping, sequence and set counterparts of the native collections. Their
//! "fields" are their entries: every mutating method is behind the same
//! state gate as `ImmutableObject::set`, and every inserted value goes
//! through the ownership guard and conformance. Reads (lookup, membership,
//! iteration, length) work in any state.
//!
//! ## Module Structure
//!
//! - `map`: `ImmutableMap` (string keys, sorted)
//! - `list`: `ImmutableList`
//! - `set`: `ImmutableSet` (insertion-ordered, unique by value equality)

/// Conversions shared by every container handle
macro_rules! container_handle {
    ($ty:ident, $kind:expr, $label:literal) => {
        impl Default for $ty {
            fn default() -> Self {
                Self::new()
            }
        }

        impl TryFrom<Managed> for $ty {
            type Error = Error;

            fn try_from(managed: Managed) -> Result<Self> {
                let kind = managed.kind();
                if kind == $kind {
                    Ok($ty(managed))
                } else {
                    Err(Error::ContractViolation(format!(
                        concat!("expected a ", $label, ", found kind {}"),
                        kind
                    )))
                }
            }
        }

        impl From<$ty> for Input {
            fn from(handle: $ty) -> Self {
                Input::Value(Value::Managed(handle.0))
            }
        }

        impl From<$ty> for Value {
            fn from(handle: $ty) -> Self {
                Value::Managed(handle.0)
            }
        }

        impl serde::Serialize for $ty {
            fn serialize<S: serde::Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                self.0.serialize(serializer)
            }
        }
    };
}

pub mod list;
pub mod map;
pub mod set;

pub use list::ImmutableList;
pub use map::ImmutableMap;
pub use set::ImmutableSet;

use crate::error::{Error, Result};
use crate::node::Managed;
use crate::value::Value;

/// Reject duplicating owned slaves
///
/// Repetition and concatenation copy handles, not objects; a slave copied
/// that way would end up with two owners.
pub(crate) fn ensure_no_slaves(items: &[Value], operation: &str) -> Result<()> {
    for item in items {
        if let Value::Managed(m) = item {
            if m.mode() != crate::contract::Mode::Master {
                return Err(Error::OwnershipViolation(format!(
                    "{} would duplicate an owned {}",
                    operation,
                    m.kind()
                )));
            }
        }
    }
    Ok(())
}
