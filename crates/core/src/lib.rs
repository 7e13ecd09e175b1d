//! Core types and traits for strata-immutable
//!
//! This crate defines the immutable object model:
//! - State, Mode, Kind: lifecycle states and ownership modes
//! - Value, Input: stored values and raw values before conformance
//! - Managed: shared handle to any managed object
//! - Immutable: the trait carrying construction, cloning and the update protocol
//! - ImmutableObject: named-field object
//! - ImmutableMap, ImmutableList, ImmutableSet: managed containers
//! - RevisionedObject: versioned object with a manager back-reference
//! - RevisionManager, HistoryQuery, RevisionHistory: the history contract
//! - Error: Error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

// Module declarations
pub mod containers;
pub mod contract;
pub mod decimal;
pub mod error;
pub mod immutable;
pub mod object;
pub mod revisioned;
pub mod scope;
pub mod value;

mod conform;
mod node;

// Re-export commonly used types and traits
pub use containers::{ImmutableList, ImmutableMap, ImmutableSet};
pub use decimal::Decimal;
pub use error::{Error, Result};
pub use immutable::{Builder, Immutable};
pub use node::Managed;
pub use object::{is_internal_name, ImmutableObject};
pub use revisioned::{RevisionInfo, RevisionedObject};
pub use scope::UpdateScope;
pub use value::{Input, IntoImmutable, Value};

// Re-export contract types at crate root for convenience
pub use contract::{HistoryQuery, Kind, Mode, RevisionHistory, RevisionManager, State, Timestamp};
