//! Error types for the immutable object model
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Two classes of failure share this enum:
//!
//! - Recoverable conditions (`Locked`, `NotMaster`, `InvalidState`,
//!   `Unconformable`, `NotFound`, and the container lookup errors).
//! - Assertion-class failures (`OwnershipViolation`, `ContractViolation`).
//!   These signal a usage bug in the caller. They are returned rather than
//!   raised as panics so the caller decides how loudly to fail.

use crate::contract::{Kind, State};
use thiserror::Error;

/// Result type alias for immutable operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the immutable object model
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Mutation attempted on an object that is not transient
    #[error("cannot modify a {kind} in the {state} state")]
    Locked {
        /// Kind of the object that rejected the write
        kind: Kind,
        /// State the object was in
        state: State,
    },

    /// `update` invoked on a slave object
    #[error("update() is only available for master objects")]
    NotMaster,

    /// `finalize` invoked on an object that is not transient
    #[error("cannot finalize an object in the {0} state")]
    InvalidState(State),

    /// Value matches none of the accepted shapes
    #[error("unable to conform value to an immutable: {0}")]
    Unconformable(String),

    /// A slave object was assigned directly, or an owned slave would be
    /// duplicated or made to contain its own owner
    #[error("ownership violation: {0}")]
    OwnershipViolation(String),

    /// A precondition or postcondition of the object protocol was broken
    #[error("contract violation: {0}")]
    ContractViolation(String),

    /// Revision is not tracked by the manager
    #[error("not found: {0}")]
    NotFound(String),

    /// Mapping key does not exist
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// Sequence index outside the current length
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Length at the time of the request
        len: usize,
    },

    /// Element does not exist in a sequence or set
    #[error("value not found: {0}")]
    ValueNotFound(String),

    /// Pop from an empty container
    #[error("pop from an empty {0}")]
    Empty(Kind),

    /// Values without a common ordering were sorted
    #[error("cannot order {0} and {1}")]
    Incomparable(&'static str, &'static str),

    /// Configuration could not be read or parsed
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether this error signals a usage bug rather than a runtime condition
    pub fn is_assertion(&self) -> bool {
        matches!(
            self,
            Error::OwnershipViolation(_) | Error::ContractViolation(_)
        )
    }
}
