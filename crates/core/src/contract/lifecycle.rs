//! Lifecycle state and ownership mode
//!
//! Every managed object is classified on two axes:
//!
//! - `State` gates mutation. Only `Transient` objects accept writes.
//! - `Mode` gates ownership. `Master` objects are independently updatable;
//!   `Slave` objects live inside exactly one master's graph.
//!
//! ## Transitions
//!
//! ```text
//! Transient --finalize--> Locked --retire--> Retired
//!     ^                     |
//!     +------deep clone-----+   (a new object, never in place)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mutability gate of a managed object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    /// Writable; the only state in which fields and items may change
    Transient,
    /// Frozen; every mutating operation fails
    Locked,
    /// Superseded revision; readable, never mutated again
    Retired,
}

impl State {
    /// Check if writes are permitted
    #[inline]
    pub const fn is_transient(&self) -> bool {
        matches!(self, State::Transient)
    }

    /// Name used in messages and logs
    pub const fn as_str(&self) -> &'static str {
        match self {
            State::Transient => "transient",
            State::Locked => "locked",
            State::Retired => "retired",
        }
    }
}

impl Default for State {
    fn default() -> Self {
        State::Transient
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ownership role of a managed object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Independently referenceable and updatable
    Master,
    /// Owned by exactly one master's attribute/container graph
    Slave,
}

impl Mode {
    /// Name used in messages and logs
    pub const fn as_str(&self) -> &'static str {
        match self {
            Mode::Master => "master",
            Mode::Slave => "slave",
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Master
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Concrete shape of a managed object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Plain object with named fields
    Object,
    /// Object with named fields plus revision bookkeeping
    Revisioned,
    /// String-keyed mapping container
    Map,
    /// Ordered sequence container
    List,
    /// Insertion-ordered set container
    Set,
}

impl Kind {
    /// Name used in messages and logs
    pub const fn as_str(&self) -> &'static str {
        match self {
            Kind::Object => "object",
            Kind::Revisioned => "revisioned object",
            Kind::Map => "mapping",
            Kind::List => "sequence",
            Kind::Set => "set",
        }
    }

    /// Check if this kind stores named fields
    #[inline]
    pub const fn has_fields(&self) -> bool {
        matches!(self, Kind::Object | Kind::Revisioned)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
