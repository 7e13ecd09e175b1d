//! strata-immutable - deeply immutable objects with revision history
//!
//! Objects are built in a transient state, locked by `finalize`, and from
//! then on only change by producing a modified copy through `update`.
//! Values assigned into an object are conformed: plain data becomes owned
//! immutable containers, and owned sub-objects become slaves of their host.
//!
//! # Quick Start
//!
//! ```
//! use strata_immutable::{Immutable, ImmutableObject, Value};
//!
//! let q = ImmutableObject::create()
//!     .build(|q| q.set("answer", 42i64))
//!     .unwrap();
//! assert!(q.set("answer", 43i64).is_err());
//!
//! let q2 = q.update((), |d| d.set("answer", 43i64)).unwrap();
//! assert_eq!(q.get("answer"), Some(Value::Int(42)));
//! assert_eq!(q2.get("answer"), Some(Value::Int(43)));
//! ```
//!
//! # Revision history
//!
//! ```
//! use strata_immutable::{
//!     HistoryQuery, Immutable, RevisionInfo, RevisionManager, RevisionedObject,
//!     SimpleRevisionManager,
//! };
//!
//! let manager = SimpleRevisionManager::new();
//! let r0 = RevisionedObject::create()
//!     .context(RevisionInfo::new().creator("alice"))
//!     .build(|r| r.set("title", "draft"))
//!     .unwrap();
//! manager.add_revision(&r0, None).unwrap();
//!
//! let r1 = r0
//!     .update(RevisionInfo::new().creator("bob"), |d| d.set("title", "final"))
//!     .unwrap();
//! assert_eq!(manager.revision_count(), 2);
//! assert!(manager.current_revision().unwrap().is_same(&r1));
//!
//! let by_bob = manager.revision_history(&HistoryQuery::new().creator("bob"));
//! assert_eq!(by_bob.len(), 1);
//! ```
//!
//! # Architecture
//!
//! - `strata-immutable-core`: the object model, conformance, containers and
//!   the history contract
//! - `strata-immutable-history`: the in-memory revision manager, clocks,
//!   keyed histories and manager configuration

pub use strata_immutable_core::*;
pub use strata_immutable_history::{
    Clock, ManagerConfig, ManualClock, RevisionedMapping, SimpleRevisionManager, SystemClock,
    CONFIG_FILE_NAME,
};

/// Reference revision management
pub mod history {
    pub use strata_immutable_history::{clock, config, mapping, simple};
}
