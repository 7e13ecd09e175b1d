//! Contract types for the immutable object model
//!
//! This module contains the types every managed object and every revision
//! manager agree on:
//!
//! 1. **Lifecycle**: Every object is `Transient`, `Locked` or `Retired`
//! 2. **Ownership**: Every object is a `Master` or a `Slave`
//! 3. **Time**: Revision validity windows use microsecond `Timestamp`s
//! 4. **History**: Managers answer `HistoryQuery`s with a `RevisionHistory`
//!
//! ## Module Structure
//!
//! - `lifecycle`: `State`, `Mode` and `Kind`
//! - `timestamp`: Microsecond timestamps
//! - `history`: History query and the filtered view over a revision list
//! - `manager`: The `RevisionManager` trait consumed by revisioned objects

pub mod history;
pub mod lifecycle;
pub mod manager;
pub mod timestamp;

// Re-exports
pub use history::{HistoryQuery, RevisionHistory};
pub use lifecycle::{Kind, Mode, State};
pub use manager::RevisionManager;
pub use timestamp::Timestamp;
