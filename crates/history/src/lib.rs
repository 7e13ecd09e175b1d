//! Reference revision management for strata-immutable
//!
//! This crate implements the in-memory side of the history contract:
//! - SimpleRevisionManager: ordered revision list for one entity
//! - Clock: injectable time source (SystemClock, ManualClock)
//! - RevisionedMapping: keyed collection of histories
//! - ManagerConfig: TOML-backed manager settings

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clock;
pub mod config;
pub mod mapping;
pub mod simple;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ManagerConfig, CONFIG_FILE_NAME};
pub use mapping::RevisionedMapping;
pub use simple::SimpleRevisionManager;
