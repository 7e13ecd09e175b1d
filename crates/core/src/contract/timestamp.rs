//! Microsecond-precision timestamp type
//!
//! Revisions carry a validity window: `started_at` is stamped by the manager
//! when the revision is accepted, `ended_at` when a newer revision retires
//! it. Both are `Timestamp`s.
//!
//! Timestamps are stored as microseconds since Unix epoch
//! (1970-01-01 00:00:00 UTC).
//!
//! ## Usage
//!
//! Build timestamps from an explicit unit:
//!
//! ```
//! use strata_immutable_core::Timestamp;
//!
//! let now = Timestamp::now();
//! let from_secs = Timestamp::from_secs(1000);
//! let from_micros = Timestamp::from_micros(1_000_000_000);
//! assert_eq!(from_secs, from_micros);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Microsecond-precision timestamp
///
/// ## Invariants
///
/// - Timestamps are always non-negative (u64)
/// - Timestamps are always in microseconds
/// - Timestamps are comparable and orderable
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Unix epoch (1970-01-01 00:00:00 UTC)
    pub const EPOCH: Timestamp = Timestamp(0);

    /// Maximum representable timestamp
    pub const MAX: Timestamp = Timestamp(u64::MAX);

    // =========================================================================
    // Constructors
    // =========================================================================

    /// Create a timestamp for the current moment
    ///
    /// Uses system time. Returns epoch (0) if system clock is before Unix epoch.
    /// Not monotonic; revision managers go through a `Clock` instead.
    pub fn now() -> Self {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Timestamp(duration.as_micros() as u64)
    }

    /// Create a timestamp from microseconds since epoch
    #[inline]
    pub const fn from_micros(micros: u64) -> Self {
        Timestamp(micros)
    }

    /// Create a timestamp from seconds since epoch
    #[inline]
    pub const fn from_secs(secs: u64) -> Self {
        Timestamp(secs.saturating_mul(1_000_000))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get microseconds since Unix epoch
    #[inline]
    pub const fn as_micros(&self) -> u64 {
        self.0
    }

    /// Get seconds since Unix epoch (truncates)
    #[inline]
    pub const fn as_secs(&self) -> u64 {
        self.0 / 1_000_000
    }

    /// Convert to a chrono UTC datetime
    ///
    /// Returns `None` past chrono's representable range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let secs = i64::try_from(self.as_secs()).ok()?;
        let nanos = ((self.0 % 1_000_000) * 1_000) as u32;
        DateTime::<Utc>::from_timestamp(secs, nanos)
    }

    // =========================================================================
    // Ordering
    // =========================================================================

    /// The next representable timestamp
    ///
    /// Used to break ties between revisions stamped in the same microsecond.
    #[inline]
    pub const fn next(&self) -> Self {
        Timestamp(self.0.saturating_add(1))
    }

    /// Check if this timestamp is before another
    #[inline]
    pub fn is_before(&self, other: Timestamp) -> bool {
        self.0 < other.0
    }

    /// Check if this timestamp is after another
    #[inline]
    pub fn is_after(&self, other: Timestamp) -> bool {
        self.0 > other.0
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Timestamp::EPOCH
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let secs = self.0 / 1_000_000;
        let micros = self.0 % 1_000_000;
        write!(f, "{}.{:06}", secs, micros)
    }
}

impl From<u64> for Timestamp {
    /// Create from raw microseconds
    fn from(micros: u64) -> Self {
        Timestamp::from_micros(micros)
    }
}

impl From<Timestamp> for u64 {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    /// Datetimes before the epoch clamp to `Timestamp::EPOCH`
    fn from(dt: DateTime<Utc>) -> Self {
        Timestamp(u64::try_from(dt.timestamp_micros()).unwrap_or(0))
    }
}
