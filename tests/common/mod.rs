//! Shared test utilities for all integration test suites.
//!
//! Import via `mod common;` from any test's main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

use std::sync::{Arc, Once};
use std::time::Duration;
pub use strata_immutable::{
    Error, HistoryQuery, Immutable, ImmutableList, ImmutableMap, ImmutableObject, ImmutableSet,
    Input, IntoImmutable, Kind, ManagerConfig, Managed, ManualClock, Mode, Result,
    RevisionHistory, RevisionInfo, RevisionManager, RevisionedMapping, RevisionedObject,
    SimpleRevisionManager, State, Timestamp, Value,
};

// ============================================================================
// Initialization
// ============================================================================

static INIT_TRACING: Once = Once::new();

/// Install a test subscriber once per binary.
///
/// Events are captured by the test harness and only shown for failing tests.
/// Set `RUST_LOG=strata::im=debug` to see update and history events.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

// ============================================================================
// Clocks and managers
// ============================================================================

/// Clock starting at one second past the epoch, one second per reading.
pub fn ticking_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(Timestamp::from_secs(1)).with_step(Duration::from_secs(1)))
}

/// Manager on a ticking clock, so revision `i` starts at second `i + 1`.
pub fn ticking_manager() -> Arc<SimpleRevisionManager> {
    SimpleRevisionManager::with_clock(ticking_clock())
}

/// Locked `r0` with a `title` field, registered with `manager`.
pub fn first_revision(manager: &SimpleRevisionManager, info: RevisionInfo) -> RevisionedObject {
    let r0 = RevisionedObject::create()
        .context(info)
        .build(|r| r.set("title", "draft"))
        .expect("build r0");
    manager.add_revision(&r0, None).expect("add r0");
    r0
}

/// Commit `title = <title>` on top of `rev` as `creator`.
pub fn revise(rev: &RevisionedObject, creator: &str, title: &str) -> RevisionedObject {
    rev.update(RevisionInfo::new().creator(creator), |d| d.set("title", title))
        .expect("update revision")
}

/// Chain of `n` revisions: r0 plus `n - 1` updates, oldest first.
pub fn revision_chain(manager: &SimpleRevisionManager, n: usize) -> Vec<RevisionedObject> {
    assert!(n > 0);
    let mut chain = vec![first_revision(manager, RevisionInfo::new().creator("alice"))];
    for i in 1..n {
        let next = revise(&chain[i - 1], "alice", &format!("v{}", i));
        chain.push(next);
    }
    chain
}

// ============================================================================
// Objects
// ============================================================================

/// Locked object with `name` and `answer` fields.
pub fn locked_q() -> ImmutableObject {
    ImmutableObject::create()
        .build(|q| {
            q.set("name", "q")?;
            q.set("answer", 42i64)
        })
        .expect("build q")
}

/// Locked parent owning a locked child object under `child`.
pub fn parent_with_child() -> (ImmutableObject, ImmutableObject) {
    let child = ImmutableObject::new();
    child.set("leaf", 1i64).expect("set leaf");
    let parent = ImmutableObject::create()
        .build(|p| p.set("child", child.clone()))
        .expect("build parent");
    (parent, child)
}

/// Managed object stored under `name`.
pub fn managed_field(obj: &ImmutableObject, name: &str) -> Managed {
    obj.get(name)
        .and_then(|v| v.as_managed().cloned())
        .unwrap_or_else(|| panic!("field {} is not a managed object", name))
}

/// Assert the error is `Error::Locked`.
pub fn assert_locked<T: std::fmt::Debug>(result: Result<T>) {
    match result {
        Err(Error::Locked { .. }) => {}
        other => panic!("expected a Locked error, got {:?}", other),
    }
}

/// Assert the error is `Error::OwnershipViolation`.
pub fn assert_ownership<T: std::fmt::Debug>(result: Result<T>) {
    match result {
        Err(Error::OwnershipViolation(_)) => {}
        other => panic!("expected an OwnershipViolation, got {:?}", other),
    }
}

/// Titles of revisions, in the given order.
pub fn titles<'a>(revisions: impl IntoIterator<Item = &'a RevisionedObject>) -> Vec<String> {
    revisions
        .into_iter()
        .map(|r| {
            r.get("title")
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default()
        })
        .collect()
}
