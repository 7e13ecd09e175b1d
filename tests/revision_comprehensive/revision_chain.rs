//! Revision Chain Tests
//!
//! Each update on the current revision produces the next version, retires
//! its source and registers itself with the source's manager.

use crate::common::*;

#[test]
fn first_revision_is_version_zero() {
    let manager = ticking_manager();
    let r0 = first_revision(&manager, RevisionInfo::new().creator("alice"));
    assert_eq!(r0.version(), 0);
    assert_eq!(r0.creator().as_deref(), Some("alice"));
    assert_eq!(r0.started_at(), Some(Timestamp::from_secs(1)));
    assert!(r0.ended_at().is_none());
    assert!(r0.is_active());
}

#[test]
fn update_advances_chain() {
    init_tracing();
    let manager = ticking_manager();
    let chain = revision_chain(&manager, 4);

    for pair in chain.windows(2) {
        let (older, newer) = (&pair[0], &pair[1]);
        assert_eq!(newer.version(), older.version() + 1);
        assert_eq!(older.state(), State::Retired);
        assert_eq!(older.ended_at(), newer.started_at());
        assert!(!older.is_active());
    }
    let last = chain.last().unwrap();
    assert!(last.ended_at().is_none());
    assert_eq!(last.state(), State::Locked);
    assert_eq!(manager.revision_count(), 4);
}

#[test]
fn update_takes_new_revision_info() {
    let manager = ticking_manager();
    let r0 = first_revision(
        &manager,
        RevisionInfo::new().creator("alice").comment("initial"),
    );
    let r1 = r0
        .update(
            RevisionInfo::new().creator("bob").comment("fix typo"),
            |d| d.set("title", "fixed"),
        )
        .unwrap();

    assert_eq!(r1.info(), RevisionInfo::new().creator("bob").comment("fix typo"));
    assert_eq!(r0.comment().as_deref(), Some("initial"));
}

#[test]
fn update_without_info_clears_creator() {
    let manager = ticking_manager();
    let r0 = first_revision(&manager, RevisionInfo::new().creator("alice"));
    let r1 = r0.update(RevisionInfo::new(), |_| Ok(())).unwrap();
    assert!(r1.creator().is_none());
}

#[test]
fn retired_revision_is_read_only() {
    let manager = ticking_manager();
    let r0 = first_revision(&manager, RevisionInfo::new());
    let _r1 = revise(&r0, "bob", "next");
    match r0.set("title", "late edit") {
        Err(Error::Locked { state, kind }) => {
            assert_eq!(state, State::Retired);
            assert_eq!(kind, Kind::Revisioned);
        }
        other => panic!("expected Locked, got {:?}", other),
    }
}

#[test]
fn new_revision_binds_manager() {
    let manager = ticking_manager();
    let r0 = first_revision(&manager, RevisionInfo::new());
    let r1 = revise(&r0, "bob", "next");
    let bound = r1.manager().expect("r1 is tracked");
    assert_eq!(bound.revision_count(), 2);
}

#[test]
fn unmanaged_revisions_still_version() {
    let r0 = RevisionedObject::create().build(|r| r.set("x", 1i64)).unwrap();
    let r1 = r0.update(RevisionInfo::new(), |d| d.set("x", 2i64)).unwrap();
    assert_eq!(r1.version(), 1);
    assert!(r1.started_at().is_none());
    assert!(r1.manager().is_none());
    assert_eq!(r0.state(), State::Locked);
}

#[test]
fn dropped_manager_leaves_new_revision_untracked() {
    init_tracing();
    let manager = ticking_manager();
    let r0 = first_revision(&manager, RevisionInfo::new());
    drop(manager);

    let r1 = revise(&r0, "bob", "orphan");
    assert_eq!(r1.state(), State::Locked);
    assert!(r1.manager().is_none());
    assert_eq!(r0.state(), State::Locked);
}

#[test]
fn aborted_scope_notifies_nobody() {
    let manager = ticking_manager();
    let r0 = first_revision(&manager, RevisionInfo::new());
    {
        let scope = r0.begin_update(RevisionInfo::new().creator("bob")).unwrap();
        scope.set("title", "never committed").unwrap();
        assert_eq!(scope.version(), 1);
    }
    assert_eq!(manager.revision_count(), 1);
    assert_eq!(r0.state(), State::Locked);
    assert!(manager.current_revision().unwrap().is_same(&r0));
}

#[test]
fn failed_update_notifies_nobody() {
    let manager = ticking_manager();
    let r0 = first_revision(&manager, RevisionInfo::new());
    let result = r0.update(RevisionInfo::new(), |d| d.set("nested", d.clone()));
    assert!(matches!(result, Err(Error::OwnershipViolation(_))));
    assert_eq!(manager.revision_count(), 1);
}

#[test]
fn revisioned_child_is_cloned_into_parent() {
    let manager = ticking_manager();
    let r0 = first_revision(&manager, RevisionInfo::new());
    let holder = ImmutableObject::create()
        .build(|h| h.set("snapshot", r0.clone()))
        .unwrap();
    let stored = RevisionedObject::try_from(managed_field(&holder, "snapshot")).unwrap();
    assert!(!stored.is_same(&r0));
    assert_eq!(stored.mode(), Mode::Slave);
    assert_eq!(stored.get("title"), Some(Value::from("draft")));
}

#[test]
fn updating_retired_revision_is_rejected() {
    let manager = ticking_manager();
    let r0 = first_revision(&manager, RevisionInfo::new());
    let r1 = revise(&r0, "bob", "next");
    let ended = r0.ended_at();

    let err = r0
        .update(RevisionInfo::new().creator("carol"), |d| d.set("title", "stale"))
        .unwrap_err();
    assert!(matches!(err, Error::ContractViolation(_)));

    let history = manager.revision_history(&HistoryQuery::new()).to_vec();
    let active: Vec<_> = history.iter().filter(|r| r.ended_at().is_none()).collect();
    assert_eq!(active.len(), 1);
    assert!(active[0].is_same(&r1));
    assert_eq!(r0.ended_at(), ended);
    assert_eq!(r1.state(), State::Locked);
    assert_eq!(manager.revision_count(), 2);
}

#[test]
fn rollback_without_activate_blocks_further_updates() {
    let manager = ticking_manager();
    let chain = revision_chain(&manager, 3);
    manager.rollback_to_revision(&chain[0], false).unwrap();

    let err = chain[0]
        .update(RevisionInfo::new(), |d| d.set("title", "late"))
        .unwrap_err();
    assert!(matches!(err, Error::ContractViolation(_)));
    assert_eq!(manager.revision_count(), 1);
    assert!(manager.current_revision().is_none());
}
