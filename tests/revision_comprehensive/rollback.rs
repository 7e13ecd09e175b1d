//! Rollback Tests
//!
//! `rollback_to_revision` drops every revision after the target and can
//! make the target current again.

use crate::common::*;

#[test]
fn rollback_to_first_with_activate() {
    init_tracing();
    let manager = ticking_manager();
    let chain = revision_chain(&manager, 3);
    let r0 = &chain[0];

    manager.rollback_to_revision(r0, true).unwrap();

    assert_eq!(manager.revision_count(), 1);
    assert!(r0.ended_at().is_none());
    assert_eq!(r0.state(), State::Locked);
    assert!(r0.is_active());
    assert!(manager.current_revision().unwrap().is_same(r0));
}

#[test]
fn rollback_keeps_target_and_predecessors() {
    let manager = ticking_manager();
    let chain = revision_chain(&manager, 4);
    manager.rollback_to_revision(&chain[1], true).unwrap();

    let kept = manager.revision_history(&HistoryQuery::new()).to_vec();
    assert_eq!(kept.len(), 2);
    assert!(kept[0].is_same(&chain[0]));
    assert!(kept[1].is_same(&chain[1]));
    assert_eq!(chain[0].state(), State::Retired);
}

#[test]
fn rollback_without_activate_leaves_target_retired() {
    let manager = ticking_manager();
    let chain = revision_chain(&manager, 3);
    manager.rollback_to_revision(&chain[0], false).unwrap();

    assert_eq!(manager.revision_count(), 1);
    assert_eq!(chain[0].state(), State::Retired);
    assert!(chain[0].ended_at().is_some());
    assert!(manager.current_revision().is_none());
}

#[test]
fn rollback_to_current_is_a_no_op() {
    let manager = ticking_manager();
    let chain = revision_chain(&manager, 2);
    manager.rollback_to_revision(&chain[1], true).unwrap();
    assert_eq!(manager.revision_count(), 2);
    assert_eq!(chain[1].state(), State::Locked);
}

#[test]
fn rollback_to_untracked_revision_fails() {
    let manager = ticking_manager();
    let _chain = revision_chain(&manager, 2);
    let stranger = RevisionedObject::create().empty().unwrap();
    let err = manager.rollback_to_revision(&stranger, true).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert_eq!(manager.revision_count(), 2);
}

#[test]
fn rollback_to_truncated_revision_fails() {
    let manager = ticking_manager();
    let chain = revision_chain(&manager, 3);
    manager.rollback_to_revision(&chain[0], true).unwrap();
    let err = manager.rollback_to_revision(&chain[2], true).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn history_continues_from_rollback_point() {
    let manager = ticking_manager();
    let chain = revision_chain(&manager, 3);
    manager.rollback_to_revision(&chain[0], true).unwrap();

    let branch = revise(&chain[0], "carol", "alternate");
    assert_eq!(branch.version(), 1);
    assert_eq!(chain[0].state(), State::Retired);

    let history = manager.revision_history(&HistoryQuery::new());
    assert_eq!(titles(&history.to_vec()), vec!["draft", "alternate"]);
    assert!(branch.started_at() > chain[2].started_at());
}
