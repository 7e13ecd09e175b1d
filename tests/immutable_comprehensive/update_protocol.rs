//! Update Protocol Tests
//!
//! `update` and `begin_update` produce a locked modified copy and never
//! touch the original.

use crate::common::*;

#[test]
fn update_round_trip() {
    let q = locked_q();
    let q2 = q.update((), |d| d.set("answer", 43i64)).unwrap();

    assert_eq!(q2.get("answer"), Some(Value::Int(43)));
    assert!(!q2.is_same(&q));
    assert_eq!(q2.state(), State::Locked);
    assert_eq!(q.get("answer"), Some(Value::Int(42)));
    assert_eq!(q2.get("name"), Some(Value::from("q")));
}

#[test]
fn update_can_add_and_remove_fields() {
    let q = locked_q();
    let q2 = q
        .update((), |d| {
            d.remove("name")?;
            d.set("extra", true)
        })
        .unwrap();
    assert!(!q2.contains("name"));
    assert_eq!(q2.get("extra"), Some(Value::Bool(true)));
    assert!(q.contains("name"));
}

#[test]
fn failed_update_leaves_original() {
    let q = locked_q();
    let err = q
        .update((), |d| {
            d.set("answer", 0i64)?;
            Err(Error::NotFound("abort".into()))
        })
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert_eq!(q.get("answer"), Some(Value::Int(42)));
    assert_eq!(q.state(), State::Locked);
}

#[test]
fn explicit_scope_commit() {
    let q = locked_q();
    let scope = q.begin_update(()).unwrap();
    assert!(!scope.is_reentrant());
    assert_eq!(scope.state(), State::Transient);
    scope.set("answer", 7i64).unwrap();

    let q2 = scope.commit().unwrap();
    assert_eq!(q2.state(), State::Locked);
    assert_eq!(q2.get("answer"), Some(Value::Int(7)));
}

#[test]
fn aborted_scope_leaves_draft_transient() {
    let q = locked_q();
    let scope = q.begin_update(()).unwrap();
    let draft = scope.draft().clone();
    draft.set("answer", 1i64).unwrap();
    scope.abort();

    assert_eq!(draft.state(), State::Transient);
    assert_eq!(q.get("answer"), Some(Value::Int(42)));
}

#[test]
fn nested_update_on_transient_is_reentrant() {
    let q = locked_q();
    let outer = q.begin_update(()).unwrap();
    let inner = outer.begin_update(()).unwrap();

    assert!(inner.is_reentrant());
    assert!(inner.draft().is_same(outer.draft()));

    let again = inner.commit().unwrap();
    assert!(again.is_same(outer.draft()));
    assert_eq!(again.state(), State::Transient);

    let done = outer.commit().unwrap();
    assert_eq!(done.state(), State::Locked);
}

#[test]
fn update_on_transient_returns_same_object() {
    let obj = ImmutableObject::new();
    let same = obj.update((), |d| d.set("a", 1i64)).unwrap();
    assert!(same.is_same(&obj));
    assert_eq!(same.state(), State::Transient);
}

#[test]
fn update_on_slave_fails() {
    let (parent, child) = parent_with_child();
    assert!(matches!(child.update((), |_| Ok(())), Err(Error::NotMaster)));
    assert!(matches!(child.begin_update(()), Err(Error::NotMaster)));
    assert_eq!(parent.state(), State::Locked);
}

#[test]
fn update_clones_owned_children() {
    let (parent, child) = parent_with_child();
    let p2 = parent
        .update((), |d| {
            let c = ImmutableObject::try_from(managed_field(d, "child"))?;
            c.set("leaf", 2i64)
        })
        .unwrap();

    let c2 = ImmutableObject::try_from(managed_field(&p2, "child")).unwrap();
    assert_eq!(c2.get("leaf"), Some(Value::Int(2)));
    assert_eq!(c2.state(), State::Locked);
    assert_eq!(child.get("leaf"), Some(Value::Int(1)));
}

#[test]
fn container_update_round_trip() {
    let list = ImmutableList::from_values([1i64, 2]).unwrap();
    let longer = list.update((), |d| d.append(3i64)).unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(longer.len(), 3);
    assert_eq!(longer.state(), State::Locked);
}
