//! Clone Isolation Tests
//!
//! `deep_clone` always yields a distinct, transient object; owned
//! sub-objects are cloned along with their host.

use crate::common::*;

#[test]
fn clone_of_locked_is_transient_and_distinct() {
    let q = locked_q();
    let c = q.deep_clone();
    assert!(!c.is_same(&q));
    assert_eq!(c.state(), State::Transient);
    assert_eq!(q.state(), State::Locked);
}

#[test]
fn clone_of_transient_is_distinct() {
    let q = ImmutableObject::new();
    q.set("a", 1i64).unwrap();
    let c = q.deep_clone();
    assert!(!c.is_same(&q));
    assert_eq!(c.get("a"), Some(Value::Int(1)));
}

#[test]
fn mutating_clone_leaves_source() {
    let q = locked_q();
    let c = q.deep_clone();
    c.set("answer", 0i64).unwrap();
    c.remove("name").unwrap();
    assert_eq!(q.get("answer"), Some(Value::Int(42)));
    assert_eq!(q.get("name"), Some(Value::from("q")));
}

#[test]
fn clone_keeps_mode() {
    let q = locked_q();
    assert_eq!(q.deep_clone().mode(), Mode::Master);
}

#[test]
fn clone_copies_owned_children() {
    let (parent, child) = parent_with_child();
    let copy = parent.deep_clone();
    let copied_child = managed_field(&copy, "child");

    assert!(!copied_child.ptr_eq(child.managed()));
    assert_eq!(copied_child.state(), State::Transient);
    assert_eq!(copied_child.mode(), Mode::Slave);
    assert_eq!(child.state(), State::Locked);
}

#[test]
fn mutating_cloned_child_leaves_source_child() {
    let (parent, child) = parent_with_child();
    let copy = parent.deep_clone();
    let copied_child = ImmutableObject::try_from(managed_field(&copy, "child")).unwrap();
    copied_child.set("leaf", 99i64).unwrap();
    assert_eq!(child.get("leaf"), Some(Value::Int(1)));
}

#[test]
fn clone_copies_nested_containers() {
    let obj = ImmutableObject::create()
        .build(|o| o.set("scores", vec![1i64, 2, 3]))
        .unwrap();
    let copy = obj.deep_clone();
    let original = ImmutableList::try_from(managed_field(&obj, "scores")).unwrap();
    let copied = ImmutableList::try_from(managed_field(&copy, "scores")).unwrap();

    assert!(!copied.is_same(&original));
    copied.append(4i64).unwrap();
    assert_eq!(original.len(), 3);
    assert_eq!(copied.len(), 4);
}

#[test]
fn container_copy_is_shallow_and_locked() {
    let inner = ImmutableObject::new();
    let list = ImmutableList::create()
        .build(|l| l.append(inner.clone()))
        .unwrap();
    let copy = list.copy().unwrap();

    assert!(!copy.is_same(&list));
    assert_eq!(copy.state(), State::Locked);
    assert_eq!(copy.mode(), Mode::Master);
    assert_eq!(copy.get(0), list.get(0));
}

#[test]
fn container_copy_requires_locked() {
    let map = ImmutableMap::new();
    assert!(matches!(map.copy(), Err(Error::ContractViolation(_))));
}
