//! End-to-End Scenarios
//!
//! Multi-step workflows combining updates, queries and rollback.

use crate::common::*;

/// Alice drafts a document, Bob edits it twice, Alice reverts Bob's work.
#[test]
fn edit_review_revert() {
    init_tracing();
    let manager = ticking_manager();

    let draft = RevisionedObject::create()
        .context(RevisionInfo::new().creator("alice").comment("first draft"))
        .build(|doc| {
            doc.set("title", "Quarterly report")?;
            doc.set("sections", vec!["summary", "numbers"])
        })
        .unwrap();
    manager.add_revision(&draft, None).unwrap();

    let edit1 = draft
        .update(
            RevisionInfo::new().creator("bob").comment("add outlook"),
            |doc| {
                let sections = ImmutableList::try_from(
                    doc.get("sections")
                        .and_then(|v| v.as_managed().cloned())
                        .ok_or_else(|| Error::NotFound("sections".into()))?,
                )?;
                sections.append("outlook")
            },
        )
        .unwrap();
    let edit2 = edit1
        .update(
            RevisionInfo::new().creator("bob").comment("retitle"),
            |doc| doc.set("title", "Q3 report"),
        )
        .unwrap();

    assert_eq!(manager.revision_count(), 3);
    assert_eq!(edit2.get("title"), Some(Value::from("Q3 report")));
    assert_eq!(draft.get("title"), Some(Value::from("Quarterly report")));

    let by_bob = manager.revision_history(&HistoryQuery::new().creator("bob"));
    assert_eq!(by_bob.len(), 2);

    manager.rollback_to_revision(&draft, true).unwrap();
    let current = manager.current_revision().unwrap();
    assert!(current.is_same(&draft));
    assert_eq!(current.creator().as_deref(), Some("alice"));

    let sections = ImmutableList::try_from(
        current
            .get("sections")
            .and_then(|v| v.as_managed().cloned())
            .unwrap(),
    )
    .unwrap();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections.state(), State::Locked);
}

/// Two independent entities never share revisions.
#[test]
fn separate_managers_are_independent() {
    let a = ticking_manager();
    let b = ticking_manager();
    let a0 = first_revision(&a, RevisionInfo::new());
    let b0 = first_revision(&b, RevisionInfo::new());

    let _a1 = revise(&a0, "x", "a1");
    assert_eq!(a.revision_count(), 2);
    assert_eq!(b.revision_count(), 1);
    assert!(b.current_revision().unwrap().is_same(&b0));
}

/// A revision built as a draft can be registered only once locked.
#[test]
fn transient_revision_cannot_be_registered() {
    let manager = ticking_manager();
    let draft = RevisionedObject::create()
        .finalize(false)
        .build(|r| r.set("title", "wip"))
        .unwrap();
    let err = manager.add_revision(&draft, None).unwrap_err();
    assert!(matches!(err, Error::ContractViolation(_)));

    draft.finalize().unwrap();
    manager.add_revision(&draft, None).unwrap();
    assert_eq!(manager.revision_count(), 1);
}

/// Revisions serialize as their content only.
#[test]
fn revision_serializes_content() {
    let manager = ticking_manager();
    let r0 = first_revision(&manager, RevisionInfo::new().creator("alice"));
    assert_eq!(
        serde_json::to_value(&r0).unwrap(),
        serde_json::json!({"title": "draft"})
    );
}

/// Updates from several threads against distinct entities.
#[test]
fn concurrent_entities() {
    let handles: Vec<_> = (0..4)
        .map(|t| {
            std::thread::spawn(move || {
                let manager = SimpleRevisionManager::new();
                let mut rev = first_revision(&manager, RevisionInfo::new());
                for i in 0..10 {
                    rev = revise(&rev, &format!("t{}", t), &format!("{}", i));
                }
                (manager.revision_count(), rev.version())
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), (11, 10));
    }
}
