//! Serialization Tests
//!
//! Managed objects serialize as their content.

use crate::common::*;
use serde_json::json;

#[test]
fn object_serializes_as_map() {
    let q = locked_q();
    assert_eq!(
        serde_json::to_value(&q).unwrap(),
        json!({"answer": 42, "name": "q"})
    );
}

#[test]
fn nested_graph_serializes() {
    let obj = ImmutableObject::create()
        .build(|o| {
            o.set("tags", vec!["a", "b"])?;
            o.set("child", locked_q())?;
            o.set("none", ())
        })
        .unwrap();
    assert_eq!(
        serde_json::to_value(&obj).unwrap(),
        json!({
            "child": {"answer": 42, "name": "q"},
            "none": null,
            "tags": ["a", "b"]
        })
    );
}

#[test]
fn json_document_round_trips_through_conformance() {
    let doc = json!({"a": [1, 2.5, null], "b": {"c": "d"}, "e": true});
    let map = ImmutableMap::create()
        .build(|m| {
            if let Input::Map(entries) = Input::from(doc.clone()) {
                for (k, v) in entries {
                    m.insert(k, v)?;
                }
            }
            Ok(())
        })
        .unwrap();
    assert_eq!(serde_json::to_value(&map).unwrap(), doc);
}

#[test]
fn set_serializes_in_insertion_order() {
    let set = ImmutableSet::from_values(["z", "a"]).unwrap();
    assert_eq!(serde_json::to_string(&set).unwrap(), r#"["z","a"]"#);
}

#[test]
fn lifecycle_enums_serialize() {
    let state = serde_json::to_string(&State::Locked).unwrap();
    let back: State = serde_json::from_str(&state).unwrap();
    assert_eq!(back, State::Locked);
    let mode: Mode = serde_json::from_str(&serde_json::to_string(&Mode::Slave).unwrap()).unwrap();
    assert_eq!(mode, Mode::Slave);
}
