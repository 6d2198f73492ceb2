//! Diffing props the way the inspector sees them between renders.

use fiberscope_diff::{AggregatedChanges, DiffReport, DiffShape, diff, diff_at};
use fiberscope_path::ValuePath;
use fiberscope_testhelpers::test;
use fiberscope_value::{Record, Shared, Value};

fn self_referencing(n: i32) -> Value {
    let fields = Shared::new(Record::new());
    let value = Value::Record(fields.clone());
    let mut guard = fields.try_borrow_mut().unwrap();
    guard.insert("n".into(), Value::from(n));
    guard.insert("me".into(), value.clone());
    drop(guard);
    value
}

#[test]
fn removed_and_added_keys_are_symmetric() {
    let with = Value::record([("a", Value::from(1))]);
    let without = Value::record::<&str>([]);

    for result in [diff(&with, &without), diff(&without, &with)] {
        assert_eq!(result.shape, DiffShape::Object);
        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.changes[0].path.segments(), ["a"]);
        assert!(result.has_deep_changes);
    }

    let removed = diff(&with, &without);
    assert_eq!(removed.changes[0].current, Value::Undefined);
}

#[test]
fn equal_structures_have_no_changes() {
    let a = Value::record([("a", Value::from(1))]);
    let b = Value::record([("a", Value::from(1))]);
    let result = diff(&a, &b);
    assert!(result.is_empty());
    assert!(!result.has_deep_changes);
}

#[test]
fn cycles_terminate_with_a_marker() {
    let result = diff(&self_referencing(1), &self_referencing(2));
    let lines = DiffReport::new(&result).render_plain();
    insta::assert_snapshot!(lines, @r"
    n: 1 → 2
    me: [Circular]
    ");
    assert!(result.has_deep_changes);
    assert!(result.changes[1].is_circular());
}

#[test]
fn equal_cycles_are_not_deep_changes() {
    let result = diff(&self_referencing(1), &self_referencing(1));
    assert_eq!(result.shape, DiffShape::Object);
    assert_eq!(result.changes.len(), 1);
    assert!(result.changes[0].is_circular());
    assert_eq!(result.changes[0].path.segments(), ["me"]);
    assert!(!result.has_deep_changes);

    let mut tally = AggregatedChanges::new();
    tally.record_diff(&result);
    assert!(tally.is_empty());
}

#[test]
fn recreated_callbacks_are_not_deep_changes() {
    let same = diff(
        &Value::function("onClick", "() => setOpen(true)"),
        &Value::function("onClick", "() => setOpen(true)"),
    );
    assert_eq!(same.changes.len(), 1);
    assert_eq!(same.changes[0].same_function, Some(true));
    assert!(!same.has_deep_changes);

    let different = diff(
        &Value::function("onClick", "() => setOpen(true)"),
        &Value::function("onClick", "() => setOpen(false)"),
    );
    assert_eq!(different.changes[0].same_function, Some(false));
    assert!(different.has_deep_changes);
}

#[test]
fn props_between_renders() {
    let previous = Value::record([
        ("count", Value::from(1)),
        ("onClick", Value::function("", "() => increment()")),
    ]);
    let current = Value::record([
        ("count", Value::from(2)),
        ("onClick", Value::function("", "() => increment()")),
    ]);

    let result = diff(&previous, &current);
    assert_eq!(result.changes.len(), 2);

    let count = &result.changes[0];
    assert_eq!(count.path.to_string(), "count");
    assert_eq!(count.same_function, None);

    let on_click = &result.changes[1];
    assert_eq!(on_click.path.to_string(), "onClick");
    assert!(on_click.is_same_function());

    assert!(result.has_deep_changes);

    insta::assert_snapshot!(DiffReport::new(&result).render_plain(), @r"
    count: 1 → 2
    onClick: ƒ () => ... (same source)
    ");

    let mut tally = AggregatedChanges::new();
    tally.record_diff(&result);
    assert_eq!(tally.len(), 1);
    assert_eq!(tally.get("count").map(|c| c.count), Some(1));
}

#[test]
fn nested_paths_use_index_notation() {
    let previous = Value::record([(
        "items",
        Value::array([Value::record([("label", Value::from("a"))])]),
    )]);
    let current = Value::record([(
        "items",
        Value::array([Value::record([("label", Value::from("b"))])]),
    )]);
    let result = diff_at(&previous, &current, ValuePath::root().with("props"));
    assert_eq!(result.changes[0].path.to_string(), "props.items[0].label");
}

#[test]
fn scalar_against_container_is_one_change() {
    let result = diff(&Value::Null, &Value::array([Value::from(1)]));
    assert_eq!(result.shape, DiffShape::Primitive);
    assert_eq!(result.changes.len(), 1);
    assert!(result.changes[0].path.is_empty());
}
