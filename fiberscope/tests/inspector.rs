use fiberscope::diff::DiffReport;
use fiberscope::path::ValuePath;
use fiberscope::tree::fixture::{FixtureElement, FixtureFiber, FixtureHost};
use fiberscope::{EditOutcome, FiberNode, Inspector, InspectorOptions, Value};
use fiberscope_testhelpers::test;

struct Page {
    host: FixtureHost,
    body: FixtureElement,
    div: FixtureElement,
    counter: FixtureFiber,
}

fn props(count: i32, on_click: &str, children: &str) -> Value {
    Value::record([
        ("count", Value::from(count)),
        ("label", Value::from("hi")),
        ("onClick", Value::function("onClick", on_click)),
        ("style", Value::record([("color", Value::from("red"))])),
        ("big", Value::BigInt(10)),
        ("children", Value::from(children)),
    ])
}

fn page() -> Page {
    let mut host = FixtureHost::new();
    let body = host.element("body", None);
    let div = host.element("div", Some(&body));

    let root = host.root();
    let top = host.root_fiber(&root);
    let counter = host.component("Counter", &top);
    host.host_fiber(&div, &counter);

    let stale_top = host.root_fiber(&root);
    let stale_counter = host.component("Counter", &stale_top);
    host.link_alternates(&counter, &stale_counter);

    host.set_props(&stale_counter, props(1, "() => setCount(c => c + 1)", "old"));
    host.set_props(&counter, props(2, "() => setCount(c => c + 1)", "new"));

    host.register_root(&root);
    let renderer = host.renderer();
    host.inject_renderer(renderer);

    Page {
        host,
        body,
        div,
        counter,
    }
}

#[test]
fn inspects_the_owning_component() {
    let page = page();
    let inspector = Inspector::new(&page.host);
    let inspection = inspector.inspect(&page.div).unwrap();

    assert_eq!(inspection.name, "Counter");
    assert_eq!(inspection.fiber, page.counter);
    assert_eq!(inspection.element, Some(page.div.clone()));

    let changed: Vec<_> = inspection.changed.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(changed, ["count"]);

    let paths: Vec<_> = inspection
        .diff
        .changes
        .iter()
        .map(|c| c.path.to_string())
        .collect();
    assert_eq!(paths, ["count", "onClick", "children"]);
    assert!(inspection.diff.changes[1].is_same_function());
    assert!(inspection.diff.has_deep_changes);
    insta::assert_snapshot!(DiffReport::new(&inspection.diff).render_plain(), @r#"
    count: 1 → 2
    onClick: ƒ () => ... (same source)
    children: "old" → "new"
    "#);

    assert!(inspector.inspect(&page.body).is_none());
}

#[test]
fn root_fields() {
    let page = page();
    let inspector = Inspector::new(&page.host);
    let inspection = inspector.inspect(&page.div).unwrap();
    let fields = inspector.fields(&inspection, &ValuePath::root());

    let rows: Vec<_> = fields
        .iter()
        .map(|f| (f.display_path.as_str(), f.expandable, f.editable))
        .collect();
    assert_eq!(
        rows,
        [
            ("Counter.props.count", false, true),
            ("Counter.props.label", false, true),
            ("Counter.props.onClick", false, false),
            ("Counter.props.style", true, false),
            ("Counter.props.big", false, true),
        ]
    );
    assert_eq!(fields[0].initial_text(), "2");
    assert_eq!(fields[4].clipboard(), "10");
}

#[test]
fn nested_fields() {
    let page = page();
    let inspector = Inspector::new(&page.host);
    let inspection = inspector.inspect(&page.div).unwrap();
    let style = ValuePath::root().with("style");
    let fields = inspector.fields(&inspection, &style);

    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].key, "color");
    assert_eq!(fields[0].display_path, "Counter.props.style.color");
    assert_eq!(fields[0].path.to_string(), "style.color");
    assert!(fields[0].editable);

    assert!(
        inspector
            .fields(&inspection, &ValuePath::root().with("missing"))
            .is_empty()
    );
}

#[test]
fn children_can_be_shown() {
    let page = page();
    let inspector = Inspector::new(&page.host).with_options(InspectorOptions::new().skip_children(false));
    let inspection = inspector.inspect(&page.div).unwrap();

    let changed: Vec<_> = inspection.changed.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(changed, ["count", "children"]);
    let fields = inspector.fields(&inspection, &ValuePath::root());
    assert_eq!(fields.last().map(|f| f.key.as_str()), Some("children"));
}

#[test]
fn edits_are_applied_and_forwarded() {
    let page = page();
    let inspector = Inspector::new(&page.host);
    let inspection = inspector.inspect(&page.div).unwrap();
    let path = ValuePath::root().with("style").with("color");

    let EditOutcome::Applied {
        props,
        value,
        forwarded,
    } = inspector.commit_edit(&inspection, &path, "blue")
    else {
        panic!("edit was not applied");
    };
    assert_eq!(value, Value::from("blue"));
    assert_eq!(forwarded, 1);
    assert_eq!(
        props.get("style").and_then(|s| s.get("color")),
        Some(Value::from("blue"))
    );
    // the inspected props are a snapshot
    assert_eq!(
        inspection.props.get("style").and_then(|s| s.get("color")),
        Some(Value::from("red"))
    );
    // the renderer re-rendered with the override
    assert_eq!(
        page.counter
            .memoized_props()
            .get("style")
            .and_then(|s| s.get("color")),
        Some(Value::from("blue"))
    );
}

#[test]
fn edits_that_cannot_apply() {
    let page = page();
    let inspector = Inspector::new(&page.host);
    let inspection = inspector.inspect(&page.div).unwrap();
    let at = |key: &str| ValuePath::root().with(key);

    assert_eq!(
        inspector.commit_edit(&inspection, &at("big"), "1.5"),
        EditOutcome::Rejected {
            previous: Value::BigInt(10)
        }
    );
    assert_eq!(
        inspector.commit_edit(&inspection, &at("onClick"), "() => 1"),
        EditOutcome::NotEditable
    );
    assert_eq!(
        inspector.commit_edit(&inspection, &at("style"), "{}"),
        EditOutcome::NotEditable
    );
    assert_eq!(
        inspector.commit_edit(&inspection, &ValuePath::root(), "{}"),
        EditOutcome::NotEditable
    );
    assert_eq!(
        inspector.commit_edit(&inspection, &at("nope"), "1"),
        EditOutcome::NotFound
    );
}

#[test]
fn lists_inspectable_elements() {
    let page = page();
    let inspector = Inspector::new(&page.host);
    let found = inspector.inspectable_elements(&page.body);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].element, page.div);
    assert_eq!(found[0].name, "Counter");
}

#[test]
fn empty_fields_take_the_literal_typed() {
    let mut page = page();
    page.host.set_props(
        &page.counter,
        Value::record([
            ("title", Value::Null),
            ("limit", Value::Undefined),
            ("note", Value::Null),
        ]),
    );
    let inspector = Inspector::new(&page.host);
    let inspection = inspector.inspect(&page.div).unwrap();
    let at = |key: &str| ValuePath::root().with(key);

    let EditOutcome::Applied { props, value, .. } = inspector.commit_edit(&inspection, &at("title"), "\"hello\"")
    else {
        panic!("edit was not applied");
    };
    assert_eq!(value, Value::from("hello"));
    assert_eq!(props.get("title"), Some(Value::from("hello")));
    assert_eq!(page.counter.memoized_props().get("title"), Some(Value::from("hello")));

    let EditOutcome::Applied { value, .. } = inspector.commit_edit(&inspection, &at("limit"), "42") else {
        panic!("edit was not applied");
    };
    assert_eq!(value, Value::from(42));

    // bare words keep their quotes, as the literal reader spells them
    let EditOutcome::Applied { value, .. } = inspector.commit_edit(&inspection, &at("note"), "hi") else {
        panic!("edit was not applied");
    };
    assert_eq!(value, Value::from("\"hi\""));
}

#[test]
fn large_buffers_are_listed_without_walking_them() {
    let mut page = page();
    page.host.set_props(
        &page.counter,
        Value::record([
            ("pixels", Value::buffer(vec![7_u8; 1 << 21])),
            ("label", Value::from("hi")),
        ]),
    );
    let inspector = Inspector::new(&page.host);
    let inspection = inspector.inspect(&page.div).unwrap();

    let fields = inspector.fields(&inspection, &ValuePath::root());
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].preview, "ArrayBuffer(2097152)");
    assert!(fields[1].editable);

    let pixels = ValuePath::root().with("pixels");
    assert_eq!(
        inspector.commit_edit(&inspection, &pixels.with("3"), "1"),
        EditOutcome::NotFound
    );
}
