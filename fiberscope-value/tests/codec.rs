//! Display, clipboard and edit round trips.

use fiberscope_testhelpers::test;
use fiberscope_value::{
    MAX_INDEX_GAP, RenderedSnapshot, Shared, UpdateError, Value, ViewKind, apply_at_path, detect_literal,
    format_for_clipboard, format_initial_text, format_preview, is_editable, parse_array_text, parse_typed_text,
    try_apply_at_path,
};

#[test]
fn initial_text_reads_back_as_the_same_literal() {
    let cases = [
        Value::Undefined,
        Value::Null,
        Value::Bool(true),
        Value::Bool(false),
        Value::from("abc"),
        Value::from(42),
        Value::from(-3.5),
    ];
    for value in cases {
        let text = format_initial_text(&value);
        assert_eq!(detect_literal(&text).value, value, "round trip of {text}");
    }
}

#[test]
fn map_clipboard_is_entry_pairs() {
    let value = Value::map([
        (Value::from("theme"), Value::from("dark")),
        (Value::from(2), Value::Null),
    ]);
    insta::assert_snapshot!(format_for_clipboard(&value), @r#"
    [
      [
        "theme",
        "dark"
      ],
      [
        2,
        null
      ]
    ]
    "#);
}

#[test]
fn set_and_typed_array_clipboard() {
    let set = Value::set([Value::from("a"), Value::from("a"), Value::from("b")]);
    insta::assert_snapshot!(format_for_clipboard(&set), @r#"
    [
      "a",
      "b"
    ]
    "#);

    let view = Value::typed(ViewKind::Int8, [0xff_u8, 1]);
    insta::assert_snapshot!(format_for_clipboard(&view), @r"
    [
      -1,
      1
    ]
    ");
}

#[test]
fn data_view_copies_its_whole_buffer() {
    let buffer = Shared::new(vec![1_u8, 2, 3, 4]);
    let view = Value::view(ViewKind::DataView, buffer, 1, 2);
    assert_eq!(format_for_clipboard(&view).lines().count(), 6);
}

#[test]
fn function_clipboard_is_normalized() {
    let f = Value::function("inc", "() => {   setCount(c => c + 1);   }");
    assert_eq!(
        format_for_clipboard(&f),
        "() => {\n  setCount(c => c + 1);\n  \n}"
    );
}

#[test]
fn scalar_previews() {
    assert_eq!(format_preview(&Value::from(1e21)), "1e+21");
    assert_eq!(format_preview(&Value::BigInt(-12)), "-12");
    assert_eq!(format_preview(&Value::function("f", "(a, b) => a")), "ƒ (a,b) => ...");
    assert_eq!(format_preview(&Value::error("RangeError", "too big")), "RangeError: too big");
}

#[test]
fn array_text_parses_nested_literals() {
    assert_eq!(
        parse_array_text(r#"1, "a,b", [2,3]"#),
        [
            Value::from(1),
            Value::from("a,b"),
            Value::array([Value::from(2), Value::from(3)]),
        ]
    );
}

#[test]
fn typed_parsing_follows_the_current_value() {
    let number = parse_typed_text("12", &Value::from(0));
    assert!(number.succeeded);
    assert_eq!(number.value, Value::from(12));

    let text = parse_typed_text("12", &Value::from(""));
    assert_eq!(text.value, Value::from("12"));

    let flag = parse_typed_text("yes", &Value::Bool(true));
    assert_eq!(flag.value, Value::Bool(false));

    let nan = parse_typed_text("twelve", &Value::from(0));
    assert!(nan.succeeded);
    assert!(nan.value.as_number().is_some_and(f64::is_nan));

    let current = Value::BigInt(1);
    let big = parse_typed_text("1.5", &current);
    assert!(!big.succeeded);
    assert!(big.value.is_identical(&current));

    let list = parse_typed_text("[1, two]", &Value::array([]));
    assert_eq!(list.value, Value::array([Value::from(1), Value::from("two")]));

    let record = parse_typed_text("{size: 3, label: \"x\"}", &Value::record::<&str>([]));
    assert_eq!(
        record.value,
        Value::record([("size", Value::from(3)), ("label", Value::from("x"))])
    );

    let map = parse_typed_text("{a => 1, b => true}", &Value::map([]));
    assert_eq!(
        map.value,
        Value::map([(Value::from("a"), Value::from(1)), (Value::from("b"), Value::Bool(true))])
    );
}

#[test]
fn fields_below_buffers_are_read_only() {
    let mut snapshot = RenderedSnapshot::new();
    snapshot.insert("Upload.props.file", Value::buffer(vec![0_u8; 8]));

    // two levels below the buffer
    assert!(!is_editable(&Value::from(0), Some("Upload.props.file.0.1"), &snapshot));
    assert!(is_editable(&Value::from(0), Some("Upload.props.name"), &snapshot));
}

#[test]
fn edits_never_touch_the_original() {
    let props = Value::record([
        ("style", Value::record([("color", Value::from("red"))])),
        ("count", Value::from(1)),
    ]);
    let edited = apply_at_path(&props, &["style", "color"], Value::from("blue"));

    assert_eq!(
        props.get("style").and_then(|s| s.get("color")),
        Some(Value::from("red"))
    );
    assert_eq!(
        edited.get("style").and_then(|s| s.get("color")),
        Some(Value::from("blue"))
    );
    assert!(edited.get("count").is_some_and(|c| c.is_identical(&Value::from(1))));
}

#[test]
fn far_indices_leave_the_array_alone() {
    let items = Value::array([Value::from(1)]);

    let max = usize::MAX.to_string();
    assert_eq!(
        try_apply_at_path(&items, &[max.as_str()], Value::from(2)),
        Err(UpdateError::IndexOutOfRange {
            index: usize::MAX,
            len: 1
        })
    );
    let edited = apply_at_path(&items, &["4000000000"], Value::from(2));
    assert!(edited.is_identical(&items));

    let nested = Value::record([("list", items.clone())]);
    let edited = apply_at_path(&nested, &["list", "99999999999"], Value::from(2));
    assert!(edited.is_identical(&nested));

    // within the gap, holes are filled with undefined
    let padded = apply_at_path(&items, &["3"], Value::from(4));
    assert_eq!(
        padded,
        Value::array([Value::from(1), Value::Undefined, Value::Undefined, Value::from(4)])
    );
    let last = MAX_INDEX_GAP.to_string();
    let grown = apply_at_path(&items, &[last.as_str()], Value::from(0));
    assert_eq!(grown.as_array().and_then(|a| a.read().map(|a| a.len())), Some(MAX_INDEX_GAP + 1));
}
