//! Display-path and segment formatting.

use fiberscope_path::{Section, ValuePath, ancestor_paths, build_path, format_path};
use fiberscope_testhelpers::test;

#[test]
fn index_segments_use_brackets() {
    insta::assert_snapshot!(format_path(&["a", "0", "b"]), @"a[0].b");
}

#[test]
fn consecutive_indices() {
    insta::assert_snapshot!(format_path(&["matrix", "1", "2"]), @"matrix[1][2]");
}

#[test]
fn leading_index_has_no_separator() {
    insta::assert_snapshot!(format_path(&["3", "label"]), @"[3].label");
}

#[test]
fn empty_segments_render_empty() {
    let empty: [&str; 0] = [];
    assert_eq!(format_path(&empty), "");
}

#[test]
fn signed_or_fractional_segments_are_keys() {
    insta::assert_snapshot!(format_path(&["a", "-1", "1.5"]), @"a.-1.1.5");
}

#[test]
fn value_path_displays_like_format_path() {
    let path: ValuePath = ["user", "tags", "2"].into_iter().collect();
    assert_eq!(path.to_string(), "user.tags[2]");
    assert_eq!(path.with("name").to_string(), "user.tags[2].name");
    assert_eq!(ValuePath::root().to_string(), "");
}

#[test]
fn build_path_per_section() {
    insta::assert_snapshot!(build_path("Todo", Section::Props.as_str(), None, "title"), @"Todo.props.title");
    insta::assert_snapshot!(build_path("Todo", Section::State.as_str(), None, "0"), @"Todo.state.0");
    insta::assert_snapshot!(build_path("Todo", Section::Context.as_str(), None, "locale"), @"Todo.context.context.locale");
}

#[test]
fn nested_fields_reuse_the_parent_path() {
    let parent = "props.style";
    let child = build_path("Todo", "props", Some(parent), "color");
    insta::assert_snapshot!(child, @"Todo.props.style.color");
}

#[test]
fn ancestors_walk_every_prefix() {
    let prefixes: Vec<_> = ancestor_paths("Todo.props.buffer.0.x").collect();
    assert_eq!(
        prefixes,
        [
            "Todo",
            "Todo.props",
            "Todo.props.buffer",
            "Todo.props.buffer.0",
            "Todo.props.buffer.0.x"
        ]
    );
}
