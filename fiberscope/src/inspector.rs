use fiberscope_diff::{DiffResult, diff};
use fiberscope_path::{Section, ValuePath, build_path};
use fiberscope_tree::{
    FiberNode, Host, InputChange, InspectableElement, OverrideMethods, changed_inputs, changed_inputs_except,
    current_composite_from_element, find_component_element, list_inspectable_elements,
};
use fiberscope_value::{
    PreviewOptions, RenderedSnapshot, Value, apply_at_path, detect_literal, format_for_clipboard, format_initial_text,
    format_preview_with, is_editable, is_expandable, parse_typed_text, value_at_path,
};

/// How an [`Inspector`] reads and lays out props.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InspectorOptions {
    /// Never treat `<script>`, `<style>` and other non-visual elements as a
    /// component's element.
    pub exclude_non_visual: bool,
    /// Leave the `children` prop out of fields and changed inputs.
    pub skip_children: bool,
    /// Limits for field previews.
    pub preview: PreviewOptions,
}

impl Default for InspectorOptions {
    fn default() -> Self {
        Self {
            exclude_non_visual: true,
            skip_children: true,
            preview: PreviewOptions::default(),
        }
    }
}

impl InspectorOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether non-visual elements are skipped.
    pub fn exclude_non_visual(mut self, exclude: bool) -> Self {
        self.exclude_non_visual = exclude;
        self
    }

    /// Set whether the `children` prop is skipped.
    pub fn skip_children(mut self, skip: bool) -> Self {
        self.skip_children = skip;
        self
    }

    /// Use these preview limits.
    pub fn preview(mut self, preview: PreviewOptions) -> Self {
        self.preview = preview;
        self
    }
}

/// What an [`Inspector`] found for one element.
#[derive(Debug, Clone)]
pub struct Inspection<F: FiberNode> {
    /// The component, taken from the snapshot on screen.
    pub fiber: F,
    /// Its display name, `Unknown` when it has none.
    pub name: String,
    /// The element the component renders into.
    pub element: Option<F::Element>,
    /// Props of the latest render.
    pub props: Value,
    /// Props of the render before.
    pub previous_props: Value,
    /// Structural diff from `previous_props` to `props`.
    pub diff: DiffResult,
    /// Top-level props that changed.
    pub changed: Vec<InputChange>,
}

/// One row of the props view.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    /// Key within the parent value.
    pub key: String,
    /// Location within the props.
    pub path: ValuePath,
    /// Display path, such as `Counter.props.items.0`.
    pub display_path: String,
    /// The value shown.
    pub value: Value,
    /// One-line preview.
    pub preview: String,
    /// Whether the row has children to show.
    pub expandable: bool,
    /// Whether the row accepts edits.
    pub editable: bool,
}

impl FieldView {
    /// Text copied to the clipboard, built on demand.
    pub fn clipboard(&self) -> String {
        format_for_clipboard(&self.value)
    }

    /// Text an editor starts from.
    pub fn initial_text(&self) -> String {
        format_initial_text(&self.value)
    }
}

/// Result of [`Inspector::commit_edit`].
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// The edit was applied.
    Applied {
        /// Props with the edit in place. The inspected props are untouched.
        props: Value,
        /// The parsed value.
        value: Value,
        /// How many renderers accepted the override.
        forwarded: usize,
    },
    /// The text doesn't parse as the field's kind.
    Rejected {
        /// The value the field keeps.
        previous: Value,
    },
    /// The field can't be edited.
    NotEditable,
    /// Nothing lives at the path.
    NotFound,
}

/// Inspects components through a [`Host`].
pub struct Inspector<'h, H: Host> {
    host: &'h H,
    options: InspectorOptions,
}

impl<'h, H: Host> Inspector<'h, H> {
    /// An inspector with default options.
    pub fn new(host: &'h H) -> Self {
        Self {
            host,
            options: InspectorOptions::default(),
        }
    }

    /// Replace the options.
    pub fn with_options(mut self, options: InspectorOptions) -> Self {
        self.options = options;
        self
    }

    /// The options in use.
    pub fn options(&self) -> &InspectorOptions {
        &self.options
    }

    /// Every element under `root` that can be inspected.
    pub fn inspectable_elements(&self, root: &H::Element) -> Vec<InspectableElement<H::Element>> {
        list_inspectable_elements(self.host, root)
    }

    /// Inspect the component that owns `element`.
    pub fn inspect(&self, element: &H::Element) -> Option<Inspection<H::Fiber>> {
        let fiber = current_composite_from_element(self.host, element)?;
        let name = fiber.display_name().unwrap_or_else(|| "Unknown".to_string());
        let props = fiber.memoized_props();
        let previous_props = fiber.previous_props();
        let changed = if self.options.skip_children {
            changed_inputs(&fiber)
        } else {
            changed_inputs_except(&fiber, &[])
        };
        debug!(%name, changed = changed.len(), "inspecting component");

        Some(Inspection {
            element: find_component_element(&fiber, self.options.exclude_non_visual),
            diff: diff(&previous_props, &props),
            fiber,
            name,
            props,
            previous_props,
            changed,
        })
    }

    /// The rows under `parent` (the root props for an empty path).
    pub fn fields(&self, inspection: &Inspection<H::Fiber>, parent: &ValuePath) -> Vec<FieldView> {
        let Some(parent_value) = value_at_path(&inspection.props, parent.segments()) else {
            return Vec::new();
        };
        let snapshot = ancestor_snapshot(&inspection.name, &inspection.props, parent);
        let parent_display = display_parent(&inspection.name, parent);
        let addressable = matches!(parent_value, Value::Record(_) | Value::Array(_) | Value::Map(_));

        entries(&parent_value)
            .into_iter()
            .filter(|(key, _)| !(parent.is_empty() && self.options.skip_children && key == "children"))
            .map(|(key, value)| {
                let path = parent.with(key.as_str());
                FieldView {
                    display_path: display_path(&inspection.name, &path),
                    preview: format_preview_with(&value, &self.options.preview),
                    expandable: is_expandable(&value),
                    editable: addressable && is_editable(&value, parent_display.as_deref(), &snapshot),
                    key,
                    path,
                    value,
                }
            })
            .collect()
    }

    /// Parse `text` as the new value at `path` and push it to the renderers.
    pub fn commit_edit(&self, inspection: &Inspection<H::Fiber>, path: &ValuePath, text: &str) -> EditOutcome {
        let Some(current) = value_at_path(&inspection.props, path.segments()) else {
            debug!(%path, "nothing to edit");
            return EditOutcome::NotFound;
        };

        let Some((_, rest)) = path.segments().split_last() else {
            return EditOutcome::NotEditable;
        };
        let parent = ValuePath::from(rest.to_vec());
        let snapshot = ancestor_snapshot(&inspection.name, &inspection.props, &parent);
        let parent_display = display_parent(&inspection.name, &parent);
        if !is_editable(&current, parent_display.as_deref(), &snapshot) {
            return EditOutcome::NotEditable;
        }

        // an empty field has no shape to parse against, so the text says what it is
        let value = if current.is_nullish() {
            detect_literal(text).value
        } else {
            let parsed = parse_typed_text(text, &current);
            if !parsed.succeeded {
                debug!(%path, text, "edit text rejected");
                return EditOutcome::Rejected { previous: parsed.value };
            }
            parsed.value
        };

        let props = apply_at_path(&inspection.props, path.segments(), value.clone());
        let forwarded = OverrideMethods::collect(self.host).override_props(&inspection.fiber, path.segments(), &value);
        trace!(%path, forwarded, "edit applied");
        EditOutcome::Applied {
            props,
            value,
            forwarded,
        }
    }
}

/// `Name.props.a.b` for the path `a.b`.
fn display_path(component: &str, path: &ValuePath) -> String {
    match path.segments().split_last() {
        Some((key, [])) => build_path(component, Section::Props.as_str(), None, key),
        Some((key, parent)) => {
            let parent = format!("{}.{}", Section::Props, parent.join("."));
            build_path(component, Section::Props.as_str(), Some(&parent), key)
        }
        None => format!("{component}.{}", Section::Props),
    }
}

/// Display path of a parent, `None` for the props root.
fn display_parent(component: &str, parent: &ValuePath) -> Option<String> {
    (!parent.is_empty()).then(|| display_path(component, parent))
}

/// Keyed children of a value, the way the props view lists them.
fn entries(value: &Value) -> Vec<(String, Value)> {
    let indexed = |items: Vec<Value>| -> Vec<(String, Value)> {
        items.into_iter().enumerate().map(|(i, v)| (i.to_string(), v)).collect()
    };
    match value {
        Value::Record(fields) => fields
            .read()
            .map(|f| f.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default(),
        Value::Array(items) => items.read().map(|i| indexed(i.clone())).unwrap_or_default(),
        Value::Set(items) => items
            .read()
            .map(|i| indexed(i.iter().cloned().collect()))
            .unwrap_or_default(),
        Value::Map(entries) => entries
            .read()
            .map(|e| {
                e.iter()
                    .map(|(k, v)| {
                        let key = k
                            .as_str()
                            .map_or_else(|| format_preview_with(k, &PreviewOptions::default()), str::to_string);
                        (key, v.clone())
                    })
                    .collect()
            })
            .unwrap_or_default(),
        Value::Buffer(bytes) => bytes
            .read()
            .map(|b| indexed(b.iter().map(|byte| Value::Number(f64::from(*byte))).collect()))
            .unwrap_or_default(),
        Value::BufferView(view) => indexed(view.elements()),
        _ => Vec::new(),
    }
}

/// The values along `path`, each under its display path.
///
/// Stops below the first binary value, since nothing under it is editable.
fn ancestor_snapshot(component: &str, props: &Value, path: &ValuePath) -> RenderedSnapshot {
    let mut snapshot = RenderedSnapshot::new();
    let mut current = props.clone();
    let mut walked = ValuePath::root();
    for segment in path.segments() {
        let Some(next) = value_at_path(&current, core::slice::from_ref(segment)) else {
            break;
        };
        walked.push(segment.as_str());
        let binary = next.kind().is_binary();
        snapshot.insert(display_path(component, &walked), next.clone());
        if binary {
            break;
        }
        current = next;
    }
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_paths_nest_under_props() {
        let path: ValuePath = ["items", "0", "label"].into_iter().collect();
        assert_eq!(display_path("List", &path), "List.props.items.0.label");
        assert_eq!(display_path("List", &ValuePath::root().with("count")), "List.props.count");
        assert_eq!(display_parent("List", &ValuePath::root()), None);
    }

    #[test]
    fn snapshot_follows_the_path_and_stops_at_binary_values() {
        let props = Value::record([
            (
                "data",
                Value::record([("bytes", Value::buffer(vec![1_u8, 2]))]),
            ),
            ("other", Value::record([("x", Value::from(1))])),
        ]);
        let path: ValuePath = ["data", "bytes", "0"].into_iter().collect();
        let snapshot = ancestor_snapshot("Chart", &props, &path);
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.get("Chart.props.data").is_some());
        assert!(snapshot.get("Chart.props.other").is_none());
        assert!(snapshot.get("Chart.props.data.bytes.0").is_none());
        assert!(snapshot.has_binary_ancestor("Chart.props.data.bytes"));
    }

    #[test]
    fn snapshot_of_a_large_buffer_is_one_entry() {
        let props = Value::record([("pixels", Value::buffer(vec![0_u8; 1 << 21]))]);
        let path: ValuePath = ["pixels", "5"].into_iter().collect();
        let snapshot = ancestor_snapshot("Canvas", &props, &path);
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.has_binary_ancestor("Canvas.props.pixels"));
    }

    #[test]
    fn cyclic_props_follow_only_the_path() {
        let fields = fiberscope_value::Shared::new(fiberscope_value::Record::new());
        let props = Value::Record(fields.clone());
        fields
            .try_borrow_mut()
            .unwrap()
            .insert("me".to_string(), props.clone());
        let path: ValuePath = ["me", "me", "me"].into_iter().collect();
        let snapshot = ancestor_snapshot("Loop", &props, &path);
        assert_eq!(snapshot.len(), 3);
        assert!(snapshot.get("Loop.props.me.me.me").is_some());
    }
}
