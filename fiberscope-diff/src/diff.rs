use std::collections::{HashMap, HashSet};

use fiberscope_path::ValuePath;
use fiberscope_value::{Value, ValueId, format_preview};
use indexmap::IndexMap;

/// Marker stored as both sides of a change cut short by a cycle.
pub const CIRCULAR: &str = "[Circular]";

/// What kind of values a diff compared at its root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffShape {
    /// Scalars, functions, or a scalar against anything.
    Primitive,
    /// Two opaque reference values such as dates or promises.
    Reference,
    /// Two containers whose children were compared.
    Object,
}

/// One difference between two values.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffChange {
    /// Where the difference is, relative to the diffed values.
    pub path: ValuePath,
    /// The value before.
    pub previous: Value,
    /// The value after.
    pub current: Value,
    /// For two functions: whether their source text is the same.
    pub same_function: Option<bool>,
}

impl DiffChange {
    fn leaf(path: ValuePath, previous: &Value, current: &Value) -> Self {
        Self {
            path,
            previous: previous.clone(),
            current: current.clone(),
            same_function: None,
        }
    }

    fn circular(path: ValuePath) -> Self {
        Self {
            path,
            previous: Value::string(CIRCULAR),
            current: Value::string(CIRCULAR),
            same_function: None,
        }
    }

    /// Whether this change only marks where a cycle was cut.
    pub fn is_circular(&self) -> bool {
        self.previous.as_str() == Some(CIRCULAR) && self.current.as_str() == Some(CIRCULAR)
    }

    /// Whether this is a function that was recreated with identical source.
    pub fn is_same_function(&self) -> bool {
        self.same_function == Some(true)
    }
}

/// The outcome of [`diff`].
#[derive(Debug, Clone, PartialEq)]
pub struct DiffResult {
    /// What was compared at the root.
    pub shape: DiffShape,
    /// Every difference found, in key order.
    pub changes: Vec<DiffChange>,
    /// Whether any change is more than a recreated function or a cycle marker.
    pub has_deep_changes: bool,
}

impl DiffResult {
    fn unchanged(shape: DiffShape) -> Self {
        Self {
            shape,
            changes: Vec::new(),
            has_deep_changes: false,
        }
    }

    /// No differences at all.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Whether two values are functions with the same source text.
pub fn functions_equal(previous: &Value, current: &Value) -> bool {
    match (previous.as_function(), current.as_function()) {
        (Some(a), Some(b)) => a.source == b.source,
        _ => false,
    }
}

/// Compare two values.
///
/// ```
/// use fiberscope_diff::diff;
/// use fiberscope_value::Value;
///
/// let before = Value::record([("a", Value::from(1))]);
/// let after = Value::record::<&str>([]);
/// let result = diff(&before, &after);
/// assert_eq!(result.changes.len(), 1);
/// assert_eq!(result.changes[0].path.to_string(), "a");
/// ```
pub fn diff(previous: &Value, current: &Value) -> DiffResult {
    diff_at(previous, current, ValuePath::root())
}

/// Compare two values that live at `path`; every change path starts with it.
pub fn diff_at(previous: &Value, current: &Value, path: ValuePath) -> DiffResult {
    let mut seen = HashSet::new();
    diff_inner(previous, current, path, &mut seen)
}

fn diff_inner(previous: &Value, current: &Value, path: ValuePath, seen: &mut HashSet<ValueId>) -> DiffResult {
    if previous.is_identical(current) {
        return DiffResult::unchanged(DiffShape::Primitive);
    }

    if previous.as_function().is_some() && current.as_function().is_some() {
        let same = functions_equal(previous, current);
        trace!(%path, same, "comparing functions");
        return DiffResult {
            shape: DiffShape::Primitive,
            changes: vec![DiffChange {
                same_function: Some(same),
                ..DiffChange::leaf(path, previous, current)
            }],
            has_deep_changes: !same,
        };
    }

    if !previous.is_composite() || !current.is_composite() {
        let both_opaque = previous.kind().is_opaque_reference() && current.kind().is_opaque_reference();
        return DiffResult {
            shape: if both_opaque {
                DiffShape::Reference
            } else {
                DiffShape::Primitive
            },
            changes: vec![DiffChange::leaf(path, previous, current)],
            has_deep_changes: true,
        };
    }

    let (Some(prev_id), Some(curr_id)) = (previous.id(), current.id()) else {
        return DiffResult::unchanged(DiffShape::Object);
    };
    if seen.contains(&prev_id) && seen.contains(&curr_id) {
        debug!(%path, "cycle reached, not descending");
        return DiffResult {
            shape: DiffShape::Object,
            changes: vec![DiffChange::circular(path)],
            has_deep_changes: false,
        };
    }
    seen.insert(prev_id);
    seen.insert(curr_id);

    let mut pairs: IndexMap<String, (Value, Value)> = IndexMap::new();
    for (key, value) in children(previous) {
        pairs.insert(key, (value, Value::Undefined));
    }
    for (key, value) in children(current) {
        pairs.entry(key).or_insert((Value::Undefined, Value::Undefined)).1 = value;
    }

    let mut result = DiffResult::unchanged(DiffShape::Object);
    for (key, (prev_child, curr_child)) in pairs {
        if prev_child.is_identical(&curr_child) {
            continue;
        }

        let both_functions = prev_child.as_function().is_some() && curr_child.as_function().is_some();
        if both_functions || (prev_child.is_composite() && curr_child.is_composite()) {
            trace!(%path, %key, "descending");
            let nested = diff_inner(&prev_child, &curr_child, path.with(key), seen);
            result.has_deep_changes |= nested.has_deep_changes;
            result.changes.extend(nested.changes);
        } else {
            result.changes.push(DiffChange::leaf(path.with(key), &prev_child, &curr_child));
            result.has_deep_changes = true;
        }
    }
    result
}

/// The keyed children of a composite value.
///
/// Records use their field names, arrays, sets and buffers their positions,
/// and maps their keys: string keys verbatim, other keys by preview text.
/// Keys whose names coincide are numbered in map order.
fn children(value: &Value) -> Vec<(String, Value)> {
    let indexed = |items: &mut dyn Iterator<Item = Value>| -> Vec<(String, Value)> {
        items.enumerate().map(|(i, v)| (i.to_string(), v)).collect()
    };

    let children = match value {
        Value::Record(fields) => fields
            .read()
            .map(|f| f.iter().map(|(k, v)| (k.clone(), v.clone())).collect()),
        Value::Array(items) => items.read().map(|i| indexed(&mut i.iter().cloned())),
        Value::Set(items) => items.read().map(|i| indexed(&mut i.iter().cloned())),
        Value::Map(entries) => entries.read().map(|e| {
            let mut taken: HashMap<String, usize> = HashMap::new();
            e.iter()
                .map(|(k, v)| {
                    let key = k.as_str().map_or_else(|| format_preview(k), str::to_string);
                    // the nth key sharing a name is suffixed `#n`
                    let seen = taken.entry(key.clone()).or_insert(0);
                    *seen += 1;
                    let key = if *seen == 1 { key } else { format!("{key}#{seen}") };
                    (key, v.clone())
                })
                .collect()
        }),
        Value::Buffer(bytes) => bytes
            .read()
            .map(|b| indexed(&mut b.iter().map(|byte| Value::Number(f64::from(*byte))))),
        Value::BufferView(view) => Some(indexed(&mut view.elements().into_iter())),
        _ => Some(Vec::new()),
    };

    children.unwrap_or_else(|| {
        debug!(kind = %value.kind(), "container is mutably borrowed, treating it as empty");
        Vec::new()
    })
}
