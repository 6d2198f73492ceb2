//! Which values can be expanded or edited in place.

use std::collections::HashMap;

use fiberscope_path::ancestor_paths;

use crate::{Value, ValueKind};

/// The last value rendered at each display path.
///
/// Built by whoever renders the field list and handed to [`is_editable`], so
/// editability can depend on what a field's ancestors are.
#[derive(Debug, Clone, Default)]
pub struct RenderedSnapshot {
    values: HashMap<String, Value>,
}

impl RenderedSnapshot {
    /// An empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the value rendered at `path`.
    pub fn insert(&mut self, path: impl Into<String>, value: Value) {
        self.values.insert(path.into(), value);
    }

    /// The value rendered at `path`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.values.get(path)
    }

    /// Number of recorded paths.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether `path` or any dotted prefix of it holds a buffer or view.
    pub fn has_binary_ancestor(&self, path: &str) -> bool {
        ancestor_paths(path).any(|prefix| {
            self.get(prefix)
                .is_some_and(|value| value.kind().is_binary())
        })
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for RenderedSnapshot {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        let mut snapshot = Self::new();
        snapshot.extend(iter);
        snapshot
    }
}

impl<K: Into<String>> Extend<(K, Value)> for RenderedSnapshot {
    fn extend<T: IntoIterator<Item = (K, Value)>>(&mut self, iter: T) {
        for (path, value) in iter {
            self.insert(path, value);
        }
    }
}

/// Whether a value has children worth showing.
///
/// Buffers and views always do, even when empty. Other containers need at
/// least one entry. Promises, functions and scalar leaves never do.
pub fn is_expandable(value: &Value) -> bool {
    match value {
        Value::Buffer(_) | Value::BufferView(_) => true,
        Value::Array(items) => items.read().is_some_and(|i| !i.is_empty()),
        Value::Map(entries) => entries.read().is_some_and(|e| !e.is_empty()),
        Value::Set(items) => items.read().is_some_and(|i| !i.is_empty()),
        Value::Record(fields) => fields.read().is_some_and(|f| !f.is_empty()),
        _ => false,
    }
}

/// Whether a field showing `value` under `parent_path` accepts text edits.
///
/// `null` and `undefined` are always editable. Promises and functions never
/// are, nor is anything below a buffer or view. Dates, regexps, errors and
/// scalars are; containers are edited through their children.
pub fn is_editable(value: &Value, parent_path: Option<&str>, snapshot: &RenderedSnapshot) -> bool {
    let kind = value.kind();
    if matches!(kind, ValueKind::Null | ValueKind::Undefined) {
        return true;
    }
    if matches!(kind, ValueKind::Promise | ValueKind::Function) {
        return false;
    }
    if let Some(parent) = parent_path.filter(|p| !p.is_empty())
        && snapshot.has_binary_ancestor(parent)
    {
        trace!(parent, "field sits below a binary value");
        return false;
    }
    matches!(kind, ValueKind::Date | ValueKind::RegExp | ValueKind::Error) || kind.is_scalar()
}
