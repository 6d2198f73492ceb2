//! Copy-on-write updates of nested values.
//!
//! Every container on the path to the edited location is shallow-cloned and
//! everything else is shared, so the original value is never mutated and
//! unchanged subtrees keep their identity.

use crate::{MapEntries, Shared, UpdateError, Value, ValueKind};

/// How far past the end of an array an update may write; the gap is filled with `undefined`.
pub const MAX_INDEX_GAP: usize = 1 << 16;

/// Whether `items` is a list of `{name, value}` records, addressed by name.
fn is_named_item_list(items: &[Value]) -> bool {
    !items.is_empty()
        && items.iter().all(|item| {
            item.as_record()
                .and_then(|r| r.read().map(|r| r.contains_key("name") && r.contains_key("value")))
                .unwrap_or(false)
        })
}

fn named_entry_index(items: &[Value], name: &str) -> Option<usize> {
    items
        .iter()
        .position(|item| item.get("name").and_then(|n| n.as_str().map(|n| n == name)).unwrap_or(false))
}

/// Leading decimal digits of `segment` as an index.
fn parse_index(segment: &str) -> Result<usize, UpdateError> {
    let digits: String = segment
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits
        .parse()
        .map_err(|_| UpdateError::InvalidIndex(segment.to_string()))
}

/// Return a copy of `root` with `value` placed at `path`.
///
/// Named item lists (arrays of `{name, value}` records) are addressed by
/// entry name, maps by string key, arrays by index and records by field. A
/// path that runs into a scalar replaces it. On any failure the original root
/// is returned unchanged.
///
/// ```
/// use fiberscope_value::{Value, apply_at_path};
///
/// let user = Value::record([("name", Value::from("Ada")), ("age", Value::from(36))]);
/// let older = apply_at_path(&user, &["age"], Value::from(37));
/// assert_eq!(older.get("age"), Some(Value::from(37)));
/// assert_eq!(user.get("age"), Some(Value::from(36)));
/// ```
pub fn apply_at_path<S: AsRef<str>>(root: &Value, path: &[S], value: Value) -> Value {
    try_apply_at_path(root, path, value).unwrap_or_else(|_err| {
        debug!(error = %_err, "update failed, keeping the original value");
        root.clone()
    })
}

/// [`apply_at_path`] with the reason for a failure.
pub fn try_apply_at_path<S: AsRef<str>>(root: &Value, path: &[S], value: Value) -> Result<Value, UpdateError> {
    let Some((key, rest)) = path.split_first() else {
        return Ok(value);
    };
    let key = key.as_ref();
    trace!(key, remaining = rest.len(), kind = %root.kind(), "applying update");

    let borrowed = || UpdateError::Borrowed(root.kind());
    let descend = |current: Value, value: Value| -> Result<Value, UpdateError> {
        if rest.is_empty() {
            Ok(value)
        } else {
            try_apply_at_path(&current, rest, value)
        }
    };

    match root {
        Value::Array(items) => {
            let mut next = items.read().ok_or_else(borrowed)?.clone();
            if is_named_item_list(&next) {
                let Some(index) = named_entry_index(&next, key) else {
                    return Ok(root.clone());
                };
                let Value::Record(entry) = &next[index] else {
                    return Ok(root.clone());
                };
                let mut entry = entry.read().ok_or(UpdateError::Borrowed(ValueKind::Record))?.clone();
                let current = entry.get("value").cloned().unwrap_or_default();
                entry.insert("value".to_string(), descend(current, value)?);
                next[index] = Value::Record(Shared::new(entry));
                return Ok(Value::Array(Shared::new(next)));
            }

            let index = parse_index(key)?;
            if index >= next.len() {
                let len = index
                    .checked_add(1)
                    .filter(|len| *len - next.len() <= MAX_INDEX_GAP)
                    .ok_or(UpdateError::IndexOutOfRange {
                        index,
                        len: next.len(),
                    })?;
                next.resize(len, Value::Undefined);
            }
            let current = core::mem::take(&mut next[index]);
            next[index] = descend(current, value)?;
            Ok(Value::Array(Shared::new(next)))
        }
        Value::Map(entries) => {
            let mut next: MapEntries = entries.read().ok_or_else(borrowed)?.clone();
            let current = next.get_str(key).cloned().unwrap_or_default();
            next.set(Value::string(key), descend(current, value)?);
            Ok(Value::Map(Shared::new(next)))
        }
        Value::Record(fields) => {
            let mut next = fields.read().ok_or_else(borrowed)?.clone();
            let current = next.get(key).cloned().unwrap_or_default();
            next.insert(key.to_string(), descend(current, value)?);
            Ok(Value::Record(Shared::new(next)))
        }
        _ => Ok(value),
    }
}

/// Read the value at `path`, resolving segments the way [`apply_at_path`] does.
pub fn value_at_path<S: AsRef<str>>(root: &Value, path: &[S]) -> Option<Value> {
    let Some((key, rest)) = path.split_first() else {
        return Some(root.clone());
    };
    let key = key.as_ref();

    let child = match root {
        Value::Array(items) => {
            let items = items.read()?;
            if is_named_item_list(&items) {
                items[named_entry_index(&items, key)?].get("value")?
            } else {
                items.get(parse_index(key).ok()?)?.clone()
            }
        }
        Value::Map(entries) => entries.read()?.get_str(key)?.clone(),
        Value::Record(fields) => fields.read()?.get(key)?.clone(),
        _ => return None,
    };
    value_at_path(&child, rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_list() -> Value {
        Value::array([
            Value::record([("name", Value::from("0")), ("value", Value::from(1))]),
            Value::record([
                ("name", Value::from("1")),
                ("value", Value::record([("open", Value::from(false))])),
            ]),
        ])
    }

    #[test]
    fn empty_path_replaces_root() {
        let root = Value::record([("a", Value::from(1))]);
        assert_eq!(apply_at_path::<&str>(&root, &[], Value::from(5)), Value::from(5));
    }

    #[test]
    fn untouched_siblings_keep_identity() {
        let nested = Value::array([Value::from(1)]);
        let root = Value::record([("keep", nested.clone()), ("edit", Value::from(1))]);
        let next = apply_at_path(&root, &["edit"], Value::from(2));
        assert!(next.get("keep").is_some_and(|v| v.is_identical(&nested)));
        assert!(!next.is_identical(&root));
        assert_eq!(root.get("edit"), Some(Value::from(1)));
    }

    #[test]
    fn named_items_are_addressed_by_name() {
        let root = state_list();
        let next = apply_at_path(&root, &["1", "open"], Value::from(true));
        assert_eq!(
            value_at_path(&next, &["1", "open"]),
            Some(Value::from(true))
        );
        assert_eq!(value_at_path(&root, &["1", "open"]), Some(Value::from(false)));

        let missing = apply_at_path(&root, &["7"], Value::from(0));
        assert!(missing.is_identical(&root));
    }

    #[test]
    fn arrays_pad_with_undefined() {
        let root = Value::array([Value::from("a")]);
        let next = apply_at_path(&root, &["3"], Value::from("d"));
        assert_eq!(
            next,
            Value::array([Value::from("a"), Value::Undefined, Value::Undefined, Value::from("d")])
        );
    }

    #[test]
    fn bad_index_keeps_root() {
        let root = Value::array([Value::from(1)]);
        assert_eq!(
            try_apply_at_path(&root, &["x"], Value::from(2)),
            Err(UpdateError::InvalidIndex("x".to_string()))
        );
        assert!(apply_at_path(&root, &["x"], Value::from(2)).is_identical(&root));
    }

    #[test]
    fn map_keys_are_set_or_inserted() {
        let root = Value::map([(Value::from("a"), Value::record([("x", Value::from(0))]))]);
        let next = apply_at_path(&root, &["a", "x"], Value::from(1));
        assert_eq!(value_at_path(&next, &["a", "x"]), Some(Value::from(1)));

        // a missing key holds undefined, so the rest of the path collapses
        let inserted = apply_at_path(&root, &["b", "c"], Value::from(2));
        assert_eq!(value_at_path(&inserted, &["b"]), Some(Value::from(2)));
        assert_eq!(value_at_path(&root, &["b"]), None);
    }

    #[test]
    fn scalars_on_the_path_are_replaced() {
        let root = Value::record([("a", Value::from(1))]);
        let next = apply_at_path(&root, &["a", "b"], Value::from(2));
        assert_eq!(next.get("a"), Some(Value::from(2)));
    }
}
