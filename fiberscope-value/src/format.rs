//! Display, clipboard and edit-field text for values.

use chrono::{DateTime, SecondsFormat, Utc};
use fiberscope_pretty::{function_preview, normalize_function_source};

use crate::json::to_json;
use crate::number::number_to_string;
use crate::{FormatError, Value, ValueId};

/// ISO-8601 with millisecond precision and a `Z` suffix.
pub(crate) fn iso_string(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Limits applied by [`format_preview_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewOptions {
    /// Strings longer than this many characters are truncated.
    pub max_string_chars: usize,
    /// How many characters of a truncated string are kept.
    pub truncated_prefix_chars: usize,
    /// How many record keys are listed before `...`.
    pub max_record_keys: usize,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            max_string_chars: 150,
            truncated_prefix_chars: 20,
            max_record_keys: 2,
        }
    }
}

impl PreviewOptions {
    /// Default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Truncate strings longer than `chars`.
    pub fn max_string_chars(mut self, chars: usize) -> Self {
        self.max_string_chars = chars;
        self
    }

    /// Keep `chars` characters of a truncated string.
    pub fn truncated_prefix_chars(mut self, chars: usize) -> Self {
        self.truncated_prefix_chars = chars;
        self
    }

    /// List at most `keys` record keys.
    pub fn max_record_keys(mut self, keys: usize) -> Self {
        self.max_record_keys = keys;
        self
    }
}

/// Compact one-line preview shown next to a field name.
///
/// ```
/// use fiberscope_value::{Value, format_preview};
///
/// assert_eq!(format_preview(&Value::array([Value::from(1), Value::from(2)])), "Array(2)");
/// assert_eq!(format_preview(&Value::from("hi")), "\"hi\"");
/// ```
pub fn format_preview(value: &Value) -> String {
    format_preview_with(value, &PreviewOptions::default())
}

/// [`format_preview`] with explicit limits.
pub fn format_preview_with(value: &Value, options: &PreviewOptions) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Undefined => "undefined".to_string(),
        Value::String(s) => {
            if s.chars().count() > options.max_string_chars {
                let prefix: String = s.chars().take(options.truncated_prefix_chars).collect();
                format!("\"{prefix}...\"")
            } else {
                format!("\"{s}\"")
            }
        }
        Value::Number(n) => number_to_string(*n),
        Value::Bool(b) => b.to_string(),
        Value::BigInt(n) => n.to_string(),
        Value::Function(f) => function_preview(&f.source, false),
        Value::Array(items) => format!("Array({})", items.read().map_or(0, |i| i.len())),
        Value::Map(entries) => format!("Map({})", entries.read().map_or(0, |e| e.len())),
        Value::Set(items) => format!("Set({})", items.read().map_or(0, |i| i.len())),
        Value::Date(date) => match &date.time {
            Some(time) => iso_string(time),
            None => "Invalid Date".to_string(),
        },
        Value::RegExp(re) => re.literal(),
        Value::Error(err) => format!("{}: {}", err.name, err.message),
        Value::Buffer(bytes) => format!("ArrayBuffer({})", bytes.read().map_or(0, |b| b.len())),
        Value::BufferView(view) => format!("{}({})", view.kind.name(), view.len()),
        Value::Promise(_) => "Promise".to_string(),
        Value::Record(fields) => {
            let Some(fields) = fields.read() else {
                return "{}".to_string();
            };
            let shown: Vec<&str> = fields
                .keys()
                .take(options.max_record_keys)
                .map(String::as_str)
                .collect();
            if fields.len() > options.max_record_keys {
                format!("{{{}, ...}}", shown.join(", "))
            } else {
                format!("{{{}}}", shown.join(", "))
            }
        }
    }
}

/// Text copied to the clipboard for a value.
///
/// Containers become two-space indented JSON (maps as `[key, value]` pairs,
/// buffers and views as their numeric contents). When that fails, for example
/// on a cycle or a nested bigint, the host string conversion is used instead.
pub fn format_for_clipboard(value: &Value) -> String {
    try_format_for_clipboard(value).unwrap_or_else(|_err| {
        debug!(error = %_err, kind = %value.kind(), "clipboard formatting fell back to string conversion");
        to_js_string(value)
    })
}

/// [`format_for_clipboard`] without the fallback.
pub fn try_format_for_clipboard(value: &Value) -> Result<String, FormatError> {
    let json = |value: &Value| to_json(value).map(Option::unwrap_or_default);
    let borrowed = || FormatError::Borrowed(value.kind());

    match value {
        Value::Null => Ok("null".to_string()),
        Value::Undefined => Ok("undefined".to_string()),
        Value::Promise(_) => Ok("Promise".to_string()),
        Value::Function(f) => Ok(normalize_function_source(&f.source)),
        Value::Date(date) => date.time.as_ref().map(iso_string).ok_or(FormatError::InvalidDate),
        Value::RegExp(re) => Ok(re.literal()),
        Value::Error(err) => Ok(format!("{}: {}", err.name, err.message)),
        Value::Map(entries) => {
            let pairs = entries
                .read()
                .ok_or_else(borrowed)?
                .iter()
                .map(|(k, v)| Value::array([k.clone(), v.clone()]))
                .collect::<Vec<_>>();
            json(&Value::array(pairs))
        }
        Value::Set(items) => {
            let items = items.read().ok_or_else(borrowed)?.iter().cloned().collect::<Vec<_>>();
            json(&Value::array(items))
        }
        Value::BufferView(view) if !view.kind.is_typed_array() => json(&bytes_array(&view.buffer_bytes())),
        Value::BufferView(view) => json(&Value::array(view.elements())),
        Value::Buffer(bytes) => json(&bytes_array(&bytes.read().ok_or_else(borrowed)?)),
        Value::Array(_) | Value::Record(_) => json(value),
        Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::BigInt(_) => Ok(to_js_string(value)),
    }
}

fn bytes_array(bytes: &[u8]) -> Value {
    Value::array(bytes.iter().map(|b| Value::Number(f64::from(*b))))
}

/// The host's `String(value)` conversion.
pub fn to_js_string(value: &Value) -> String {
    let mut seen = Vec::new();
    js_string(value, &mut seen)
}

fn js_string(value: &Value, seen: &mut Vec<ValueId>) -> String {
    match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_to_string(*n),
        Value::BigInt(n) => n.to_string(),
        Value::String(s) => s.to_string(),
        Value::Date(date) => match &date.time {
            Some(time) => time
                .format("%a %b %d %Y %H:%M:%S GMT+0000 (Coordinated Universal Time)")
                .to_string(),
            None => "Invalid Date".to_string(),
        },
        Value::RegExp(re) => re.literal(),
        Value::Error(err) if err.message.is_empty() => err.name.clone(),
        Value::Error(err) => format!("{}: {}", err.name, err.message),
        Value::Function(f) => f.source.clone(),
        Value::Array(items) => {
            let Some(id) = value.id().filter(|id| !seen.contains(id)) else {
                return String::new();
            };
            let Some(items) = items.read() else {
                return String::new();
            };
            seen.push(id);
            let joined = join(items.iter(), seen);
            seen.pop();
            joined
        }
        Value::BufferView(view) if view.kind.is_typed_array() => join(view.elements().iter(), seen),
        Value::BufferView(_) => "[object DataView]".to_string(),
        Value::Buffer(_) => "[object ArrayBuffer]".to_string(),
        Value::Map(_) => "[object Map]".to_string(),
        Value::Set(_) => "[object Set]".to_string(),
        Value::Promise(_) => "[object Promise]".to_string(),
        Value::Record(_) => "[object Object]".to_string(),
    }
}

fn join<'a>(items: impl Iterator<Item = &'a Value>, seen: &mut Vec<ValueId>) -> String {
    items
        .map(|item| match item {
            Value::Null | Value::Undefined => String::new(),
            other => js_string(other, seen),
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Text an edit field starts with.
///
/// Strings are quoted so [`crate::detect_literal`] reads them back as strings.
/// Dates use their ISO form so they parse back into the same instant.
pub fn format_initial_text(value: &Value) -> String {
    match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::String(s) => format!("\"{s}\""),
        Value::Date(date) => match &date.time {
            Some(time) => iso_string(time),
            None => "Invalid Date".to_string(),
        },
        other => to_js_string(other),
    }
}

/// Replace values that must not be touched while displaying with a placeholder.
///
/// Promises become the string `"Promise"`; everything else is returned as is.
pub fn safe_value(value: &Value) -> Value {
    match value {
        Value::Promise(_) => Value::string("Promise"),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ViewKind;
    use chrono::TimeZone;

    #[test]
    fn long_strings_keep_a_short_prefix() {
        let long = "x".repeat(151);
        assert_eq!(format_preview(&Value::string(&long)), format!("\"{}...\"", "x".repeat(20)));
        let exact = "y".repeat(150);
        assert_eq!(format_preview(&Value::string(&exact)), format!("\"{exact}\""));
    }

    #[test]
    fn record_preview_lists_two_keys() {
        let three = Value::record([("a", Value::Null), ("b", Value::Null), ("c", Value::Null)]);
        assert_eq!(format_preview(&three), "{a, b, ...}");
        let two = Value::record([("a", Value::Null), ("b", Value::Null)]);
        assert_eq!(format_preview(&two), "{a, b}");
        assert_eq!(format_preview(&Value::record::<&str>([])), "{}");
    }

    #[test]
    fn preview_limits_are_configurable() {
        let options = PreviewOptions::new().max_string_chars(3).truncated_prefix_chars(1);
        assert_eq!(format_preview_with(&Value::from("abcd"), &options), "\"a...\"");
    }

    #[test]
    fn binary_previews() {
        assert_eq!(format_preview(&Value::buffer([0_u8; 4])), "ArrayBuffer(4)");
        assert_eq!(format_preview(&Value::typed(ViewKind::Uint16, [0_u8; 6])), "Uint16Array(3)");
    }

    #[test]
    fn date_strings() {
        let time = Utc.with_ymd_and_hms(2024, 1, 5, 9, 30, 0).unwrap();
        let date = Value::date(time);
        assert_eq!(try_format_for_clipboard(&date).unwrap(), "2024-01-05T09:30:00.000Z");
        assert_eq!(
            to_js_string(&date),
            "Fri Jan 05 2024 09:30:00 GMT+0000 (Coordinated Universal Time)"
        );
        assert_eq!(format_for_clipboard(&Value::invalid_date()), "Invalid Date");
    }

    #[test]
    fn arrays_join_like_the_host() {
        let value = Value::array([Value::from(1), Value::Null, Value::array([Value::from("a"), Value::from("b")])]);
        assert_eq!(to_js_string(&value), "1,,a,b");
    }

    #[test]
    fn cyclic_clipboard_falls_back() {
        let fields = crate::Shared::new(crate::Record::new());
        let value = Value::Record(fields.clone());
        fields.try_borrow_mut().unwrap().insert("me".into(), value.clone());
        assert_eq!(try_format_for_clipboard(&value), Err(FormatError::Cycle));
        assert_eq!(format_for_clipboard(&value), "[object Object]");
    }

    #[test]
    fn nested_bigint_falls_back() {
        let value = Value::array([Value::BigInt(5), Value::from(1)]);
        assert_eq!(format_for_clipboard(&value), "5,1");
    }

    #[test]
    fn safe_value_hides_promises() {
        assert_eq!(safe_value(&Value::promise()).as_str(), Some("Promise"));
        assert_eq!(safe_value(&Value::from(3)).as_number(), Some(3.0));
    }
}
