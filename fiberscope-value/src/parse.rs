//! Turning edit-field text back into values.
//!
//! The target shape is always the shape of the value being edited: the text
//! `12` becomes a number when a number is edited and stays a string when a
//! string is edited. Elements inside composite text (array items, map and
//! record values, set members) have no current value to go by, so they are
//! read as literals.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;

use crate::number::{parse_bigint, string_to_number};
use crate::{ParseError, Record, Value, ValueKind};

static REGEXP_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/(?<pattern>.*)/(?<flags>[gimuy]*)$")
        .unwrap_or_else(|e| panic!("regexp literal pattern is invalid: {e}"))
});

static NUMBER_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?[0-9]+(?:\.[0-9]+)?$").unwrap_or_else(|e| panic!("number literal pattern is invalid: {e}"))
});

/// Outcome of [`parse_typed_text`].
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    /// The parsed value, or the current value when parsing failed.
    pub value: Value,
    /// Whether `value` came from the text.
    pub succeeded: bool,
}

/// Parse `text` into a value shaped like `current`.
///
/// Never fails: when the text can't be read as that shape, `current` is
/// returned with `succeeded: false`. Numbers follow the host's `Number()`, so
/// unparseable text becomes `NaN` and still counts as success.
pub fn parse_typed_text(text: &str, current: &Value) -> Parsed {
    match try_parse_typed_text(text, current) {
        Ok(value) => Parsed {
            value,
            succeeded: true,
        },
        Err(_err) => {
            debug!(error = %_err, text, "edit text rejected, keeping current value");
            Parsed {
                value: current.clone(),
                succeeded: false,
            }
        }
    }
}

/// [`parse_typed_text`] with the reason for a failure.
pub fn try_parse_typed_text(text: &str, current: &Value) -> Result<Value, ParseError> {
    trace!(kind = %current.kind(), text, "parsing edit text");
    match current.kind() {
        ValueKind::Number => Ok(Value::Number(string_to_number(text))),
        ValueKind::String => Ok(Value::string(text)),
        ValueKind::Boolean => Ok(Value::Bool(text == "true")),
        ValueKind::BigInt => parse_bigint(text)
            .map(Value::BigInt)
            .ok_or_else(|| ParseError::InvalidBigInt(text.to_string())),
        ValueKind::Undefined => Ok(Value::Undefined),
        ValueKind::Null => Ok(Value::Null),
        ValueKind::Array => Ok(Value::array(parse_array_text(strip_delimiters(text)))),
        ValueKind::RegExp => parse_regexp(text),
        ValueKind::Map => Ok(Value::map(split_top_level(strip_delimiters(text)).iter().map(|entry| {
            match entry.split_once(" => ") {
                Some((key, value)) => (parse_element(key), parse_element(value)),
                None => (parse_element(entry), Value::Undefined),
            }
        }))),
        ValueKind::Set => Ok(Value::set(
            split_top_level(strip_delimiters(text)).iter().map(|item| parse_element(item)),
        )),
        ValueKind::Record => Ok(Value::Record(crate::Shared::new(parse_record_entries(
            strip_delimiters(text),
        )))),
        ValueKind::Date => parse_date(text),
        ValueKind::Error => Ok(parse_error(text)),
        kind @ (ValueKind::Function | ValueKind::Promise | ValueKind::Buffer | ValueKind::BufferView) => {
            Err(ParseError::NotEditable(kind))
        }
    }
}

/// Drop the first and last character, like `text.slice(1, -1)`.
fn strip_delimiters(text: &str) -> &str {
    let mut chars = text.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}

/// Parse the inside of an array literal (without the outer brackets).
///
/// Items are separated by top-level commas; commas inside quotes or nested
/// brackets and braces don't split. Each item is read as a literal.
///
/// ```
/// use fiberscope_value::{Value, parse_array_text};
///
/// let items = parse_array_text(r#"1, "a,b", [2,3]"#);
/// assert_eq!(
///     items,
///     [
///         Value::from(1),
///         Value::from("a,b"),
///         Value::array([Value::from(2), Value::from(3)]),
///     ]
/// );
/// ```
pub fn parse_array_text(inner: &str) -> Vec<Value> {
    if inner.trim() == "[]" {
        return Vec::new();
    }
    split_top_level(inner).iter().map(|item| parse_element(item)).collect()
}

/// Split at commas outside quotes and nesting. Pieces are trimmed and empty
/// pieces dropped.
fn split_top_level(text: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut depth = 0isize;
    let mut in_string = false;
    let mut escape_next = false;

    for c in text.chars() {
        if escape_next {
            current.push(c);
            escape_next = false;
            continue;
        }
        if c == '\\' {
            escape_next = true;
        }
        if c == '"' {
            in_string = !in_string;
            current.push(c);
            continue;
        }
        if in_string {
            current.push(c);
            continue;
        }
        match c {
            '[' | '{' => depth += 1,
            ']' | '}' => depth -= 1,
            ',' if depth == 0 => {
                push_piece(&mut pieces, &current);
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    push_piece(&mut pieces, &current);
    pieces
}

fn push_piece(pieces: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        pieces.push(piece.to_string());
    }
}

/// Read one element of composite text as a literal.
///
/// Bracketed text is a nested array, braced text a nested record, quoted text
/// a string without its quotes, and anything [`detect_literal`] doesn't
/// recognize is kept as the plain string.
fn parse_element(text: &str) -> Value {
    let text = text.trim();
    if text.len() >= 2 && text.starts_with('[') && text.ends_with(']') {
        return Value::array(parse_array_text(strip_delimiters(text)));
    }
    if text.len() >= 2 && text.starts_with('{') && text.ends_with('}') {
        return Value::Record(crate::Shared::new(parse_record_entries(strip_delimiters(text))));
    }

    let literal = detect_literal(text);
    match literal.kind {
        LiteralKind::String if !is_quoted(text) => Value::string(text),
        _ => literal.value,
    }
}

fn parse_record_entries(inner: &str) -> Record {
    split_top_level(inner)
        .iter()
        .map(|entry| match entry.split_once(": ") {
            Some((key, value)) => (key.trim().to_string(), parse_element(value)),
            None => (entry.clone(), Value::Undefined),
        })
        .collect()
}

fn parse_regexp(text: &str) -> Result<Value, ParseError> {
    let (source, flags) = match REGEXP_LITERAL.captures(text) {
        Some(caps) => (
            caps.name("pattern").map_or("", |m| m.as_str()),
            caps.name("flags").map_or("", |m| m.as_str()),
        ),
        None => (text, ""),
    };
    if !pattern_is_well_formed(source) {
        return Err(ParseError::InvalidRegExp(text.to_string()));
    }
    Ok(Value::regexp(source, flags))
}

/// Structural check of a pattern: groups and classes close, no trailing
/// escape, no quantifier with nothing to repeat.
fn pattern_is_well_formed(pattern: &str) -> bool {
    let mut groups = 0usize;
    let mut in_class = false;
    let mut escaped = false;
    let mut can_repeat = false;

    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        if escaped {
            escaped = false;
            can_repeat = true;
            continue;
        }
        match c {
            '\\' => escaped = true,
            ']' if in_class => {
                in_class = false;
                can_repeat = true;
            }
            _ if in_class => {}
            '[' => in_class = true,
            '(' => {
                groups += 1;
                can_repeat = false;
                // group modifiers: `(?:`, `(?=`, `(?<name>`
                chars.next_if_eq(&'?');
            }
            ')' => {
                let Some(open) = groups.checked_sub(1) else {
                    return false;
                };
                groups = open;
                can_repeat = true;
            }
            '*' | '+' | '?' if !can_repeat => return false,
            '*' | '+' => can_repeat = false,
            '|' => can_repeat = false,
            _ => can_repeat = true,
        }
    }
    !escaped && !in_class && groups == 0
}

fn parse_date(text: &str) -> Result<Value, ParseError> {
    let text = text.trim();
    if let Ok(time) = DateTime::parse_from_rfc3339(text) {
        return Ok(Value::date(time.with_timezone(&Utc)));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Value::date(naive.and_utc()));
    }
    if let Some(midnight) = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(Value::date(midnight.and_utc()));
    }
    Err(ParseError::InvalidDate(text.to_string()))
}

fn parse_error(text: &str) -> Value {
    match text.split_once(": ") {
        Some((name, message)) => Value::error(name, message),
        None => Value::error("Error", text),
    }
}

fn is_quoted(text: &str) -> bool {
    text.len() >= 2 && text.starts_with('"') && text.ends_with('"') && !text.contains('\n')
}

/// Kind of a literal recognized by [`detect_literal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    /// `undefined`
    Undefined,
    /// `null`
    Null,
    /// `true` or `false`
    Boolean,
    /// A quoted string, or unrecognized text
    String,
    /// A decimal number
    Number,
}

/// A literal read from edit text.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    /// What the text was recognized as.
    pub kind: LiteralKind,
    /// The value it denotes.
    pub value: Value,
}

/// Recognize the literal spelled by `text`.
///
/// Unrecognized text is treated as a string and wrapped in quotes, so the
/// resulting value includes the quote characters.
pub fn detect_literal(text: &str) -> Literal {
    let trimmed = text.trim();
    let (kind, value) = match trimmed {
        "undefined" => (LiteralKind::Undefined, Value::Undefined),
        "null" => (LiteralKind::Null, Value::Null),
        "true" => (LiteralKind::Boolean, Value::Bool(true)),
        "false" => (LiteralKind::Boolean, Value::Bool(false)),
        t if is_quoted(t) => (LiteralKind::String, Value::string(strip_delimiters(t))),
        t if NUMBER_LITERAL.is_match(t) => (LiteralKind::Number, Value::Number(string_to_number(t))),
        t => (LiteralKind::String, Value::string(format!("\"{t}\""))),
    };
    Literal { kind, value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_ascii_digits_make_numbers() {
        let arabic = detect_literal("٤٢");
        assert_eq!(arabic.kind, LiteralKind::String);
        assert_eq!(arabic.value, Value::from("\"٤٢\""));

        let fullwidth = detect_literal("-１.５");
        assert_eq!(fullwidth.kind, LiteralKind::String);

        let plain = detect_literal("-12.5");
        assert_eq!(plain.kind, LiteralKind::Number);
        assert_eq!(plain.value, Value::from(-12.5));
    }

    #[test]
    fn array_scanner_respects_quotes_and_nesting() {
        let items = parse_array_text(r#"{a: 1, b: 2}, "x, y", [[1], 2]"#);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].get("b"), Some(Value::from(2)));
        assert_eq!(items[1], Value::from("x, y"));
        assert_eq!(
            items[2],
            Value::array([Value::array([Value::from(1)]), Value::from(2)])
        );
    }

    #[test]
    fn empty_array_text() {
        assert!(parse_array_text("").is_empty());
        assert!(parse_array_text(" [] ").is_empty());
    }

    #[test]
    fn escapes_keep_both_characters() {
        let items = parse_array_text(r#""a\"b", c"#);
        assert_eq!(items, [Value::from(r#"a\"b"#), Value::from("c")]);
    }

    #[test]
    fn regexp_literals() {
        let parsed = parse_typed_text("/ab+c/gi", &Value::regexp("x", ""));
        assert!(parsed.succeeded);
        assert_eq!(parsed.value, Value::regexp("ab+c", "gi"));

        let bare = parse_typed_text("a|b", &Value::regexp("x", ""));
        assert_eq!(bare.value, Value::regexp("a|b", ""));

        let current = Value::regexp("x", "");
        let broken = parse_typed_text("/(a/", &current);
        assert!(!broken.succeeded);
        assert!(broken.value.is_identical(&current));
    }

    #[test]
    fn pattern_checks() {
        assert!(pattern_is_well_formed(r"^\d+(?:\.\d+)?$"));
        assert!(pattern_is_well_formed("[(]"));
        assert!(!pattern_is_well_formed("*a"));
        assert!(!pattern_is_well_formed("a)"));
        assert!(!pattern_is_well_formed(r"a\"));
    }

    #[test]
    fn dates_parse_iso_text() {
        let current = Value::invalid_date();
        let parsed = parse_typed_text("2024-03-01T12:00:00.000Z", &current);
        assert!(parsed.succeeded);
        assert_eq!(crate::format_for_clipboard(&parsed.value), "2024-03-01T12:00:00.000Z");

        let day = parse_typed_text("2024-03-01", &current);
        assert_eq!(crate::format_for_clipboard(&day.value), "2024-03-01T00:00:00.000Z");

        assert!(!parse_typed_text("yesterday", &current).succeeded);
    }

    #[test]
    fn error_text_splits_name_and_message() {
        let parsed = parse_typed_text("TypeError: bad input", &Value::error("Error", ""));
        assert_eq!(parsed.value, Value::error("TypeError", "bad input"));
        let unnamed = parse_typed_text("oops", &Value::error("Error", ""));
        assert_eq!(unnamed.value, Value::error("Error", "oops"));
    }

    #[test]
    fn functions_are_not_parsed() {
        let current = Value::function("f", "() => 1");
        assert_eq!(
            try_parse_typed_text("() => 2", &current),
            Err(ParseError::NotEditable(ValueKind::Function))
        );
    }

    #[test]
    fn literal_detection() {
        assert_eq!(detect_literal(" 42 ").kind, LiteralKind::Number);
        assert_eq!(detect_literal("\"hi\"").value, Value::from("hi"));
        assert_eq!(detect_literal("hi").value, Value::from("\"hi\""));
        assert_eq!(detect_literal("1e3").kind, LiteralKind::String);
    }
}
