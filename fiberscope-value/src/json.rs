//! Two-space indented JSON text, following the host's `JSON.stringify` rules.
//!
//! Only the clipboard uses this. The rules that matter:
//!
//! - `undefined` and functions are dropped from records and become `null` in arrays
//! - non-finite numbers are `null`
//! - dates write their ISO form (`null` when invalid)
//! - maps, sets, buffers, regexps, errors and promises have no enumerable
//!   fields and write `{}`
//! - typed arrays write an object keyed by element index
//! - bigints and cycles are errors

use core::fmt::Write;

use crate::format::iso_string;
use crate::number::number_to_string;
use crate::{FormatError, Value, ValueId};

/// Format `value` as indented JSON. `Ok(None)` when the value has no JSON form
/// (top-level `undefined` or function).
pub(crate) fn to_json(value: &Value) -> Result<Option<String>, FormatError> {
    let mut ctx = FormatContext::new();
    if format_value_into(&mut ctx, value)? {
        Ok(Some(ctx.output))
    } else {
        Ok(None)
    }
}

struct FormatContext {
    output: String,
    indent: usize,
    stack: Vec<ValueId>,
}

impl FormatContext {
    const fn new() -> Self {
        Self {
            output: String::new(),
            indent: 0,
            stack: Vec::new(),
        }
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str("  ");
        }
    }

    fn enter(&mut self, value: &Value) -> Result<(), FormatError> {
        if let Some(id) = value.id() {
            if self.stack.contains(&id) {
                return Err(FormatError::Cycle);
            }
            self.stack.push(id);
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.stack.pop();
    }
}

fn omitted(value: &Value) -> bool {
    matches!(value, Value::Undefined | Value::Function(_))
}

/// Returns `false` when nothing was written because the value is omitted.
fn format_value_into(ctx: &mut FormatContext, value: &Value) -> Result<bool, FormatError> {
    match value {
        Value::Undefined | Value::Function(_) => return Ok(false),
        Value::Null => ctx.output.push_str("null"),
        Value::Bool(b) => {
            let _ = write!(ctx.output, "{b}");
        }
        Value::Number(n) if n.is_finite() => ctx.output.push_str(&number_to_string(*n)),
        Value::Number(_) => ctx.output.push_str("null"),
        Value::BigInt(_) => return Err(FormatError::BigInt),
        Value::String(s) => write_string(ctx, s),
        Value::Date(date) => match date.time {
            Some(time) => write_string(ctx, &iso_string(&time)),
            None => ctx.output.push_str("null"),
        },
        Value::RegExp(_)
        | Value::Error(_)
        | Value::Map(_)
        | Value::Set(_)
        | Value::Buffer(_)
        | Value::Promise(_) => ctx.output.push_str("{}"),
        Value::BufferView(view) if !view.kind.is_typed_array() => ctx.output.push_str("{}"),
        Value::BufferView(view) => {
            let entries: Vec<(String, Value)> = view
                .elements()
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect();
            ctx.enter(value)?;
            write_object(ctx, &entries)?;
            ctx.leave();
        }
        Value::Array(items) => {
            let items = items
                .read()
                .ok_or(FormatError::Borrowed(value.kind()))?
                .clone();
            ctx.enter(value)?;
            write_array(ctx, &items)?;
            ctx.leave();
        }
        Value::Record(fields) => {
            let entries: Vec<(String, Value)> = fields
                .read()
                .ok_or(FormatError::Borrowed(value.kind()))?
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            ctx.enter(value)?;
            write_object(ctx, &entries)?;
            ctx.leave();
        }
    }
    Ok(true)
}

fn write_array(ctx: &mut FormatContext, items: &[Value]) -> Result<(), FormatError> {
    if items.is_empty() {
        ctx.output.push_str("[]");
        return Ok(());
    }

    ctx.output.push_str("[\n");
    ctx.indent += 1;
    for (i, item) in items.iter().enumerate() {
        ctx.write_indent();
        if !format_value_into(ctx, item)? {
            ctx.output.push_str("null");
        }
        if i < items.len() - 1 {
            ctx.output.push(',');
        }
        ctx.output.push('\n');
    }
    ctx.indent -= 1;
    ctx.write_indent();
    ctx.output.push(']');
    Ok(())
}

fn write_object(ctx: &mut FormatContext, entries: &[(String, Value)]) -> Result<(), FormatError> {
    let entries: Vec<_> = entries.iter().filter(|(_, v)| !omitted(v)).collect();
    if entries.is_empty() {
        ctx.output.push_str("{}");
        return Ok(());
    }

    ctx.output.push_str("{\n");
    ctx.indent += 1;
    for (i, (key, value)) in entries.iter().enumerate() {
        ctx.write_indent();
        write_string(ctx, key);
        ctx.output.push_str(": ");
        format_value_into(ctx, value)?;
        if i < entries.len() - 1 {
            ctx.output.push(',');
        }
        ctx.output.push('\n');
    }
    ctx.indent -= 1;
    ctx.write_indent();
    ctx.output.push('}');
    Ok(())
}

fn write_string(ctx: &mut FormatContext, s: &str) {
    ctx.output.push('"');
    for c in s.chars() {
        match c {
            '"' => ctx.output.push_str("\\\""),
            '\\' => ctx.output.push_str("\\\\"),
            '\n' => ctx.output.push_str("\\n"),
            '\r' => ctx.output.push_str("\\r"),
            '\t' => ctx.output.push_str("\\t"),
            '\u{08}' => ctx.output.push_str("\\b"),
            '\u{0c}' => ctx.output.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                let _ = write!(ctx.output, "\\u{:04x}", c as u32);
            }
            c => ctx.output.push(c),
        }
    }
    ctx.output.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json(value: &Value) -> String {
        to_json(value).unwrap().unwrap()
    }

    #[test]
    fn nested_record() {
        let value = Value::record([
            ("name", Value::from("Ada")),
            ("tags", Value::array([Value::from(1), Value::Undefined])),
            ("skip", Value::Undefined),
            ("empty", Value::array([])),
        ]);
        insta::assert_snapshot!(json(&value), @r#"
        {
          "name": "Ada",
          "tags": [
            1,
            null
          ],
          "empty": []
        }
        "#);
    }

    #[test]
    fn opaque_objects_are_empty() {
        let value = Value::array([
            Value::map([(Value::from("k"), Value::from(1))]),
            Value::regexp("a", "g"),
            Value::Number(f64::NAN),
        ]);
        insta::assert_snapshot!(json(&value), @r"
        [
          {},
          {},
          null
        ]
        ");
    }

    #[test]
    fn bigint_and_cycles_fail() {
        assert_eq!(to_json(&Value::array([Value::BigInt(1)])), Err(FormatError::BigInt));

        let items = crate::Shared::new(Vec::new());
        let cyclic = Value::Array(items.clone());
        items.try_borrow_mut().unwrap().push(cyclic.clone());
        assert_eq!(to_json(&cyclic), Err(FormatError::Cycle));
    }

    #[test]
    fn shared_but_acyclic_is_fine() {
        let shared = Value::array([Value::from(1)]);
        let value = Value::array([shared.clone(), shared]);
        assert!(to_json(&value).is_ok());
    }

    #[test]
    fn control_characters_are_escaped() {
        assert_eq!(json(&Value::from("a\"b\n\u{1}")), r#""a\"b\n\u0001""#);
    }
}
