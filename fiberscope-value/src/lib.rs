#![forbid(unsafe_code)]
//! The values an inspector shows, and the text forms it shows them in.
//!
//! [`Value`] models what the host runtime hands over: primitives, plain
//! records, arrays, maps, sets, binary buffers and views, dates, regexps,
//! errors, and functions and promises as opaque leaves. Object-like values are
//! shared handles, so identity and cycles behave as they do in the host.
//!
//! On top of that sit the codec functions:
//!
//! - [`format_preview`] for the one-line preview next to a field,
//! - [`format_for_clipboard`] for copied text,
//! - [`format_initial_text`] and [`parse_typed_text`] for editing a field,
//! - [`apply_at_path`] to put an edited value back without mutating anything.
//!
//! All of them dispatch on [`ValueKind`].

#[macro_use]
mod tracing_macros;

mod classify;
mod collections;
mod equality;
mod error;
mod format;
mod json;
mod kind;
mod number;
mod parse;
mod update;
mod value;
mod view;

pub use classify::{RenderedSnapshot, is_editable, is_expandable};
pub use collections::{MapEntries, SetEntries};
pub use equality::deep_equal;
pub use error::{FormatError, ParseError, UpdateError};
pub use format::{
    PreviewOptions, format_for_clipboard, format_initial_text, format_preview, format_preview_with, safe_value,
    to_js_string, try_format_for_clipboard,
};
pub use kind::ValueKind;
pub use number::{number_to_string, parse_bigint, string_to_number};
pub use parse::{Literal, LiteralKind, Parsed, detect_literal, parse_array_text, parse_typed_text, try_parse_typed_text};
pub use update::{MAX_INDEX_GAP, apply_at_path, try_apply_at_path, value_at_path};
pub use value::{Record, Shared, VBufferView, VDate, VError, VFunction, VPromise, VRegExp, Value, ValueId};
pub use view::ViewKind;
