//! The [`Value`] enum and its shared reference handles.

use core::cell::{BorrowError, BorrowMutError, Ref, RefCell, RefMut};
use core::fmt;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::collections::{MapEntries, SetEntries};
use crate::view::ViewKind;

/// Ordered field map of a plain record.
pub type Record = IndexMap<String, Value>;

/// Identity of a reference value: the address of its allocation.
///
/// Two handles have the same id exactly when they point at the same
/// allocation, which is what host `===` compares for objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ValueId(usize);

impl ValueId {
    fn of<T: ?Sized>(rc: &Rc<T>) -> Self {
        Self(Rc::as_ptr(rc).cast::<()>() as usize)
    }
}

/// A shared, interior-mutable container with reference identity.
///
/// Cloning a `Shared` clones the handle, not the contents. Use
/// [`Shared::shallow_clone`] for a new container holding the same children.
pub struct Shared<T>(Rc<RefCell<T>>);

impl<T> Shared<T> {
    /// Wrap `inner` in a new allocation.
    pub fn new(inner: T) -> Self {
        Self(Rc::new(RefCell::new(inner)))
    }

    /// Borrow the contents, or `None` while they're mutably borrowed.
    pub fn read(&self) -> Option<Ref<'_, T>> {
        self.0.try_borrow().ok()
    }

    /// Borrow the contents.
    pub fn try_borrow(&self) -> Result<Ref<'_, T>, BorrowError> {
        self.0.try_borrow()
    }

    /// Mutably borrow the contents.
    pub fn try_borrow_mut(&self) -> Result<RefMut<'_, T>, BorrowMutError> {
        self.0.try_borrow_mut()
    }

    /// Whether both handles point at the same container.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Identity of this container.
    pub fn id(&self) -> ValueId {
        ValueId::of(&self.0)
    }
}

impl<T: Clone> Shared<T> {
    /// A new container holding a copy of the contents (children are shared).
    pub fn shallow_clone(&self) -> Result<Self, BorrowError> {
        Ok(Self::new(self.try_borrow()?.clone()))
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T: Default> Default for Shared<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// A date; `None` is an invalid date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VDate {
    /// The instant, if the date is valid.
    pub time: Option<DateTime<Utc>>,
}

/// A regular expression, kept as its source and flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VRegExp {
    /// Pattern text between the slashes.
    pub source: String,
    /// Flag letters after the closing slash.
    pub flags: String,
}

impl VRegExp {
    /// The literal form, `/source/flags`.
    pub fn literal(&self) -> String {
        format!("/{}/{}", self.source, self.flags)
    }
}

/// An error object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VError {
    /// Constructor name, such as `TypeError`.
    pub name: String,
    /// The message.
    pub message: String,
}

/// A function. Only its name and source text are observable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VFunction {
    /// Declared name, possibly empty.
    pub name: String,
    /// Source text as the host prints it.
    pub source: String,
}

/// A promise. Opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VPromise;

/// A typed window over a binary buffer.
#[derive(Clone)]
pub struct VBufferView {
    /// Element type of the view.
    pub kind: ViewKind,
    /// The buffer being viewed.
    pub buffer: Shared<Vec<u8>>,
    /// First viewed byte.
    pub byte_offset: usize,
    /// Number of viewed bytes.
    pub byte_length: usize,
}

/// A value produced by the host runtime.
///
/// Primitives are held inline. Everything the host treats as an object is a
/// reference-counted handle, so cloning a `Value` never copies a container
/// and identity comparison ([`Value::is_identical`]) works like the host's.
#[derive(Clone, Default)]
pub enum Value {
    /// `undefined`; also what absent keys read as.
    #[default]
    Undefined,
    /// `null`.
    Null,
    /// A boolean.
    Bool(bool),
    /// A double-precision number.
    Number(f64),
    /// An arbitrary-precision integer, limited here to the `i128` range.
    BigInt(i128),
    /// A string.
    String(Rc<str>),
    /// A date.
    Date(Rc<VDate>),
    /// A regular expression.
    RegExp(Rc<VRegExp>),
    /// An error object.
    Error(Rc<VError>),
    /// An array.
    Array(Shared<Vec<Value>>),
    /// A map with arbitrary keys.
    Map(Shared<MapEntries>),
    /// A set.
    Set(Shared<SetEntries>),
    /// A raw binary buffer.
    Buffer(Shared<Vec<u8>>),
    /// A typed array or data view over a buffer.
    BufferView(Rc<VBufferView>),
    /// A plain record.
    Record(Shared<Record>),
    /// A function.
    Function(Rc<VFunction>),
    /// A promise.
    Promise(Rc<VPromise>),
}

impl Value {
    /// A string value.
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::String(Rc::from(s.as_ref()))
    }

    /// A new array.
    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(Shared::new(items.into_iter().collect()))
    }

    /// A new record with fields in iteration order.
    pub fn record<K: Into<String>>(fields: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Record(Shared::new(
            fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// A new map. Later duplicates of a key overwrite earlier ones.
    pub fn map(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Value::Map(Shared::new(entries.into_iter().collect()))
    }

    /// A new set. Duplicates are dropped.
    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Set(Shared::new(items.into_iter().collect()))
    }

    /// A new binary buffer.
    pub fn buffer(bytes: impl Into<Vec<u8>>) -> Self {
        Value::Buffer(Shared::new(bytes.into()))
    }

    /// A view of `kind` over the whole of a new buffer holding `bytes`.
    pub fn typed(kind: ViewKind, bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        let byte_length = bytes.len();
        Value::BufferView(Rc::new(VBufferView {
            kind,
            buffer: Shared::new(bytes),
            byte_offset: 0,
            byte_length,
        }))
    }

    /// A view of `kind` over part of an existing buffer.
    pub fn view(kind: ViewKind, buffer: Shared<Vec<u8>>, byte_offset: usize, byte_length: usize) -> Self {
        Value::BufferView(Rc::new(VBufferView {
            kind,
            buffer,
            byte_offset,
            byte_length,
        }))
    }

    /// A valid date.
    pub fn date(time: DateTime<Utc>) -> Self {
        Value::Date(Rc::new(VDate { time: Some(time) }))
    }

    /// An invalid date.
    pub fn invalid_date() -> Self {
        Value::Date(Rc::new(VDate { time: None }))
    }

    /// A regular expression.
    pub fn regexp(source: impl Into<String>, flags: impl Into<String>) -> Self {
        Value::RegExp(Rc::new(VRegExp {
            source: source.into(),
            flags: flags.into(),
        }))
    }

    /// An error object.
    pub fn error(name: impl Into<String>, message: impl Into<String>) -> Self {
        Value::Error(Rc::new(VError {
            name: name.into(),
            message: message.into(),
        }))
    }

    /// A function with the given name and source text.
    pub fn function(name: impl Into<String>, source: impl Into<String>) -> Self {
        Value::Function(Rc::new(VFunction {
            name: name.into(),
            source: source.into(),
        }))
    }

    /// A new pending promise.
    pub fn promise() -> Self {
        Value::Promise(Rc::new(VPromise))
    }

    /// `null` or `undefined`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Null | Value::Undefined)
    }

    /// The string contents, for string values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The number, for number values.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The boolean, for boolean values.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The function, for function values.
    pub fn as_function(&self) -> Option<&VFunction> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// The record handle, for records.
    pub fn as_record(&self) -> Option<&Shared<Record>> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    /// The array handle, for arrays.
    pub fn as_array(&self) -> Option<&Shared<Vec<Value>>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Read a field of a record. Non-records and missing keys give `None`.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.as_record()?.read()?.get(key).cloned()
    }

    /// Identity of a reference value; `None` for primitives.
    pub fn id(&self) -> Option<ValueId> {
        match self {
            Value::Undefined
            | Value::Null
            | Value::Bool(_)
            | Value::Number(_)
            | Value::BigInt(_)
            | Value::String(_) => None,
            Value::Date(rc) => Some(ValueId::of(rc)),
            Value::RegExp(rc) => Some(ValueId::of(rc)),
            Value::Error(rc) => Some(ValueId::of(rc)),
            Value::Array(s) => Some(s.id()),
            Value::Map(s) => Some(s.id()),
            Value::Set(s) => Some(s.id()),
            Value::Buffer(s) => Some(s.id()),
            Value::BufferView(rc) => Some(ValueId::of(rc)),
            Value::Record(s) => Some(s.id()),
            Value::Function(rc) => Some(ValueId::of(rc)),
            Value::Promise(rc) => Some(ValueId::of(rc)),
        }
    }

    /// Strict equality as the host's `===` defines it.
    ///
    /// Primitives compare by value (`NaN` is never identical to anything and
    /// `0` is identical to `-0`); everything else compares by identity.
    pub fn is_identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            _ => match (self.id(), other.id()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }

    /// Key equality used by maps and sets: like [`Value::is_identical`] except
    /// that `NaN` equals `NaN`.
    pub fn same_value_zero(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) if a.is_nan() && b.is_nan() => true,
            _ => self.is_identical(other),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(Shared::new(items))
    }
}

impl PartialEq for Value {
    /// Structural equality; see [`crate::deep_equal`].
    fn eq(&self, other: &Self) -> bool {
        crate::deep_equal(self, other)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        debug_value(self, &mut out, &mut Vec::new());
        f.write_str(&out)
    }
}

impl fmt::Debug for VBufferView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VBufferView")
            .field("kind", &self.kind)
            .field("byte_offset", &self.byte_offset)
            .field("byte_length", &self.byte_length)
            .finish()
    }
}

fn debug_value(value: &Value, out: &mut String, seen: &mut Vec<ValueId>) {
    if let Some(id) = value.id() {
        if seen.contains(&id) {
            out.push_str("[Circular]");
            return;
        }
        seen.push(id);
    }

    match value {
        Value::Array(items) => match items.read() {
            Some(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    debug_value(item, out, seen);
                }
                out.push(']');
            }
            None => out.push_str("[<borrowed>]"),
        },
        Value::Record(fields) => match fields.read() {
            Some(fields) => {
                out.push('{');
                for (i, (k, v)) in fields.iter().enumerate() {
                    out.push_str(if i > 0 { ", " } else { " " });
                    out.push_str(k);
                    out.push_str(": ");
                    debug_value(v, out, seen);
                }
                out.push_str(if fields.is_empty() { "}" } else { " }" });
            }
            None => out.push_str("{<borrowed>}"),
        },
        Value::Map(entries) => match entries.read() {
            Some(entries) => {
                out.push_str("Map {");
                for (i, (k, v)) in entries.iter().enumerate() {
                    out.push_str(if i > 0 { ", " } else { " " });
                    debug_value(k, out, seen);
                    out.push_str(" => ");
                    debug_value(v, out, seen);
                }
                out.push_str(if entries.is_empty() { "}" } else { " }" });
            }
            None => out.push_str("Map {<borrowed>}"),
        },
        Value::Set(items) => match items.read() {
            Some(items) => {
                out.push_str("Set {");
                for (i, item) in items.iter().enumerate() {
                    out.push_str(if i > 0 { ", " } else { " " });
                    debug_value(item, out, seen);
                }
                out.push_str(if items.is_empty() { "}" } else { " }" });
            }
            None => out.push_str("Set {<borrowed>}"),
        },
        Value::BigInt(n) => {
            out.push_str(&n.to_string());
            out.push('n');
        }
        Value::String(s) => out.push_str(&format!("{s:?}")),
        other => out.push_str(&crate::format_preview(other)),
    }

    if value.id().is_some() {
        seen.pop();
    }
}
