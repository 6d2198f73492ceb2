use core::fmt;

use crate::Value;

/// The closed set of value shapes the codec distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Undefined,
    String,
    Number,
    Boolean,
    BigInt,
    Date,
    RegExp,
    Error,
    Array,
    Map,
    Set,
    Buffer,
    BufferView,
    Record,
    Function,
    Promise,
}

impl ValueKind {
    /// Lower-case name used in logs and error messages.
    pub const fn name(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Undefined => "undefined",
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::Boolean => "boolean",
            ValueKind::BigInt => "bigint",
            ValueKind::Date => "date",
            ValueKind::RegExp => "regexp",
            ValueKind::Error => "error",
            ValueKind::Array => "array",
            ValueKind::Map => "map",
            ValueKind::Set => "set",
            ValueKind::Buffer => "buffer",
            ValueKind::BufferView => "buffer view",
            ValueKind::Record => "record",
            ValueKind::Function => "function",
            ValueKind::Promise => "promise",
        }
    }

    /// Shapes whose children the diff engine and the inspector descend into.
    pub const fn is_composite(self) -> bool {
        matches!(
            self,
            ValueKind::Array
                | ValueKind::Map
                | ValueKind::Set
                | ValueKind::Buffer
                | ValueKind::BufferView
                | ValueKind::Record
        )
    }

    /// Reference shapes that are shown as a single opaque leaf.
    pub const fn is_opaque_reference(self) -> bool {
        matches!(
            self,
            ValueKind::Date | ValueKind::RegExp | ValueKind::Error | ValueKind::Promise
        )
    }

    /// Plain scalar shapes that can be edited as text.
    pub const fn is_scalar(self) -> bool {
        matches!(
            self,
            ValueKind::String | ValueKind::Number | ValueKind::Boolean | ValueKind::BigInt
        )
    }

    /// Buffers and views over them.
    pub const fn is_binary(self) -> bool {
        matches!(self, ValueKind::Buffer | ValueKind::BufferView)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// Classify this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Undefined => ValueKind::Undefined,
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(_) => ValueKind::Number,
            Value::BigInt(_) => ValueKind::BigInt,
            Value::String(_) => ValueKind::String,
            Value::Date(_) => ValueKind::Date,
            Value::RegExp(_) => ValueKind::RegExp,
            Value::Error(_) => ValueKind::Error,
            Value::Array(_) => ValueKind::Array,
            Value::Map(_) => ValueKind::Map,
            Value::Set(_) => ValueKind::Set,
            Value::Buffer(_) => ValueKind::Buffer,
            Value::BufferView(_) => ValueKind::BufferView,
            Value::Record(_) => ValueKind::Record,
            Value::Function(_) => ValueKind::Function,
            Value::Promise(_) => ValueKind::Promise,
        }
    }

    /// Whether this value has children to descend into.
    pub fn is_composite(&self) -> bool {
        self.kind().is_composite()
    }
}
