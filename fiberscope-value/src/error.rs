use crate::ValueKind;

/// Why edit text couldn't be turned into a value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The text isn't an integer literal the host's `BigInt()` accepts.
    #[error("`{0}` is not a valid bigint")]
    InvalidBigInt(String),

    /// The pattern of a regexp literal doesn't compile.
    #[error("invalid regular expression `{0}`")]
    InvalidRegExp(String),

    /// The text isn't an ISO-8601 date.
    #[error("`{0}` is not an ISO-8601 date")]
    InvalidDate(String),

    /// Values of this kind can't be produced from text.
    #[error("{0} values cannot be edited as text")]
    NotEditable(ValueKind),
}

/// Why an update couldn't be applied at a path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpdateError {
    /// A segment addressing an array isn't an index.
    #[error("`{0}` is not an array index")]
    InvalidIndex(String),

    /// An array index lies too far past the end of the array.
    #[error("index {index} is too far past the end of an array of length {len}")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The array's length.
        len: usize,
    },

    /// A container on the path is being mutated elsewhere.
    #[error("a {0} on the path is mutably borrowed")]
    Borrowed(ValueKind),
}

/// Why the JSON form of a value couldn't be produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// The value contains itself.
    #[error("converting circular structure to JSON")]
    Cycle,

    /// Bigints have no JSON form.
    #[error("do not know how to serialize a bigint")]
    BigInt,

    /// An invalid date has no ISO form.
    #[error("invalid time value")]
    InvalidDate,

    /// A container is being mutated elsewhere.
    #[error("a {0} is mutably borrowed")]
    Borrowed(ValueKind),
}
