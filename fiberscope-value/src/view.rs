//! Typed views over binary buffers.

use core::fmt;

use crate::value::VBufferView;
use crate::Value;

/// Element type of a buffer view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// An untyped byte window.
    DataView,
    /// Signed 8-bit elements.
    Int8,
    /// Unsigned 8-bit elements.
    Uint8,
    /// Unsigned 8-bit elements, clamped on write.
    Uint8Clamped,
    /// Signed 16-bit elements.
    Int16,
    /// Unsigned 16-bit elements.
    Uint16,
    /// Signed 32-bit elements.
    Int32,
    /// Unsigned 32-bit elements.
    Uint32,
    /// 32-bit floats.
    Float32,
    /// 64-bit floats.
    Float64,
    /// Signed 64-bit integers, read as bigints.
    BigInt64,
    /// Unsigned 64-bit integers, read as bigints.
    BigUint64,
}

impl ViewKind {
    /// The constructor name the host uses for this kind.
    pub const fn name(self) -> &'static str {
        match self {
            ViewKind::DataView => "DataView",
            ViewKind::Int8 => "Int8Array",
            ViewKind::Uint8 => "Uint8Array",
            ViewKind::Uint8Clamped => "Uint8ClampedArray",
            ViewKind::Int16 => "Int16Array",
            ViewKind::Uint16 => "Uint16Array",
            ViewKind::Int32 => "Int32Array",
            ViewKind::Uint32 => "Uint32Array",
            ViewKind::Float32 => "Float32Array",
            ViewKind::Float64 => "Float64Array",
            ViewKind::BigInt64 => "BigInt64Array",
            ViewKind::BigUint64 => "BigUint64Array",
        }
    }

    /// Bytes per element; a data view counts single bytes.
    pub const fn element_size(self) -> usize {
        match self {
            ViewKind::DataView | ViewKind::Int8 | ViewKind::Uint8 | ViewKind::Uint8Clamped => 1,
            ViewKind::Int16 | ViewKind::Uint16 => 2,
            ViewKind::Int32 | ViewKind::Uint32 | ViewKind::Float32 => 4,
            ViewKind::Float64 | ViewKind::BigInt64 | ViewKind::BigUint64 => 8,
        }
    }

    /// Whether this is a typed array rather than a data view.
    pub const fn is_typed_array(self) -> bool {
        !matches!(self, ViewKind::DataView)
    }

    fn decode(self, chunk: &[u8]) -> Option<Value> {
        Some(match self {
            ViewKind::DataView | ViewKind::Uint8 | ViewKind::Uint8Clamped => {
                Value::Number(f64::from(*chunk.first()?))
            }
            ViewKind::Int8 => Value::Number(f64::from(i8::from_le_bytes(chunk.try_into().ok()?))),
            ViewKind::Int16 => Value::Number(f64::from(i16::from_le_bytes(chunk.try_into().ok()?))),
            ViewKind::Uint16 => Value::Number(f64::from(u16::from_le_bytes(chunk.try_into().ok()?))),
            ViewKind::Int32 => Value::Number(f64::from(i32::from_le_bytes(chunk.try_into().ok()?))),
            ViewKind::Uint32 => Value::Number(f64::from(u32::from_le_bytes(chunk.try_into().ok()?))),
            ViewKind::Float32 => Value::Number(f64::from(f32::from_le_bytes(chunk.try_into().ok()?))),
            ViewKind::Float64 => Value::Number(f64::from_le_bytes(chunk.try_into().ok()?)),
            ViewKind::BigInt64 => Value::BigInt(i128::from(i64::from_le_bytes(chunk.try_into().ok()?))),
            ViewKind::BigUint64 => Value::BigInt(i128::from(u64::from_le_bytes(chunk.try_into().ok()?))),
        })
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl VBufferView {
    /// The viewed bytes. Out-of-range windows are clipped to the buffer.
    pub fn bytes(&self) -> Vec<u8> {
        let Some(buffer) = self.buffer.read() else {
            return Vec::new();
        };
        let start = self.byte_offset.min(buffer.len());
        let end = self.byte_offset.saturating_add(self.byte_length).min(buffer.len());
        buffer[start..end].to_vec()
    }

    /// Every byte of the underlying buffer.
    pub fn buffer_bytes(&self) -> Vec<u8> {
        self.buffer.read().map(|b| b.clone()).unwrap_or_default()
    }

    /// Number of elements (bytes, for a data view).
    pub fn len(&self) -> usize {
        self.byte_length / self.kind.element_size()
    }

    /// Whether the view has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decoded elements, little-endian. A data view yields its bytes.
    pub fn elements(&self) -> Vec<Value> {
        self.bytes()
            .chunks_exact(self.kind.element_size())
            .filter_map(|chunk| self.kind.decode(chunk))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_little_endian_elements() {
        let Value::BufferView(view) = Value::typed(ViewKind::Int16, [0x01_u8, 0x00, 0xff, 0xff]) else {
            unreachable!()
        };
        let elements: Vec<_> = view.elements().iter().filter_map(Value::as_number).collect();
        assert_eq!(elements, [1.0, -1.0]);
    }

    #[test]
    fn bigint_views_yield_bigints() {
        let Value::BufferView(view) = Value::typed(ViewKind::BigUint64, u64::MAX.to_le_bytes()) else {
            unreachable!()
        };
        assert!(matches!(view.elements()[..], [Value::BigInt(n)] if n == i128::from(u64::MAX)));
    }

    #[test]
    fn windows_are_clipped_to_the_buffer() {
        let buffer = crate::Shared::new(vec![1_u8, 2, 3]);
        let Value::BufferView(view) = Value::view(ViewKind::Uint8, buffer, 2, 10) else {
            unreachable!()
        };
        assert_eq!(view.bytes(), [3]);
    }
}
