//! Scalar value encoding across the three integer representations.

use crate::{
    codec::CodecError,
    value::Value,
    wire::{self, WireReader, WireType},
};
use protowire_schema::{resolve::ScalarRepr, types::ScalarType};

/// Wire type a scalar occupies under its resolved representation.
#[must_use]
pub const fn wire_type(ty: ScalarType, repr: ScalarRepr) -> WireType {
    match repr {
        ScalarRepr::ZigZag => WireType::Varint,
        ScalarRepr::Fixed => {
            if ty.is_wide() {
                WireType::Fixed64
            } else {
                WireType::Fixed32
            }
        }
        ScalarRepr::Plain => match ty {
            ScalarType::Float => WireType::Fixed32,
            ScalarType::Double => WireType::Fixed64,
            ScalarType::String | ScalarType::Bytes => WireType::LengthDelimited,
            _ => WireType::Varint,
        },
    }
}

/// Proto3 default check: zero numbers, false, empty strings and bytes.
/// A value of the wrong shape is never a default; the encoder surfaces
/// the mismatch instead of eliding it.
#[must_use]
pub fn is_default(ty: ScalarType, value: &Value) -> bool {
    match (ty, value) {
        (ScalarType::Bool, Value::Bool(b)) => !b,
        (ScalarType::Int32, Value::I32(v)) => *v == 0,
        (ScalarType::Int64, Value::I64(v)) => *v == 0,
        (ScalarType::UInt32, Value::U32(v)) => *v == 0,
        (ScalarType::UInt64, Value::U64(v)) => *v == 0,
        (ScalarType::Float, Value::F32(v)) => v.to_bits() == 0,
        (ScalarType::Double, Value::F64(v)) => v.to_bits() == 0,
        (ScalarType::String, Value::Str(s)) => s.is_empty(),
        (ScalarType::Bytes, Value::Bytes(b)) => b.is_empty(),
        _ => false,
    }
}

#[must_use]
pub const fn default_value(ty: ScalarType) -> Value {
    match ty {
        ScalarType::Bool => Value::Bool(false),
        ScalarType::Bytes => Value::Bytes(Vec::new()),
        ScalarType::Double => Value::F64(0.0),
        ScalarType::Float => Value::F32(0.0),
        ScalarType::Int32 => Value::I32(0),
        ScalarType::Int64 => Value::I64(0),
        ScalarType::String => Value::Str(String::new()),
        ScalarType::UInt32 => Value::U32(0),
        ScalarType::UInt64 => Value::U64(0),
    }
}

#[allow(clippy::cast_sign_loss)]
pub fn encode(
    buf: &mut Vec<u8>,
    ty: ScalarType,
    repr: ScalarRepr,
    value: &Value,
) -> Result<(), CodecError> {
    match (ty, value) {
        (ScalarType::Bool, Value::Bool(b)) => wire::write_varint(buf, u64::from(*b)),
        (ScalarType::Int32, Value::I32(v)) => match repr {
            // negative plain int32 sign-extends to the full ten bytes
            ScalarRepr::Plain => wire::write_varint(buf, i64::from(*v) as u64),
            ScalarRepr::ZigZag => wire::write_varint(buf, wire::zigzag_encode(i64::from(*v))),
            ScalarRepr::Fixed => wire::write_fixed32(buf, *v as u32),
        },
        (ScalarType::Int64, Value::I64(v)) => match repr {
            ScalarRepr::Plain => wire::write_varint(buf, *v as u64),
            ScalarRepr::ZigZag => wire::write_varint(buf, wire::zigzag_encode(*v)),
            ScalarRepr::Fixed => wire::write_fixed64(buf, *v as u64),
        },
        (ScalarType::UInt32, Value::U32(v)) => match repr {
            ScalarRepr::Fixed => wire::write_fixed32(buf, *v),
            _ => wire::write_varint(buf, u64::from(*v)),
        },
        (ScalarType::UInt64, Value::U64(v)) => match repr {
            ScalarRepr::Fixed => wire::write_fixed64(buf, *v),
            _ => wire::write_varint(buf, *v),
        },
        (ScalarType::Float, Value::F32(v)) => wire::write_fixed32(buf, v.to_bits()),
        (ScalarType::Double, Value::F64(v)) => wire::write_fixed64(buf, v.to_bits()),
        (ScalarType::String, Value::Str(s)) => wire::write_len_prefixed(buf, s.as_bytes()),
        (ScalarType::Bytes, Value::Bytes(b)) => wire::write_len_prefixed(buf, b),
        (ty, value) => {
            return Err(CodecError::ValueMismatch {
                expected: ty.proto_name(),
                actual: value.label(),
            });
        }
    }

    Ok(())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn decode(
    reader: &mut WireReader<'_>,
    ty: ScalarType,
    repr: ScalarRepr,
) -> Result<Value, CodecError> {
    let value = match (ty, repr) {
        (ScalarType::Bool, _) => Value::Bool(reader.read_varint()? != 0),
        (ScalarType::Int32, ScalarRepr::Plain) => {
            // keep the low 32 bits of the sign-extended encoding
            Value::I32(reader.read_varint()? as i32)
        }
        (ScalarType::Int32, ScalarRepr::ZigZag) => {
            Value::I32(wire::zigzag_decode(reader.read_varint()?) as i32)
        }
        (ScalarType::Int32, ScalarRepr::Fixed) => Value::I32(reader.read_fixed32()? as i32),
        (ScalarType::Int64, ScalarRepr::Plain) => Value::I64(reader.read_varint()? as i64),
        (ScalarType::Int64, ScalarRepr::ZigZag) => {
            Value::I64(wire::zigzag_decode(reader.read_varint()?))
        }
        (ScalarType::Int64, ScalarRepr::Fixed) => Value::I64(reader.read_fixed64()? as i64),
        (ScalarType::UInt32, ScalarRepr::Fixed) => Value::U32(reader.read_fixed32()?),
        (ScalarType::UInt32, _) => Value::U32(reader.read_varint()? as u32),
        (ScalarType::UInt64, ScalarRepr::Fixed) => Value::U64(reader.read_fixed64()?),
        (ScalarType::UInt64, _) => Value::U64(reader.read_varint()?),
        (ScalarType::Float, _) => Value::F32(f32::from_bits(reader.read_fixed32()?)),
        (ScalarType::Double, _) => Value::F64(f64::from_bits(reader.read_fixed64()?)),
        (ScalarType::String, _) => {
            let bytes = reader.read_len_prefixed()?;
            Value::Str(String::from_utf8(bytes.to_vec()).map_err(|_| CodecError::Utf8)?)
        }
        (ScalarType::Bytes, _) => Value::Bytes(reader.read_len_prefixed()?.to_vec()),
    };

    Ok(value)
}

///
/// TESTS
///
