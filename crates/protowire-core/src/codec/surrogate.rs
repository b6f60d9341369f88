//! Legacy surrogate message payloads in the `bcl` namespace.

use crate::{
    codec::CodecError,
    types::{Decimal, DecimalParts, Duration, Guid},
    wire::{self, WireReader, WireType},
};

///
/// TimeScale
///
/// Unit discriminant shared by the date-time and time-span surrogates.
/// Encoders pick the coarsest unit that divides the tick count exactly.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u64)]
pub enum TimeScale {
    Days = 0,
    Hours = 1,
    Minutes = 2,
    Seconds = 3,
    Milliseconds = 4,
    Ticks = 5,
}

impl TimeScale {
    pub const fn try_from_raw(raw: u64) -> Result<Self, CodecError> {
        match raw {
            0 => Ok(Self::Days),
            1 => Ok(Self::Hours),
            2 => Ok(Self::Minutes),
            3 => Ok(Self::Seconds),
            4 => Ok(Self::Milliseconds),
            5 => Ok(Self::Ticks),
            _ => Err(CodecError::TimeScale(raw)),
        }
    }

    #[must_use]
    pub const fn ticks_per_unit(self) -> i64 {
        match self {
            Self::Days => Duration::TICKS_PER_DAY,
            Self::Hours => Duration::TICKS_PER_HOUR,
            Self::Minutes => Duration::TICKS_PER_MINUTE,
            Self::Seconds => Duration::TICKS_PER_SECOND,
            Self::Milliseconds => Duration::TICKS_PER_MILLI,
            Self::Ticks => 1,
        }
    }

    #[must_use]
    pub const fn pick(ticks: i64) -> Self {
        if ticks % Duration::TICKS_PER_DAY == 0 {
            Self::Days
        } else if ticks % Duration::TICKS_PER_HOUR == 0 {
            Self::Hours
        } else if ticks % Duration::TICKS_PER_MINUTE == 0 {
            Self::Minutes
        } else if ticks % Duration::TICKS_PER_SECOND == 0 {
            Self::Seconds
        } else if ticks % Duration::TICKS_PER_MILLI == 0 {
            Self::Milliseconds
        } else {
            Self::Ticks
        }
    }
}

//
// time surrogate: field 1 zigzag scaled value, field 2 raw varint scale
// (shared layout between the date-time and time-span messages)
//

pub fn encode_time(buf: &mut Vec<u8>, ticks: i64) {
    let scale = TimeScale::pick(ticks);
    let scaled = ticks / scale.ticks_per_unit();

    if scaled != 0 {
        wire::write_tag(buf, 1, WireType::Varint);
        wire::write_varint(buf, wire::zigzag_encode(scaled));
    }
    if scale as u64 != 0 {
        wire::write_tag(buf, 2, WireType::Varint);
        wire::write_varint(buf, scale as u64);
    }
}

pub fn decode_time(payload: &[u8]) -> Result<i64, CodecError> {
    let mut reader = WireReader::new(payload);
    let mut value = 0_i64;
    let mut scale = TimeScale::Days;

    while !reader.is_empty() {
        let (field, wire_type) = reader.read_tag()?;
        match (field, wire_type) {
            (1, WireType::Varint) => value = wire::zigzag_decode(reader.read_varint()?),
            (2, WireType::Varint) => scale = TimeScale::try_from_raw(reader.read_varint()?)?,
            _ => reader.skip(wire_type)?,
        }
    }

    Ok(value.saturating_mul(scale.ticks_per_unit()))
}

//
// guid surrogate: two fixed64 halves of the CLR byte layout, both always
// written
//

pub fn encode_guid(buf: &mut Vec<u8>, guid: Guid) {
    let bytes = guid.to_clr_bytes();
    let (lo, hi) = bytes.split_at(8);

    wire::write_tag(buf, 1, WireType::Fixed64);
    wire::write_fixed64(buf, u64::from_le_bytes(lo.try_into().expect("8-byte half")));
    wire::write_tag(buf, 2, WireType::Fixed64);
    wire::write_fixed64(buf, u64::from_le_bytes(hi.try_into().expect("8-byte half")));
}

pub fn decode_guid(payload: &[u8]) -> Result<Guid, CodecError> {
    let mut reader = WireReader::new(payload);
    let mut lo = 0_u64;
    let mut hi = 0_u64;

    while !reader.is_empty() {
        let (field, wire_type) = reader.read_tag()?;
        match (field, wire_type) {
            (1, WireType::Fixed64) => lo = reader.read_fixed64()?,
            (2, WireType::Fixed64) => hi = reader.read_fixed64()?,
            _ => reader.skip(wire_type)?,
        }
    }

    let mut bytes = [0_u8; 16];
    bytes[..8].copy_from_slice(&lo.to_le_bytes());
    bytes[8..].copy_from_slice(&hi.to_le_bytes());

    Ok(Guid::from_clr_bytes(bytes))
}

//
// decimal surrogate: low/high mantissa chunks plus packed sign-scale;
// at least one mantissa chunk is always present
//

pub fn encode_decimal(buf: &mut Vec<u8>, decimal: Decimal) {
    let parts = decimal.wire_parts();

    if parts.lo != 0 || parts.hi == 0 {
        wire::write_tag(buf, 1, WireType::Varint);
        wire::write_varint(buf, parts.lo);
    }
    if parts.hi != 0 {
        wire::write_tag(buf, 2, WireType::Varint);
        wire::write_varint(buf, u64::from(parts.hi));
    }
    if parts.sign_scale() != 0 {
        wire::write_tag(buf, 3, WireType::Varint);
        wire::write_varint(buf, u64::from(parts.sign_scale()));
    }
}

pub fn decode_decimal(payload: &[u8]) -> Result<Decimal, CodecError> {
    let mut reader = WireReader::new(payload);
    let mut lo = 0_u64;
    let mut hi = 0_u32;
    let mut sign_scale = 0_u32;

    while !reader.is_empty() {
        let (field, wire_type) = reader.read_tag()?;
        match (field, wire_type) {
            (1, WireType::Varint) => lo = reader.read_varint()?,
            (2, WireType::Varint) => {
                hi = u32::try_from(reader.read_varint()?).map_err(|_| CodecError::DecimalRange)?;
            }
            (3, WireType::Varint) => {
                sign_scale =
                    u32::try_from(reader.read_varint()?).map_err(|_| CodecError::DecimalRange)?;
            }
            _ => reader.skip(wire_type)?,
        }
    }

    Decimal::from_wire_parts(DecimalParts::from_sign_scale(lo, hi, sign_scale))
        .ok_or(CodecError::DecimalRange)
}

///
/// TESTS
///
