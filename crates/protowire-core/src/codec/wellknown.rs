//! Well-known `google.protobuf` payloads for instants and durations.
//!
//! Both messages share the seconds/nanos layout; they differ only in the
//! sign convention. Timestamps keep nanos in `0..1_000_000_000`, durations
//! carry the same sign on both fields.

use crate::{
    codec::CodecError,
    types::{Duration, Instant},
    wire::{self, WireReader, WireType},
};

#[allow(clippy::cast_sign_loss)]
fn encode_parts(buf: &mut Vec<u8>, seconds: i64, nanos: i64) {
    if seconds != 0 {
        wire::write_tag(buf, 1, WireType::Varint);
        wire::write_varint(buf, seconds as u64);
    }
    if nanos != 0 {
        wire::write_tag(buf, 2, WireType::Varint);
        wire::write_varint(buf, nanos as u64);
    }
}

#[allow(clippy::cast_possible_wrap)]
fn decode_parts(payload: &[u8]) -> Result<(i64, i64), CodecError> {
    let mut reader = WireReader::new(payload);
    let mut seconds = 0_i64;
    let mut nanos = 0_i64;

    while !reader.is_empty() {
        let (field, wire_type) = reader.read_tag()?;
        match (field, wire_type) {
            (1, WireType::Varint) => seconds = reader.read_varint()? as i64,
            (2, WireType::Varint) => nanos = reader.read_varint()? as i64,
            _ => reader.skip(wire_type)?,
        }
    }

    Ok((seconds, nanos))
}

const fn ticks_from_parts(seconds: i64, nanos: i64) -> i64 {
    seconds
        .saturating_mul(Duration::TICKS_PER_SECOND)
        .saturating_add(nanos / 100)
}

pub fn encode_instant(buf: &mut Vec<u8>, instant: Instant) {
    encode_parts(buf, instant.unix_seconds(), i64::from(instant.subsec_nanos()));
}

pub fn decode_instant(payload: &[u8]) -> Result<Instant, CodecError> {
    let (seconds, nanos) = decode_parts(payload)?;

    Ok(Instant::from_ticks(ticks_from_parts(seconds, nanos)))
}

pub fn encode_duration(buf: &mut Vec<u8>, duration: Duration) {
    let ticks = duration.ticks();
    encode_parts(
        buf,
        ticks / Duration::TICKS_PER_SECOND,
        ticks % Duration::TICKS_PER_SECOND * 100,
    );
}

pub fn decode_duration(payload: &[u8]) -> Result<Duration, CodecError> {
    let (seconds, nanos) = decode_parts(payload)?;

    Ok(Duration::from_ticks(ticks_from_parts(seconds, nanos)))
}

///
/// TESTS
///
