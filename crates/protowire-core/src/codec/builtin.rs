//! Dispatch from a resolved representation to its leaf codec.
//!
//! Every builtin representation is length-delimited on the wire. The
//! functions here produce and consume the inner payload; the caller owns
//! the tag and length framing.

use crate::{
    codec::{native, surrogate, wellknown, CodecError},
    types::{Decimal, Duration, Guid, Instant},
    value::Value,
};
use protowire_schema::resolve::Representation;

/// Value label the representation expects, for mismatch diagnostics.
#[must_use]
pub const fn expected(repr: Representation) -> &'static str {
    match repr {
        Representation::DecimalString | Representation::DecimalSurrogate => "decimal",
        Representation::DurationSurrogate | Representation::DurationWellKnown => "duration",
        Representation::GuidBytes
        | Representation::GuidString
        | Representation::GuidSurrogate => "guid",
        Representation::InstantSurrogate | Representation::InstantWellKnown => "instant",
    }
}

/// Value a decoded record gets when a map entry omits this representation.
#[must_use]
pub const fn default_value(repr: Representation) -> Value {
    match repr {
        Representation::DecimalString | Representation::DecimalSurrogate => {
            Value::Decimal(Decimal::ZERO)
        }
        Representation::DurationSurrogate | Representation::DurationWellKnown => {
            Value::Duration(Duration::ZERO)
        }
        Representation::GuidBytes
        | Representation::GuidString
        | Representation::GuidSurrogate => Value::Guid(Guid::NIL),
        Representation::InstantSurrogate | Representation::InstantWellKnown => {
            Value::Instant(Instant::UNIX_EPOCH)
        }
    }
}

/// Inner payload bytes for a builtin value, without framing.
pub fn payload(repr: Representation, value: &Value) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::new();

    match (repr, value) {
        (Representation::InstantSurrogate, Value::Instant(instant)) => {
            surrogate::encode_time(&mut buf, instant.ticks());
        }
        (Representation::InstantWellKnown, Value::Instant(instant)) => {
            wellknown::encode_instant(&mut buf, *instant);
        }
        (Representation::DurationSurrogate, Value::Duration(duration)) => {
            surrogate::encode_time(&mut buf, duration.ticks());
        }
        (Representation::DurationWellKnown, Value::Duration(duration)) => {
            wellknown::encode_duration(&mut buf, *duration);
        }
        (Representation::GuidSurrogate, Value::Guid(guid)) => {
            surrogate::encode_guid(&mut buf, *guid);
        }
        (Representation::GuidString, Value::Guid(guid)) => {
            buf.extend_from_slice(guid.to_string().as_bytes());
        }
        (Representation::GuidBytes, Value::Guid(guid)) => {
            buf.extend_from_slice(&guid.to_rfc_bytes());
        }
        (Representation::DecimalSurrogate, Value::Decimal(decimal)) => {
            surrogate::encode_decimal(&mut buf, *decimal);
        }
        (Representation::DecimalString, Value::Decimal(decimal)) => {
            buf.extend_from_slice(decimal.to_string().as_bytes());
        }
        (repr, value) => {
            return Err(CodecError::ValueMismatch {
                expected: expected(repr),
                actual: value.label(),
            });
        }
    }

    Ok(buf)
}

/// Decode an inner payload back into the representation's value.
pub fn decode(repr: Representation, payload: &[u8]) -> Result<Value, CodecError> {
    let value = match repr {
        Representation::InstantSurrogate => {
            Value::Instant(Instant::from_ticks(surrogate::decode_time(payload)?))
        }
        Representation::InstantWellKnown => Value::Instant(wellknown::decode_instant(payload)?),
        Representation::DurationSurrogate => {
            Value::Duration(Duration::from_ticks(surrogate::decode_time(payload)?))
        }
        Representation::DurationWellKnown => Value::Duration(wellknown::decode_duration(payload)?),
        Representation::GuidSurrogate => Value::Guid(surrogate::decode_guid(payload)?),
        Representation::GuidString => Value::Guid(native::decode_guid_text(payload)?),
        Representation::GuidBytes => Value::Guid(native::decode_guid_bytes(payload)?),
        Representation::DecimalSurrogate => Value::Decimal(surrogate::decode_decimal(payload)?),
        Representation::DecimalString => Value::Decimal(native::decode_decimal_text(payload)?),
    };

    Ok(value)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Representation; 9] = [
        Representation::DecimalString,
        Representation::DecimalSurrogate,
        Representation::DurationSurrogate,
        Representation::DurationWellKnown,
        Representation::GuidBytes,
        Representation::GuidString,
        Representation::GuidSurrogate,
        Representation::InstantSurrogate,
        Representation::InstantWellKnown,
    ];

    #[test]
    fn every_representation_round_trips_its_value() {
        let guid: Guid = "c416e4af-455e-414c-948c-f27873263547".parse().unwrap();
        let instant = Instant::from_ymd(2020, 5, 31).unwrap();
        let duration = Duration::from_secs(3_600);
        let decimal: Decimal = "12354.1451".parse().unwrap();

        for repr in ALL {
            let value = match expected(repr) {
                "guid" => Value::Guid(guid),
                "instant" => Value::Instant(instant),
                "duration" => Value::Duration(duration),
                "decimal" => Value::Decimal(decimal),
                other => panic!("unhandled label {other}"),
            };

            let bytes = payload(repr, &value).unwrap();
            assert_eq!(decode(repr, &bytes).unwrap(), value, "{repr}");
        }
    }

    #[test]
    fn defaults_decode_from_empty_message_payloads() {
        for repr in ALL {
            if repr.is_message() {
                assert_eq!(decode(repr, &[]).unwrap(), default_value(repr), "{repr}");
            }
        }
    }

    #[test]
    fn mismatched_values_name_both_sides() {
        let err = payload(Representation::GuidString, &Value::Bool(true)).unwrap_err();
        assert_eq!(
            err,
            CodecError::ValueMismatch {
                expected: "guid",
                actual: "bool"
            }
        );
    }

    #[test]
    fn guid_string_payload_is_the_canonical_text() {
        let guid: Guid = "c416e4af-455e-414c-948c-f27873263547".parse().unwrap();
        let bytes = payload(Representation::GuidString, &Value::Guid(guid)).unwrap();
        assert_eq!(bytes, b"c416e4af-455e-414c-948c-f27873263547");
    }

    #[test]
    fn guid_bytes_payload_is_sixteen_rfc_bytes() {
        let guid: Guid = "c416e4af-455e-414c-948c-f27873263547".parse().unwrap();
        let bytes = payload(Representation::GuidBytes, &Value::Guid(guid)).unwrap();
        assert_eq!(bytes.len(), 16);
        assert_eq!(bytes[0], 0xC4);
    }
}
