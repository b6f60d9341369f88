use crate::prelude::*;
use derive_more::Display;
use thiserror::Error as ThisError;

///
/// ResolveError
///

#[derive(Clone, Copy, Debug, ThisError)]
pub enum ResolveError {
    #[error("format {format} has no mapping for builtin {kind}")]
    UnsupportedBuiltinFormat {
        kind: BuiltinKind,
        format: FormatOverride,
    },

    #[error("format {format} has no mapping for scalar {scalar}")]
    UnsupportedScalarFormat {
        scalar: ScalarType,
        format: FormatOverride,
    },
}

///
/// Representation
///
/// The resolver's output for one builtin occurrence. A pure function of
/// (kind, level, override); anything else is a bug.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum Representation {
    DecimalString,
    DecimalSurrogate,
    DurationSurrogate,
    DurationWellKnown,
    GuidBytes,
    GuidString,
    GuidSurrogate,
    InstantSurrogate,
    InstantWellKnown,
}

impl Representation {
    /// Message-backed representations frame as a length-delimited submessage
    /// and always emit, even when the payload is empty.
    #[must_use]
    pub const fn is_message(self) -> bool {
        matches!(
            self,
            Self::DecimalSurrogate
                | Self::DurationSurrogate
                | Self::DurationWellKnown
                | Self::GuidSurrogate
                | Self::InstantSurrogate
                | Self::InstantWellKnown
        )
    }

    #[must_use]
    pub const fn proto_type(self) -> &'static str {
        match self {
            Self::DecimalString | Self::GuidString => "string",
            Self::DecimalSurrogate => ".bcl.Decimal",
            Self::DurationSurrogate => ".bcl.TimeSpan",
            Self::DurationWellKnown => ".google.protobuf.Duration",
            Self::GuidBytes => "bytes",
            Self::GuidSurrogate => ".bcl.Guid",
            Self::InstantSurrogate => ".bcl.DateTime",
            Self::InstantWellKnown => ".google.protobuf.Timestamp",
        }
    }

    /// Schema module this representation pulls in, if any.
    #[must_use]
    pub const fn import_path(self) -> Option<&'static str> {
        match self {
            Self::DecimalSurrogate
            | Self::DurationSurrogate
            | Self::GuidSurrogate
            | Self::InstantSurrogate => Some("protobuf-net/bcl.proto"),
            Self::DurationWellKnown => Some("google/protobuf/duration.proto"),
            Self::InstantWellKnown => Some("google/protobuf/timestamp.proto"),
            Self::DecimalString | Self::GuidBytes | Self::GuidString => None,
        }
    }
}

///
/// ScalarRepr
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum ScalarRepr {
    Fixed,
    Plain,
    ZigZag,
}

///
/// resolve_builtin
///
/// The decision table. Overrides win over level where they apply; an
/// override with no row for the kind is an error, surfaced before any
/// bytes are written.
///

pub const fn resolve_builtin(
    kind: BuiltinKind,
    level: CompatibilityLevel,
    format: Option<FormatOverride>,
) -> Result<Representation, ResolveError> {
    match (kind, format) {
        (BuiltinKind::Instant, None) => Ok(Representation::InstantSurrogate),
        (BuiltinKind::Instant, Some(FormatOverride::WellKnown)) => {
            Ok(Representation::InstantWellKnown)
        }
        (BuiltinKind::Duration, None) => Ok(Representation::DurationSurrogate),
        (BuiltinKind::Duration, Some(FormatOverride::WellKnown)) => {
            Ok(Representation::DurationWellKnown)
        }
        (BuiltinKind::Guid, None) => Ok(if level.is_modern() {
            Representation::GuidString
        } else {
            Representation::GuidSurrogate
        }),
        (BuiltinKind::Guid, Some(FormatOverride::FixedSize)) => Ok(Representation::GuidBytes),
        (BuiltinKind::Decimal, None) => Ok(if level.is_modern() {
            Representation::DecimalString
        } else {
            Representation::DecimalSurrogate
        }),
        (_, Some(format)) => Err(ResolveError::UnsupportedBuiltinFormat { kind, format }),
    }
}

///
/// resolve_scalar
///
/// ZigZag applies to signed integers, FixedSize to any integer. FixedSize
/// on a float or double names the representation it already has.
///

pub const fn resolve_scalar(
    scalar: ScalarType,
    format: Option<FormatOverride>,
) -> Result<ScalarRepr, ResolveError> {
    match format {
        None => Ok(ScalarRepr::Plain),
        Some(FormatOverride::ZigZag) if scalar.is_signed() => Ok(ScalarRepr::ZigZag),
        Some(FormatOverride::FixedSize) if scalar.is_integer() => Ok(ScalarRepr::Fixed),
        Some(FormatOverride::FixedSize)
            if matches!(scalar, ScalarType::Float | ScalarType::Double) =>
        {
            Ok(ScalarRepr::Plain)
        }
        Some(format) => Err(ResolveError::UnsupportedScalarFormat { scalar, format }),
    }
}

/// Proto3 type keyword for a scalar under a resolved representation.
#[must_use]
pub const fn scalar_proto_name(scalar: ScalarType, repr: ScalarRepr) -> &'static str {
    match (repr, scalar) {
        (ScalarRepr::ZigZag, ScalarType::Int32) => "sint32",
        (ScalarRepr::ZigZag, ScalarType::Int64) => "sint64",
        (ScalarRepr::Fixed, ScalarType::Int32) => "sfixed32",
        (ScalarRepr::Fixed, ScalarType::Int64) => "sfixed64",
        (ScalarRepr::Fixed, ScalarType::UInt32) => "fixed32",
        (ScalarRepr::Fixed, ScalarType::UInt64) => "fixed64",
        _ => scalar.proto_name(),
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use CompatibilityLevel::{Legacy, Modern};

    #[test]
    fn instants_and_durations_stay_surrogate_at_every_level() {
        for level in [Legacy, Modern] {
            assert_eq!(
                resolve_builtin(BuiltinKind::Instant, level, None).ok(),
                Some(Representation::InstantSurrogate)
            );
            assert_eq!(
                resolve_builtin(BuiltinKind::Duration, level, None).ok(),
                Some(Representation::DurationSurrogate)
            );
        }
    }

    #[test]
    fn well_known_override_wins_at_every_level() {
        for level in [Legacy, Modern] {
            assert_eq!(
                resolve_builtin(BuiltinKind::Instant, level, Some(FormatOverride::WellKnown)).ok(),
                Some(Representation::InstantWellKnown)
            );
            assert_eq!(
                resolve_builtin(BuiltinKind::Duration, level, Some(FormatOverride::WellKnown)).ok(),
                Some(Representation::DurationWellKnown)
            );
        }
    }

    #[test]
    fn guid_flips_to_string_at_modern() {
        assert_eq!(
            resolve_builtin(BuiltinKind::Guid, Legacy, None).ok(),
            Some(Representation::GuidSurrogate)
        );
        assert_eq!(
            resolve_builtin(BuiltinKind::Guid, Modern, None).ok(),
            Some(Representation::GuidString)
        );
        assert_eq!(
            resolve_builtin(BuiltinKind::Guid, Legacy, Some(FormatOverride::FixedSize)).ok(),
            Some(Representation::GuidBytes)
        );
    }

    #[test]
    fn decimal_flips_to_string_at_modern() {
        assert_eq!(
            resolve_builtin(BuiltinKind::Decimal, Legacy, None).ok(),
            Some(Representation::DecimalSurrogate)
        );
        assert_eq!(
            resolve_builtin(BuiltinKind::Decimal, Modern, None).ok(),
            Some(Representation::DecimalString)
        );
    }

    #[test]
    fn meaningless_overrides_are_rejected() {
        assert!(resolve_builtin(BuiltinKind::Guid, Legacy, Some(FormatOverride::ZigZag)).is_err());
        assert!(
            resolve_builtin(BuiltinKind::Decimal, Legacy, Some(FormatOverride::FixedSize)).is_err()
        );
        assert!(
            resolve_builtin(BuiltinKind::Decimal, Modern, Some(FormatOverride::WellKnown)).is_err()
        );
        assert!(resolve_scalar(ScalarType::String, Some(FormatOverride::ZigZag)).is_err());
        assert!(resolve_scalar(ScalarType::Bool, Some(FormatOverride::WellKnown)).is_err());
    }

    #[test]
    fn scalar_reprs_resolve() {
        assert_eq!(
            resolve_scalar(ScalarType::Int32, Some(FormatOverride::ZigZag)).ok(),
            Some(ScalarRepr::ZigZag)
        );
        assert_eq!(
            resolve_scalar(ScalarType::UInt64, Some(FormatOverride::FixedSize)).ok(),
            Some(ScalarRepr::Fixed)
        );
        assert_eq!(
            resolve_scalar(ScalarType::Double, Some(FormatOverride::FixedSize)).ok(),
            Some(ScalarRepr::Plain)
        );
        assert!(resolve_scalar(ScalarType::UInt32, Some(FormatOverride::ZigZag)).is_err());
    }

    #[test]
    fn proto_names_follow_repr() {
        assert_eq!(
            scalar_proto_name(ScalarType::Int32, ScalarRepr::ZigZag),
            "sint32"
        );
        assert_eq!(
            scalar_proto_name(ScalarType::UInt32, ScalarRepr::Fixed),
            "fixed32"
        );
        assert_eq!(
            scalar_proto_name(ScalarType::Int64, ScalarRepr::Fixed),
            "sfixed64"
        );
        assert_eq!(
            scalar_proto_name(ScalarType::String, ScalarRepr::Plain),
            "string"
        );
    }
}
