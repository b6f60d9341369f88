use crate::codec::CodecError;
use protowire_schema::build::BuildError;
use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Top-level runtime error with a stable classification for callers that
/// branch on failure category rather than message text.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("{route}: {source}")]
    Codec { route: String, source: CodecError },

    #[error("unknown message {name}")]
    UnknownMessage { name: String },

    #[error(transparent)]
    SchemaError(#[from] protowire_schema::Error),
}

impl Error {
    pub(crate) fn codec(route: impl Into<String>, source: CodecError) -> Self {
        Self::Codec {
            route: route.into(),
            source,
        }
    }

    pub(crate) fn unknown_message(name: impl Into<String>) -> Self {
        Self::UnknownMessage { name: name.into() }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Codec { source, .. } => match source {
                CodecError::ValueMismatch { .. } => ErrorKind::ValueMismatch,
                _ => ErrorKind::MalformedWire,
            },
            Self::UnknownMessage { .. } => ErrorKind::UnknownMessage,
            Self::SchemaError(protowire_schema::Error::BuildError(err)) => match err {
                BuildError::AmbiguousMapKey { .. } => ErrorKind::AmbiguousMapKey,
                BuildError::Resolve { .. } => ErrorKind::UnsupportedFormat,
                BuildError::Validation(_) => ErrorKind::Validation,
            },
        }
    }
}

///
/// ErrorKind
/// Stable failure categories surfaced to callers and to metrics.
///

#[remain::sorted]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    AmbiguousMapKey,
    MalformedWire,
    UnknownMessage,
    UnsupportedFormat,
    Validation,
    ValueMismatch,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::AmbiguousMapKey => "ambiguous_map_key",
            Self::MalformedWire => "malformed_wire",
            Self::UnknownMessage => "unknown_message",
            Self::UnsupportedFormat => "unsupported_format",
            Self::Validation => "validation",
            Self::ValueMismatch => "value_mismatch",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::WireError;

    #[test]
    fn codec_failures_classify_as_malformed_wire() {
        let err = Error::codec("Haz.When", CodecError::Wire(WireError::VarintOverlong));
        assert_eq!(err.kind(), ErrorKind::MalformedWire);
        assert!(err.to_string().starts_with("Haz.When: "));
    }

    #[test]
    fn value_mismatch_keeps_its_own_kind() {
        let err = Error::codec(
            "Haz.Name",
            CodecError::ValueMismatch {
                expected: "string",
                actual: "bool",
            },
        );
        assert_eq!(err.kind(), ErrorKind::ValueMismatch);
    }

    #[test]
    fn unknown_message_classifies_itself() {
        let err = Error::unknown_message("Missing");
        assert_eq!(err.kind(), ErrorKind::UnknownMessage);
        assert_eq!(err.to_string(), "unknown message Missing");
    }

    #[test]
    fn kind_labels_are_snake_case() {
        assert_eq!(ErrorKind::MalformedWire.to_string(), "malformed_wire");
        assert_eq!(ErrorKind::AmbiguousMapKey.to_string(), "ambiguous_map_key");
    }
}
