use crate::prelude::*;
use derive_more::{Display, FromStr};

///
/// CompatibilityLevel
///
/// Ordered so newer levels compare greater than older ones.
///

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    FromStr,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
pub enum CompatibilityLevel {
    #[default]
    Legacy,
    Modern,
}

impl CompatibilityLevel {
    #[must_use]
    pub const fn is_modern(self) -> bool {
        matches!(self, Self::Modern)
    }
}

///
/// FormatOverride
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, FromStr, PartialEq, Serialize)]
#[remain::sorted]
pub enum FormatOverride {
    FixedSize,
    WellKnown,
    ZigZag,
}

///
/// BuiltinKind
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, FromStr, PartialEq, Serialize)]
#[remain::sorted]
pub enum BuiltinKind {
    Decimal,
    Duration,
    Guid,
    Instant,
}

///
/// ScalarType
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, FromStr, PartialEq, Serialize)]
#[remain::sorted]
pub enum ScalarType {
    Bool,
    Bytes,
    Double,
    Float,
    Int32,
    Int64,
    String,
    UInt32,
    UInt64,
}

impl ScalarType {
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(self, Self::Int32 | Self::Int64 | Self::UInt32 | Self::UInt64)
    }

    #[must_use]
    pub const fn is_signed(self) -> bool {
        matches!(self, Self::Int32 | Self::Int64)
    }

    #[must_use]
    pub const fn is_wide(self) -> bool {
        matches!(self, Self::Double | Self::Int64 | Self::UInt64)
    }

    // native map keys are integer, bool, or string scalars
    #[must_use]
    pub const fn supports_map_key(self) -> bool {
        self.is_integer() || matches!(self, Self::Bool | Self::String)
    }

    #[must_use]
    pub const fn proto_name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Bytes => "bytes",
            Self::Double => "double",
            Self::Float => "float",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::String => "string",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
        }
    }
}

///
/// TESTS
///
