use derive_more::{Display, FromStr};
use rust_decimal::Decimal as WrappedDecimal;
use serde::{Deserialize, Serialize};

///
/// DecimalParts
///
/// Wire decomposition of a decimal: 96-bit unsigned mantissa split into a
/// low 64-bit chunk and a high 32-bit chunk, plus sign and scale packed
/// the way the surrogate message expects.
///
/// Invariant:
/// - value == (-1)^negative * ((hi << 64) | lo) * 10^-scale
/// - scale <= 28
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DecimalParts {
    pub lo: u64,
    pub hi: u32,
    pub scale: u32,
    pub negative: bool,
}

impl DecimalParts {
    /// Sign bit in the low bit, scale shifted above it.
    #[must_use]
    pub const fn sign_scale(self) -> u32 {
        (self.scale << 1) | (self.negative as u32)
    }

    #[must_use]
    pub const fn from_sign_scale(lo: u64, hi: u32, sign_scale: u32) -> Self {
        Self {
            lo,
            hi,
            scale: sign_scale >> 1,
            negative: sign_scale & 1 == 1,
        }
    }
}

///
/// Decimal
///

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    Eq,
    FromStr,
    PartialEq,
    Hash,
    Ord,
    PartialOrd,
    Serialize,
    Deserialize,
)]
#[repr(transparent)]
pub struct Decimal(WrappedDecimal);

impl Decimal {
    pub const ZERO: Self = Self(WrappedDecimal::ZERO);

    /// Construct a decimal from mantissa and scale.
    #[must_use]
    pub fn new(num: i64, scale: u32) -> Self {
        Self(WrappedDecimal::new(num, scale))
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Decompose into the wire chunks.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn wire_parts(self) -> DecimalParts {
        let magnitude = self.0.mantissa().unsigned_abs();

        DecimalParts {
            lo: magnitude as u64,
            hi: (magnitude >> 64) as u32,
            scale: self.0.scale(),
            negative: self.0.is_sign_negative(),
        }
    }

    /// Rebuild from wire chunks. `None` when the mantissa or scale falls
    /// outside the 96-bit / 28-digit envelope.
    #[must_use]
    pub fn from_wire_parts(parts: DecimalParts) -> Option<Self> {
        let magnitude = (i128::from(parts.hi) << 64) | i128::from(parts.lo);
        let mantissa = if parts.negative { -magnitude } else { magnitude };

        WrappedDecimal::try_from_i128_with_scale(mantissa, parts.scale)
            .ok()
            .map(Self)
    }
}

impl From<i64> for Decimal {
    fn from(n: i64) -> Self {
        Self(WrappedDecimal::from(n))
    }
}

///
/// TESTS
///
