use derive_more::{Display, FromStr};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

///
/// Duration
/// (in 100ns ticks, signed)
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
pub struct Duration(i64);

impl Duration {
    pub const ZERO: Self = Self(0);
    pub const MIN: Self = Self(i64::MIN);
    pub const MAX: Self = Self(i64::MAX);

    // ratio constants
    pub const TICKS_PER_MILLI: i64 = 10_000;
    pub const TICKS_PER_SECOND: i64 = 10_000_000;
    pub const TICKS_PER_MINUTE: i64 = 60 * Self::TICKS_PER_SECOND;
    pub const TICKS_PER_HOUR: i64 = 60 * Self::TICKS_PER_MINUTE;
    pub const TICKS_PER_DAY: i64 = 24 * Self::TICKS_PER_HOUR;

    // ---- Constructors ----

    #[must_use]
    pub const fn from_ticks(ticks: i64) -> Self {
        Self(ticks)
    }

    #[must_use]
    pub const fn from_millis(ms: i64) -> Self {
        Self(ms.saturating_mul(Self::TICKS_PER_MILLI))
    }

    #[must_use]
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs.saturating_mul(Self::TICKS_PER_SECOND))
    }

    #[must_use]
    pub const fn from_minutes(mins: i64) -> Self {
        Self(mins.saturating_mul(Self::TICKS_PER_MINUTE))
    }

    #[must_use]
    pub const fn from_hours(hours: i64) -> Self {
        Self(hours.saturating_mul(Self::TICKS_PER_HOUR))
    }

    #[must_use]
    pub const fn from_days(days: i64) -> Self {
        Self(days.saturating_mul(Self::TICKS_PER_DAY))
    }

    // ---- Conversion back to larger units (truncating) ----

    #[must_use]
    pub const fn ticks(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn as_millis(self) -> i64 {
        self.0 / Self::TICKS_PER_MILLI
    }

    #[must_use]
    pub const fn as_secs(self) -> i64 {
        self.0 / Self::TICKS_PER_SECOND
    }

    #[must_use]
    pub const fn as_minutes(self) -> i64 {
        self.0 / Self::TICKS_PER_MINUTE
    }

    #[must_use]
    pub const fn as_hours(self) -> i64 {
        self.0 / Self::TICKS_PER_HOUR
    }

    #[must_use]
    pub const fn as_days(self) -> i64 {
        self.0 / Self::TICKS_PER_DAY
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl Add for Duration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Duration {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Duration {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Duration {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl Neg for Duration {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl From<i64> for Duration {
    fn from(ticks: i64) -> Self {
        Self(ticks)
    }
}

///
/// TESTS
///
