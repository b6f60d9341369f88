use crate::types::Duration;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use derive_more::FromStr;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

///
/// Instant
/// (in 100ns ticks since the Unix epoch, signed)
///

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
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
pub struct Instant(i64);

impl Instant {
    pub const UNIX_EPOCH: Self = Self(0);
    pub const MIN: Self = Self(i64::MIN);
    pub const MAX: Self = Self(i64::MAX);

    // ---- Constructors ----

    #[must_use]
    pub const fn from_ticks(ticks: i64) -> Self {
        Self(ticks)
    }

    #[must_use]
    pub const fn from_unix_seconds(secs: i64) -> Self {
        Self(secs.saturating_mul(Duration::TICKS_PER_SECOND))
    }

    #[must_use]
    pub const fn from_unix_millis(ms: i64) -> Self {
        Self(ms.saturating_mul(Duration::TICKS_PER_MILLI))
    }

    /// Midnight UTC on the given civil date. `None` when the date is invalid.
    #[must_use]
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        Self::from_ymd_hms(year, month, day, 0, 0, 0)
    }

    #[must_use]
    pub fn from_ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        min: u32,
        sec: u32,
    ) -> Option<Self> {
        let dt = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, min, sec)?;

        Some(Self::from_unix_seconds(dt.and_utc().timestamp()))
    }

    pub fn parse_rfc3339(s: &str) -> Result<Self, String> {
        let dt =
            DateTime::parse_from_rfc3339(s).map_err(|e| format!("instant parse error: {e}"))?;
        let ticks = dt
            .timestamp()
            .saturating_mul(Duration::TICKS_PER_SECOND)
            .saturating_add(i64::from(dt.timestamp_subsec_nanos()) / 100);

        Ok(Self(ticks))
    }

    // ---- Accessors ----

    #[must_use]
    pub const fn ticks(self) -> i64 {
        self.0
    }

    /// Whole seconds since the epoch, floored.
    #[must_use]
    pub const fn unix_seconds(self) -> i64 {
        self.0.div_euclid(Duration::TICKS_PER_SECOND)
    }

    /// Sub-second remainder in nanoseconds, always in `0..1_000_000_000`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub const fn subsec_nanos(self) -> u32 {
        (self.0.rem_euclid(Duration::TICKS_PER_SECOND) * 100) as u32
    }

    #[must_use]
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.unix_seconds(), self.subsec_nanos())
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            None => write!(f, "{} ticks", self.0),
        }
    }
}

impl Add<Duration> for Instant {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self {
        Self(self.0.saturating_add(rhs.ticks()))
    }
}

impl AddAssign<Duration> for Instant {
    fn add_assign(&mut self, rhs: Duration) {
        self.0 = self.0.saturating_add(rhs.ticks());
    }
}

impl Sub<Duration> for Instant {
    type Output = Self;

    fn sub(self, rhs: Duration) -> Self {
        Self(self.0.saturating_sub(rhs.ticks()))
    }
}

impl SubAssign<Duration> for Instant {
    fn sub_assign(&mut self, rhs: Duration) {
        self.0 = self.0.saturating_sub(rhs.ticks());
    }
}

impl Sub for Instant {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Duration {
        Duration::from_ticks(self.0.saturating_sub(rhs.0))
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn civil_date_matches_known_unix_time() {
        let t = Instant::from_ymd(2020, 5, 31).unwrap();
        assert_eq!(t.unix_seconds(), 1_590_883_200);
        assert_eq!(t.ticks() % Duration::TICKS_PER_DAY, 0);
        assert_eq!(t.ticks() / Duration::TICKS_PER_DAY, 18_413);
    }

    #[test]
    fn invalid_civil_dates_are_rejected() {
        assert!(Instant::from_ymd(2021, 2, 30).is_none());
        assert!(Instant::from_ymd_hms(2021, 1, 1, 25, 0, 0).is_none());
    }

    #[test]
    fn parse_rfc3339_keeps_subsecond_ticks() {
        let t = Instant::parse_rfc3339("2020-05-31T00:00:00.1234567Z").unwrap();
        assert_eq!(t.unix_seconds(), 1_590_883_200);
        assert_eq!(t.subsec_nanos(), 123_456_700);
    }

    #[test]
    fn parse_rfc3339_rejects_garbage() {
        assert!(Instant::parse_rfc3339("not-an-instant").is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        let t = Instant::from_ymd_hms(2024, 3, 9, 19, 45, 30).unwrap();
        assert_eq!(t.to_string(), "2024-03-09T19:45:30Z");
        assert_eq!(Instant::parse_rfc3339(&t.to_string()).unwrap(), t);
    }

    #[test]
    fn pre_epoch_instants_floor_their_seconds() {
        let t = Instant::from_ticks(-1);
        assert_eq!(t.unix_seconds(), -1);
        assert_eq!(t.subsec_nanos(), 999_999_900);
    }

    #[test]
    fn duration_arithmetic_saturates() {
        let t = Instant::from_ymd(2020, 5, 31).unwrap();
        assert_eq!((t + Duration::from_days(1)) - t, Duration::from_days(1));
        assert_eq!(Instant::MAX + Duration::from_secs(1), Instant::MAX);
    }
}
