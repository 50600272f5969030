//! Defines the representation of timestamps used by the host and in packets.

use core::fmt::{Display, Error as FmtError, Formatter};
use core::num::ParseIntError;
use core::ops::Add;
use core::str::FromStr;
use core::time::Duration;

use displaydoc::Display;

/// Nanoseconds since the Unix epoch.
///
/// Zero is reserved for "not set", the way packet timeouts encode an absent
/// timestamp on the wire.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(
    PartialEq, Eq, Copy, Clone, Debug, Default, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const fn from_nanoseconds(nanoseconds: u64) -> Self {
        Self(nanoseconds)
    }

    pub fn from_unix_timestamp(secs: u64, nanos: u32) -> Result<Self, TimestampError> {
        if nanos > 999_999_999 {
            return Err(TimestampError::DateOutOfRange);
        }
        secs.checked_mul(1_000_000_000)
            .and_then(|n| n.checked_add(u64::from(nanos)))
            .map(Self)
            .ok_or(TimestampError::DateOutOfRange)
    }

    /// The unset timestamp
    pub const fn none() -> Self {
        Self(0)
    }

    pub fn is_set(&self) -> bool {
        self.0 != 0
    }

    pub fn nanoseconds(self) -> u64 {
        self.0
    }

    /// Computes the duration difference of another `Timestamp` from the current
    /// one. Returns `None` if `other` is later than `self`.
    pub fn duration_since(&self, other: &Self) -> Option<Duration> {
        self.0.checked_sub(other.0).map(Duration::from_nanos)
    }

    /// Whether this timestamp, used as a deadline, has passed at `now`.
    pub fn has_expired(&self, now: &Self) -> bool {
        self.is_set() && now >= self
    }
}

impl FromStr for Timestamp {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let nanoseconds = u64::from_str(s)?;
        Ok(Self(nanoseconds))
    }
}

impl From<u64> for Timestamp {
    fn from(nanoseconds: u64) -> Self {
        Self(nanoseconds)
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "Timestamp({})", self.0)
    }
}

impl Add<Duration> for Timestamp {
    type Output = Result<Self, TimestampError>;

    fn add(self, rhs: Duration) -> Self::Output {
        let nanos = u64::try_from(rhs.as_nanos()).map_err(|_| TimestampError::DateOutOfRange)?;
        self.0
            .checked_add(nanos)
            .map(Self)
            .ok_or(TimestampError::DateOutOfRange)
    }
}

#[derive(Debug, Display, PartialEq, Eq)]
pub enum TimestampError {
    /// failed to parse integer: `{0}`
    FailedToParseInt(ParseIntError),
    /// date out of range
    DateOutOfRange,
}

impl std::error::Error for TimestampError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::FailedToParseInt(e) => Some(e),
            Self::DateOutOfRange => None,
        }
    }
}

impl From<ParseIntError> for TimestampError {
    fn from(e: ParseIntError) -> Self {
        Self::FailedToParseInt(e)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_timestamp_comparisons() {
        let nil_timestamp = Timestamp::none();
        assert!(!nil_timestamp.is_set());
        assert_eq!(nil_timestamp.nanoseconds(), 0);

        let t1 = Timestamp::from_nanoseconds(5);
        let t2 = (t1 + Duration::from_nanos(10)).unwrap();
        assert!(t2 > t1);
        assert_eq!(t2.duration_since(&t1), Some(Duration::from_nanos(10)));
        assert_eq!(t1.duration_since(&t2), None);
    }

    #[test]
    fn test_add_overflow() {
        let t = Timestamp::from_nanoseconds(u64::MAX);
        assert_eq!(t + Duration::from_nanos(1), Err(TimestampError::DateOutOfRange));
    }

    #[rstest]
    #[case(0, 0, 0)]
    #[case(1, 0, 1_000_000_000)]
    #[case(1, 5, 1_000_000_005)]
    fn test_from_unix_timestamp(#[case] secs: u64, #[case] nanos: u32, #[case] expected: u64) {
        assert_eq!(
            Timestamp::from_unix_timestamp(secs, nanos).unwrap().nanoseconds(),
            expected
        );
    }

    #[rstest]
    #[case(0, false)]
    #[case(99, false)]
    #[case(100, true)]
    #[case(101, true)]
    fn test_has_expired(#[case] now: u64, #[case] expired: bool) {
        let deadline = Timestamp::from_nanoseconds(100);
        assert_eq!(deadline.has_expired(&Timestamp::from_nanoseconds(now)), expired);
    }

    #[test]
    fn unset_deadline_never_expires() {
        assert!(!Timestamp::none().has_expired(&Timestamp::from_nanoseconds(u64::MAX)));
    }

    #[test]
    fn test_serde_is_plain_nanoseconds() {
        let t = Timestamp::from_nanoseconds(42);
        assert_eq!(serde_json::to_string(&t).unwrap(), "42");
    }
}
