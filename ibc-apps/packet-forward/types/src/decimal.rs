//! Fixed-point decimal with 18 fractional digits, as cosmos `sdk.Dec`.

use core::fmt::{Display, Error as FmtError, Formatter};
use core::str::FromStr;

use centauri_transfer_types::{Amount, U256};
use primitive_types::U512;

use crate::error::PacketForwardError;

/// Number of fractional digits.
pub const PRECISION: usize = 18;

fn one() -> U256 {
    U256::exp10(PRECISION)
}

/// A non-negative decimal stored as an integer scaled by `10^18`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Decimal(U256);

impl Decimal {
    pub fn zero() -> Self {
        Self(U256::zero())
    }

    pub fn one() -> Self {
        Self(one())
    }

    /// Builds the decimal `atomics / 10^18`.
    pub fn from_atomics(atomics: U256) -> Self {
        Self(atomics)
    }

    pub fn atomics(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// `amount × self`, rounded half to even the way `sdk.Dec.RoundInt` does.
    ///
    /// Returns `None` on overflow.
    pub fn checked_mul_amount(&self, amount: Amount) -> Option<Amount> {
        let product: U512 = amount.as_ref().full_mul(self.0);
        let one = U512::from(one());
        let (quotient, remainder) = product.div_mod(one);

        let twice_remainder = remainder << 1;
        let round_up = twice_remainder > one || (twice_remainder == one && quotient.bit(0));
        let rounded = if round_up {
            quotient.checked_add(U512::one())?
        } else {
            quotient
        };

        U256::try_from(rounded).ok().map(Amount::from)
    }
}

impl FromStr for Decimal {
    type Err = PacketForwardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| PacketForwardError::InvalidDecimal {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let (integer, fraction) = s.split_once('.').unwrap_or((s, ""));
        if integer.is_empty() || !integer.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("invalid integer part"));
        }
        if !fraction.bytes().all(|b| b.is_ascii_digit()) || (s.contains('.') && fraction.is_empty()) {
            return Err(invalid("invalid fractional part"));
        }
        if fraction.len() > PRECISION {
            return Err(invalid("too many fractional digits"));
        }

        let integer = U256::from_dec_str(integer).map_err(|_| invalid("integer part overflows"))?;
        let fraction = if fraction.is_empty() {
            U256::zero()
        } else {
            U256::from_dec_str(fraction).map_err(|_| invalid("invalid fractional part"))?
                * U256::exp10(PRECISION - fraction.len())
        };

        integer
            .checked_mul(one())
            .and_then(|scaled| scaled.checked_add(fraction))
            .map(Self)
            .ok_or_else(|| invalid("overflow"))
    }
}

/// Always prints all 18 fractional digits, like `sdk.Dec`.
impl Display for Decimal {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        let (integer, fraction) = self.0.div_mod(one());
        write!(f, "{integer}.{:0>width$}", fraction.to_string(), width = PRECISION)
    }
}

impl serde::Serialize for Decimal {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Decimal {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("0", "0.000000000000000000")]
    #[case("1", "1.000000000000000000")]
    #[case("0.005", "0.005000000000000000")]
    #[case("12.5", "12.500000000000000000")]
    #[case("0.000000000000000001", "0.000000000000000001")]
    fn parse_and_print(#[case] input: &str, #[case] printed: &str) {
        assert_eq!(input.parse::<Decimal>().unwrap().to_string(), printed);
    }

    #[rstest]
    #[case("")]
    #[case(".5")]
    #[case("1.")]
    #[case("-1")]
    #[case("1.0000000000000000001")]
    #[case("1e5")]
    fn reject_malformed(#[case] input: &str) {
        assert!(input.parse::<Decimal>().is_err());
    }

    #[rstest]
    // 1000 * 0.005 = 5
    #[case("0.005", 1_000, 5)]
    // 10 * 0.25 = 2.5, rounds to even 2
    #[case("0.25", 10, 2)]
    // 30 * 0.25 = 7.5, rounds to even 8
    #[case("0.25", 30, 8)]
    // 7 * 0.3 = 2.1
    #[case("0.3", 7, 2)]
    // 9 * 0.3 = 2.7
    #[case("0.3", 9, 3)]
    #[case("0", 1_000_000, 0)]
    #[case("1", 42, 42)]
    fn multiply_rounds_half_even(#[case] rate: &str, #[case] amount: u64, #[case] expected: u64) {
        let rate: Decimal = rate.parse().unwrap();
        assert_eq!(
            rate.checked_mul_amount(Amount::from(amount)),
            Some(Amount::from(expected))
        );
    }

    #[test]
    fn multiplication_overflow_is_detected() {
        let two: Decimal = "2".parse().unwrap();
        assert_eq!(two.checked_mul_amount(Amount::from(U256::MAX)), None);
    }
}
