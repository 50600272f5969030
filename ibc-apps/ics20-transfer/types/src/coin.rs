//! Amounts of a denomination, both as carried in packets and as held by a
//! bank.
use core::fmt::{self, Display, Formatter};
use core::str::FromStr;

use super::amount::Amount;
use super::denom::PrefixedDenom;
use super::error::TokenTransferError;
use crate::proto::ProtoCoin;

/// A coin as written in packet data, with its full trace.
pub type PrefixedCoin = Coin<PrefixedDenom>;

/// A coin as a bank holds it: `ppica`, or `ibc/27394F...` for a voucher.
pub type RawCoin = Coin<String>;

#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct Coin<D> {
    pub denom: D,
    pub amount: Amount,
}

impl<D> Coin<D> {
    pub fn new(denom: D, amount: impl Into<Amount>) -> Self {
        Self {
            denom,
            amount: amount.into(),
        }
    }
}

impl PrefixedCoin {
    /// The coin as the bank module holds it, with the hashed voucher denom.
    pub fn to_bank_coin(&self) -> RawCoin {
        RawCoin::new(self.denom.ibc_denom(), self.amount)
    }
}

/// Stored coins are checked on the way out: the denom must parse and the
/// amount must be a decimal that fits 256 bits.
impl<D: FromStr> TryFrom<ProtoCoin> for Coin<D>
where
    D::Err: Into<TokenTransferError>,
{
    type Error = TokenTransferError;

    fn try_from(proto: ProtoCoin) -> Result<Self, Self::Error> {
        Ok(Self {
            denom: proto.denom.parse().map_err(Into::into)?,
            amount: proto.amount.parse()?,
        })
    }
}

impl<D: Display> From<Coin<D>> for ProtoCoin {
    fn from(coin: Coin<D>) -> Self {
        Self {
            denom: coin.denom.to_string(),
            amount: coin.amount.to_string(),
        }
    }
}

/// The SDK notation, e.g. `1000ppica`.
impl<D: Display> Display for Coin<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

#[cfg(test)]
mod tests {
    use primitive_types::U256;
    use rstest::rstest;

    use super::*;

    #[test]
    fn bank_coin_uses_hashed_denom() {
        let coin = PrefixedCoin::new("transfer/channel-0/uatom".parse().unwrap(), 5u64);
        let bank_coin = coin.to_bank_coin();
        assert_eq!(
            bank_coin.denom,
            "ibc/27394FB092D2ECCD56123C74F36E4C1F926001CEADA9CA97EA622B25F41E5EB2"
        );
        assert_eq!(bank_coin.amount, Amount::from(5u64));

        let native = PrefixedCoin::new("ppica".parse().unwrap(), 5u64);
        assert_eq!(native.to_bank_coin().to_string(), "5ppica");
    }

    #[test]
    fn proto_coin_conversion() {
        let proto = ProtoCoin {
            denom: "ppica".to_string(),
            amount: "1000".to_string(),
        };
        let coin = RawCoin::try_from(proto.clone()).unwrap();
        assert_eq!(coin, RawCoin::new("ppica".to_string(), 1000u64));
        assert_eq!(ProtoCoin::from(coin), proto);
    }

    #[test]
    fn proto_coin_accepts_u256_max() {
        let proto = ProtoCoin {
            denom: "ppica".to_string(),
            amount: U256::MAX.to_string(),
        };
        assert_eq!(
            RawCoin::try_from(proto).unwrap().amount,
            Amount::from(U256::MAX)
        );
    }

    #[rstest]
    #[case::not_a_number("ppica", "ten")]
    #[case::negative("ppica", "-1")]
    #[case::past_u256(
        "ppica",
        "115792089237316195423570985008687907853269984665640564039457584007913129639936"
    )]
    #[case::empty_denom("", "10")]
    fn invalid_proto_coins_are_rejected(#[case] denom: &str, #[case] amount: &str) {
        let proto = ProtoCoin {
            denom: denom.to_string(),
            amount: amount.to_string(),
        };
        assert!(PrefixedCoin::try_from(proto).is_err());
    }
}
