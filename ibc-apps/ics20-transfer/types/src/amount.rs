use core::str::FromStr;

use primitive_types::U256;

use super::error::TokenTransferError;

/// A token quantity. ICS-20 carries amounts as decimal strings of up to 256
/// bits, so that is also how this type (de)serializes.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Eq,
    PartialEq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
    derive_more::From,
    derive_more::Into,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(into = "String", try_from = "String")]
pub struct Amount(#[cfg_attr(feature = "schema", schemars(with = "String"))] U256);

impl Amount {
    pub const fn zero() -> Self {
        Self(U256::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    pub fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }

    /// Floor division, `None` for a zero divisor.
    pub fn checked_div(self, rhs: Self) -> Option<Self> {
        self.0.checked_div(rhs.0).map(Self)
    }
}

impl AsRef<U256> for Amount {
    fn as_ref(&self) -> &U256 {
        &self.0
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(value.into())
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value.into())
    }
}

/// Plain decimal digits only: no sign, no `0x`.
impl FromStr for Amount {
    type Err = TokenTransferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        U256::from_dec_str(s)
            .map(Self)
            .map_err(TokenTransferError::InvalidAmount)
    }
}

impl TryFrom<String> for Amount {
    type Error = TokenTransferError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.0.to_string()
    }
}

/// Fixed 32 bytes, big-endian.
#[cfg(feature = "borsh")]
impl borsh::BorshSerialize for Amount {
    fn serialize<W: borsh::io::Write>(&self, writer: &mut W) -> borsh::io::Result<()> {
        let mut bytes = [0u8; 32];
        self.0.to_big_endian(&mut bytes);
        writer.write_all(&bytes)
    }
}

#[cfg(feature = "borsh")]
impl borsh::BorshDeserialize for Amount {
    fn deserialize_reader<R: borsh::io::Read>(reader: &mut R) -> borsh::io::Result<Self> {
        let mut bytes = [0u8; 32];
        reader.read_exact(&mut bytes)?;
        Ok(Self(U256::from_big_endian(&bytes)))
    }
}
