//! Governance-managed parameters of the forwarding keeper.

use crate::decimal::Decimal;
use crate::error::PacketForwardError;

pub mod raw {
    #[derive(Clone, PartialEq, prost::Message)]
    pub struct RawParams {
        /// `sdk.Dec` in its string form
        #[prost(string, tag = "1")]
        pub fee_percentage: String,
    }
}

use raw::RawParams;

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Params {
    /// Share of every forwarded amount paid to the community pool.
    pub fee_percentage: Decimal,
}

impl Params {
    /// The fee share must lie in `[0, 1]`.
    pub fn validate(&self) -> Result<(), PacketForwardError> {
        if self.fee_percentage > Decimal::one() {
            return Err(PacketForwardError::InvalidDecimal {
                value: self.fee_percentage.to_string(),
                reason: "fee percentage above 1".to_string(),
            });
        }
        Ok(())
    }
}

impl TryFrom<RawParams> for Params {
    type Error = PacketForwardError;

    fn try_from(raw: RawParams) -> Result<Self, Self::Error> {
        let fee_percentage = if raw.fee_percentage.is_empty() {
            Decimal::zero()
        } else {
            raw.fee_percentage.parse()?
        };
        Ok(Self { fee_percentage })
    }
}

impl From<Params> for RawParams {
    fn from(params: Params) -> Self {
        Self {
            fee_percentage: params.fee_percentage.to_string(),
        }
    }
}
