use std::collections::BTreeSet;

use centauri_ibc_core::host::identifiers::ChannelId;
use centauri_ibc_core::primitives::Signer;
use centauri_transfer_types::proto::ProtoCoin;
use centauri_transfer_types::RawCoin;

use crate::error::FeeError;

/// Raw protobuf messages as persisted in the module store.
pub mod raw {
    use centauri_transfer_types::proto::ProtoCoin;

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct RawTxPriorityFee {
        #[prost(string, tag = "1")]
        pub priority: String,
        #[prost(message, optional, tag = "2")]
        pub priority_fee: Option<ProtoCoin>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct RawCoinItem {
        #[prost(message, optional, tag = "1")]
        pub min_fee: Option<ProtoCoin>,
        #[prost(int64, tag = "2")]
        pub percentage: i64,
        #[prost(message, repeated, tag = "3")]
        pub tx_priority_fee: Vec<RawTxPriorityFee>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct RawChannelFee {
        #[prost(string, tag = "1")]
        pub channel: String,
        #[prost(message, repeated, tag = "2")]
        pub allowed_tokens: Vec<RawCoinItem>,
        #[prost(string, tag = "3")]
        pub fee_address: String,
        #[prost(int64, tag = "4")]
        pub min_timeout_timestamp: i64,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct RawParams {
        #[prost(message, repeated, tag = "1")]
        pub channel_fees: Vec<RawChannelFee>,
    }
}

use raw::{RawChannelFee, RawCoinItem, RawParams, RawTxPriorityFee};

/// Surcharge added to the minimum fee when the transfer memo names `priority`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TxPriorityFee {
    pub priority: String,
    pub priority_fee: RawCoin,
}

/// Fee schedule of one token on one channel.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CoinItem {
    /// Fixed part of the fee. Its denom is the on-chain denom of the token.
    pub min_fee: RawCoin,
    /// Divisor applied to what is left after the fixed part.
    pub percentage: i64,
    pub tx_priority_fee: Vec<TxPriorityFee>,
}

impl CoinItem {
    pub fn denom(&self) -> &str {
        &self.min_fee.denom
    }

    pub fn priority_fee(&self, priority: &str) -> Option<&TxPriorityFee> {
        self.tx_priority_fee
            .iter()
            .find(|fee| fee.priority == priority)
    }
}

/// Fee configuration of a source channel.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ChannelFee {
    pub channel: ChannelId,
    pub allowed_tokens: Vec<CoinItem>,
    /// Account credited with the fees charged on this channel.
    pub fee_address: Signer,
    /// Minimum distance in nanoseconds between the block time and the
    /// transfer timeout; `0` disables the check.
    pub min_timeout_timestamp: i64,
}

impl ChannelFee {
    pub fn coin(&self, denom: &str) -> Option<&CoinItem> {
        self.allowed_tokens.iter().find(|coin| coin.denom() == denom)
    }
}

/// Governance-managed parameters of the fee keeper.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Params {
    pub channel_fees: Vec<ChannelFee>,
}

impl Params {
    pub fn channel_fee(&self, channel: &ChannelId) -> Option<&ChannelFee> {
        self.channel_fees.iter().find(|fee| &fee.channel == channel)
    }

    /// Rejects duplicate channels, duplicate denoms within a channel, empty
    /// fee addresses and percentages below 1.
    pub fn validate(&self) -> Result<(), FeeError> {
        let mut channels = BTreeSet::new();
        for channel_fee in &self.channel_fees {
            if !channels.insert(&channel_fee.channel) {
                return Err(FeeError::InvalidParams {
                    reason: format!("duplicate channel {}", channel_fee.channel),
                });
            }
            if channel_fee.fee_address.is_empty() {
                return Err(FeeError::InvalidParams {
                    reason: format!("empty fee address for {}", channel_fee.channel),
                });
            }
            if channel_fee.min_timeout_timestamp < 0 {
                return Err(FeeError::InvalidParams {
                    reason: format!("negative min timeout for {}", channel_fee.channel),
                });
            }
            let mut denoms = BTreeSet::new();
            for coin in &channel_fee.allowed_tokens {
                if !denoms.insert(coin.denom()) {
                    return Err(FeeError::InvalidParams {
                        reason: format!(
                            "duplicate denom {} for {}",
                            coin.denom(),
                            channel_fee.channel
                        ),
                    });
                }
                if coin.percentage < 1 {
                    return Err(FeeError::InvalidPercentage {
                        percentage: coin.percentage,
                    });
                }
            }
        }
        Ok(())
    }
}

fn invalid(reason: impl ToString) -> FeeError {
    FeeError::InvalidParams {
        reason: reason.to_string(),
    }
}

fn coin_from_raw(coin: Option<ProtoCoin>, field: &str) -> Result<RawCoin, FeeError> {
    coin.ok_or_else(|| invalid(format!("missing {field}")))?
        .try_into()
        .map_err(FeeError::Transfer)
}

impl TryFrom<RawTxPriorityFee> for TxPriorityFee {
    type Error = FeeError;

    fn try_from(raw: RawTxPriorityFee) -> Result<Self, Self::Error> {
        Ok(Self {
            priority: raw.priority,
            priority_fee: coin_from_raw(raw.priority_fee, "priority_fee")?,
        })
    }
}

impl From<TxPriorityFee> for RawTxPriorityFee {
    fn from(value: TxPriorityFee) -> Self {
        Self {
            priority: value.priority,
            priority_fee: Some(value.priority_fee.into()),
        }
    }
}

impl TryFrom<RawCoinItem> for CoinItem {
    type Error = FeeError;

    fn try_from(raw: RawCoinItem) -> Result<Self, Self::Error> {
        Ok(Self {
            min_fee: coin_from_raw(raw.min_fee, "min_fee")?,
            percentage: raw.percentage,
            tx_priority_fee: raw
                .tx_priority_fee
                .into_iter()
                .map(TryInto::try_into)
                .collect::<Result<_, _>>()?,
        })
    }
}

impl From<CoinItem> for RawCoinItem {
    fn from(value: CoinItem) -> Self {
        Self {
            min_fee: Some(value.min_fee.into()),
            percentage: value.percentage,
            tx_priority_fee: value.tx_priority_fee.into_iter().map(Into::into).collect(),
        }
    }
}

impl TryFrom<RawChannelFee> for ChannelFee {
    type Error = FeeError;

    fn try_from(raw: RawChannelFee) -> Result<Self, Self::Error> {
        Ok(Self {
            channel: raw.channel.parse().map_err(|e| invalid(e))?,
            allowed_tokens: raw
                .allowed_tokens
                .into_iter()
                .map(TryInto::try_into)
                .collect::<Result<_, _>>()?,
            fee_address: raw.fee_address.into(),
            min_timeout_timestamp: raw.min_timeout_timestamp,
        })
    }
}

impl From<ChannelFee> for RawChannelFee {
    fn from(value: ChannelFee) -> Self {
        Self {
            channel: value.channel.to_string(),
            allowed_tokens: value.allowed_tokens.into_iter().map(Into::into).collect(),
            fee_address: value.fee_address.to_string(),
            min_timeout_timestamp: value.min_timeout_timestamp,
        }
    }
}

impl TryFrom<RawParams> for Params {
    type Error = FeeError;

    fn try_from(raw: RawParams) -> Result<Self, Self::Error> {
        Ok(Self {
            channel_fees: raw
                .channel_fees
                .into_iter()
                .map(TryInto::try_into)
                .collect::<Result<_, _>>()?,
        })
    }
}

impl From<Params> for RawParams {
    fn from(value: Params) -> Self {
        Self {
            channel_fees: value.channel_fees.into_iter().map(Into::into).collect(),
        }
    }
}
