use centauri_ibc_core::host::identifiers::ChannelId;
use centauri_ibc_core::primitives::Signer;
use centauri_transfer_types::RawCoin;

use super::{ChannelFee, CoinItem};

/// The fee computed for one outbound transfer.
///
/// Computing it moves no funds: the caller transfers `fee` from `sender` to
/// `receiver`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BridgeFee {
    pub fee: RawCoin,
    pub sender: Signer,
    /// Fee address of the channel.
    pub receiver: Signer,
}

/// The fee settings that apply to one token on one channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelFeeConfig {
    pub channel: ChannelId,
    pub fee_address: Signer,
    pub min_timeout_timestamp: i64,
    pub coin: CoinItem,
}

impl ChannelFeeConfig {
    pub fn new(channel_fee: &ChannelFee, coin: CoinItem) -> Self {
        Self {
            channel: channel_fee.channel.clone(),
            fee_address: channel_fee.fee_address.clone(),
            min_timeout_timestamp: channel_fee.min_timeout_timestamp,
            coin,
        }
    }
}
