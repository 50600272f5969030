use centauri_ibc_core::channel::TimeoutHeight;
use centauri_ibc_core::host::identifiers::{ChannelId, PortId};
use centauri_ibc_core::primitives::{Signer, Timestamp};
use centauri_transfer_types::msgs::MsgTransfer;
use centauri_transfer_types::packet::PacketData;
use centauri_transfer_types::{Amount, PrefixedCoin, PrefixedDenom};
use typed_builder::TypedBuilder;

/// One day after [`DEFAULT_GENESIS_TIME`](crate::context::DEFAULT_GENESIS_TIME).
pub const DEFAULT_TRANSFER_TIMEOUT: Timestamp =
    Timestamp::from_nanoseconds(1_700_000_000_000_000_000 + 86_400_000_000_000);

/// Configuration of the [`PacketData`] of a transfer.
#[derive(TypedBuilder, Debug)]
#[builder(build_method(into = PacketData))]
pub struct PacketDataConfig {
    /// Full denom trace, e.g. `transfer/channel-0/ppica`.
    #[builder(setter(into))]
    pub denom: String,
    #[builder(setter(into))]
    pub amount: Amount,
    #[builder(setter(into))]
    pub sender: Signer,
    #[builder(setter(into))]
    pub receiver: Signer,
    #[builder(default, setter(into))]
    pub memo: String,
}

impl From<PacketDataConfig> for PacketData {
    fn from(config: PacketDataConfig) -> Self {
        let denom: PrefixedDenom = config
            .denom
            .parse()
            .expect("fixture denoms are valid traces");
        PacketData {
            token: PrefixedCoin::new(denom, config.amount),
            sender: config.sender,
            receiver: config.receiver,
            memo: config.memo.into(),
        }
    }
}

/// Configuration of a [`MsgTransfer`] on the transfer port.
#[derive(TypedBuilder, Debug)]
#[builder(build_method(into = MsgTransfer))]
pub struct MsgTransferConfig {
    #[builder(default = PortId::transfer())]
    pub port_id_on_a: PortId,
    pub chan_id_on_a: ChannelId,
    #[builder(setter(into))]
    pub packet_data: PacketData,
    #[builder(default = TimeoutHeight::Never)]
    pub timeout_height_on_b: TimeoutHeight,
    #[builder(default = DEFAULT_TRANSFER_TIMEOUT)]
    pub timeout_timestamp_on_b: Timestamp,
}

impl From<MsgTransferConfig> for MsgTransfer {
    fn from(config: MsgTransferConfig) -> Self {
        MsgTransfer {
            port_id_on_a: config.port_id_on_a,
            chan_id_on_a: config.chan_id_on_a,
            packet_data: config.packet_data,
            timeout_height_on_b: config.timeout_height_on_b,
            timeout_timestamp_on_b: config.timeout_timestamp_on_b,
        }
    }
}
