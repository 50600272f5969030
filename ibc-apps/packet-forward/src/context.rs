//! Defines the context traits a host implements to run the packet forward
//! middleware on top of its ICS-20 application.

use centauri_ibc_core::channel::context::{
    SendPacketExecutionContext, SendPacketValidationContext, WriteAckContext,
};
use centauri_ibc_core::host::identifiers::{ChannelId, PortId, Sequence};
use centauri_ibc_core::primitives::Signer;
use centauri_ibc_transfer_middleware::types::BridgeFee;
use centauri_ibc_transfer_middleware::FeeError;
use centauri_packet_forward_types::error::PacketForwardError;
use centauri_packet_forward_types::in_flight::InFlightPacket;
use centauri_packet_forward_types::params::Params;
use centauri_transfer::bank::BankKeeper;
use centauri_transfer::context::{TokenTransferExecutionContext, TokenTransferValidationContext};
use centauri_transfer_middleware::types::ParachainIbcTokenInfo;
use centauri_transfer_middleware::TransferMiddlewareError;
use centauri_transfer_types::msgs::MsgTransfer;
use centauri_transfer_types::RawCoin;

/// Read access the middleware needs from the host.
pub trait PacketForwardValidationContext:
    TokenTransferValidationContext + SendPacketValidationContext
{
    /// Account the protocol fee is paid to.
    fn community_pool_account(&self) -> Signer;

    fn forward_params(&self) -> Result<Params, PacketForwardError>;

    /// The received packet waiting on the forwarded packet identified by
    /// its source channel, port and sequence.
    fn in_flight_packet(
        &self,
        channel_id: &ChannelId,
        port_id: &PortId,
        sequence: Sequence,
    ) -> Result<Option<InFlightPacket>, PacketForwardError>;

    fn parachain_token_by_asset_id(
        &self,
        asset_id: &str,
    ) -> Result<Option<ParachainIbcTokenInfo>, TransferMiddlewareError>;

    /// Account credited with the bridge fees of `channel_id`.
    fn channel_fee_address(&self, channel_id: &ChannelId) -> Result<Option<Signer>, FeeError>;
}

/// Write access the middleware needs from the host.
pub trait PacketForwardExecutionContext:
    PacketForwardValidationContext
    + TokenTransferExecutionContext
    + SendPacketExecutionContext
    + WriteAckContext
    + BankKeeper
{
    fn store_in_flight_packet(
        &mut self,
        channel_id: &ChannelId,
        port_id: &PortId,
        sequence: Sequence,
        packet: InFlightPacket,
    ) -> Result<(), PacketForwardError>;

    fn delete_in_flight_packet(
        &mut self,
        channel_id: &ChannelId,
        port_id: &PortId,
        sequence: Sequence,
    ) -> Result<(), PacketForwardError>;

    /// Bridge fee of the outbound transfer `msg` at the current block time.
    /// The fee is deducted from the message amount but not moved.
    fn compute_bridge_fee(&mut self, msg: &mut MsgTransfer) -> Result<Option<BridgeFee>, FeeError>;

    /// Remembers the bridge fee charged on the packet `sequence` sent from
    /// `port_id`/`channel_id`.
    fn set_sequence_fee(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
        fee: &RawCoin,
    ) -> Result<(), FeeError>;

    /// Removes and returns the bridge fee charged on an outbound packet.
    fn take_sequence_fee(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Result<Option<RawCoin>, FeeError>;

    /// Turns the native tokens `holder` received for a parachain asset back
    /// into the IBC voucher they were converted from.
    ///
    /// Returns the voucher, or `None` when `coin` is not a parachain native
    /// denom.
    fn revert_parachain_conversion(
        &mut self,
        holder: &Signer,
        coin: &RawCoin,
    ) -> Result<Option<RawCoin>, TransferMiddlewareError>;
}
