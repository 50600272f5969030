use centauri_ibc_core::host::identifiers::{ChannelId, PortId, Sequence};
use centauri_ibc_core::primitives::Signer;
use centauri_ibc_transfer_middleware::types::BridgeFee;
use centauri_ibc_transfer_middleware::FeeError;
use centauri_packet_forward::context::{
    PacketForwardExecutionContext, PacketForwardValidationContext,
};
use centauri_packet_forward::types::error::PacketForwardError;
use centauri_packet_forward::types::in_flight::InFlightPacket;
use centauri_packet_forward::types::params::Params;
use centauri_transfer_middleware::relay::revert_native_conversion;
use centauri_transfer_middleware::types::ParachainIbcTokenInfo;
use centauri_transfer_middleware::TransferMiddlewareError;
use centauri_transfer_types::msgs::MsgTransfer;
use centauri_transfer_types::RawCoin;

use crate::context::MockChain;

impl PacketForwardValidationContext for MockChain {
    fn community_pool_account(&self) -> Signer {
        self.community_pool.clone()
    }

    fn forward_params(&self) -> Result<Params, PacketForwardError> {
        self.forward.params()
    }

    fn in_flight_packet(
        &self,
        channel_id: &ChannelId,
        port_id: &PortId,
        sequence: Sequence,
    ) -> Result<Option<InFlightPacket>, PacketForwardError> {
        self.forward.in_flight_packet(channel_id, port_id, sequence)
    }

    fn parachain_token_by_asset_id(
        &self,
        asset_id: &str,
    ) -> Result<Option<ParachainIbcTokenInfo>, TransferMiddlewareError> {
        self.parachain.parachain_ibc_token_info_by_asset_id(asset_id)
    }

    fn channel_fee_address(&self, channel_id: &ChannelId) -> Result<Option<Signer>, FeeError> {
        self.fees.channel_fee_address(channel_id)
    }
}

impl PacketForwardExecutionContext for MockChain {
    fn store_in_flight_packet(
        &mut self,
        channel_id: &ChannelId,
        port_id: &PortId,
        sequence: Sequence,
        packet: InFlightPacket,
    ) -> Result<(), PacketForwardError> {
        self.forward
            .set_in_flight_packet(channel_id, port_id, sequence, &packet)
    }

    fn delete_in_flight_packet(
        &mut self,
        channel_id: &ChannelId,
        port_id: &PortId,
        sequence: Sequence,
    ) -> Result<(), PacketForwardError> {
        self.forward
            .delete_in_flight_packet(channel_id, port_id, sequence);
        Ok(())
    }

    fn compute_bridge_fee(&mut self, msg: &mut MsgTransfer) -> Result<Option<BridgeFee>, FeeError> {
        self.fees.compute_bridge_fee(msg, self.timestamp)
    }

    fn set_sequence_fee(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
        fee: &RawCoin,
    ) -> Result<(), FeeError> {
        self.fees.set_sequence_fee(port_id, channel_id, sequence, fee)
    }

    fn take_sequence_fee(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Result<Option<RawCoin>, FeeError> {
        self.fees.take_sequence_fee(port_id, channel_id, sequence)
    }

    fn revert_parachain_conversion(
        &mut self,
        holder: &Signer,
        coin: &RawCoin,
    ) -> Result<Option<RawCoin>, TransferMiddlewareError> {
        revert_native_conversion(
            &self.parachain,
            &mut self.bank,
            &self.parachain_module_account,
            holder,
            coin,
        )
    }
}
