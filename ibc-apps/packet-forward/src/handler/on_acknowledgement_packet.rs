use centauri_ibc_core::channel::{Acknowledgement, Packet, PacketError};
use centauri_ibc_core::primitives::Signer;
use centauri_ibc_core::router::{Module, ModuleExtras};
use centauri_packet_forward_types::error::PacketForwardError;
use centauri_packet_forward_types::in_flight::InFlightPacket;
use centauri_transfer_types::RawCoin;
use tracing::debug;

use super::{bridge_fee_error, fail_forward};
use crate::context::PacketForwardExecutionContext;

/// Handles the acknowledgement of a packet sent from this chain.
///
/// The wrapped application processes it first (refunding the sender of an
/// error). If the packet was a forward, the acknowledgement is then passed
/// on to the packet it was forwarded for.
pub fn on_acknowledgement_packet_execute<M>(
    ctx: &mut M,
    packet: &Packet,
    acknowledgement: &Acknowledgement,
    relayer: &Signer,
) -> (ModuleExtras, Result<(), PacketError>)
where
    M: Module + PacketForwardExecutionContext,
{
    let in_flight =
        match ctx.in_flight_packet(&packet.chan_id_on_a, &packet.port_id_on_a, packet.seq_on_a) {
            Ok(Some(in_flight)) => in_flight,
            Ok(None) => return ctx.on_acknowledgement_packet_execute(packet, acknowledgement, relayer),
            Err(err) => return (ModuleExtras::empty(), Err(err.into())),
        };

    // the forward settles its own bridge fee, the wrapped application never sees it
    let bridge_fee = match ctx
        .take_sequence_fee(&packet.port_id_on_a, &packet.chan_id_on_a, packet.seq_on_a)
    {
        Ok(fee) => fee,
        Err(err) => return (ModuleExtras::empty(), Err(bridge_fee_error(err).into())),
    };

    let (mut extras, result) = ctx.on_acknowledgement_packet_execute(packet, acknowledgement, relayer);
    if let Err(err) = result {
        return (extras, Err(err));
    }

    match settle_acknowledgement(ctx, packet, acknowledgement, &in_flight, bridge_fee) {
        Ok(settled) => {
            extras.merge(settled);
            (extras, Ok(()))
        }
        Err(err) => (extras, Err(err.into())),
    }
}

fn settle_acknowledgement<Ctx>(
    ctx: &mut Ctx,
    packet: &Packet,
    acknowledgement: &Acknowledgement,
    in_flight: &InFlightPacket,
    bridge_fee: Option<RawCoin>,
) -> Result<ModuleExtras, PacketForwardError>
where
    Ctx: PacketForwardExecutionContext,
{
    ctx.delete_in_flight_packet(&packet.chan_id_on_a, &packet.port_id_on_a, packet.seq_on_a)?;

    if acknowledgement.is_successful() {
        ctx.write_acknowledgement(&in_flight.received_packet(), acknowledgement.clone())?;

        debug!(
            sequence = %packet.seq_on_a,
            channel = %packet.chan_id_on_a,
            refund_sequence = %in_flight.refund_sequence,
            "forward acknowledged"
        );
        return Ok(ModuleExtras::empty());
    }

    let error = acknowledgement
        .status()
        .map(|status| status.to_string())
        .unwrap_or_else(|| "undecodable acknowledgement".to_string());

    fail_forward(ctx, packet, in_flight, bridge_fee, error, acknowledgement.clone())
}
