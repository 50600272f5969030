use centauri_ibc_core::channel::{Packet, PacketError, TimeoutHeight};
use centauri_ibc_core::host::identifiers::Sequence;
use centauri_ibc_core::primitives::Signer;
use centauri_ibc_core::router::{Module, ModuleExtras};
use centauri_packet_forward_types::error::PacketForwardError;
use centauri_packet_forward_types::events::RetryEvent;
use centauri_packet_forward_types::in_flight::InFlightPacket;
use centauri_transfer::handler::send_transfer;
use centauri_transfer_types::msgs::MsgTransfer;
use centauri_transfer_types::packet::PacketData;
use centauri_transfer_types::RawCoin;
use tracing::{info, warn};

use super::{bridge_fee_error, error_ack, fail_forward, forward_failed};
use crate::context::PacketForwardExecutionContext;

/// Handles the timeout of a packet sent from this chain.
///
/// The wrapped application refunds the sender first. A timed out forward
/// with retries left is sent again; once they are exhausted the forward
/// fails and the packet it was forwarded for is acknowledged with an error.
pub fn on_timeout_packet_execute<M>(
    ctx: &mut M,
    packet: &Packet,
    relayer: &Signer,
) -> (ModuleExtras, Result<(), PacketError>)
where
    M: Module + PacketForwardExecutionContext,
{
    let in_flight =
        match ctx.in_flight_packet(&packet.chan_id_on_a, &packet.port_id_on_a, packet.seq_on_a) {
            Ok(Some(in_flight)) => in_flight,
            Ok(None) => return ctx.on_timeout_packet_execute(packet, relayer),
            Err(err) => return (ModuleExtras::empty(), Err(err.into())),
        };

    let bridge_fee = match ctx
        .take_sequence_fee(&packet.port_id_on_a, &packet.chan_id_on_a, packet.seq_on_a)
    {
        Ok(fee) => fee,
        Err(err) => return (ModuleExtras::empty(), Err(bridge_fee_error(err).into())),
    };

    let (mut extras, result) = ctx.on_timeout_packet_execute(packet, relayer);
    if let Err(err) = result {
        return (extras, Err(err));
    }

    match settle_timeout(ctx, packet, in_flight, bridge_fee) {
        Ok(settled) => {
            extras.merge(settled);
            (extras, Ok(()))
        }
        Err(err) => (extras, Err(err.into())),
    }
}

fn settle_timeout<Ctx>(
    ctx: &mut Ctx,
    packet: &Packet,
    in_flight: InFlightPacket,
    bridge_fee: Option<RawCoin>,
) -> Result<ModuleExtras, PacketForwardError>
where
    Ctx: PacketForwardExecutionContext,
{
    ctx.delete_in_flight_packet(&packet.chan_id_on_a, &packet.port_id_on_a, packet.seq_on_a)?;

    if in_flight.retries_remaining > 0 {
        match retry_forward(ctx, packet, &in_flight, bridge_fee.as_ref()) {
            Ok(sequence) => {
                info!(
                    previous_sequence = %packet.seq_on_a,
                    %sequence,
                    retries_remaining = in_flight.retries_remaining - 1,
                    "retrying timed out forward"
                );
                let event = RetryEvent {
                    channel: packet.chan_id_on_a.clone(),
                    previous_sequence: packet.seq_on_a,
                    sequence,
                    retries_remaining: in_flight.retries_remaining - 1,
                };
                return Ok(ModuleExtras {
                    events: vec![event.into()],
                    log: Vec::new(),
                });
            }
            Err(err) => warn!(error = %err, sequence = %packet.seq_on_a, "retrying forward failed"),
        }
    }

    let error = PacketForwardError::ForwardTimedOut;
    let description = error.to_string();
    fail_forward(ctx, packet, &in_flight, bridge_fee, description, error_ack(error))
}

/// Sends the timed out packet again with a fresh timeout and one retry less,
/// moving its bridge fee record to the new sequence.
fn retry_forward<Ctx>(
    ctx: &mut Ctx,
    packet: &Packet,
    in_flight: &InFlightPacket,
    bridge_fee: Option<&RawCoin>,
) -> Result<Sequence, PacketForwardError>
where
    Ctx: PacketForwardExecutionContext,
{
    let data = PacketData::from_bytes(&packet.data)?;
    let timeout_timestamp = (ctx.host_timestamp()? + in_flight.timeout)?;

    let msg = MsgTransfer {
        port_id_on_a: packet.port_id_on_a.clone(),
        chan_id_on_a: packet.chan_id_on_a.clone(),
        packet_data: data,
        timeout_height_on_b: TimeoutHeight::Never,
        timeout_timestamp_on_b: timeout_timestamp,
    };
    let sequence = send_transfer(ctx, msg).map_err(forward_failed)?;

    let retried = InFlightPacket {
        retries_remaining: in_flight.retries_remaining - 1,
        ..in_flight.clone()
    };
    ctx.store_in_flight_packet(&packet.chan_id_on_a, &packet.port_id_on_a, sequence, retried)?;

    if let Some(fee) = bridge_fee {
        ctx.set_sequence_fee(&packet.port_id_on_a, &packet.chan_id_on_a, sequence, fee)
            .map_err(bridge_fee_error)?;
    }

    Ok(sequence)
}
