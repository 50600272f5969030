use centauri_ibc_core::channel::Packet;
use centauri_ibc_core::router::ModuleExtras;
use centauri_transfer_types::error::TokenTransferError;
use centauri_transfer_types::events::DenomTraceEvent;
use centauri_transfer_types::packet::PacketData;
use centauri_transfer_types::{is_receiver_chain_source, TracePrefix};

use super::{mint_vouchers, release_escrow};
use crate::context::TokenTransferExecutionContext;

/// Credits the receiver of an inbound transfer.
///
/// Tokens returning to their source chain leave the escrow of the receiving
/// channel end. Anything else is minted as a voucher whose denom carries the
/// receiving channel end as its newest hop.
///
/// Checks run inside this step: a failure to receive is not a failure of the
/// message, it becomes an error acknowledgement that lets the sender refund.
pub fn process_recv_packet_execute<Ctx: TokenTransferExecutionContext>(
    ctx_b: &mut Ctx,
    packet: &Packet,
    data: PacketData,
) -> Result<ModuleExtras, (ModuleExtras, TokenTransferError)> {
    let PacketData {
        token: mut coin,
        receiver,
        ..
    } = data;

    if is_receiver_chain_source(&packet.port_id_on_a, &packet.chan_id_on_a, &coin.denom) {
        coin.denom.remove_trace_prefix(&TracePrefix::new(
            packet.port_id_on_a.clone(),
            packet.chan_id_on_a.clone(),
        ));

        release_escrow(
            ctx_b,
            &packet.port_id_on_b,
            &packet.chan_id_on_b,
            &receiver,
            &coin.to_bank_coin(),
        )
        .map_err(|err| (ModuleExtras::empty(), err))?;

        return Ok(ModuleExtras::empty());
    }

    coin.denom.add_trace_prefix(TracePrefix::new(
        packet.port_id_on_b.clone(),
        packet.chan_id_on_b.clone(),
    ));

    let extras = ModuleExtras {
        events: vec![DenomTraceEvent::minted(coin.denom.clone()).into()],
        log: Vec::new(),
    };

    match mint_vouchers(ctx_b, &receiver, &coin.to_bank_coin()) {
        Ok(()) => Ok(extras),
        Err(err) => Err((extras, err)),
    }
}
