use core::cmp::min;

use centauri_ibc_core::channel::{Acknowledgement, Packet};
use centauri_ibc_core::router::ModuleExtras;
use centauri_packet_forward_types::error::PacketForwardError;
use centauri_packet_forward_types::events::{FailureEvent, FeeEvent};
use centauri_ibc_transfer_middleware::transfer::return_fee;
use centauri_packet_forward_types::in_flight::InFlightPacket;
use centauri_transfer_types::is_receiver_chain_source;
use centauri_transfer_types::packet::PacketData;
use centauri_transfer_types::RawCoin;
use tracing::{debug, warn};

use super::{bridge_fee_error, nonrefundable_ack, parachain_error};
use crate::context::PacketForwardExecutionContext;

/// Settles a forward that will not complete and acknowledges the packet it
/// was forwarded for.
///
/// A refundable forward is unwound on this chain and `error_ack` is written,
/// letting the source chain refund the original sender. A nonrefundable one
/// leaves the funds on the override receiver and acknowledges success.
///
/// The wrapped application must already have returned the forwarded tokens
/// to the override receiver.
pub fn fail_forward<Ctx>(
    ctx: &mut Ctx,
    forwarded: &Packet,
    in_flight: &InFlightPacket,
    bridge_fee: Option<RawCoin>,
    error: String,
    error_ack: Acknowledgement,
) -> Result<ModuleExtras, PacketForwardError>
where
    Ctx: PacketForwardExecutionContext,
{
    let mut extras = ModuleExtras::empty();

    // a nonrefundable forward keeps its bridge fee
    let ack = if in_flight.nonrefundable {
        nonrefundable_ack(&error)?
    } else {
        extras.merge(refund_forward(ctx, forwarded, in_flight, bridge_fee)?);
        error_ack
    };

    ctx.write_acknowledgement(&in_flight.received_packet(), ack)?;

    warn!(
        sequence = %forwarded.seq_on_a,
        channel = %forwarded.chan_id_on_a,
        %error,
        refunded = !in_flight.nonrefundable,
        "forward failed"
    );

    extras.events.push(
        FailureEvent {
            original_sender: in_flight.original_sender_address.clone(),
            channel: forwarded.chan_id_on_a.clone(),
            sequence: forwarded.seq_on_a,
            error,
            refunded: !in_flight.nonrefundable,
        }
        .into(),
    );

    Ok(extras)
}

/// Undoes on this chain everything a forward did to the received tokens, so
/// that the source chain can refund the original sender.
///
/// The fees are returned to the override receiver, a parachain native denom
/// is turned back into its voucher, and the receipt itself is undone:
/// tokens that were unescrowed go back into the escrow of the arrival
/// channel, vouchers that were minted are burned.
///
/// Fee accounts may have spent what they collected. Fees are returned as far
/// as they can be and only what the override receiver then holds is unwound.
pub fn refund_forward<Ctx>(
    ctx: &mut Ctx,
    forwarded: &Packet,
    in_flight: &InFlightPacket,
    bridge_fee: Option<RawCoin>,
) -> Result<ModuleExtras, PacketForwardError>
where
    Ctx: PacketForwardExecutionContext,
{
    let forwarded_data = PacketData::from_bytes(&forwarded.data)?;
    let received_data = PacketData::from_bytes(&in_flight.packet_data)?;
    let override_receiver = forwarded_data.sender;

    let mut extras = ModuleExtras::empty();

    if let Some(fee) = bridge_fee {
        match ctx
            .channel_fee_address(&forwarded.chan_id_on_a)
            .map_err(bridge_fee_error)?
        {
            Some(fee_address) => {
                if let Some(returned) = return_fee(ctx, &fee_address, &override_receiver, &fee) {
                    extras.events.push(
                        FeeEvent {
                            kind: "bridge_refund",
                            payer: fee_address,
                            recipient: override_receiver.clone(),
                            fee: returned,
                        }
                        .into(),
                    );
                }
            }
            None => warn!(
                channel = %forwarded.chan_id_on_a,
                %fee,
                "channel has no fee address anymore, bridge fee kept"
            ),
        }
    }

    if let Some(fee) = &in_flight.protocol_fee {
        let community_pool = ctx.community_pool_account();
        if let Some(returned) = return_fee(ctx, &community_pool, &override_receiver, fee) {
            extras.events.push(
                FeeEvent {
                    kind: "protocol_refund",
                    payer: community_pool,
                    recipient: override_receiver.clone(),
                    fee: returned,
                }
                .into(),
            );
        }
    }

    let received = received_data.token.amount;
    let held = ctx.balance(&override_receiver, &in_flight.received_denom);
    if held < received {
        warn!(
            %override_receiver,
            denom = %in_flight.received_denom,
            %received,
            %held,
            "override receiver cannot cover the whole receipt, unwinding what it holds"
        );
    }
    let mut coin = RawCoin::new(in_flight.received_denom.clone(), min(held, received));
    if coin.amount.is_zero() {
        return Ok(extras);
    }

    if was_converted_from_parachain(ctx, in_flight, &received_data)? {
        if let Some(voucher) = ctx
            .revert_parachain_conversion(&override_receiver, &coin)
            .map_err(parachain_error)?
        {
            coin = voucher;
        }
    }

    if is_receiver_chain_source(
        &in_flight.packet_src_port_id,
        &in_flight.packet_src_channel_id,
        &received_data.token.denom,
    ) {
        let escrow =
            ctx.escrow_account(&in_flight.refund_port_id, &in_flight.refund_channel_id);
        ctx.send_coins(&override_receiver, &escrow, &coin)?;
    } else {
        ctx.burn_coins(&override_receiver, &coin)?;
    }

    debug!(
        sequence = %in_flight.refund_sequence,
        channel = %in_flight.refund_channel_id,
        %coin,
        "unwound forwarded receipt"
    );

    Ok(extras)
}

/// Whether the received tokens were a parachain asset converted to its
/// native denom on receipt.
fn was_converted_from_parachain<Ctx>(
    ctx: &Ctx,
    in_flight: &InFlightPacket,
    received_data: &PacketData,
) -> Result<bool, PacketForwardError>
where
    Ctx: PacketForwardExecutionContext,
{
    let info = ctx
        .parachain_token_by_asset_id(&received_data.token.denom.to_string())
        .map_err(parachain_error)?;

    Ok(info.is_some_and(|info| {
        info.channel_id == in_flight.refund_channel_id
            && info.native_denom == in_flight.received_denom
    }))
}
