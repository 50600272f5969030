use centauri_ibc_core::channel::{Acknowledgement, AcknowledgementStatus, Packet, TimeoutHeight};
use centauri_ibc_core::primitives::Signer;
use centauri_ibc_core::router::{Module, ModuleExtras};
use centauri_packet_forward_types::config::ForwardConfig;
use centauri_packet_forward_types::error::PacketForwardError;
use centauri_packet_forward_types::events::{FeeEvent, ForwardEvent};
use centauri_packet_forward_types::in_flight::InFlightPacket;
use centauri_packet_forward_types::metadata::{ForwardMemo, ForwardMetadata};
use centauri_packet_forward_types::receiver::derive_override_receiver;
use centauri_transfer::handler::send_transfer;
use centauri_transfer_types::msgs::MsgTransfer;
use centauri_transfer_types::packet::PacketData;
use centauri_transfer_types::{ack_success_b64, PrefixedCoin, PrefixedDenom, RawCoin};
use tracing::{debug, info};

use super::{bridge_fee_error, error_ack, forward_failed, parachain_error};
use crate::context::PacketForwardExecutionContext;
use crate::denom::prefixed_denom_for_this_chain;
use crate::middleware::ForwardFlags;

/// Receives a packet on behalf of the wrapped application, forwarding it
/// when its memo asks for it.
///
/// Packets that are not ICS-20 transfers, or whose memo has no `forward`
/// object, go to the wrapped application unchanged. A forwarded packet is
/// acknowledged once the forward settles, so `None` is returned for it.
pub fn on_recv_packet_execute<M>(
    ctx: &mut M,
    config: &ForwardConfig,
    packet: &Packet,
    relayer: &Signer,
    flags: ForwardFlags,
) -> (ModuleExtras, Option<Acknowledgement>)
where
    M: Module + PacketForwardExecutionContext,
{
    let Ok(data) = PacketData::from_bytes(&packet.data) else {
        return ctx.on_recv_packet_execute(packet, relayer);
    };

    let metadata = match ForwardMemo::parse(data.memo.as_str()) {
        Ok(ForwardMemo::Absent) => return ctx.on_recv_packet_execute(packet, relayer),
        Ok(ForwardMemo::Forward(metadata)) => metadata.forward,
        Err(err) => {
            debug!(error = %err, sequence = %packet.seq_on_a, "rejecting forward request");
            return (ModuleExtras::empty(), Some(error_ack(err)));
        }
    };

    match process_forward(ctx, config, packet, relayer, flags, data, metadata) {
        Ok(outcome) => outcome,
        Err(err) => {
            debug!(error = %err, sequence = %packet.seq_on_a, "failed to forward packet");
            (ModuleExtras::empty(), Some(error_ack(err)))
        }
    }
}

fn process_forward<M>(
    ctx: &mut M,
    config: &ForwardConfig,
    packet: &Packet,
    relayer: &Signer,
    flags: ForwardFlags,
    data: PacketData,
    metadata: ForwardMetadata,
) -> Result<(ModuleExtras, Option<Acknowledgement>), PacketForwardError>
where
    M: Module + PacketForwardExecutionContext,
{
    let override_receiver =
        derive_override_receiver(&packet.chan_id_on_b, &data.sender, &ctx.bech32_account_prefix());

    let mut extras = ModuleExtras::empty();

    if !flags.processed {
        let mut overridden = data.clone();
        overridden.receiver = override_receiver.clone();
        overridden.memo = "".into();
        let overridden_packet = Packet {
            data: overridden.to_bytes(),
            ..packet.clone()
        };

        let (recv_extras, ack) = ctx.on_recv_packet_execute(&overridden_packet, relayer);
        extras.merge(recv_extras);

        let ack = ack.ok_or(PacketForwardError::MissingAcknowledgement)?;
        match ack.status() {
            Some(status) if status.is_successful() => {}
            Some(status) => {
                return Err(PacketForwardError::ReceiveFailed {
                    description: status.to_string(),
                })
            }
            None => {
                return Err(PacketForwardError::ReceiveFailed {
                    description: "undecodable acknowledgement".to_string(),
                })
            }
        }
    }

    let denom = forwarded_denom(ctx, packet, &data, flags)?;
    let received_denom = denom.ibc_denom();

    let params = ctx.forward_params()?;
    let amount = data.token.amount;
    let protocol_fee = params
        .fee_percentage
        .checked_mul_amount(amount)
        .ok_or_else(|| PacketForwardError::AmountOverflow {
            denom: received_denom.clone(),
        })?;
    let forward_amount =
        amount
            .checked_sub(protocol_fee)
            .ok_or_else(|| PacketForwardError::InvalidAmount {
                amount: amount.to_string(),
            })?;

    let protocol_fee = if protocol_fee.is_zero() {
        None
    } else {
        let fee = RawCoin::new(received_denom.clone(), protocol_fee);
        let community_pool = ctx.community_pool_account();
        ctx.send_coins(&override_receiver, &community_pool, &fee)?;
        extras.events.push(
            FeeEvent {
                kind: "protocol",
                payer: override_receiver.clone(),
                recipient: community_pool,
                fee: fee.clone(),
            }
            .into(),
        );
        Some(fee)
    };

    let timeout = config.effective_timeout(metadata.timeout);
    let retries = config.effective_retries(metadata.retries);
    let timeout_timestamp = (ctx.host_timestamp()? + timeout)?;

    let mut msg = MsgTransfer {
        port_id_on_a: metadata.port.clone(),
        chan_id_on_a: metadata.channel.clone(),
        packet_data: PacketData {
            token: PrefixedCoin::new(denom, forward_amount),
            sender: override_receiver.clone(),
            receiver: metadata.receiver.clone(),
            memo: metadata.next_memo().into(),
        },
        timeout_height_on_b: TimeoutHeight::Never,
        timeout_timestamp_on_b: timeout_timestamp,
    };

    let bridge_fee = ctx
        .compute_bridge_fee(&mut msg)
        .map_err(bridge_fee_error)?
        .filter(|fee| !fee.fee.amount.is_zero());

    if let Some(fee) = &bridge_fee {
        ctx.send_coins(&fee.sender, &fee.receiver, &fee.fee)?;
        extras.events.push(
            FeeEvent {
                kind: "bridge",
                payer: fee.sender.clone(),
                recipient: fee.receiver.clone(),
                fee: fee.fee.clone(),
            }
            .into(),
        );

        if msg.packet_data.token.amount.is_zero() {
            info!(
                channel = %msg.chan_id_on_a,
                fee = %fee.fee,
                "bridge fee consumed the forwarded amount, nothing forwarded"
            );
            let ack = AcknowledgementStatus::success(ack_success_b64());
            return Ok((extras, Some(ack.into())));
        }
    }

    let forwarded_coin = RawCoin::new(received_denom.clone(), msg.packet_data.token.amount);
    let sequence = send_transfer(ctx, msg).map_err(forward_failed)?;

    let in_flight = InFlightPacket {
        original_sender_address: data.sender,
        refund_channel_id: packet.chan_id_on_b.clone(),
        refund_port_id: packet.port_id_on_b.clone(),
        packet_src_channel_id: packet.chan_id_on_a.clone(),
        packet_src_port_id: packet.port_id_on_a.clone(),
        packet_timeout_timestamp: packet.timeout_timestamp_on_b,
        packet_timeout_height: packet.timeout_height_on_b,
        packet_data: packet.data.clone(),
        refund_sequence: packet.seq_on_a,
        retries_remaining: retries,
        timeout,
        nonrefundable: flags.nonrefundable,
        protocol_fee,
        received_denom,
    };
    ctx.store_in_flight_packet(&metadata.channel, &metadata.port, sequence, in_flight)?;

    if let Some(fee) = &bridge_fee {
        ctx.set_sequence_fee(&metadata.port, &metadata.channel, sequence, &fee.fee)
            .map_err(bridge_fee_error)?;
    }

    debug!(
        %sequence,
        channel = %metadata.channel,
        receiver = %metadata.receiver,
        coin = %forwarded_coin,
        "forwarded packet"
    );

    extras.events.push(
        ForwardEvent {
            sender: override_receiver,
            receiver: metadata.receiver,
            channel: metadata.channel,
            sequence,
            coin: forwarded_coin,
        }
        .into(),
    );

    Ok((extras, None))
}

/// Denom the forwarded tokens are held in on this chain.
///
/// A parachain asset arriving over its registered channel has been converted
/// to its native denom, which is forwarded as is.
fn forwarded_denom<M>(
    ctx: &M,
    packet: &Packet,
    data: &PacketData,
    flags: ForwardFlags,
) -> Result<PrefixedDenom, PacketForwardError>
where
    M: PacketForwardExecutionContext,
{
    let parachain_token = ctx
        .parachain_token_by_asset_id(&data.token.denom.to_string())
        .map_err(parachain_error)?;

    match parachain_token {
        Some(info) if info.channel_id == packet.chan_id_on_b => {
            Ok(info.native_denom.parse()?)
        }
        _ if flags.disable_denom_composition => Ok(data.token.denom.clone()),
        _ => Ok(prefixed_denom_for_this_chain(
            &packet.port_id_on_b,
            &packet.chan_id_on_b,
            &packet.port_id_on_a,
            &packet.chan_id_on_a,
            &data.token.denom,
        )),
    }
}
