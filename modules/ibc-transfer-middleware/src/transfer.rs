//! Outbound transfers that pay the channel bridge fee first.

use core::cmp::min;

use centauri_ibc_core::channel::context::SendPacketExecutionContext;
use centauri_ibc_core::channel::Packet;
use centauri_ibc_core::host::identifiers::Sequence;
use centauri_ibc_core::primitives::Signer;
use centauri_store::Store;
use centauri_transfer::bank::BankKeeper;
use centauri_transfer::context::TokenTransferExecutionContext;
use centauri_transfer::handler::send_transfer;
use centauri_transfer_types::error::TokenTransferError;
use centauri_transfer_types::msgs::MsgTransfer;
use centauri_transfer_types::packet::PacketData;
use centauri_transfer_types::RawCoin;
use tracing::{debug, info, warn};

use crate::error::FeeError;
use crate::keeper::FeeKeeper;

/// Sends `msg` after charging the bridge fee of its source channel.
///
/// The fee moves from the sender to the channel fee address and the packet
/// carries what is left. When the fee consumes the whole amount nothing is
/// sent and `None` is returned. Otherwise the fee is recorded against the
/// packet sequence so it can be returned should the packet fail.
pub fn transfer_with_bridge_fee<Ctx, S>(
    ctx: &mut Ctx,
    keeper: &mut FeeKeeper<S>,
    mut msg: MsgTransfer,
) -> Result<Option<Sequence>, FeeError>
where
    Ctx: SendPacketExecutionContext + TokenTransferExecutionContext,
    S: Store,
{
    let now = ctx.host_timestamp().map_err(TokenTransferError::from)?;

    let Some(bridge_fee) = keeper.compute_bridge_fee(&mut msg, now)? else {
        return Ok(Some(send_transfer(ctx, msg)?));
    };

    if !bridge_fee.fee.amount.is_zero() {
        ctx.send_coins(&bridge_fee.sender, &bridge_fee.receiver, &bridge_fee.fee)?;
    }

    if msg.packet_data.token.amount.is_zero() {
        info!(
            channel = %msg.chan_id_on_a,
            fee = %bridge_fee.fee,
            "bridge fee consumed the whole transfer, nothing sent"
        );
        return Ok(None);
    }

    let (port_id, channel_id) = (msg.port_id_on_a.clone(), msg.chan_id_on_a.clone());
    let sequence = send_transfer(ctx, msg)?;
    keeper.set_sequence_fee(&port_id, &channel_id, sequence, &bridge_fee.fee)?;
    debug!(%sequence, fee = %bridge_fee.fee, "recorded bridge fee");

    Ok(Some(sequence))
}

/// Closes the bridge fee record of an outbound packet once it is
/// acknowledged or has timed out.
///
/// A delivered packet has earned its fee. Otherwise the fee goes back from
/// the channel fee address to the packet sender, as far as that account can
/// still pay. Returns what was returned.
pub fn settle_bridge_fee<B, S>(
    bank: &mut B,
    keeper: &mut FeeKeeper<S>,
    packet: &Packet,
    delivered: bool,
) -> Result<Option<RawCoin>, FeeError>
where
    B: BankKeeper,
    S: Store,
{
    let Some(fee) =
        keeper.take_sequence_fee(&packet.port_id_on_a, &packet.chan_id_on_a, packet.seq_on_a)?
    else {
        return Ok(None);
    };
    if delivered {
        debug!(sequence = %packet.seq_on_a, %fee, "bridge fee earned");
        return Ok(None);
    }

    let Some(fee_address) = keeper.channel_fee_address(&packet.chan_id_on_a)? else {
        warn!(channel = %packet.chan_id_on_a, %fee, "channel has no fee address anymore, bridge fee kept");
        return Ok(None);
    };
    let sender = PacketData::from_bytes(&packet.data)?.sender;

    Ok(return_fee(bank, &fee_address, &sender, &fee))
}

/// Moves `fee` from `payer` back to `recipient`, or as much of it as `payer`
/// holds. A shortfall is logged and never an error.
pub fn return_fee<B: BankKeeper>(
    bank: &mut B,
    payer: &Signer,
    recipient: &Signer,
    fee: &RawCoin,
) -> Option<RawCoin> {
    let held = bank.balance(payer, &fee.denom);
    let returned = RawCoin::new(fee.denom.clone(), min(held, fee.amount));
    if returned.amount < fee.amount {
        warn!(%payer, %fee, %returned, "fee payer cannot return the whole fee");
    }
    if returned.amount.is_zero() {
        return None;
    }

    match bank.send_coins(payer, recipient, &returned) {
        Ok(()) => {
            debug!(%payer, %recipient, fee = %returned, "returned fee");
            Some(returned)
        }
        Err(err) => {
            warn!(%payer, fee = %returned, %err, "returning fee failed");
            None
        }
    }
}
