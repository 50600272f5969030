use centauri_ibc_core::channel::context::{SendPacketExecutionContext, SendPacketValidationContext};
use centauri_ibc_core::channel::handler::{send_packet_execute, send_packet_validate};
use centauri_ibc_core::channel::Packet;
use centauri_ibc_core::host::identifiers::Sequence;
use centauri_transfer_types::error::TokenTransferError;
use centauri_transfer_types::events::TransferEvent;
use centauri_transfer_types::is_sender_chain_source;
use centauri_transfer_types::msgs::MsgTransfer;
use tracing::debug;

use crate::context::{TokenTransferExecutionContext, TokenTransferValidationContext};

/// Initiate a token transfer. Equivalent to calling [`send_transfer_validate`],
/// followed by [`send_transfer_execute`].
///
/// Returns the sequence the packet was sent with.
pub fn send_transfer<Ctx>(ctx_a: &mut Ctx, msg: MsgTransfer) -> Result<Sequence, TokenTransferError>
where
    Ctx: SendPacketExecutionContext + TokenTransferExecutionContext,
{
    send_transfer_validate(ctx_a, &msg)?;
    send_transfer_execute(ctx_a, msg)
}

/// Builds the outbound packet for `msg` at the channel's next send sequence.
fn build_packet<Ctx>(ctx_a: &Ctx, msg: &MsgTransfer) -> Result<Packet, TokenTransferError>
where
    Ctx: SendPacketValidationContext,
{
    let (port_id_on_b, chan_id_on_b) = ctx_a
        .channel_counterparty(&msg.port_id_on_a, &msg.chan_id_on_a)
        .map_err(|_| TokenTransferError::DestinationChannelNotFound {
            port_id: msg.port_id_on_a.clone(),
            channel_id: msg.chan_id_on_a.clone(),
        })?;

    let sequence = ctx_a.get_next_sequence_send(&msg.port_id_on_a, &msg.chan_id_on_a)?;

    Ok(Packet {
        seq_on_a: sequence,
        port_id_on_a: msg.port_id_on_a.clone(),
        chan_id_on_a: msg.chan_id_on_a.clone(),
        port_id_on_b,
        chan_id_on_b,
        data: msg.packet_data.to_bytes(),
        timeout_height_on_b: msg.timeout_height_on_b,
        timeout_timestamp_on_b: msg.timeout_timestamp_on_b,
    })
}

/// Validates the token transfer. If this succeeds, then it is legal to
/// initiate the transfer with [`send_transfer_execute`].
pub fn send_transfer_validate<Ctx>(ctx_a: &Ctx, msg: &MsgTransfer) -> Result<(), TokenTransferError>
where
    Ctx: SendPacketValidationContext + TokenTransferValidationContext,
{
    msg.validate_basic()?;

    // escrowing and burning both take the tokens from the sender
    let coin = msg.packet_data.token.to_bank_coin();
    ctx_a.ensure_spendable(&msg.packet_data.sender, &coin)?;

    let packet = build_packet(ctx_a, msg)?;
    send_packet_validate(ctx_a, &packet)?;

    Ok(())
}

/// Executes the token transfer. A prior call to [`send_transfer_validate`] MUST have succeeded.
pub fn send_transfer_execute<Ctx>(
    ctx_a: &mut Ctx,
    msg: MsgTransfer,
) -> Result<Sequence, TokenTransferError>
where
    Ctx: SendPacketExecutionContext + TokenTransferExecutionContext,
{
    let packet = build_packet(ctx_a, &msg)?;
    let sequence = packet.seq_on_a;

    let token = &msg.packet_data.token;
    let sender = &msg.packet_data.sender;
    let coin = token.to_bank_coin();

    if is_sender_chain_source(&msg.port_id_on_a, &msg.chan_id_on_a, &token.denom) {
        let escrow = ctx_a.escrow_account(&msg.port_id_on_a, &msg.chan_id_on_a);
        ctx_a.send_coins(sender, &escrow, &coin)?;
    } else {
        ctx_a.burn_coins(sender, &coin)?;
    }

    send_packet_execute(ctx_a, packet)?;

    debug!(
        sequence = %sequence,
        channel = %msg.chan_id_on_a,
        token = %token,
        "sent fungible token transfer"
    );

    ctx_a.log_message(format!(
        "IBC fungible token transfer: {} --({})--> {}",
        msg.packet_data.sender, token, msg.packet_data.receiver
    ))?;

    ctx_a.emit_ibc_event(TransferEvent(msg.packet_data).into())?;

    Ok(sequence)
}
