//! Implements the processing logic for ICS20 (token transfer) message.
mod on_recv_packet;
mod send_transfer;

pub use on_recv_packet::*;
pub use send_transfer::*;

use centauri_ibc_core::channel::Packet;
use centauri_ibc_core::host::identifiers::{ChannelId, PortId};
use centauri_ibc_core::primitives::Signer;
use centauri_transfer_types::error::TokenTransferError;
use centauri_transfer_types::is_sender_chain_source;
use centauri_transfer_types::packet::PacketData;
use centauri_transfer_types::RawCoin;

use crate::context::{TokenTransferExecutionContext, TokenTransferValidationContext};

/// Returns the tokens of a failed outbound packet to its sender: unescrows
/// what was escrowed, re-mints what was burned.
pub fn refund_packet_token_execute<Ctx: TokenTransferExecutionContext>(
    ctx_a: &mut Ctx,
    packet: &Packet,
    data: &PacketData,
) -> Result<(), TokenTransferError> {
    let coin = data.token.to_bank_coin();

    if is_sender_chain_source(&packet.port_id_on_a, &packet.chan_id_on_a, &data.token.denom) {
        release_escrow(
            ctx_a,
            &packet.port_id_on_a,
            &packet.chan_id_on_a,
            &data.sender,
            &coin,
        )
    } else {
        mint_vouchers(ctx_a, &data.sender, &coin)
    }
}

pub fn refund_packet_token_validate<Ctx: TokenTransferValidationContext>(
    ctx_a: &Ctx,
    packet: &Packet,
    data: &PacketData,
) -> Result<(), TokenTransferError> {
    let coin = data.token.to_bank_coin();

    if is_sender_chain_source(&packet.port_id_on_a, &packet.chan_id_on_a, &data.token.denom) {
        let escrow = ctx_a.escrow_account(&packet.port_id_on_a, &packet.chan_id_on_a);
        ctx_a.ensure_spendable(&escrow, &coin)
    } else {
        ctx_a.ensure_mintable(&coin)
    }
}

/// Pays `coin` out of the escrow of a local channel end.
fn release_escrow<Ctx: TokenTransferExecutionContext>(
    ctx: &mut Ctx,
    port_id: &PortId,
    channel_id: &ChannelId,
    to: &Signer,
    coin: &RawCoin,
) -> Result<(), TokenTransferError> {
    let escrow = ctx.escrow_account(port_id, channel_id);
    ctx.ensure_spendable(&escrow, coin)?;
    ctx.send_coins(&escrow, to, coin)
}

fn mint_vouchers<Ctx: TokenTransferExecutionContext>(
    ctx: &mut Ctx,
    to: &Signer,
    coin: &RawCoin,
) -> Result<(), TokenTransferError> {
    ctx.ensure_mintable(coin)?;
    ctx.mint_coins(to, coin)
}
