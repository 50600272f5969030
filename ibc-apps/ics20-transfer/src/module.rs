//! ICS-20 packet callbacks. A host binds these to the transfer port,
//! usually behind middleware.

use centauri_ibc_core::channel::{Acknowledgement, AcknowledgementStatus, Packet};
use centauri_ibc_core::primitives::Signer;
use centauri_ibc_core::router::ModuleExtras;
use centauri_transfer_types::ack_success_b64;
use centauri_transfer_types::error::TokenTransferError;
use centauri_transfer_types::events::{PacketEvent, PacketOutcome};
use centauri_transfer_types::packet::PacketData;

use crate::context::{TokenTransferExecutionContext, TokenTransferValidationContext};
use crate::handler::{
    process_recv_packet_execute, refund_packet_token_execute, refund_packet_token_validate,
};

/// Receives a transfer packet and always produces an acknowledgement:
/// success once the tokens are credited, error otherwise.
pub fn on_recv_packet_execute(
    ctx_b: &mut impl TokenTransferExecutionContext,
    packet: &Packet,
) -> (ModuleExtras, Acknowledgement) {
    let Ok(data) = PacketData::from_bytes(&packet.data) else {
        let ack =
            AcknowledgementStatus::error(TokenTransferError::PacketDataDeserialization.into());
        return (ModuleExtras::empty(), ack.into());
    };

    let (mut extras, ack) = match process_recv_packet_execute(ctx_b, packet, data.clone()) {
        Ok(extras) => (extras, AcknowledgementStatus::success(ack_success_b64())),
        Err((extras, error)) => (extras, AcknowledgementStatus::error(error.into())),
    };

    let outcome = PacketOutcome::Received {
        success: ack.is_successful(),
    };
    extras
        .events
        .extend(PacketEvent::new(data, outcome).into_module_events());

    (extras, ack.into())
}

pub fn on_acknowledgement_packet_validate(
    ctx: &impl TokenTransferValidationContext,
    packet: &Packet,
    acknowledgement: &Acknowledgement,
    _relayer: &Signer,
) -> Result<(), TokenTransferError> {
    let data = PacketData::from_bytes(&packet.data)?;
    let status = acknowledgement
        .status()
        .ok_or(TokenTransferError::AckDeserialization)?;

    if status.is_successful() {
        return Ok(());
    }
    refund_packet_token_validate(ctx, packet, &data)
}

/// Refunds the sender when the counterparty acknowledged with an error.
pub fn on_acknowledgement_packet_execute(
    ctx: &mut impl TokenTransferExecutionContext,
    packet: &Packet,
    acknowledgement: &Acknowledgement,
    _relayer: &Signer,
) -> (ModuleExtras, Result<(), TokenTransferError>) {
    let status = acknowledgement
        .status()
        .ok_or(TokenTransferError::AckDeserialization);
    let result = status.and_then(|status| {
        settle(ctx, packet, PacketOutcome::Acknowledged(status))
    });
    into_callback_result(result)
}

pub fn on_timeout_packet_validate(
    ctx: &impl TokenTransferValidationContext,
    packet: &Packet,
    _relayer: &Signer,
) -> Result<(), TokenTransferError> {
    let data = PacketData::from_bytes(&packet.data)?;
    refund_packet_token_validate(ctx, packet, &data)
}

/// Refunds the sender of a packet that timed out.
pub fn on_timeout_packet_execute(
    ctx: &mut impl TokenTransferExecutionContext,
    packet: &Packet,
    _relayer: &Signer,
) -> (ModuleExtras, Result<(), TokenTransferError>) {
    into_callback_result(settle(ctx, packet, PacketOutcome::TimedOut))
}

/// Closes an outbound packet: the sender is refunded unless the
/// counterparty acknowledged success.
fn settle(
    ctx: &mut impl TokenTransferExecutionContext,
    packet: &Packet,
    outcome: PacketOutcome,
) -> Result<ModuleExtras, TokenTransferError> {
    let data = PacketData::from_bytes(&packet.data)?;

    let delivered =
        matches!(&outcome, PacketOutcome::Acknowledged(status) if status.is_successful());
    if !delivered {
        refund_packet_token_execute(ctx, packet, &data)?;
    }

    Ok(ModuleExtras {
        events: PacketEvent::new(data, outcome).into_module_events(),
        log: Vec::new(),
    })
}

fn into_callback_result(
    result: Result<ModuleExtras, TokenTransferError>,
) -> (ModuleExtras, Result<(), TokenTransferError>) {
    match result {
        Ok(extras) => (extras, Ok(())),
        Err(err) => (ModuleExtras::empty(), Err(err)),
    }
}
