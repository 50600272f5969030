//! Send-packet handler used by applications after they have moved funds.

use super::context::{SendPacketExecutionContext, SendPacketValidationContext};
use super::error::ChannelError;
use super::packet::Packet;
use crate::router::ModuleEvent;

/// Validates and dispatches an outbound packet.
pub fn send_packet(
    ctx_a: &mut impl SendPacketExecutionContext,
    packet: Packet,
) -> Result<(), ChannelError> {
    send_packet_validate(ctx_a, &packet)?;
    send_packet_execute(ctx_a, packet)
}

/// Validation step of the send-packet handler.
pub fn send_packet_validate(
    ctx_a: &impl SendPacketValidationContext,
    packet: &Packet,
) -> Result<(), ChannelError> {
    let (port_id_on_b, chan_id_on_b) =
        ctx_a.channel_counterparty(&packet.port_id_on_a, &packet.chan_id_on_a)?;

    if port_id_on_b != packet.port_id_on_b || chan_id_on_b != packet.chan_id_on_b {
        return Err(ChannelError::MismatchedCounterparty {
            expected: format!("{port_id_on_b}/{chan_id_on_b}"),
            actual: format!("{}/{}", packet.port_id_on_b, packet.chan_id_on_b),
        });
    }

    if !packet.timeout_height_on_b.is_set() && !packet.timeout_timestamp_on_b.is_set() {
        return Err(ChannelError::MissingTimeout);
    }

    let host_timestamp = ctx_a.host_timestamp()?;
    if packet.timeout_timestamp_on_b.has_expired(&host_timestamp) {
        return Err(ChannelError::ExpiredPacketTimestamp {
            timeout_timestamp: packet.timeout_timestamp_on_b,
            host_timestamp,
        });
    }

    let next_seq_send_on_a =
        ctx_a.get_next_sequence_send(&packet.port_id_on_a, &packet.chan_id_on_a)?;
    if packet.seq_on_a != next_seq_send_on_a {
        return Err(ChannelError::MismatchedPacketSequence {
            given_sequence: packet.seq_on_a,
            next_sequence: next_seq_send_on_a,
        });
    }

    Ok(())
}

/// Execution step of the send-packet handler.
pub fn send_packet_execute(
    ctx_a: &mut impl SendPacketExecutionContext,
    packet: Packet,
) -> Result<(), ChannelError> {
    let event = ModuleEvent {
        kind: "send_packet".to_string(),
        attributes: vec![
            ("packet_sequence", packet.seq_on_a).into(),
            ("packet_src_port", &packet.port_id_on_a).into(),
            ("packet_src_channel", &packet.chan_id_on_a).into(),
            ("packet_dst_port", &packet.port_id_on_b).into(),
            ("packet_dst_channel", &packet.chan_id_on_b).into(),
            (
                "packet_timeout_timestamp",
                packet.timeout_timestamp_on_b.nanoseconds(),
            )
                .into(),
        ],
    };

    ctx_a.log_message(format!("success: packet send; {packet}"))?;
    ctx_a.store_packet(packet)?;
    ctx_a.emit_ibc_event(event)?;

    Ok(())
}
