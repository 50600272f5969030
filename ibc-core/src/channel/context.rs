//! Host-side contexts an application needs from the channel layer.

use super::acknowledgement::Acknowledgement;
use super::error::{ChannelError, PacketError};
use super::packet::Packet;
use crate::host::identifiers::{ChannelId, PortId, Sequence};
use crate::primitives::Timestamp;
use crate::router::ModuleEvent;

/// Read access to the channel state needed before a packet is sent.
pub trait SendPacketValidationContext {
    /// Returns the counterparty `(port, channel)` of an open channel end.
    fn channel_counterparty(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<(PortId, ChannelId), ChannelError>;

    /// Returns the next send sequence of the given channel end.
    fn get_next_sequence_send(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Sequence, ChannelError>;

    /// Returns the current timestamp of the local chain.
    fn host_timestamp(&self) -> Result<Timestamp, ChannelError>;
}

/// Write access to the channel state for sending a packet.
pub trait SendPacketExecutionContext: SendPacketValidationContext {
    /// Stores the packet commitment and advances the channel's next send
    /// sequence.
    fn store_packet(&mut self, packet: Packet) -> Result<(), ChannelError>;

    /// Called upon successful packet dispatch.
    fn emit_ibc_event(&mut self, event: ModuleEvent) -> Result<(), ChannelError>;

    /// Logging facility
    fn log_message(&mut self, message: String) -> Result<(), ChannelError>;
}

/// Writes the acknowledgement of a packet received earlier whose
/// acknowledgement was deferred at receive time.
pub trait WriteAckContext {
    fn write_acknowledgement(
        &mut self,
        packet: &Packet,
        acknowledgement: Acknowledgement,
    ) -> Result<(), PacketError>;
}
