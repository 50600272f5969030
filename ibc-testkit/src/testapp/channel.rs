use centauri_ibc_core::channel::context::{
    SendPacketExecutionContext, SendPacketValidationContext, WriteAckContext,
};
use centauri_ibc_core::channel::{Acknowledgement, ChannelError, Packet, PacketError};
use centauri_ibc_core::host::identifiers::{ChannelId, PortId, Sequence};
use centauri_ibc_core::primitives::Timestamp;
use centauri_ibc_core::router::ModuleEvent;
use tracing::trace;

use crate::context::MockChain;

impl SendPacketValidationContext for MockChain {
    fn channel_counterparty(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<(PortId, ChannelId), ChannelError> {
        self.state
            .channels
            .get(&(port_id.clone(), channel_id.clone()))
            .cloned()
            .ok_or_else(|| ChannelError::MissingChannel {
                port_id: port_id.clone(),
                channel_id: channel_id.clone(),
            })
    }

    fn get_next_sequence_send(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Sequence, ChannelError> {
        self.channel_counterparty(port_id, channel_id)?;
        Ok(self
            .state
            .next_sequence_send
            .get(&(port_id.clone(), channel_id.clone()))
            .copied()
            .unwrap_or_else(|| Sequence::from(1)))
    }

    fn host_timestamp(&self) -> Result<Timestamp, ChannelError> {
        Ok(self.timestamp)
    }
}

impl SendPacketExecutionContext for MockChain {
    fn store_packet(&mut self, packet: Packet) -> Result<(), ChannelError> {
        let end = (packet.port_id_on_a.clone(), packet.chan_id_on_a.clone());
        self.state
            .next_sequence_send
            .insert(end.clone(), packet.seq_on_a.increment());
        self.state
            .commitments
            .insert((end.0, end.1, packet.seq_on_a), packet.clone());
        trace!(chain = %self.chain_id, %packet, "stored packet commitment");
        self.state.outbox.push(packet);
        Ok(())
    }

    fn emit_ibc_event(&mut self, event: ModuleEvent) -> Result<(), ChannelError> {
        self.state.events.push(event);
        Ok(())
    }

    fn log_message(&mut self, message: String) -> Result<(), ChannelError> {
        self.state.logs.push(message);
        Ok(())
    }
}

impl WriteAckContext for MockChain {
    fn write_acknowledgement(
        &mut self,
        packet: &Packet,
        acknowledgement: Acknowledgement,
    ) -> Result<(), PacketError> {
        let key = (
            packet.port_id_on_b.clone(),
            packet.chan_id_on_b.clone(),
            packet.seq_on_a,
        );
        if self.state.acknowledgements.contains_key(&key) {
            return Err(PacketError::DuplicateAcknowledgement {
                sequence: packet.seq_on_a,
            });
        }
        self.state
            .acknowledgements
            .insert(key, acknowledgement.clone());
        trace!(chain = %self.chain_id, %packet, "wrote acknowledgement");
        self.state
            .ack_outbox
            .push((packet.clone(), acknowledgement));
        Ok(())
    }
}
