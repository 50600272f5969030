use core::fmt::Debug;

use super::event::ModuleEvent;
use crate::channel::{Acknowledgement, Packet, PacketError};
use crate::primitives::Signer;

/// What a callback leaves behind besides its result: events for the block
/// and log lines for the transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModuleExtras {
    pub events: Vec<ModuleEvent>,
    pub log: Vec<String>,
}

impl ModuleExtras {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Folds in what a wrapped module produced.
    pub fn merge(&mut self, inner: ModuleExtras) {
        let ModuleExtras { events, log } = inner;
        self.events.extend(events);
        self.log.extend(log);
    }
}

/// An application, or middleware wrapping one, bound to a port. The host
/// calls `*_validate` before `*_execute` and discards state changes when
/// validation fails.
pub trait Module: Debug {
    /// `None` means the acknowledgement is written later, through
    /// [`WriteAckContext`](crate::channel::context::WriteAckContext).
    fn on_recv_packet_execute(
        &mut self,
        packet: &Packet,
        relayer: &Signer,
    ) -> (ModuleExtras, Option<Acknowledgement>);

    fn on_acknowledgement_packet_validate(
        &self,
        _packet: &Packet,
        _acknowledgement: &Acknowledgement,
        _relayer: &Signer,
    ) -> Result<(), PacketError> {
        Ok(())
    }

    fn on_acknowledgement_packet_execute(
        &mut self,
        packet: &Packet,
        acknowledgement: &Acknowledgement,
        relayer: &Signer,
    ) -> (ModuleExtras, Result<(), PacketError>);

    fn on_timeout_packet_validate(
        &self,
        _packet: &Packet,
        _relayer: &Signer,
    ) -> Result<(), PacketError> {
        Ok(())
    }

    fn on_timeout_packet_execute(
        &mut self,
        packet: &Packet,
        relayer: &Signer,
    ) -> (ModuleExtras, Result<(), PacketError>);
}
