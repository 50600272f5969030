//! The middleware itself: an ICS-26 module wrapping the transfer stack.

use centauri_ibc_core::channel::{Acknowledgement, Packet, PacketError};
use centauri_ibc_core::primitives::Signer;
use centauri_ibc_core::router::{Module, ModuleExtras};
use centauri_packet_forward_types::config::ForwardConfig;

use crate::context::PacketForwardExecutionContext;
use crate::handler;

/// How a received packet reached the middleware, as set by outer middleware.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ForwardFlags {
    /// The wrapped application already credited the override receiver.
    pub processed: bool,
    /// A failed forward must not be refunded to the source chain.
    pub nonrefundable: bool,
    /// Forward the packet denom as is instead of its denom on this chain.
    pub disable_denom_composition: bool,
}

/// Forwards ICS-20 transfers whose memo asks for it, delegating everything
/// else to `next`.
///
/// `next` is the wrapped transfer stack and, as the host's handle to its
/// state, also provides the forwarding contexts.
#[derive(Debug)]
pub struct PacketForwardMiddleware<M> {
    next: M,
    config: ForwardConfig,
}

impl<M> PacketForwardMiddleware<M> {
    pub fn new(next: M, config: ForwardConfig) -> Self {
        Self { next, config }
    }

    /// Wraps `next` with the default configuration.
    pub fn wrap(next: M) -> Self {
        Self::new(next, ForwardConfig::default())
    }

    pub fn config(&self) -> &ForwardConfig {
        &self.config
    }

    pub fn next(&self) -> &M {
        &self.next
    }

    pub fn next_mut(&mut self) -> &mut M {
        &mut self.next
    }

    pub fn into_inner(self) -> M {
        self.next
    }
}

impl<M> PacketForwardMiddleware<M>
where
    M: Module + PacketForwardExecutionContext,
{
    /// Receives a packet with explicit flags. [`Module::on_recv_packet_execute`]
    /// uses the default ones.
    pub fn on_recv_packet_with_flags(
        &mut self,
        packet: &Packet,
        relayer: &Signer,
        flags: ForwardFlags,
    ) -> (ModuleExtras, Option<Acknowledgement>) {
        handler::on_recv_packet_execute(&mut self.next, &self.config, packet, relayer, flags)
    }
}

impl<M> Module for PacketForwardMiddleware<M>
where
    M: Module + PacketForwardExecutionContext,
{
    fn on_recv_packet_execute(
        &mut self,
        packet: &Packet,
        relayer: &Signer,
    ) -> (ModuleExtras, Option<Acknowledgement>) {
        self.on_recv_packet_with_flags(packet, relayer, ForwardFlags::default())
    }

    fn on_acknowledgement_packet_validate(
        &self,
        packet: &Packet,
        acknowledgement: &Acknowledgement,
        relayer: &Signer,
    ) -> Result<(), PacketError> {
        self.next
            .on_acknowledgement_packet_validate(packet, acknowledgement, relayer)
    }

    fn on_acknowledgement_packet_execute(
        &mut self,
        packet: &Packet,
        acknowledgement: &Acknowledgement,
        relayer: &Signer,
    ) -> (ModuleExtras, Result<(), PacketError>) {
        handler::on_acknowledgement_packet_execute(&mut self.next, packet, acknowledgement, relayer)
    }

    fn on_timeout_packet_validate(
        &self,
        packet: &Packet,
        relayer: &Signer,
    ) -> Result<(), PacketError> {
        self.next.on_timeout_packet_validate(packet, relayer)
    }

    fn on_timeout_packet_execute(
        &mut self,
        packet: &Packet,
        relayer: &Signer,
    ) -> (ModuleExtras, Result<(), PacketError>) {
        handler::on_timeout_packet_execute(&mut self.next, packet, relayer)
    }
}
