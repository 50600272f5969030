//! A coordinator owning a set of mock chains and relaying packets,
//! acknowledgements and timeouts between them.

pub mod error;

use core::time::Duration;
use std::collections::BTreeMap;

use centauri_ibc_core::channel::context::WriteAckContext;
use centauri_ibc_core::channel::{Acknowledgement, Packet};
use centauri_ibc_core::host::identifiers::{ChannelId, PortId, Sequence};
use centauri_ibc_core::primitives::Signer;
use centauri_ibc_core::router::Module;
use centauri_ibc_transfer_middleware::transfer::transfer_with_bridge_fee;
use centauri_packet_forward::types::config::ForwardConfig;
use centauri_packet_forward::{ForwardFlags, PacketForwardMiddleware};
use centauri_transfer::handler::send_transfer;
use centauri_transfer_types::msgs::MsgTransfer;
use tracing::{debug, info};

pub use self::error::RelayerError;
use crate::context::MockChain;
use crate::testapp::MockTransferStack;

/// Relay rounds after which [`Coordinator::relay_all`] gives up.
pub const MAX_RELAY_ROUNDS: usize = 32;

/// What happened to a packet during relaying.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelayEvent {
    /// `chain` received `packet`. The acknowledgement is `None` while the
    /// packet waits on a forward.
    Received {
        chain: String,
        packet: Packet,
        acknowledgement: Option<Acknowledgement>,
    },
    /// `chain`, the sender of `packet`, processed its acknowledgement.
    Acknowledged {
        chain: String,
        packet: Packet,
        acknowledgement: Acknowledgement,
    },
    /// `chain`, the sender of `packet`, processed its timeout.
    TimedOut { chain: String, packet: Packet },
}

/// Mock chains linked by transfer channels, each running the packet forward
/// middleware over its transfer application.
///
/// Every call is one transaction on the chain it touches: it commits when
/// it succeeds and is discarded otherwise.
#[derive(Debug)]
pub struct Coordinator {
    chains: BTreeMap<String, MockTransferStack>,
    /// Counterparty `(chain, channel)` of every channel end.
    links: BTreeMap<(String, ChannelId), (String, ChannelId)>,
    flags: BTreeMap<String, ForwardFlags>,
    relayer: Signer,
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl Coordinator {
    pub fn new() -> Self {
        Self {
            chains: BTreeMap::new(),
            links: BTreeMap::new(),
            flags: BTreeMap::new(),
            relayer: Signer::from("relayer"),
        }
    }

    /// Adds `chain` with the default forward configuration.
    pub fn add_chain(&mut self, chain: MockChain) {
        self.add_chain_with_config(chain, ForwardConfig::default());
    }

    pub fn add_chain_with_config(&mut self, chain: MockChain, config: ForwardConfig) {
        let chain_id = chain.chain_id().to_string();
        self.chains
            .insert(chain_id, PacketForwardMiddleware::new(chain, config));
    }

    pub fn chain(&self, chain_id: &str) -> Result<&MockChain, RelayerError> {
        self.stack(chain_id).map(PacketForwardMiddleware::next)
    }

    pub fn chain_mut(&mut self, chain_id: &str) -> Result<&mut MockChain, RelayerError> {
        self.stack_mut(chain_id)
            .map(PacketForwardMiddleware::next_mut)
    }

    fn stack(&self, chain_id: &str) -> Result<&MockTransferStack, RelayerError> {
        self.chains
            .get(chain_id)
            .ok_or_else(|| RelayerError::UnknownChain {
                chain_id: chain_id.to_string(),
            })
    }

    fn stack_mut(&mut self, chain_id: &str) -> Result<&mut MockTransferStack, RelayerError> {
        self.chains
            .get_mut(chain_id)
            .ok_or_else(|| RelayerError::UnknownChain {
                chain_id: chain_id.to_string(),
            })
    }

    /// Flags `chain_id` receives packets with, as outer middleware would
    /// set them.
    pub fn set_recv_flags(&mut self, chain_id: &str, flags: ForwardFlags) {
        self.flags.insert(chain_id.to_string(), flags);
    }

    /// Opens a transfer channel between `chain_a` and `chain_b` and returns
    /// its channel ids on both.
    pub fn connect(
        &mut self,
        chain_a: &str,
        chain_b: &str,
    ) -> Result<(ChannelId, ChannelId), RelayerError> {
        let chan_a = self.chain_mut(chain_a)?.reserve_channel();
        let chan_b = self.chain_mut(chain_b)?.reserve_channel();

        let a = self.chain_mut(chain_a)?;
        a.open_channel(PortId::transfer(), chan_a.clone(), (PortId::transfer(), chan_b.clone()));
        a.commit()?;
        let b = self.chain_mut(chain_b)?;
        b.open_channel(PortId::transfer(), chan_b.clone(), (PortId::transfer(), chan_a.clone()));
        b.commit()?;

        self.links.insert(
            (chain_a.to_string(), chan_a.clone()),
            (chain_b.to_string(), chan_b.clone()),
        );
        self.links.insert(
            (chain_b.to_string(), chan_b.clone()),
            (chain_a.to_string(), chan_a.clone()),
        );
        info!(%chain_a, %chan_a, %chain_b, %chan_b, "connected chains");
        Ok((chan_a, chan_b))
    }

    fn counterparty(
        &self,
        chain_id: &str,
        channel_id: &ChannelId,
    ) -> Result<(String, ChannelId), RelayerError> {
        self.links
            .get(&(chain_id.to_string(), channel_id.clone()))
            .cloned()
            .ok_or_else(|| RelayerError::UnknownChannel {
                chain_id: chain_id.to_string(),
                channel_id: channel_id.clone(),
            })
    }

    /// Submits a plain ICS-20 transfer on `chain_id`.
    pub fn send_transfer(
        &mut self,
        chain_id: &str,
        msg: MsgTransfer,
    ) -> Result<Sequence, RelayerError> {
        let chain = self.chain_mut(chain_id)?;
        match send_transfer(chain, msg) {
            Ok(sequence) => {
                chain.commit()?;
                Ok(sequence)
            }
            Err(err) => {
                chain.discard();
                Err(err.into())
            }
        }
    }

    /// Submits a transfer that pays the bridge fee of its channel first.
    ///
    /// `None` when the fee took the whole amount and nothing was sent.
    pub fn send_transfer_with_fee(
        &mut self,
        chain_id: &str,
        msg: MsgTransfer,
    ) -> Result<Option<Sequence>, RelayerError> {
        let chain = self.chain_mut(chain_id)?;
        // clones share the module store
        let mut fees = chain.fee_keeper().clone();
        match transfer_with_bridge_fee(chain, &mut fees, msg) {
            Ok(sequence) => {
                chain.commit()?;
                Ok(sequence)
            }
            Err(err) => {
                chain.discard();
                Err(err.into())
            }
        }
    }

    /// Moves every chain's clock forward by `duration`.
    pub fn advance_time(&mut self, duration: Duration) {
        for stack in self.chains.values_mut() {
            stack.next_mut().advance_time(duration);
        }
    }

    /// Runs the begin blocker of `chain_id`.
    pub fn begin_block(&mut self, chain_id: &str) -> Result<Vec<String>, RelayerError> {
        Ok(self.chain_mut(chain_id)?.begin_block()?)
    }

    /// Delivers the packets and acknowledgements `chain_id` has emitted
    /// since the last relay.
    pub fn relay_from(&mut self, chain_id: &str) -> Result<Vec<RelayEvent>, RelayerError> {
        let chain = self.chain_mut(chain_id)?;
        let packets = chain.take_outbox();
        let acknowledgements = chain.take_ack_outbox();

        let mut events = Vec::with_capacity(packets.len() + acknowledgements.len());
        for packet in packets {
            let (destination, _) = self.counterparty(chain_id, &packet.chan_id_on_a)?;
            events.push(self.deliver_packet(chain_id, &destination, packet)?);
        }
        for (packet, acknowledgement) in acknowledgements {
            let (origin, _) = self.counterparty(chain_id, &packet.chan_id_on_b)?;
            events.push(self.deliver_acknowledgement(&origin, packet, acknowledgement)?);
        }
        Ok(events)
    }

    /// Relays until no chain has anything left to deliver.
    pub fn relay_all(&mut self) -> Result<Vec<RelayEvent>, RelayerError> {
        let mut events = Vec::new();
        for _ in 0..MAX_RELAY_ROUNDS {
            let pending: Vec<String> = self
                .chains
                .iter()
                .filter(|(_, stack)| stack.next().has_outbound())
                .map(|(chain_id, _)| chain_id.clone())
                .collect();
            if pending.is_empty() {
                return Ok(events);
            }
            for chain_id in pending {
                events.extend(self.relay_from(&chain_id)?);
            }
        }
        Err(RelayerError::NotSettled {
            rounds: MAX_RELAY_ROUNDS,
        })
    }

    fn deliver_packet(
        &mut self,
        source: &str,
        destination: &str,
        packet: Packet,
    ) -> Result<RelayEvent, RelayerError> {
        let dst = self.chain(destination)?;
        if packet.timed_out(&dst.now(), dst.height()) {
            debug!(%source, %destination, %packet, "packet timed out");
            return self.deliver_timeout(source, packet);
        }

        let flags = self.flags.get(destination).copied().unwrap_or_default();
        let relayer = self.relayer.clone();
        let stack = self.stack_mut(destination)?;
        if !stack.next_mut().record_receipt(&packet) {
            return Err(RelayerError::DuplicatePacket {
                chain_id: destination.to_string(),
                packet,
            });
        }

        let (extras, acknowledgement) = stack.on_recv_packet_with_flags(&packet, &relayer, flags);
        let chain = stack.next_mut();
        match &acknowledgement {
            // a failed receive keeps nothing but its receipt and error ack
            Some(ack) if !ack.is_successful() => {
                chain.discard();
                chain.record_receipt(&packet);
                chain.write_acknowledgement(&packet, ack.clone())?;
            }
            Some(ack) => {
                chain.record_events(extras.events);
                chain.write_acknowledgement(&packet, ack.clone())?;
            }
            None => chain.record_events(extras.events),
        }
        chain.commit()?;

        debug!(%destination, %packet, "received packet");
        Ok(RelayEvent::Received {
            chain: destination.to_string(),
            packet,
            acknowledgement,
        })
    }

    fn deliver_acknowledgement(
        &mut self,
        origin: &str,
        packet: Packet,
        acknowledgement: Acknowledgement,
    ) -> Result<RelayEvent, RelayerError> {
        let relayer = self.relayer.clone();
        let stack = self.stack_mut(origin)?;
        if !stack.next().has_commitment(&packet) {
            return Err(RelayerError::MissingCommitment {
                chain_id: origin.to_string(),
                packet,
            });
        }

        stack.on_acknowledgement_packet_validate(&packet, &acknowledgement, &relayer)?;
        let (extras, result) =
            stack.on_acknowledgement_packet_execute(&packet, &acknowledgement, &relayer);
        let chain = stack.next_mut();
        if let Err(err) = result {
            chain.discard();
            return Err(err.into());
        }
        chain.record_events(extras.events);
        chain.delete_commitment(&packet);
        chain.commit()?;

        debug!(%origin, %packet, "acknowledged packet");
        Ok(RelayEvent::Acknowledged {
            chain: origin.to_string(),
            packet,
            acknowledgement,
        })
    }

    fn deliver_timeout(&mut self, origin: &str, packet: Packet) -> Result<RelayEvent, RelayerError> {
        let relayer = self.relayer.clone();
        let stack = self.stack_mut(origin)?;
        if !stack.next().has_commitment(&packet) {
            return Err(RelayerError::MissingCommitment {
                chain_id: origin.to_string(),
                packet,
            });
        }

        stack.on_timeout_packet_validate(&packet, &relayer)?;
        let (extras, result) = stack.on_timeout_packet_execute(&packet, &relayer);
        let chain = stack.next_mut();
        if let Err(err) = result {
            chain.discard();
            return Err(err.into());
        }
        chain.record_events(extras.events);
        chain.delete_commitment(&packet);
        chain.commit()?;

        Ok(RelayEvent::TimedOut {
            chain: origin.to_string(),
            packet,
        })
    }
}
