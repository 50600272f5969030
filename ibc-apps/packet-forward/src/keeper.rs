//! State of the packet forward middleware.

use centauri_ibc_core::host::identifiers::{ChannelId, PortId, Sequence};
use centauri_ibc_core::primitives::Signer;
use centauri_packet_forward_types::error::PacketForwardError;
use centauri_packet_forward_types::in_flight::raw::RawInFlightPacket;
use centauri_packet_forward_types::in_flight::{in_flight_key, InFlightPacket};
use centauri_packet_forward_types::params::raw::RawParams;
use centauri_packet_forward_types::params::Params;
use centauri_store::types::ProtobufStore;
use centauri_store::Store;
use tracing::{info, trace};

/// Partition holding the module params under [`PARAMS_KEY`].
pub const PARAMS_PREFIX: [u8; 1] = [0x01];

/// Partition holding the in-flight packets, keyed by [`in_flight_key`].
pub const IN_FLIGHT_PREFIX: [u8; 1] = [0x02];

pub const PARAMS_KEY: &[u8] = b"params";

/// Params and in-flight packets of the forwarding middleware.
#[derive(Clone, Debug)]
pub struct PacketForwardKeeper<S> {
    params: ProtobufStore<S, Params, RawParams>,
    in_flight: ProtobufStore<S, InFlightPacket, RawInFlightPacket>,
    authority: Signer,
}

impl<S: Store> PacketForwardKeeper<S> {
    pub fn new(store: S, authority: Signer) -> Self {
        Self {
            params: ProtobufStore::new(store.clone(), PARAMS_PREFIX),
            in_flight: ProtobufStore::new(store, IN_FLIGHT_PREFIX),
            authority,
        }
    }

    pub fn authority(&self) -> &Signer {
        &self.authority
    }

    /// Current params; a zero fee when never set.
    pub fn params(&self) -> Result<Params, PacketForwardError> {
        Ok(self.params.get(PARAMS_KEY)?.unwrap_or_default())
    }

    pub fn set_params(&mut self, signer: &Signer, params: Params) -> Result<(), PacketForwardError> {
        if signer != &self.authority {
            return Err(PacketForwardError::Unauthorized {
                signer: signer.to_string(),
                authority: self.authority.to_string(),
            });
        }
        params.validate()?;
        self.params.set(PARAMS_KEY, &params)?;
        info!(fee_percentage = %params.fee_percentage, "updated packet forward params");
        Ok(())
    }

    pub fn in_flight_packet(
        &self,
        channel_id: &ChannelId,
        port_id: &PortId,
        sequence: Sequence,
    ) -> Result<Option<InFlightPacket>, PacketForwardError> {
        Ok(self
            .in_flight
            .get(in_flight_key(channel_id, port_id, sequence))?)
    }

    /// Records `packet` against the forwarded packet it is waiting on.
    pub fn set_in_flight_packet(
        &mut self,
        channel_id: &ChannelId,
        port_id: &PortId,
        sequence: Sequence,
        packet: &InFlightPacket,
    ) -> Result<(), PacketForwardError> {
        let key = in_flight_key(channel_id, port_id, sequence);
        trace!(%key, "storing in-flight packet");
        self.in_flight.set(key, packet)?;
        Ok(())
    }

    /// Returns whether a record was removed.
    pub fn delete_in_flight_packet(
        &mut self,
        channel_id: &ChannelId,
        port_id: &PortId,
        sequence: Sequence,
    ) -> bool {
        self.in_flight
            .delete(in_flight_key(channel_id, port_id, sequence))
    }

    /// Every packet still waiting on its forward, by key.
    pub fn in_flight_packets(&self) -> Result<Vec<(String, InFlightPacket)>, PacketForwardError> {
        Ok(self
            .in_flight
            .entries()?
            .into_iter()
            .map(|(key, packet)| (String::from_utf8_lossy(&key).into_owned(), packet))
            .collect())
    }
}
