//! Defines the packet and channel error types

use displaydoc::Display;

use crate::host::identifiers::{ChannelId, PortId, Sequence};
use crate::host::IdentifierError;
use crate::primitives::Timestamp;

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// identifier error: `{0}`
    Identifier(IdentifierError),
    /// missing channel end for port `{port_id}` and channel `{channel_id}`
    MissingChannel {
        port_id: PortId,
        channel_id: ChannelId,
    },
    /// packet destination `{actual}` does not match the channel counterparty `{expected}`
    MismatchedCounterparty { expected: String, actual: String },
    /// invalid packet sequence `{given_sequence}`; expected `{next_sequence}`
    MismatchedPacketSequence {
        given_sequence: Sequence,
        next_sequence: Sequence,
    },
    /// packet timeout timestamp `{timeout_timestamp}` has already passed at host time `{host_timestamp}`
    ExpiredPacketTimestamp {
        timeout_timestamp: Timestamp,
        host_timestamp: Timestamp,
    },
    /// packet has neither a timeout height nor a timeout timestamp
    MissingTimeout,
    /// host error: `{description}`
    Host { description: String },
}

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum PacketError {
    /// channel error: `{0}`
    Channel(ChannelError),
    /// invalid acknowledgement
    InvalidAcknowledgement,
    /// empty acknowledgement status not allowed
    EmptyAcknowledgementStatus,
    /// acknowledgement for packet `{sequence}` already written
    DuplicateAcknowledgement { sequence: Sequence },
    /// application module error: `{description}`
    AppModule { description: String },
}

impl From<IdentifierError> for ChannelError {
    fn from(e: IdentifierError) -> Self {
        Self::Identifier(e)
    }
}

impl From<ChannelError> for PacketError {
    fn from(e: ChannelError) -> Self {
        Self::Channel(e)
    }
}

impl std::error::Error for ChannelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::Identifier(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for PacketError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::Channel(e) => Some(e),
            _ => None,
        }
    }
}
