//! Errors of the packet forward middleware

use centauri_ibc_core::channel::{ChannelError, PacketError, StatusValue};
use centauri_ibc_core::host::IdentifierError;
use centauri_primitives::TimestampError;
use centauri_store::StoreError;
use centauri_transfer_types::error::TokenTransferError;
use displaydoc::Display;

use crate::ERROR_ACK_PREFIX;

#[derive(Debug, Display)]
pub enum PacketForwardError {
    /// error parsing forward metadata: `{description}`
    MalformedMemo { description: String },
    /// invalid forward metadata: `{reason}`
    InvalidMetadata { reason: String },
    /// identifier error: `{0}`
    Identifier(IdentifierError),
    /// error receiving packet: `{description}`
    ReceiveFailed { description: String },
    /// wrapped application deferred the acknowledgement of a packet to forward
    MissingAcknowledgement,
    /// error parsing amount for forward: `{amount}`
    InvalidAmount { amount: String },
    /// invalid decimal `{value}`: `{reason}`
    InvalidDecimal { value: String, reason: String },
    /// amount overflow in denom `{denom}`
    AmountOverflow { denom: String },
    /// error charging fee: `{description}`
    BridgeFee { description: String },
    /// failed to forward transfer: `{description}`
    ForwardFailed { description: String },
    /// forwarded packet timed out
    ForwardTimedOut,
    /// parachain token error: `{description}`
    Parachain { description: String },
    /// invalid in-flight packet: `{reason}`
    InvalidInFlightPacket { reason: String },
    /// signer `{signer}` is not the module authority `{authority}`
    Unauthorized { signer: String, authority: String },
    /// timestamp error: `{0}`
    Timestamp(TimestampError),
    /// channel error: `{0}`
    Channel(ChannelError),
    /// packet error: `{0}`
    Packet(PacketError),
    /// transfer error: `{0}`
    Transfer(TokenTransferError),
    /// store error: `{0}`
    Store(StoreError),
}

impl std::error::Error for PacketForwardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::Identifier(e) => Some(e),
            Self::Timestamp(e) => Some(e),
            Self::Channel(e) => Some(e),
            Self::Packet(e) => Some(e),
            Self::Transfer(e) => Some(e),
            Self::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<IdentifierError> for PacketForwardError {
    fn from(e: IdentifierError) -> Self {
        Self::Identifier(e)
    }
}

impl From<TimestampError> for PacketForwardError {
    fn from(e: TimestampError) -> Self {
        Self::Timestamp(e)
    }
}

impl From<ChannelError> for PacketForwardError {
    fn from(e: ChannelError) -> Self {
        Self::Channel(e)
    }
}

impl From<PacketError> for PacketForwardError {
    fn from(e: PacketError) -> Self {
        Self::Packet(e)
    }
}

impl From<TokenTransferError> for PacketForwardError {
    fn from(e: TokenTransferError) -> Self {
        Self::Transfer(e)
    }
}

impl From<StoreError> for PacketForwardError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<PacketForwardError> for PacketError {
    fn from(e: PacketForwardError) -> Self {
        match e {
            PacketForwardError::Packet(e) => e,
            PacketForwardError::Channel(e) => PacketError::Channel(e),
            e => PacketError::AppModule {
                description: e.to_string(),
            },
        }
    }
}

/// Error acknowledgements carry the middleware prefix.
impl From<PacketForwardError> for StatusValue {
    fn from(e: PacketForwardError) -> Self {
        StatusValue::new(format!("{ERROR_ACK_PREFIX}{e}"))
            .expect("prefixed error message is never empty")
    }
}
