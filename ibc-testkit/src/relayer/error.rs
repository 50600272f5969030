use centauri_ibc_core::channel::{Packet, PacketError};
use centauri_ibc_core::host::identifiers::ChannelId;
use centauri_ibc_transfer_middleware::FeeError;
use centauri_store::StoreError;
use centauri_transfer_middleware::TransferMiddlewareError;
use centauri_transfer_types::error::TokenTransferError;
use displaydoc::Display;

#[derive(Debug, Display)]
pub enum RelayerError {
    /// no chain with id `{chain_id}`
    UnknownChain { chain_id: String },
    /// channel `{channel_id}` of chain `{chain_id}` is not connected
    UnknownChannel {
        chain_id: String,
        channel_id: ChannelId,
    },
    /// packet `{packet}` was already received on `{chain_id}`
    DuplicatePacket { chain_id: String, packet: Packet },
    /// chain `{chain_id}` has no commitment for packet `{packet}`
    MissingCommitment { chain_id: String, packet: Packet },
    /// transfer failed: `{0}`
    Transfer(TokenTransferError),
    /// bridge fee transfer failed: `{0}`
    Fee(FeeError),
    /// packet callback failed: `{0}`
    Packet(PacketError),
    /// parachain token keeper failed: `{0}`
    Parachain(TransferMiddlewareError),
    /// failed to commit: `{0}`
    Store(StoreError),
    /// packets still pending after `{rounds}` relay rounds
    NotSettled { rounds: usize },
}

impl From<TokenTransferError> for RelayerError {
    fn from(e: TokenTransferError) -> Self {
        Self::Transfer(e)
    }
}

impl From<FeeError> for RelayerError {
    fn from(e: FeeError) -> Self {
        Self::Fee(e)
    }
}

impl From<PacketError> for RelayerError {
    fn from(e: PacketError) -> Self {
        Self::Packet(e)
    }
}

impl From<TransferMiddlewareError> for RelayerError {
    fn from(e: TransferMiddlewareError) -> Self {
        Self::Parachain(e)
    }
}

impl From<StoreError> for RelayerError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl std::error::Error for RelayerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::Transfer(e) => Some(e),
            Self::Fee(e) => Some(e),
            Self::Packet(e) => Some(e),
            Self::Parachain(e) => Some(e),
            Self::Store(e) => Some(e),
            _ => None,
        }
    }
}
