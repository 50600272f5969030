use centauri_ibc_core::channel::{PacketError, StatusValue};
use centauri_store::StoreError;
use centauri_transfer_types::error::TokenTransferError;
use displaydoc::Display;

/// Errors of the fee keeper
#[derive(Debug, Display)]
pub enum FeeError {
    /// incorrect timeout timestamp found during ibc transfer. timeout timestamp is in the past
    TimeoutInPast,
    /// incorrect timeout timestamp found during ibc transfer. too soon
    TimeoutTooSoon,
    /// token not allowed to be transferred in this channel
    TokenNotAllowed,
    /// fee percentage must be at least 1, got `{percentage}`
    InvalidPercentage { percentage: i64 },
    /// fee configuration not found for channel `{channel}` and denom `{denom}`
    FeeConfigNotFound { channel: String, denom: String },
    /// invalid fee params: `{reason}`
    InvalidParams { reason: String },
    /// signer `{signer}` is not the module authority `{authority}`
    Unauthorized { signer: String, authority: String },
    /// store error: `{0}`
    Store(StoreError),
    /// transfer error: `{0}`
    Transfer(TokenTransferError),
}

impl std::error::Error for FeeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::Store(e) => Some(e),
            Self::Transfer(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for FeeError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<TokenTransferError> for FeeError {
    fn from(e: TokenTransferError) -> Self {
        Self::Transfer(e)
    }
}

impl From<FeeError> for PacketError {
    fn from(e: FeeError) -> Self {
        PacketError::AppModule {
            description: e.to_string(),
        }
    }
}

impl From<FeeError> for StatusValue {
    fn from(e: FeeError) -> Self {
        StatusValue::new(e.to_string()).expect("error message must not be empty")
    }
}
