use centauri_store::StoreError;
use centauri_transfer_types::error::TokenTransferError;
use displaydoc::Display;

/// Errors of the parachain token keeper
#[derive(Debug, Display)]
pub enum TransferMiddlewareError {
    /// parachain token info already registered for native denom `{native_denom}`
    DuplicateParachainIbcTokenInfo { native_denom: String },
    /// asset id `{asset_id}` is already mapped
    DuplicateAssetId { asset_id: String },
    /// ibc denom `{ibc_denom}` is already mapped
    DuplicateIbcDenom { ibc_denom: String },
    /// parachain token info not found for native denom `{native_denom}`
    NotFound { native_denom: String },
    /// broken data in state: `{reason}`
    CorruptedState { reason: String },
    /// invalid parachain token info: `{reason}`
    InvalidTokenInfo { reason: String },
    /// signer `{signer}` is not the module authority `{authority}`
    Unauthorized { signer: String, authority: String },
    /// store error: `{0}`
    Store(StoreError),
    /// transfer error: `{0}`
    Transfer(TokenTransferError),
}

impl std::error::Error for TransferMiddlewareError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::Store(e) => Some(e),
            Self::Transfer(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for TransferMiddlewareError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<TokenTransferError> for TransferMiddlewareError {
    fn from(e: TokenTransferError) -> Self {
        Self::Transfer(e)
    }
}
