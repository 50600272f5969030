use centauri_ibc_core::host::identifiers::ChannelId;
use centauri_ibc_core::primitives::{Signer, Timestamp};
use centauri_store::types::{BinStore, ProtobufStore};
use centauri_store::Store;
use tracing::{debug, info};

use crate::error::TransferMiddlewareError;
use crate::keys::{
    remove_list_key, ASSET_ID_PREFIX, IBC_DENOM_PREFIX, NATIVE_DENOM_PREFIX,
    REMOVE_COUNTER_KEY, REMOVE_COUNTER_PREFIX, REMOVE_LIST_PREFIX,
};
use crate::types::raw::{RawParachainIbcTokenInfo, RawRemoveParachainIbcTokenInfo};
use crate::types::{ParachainIbcTokenInfo, RemoveParachainIbcTokenInfo};

/// Keeper of the registered parachain tokens.
///
/// Each token is stored under three keys: its native denom, its asset id and
/// (as a secondary index) its IBC voucher denom. They are written and
/// deleted together; finding one without the others is corrupted state.
#[derive(Clone, Debug)]
pub struct TransferMiddlewareKeeper<S> {
    by_native_denom: ProtobufStore<S, ParachainIbcTokenInfo, RawParachainIbcTokenInfo>,
    by_asset_id: ProtobufStore<S, ParachainIbcTokenInfo, RawParachainIbcTokenInfo>,
    native_by_ibc_denom: BinStore<S, Vec<u8>>,
    remove_list: ProtobufStore<S, RemoveParachainIbcTokenInfo, RawRemoveParachainIbcTokenInfo>,
    remove_counter: BinStore<S, Vec<u8>>,
    authority: Signer,
    strict_removals: bool,
}

impl<S: Store> TransferMiddlewareKeeper<S> {
    pub fn new(store: S, authority: Signer) -> Self {
        Self {
            by_native_denom: ProtobufStore::new(store.clone(), NATIVE_DENOM_PREFIX),
            by_asset_id: ProtobufStore::new(store.clone(), ASSET_ID_PREFIX),
            native_by_ibc_denom: BinStore::new(store.clone(), IBC_DENOM_PREFIX),
            remove_list: ProtobufStore::new(store.clone(), REMOVE_LIST_PREFIX),
            remove_counter: BinStore::new(store, REMOVE_COUNTER_PREFIX),
            authority,
            strict_removals: false,
        }
    }

    /// When set, a scheduled removal of an unknown token fails the block
    /// instead of being skipped.
    pub fn with_strict_removals(mut self, strict_removals: bool) -> Self {
        self.strict_removals = strict_removals;
        self
    }

    pub fn authority(&self) -> &Signer {
        &self.authority
    }

    pub fn strict_removals(&self) -> bool {
        self.strict_removals
    }

    pub(crate) fn ensure_authority(&self, signer: &Signer) -> Result<(), TransferMiddlewareError> {
        if signer != &self.authority {
            return Err(TransferMiddlewareError::Unauthorized {
                signer: signer.to_string(),
                authority: self.authority.to_string(),
            });
        }
        Ok(())
    }

    /// Registers a parachain token under all three indices.
    pub fn add_parachain_ibc_info(
        &mut self,
        ibc_denom: String,
        channel_id: ChannelId,
        native_denom: String,
        asset_id: String,
    ) -> Result<(), TransferMiddlewareError> {
        for (field, value) in [
            ("ibc denom", &ibc_denom),
            ("native denom", &native_denom),
            ("asset id", &asset_id),
        ] {
            if value.is_empty() {
                return Err(TransferMiddlewareError::InvalidTokenInfo {
                    reason: format!("empty {field}"),
                });
            }
        }

        if self.by_native_denom.has(&native_denom) {
            return Err(TransferMiddlewareError::DuplicateParachainIbcTokenInfo { native_denom });
        }
        if self.by_asset_id.has(&asset_id) {
            return Err(TransferMiddlewareError::DuplicateAssetId { asset_id });
        }
        if self.native_by_ibc_denom.has(&ibc_denom) {
            return Err(TransferMiddlewareError::DuplicateIbcDenom { ibc_denom });
        }

        let info = ParachainIbcTokenInfo {
            ibc_denom,
            channel_id,
            native_denom,
            asset_id,
        };
        self.by_native_denom.set(&info.native_denom, &info)?;
        self.by_asset_id.set(&info.asset_id, &info)?;
        self.native_by_ibc_denom
            .set(&info.ibc_denom, &info.native_denom.as_bytes().to_vec())?;

        info!(
            native_denom = %info.native_denom,
            ibc_denom = %info.ibc_denom,
            asset_id = %info.asset_id,
            channel = %info.channel_id,
            "registered parachain token"
        );
        Ok(())
    }

    /// Deletes the three index entries of `native_denom`.
    ///
    /// Indices are checked before anything is deleted, so a
    /// [`CorruptedState`](TransferMiddlewareError::CorruptedState) error
    /// leaves the store as it was.
    pub fn remove_parachain_ibc_info(
        &mut self,
        native_denom: &str,
    ) -> Result<ParachainIbcTokenInfo, TransferMiddlewareError> {
        let info = self.by_native_denom.get(native_denom)?.ok_or_else(|| {
            TransferMiddlewareError::NotFound {
                native_denom: native_denom.to_string(),
            }
        })?;

        if !self.by_asset_id.has(&info.asset_id) {
            return Err(TransferMiddlewareError::CorruptedState {
                reason: format!("no asset id entry for {native_denom}"),
            });
        }
        if self.native_denom_by_ibc_denom(&info.ibc_denom)?.as_deref() != Some(native_denom) {
            return Err(TransferMiddlewareError::CorruptedState {
                reason: format!("no ibc denom entry for {native_denom}"),
            });
        }

        self.by_native_denom.delete(native_denom);
        self.by_asset_id.delete(&info.asset_id);
        self.native_by_ibc_denom.delete(&info.ibc_denom);

        info!(%native_denom, ibc_denom = %info.ibc_denom, "removed parachain token");
        Ok(info)
    }

    pub fn parachain_ibc_token_info_by_native_denom(
        &self,
        native_denom: &str,
    ) -> Result<Option<ParachainIbcTokenInfo>, TransferMiddlewareError> {
        Ok(self.by_native_denom.get(native_denom)?)
    }

    pub fn parachain_ibc_token_info_by_asset_id(
        &self,
        asset_id: &str,
    ) -> Result<Option<ParachainIbcTokenInfo>, TransferMiddlewareError> {
        Ok(self.by_asset_id.get(asset_id)?)
    }

    pub fn native_denom_by_ibc_denom(
        &self,
        ibc_denom: &str,
    ) -> Result<Option<String>, TransferMiddlewareError> {
        self.native_by_ibc_denom
            .get(ibc_denom)?
            .map(|bytes| {
                String::from_utf8(bytes).map_err(|_| TransferMiddlewareError::CorruptedState {
                    reason: format!("native denom of {ibc_denom} is not utf-8"),
                })
            })
            .transpose()
    }

    pub fn has_parachain_ibc_token_info_by_native_denom(&self, native_denom: &str) -> bool {
        self.by_native_denom.has(native_denom)
    }

    pub fn has_parachain_ibc_token_info_by_asset_id(&self, asset_id: &str) -> bool {
        self.by_asset_id.has(asset_id)
    }

    /// Schedules the removal of `native_denom` once the block time passes
    /// `remove_time`.
    pub fn add_to_remove_list(
        &mut self,
        native_denom: String,
        remove_time: Timestamp,
    ) -> Result<(), TransferMiddlewareError> {
        let counter = self.next_remove_counter()?;
        let entry = RemoveParachainIbcTokenInfo {
            native_denom,
            remove_time,
        };
        self.remove_list
            .set(remove_list_key(remove_time, counter), &entry)?;
        debug!(
            native_denom = %entry.native_denom,
            remove_time = remove_time.nanoseconds(),
            "scheduled parachain token removal"
        );
        Ok(())
    }

    /// Scheduled removals, by time and then in scheduling order.
    pub fn remove_list(&self) -> Result<Vec<RemoveParachainIbcTokenInfo>, TransferMiddlewareError> {
        Ok(self
            .remove_list
            .entries()?
            .into_iter()
            .map(|(_, entry)| entry)
            .collect())
    }

    pub(crate) fn remove_list_entries(
        &self,
    ) -> Result<Vec<(Vec<u8>, RemoveParachainIbcTokenInfo)>, TransferMiddlewareError> {
        Ok(self.remove_list.entries()?)
    }

    pub(crate) fn delete_remove_list_entry(&mut self, key: &[u8]) -> bool {
        self.remove_list.delete(key)
    }

    fn next_remove_counter(&mut self) -> Result<u64, TransferMiddlewareError> {
        let current = match self.remove_counter.get(REMOVE_COUNTER_KEY)? {
            None => 0,
            Some(bytes) => {
                let bytes: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                    TransferMiddlewareError::CorruptedState {
                        reason: "malformed removal counter".to_string(),
                    }
                })?;
                u64::from_be_bytes(bytes)
            }
        };
        self.remove_counter
            .set(REMOVE_COUNTER_KEY, &(current + 1).to_be_bytes().to_vec())?;
        Ok(current)
    }
}
