//! Governance messages registering and retiring parachain tokens.

use core::time::Duration;

use centauri_ibc_core::host::identifiers::ChannelId;
use centauri_ibc_core::primitives::{Signer, Timestamp};
use centauri_store::Store;

use crate::error::TransferMiddlewareError;
use crate::keeper::TransferMiddlewareKeeper;

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MsgAddParachainIbcTokenInfo {
    pub authority: Signer,
    pub ibc_denom: String,
    pub channel_id: ChannelId,
    pub native_denom: String,
    pub asset_id: String,
}

/// Retires a parachain token after `travel_time`, leaving in-flight
/// transfers time to settle. A zero `travel_time` removes it right away.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MsgRemoveParachainIbcTokenInfo {
    pub authority: Signer,
    pub native_denom: String,
    pub travel_time: Duration,
}

pub fn add_parachain_ibc_token_info<S: Store>(
    keeper: &mut TransferMiddlewareKeeper<S>,
    msg: MsgAddParachainIbcTokenInfo,
) -> Result<(), TransferMiddlewareError> {
    keeper.ensure_authority(&msg.authority)?;
    keeper.add_parachain_ibc_info(msg.ibc_denom, msg.channel_id, msg.native_denom, msg.asset_id)
}

pub fn remove_parachain_ibc_token_info<S: Store>(
    keeper: &mut TransferMiddlewareKeeper<S>,
    msg: MsgRemoveParachainIbcTokenInfo,
    now: Timestamp,
) -> Result<(), TransferMiddlewareError> {
    keeper.ensure_authority(&msg.authority)?;
    if !keeper.has_parachain_ibc_token_info_by_native_denom(&msg.native_denom) {
        return Err(TransferMiddlewareError::NotFound {
            native_denom: msg.native_denom,
        });
    }

    if msg.travel_time.is_zero() {
        keeper.remove_parachain_ibc_info(&msg.native_denom)?;
        return Ok(());
    }

    let remove_time = (now + msg.travel_time).map_err(|e| TransferMiddlewareError::InvalidTokenInfo {
        reason: format!("remove time: {e}"),
    })?;
    keeper.add_to_remove_list(msg.native_denom, remove_time)
}
