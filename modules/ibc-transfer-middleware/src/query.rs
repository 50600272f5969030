//! Read-only queries of the fee keeper.

use centauri_ibc_core::host::identifiers::ChannelId;
use centauri_store::Store;

use crate::error::FeeError;
use crate::keeper::FeeKeeper;
use crate::types::{CoinItem, Params};

/// Request for the current params
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QueryParamsRequest;

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QueryParamsResponse {
    pub params: Params,
}

/// Request for the fee schedule of one token on one channel
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QueryFeeConfigByChannelAndDenomRequest {
    pub channel: ChannelId,
    pub denom: String,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QueryFeeConfigByChannelAndDenomResponse {
    pub fees: CoinItem,
}

pub fn query_params<S: Store>(
    keeper: &FeeKeeper<S>,
    _request: &QueryParamsRequest,
) -> Result<QueryParamsResponse, FeeError> {
    Ok(QueryParamsResponse {
        params: keeper.params()?,
    })
}

/// Fails with [`FeeError::FeeConfigNotFound`] when the token is not allowed
/// on the channel.
pub fn query_fee_config_by_channel_and_denom<S: Store>(
    keeper: &FeeKeeper<S>,
    request: &QueryFeeConfigByChannelAndDenomRequest,
) -> Result<QueryFeeConfigByChannelAndDenomResponse, FeeError> {
    let config = keeper
        .fee_config(&request.channel, &request.denom)?
        .ok_or_else(|| FeeError::FeeConfigNotFound {
            channel: request.channel.to_string(),
            denom: request.denom.clone(),
        })?;
    Ok(QueryFeeConfigByChannelAndDenomResponse { fees: config.coin })
}
