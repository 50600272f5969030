//! Parachain token records as persisted in the module store.

use centauri_ibc_core::host::identifiers::ChannelId;
use centauri_ibc_core::primitives::Timestamp;

use crate::error::TransferMiddlewareError;

pub mod raw {
    #[derive(Clone, PartialEq, prost::Message)]
    pub struct RawParachainIbcTokenInfo {
        #[prost(string, tag = "1")]
        pub ibc_denom: String,
        #[prost(string, tag = "2")]
        pub channel_id: String,
        #[prost(string, tag = "3")]
        pub native_denom: String,
        #[prost(string, tag = "4")]
        pub asset_id: String,
    }

    /// `google.protobuf.Timestamp`
    #[derive(Clone, Copy, PartialEq, Eq, prost::Message)]
    pub struct RawTimestamp {
        #[prost(int64, tag = "1")]
        pub seconds: i64,
        #[prost(int32, tag = "2")]
        pub nanos: i32,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct RawRemoveParachainIbcTokenInfo {
        #[prost(string, tag = "1")]
        pub native_denom: String,
        #[prost(message, optional, tag = "2")]
        pub remove_time: Option<RawTimestamp>,
    }
}

use raw::{RawParachainIbcTokenInfo, RawRemoveParachainIbcTokenInfo, RawTimestamp};

/// A token native to a parachain and the voucher it arrives as.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ParachainIbcTokenInfo {
    /// Voucher denom on this chain, `ibc/{HASH}`.
    pub ibc_denom: String,
    /// Channel the parachain token arrives on.
    pub channel_id: ChannelId,
    pub native_denom: String,
    /// Denom of the token as the parachain sends it.
    pub asset_id: String,
}

/// A token info scheduled for removal once the block time passes
/// `remove_time`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RemoveParachainIbcTokenInfo {
    pub native_denom: String,
    pub remove_time: Timestamp,
}

impl TryFrom<RawParachainIbcTokenInfo> for ParachainIbcTokenInfo {
    type Error = TransferMiddlewareError;

    fn try_from(raw: RawParachainIbcTokenInfo) -> Result<Self, Self::Error> {
        let channel_id = raw.channel_id.parse().map_err(|e| {
            TransferMiddlewareError::InvalidTokenInfo {
                reason: format!("channel `{}`: {e}", raw.channel_id),
            }
        })?;
        Ok(Self {
            ibc_denom: raw.ibc_denom,
            channel_id,
            native_denom: raw.native_denom,
            asset_id: raw.asset_id,
        })
    }
}

impl From<ParachainIbcTokenInfo> for RawParachainIbcTokenInfo {
    fn from(info: ParachainIbcTokenInfo) -> Self {
        Self {
            ibc_denom: info.ibc_denom,
            channel_id: info.channel_id.to_string(),
            native_denom: info.native_denom,
            asset_id: info.asset_id,
        }
    }
}

const NANOS_PER_SECOND: u64 = 1_000_000_000;

impl TryFrom<RawTimestamp> for Timestamp {
    type Error = TransferMiddlewareError;

    fn try_from(raw: RawTimestamp) -> Result<Self, Self::Error> {
        let invalid = || TransferMiddlewareError::InvalidTokenInfo {
            reason: format!("remove time {}s {}ns", raw.seconds, raw.nanos),
        };
        let seconds = u64::try_from(raw.seconds).map_err(|_| invalid())?;
        let nanos = u32::try_from(raw.nanos).map_err(|_| invalid())?;
        Timestamp::from_unix_timestamp(seconds, nanos).map_err(|_| invalid())
    }
}

impl From<Timestamp> for RawTimestamp {
    fn from(timestamp: Timestamp) -> Self {
        let nanoseconds = timestamp.nanoseconds();
        // u64 nanoseconds fit both fields
        Self {
            seconds: (nanoseconds / NANOS_PER_SECOND) as i64,
            nanos: (nanoseconds % NANOS_PER_SECOND) as i32,
        }
    }
}

impl TryFrom<RawRemoveParachainIbcTokenInfo> for RemoveParachainIbcTokenInfo {
    type Error = TransferMiddlewareError;

    fn try_from(raw: RawRemoveParachainIbcTokenInfo) -> Result<Self, Self::Error> {
        let remove_time = raw
            .remove_time
            .ok_or_else(|| TransferMiddlewareError::InvalidTokenInfo {
                reason: "missing remove time".to_string(),
            })?
            .try_into()?;
        Ok(Self {
            native_denom: raw.native_denom,
            remove_time,
        })
    }
}

impl From<RemoveParachainIbcTokenInfo> for RawRemoveParachainIbcTokenInfo {
    fn from(entry: RemoveParachainIbcTokenInfo) -> Self {
        Self {
            native_denom: entry.native_denom,
            remove_time: Some(entry.remove_time.into()),
        }
    }
}
