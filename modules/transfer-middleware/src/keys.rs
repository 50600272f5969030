//! Store layout of the parachain token keeper.

use centauri_ibc_core::primitives::Timestamp;

/// Token info keyed by native denom.
pub const NATIVE_DENOM_PREFIX: [u8; 1] = [0x01];

/// Token info keyed by asset id.
pub const ASSET_ID_PREFIX: [u8; 1] = [0x02];

/// Secondary index: IBC voucher denom to native denom.
pub const IBC_DENOM_PREFIX: [u8; 1] = [0x03];

/// Scheduled removals, see [`remove_list_key`].
pub const REMOVE_LIST_PREFIX: [u8; 1] = [0x04];

/// Counter ordering removals scheduled for the same time.
pub const REMOVE_COUNTER_PREFIX: [u8; 1] = [0x05];

pub const REMOVE_COUNTER_KEY: &[u8] = b"next";

/// `remove_time` (big-endian nanoseconds) followed by the big-endian
/// insertion counter, so that iteration yields entries by time and then in
/// the order they were scheduled.
pub fn remove_list_key(remove_time: Timestamp, counter: u64) -> [u8; 16] {
    let mut key = [0u8; 16];
    key[..8].copy_from_slice(&remove_time.nanoseconds().to_be_bytes());
    key[8..].copy_from_slice(&counter.to_be_bytes());
    key
}
