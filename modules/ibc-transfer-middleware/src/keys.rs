//! Store layout of the fee keeper.

use centauri_ibc_core::host::identifiers::{ChannelId, PortId, Sequence};

/// Partition holding the module params under [`PARAMS_KEY`].
pub const PARAMS_PREFIX: [u8; 1] = [0x01];

/// Partition holding the fee charged per outbound packet.
pub const SEQUENCE_FEE_PREFIX: [u8; 1] = [0x02];

pub const PARAMS_KEY: &[u8] = b"params";

/// `{port}/{channel}/` followed by the big-endian sequence. Sequences are
/// only unique per channel end, so the end is part of the key.
pub fn sequence_key(port_id: &PortId, channel_id: &ChannelId, sequence: Sequence) -> Vec<u8> {
    let mut key = format!("{port_id}/{channel_id}/").into_bytes();
    key.extend_from_slice(&sequence.to_be_bytes());
    key
}
