use core::fmt::{self, Debug, Display, Formatter};

use super::timeout::{Height, TimeoutHeight};
use crate::host::identifiers::{ChannelId, PortId, Sequence};
use crate::primitives::Timestamp;

/// A packet in flight from chain A to chain B. `_on_a` fields name the
/// sending end, `_on_b` fields the receiving end; `data` is opaque to
/// everything below the application.
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Default, Hash, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Packet {
    pub seq_on_a: Sequence,
    pub port_id_on_a: PortId,
    pub chan_id_on_a: ChannelId,
    pub port_id_on_b: PortId,
    pub chan_id_on_b: ChannelId,
    pub data: Vec<u8>,
    pub timeout_height_on_b: TimeoutHeight,
    pub timeout_timestamp_on_b: Timestamp,
}

impl Packet {
    /// Whether chain B, at `height` and time `now`, is past either deadline.
    pub fn timed_out(&self, now: &Timestamp, height: Height) -> bool {
        self.timeout_height_on_b.has_expired(height)
            || self.timeout_timestamp_on_b.has_expired(now)
    }
}

/// Logs show the payload as text when it is UTF-8, which ICS-20 JSON is.
impl Debug for Packet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Packet");
        out.field("seq_on_a", &self.seq_on_a)
            .field("port_id_on_a", &self.port_id_on_a)
            .field("chan_id_on_a", &self.chan_id_on_a)
            .field("port_id_on_b", &self.port_id_on_b)
            .field("chan_id_on_b", &self.chan_id_on_b);
        match core::str::from_utf8(&self.data) {
            Ok(text) => out.field("data", &text),
            Err(_) => out.field("data", &self.data),
        };
        out.field("timeout_height_on_b", &self.timeout_height_on_b)
            .field("timeout_timestamp_on_b", &self.timeout_timestamp_on_b)
            .finish()
    }
}

/// One-line summary without the payload.
impl Display for Packet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {}/{} -> {}/{} (timeout height {}, timestamp {})",
            self.seq_on_a,
            self.port_id_on_a,
            self.chan_id_on_a,
            self.port_id_on_b,
            self.chan_id_on_b,
            self.timeout_height_on_b,
            self.timeout_timestamp_on_b
        )
    }
}
