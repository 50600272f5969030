//! The `forward` object of a transfer memo.
//!
//! ```json
//! {"forward":{"receiver":"osmo1...","port":"transfer","channel":"channel-1",
//!   "timeout":600000000000,"retries":2,"next":{"forward":{...}}}}
//! ```

use core::time::Duration;

use centauri_ibc_core::host::identifiers::{ChannelId, PortId};
use centauri_primitives::Signer;
use serde_json::value::RawValue;
use serde_json::Value;

use crate::error::PacketForwardError;

/// Outcome of reading a memo.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ForwardMemo {
    /// Not JSON, or no `forward` object: the transfer is not forwarded.
    Absent,
    Forward(PacketMetadata),
}

impl ForwardMemo {
    /// Reads a transfer memo in two stages: whether it asks for a forward at
    /// all, then whether the request is well formed.
    pub fn parse(memo: &str) -> Result<Self, PacketForwardError> {
        let Ok(value) = serde_json::from_str::<Value>(memo) else {
            return Ok(Self::Absent);
        };
        if value.get("forward").map_or(true, Value::is_null) {
            return Ok(Self::Absent);
        }

        let raw: RawPacketMetadata =
            serde_json::from_str(memo).map_err(|e| PacketForwardError::MalformedMemo {
                description: e.to_string(),
            })?;

        Ok(Self::Forward(PacketMetadata {
            forward: raw.forward.validate()?,
        }))
    }
}

/// A validated forwarding request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PacketMetadata {
    pub forward: ForwardMetadata,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForwardMetadata {
    pub receiver: Signer,
    pub port: PortId,
    pub channel: ChannelId,
    /// `None` when absent or not positive.
    pub timeout: Option<Duration>,
    pub retries: Option<u8>,
    /// Memo of the forwarded transfer, exactly as the sender wrote it.
    pub next: Option<String>,
}

impl ForwardMetadata {
    /// Memo of the outbound transfer.
    pub fn next_memo(&self) -> &str {
        self.next.as_deref().unwrap_or_default()
    }
}

#[derive(serde::Deserialize)]
struct RawPacketMetadata {
    forward: RawForwardMetadata,
}

#[derive(serde::Deserialize)]
struct RawForwardMetadata {
    #[serde(default)]
    receiver: String,
    #[serde(default)]
    port: String,
    #[serde(default)]
    channel: String,
    /// nanoseconds
    #[serde(default)]
    timeout: i64,
    #[serde(default)]
    retries: Option<u8>,
    #[serde(default)]
    next: Option<Box<RawValue>>,
}

impl RawForwardMetadata {
    fn validate(self) -> Result<ForwardMetadata, PacketForwardError> {
        if self.receiver.trim().is_empty() {
            return Err(PacketForwardError::InvalidMetadata {
                reason: "failed to validate metadata: receiver cannot be empty".to_string(),
            });
        }
        let port: PortId = self.port.parse()?;
        let channel: ChannelId = self.channel.parse()?;

        let timeout = u64::try_from(self.timeout)
            .ok()
            .filter(|nanos| *nanos > 0)
            .map(Duration::from_nanos);

        let next = self.next.map(|next| next_memo(&next)).transpose()?;

        Ok(ForwardMetadata {
            receiver: self.receiver.into(),
            port,
            channel,
            timeout,
            retries: self.retries,
            next,
        })
    }
}

/// A `next` given as a JSON string is the memo itself; any other value is
/// kept verbatim.
fn next_memo(next: &RawValue) -> Result<String, PacketForwardError> {
    let text = next.get();
    if text.starts_with('"') {
        return serde_json::from_str::<String>(text).map_err(|e| PacketForwardError::MalformedMemo {
            description: e.to_string(),
        });
    }
    Ok(text.to_string())
}
