use core::time::Duration;

use centauri_ibc_core::host::identifiers::{ChannelId, PortId};
use centauri_ibc_core::primitives::Signer;
use serde_json::{json, Value};
use typed_builder::TypedBuilder;

/// Configuration of a `{"forward":{..}}` transfer memo.
#[derive(TypedBuilder, Debug)]
#[builder(build_method(into = String))]
pub struct ForwardMemoConfig {
    /// Receiver on the chain the packet is forwarded to.
    #[builder(setter(into))]
    pub receiver: Signer,
    #[builder(default = PortId::transfer())]
    pub port: PortId,
    pub channel: ChannelId,
    #[builder(default, setter(strip_option))]
    pub timeout: Option<Duration>,
    #[builder(default, setter(strip_option))]
    pub retries: Option<u8>,
    /// Memo of the forwarded transfer. Embedded as an object when it is
    /// JSON, as a string otherwise.
    #[builder(default, setter(strip_option, into))]
    pub next: Option<String>,
}

impl From<ForwardMemoConfig> for String {
    fn from(config: ForwardMemoConfig) -> Self {
        let mut forward = json!({
            "receiver": config.receiver.to_string(),
            "port": config.port.to_string(),
            "channel": config.channel.to_string(),
        });
        if let Some(timeout) = config.timeout {
            forward["timeout"] = json!(i64::try_from(timeout.as_nanos()).unwrap_or(i64::MAX));
        }
        if let Some(retries) = config.retries {
            forward["retries"] = json!(retries);
        }
        if let Some(next) = config.next {
            forward["next"] = serde_json::from_str::<Value>(&next).unwrap_or(Value::String(next));
        }
        json!({ "forward": forward }).to_string()
    }
}

#[cfg(test)]
mod tests {
    use centauri_packet_forward::types::metadata::ForwardMemo;

    use super::*;

    #[test]
    fn nested_memos_describe_every_hop() {
        let last_hop: String = ForwardMemoConfig::builder()
            .receiver("osmo1carol")
            .channel(ChannelId::new(4))
            .build();
        let memo: String = ForwardMemoConfig::builder()
            .receiver("cosmos1bob")
            .channel(ChannelId::new(1))
            .timeout(Duration::from_secs(30))
            .retries(2)
            .next(last_hop)
            .build();

        let ForwardMemo::Forward(metadata) = ForwardMemo::parse(&memo).unwrap() else {
            panic!("memo does not ask for a forward: {memo}");
        };
        assert_eq!(metadata.forward.receiver, Signer::from("cosmos1bob"));
        assert_eq!(metadata.forward.channel, ChannelId::new(1));
        assert_eq!(metadata.forward.timeout, Some(Duration::from_secs(30)));
        assert_eq!(metadata.forward.retries, Some(2));

        let ForwardMemo::Forward(next) = ForwardMemo::parse(metadata.forward.next_memo()).unwrap()
        else {
            panic!("next memo does not ask for a forward");
        };
        assert_eq!(next.forward.receiver, Signer::from("osmo1carol"));
        assert_eq!(next.forward.channel, ChannelId::new(4));
        assert_eq!(next.forward.timeout, None);
    }
}
