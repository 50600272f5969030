//! Events of the packet forward middleware
use centauri_ibc_core::host::identifiers::{ChannelId, Sequence};
use centauri_ibc_core::router::ModuleEvent;
use centauri_primitives::Signer;
use centauri_transfer_types::RawCoin;

use crate::MODULE_NAME;

const EVENT_TYPE_FORWARD: &str = "packet_forward";
const EVENT_TYPE_RETRY: &str = "packet_forward_retry";
const EVENT_TYPE_FAILURE: &str = "packet_forward_failure";
const EVENT_TYPE_FEE: &str = "packet_forward_fee";

/// All events the middleware emits
pub enum Event {
    Forward(ForwardEvent),
    Retry(RetryEvent),
    Failure(FailureEvent),
    Fee(FeeEvent),
}

/// A received packet was sent on to the next chain.
pub struct ForwardEvent {
    pub sender: Signer,
    pub receiver: Signer,
    pub channel: ChannelId,
    pub sequence: Sequence,
    pub coin: RawCoin,
}

impl From<ForwardEvent> for ModuleEvent {
    fn from(ev: ForwardEvent) -> Self {
        let ForwardEvent {
            sender,
            receiver,
            channel,
            sequence,
            coin,
        } = ev;
        Self {
            kind: EVENT_TYPE_FORWARD.to_string(),
            attributes: vec![
                ("module", MODULE_NAME).into(),
                ("sender", sender).into(),
                ("receiver", receiver).into(),
                ("channel", channel).into(),
                ("sequence", sequence).into(),
                ("denom", coin.denom).into(),
                ("amount", coin.amount).into(),
            ],
        }
    }
}

/// A timed out forward was sent again.
pub struct RetryEvent {
    pub channel: ChannelId,
    pub previous_sequence: Sequence,
    pub sequence: Sequence,
    pub retries_remaining: u8,
}

impl From<RetryEvent> for ModuleEvent {
    fn from(ev: RetryEvent) -> Self {
        let RetryEvent {
            channel,
            previous_sequence,
            sequence,
            retries_remaining,
        } = ev;
        Self {
            kind: EVENT_TYPE_RETRY.to_string(),
            attributes: vec![
                ("module", MODULE_NAME).into(),
                ("channel", channel).into(),
                ("previous_sequence", previous_sequence).into(),
                ("sequence", sequence).into(),
                ("retries_remaining", retries_remaining).into(),
            ],
        }
    }
}

/// A forward failed for good.
pub struct FailureEvent {
    pub original_sender: Signer,
    pub channel: ChannelId,
    pub sequence: Sequence,
    pub error: String,
    /// Whether the funds were returned towards the original sender.
    pub refunded: bool,
}

impl From<FailureEvent> for ModuleEvent {
    fn from(ev: FailureEvent) -> Self {
        let FailureEvent {
            original_sender,
            channel,
            sequence,
            error,
            refunded,
        } = ev;
        Self {
            kind: EVENT_TYPE_FAILURE.to_string(),
            attributes: vec![
                ("module", MODULE_NAME).into(),
                ("original_sender", original_sender).into(),
                ("channel", channel).into(),
                ("sequence", sequence).into(),
                ("error", error).into(),
                ("refunded", refunded).into(),
            ],
        }
    }
}

/// A fee was taken from a forwarded amount.
pub struct FeeEvent {
    /// `protocol` or `bridge`, with a `_refund` suffix when returned
    pub kind: &'static str,
    pub payer: Signer,
    pub recipient: Signer,
    pub fee: RawCoin,
}

impl From<FeeEvent> for ModuleEvent {
    fn from(ev: FeeEvent) -> Self {
        let FeeEvent {
            kind,
            payer,
            recipient,
            fee,
        } = ev;
        Self {
            kind: EVENT_TYPE_FEE.to_string(),
            attributes: vec![
                ("module", MODULE_NAME).into(),
                ("fee_kind", kind).into(),
                ("payer", payer).into(),
                ("recipient", recipient).into(),
                ("fee", fee).into(),
            ],
        }
    }
}

impl From<Event> for ModuleEvent {
    fn from(ev: Event) -> Self {
        match ev {
            Event::Forward(ev) => ev.into(),
            Event::Retry(ev) => ev.into(),
            Event::Failure(ev) => ev.into(),
            Event::Fee(ev) => ev.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_event_attributes() {
        let event: ModuleEvent = ForwardEvent {
            sender: "centauri1override".into(),
            receiver: "osmo1receiver".into(),
            channel: ChannelId::new(2),
            sequence: 5u64.into(),
            coin: RawCoin::new("ppica".to_string(), 90u64),
        }
        .into();

        assert_eq!(event.kind, "packet_forward");
        assert_eq!(event.attribute("channel"), Some("channel-2"));
        assert_eq!(event.attribute("sequence"), Some("5"));
        assert_eq!(event.attribute("amount"), Some("90"));
    }
}
