//! Events of the transfer application, keyed the way ibc-go keys them so
//! indexers read them unchanged.
use centauri_ibc_core::channel::AcknowledgementStatus;
use centauri_ibc_core::router::{ModuleEvent, ModuleEventAttribute};

use crate::packet::PacketData;
use crate::{PrefixedDenom, MODULE_ID_STR};

const EVENT_TYPE_PACKET: &str = "fungible_token_packet";
const EVENT_TYPE_TIMEOUT: &str = "timeout";
const EVENT_TYPE_DENOM_TRACE: &str = "denomination_trace";
const EVENT_TYPE_TRANSFER: &str = "ibc_transfer";

/// How a packet callback ended for the transfer it carried.
#[derive(Clone, Debug)]
pub enum PacketOutcome {
    /// The packet was received; `false` when an error ack was written.
    Received { success: bool },
    /// The counterparty acknowledged the packet.
    Acknowledged(AcknowledgementStatus),
    /// The packet timed out and its tokens went back to the sender.
    TimedOut,
}

/// A transfer packet callback, reported with the packet data.
#[derive(Clone, Debug)]
pub struct PacketEvent {
    pub data: PacketData,
    pub outcome: PacketOutcome,
}

impl PacketEvent {
    pub fn new(data: PacketData, outcome: PacketOutcome) -> Self {
        Self { data, outcome }
    }

    /// The events ibc-go emits for this callback. Acknowledgements get a
    /// second event naming the ack status.
    pub fn into_module_events(self) -> Vec<ModuleEvent> {
        let PacketData {
            token,
            sender,
            receiver,
            memo,
        } = self.data;

        let event = |kind: &str, mut attributes: Vec<ModuleEventAttribute>| {
            attributes.insert(0, ("module", MODULE_ID_STR).into());
            ModuleEvent {
                kind: kind.to_string(),
                attributes,
            }
        };

        match self.outcome {
            PacketOutcome::Received { success } => vec![event(
                EVENT_TYPE_PACKET,
                vec![
                    ("sender", sender).into(),
                    ("receiver", receiver).into(),
                    ("denom", token.denom).into(),
                    ("amount", token.amount).into(),
                    ("memo", memo).into(),
                    ("success", success).into(),
                ],
            )],
            PacketOutcome::Acknowledged(status) => {
                let label = if status.is_successful() {
                    "success"
                } else {
                    "error"
                };
                let status_event = ModuleEvent {
                    kind: EVENT_TYPE_PACKET.to_string(),
                    attributes: vec![(label, &status).into()],
                };
                vec![
                    event(
                        EVENT_TYPE_PACKET,
                        vec![
                            ("sender", sender).into(),
                            ("receiver", receiver).into(),
                            ("denom", token.denom).into(),
                            ("amount", token.amount).into(),
                            ("memo", memo).into(),
                            ("acknowledgement", status).into(),
                        ],
                    ),
                    status_event,
                ]
            }
            PacketOutcome::TimedOut => vec![event(
                EVENT_TYPE_TIMEOUT,
                vec![
                    ("refund_receiver", sender).into(),
                    ("refund_denom", token.denom).into(),
                    ("refund_amount", token.amount).into(),
                    ("memo", memo).into(),
                ],
            )],
        }
    }
}

/// A voucher denom minted on receive, tagged with its `ibc/{HASH}` form.
pub struct DenomTraceEvent {
    pub denom: PrefixedDenom,
}

impl DenomTraceEvent {
    pub fn minted(denom: PrefixedDenom) -> Self {
        Self { denom }
    }
}

impl From<DenomTraceEvent> for ModuleEvent {
    fn from(ev: DenomTraceEvent) -> Self {
        Self {
            kind: EVENT_TYPE_DENOM_TRACE.to_string(),
            attributes: vec![
                ("trace_hash", ev.denom.ibc_denom()).into(),
                ("denom", ev.denom).into(),
            ],
        }
    }
}

/// Emitted once an outbound transfer has been committed.
pub struct TransferEvent(pub PacketData);

impl From<TransferEvent> for ModuleEvent {
    fn from(TransferEvent(data): TransferEvent) -> Self {
        Self {
            kind: EVENT_TYPE_TRANSFER.to_string(),
            attributes: vec![
                ("sender", data.sender).into(),
                ("receiver", data.receiver).into(),
                ("amount", data.token.amount).into(),
                ("denom", data.token.denom).into(),
                ("memo", data.memo).into(),
            ],
        }
    }
}
