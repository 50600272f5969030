//! Implements the forwarding logic run by the middleware callbacks.
mod on_acknowledgement_packet;
mod on_recv_packet;
mod on_timeout_packet;
mod refund;

pub use on_acknowledgement_packet::*;
pub use on_recv_packet::*;
pub use on_timeout_packet::*;
pub use refund::*;

use centauri_ibc_core::channel::{Acknowledgement, AcknowledgementStatus, StatusValue};
use centauri_ibc_transfer_middleware::FeeError;
use centauri_packet_forward_types::error::PacketForwardError;
use centauri_transfer_middleware::TransferMiddlewareError;
use centauri_transfer_types::error::TokenTransferError;

/// Acknowledgement written when a forward fails after the point of no
/// return: the funds stay on this chain, so the source must not refund.
pub const NONREFUNDABLE_ACK_PREFIX: &str = "packet forward failed after point of no return: ";

pub(crate) fn error_ack(err: PacketForwardError) -> Acknowledgement {
    AcknowledgementStatus::error(err.into()).into()
}

/// Success acknowledgement carrying the failure, base64 encoded the way
/// ibc-go encodes acknowledgement results.
pub(crate) fn nonrefundable_ack(error: &str) -> Result<Acknowledgement, PacketForwardError> {
    use base64::Engine;

    let result = base64::engine::general_purpose::STANDARD
        .encode(format!("{NONREFUNDABLE_ACK_PREFIX}{error}"));
    Ok(AcknowledgementStatus::success(StatusValue::new(result)?).into())
}

pub(crate) fn bridge_fee_error(err: FeeError) -> PacketForwardError {
    PacketForwardError::BridgeFee {
        description: err.to_string(),
    }
}

pub(crate) fn parachain_error(err: TransferMiddlewareError) -> PacketForwardError {
    PacketForwardError::Parachain {
        description: err.to_string(),
    }
}

pub(crate) fn forward_failed(err: TokenTransferError) -> PacketForwardError {
    PacketForwardError::ForwardFailed {
        description: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use base64::Engine;

    use super::*;

    #[test]
    fn nonrefundable_ack_is_a_success_carrying_the_error() {
        let ack = nonrefundable_ack("forwarded packet timed out").unwrap();
        assert!(ack.is_successful());

        let Some(AcknowledgementStatus::Success(value)) = ack.status() else {
            panic!("expected a success acknowledgement");
        };
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(value.as_str())
            .unwrap();
        assert_eq!(
            String::from_utf8(decoded).unwrap(),
            "packet forward failed after point of no return: forwarded packet timed out"
        );
    }

    #[test]
    fn error_ack_is_prefixed() {
        let ack = error_ack(PacketForwardError::ForwardTimedOut);
        assert!(!ack.is_successful());
        assert_eq!(
            ack.as_bytes(),
            br#"{"error":"packet-forward-middleware error: forwarded packet timed out"}"#
        );
    }
}
