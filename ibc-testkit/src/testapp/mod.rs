//! The host contexts [`MockChain`](crate::context::MockChain) implements for
//! the transfer application and the packet forward middleware.

mod channel;
mod forward;
mod transfer;

use centauri_packet_forward::PacketForwardMiddleware;

use crate::context::MockChain;

/// The application stack bound to the transfer port of a mock chain.
pub type MockTransferStack = PacketForwardMiddleware<MockChain>;
