//! Packet forward middleware with fees.
//!
//! Wraps the ICS-20 application of a chain in the middle of a multi-hop
//! transfer. A transfer whose memo carries
//! `{"forward":{"receiver":..,"port":..,"channel":..}}` is received on an
//! address derived from its sender and sent on to the next chain, less a
//! protocol fee and the bridge fee of the outbound channel. The original
//! packet is acknowledged once the forward settles: with the forward's own
//! acknowledgement on success, and after unwinding the receipt on failure
//! so that the source chain refunds the sender.
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(unused_import_braces, rust_2018_idioms)]

pub mod context;
pub mod denom;
pub mod handler;
pub mod keeper;
pub mod middleware;

pub use keeper::PacketForwardKeeper;
pub use middleware::{ForwardFlags, PacketForwardMiddleware};

/// Re-exports the data structures of the middleware.
pub mod types {
    #[doc(inline)]
    pub use centauri_packet_forward_types::*;
}
