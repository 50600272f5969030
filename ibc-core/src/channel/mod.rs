//! ICS-04 packet-level types and the host contexts for sending packets and
//! writing acknowledgements.

pub mod acknowledgement;
pub mod context;
pub mod error;
pub mod handler;
pub mod packet;
pub mod timeout;

pub use acknowledgement::{Acknowledgement, AcknowledgementStatus, StatusValue};
pub use error::{ChannelError, PacketError};
pub use packet::Packet;
pub use timeout::{Height, TimeoutHeight};
