//! Message definitions of the transfer application.

mod transfer;

pub use transfer::*;
