//! Fee parameters and the fee computed for a transfer.

mod fee;
mod params;

pub use fee::*;
pub use params::*;
