pub(crate) mod codec;
pub(crate) mod sync;

pub use codec::{BinCodec, Codec, JsonCodec, ProtobufCodec};
pub use sync::{SharedRw, SharedRwExt};
