pub mod store;

pub use store::{BinStore, JsonStore, MainStore, ProtobufStore, TypedStore};
