//! ICS-26 application callbacks.

mod event;
mod module;

pub use event::{ModuleEvent, ModuleEventAttribute};
pub use module::{Module, ModuleExtras};
