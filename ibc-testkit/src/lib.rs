//! Test harness of the Centauri transfer stack.
//!
//! A [`MockChain`](context::MockChain) hosts the transfer application, the
//! bridge fee keeper and the parachain token keeper over a
//! [`MockBank`](bank::MockBank), with the packet forward middleware on top.
//! A [`Coordinator`](relayer::Coordinator) links several of them by transfer
//! channels and relays their packets, acknowledgements and timeouts.
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(unused_import_braces, rust_2018_idioms)]

pub mod bank;
pub mod context;
pub mod fixtures;
pub mod relayer;
pub mod testapp;
