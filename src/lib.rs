//! FIASKCHAT client library.
//!
//! The chat widget ([`widget`]) only depends on the [`channel::RealtimeChannel`]
//! trait, so it can be driven by the network-backed [`socket::SocketChannel`]
//! or by [`channel::MemoryChannel`] in tests.

pub mod app;
pub mod backend;
pub mod buffer;
pub mod channel;
pub mod config;
pub mod emoji;
pub mod error;
pub mod format;
pub mod input_state;
pub mod protocol;
pub mod socket;
pub mod ui;
pub mod validation;
pub mod widget;

#[cfg(test)]
mod integration_tests;
