//! Application shell around the chat widget.
//!
//! - `core`: ChatApp struct and initialization
//! - `update`: per-frame event pump and panel layout

pub mod core;
pub mod update;

pub use core::ChatApp;
