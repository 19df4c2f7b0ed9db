//! egui rendering for the chat window.
//!
//! - `header`: room name and connection status
//! - `members`: room member side panel
//! - `messages`: message list
//! - `input`: emoji picker and input row
//! - `theme`: color schemes and styling utilities

pub mod header;
pub mod input;
pub mod members;
pub mod messages;
pub mod theme;
