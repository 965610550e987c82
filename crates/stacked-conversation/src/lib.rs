//! Conversation core for Stacked.
//!
//! Ties the generation and speech clients to an append-only message log,
//! a strictly sequential playback queue, and the idle/live/auto mode
//! state machine that drives status polling and autonomous prompts.

pub mod controller;
pub mod message;
pub mod modes;
pub mod playback;

pub use controller::{ControllerSettings, ConversationController};
pub use message::Message;
pub use playback::{AudioPlayer, PlaybackError, PlaybackId, PlaybackQueue};
