//! State machine module for letter playback
//!
//! Provides the action registry and an explicit sequencer with two states:
//! - Idle: nothing left to sign; the last clip (or the rest pose) holds
//! - Playing: letters remain and advance on each finished clip

mod machine;
mod registry;

pub use machine::{Sequencer, State, FADE_DURATION_SECS};
pub use registry::{ActionRegistry, ClipKey, RegistryError, IDLE_CLIP};
