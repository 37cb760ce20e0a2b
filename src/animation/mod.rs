//! Animation module: clip data, the host interface the sequencer drives,
//! and a frame-stepped mixer implementing it
//!
//! Actions are one-shot (play once, hold the last frame) and report a
//! single `ClipFinished` per play-through from `AnimationMixer::update`.

mod action;
mod clip;
mod host;
mod mixer;

pub use action::ActionSnapshot;
pub use clip::Clip;
pub use host::{ActionId, AnimationHost, ClipFinished};
pub use mixer::AnimationMixer;
