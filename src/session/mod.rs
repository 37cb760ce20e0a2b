//! Session module owning the scene and driving playback
//!
//! `ViewerSession` is the single place sequencing state is mutated. It is
//! fed by three sources: input events, model load outcomes and frame ticks.

mod scene;
mod viewer;

pub use scene::{Scene, SkeletonOverlay};
pub use viewer::ViewerSession;
