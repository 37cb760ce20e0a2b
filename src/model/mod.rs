//! Model module for hand assets
//!
//! Loads `.glb` files off the session loop and reports their animation
//! clips. Two interchangeable assets exist, one per handedness.

mod handedness;
mod loader;

pub use handedness::Handedness;
pub use loader::{read_model, LoadError, LoadOutcome, LoadedModel, ModelLoader};

#[cfg(test)]
pub(crate) use loader::tests::write_model;
