//! GLB model loader using the `gltf` crate
//!
//! Only the animation clip names and durations are extracted, plus the
//! joint count needed for the debug skeleton overlay. Loads run on the
//! blocking pool and report back over a channel; the newest request wins.

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::animation::Clip;

use super::handedness::Handedness;

/// A loaded hand model, reduced to what the viewer needs
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub handedness: Handedness,
    pub source: PathBuf,
    /// Animation clips in asset order
    pub clips: Vec<Clip>,
    /// Joints in the largest skin (0 for an unskinned model)
    pub joint_count: usize,
}

/// Errors that can occur while loading a model
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to import {path}: {source}")]
    Import {
        path: PathBuf,
        #[source]
        source: gltf::Error,
    },

    #[error("model {0} contains no animations")]
    NoAnimations(PathBuf),

    #[error("load task failed: {0}")]
    Task(String),
}

/// Read a GLB/glTF file and extract its animation clips
pub fn read_model(path: &Path, handedness: Handedness) -> Result<LoadedModel, LoadError> {
    let (document, buffers, _images) = gltf::import(path).map_err(|source| LoadError::Import {
        path: path.to_owned(),
        source,
    })?;

    let clips: Vec<Clip> = document
        .animations()
        .map(|animation| {
            let name = animation
                .name()
                .map(str::to_owned)
                .unwrap_or_else(|| format!("animation_{}", animation.index()));

            // Clip length is the latest keyframe time over all channels
            let duration = animation
                .channels()
                .filter_map(|channel| {
                    let reader = channel.reader(|buffer| Some(&buffers[buffer.index()]));
                    reader
                        .read_inputs()
                        .map(|inputs| inputs.fold(0.0_f32, f32::max))
                })
                .fold(0.0_f32, f32::max);

            Clip::new(name, duration)
        })
        .collect();

    if clips.is_empty() {
        return Err(LoadError::NoAnimations(path.to_owned()));
    }

    let joint_count = document
        .skins()
        .map(|skin| skin.joints().count())
        .max()
        .unwrap_or(0);

    debug!(
        ?path,
        clips = clips.len(),
        joint_count,
        "model parsed"
    );

    Ok(LoadedModel {
        handedness,
        source: path.to_owned(),
        clips,
        joint_count,
    })
}

/// Result of one load request
#[derive(Debug)]
pub struct LoadOutcome {
    /// Request generation; only the latest one is accepted
    pub generation: u64,
    pub handedness: Handedness,
    pub result: Result<LoadedModel, LoadError>,
}

/// Runs model loads in the background and tracks the latest request
pub struct ModelLoader {
    outcome_tx: mpsc::Sender<LoadOutcome>,
    generation: u64,
    pending: bool,
}

impl ModelLoader {
    /// Create a loader that reports to `outcome_tx`
    pub fn new(outcome_tx: mpsc::Sender<LoadOutcome>) -> Self {
        Self {
            outcome_tx,
            generation: 0,
            pending: false,
        }
    }

    /// Whether the most recent request has not reported back yet
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Start loading `path`, superseding any request still in flight
    ///
    /// Must be called from within a tokio runtime.
    pub fn request(&mut self, handedness: Handedness, path: PathBuf) -> u64 {
        self.generation += 1;
        self.pending = true;

        let generation = self.generation;
        let outcome_tx = self.outcome_tx.clone();

        info!(%handedness, ?path, generation, "loading model");

        tokio::spawn(async move {
            let result = tokio::task::spawn_blocking(move || read_model(&path, handedness))
                .await
                .unwrap_or_else(|e| Err(LoadError::Task(e.to_string())));

            let outcome = LoadOutcome {
                generation,
                handedness,
                result,
            };
            if outcome_tx.send(outcome).await.is_err() {
                warn!(generation, "load outcome dropped - session closed?");
            }
        });

        generation
    }

    /// Accept an outcome if it answers the latest request
    ///
    /// Returns `None` (and logs) for superseded outcomes.
    pub fn accept(&mut self, outcome: LoadOutcome) -> Option<LoadOutcome> {
        if outcome.generation != self.generation {
            debug!(
                generation = outcome.generation,
                latest = self.generation,
                "discarding superseded model load"
            );
            return None;
        }

        self.pending = false;
        Some(outcome)
    }
}
