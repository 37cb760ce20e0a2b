//! Events module for viewer and sequencer transitions
//!
//! Every event is broadcast to subscribers and printed as one JSON line.

use serde::{Deserialize, Serialize};

use crate::model::Handedness;
use crate::prompt::LetterToken;

/// Events emitted by the session and the sequencer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewerEvent {
    /// Text was committed from the input source
    PromptCommitted {
        /// Letters kept after filtering, lowercased
        letters: String,
    },

    /// The rest pose started after a (re)start; cursor is back at 0
    RestPose {
        /// Number of letters queued behind the rest pose
        pending: usize,
    },

    /// A letter clip started playing
    ClipStarted {
        letter: LetterToken,
        /// Cursor value after this clip was scheduled
        cursor: usize,
        /// Whether the previous clip was faded out
        cross_fade: bool,
    },

    /// The model has no clip for a letter; it was skipped
    LetterSkipped {
        letter: LetterToken,
        cursor: usize,
    },

    /// The last letter of the prompt finished playing
    SequenceComplete {
        letters: usize,
    },

    /// The user picked the other hand
    HandednessChanged {
        from: Handedness,
        to: Handedness,
    },

    /// A model load was started
    ModelRequested {
        handedness: Handedness,
    },

    /// A model finished loading and is now in the scene
    ModelLoaded {
        handedness: Handedness,
        clips: usize,
        joints: usize,
    },

    /// A model could not be loaded
    ModelLoadFailed {
        handedness: Handedness,
        reason: String,
    },
}

impl std::fmt::Display for ViewerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewerEvent::PromptCommitted { letters } => {
                write!(f, "PROMPT_COMMITTED ({:?})", letters)
            }
            ViewerEvent::RestPose { pending } => write!(f, "REST_POSE ({} pending)", pending),
            ViewerEvent::ClipStarted { letter, cursor, .. } => {
                write!(f, "CLIP_STARTED ({} @ {})", letter, cursor)
            }
            ViewerEvent::LetterSkipped { letter, cursor } => {
                write!(f, "LETTER_SKIPPED ({} @ {})", letter, cursor)
            }
            ViewerEvent::SequenceComplete { letters } => {
                write!(f, "SEQUENCE_COMPLETE ({} letters)", letters)
            }
            ViewerEvent::HandednessChanged { from, to } => {
                write!(f, "HANDEDNESS_CHANGED ({} -> {})", from, to)
            }
            ViewerEvent::ModelRequested { handedness } => {
                write!(f, "MODEL_REQUESTED ({})", handedness)
            }
            ViewerEvent::ModelLoaded { handedness, clips, .. } => {
                write!(f, "MODEL_LOADED ({}, {} clips)", handedness, clips)
            }
            ViewerEvent::ModelLoadFailed { handedness, reason } => {
                write!(f, "MODEL_LOAD_FAILED ({}: {})", handedness, reason)
            }
        }
    }
}
