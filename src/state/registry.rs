//! Mapping from canonical clip names to playable action handles

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::animation::ActionId;
use crate::prompt::LetterToken;

/// Name of the rest-pose clip every model must provide
pub const IDLE_CLIP: &str = "idle";

/// Canonical registry key: the rest pose or one letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipKey {
    Idle,
    Letter(LetterToken),
}

impl ClipKey {
    /// Parse a clip name; names must match `idle` or `a`..`z` exactly
    pub fn parse(name: &str) -> Option<Self> {
        if name == IDLE_CLIP {
            Some(ClipKey::Idle)
        } else {
            LetterToken::from_clip_name(name).map(ClipKey::Letter)
        }
    }
}

/// Errors that can occur while building a registry
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("model has no \"idle\" clip to use as the rest pose")]
    MissingIdle,
}

/// Registry of action handles for one loaded model
#[derive(Debug, Clone)]
pub struct ActionRegistry {
    idle: ActionId,
    letters: HashMap<LetterToken, ActionId>,
}

impl ActionRegistry {
    /// Build from `(handle, clip name)` pairs
    ///
    /// Unrecognised names are ignored. When a name repeats, the last
    /// handle wins.
    pub fn from_actions<'a, I>(actions: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (ActionId, &'a str)>,
    {
        let mut idle = None;
        let mut letters = HashMap::new();

        for (action, name) in actions {
            let previous = match ClipKey::parse(name) {
                Some(ClipKey::Idle) => idle.replace(action),
                Some(ClipKey::Letter(letter)) => letters.insert(letter, action),
                None => {
                    debug!(clip = name, "ignoring clip with non-canonical name");
                    continue;
                }
            };
            if previous.is_some() {
                warn!(clip = name, "duplicate clip name, keeping the last one");
            }
        }

        let idle = idle.ok_or(RegistryError::MissingIdle)?;
        Ok(Self { idle, letters })
    }

    /// Handle of the rest-pose clip
    pub fn idle(&self) -> ActionId {
        self.idle
    }

    pub fn letter(&self, letter: LetterToken) -> Option<ActionId> {
        self.letters.get(&letter).copied()
    }

    /// Number of letters with a clip
    pub fn letter_count(&self) -> usize {
        self.letters.len()
    }
}
