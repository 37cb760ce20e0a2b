//! Named animation clip metadata

/// A named, finite-duration animation from a loaded model
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    /// Clip name as stored in the asset (`idle`, `a`, ..., `z`)
    pub name: String,
    /// Length in seconds
    pub duration: f32,
}

impl Clip {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration: duration.max(0.0),
        }
    }
}
