//! Interface between the sequencer and whatever plays the clips

/// Opaque handle to one playable action owned by an animation host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionId(usize);

impl ActionId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for ActionId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// Emitted once when a one-shot action reaches the end of its clip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipFinished {
    pub action: ActionId,
}

/// Playback controls for actions, mirroring an engine animation mixer
///
/// Calls with a handle the host does not own are ignored.
pub trait AnimationHost {
    /// Start (or keep) the action running
    fn play(&mut self, action: ActionId);

    /// Rewind to zero, clear any fade and re-arm the finished notification
    fn reset(&mut self, action: ActionId);

    fn set_effective_time_scale(&mut self, action: ActionId, time_scale: f32);

    fn set_effective_weight(&mut self, action: ActionId, weight: f32);

    /// Ramp the blend weight from 0 to full over `duration` seconds
    fn fade_in(&mut self, action: ActionId, duration: f32);

    /// Ramp the blend weight down to 0 over `duration` seconds, then stop
    fn fade_out(&mut self, action: ActionId, duration: f32);
}
