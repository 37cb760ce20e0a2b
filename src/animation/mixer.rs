//! Frame-stepped animation mixer
//!
//! Owns one action per clip of a model. `update` is the only place time
//! moves and the only source of `ClipFinished` notifications.

use tracing::{debug, trace};

use super::action::{ActionSnapshot, ClipAction};
use super::clip::Clip;
use super::host::{ActionId, AnimationHost, ClipFinished};

/// Mixer over the clips of one loaded model
#[derive(Debug)]
pub struct AnimationMixer {
    actions: Vec<ClipAction>,
    /// Accumulated mixer time in seconds
    time: f64,
}

impl AnimationMixer {
    /// Create a mixer with one stopped, play-once action per clip
    pub fn new(clips: &[Clip]) -> Self {
        Self {
            actions: clips.iter().cloned().map(ClipAction::new).collect(),
            time: 0.0,
        }
    }

    /// Iterate over every action handle and the name of its clip
    pub fn actions(&self) -> impl Iterator<Item = (ActionId, &str)> {
        self.actions
            .iter()
            .enumerate()
            .map(|(index, action)| (ActionId::from(index), action.clip().name.as_str()))
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Advance all running actions by `dt` seconds
    ///
    /// Returns the actions whose clip reached its end during this step.
    pub fn update(&mut self, dt: f32) -> Vec<ClipFinished> {
        let dt = dt.max(0.0);
        self.time += f64::from(dt);

        let finished: Vec<ClipFinished> = self
            .actions
            .iter_mut()
            .enumerate()
            .filter_map(|(index, action)| {
                action.advance(dt).then(|| ClipFinished {
                    action: ActionId::from(index),
                })
            })
            .collect();

        for event in &finished {
            trace!(action = event.action.index(), "clip finished");
        }

        finished
    }

    /// Blend state of the running actions, in clip order
    pub fn snapshot(&self) -> Vec<ActionSnapshot> {
        self.actions
            .iter()
            .filter(|action| action.is_running())
            .map(ClipAction::snapshot)
            .collect()
    }

    fn action_mut(&mut self, action: ActionId) -> Option<&mut ClipAction> {
        let found = self.actions.get_mut(action.index());
        if found.is_none() {
            debug!(action = action.index(), "ignoring call for unknown action");
        }
        found
    }
}

/// Inspection helpers for tests
#[cfg(test)]
impl AnimationMixer {
    pub fn clip_name(&self, action: ActionId) -> Option<&str> {
        self.actions
            .get(action.index())
            .map(|action| action.clip().name.as_str())
    }

    pub fn is_running(&self, action: ActionId) -> bool {
        self.actions
            .get(action.index())
            .is_some_and(ClipAction::is_running)
    }

    pub fn is_finished(&self, action: ActionId) -> bool {
        self.actions
            .get(action.index())
            .is_some_and(ClipAction::is_finished)
    }

    pub fn effective_weight(&self, action: ActionId) -> Option<f32> {
        self.actions
            .get(action.index())
            .map(ClipAction::effective_weight)
    }

    pub fn action_time(&self, action: ActionId) -> Option<f32> {
        self.actions.get(action.index()).map(ClipAction::time)
    }
}

impl AnimationHost for AnimationMixer {
    fn play(&mut self, action: ActionId) {
        if let Some(action) = self.action_mut(action) {
            action.play();
        }
    }

    fn reset(&mut self, action: ActionId) {
        if let Some(action) = self.action_mut(action) {
            action.reset();
        }
    }

    fn set_effective_time_scale(&mut self, action: ActionId, time_scale: f32) {
        if let Some(action) = self.action_mut(action) {
            action.set_time_scale(time_scale);
        }
    }

    fn set_effective_weight(&mut self, action: ActionId, weight: f32) {
        if let Some(action) = self.action_mut(action) {
            action.set_weight(weight);
        }
    }

    fn fade_in(&mut self, action: ActionId, duration: f32) {
        if let Some(action) = self.action_mut(action) {
            action.fade_in(duration);
        }
    }

    fn fade_out(&mut self, action: ActionId, duration: f32) {
        if let Some(action) = self.action_mut(action) {
            action.fade_out(duration);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixer() -> AnimationMixer {
        AnimationMixer::new(&[Clip::new("idle", 1.0), Clip::new("a", 0.5)])
    }

    fn id(index: usize) -> ActionId {
        ActionId::from(index)
    }

    #[test]
    fn test_actions_listed_in_clip_order() {
        let mixer = mixer();
        let names: Vec<&str> = mixer.actions().map(|(_, name)| name).collect();
        assert_eq!(names, vec!["idle", "a"]);
        assert_eq!(mixer.clip_name(id(1)), Some("a"));
        assert_eq!(mixer.clip_name(id(5)), None);
    }

    #[test]
    fn test_stopped_actions_never_finish() {
        let mut mixer = mixer();
        assert!(mixer.update(10.0).is_empty());
        assert!(mixer.snapshot().is_empty());
    }

    #[test]
    fn test_single_finished_notification_per_play_through() {
        let mut mixer = mixer();
        mixer.play(id(0));

        assert!(mixer.update(0.5).is_empty());
        assert_eq!(mixer.update(0.6), vec![ClipFinished { action: id(0) }]);
        assert!(mixer.update(0.6).is_empty());
        assert!(mixer.is_finished(id(0)));
        assert_eq!(mixer.action_time(id(0)), Some(1.0));

        mixer.reset(id(0));
        assert!(!mixer.is_finished(id(0)));
        assert_eq!(mixer.update(1.0), vec![ClipFinished { action: id(0) }]);
    }

    #[test]
    fn test_cross_fade_between_actions() {
        let mut mixer = mixer();
        mixer.play(id(0));
        mixer.update(1.0);

        mixer.fade_out(id(0), 0.5);
        mixer.reset(id(1));
        mixer.set_effective_time_scale(id(1), 1.0);
        mixer.set_effective_weight(id(1), 1.0);
        mixer.fade_in(id(1), 0.5);
        mixer.play(id(1));

        mixer.update(0.25);
        let snapshot = mixer.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert!((snapshot[0].weight - 0.5).abs() < 1e-6);
        assert!((snapshot[1].weight - 0.5).abs() < 1e-6);

        let finished = mixer.update(0.25);
        assert_eq!(finished, vec![ClipFinished { action: id(1) }]);
        assert!(!mixer.is_running(id(0)));
        assert_eq!(mixer.effective_weight(id(1)), Some(1.0));
    }

    #[test]
    fn test_unknown_action_ignored() {
        let mut mixer = mixer();
        mixer.play(id(9));
        mixer.fade_out(id(9), 0.5);
        assert!(mixer.update(1.0).is_empty());
    }

    #[test]
    fn test_mixer_time_accumulates() {
        let mut mixer = mixer();
        mixer.update(0.25);
        mixer.update(0.25);
        assert!((mixer.time() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_negative_step_does_not_rewind() {
        let mut mixer = mixer();
        mixer.play(id(0));
        mixer.update(0.25);
        assert!(mixer.update(-1.0).is_empty());
        assert!((mixer.time() - 0.25).abs() < 1e-9);
        assert!((mixer.action_time(id(0)).unwrap() - 0.25).abs() < 1e-6);
    }
}
