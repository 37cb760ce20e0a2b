//! Per-clip playback state

use serde::Serialize;

use super::clip::Clip;

/// Linear ramp of an action's fade factor
#[derive(Debug, Clone, Copy)]
struct WeightFade {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
}

impl WeightFade {
    fn factor(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = (self.elapsed / self.duration).min(1.0);
        self.from + (self.to - self.from) * t
    }

    fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Blend view of one running action for a single frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionSnapshot {
    pub clip: String,
    pub time: f32,
    pub weight: f32,
    pub fading: bool,
}

/// A playable instance bound to one clip, always play-once and clamped
#[derive(Debug, Clone)]
pub(super) struct ClipAction {
    clip: Clip,
    time: f32,
    time_scale: f32,
    weight: f32,
    fade_factor: f32,
    fade: Option<WeightFade>,
    running: bool,
    finished: bool,
}

impl ClipAction {
    pub(super) fn new(clip: Clip) -> Self {
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            weight: 1.0,
            fade_factor: 1.0,
            fade: None,
            running: false,
            finished: false,
        }
    }

    pub(super) fn clip(&self) -> &Clip {
        &self.clip
    }

    pub(super) fn time(&self) -> f32 {
        self.time
    }

    pub(super) fn is_running(&self) -> bool {
        self.running
    }

    pub(super) fn is_finished(&self) -> bool {
        self.finished
    }

    pub(super) fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    pub(super) fn effective_weight(&self) -> f32 {
        self.weight * self.fade_factor
    }

    pub(super) fn play(&mut self) {
        self.running = true;
    }

    pub(super) fn reset(&mut self) {
        self.time = 0.0;
        self.finished = false;
        self.fade = None;
        self.fade_factor = 1.0;
    }

    pub(super) fn set_time_scale(&mut self, time_scale: f32) {
        self.time_scale = time_scale.max(0.0);
    }

    pub(super) fn set_weight(&mut self, weight: f32) {
        self.weight = weight.clamp(0.0, 1.0);
    }

    pub(super) fn fade_in(&mut self, duration: f32) {
        self.schedule_fade(0.0, 1.0, duration);
    }

    pub(super) fn fade_out(&mut self, duration: f32) {
        self.schedule_fade(self.fade_factor, 0.0, duration);
    }

    fn schedule_fade(&mut self, from: f32, to: f32, duration: f32) {
        self.fade_factor = from;
        self.fade = Some(WeightFade {
            from,
            to,
            elapsed: 0.0,
            duration: duration.max(0.0),
        });
    }

    /// Advance by `dt` seconds of mixer time
    ///
    /// Returns true only on the frame the clip reaches its end.
    pub(super) fn advance(&mut self, dt: f32) -> bool {
        if !self.running {
            return false;
        }

        let mut just_finished = false;
        if !self.is_finished() {
            self.time += dt * self.time_scale;
            if self.time >= self.clip.duration {
                // Clamp: hold the last frame until reset
                self.time = self.clip.duration;
                self.finished = true;
                just_finished = true;
            }
        }

        if let Some(mut fade) = self.fade {
            fade.elapsed += dt;
            self.fade_factor = fade.factor();
            if fade.is_done() {
                self.fade = None;
                if fade.to <= 0.0 {
                    self.running = false;
                }
            } else {
                self.fade = Some(fade);
            }
        }

        just_finished
    }

    pub(super) fn snapshot(&self) -> ActionSnapshot {
        ActionSnapshot {
            clip: self.clip.name.clone(),
            time: self.time(),
            weight: self.effective_weight(),
            fading: self.is_fading(),
        }
    }
}
