//! Viewer session: scene, mixer and sequencer behind one event loop

use std::ops::ControlFlow;

use tokio::sync::{broadcast, mpsc};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, trace, Level};

use crate::animation::AnimationMixer;
use crate::config::Config;
use crate::events::ViewerEvent;
use crate::input::InputEvent;
use crate::model::{Handedness, LoadOutcome, LoadedModel, ModelLoader};
use crate::prompt::Prompt;
use crate::state::{ActionRegistry, RegistryError, Sequencer};

use super::scene::Scene;

/// Owns everything the viewer shows and plays
pub struct ViewerSession {
    config: Config,
    scene: Scene,
    /// Mixer over the current model's clips; rebuilt on every restart
    mixer: Option<AnimationMixer>,
    sequencer: Sequencer,
    handedness: Handedness,
    loader: ModelLoader,
    event_tx: broadcast::Sender<ViewerEvent>,
}

impl ViewerSession {
    /// Create a session with nothing loaded
    pub fn new(
        config: Config,
        loader: ModelLoader,
        event_tx: broadcast::Sender<ViewerEvent>,
    ) -> Self {
        Self {
            handedness: config.handedness,
            config,
            scene: Scene::new(),
            mixer: None,
            sequencer: Sequencer::new(event_tx.clone()),
            loader,
            event_tx,
        }
    }

    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn mixer(&self) -> Option<&AnimationMixer> {
        self.mixer.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_pending()
    }

    /// Whether nothing more will happen without new input
    pub fn is_settled(&self) -> bool {
        !self.is_loading() && (self.mixer.is_none() || self.sequencer.is_complete())
    }

    /// Request the model for the configured handedness
    pub fn start(&mut self) {
        self.request_model();
    }

    /// Run the session until quit, or until input closes and playback settles
    pub async fn run(
        &mut self,
        mut input_rx: mpsc::Receiver<InputEvent>,
        mut load_rx: mpsc::Receiver<LoadOutcome>,
    ) {
        info!(handedness = %self.handedness, "viewer session started");

        let mut frames = tokio::time::interval(self.config.frame_interval());
        frames.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_frame = Instant::now();
        let mut input_open = true;

        loop {
            tokio::select! {
                event = input_rx.recv(), if input_open => match event {
                    Some(event) => {
                        if self.handle_input(event).is_break() {
                            break;
                        }
                    }
                    None => {
                        info!("input closed, exiting once playback settles");
                        input_open = false;
                    }
                },

                Some(outcome) = load_rx.recv() => {
                    self.handle_load(outcome);
                }

                _ = frames.tick() => {
                    let now = Instant::now();
                    let dt = now.duration_since(last_frame).as_secs_f32();
                    last_frame = now;

                    self.tick(dt);

                    if !input_open && self.is_settled() {
                        break;
                    }
                }
            }
        }

        info!("viewer session stopped");
    }

    /// Apply one input event; `Break` means the user asked to quit
    pub fn handle_input(&mut self, event: InputEvent) -> ControlFlow<()> {
        match event {
            InputEvent::Commit(text) => self.commit(&text),
            InputEvent::SelectHandedness(handedness) => self.select_handedness(handedness),
            InputEvent::Quit => {
                info!("quit requested");
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    /// Replace the prompt with the letters of `raw` and restart playback
    pub fn commit(&mut self, raw: &str) {
        let prompt = Prompt::from_input(raw);
        info!(letters = %prompt, "prompt committed");
        self.emit(ViewerEvent::PromptCommitted {
            letters: prompt.to_string(),
        });

        self.sequencer.set_prompt(prompt);
        self.restart();
    }

    /// Switch to the model for `handedness`; reasserting the current one is a no-op
    pub fn select_handedness(&mut self, handedness: Handedness) {
        if handedness == self.handedness {
            debug!(%handedness, "handedness already selected");
            return;
        }

        let from = std::mem::replace(&mut self.handedness, handedness);
        let (right, left) = handedness.controls();
        info!(%from, to = %handedness, right, left, "handedness changed");
        self.emit(ViewerEvent::HandednessChanged {
            from,
            to: handedness,
        });

        self.scene.remove_model();
        self.mixer = None;
        self.sequencer.detach();
        self.request_model();
    }

    /// Place a freshly loaded model and restart against the current prompt
    pub fn handle_load(&mut self, outcome: LoadOutcome) {
        let Some(outcome) = self.loader.accept(outcome) else {
            return;
        };
        let handedness = outcome.handedness;

        let model = match outcome.result {
            Ok(model) => model,
            Err(e) => {
                error!(%handedness, error = %e, "failed to load model");
                self.emit(ViewerEvent::ModelLoadFailed {
                    handedness,
                    reason: e.to_string(),
                });
                return;
            }
        };

        let (mut mixer, registry) = match build_playback(&model) {
            Ok(playback) => playback,
            Err(e) => {
                error!(%handedness, source = ?model.source, error = %e, "model is not playable");
                self.emit(ViewerEvent::ModelLoadFailed {
                    handedness,
                    reason: e.to_string(),
                });
                return;
            }
        };

        let clips = model.clips.len();
        let joints = model.joint_count;
        info!(%handedness, clips, letters = registry.letter_count(), "model loaded");

        self.scene.insert_model(model, self.config.show_skeleton);
        if let Some(skeleton) = self.scene.skeleton() {
            debug!(
                joints = skeleton.joint_count,
                visible = skeleton.visible,
                "skeleton overlay added"
            );
        }
        self.emit(ViewerEvent::ModelLoaded {
            handedness,
            clips,
            joints,
        });

        self.sequencer.restart(&mut mixer, registry);
        self.mixer = Some(mixer);
    }

    /// Advance animation time and feed finished clips to the sequencer
    pub fn tick(&mut self, dt: f32) {
        let Some(mixer) = self.mixer.as_mut() else {
            return;
        };

        for finished in mixer.update(dt) {
            self.sequencer.advance(mixer, finished);
        }

        if tracing::enabled!(Level::TRACE) {
            trace!(time = mixer.time(), pose = ?mixer.snapshot(), "frame");
        }
    }

    /// Rebuild the mixer from the current model and play from the rest pose
    fn restart(&mut self) {
        let Some(model) = self.scene.model() else {
            debug!("no model in scene, playback starts once one loads");
            return;
        };

        match build_playback(model) {
            Ok((mut mixer, registry)) => {
                self.sequencer.restart(&mut mixer, registry);
                self.mixer = Some(mixer);
            }
            Err(e) => {
                error!(error = %e, "cannot restart playback");
                self.mixer = None;
                self.sequencer.detach();
            }
        }
    }

    fn request_model(&mut self) {
        let path = self.config.model_path(self.handedness);
        self.loader.request(self.handedness, path);
        self.emit(ViewerEvent::ModelRequested {
            handedness: self.handedness,
        });
    }

    fn emit(&self, event: ViewerEvent) {
        debug!(%event, "emitting event");
        let _ = self.event_tx.send(event);
    }
}

/// Fresh mixer and registry for a model
fn build_playback(model: &LoadedModel) -> Result<(AnimationMixer, ActionRegistry), RegistryError> {
    let mixer = AnimationMixer::new(&model.clips);
    let registry = ActionRegistry::from_actions(mixer.actions())?;
    Ok((mixer, registry))
}
