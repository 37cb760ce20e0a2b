//! Core sequencer implementation
//!
//! Walks a prompt one letter per finished clip, cross-fading between
//! distinct clips. The rest pose plays first after every restart and is not
//! counted against the cursor.

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::animation::{ActionId, AnimationHost, ClipFinished};
use crate::events::ViewerEvent;
use crate::prompt::{LetterToken, Prompt};

use super::registry::ActionRegistry;

/// Fade-out and fade-in length of a transition, in seconds
pub const FADE_DURATION_SECS: f32 = 0.5;

/// The two states of the sequencer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum State {
    /// Nothing left to play
    #[default]
    Idle,
    /// At least one playable letter remains at or after the cursor
    Playing,
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            State::Idle => write!(f, "Idle"),
            State::Playing => write!(f, "Playing"),
        }
    }
}

/// Schedules letter clips against an animation host
pub struct Sequencer {
    /// Current prompt; replaced whole on each commit
    prompt: Prompt,
    /// Index of the next letter to play, in `0..=prompt.len()`
    cursor: usize,
    /// Handles for the loaded model, if any
    registry: Option<ActionRegistry>,
    /// Action driving playback right now
    current: Option<ActionId>,
    /// Action that was replaced by the last transition
    previous: Option<ActionId>,
    /// Set once the final clip of the prompt has finished
    completed: bool,
    /// Channel for emitting playback events
    event_tx: broadcast::Sender<ViewerEvent>,
}

impl Sequencer {
    /// Create a sequencer with an empty prompt and no model
    pub fn new(event_tx: broadcast::Sender<ViewerEvent>) -> Self {
        Self {
            prompt: Prompt::default(),
            cursor: 0,
            registry: None,
            current: None,
            previous: None,
            completed: false,
            event_tx,
        }
    }

    pub fn prompt(&self) -> &Prompt {
        &self.prompt
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current_action(&self) -> Option<ActionId> {
        self.current
    }

    /// Whether the final clip has finished (or there was nothing to play)
    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Get the current state
    pub fn state(&self) -> State {
        let Some(registry) = &self.registry else {
            return State::Idle;
        };

        let pending = self.prompt.tokens()[self.cursor..]
            .iter()
            .any(|&letter| registry.letter(letter).is_some());

        if pending {
            State::Playing
        } else {
            State::Idle
        }
    }

    /// Replace the prompt and drop all in-flight playback state
    ///
    /// Playback does not start until the next `restart`.
    pub fn set_prompt(&mut self, prompt: Prompt) {
        debug!(letters = %prompt, "prompt replaced");
        self.prompt = prompt;
        self.cursor = 0;
        self.current = None;
        self.previous = None;
        self.completed = false;
    }

    /// Forget the registry and active handles, keeping the prompt
    pub fn detach(&mut self) {
        self.registry = None;
        self.cursor = 0;
        self.current = None;
        self.previous = None;
        self.completed = false;
    }

    /// Start from the rest pose against a freshly built registry
    pub fn restart<H: AnimationHost>(&mut self, host: &mut H, registry: ActionRegistry) {
        let idle = registry.idle();

        self.registry = Some(registry);
        self.cursor = 0;
        self.previous = None;
        self.current = Some(idle);
        self.completed = false;

        host.reset(idle);
        host.play(idle);

        info!(
            letters = %self.prompt,
            state = %self.state(),
            "sequencer restarted"
        );
        self.emit(ViewerEvent::RestPose {
            pending: self.prompt.len(),
        });
    }

    /// Handle a finished notification from the host
    ///
    /// Returns the action that was started, if any.
    pub fn advance<H: AnimationHost>(
        &mut self,
        host: &mut H,
        finished: ClipFinished,
    ) -> Option<ActionId> {
        if self.current != Some(finished.action) {
            debug!(action = finished.action.index(), "ignoring stale finished notification");
            return None;
        }

        let (letter, next) = self.next_playable()?;

        self.previous = self.current.replace(next);
        let cross_fade = match self.previous {
            Some(previous) if previous != next => {
                host.fade_out(previous, FADE_DURATION_SECS);
                true
            }
            _ => false,
        };

        host.reset(next);
        host.set_effective_time_scale(next, 1.0);
        host.set_effective_weight(next, 1.0);
        if cross_fade {
            host.fade_in(next, FADE_DURATION_SECS);
        }
        host.play(next);

        self.cursor += 1;

        info!(
            letter = %letter,
            cursor = self.cursor,
            cross_fade,
            "letter started"
        );
        self.emit(ViewerEvent::ClipStarted {
            letter,
            cursor: self.cursor,
            cross_fade,
        });

        Some(next)
    }

    /// Find the next letter that has a clip, skipping those that don't
    fn next_playable(&mut self) -> Option<(LetterToken, ActionId)> {
        let registry = self.registry.as_ref()?;

        while let Some(letter) = self.prompt.get(self.cursor) {
            if let Some(action) = registry.letter(letter) {
                return Some((letter, action));
            }

            warn!(letter = %letter, cursor = self.cursor, "no clip for letter, skipping");
            self.cursor += 1;
            self.emit(ViewerEvent::LetterSkipped {
                letter,
                cursor: self.cursor,
            });
        }

        if !self.completed {
            self.completed = true;
            if !self.prompt.is_empty() {
                info!(letters = self.prompt.len(), "sequence complete");
                self.emit(ViewerEvent::SequenceComplete {
                    letters: self.prompt.len(),
                });
            }
        }

        None
    }

    fn emit(&self, event: ViewerEvent) {
        debug!(%event, "emitting event");
        let _ = self.event_tx.send(event);
    }
}

#[cfg(test)]
impl Sequencer {
    fn previous_action(&self) -> Option<ActionId> {
        self.previous
    }

    fn has_registry(&self) -> bool {
        self.registry.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every host call instead of animating anything
    #[derive(Debug, Default)]
    struct FakeHost {
        calls: Vec<HostCall>,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum HostCall {
        Play(ActionId),
        Reset(ActionId),
        TimeScale(ActionId, f32),
        Weight(ActionId, f32),
        FadeIn(ActionId, f32),
        FadeOut(ActionId, f32),
    }

    impl FakeHost {
        fn played(&self) -> Vec<ActionId> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    HostCall::Play(id) => Some(*id),
                    _ => None,
                })
                .collect()
        }

        fn fades(&self) -> usize {
            self.calls
                .iter()
                .filter(|call| matches!(call, HostCall::FadeIn(..) | HostCall::FadeOut(..)))
                .count()
        }
    }

    impl AnimationHost for FakeHost {
        fn play(&mut self, action: ActionId) {
            self.calls.push(HostCall::Play(action));
        }
        fn reset(&mut self, action: ActionId) {
            self.calls.push(HostCall::Reset(action));
        }
        fn set_effective_time_scale(&mut self, action: ActionId, time_scale: f32) {
            self.calls.push(HostCall::TimeScale(action, time_scale));
        }
        fn set_effective_weight(&mut self, action: ActionId, weight: f32) {
            self.calls.push(HostCall::Weight(action, weight));
        }
        fn fade_in(&mut self, action: ActionId, duration: f32) {
            self.calls.push(HostCall::FadeIn(action, duration));
        }
        fn fade_out(&mut self, action: ActionId, duration: f32) {
            self.calls.push(HostCall::FadeOut(action, duration));
        }
    }

    const IDLE: usize = 0;

    /// Handle index for a letter: idle is 0, `a` is 1, ... `z` is 26
    fn handle(c: char) -> ActionId {
        ActionId::from(c as usize - 'a' as usize + 1)
    }

    fn registry_for(letters: &str) -> ActionRegistry {
        let names: Vec<(ActionId, String)> = std::iter::once((ActionId::from(IDLE), "idle".to_string()))
            .chain(letters.chars().map(|c| (handle(c), c.to_string())))
            .collect();
        ActionRegistry::from_actions(names.iter().map(|(id, name)| (*id, name.as_str()))).unwrap()
    }

    fn full_registry() -> ActionRegistry {
        registry_for("abcdefghijklmnopqrstuvwxyz")
    }

    fn create_sequencer() -> (Sequencer, broadcast::Receiver<ViewerEvent>) {
        let (tx, rx) = broadcast::channel(64);
        (Sequencer::new(tx), rx)
    }

    /// Deliver a finished notification for whatever is currently active
    fn finish_current(sequencer: &mut Sequencer, host: &mut FakeHost) -> Option<ActionId> {
        let action = sequencer.current_action()?;
        sequencer.advance(host, ClipFinished { action })
    }

    fn drain(rx: &mut broadcast::Receiver<ViewerEvent>) -> Vec<ViewerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_initial_state() {
        let (sequencer, _) = create_sequencer();
        assert_eq!(sequencer.state(), State::Idle);
        assert_eq!(sequencer.cursor(), 0);
        assert!(sequencer.current_action().is_none());
    }

    #[test]
    fn test_restart_plays_rest_pose() {
        let (mut sequencer, mut rx) = create_sequencer();
        let mut host = FakeHost::default();

        sequencer.set_prompt(Prompt::from_input("abc"));
        sequencer.restart(&mut host, full_registry());

        assert_eq!(host.played(), vec![ActionId::from(IDLE)]);
        assert_eq!(sequencer.current_action(), Some(ActionId::from(IDLE)));
        assert_eq!(sequencer.cursor(), 0);
        assert_eq!(sequencer.state(), State::Playing);
        assert_eq!(drain(&mut rx), vec![ViewerEvent::RestPose { pending: 3 }]);
    }

    #[test]
    fn test_sequence_abc() {
        let (mut sequencer, _) = create_sequencer();
        let mut host = FakeHost::default();

        sequencer.set_prompt(Prompt::from_input("abc"));
        sequencer.restart(&mut host, full_registry());

        let mut cursors = vec![sequencer.cursor()];
        for _ in 0..3 {
            assert!(finish_current(&mut sequencer, &mut host).is_some());
            cursors.push(sequencer.cursor());
        }

        assert_eq!(
            host.played(),
            vec![ActionId::from(IDLE), handle('a'), handle('b'), handle('c')]
        );
        assert_eq!(cursors, vec![0, 1, 2, 3]);
        assert_eq!(sequencer.state(), State::Idle);

        // A fourth notification is a no-op
        let calls_before = host.calls.len();
        assert!(finish_current(&mut sequencer, &mut host).is_none());
        assert_eq!(host.calls.len(), calls_before);
        assert_eq!(sequencer.cursor(), 3);
        assert_eq!(sequencer.current_action(), Some(handle('c')));
    }

    #[test]
    fn test_transition_call_order() {
        let (mut sequencer, _) = create_sequencer();
        let mut host = FakeHost::default();

        sequencer.set_prompt(Prompt::from_input("a"));
        sequencer.restart(&mut host, full_registry());
        host.calls.clear();

        finish_current(&mut sequencer, &mut host);

        let idle = ActionId::from(IDLE);
        let a = handle('a');
        assert_eq!(
            host.calls,
            vec![
                HostCall::FadeOut(idle, FADE_DURATION_SECS),
                HostCall::Reset(a),
                HostCall::TimeScale(a, 1.0),
                HostCall::Weight(a, 1.0),
                HostCall::FadeIn(a, FADE_DURATION_SECS),
                HostCall::Play(a),
            ]
        );
        assert_eq!(sequencer.previous_action(), Some(idle));
    }

    #[test]
    fn test_repeated_letter_skips_cross_fade() {
        let (mut sequencer, mut rx) = create_sequencer();
        let mut host = FakeHost::default();

        sequencer.set_prompt(Prompt::from_input("aa"));
        sequencer.restart(&mut host, full_registry());

        finish_current(&mut sequencer, &mut host);
        assert_eq!(host.fades(), 2);
        host.calls.clear();

        finish_current(&mut sequencer, &mut host);
        assert_eq!(host.fades(), 0);
        assert_eq!(host.played(), vec![handle('a')]);
        assert!(host.calls.contains(&HostCall::Reset(handle('a'))));

        let events = drain(&mut rx);
        assert!(events.contains(&ViewerEvent::ClipStarted {
            letter: LetterToken::new('a').unwrap(),
            cursor: 2,
            cross_fade: false,
        }));
    }

    #[test]
    fn test_empty_prompt_stays_idle() {
        for input in ["", "123"] {
            let (mut sequencer, mut rx) = create_sequencer();
            let mut host = FakeHost::default();

            sequencer.set_prompt(Prompt::from_input(input));
            sequencer.restart(&mut host, full_registry());
            assert_eq!(sequencer.state(), State::Idle);

            assert!(finish_current(&mut sequencer, &mut host).is_none());
            assert_eq!(host.played(), vec![ActionId::from(IDLE)]);
            assert_eq!(sequencer.cursor(), 0);
            assert!(sequencer.is_complete());

            // No completion event for an empty prompt
            assert_eq!(drain(&mut rx), vec![ViewerEvent::RestPose { pending: 0 }]);
        }
    }

    #[test]
    fn test_sequence_complete_emitted_once() {
        let (mut sequencer, mut rx) = create_sequencer();
        let mut host = FakeHost::default();

        sequencer.set_prompt(Prompt::from_input("b"));
        sequencer.restart(&mut host, full_registry());
        finish_current(&mut sequencer, &mut host);
        finish_current(&mut sequencer, &mut host);
        finish_current(&mut sequencer, &mut host);

        let completions = drain(&mut rx)
            .into_iter()
            .filter(|e| matches!(e, ViewerEvent::SequenceComplete { .. }))
            .count();
        assert_eq!(completions, 1);
    }

    #[test]
    fn test_unknown_letter_skipped() {
        let (mut sequencer, mut rx) = create_sequencer();
        let mut host = FakeHost::default();

        // Model only has clips for a and c
        sequencer.set_prompt(Prompt::from_input("abc"));
        sequencer.restart(&mut host, registry_for("ac"));

        finish_current(&mut sequencer, &mut host);
        assert_eq!(sequencer.cursor(), 1);

        let started = finish_current(&mut sequencer, &mut host);
        assert_eq!(started, Some(handle('c')));
        assert_eq!(sequencer.cursor(), 3);
        assert_eq!(
            host.played(),
            vec![ActionId::from(IDLE), handle('a'), handle('c')]
        );

        let events = drain(&mut rx);
        assert!(events.contains(&ViewerEvent::LetterSkipped {
            letter: LetterToken::new('b').unwrap(),
            cursor: 2,
        }));
    }

    #[test]
    fn test_only_unknown_letters_is_idle() {
        let (mut sequencer, _) = create_sequencer();
        let mut host = FakeHost::default();

        sequencer.set_prompt(Prompt::from_input("zz"));
        sequencer.restart(&mut host, registry_for("a"));
        assert_eq!(sequencer.state(), State::Idle);

        assert!(finish_current(&mut sequencer, &mut host).is_none());
        assert_eq!(sequencer.cursor(), 2);
        assert!(sequencer.is_complete());
    }

    #[test]
    fn test_stale_notification_ignored() {
        let (mut sequencer, _) = create_sequencer();
        let mut host = FakeHost::default();

        sequencer.set_prompt(Prompt::from_input("ab"));
        sequencer.restart(&mut host, full_registry());
        host.calls.clear();

        let stale = ClipFinished { action: handle('q') };
        assert!(sequencer.advance(&mut host, stale).is_none());
        assert!(host.calls.is_empty());
        assert_eq!(sequencer.cursor(), 0);
    }

    #[test]
    fn test_recommit_restarts_from_zero() {
        let (mut sequencer, _) = create_sequencer();
        let mut host = FakeHost::default();

        sequencer.set_prompt(Prompt::from_input("hello"));
        sequencer.restart(&mut host, full_registry());
        finish_current(&mut sequencer, &mut host);
        finish_current(&mut sequencer, &mut host);
        assert_eq!(sequencer.cursor(), 2);

        sequencer.set_prompt(Prompt::from_input("hello"));
        assert_eq!(sequencer.cursor(), 0);
        assert!(sequencer.current_action().is_none());

        host.calls.clear();
        sequencer.restart(&mut host, full_registry());
        // No fade-out is scheduled for the abandoned clip
        assert_eq!(host.fades(), 0);
        assert_eq!(sequencer.prompt(), &Prompt::from_input("hello"));
    }

    #[test]
    fn test_detach_keeps_prompt() {
        let (mut sequencer, _) = create_sequencer();
        let mut host = FakeHost::default();

        sequencer.set_prompt(Prompt::from_input("hands"));
        sequencer.restart(&mut host, full_registry());
        finish_current(&mut sequencer, &mut host);
        finish_current(&mut sequencer, &mut host);
        assert_eq!(sequencer.cursor(), 2);

        sequencer.detach();
        assert_eq!(sequencer.state(), State::Idle);
        assert!(!sequencer.has_registry());
        assert_eq!(sequencer.prompt().len(), 5);

        sequencer.restart(&mut host, full_registry());
        assert_eq!(sequencer.cursor(), 0);
        assert_eq!(sequencer.state(), State::Playing);
    }

    #[test]
    fn test_advance_without_registry_is_noop() {
        let (mut sequencer, _) = create_sequencer();
        let mut host = FakeHost::default();

        sequencer.set_prompt(Prompt::from_input("a"));
        let finished = ClipFinished { action: ActionId::from(IDLE) };
        assert!(sequencer.advance(&mut host, finished).is_none());
        assert!(host.calls.is_empty());
    }
}
