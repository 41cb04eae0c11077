//! Tick-driven dialogue playback.
//!
//! A [`DialogueSequencer`] plays one script at a time. Each line may first
//! wait for a named event, then reveals its text one character per typing
//! delay, then waits for the player to advance. Player input arrives as
//! per-tick requests ([`DialogueSequencer::skip`],
//! [`DialogueSequencer::advance`]) that the next [`DialogueSequencer::tick`]
//! consumes.

use log::{debug, info, warn};
use serde::Deserialize;

use super::presenter::DialoguePresenter;
use super::script::{load_script, DialogueError, DialogueLine, DialogueScript};
use super::source::DialogueSource;
use crate::events::{EventBus, EventLatch, GameEvent, DIALOGUE_FINISHED, DIALOGUE_STARTED};
use crate::DEFAULT_TYPING_TICK_EVERY;

/// Sequencer tuning.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SequencerConfig {
    /// Revealed characters between typing sound ticks; zero is treated as one.
    pub typing_tick_every: usize,
    /// Seconds a line waits for its event before giving up and continuing.
    /// `None` waits forever.
    pub event_wait_timeout: Option<f32>,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            typing_tick_every: DEFAULT_TYPING_TICK_EVERY,
            event_wait_timeout: None,
        }
    }
}

/// Where playback currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackPhase {
    /// No script is playing.
    Idle,
    /// The current line waits for its event.
    WaitingForEvent,
    /// The current line is being revealed.
    Typing,
    /// The current line is fully shown and waits for an advance.
    WaitingForAdvance,
}

#[derive(Debug)]
enum LinePhase {
    WaitingForEvent { latch: EventLatch, waited: f32 },
    Typing { since_reveal: f32 },
    WaitingForAdvance,
}

#[derive(Debug, Clone, Copy, Default)]
struct Input {
    skip: bool,
    advance: bool,
}

#[derive(Debug)]
struct Playback {
    script: DialogueScript,
    line: usize,
    phase: LinePhase,
    text: String,
    typed: usize,
}

impl Playback {
    fn start<P>(script: DialogueScript, presenter: &mut P, bus: &mut EventBus) -> Self
    where
        P: DialoguePresenter,
    {
        let mut playback = Self {
            script,
            line: 0,
            phase: LinePhase::WaitingForAdvance,
            text: String::new(),
            typed: 0,
        };
        playback.enter_line(presenter, bus);
        playback
    }

    fn current_line(&self) -> Option<&DialogueLine> {
        self.script.lines().get(self.line)
    }

    fn enter_line<P>(&mut self, presenter: &mut P, bus: &mut EventBus)
    where
        P: DialoguePresenter,
    {
        self.text.clear();
        self.typed = 0;
        let wait = self
            .current_line()
            .and_then(DialogueLine::wait_event)
            .map(str::to_owned);
        match wait {
            Some(event) => {
                debug!("line {} waits for event '{event}'", self.line);
                self.phase = LinePhase::WaitingForEvent {
                    latch: bus.latch(event),
                    waited: 0.0,
                };
            }
            None => self.begin_typing(presenter),
        }
    }

    fn begin_typing<P>(&mut self, presenter: &mut P)
    where
        P: DialoguePresenter,
    {
        let speaker = self
            .current_line()
            .and_then(|line| self.script.speaker_for(line));
        presenter.speaker_changed(speaker);
        self.phase = LinePhase::Typing { since_reveal: 0.0 };
    }

    /// Reveals the next character once the typing delay has elapsed. The
    /// first character of a line needs no delay.
    fn type_next<P>(&mut self, delta: f32, presenter: &mut P, tick_every: usize)
    where
        P: DialoguePresenter,
    {
        let Some(line) = self.script.lines().get(self.line) else {
            return;
        };
        let LinePhase::Typing { since_reveal } = &mut self.phase else {
            return;
        };
        if !self.text.is_empty() {
            *since_reveal += delta;
            if *since_reveal < self.script.delay_for(line) {
                return;
            }
        }
        *since_reveal = 0.0;

        let next = line
            .text
            .get(self.text.len()..)
            .and_then(|rest| rest.chars().next());
        if let Some(ch) = next {
            self.text.push(ch);
            self.typed += 1;
            presenter.text_updated(&self.text);
            if self.typed % tick_every == 0 {
                if let Some(clip) = self.script.audio_clip_for(line) {
                    presenter.typing_tick(clip);
                }
            }
        } else {
            presenter.text_updated(&self.text);
        }
        if self.text.len() >= line.text.len() {
            self.phase = LinePhase::WaitingForAdvance;
        }
    }

    fn reveal_all<P>(&mut self, presenter: &mut P)
    where
        P: DialoguePresenter,
    {
        let Some(line) = self.script.lines().get(self.line) else {
            return;
        };
        debug!("line {} skipped to its end", self.line);
        self.text.clone_from(&line.text);
        presenter.text_updated(&self.text);
        self.phase = LinePhase::WaitingForAdvance;
    }

    /// Runs one tick. Returns `true` once the last line has been dismissed.
    fn step<P>(
        &mut self,
        delta: f32,
        input: Input,
        presenter: &mut P,
        config: &SequencerConfig,
        bus: &mut EventBus,
    ) -> bool
    where
        P: DialoguePresenter,
    {
        let tick_every = config.typing_tick_every.max(1);
        match &mut self.phase {
            LinePhase::WaitingForEvent { latch, waited } => {
                if latch.fired() {
                    debug!("event '{}' published, continuing dialogue", latch.name());
                } else {
                    *waited += delta;
                    match config.event_wait_timeout {
                        Some(limit) if *waited >= limit => warn!(
                            "gave up waiting for event '{}' after {limit}s",
                            latch.name()
                        ),
                        _ => return false,
                    }
                }
                self.begin_typing(presenter);
                self.type_next(delta, presenter, tick_every);
                false
            }
            LinePhase::Typing { .. } => {
                if input.skip {
                    self.reveal_all(presenter);
                } else {
                    self.type_next(delta, presenter, tick_every);
                }
                false
            }
            LinePhase::WaitingForAdvance => {
                if !input.advance {
                    return false;
                }
                if self.line + 1 >= self.script.lines().len() {
                    return true;
                }
                self.line += 1;
                debug!("advancing to line {}", self.line);
                self.enter_line(presenter, bus);
                self.type_next(delta, presenter, tick_every);
                false
            }
        }
    }
}

/// Plays dialogue scripts line by line into a [`DialoguePresenter`].
#[derive(Debug)]
pub struct DialogueSequencer<P> {
    presenter: P,
    config: SequencerConfig,
    playback: Option<Playback>,
    input: Input,
}

impl<P> DialogueSequencer<P>
where
    P: DialoguePresenter,
{
    /// A sequencer with the given tuning.
    #[must_use]
    pub fn new(presenter: P, config: SequencerConfig) -> Self {
        Self {
            presenter,
            config,
            playback: None,
            input: Input::default(),
        }
    }

    /// A sequencer with default tuning.
    #[must_use]
    pub fn with_presenter(presenter: P) -> Self {
        Self::new(presenter, SequencerConfig::default())
    }

    /// The presenter receiving notifications.
    #[must_use]
    pub const fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Mutable access to the presenter.
    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Consumes the sequencer, returning its presenter.
    #[must_use]
    pub fn into_presenter(self) -> P {
        self.presenter
    }

    /// Active tuning.
    #[must_use]
    pub const fn config(&self) -> &SequencerConfig {
        &self.config
    }

    /// Starts `script`, cancelling whatever was playing.
    ///
    /// The cancelled script does not report finishing. Publishes
    /// [`DIALOGUE_STARTED`] with the script id as detail.
    pub fn play(&mut self, script: DialogueScript, bus: &mut EventBus) {
        if let Some(old) = self.playback.take() {
            info!(
                "dialogue '{}' cancelled by '{}'",
                old.script.id(),
                script.id()
            );
        }
        self.input = Input::default();
        let id = script.id().to_owned();
        info!("dialogue '{id}' started ({} lines)", script.lines().len());
        self.presenter.sequence_started(&id);
        bus.publish(&GameEvent::with_detail(DIALOGUE_STARTED, id));
        self.playback = Some(Playback::start(script, &mut self.presenter, bus));
    }

    /// Parses `json` and plays the entry named `id`.
    ///
    /// # Errors
    /// Any [`DialogueError`] from parsing or lookup; the current playback is
    /// left untouched.
    pub fn play_json(
        &mut self,
        json: &str,
        id: &str,
        bus: &mut EventBus,
    ) -> Result<(), DialogueError> {
        let script = load_script(json, id)?;
        self.play(script, bus);
        Ok(())
    }

    /// Loads the document stored under `key` and plays the entry named `id`.
    ///
    /// # Errors
    /// Any [`DialogueError`] from the source, parsing or lookup.
    pub fn play_from<S>(
        &mut self,
        source: &S,
        key: &str,
        id: &str,
        bus: &mut EventBus,
    ) -> Result<(), DialogueError>
    where
        S: DialogueSource + ?Sized,
    {
        let json = source.load(key)?;
        self.play_json(&json, id, bus)
    }

    /// Cancels playback without reporting it finished.
    ///
    /// Returns the id of the cancelled script.
    pub fn stop(&mut self) -> Option<String> {
        self.input = Input::default();
        let playback = self.playback.take()?;
        let id = playback.script.id().to_owned();
        info!("dialogue '{id}' stopped");
        Some(id)
    }

    /// Requests that the line being typed is shown in full on the next tick.
    pub fn skip(&mut self) {
        self.input.skip = true;
    }

    /// Requests a move past the fully shown line on the next tick.
    pub fn advance(&mut self) {
        self.input.advance = true;
    }

    /// A single "continue" press: skips typing, or advances a finished line.
    ///
    /// A press that completes a line never also dismisses it.
    pub fn press(&mut self) {
        self.skip();
        self.advance();
    }

    /// Whether a script is playing.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.playback.is_some()
    }

    /// Current playback phase.
    #[must_use]
    pub fn phase(&self) -> PlaybackPhase {
        match self.playback.as_ref().map(|playback| &playback.phase) {
            None => PlaybackPhase::Idle,
            Some(LinePhase::WaitingForEvent { .. }) => PlaybackPhase::WaitingForEvent,
            Some(LinePhase::Typing { .. }) => PlaybackPhase::Typing,
            Some(LinePhase::WaitingForAdvance) => PlaybackPhase::WaitingForAdvance,
        }
    }

    /// Id of the playing script.
    #[must_use]
    pub fn current_id(&self) -> Option<&str> {
        self.playback.as_ref().map(|playback| playback.script.id())
    }

    /// Index of the current line.
    #[must_use]
    pub fn line_index(&self) -> Option<usize> {
        self.playback.as_ref().map(|playback| playback.line)
    }

    /// Text revealed so far on the current line.
    #[must_use]
    pub fn visible_text(&self) -> &str {
        self.playback
            .as_ref()
            .map_or("", |playback| playback.text.as_str())
    }

    /// Advances playback by `elapsed` seconds and consumes pending input.
    ///
    /// Publishes [`DIALOGUE_FINISHED`] with the script id when the last line
    /// is dismissed.
    pub fn tick(&mut self, elapsed: f32, bus: &mut EventBus) {
        let delta = if elapsed.is_finite() {
            elapsed.max(0.0)
        } else {
            0.0
        };
        let input = std::mem::take(&mut self.input);
        let Some(mut playback) = self.playback.take() else {
            return;
        };
        if playback.step(delta, input, &mut self.presenter, &self.config, bus) {
            let id = playback.script.id();
            info!("dialogue '{id}' finished");
            self.presenter.sequence_finished(id);
            bus.publish(&GameEvent::with_detail(DIALOGUE_FINISHED, id));
        } else {
            self.playback = Some(playback);
        }
    }
}
