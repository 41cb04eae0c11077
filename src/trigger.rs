//! One-shot trigger volumes that play a dialogue and move the story on.

use log::{info, warn};
use serde::Deserialize;

use crate::dialogue::{DialoguePresenter, DialogueSequencer, DialogueSource};
use crate::events::{EventBus, EventLatch, DIALOGUE_FINISHED};
use crate::stage::StageProgress;
use crate::DEFAULT_PLAYER_TAG;

/// Trigger zone tuning.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    /// Tag of the body allowed to set the trigger off.
    pub player_tag: String,
    /// Fire only on the first entry.
    pub one_shot: bool,
    /// Source key of the dialogue document.
    pub dialogue_key: Option<String>,
    /// Entry to play from that document.
    pub dialogue_id: Option<String>,
    /// Advance the stage once the dialogue finishes.
    pub advance_on_finish: bool,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            player_tag: DEFAULT_PLAYER_TAG.to_owned(),
            one_shot: true,
            dialogue_key: None,
            dialogue_id: None,
            advance_on_finish: true,
        }
    }
}

/// What an entry into the zone did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Wrong tag, or a one-shot zone that already fired.
    Ignored,
    /// A dialogue started; the stage advances when it finishes.
    DialogueStarted,
    /// The stage was advanced immediately.
    StageAdvanced,
    /// The zone fired with nothing to do.
    Fired,
}

/// Services a trigger zone drives when it fires.
pub struct TriggerContext<'a, P, S: ?Sized> {
    /// Sequencer to play the zone's dialogue on.
    pub sequencer: &'a mut DialogueSequencer<P>,
    /// Where the zone's dialogue document is loaded from.
    pub source: &'a S,
    /// Stage list to advance.
    pub stages: &'a mut StageProgress,
    /// Bus for dialogue and stage notifications.
    pub bus: &'a mut EventBus,
}

/// A volume that fires when the player walks into it.
#[derive(Debug)]
pub struct TriggerZone {
    config: TriggerConfig,
    activated: bool,
    awaiting: Option<EventLatch>,
}

impl TriggerZone {
    /// A zone that has not fired yet.
    #[must_use]
    pub const fn new(config: TriggerConfig) -> Self {
        Self {
            config,
            activated: false,
            awaiting: None,
        }
    }

    /// Whether the zone has fired.
    #[must_use]
    pub const fn is_activated(&self) -> bool {
        self.activated
    }

    /// Whether the zone is waiting for its dialogue to finish.
    #[must_use]
    pub const fn is_awaiting_dialogue(&self) -> bool {
        self.awaiting.is_some()
    }

    /// Handles a body tagged `tag` entering the zone.
    ///
    /// A dialogue that cannot be loaded is logged and treated as absent, so
    /// the story still moves on.
    pub fn enter<P, S>(&mut self, tag: &str, ctx: &mut TriggerContext<'_, P, S>) -> Activation
    where
        P: DialoguePresenter,
        S: DialogueSource + ?Sized,
    {
        if self.activated && self.config.one_shot {
            return Activation::Ignored;
        }
        if tag != self.config.player_tag {
            return Activation::Ignored;
        }
        self.activated = true;
        info!("trigger zone activated by '{tag}'");

        if let (Some(key), Some(id)) = (&self.config.dialogue_key, &self.config.dialogue_id) {
            // Only this zone's own dialogue ending counts.
            let finished = ctx.bus.latch_matching(DIALOGUE_FINISHED, id.as_str());
            match ctx.sequencer.play_from(ctx.source, key, id, ctx.bus) {
                Ok(()) => {
                    self.awaiting = Some(finished);
                    return Activation::DialogueStarted;
                }
                Err(err) => warn!("trigger dialogue '{id}' unavailable: {err}"),
            }
        } else {
            warn!("trigger zone has no dialogue configured");
        }

        if self.config.advance_on_finish {
            info!("no dialogue to play, advancing stage immediately");
            ctx.stages.next(ctx.bus);
            Activation::StageAdvanced
        } else {
            Activation::Fired
        }
    }

    /// Advances the stage once the zone's dialogue has finished.
    ///
    /// Call once per tick; returns `true` on the tick the dialogue's end is
    /// noticed.
    pub fn update(&mut self, stages: &mut StageProgress, bus: &mut EventBus) -> bool {
        if !self.awaiting.as_ref().is_some_and(EventLatch::fired) {
            return false;
        }
        self.awaiting = None;
        if self.config.advance_on_finish {
            stages.next(bus);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::DialogueError;
    use rstest::rstest;

    struct NoDocuments;

    impl DialogueSource for NoDocuments {
        fn load(&self, key: &str) -> Result<String, DialogueError> {
            Err(DialogueError::Io {
                key: key.to_owned(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        }
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    fn zone_without_dialogue_advances_at_once(#[case] advance: bool) {
        let mut sequencer = DialogueSequencer::with_presenter(());
        let mut stages = StageProgress::default();
        let mut bus = EventBus::new();
        let mut zone = TriggerZone::new(TriggerConfig {
            advance_on_finish: advance,
            ..TriggerConfig::default()
        });
        let mut ctx = TriggerContext {
            sequencer: &mut sequencer,
            source: &NoDocuments,
            stages: &mut stages,
            bus: &mut bus,
        };
        assert_eq!(zone.enter("Enemy", &mut ctx), Activation::Ignored);
        let expected = if advance {
            Activation::StageAdvanced
        } else {
            Activation::Fired
        };
        assert_eq!(zone.enter("Player", &mut ctx), expected);
        assert_eq!(zone.enter("Player", &mut ctx), Activation::Ignored);
        assert_eq!(stages.index(), usize::from(advance));
    }

    #[rstest]
    fn unreadable_dialogue_still_advances() {
        let mut sequencer = DialogueSequencer::with_presenter(());
        let mut stages = StageProgress::default();
        let mut bus = EventBus::new();
        let mut zone = TriggerZone::new(TriggerConfig {
            dialogue_key: Some("missing".to_owned()),
            dialogue_id: Some("intro".to_owned()),
            ..TriggerConfig::default()
        });
        let mut ctx = TriggerContext {
            sequencer: &mut sequencer,
            source: &NoDocuments,
            stages: &mut stages,
            bus: &mut bus,
        };
        assert_eq!(zone.enter("Player", &mut ctx), Activation::StageAdvanced);
        assert!(!zone.is_awaiting_dialogue());
    }

    #[rstest]
    fn repeatable_zone_fires_again() {
        let mut sequencer = DialogueSequencer::with_presenter(());
        let mut stages = StageProgress::default();
        let mut bus = EventBus::new();
        let mut zone = TriggerZone::new(TriggerConfig {
            one_shot: false,
            ..TriggerConfig::default()
        });
        let mut ctx = TriggerContext {
            sequencer: &mut sequencer,
            source: &NoDocuments,
            stages: &mut stages,
            bus: &mut bus,
        };
        zone.enter("Player", &mut ctx);
        zone.enter("Player", &mut ctx);
        assert_eq!(stages.index(), 2);
    }
}
