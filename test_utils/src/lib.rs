//! Shared fixtures for the integration tests.
//!
//! Stand-ins for the host engine's collaborators plus small builders for
//! agents and targets.

use glam::Vec3;
use vigil::combat::{CombatConfig, GuardConfig, PatrolConfig, SentryConfig};
use vigil::dialogue::{DialogueError, DialoguePresenter, DialogueSource};
use vigil::world::{ColliderId, DamageReceiver, ObstructionTest, RayHit};
use vigil::Sighted;

/// Collider id the fixtures give the player.
pub const PLAYER: ColliderId = ColliderId(1);

/// One notification received by a [`RecordingPresenter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shown {
    /// `sequence_started`
    Started(String),
    /// `speaker_changed`
    Speaker(Option<String>),
    /// `text_updated`
    Text(String),
    /// `typing_tick`
    Tick(String),
    /// `sequence_finished`
    Finished(String),
}

/// Presenter that records every notification in order.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    shown: Vec<Shown>,
}

impl RecordingPresenter {
    /// Every notification so far.
    #[must_use]
    pub fn shown(&self) -> &[Shown] {
        &self.shown
    }

    /// Just the text updates, in order.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.shown
            .iter()
            .filter_map(|shown| match shown {
                Shown::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Ids of scripts reported started.
    #[must_use]
    pub fn started(&self) -> Vec<&str> {
        self.shown
            .iter()
            .filter_map(|shown| match shown {
                Shown::Started(id) => Some(id.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Ids of scripts reported finished.
    #[must_use]
    pub fn finished(&self) -> Vec<&str> {
        self.shown
            .iter()
            .filter_map(|shown| match shown {
                Shown::Finished(id) => Some(id.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Forgets everything recorded so far.
    pub fn clear(&mut self) {
        self.shown.clear();
    }
}

impl DialoguePresenter for RecordingPresenter {
    fn sequence_started(&mut self, id: &str) {
        self.shown.push(Shown::Started(id.to_owned()));
    }

    fn speaker_changed(&mut self, speaker: Option<&str>) {
        self.shown.push(Shown::Speaker(speaker.map(str::to_owned)));
    }

    fn text_updated(&mut self, text: &str) {
        self.shown.push(Shown::Text(text.to_owned()));
    }

    fn typing_tick(&mut self, clip: &str) {
        self.shown.push(Shown::Tick(clip.to_owned()));
    }

    fn sequence_finished(&mut self, id: &str) {
        self.shown.push(Shown::Finished(id.to_owned()));
    }
}

/// Dialogue documents held in memory, keyed like files.
#[derive(Debug, Default)]
pub struct MemorySource {
    documents: Vec<(String, String)>,
}

impl MemorySource {
    /// Stores `json` under `key` and returns `self` for chaining.
    #[must_use]
    pub fn with(mut self, key: &str, json: &str) -> Self {
        self.documents.push((key.to_owned(), json.to_owned()));
        self
    }
}

impl DialogueSource for MemorySource {
    fn load(&self, key: &str) -> Result<String, DialogueError> {
        self.documents
            .iter()
            .find(|(stored, _)| stored == key)
            .map(|(_, json)| json.clone())
            .ok_or_else(|| DialogueError::Io {
                key: key.to_owned(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
    }
}

/// Line-of-sight oracle that ignores geometry.
///
/// Clear by default; a blocker reports a hit on every cast.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptedObstruction {
    blocker: Option<ColliderId>,
}

impl ScriptedObstruction {
    /// Nothing blocks any ray.
    #[must_use]
    pub const fn clear() -> Self {
        Self { blocker: None }
    }

    /// Every ray stops at `collider` one unit from its origin.
    #[must_use]
    pub const fn blocked_by(collider: ColliderId) -> Self {
        Self {
            blocker: Some(collider),
        }
    }
}

impl ObstructionTest for ScriptedObstruction {
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let collider = self.blocker?;
        let distance = max_distance.min(1.0);
        Some(RayHit {
            collider,
            point: origin + direction * distance,
            distance,
        })
    }
}

/// Damage receiver that remembers every blow.
#[derive(Debug, Default)]
pub struct DamageLog {
    /// Amounts applied, in order.
    pub blows: Vec<f32>,
}

impl DamageLog {
    /// Sum of all damage applied.
    #[must_use]
    pub fn total(&self) -> f32 {
        self.blows.iter().sum()
    }
}

impl DamageReceiver for DamageLog {
    fn apply(&mut self, amount: f32) {
        self.blows.push(amount);
    }
}

/// The player as a perception target at `position`.
#[must_use]
pub const fn player_at(position: Vec3) -> Sighted {
    Sighted {
        collider: PLAYER,
        position,
    }
}

/// Combat settings for a guard walking between `waypoints` with no dwell.
#[must_use]
pub fn patrolling(waypoints: Vec<Vec3>) -> CombatConfig {
    CombatConfig {
        guard: GuardConfig::Patrol(PatrolConfig {
            waypoints,
            dwell: 0.0,
            ..PatrolConfig::default()
        }),
        ..CombatConfig::default()
    }
}

/// Combat settings for a guard holding its post without spinning.
#[must_use]
pub fn posted() -> CombatConfig {
    CombatConfig {
        guard: GuardConfig::Sentry(SentryConfig {
            spin_deg_per_sec: 0.0,
            ..SentryConfig::default()
        }),
        ..CombatConfig::default()
    }
}
