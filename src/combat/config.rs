//! Tuning for combat agents.
//!
//! Every settings struct deserialises with `#[serde(default)]`, so hosts can
//! author partial JSON and inherit the remaining values.

use glam::Vec3;
use serde::Deserialize;
use thiserror::Error;

use crate::perception::SightCone;
use crate::{
    DEFAULT_APPROACH_SPEED, DEFAULT_ARRIVAL_TOLERANCE, DEFAULT_ATTACK_TURN_RATE,
    DEFAULT_FLASH_DURATION, DEFAULT_PATROL_DWELL, DEFAULT_PATROL_SPEED, DEFAULT_PATROL_TURN_RATE,
    DEFAULT_SENTRY_RETURN_RATE, DEFAULT_SENTRY_SPIN_DEG_PER_SEC, DEFAULT_STOP_DISTANCE,
    DEFAULT_STRIKE_COOLDOWN, DEFAULT_STRIKE_DAMAGE, DEFAULT_STRIKE_RANGE,
};

/// Configuration problems that leave an agent inert.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A patrolling agent was given no waypoints.
    #[error("patrol route has no waypoints")]
    NoWaypoints,
    /// A numeric setting is out of its allowed range.
    #[error("setting `{field}` is out of range: {value}")]
    InvalidValue {
        /// Dotted path of the offending setting.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },
}

/// Order in which a patrol visits its waypoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteMode {
    /// After the last waypoint, head back to the first.
    #[default]
    Loop,
    /// Walk the list forwards, then backwards, and so on.
    PingPong,
}

/// What an agent does when it loses sight of its target mid-attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LostSightPolicy {
    /// Drop back to the guard behaviour on the same tick, cancelling any
    /// strike flash in progress.
    #[default]
    Interrupt,
    /// Hold position until the current strike flash has run out, then drop
    /// back. No new strikes are started while the target is unseen.
    FinishStrike,
}

/// Walking a waypoint route.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PatrolConfig {
    /// Waypoints in visiting order.
    pub waypoints: Vec<Vec3>,
    /// How the route wraps at its ends.
    pub mode: RouteMode,
    /// Walking speed in units per second.
    pub speed: f32,
    /// Seconds to stand at each waypoint; zero moves on at once.
    pub dwell: f32,
    /// Horizontal distance at which a waypoint counts as reached.
    pub arrival_tolerance: f32,
    /// Turn smoothing factor; the facing closes this fraction of the gap per
    /// second.
    pub turn_rate: f32,
    /// Place the agent on the first waypoint when it spawns.
    pub snap_to_start: bool,
}

impl Default for PatrolConfig {
    fn default() -> Self {
        Self {
            waypoints: Vec::new(),
            mode: RouteMode::default(),
            speed: DEFAULT_PATROL_SPEED,
            dwell: DEFAULT_PATROL_DWELL,
            arrival_tolerance: DEFAULT_ARRIVAL_TOLERANCE,
            turn_rate: DEFAULT_PATROL_TURN_RATE,
            snap_to_start: true,
        }
    }
}

impl PatrolConfig {
    /// Patrol between two points, the classic guard route.
    #[must_use]
    pub fn between(from: Vec3, to: Vec3) -> Self {
        Self {
            waypoints: vec![from, to],
            ..Self::default()
        }
    }
}

/// Standing guard: spin in place and drift back to the spawn point.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SentryConfig {
    /// Idle spin in degrees per second.
    pub spin_deg_per_sec: f32,
    /// Fraction of the remaining distance home covered per second.
    pub return_rate: f32,
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            spin_deg_per_sec: DEFAULT_SENTRY_SPIN_DEG_PER_SEC,
            return_rate: DEFAULT_SENTRY_RETURN_RATE,
        }
    }
}

/// Behaviour while no target is visible.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GuardConfig {
    /// Walk a waypoint route.
    Patrol(PatrolConfig),
    /// Hold a post.
    Sentry(SentryConfig),
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self::Patrol(PatrolConfig::default())
    }
}

/// Approach and strike tuning.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct AttackConfig {
    /// Speed used to close in on the target.
    pub approach_speed: f32,
    /// Distance at which the agent stops closing in.
    pub stop_distance: f32,
    /// Distance within which a strike connects.
    pub strike_range: f32,
    /// Damage dealt per strike.
    pub damage: f32,
    /// Minimum seconds between strikes.
    pub cooldown: f32,
    /// Seconds the strike flash stays on.
    pub flash_duration: f32,
    /// Turn smoothing factor while facing the target.
    pub turn_rate: f32,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            approach_speed: DEFAULT_APPROACH_SPEED,
            stop_distance: DEFAULT_STOP_DISTANCE,
            strike_range: DEFAULT_STRIKE_RANGE,
            damage: DEFAULT_STRIKE_DAMAGE,
            cooldown: DEFAULT_STRIKE_COOLDOWN,
            flash_duration: DEFAULT_FLASH_DURATION,
            turn_rate: DEFAULT_ATTACK_TURN_RATE,
        }
    }
}

/// Complete configuration of a combat agent.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Field of view used to spot the target.
    pub sight: SightCone,
    /// Behaviour while the target is unseen.
    pub guard: GuardConfig,
    /// Approach and strike tuning.
    pub attack: AttackConfig,
    /// Reaction to losing sight mid-attack.
    pub lost_sight: LostSightPolicy,
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { field, value })
    }
}

impl CombatConfig {
    /// Checks the configuration for values that would leave the agent
    /// unable to act.
    ///
    /// # Errors
    /// Returns [`ConfigError::NoWaypoints`] for a patrol without waypoints
    /// and [`ConfigError::InvalidValue`] for negative or non-finite numbers.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("sight.half_angle_deg", self.sight.half_angle_deg)?;
        non_negative("sight.max_distance", self.sight.max_distance)?;
        // Below the origin is allowed for bodies rooted at head height.
        finite("sight.eye_height", self.sight.eye_height)?;
        non_negative("attack.approach_speed", self.attack.approach_speed)?;
        non_negative("attack.stop_distance", self.attack.stop_distance)?;
        non_negative("attack.strike_range", self.attack.strike_range)?;
        non_negative("attack.damage", self.attack.damage)?;
        non_negative("attack.cooldown", self.attack.cooldown)?;
        non_negative("attack.flash_duration", self.attack.flash_duration)?;
        non_negative("attack.turn_rate", self.attack.turn_rate)?;
        match &self.guard {
            GuardConfig::Patrol(patrol) => {
                if patrol.waypoints.is_empty() {
                    return Err(ConfigError::NoWaypoints);
                }
                non_negative("guard.speed", patrol.speed)?;
                non_negative("guard.dwell", patrol.dwell)?;
                non_negative("guard.arrival_tolerance", patrol.arrival_tolerance)?;
                non_negative("guard.turn_rate", patrol.turn_rate)
            }
            GuardConfig::Sentry(sentry) => {
                finite("guard.spin_deg_per_sec", sentry.spin_deg_per_sec)?;
                non_negative("guard.return_rate", sentry.return_rate)
            }
        }
    }
}
