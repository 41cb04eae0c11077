//! Hit points for anything that can be struck.

use log::info;
use serde::Deserialize;

use crate::events::{EventBus, GameEvent, PLAYER_DIED};
use crate::world::DamageReceiver;
use crate::DEFAULT_PLAYER_HEALTH;

/// Current and maximum health.
///
/// Damage never takes `current` below zero. Death is reported once, however
/// many blows land after it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "HealthSettings")]
pub struct Health {
    current: f32,
    max: f32,
    death_reported: bool,
}

#[derive(Deserialize)]
#[serde(default)]
struct HealthSettings {
    max: f32,
}

impl Default for HealthSettings {
    fn default() -> Self {
        Self {
            max: DEFAULT_PLAYER_HEALTH,
        }
    }
}

impl From<HealthSettings> for Health {
    fn from(settings: HealthSettings) -> Self {
        Self::new(settings.max)
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(DEFAULT_PLAYER_HEALTH)
    }
}

impl Health {
    /// Full health of `max`; negative or non-finite values give zero.
    #[must_use]
    pub fn new(max: f32) -> Self {
        let full = if max.is_finite() { max.max(0.0) } else { 0.0 };
        Self {
            current: full,
            max: full,
            death_reported: false,
        }
    }

    /// Remaining health.
    #[must_use]
    pub const fn current(&self) -> f32 {
        self.current
    }

    /// Maximum health.
    #[must_use]
    pub const fn max(&self) -> f32 {
        self.max
    }

    /// Whether health has run out.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    /// Restores up to `amount`, capped at the maximum.
    ///
    /// The dead stay dead.
    pub fn heal(&mut self, amount: f32) {
        if self.is_dead() || !amount.is_finite() || amount <= 0.0 {
            return;
        }
        self.current = (self.current + amount).min(self.max);
    }

    /// Returns `true` exactly once, on the first call after death.
    pub fn take_death(&mut self) -> bool {
        if self.is_dead() && !self.death_reported {
            self.death_reported = true;
            true
        } else {
            false
        }
    }

    /// Publishes [`PLAYER_DIED`] the first time this is called after death.
    ///
    /// Returns whether the event was published.
    pub fn report_death(&mut self, bus: &mut EventBus) -> bool {
        if !self.take_death() {
            return false;
        }
        info!("player died");
        bus.publish(&GameEvent::named(PLAYER_DIED));
        true
    }
}

impl DamageReceiver for Health {
    fn apply(&mut self, amount: f32) {
        if !amount.is_finite() || amount <= 0.0 {
            return;
        }
        self.current = (self.current - amount).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn damage_clamps_at_zero() {
        let mut health = Health::new(25.0);
        health.apply(10.0);
        assert!((health.current() - 15.0).abs() < f32::EPSILON);
        health.apply(100.0);
        assert!(health.current().abs() < f32::EPSILON);
        assert!(health.is_dead());
    }

    #[rstest]
    #[case(-5.0)]
    #[case(f32::NAN)]
    fn ignores_nonsense_damage(#[case] amount: f32) {
        let mut health = Health::new(10.0);
        health.apply(amount);
        assert!((health.current() - 10.0).abs() < f32::EPSILON);
    }

    #[rstest]
    fn death_is_reported_once() {
        let mut health = Health::new(5.0);
        assert!(!health.take_death());
        health.apply(5.0);
        assert!(health.take_death());
        health.apply(5.0);
        assert!(!health.take_death());
    }

    #[rstest]
    fn report_death_publishes_once() {
        let mut bus = EventBus::new();
        let latch = bus.latch(PLAYER_DIED);
        let mut health = Health::new(1.0);
        health.apply(1.0);
        assert!(health.report_death(&mut bus));
        assert!(latch.fired());
        assert!(!health.report_death(&mut bus));
    }

    #[rstest]
    fn heal_caps_at_max_and_skips_the_dead() {
        let mut health = Health::new(20.0);
        health.apply(15.0);
        health.heal(50.0);
        assert!((health.current() - 20.0).abs() < f32::EPSILON);
        health.apply(20.0);
        health.heal(5.0);
        assert!(health.is_dead());
    }

    #[rstest]
    fn deserialises_from_max() -> serde_json::Result<()> {
        let health: Health = serde_json::from_str(r#"{ "max": 40.0 }"#)?;
        assert!((health.current() - 40.0).abs() < f32::EPSILON);
        let fallback: Health = serde_json::from_str("{}")?;
        assert!((fallback.max() - DEFAULT_PLAYER_HEALTH).abs() < f32::EPSILON);
        Ok(())
    }
}
