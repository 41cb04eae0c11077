//! Hitscan sidearm: draw, fire, reload.

use glam::Vec3;
use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use crate::events::{EventBus, GameEvent, WEAPON_FIRED};
use crate::timer::Countdown;
use crate::world::{ObstructionTest, RayHit};
use crate::{DEFAULT_FIRE_INTERVAL, DEFAULT_MAGAZINE_SIZE, DEFAULT_RELOAD_TIME, DEFAULT_WEAPON_RANGE};

/// Weapon tuning.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct WeaponConfig {
    /// Minimum seconds between shots.
    pub fire_interval: f32,
    /// Rounds in a full magazine.
    pub magazine_size: u32,
    /// Seconds a reload takes.
    pub reload_time: f32,
    /// Furthest distance a shot can hit.
    pub range: f32,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            fire_interval: DEFAULT_FIRE_INTERVAL,
            magazine_size: DEFAULT_MAGAZINE_SIZE,
            reload_time: DEFAULT_RELOAD_TIME,
            range: DEFAULT_WEAPON_RANGE,
        }
    }
}

/// Result of a shot that left the barrel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShotOutcome {
    /// The shot struck a surface.
    Hit(RayHit),
    /// Nothing was within range.
    Miss,
}

/// Why a trigger pull did not fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TriggerBlocked {
    /// The weapon is put away.
    #[error("weapon is holstered")]
    Holstered,
    /// A reload is in progress.
    #[error("weapon is reloading")]
    Reloading,
    /// The magazine is empty.
    #[error("magazine is empty")]
    Empty,
    /// The previous shot was too recent.
    #[error("weapon is cycling")]
    Cycling,
}

/// A player weapon tracking ammunition, fire rate and reloads.
#[derive(Debug, Clone)]
pub struct Weapon {
    config: WeaponConfig,
    drawn: bool,
    ammo: u32,
    last_shot_at: Option<f64>,
    reload: Option<Countdown>,
}

impl Default for Weapon {
    fn default() -> Self {
        Self::new(WeaponConfig::default())
    }
}

impl Weapon {
    /// A holstered weapon with a full magazine.
    #[must_use]
    pub const fn new(config: WeaponConfig) -> Self {
        Self {
            ammo: config.magazine_size,
            config,
            drawn: false,
            last_shot_at: None,
            reload: None,
        }
    }

    /// Whether the weapon is in hand.
    #[must_use]
    pub const fn is_drawn(&self) -> bool {
        self.drawn
    }

    /// Rounds left in the magazine.
    #[must_use]
    pub const fn ammo(&self) -> u32 {
        self.ammo
    }

    /// Whether a reload is in progress.
    #[must_use]
    pub const fn is_reloading(&self) -> bool {
        self.reload.is_some()
    }

    /// Takes the weapon out. Returns `false` if it already was.
    pub fn draw(&mut self) -> bool {
        if self.drawn {
            return false;
        }
        self.drawn = true;
        info!("weapon drawn");
        true
    }

    /// Puts the weapon away. Returns `false` if it already was.
    pub fn holster(&mut self) -> bool {
        if !self.drawn {
            return false;
        }
        self.drawn = false;
        info!("weapon holstered");
        true
    }

    /// Pulls the trigger at time `now`, shooting from `origin` along
    /// `direction`.
    ///
    /// A shot consumes a round and publishes [`WEAPON_FIRED`] whether or not
    /// it hits.
    ///
    /// # Errors
    /// [`TriggerBlocked`] names the reason no shot was fired.
    pub fn trigger<O>(
        &mut self,
        now: f64,
        origin: Vec3,
        direction: Vec3,
        world: &O,
        bus: &mut EventBus,
    ) -> Result<ShotOutcome, TriggerBlocked>
    where
        O: ObstructionTest + ?Sized,
    {
        if !self.drawn {
            return Err(TriggerBlocked::Holstered);
        }
        if self.reload.is_some() {
            return Err(TriggerBlocked::Reloading);
        }
        if self.ammo == 0 {
            return Err(TriggerBlocked::Empty);
        }
        if let Some(last) = self.last_shot_at {
            if now - last < f64::from(self.config.fire_interval) {
                return Err(TriggerBlocked::Cycling);
            }
        }

        self.ammo -= 1;
        self.last_shot_at = Some(now);
        let outcome = direction
            .try_normalize()
            .and_then(|aim| world.cast(origin, aim, self.config.range))
            .map_or(ShotOutcome::Miss, ShotOutcome::Hit);
        match outcome {
            ShotOutcome::Hit(hit) => debug!(
                "shot hit collider {} at {:.2}",
                hit.collider.0, hit.distance
            ),
            ShotOutcome::Miss => debug!("shot missed"),
        }
        info!("ammo {}/{}", self.ammo, self.config.magazine_size);
        bus.publish(&GameEvent::named(WEAPON_FIRED));
        Ok(outcome)
    }

    /// Starts a reload unless one is running or the magazine is full.
    pub fn reload(&mut self) -> bool {
        if self.reload.is_some() || self.ammo >= self.config.magazine_size {
            return false;
        }
        debug!("reloading");
        self.reload = Some(Countdown::start(self.config.reload_time));
        true
    }

    /// Advances a running reload. Returns `true` on the tick it completes.
    pub fn tick(&mut self, delta: f32) -> bool {
        let Some(timer) = self.reload.as_mut() else {
            return false;
        };
        if !timer.tick(delta) {
            return false;
        }
        self.reload = None;
        self.ammo = self.config.magazine_size;
        info!("reloaded, ammo {}/{}", self.ammo, self.config.magazine_size);
        true
    }
}
