//! Patrol/attack state machine for a single NPC.

use glam::Vec3;
use log::{debug, error, info};

use super::config::{AttackConfig, CombatConfig, ConfigError, GuardConfig, LostSightPolicy};
use super::patrol::Guard;
use super::{CombatEvent, CombatOutbox, CombatState};
use crate::perception::{assess, Observer, SightCone, Sighted, Visibility};
use crate::timer::Countdown;
use crate::vector_math::{flatten, turn_towards};
use crate::world::{DamageReceiver, Locomotion, ObstructionTest};

/// Whether an agent is able to act.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentStatus {
    /// The agent perceives, patrols and attacks.
    Active,
    /// The agent's configuration is unusable; it stays inert.
    Disabled(ConfigError),
}

/// The tracked target handed to [`CombatAgent::tick`].
pub struct Target<'a> {
    /// Identity and position used by the visibility test.
    pub sighted: Sighted,
    /// Health to strike, when the target has one.
    pub health: Option<&'a mut dyn DamageReceiver>,
}

impl<'a> Target<'a> {
    /// A target whose strikes land on `health`.
    #[must_use]
    pub fn new(sighted: Sighted, health: &'a mut dyn DamageReceiver) -> Self {
        Self {
            sighted,
            health: Some(health),
        }
    }

    /// A target that can be seen and chased but not hurt.
    #[must_use]
    pub const fn untouchable(sighted: Sighted) -> Self {
        Self {
            sighted,
            health: None,
        }
    }
}

/// An NPC cycling between its guard behaviour and attacking a target.
///
/// The agent owns only its decision state. Position and facing belong to the
/// host and are reached through [`Locomotion`] on every tick.
#[derive(Debug)]
pub struct CombatAgent {
    name: String,
    sight: SightCone,
    attack: AttackConfig,
    lost_sight: LostSightPolicy,
    guard: Option<Guard>,
    status: AgentStatus,
    state: CombatState,
    clock: f64,
    last_strike_at: Option<f64>,
    flash: Option<Countdown>,
    saw_target: bool,
    outbox: CombatOutbox,
}

impl CombatAgent {
    /// Spawns an agent driving `body`.
    ///
    /// A patrolling agent is placed on its first waypoint when the route asks
    /// for it; a sentry takes the body's current position as its post. An
    /// unusable configuration is logged and yields a disabled agent rather
    /// than an error.
    #[must_use]
    pub fn new<L>(label: impl Into<String>, config: CombatConfig, body: &mut L) -> Self
    where
        L: Locomotion + ?Sized,
    {
        let name = label.into();
        let validation = config.validate();
        let CombatConfig {
            sight,
            guard,
            attack,
            lost_sight,
        } = config;

        let built = validation.and_then(|()| match guard {
            GuardConfig::Patrol(patrol) => Guard::patrol(patrol, body).ok_or(ConfigError::NoWaypoints),
            GuardConfig::Sentry(sentry) => Ok(Guard::sentry(sentry, body)),
        });
        let (guard, status) = match built {
            Ok(guard) => (Some(guard), AgentStatus::Active),
            Err(err) => {
                error!("combat agent '{name}' disabled: {err}");
                (None, AgentStatus::Disabled(err))
            }
        };

        Self {
            name,
            sight,
            attack,
            lost_sight,
            guard,
            status,
            state: CombatState::Patrol,
            clock: 0.0,
            last_strike_at: None,
            flash: None,
            saw_target: false,
            outbox: CombatOutbox::default(),
        }
    }

    /// Name used in log output.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> CombatState {
        self.state
    }

    /// Whether the agent is active or disabled by its configuration.
    #[must_use]
    pub const fn status(&self) -> &AgentStatus {
        &self.status
    }

    /// Seconds of simulated time this agent has ticked through.
    #[must_use]
    pub const fn clock(&self) -> f64 {
        self.clock
    }

    /// Agent time of the most recent strike.
    #[must_use]
    pub const fn last_strike_at(&self) -> Option<f64> {
        self.last_strike_at
    }

    /// Whether the strike flash is currently showing.
    #[must_use]
    pub const fn is_flashing(&self) -> bool {
        self.flash.is_some()
    }

    /// Whether the target was visible on the latest tick.
    #[must_use]
    pub const fn sees_target(&self) -> bool {
        self.saw_target
    }

    /// Events raised since the last drain.
    #[must_use]
    pub fn events(&self) -> &[CombatEvent] {
        self.outbox.as_slice()
    }

    /// Pending events together with their damage and waypoint tallies.
    #[must_use]
    pub const fn outbox(&self) -> &CombatOutbox {
        &self.outbox
    }

    /// Removes and returns the pending events.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, CombatEvent> {
        self.outbox.drain()
    }

    /// Advances the agent by `elapsed` seconds.
    ///
    /// Visibility is re-evaluated first; the state changes on the same tick
    /// the target appears or disappears, and the behaviour of the resulting
    /// state runs immediately. A missing target counts as unseen.
    pub fn tick<L, O>(
        &mut self,
        elapsed: f32,
        body: &mut L,
        target: Option<Target<'_>>,
        world: &O,
    ) -> CombatState
    where
        L: Locomotion + ?Sized,
        O: ObstructionTest + ?Sized,
    {
        let delta = if elapsed.is_finite() { elapsed.max(0.0) } else { 0.0 };
        self.clock += f64::from(delta);
        if matches!(self.status, AgentStatus::Disabled(_)) {
            return self.state;
        }

        self.tick_flash(delta);

        let observer = Observer {
            position: body.position(),
            forward: body.forward(),
        };
        let visibility = assess(
            &observer,
            target.as_ref().map(|t| &t.sighted),
            &self.sight,
            world,
        );
        self.note_visibility(visibility);
        let visible = visibility.is_visible();

        match (self.state, visible) {
            (CombatState::Patrol, true) => self.engage(),
            (CombatState::Attacking, false) => {
                let holding = self.lost_sight == LostSightPolicy::FinishStrike && self.flash.is_some();
                if !holding {
                    self.disengage();
                }
            }
            _ => {}
        }

        match (self.state, target) {
            (CombatState::Attacking, Some(found)) if visible => self.pursue(delta, body, found),
            (CombatState::Attacking, _) => {}
            (CombatState::Patrol, _) => {
                if let Some(guard) = self.guard.as_mut() {
                    guard.step(delta, body, &mut self.outbox);
                }
            }
        }
        self.state
    }

    fn note_visibility(&mut self, visibility: Visibility) {
        let visible = visibility.is_visible();
        if visible == self.saw_target {
            return;
        }
        self.saw_target = visible;
        if visible {
            debug!("{}: target spotted", self.name);
            self.outbox.record(CombatEvent::TargetSpotted);
        } else {
            debug!("{}: target lost ({visibility:?})", self.name);
            self.outbox.record(CombatEvent::TargetLost);
        }
    }

    fn tick_flash(&mut self, delta: f32) {
        if let Some(flash) = self.flash.as_mut() {
            if flash.tick(delta) {
                self.flash = None;
                self.outbox.record(CombatEvent::FlashEnded);
            }
        }
    }

    fn engage(&mut self) {
        info!("{}: engaging target", self.name);
        self.state = CombatState::Attacking;
        self.outbox.record(CombatEvent::Engaged);
    }

    fn disengage(&mut self) {
        info!("{}: lost target, returning to guard duty", self.name);
        self.state = CombatState::Patrol;
        if self.flash.take().is_some() {
            self.outbox.record(CombatEvent::FlashEnded);
        }
        if let Some(guard) = self.guard.as_mut() {
            guard.reset_timers();
        }
        self.outbox.record(CombatEvent::Disengaged);
    }

    fn pursue<L>(&mut self, delta: f32, body: &mut L, target: Target<'_>)
    where
        L: Locomotion + ?Sized,
    {
        let to_target = target.sighted.position - body.position();
        let heading = flatten(to_target);
        if heading != Vec3::ZERO {
            let facing = turn_towards(body.forward(), heading, self.attack.turn_rate * delta);
            body.set_orientation(facing);
        }

        let distance = to_target.length();
        if distance > self.attack.stop_distance {
            body.move_towards(target.sighted.position, self.attack.approach_speed, delta);
        }

        if distance <= self.attack.strike_range && self.cooldown_ready() {
            self.strike(target.health);
        }
    }

    fn cooldown_ready(&self) -> bool {
        match self.last_strike_at {
            Some(last) => self.clock - last >= f64::from(self.attack.cooldown),
            None => true,
        }
    }

    fn strike(&mut self, health: Option<&mut dyn DamageReceiver>) {
        self.last_strike_at = Some(self.clock);
        let damage = self.attack.damage;
        let delivered = match health {
            Some(receiver) => {
                receiver.apply(damage);
                true
            }
            None => false,
        };
        info!("{}: strikes for {damage} (delivered: {delivered})", self.name);
        self.outbox.record(CombatEvent::Struck {
            damage,
            at: self.clock,
            delivered,
        });

        if self.flash.is_none() {
            self.outbox.record(CombatEvent::FlashStarted);
        }
        self.flash = Some(Countdown::start(self.attack.flash_duration));
    }
}
