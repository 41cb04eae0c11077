//! NPC combat: guard behaviour, target pursuit and cooldown-gated strikes.
//!
//! Each [`CombatAgent`] feeds the perception test's answer into a two-state
//! machine once per tick:
//!
//! - `Patrol` runs the configured guard behaviour (waypoint patrol or
//!   sentry post) and switches to `Attacking` on the tick the target becomes
//!   visible.
//! - `Attacking` turns towards the target, closes in, and strikes when in
//!   range and off cooldown. It switches back on the tick the target is lost,
//!   subject to [`LostSightPolicy`].
//!
//! Agents report what happened through a [`CombatOutbox`] that the host
//! drains each frame to drive effects, sounds and UI.

use log::trace;

mod agent;
pub mod config;
pub mod patrol;

pub use agent::{AgentStatus, CombatAgent, Target};
pub use config::{
    AttackConfig, CombatConfig, ConfigError, GuardConfig, LostSightPolicy, PatrolConfig,
    RouteMode, SentryConfig,
};
pub use patrol::PatrolRoute;

/// The two states an agent cycles between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CombatState {
    /// Running the guard behaviour.
    #[default]
    Patrol,
    /// Pursuing and striking the target.
    Attacking,
}

/// Something an agent did during a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CombatEvent {
    /// The target became visible.
    TargetSpotted,
    /// The target stopped being visible.
    TargetLost,
    /// The agent switched to attacking.
    Engaged,
    /// The agent went back to its guard behaviour.
    Disengaged,
    /// A strike was made.
    Struck {
        /// Damage dealt.
        damage: f32,
        /// Agent time of the strike, in seconds.
        at: f64,
        /// Whether the target had a health collaborator to receive it.
        delivered: bool,
    },
    /// The strike flash switched on.
    FlashStarted,
    /// The strike flash reverted.
    FlashEnded,
    /// A patrolling agent arrived at a waypoint.
    WaypointReached {
        /// Index of the waypoint on the route.
        index: usize,
    },
}

/// Combat events an agent raised since the host last drained them.
#[derive(Debug, Default)]
pub struct CombatOutbox {
    events: Vec<CombatEvent>,
}

impl CombatOutbox {
    pub(crate) fn record(&mut self, event: CombatEvent) {
        trace!("combat event {event:?}");
        self.events.push(event);
    }

    /// Removes and yields all pending events, oldest first.
    pub fn drain(&mut self) -> std::vec::Drain<'_, CombatEvent> {
        self.events.drain(..)
    }

    /// Pending events, oldest first.
    #[must_use]
    pub fn as_slice(&self) -> &[CombatEvent] {
        &self.events
    }

    /// Number of pending events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Damage that reached a health collaborator across pending strikes.
    ///
    /// Strikes at a target without health count for nothing.
    #[must_use]
    pub fn damage_dealt(&self) -> f32 {
        self.events
            .iter()
            .map(|event| match event {
                CombatEvent::Struck {
                    damage,
                    delivered: true,
                    ..
                } => *damage,
                _ => 0.0,
            })
            .sum()
    }

    /// Waypoint indices reached, in arrival order.
    pub fn waypoints_reached(&self) -> impl Iterator<Item = usize> + '_ {
        self.events.iter().filter_map(|event| match event {
            CombatEvent::WaypointReached { index } => Some(*index),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn strike(damage: f32, delivered: bool) -> CombatEvent {
        CombatEvent::Struck {
            damage,
            at: 0.0,
            delivered,
        }
    }

    #[rstest]
    fn only_delivered_strikes_count_as_damage() {
        let mut outbox = CombatOutbox::default();
        assert_relative_eq!(outbox.damage_dealt(), 0.0);
        outbox.record(CombatEvent::Engaged);
        outbox.record(strike(10.0, true));
        outbox.record(strike(25.0, false));
        outbox.record(CombatEvent::FlashStarted);
        outbox.record(strike(2.5, true));
        assert_relative_eq!(outbox.damage_dealt(), 12.5);
        assert_eq!(outbox.len(), 5);
    }

    #[rstest]
    fn waypoints_come_out_in_arrival_order() {
        let mut outbox = CombatOutbox::default();
        for index in [2, 0, 1] {
            outbox.record(CombatEvent::WaypointReached { index });
            outbox.record(CombatEvent::TargetLost);
        }
        assert_eq!(outbox.waypoints_reached().collect::<Vec<_>>(), vec![2, 0, 1]);
    }

    #[rstest]
    fn draining_resets_the_tallies() {
        let mut outbox = CombatOutbox::default();
        outbox.record(strike(10.0, true));
        outbox.record(CombatEvent::WaypointReached { index: 1 });
        assert_eq!(outbox.drain().count(), 2);
        assert!(outbox.is_empty());
        assert_relative_eq!(outbox.damage_dealt(), 0.0);
        assert_eq!(outbox.waypoints_reached().count(), 0);
    }
}
