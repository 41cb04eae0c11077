//! Guard behaviours run while no target is in sight.

use glam::Vec3;
use log::debug;

use super::config::{PatrolConfig, RouteMode, SentryConfig};
use super::{CombatEvent, CombatOutbox};
use crate::timer::Countdown;
use crate::vector_math::{flatten, horizontal_distance, turn_towards, yaw_by};
use crate::world::Locomotion;
use crate::SENTRY_HOME_TOLERANCE;

/// Cursor over an ordered, non-empty list of waypoints.
#[derive(Debug, Clone, PartialEq)]
pub struct PatrolRoute {
    waypoints: Vec<Vec3>,
    mode: RouteMode,
    current: usize,
    reversing: bool,
}

impl PatrolRoute {
    /// Builds a route starting at the first waypoint.
    ///
    /// Returns `None` when `waypoints` is empty.
    #[must_use]
    pub fn new(waypoints: Vec<Vec3>, mode: RouteMode) -> Option<Self> {
        if waypoints.is_empty() {
            return None;
        }
        Some(Self {
            waypoints,
            mode,
            current: 0,
            reversing: false,
        })
    }

    /// Index of the waypoint being walked to.
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current
    }

    /// Position of the waypoint being walked to.
    #[must_use]
    pub fn current(&self) -> Vec3 {
        self.waypoints
            .get(self.current)
            .copied()
            .unwrap_or_default()
    }

    /// Number of waypoints on the route.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always `false`; routes are never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Selects the next waypoint and returns its index.
    pub fn advance(&mut self) -> usize {
        let count = self.waypoints.len();
        if count < 2 {
            return self.current;
        }
        self.current = match self.mode {
            RouteMode::Loop => (self.current + 1) % count,
            RouteMode::PingPong => {
                if self.reversing && self.current == 0 {
                    self.reversing = false;
                } else if !self.reversing && self.current + 1 == count {
                    self.reversing = true;
                }
                if self.reversing {
                    self.current - 1
                } else {
                    self.current + 1
                }
            }
        };
        self.current
    }
}

/// Idle behaviour of an agent, chosen by its [`super::GuardConfig`].
#[derive(Debug, Clone)]
pub(crate) enum Guard {
    Patrol {
        route: PatrolRoute,
        settings: PatrolConfig,
        dwell: Option<Countdown>,
    },
    Sentry {
        home: Vec3,
        settings: SentryConfig,
    },
}

impl Guard {
    pub(crate) fn patrol<L>(settings: PatrolConfig, body: &mut L) -> Option<Self>
    where
        L: Locomotion + ?Sized,
    {
        let mut route = PatrolRoute::new(settings.waypoints.clone(), settings.mode)?;
        if settings.snap_to_start {
            body.place(route.current());
            route.advance();
        }
        Some(Self::Patrol {
            route,
            settings,
            dwell: None,
        })
    }

    pub(crate) fn sentry<L>(settings: SentryConfig, body: &L) -> Self
    where
        L: Locomotion + ?Sized,
    {
        Self::Sentry {
            home: body.position(),
            settings,
        }
    }

    /// Restarts any dwell in progress, as if the agent had just arrived.
    pub(crate) fn reset_timers(&mut self) {
        if let Self::Patrol {
            dwell: Some(timer), ..
        } = self
        {
            timer.restart();
        }
    }

    pub(crate) fn step<L>(&mut self, delta: f32, body: &mut L, outbox: &mut CombatOutbox)
    where
        L: Locomotion + ?Sized,
    {
        match self {
            Self::Patrol {
                route,
                settings,
                dwell,
            } => step_patrol(route, settings, dwell, delta, body, outbox),
            Self::Sentry { home, settings } => step_sentry(*home, settings, delta, body),
        }
    }
}

fn step_patrol<L>(
    route: &mut PatrolRoute,
    settings: &PatrolConfig,
    dwell: &mut Option<Countdown>,
    delta: f32,
    body: &mut L,
    outbox: &mut CombatOutbox,
) where
    L: Locomotion + ?Sized,
{
    if let Some(timer) = dwell {
        if timer.tick(delta) {
            *dwell = None;
            let next = route.advance();
            debug!("dwell over, heading to waypoint {next}");
        }
        return;
    }

    let destination = route.current();
    let heading = flatten(destination - body.position());
    if heading != Vec3::ZERO {
        let facing = turn_towards(body.forward(), heading, settings.turn_rate * delta);
        body.set_orientation(facing);
    }
    body.move_towards(destination, settings.speed, delta);

    if horizontal_distance(body.position(), destination) <= settings.arrival_tolerance {
        let index = route.current_index();
        outbox.record(CombatEvent::WaypointReached { index });
        if settings.dwell > 0.0 {
            *dwell = Some(Countdown::start(settings.dwell));
        } else {
            route.advance();
        }
    }
}

fn step_sentry<L>(home: Vec3, settings: &SentryConfig, delta: f32, body: &mut L)
where
    L: Locomotion + ?Sized,
{
    body.set_orientation(yaw_by(body.forward(), settings.spin_deg_per_sec * delta));

    let distance = body.position().distance(home);
    if distance > SENTRY_HOME_TOLERANCE {
        body.move_towards(home, distance * settings.return_rate, delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn points(count: usize) -> Vec<Vec3> {
        (0..count)
            .map(|i| Vec3::new(i as f32, 0.0, 0.0))
            .collect()
    }

    fn visit(route: &mut PatrolRoute, steps: usize) -> Vec<usize> {
        (0..steps).map(|_| route.advance()).collect()
    }

    #[rstest]
    fn empty_route_is_rejected() {
        assert!(PatrolRoute::new(Vec::new(), RouteMode::Loop).is_none());
    }

    #[rstest]
    fn loop_wraps_to_start() {
        let mut route = PatrolRoute::new(points(3), RouteMode::Loop).unwrap();
        assert_eq!(visit(&mut route, 5), vec![1, 2, 0, 1, 2]);
    }

    #[rstest]
    fn ping_pong_bounces_at_ends() {
        let mut route = PatrolRoute::new(points(3), RouteMode::PingPong).unwrap();
        assert_eq!(visit(&mut route, 6), vec![1, 2, 1, 0, 1, 2]);
    }

    #[rstest]
    #[case(RouteMode::Loop)]
    #[case(RouteMode::PingPong)]
    fn two_points_alternate_in_either_mode(#[case] mode: RouteMode) {
        let mut route = PatrolRoute::new(points(2), mode).unwrap();
        assert_eq!(visit(&mut route, 4), vec![1, 0, 1, 0]);
    }

    #[rstest]
    fn single_waypoint_stays_put() {
        let mut route = PatrolRoute::new(points(1), RouteMode::Loop).unwrap();
        assert_eq!(visit(&mut route, 3), vec![0, 0, 0]);
    }
}
