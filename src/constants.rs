//! Default tuning values shared by the perception, combat and dialogue
//! systems.
//!
//! Settings structs use these as their `Default` values; hosts override them
//! per agent or per sequencer.

/// Half of the sight cone's opening angle, in degrees.
pub const DEFAULT_SIGHT_HALF_ANGLE_DEG: f32 = 45.0;
/// Furthest distance at which a target can be seen.
pub const DEFAULT_SIGHT_DISTANCE: f32 = 8.0;
/// Height above the observer's origin the line-of-sight ray starts from.
pub const DEFAULT_EYE_HEIGHT: f32 = 0.5;

/// Patrol walking speed in units per second.
pub const DEFAULT_PATROL_SPEED: f32 = 2.0;
/// Seconds spent standing at each waypoint.
pub const DEFAULT_PATROL_DWELL: f32 = 2.0;
/// Horizontal distance at which a waypoint counts as reached.
pub const DEFAULT_ARRIVAL_TOLERANCE: f32 = 0.2;
/// Turn smoothing factor while patrolling.
pub const DEFAULT_PATROL_TURN_RATE: f32 = 5.0;

/// Idle spin of a sentry, in degrees per second.
pub const DEFAULT_SENTRY_SPIN_DEG_PER_SEC: f32 = 30.0;
/// Fraction of the remaining distance home a sentry covers per second.
pub const DEFAULT_SENTRY_RETURN_RATE: f32 = 2.0;
/// Distance from the home post below which a sentry stops drifting back.
pub const SENTRY_HOME_TOLERANCE: f32 = 0.1;

/// Speed used to close in on a visible target.
pub const DEFAULT_APPROACH_SPEED: f32 = 3.5;
/// Distance at which an attacking agent stops closing in.
pub const DEFAULT_STOP_DISTANCE: f32 = 1.5;
/// Distance within which a strike connects.
pub const DEFAULT_STRIKE_RANGE: f32 = 2.0;
/// Health removed by one strike.
pub const DEFAULT_STRIKE_DAMAGE: f32 = 10.0;
/// Minimum seconds between two strikes of the same agent.
pub const DEFAULT_STRIKE_COOLDOWN: f32 = 1.0;
/// Seconds the attack flash stays on after a strike.
pub const DEFAULT_FLASH_DURATION: f32 = 0.3;
/// Turn smoothing factor while attacking.
pub const DEFAULT_ATTACK_TURN_RATE: f32 = 8.0;

/// Seconds between revealed characters when a dialogue entry names none.
pub const DEFAULT_TYPING_DELAY: f32 = 0.05;
/// Revealed characters between two typing sound ticks.
pub const DEFAULT_TYPING_TICK_EVERY: usize = 2;

/// Starting health of the player.
pub const DEFAULT_PLAYER_HEALTH: f32 = 100.0;

/// Minimum seconds between two shots.
pub const DEFAULT_FIRE_INTERVAL: f32 = 1.0;
/// Rounds held by a full magazine.
pub const DEFAULT_MAGAZINE_SIZE: u32 = 6;
/// Seconds a reload takes.
pub const DEFAULT_RELOAD_TIME: f32 = 2.0;
/// Maximum distance a shot travels.
pub const DEFAULT_WEAPON_RANGE: f32 = 100.0;

/// Seconds the interact key is held to open a door or lift a prop.
pub const DEFAULT_HOLD_SECONDS: f32 = 2.0;

/// Tag identifying the player to trigger zones.
pub const DEFAULT_PLAYER_TAG: &str = "Player";
