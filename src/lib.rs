#![cfg_attr(docsrs, feature(doc_cfg))]
//! Engine-agnostic gameplay logic for NPC guards and narrative dialogue.
//!
//! The crate holds the rules; the host engine supplies the world through the
//! collaborator traits in [`world`]. Everything is stepped by the host once
//! per frame with the frame's delta time.
//!
//! - [`perception`] decides whether an NPC can see its target.
//! - [`combat`] cycles agents between patrol and attack.
//! - [`dialogue`] plays typed, event-gated dialogue scripts.
//! - [`events`] connects systems through a named event bus.
//! - [`input`] and [`interact`] cover what the player may do and use.
pub mod combat;
pub mod constants;
pub mod dialogue;
pub mod entity;
pub mod events;
pub mod health;
pub mod input;
pub mod interact;
pub mod inventory;
pub mod logging;
pub mod perception;
pub mod stage;
pub mod timer;
pub mod trigger;
pub mod vector_math;
pub mod weapon;
pub mod world;
pub use constants::*;

// Re-export commonly used items
pub use combat::{
    AgentStatus, CombatAgent, CombatConfig, CombatEvent, CombatState, ConfigError, Target,
};
pub use dialogue::{
    DialogueError, DialoguePresenter, DialogueScript, DialogueSequencer, DialogueSource,
};
pub use entity::Body;
pub use events::{EventBus, EventLatch, GameEvent};
pub use health::Health;
pub use input::InputGate;
pub use interact::{Interactable, Interaction, InteractionType, Interactor};
pub use inventory::Inventory;
pub use logging::init as init_logging;
pub use perception::{is_visible, SightCone, Sighted, Visibility};
pub use stage::StageProgress;
pub use trigger::{TriggerConfig, TriggerZone};
pub use weapon::{ShotOutcome, Weapon};
pub use world::{ColliderId, DamageReceiver, Locomotion, ObstructionTest, RayHit};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use vigil::prelude::*;
    //! ```

    pub use crate::combat::{CombatAgent, CombatConfig, CombatState, Target};
    pub use crate::dialogue::{DialoguePresenter, DialogueScript, DialogueSequencer};
    pub use crate::entity::Body;
    pub use crate::events::EventBus;
    pub use crate::perception::{SightCone, Sighted};
    pub use crate::world::{ColliderId, DamageReceiver, Locomotion, ObstructionTest};
    pub use glam::Vec3;
}
