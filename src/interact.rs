//! Objects the player uses with the interact key.
//!
//! A pickup goes straight into the inventory on the first press. Doors and
//! draggable props need the key held for their hold time; a door then opens,
//! a prop is carried until the key is let go.

use log::{debug, info};
use serde::Deserialize;

use crate::events::EventBus;
use crate::inventory::Inventory;
use crate::timer::Countdown;
use crate::DEFAULT_HOLD_SECONDS;

/// How an object reacts to the interact key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    /// Taken into the inventory on press.
    #[default]
    Pickup,
    /// Opens once the key has been held long enough.
    Door,
    /// Carried after a full hold, dropped on release.
    Draggable,
}

/// An object in reach of the player.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Interactable {
    /// Name shown to the player and stored in the inventory.
    pub name: String,
    /// Reaction to the interact key.
    pub kind: InteractionType,
    /// Seconds the key must be held for doors and draggable props.
    pub hold_seconds: f32,
}

impl Default for Interactable {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: InteractionType::Pickup,
            hold_seconds: DEFAULT_HOLD_SECONDS,
        }
    }
}

impl Interactable {
    /// An object called `name` reacting as `kind`, with the default hold time.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: InteractionType) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Self::default()
        }
    }

    /// Overrides the hold time.
    #[must_use]
    pub const fn held_for(mut self, seconds: f32) -> Self {
        self.hold_seconds = seconds;
        self
    }
}

/// What an input did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// Nothing changed.
    Nothing,
    /// The named item went into the inventory.
    PickedUp(String),
    /// A hold began.
    HoldStarted,
    /// The hold was interrupted before completing.
    HoldCancelled,
    /// The named door opened.
    Opened(String),
    /// The named prop is now carried.
    DragStarted(String),
    /// The carried prop was let go.
    Dropped(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HoldGoal {
    Open,
    Drag,
}

#[derive(Debug, Clone)]
struct Hold {
    name: String,
    goal: HoldGoal,
    timer: Countdown,
}

/// The player's side of interaction: the running hold and the carried prop.
#[derive(Debug, Clone, Default)]
pub struct Interactor {
    hold: Option<Hold>,
    dragging: Option<String>,
}

impl Interactor {
    /// Nothing held, nothing carried.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            hold: None,
            dragging: None,
        }
    }

    /// The interact key went down while looking at `target`.
    ///
    /// Ignored while a hold is running or a prop is carried.
    pub fn press(
        &mut self,
        target: &Interactable,
        inventory: &mut Inventory,
        bus: &mut EventBus,
    ) -> Interaction {
        if self.hold.is_some() || self.dragging.is_some() {
            return Interaction::Nothing;
        }
        let goal = match target.kind {
            InteractionType::Pickup => {
                inventory.add(target.name.as_str(), bus);
                return Interaction::PickedUp(target.name.clone());
            }
            InteractionType::Door => HoldGoal::Open,
            InteractionType::Draggable => HoldGoal::Drag,
        };
        debug!("holding for '{}' ({}s)", target.name, target.hold_seconds);
        self.hold = Some(Hold {
            name: target.name.clone(),
            goal,
            timer: Countdown::start(target.hold_seconds),
        });
        Interaction::HoldStarted
    }

    /// The key is still down; advances the running hold by `delta` seconds.
    pub fn hold(&mut self, delta: f32) -> Interaction {
        let Some(hold) = &mut self.hold else {
            return Interaction::Nothing;
        };
        if !hold.timer.tick(delta) {
            return Interaction::Nothing;
        }
        let Some(Hold { name, goal, .. }) = self.hold.take() else {
            return Interaction::Nothing;
        };
        match goal {
            HoldGoal::Open => {
                info!("door '{name}' opened");
                Interaction::Opened(name)
            }
            HoldGoal::Drag => {
                info!("dragging '{name}'");
                self.dragging = Some(name.clone());
                Interaction::DragStarted(name)
            }
        }
    }

    /// The key came up: drops a carried prop or cancels an unfinished hold.
    pub fn release(&mut self) -> Interaction {
        if let Some(name) = self.dragging.take() {
            info!("dropped '{name}'");
            return Interaction::Dropped(name);
        }
        self.cancel_hold()
    }

    /// The player looked away. A carried prop stays carried.
    pub fn target_lost(&mut self) -> Interaction {
        self.cancel_hold()
    }

    fn cancel_hold(&mut self) -> Interaction {
        match self.hold.take() {
            Some(hold) => {
                debug!("hold on '{}' interrupted", hold.name);
                Interaction::HoldCancelled
            }
            None => Interaction::Nothing,
        }
    }

    /// Completed fraction of the running hold, from `0.0` to `1.0`.
    #[must_use]
    pub fn hold_progress(&self) -> Option<f32> {
        self.hold.as_ref().map(|hold| {
            let total = hold.timer.elapsed() + hold.timer.remaining();
            if total > 0.0 {
                hold.timer.elapsed() / total
            } else {
                1.0
            }
        })
    }

    /// Name of the carried prop.
    #[must_use]
    pub fn dragging(&self) -> Option<&str> {
        self.dragging.as_deref()
    }
}
