//! Player input lock held while a dialogue plays.

use std::cell::Cell;
use std::rc::Rc;

use log::{debug, info};

use crate::events::{EventBus, GameEvent, SubscriptionId, DIALOGUE_FINISHED, DIALOGUE_STARTED};

/// Blocks player movement and look from the moment a dialogue starts until
/// one finishes.
///
/// The gate follows the bus: [`DIALOGUE_STARTED`] closes it and
/// [`DIALOGUE_FINISHED`] opens it. A dialogue cancelled with
/// [`crate::DialogueSequencer::stop`] publishes no finish, so the host calls
/// [`InputGate::release`] itself.
#[derive(Debug)]
pub struct InputGate {
    blocked: Rc<Cell<bool>>,
    subscriptions: [SubscriptionId; 2],
}

impl InputGate {
    /// Subscribes a new, open gate to `bus`.
    #[must_use]
    pub fn attach(bus: &mut EventBus) -> Self {
        let blocked = Rc::new(Cell::new(false));

        let flag = Rc::clone(&blocked);
        let started = bus.subscribe(DIALOGUE_STARTED, move |event: &GameEvent| {
            if flag.replace(true) {
                debug!("input already blocked");
            } else {
                info!("input blocked for dialogue {:?}", event.detail);
            }
        });
        let flag = Rc::clone(&blocked);
        let finished = bus.subscribe(DIALOGUE_FINISHED, move |_: &GameEvent| {
            if flag.replace(false) {
                info!("input unblocked");
            }
        });

        Self {
            blocked,
            subscriptions: [started, finished],
        }
    }

    /// Whether player input should be ignored this tick.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.blocked.get()
    }

    /// Opens the gate without waiting for a dialogue to finish.
    pub fn release(&self) {
        if self.blocked.replace(false) {
            info!("input released");
        }
    }

    /// Unsubscribes from `bus`. Input is no longer blocked afterwards.
    pub fn detach(self, bus: &mut EventBus) {
        for id in self.subscriptions {
            bus.unsubscribe(id);
        }
        self.blocked.set(false);
    }
}
