//! Named publish/subscribe bus shared by gameplay systems.
//!
//! The bus is an explicitly constructed service owned by the application
//! root and passed by reference to whatever needs it. Delivery is
//! synchronous: `publish` runs every matching handler, in subscription
//! order, before returning.
//!
//! Besides callback handlers the bus hands out [`EventLatch`]es, one-shot
//! flags that flip when their event is published. A latch unregisters itself
//! when dropped, so a waiting system can be cancelled without holding on to
//! the bus.

use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

use hashbrown::HashMap;
use log::{debug, trace};

/// Published when a dialogue sequence starts playing.
pub const DIALOGUE_STARTED: &str = "dialogue.started";
/// Published when the last line of a dialogue sequence is dismissed.
pub const DIALOGUE_FINISHED: &str = "dialogue.finished";
/// Published when an item enters the inventory; detail is the item name.
pub const ITEM_PICKED_UP: &str = "item.picked_up";
/// Published when a weapon discharges.
pub const WEAPON_FIRED: &str = "weapon.fired";
/// Published when the player's health reaches zero.
pub const PLAYER_DIED: &str = "player.died";
/// Published when the active life stage changes; detail is the stage name.
pub const STAGE_CHANGED: &str = "stage.changed";

/// A named notification with an optional free-form detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEvent {
    /// Event name subscribers match on.
    pub name: String,
    /// Extra context such as an item or stage name.
    pub detail: Option<String>,
}

impl GameEvent {
    /// Creates an event without detail.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detail: None,
        }
    }

    /// Creates an event carrying `detail`.
    #[must_use]
    pub fn with_detail(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detail: Some(detail.into()),
        }
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn FnMut(&GameEvent)>;

enum Listener {
    Handler {
        id: SubscriptionId,
        handler: Handler,
    },
    Latch {
        flag: Weak<Cell<bool>>,
        detail: Option<String>,
    },
}

impl Listener {
    fn is_live(&self) -> bool {
        match self {
            Self::Handler { .. } => true,
            Self::Latch { flag, .. } => flag.strong_count() > 0,
        }
    }
}

/// One-shot flag raised when a named event is published.
#[derive(Debug)]
pub struct EventLatch {
    name: String,
    fired: Rc<Cell<bool>>,
}

impl EventLatch {
    /// Name of the awaited event.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the event has been published since the latch was created.
    #[must_use]
    pub fn fired(&self) -> bool {
        self.fired.get()
    }
}

/// Single-threaded named event bus.
#[derive(Default)]
pub struct EventBus {
    listeners: HashMap<String, Vec<Listener>>,
    next_id: u64,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self
            .listeners
            .iter()
            .map(|(name, list)| (name.as_str(), list.len()))
            .collect();
        names.sort_unstable();
        f.debug_struct("EventBus").field("listeners", &names).finish()
    }
}

impl EventBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for events named `name`.
    pub fn subscribe<F>(&mut self, name: impl Into<String>, handler: F) -> SubscriptionId
    where
        F: FnMut(&GameEvent) + 'static,
    {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.listeners
            .entry(name.into())
            .or_default()
            .push(Listener::Handler {
                id,
                handler: Box::new(handler),
            });
        id
    }

    /// Removes a handler. Returns `false` when `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let mut removed = false;
        for list in self.listeners.values_mut() {
            list.retain(|listener| {
                let matches = matches!(listener, Listener::Handler { id: found, .. } if *found == id);
                removed |= matches;
                !matches
            });
        }
        self.listeners.retain(|_, list| !list.is_empty());
        removed
    }

    /// Creates a latch that fires on the next publication of `event`.
    ///
    /// Publications that happened before this call are not observed.
    pub fn latch(&mut self, event: impl Into<String>) -> EventLatch {
        self.register_latch(event.into(), None)
    }

    /// Creates a latch that only fires when `event` is published carrying
    /// exactly `detail`.
    ///
    /// Publications with any other detail, or none, leave it waiting.
    pub fn latch_matching(
        &mut self,
        event: impl Into<String>,
        detail: impl Into<String>,
    ) -> EventLatch {
        self.register_latch(event.into(), Some(detail.into()))
    }

    fn register_latch(&mut self, name: String, detail: Option<String>) -> EventLatch {
        let fired = Rc::new(Cell::new(false));
        let list = self.listeners.entry(name.clone()).or_default();
        // Latches dropped before their event ever arrives are swept here.
        list.retain(Listener::is_live);
        list.push(Listener::Latch {
            flag: Rc::downgrade(&fired),
            detail,
        });
        EventLatch { name, fired }
    }

    /// Delivers `event` to every listener registered under its name.
    ///
    /// Latches fire at most once and are released afterwards. Returns the
    /// number of listeners reached.
    pub fn publish(&mut self, event: &GameEvent) -> usize {
        let Some(list) = self.listeners.get_mut(&event.name) else {
            trace!("event '{}' published with no listeners", event.name);
            return 0;
        };
        list.retain(Listener::is_live);

        let mut reached = 0;
        list.retain_mut(|listener| match listener {
            Listener::Handler { handler, .. } => {
                handler(event);
                reached += 1;
                true
            }
            Listener::Latch { detail: Some(wanted), .. }
                if event.detail.as_deref() != Some(wanted.as_str()) =>
            {
                true
            }
            Listener::Latch { flag, .. } => {
                if let Some(raised) = flag.upgrade() {
                    raised.set(true);
                    reached += 1;
                }
                false
            }
        });
        if list.is_empty() {
            self.listeners.remove(&event.name);
        }
        debug!("event '{}' delivered to {reached} listener(s)", event.name);
        reached
    }

    /// Publishes an event that carries no detail.
    pub fn emit(&mut self, name: &str) -> usize {
        self.publish(&GameEvent::named(name))
    }

    /// Number of live listeners registered under `name`.
    #[must_use]
    pub fn listener_count(&self, name: &str) -> usize {
        self.listeners
            .get(name)
            .map_or(0, |list| list.iter().filter(|l| l.is_live()).count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cell::RefCell;

    #[rstest]
    fn handlers_run_in_subscription_order() {
        let mut bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        for tag in ["first", "second"] {
            let log = Rc::clone(&seen);
            bus.subscribe("door.opened", move |event: &GameEvent| {
                log.borrow_mut().push(format!("{tag}:{}", event.name));
            });
        }
        assert_eq!(bus.emit("door.opened"), 2);
        assert_eq!(
            *seen.borrow(),
            vec!["first:door.opened", "second:door.opened"]
        );
    }

    #[rstest]
    fn unsubscribed_handler_stops_receiving() {
        let mut bus = EventBus::new();
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let id = bus.subscribe("tick", move |_| counter.set(counter.get() + 1));
        bus.emit("tick");
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.emit("tick");
        assert_eq!(count.get(), 1);
    }

    #[rstest]
    fn latch_fires_once_and_is_released() {
        let mut bus = EventBus::new();
        let latch = bus.latch("bell");
        assert!(!latch.fired());
        bus.emit("other");
        assert!(!latch.fired());
        assert_eq!(bus.emit("bell"), 1);
        assert!(latch.fired());
        assert_eq!(bus.listener_count("bell"), 0);
    }

    #[rstest]
    fn latch_misses_earlier_publications() {
        let mut bus = EventBus::new();
        bus.emit("bell");
        let latch = bus.latch("bell");
        assert!(!latch.fired());
    }

    #[rstest]
    fn dropped_latch_no_longer_listens() {
        let mut bus = EventBus::new();
        let latch = bus.latch("bell");
        assert_eq!(bus.listener_count("bell"), 1);
        drop(latch);
        assert_eq!(bus.listener_count("bell"), 0);
        assert_eq!(bus.emit("bell"), 0);
    }

    #[rstest]
    fn detail_reaches_handlers() {
        let mut bus = EventBus::new();
        let seen = Rc::new(RefCell::new(None));
        let slot = Rc::clone(&seen);
        bus.subscribe(ITEM_PICKED_UP, move |event: &GameEvent| {
            slot.replace(event.detail.clone());
        });
        bus.publish(&GameEvent::with_detail(ITEM_PICKED_UP, "lantern"));
        assert_eq!(seen.borrow().as_deref(), Some("lantern"));
    }

    #[rstest]
    fn abandoned_latches_do_not_pile_up() {
        let mut bus = EventBus::new();
        for _ in 0..1_000 {
            drop(bus.latch("bell"));
        }
        let kept = bus.latch("bell");
        assert_eq!(bus.listeners.get("bell").map_or(0, Vec::len), 1);
        assert_eq!(bus.emit("bell"), 1);
        assert!(kept.fired());
    }

    #[rstest]
    fn matching_latch_ignores_other_details() {
        let mut bus = EventBus::new();
        let wanted = bus.latch_matching(DIALOGUE_FINISHED, "outro");
        assert_eq!(bus.publish(&GameEvent::with_detail(DIALOGUE_FINISHED, "intro")), 0);
        assert_eq!(bus.emit(DIALOGUE_FINISHED), 0);
        assert!(!wanted.fired());
        assert_eq!(bus.listener_count(DIALOGUE_FINISHED), 1);

        assert_eq!(bus.publish(&GameEvent::with_detail(DIALOGUE_FINISHED, "outro")), 1);
        assert!(wanted.fired());
        assert_eq!(bus.listener_count(DIALOGUE_FINISHED), 0);
    }
}
