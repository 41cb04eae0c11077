//! Items the player has picked up.

use log::info;

use crate::events::{EventBus, GameEvent, ITEM_PICKED_UP};

/// Ordered list of carried items, matched by name without regard to case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    items: Vec<String>,
}

impl Inventory {
    /// An empty inventory.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Adds `item` and publishes [`ITEM_PICKED_UP`] with its name.
    pub fn add(&mut self, item: impl Into<String>, bus: &mut EventBus) {
        let name = item.into();
        info!("item '{name}' added to inventory");
        bus.publish(&GameEvent::with_detail(ITEM_PICKED_UP, name.as_str()));
        self.items.push(name);
    }

    /// Whether an item called `name` is carried.
    #[must_use]
    pub fn has_item(&self, name: &str) -> bool {
        let wanted = name.to_lowercase();
        self.items.iter().any(|item| item.to_lowercase() == wanted)
    }

    /// Whether any of `names` is carried.
    #[must_use]
    pub fn has_any<I, S>(&self, names: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().any(|name| self.has_item(name.as_ref()))
    }

    /// Carried items in pickup order.
    #[must_use]
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Number of carried items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is carried.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
