//! Ordered life stages the story moves through.

use log::info;

use crate::events::{EventBus, GameEvent, STAGE_CHANGED};

/// Stage names used when none are configured.
pub const DEFAULT_STAGES: [&str; 6] = [
    "Birth",
    "Infancy",
    "Childhood",
    "Adolescence",
    "Adulthood",
    "OldAge",
];

/// Position within a fixed, non-empty list of stages.
///
/// Every stage load publishes [`STAGE_CHANGED`] with the stage name, so
/// the host can swap scenes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageProgress {
    stages: Vec<String>,
    index: usize,
}

impl Default for StageProgress {
    fn default() -> Self {
        Self {
            stages: DEFAULT_STAGES.iter().map(|stage| (*stage).to_owned()).collect(),
            index: 0,
        }
    }
}

impl StageProgress {
    /// Progress over `stages`, positioned on the first. `None` when empty.
    #[must_use]
    pub fn new(stages: Vec<String>) -> Option<Self> {
        if stages.is_empty() {
            return None;
        }
        Some(Self { stages, index: 0 })
    }

    /// Index of the current stage.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Name of the current stage.
    #[must_use]
    pub fn current(&self) -> &str {
        self.stages.get(self.index).map_or("", String::as_str)
    }

    /// All stage names in order.
    #[must_use]
    pub fn stages(&self) -> &[String] {
        &self.stages
    }

    /// Whether the current stage is the last.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.stages.len()
    }

    /// Returns to the first stage and loads it.
    pub fn start_new(&mut self, bus: &mut EventBus) -> &str {
        self.index = 0;
        self.load(bus)
    }

    /// Loads a previously saved stage index, clamped into range.
    pub fn resume(&mut self, saved_index: usize, bus: &mut EventBus) -> &str {
        self.index = saved_index.min(self.stages.len().saturating_sub(1));
        self.load(bus)
    }

    /// Moves to the next stage and loads it. On the last stage, reloads it.
    pub fn next(&mut self, bus: &mut EventBus) -> &str {
        if !self.is_last() {
            self.index += 1;
        }
        self.load(bus)
    }

    /// Moves to the previous stage and loads it.
    ///
    /// Returns `None`, without publishing, when already on the first stage.
    pub fn previous(&mut self, bus: &mut EventBus) -> Option<&str> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(self.load(bus))
    }

    fn load(&self, bus: &mut EventBus) -> &str {
        let name = self.current();
        info!("loading stage {} '{name}'", self.index);
        bus.publish(&GameEvent::with_detail(STAGE_CHANGED, name));
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(bus: &mut EventBus) -> Rc<RefCell<Vec<String>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        bus.subscribe(STAGE_CHANGED, move |event: &GameEvent| {
            log.borrow_mut().extend(event.detail.clone());
        });
        seen
    }

    #[rstest]
    fn walks_the_default_stages() {
        let mut bus = EventBus::new();
        let seen = recorder(&mut bus);
        let mut progress = StageProgress::default();
        assert_eq!(progress.start_new(&mut bus), "Birth");
        assert_eq!(progress.next(&mut bus), "Infancy");
        assert_eq!(progress.previous(&mut bus), Some("Birth"));
        assert_eq!(progress.previous(&mut bus), None);
        assert_eq!(*seen.borrow(), vec!["Birth", "Infancy", "Birth"]);
    }

    #[rstest]
    fn next_stays_on_the_last_stage() {
        let mut bus = EventBus::new();
        let mut progress =
            StageProgress::new(vec!["Dawn".to_owned(), "Dusk".to_owned()]).expect("two stages");
        assert_eq!(progress.next(&mut bus), "Dusk");
        assert!(progress.is_last());
        assert_eq!(progress.next(&mut bus), "Dusk");
        assert_eq!(progress.index(), 1);
    }

    #[rstest]
    #[case(3, "Adolescence")]
    #[case(99, "OldAge")]
    fn resume_clamps_the_saved_index(#[case] saved: usize, #[case] expected: &str) {
        let mut bus = EventBus::new();
        let mut progress = StageProgress::default();
        assert_eq!(progress.resume(saved, &mut bus), expected);
    }

    #[rstest]
    fn empty_stage_list_is_rejected() {
        assert!(StageProgress::new(Vec::new()).is_none());
    }
}
