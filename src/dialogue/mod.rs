//! Multi-line dialogue with typed reveal, skip, advance and event waits.
//!
//! Scripts are loaded from JSON documents ([`DialogueDocument`]) through a
//! [`DialogueSource`] and played by a [`DialogueSequencer`], which reports
//! progress to a [`DialoguePresenter`] and announces start and finish on the
//! [`EventBus`](crate::events::EventBus).

pub mod presenter;
pub mod script;
pub mod sequencer;
pub mod source;

pub use presenter::{DialoguePresenter, LogPresenter};
pub use script::{
    load_script, DialogueDocument, DialogueEntry, DialogueError, DialogueLine, DialogueScript,
};
pub use sequencer::{DialogueSequencer, PlaybackPhase, SequencerConfig};
pub use source::{DialogueSource, FsDialogueSource};
