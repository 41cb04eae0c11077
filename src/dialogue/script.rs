//! Dialogue documents and the scripts resolved from them.
//!
//! Documents are JSON in the authoring tool's camelCase layout:
//!
//! ```json
//! { "dialogues": [
//!     { "dialogueID": "intro", "speaker": "Narrator", "typingSpeed": 0.05,
//!       "audioClip": "type_soft",
//!       "lines": [ { "text": "Hi" }, { "text": "Listen.", "waitForEvent": "door.opened" } ] }
//! ] }
//! ```
//!
//! Entries written before multi-line support carry a single `text` field and
//! no `lines`; they are turned into a one-line script.

use log::{debug, warn};
use serde::Deserialize;
use thiserror::Error;

use crate::DEFAULT_TYPING_DELAY;

/// Ways loading a dialogue can fail.
#[derive(Debug, Error)]
pub enum DialogueError {
    /// The document is not valid dialogue JSON.
    #[error("malformed dialogue document: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The document parsed but lists no dialogues.
    #[error("dialogue document contains no entries")]
    Empty,
    /// No entry carries the requested id.
    #[error("dialogue id '{id}' not found; available ids: {}", .available.join(", "))]
    UnknownId {
        /// The requested id.
        id: String,
        /// Ids present in the document, in document order.
        available: Vec<String>,
    },
    /// The entry has neither lines nor legacy text.
    #[error("dialogue '{0}' has no lines and no legacy text")]
    NoLines(String),
    /// The document could not be read from its source.
    #[error("failed to read dialogue source '{key}': {source}")]
    Io {
        /// Key the document was requested under.
        key: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

fn default_typing_speed() -> f32 {
    DEFAULT_TYPING_DELAY
}

/// One line as authored.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueLine {
    /// Text to reveal.
    #[serde(default)]
    pub text: String,
    /// Speaker override for this line.
    #[serde(default)]
    pub speaker: Option<String>,
    /// Seconds per character; values of zero or below use the entry default.
    #[serde(default)]
    pub typing_speed: Option<f32>,
    /// Typing sound override for this line.
    #[serde(default)]
    pub audio_clip: Option<String>,
    /// Event that must be published before the line starts.
    #[serde(default)]
    pub wait_for_event: Option<String>,
}

impl DialogueLine {
    /// A plain line of text with no overrides.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Sets the speaker override.
    #[must_use]
    pub fn spoken_by(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = Some(speaker.into());
        self
    }

    /// Sets the per-character delay override.
    #[must_use]
    pub const fn typed_at(mut self, seconds_per_char: f32) -> Self {
        self.typing_speed = Some(seconds_per_char);
        self
    }

    /// Sets the typing sound override.
    #[must_use]
    pub fn with_clip(mut self, clip: impl Into<String>) -> Self {
        self.audio_clip = Some(clip.into());
        self
    }

    /// Makes the line wait for `event` before revealing anything.
    #[must_use]
    pub fn after_event(mut self, event: impl Into<String>) -> Self {
        self.wait_for_event = Some(event.into());
        self
    }

    /// The wait-event name, ignoring blanks.
    #[must_use]
    pub fn wait_event(&self) -> Option<&str> {
        non_blank(self.wait_for_event.as_deref())
    }
}

/// One dialogue entry as authored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueEntry {
    /// Identifier the entry is looked up by.
    #[serde(rename = "dialogueID", alias = "id")]
    pub dialogue_id: String,
    /// Default speaker.
    #[serde(default)]
    pub speaker: Option<String>,
    /// Single-line text of entries without `lines`.
    #[serde(default)]
    pub text: Option<String>,
    /// Default seconds per character.
    #[serde(default = "default_typing_speed")]
    pub typing_speed: f32,
    /// Default typing sound.
    #[serde(default)]
    pub audio_clip: Option<String>,
    /// Lines in playback order.
    #[serde(default)]
    pub lines: Vec<DialogueLine>,
}

/// A parsed dialogue document.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct DialogueDocument {
    /// Entries in document order.
    #[serde(default)]
    pub dialogues: Vec<DialogueEntry>,
}

impl DialogueDocument {
    /// Parses a document, rejecting malformed JSON and documents without
    /// entries.
    ///
    /// # Errors
    /// [`DialogueError::Malformed`] or [`DialogueError::Empty`].
    pub fn from_json(json: &str) -> Result<Self, DialogueError> {
        let document: Self = serde_json::from_str(json).map_err(|err| {
            warn!("dialogue JSON is invalid: {err}");
            DialogueError::from(err)
        })?;
        if document.dialogues.is_empty() {
            warn!("dialogue JSON has no entries");
            return Err(DialogueError::Empty);
        }
        debug!("parsed {} dialogue entries", document.dialogues.len());
        Ok(document)
    }

    /// Ids of every entry, in document order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.dialogues.iter().map(|entry| entry.dialogue_id.as_str())
    }

    /// Resolves the entry named `id` into a playable script.
    ///
    /// # Errors
    /// [`DialogueError::UnknownId`] when no entry matches and
    /// [`DialogueError::NoLines`] when the entry is blank.
    pub fn script(&self, id: &str) -> Result<DialogueScript, DialogueError> {
        let Some(entry) = self.dialogues.iter().find(|entry| entry.dialogue_id == id) else {
            let available: Vec<String> = self.ids().map(str::to_owned).collect();
            warn!(
                "dialogue id not found: {id}. Available ids: {}",
                available.join(", ")
            );
            return Err(DialogueError::UnknownId {
                id: id.to_owned(),
                available,
            });
        };
        DialogueScript::from_entry(entry.clone())
    }
}

/// Parses `json` and resolves the entry named `id`.
///
/// # Errors
/// Any [`DialogueError`] raised by parsing or lookup.
pub fn load_script(json: &str, id: &str) -> Result<DialogueScript, DialogueError> {
    DialogueDocument::from_json(json)?.script(id)
}

/// A playable dialogue: entry defaults plus at least one line.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueScript {
    id: String,
    speaker: Option<String>,
    typing_speed: f32,
    audio_clip: Option<String>,
    lines: Vec<DialogueLine>,
}

impl DialogueScript {
    /// Builds a script from its parts.
    ///
    /// # Errors
    /// [`DialogueError::NoLines`] when `lines` is empty.
    pub fn new(name: impl Into<String>, lines: Vec<DialogueLine>) -> Result<Self, DialogueError> {
        let id = name.into();
        if lines.is_empty() {
            return Err(DialogueError::NoLines(id));
        }
        Ok(Self {
            id,
            speaker: None,
            typing_speed: DEFAULT_TYPING_DELAY,
            audio_clip: None,
            lines,
        })
    }

    /// Resolves an authored entry, converting the single-`text` layout.
    ///
    /// # Errors
    /// [`DialogueError::NoLines`] when the entry has no lines and no text.
    pub fn from_entry(entry: DialogueEntry) -> Result<Self, DialogueError> {
        let DialogueEntry {
            dialogue_id,
            speaker,
            text,
            typing_speed,
            audio_clip,
            mut lines,
        } = entry;
        if lines.is_empty() {
            match non_blank(text.as_deref()) {
                Some(legacy) => {
                    debug!("converted single-text dialogue '{dialogue_id}' to one line");
                    lines.push(DialogueLine {
                        text: legacy.to_owned(),
                        speaker: speaker.clone(),
                        typing_speed: Some(typing_speed),
                        audio_clip: audio_clip.clone(),
                        wait_for_event: None,
                    });
                }
                None => {
                    warn!("dialogue '{dialogue_id}' has no lines and no legacy text");
                    return Err(DialogueError::NoLines(dialogue_id));
                }
            }
        }
        Ok(Self {
            id: dialogue_id,
            speaker,
            typing_speed,
            audio_clip,
            lines,
        })
    }

    /// Sets the default speaker.
    #[must_use]
    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = Some(speaker.into());
        self
    }

    /// Sets the default seconds per character.
    #[must_use]
    pub const fn with_typing_speed(mut self, seconds_per_char: f32) -> Self {
        self.typing_speed = seconds_per_char;
        self
    }

    /// Sets the default typing sound.
    #[must_use]
    pub fn with_audio_clip(mut self, clip: impl Into<String>) -> Self {
        self.audio_clip = Some(clip.into());
        self
    }

    /// Identifier of the script.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Lines in playback order.
    #[must_use]
    pub fn lines(&self) -> &[DialogueLine] {
        &self.lines
    }

    /// Speaker of `line`: its override, else the script default.
    #[must_use]
    pub fn speaker_for<'a>(&'a self, line: &'a DialogueLine) -> Option<&'a str> {
        non_blank(line.speaker.as_deref()).or_else(|| non_blank(self.speaker.as_deref()))
    }

    /// Seconds per character for `line`.
    ///
    /// A line delay of zero or below falls back to the script default, which
    /// in turn falls back to [`DEFAULT_TYPING_DELAY`].
    #[must_use]
    pub fn delay_for(&self, line: &DialogueLine) -> f32 {
        [line.typing_speed, Some(self.typing_speed)]
            .into_iter()
            .flatten()
            .find(|delay| delay.is_finite() && *delay > 0.0)
            .unwrap_or(DEFAULT_TYPING_DELAY)
    }

    /// Typing sound of `line`: its override, else the script default.
    #[must_use]
    pub fn audio_clip_for<'a>(&'a self, line: &'a DialogueLine) -> Option<&'a str> {
        non_blank(line.audio_clip.as_deref()).or_else(|| non_blank(self.audio_clip.as_deref()))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const DOC: &str = r#"{
        "dialogues": [
            { "dialogueID": "intro", "speaker": "Narrator", "audioClip": "soft",
              "lines": [
                { "text": "Hi", "typingSpeed": 0.05 },
                { "text": "Who?", "speaker": "Stranger", "typingSpeed": 0, "audioClip": "" },
                { "text": "Later.", "waitForEvent": "door.opened" }
              ] },
            { "dialogueID": "legacy", "speaker": "Mother", "text": "Sleep now.", "typingSpeed": 0.1 },
            { "dialogueID": "blank", "speaker": "Nobody" }
        ]
    }"#;

    #[rstest]
    fn resolves_line_overrides_and_fallbacks() -> Result<(), DialogueError> {
        let script = load_script(DOC, "intro")?;
        let [first, second, third] = script.lines() else {
            panic!("expected three lines, got {}", script.lines().len());
        };
        assert_eq!(script.speaker_for(first), Some("Narrator"));
        assert_eq!(script.speaker_for(second), Some("Stranger"));
        assert!((script.delay_for(second) - DEFAULT_TYPING_DELAY).abs() < f32::EPSILON);
        assert_eq!(script.audio_clip_for(second), Some("soft"));
        assert_eq!(third.wait_event(), Some("door.opened"));
        assert_eq!(first.wait_event(), None);
        Ok(())
    }

    #[rstest]
    fn converts_legacy_single_text() -> Result<(), DialogueError> {
        let script = load_script(DOC, "legacy")?;
        assert_eq!(script.lines().len(), 1);
        let line = &script.lines()[0];
        assert_eq!(line.text, "Sleep now.");
        assert_eq!(script.speaker_for(line), Some("Mother"));
        assert!((script.delay_for(line) - 0.1).abs() < f32::EPSILON);
        Ok(())
    }

    #[rstest]
    fn blank_entry_is_rejected() {
        assert!(matches!(
            load_script(DOC, "blank"),
            Err(DialogueError::NoLines(id)) if id == "blank"
        ));
    }

    #[rstest]
    fn unknown_id_lists_available_ids() {
        let err = load_script(DOC, "outro").expect_err("outro is not in the document");
        assert!(matches!(&err, DialogueError::UnknownId { available, .. }
            if available == &["intro", "legacy", "blank"]));
        assert!(err.to_string().contains("intro, legacy, blank"));
    }

    #[rstest]
    #[case("{ not json")]
    #[case(r#"{ "dialogues": [ { "speaker": "no id" } ] }"#)]
    fn malformed_documents_are_errors(#[case] json: &str) {
        assert!(matches!(
            DialogueDocument::from_json(json),
            Err(DialogueError::Malformed(_))
        ));
    }

    #[rstest]
    #[case("{}")]
    #[case(r#"{ "dialogues": [] }"#)]
    fn empty_documents_are_errors(#[case] json: &str) {
        assert!(matches!(
            DialogueDocument::from_json(json),
            Err(DialogueError::Empty)
        ));
    }

    #[rstest]
    fn id_alias_is_accepted() -> Result<(), DialogueError> {
        let script = load_script(r#"{ "dialogues": [ { "id": "intro", "text": "Hi" } ] }"#, "intro")?;
        assert_eq!(script.id(), "intro");
        Ok(())
    }

    #[rstest]
    fn built_scripts_need_lines() {
        assert!(DialogueScript::new("empty", Vec::new()).is_err());
    }
}
