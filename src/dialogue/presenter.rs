//! Receivers of dialogue playback notifications.

use log::{debug, info};

/// Presentation side of a dialogue sequencer.
///
/// Every method defaults to doing nothing, so a presenter only implements
/// the notifications it renders.
pub trait DialoguePresenter {
    /// A script began playing.
    fn sequence_started(&mut self, _id: &str) {}

    /// A new line began with the given speaker.
    fn speaker_changed(&mut self, _speaker: Option<&str>) {}

    /// The visible text of the current line changed.
    fn text_updated(&mut self, _text: &str) {}

    /// A typing sound should play.
    fn typing_tick(&mut self, _clip: &str) {}

    /// The last line of a script was dismissed.
    fn sequence_finished(&mut self, _id: &str) {}
}

impl DialoguePresenter for () {}

impl<P> DialoguePresenter for &mut P
where
    P: DialoguePresenter + ?Sized,
{
    fn sequence_started(&mut self, id: &str) {
        (**self).sequence_started(id);
    }

    fn speaker_changed(&mut self, speaker: Option<&str>) {
        (**self).speaker_changed(speaker);
    }

    fn text_updated(&mut self, text: &str) {
        (**self).text_updated(text);
    }

    fn typing_tick(&mut self, clip: &str) {
        (**self).typing_tick(clip);
    }

    fn sequence_finished(&mut self, id: &str) {
        (**self).sequence_finished(id);
    }
}

/// Writes dialogue to the log, for headless runs.
#[derive(Debug, Default)]
pub struct LogPresenter {
    speaker: Option<String>,
}

impl DialoguePresenter for LogPresenter {
    fn sequence_started(&mut self, id: &str) {
        info!("dialogue '{id}' started");
    }

    fn speaker_changed(&mut self, speaker: Option<&str>) {
        self.speaker = speaker.map(str::to_owned);
    }

    fn text_updated(&mut self, text: &str) {
        let speaker = self.speaker.as_deref().unwrap_or("-");
        debug!("[{speaker}] {text}");
    }

    fn typing_tick(&mut self, clip: &str) {
        debug!("typing tick: {clip}");
    }

    fn sequence_finished(&mut self, id: &str) {
        info!("dialogue '{id}' finished");
    }
}
