//! Behavioural tests for dialogue loading and playback.

use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

use mockall::mock;
use rstest::{fixture, rstest};
use test_utils::{MemorySource, RecordingPresenter, Shown};
use vigil::dialogue::{
    DialogueError, DialogueLine, DialogueScript, DialogueSequencer, DialogueSource,
    FsDialogueSource, PlaybackPhase,
};
use vigil::events::{GameEvent, DIALOGUE_FINISHED, DIALOGUE_STARTED};
use vigil::EventBus;

const DT: f32 = 0.05;

const CHAPTER: &str = r#"{
    "dialogues": [
        {
            "dialogueID": "intro",
            "speaker": "Mother",
            "lines": [
                { "text": "Hush." },
                { "text": "Go.", "speaker": "Father" }
            ]
        },
        { "dialogueID": "outro", "text": "Bye." }
    ]
}"#;

mock! {
    pub Source {}
    impl DialogueSource for Source {
        fn load(&self, key: &str) -> Result<String, DialogueError>;
    }
}

#[fixture]
fn sequencer() -> DialogueSequencer<RecordingPresenter> {
    DialogueSequencer::with_presenter(RecordingPresenter::default())
}

fn script(id: &str, lines: &[&str]) -> DialogueScript {
    DialogueScript::new(id, lines.iter().copied().map(DialogueLine::new).collect())
        .expect("test scripts have lines")
}

/// Ticks until the current line is fully shown.
fn type_out(sequencer: &mut DialogueSequencer<RecordingPresenter>, bus: &mut EventBus) {
    for _ in 0..500 {
        if sequencer.phase() != PlaybackPhase::Typing {
            return;
        }
        sequencer.tick(DT, bus);
    }
    panic!("line never finished typing");
}

fn details(bus: &mut EventBus, name: &str) -> Rc<RefCell<Vec<Option<String>>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    bus.subscribe(name, move |event: &GameEvent| {
        log.borrow_mut().push(event.detail.clone());
    });
    seen
}

#[rstest]
fn types_a_line_then_finishes_on_advance(mut sequencer: DialogueSequencer<RecordingPresenter>) {
    let mut bus = EventBus::new();
    let finished = bus.latch(DIALOGUE_FINISHED);
    let line = DialogueLine::new("Hi").typed_at(0.05);
    let intro = DialogueScript::new("intro", vec![line]).expect("one line");

    sequencer.play(intro, &mut bus);
    sequencer.tick(DT, &mut bus);
    sequencer.tick(DT, &mut bus);
    assert_eq!(sequencer.phase(), PlaybackPhase::WaitingForAdvance);

    for _ in 0..20 {
        sequencer.tick(DT, &mut bus);
    }
    assert!(!finished.fired());
    assert!(sequencer.is_active());

    sequencer.advance();
    sequencer.tick(DT, &mut bus);
    assert!(finished.fired());
    assert!(!sequencer.is_active());
    assert_eq!(
        sequencer.presenter().shown(),
        [
            Shown::Started("intro".to_owned()),
            Shown::Speaker(None),
            Shown::Text("H".to_owned()),
            Shown::Text("Hi".to_owned()),
            Shown::Finished("intro".to_owned()),
        ]
    );
}

#[rstest]
fn slower_lines_reveal_less_often(mut sequencer: DialogueSequencer<RecordingPresenter>) {
    let mut bus = EventBus::new();
    let slow = DialogueLine::new("abc").typed_at(0.1);
    sequencer.play(
        DialogueScript::new("slow", vec![slow]).expect("one line"),
        &mut bus,
    );
    let visible: Vec<String> = (0..5)
        .map(|_| {
            sequencer.tick(DT, &mut bus);
            sequencer.visible_text().to_owned()
        })
        .collect();
    assert_eq!(visible, ["a", "a", "ab", "ab", "abc"]);
}

#[rstest]
#[case::skip_only(false)]
#[case::skip_and_advance(true)]
fn skipping_a_middle_line_still_needs_an_advance(
    mut sequencer: DialogueSequencer<RecordingPresenter>,
    #[case] advance_too: bool,
) {
    let mut bus = EventBus::new();
    sequencer.play(script("three", &["One", "Two words", "Three"]), &mut bus);
    type_out(&mut sequencer, &mut bus);
    sequencer.advance();
    sequencer.tick(DT, &mut bus);
    assert_eq!(sequencer.line_index(), Some(1));
    assert_eq!(sequencer.visible_text(), "T");

    sequencer.skip();
    if advance_too {
        sequencer.advance();
    }
    sequencer.tick(DT, &mut bus);
    assert_eq!(sequencer.visible_text(), "Two words");
    assert_eq!(sequencer.phase(), PlaybackPhase::WaitingForAdvance);

    for _ in 0..10 {
        sequencer.tick(DT, &mut bus);
    }
    assert_eq!(sequencer.line_index(), Some(1));

    sequencer.advance();
    sequencer.tick(DT, &mut bus);
    assert_eq!(sequencer.line_index(), Some(2));
    assert_eq!(sequencer.visible_text(), "T");
}

#[rstest]
fn event_gated_line_waits_for_its_event(mut sequencer: DialogueSequencer<RecordingPresenter>) {
    let mut bus = EventBus::new();
    let gated = DialogueScript::new(
        "gated",
        vec![
            DialogueLine::new("Wait"),
            DialogueLine::new("Go").after_event("X"),
        ],
    )
    .expect("two lines");
    sequencer.play(gated, &mut bus);

    assert_eq!(bus.emit("X"), 0, "nothing waits for X before line 1");
    type_out(&mut sequencer, &mut bus);
    sequencer.advance();
    sequencer.tick(DT, &mut bus);
    assert_eq!(sequencer.phase(), PlaybackPhase::WaitingForEvent);

    for _ in 0..1_000 {
        sequencer.press();
        sequencer.tick(DT, &mut bus);
    }
    assert_eq!(bus.emit("Y"), 0);
    sequencer.tick(DT, &mut bus);
    assert_eq!(sequencer.phase(), PlaybackPhase::WaitingForEvent);
    assert_eq!(sequencer.visible_text(), "");

    assert_eq!(bus.emit("X"), 1);
    sequencer.tick(DT, &mut bus);
    assert_eq!(sequencer.phase(), PlaybackPhase::Typing);
    assert_eq!(sequencer.visible_text(), "G");
}

#[rstest]
fn restarting_cancels_without_finishing(mut sequencer: DialogueSequencer<RecordingPresenter>) {
    let mut bus = EventBus::new();
    let finished = details(&mut bus, DIALOGUE_FINISHED);
    sequencer.play(script("a", &["first"]), &mut bus);
    sequencer.tick(DT, &mut bus);
    sequencer.play(script("b", &["second"]), &mut bus);
    assert_eq!(sequencer.visible_text(), "");

    type_out(&mut sequencer, &mut bus);
    sequencer.advance();
    sequencer.tick(DT, &mut bus);

    assert_eq!(sequencer.presenter().started(), ["a", "b"]);
    assert_eq!(sequencer.presenter().finished(), ["b"]);
    assert_eq!(*finished.borrow(), [Some("b".to_owned())]);
}

#[rstest]
fn replaying_a_waiting_script_keeps_one_listener(
    mut sequencer: DialogueSequencer<RecordingPresenter>,
) {
    let mut bus = EventBus::new();
    let line = DialogueLine::new("Now").after_event("never");
    let waiting = DialogueScript::new("wait", vec![line]).expect("one line");
    for _ in 0..1_000 {
        sequencer.play(waiting.clone(), &mut bus);
    }
    assert_eq!(sequencer.phase(), PlaybackPhase::WaitingForEvent);
    assert_eq!(bus.listener_count("never"), 1);
    assert!(format!("{bus:?}").contains(r#"("never", 1)"#));

    assert_eq!(bus.emit("never"), 1);
    sequencer.tick(DT, &mut bus);
    assert_eq!(sequencer.visible_text(), "N");
}

#[rstest]
fn start_is_announced_with_the_script_id(mut sequencer: DialogueSequencer<RecordingPresenter>) {
    let mut bus = EventBus::new();
    let started = details(&mut bus, DIALOGUE_STARTED);
    sequencer
        .play_json(CHAPTER, "intro", &mut bus)
        .expect("intro exists");
    assert_eq!(*started.borrow(), [Some("intro".to_owned())]);
    assert_eq!(
        sequencer.presenter().shown().get(1),
        Some(&Shown::Speaker(Some("Mother".to_owned())))
    );
}

#[rstest]
fn unknown_id_leaves_playback_untouched(mut sequencer: DialogueSequencer<RecordingPresenter>) {
    let mut bus = EventBus::new();
    sequencer.play(script("a", &["first"]), &mut bus);
    sequencer.tick(DT, &mut bus);

    let err = sequencer
        .play_json(CHAPTER, "epilogue", &mut bus)
        .expect_err("no such entry");
    let DialogueError::UnknownId { id, available } = &err else {
        panic!("unexpected error {err:?}");
    };
    assert_eq!(id, "epilogue");
    assert_eq!(available, &["intro", "outro"]);
    assert!(err.to_string().contains("intro, outro"));

    assert_eq!(sequencer.current_id(), Some("a"));
    assert_eq!(sequencer.visible_text(), "f");
    assert_eq!(sequencer.presenter().started(), ["a"]);
}

#[rstest]
fn legacy_entry_plays_as_one_line(mut sequencer: DialogueSequencer<RecordingPresenter>) {
    let mut bus = EventBus::new();
    let source = MemorySource::default().with("chapter", CHAPTER);
    sequencer
        .play_from(&source, "chapter", "outro", &mut bus)
        .expect("outro exists");
    type_out(&mut sequencer, &mut bus);
    assert_eq!(sequencer.visible_text(), "Bye.");
    assert_eq!(
        sequencer.presenter().texts(),
        ["B", "By", "Bye", "Bye."]
    );
}

#[rstest]
fn reads_documents_from_disk(
    mut sequencer: DialogueSequencer<RecordingPresenter>,
) -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("chapter_one.json"), CHAPTER)?;
    let source = FsDialogueSource::new(dir.path());
    let mut bus = EventBus::new();

    sequencer.play_from(&source, "chapter_one", "intro", &mut bus)?;
    assert_eq!(sequencer.current_id(), Some("intro"));

    let missing = sequencer.play_from(&source, "chapter_two", "intro", &mut bus);
    assert!(matches!(missing, Err(DialogueError::Io { ref key, .. }) if key == "chapter_two"));
    assert_eq!(sequencer.current_id(), Some("intro"));
    Ok(())
}

#[rstest]
fn asks_the_source_for_the_requested_key(mut sequencer: DialogueSequencer<RecordingPresenter>) {
    let mut source = MockSource::new();
    source
        .expect_load()
        .withf(|key| key == "chapter")
        .times(1)
        .returning(|_| Ok(CHAPTER.to_owned()));
    let mut bus = EventBus::new();
    sequencer
        .play_from(&source, "chapter", "intro", &mut bus)
        .expect("source serves the chapter");
    assert_eq!(sequencer.phase(), PlaybackPhase::Typing);
}

#[rstest]
fn malformed_document_is_reported(mut sequencer: DialogueSequencer<RecordingPresenter>) {
    let mut bus = EventBus::new();
    let result = sequencer.play_json("{ not json", "intro", &mut bus);
    assert!(matches!(result, Err(DialogueError::Malformed(_))));
    assert!(!sequencer.is_active());
    assert!(sequencer.presenter().shown().is_empty());
}
