mod common;

use std::time::Duration;

use glance::{
    Clock, DocumentStore, ImportRequest, LifecycleEvent, Library, ManualClock, MemoryStore,
    NoopStayAwake, PacingConfig, PlaybackState, ReadingMode, ReadingSession, TickOutcome,
};

type Session = ReadingSession<ManualClock, NoopStayAwake>;

fn setup(text: &str) -> (Library<MemoryStore>, Session, glance::DocumentId) {
    let mut library = Library::open(MemoryStore::new()).unwrap();
    let id = library
        .import(ImportRequest::new("doc.txt", text.as_bytes(), 0))
        .unwrap()
        .document
        .id;
    let mut session = ReadingSession::new(
        ManualClock::new(5_000),
        NoopStayAwake::default(),
        PacingConfig::default(),
    );
    session.open(&id, &mut library).unwrap();
    (library, session, id)
}

#[test]
fn test_five_words_play_to_the_end() {
    let (mut library, mut session, id) = setup("one two three four five");
    session.set_mode(ReadingMode::Speed, &mut library).unwrap();
    session.play();

    let mut outcomes = Vec::new();
    while session.is_playing() {
        let wait = session.engine().next_deadline().unwrap();
        assert_eq!(wait, Duration::from_millis(200));
        session.clock_mut().advance(wait);
        outcomes.extend(session.run_due(&mut library).unwrap());
    }

    assert_eq!(
        outcomes,
        vec![
            TickOutcome::Advanced(1),
            TickOutcome::Advanced(2),
            TickOutcome::Advanced(3),
            TickOutcome::Advanced(4),
            TickOutcome::Finished(4),
        ]
    );
    assert_eq!(session.clock_mut().elapsed(), Duration::from_millis(1000));
    assert_eq!(session.current_word(), Some("five"));
    assert_eq!(library.get(&id).unwrap().last_read_position, 4);
}

#[test]
fn test_seek_clamps_into_document() {
    let (_library, mut session, _id) = setup(&common::numbered_words(100));
    assert_eq!(session.seek(-5), 0);
    assert_eq!(session.seek(500), 99);
    assert_eq!(session.current_word(), Some("w99"));
}

#[test]
fn test_resume_from_saved_position() {
    let (mut library, mut session, id) = setup(&common::numbered_words(50));
    session.jump_to_chapter(30);
    session.close(&mut library).unwrap();
    assert!(session.document().is_none());

    session.open(&id, &mut library).unwrap();
    assert_eq!(session.current_index(), 30);
    assert_eq!(session.mode(), ReadingMode::Normal);
}

#[test]
fn test_save_is_idempotent() {
    let (mut library, mut session, id) = setup(&common::numbered_words(10));
    session.seek(7);
    session.save(&mut library).unwrap();
    let first = library.store().raw(&id).unwrap().to_string();
    session.save(&mut library).unwrap();
    assert_eq!(library.store().raw(&id).unwrap(), first);
}

#[test]
fn test_open_stamps_access_time() {
    let (library, session, id) = setup("a b c");
    assert_eq!(session.document().unwrap().last_accessed_at, 5_000);
    assert_eq!(library.store().read(&id).unwrap().last_accessed_at, 5_000);
    assert_eq!(library.get(&id).unwrap().added_at, 0);
}

#[test]
fn test_pages_save_but_words_do_not() {
    let (mut library, mut session, id) = setup(&common::numbered_words(100));

    assert_eq!(session.go_to_next_page(40, &mut library).unwrap(), 40);
    assert_eq!(library.get(&id).unwrap().last_read_position, 40);

    session.go_to_next_word();
    assert_eq!(session.current_index(), 41);
    assert_eq!(library.get(&id).unwrap().last_read_position, 40);

    assert_eq!(session.go_to_next_page(80, &mut library).unwrap(), 99);
    assert_eq!(session.go_to_previous_page(500, &mut library).unwrap(), 0);
    assert_eq!(library.get(&id).unwrap().last_read_position, 0);
}

#[test]
fn test_leaving_speed_mode_pauses_and_saves() {
    let (mut library, mut session, id) = setup(&common::numbered_words(20));
    session.set_mode(ReadingMode::Speed, &mut library).unwrap();
    session.play();
    for _ in 0..3 {
        session.clock_mut().advance_to_next();
        session.run_due(&mut library).unwrap();
    }
    assert_eq!(session.current_index(), 3);
    assert_eq!(session.clock_mut().elapsed(), Duration::from_millis(600));

    session.set_mode(ReadingMode::Normal, &mut library).unwrap();
    assert!(!session.is_playing());
    assert_eq!(library.get(&id).unwrap().last_read_position, 3);
}

#[test]
fn test_lifecycle_event_saves_position() {
    let (mut library, mut session, id) = setup(&common::numbered_words(20));
    session.seek(12);
    session.on_lifecycle(LifecycleEvent::VisibilityHidden, &mut library);
    assert_eq!(library.get(&id).unwrap().last_read_position, 12);
}

#[test]
fn test_toggle_play_pause() {
    let (mut library, mut session, _id) = setup("a b c");
    assert_eq!(session.toggle_play_pause(&mut library).unwrap(), PlaybackState::Running);
    assert_eq!(session.toggle_play_pause(&mut library).unwrap(), PlaybackState::Stopped);
    assert!(session.engine().next_deadline().is_none());
}

#[test]
fn test_speed_change_while_playing_applies_to_next_word() {
    let (mut library, mut session, _id) = setup(&common::numbered_words(20));
    session.play();
    session.clock_mut().advance(Duration::from_millis(200));
    session.run_due(&mut library).unwrap();

    assert_eq!(session.set_speed(600), 600);
    assert_eq!(session.engine().next_deadline(), Some(Duration::from_millis(100)));
    session.clock_mut().advance(Duration::from_millis(100));
    session.run_due(&mut library).unwrap();
    assert_eq!(session.current_index(), 2);
    assert_eq!(session.engine().next_deadline(), Some(Duration::from_millis(100)));
}

#[test]
fn test_forget_drops_document_without_saving() {
    let (mut library, mut session, id) = setup("a b c");
    session.seek(2);
    session.forget(&id);
    library.remove(&id).unwrap();
    assert!(session.document().is_none());
    session.save(&mut library).unwrap();
    assert!(library.store().is_empty());
}

#[test]
fn test_progress_and_display() {
    let (_library, mut session, _id) = setup("Reading quickly is fun");
    session.seek(1);
    assert_eq!(session.progress().to_string(), "25% \u{2022} Word 2/4");
    let display = session.word_display();
    assert_eq!((display.before, display.focus, display.after), ("qu", "i", "ckly"));
    assert_eq!(session.engine().clock().now(), 5_000);
}
