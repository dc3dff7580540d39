//! The reading session: one open document, its cursor and playback.
//!
//! The session never owns storage. Every operation that persists takes
//! the store as an argument, so a host can point it at a [`Library`]
//! (keeping the library list current) or at a bare store in tests.
//!
//! [`Library`]: crate::library::Library

use crate::awake::StayAwake;
use crate::clock::Clock;
use crate::config::PacingConfig;
use crate::document::{Document, DocumentId, TocEntry};
use crate::error::Result;
use crate::playback::{PlaybackEngine, PlaybackState, PositionTracker, Progress, TickOutcome, WordDisplay};
use crate::store::DocumentStore;

/// Which view the reader is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadingMode {
    /// Paginated reading.
    #[default]
    Normal,
    /// One word at a time.
    Speed,
}

/// Host signals that may precede the process being suspended or killed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Background,
    VisibilityHidden,
    Unload,
}

pub struct ReadingSession<C: Clock, W: StayAwake> {
    document: Option<Document>,
    position: PositionTracker,
    engine: PlaybackEngine<C, W>,
    mode: ReadingMode,
}

impl<C: Clock, W: StayAwake> ReadingSession<C, W> {
    pub fn new(clock: C, awake: W, config: PacingConfig) -> Self {
        Self {
            document: None,
            position: PositionTracker::empty(),
            engine: PlaybackEngine::new(clock, awake, config),
            mode: ReadingMode::Normal,
        }
    }

    /// Open the document stored under `id`, closing any open one first.
    ///
    /// The cursor resumes at the saved position. The new access time is
    /// written straight away; a failure there is logged, not returned.
    pub fn open<S: DocumentStore + ?Sized>(&mut self, id: &DocumentId, store: &mut S) -> Result<()> {
        let document = store.read(id)?;
        self.open_document(document, store);
        Ok(())
    }

    /// Open an already loaded document.
    pub fn open_document<S: DocumentStore + ?Sized>(&mut self, mut document: Document, store: &mut S) {
        if self.document.is_some()
            && let Err(e) = self.close(store)
        {
            log::warn!("Failed to save previous document: {}", e);
        }

        document.last_read_position = document.clamp_index(document.last_read_position);
        document.last_accessed_at = self.engine.clock().now();
        if let Err(e) = store.write(&document.id, &document) {
            log::warn!("Failed to record access time for {}: {}", document.id, e);
        }

        self.engine.reset_for_new_document();
        self.position = PositionTracker::new(document.words.clone(), document.last_read_position);
        self.mode = ReadingMode::Normal;
        log::debug!(
            "Opened {} at word {}/{}",
            document.id,
            self.position.index(),
            self.position.len()
        );
        self.document = Some(document);
    }

    /// Copy the cursor into the open document and persist it.
    ///
    /// A no-op without an open document.
    pub fn save<S: DocumentStore + ?Sized>(&mut self, store: &mut S) -> Result<()> {
        let now = self.engine.clock().now();
        let Some(document) = self.document.as_mut() else {
            return Ok(());
        };
        document.last_read_position = self.position.index();
        document.last_accessed_at = now;
        store.write(&document.id, document)?;
        log::trace!("Saved {} at word {}", document.id, document.last_read_position);
        Ok(())
    }

    /// Stop playback, save, and drop the document.
    ///
    /// The document is dropped even when saving fails.
    pub fn close<S: DocumentStore + ?Sized>(&mut self, store: &mut S) -> Result<()> {
        self.engine.pause();
        let saved = self.save(store);
        self.clear();
        saved
    }

    /// Drop the open document without saving if it is `id`.
    ///
    /// Used when the document is being deleted, so no later save writes
    /// it back.
    pub fn forget(&mut self, id: &DocumentId) {
        if self.document_id() == Some(id) {
            self.engine.pause();
            self.clear();
        }
    }

    fn clear(&mut self) {
        self.document = None;
        self.position = PositionTracker::empty();
        self.mode = ReadingMode::Normal;
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn document_id(&self) -> Option<&DocumentId> {
        self.document.as_ref().map(|d| &d.id)
    }

    pub fn position(&self) -> &PositionTracker {
        &self.position
    }

    pub fn current_index(&self) -> usize {
        self.position.index()
    }

    pub fn engine(&self) -> &PlaybackEngine<C, W> {
        &self.engine
    }

    pub fn clock_mut(&mut self) -> &mut C {
        self.engine.clock_mut()
    }

    pub fn mode(&self) -> ReadingMode {
        self.mode
    }

    /// Switch views. Leaving speed mode while playing pauses and saves.
    pub fn set_mode<S: DocumentStore + ?Sized>(&mut self, mode: ReadingMode, store: &mut S) -> Result<()> {
        let leaving_speed = self.mode == ReadingMode::Speed && mode != ReadingMode::Speed;
        self.mode = mode;
        if leaving_speed && self.engine.is_running() {
            self.engine.pause();
            return self.save(store);
        }
        Ok(())
    }

    pub fn is_playing(&self) -> bool {
        self.engine.is_running()
    }

    pub fn play(&mut self) {
        self.engine.play(&self.position);
    }

    /// Pause playback and save the position.
    pub fn pause<S: DocumentStore + ?Sized>(&mut self, store: &mut S) -> Result<()> {
        if !self.engine.is_running() {
            return Ok(());
        }
        self.engine.pause();
        self.save(store)
    }

    /// Tap-to-toggle. Returns the new state.
    pub fn toggle_play_pause<S: DocumentStore + ?Sized>(&mut self, store: &mut S) -> Result<PlaybackState> {
        if self.engine.is_running() {
            self.pause(store)?;
        } else {
            self.play();
        }
        Ok(self.engine.state())
    }

    /// Deliver due playback ticks. Saves when playback reaches the end.
    pub fn run_due<S: DocumentStore + ?Sized>(&mut self, store: &mut S) -> Result<Vec<TickOutcome>> {
        let outcomes = self.engine.run_due(&mut self.position);
        if outcomes.iter().any(|o| matches!(o, TickOutcome::Finished(_))) {
            self.save(store)?;
        }
        Ok(outcomes)
    }

    /// React to the host going away: pause and save.
    ///
    /// Failures are logged; there is nobody left to report them to.
    pub fn on_lifecycle<S: DocumentStore + ?Sized>(&mut self, event: LifecycleEvent, store: &mut S) {
        log::debug!("Lifecycle event: {:?}", event);
        self.engine.pause();
        if let Err(e) = self.save(store) {
            log::warn!("Failed to save reading state on {:?}: {}", event, e);
        }
    }

    pub fn set_speed(&mut self, wpm: u32) -> u32 {
        self.engine.set_speed(wpm, &self.position)
    }

    pub fn speed_up(&mut self) -> bool {
        self.engine.speed_up(&self.position)
    }

    pub fn slow_down(&mut self) -> bool {
        self.engine.slow_down(&self.position)
    }

    pub fn set_ramp_enabled(&mut self, enabled: bool) {
        self.engine.set_ramp_enabled(enabled, &self.position);
    }

    /// Current pace, as shown in "Current: N WPM".
    pub fn current_wpm(&self) -> f64 {
        self.engine.current_wpm(&self.position)
    }

    pub fn seek(&mut self, index: i64) -> usize {
        self.engine.seek(index, &mut self.position)
    }

    pub fn reset(&mut self) -> usize {
        self.engine.reset(&mut self.position)
    }

    /// Page forward by the capacity the view reports, then save.
    pub fn go_to_next_page<S: DocumentStore + ?Sized>(&mut self, words_per_page: usize, store: &mut S) -> Result<usize> {
        self.turn_page(page_delta(words_per_page), store)
    }

    pub fn go_to_previous_page<S: DocumentStore + ?Sized>(&mut self, words_per_page: usize, store: &mut S) -> Result<usize> {
        self.turn_page(-page_delta(words_per_page), store)
    }

    fn turn_page<S: DocumentStore + ?Sized>(&mut self, delta: i64, store: &mut S) -> Result<usize> {
        let target = i64::try_from(self.position.index())
            .unwrap_or(i64::MAX)
            .saturating_add(delta);
        let index = self.seek(target);
        self.save(store)?;
        Ok(index)
    }

    /// Single-word step; not saved until the next checkpoint.
    pub fn go_to_next_word(&mut self) -> usize {
        self.engine.step_forward(&mut self.position)
    }

    pub fn go_to_previous_word(&mut self) -> usize {
        self.engine.step_backward(&mut self.position)
    }

    /// Jump to a table-of-contents entry's word. Not saved by itself.
    pub fn jump_to_chapter(&mut self, word_index: usize) -> usize {
        self.seek(i64::try_from(word_index).unwrap_or(i64::MAX))
    }

    pub fn toc(&self) -> &[TocEntry] {
        self.document.as_ref().map(Document::toc_entries).unwrap_or(&[])
    }

    pub fn current_word(&self) -> Option<&str> {
        self.position.current_word()
    }

    pub fn word_display(&self) -> WordDisplay<'_> {
        self.current_word().map(WordDisplay::new).unwrap_or_default()
    }

    pub fn progress(&self) -> Progress {
        Progress::new(self.position.index(), self.position.len())
    }
}

fn page_delta(words_per_page: usize) -> i64 {
    i64::try_from(words_per_page.max(1)).unwrap_or(i64::MAX)
}
