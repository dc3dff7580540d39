//! # glance
//!
//! Core of a two-mode document reader: paginated reading and RSVP speed
//! reading, where words flash one at a time at a controlled pace.
//!
//! ## Features
//!
//! - Tokenize plain text and EPUB files into a flat word sequence with a
//!   table of contents
//! - Drive RSVP playback with constant or ramped pacing on an injected clock
//! - Resume where the reader left off through a pluggable document store
//!
//! ## Quick Start
//!
//! ```
//! use glance::{
//!     ImportRequest, Library, ManualClock, MemoryStore, NoopStayAwake, PacingConfig,
//!     ReadingSession,
//! };
//! use std::time::Duration;
//!
//! let mut library = Library::open(MemoryStore::new()).unwrap();
//! let doc = library
//!     .import(ImportRequest::new("notes.txt", b"Hello, world! Read fast.", 0))
//!     .unwrap()
//!     .document;
//!
//! let mut session =
//!     ReadingSession::new(ManualClock::new(0), NoopStayAwake::default(), PacingConfig::default());
//! session.open(&doc.id, &mut library).unwrap();
//! assert_eq!(session.current_word(), Some("Hello,"));
//!
//! session.play();
//! session.clock_mut().advance(Duration::from_millis(200));
//! session.run_due(&mut library).unwrap();
//! assert_eq!(session.current_word(), Some("world!"));
//! ```

pub mod archive;
pub mod awake;
pub mod clock;
pub mod config;
pub mod document;
pub mod error;
pub mod library;
pub mod markup;
pub mod playback;
pub mod session;
pub mod store;
pub mod tokenize;
pub(crate) mod util;

pub use awake::{NoopStayAwake, StayAwake, StayAwakeError, WakeHandle};
pub use clock::{Clock, ManualClock, SystemClock, TimerHandle};
pub use config::{ImportConfig, PacingConfig, ReaderConfig};
pub use document::{Document, DocumentFormat, DocumentId, DocumentSummary, Timestamp, TocEntry};
pub use error::{Error, Result};
pub use library::{ImportRequest, Imported, Library};
pub use playback::{PlaybackEngine, PlaybackState, PositionTracker, Progress, TickOutcome, WordDisplay};
pub use session::{LifecycleEvent, ReadingMode, ReadingSession};
pub use store::{DirSourceStore, DocumentStore, JsonDirStore, MemoryStore, SourceStore};
pub use tokenize::{EpubImport, ImportWarning, Tokenized, tokenize_epub, tokenize_text};
