//! glance - read documents one word at a time

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;

use clap::{Parser, Subcommand};

use glance::{
    Clock, DirSourceStore, DocumentId, DocumentStore, ImportRequest, JsonDirStore, Library,
    NoopStayAwake, ReaderConfig, ReadingMode, ReadingSession, SystemClock, TickOutcome,
    WordDisplay,
};

#[derive(Parser)]
#[command(name = "glance")]
#[command(version, about = "Speed-read TXT and EPUB documents", long_about = None)]
#[command(after_help = "EXAMPLES:
    glance import book.epub        Add a book to the library
    glance list                    Show documents and progress
    glance read <ID> --wpm 400     Flash words from the saved position")]
struct Cli {
    /// Library directory
    #[arg(long, value_name = "DIR", default_value = "glance-library")]
    library: PathBuf,

    /// JSON configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log more (repeat for trace output)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import a TXT or EPUB file
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// List imported documents
    List,
    /// Show a document's table of contents
    Toc {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Delete a document
    Delete {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Speed-read a document from its saved position
    Read {
        #[arg(value_name = "ID")]
        id: String,

        /// Words per minute
        #[arg(long)]
        wpm: Option<u32>,

        /// Ease in from a slow pace
        #[arg(long)]
        ramp: bool,

        /// Stop after this many words
        #[arg(long)]
        limit: Option<usize>,
    },
}

type DirLibrary = Library<JsonDirStore>;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let config = match &cli.config {
        Some(path) => ReaderConfig::from_path(path).map_err(|e| e.to_string())?,
        None => ReaderConfig::default(),
    };
    let mut library = open_library(&cli.library, &config)?;

    match cli.command {
        Command::Import { file } => import(&mut library, &file),
        Command::List => {
            list(&library);
            Ok(())
        }
        Command::Toc { id } => toc(&library, &DocumentId::new(id)),
        Command::Delete { id } => library
            .remove(&DocumentId::new(id))
            .map_err(|e| e.to_string()),
        Command::Read {
            id,
            wpm,
            ramp,
            limit,
        } => read(&mut library, &config, &DocumentId::new(id), wpm, ramp, limit),
    }
}

fn open_library(root: &Path, config: &ReaderConfig) -> Result<DirLibrary, String> {
    let store = JsonDirStore::open(root.join("records")).map_err(|e| e.to_string())?;
    let library = Library::with_config(store, config.import).map_err(|e| e.to_string())?;
    Ok(library.with_source_store(DirSourceStore::new(root)))
}

fn import(library: &mut DirLibrary, path: &Path) -> Result<(), String> {
    let data = std::fs::read(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let now = SystemClock::new().now();

    let imported = library
        .import(ImportRequest::new(&file_name, &data, now))
        .map_err(|e| e.user_message())?;
    for warning in &imported.warnings {
        eprintln!("{warning}");
    }
    let doc = imported.document;
    println!("{}  {}  {} words", doc.id, doc.filename, doc.total_words);
    Ok(())
}

fn list(library: &DirLibrary) {
    if library.documents().is_empty() {
        println!("No documents yet. Import one with `glance import FILE`.");
        return;
    }
    for doc in library.documents() {
        println!(
            "{}  {}  {}% \u{2022} {}/{} words",
            doc.id,
            doc.filename,
            doc.progress_percent(),
            doc.last_read_position,
            doc.total_words
        );
    }
}

fn toc(library: &DirLibrary, id: &DocumentId) -> Result<(), String> {
    let doc = library.read(id).map_err(|e| e.to_string())?;
    if doc.toc_entries().is_empty() {
        println!("No table of contents available for this document.");
    }
    for entry in doc.toc_entries() {
        let percent = if doc.total_words == 0 {
            0
        } else {
            (entry.word_index as f64 / doc.total_words as f64 * 100.0).round() as u32
        };
        println!(
            "{}  ({}% \u{2022} Word {})",
            entry.title,
            percent,
            entry.word_index + 1
        );
    }
    Ok(())
}

fn read(
    library: &mut DirLibrary,
    config: &ReaderConfig,
    id: &DocumentId,
    wpm: Option<u32>,
    ramp: bool,
    limit: Option<usize>,
) -> Result<(), String> {
    let mut session = ReadingSession::new(SystemClock::new(), NoopStayAwake::default(), config.pacing);
    session.open(id, library).map_err(|e| e.to_string())?;
    session
        .set_mode(ReadingMode::Speed, library)
        .map_err(|e| e.to_string())?;
    if let Some(wpm) = wpm {
        session.set_speed(wpm);
    }
    session.set_ramp_enabled(ramp);

    println!("{}", session.word_display());
    session.play();

    let mut shown = 1usize;
    while session.is_playing() && limit.is_none_or(|limit| shown < limit) {
        if let Some(wait) = session.engine().next_deadline() {
            thread::sleep(wait);
        }
        for outcome in session.run_due(library).map_err(|e| e.to_string())? {
            if let TickOutcome::Advanced(_) = outcome {
                shown += 1;
                println!("{}", WordDisplay::new(session.current_word().unwrap_or("")));
            }
        }
    }

    eprintln!("{}", session.progress());
    session.close(library).map_err(|e| e.to_string())
}
