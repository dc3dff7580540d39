mod common;

use std::path::Path;

use common::{build_epub, chapter, missing, xhtml};
use glance::{
    DirSourceStore, DocumentFormat, DocumentStore, Error, ImportRequest, ImportWarning,
    JsonDirStore, Library,
};
use tempfile::TempDir;

fn json_library(dir: &TempDir) -> Library<JsonDirStore> {
    let store = JsonDirStore::open(dir.path().join("records")).unwrap();
    Library::open(store).unwrap()
}

#[test]
fn test_import_epub_with_failed_chapter() {
    let dir = TempDir::new().unwrap();
    let mut library = json_library(&dir);

    let ch1 = xhtml("One", "<h1>Opening</h1><p>It was a dark night.</p>");
    let ch3 = xhtml("Three", "<h1>Closing</h1><p>The end.</p>");
    let epub = build_epub(&[
        chapter("one.xhtml", &ch1),
        missing("two.xhtml"),
        chapter("three.xhtml", &ch3),
    ]);

    let imported = library
        .import(ImportRequest::new("novel.epub", &epub, 10))
        .unwrap();
    let doc = &imported.document;
    assert_eq!(doc.format, DocumentFormat::Epub);
    assert_eq!(doc.toc_entries().len(), 2);
    assert_eq!(doc.toc_entries()[1].title, "Closing");
    assert_eq!(
        imported.warnings,
        vec![ImportWarning::PartialChapterFailure {
            failed: 1,
            succeeded: 2
        }]
    );
    assert!(
        imported.warnings[0]
            .to_string()
            .contains("1 chapter(s) could not be parsed")
    );
}

#[test]
fn test_documents_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let id = {
        let mut library = json_library(&dir);
        library
            .import(ImportRequest::new("a.txt", b"alpha beta gamma", 1))
            .unwrap();
        library
            .import(ImportRequest::new("b.txt", b"delta", 2))
            .unwrap()
            .document
            .id
    };

    let library = json_library(&dir);
    let names: Vec<_> = library.documents().iter().map(|d| d.filename.as_str()).collect();
    assert_eq!(names, vec!["a.txt", "b.txt"]);

    let doc = library.store().read(&id).unwrap();
    assert_eq!(doc.words.as_ref(), ["delta"]);
    assert_eq!(doc.total_words, 1);
}

#[test]
fn test_remove_deletes_record() {
    let dir = TempDir::new().unwrap();
    let mut library = json_library(&dir);
    let id = library
        .import(ImportRequest::new("a.txt", b"gone soon", 1))
        .unwrap()
        .document
        .id;

    library.remove(&id).unwrap();
    assert!(library.documents().is_empty());
    assert!(matches!(library.store().read(&id), Err(Error::NotFound(_))));
    assert!(matches!(library.remove(&id), Err(Error::NotFound(_))));
}

#[test]
fn test_source_copy_is_written() {
    let dir = TempDir::new().unwrap();
    let mut library = json_library(&dir).with_source_store(DirSourceStore::new(dir.path()));
    let imported = library
        .import(ImportRequest::new("notes.txt", b"kept on disk", 1))
        .unwrap();

    let path = imported.document.filepath.clone().unwrap();
    assert!(path.ends_with(".txt"));
    assert_eq!(std::fs::read(Path::new(&path)).unwrap(), b"kept on disk");
    assert!(imported.warnings.is_empty());
}

#[test]
fn test_rejected_imports_write_nothing() {
    let dir = TempDir::new().unwrap();
    let mut library = json_library(&dir);

    let err = library
        .import(ImportRequest::new("slides.pptx", b"PK", 1))
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat(_)));

    let err = library
        .import(ImportRequest::new("broken.epub", b"not a zip", 1))
        .unwrap_err();
    assert!(err.is_fatal_import());
    assert!(err.user_message().starts_with("Error importing document:"));

    assert!(library.documents().is_empty());
    assert!(library.store().list().unwrap().is_empty());
}

#[test]
fn test_latin1_text_is_decoded() {
    let dir = TempDir::new().unwrap();
    let mut library = json_library(&dir);
    let imported = library
        .import(ImportRequest::new("cafe.txt", b"caf\xe9 au lait", 1))
        .unwrap();
    assert_eq!(imported.document.words[0], "caf\u{e9}");
}
