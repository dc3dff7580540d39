mod common;

use common::{build_epub, build_zip, chapter, missing, xhtml, CONTAINER_XML};
use glance::{Error, ImportWarning, tokenize_text};
use glance::tokenize::tokenize_epub_bytes;

#[test]
fn test_hello_world() {
    assert_eq!(tokenize_text("Hello, world!").words, vec!["Hello,", "world!"]);
}

#[test]
fn test_whitespace_only_text_has_no_words() {
    assert!(tokenize_text("").words.is_empty());
    assert!(tokenize_text(" \r\n\t ").words.is_empty());
}

#[test]
fn test_percentage_toc_for_hundred_words() {
    let result = tokenize_text(&common::numbered_words(100));
    let indices: Vec<_> = result.toc.iter().map(|e| e.word_index).collect();
    let titles: Vec<_> = result.toc.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(indices, vec![0, 25, 50, 75, 99]);
    assert_eq!(titles, vec!["0%", "25%", "50%", "75%", "100%"]);
}

#[test]
fn test_three_chapter_epub_with_missing_middle() {
    let ch1 = xhtml("One", "<h1>The Start</h1><p>First words here.</p>");
    let ch3 = xhtml("Three", "<h2>The End</h2><p>Last words.</p>");
    let epub = build_epub(&[
        chapter("ch1.xhtml", &ch1),
        missing("ch2.xhtml"),
        chapter("ch3.xhtml", &ch3),
    ]);

    let result = tokenize_epub_bytes(&epub).unwrap();
    assert_eq!(
        result.tokenized.words,
        vec!["The", "Start", "First", "words", "here.", "The", "End", "Last", "words."]
    );
    let toc = &result.tokenized.toc;
    assert_eq!(toc.len(), 2);
    assert_eq!((toc[0].title.as_str(), toc[0].word_index), ("The Start", 0));
    assert_eq!((toc[1].title.as_str(), toc[1].word_index), ("The End", 5));
    assert_eq!(result.failed_chapters, 1);
    assert_eq!(
        result.warning(),
        Some(ImportWarning::PartialChapterFailure {
            failed: 1,
            succeeded: 2
        })
    );
}

#[test]
fn test_block_elements_do_not_fuse_words() {
    let body = xhtml("", "<div>alpha</div><div>beta</div><ul><li>gamma</li><li>delta</li></ul>");
    let epub = build_epub(&[chapter("c.xhtml", &body)]);
    let result = tokenize_epub_bytes(&epub).unwrap();
    assert_eq!(result.tokenized.words, vec!["alpha", "beta", "gamma", "delta"]);
}

#[test]
fn test_fallback_chapter_title() {
    let body = xhtml("", "<p>untitled text</p>");
    let epub = build_epub(&[chapter("c.xhtml", &body)]);
    let result = tokenize_epub_bytes(&epub).unwrap();
    assert_eq!(result.tokenized.toc[0].title, "Chapter 1");
}

#[test]
fn test_fatal_epub_errors() {
    let no_container = build_zip(&[("mimetype", "application/epub+zip")]);
    assert!(matches!(tokenize_epub_bytes(&no_container), Err(Error::InvalidContainer)));

    let no_rootfile = build_zip(&[("META-INF/container.xml", "<container><rootfiles/></container>")]);
    assert!(matches!(tokenize_epub_bytes(&no_rootfile), Err(Error::MissingRootfile)));

    let no_opf = build_zip(&[("META-INF/container.xml", CONTAINER_XML)]);
    assert!(matches!(tokenize_epub_bytes(&no_opf), Err(Error::MissingContentFile)));

    let empty = build_epub(&[]);
    assert!(matches!(tokenize_epub_bytes(&empty), Err(Error::EmptySpine)));

    let blank = xhtml("Blank", "<p> </p>");
    let all_empty = build_epub(&[chapter("a.xhtml", &blank), missing("b.xhtml")]);
    assert!(matches!(tokenize_epub_bytes(&all_empty), Err(Error::NoReadableText)));

    let garbage = tokenize_epub_bytes(b"not a zip archive").unwrap_err();
    assert!(matches!(garbage, Error::Parse(_)));
}
