//! Shared fixtures: EPUB archives built in memory.

#![allow(dead_code)]

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

/// One spine chapter. `body: None` leaves it out of the archive.
pub struct Chapter<'a> {
    pub href: &'a str,
    pub body: Option<&'a str>,
}

pub fn chapter<'a>(href: &'a str, body: &'a str) -> Chapter<'a> {
    Chapter {
        href,
        body: Some(body),
    }
}

pub fn missing<'a>(href: &'a str) -> Chapter<'a> {
    Chapter { href, body: None }
}

pub fn xhtml(title: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml">
<head><title>{title}</title></head>
<body>{body}</body>
</html>"#
    )
}

fn opf(chapters: &[Chapter<'_>]) -> String {
    let mut manifest = String::new();
    let mut spine = String::new();
    for (i, ch) in chapters.iter().enumerate() {
        manifest.push_str(&format!(
            r#"<item id="ch{i}" href="{}" media-type="application/xhtml+xml"/>"#,
            ch.href
        ));
        spine.push_str(&format!(r#"<itemref idref="ch{i}"/>"#));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="uid">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title>Fixture</dc:title></metadata>
  <manifest>{manifest}</manifest>
  <spine>{spine}</spine>
</package>"#
    )
}

/// Zip bytes for an EPUB whose spine lists `chapters` in order.
pub fn build_epub(chapters: &[Chapter<'_>]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("mimetype", stored).unwrap();
    zip.write_all(b"application/epub+zip").unwrap();
    zip.start_file("META-INF/container.xml", deflated).unwrap();
    zip.write_all(CONTAINER_XML.as_bytes()).unwrap();
    zip.start_file("OEBPS/content.opf", deflated).unwrap();
    zip.write_all(opf(chapters).as_bytes()).unwrap();

    for ch in chapters {
        if let Some(body) = ch.body {
            zip.start_file(format!("OEBPS/{}", ch.href), deflated).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
    }

    zip.finish().unwrap().into_inner()
}

/// Zip bytes with arbitrary entries.
pub fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, data) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(data.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

/// Space-separated `w0 w1 ...` text with `n` words.
pub fn numbered_words(n: usize) -> String {
    (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
}
