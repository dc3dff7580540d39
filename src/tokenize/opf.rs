//! EPUB package parsing: container.xml and the OPF manifest/spine.

use std::borrow::Cow;
use std::collections::HashMap;

use percent_encoding::percent_decode_str;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Error, Result};

/// Path of the container document inside every EPUB.
pub const CONTAINER_PATH: &str = "META-INF/container.xml";

/// Manifest and spine of an OPF package, with hrefs already resolved to
/// archive paths.
#[derive(Debug, Default)]
pub struct Package {
    /// Maps manifest id -> archive path.
    pub manifest: HashMap<String, String>,
    /// Manifest ids in reading order.
    pub spine: Vec<String>,
}

impl Package {
    /// Archive paths of the spine, in reading order. Unknown ids are dropped.
    pub fn spine_paths(&self) -> impl Iterator<Item = &str> {
        self.spine
            .iter()
            .filter_map(|id| self.manifest.get(id).map(String::as_str))
    }
}

/// Find the package document path in container.xml.
pub fn parse_container(content: &str) -> Result<String> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event()? {
            Event::Empty(e) | Event::Start(e) if local_name(e.name().as_ref()) == b"rootfile" => {
                return attr_value(&e, b"full-path")
                    .filter(|path| !path.is_empty())
                    .ok_or(Error::MissingRootfile);
            }
            Event::Eof => return Err(Error::MissingRootfile),
            _ => {}
        }
    }
}

/// Parse the manifest and spine of an OPF document located at `opf_path`.
pub fn parse_opf(content: &str, opf_path: &str) -> Result<Package> {
    let base_dir = opf_path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");

    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut package = Package::default();
    let mut in_manifest = false;
    let mut in_spine = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                match local_name(e.name().as_ref()) {
                    b"manifest" => in_manifest = true,
                    b"spine" => in_spine = true,
                    _ => {}
                }
                package_entry(&e, in_manifest, in_spine, base_dir, &mut package);
            }
            Event::Empty(e) => package_entry(&e, in_manifest, in_spine, base_dir, &mut package),
            Event::End(e) => match local_name(e.name().as_ref()) {
                b"manifest" => in_manifest = false,
                b"spine" => in_spine = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(package)
}

fn package_entry(
    e: &BytesStart<'_>,
    in_manifest: bool,
    in_spine: bool,
    base_dir: &str,
    package: &mut Package,
) {
    match local_name(e.name().as_ref()) {
        b"item" if in_manifest => {
            if let (Some(id), Some(href)) = (attr_value(e, b"id"), attr_value(e, b"href"))
                && !id.is_empty()
            {
                package.manifest.insert(id, resolve_href(base_dir, &href));
            }
        }
        b"itemref" if in_spine => {
            if let Some(idref) = attr_value(e, b"idref") {
                package.spine.push(idref);
            }
        }
        _ => {}
    }
}

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    let attr = e
        .attributes()
        .flatten()
        .find(|a| local_name(a.key.as_ref()) == key)?;
    let raw = String::from_utf8_lossy(&attr.value);
    let value = match quick_xml::escape::unescape(&raw) {
        Ok(unescaped) => unescaped.into_owned(),
        Err(_) => raw.into_owned(),
    };
    Some(value)
}

/// Resolve a manifest href against the OPF directory.
///
/// Percent-escapes are decoded, fragments dropped, and `.`/`..` segments
/// collapsed. `..` never climbs above the archive root.
pub fn resolve_href(base_dir: &str, href: &str) -> String {
    let href = href.split('#').next().unwrap_or("");
    let decoded: Cow<'_, str> = percent_decode_str(href).decode_utf8_lossy();

    let mut segments: Vec<&str> = if decoded.starts_with('/') {
        Vec::new()
    } else {
        base_dir.split('/').filter(|s| !s.is_empty()).collect()
    };

    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    segments.join("/")
}

/// True when `path` names an HTML chapter (`.html`, `.xhtml`, `.htm`).
pub fn is_html_path(path: &str) -> bool {
    let Some((_, ext)) = path.rsplit_once('.') else {
        return false;
    };
    ["html", "xhtml", "htm"]
        .iter()
        .any(|known| ext.eq_ignore_ascii_case(known))
}

/// Extract local name from namespaced XML name (e.g., "opf:item" -> "item").
fn local_name(name: &[u8]) -> &[u8] {
    name.iter()
        .rposition(|&b| b == b':')
        .map(|i| &name[i + 1..])
        .unwrap_or(name)
}
