//! Readable text from a markup tree.

use super::{MarkupTree, NodeKind};
use crate::util::collapse_whitespace;

/// Elements that separate words visually even without surrounding whitespace.
pub const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "h1", "h2", "h3", "h4", "h5", "h6", "li", "tr", "td", "th", "br", "hr",
    "blockquote", "pre", "article", "section", "header", "footer", "nav", "aside",
    "figcaption", "figure", "dt", "dd",
];

/// Containers whose text is never part of the reading flow.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "head", "template"];

pub fn is_block_element(name: &str) -> bool {
    BLOCK_ELEMENTS.iter().any(|b| b.eq_ignore_ascii_case(name))
}

fn is_skipped(name: &str) -> bool {
    SKIPPED_ELEMENTS.iter().any(|s| s.eq_ignore_ascii_case(name))
}

/// Concatenate the text under `node`, padding block elements with a space
/// on each side so `<p>a</p><p>b</p>` yields two words.
pub fn extract_text_with_spacing<T: MarkupTree>(tree: &T, node: T::Node) -> String {
    let mut out = String::new();
    push_spaced_text(tree, node, &mut out);
    out
}

fn push_spaced_text<T: MarkupTree>(tree: &T, node: T::Node, out: &mut String) {
    for child in tree.children(node) {
        match tree.kind(child) {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element(name) if is_skipped(name) => {}
            NodeKind::Element(name) => {
                let block = is_block_element(name);
                if block {
                    out.push(' ');
                }
                push_spaced_text(tree, child, out);
                if block {
                    out.push(' ');
                }
            }
            NodeKind::Other => {}
        }
    }
}

/// Raw text content of `node` and its descendants, without any spacing.
pub fn text_content<T: MarkupTree>(tree: &T, node: T::Node) -> String {
    let mut out = String::new();
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        match tree.kind(current) {
            NodeKind::Text(text) => out.push_str(text),
            _ => {
                let mut children: Vec<_> = tree.children(current).collect();
                children.reverse();
                stack.extend(children);
            }
        }
    }
    out
}

/// Chapter title: first non-empty `<h1>`, then `<h2>`, then `<title>`.
///
/// Whitespace inside the title is collapsed. Returns `None` when none of
/// the three carries text.
pub fn chapter_title<T: MarkupTree>(tree: &T) -> Option<String> {
    ["h1", "h2", "title"].iter().find_map(|tag| {
        let node = tree.find_element(tag)?;
        let title = collapse_whitespace(&text_content(tree, node));
        (!title.is_empty()).then_some(title)
    })
}
