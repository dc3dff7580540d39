//! Chapter markup: parsing into a tree and extracting readable text.
//!
//! The tokenizer never touches html5ever directly. It asks a
//! [`MarkupParser`] for a tree and walks it through [`MarkupTree`], so a
//! host with its own document parser can plug that in instead.

mod arena;
mod sink;
mod text;

pub use arena::{ArenaDom, ArenaNode, ArenaNodeData, ArenaNodeId};
pub use text::{BLOCK_ELEMENTS, chapter_title, extract_text_with_spacing, is_block_element, text_content};

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

use crate::error::Result;
use sink::ArenaSink;

/// What a tree node is, as far as text extraction cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind<'a> {
    /// Element with its lowercase local tag name.
    Element(&'a str),
    Text(&'a str),
    /// Document roots, comments, doctypes.
    Other,
}

/// Read-only parsed document tree.
pub trait MarkupTree {
    type Node: Copy;

    /// The document root.
    fn root(&self) -> Self::Node;

    fn kind(&self, node: Self::Node) -> NodeKind<'_>;

    /// Children of `node` in document order.
    fn children(&self, node: Self::Node) -> impl Iterator<Item = Self::Node> + '_;

    /// First element named `tag` in document order.
    fn find_element(&self, tag: &str) -> Option<Self::Node> {
        let mut stack = vec![self.root()];
        while let Some(node) = stack.pop() {
            if matches!(self.kind(node), NodeKind::Element(name) if name.eq_ignore_ascii_case(tag)) {
                return Some(node);
            }
            let mut children: Vec<_> = self.children(node).collect();
            children.reverse();
            stack.extend(children);
        }
        None
    }

    /// The `<body>` element, if the tree has one.
    fn body(&self) -> Option<Self::Node> {
        self.find_element("body")
    }
}

/// Parses chapter markup into a [`MarkupTree`].
pub trait MarkupParser {
    type Tree: MarkupTree;

    fn parse(&self, markup: &str) -> Result<Self::Tree>;
}

/// Lenient HTML parser backed by html5ever.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser;

impl MarkupParser for HtmlParser {
    type Tree = ArenaDom;

    fn parse(&self, markup: &str) -> Result<ArenaDom> {
        let sink = ArenaSink::new();
        let result = parse_document(sink, ParseOpts::default())
            .from_utf8()
            .one(markup.as_bytes());
        Ok(result.into_dom())
    }
}
