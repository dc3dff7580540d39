//! html5ever TreeSink implementation for ArenaDom.

use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

use html5ever::tendril::StrTendril;
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute, QualName, local_name, ns};

use super::arena::{ArenaDom, ArenaNodeId};

/// Handle the tree builder uses to reference nodes.
///
/// Element handles carry their qualified name so `elem_name` can lend it
/// without borrowing the arena.
#[derive(Debug, Clone)]
pub struct NodeHandle {
    id: ArenaNodeId,
    name: Rc<QualName>,
}

/// TreeSink that builds an [`ArenaDom`].
///
/// html5ever's TreeSink methods take `&self`, hence the RefCell.
pub struct ArenaSink {
    dom: RefCell<ArenaDom>,
    no_name: Rc<QualName>,
}

impl Default for ArenaSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ArenaSink {
    pub fn new() -> Self {
        Self {
            dom: RefCell::new(ArenaDom::new()),
            no_name: Rc::new(QualName::new(None, ns!(), local_name!(""))),
        }
    }

    /// Consume the sink and return the DOM.
    pub fn into_dom(self) -> ArenaDom {
        self.dom.into_inner()
    }

    fn plain(&self, id: ArenaNodeId) -> NodeHandle {
        NodeHandle {
            id,
            name: Rc::clone(&self.no_name),
        }
    }

    fn append_to(&self, parent: ArenaNodeId, child: NodeOrText<NodeHandle>) {
        let mut dom = self.dom.borrow_mut();
        match child {
            NodeOrText::AppendNode(node) => dom.append(parent, node.id),
            NodeOrText::AppendText(text) => dom.append_text(parent, &text),
        }
    }
}

impl TreeSink for ArenaSink {
    type Handle = NodeHandle;
    type Output = Self;
    type ElemName<'a>
        = &'a QualName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        self
    }

    fn parse_error(&self, _msg: Cow<'static, str>) {
        // Chapters are parsed leniently, like a browser would.
    }

    fn get_document(&self) -> Self::Handle {
        let doc = self.dom.borrow().document();
        self.plain(doc)
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        &*target.name
    }

    fn create_element(
        &self,
        name: QualName,
        _attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let id = self.dom.borrow_mut().create_element(name.clone());
        NodeHandle {
            id,
            name: Rc::new(name),
        }
    }

    fn create_comment(&self, _text: StrTendril) -> Self::Handle {
        let id = self.dom.borrow_mut().create_ignored();
        self.plain(id)
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> Self::Handle {
        let id = self.dom.borrow_mut().create_ignored();
        self.plain(id)
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        self.append_to(parent.id, child);
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let parent = self
            .dom
            .borrow()
            .get(element.id)
            .map(|n| n.parent)
            .unwrap_or(ArenaNodeId::NONE);
        if parent.is_some() {
            self.append_before_sibling(element, child);
        } else {
            self.append_to(prev_element.id, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        let mut dom = self.dom.borrow_mut();
        let doc = dom.document();
        let doctype = dom.create_ignored();
        dom.append(doc, doctype);
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        target.clone()
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x.id == y.id
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        let mut dom = self.dom.borrow_mut();
        let node = match new_node {
            NodeOrText::AppendNode(node) => node.id,
            NodeOrText::AppendText(text) => dom.create_text(text.to_string()),
        };
        dom.insert_before(sibling.id, node);
    }

    fn add_attrs_if_missing(&self, _target: &Self::Handle, _attrs: Vec<Attribute>) {
        // Attributes never influence extracted text.
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        self.dom.borrow_mut().detach(target.id);
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let mut dom = self.dom.borrow_mut();
        let children: Vec<_> = dom.child_ids(node.id).collect();
        for child in children {
            dom.detach(child);
            dom.append(new_parent.id, child);
        }
    }
}

#[cfg(test)]
mod tests {
    use html5ever::driver::ParseOpts;
    use html5ever::parse_document;
    use html5ever::tendril::TendrilSink;

    use super::*;
    use crate::markup::{MarkupTree, NodeKind};

    fn parse_html(html: &str) -> ArenaDom {
        let sink = ArenaSink::new();
        parse_document(sink, ParseOpts::default())
            .from_utf8()
            .one(html.as_bytes())
            .into_dom()
    }

    #[test]
    fn test_basic_parse() {
        let dom = parse_html("<html><body><p>Hello</p></body></html>");

        let p = dom.find_element("p").expect("should find p");
        let text_id = dom.child_ids(p).next().expect("p should have child");
        assert!(matches!(dom.kind(text_id), NodeKind::Text("Hello")));
    }

    #[test]
    fn test_implied_structure() {
        // html5ever synthesizes html/head/body around bare fragments.
        let dom = parse_html("<title>T</title><p>Body text</p>");

        assert!(dom.find_element("head").is_some());
        let body = dom.find_element("body").expect("body");
        let p = dom.find_element("p").expect("p");
        assert_eq!(dom.get(p).map(|n| n.parent), Some(body));
    }

    #[test]
    fn test_misnested_tags_are_repaired() {
        // The adoption agency algorithm reparents nodes: exercise that path.
        let dom = parse_html("<p><b>bold <i>both</b> italic</i></p>");
        assert!(dom.find_element("b").is_some());
        assert!(dom.find_element("i").is_some());
    }
}
