//! HTML5 fragment parser
//!
//! Uses html5ever's RcDom with a `body` context element and converts the
//! fragment into the Carve DOM. Whitespace-only text and leading comments are
//! kept: every character counts for editor positions.

use carve_dom::{Document, ElementData, NodeData, NodeId};
use html5ever::tendril::TendrilSink;
use html5ever::{QualName, local_name, ns, parse_fragment};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::ParseError;

/// HTML5 parser
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlParser;

impl HtmlParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse `html` as body content and append it to `parent`.
    ///
    /// Returns the ids of the top-level nodes that were appended.
    pub fn parse_fragment_into(
        &self,
        document: &mut Document,
        parent: NodeId,
        html: &str,
    ) -> Result<Vec<NodeId>, ParseError> {
        tracing::debug!("Parsing HTML fragment ({} bytes)", html.len());

        let context = QualName::new(None, ns!(html), local_name!("body"));
        let dom = parse_fragment(RcDom::default(), Default::default(), context, Vec::new(), false)
            .from_utf8()
            .read_from(&mut html.as_bytes())?;

        // fragment content lands under a synthetic html element
        let fragment_root = find_element(&dom.document, "html").ok_or(ParseError::MissingFragmentRoot)?;

        let mut appended = Vec::new();
        for child in fragment_root.children.borrow().iter() {
            if let Some(id) = self.convert_node(child, document)? {
                document.append_child(parent, id)?;
                appended.push(id);
            }
        }

        tracing::debug!("Parsed {} top-level nodes", appended.len());
        Ok(appended)
    }

    /// Convert an RcDom node (and its subtree) into a detached Carve node
    fn convert_node(
        &self,
        handle: &Handle,
        document: &mut Document,
    ) -> Result<Option<NodeId>, ParseError> {
        let id = match &handle.data {
            RcNodeData::Text { contents } => {
                let text = contents.borrow().to_string();
                document.create_text(&text)
            }
            RcNodeData::Comment { contents } => document.tree_mut().create_comment(contents),
            RcNodeData::ProcessingInstruction { target, contents } => {
                document
                    .tree_mut()
                    .create_node(NodeData::ProcessingInstruction {
                        target: target.to_string(),
                        data: contents.to_string(),
                    })
            }
            RcNodeData::Element { name, attrs, .. } => {
                let mut element = ElementData::new(&name.local);
                for attr in attrs.borrow().iter() {
                    element.set_attr(&attr.name.local, attr.value.to_string());
                }
                let id = document.tree_mut().create_node(NodeData::Element(element));
                for child in handle.children.borrow().iter() {
                    if let Some(child_id) = self.convert_node(child, document)? {
                        document.append_child(id, child_id)?;
                    }
                }
                id
            }
            RcNodeData::Document | RcNodeData::Doctype { .. } => return Ok(None),
        };
        Ok(Some(id))
    }
}

fn find_element(handle: &Handle, tag: &str) -> Option<Handle> {
    if let RcNodeData::Element { name, .. } = &handle.data {
        if &*name.local == tag {
            return Some(handle.clone());
        }
    }
    handle
        .children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> (Document, Vec<NodeId>) {
        let mut doc = Document::new();
        let body = doc.body();
        let ids = HtmlParser::new()
            .parse_fragment_into(&mut doc, body, html)
            .unwrap();
        (doc, ids)
    }

    #[test]
    fn test_parse_inline_fragment() {
        let (doc, ids) = parse("baz <span>bar</span><!--test -->foo");
        let tree = doc.tree();

        assert_eq!(ids.len(), 4);
        assert_eq!(tree.text(ids[0]), Some("baz "));
        assert_eq!(tree.tag_name(ids[1]), Some("span"));
        assert_eq!(tree.text_content(ids[1]), "bar");
        assert!(matches!(
            tree.get(ids[2]).map(|n| &n.data),
            Some(NodeData::Comment(c)) if c == "test "
        ));
        assert_eq!(tree.text(ids[3]), Some("foo"));
    }

    #[test]
    fn test_parse_keeps_whitespace_and_attributes() {
        let (doc, ids) = parse(
            "<ul property=\"http://lblod.data.gift/vocabularies/editor/isLumpNode\">\n  <li>baz</li>\n</ul>",
        );
        let tree = doc.tree();
        let ul = ids[0];

        assert_eq!(
            tree.get_attr(ul, "property"),
            Some("http://lblod.data.gift/vocabularies/editor/isLumpNode")
        );
        assert_eq!(tree.child_count(ul), 3);
        assert_eq!(tree.text_content(ul), "\n  baz\n");
    }

    #[test]
    fn test_parse_keeps_leading_comment_and_whitespace() {
        let (doc, ids) = parse("<!-- c -->abc");
        assert_eq!(ids.len(), 2);
        assert!(matches!(
            doc.tree().get(ids[0]).map(|n| &n.data),
            Some(NodeData::Comment(c)) if c == " c "
        ));
        assert_eq!(doc.tree().text(ids[1]), Some("abc"));

        let (doc, ids) = parse("  <b>x</b>");
        assert_eq!(ids.len(), 2);
        assert_eq!(doc.tree().text(ids[0]), Some("  "));
        assert_eq!(doc.tree().tag_name(ids[1]), Some("b"));
    }

    #[test]
    fn test_parse_entities() {
        let (doc, ids) = parse("a&nbsp;b");
        assert_eq!(doc.tree().text(ids[0]), Some("a\u{a0}b"));
    }
}
