//! Carve HTML
//!
//! Fragment parsing on top of html5ever and innerHTML serialization for the
//! Carve DOM host.

mod parser;
mod serializer;

pub use parser::HtmlParser;
pub use serializer::HtmlSerializer;

use carve_dom::{Document, NodeId};

/// Parse `html` as body content and append the resulting nodes to `parent`
pub fn parse_fragment_into(
    document: &mut Document,
    parent: NodeId,
    html: &str,
) -> Result<Vec<NodeId>, ParseError> {
    HtmlParser::new().parse_fragment_into(document, parent, html)
}

/// Serialize the children of `node`
pub fn inner_html(document: &Document, node: NodeId) -> String {
    HtmlSerializer::new().serialize_inner(document.tree(), node)
}

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),

    #[error("parsed fragment has no root element")]
    MissingFragmentRoot,

    #[error(transparent)]
    Dom(#[from] carve_dom::DomError),
}
