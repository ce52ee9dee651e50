use select::document::Document;
use select::node::Node;
use select::predicate::Text;

/// Elements whose text is never rendered.
const HIDDEN_ELEMENTS: [&str; 3] = ["script", "style", "template"];

pub trait DocumentCleaner {
    /// Whether the text `node` sits inside an element that is not rendered.
    fn is_hidden(node: &Node) -> bool {
        let mut parent = node.parent();
        while let Some(node) = parent {
            if let Some(name) = node.name() {
                if HIDDEN_ELEMENTS.contains(&name) {
                    return true;
                }
            }
            parent = node.parent();
        }
        false
    }

    /// Join all human visible text nodes of the document with `separator`.
    ///
    /// Comments and the doctype are no text nodes and never show up.
    fn visible_text(doc: &Document, separator: &str) -> String {
        doc.find(Text)
            .filter(|node| !Self::is_hidden(node))
            .filter_map(|node| node.as_text())
            .collect::<Vec<_>>()
            .join(separator)
    }
}

/// A standard implementation of a cleaner that keeps everything a browser
/// would render as text.
pub struct DefaultDocumentCleaner;

impl DocumentCleaner for DefaultDocumentCleaner {}
