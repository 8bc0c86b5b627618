//! Single-token shorthand matcher used by `parent` and `ancestor`

use fritos_dom::{Document, NodeId};

/// `#id`, `.class` or a tag name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    Id(String),
    Class(String),
    /// Stored lowercase
    Tag(String),
}

impl SimpleSelector {
    /// Parse a shorthand token. An empty string means "no filter".
    pub fn parse(token: &str) -> Option<Self> {
        if token.is_empty() {
            return None;
        }
        Some(if let Some(id) = token.strip_prefix('#') {
            Self::Id(id.to_string())
        } else if let Some(class) = token.strip_prefix('.') {
            Self::Class(class.to_string())
        } else {
            Self::Tag(token.to_ascii_lowercase())
        })
    }

    pub fn matches(&self, doc: &Document, id: NodeId) -> bool {
        let Some(element) = doc.element(id) else {
            return false;
        };
        match self {
            // A missing id reads as empty, so `#` alone matches id-less elements
            Self::Id(wanted) => element.id().unwrap_or_default() == wanted.as_str(),
            Self::Class(class) => element.has_class(class),
            Self::Tag(tag) => element.tag_name() == tag,
        }
    }
}
