//! fritos DOM - Document Object Model
//!
//! Arena-based document that selections operate on. The document is passed
//! explicitly to every operation, so nothing here touches global state.

mod node;
mod tree;
mod document;
mod style;
mod selector;
mod query;
mod events;
mod animation;
mod forms;
mod error;

pub use node::{Node, NodeData, ElementData, Attribute};
pub use tree::DomTree;
pub use document::Document;
pub use style::InlineStyle;
pub use selector::{
    SelectorList, ComplexSelector, CompoundSelector, Combinator,
    SelectorComponent, AttributeSelector, AttributeMatcher, PseudoClass, NthExpression,
};
pub use events::{Event, Listener, ListenerId};
pub use animation::{CssAnimation, CompletionCallback, AnimationTiming, IterationCount, FillMode, parse_css_time};
pub use forms::is_form_field;
pub use error::{DomError, DomResult, SelectorError};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// The document node
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check that this is not the sentinel
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) fn option(self) -> Option<NodeId> {
        self.is_valid().then_some(self)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            write!(f, "#none")
        }
    }
}
