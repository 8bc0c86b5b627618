//! DOM and selector errors

use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("node not found: {0}")]
    NotFound(NodeId),

    /// Inserting a node into itself or one of its descendants
    #[error("hierarchy request error")]
    HierarchyRequest,

    #[error("node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },

    #[error("invalid node type for this operation: {0}")]
    InvalidNodeType(NodeId),

    #[error("invalid attribute name: {0:?}")]
    InvalidAttributeName(String),
}

/// CSS selector parse errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unexpected character {ch:?} at offset {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("unexpected end of selector")]
    UnexpectedEnd,

    #[error("unsupported pseudo selector: {0}")]
    UnsupportedPseudo(String),

    #[error("invalid nth expression: {0}")]
    InvalidNth(String),
}
