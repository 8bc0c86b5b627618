//! fritos HTML Parser
//!
//! Builds a `fritos_dom::Document` from markup using html5ever.

mod parser;

pub use parser::HtmlParser;
pub use fritos_dom::Document;

/// Parse an HTML string into a document at `about:blank`
pub fn parse_html(html: &str) -> Result<Document, HtmlError> {
    HtmlParser::new().parse(html)
}

/// HTML parse error
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("Failed to read markup: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not build tree: {0}")]
    Dom(#[from] fritos_dom::DomError),
}
