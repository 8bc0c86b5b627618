//! fritos
//!
//! jQuery-style selections over an explicit document: traversal, simple
//! mutations, keyframe animations, form validation and a remote call
//! helper.
//!
//! ```no_run
//! use fritos::{parse_html, select, AnimationOptions};
//!
//! let mut doc = parse_html("<ul><li>a</li><li>b</li></ul>").unwrap();
//! select(&doc, "li")
//!     .hide(&mut doc)
//!     .animate(&mut doc, &[("opacity", "0")], &AnimationOptions::default());
//! ```

mod animate;
mod filter;
mod selection;
mod validation;

pub use animate::{animation_name, kebab_case, keyframes_css, AnimationOptions};
pub use filter::SimpleSelector;
pub use selection::{Query, Selection};
pub use validation::{
    form_data, validate_field, validate_form, FieldRules, FormData, FormErrors, FormRule, FormRules,
    ValidationResult,
};

pub use fritos_dom::{
    Document, DomError, Event, FillMode, IterationCount, ListenerId, NodeId, SelectorError,
};
pub use fritos_html::{parse_html, HtmlError, HtmlParser};
pub use fritos_net::{
    fetch_remote, remote_call, Method, NetConfig, RemoteCallOptions, RemoteClient, RemoteData,
    RemoteError, RemoteRequest,
};

/// Build a selection from a selector, an element or a list of elements
pub fn select<'a>(doc: &Document, query: impl Into<Query<'a>>) -> Selection {
    Selection::select(doc, query)
}
