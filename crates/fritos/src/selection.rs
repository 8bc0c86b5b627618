//! Selection
//!
//! An ordered set of element handles plus the chainable operations on
//! them. A selection never owns nodes; every call takes the document it
//! was made from.

use std::collections::HashSet;
use std::rc::Rc;

use fritos_dom::{CssAnimation, Document, DomError, Event, Listener, NodeId, SelectorError, SelectorList};
use fritos_net::RemoteCallOptions;

use crate::animate::{animation_name, keyframes_css, AnimationOptions};
use crate::filter::SimpleSelector;
use crate::validation::{self, FieldRules, FormErrors, FormRules, ValidationResult};

/// What a selection is built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query<'a> {
    /// CSS selector, matched against the whole document
    Selector(&'a str),
    Element(NodeId),
    List(Vec<NodeId>),
    Nothing,
}

impl<'a> From<&'a str> for Query<'a> {
    fn from(selector: &'a str) -> Self {
        Query::Selector(selector)
    }
}

impl<'a> From<&'a String> for Query<'a> {
    fn from(selector: &'a String) -> Self {
        Query::Selector(selector)
    }
}

impl From<NodeId> for Query<'_> {
    fn from(id: NodeId) -> Self {
        Query::Element(id)
    }
}

impl From<Option<NodeId>> for Query<'_> {
    fn from(id: Option<NodeId>) -> Self {
        id.map_or(Query::Nothing, Query::Element)
    }
}

impl From<Vec<NodeId>> for Query<'_> {
    fn from(ids: Vec<NodeId>) -> Self {
        Query::List(ids)
    }
}

impl From<&[NodeId]> for Query<'_> {
    fn from(ids: &[NodeId]) -> Self {
        Query::List(ids.to_vec())
    }
}

impl From<&Selection> for Query<'_> {
    fn from(selection: &Selection) -> Self {
        Query::List(selection.elements.clone())
    }
}

/// Ordered element handles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    elements: Vec<NodeId>,
}

impl Selection {
    /// Build a selection. An invalid selector gives an empty selection.
    pub fn select<'a>(doc: &Document, query: impl Into<Query<'a>>) -> Self {
        match Self::try_select(doc, query) {
            Ok(selection) => selection,
            Err(e) => {
                tracing::warn!("Invalid selector: {}", e);
                Self::empty()
            }
        }
    }

    /// Build a selection, reporting selector syntax errors
    pub fn try_select<'a>(doc: &Document, query: impl Into<Query<'a>>) -> Result<Self, SelectorError> {
        let elements = match query.into() {
            Query::Selector(selector) => doc.select_all(selector)?,
            Query::Element(id) => vec![id],
            Query::List(ids) => ids,
            Query::Nothing => Vec::new(),
        };
        Ok(Self::new(doc, elements))
    }

    /// Selection over `ids`, dropping anything that is not an element
    pub fn new(doc: &Document, ids: Vec<NodeId>) -> Self {
        let elements: Vec<NodeId> = ids.into_iter().filter(|&id| doc.tree().is_element(id)).collect();
        tracing::debug!("Selected {} elements", elements.len());
        Self { elements }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn first(&self) -> Option<NodeId> {
        self.elements.first().copied()
    }

    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.elements.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.elements.iter().copied()
    }

    pub fn elements(&self) -> &[NodeId] {
        &self.elements
    }

    pub fn into_vec(self) -> Vec<NodeId> {
        self.elements
    }

    // ------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------

    /// Distinct element parents in first-seen order, optionally filtered
    /// by a shorthand selector
    pub fn parent(&self, doc: &Document, selector: Option<&str>) -> Selection {
        let filter = selector.and_then(SimpleSelector::parse);
        let mut seen = HashSet::new();
        let elements = self
            .iter()
            .filter_map(|id| doc.tree().parent_element(id))
            .filter(|&p| seen.insert(p))
            .filter(|&p| filter.as_ref().is_none_or(|f| f.matches(doc, p)))
            .collect();
        Selection { elements }
    }

    /// Distinct element ancestors below the root element, optionally
    /// filtered by a shorthand selector
    pub fn ancestor(&self, doc: &Document, selector: Option<&str>) -> Selection {
        let filter = selector.and_then(SimpleSelector::parse);
        let root = doc.document_element();
        let mut seen = HashSet::new();
        let mut elements = Vec::new();

        for id in self.iter() {
            for ancestor in doc.tree().ancestors(id) {
                if Some(ancestor) == root || !doc.tree().is_element(ancestor) {
                    break;
                }
                if filter.as_ref().is_none_or(|f| f.matches(doc, ancestor)) && seen.insert(ancestor) {
                    elements.push(ancestor);
                }
            }
        }
        Selection { elements }
    }

    /// Descendants of every member matching a CSS selector, concatenated
    /// per member without de-duplication
    pub fn find(&self, doc: &Document, selector: &str) -> Selection {
        if selector.trim().is_empty() {
            return Selection::empty();
        }
        let selectors = match SelectorList::parse(selector) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("Invalid selector {:?} in find: {}", selector, e);
                return Selection::empty();
            }
        };
        let elements = self.iter().flat_map(|id| doc.tree().query_all(id, &selectors)).collect();
        Selection { elements }
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Attach a persistent listener to every member
    pub fn on_event(
        &self,
        doc: &mut Document,
        event_type: &str,
        handler: impl Fn(&mut Document, &mut Event) + 'static,
    ) -> &Self {
        let listener: Listener = Rc::new(handler);
        for id in self.iter() {
            doc.add_event_listener(id, event_type, listener.clone(), false);
        }
        self
    }

    /// `display: none` on every member
    pub fn hide(&self, doc: &mut Document) -> &Self {
        for id in self.iter() {
            if let Err(e) = doc.set_style_property(id, "display", "none") {
                tracing::warn!("Cannot hide {}: {}", id, e);
            }
        }
        self
    }

    /// Unwrap each distinct parent: its children move into the grandparent
    /// where the parent was, then the parent is removed
    pub fn prune(&self, doc: &mut Document) -> &Self {
        let mut seen = HashSet::new();
        let parents: Vec<NodeId> = self
            .iter()
            .filter_map(|id| doc.tree().parent_element(id))
            .filter(|&p| seen.insert(p))
            .collect();

        for parent in parents {
            let Some(grandparent) = doc.tree().parent_element(parent) else {
                tracing::debug!("Not unwrapping {}: no grandparent element", parent);
                continue;
            };
            for child in doc.tree().child_ids(parent) {
                if let Err(e) = doc.insert_before(grandparent, child, Some(parent)) {
                    tracing::warn!("Cannot move {} out of {}: {}", child, parent, e);
                }
            }
            doc.remove_node(parent);
        }
        self
    }

    /// Move every member up `levels` times, each time placing it right
    /// before its parent inside the grandparent
    pub fn raise(&self, doc: &mut Document, levels: usize) -> &Self {
        for _ in 0..levels {
            for id in self.iter() {
                let Some(parent) = doc.tree().parent_element(id) else {
                    continue;
                };
                let Some(grandparent) = doc.tree().parent_element(parent) else {
                    continue;
                };
                if let Err(e) = doc.insert_before(grandparent, id, Some(parent)) {
                    tracing::warn!("Cannot raise {}: {}", id, e);
                }
            }
        }
        self
    }

    /// Set an attribute on every member
    pub fn attrs(&self, doc: &mut Document, name: &str, value: &str) -> &Self {
        for id in self.iter() {
            match doc.set_attribute(id, name, value) {
                Ok(()) => {}
                Err(e @ DomError::InvalidAttributeName(_)) => {
                    tracing::warn!("Skipping attrs: {}", e);
                    break;
                }
                Err(e) => tracing::warn!("Cannot set {:?} on {}: {}", name, id, e),
            }
        }
        self
    }

    /// Value of the first member
    pub fn val(&self, doc: &Document) -> Option<String> {
        doc.value(self.first()?)
    }

    /// Set the value of every member
    pub fn set_val(&self, doc: &mut Document, value: &str) -> &Self {
        for id in self.iter() {
            if let Err(e) = doc.set_value(id, value) {
                tracing::warn!("Cannot set value on {}: {}", id, e);
            }
        }
        self
    }

    // ------------------------------------------------------------------
    // Animation
    // ------------------------------------------------------------------

    /// Animate every member to `properties` (camelCase names allowed)
    pub fn animate(&self, doc: &mut Document, properties: &[(&str, &str)], options: &AnimationOptions) -> &Self {
        for id in self.iter() {
            animate_element(doc, id, properties, options, None);
        }
        self
    }

    /// Like `animate`, running `on_complete` once per member when its
    /// animation ends
    pub fn animate_then(
        &self,
        doc: &mut Document,
        properties: &[(&str, &str)],
        options: &AnimationOptions,
        on_complete: impl Fn(&mut Document, NodeId) + 'static,
    ) -> &Self {
        let callback: Rc<dyn Fn(&mut Document, NodeId)> = Rc::new(on_complete);
        for id in self.iter() {
            animate_element(doc, id, properties, options, Some(callback.clone()));
        }
        self
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    /// Validate the first member as a single field
    pub fn validation(&self, doc: &Document, rules: &FieldRules) -> ValidationResult {
        validation::validate_field(doc, self.first(), rules)
    }

    /// Validate the first member as a form container
    pub fn validate_form(&self, doc: &Document, rules: &FormRules) -> FormErrors {
        match self.first() {
            Some(form) => validation::validate_form(doc, form, rules),
            None => FormErrors::new(),
        }
    }

    // ------------------------------------------------------------------
    // Remote
    // ------------------------------------------------------------------

    /// Fire-and-forget HTTP call; see `fritos_net::remote_call`
    pub fn remote_call(url: &str, options: RemoteCallOptions) {
        fritos_net::remote_call(url, options);
    }
}

/// Inject the keyframes, set the inline shorthand and start the timeline record
fn animate_element(
    doc: &mut Document,
    id: NodeId,
    properties: &[(&str, &str)],
    options: &AnimationOptions,
    on_complete: Option<Rc<dyn Fn(&mut Document, NodeId)>>,
) {
    let name = animation_name();
    let sheet = doc.inject_style(&keyframes_css(&name, properties));
    if let Err(e) = doc.set_style_property(id, "animation", &options.shorthand(&name)) {
        tracing::warn!("Cannot animate {}: {}", id, e);
        if let Some(sheet) = sheet {
            doc.remove_node(sheet);
        }
        return;
    }

    let mut animation = CssAnimation::new(id, &name, options.timing()).with_sheet(sheet);
    if let Some(callback) = on_complete {
        animation = animation.on_complete(move |doc, target| callback(doc, target));
    }
    doc.start_animation(animation);
}

impl IntoIterator for Selection {
    type Item = NodeId;
    type IntoIter = std::vec::IntoIter<NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// html > body > div#outer > div.inner > (span, span)
    fn nested() -> (Document, NodeId, NodeId, Vec<NodeId>) {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let outer = doc.create_element("div");
        doc.set_attribute(outer, "id", "outer").unwrap();
        doc.append_child(body, outer).unwrap();
        let inner = doc.create_element("div");
        doc.set_attribute(inner, "class", "inner").unwrap();
        doc.append_child(outer, inner).unwrap();
        let spans = (0..2)
            .map(|_| {
                let s = doc.create_element("span");
                doc.append_child(inner, s).unwrap();
                s
            })
            .collect();
        (doc, outer, inner, spans)
    }

    #[test]
    fn test_select_variants() {
        let (doc, outer, _, spans) = nested();
        assert_eq!(Selection::select(&doc, "span").elements(), spans.as_slice());
        assert_eq!(Selection::select(&doc, outer).first(), Some(outer));
        assert_eq!(Selection::select(&doc, spans.clone()).len(), 2);
        assert!(Selection::select(&doc, Query::Nothing).is_empty());
        assert!(Selection::select(&doc, None::<NodeId>).is_empty());
        assert!(Selection::select(&doc, "span[").is_empty());
        assert!(Selection::try_select(&doc, "span[").is_err());
    }

    #[test]
    fn test_non_elements_are_dropped() {
        let mut doc = Document::default();
        let text = doc.create_text("x");
        let root = doc.tree().root();
        assert!(Selection::select(&doc, text).is_empty());
        assert!(Selection::select(&doc, vec![root, text]).is_empty());
    }

    #[test]
    fn test_parent_dedupes() {
        let (doc, _, inner, spans) = nested();
        let parents = Selection::select(&doc, spans).parent(&doc, None);
        assert_eq!(parents.into_vec(), vec![inner]);
    }

    #[test]
    fn test_ancestor_stops_below_root_element() {
        let (doc, outer, inner, spans) = nested();
        let body = doc.body().unwrap();
        let all = Selection::select(&doc, spans[0]).ancestor(&doc, None);
        assert_eq!(all.into_vec(), vec![inner, outer, body]);

        let html = Selection::select(&doc, spans[0]).ancestor(&doc, Some("html"));
        assert!(html.is_empty());
    }

    #[test]
    fn test_raise_zero_is_noop() {
        let (mut doc, _, inner, spans) = nested();
        Selection::select(&doc, spans[1]).raise(&mut doc, 0);
        assert_eq!(doc.tree().parent(spans[1]), Some(inner));
    }

    #[test]
    fn test_attrs_invalid_name() {
        let (mut doc, _, _, spans) = nested();
        Selection::select(&doc, spans.clone()).attrs(&mut doc, "not valid", "x");
        assert!(doc.element(spans[0]).unwrap().attributes().is_empty());
    }
}
