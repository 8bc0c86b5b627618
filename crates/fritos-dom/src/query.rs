//! Selector matching and querySelectorAll
//!
//! Complex selectors are matched right to left against the tree, so a
//! scoped query still sees ancestors outside its scope.

use crate::selector::{
    Combinator, ComplexSelector, CompoundSelector, PseudoClass, SelectorComponent, SelectorList,
};
use crate::{DomTree, ElementData, NodeId, SelectorError};

impl DomTree {
    /// Check if an element matches any selector in the list
    pub fn matches(&self, element: NodeId, selectors: &SelectorList) -> bool {
        self.is_element(element) && selectors.0.iter().any(|s| self.matches_complex(element, s))
    }

    /// Parse and match in one step
    pub fn matches_str(&self, element: NodeId, selector: &str) -> Result<bool, SelectorError> {
        Ok(self.matches(element, &SelectorList::parse(selector)?))
    }

    /// All element descendants of `scope` matching `selectors`, in document order
    pub fn query_all(&self, scope: NodeId, selectors: &SelectorList) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&id| self.matches(id, selectors))
            .collect()
    }

    /// `querySelectorAll` on a string selector
    pub fn query_selector_all(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        let selectors = SelectorList::parse(selector)?;
        Ok(self.query_all(scope, &selectors))
    }

    /// First match, if any
    pub fn query_selector(&self, scope: NodeId, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        let selectors = SelectorList::parse(selector)?;
        Ok(self.descendants(scope).into_iter().find(|&id| self.matches(id, &selectors)))
    }

    fn matches_complex(&self, element: NodeId, selector: &ComplexSelector) -> bool {
        match selector.compounds.len() {
            0 => false,
            n => self.matches_from(element, selector, n - 1),
        }
    }

    fn matches_from(&self, element: NodeId, selector: &ComplexSelector, idx: usize) -> bool {
        if !self.matches_compound(element, &selector.compounds[idx]) {
            return false;
        }
        if idx == 0 {
            return true;
        }

        match selector.combinators[idx - 1] {
            Combinator::Child => self
                .parent_element(element)
                .is_some_and(|p| self.matches_from(p, selector, idx - 1)),
            Combinator::Descendant => self
                .ancestors(element)
                .take_while(|&a| self.is_element(a))
                .any(|a| self.matches_from(a, selector, idx - 1)),
            Combinator::NextSibling => self
                .prev_element_sibling(element)
                .is_some_and(|s| self.matches_from(s, selector, idx - 1)),
            Combinator::SubsequentSibling => {
                let mut current = self.prev_element_sibling(element);
                while let Some(sibling) = current {
                    if self.matches_from(sibling, selector, idx - 1) {
                        return true;
                    }
                    current = self.prev_element_sibling(sibling);
                }
                false
            }
        }
    }

    fn matches_compound(&self, element: NodeId, compound: &CompoundSelector) -> bool {
        let Some(data) = self.get(element).and_then(|n| n.as_element()) else {
            return false;
        };
        compound.0.iter().all(|c| self.matches_component(element, data, c))
    }

    fn matches_component(&self, element: NodeId, data: &ElementData, component: &SelectorComponent) -> bool {
        match component {
            SelectorComponent::Universal => true,
            SelectorComponent::Type(tag) => data.tag_name().eq_ignore_ascii_case(tag),
            SelectorComponent::Id(id) => data.id() == Some(id.as_str()),
            SelectorComponent::Class(class) => data.has_class(class),
            SelectorComponent::Attribute(attr) => attr.matches(data.get_attribute(&attr.name)),
            SelectorComponent::PseudoClass(pseudo) => self.matches_pseudo(element, data, pseudo),
        }
    }

    fn matches_pseudo(&self, element: NodeId, data: &ElementData, pseudo: &PseudoClass) -> bool {
        match pseudo {
            PseudoClass::Root => self.parent(element).and_then(|p| self.get(p)).is_some_and(|p| p.is_document()),
            PseudoClass::Empty => self
                .children(element)
                .all(|(_, n)| !n.is_element() && n.as_text().is_none_or(str::is_empty)),
            PseudoClass::FirstChild => self.sibling_position(element).is_some_and(|(i, _)| i == 1),
            PseudoClass::LastChild => self.sibling_position(element).is_some_and(|(i, n)| i == n),
            PseudoClass::OnlyChild => self.sibling_position(element).is_some_and(|(_, n)| n == 1),
            PseudoClass::FirstOfType => self.type_position(element, data).is_some_and(|(i, _)| i == 1),
            PseudoClass::LastOfType => self.type_position(element, data).is_some_and(|(i, n)| i == n),
            PseudoClass::NthChild(expr) => self
                .sibling_position(element)
                .is_some_and(|(i, _)| i32::try_from(i).is_ok_and(|i| expr.matches(i))),
            PseudoClass::NthLastChild(expr) => self
                .sibling_position(element)
                .is_some_and(|(i, n)| i32::try_from(n - i + 1).is_ok_and(|i| expr.matches(i))),
            PseudoClass::Not(inner) => !inner.0.iter().any(|s| self.matches_complex(element, s)),
            PseudoClass::Checked => match data.tag_name() {
                "input" => data.has_attribute("checked"),
                "option" => data.has_attribute("selected"),
                _ => false,
            },
            PseudoClass::Disabled => is_disableable(data) && data.has_attribute("disabled"),
            PseudoClass::Enabled => is_disableable(data) && !data.has_attribute("disabled"),
        }
    }

    /// 1-based index among element siblings, and the sibling count
    fn sibling_position(&self, element: NodeId) -> Option<(usize, usize)> {
        let parent = self.parent(element)?;
        let siblings = self.element_children(parent);
        let index = siblings.iter().position(|&s| s == element)?;
        Some((index + 1, siblings.len()))
    }

    fn type_position(&self, element: NodeId, data: &ElementData) -> Option<(usize, usize)> {
        let parent = self.parent(element)?;
        let same_type: Vec<NodeId> = self
            .element_children(parent)
            .into_iter()
            .filter(|&s| self.tag_name(s) == Some(data.tag_name()))
            .collect();
        let index = same_type.iter().position(|&s| s == element)?;
        Some((index + 1, same_type.len()))
    }
}

fn is_disableable(data: &ElementData) -> bool {
    matches!(
        data.tag_name(),
        "button" | "input" | "select" | "textarea" | "option" | "optgroup" | "fieldset"
    )
}
