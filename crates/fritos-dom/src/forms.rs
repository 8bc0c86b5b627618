//! Form control values
//!
//! `value` follows the HTML rules for each control: a dirty value set by
//! script wins, otherwise the default comes from markup.

use crate::{DomTree, NodeId};

/// `input`, `textarea` and `select` are the fields a form submits
pub fn is_form_field(tag: &str) -> bool {
    matches!(tag, "input" | "textarea" | "select")
}

impl DomTree {
    /// Current value of an element, `None` when it has no value property
    pub fn value(&self, id: NodeId) -> Option<String> {
        let element = self.get(id)?.as_element()?;
        if let Some(dirty) = &element.value {
            return Some(dirty.clone());
        }

        match element.tag_name() {
            "input" | "button" => Some(element.get_attribute("value").unwrap_or_default().to_string()),
            "textarea" => Some(self.text_content(id)),
            "option" => Some(self.option_value(id)),
            "select" => Some(self.selected_option(id).map(|o| self.option_value(o)).unwrap_or_default()),
            _ => None,
        }
    }

    /// Set the dirty value. On non-form elements this acts as an expando.
    pub fn set_value(&mut self, id: NodeId, value: &str) -> bool {
        let Some(element) = self.get_mut(id).and_then(|n| n.as_element_mut()) else {
            return false;
        };
        element.value = Some(value.to_string());
        true
    }

    fn option_value(&self, option: NodeId) -> String {
        match self.get(option).and_then(|n| n.as_element()).and_then(|e| e.get_attribute("value")) {
            Some(v) => v.to_string(),
            None => self.text_content(option).trim().to_string(),
        }
    }

    /// The `selected` option of a select, else its first option
    fn selected_option(&self, select: NodeId) -> Option<NodeId> {
        let options: Vec<NodeId> = self
            .descendants(select)
            .into_iter()
            .filter(|&d| self.tag_name(d) == Some("option"))
            .collect();
        options
            .iter()
            .copied()
            .find(|&o| {
                self.get(o)
                    .and_then(|n| n.as_element())
                    .is_some_and(|e| e.has_attribute("selected"))
            })
            .or_else(|| options.first().copied())
    }
}
