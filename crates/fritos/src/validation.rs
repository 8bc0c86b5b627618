//! Form validation
//!
//! Two separate contracts. `FieldRules` checks one field and reports every
//! failed rule. `FormRules` checks a whole form and reports the first
//! failed rule per field name.

use std::collections::BTreeMap;
use std::fmt;

use fritos_dom::{is_form_field, Document, NodeId};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Rules for a single field. Zero lengths and empty patterns are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldRules {
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<String>,
}

impl FieldRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min_length(mut self, len: usize) -> Self {
        self.min_length = Some(len);
        self
    }

    pub fn max_length(mut self, len: usize) -> Self {
        self.max_length = Some(len);
        self
    }

    pub fn pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.to_string());
        self
    }

    /// Check a value. It is trimmed first.
    pub fn check(&self, value: &str) -> ValidationResult {
        let value = value.trim();
        let len = value.chars().count();
        let mut errors = Vec::new();

        if self.required && value.is_empty() {
            errors.push("This field is required".to_string());
        }

        if let Some(min) = self.min_length.filter(|&n| n > 0) {
            if !value.is_empty() && len < min {
                errors.push(format!("Minimum length is {} characters", min));
            }
        }

        if let Some(max) = self.max_length.filter(|&n| n > 0) {
            if len > max {
                errors.push(format!("Maximum length is {} characters", max));
            }
        }

        if let Some(pattern) = self.pattern.as_deref().filter(|p| !p.is_empty()) {
            if !value.is_empty() {
                match Regex::new(pattern) {
                    Ok(re) if re.is_match(value) => {}
                    Ok(_) => errors.push("Invalid format".to_string()),
                    Err(e) => {
                        tracing::debug!("Rejecting pattern {:?}: {}", pattern, e);
                        errors.push("Invalid pattern provided".to_string());
                    }
                }
            }
        }

        ValidationResult::from_errors(errors)
    }
}

/// Outcome of single-field validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self { valid: errors.is_empty(), errors }
    }

    pub fn failure(message: &str) -> Self {
        Self::from_errors(vec![message.to_string()])
    }
}

/// Validate one element with `FieldRules`
pub fn validate_field(doc: &Document, element: Option<NodeId>, rules: &FieldRules) -> ValidationResult {
    let Some(id) = element else {
        return ValidationResult::failure("No element found");
    };
    let is_field = doc.tree().tag_name(id).is_some_and(is_form_field);
    if !is_field {
        return ValidationResult::failure("Element is not a valid input field");
    }
    rules.check(&doc.value(id).unwrap_or_default())
}

/// Field name to value for every submittable field of a form
pub type FormData = BTreeMap<String, String>;

/// Field name to the message of its first failed rule
pub type FormErrors = BTreeMap<String, String>;

type FormCheck = Box<dyn Fn(&str, &FormData) -> bool>;

/// One rule of the whole-form contract
pub struct FormRule {
    check: FormCheck,
    pub message: String,
}

impl FormRule {
    /// Rule passing when `check(value, form_data)` returns true
    pub fn new(message: &str, check: impl Fn(&str, &FormData) -> bool + 'static) -> Self {
        Self { check: Box::new(check), message: message.to_string() }
    }

    pub fn required(message: &str) -> Self {
        Self::new(message, |value, _| !value.trim().is_empty())
    }

    pub fn min_length(len: usize, message: &str) -> Self {
        Self::new(message, move |value, _| value.chars().count() >= len)
    }

    /// Passes when the value matches. An invalid pattern never passes.
    pub fn pattern(pattern: &str, message: &str) -> Self {
        let regex = Regex::new(pattern).ok();
        if regex.is_none() {
            tracing::warn!("Invalid pattern {:?} in form rule", pattern);
        }
        Self::new(message, move |value, _| regex.as_ref().is_some_and(|re| re.is_match(value)))
    }

    /// Passes when the value equals another field's value
    pub fn matches_field(other: &str, message: &str) -> Self {
        let other = other.to_string();
        Self::new(message, move |value, data| data.get(&other).map(String::as_str) == Some(value))
    }

    pub fn passes(&self, value: &str, data: &FormData) -> bool {
        (self.check)(value, data)
    }
}

impl fmt::Debug for FormRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormRule").field("message", &self.message).finish_non_exhaustive()
    }
}

/// Rules per field name, checked in the order added
#[derive(Debug, Default)]
pub struct FormRules {
    fields: BTreeMap<String, Vec<FormRule>>,
}

impl FormRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, field: &str, rule: FormRule) -> Self {
        self.fields.entry(field.to_string()).or_default().push(rule);
        self
    }

    pub fn for_field(&self, field: &str) -> &[FormRule] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Named `input`, `textarea` and `select` descendants, in document order
fn named_fields(doc: &Document, form: NodeId) -> Vec<(String, NodeId)> {
    doc.tree()
        .descendants(form)
        .into_iter()
        .filter_map(|id| {
            let element = doc.element(id)?;
            if !is_form_field(element.tag_name()) {
                return None;
            }
            let name = element.get_attribute("name").filter(|n| !n.is_empty())?;
            Some((name.to_string(), id))
        })
        .collect()
}

/// Unchecked checkboxes and radios are not submitted
fn is_submitted(doc: &Document, id: NodeId) -> bool {
    let Some(element) = doc.element(id) else {
        return false;
    };
    let kind = element.get_attribute("type").unwrap_or_default().to_ascii_lowercase();
    !matches!(kind.as_str(), "checkbox" | "radio") || element.has_attribute("checked")
}

/// Snapshot of a form's submitted values; the first field of a name wins
pub fn form_data(doc: &Document, form: NodeId) -> FormData {
    let mut data = FormData::new();
    for (name, id) in named_fields(doc, form) {
        if is_submitted(doc, id) {
            let value = doc.value(id).unwrap_or_default();
            data.entry(name).or_insert(value);
        }
    }
    data
}

/// Validate every named field of `form`, stopping at the first failed
/// rule per field name
pub fn validate_form(doc: &Document, form: NodeId, rules: &FormRules) -> FormErrors {
    let data = form_data(doc, form);
    let mut errors = FormErrors::new();

    for (name, id) in named_fields(doc, form) {
        if errors.contains_key(&name) {
            continue;
        }
        let value = doc.value(id).unwrap_or_default();
        if let Some(failed) = rules.for_field(&name).iter().find(|r| !r.passes(&value, &data)) {
            errors.insert(name, failed.message.clone());
        }
    }

    tracing::debug!("Form validation found {} invalid fields", errors.len());
    errors
}
