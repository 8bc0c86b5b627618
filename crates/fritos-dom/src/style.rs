//! Inline style declarations
//!
//! The `style` attribute as an ordered list of property/value pairs.

/// Inline style block of an element (`element.style`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    /// Create empty style
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a `style` attribute value
    pub fn parse(css_text: &str) -> Self {
        let mut style = Self::new();
        for decl in css_text.split(';') {
            let Some((name, value)) = decl.split_once(':') else {
                continue;
            };
            let name = name.trim();
            let value = value.trim();
            if !name.is_empty() && !value.is_empty() {
                style.set_property(name, value);
            }
        }
        style
    }

    /// Get a property value
    pub fn get_property(&self, name: &str) -> Option<&str> {
        let name = name.trim();
        self.declarations.iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Set a property. An empty value removes it, as in CSSOM.
    pub fn set_property(&mut self, name: &str, value: &str) {
        let name = name.trim().to_ascii_lowercase();
        let value = value.trim();
        if value.is_empty() {
            self.remove_property(&name);
            return;
        }
        if let Some(slot) = self.declarations.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value.to_string();
        } else {
            self.declarations.push((name, value.to_string()));
        }
    }

    /// Remove a property, returning the old value
    pub fn remove_property(&mut self, name: &str) -> Option<String> {
        let pos = self.declarations.iter().position(|(n, _)| n.eq_ignore_ascii_case(name.trim()))?;
        Some(self.declarations.remove(pos).1)
    }

    /// Number of declarations
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Iterate declarations in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Serialize back to attribute form
    pub fn css_text(&self) -> String {
        self.declarations.iter()
            .map(|(n, v)| format!("{}: {};", n, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.css_text())
    }
}
