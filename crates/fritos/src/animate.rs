//! Keyframe animation options
//!
//! `Selection::animate` turns a property map into a `@keyframes` rule with
//! a single `to` block, and these options into the inline `animation`
//! shorthand.

use fritos_dom::{parse_css_time, AnimationTiming, FillMode, IterationCount};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Animation settings, deserializable from the camelCase option object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnimationOptions {
    /// Duration in milliseconds
    pub duration: f64,
    /// CSS time, e.g. "0s" or "200ms"
    pub delay: String,
    /// CSS timing function
    pub easing: String,
    pub iteration_count: IterationCount,
    pub fill_mode: FillMode,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            duration: 1000.0,
            delay: "0s".into(),
            easing: "linear".into(),
            iteration_count: IterationCount::default(),
            fill_mode: FillMode::None,
        }
    }
}

impl AnimationOptions {
    pub fn duration(mut self, ms: f64) -> Self {
        self.duration = ms;
        self
    }

    pub fn delay(mut self, delay: &str) -> Self {
        self.delay = delay.to_string();
        self
    }

    pub fn easing(mut self, easing: &str) -> Self {
        self.easing = easing.to_string();
        self
    }

    pub fn iteration_count(mut self, count: IterationCount) -> Self {
        self.iteration_count = count;
        self
    }

    pub fn fill_mode(mut self, mode: FillMode) -> Self {
        self.fill_mode = mode;
        self
    }

    /// `<name> <duration>ms <easing> <delay> <iteration-count> <fill-mode>`
    pub fn shorthand(&self, name: &str) -> String {
        format!(
            "{} {}ms {} {} {} {}",
            name, self.duration, self.easing, self.delay, self.iteration_count, self.fill_mode
        )
    }

    /// Timing for the document timeline. An unparsable delay counts as zero.
    pub fn timing(&self) -> AnimationTiming {
        let delay_ms = parse_css_time(&self.delay).unwrap_or_else(|| {
            tracing::warn!("Ignoring unparsable animation delay {:?}", self.delay);
            0.0
        });
        AnimationTiming {
            duration_ms: self.duration.max(0.0),
            delay_ms,
            iterations: self.iteration_count,
        }
    }
}

/// `backgroundColor` -> `background-color`
pub fn kebab_case(property: &str) -> String {
    let mut out = String::with_capacity(property.len() + 4);
    for c in property.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}

/// `@keyframes` rule animating to the given properties
pub fn keyframes_css(name: &str, properties: &[(&str, &str)]) -> String {
    let mut css = format!("@keyframes {} {{\n  to {{\n", name);
    for (property, value) in properties {
        css.push_str(&format!("    {}: {};\n", kebab_case(property), value));
    }
    css.push_str("  }\n}\n");
    css
}

/// Fresh, collision-resistant animation name
pub fn animation_name() -> String {
    format!("fritos-animation-{}", Uuid::new_v4().simple())
}
