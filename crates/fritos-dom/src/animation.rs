//! CSS Animation timeline
//!
//! Tracks running keyframe animations per element. Values are never
//! interpolated; the timeline only decides when an animation ends so the
//! document can fire `animationend` and run its one-shot cleanup.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Document, NodeId};

/// Animation fill mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillMode {
    #[default]
    None,
    Forwards,
    Backwards,
    Both,
}

impl fmt::Display for FillMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Forwards => "forwards",
            Self::Backwards => "backwards",
            Self::Both => "both",
        })
    }
}

/// `animation-iteration-count`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IterationCount {
    Count(f64),
    Infinite,
}

impl Default for IterationCount {
    fn default() -> Self {
        Self::Count(1.0)
    }
}

impl fmt::Display for IterationCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{}", n),
            Self::Infinite => f.write_str("infinite"),
        }
    }
}

impl Serialize for IterationCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Count(n) => serializer.serialize_f64(*n),
            Self::Infinite => serializer.serialize_str("infinite"),
        }
    }
}

impl<'de> Deserialize<'de> for IterationCount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) if n >= 0.0 => Ok(Self::Count(n)),
            Raw::Text(s) if s.trim().eq_ignore_ascii_case("infinite") => Ok(Self::Infinite),
            Raw::Text(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| *n >= 0.0)
                .map(Self::Count)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid iteration count: {}", s))),
            Raw::Number(n) => Err(serde::de::Error::custom(format!("negative iteration count: {}", n))),
        }
    }
}

/// Parse a CSS `<time>` ("0s", "250ms", "-1.5s") into milliseconds
pub fn parse_css_time(value: &str) -> Option<f64> {
    let value = value.trim().to_ascii_lowercase();
    let (number, scale) = if let Some(ms) = value.strip_suffix("ms") {
        (ms, 1.0)
    } else if let Some(s) = value.strip_suffix('s') {
        (s, 1000.0)
    } else {
        return None;
    };
    let n: f64 = number.trim().parse().ok()?;
    n.is_finite().then_some(n * scale)
}

/// Resolved timing of one animation, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationTiming {
    pub duration_ms: f64,
    pub delay_ms: f64,
    pub iterations: IterationCount,
}

impl AnimationTiming {
    /// Time from start until `animationend`, or `None` if it never ends
    pub fn end_time_ms(&self) -> Option<f64> {
        match self.iterations {
            IterationCount::Infinite => None,
            IterationCount::Count(n) => Some((self.delay_ms + self.duration_ms * n).max(0.0)),
        }
    }

    /// Seconds of active time reported in `elapsedTime`
    pub fn active_secs(&self) -> f64 {
        match self.iterations {
            IterationCount::Infinite => f64::INFINITY,
            IterationCount::Count(n) => (self.duration_ms * n).max(0.0) / 1000.0,
        }
    }
}

/// Callback run once when an animation completes
pub type CompletionCallback = Box<dyn FnOnce(&mut Document, NodeId)>;

/// A running keyframe animation bound to one element
pub struct CssAnimation {
    pub target: NodeId,
    pub name: String,
    /// Injected `<style>` holding the keyframes, removed on completion
    pub sheet: Option<NodeId>,
    pub timing: AnimationTiming,
    pub(crate) elapsed_ms: f64,
    pub(crate) on_complete: Option<CompletionCallback>,
}

impl CssAnimation {
    pub fn new(target: NodeId, name: &str, timing: AnimationTiming) -> Self {
        Self {
            target,
            name: name.to_string(),
            sheet: None,
            timing,
            elapsed_ms: 0.0,
            on_complete: None,
        }
    }

    /// Attach the stylesheet to remove on completion
    pub fn with_sheet(mut self, sheet: Option<NodeId>) -> Self {
        self.sheet = sheet;
        self
    }

    /// Run `callback` once when the animation completes
    pub fn on_complete(mut self, callback: impl FnOnce(&mut Document, NodeId) + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// Milliseconds since start
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    fn is_due(&self) -> bool {
        self.timing.end_time_ms().is_some_and(|end| self.elapsed_ms >= end)
    }
}

impl fmt::Debug for CssAnimation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CssAnimation")
            .field("target", &self.target)
            .field("name", &self.name)
            .field("sheet", &self.sheet)
            .field("timing", &self.timing)
            .field("elapsed_ms", &self.elapsed_ms)
            .field("has_callback", &self.on_complete.is_some())
            .finish()
    }
}

/// Running animations, at most one per element
#[derive(Debug, Default)]
pub(crate) struct AnimationManager {
    running: Vec<CssAnimation>,
}

impl AnimationManager {
    /// Start an animation, returning the one it replaced on the same element
    pub(crate) fn start(&mut self, animation: CssAnimation) -> Option<CssAnimation> {
        let replaced = self.take(animation.target, None);
        self.running.push(animation);
        replaced
    }

    /// Remove the animation on `target`, optionally only if the name matches
    pub(crate) fn take(&mut self, target: NodeId, name: Option<&str>) -> Option<CssAnimation> {
        let pos = self.running.iter().position(|a| {
            a.target == target && name.is_none_or(|n| a.name == n)
        })?;
        Some(self.running.remove(pos))
    }

    pub(crate) fn get(&self, target: NodeId) -> Option<&CssAnimation> {
        self.running.iter().find(|a| a.target == target)
    }

    /// Advance every clock; report (target, name, active seconds) of those now due
    pub(crate) fn tick(&mut self, elapsed_ms: f64) -> Vec<(NodeId, String, f64)> {
        let mut due = Vec::new();
        for anim in &mut self.running {
            anim.elapsed_ms += elapsed_ms;
            if anim.is_due() {
                due.push((anim.target, anim.name.clone(), anim.timing.active_secs()));
            }
        }
        due
    }

    pub(crate) fn len(&self) -> usize {
        self.running.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timing(duration_ms: f64, delay_ms: f64, iterations: IterationCount) -> AnimationTiming {
        AnimationTiming { duration_ms, delay_ms, iterations }
    }

    #[test]
    fn test_parse_css_time() {
        assert_eq!(parse_css_time("0s"), Some(0.0));
        assert_eq!(parse_css_time("250ms"), Some(250.0));
        assert_eq!(parse_css_time(" 1.5S "), Some(1500.0));
        assert_eq!(parse_css_time("-1s"), Some(-1000.0));
        assert_eq!(parse_css_time("10"), None);
        assert_eq!(parse_css_time("fast"), None);
    }

    #[test]
    fn test_end_time() {
        assert_eq!(timing(1000.0, 500.0, IterationCount::Count(2.0)).end_time_ms(), Some(2500.0));
        assert_eq!(timing(1000.0, -5000.0, IterationCount::Count(1.0)).end_time_ms(), Some(0.0));
        assert_eq!(timing(1000.0, 0.0, IterationCount::Infinite).end_time_ms(), None);
    }

    #[test]
    fn test_manager_tick_and_replace() {
        let mut mgr = AnimationManager::default();
        let a = NodeId(1);
        let b = NodeId(2);
        mgr.start(CssAnimation::new(a, "fade", timing(100.0, 0.0, IterationCount::Count(1.0))));
        mgr.start(CssAnimation::new(b, "spin", timing(300.0, 0.0, IterationCount::Count(1.0))));

        let due = mgr.tick(150.0);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].0, a);
        assert_eq!(due[0].1, "fade");

        let replaced = mgr.start(CssAnimation::new(b, "grow", timing(10.0, 0.0, IterationCount::Count(1.0))));
        assert_eq!(replaced.map(|r| r.name), Some("spin".to_string()));
        assert_eq!(mgr.len(), 2);
        assert!(mgr.take(b, Some("spin")).is_none());
        assert_eq!(mgr.get(b).map(|r| r.name.as_str()), Some("grow"));
    }

    #[test]
    fn test_iteration_count_serde() {
        let n: IterationCount = serde_json::from_str("3").unwrap();
        assert_eq!(n, IterationCount::Count(3.0));
        let inf: IterationCount = serde_json::from_str("\"infinite\"").unwrap();
        assert_eq!(inf, IterationCount::Infinite);
        assert!(serde_json::from_str::<IterationCount>("-1").is_err());
        assert_eq!(serde_json::to_string(&IterationCount::Infinite).unwrap(), "\"infinite\"");
        assert_eq!(IterationCount::Count(1.0).to_string(), "1");
    }
}
