//! DOM Events
//!
//! Listener registry and the event object passed to handlers. Dispatch
//! itself lives on `Document`, since handlers get `&mut Document`.

use std::collections::HashMap;
use std::rc::Rc;

use crate::{Document, NodeId};

/// Event handler. Shared so one handler can sit on many elements.
pub type Listener = Rc<dyn Fn(&mut Document, &mut Event)>;

/// Handle returned by `add_event_listener`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// DOM event
#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: String,
    pub target: NodeId,
    pub current_target: Option<NodeId>,
    /// Set for `animationend` / `animationcancel`
    pub animation_name: Option<String>,
    /// Seconds the animation ran, for animation events
    pub elapsed_time: f64,
    pub bubbles: bool,
    pub cancelable: bool,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    /// Non-bubbling event, like `new Event(type)`
    pub fn new(event_type: &str) -> Self {
        Self {
            event_type: event_type.to_string(),
            target: NodeId::NONE,
            current_target: None,
            animation_name: None,
            elapsed_time: 0.0,
            bubbles: false,
            cancelable: false,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Bubbling, cancelable event (click, input, ...)
    pub fn bubbling(event_type: &str) -> Self {
        Self {
            bubbles: true,
            cancelable: true,
            ..Self::new(event_type)
        }
    }

    /// `animationend` for a named animation
    pub fn animation_end(name: &str, elapsed_time: f64) -> Self {
        Self {
            bubbles: true,
            animation_name: Some(name.to_string()),
            elapsed_time,
            ..Self::new("animationend")
        }
    }

    /// `animationcancel` for a named animation
    pub fn animation_cancel(name: &str, elapsed_time: f64) -> Self {
        Self {
            bubbles: true,
            animation_name: Some(name.to_string()),
            elapsed_time,
            ..Self::new("animationcancel")
        }
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Stop propagation
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

struct Registration {
    id: ListenerId,
    listener: Listener,
    once: bool,
}

/// Listeners keyed by (target, event type), in registration order
#[derive(Default)]
pub(crate) struct EventRegistry {
    next_id: u64,
    listeners: HashMap<(NodeId, String), Vec<Registration>>,
}

impl EventRegistry {
    pub(crate) fn add(&mut self, target: NodeId, event_type: &str, listener: Listener, once: bool) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners
            .entry((target, event_type.to_string()))
            .or_default()
            .push(Registration { id, listener, once });
        id
    }

    pub(crate) fn remove(&mut self, target: NodeId, event_type: &str, id: ListenerId) -> bool {
        let key = (target, event_type.to_string());
        let Some(list) = self.listeners.get_mut(&key) else {
            return false;
        };
        let before = list.len();
        list.retain(|r| r.id != id);
        let removed = list.len() != before;
        if list.is_empty() {
            self.listeners.remove(&key);
        }
        removed
    }

    /// Listeners to run for one target. Once-listeners are unregistered
    /// here, before they run.
    pub(crate) fn take_for_dispatch(&mut self, target: NodeId, event_type: &str) -> Vec<Listener> {
        let key = (target, event_type.to_string());
        let Some(list) = self.listeners.get_mut(&key) else {
            return Vec::new();
        };
        let snapshot = list.iter().map(|r| r.listener.clone()).collect();
        list.retain(|r| !r.once);
        if list.is_empty() {
            self.listeners.remove(&key);
        }
        snapshot
    }

    pub(crate) fn count(&self, target: NodeId, event_type: &str) -> usize {
        self.listeners
            .get(&(target, event_type.to_string()))
            .map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRegistry")
            .field("targets", &self.listeners.len())
            .finish()
    }
}
