//! Document - High-level document API
//!
//! Owns the tree plus everything a page keeps next to it: event
//! listeners and the animation timeline.

use std::rc::Rc;
use std::time::Duration;

use crate::animation::AnimationManager;
use crate::events::EventRegistry;
use crate::{
    CssAnimation, DomError, DomResult, DomTree, ElementData, Event, Listener, ListenerId, NodeId,
    SelectorError,
};

/// HTML Document
#[derive(Debug)]
pub struct Document {
    tree: DomTree,
    url: String,
    /// Cached reference to <html> element
    html_element: Option<NodeId>,
    /// Cached reference to <head> element
    head_element: Option<NodeId>,
    /// Cached reference to <body> element
    body_element: Option<NodeId>,
    events: EventRegistry,
    animations: AnimationManager,
}

impl Document {
    /// Create a document with an empty html/head/body skeleton
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        tree.append_detached(tree.root(), html);
        tree.append_detached(html, head);
        tree.append_detached(html, body);

        Self {
            tree,
            url: url.to_string(),
            html_element: Some(html),
            head_element: Some(head),
            body_element: Some(body),
            events: EventRegistry::default(),
            animations: AnimationManager::default(),
        }
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: None,
            head_element: None,
            body_element: None,
            events: EventRegistry::default(),
            animations: AnimationManager::default(),
        }
    }

    /// Locate html, head and body after the tree was built by hand or by a parser
    pub fn finalize(&mut self) {
        self.html_element = self.tree.element_children(self.tree.root()).first().copied();
        self.head_element = self.find_child_of_html("head");
        self.body_element = self.find_child_of_html("body");
    }

    fn find_child_of_html(&self, tag: &str) -> Option<NodeId> {
        let html = self.html_element?;
        self.tree
            .element_children(html)
            .into_iter()
            .find(|&c| self.tree.tag_name(c) == Some(tag))
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get <html> element
    pub fn document_element(&self) -> Option<NodeId> {
        self.html_element.filter(|&h| self.tree.parent(h) == Some(self.tree.root()))
    }

    /// Get <head> element, if still attached
    pub fn head(&self) -> Option<NodeId> {
        self.head_element
            .filter(|&h| self.is_connected(h))
            .or_else(|| self.find_child_of_html("head"))
    }

    /// Get <body> element, if still attached
    pub fn body(&self) -> Option<NodeId> {
        self.body_element
            .filter(|&b| self.is_connected(b))
            .or_else(|| self.find_child_of_html("body"))
    }

    /// True if the node is in the document tree
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.tree.contains(self.tree.root(), id)
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Get element by ID (first in document order)
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree.descendants(self.tree.root()).into_iter().find(|&n| {
            self.element(n).is_some_and(|e| e.id() == Some(id))
        })
    }

    /// `document.querySelectorAll`
    pub fn select_all(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        self.tree.query_selector_all(self.tree.root(), selector)
    }

    /// `element.querySelectorAll`
    pub fn query_selector_all(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        self.tree.query_selector_all(scope, selector)
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.tree.get(id)?.as_element()
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.tree.get_mut(id)?.as_element_mut()
    }

    fn require_element(&mut self, id: NodeId) -> DomResult<&mut ElementData> {
        match self.tree.get_mut(id) {
            None => Err(DomError::NotFound(id)),
            Some(node) => node.as_element_mut().ok_or(DomError::InvalidNodeType(id)),
        }
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.get_attribute(name)
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.require_element(id)?.set_attribute(name, value)
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        self.element_mut(id)?.remove_attribute(name)
    }

    /// Inline style property (`element.style[name]`)
    pub fn style_property(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.style().get_property(name)
    }

    pub fn set_style_property(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.require_element(id)?.set_style_property(name, value);
        Ok(())
    }

    pub fn remove_style_property(&mut self, id: NodeId, name: &str) -> Option<String> {
        self.element_mut(id)?.remove_style_property(name)
    }

    /// Form value of an element
    pub fn value(&self, id: NodeId) -> Option<String> {
        self.tree.value(id)
    }

    pub fn set_value(&mut self, id: NodeId, value: &str) -> DomResult<()> {
        if self.tree.set_value(id, value) {
            Ok(())
        } else {
            Err(DomError::InvalidNodeType(id))
        }
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.tree.create_element(tag)
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.tree.create_text(content)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.tree.append_child(parent, child)
    }

    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) -> DomResult<()> {
        self.tree.insert_before(parent, child, reference)
    }

    /// `node.remove()`
    pub fn remove_node(&mut self, id: NodeId) {
        self.tree.detach(id);
    }

    /// Append a `<style>` holding `css` to the head (or the root element)
    pub fn inject_style(&mut self, css: &str) -> Option<NodeId> {
        let Some(container) = self.head().or_else(|| self.document_element()) else {
            tracing::warn!("No head or root element to hold stylesheet in {}", self.url);
            return None;
        };
        let style = self.tree.create_element("style");
        let text = self.tree.create_text(css);
        self.tree.append_detached(style, text);
        self.tree.append_detached(container, style);
        Some(style)
    }

    /// Register a listener. `once` listeners are dropped before their first call.
    pub fn add_event_listener(&mut self, target: NodeId, event_type: &str, listener: Listener, once: bool) -> ListenerId {
        self.events.add(target, event_type, listener, once)
    }

    /// Register a persistent listener from a closure
    pub fn on(
        &mut self,
        target: NodeId,
        event_type: &str,
        handler: impl Fn(&mut Document, &mut Event) + 'static,
    ) -> ListenerId {
        self.add_event_listener(target, event_type, Rc::new(handler), false)
    }

    pub fn remove_event_listener(&mut self, target: NodeId, event_type: &str, id: ListenerId) -> bool {
        self.events.remove(target, event_type, id)
    }

    /// Number of listeners for one target and type
    pub fn listener_count(&self, target: NodeId, event_type: &str) -> usize {
        self.events.count(target, event_type)
    }

    /// Dispatch an event at `target`, bubbling to ancestors when the event
    /// bubbles. Returns false if a listener called `prevent_default`.
    pub fn dispatch_event(&mut self, target: NodeId, mut event: Event) -> bool {
        if self.tree.get(target).is_none() {
            tracing::debug!("Dropping {} event for unknown node {}", event.event_type, target);
            return true;
        }
        event.target = target;

        if event.event_type == "animationend" {
            self.complete_animation(target, event.animation_name.as_deref());
        }

        let path: Vec<NodeId> = if event.bubbles {
            std::iter::once(target).chain(self.tree.ancestors(target)).collect()
        } else {
            vec![target]
        };

        for node in path {
            event.current_target = Some(node);
            for listener in self.events.take_for_dispatch(node, &event.event_type) {
                listener(self, &mut event);
            }
            if event.is_propagation_stopped() {
                break;
            }
        }
        event.current_target = None;

        !event.is_default_prevented()
    }

    /// Start an animation. A running animation on the same element is
    /// cancelled: its sheet goes away, its callback is dropped and
    /// `animationcancel` fires.
    pub fn start_animation(&mut self, animation: CssAnimation) {
        let target = animation.target;
        tracing::debug!("Starting animation {} on {}", animation.name, target);

        if let Some(old) = self.animations.start(animation) {
            self.clean_up_animation(&old);
            let elapsed = old.elapsed_ms() / 1000.0;
            self.dispatch_event(target, Event::animation_cancel(&old.name, elapsed));
        }
    }

    /// Running animation on an element
    pub fn running_animation(&self, target: NodeId) -> Option<&CssAnimation> {
        self.animations.get(target)
    }

    /// Number of running animations
    pub fn running_animations(&self) -> usize {
        self.animations.len()
    }

    /// Advance the animation clock, firing `animationend` for every
    /// animation that finished. Returns how many finished.
    pub fn advance_animations(&mut self, elapsed: Duration) -> usize {
        let due = self.animations.tick(elapsed.as_secs_f64() * 1000.0);
        let count = due.len();
        for (target, name, secs) in due {
            self.dispatch_event(target, Event::animation_end(&name, secs));
        }
        count
    }

    /// Jump the animation on `target` to its end
    pub fn finish_animation(&mut self, target: NodeId) -> bool {
        let Some(anim) = self.animations.get(target) else {
            return false;
        };
        let event = Event::animation_end(&anim.name, anim.timing.active_secs());
        self.dispatch_event(target, event);
        true
    }

    fn complete_animation(&mut self, target: NodeId, name: Option<&str>) -> bool {
        let Some(mut anim) = self.animations.take(target, name) else {
            return false;
        };
        tracing::debug!("Animation {} on {} completed", anim.name, target);
        self.clean_up_animation(&anim);
        if let Some(callback) = anim.on_complete.take() {
            callback(self, target);
        }
        true
    }

    /// Remove the keyframes sheet and the inline `animation` if it still
    /// refers to this animation
    fn clean_up_animation(&mut self, anim: &CssAnimation) {
        if let Some(sheet) = anim.sheet {
            self.tree.detach(sheet);
        }
        let still_ours = self
            .style_property(anim.target, "animation")
            .and_then(|v| v.split_whitespace().next())
            .is_some_and(|first| first == anim.name);
        if still_ours {
            self.remove_style_property(anim.target, "animation");
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}
