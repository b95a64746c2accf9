//! Focus management.
//!
//! Widgets never touch a real document. They talk to a [`FocusHost`], which
//! a renderer implements over its own element tree. [`FocusTree`] is an
//! in-memory host.

use std::collections::HashMap;

/// Unique identifier for a focusable element
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FocusId(pub String);

impl FocusId {
    /// Create a new focus ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl From<&str> for FocusId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for FocusId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for FocusId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An element that might take keyboard focus, with the attributes that
/// decide whether it can.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusCandidate {
    pub id: FocusId,
    pub disabled: bool,
    pub read_only: bool,
    pub tab_index: Option<i32>,
    pub width: u16,
    pub height: u16,
    /// Number of layout boxes the element produces.
    pub client_rects: usize,
}

impl FocusCandidate {
    /// A visible, enabled element.
    pub fn new(id: impl Into<FocusId>) -> Self {
        Self {
            id: id.into(),
            disabled: false,
            read_only: false,
            tab_index: None,
            width: 1,
            height: 1,
            client_rects: 1,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn tab_index(mut self, index: i32) -> Self {
        self.tab_index = Some(index);
        self
    }

    pub fn size(mut self, width: u16, height: u16) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Laid out with no size and no boxes (`display: none` and friends).
    pub fn hidden(mut self) -> Self {
        self.width = 0;
        self.height = 0;
        self.client_rects = 0;
        self
    }

    /// Whether Tab navigation may land on this element.
    pub fn is_focusable(&self) -> bool {
        if self.disabled || self.read_only || self.tab_index == Some(-1) {
            return false;
        }
        (self.width > 0 && self.height > 0) || self.client_rects > 0
    }
}

/// The document as seen by focus-managing widgets.
pub trait FocusHost {
    /// The element that currently has focus.
    fn active_element(&self) -> Option<FocusId>;

    /// Move focus to `id`. Returns false if the element is not attached.
    fn focus(&mut self, id: &FocusId) -> bool;

    /// Whether the element is still part of the document.
    fn is_attached(&self, id: &FocusId) -> bool;

    /// Whether `id` is `container` or one of its descendants.
    fn contains(&self, container: &FocusId, id: &FocusId) -> bool;

    /// Descendants of `container` in document order.
    fn candidates(&self, container: &FocusId) -> Vec<FocusCandidate>;
}

/// The focusable descendants of `container`, in tab order.
pub fn focusable_in(host: &dyn FocusHost, container: &FocusId) -> Vec<FocusId> {
    host.candidates(container)
        .into_iter()
        .filter(FocusCandidate::is_focusable)
        .map(|c| c.id)
        .collect()
}

#[derive(Debug, Clone)]
struct Node {
    candidate: FocusCandidate,
    parent: Option<FocusId>,
}

/// In-memory element tree implementing [`FocusHost`].
#[derive(Debug, Default)]
pub struct FocusTree {
    /// Insertion order doubles as document order.
    order: Vec<FocusId>,
    nodes: HashMap<FocusId, Node>,
    current: Option<FocusId>,
}

impl FocusTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an element under `parent` (or at the root).
    pub fn insert(&mut self, candidate: FocusCandidate, parent: Option<&FocusId>) {
        let id = candidate.id.clone();
        if !self.nodes.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.nodes.insert(
            id,
            Node {
                candidate,
                parent: parent.cloned(),
            },
        );
    }

    /// Detach an element and all of its descendants.
    pub fn remove(&mut self, id: &FocusId) {
        let doomed: Vec<FocusId> = self
            .order
            .iter()
            .filter(|candidate| self.contains(id, candidate))
            .cloned()
            .collect();
        for d in &doomed {
            self.nodes.remove(d);
        }
        self.order.retain(|o| !doomed.contains(o));
        if self.current.as_ref().is_some_and(|c| doomed.contains(c)) {
            self.current = None;
        }
    }

    /// Replace the attributes of an attached element.
    pub fn update(&mut self, candidate: FocusCandidate) {
        if let Some(node) = self.nodes.get_mut(&candidate.id) {
            node.candidate = candidate;
        }
    }

    /// Check if an element is focused
    pub fn is_focused(&self, id: &str) -> bool {
        self.current.as_ref().is_some_and(|current| current.0 == id)
    }

    /// Clear focus
    pub fn clear_focus(&mut self) {
        self.current = None;
    }
}

impl FocusHost for FocusTree {
    fn active_element(&self) -> Option<FocusId> {
        self.current.clone()
    }

    fn focus(&mut self, id: &FocusId) -> bool {
        if !self.nodes.contains_key(id) {
            return false;
        }
        self.current = Some(id.clone());
        true
    }

    fn is_attached(&self, id: &FocusId) -> bool {
        self.nodes.contains_key(id)
    }

    fn contains(&self, container: &FocusId, id: &FocusId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == container {
                return true;
            }
            cursor = self.nodes.get(current).and_then(|n| n.parent.as_ref());
        }
        false
    }

    fn candidates(&self, container: &FocusId) -> Vec<FocusCandidate> {
        self.order
            .iter()
            .filter(|id| *id != container && self.contains(container, id))
            .filter_map(|id| self.nodes.get(id).map(|n| n.candidate.clone()))
            .collect()
    }
}
