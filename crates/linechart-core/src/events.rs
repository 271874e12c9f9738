// File: crates/linechart-core/src/events.rs
// Summary: Host (shared document + window event bus) and custom events exchanged with the widget.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::dom::{Document, NodeId};

/// Emitted when a series path is clicked.
pub const LINE_SELECTED: &str = "line-selected";
/// External signal asking widgets to hide transient overlays.
pub const HIDE_MENU: &str = "hide-menu";

#[derive(Clone, Debug, PartialEq)]
pub enum EventDetail {
    None,
    /// The element an event originated from and its `id` attribute.
    Element { node: NodeId, id: Option<String> },
}

#[derive(Clone, Debug, PartialEq)]
pub struct CustomEvent {
    pub name: String,
    pub detail: EventDetail,
}

impl CustomEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), detail: EventDetail::None }
    }

    pub fn with_element(name: impl Into<String>, node: NodeId, id: Option<String>) -> Self {
        Self { name: name.into(), detail: EventDetail::Element { node, id } }
    }
}

pub type Listener = Rc<dyn Fn(&CustomEvent)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Window-level event target.
#[derive(Default)]
pub struct EventBus {
    listeners: RefCell<Vec<(ListenerId, String, Listener)>>,
    next_id: Cell<u64>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_event_listener(&self, name: &str, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, name.to_string(), listener));
        id
    }

    /// Returns false when `id` was not registered.
    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        let mut ls = self.listeners.borrow_mut();
        let before = ls.len();
        ls.retain(|(lid, _, _)| *lid != id);
        ls.len() != before
    }

    pub fn listener_count(&self, name: &str) -> usize {
        self.listeners.borrow().iter().filter(|(_, n, _)| n == name).count()
    }

    /// Call every listener registered for `event.name`, in registration order.
    /// Listeners may add or remove listeners while running.
    pub fn dispatch(&self, event: &CustomEvent) {
        let matching: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, n, _)| *n == event.name)
            .map(|(_, _, l)| Rc::clone(l))
            .collect();
        tracing::trace!(event = %event.name, listeners = matching.len(), "dispatch");
        for l in matching {
            l(event);
        }
    }
}

/// Document plus window event bus; shared between the host and its widgets.
#[derive(Default)]
pub struct Host {
    pub document: RefCell<Document>,
    pub window: EventBus,
}

impl Host {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Host whose body measures `width x height`.
    pub fn with_size(width: f64, height: f64) -> Rc<Self> {
        let host = Self::new();
        {
            let mut doc = host.document.borrow_mut();
            let body = doc.body();
            doc.set_size(body, width, height);
        }
        host
    }

    pub fn dispatch(&self, event: &CustomEvent) {
        self.window.dispatch(event);
    }
}
