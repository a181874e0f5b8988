//! Event types and dispatch
//!
//! Platform input reaches widgets as discrete [`Event`] values carrying an
//! event type, a target, and optional pointer data. Widgets may flag an
//! event as consumed via [`Event::stop_propagation`] and
//! [`Event::prevent_default`]; hosts check both flags after dispatch.
//!
//! The [`EventDispatcher`] is the subscription surface for host-level
//! wiring: handlers are registered against a `(target, event_type)` pair
//! and removed by the [`HandlerId`] returned at registration, so every
//! subscribe has an explicit unsubscribe.

use std::sync::Arc;

use indexmap::IndexMap;

/// Event type identifier
pub type EventType = u32;

/// Standard event types
pub mod event_types {
    /// Pointer button pressed over the element
    pub const POINTER_DOWN: u32 = 1;
    /// Pointer button released (the click convention)
    pub const POINTER_UP: u32 = 2;
    /// Pointer moved
    pub const POINTER_MOVE: u32 = 3;
    /// Pointer entered the element bounds
    pub const POINTER_ENTER: u32 = 4;
    /// Pointer left the element bounds
    pub const POINTER_LEAVE: u32 = 5;
}

/// Primary pointer button (left mouse button, single touch)
pub const PRIMARY_BUTTON: u8 = 0;

/// Target value meaning "any target" - handlers registered here observe
/// every dispatched event of their type, the way a document-level listener
/// would.
pub const DOCUMENT_TARGET: u64 = 0;

/// Payload carried by an event
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EventData {
    None,
    Pointer { x: f32, y: f32, button: u8, pressure: f32 },
}

/// A discrete input event
#[derive(Clone, Debug)]
pub struct Event {
    pub event_type: EventType,
    /// The element the event targets (widget id, or [`DOCUMENT_TARGET`])
    pub target: u64,
    pub data: EventData,
    pub timestamp: u64,
    /// Set by a handler to keep the event from reaching later handlers
    pub propagation_stopped: bool,
    /// Set by a handler to suppress the host's default action
    pub default_prevented: bool,
}

impl Event {
    /// Create an event with no payload
    pub fn new(event_type: EventType, target: u64) -> Self {
        Self {
            event_type,
            target,
            data: EventData::None,
            timestamp: 0,
            propagation_stopped: false,
            default_prevented: false,
        }
    }

    /// Create a primary-button pointer event
    pub fn pointer(event_type: EventType, target: u64, x: f32, y: f32) -> Self {
        Self::pointer_with_button(event_type, target, x, y, PRIMARY_BUTTON)
    }

    /// Create a pointer event with an explicit button
    pub fn pointer_with_button(event_type: EventType, target: u64, x: f32, y: f32, button: u8) -> Self {
        Self {
            event_type,
            target,
            data: EventData::Pointer {
                x,
                y,
                button,
                pressure: 1.0,
            },
            timestamp: 0,
            propagation_stopped: false,
            default_prevented: false,
        }
    }

    /// Keep the event from reaching later handlers
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Suppress the host's default action for this event
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Pointer position, if this is a pointer event
    pub fn pointer_position(&self) -> Option<(f32, f32)> {
        match self.data {
            EventData::Pointer { x, y, .. } => Some((x, y)),
            EventData::None => None,
        }
    }

    /// Pointer button, if this is a pointer event
    pub fn pointer_button(&self) -> Option<u8> {
        match self.data {
            EventData::Pointer { button, .. } => Some(button),
            EventData::None => None,
        }
    }
}

/// Handle to a registered handler, used to remove it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

/// Callback invoked on dispatch
pub type EventHandler = Arc<dyn Fn(&Event) + Send + Sync>;

struct HandlerEntry {
    target: u64,
    event_type: EventType,
    callback: EventHandler,
}

/// Registry of event handlers with explicit register/remove pairing
///
/// Handlers run in registration order. Dispatch honors
/// `propagation_stopped`: once set, later handlers are skipped.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: IndexMap<HandlerId, HandlerEntry>,
    next_id: u64,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `(target, event_type)`
    ///
    /// A handler registered on [`DOCUMENT_TARGET`] observes every event of
    /// its type regardless of target.
    pub fn register<F>(&mut self, target: u64, event_type: EventType, callback: F) -> HandlerId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.next_id += 1;
        let id = HandlerId(self.next_id);
        self.handlers.insert(
            id,
            HandlerEntry {
                target,
                event_type,
                callback: Arc::new(callback),
            },
        );
        id
    }

    /// Remove a handler; returns false if it was already gone
    pub fn remove(&mut self, id: HandlerId) -> bool {
        self.handlers.shift_remove(&id).is_some()
    }

    /// Number of registered handlers
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Whether any handler matches `(target, event_type)`
    pub fn has_handler(&self, target: u64, event_type: EventType) -> bool {
        self.handlers
            .values()
            .any(|h| h.target == target && h.event_type == event_type)
    }

    /// Dispatch an event to matching handlers in registration order
    pub fn dispatch(&self, event: &mut Event) {
        for entry in self.handlers.values() {
            if event.propagation_stopped {
                break;
            }
            if entry.event_type != event.event_type {
                continue;
            }
            if entry.target == event.target || entry.target == DOCUMENT_TARGET {
                (entry.callback)(&*event);
            }
        }
    }
}
