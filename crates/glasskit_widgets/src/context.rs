//! Widget Context - manages widget state, FSM, timers, and event routing
//!
//! The WidgetContext provides:
//! - Widget registration with stable IDs
//! - FSM-driven interaction states
//! - Type-erased per-widget state storage
//! - Dirty tracking for efficient re-renders
//! - One-shot timers against the host clock
//! - Per-instance document-scope gesture subscriptions
//!
//! Widgets never talk to each other through the context; each instance
//! owns its registered state exclusively and the context is plumbing.

use std::any::Any;
use std::collections::HashSet;

use indexmap::IndexMap;
use slotmap::{Key, SlotMap};

use glasskit_core::events::{Event, EventDispatcher, EventType, HandlerId};
use glasskit_core::fsm::StateMachine;
use glasskit_core::timer::{TimerHandle, TimerQueue};

slotmap::new_key_type! {
    /// Identifier for a registered widget
    pub struct WidgetId;
}

/// Trait for per-widget state types
///
/// Any `Send + 'static` type can be stored as widget state; the `as_any`
/// methods enable type-safe downcasting on retrieval.
pub trait WidgetState: Send + 'static {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Send + 'static> WidgetState for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Data stored for each registered widget
#[derive(Default)]
struct WidgetData {
    /// Optional FSM for interaction states
    fsm: Option<StateMachine>,
    /// Custom state (type-erased)
    state: Option<Box<dyn WidgetState>>,
}

/// Dirty tracking for incremental re-renders
#[derive(Default)]
pub struct DirtyTracker {
    dirty: HashSet<WidgetId>,
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, id: WidgetId) {
        self.dirty.insert(id);
    }

    pub fn is_dirty(&self, id: WidgetId) -> bool {
        self.dirty.contains(&id)
    }

    pub fn has_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Take all dirty widget IDs (clears the set)
    pub fn take_dirty(&mut self) -> Vec<WidgetId> {
        self.dirty.drain().collect()
    }

    pub fn clear(&mut self) {
        self.dirty.clear();
    }
}

/// Handle to a document-scope subscription, used to remove it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Registry of document-scope event interest, keyed by owning widget
///
/// A drag gesture subscribes its widget to move/release events at a scope
/// wider than the widget's own bounds; the registry keeps each
/// subscription tied to the instance that installed it so overlapping
/// instances cannot observe each other's gestures.
#[derive(Default)]
struct DocumentSubscriptions {
    subs: IndexMap<SubscriptionId, (WidgetId, EventType)>,
    next_id: u64,
}

impl DocumentSubscriptions {
    fn subscribe(&mut self, widget: WidgetId, event_type: EventType) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.subs.insert(id, (widget, event_type));
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subs.shift_remove(&id).is_some()
    }

    fn is_subscribed(&self, widget: WidgetId, event_type: EventType) -> bool {
        self.subs
            .values()
            .any(|(w, t)| *w == widget && *t == event_type)
    }

    fn remove_widget(&mut self, widget: WidgetId) {
        self.subs.retain(|_, (w, _)| *w != widget);
    }
}

/// The main widget context
///
/// Central coordinator for widget registration, interaction FSMs, state
/// storage, dirty tracking, timers, and event routing. Hosts create one
/// per widget tree, pump platform events into the widgets, and advance
/// the clock with [`advance_time`](Self::advance_time).
#[derive(Default)]
pub struct WidgetContext {
    /// Registered widgets
    widgets: SlotMap<WidgetId, WidgetData>,
    /// Dirty tracker
    dirty: DirtyTracker,
    /// Event dispatcher for host-level handler registration
    pub events: EventDispatcher,
    /// One-shot timer queue
    timers: TimerQueue,
    /// Timers that expired but have not yet been consumed by their widget
    fired: HashSet<TimerHandle>,
    /// Document-scope gesture subscriptions
    subscriptions: DocumentSubscriptions,
}

impl WidgetContext {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Widget Registration
    // =========================================================================

    /// Register a new widget and get its ID
    pub fn register_widget(&mut self) -> WidgetId {
        let id = self.widgets.insert(WidgetData::default());
        self.dirty.mark(id);
        tracing::trace!(?id, "widget registered");
        id
    }

    /// Register a widget with a state machine
    pub fn register_widget_with_fsm(&mut self, fsm: StateMachine) -> WidgetId {
        let id = self.widgets.insert(WidgetData {
            fsm: Some(fsm),
            state: None,
        });
        self.dirty.mark(id);
        tracing::trace!(?id, "widget registered with fsm");
        id
    }

    /// Unregister a widget, dropping its state and any document-scope
    /// subscriptions it still holds
    pub fn unregister_widget(&mut self, id: WidgetId) {
        self.widgets.remove(id);
        self.subscriptions.remove_widget(id);
        tracing::trace!(?id, "widget unregistered");
    }

    pub fn is_registered(&self, id: WidgetId) -> bool {
        self.widgets.contains_key(id)
    }

    /// The event-dispatch target for a widget
    pub fn event_target(id: WidgetId) -> u64 {
        id.data().as_ffi()
    }

    // =========================================================================
    // State Machine Integration
    // =========================================================================

    /// Send an event to a widget's FSM
    ///
    /// Returns true if the FSM transitioned to a new state; transitions
    /// mark the widget dirty.
    pub fn send_fsm_event(&mut self, id: WidgetId, event: u32) -> bool {
        if let Some(data) = self.widgets.get_mut(id) {
            if let Some(ref mut fsm) = data.fsm {
                if fsm.send(event) {
                    self.dirty.mark(id);
                    return true;
                }
            }
        }
        false
    }

    /// Get a widget's current FSM state
    pub fn get_fsm_state(&self, id: WidgetId) -> Option<u32> {
        self.widgets
            .get(id)
            .and_then(|d| d.fsm.as_ref())
            .map(|fsm| fsm.current_state())
    }

    // =========================================================================
    // Widget State
    // =========================================================================

    /// Set custom state for a widget
    pub fn set_widget_state<S: WidgetState>(&mut self, id: WidgetId, state: S) {
        if let Some(data) = self.widgets.get_mut(id) {
            data.state = Some(Box::new(state));
            self.dirty.mark(id);
        }
    }

    /// Get custom state for a widget
    pub fn get_widget_state<S: 'static>(&self, id: WidgetId) -> Option<&S> {
        self.widgets
            .get(id)
            .and_then(|d| d.state.as_ref())
            .and_then(|s| (**s).as_any().downcast_ref())
    }

    /// Get mutable custom state for a widget
    pub fn get_widget_state_mut<S: 'static>(&mut self, id: WidgetId) -> Option<&mut S> {
        self.widgets
            .get_mut(id)
            .and_then(|d| d.state.as_mut())
            .and_then(|s| (**s).as_any_mut().downcast_mut())
    }

    // =========================================================================
    // Dirty Tracking
    // =========================================================================

    /// Mark a widget as needing re-render
    pub fn mark_dirty(&mut self, id: WidgetId) {
        self.dirty.mark(id);
    }

    pub fn is_dirty(&self, id: WidgetId) -> bool {
        self.dirty.is_dirty(id)
    }

    pub fn has_dirty(&self) -> bool {
        self.dirty.has_dirty()
    }

    /// Take all dirty widget IDs (clears the set)
    pub fn take_dirty(&mut self) -> Vec<WidgetId> {
        self.dirty.take_dirty()
    }

    /// Clear all dirty flags (call after rendering)
    pub fn clear_dirty(&mut self) {
        self.dirty.clear();
    }

    // =========================================================================
    // Event Handling
    // =========================================================================

    /// Dispatch an event to a widget's FSM and to registered handlers
    pub fn dispatch_event(&mut self, id: WidgetId, event: &mut Event) {
        self.send_fsm_event(id, event.event_type);

        event.target = Self::event_target(id);
        self.events.dispatch(event);
    }

    /// Register an event handler for a widget
    pub fn on_event<F>(&mut self, id: WidgetId, event_type: EventType, handler: F) -> HandlerId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.events
            .register(Self::event_target(id), event_type, handler)
    }

    /// Remove a handler registered with [`on_event`](Self::on_event)
    pub fn remove_event_handler(&mut self, id: HandlerId) -> bool {
        self.events.remove(id)
    }

    // =========================================================================
    // Timers
    // =========================================================================

    /// Current clock value in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    /// Schedule a one-shot timer `delay_ms` from the current clock value
    pub fn schedule_timer(&mut self, delay_ms: u64) -> TimerHandle {
        self.timers.schedule(delay_ms)
    }

    /// Cancel a timer whether it is pending or expired-but-unconsumed
    ///
    /// After a cancel, [`take_fired`](Self::take_fired) never returns true
    /// for the handle.
    pub fn cancel_timer(&mut self, handle: TimerHandle) -> bool {
        let was_fired = self.fired.remove(&handle);
        self.timers.cancel(handle) || was_fired
    }

    /// Whether a timer is still pending
    pub fn timer_pending(&self, handle: TimerHandle) -> bool {
        self.timers.is_pending(handle)
    }

    /// Advance the clock; expired timers become consumable via
    /// [`take_fired`](Self::take_fired)
    pub fn advance_time(&mut self, now_ms: u64) {
        for handle in self.timers.advance(now_ms) {
            self.fired.insert(handle);
        }
    }

    /// Consume a fired timer; returns true at most once per handle
    pub fn take_fired(&mut self, handle: TimerHandle) -> bool {
        self.fired.remove(&handle)
    }

    // =========================================================================
    // Document-Scope Subscriptions
    // =========================================================================

    /// Subscribe a widget to an event type at document scope
    ///
    /// While subscribed, the host forwards matching events to the widget
    /// regardless of hit-testing, which is what lets a drag continue
    /// outside the element's bounds.
    pub fn subscribe_document(&mut self, id: WidgetId, event_type: EventType) -> SubscriptionId {
        self.subscriptions.subscribe(id, event_type)
    }

    /// Remove a document-scope subscription; returns false if it was
    /// already gone
    pub fn unsubscribe_document(&mut self, sub: SubscriptionId) -> bool {
        self.subscriptions.unsubscribe(sub)
    }

    /// Whether a widget holds a document-scope subscription for an event
    /// type
    pub fn document_subscribed(&self, id: WidgetId, event_type: EventType) -> bool {
        self.subscriptions.is_subscribed(id, event_type)
    }

    /// Total live document-scope subscriptions (for leak checks)
    pub fn document_subscription_count(&self) -> usize {
        self.subscriptions.subs.len()
    }
}
