//! Cooldown gate with FSM-driven activation gating
//!
//! The CooldownGate attaches to an actionable element and counts
//! activations (pointer releases, the click convention). Once the
//! configured threshold is reached it disables the element for a fixed
//! duration, then restores it - but only if the gate itself performed the
//! disabling, so an externally-disabled element stays disabled.
//!
//! Activations that arrive while the cooldown is running are swallowed
//! (`prevent_default` + `stop_propagation`) even if the underlying element
//! has no native disabled state.

use glasskit_core::element::SharedElement;
use glasskit_core::events::{event_types, Event};
use glasskit_core::fsm::StateMachine;
use glasskit_core::timer::TimerHandle;

use crate::context::{WidgetContext, WidgetId};

/// Cooldown gate states
pub mod states {
    /// Counting activations
    pub const READY: u32 = 0;
    /// Element disabled, timer running
    pub const COOLDOWN: u32 = 1;
}

/// Custom event types for the gate state machine
pub mod gate_events {
    /// Activation threshold reached (Ready -> Cooldown)
    pub const TRIP: u32 = 30001;
    /// Cooldown duration elapsed (Cooldown -> Ready)
    pub const RESET: u32 = 30002;
}

/// Default activation threshold
pub const DEFAULT_MAX_ACTIVATIONS: u32 = 1;

/// Default cooldown duration in milliseconds
pub const DEFAULT_COOLDOWN_MS: u64 = 1000;

/// Attribute set on elements without a native disabled state
const INERT_ATTRIBUTE: &str = "aria-disabled";

/// Cooldown gate configuration
#[derive(Clone, Copy, Debug)]
pub struct CooldownConfig {
    /// Activations before the cooldown triggers; 0 behaves as the default
    pub max_activations: u32,
    /// How long the element stays disabled, in milliseconds
    pub cooldown_ms: u64,
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            max_activations: DEFAULT_MAX_ACTIVATIONS,
            cooldown_ms: DEFAULT_COOLDOWN_MS,
        }
    }
}

impl CooldownConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the activation threshold
    pub fn max_activations(mut self, max: u32) -> Self {
        self.max_activations = max;
        self
    }

    /// Set the cooldown duration in milliseconds
    pub fn cooldown_ms(mut self, ms: u64) -> Self {
        self.cooldown_ms = ms;
        self
    }

    /// Threshold with the zero value coerced to the default
    fn effective_max_activations(&self) -> u32 {
        match self.max_activations {
            0 => DEFAULT_MAX_ACTIVATIONS,
            n => n,
        }
    }
}

/// Cooldown gate widget state
#[derive(Debug, Default)]
pub struct CooldownState {
    /// Activations counted in the current ready window
    pub activation_count: u32,
    /// Whether this gate (not external code) disabled the element
    disabled_by_gate: bool,
    /// Pending cooldown timer; `Some` iff the gate is in cooldown
    timer: Option<TimerHandle>,
}

/// Cooldown gate widget
pub struct CooldownGate {
    id: WidgetId,
    config: CooldownConfig,
    /// The element this gate disables and restores
    target: SharedElement,
    /// Cooldown-state-changed callback (true on entry, false on exit)
    on_cooldown_change: Option<Box<dyn FnMut(bool) + Send>>,
}

impl CooldownGate {
    /// Create a gate with default configuration
    pub fn new(ctx: &mut WidgetContext, target: SharedElement) -> Self {
        Self::with_config(ctx, target, CooldownConfig::default())
    }

    /// Create a gate with custom configuration
    pub fn with_config(ctx: &mut WidgetContext, target: SharedElement, config: CooldownConfig) -> Self {
        let fsm = Self::create_fsm();
        let id = ctx.register_widget_with_fsm(fsm);
        ctx.set_widget_state(id, CooldownState::default());

        Self {
            id,
            config,
            target,
            on_cooldown_change: None,
        }
    }

    fn create_fsm() -> StateMachine {
        StateMachine::builder(states::READY)
            .on(states::READY, gate_events::TRIP, states::COOLDOWN)
            .on(states::COOLDOWN, gate_events::RESET, states::READY)
            .build()
    }

    /// Get the widget ID
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// Whether the gate is currently in cooldown
    pub fn in_cooldown(&self, ctx: &WidgetContext) -> bool {
        ctx.get_fsm_state(self.id) == Some(states::COOLDOWN)
    }

    /// Activations counted in the current ready window
    pub fn activation_count(&self, ctx: &WidgetContext) -> u32 {
        ctx.get_widget_state::<CooldownState>(self.id)
            .map(|s| s.activation_count)
            .unwrap_or(0)
    }

    /// Set the cooldown-state-changed callback
    pub fn on_cooldown_change<F: FnMut(bool) + Send + 'static>(mut self, callback: F) -> Self {
        self.on_cooldown_change = Some(Box::new(callback));
        self
    }

    /// Handle an activation event
    ///
    /// Only pointer releases count as activations; everything else passes
    /// through untouched.
    pub fn handle_event(&mut self, ctx: &mut WidgetContext, event: &mut Event) {
        if event.event_type != event_types::POINTER_UP {
            return;
        }

        if self.in_cooldown(ctx) {
            // The element should already be inert; swallow the activation
            // anyway for elements that cannot be truly disabled.
            event.prevent_default();
            event.stop_propagation();
            return;
        }

        let max = self.config.effective_max_activations();

        let count = match ctx.get_widget_state_mut::<CooldownState>(self.id) {
            Some(state) => {
                state.activation_count += 1;
                state.activation_count
            }
            None => return,
        };

        if count >= max {
            self.enter_cooldown(ctx);
        }
    }

    fn enter_cooldown(&mut self, ctx: &mut WidgetContext) {
        if let Some(state) = ctx.get_widget_state_mut::<CooldownState>(self.id) {
            state.activation_count = 0;
        }
        ctx.send_fsm_event(self.id, gate_events::TRIP);

        let disabled_by_gate = self.disable_target();
        if let Some(state) = ctx.get_widget_state_mut::<CooldownState>(self.id) {
            state.disabled_by_gate = disabled_by_gate;
        }

        self.emit(true);

        let timer = ctx.schedule_timer(self.config.cooldown_ms);
        if let Some(state) = ctx.get_widget_state_mut::<CooldownState>(self.id) {
            state.timer = Some(timer);
        }

        tracing::debug!(
            id = ?self.id,
            cooldown_ms = self.config.cooldown_ms,
            "cooldown entered"
        );
    }

    /// Disable the target element; returns whether this gate did the
    /// disabling (an already-disabled element is left alone)
    fn disable_target(&self) -> bool {
        let Ok(mut el) = self.target.lock() else {
            return false;
        };

        if el.supports_disabled() {
            if el.is_disabled() {
                return false;
            }
            el.set_disabled(true);
        } else {
            el.set_attribute(INERT_ATTRIBUTE, "true");
            el.set_style("pointer-events", "none");
        }
        true
    }

    fn restore_target(&self) {
        if let Ok(mut el) = self.target.lock() {
            if el.supports_disabled() {
                el.set_disabled(false);
            } else {
                el.remove_attribute(INERT_ATTRIBUTE);
                el.remove_style("pointer-events");
            }
        }
    }

    /// Process a fired cooldown timer (call after the host advances the
    /// context clock)
    pub fn update(&mut self, ctx: &mut WidgetContext) {
        let timer = ctx
            .get_widget_state::<CooldownState>(self.id)
            .and_then(|s| s.timer);

        if let Some(handle) = timer {
            if ctx.take_fired(handle) {
                self.exit_cooldown(ctx);
            }
        }
    }

    fn exit_cooldown(&mut self, ctx: &mut WidgetContext) {
        let disabled_by_gate = ctx
            .get_widget_state::<CooldownState>(self.id)
            .map(|s| s.disabled_by_gate)
            .unwrap_or(false);

        if disabled_by_gate {
            self.restore_target();
        }

        if let Some(state) = ctx.get_widget_state_mut::<CooldownState>(self.id) {
            state.disabled_by_gate = false;
            state.timer = None;
        }

        ctx.send_fsm_event(self.id, gate_events::RESET);
        self.emit(false);

        tracing::debug!(id = ?self.id, "cooldown exited");
    }

    fn emit(&mut self, in_cooldown: bool) {
        if let Some(ref mut callback) = self.on_cooldown_change {
            callback(in_cooldown);
        }
    }

    /// Detach the gate: cancel any pending timer and unregister
    ///
    /// A cancelled timer never reports back, so no notification fires
    /// after detachment.
    pub fn detach(&mut self, ctx: &mut WidgetContext) {
        let timer = ctx
            .get_widget_state::<CooldownState>(self.id)
            .and_then(|s| s.timer);
        if let Some(handle) = timer {
            ctx.cancel_timer(handle);
        }
        ctx.unregister_widget(self.id);
    }
}

/// Create a cooldown gate attached to an element
pub fn cooldown_gate(target: SharedElement) -> CooldownGateBuilder {
    CooldownGateBuilder {
        target,
        config: CooldownConfig::default(),
        on_cooldown_change: None,
    }
}

/// Builder for creating cooldown gates
pub struct CooldownGateBuilder {
    target: SharedElement,
    config: CooldownConfig,
    on_cooldown_change: Option<Box<dyn FnMut(bool) + Send>>,
}

impl CooldownGateBuilder {
    /// Set the activation threshold
    pub fn max_activations(mut self, max: u32) -> Self {
        self.config.max_activations = max;
        self
    }

    /// Set the cooldown duration in milliseconds
    pub fn cooldown_ms(mut self, ms: u64) -> Self {
        self.config.cooldown_ms = ms;
        self
    }

    /// Set the cooldown-state-changed callback
    pub fn on_cooldown_change<F: FnMut(bool) + Send + 'static>(mut self, callback: F) -> Self {
        self.on_cooldown_change = Some(Box::new(callback));
        self
    }

    /// Build the gate widget
    pub fn build(self, ctx: &mut WidgetContext) -> CooldownGate {
        let mut gate = CooldownGate::with_config(ctx, self.target, self.config);
        gate.on_cooldown_change = self.on_cooldown_change;
        gate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glasskit_core::element::{ElementState, HostElement, SharedElement};
    use std::sync::{Arc, Mutex};

    fn button_element() -> (Arc<Mutex<ElementState>>, SharedElement) {
        let el = Arc::new(Mutex::new(ElementState::button()));
        let shared: SharedElement = el.clone();
        (el, shared)
    }

    fn inline_element() -> (Arc<Mutex<ElementState>>, SharedElement) {
        let el = Arc::new(Mutex::new(ElementState::inline()));
        let shared: SharedElement = el.clone();
        (el, shared)
    }

    fn click() -> Event {
        Event::pointer(event_types::POINTER_UP, 0, 0.0, 0.0)
    }

    #[test]
    fn test_threshold_trips_on_nth_activation() {
        let mut ctx = WidgetContext::new();
        let (el, shared) = button_element();
        let changes = Arc::new(Mutex::new(Vec::new()));

        let captured = Arc::clone(&changes);
        let mut gate = cooldown_gate(shared)
            .max_activations(3)
            .cooldown_ms(500)
            .on_cooldown_change(move |v| captured.lock().unwrap().push(v))
            .build(&mut ctx);

        // Activations 1 and 2 do not trip
        gate.handle_event(&mut ctx, &mut click());
        gate.handle_event(&mut ctx, &mut click());
        assert!(!gate.in_cooldown(&ctx));
        assert_eq!(gate.activation_count(&ctx), 2);
        assert!(!el.lock().unwrap().is_disabled());

        // Third activation trips the cooldown and resets the count
        gate.handle_event(&mut ctx, &mut click());
        assert!(gate.in_cooldown(&ctx));
        assert_eq!(gate.activation_count(&ctx), 0);
        assert!(el.lock().unwrap().is_disabled());
        assert_eq!(*changes.lock().unwrap(), vec![true]);
    }

    #[test]
    fn test_activation_during_cooldown_is_swallowed() {
        let mut ctx = WidgetContext::new();
        let (_el, shared) = button_element();
        let mut gate = cooldown_gate(shared).max_activations(1).build(&mut ctx);

        gate.handle_event(&mut ctx, &mut click());
        assert!(gate.in_cooldown(&ctx));

        let mut blocked = click();
        gate.handle_event(&mut ctx, &mut blocked);
        assert!(blocked.default_prevented);
        assert!(blocked.propagation_stopped);
        assert_eq!(gate.activation_count(&ctx), 0);
        assert!(gate.in_cooldown(&ctx));
    }

    #[test]
    fn test_cooldown_expiry_restores_once() {
        let mut ctx = WidgetContext::new();
        let (el, shared) = button_element();
        let changes = Arc::new(Mutex::new(Vec::new()));

        let captured = Arc::clone(&changes);
        let mut gate = cooldown_gate(shared)
            .max_activations(1)
            .cooldown_ms(1000)
            .on_cooldown_change(move |v| captured.lock().unwrap().push(v))
            .build(&mut ctx);

        gate.handle_event(&mut ctx, &mut click());
        assert!(el.lock().unwrap().is_disabled());

        // Not yet
        ctx.advance_time(999);
        gate.update(&mut ctx);
        assert!(gate.in_cooldown(&ctx));

        // Expiry restores the element and notifies exactly once
        ctx.advance_time(1000);
        gate.update(&mut ctx);
        assert!(!gate.in_cooldown(&ctx));
        assert!(!el.lock().unwrap().is_disabled());
        assert_eq!(*changes.lock().unwrap(), vec![true, false]);

        // Further updates are no-ops
        ctx.advance_time(5000);
        gate.update(&mut ctx);
        assert_eq!(*changes.lock().unwrap(), vec![true, false]);
    }

    #[test]
    fn test_gate_reenters_after_expiry() {
        let mut ctx = WidgetContext::new();
        let (_el, shared) = button_element();
        let mut gate = cooldown_gate(shared)
            .max_activations(2)
            .cooldown_ms(100)
            .build(&mut ctx);

        gate.handle_event(&mut ctx, &mut click());
        gate.handle_event(&mut ctx, &mut click());
        assert!(gate.in_cooldown(&ctx));

        ctx.advance_time(100);
        gate.update(&mut ctx);
        assert!(!gate.in_cooldown(&ctx));

        // A fresh ready window counts from zero again
        gate.handle_event(&mut ctx, &mut click());
        assert!(!gate.in_cooldown(&ctx));
        gate.handle_event(&mut ctx, &mut click());
        assert!(gate.in_cooldown(&ctx));
    }

    #[test]
    fn test_externally_disabled_element_is_not_restored() {
        let mut ctx = WidgetContext::new();
        let (el, shared) = button_element();
        el.lock().unwrap().set_disabled(true);

        let mut gate = cooldown_gate(shared)
            .max_activations(1)
            .cooldown_ms(100)
            .build(&mut ctx);

        gate.handle_event(&mut ctx, &mut click());
        assert!(gate.in_cooldown(&ctx));

        ctx.advance_time(100);
        gate.update(&mut ctx);

        // The gate did not disable it, so it does not re-enable it
        assert!(!gate.in_cooldown(&ctx));
        assert!(el.lock().unwrap().is_disabled());
    }

    #[test]
    fn test_inert_marking_for_elements_without_native_disable() {
        let mut ctx = WidgetContext::new();
        let (el, shared) = inline_element();
        let mut gate = cooldown_gate(shared)
            .max_activations(1)
            .cooldown_ms(100)
            .build(&mut ctx);

        gate.handle_event(&mut ctx, &mut click());
        {
            let el = el.lock().unwrap();
            assert_eq!(el.attribute("aria-disabled"), Some("true"));
            assert_eq!(el.style("pointer-events"), Some("none"));
        }

        ctx.advance_time(100);
        gate.update(&mut ctx);
        {
            let el = el.lock().unwrap();
            assert_eq!(el.attribute("aria-disabled"), None);
            assert_eq!(el.style("pointer-events"), None);
        }
    }

    #[test]
    fn test_detach_cancels_pending_timer() {
        let mut ctx = WidgetContext::new();
        let (_el, shared) = button_element();
        let changes = Arc::new(Mutex::new(Vec::new()));

        let captured = Arc::clone(&changes);
        let mut gate = cooldown_gate(shared)
            .max_activations(1)
            .cooldown_ms(1000)
            .on_cooldown_change(move |v| captured.lock().unwrap().push(v))
            .build(&mut ctx);

        gate.handle_event(&mut ctx, &mut click());
        assert_eq!(*changes.lock().unwrap(), vec![true]);

        gate.detach(&mut ctx);
        assert!(!ctx.is_registered(gate.id()));

        // Time passing after detachment delivers nothing
        ctx.advance_time(10_000);
        gate.update(&mut ctx);
        assert_eq!(*changes.lock().unwrap(), vec![true]);
    }

    #[test]
    fn test_zero_threshold_coerces_to_default() {
        let mut ctx = WidgetContext::new();
        let (_el, shared) = button_element();
        let mut gate = cooldown_gate(shared).max_activations(0).build(&mut ctx);

        // Behaves as the default threshold of 1
        gate.handle_event(&mut ctx, &mut click());
        assert!(gate.in_cooldown(&ctx));
    }

    #[test]
    fn test_non_activation_events_pass_through() {
        let mut ctx = WidgetContext::new();
        let (_el, shared) = button_element();
        let mut gate = cooldown_gate(shared).max_activations(1).build(&mut ctx);

        let mut event = Event::pointer(event_types::POINTER_DOWN, 0, 0.0, 0.0);
        gate.handle_event(&mut ctx, &mut event);
        assert!(!event.default_prevented);
        assert_eq!(gate.activation_count(&ctx), 0);
        assert!(!gate.in_cooldown(&ctx));
    }
}
