//! GlassKit Widget Library
//!
//! Small host-framework-agnostic UI widgets with FSM-driven interactions:
//! a click-cooldown gate, a draggable frosted-glass surface, and a glass
//! popup overlay.
//!
//! # Architecture
//!
//! The widget system rests on three pillars:
//!
//! 1. **FSM-Driven Interactions**: Each widget's interaction state lives
//!    in a state machine (ready/cooldown, idle/hovered/dragging). State
//!    transitions mark the widget dirty.
//!
//! 2. **Context-Owned State**: Widgets keep their mutable state in a
//!    shared [`WidgetContext`] - registration, typed state storage, timers
//!    and document-scope gesture subscriptions - so the widget values
//!    themselves stay cheap handles.
//!
//! 3. **Pure Style Mappings**: Visuals are computed as configuration ->
//!    style-property mappings the host binds to its rendering layer; the
//!    widgets never render.
//!
//! # Example
//!
//! ```rust
//! use glasskit_core::{shared_element, ElementState};
//! use glasskit_widgets::prelude::*;
//!
//! let mut ctx = WidgetContext::new();
//!
//! // A gate that disables its button for 2s after every 3rd click
//! let gate = cooldown_gate(shared_element(ElementState::button()))
//!     .max_activations(3)
//!     .cooldown_ms(2000)
//!     .on_cooldown_change(|cooling| println!("cooldown: {cooling}"))
//!     .build(&mut ctx);
//!
//! // A draggable glass panel
//! let surface = glass_surface().draggable(true).build(&mut ctx);
//!
//! // Host loop: pump events into handle_event, advance the clock,
//! // call update, then apply style props of dirty widgets.
//! # let _ = (gate, surface);
//! ```

pub mod context;
pub mod cooldown;
pub mod glass;
pub mod popup;

pub use context::{
    DirtyTracker, SubscriptionId, WidgetContext, WidgetId, WidgetState,
};
pub use cooldown::{
    cooldown_gate, CooldownConfig, CooldownGate, CooldownGateBuilder, CooldownState,
    DEFAULT_COOLDOWN_MS, DEFAULT_MAX_ACTIVATIONS,
};
pub use glass::{
    glass_style_props, glass_surface, GlassConfig, GlassState, GlassSurface, GlassSurfaceBuilder,
};
pub use popup::{
    glass_popup, GlassPopup, GlassPopupBuilder, OnCloseCallback, PopupConfig, PopupView,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::context::{WidgetContext, WidgetId};
    pub use crate::cooldown::{cooldown_gate, CooldownConfig, CooldownGate};
    pub use crate::glass::{glass_surface, GlassConfig, GlassSurface};
    pub use crate::popup::{glass_popup, GlassPopup, PopupConfig};
}
