//! Glass surface with optional pointer-drag repositioning
//!
//! A decorative frosted-glass container. Visuals are a pure mapping from
//! [`GlassConfig`] (plus the current drag offset and hover state) to style
//! properties; see [`glass_style_props`].
//!
//! When dragging is enabled, a primary-button press anchors the gesture
//! and installs a document-scope move/release subscription pair so the
//! drag keeps tracking after the pointer leaves the surface. Each gesture
//! installs exactly one pair and the release removes exactly that pair.

use glasskit_core::color::Color;
use glasskit_core::events::{event_types, Event, PRIMARY_BUTTON};
use glasskit_core::fsm::StateMachine;
use glasskit_core::style::{Shadow, StyleProps, Transform};

use crate::context::{SubscriptionId, WidgetContext, WidgetId};

/// Glass surface states
pub mod states {
    /// Pointer outside the surface
    pub const IDLE: u32 = 0;
    /// Pointer over the surface
    pub const HOVERED: u32 = 1;
    /// Drag gesture in progress
    pub const DRAGGING: u32 = 2;
}

/// Custom event types for the surface state machine
pub mod surface_events {
    /// Drag gesture started (primary press on a draggable surface)
    pub const GRAB: u32 = 31001;
    /// Drag gesture ended
    pub const RELEASE: u32 = 31002;
}

/// Glass surface configuration
#[derive(Clone, Copy, Debug)]
pub struct GlassConfig {
    /// Backdrop blur radius in pixels
    pub blur: f32,
    /// Background opacity
    pub opacity: f32,
    /// Border opacity (raised by 0.1 while hovered)
    pub border_opacity: f32,
    /// Corner radius in pixels
    pub border_radius: f32,
    /// Background color; alpha is composed from `opacity` by the host
    pub bg_color: Color,
    /// Whether pointer-drag repositioning is enabled
    pub draggable: bool,
}

impl Default for GlassConfig {
    fn default() -> Self {
        Self {
            blur: 10.0,
            opacity: 0.1,
            border_opacity: 0.2,
            border_radius: 16.0,
            bg_color: Color::WHITE,
            draggable: false,
        }
    }
}

impl GlassConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backdrop blur radius
    pub fn blur(mut self, blur: f32) -> Self {
        self.blur = blur;
        self
    }

    /// Set the background opacity
    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Set the border opacity
    pub fn border_opacity(mut self, opacity: f32) -> Self {
        self.border_opacity = opacity;
        self
    }

    /// Set the corner radius
    pub fn border_radius(mut self, radius: f32) -> Self {
        self.border_radius = radius;
        self
    }

    /// Set the background color
    pub fn bg_color(mut self, color: Color) -> Self {
        self.bg_color = color;
        self
    }

    /// Enable or disable drag repositioning
    pub fn draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }
}

/// The move/release subscription pair installed for one drag gesture
#[derive(Clone, Copy, Debug)]
struct DragGesture {
    move_sub: SubscriptionId,
    up_sub: SubscriptionId,
}

/// Glass surface widget state
#[derive(Debug, Default)]
pub struct GlassState {
    /// Accumulated translation
    pub offset_x: f32,
    pub offset_y: f32,
    /// Pointer-to-offset relationship captured at gesture start;
    /// `Some` iff a drag is in progress
    anchor: Option<(f32, f32)>,
    /// Live subscription pair; `Some` iff a drag is in progress
    gesture: Option<DragGesture>,
}

/// Glass surface widget
pub struct GlassSurface {
    id: WidgetId,
    config: GlassConfig,
}

impl GlassSurface {
    /// Create a surface with default configuration
    pub fn new(ctx: &mut WidgetContext) -> Self {
        Self::with_config(ctx, GlassConfig::default())
    }

    /// Create a surface with custom configuration
    pub fn with_config(ctx: &mut WidgetContext, config: GlassConfig) -> Self {
        let fsm = Self::create_fsm();
        let id = ctx.register_widget_with_fsm(fsm);
        ctx.set_widget_state(id, GlassState::default());

        Self { id, config }
    }

    fn create_fsm() -> StateMachine {
        StateMachine::builder(states::IDLE)
            // Hover transitions
            .on(states::IDLE, event_types::POINTER_ENTER, states::HOVERED)
            .on(states::HOVERED, event_types::POINTER_LEAVE, states::IDLE)
            // Drag start; a press can arrive without a prior enter (touch)
            .on(states::HOVERED, surface_events::GRAB, states::DRAGGING)
            .on(states::IDLE, surface_events::GRAB, states::DRAGGING)
            // Drag end; a leave during the drag is deliberately ignored
            .on(states::DRAGGING, surface_events::RELEASE, states::HOVERED)
            .build()
    }

    /// Get the widget ID
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// The surface configuration
    pub fn config(&self) -> &GlassConfig {
        &self.config
    }

    /// Whether a drag gesture is in progress
    pub fn is_dragging(&self, ctx: &WidgetContext) -> bool {
        ctx.get_fsm_state(self.id) == Some(states::DRAGGING)
    }

    /// Whether the pointer is over the surface (or dragging it)
    pub fn is_hovered(&self, ctx: &WidgetContext) -> bool {
        matches!(
            ctx.get_fsm_state(self.id),
            Some(states::HOVERED) | Some(states::DRAGGING)
        )
    }

    /// Current accumulated translation
    pub fn offset(&self, ctx: &WidgetContext) -> (f32, f32) {
        ctx.get_widget_state::<GlassState>(self.id)
            .map(|s| (s.offset_x, s.offset_y))
            .unwrap_or((0.0, 0.0))
    }

    /// Handle a pointer event
    ///
    /// Press events are expected when the surface is hit; move and
    /// release events are expected at document scope while a drag is
    /// active (the surface subscribes for them per gesture).
    pub fn handle_event(&mut self, ctx: &mut WidgetContext, event: &mut Event) {
        match event.event_type {
            event_types::POINTER_ENTER | event_types::POINTER_LEAVE => {
                ctx.send_fsm_event(self.id, event.event_type);
            }
            event_types::POINTER_DOWN => self.on_pointer_down(ctx, event),
            event_types::POINTER_MOVE => self.on_pointer_move(ctx, event),
            event_types::POINTER_UP => self.on_pointer_up(ctx),
            _ => {}
        }
    }

    fn on_pointer_down(&mut self, ctx: &mut WidgetContext, event: &mut Event) {
        if !self.config.draggable || self.is_dragging(ctx) {
            return;
        }
        if event.pointer_button() != Some(PRIMARY_BUTTON) {
            return;
        }
        let Some((x, y)) = event.pointer_position() else {
            return;
        };
        if ctx.get_widget_state::<GlassState>(self.id).is_none() {
            return;
        }

        // Keep the host from starting its own drag behavior
        event.prevent_default();

        let move_sub = ctx.subscribe_document(self.id, event_types::POINTER_MOVE);
        let up_sub = ctx.subscribe_document(self.id, event_types::POINTER_UP);

        if let Some(state) = ctx.get_widget_state_mut::<GlassState>(self.id) {
            state.anchor = Some((x - state.offset_x, y - state.offset_y));
            state.gesture = Some(DragGesture { move_sub, up_sub });
        }

        ctx.send_fsm_event(self.id, surface_events::GRAB);
        tracing::debug!(id = ?self.id, x, y, "drag started");
    }

    fn on_pointer_move(&mut self, ctx: &mut WidgetContext, event: &mut Event) {
        if !self.is_dragging(ctx) {
            return;
        }
        let Some((x, y)) = event.pointer_position() else {
            return;
        };

        if let Some(state) = ctx.get_widget_state_mut::<GlassState>(self.id) {
            if let Some((anchor_x, anchor_y)) = state.anchor {
                state.offset_x = x - anchor_x;
                state.offset_y = y - anchor_y;
            }
        }
        ctx.mark_dirty(self.id);
    }

    fn on_pointer_up(&mut self, ctx: &mut WidgetContext) {
        if !self.is_dragging(ctx) {
            return;
        }

        let gesture = ctx
            .get_widget_state_mut::<GlassState>(self.id)
            .and_then(|state| {
                state.anchor = None;
                state.gesture.take()
            });

        // Remove exactly the pair this gesture installed
        if let Some(gesture) = gesture {
            ctx.unsubscribe_document(gesture.move_sub);
            ctx.unsubscribe_document(gesture.up_sub);
        }

        ctx.send_fsm_event(self.id, surface_events::RELEASE);
        tracing::debug!(id = ?self.id, "drag ended");
    }

    /// Style properties for the surface in its current state
    pub fn style(&self, ctx: &WidgetContext) -> StyleProps {
        glass_style_props(&self.config, self.offset(ctx), self.is_hovered(ctx))
    }

    /// Detach the surface: any live gesture subscriptions are dropped with
    /// the registration
    pub fn detach(&mut self, ctx: &mut WidgetContext) {
        ctx.unregister_widget(self.id);
    }
}

/// Create a glass surface
pub fn glass_surface() -> GlassSurfaceBuilder {
    GlassSurfaceBuilder {
        config: GlassConfig::default(),
    }
}

/// Builder for creating glass surfaces
pub struct GlassSurfaceBuilder {
    config: GlassConfig,
}

impl GlassSurfaceBuilder {
    /// Set the backdrop blur radius
    pub fn blur(mut self, blur: f32) -> Self {
        self.config.blur = blur;
        self
    }

    /// Set the background opacity
    pub fn opacity(mut self, opacity: f32) -> Self {
        self.config.opacity = opacity;
        self
    }

    /// Set the border opacity
    pub fn border_opacity(mut self, opacity: f32) -> Self {
        self.config.border_opacity = opacity;
        self
    }

    /// Set the corner radius
    pub fn border_radius(mut self, radius: f32) -> Self {
        self.config.border_radius = radius;
        self
    }

    /// Set the background color
    pub fn bg_color(mut self, color: Color) -> Self {
        self.config.bg_color = color;
        self
    }

    /// Enable or disable drag repositioning
    pub fn draggable(mut self, draggable: bool) -> Self {
        self.config.draggable = draggable;
        self
    }

    /// Build the surface widget
    pub fn build(self, ctx: &mut WidgetContext) -> GlassSurface {
        GlassSurface::with_config(ctx, self.config)
    }
}

/// Map a glass configuration to style properties
///
/// Pure function of the configuration, the accumulated drag offset, and
/// the hover state; hovering raises the border opacity and deepens the
/// shadow.
pub fn glass_style_props(config: &GlassConfig, offset: (f32, f32), hovered: bool) -> StyleProps {
    let shadow_tint = Color::from_hex(0x1F2687);

    let mut props = StyleProps::new()
        .with("--blur", format!("{}px", config.blur))
        .with("--opacity", format!("{}", config.opacity))
        .with("--border-opacity", format!("{}", config.border_opacity))
        .with("--border-radius", format!("{}px", config.border_radius))
        .with("--bg-color", config.bg_color.to_css_rgb())
        .with("transform", Transform::translate(offset.0, offset.1).to_css())
        .with(
            "box-shadow",
            Shadow::new(0.0, 8.0, 32.0, shadow_tint.with_alpha(0.15)).to_css(),
        );

    if config.draggable {
        props.set("cursor", "move");
    }

    if hovered {
        let hover = StyleProps::new()
            .with(
                "--border-opacity",
                format!("{}", config.border_opacity + 0.1),
            )
            .with(
                "box-shadow",
                Shadow::new(0.0, 8.0, 32.0, shadow_tint.with_alpha(0.25)).to_css(),
            );
        props = props.merge(&hover);
    }

    props
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(x: f32, y: f32) -> Event {
        Event::pointer(event_types::POINTER_DOWN, 0, x, y)
    }

    fn move_to(x: f32, y: f32) -> Event {
        Event::pointer(event_types::POINTER_MOVE, 0, x, y)
    }

    fn release(x: f32, y: f32) -> Event {
        Event::pointer(event_types::POINTER_UP, 0, x, y)
    }

    #[test]
    fn test_drag_tracks_relative_to_anchor() {
        let mut ctx = WidgetContext::new();
        let mut surface = glass_surface().draggable(true).build(&mut ctx);

        surface.handle_event(&mut ctx, &mut press(100.0, 100.0));
        assert!(surface.is_dragging(&ctx));

        surface.handle_event(&mut ctx, &mut move_to(130.0, 145.0));
        assert_eq!(surface.offset(&ctx), (30.0, 45.0));

        surface.handle_event(&mut ctx, &mut release(130.0, 145.0));
        assert!(!surface.is_dragging(&ctx));

        // A new press without movement keeps the accumulated offset;
        // the anchor is relative, not absolute
        surface.handle_event(&mut ctx, &mut press(200.0, 200.0));
        surface.handle_event(&mut ctx, &mut release(200.0, 200.0));
        assert_eq!(surface.offset(&ctx), (30.0, 45.0));
    }

    #[test]
    fn test_press_prevents_default() {
        let mut ctx = WidgetContext::new();
        let mut surface = glass_surface().draggable(true).build(&mut ctx);

        let mut event = press(10.0, 10.0);
        surface.handle_event(&mut ctx, &mut event);
        assert!(event.default_prevented);
    }

    #[test]
    fn test_drag_disabled_ignores_press() {
        let mut ctx = WidgetContext::new();
        let mut surface = glass_surface().build(&mut ctx);

        let mut event = press(100.0, 100.0);
        surface.handle_event(&mut ctx, &mut event);
        assert!(!surface.is_dragging(&ctx));
        assert!(!event.default_prevented);
        assert_eq!(ctx.document_subscription_count(), 0);

        surface.handle_event(&mut ctx, &mut move_to(150.0, 150.0));
        assert_eq!(surface.offset(&ctx), (0.0, 0.0));
    }

    #[test]
    fn test_non_primary_button_ignored() {
        let mut ctx = WidgetContext::new();
        let mut surface = glass_surface().draggable(true).build(&mut ctx);

        let mut event =
            Event::pointer_with_button(event_types::POINTER_DOWN, 0, 100.0, 100.0, 2);
        surface.handle_event(&mut ctx, &mut event);
        assert!(!surface.is_dragging(&ctx));
        assert_eq!(ctx.document_subscription_count(), 0);
    }

    #[test]
    fn test_move_without_press_is_ignored() {
        let mut ctx = WidgetContext::new();
        let mut surface = glass_surface().draggable(true).build(&mut ctx);

        surface.handle_event(&mut ctx, &mut move_to(50.0, 50.0));
        assert_eq!(surface.offset(&ctx), (0.0, 0.0));
    }

    #[test]
    fn test_gesture_subscriptions_are_paired() {
        let mut ctx = WidgetContext::new();
        let mut surface = glass_surface().draggable(true).build(&mut ctx);

        for round in 0..3 {
            surface.handle_event(&mut ctx, &mut press(10.0, 10.0));
            assert_eq!(
                ctx.document_subscription_count(),
                2,
                "one pair per gesture (round {round})"
            );
            assert!(ctx.document_subscribed(surface.id(), event_types::POINTER_MOVE));
            assert!(ctx.document_subscribed(surface.id(), event_types::POINTER_UP));

            surface.handle_event(&mut ctx, &mut release(10.0, 10.0));
            assert_eq!(
                ctx.document_subscription_count(),
                0,
                "release removes the pair (round {round})"
            );
        }
    }

    #[test]
    fn test_drag_continues_outside_bounds() {
        let mut ctx = WidgetContext::new();
        let mut surface = glass_surface().draggable(true).build(&mut ctx);

        surface.handle_event(&mut ctx, &mut press(0.0, 0.0));
        // Pointer leaves the surface mid-drag; the gesture keeps tracking
        surface.handle_event(
            &mut ctx,
            &mut Event::pointer(event_types::POINTER_LEAVE, 0, -10.0, -10.0),
        );
        assert!(surface.is_dragging(&ctx));

        surface.handle_event(&mut ctx, &mut move_to(-200.0, 300.0));
        assert_eq!(surface.offset(&ctx), (-200.0, 300.0));
    }

    #[test]
    fn test_hover_state_follows_enter_leave() {
        let mut ctx = WidgetContext::new();
        let mut surface = glass_surface().build(&mut ctx);

        assert!(!surface.is_hovered(&ctx));
        surface.handle_event(
            &mut ctx,
            &mut Event::pointer(event_types::POINTER_ENTER, 0, 5.0, 5.0),
        );
        assert!(surface.is_hovered(&ctx));

        surface.handle_event(
            &mut ctx,
            &mut Event::pointer(event_types::POINTER_LEAVE, 0, -5.0, -5.0),
        );
        assert!(!surface.is_hovered(&ctx));
    }

    #[test]
    fn test_style_props_defaults() {
        let props = glass_style_props(&GlassConfig::default(), (0.0, 0.0), false);

        assert_eq!(props.get("--blur"), Some("10px"));
        assert_eq!(props.get("--opacity"), Some("0.1"));
        assert_eq!(props.get("--border-opacity"), Some("0.2"));
        assert_eq!(props.get("--border-radius"), Some("16px"));
        assert_eq!(props.get("--bg-color"), Some("255, 255, 255"));
        assert_eq!(props.get("transform"), Some("translate(0px, 0px)"));
        assert_eq!(
            props.get("box-shadow"),
            Some("0px 8px 32px 0px rgba(31, 38, 135, 0.15)")
        );
        assert_eq!(props.get("cursor"), None);
    }

    #[test]
    fn test_style_props_reflect_offset_and_drag_cursor() {
        let config = GlassConfig::default().draggable(true);
        let props = glass_style_props(&config, (30.0, 45.0), false);

        assert_eq!(props.get("transform"), Some("translate(30px, 45px)"));
        assert_eq!(props.get("cursor"), Some("move"));
    }

    #[test]
    fn test_hover_raises_border_opacity() {
        let props = glass_style_props(&GlassConfig::default(), (0.0, 0.0), true);

        assert_eq!(props.get("--border-opacity"), Some("0.3"));
        assert_eq!(
            props.get("box-shadow"),
            Some("0px 8px 32px 0px rgba(31, 38, 135, 0.25)")
        );
    }

    #[test]
    fn test_surface_style_reads_context_state() {
        let mut ctx = WidgetContext::new();
        let mut surface = glass_surface().draggable(true).build(&mut ctx);

        surface.handle_event(&mut ctx, &mut press(0.0, 0.0));
        surface.handle_event(&mut ctx, &mut move_to(12.0, 8.0));

        let props = surface.style(&ctx);
        assert_eq!(props.get("transform"), Some("translate(12px, 8px)"));
        // Dragging counts as hovered for the style mapping
        assert_eq!(props.get("--border-opacity"), Some("0.3"));
    }

    #[test]
    fn test_detach_drops_live_gesture() {
        let mut ctx = WidgetContext::new();
        let mut surface = glass_surface().draggable(true).build(&mut ctx);

        surface.handle_event(&mut ctx, &mut press(0.0, 0.0));
        assert_eq!(ctx.document_subscription_count(), 2);

        surface.detach(&mut ctx);
        assert_eq!(ctx.document_subscription_count(), 0);
        assert!(!ctx.is_registered(surface.id()));
    }
}
