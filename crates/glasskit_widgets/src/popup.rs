//! Glass popup - a full-viewport overlay hosting a glass panel
//!
//! Visibility is entirely owner-controlled: the popup never flips its own
//! `is_open`, it only emits a close-requested notification (backdrop
//! click, explicit close control) and the owner reacts by calling
//! [`GlassPopup::set_open`]. A click inside the panel stops propagation so
//! it never reads as a backdrop click.

use std::sync::Arc;

use glasskit_core::color::Color;
use glasskit_core::events::Event;
use glasskit_core::style::StyleProps;

use crate::context::{WidgetContext, WidgetId};
use crate::glass::{glass_style_props, GlassConfig};

/// Callback invoked when the popup requests to be closed
pub type OnCloseCallback = Arc<dyn Fn() + Send + Sync>;

/// Glass popup configuration
#[derive(Clone, Copy, Debug)]
pub struct PopupConfig {
    /// Visibility; owned by the embedding application
    pub is_open: bool,
    /// Whether a backdrop click requests close
    pub close_on_backdrop: bool,
    /// Whether an explicit close control is rendered
    pub show_close_button: bool,
    /// Panel styling passthrough
    pub glass: GlassConfig,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            is_open: false,
            close_on_backdrop: true,
            show_close_button: true,
            glass: GlassConfig::default(),
        }
    }
}

impl PopupConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set initial visibility
    pub fn open(mut self, open: bool) -> Self {
        self.is_open = open;
        self
    }

    /// Set whether a backdrop click requests close
    pub fn close_on_backdrop(mut self, close: bool) -> Self {
        self.close_on_backdrop = close;
        self
    }

    /// Set whether the close control is rendered
    pub fn show_close_button(mut self, show: bool) -> Self {
        self.show_close_button = show;
        self
    }

    /// Set the panel glass configuration
    pub fn glass(mut self, glass: GlassConfig) -> Self {
        self.glass = glass;
        self
    }
}

/// Rendered form of an open popup: style mappings for the backdrop and
/// the centered panel, plus whether the close control is shown
#[derive(Clone, Debug, PartialEq)]
pub struct PopupView {
    pub backdrop: StyleProps,
    pub panel: StyleProps,
    pub show_close_button: bool,
}

/// Glass popup widget
pub struct GlassPopup {
    id: WidgetId,
    config: PopupConfig,
    on_close: Option<OnCloseCallback>,
}

impl GlassPopup {
    /// Create a popup with default configuration (closed)
    pub fn new(ctx: &mut WidgetContext) -> Self {
        Self::with_config(ctx, PopupConfig::default())
    }

    /// Create a popup with custom configuration
    pub fn with_config(ctx: &mut WidgetContext, config: PopupConfig) -> Self {
        let id = ctx.register_widget();
        Self {
            id,
            config,
            on_close: None,
        }
    }

    /// Get the widget ID
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// Whether the popup is currently open
    pub fn is_open(&self) -> bool {
        self.config.is_open
    }

    /// Set visibility (called by the owner, typically in response to the
    /// close-requested notification)
    pub fn set_open(&mut self, ctx: &mut WidgetContext, open: bool) {
        if self.config.is_open != open {
            self.config.is_open = open;
            ctx.mark_dirty(self.id);
        }
    }

    /// Set the close-requested callback
    pub fn on_close(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_close = Some(Arc::new(callback));
        self
    }

    /// Handle a click on the backdrop
    ///
    /// Ignored when closed, when the click's propagation was already
    /// stopped (it originated inside the panel), or when
    /// `close_on_backdrop` is off.
    pub fn handle_backdrop_click(&mut self, event: &mut Event) {
        if !self.config.is_open || event.propagation_stopped {
            return;
        }
        if self.config.close_on_backdrop {
            self.emit_close();
        }
    }

    /// Handle a click inside the panel: confine it to the panel
    pub fn handle_panel_click(&mut self, event: &mut Event) {
        event.stop_propagation();
    }

    /// Handle a click on the close control
    ///
    /// Emits close-requested regardless of `close_on_backdrop`.
    pub fn handle_close_click(&mut self) {
        if self.config.is_open {
            self.emit_close();
        }
    }

    fn emit_close(&self) {
        tracing::debug!(id = ?self.id, "close requested");
        if let Some(ref callback) = self.on_close {
            callback();
        }
    }

    /// The popup's rendered form; `None` while closed
    pub fn view(&self) -> Option<PopupView> {
        if !self.config.is_open {
            return None;
        }

        Some(PopupView {
            backdrop: backdrop_style_props(),
            panel: glass_style_props(&self.config.glass, (0.0, 0.0), false),
            show_close_button: self.config.show_close_button,
        })
    }

    /// Detach the popup
    pub fn detach(&mut self, ctx: &mut WidgetContext) {
        ctx.unregister_widget(self.id);
    }
}

/// Style properties for the full-viewport dimmed backdrop
fn backdrop_style_props() -> StyleProps {
    StyleProps::new()
        .with("position", "fixed")
        .with("inset", "0")
        .with("background", Color::BLACK.with_alpha(0.4).to_css_rgba())
        .with("backdrop-filter", "blur(2px)")
        .with("z-index", "1000")
}

/// Create a glass popup
pub fn glass_popup() -> GlassPopupBuilder {
    GlassPopupBuilder {
        config: PopupConfig::default(),
        on_close: None,
    }
}

/// Builder for creating glass popups
pub struct GlassPopupBuilder {
    config: PopupConfig,
    on_close: Option<OnCloseCallback>,
}

impl GlassPopupBuilder {
    /// Set initial visibility
    pub fn open(mut self, open: bool) -> Self {
        self.config.is_open = open;
        self
    }

    /// Set whether a backdrop click requests close
    pub fn close_on_backdrop(mut self, close: bool) -> Self {
        self.config.close_on_backdrop = close;
        self
    }

    /// Set whether the close control is rendered
    pub fn show_close_button(mut self, show: bool) -> Self {
        self.config.show_close_button = show;
        self
    }

    /// Set the panel glass configuration
    pub fn glass(mut self, glass: GlassConfig) -> Self {
        self.config.glass = glass;
        self
    }

    /// Set the close-requested callback
    pub fn on_close(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_close = Some(Arc::new(callback));
        self
    }

    /// Build the popup widget
    pub fn build(self, ctx: &mut WidgetContext) -> GlassPopup {
        let mut popup = GlassPopup::with_config(ctx, self.config);
        popup.on_close = self.on_close;
        popup
    }
}
