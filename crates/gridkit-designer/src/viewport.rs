//! Viewport and coordinate transformation for grid rendering.
//!
//! Handles conversion between screen coordinates (pixels, origin at the
//! top-left of the viewport) and canvas coordinates (the zoom/pan independent
//! document space). Manages zoom, pan, fit-to-view and single-panel focus.
//!
//! ```text
//! screen = canvas * zoom + pan
//! canvas = (screen - pan) / zoom
//! ```
//!
//! The viewport never reads or modifies the document or its selection.

use gridkit_core::constants::{FIT_PADDING, FOCUS_FILL, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};
use gridkit_core::{Bounds, Observers, Point, Size, SubscriptionId};
use gridkit_settings::ViewportSettings;
use std::fmt;
use tracing::debug;

/// Zoom limits and framing ratios.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportLimits {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Multiplier for one zoom-in / zoom-out step
    pub zoom_step: f64,
    /// Fraction of the viewport filled by fit-to-view
    pub fit_padding: f64,
    /// Fraction of the viewport filled by panel focus
    pub focus_fill: f64,
}

impl ViewportLimits {
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}

impl Default for ViewportLimits {
    fn default() -> Self {
        Self {
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
            fit_padding: FIT_PADDING,
            focus_fill: FOCUS_FILL,
        }
    }
}

impl From<&ViewportSettings> for ViewportLimits {
    fn from(settings: &ViewportSettings) -> Self {
        Self {
            min_zoom: settings.min_zoom,
            max_zoom: settings.max_zoom,
            zoom_step: settings.zoom_step,
            fit_padding: settings.fit_padding,
            focus_fill: settings.focus_fill,
        }
    }
}

/// Camera state published to observers.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportState {
    /// Always within `[min_zoom, max_zoom]`.
    pub zoom: f64,
    pub pan: Point,
    /// Viewport size in pixels.
    pub bounds: Size,
    pub focused_panel_id: Option<String>,
}

impl ViewportState {
    fn initial(bounds: Size) -> Self {
        Self {
            zoom: 1.0,
            pan: Point::origin(),
            bounds,
            focused_panel_id: None,
        }
    }
}

/// Represents the viewport transformation state (zoom and pan).
#[derive(Debug)]
pub struct Viewport {
    state: ViewportState,
    limits: ViewportLimits,
    observers: Observers<ViewportState>,
}

impl Viewport {
    /// Creates a viewport of the given pixel size at zoom 1, pan origin.
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_limits(width, height, ViewportLimits::default())
    }

    pub fn with_limits(width: f64, height: f64, limits: ViewportLimits) -> Self {
        Self {
            state: ViewportState::initial(Size::new(width, height)),
            limits,
            observers: Observers::new(),
        }
    }

    /// Creates a viewport from editor settings.
    pub fn from_settings(settings: &ViewportSettings) -> Self {
        Self::with_limits(settings.width, settings.height, settings.into())
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn limits(&self) -> &ViewportLimits {
        &self.limits
    }

    /// Gets the current zoom level (1.0 = 100%).
    pub fn zoom(&self) -> f64 {
        self.state.zoom
    }

    pub fn pan(&self) -> Point {
        self.state.pan
    }

    pub fn bounds(&self) -> Size {
        self.state.bounds
    }

    pub fn focused_panel_id(&self) -> Option<&str> {
        self.state.focused_panel_id.as_deref()
    }

    /// Sets the viewport dimensions (typically called when window resizes).
    pub fn set_bounds(&mut self, bounds: Size) {
        self.state.bounds = bounds;
        self.notify();
    }

    // ------------------------------------------------------------------
    // Coordinate mapping
    // ------------------------------------------------------------------

    /// Converts canvas coordinates to screen coordinates.
    ///
    /// Formula:
    /// ```text
    /// screen_x = canvas_x * zoom + pan_x
    /// screen_y = canvas_y * zoom + pan_y
    /// ```
    pub fn canvas_to_screen(&self, point: Point) -> Point {
        point * self.state.zoom + self.state.pan
    }

    /// Converts screen coordinates to canvas coordinates. Exact inverse of
    /// [`Viewport::canvas_to_screen`] for any positive zoom.
    ///
    /// Formula:
    /// ```text
    /// canvas_x = (screen_x - pan_x) / zoom
    /// canvas_y = (screen_y - pan_y) / zoom
    /// ```
    pub fn screen_to_canvas(&self, point: Point) -> Point {
        let zoom = self.state.zoom;
        Point::new(
            (point.x - self.state.pan.x) / zoom,
            (point.y - self.state.pan.y) / zoom,
        )
    }

    /// Canvas-space rectangle currently visible in the viewport.
    pub fn visible_canvas_bounds(&self) -> Bounds {
        let top_left = self.screen_to_canvas(Point::origin());
        let zoom = self.state.zoom;
        Bounds::new(
            top_left.x,
            top_left.y,
            self.state.bounds.width / zoom,
            self.state.bounds.height / zoom,
        )
    }

    // ------------------------------------------------------------------
    // Zoom
    // ------------------------------------------------------------------

    /// Sets the zoom level, clamped to the configured limits.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_nan() {
            return;
        }
        self.state.zoom = self.limits.clamp_zoom(zoom);
        self.notify();
    }

    /// Zooms in by one step.
    pub fn zoom_in(&mut self) {
        self.set_zoom(self.state.zoom * self.limits.zoom_step);
    }

    /// Zooms out by one step.
    pub fn zoom_out(&mut self) {
        self.set_zoom(self.state.zoom / self.limits.zoom_step);
    }

    /// Zooms to exactly 100%, leaving pan untouched.
    pub fn zoom_to_actual(&mut self) {
        self.state.zoom = 1.0;
        self.notify();
    }

    /// Zooms so that the canvas point under `screen_point` stays under it.
    ///
    /// ```text
    /// ratio = clamp(new_zoom) / zoom
    /// pan'  = screen_point - (screen_point - pan) * ratio
    /// ```
    pub fn zoom_to_point(&mut self, new_zoom: f64, screen_point: Point) {
        if new_zoom.is_nan() {
            return;
        }
        let clamped = self.limits.clamp_zoom(new_zoom);
        let ratio = clamped / self.state.zoom;
        self.state.pan = screen_point - (screen_point - self.state.pan) * ratio;
        self.state.zoom = clamped;
        self.notify();
    }

    /// Zooms in one step, anchored at a screen point (cursor zoom).
    pub fn zoom_in_at(&mut self, screen_point: Point) {
        self.zoom_to_point(self.state.zoom * self.limits.zoom_step, screen_point);
    }

    /// Zooms out one step, anchored at a screen point.
    pub fn zoom_out_at(&mut self, screen_point: Point) {
        self.zoom_to_point(self.state.zoom / self.limits.zoom_step, screen_point);
    }

    // ------------------------------------------------------------------
    // Pan
    // ------------------------------------------------------------------

    /// Sets the pan offset. Unbounded.
    pub fn set_pan(&mut self, pan: Point) {
        self.state.pan = pan;
        self.notify();
    }

    /// Pans by a delta amount. Unbounded and independent of zoom.
    pub fn pan_by(&mut self, delta: Point) {
        self.state.pan = self.state.pan + delta;
        self.notify();
    }

    /// Centers the viewport on a canvas coordinate at the current zoom.
    pub fn center_on(&mut self, canvas_point: Point) {
        let half = Point::new(self.state.bounds.width / 2.0, self.state.bounds.height / 2.0);
        self.state.pan = half - canvas_point * self.state.zoom;
        self.notify();
    }

    // ------------------------------------------------------------------
    // Framing
    // ------------------------------------------------------------------

    /// Fits `content` (canvas space) into the viewport at 90% fill, centered.
    /// Clears panel focus.
    ///
    /// Returns `false` and changes nothing when the content or viewport has
    /// no area.
    pub fn fit_to_view(&mut self, content: Bounds) -> bool {
        if !self.frame(content, self.limits.fit_padding) {
            return false;
        }
        self.state.focused_panel_id = None;
        debug!("fit to view: {}", self);
        self.notify();
        true
    }

    /// Frames a single panel at 95% fill and marks it focused. Passing
    /// `None` for either argument exits focus mode instead.
    pub fn focus_panel(&mut self, panel_id: Option<&str>, panel_bounds: Option<Bounds>) -> bool {
        let (Some(id), Some(bounds)) = (panel_id, panel_bounds) else {
            self.exit_focus_mode();
            return false;
        };
        if !self.frame(bounds, self.limits.focus_fill) {
            return false;
        }
        self.state.focused_panel_id = Some(id.to_string());
        debug!("focused panel {}: {}", id, self);
        self.notify();
        true
    }

    /// Leaves focus mode. Zoom and pan are kept.
    pub fn exit_focus_mode(&mut self) {
        if self.state.focused_panel_id.take().is_some() {
            self.notify();
        }
    }

    pub fn is_focused(&self, panel_id: &str) -> bool {
        self.state.focused_panel_id.as_deref() == Some(panel_id)
    }

    /// Resets zoom to 1, pan to the origin and clears focus. Bounds are kept.
    pub fn reset_viewport(&mut self) {
        self.state = ViewportState::initial(self.state.bounds);
        self.notify();
    }

    /// Computes zoom and pan so `content` fills `fill` of the viewport,
    /// centered. Does not notify.
    fn frame(&mut self, content: Bounds, fill: f64) -> bool {
        let viewport = self.state.bounds;
        if content.is_degenerate() || viewport.is_degenerate() {
            return false;
        }

        let zoom_x = viewport.width / content.width;
        let zoom_y = viewport.height / content.height;
        let zoom = self.limits.clamp_zoom(zoom_x.min(zoom_y) * fill);

        // Center the scaled content:
        // screen_center = content_center * zoom + pan
        let viewport_center = Point::new(viewport.width / 2.0, viewport.height / 2.0);
        self.state.zoom = zoom;
        self.state.pan = viewport_center - content.center() * zoom;
        true
    }

    // ------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&ViewportState) + 'static,
    {
        self.observers.subscribe(&self.state, listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn notify(&mut self) {
        self.observers.notify(&self.state);
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Zoom: {:.2}x | Pan: ({:.1}, {:.1})",
            self.state.zoom, self.state.pan.x, self.state.pan.y
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1920.0, 1080.0)
    }
}
