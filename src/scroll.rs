//! Scrolling.
//!
//! [`ScrollState`] is the offset bookkeeping, [`ScrollbarGeometry`] turns it into rectangles and
//! [`ScrollComponent`] hooks both into an element. Scrolling never moves children; the tree applies
//! the offset as a translation while rendering and hit-testing.

use crate::backend::Renderer;
use crate::color::Color;
use crate::component::{Component, ComponentContext};
use crate::context::RenderContext;
use crate::events::MouseEvent;
use crate::rect::Rect;
use cgmath::Vector2;
use tracing::trace;

/// Default scroll distance per wheel notch, in points.
pub const DEFAULT_SCROLL_SPEED: f64 = 20.;

/// Axes along which scrolling is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollDirection {
    Vertical,
    Horizontal,
    #[default]
    Both,
}

impl ScrollDirection {
    pub fn allows_x(self) -> bool {
        matches!(self, ScrollDirection::Horizontal | ScrollDirection::Both)
    }

    pub fn allows_y(self) -> bool {
        matches!(self, ScrollDirection::Vertical | ScrollDirection::Both)
    }
}

/// Scroll offsets for a viewport looking at larger content.
///
/// On every permitted axis the offset stays within `0..=max(0, content - viewport)`. On other axes
/// it is always zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollState {
    offset: Vector2<f64>,
    content: Vector2<f64>,
    viewport: Vector2<f64>,
    direction: ScrollDirection,
    speed: f64,
}

impl Default for ScrollState {
    fn default() -> Self {
        ScrollState::new(ScrollDirection::default())
    }
}

impl ScrollState {
    pub fn new(direction: ScrollDirection) -> ScrollState {
        ScrollState {
            offset: Vector2::new(0., 0.),
            content: Vector2::new(0., 0.),
            viewport: Vector2::new(0., 0.),
            direction,
            speed: DEFAULT_SCROLL_SPEED,
        }
    }

    pub fn direction(&self) -> ScrollDirection {
        self.direction
    }

    pub fn set_direction(&mut self, direction: ScrollDirection) {
        self.direction = direction;
        self.clamp();
    }

    pub fn content_size(&self) -> Vector2<f64> {
        self.content
    }

    pub fn set_content_size(&mut self, width: f64, height: f64) {
        self.content = Vector2::new(width, height);
        self.clamp();
    }

    pub fn viewport_size(&self) -> Vector2<f64> {
        self.viewport
    }

    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport = Vector2::new(width, height);
        self.clamp();
    }

    /// Points scrolled per wheel notch.
    pub fn scroll_speed(&self) -> f64 {
        self.speed
    }

    pub fn set_scroll_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    pub fn scroll_x(&self) -> f64 {
        self.offset.x
    }

    pub fn scroll_y(&self) -> f64 {
        self.offset.y
    }

    /// The current offset. Content is drawn translated by the negation of this.
    pub fn offset(&self) -> Vector2<f64> {
        self.offset
    }

    pub fn max_scroll_x(&self) -> f64 {
        if self.direction.allows_x() {
            (self.content.x - self.viewport.x).max(0.)
        } else {
            0.
        }
    }

    pub fn max_scroll_y(&self) -> f64 {
        if self.direction.allows_y() {
            (self.content.y - self.viewport.y).max(0.)
        } else {
            0.
        }
    }

    pub fn can_scroll_x(&self) -> bool {
        self.max_scroll_x() > 0.
    }

    pub fn can_scroll_y(&self) -> bool {
        self.max_scroll_y() > 0.
    }

    /// Sets the offset, clamped.
    pub fn set_scroll(&mut self, x: f64, y: f64) {
        self.offset = Vector2::new(x, y);
        self.clamp();
    }

    /// Moves the offset, clamped.
    pub fn scroll_by(&mut self, dx: f64, dy: f64) {
        let offset = self.offset;
        self.set_scroll(offset.x + dx, offset.y + dy);
    }

    pub fn scroll_to_start(&mut self) {
        self.set_scroll(0., 0.);
    }

    pub fn scroll_to_end(&mut self) {
        self.set_scroll(self.max_scroll_x(), self.max_scroll_y());
    }

    /// Offset divided by the maximum offset, or 0 if the axis can't scroll.
    pub fn scroll_x_normalized(&self) -> f64 {
        normalize(self.offset.x, self.max_scroll_x())
    }

    /// Offset divided by the maximum offset, or 0 if the axis can't scroll.
    pub fn scroll_y_normalized(&self) -> f64 {
        normalize(self.offset.y, self.max_scroll_y())
    }

    pub fn scroll_normalized(&self) -> Vector2<f64> {
        Vector2::new(self.scroll_x_normalized(), self.scroll_y_normalized())
    }

    /// Viewport divided by content, or 1 if everything fits.
    pub fn thumb_ratio_x(&self) -> f64 {
        thumb_ratio(self.viewport.x, self.content.x)
    }

    /// Viewport divided by content, or 1 if everything fits.
    pub fn thumb_ratio_y(&self) -> f64 {
        thumb_ratio(self.viewport.y, self.content.y)
    }

    /// Applies a wheel event. Returns true if the offset changed.
    pub fn handle_scroll(&mut self, event: &MouseEvent) -> bool {
        let before = self.offset;
        let delta = event.scroll_delta * self.speed;
        self.scroll_by(-delta.x, -delta.y);
        self.offset != before
    }

    fn clamp(&mut self) {
        self.offset.x = self.offset.x.max(0.).min(self.max_scroll_x());
        self.offset.y = self.offset.y.max(0.).min(self.max_scroll_y());
    }
}

fn normalize(offset: f64, max: f64) -> f64 {
    if max > 0. {
        offset / max
    } else {
        0.
    }
}

fn thumb_ratio(viewport: f64, content: f64) -> f64 {
    if content <= viewport || content <= 0. {
        1.
    } else {
        viewport / content
    }
}

/// Scrollbar appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollbarStyle {
    /// Thickness of the bar.
    pub width: f64,
    /// Thumbs never get shorter than this.
    pub min_thumb_length: f64,
    pub show_track: bool,
    pub track_color: Color,
    pub thumb_color: Color,
    pub thumb_hover_color: Color,
}

impl Default for ScrollbarStyle {
    fn default() -> Self {
        ScrollbarStyle {
            width: 8.,
            min_thumb_length: 20.,
            show_track: true,
            track_color: Color::rgba(0.2, 0.2, 0.2, 0.5),
            thumb_color: Color::rgba(0.6, 0.6, 0.6, 0.8),
            thumb_hover_color: Color::rgba(0.8, 0.8, 0.8, 0.9),
        }
    }
}

impl ScrollbarStyle {
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn with_min_thumb_length(mut self, length: f64) -> Self {
        self.min_thumb_length = length;
        self
    }

    pub fn with_track(mut self, show_track: bool) -> Self {
        self.show_track = show_track;
        self
    }

    pub fn with_colors(mut self, track: Color, thumb: Color) -> Self {
        self.track_color = track;
        self.thumb_color = thumb;
        self
    }
}

/// Scrollbar rectangles for a viewport in window space.
///
/// The vertical bar hugs the right edge, the horizontal bar the bottom edge.
pub struct ScrollbarGeometry;

impl ScrollbarGeometry {
    pub fn vertical_track(viewport: Rect, style: &ScrollbarStyle) -> Rect {
        Rect::xywh(
            viewport.max_x() - style.width,
            viewport.y(),
            style.width,
            viewport.height(),
        )
    }

    pub fn horizontal_track(viewport: Rect, style: &ScrollbarStyle) -> Rect {
        Rect::xywh(
            viewport.x(),
            viewport.max_y() - style.width,
            viewport.width(),
            style.width,
        )
    }

    /// Returns an empty rectangle if the state can't scroll vertically.
    pub fn vertical_thumb(state: &ScrollState, viewport: Rect, style: &ScrollbarStyle) -> Rect {
        if !state.can_scroll_y() {
            return Rect::zero();
        }
        let extent = viewport.height();
        let length = thumb_length(extent, state.thumb_ratio_y(), style);
        let y = viewport.y() + (extent - length) * state.scroll_y_normalized();
        Rect::xywh(viewport.max_x() - style.width, y, style.width, length)
    }

    /// Returns an empty rectangle if the state can't scroll horizontally.
    pub fn horizontal_thumb(state: &ScrollState, viewport: Rect, style: &ScrollbarStyle) -> Rect {
        if !state.can_scroll_x() {
            return Rect::zero();
        }
        let extent = viewport.width();
        let length = thumb_length(extent, state.thumb_ratio_x(), style);
        let x = viewport.x() + (extent - length) * state.scroll_x_normalized();
        Rect::xywh(x, viewport.max_y() - style.width, length, style.width)
    }
}

fn thumb_length(extent: f64, ratio: f64, style: &ScrollbarStyle) -> f64 {
    (extent * ratio).max(style.min_thumb_length).min(extent)
}

/// Makes the owner a scroll container.
///
/// The viewport is the owner's size. The content size is taken from the children (through the
/// owner's layout, if it has one) unless set explicitly.
#[derive(Debug)]
pub struct ScrollComponent {
    state: ScrollState,
    style: ScrollbarStyle,
    content_size: Option<Vector2<f64>>,
    show_scrollbars: bool,
    dirty: bool,
}

impl Default for ScrollComponent {
    fn default() -> Self {
        ScrollComponent::new(ScrollDirection::default())
    }
}

impl ScrollComponent {
    pub fn new(direction: ScrollDirection) -> ScrollComponent {
        ScrollComponent {
            state: ScrollState::new(direction),
            style: ScrollbarStyle::default(),
            content_size: None,
            show_scrollbars: true,
            dirty: true,
        }
    }

    pub fn vertical() -> ScrollComponent {
        ScrollComponent::new(ScrollDirection::Vertical)
    }

    pub fn horizontal() -> ScrollComponent {
        ScrollComponent::new(ScrollDirection::Horizontal)
    }

    pub fn with_style(mut self, style: ScrollbarStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_content_size(mut self, width: f64, height: f64) -> Self {
        self.set_content_size(width, height);
        self
    }

    pub fn with_scrollbars(mut self, show: bool) -> Self {
        self.show_scrollbars = show;
        self
    }

    pub fn state(&self) -> &ScrollState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ScrollState {
        &mut self.state
    }

    pub fn style(&self) -> &ScrollbarStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: ScrollbarStyle) {
        self.style = style;
    }

    pub fn offset(&self) -> Vector2<f64> {
        self.state.offset()
    }

    /// Fixes the content size instead of deriving it from the children.
    pub fn set_content_size(&mut self, width: f64, height: f64) {
        self.content_size = Some(Vector2::new(width, height));
        self.state.set_content_size(width, height);
        self.dirty = true;
    }

    /// Goes back to deriving the content size from the children.
    pub fn clear_content_size(&mut self) {
        self.content_size = None;
        self.dirty = true;
    }

    pub fn set_scroll(&mut self, x: f64, y: f64) {
        self.state.set_scroll(x, y);
    }

    pub fn scroll_by(&mut self, dx: f64, dy: f64) {
        self.state.scroll_by(dx, dy);
    }
}

impl Component for ScrollComponent {
    fn on_attach(&mut self, _cx: &mut ComponentContext) {
        self.dirty = true;
    }

    fn resolve(&mut self, cx: &mut ComponentContext) {
        if !self.dirty {
            return;
        }
        let viewport = cx.size();
        let content = match self.content_size {
            Some(size) => size,
            None => cx.content_size_from_children(),
        };
        self.state.set_viewport_size(viewport.x, viewport.y);
        self.state.set_content_size(content.x, content.y);
        self.dirty = false;
    }

    fn on_mouse_event(&mut self, cx: &mut ComponentContext, event: &MouseEvent) -> bool {
        if !event.is_scroll() {
            return false;
        }
        let consumed = self.state.handle_scroll(event);
        if consumed {
            trace!(owner = ?cx.owner(), offset = ?self.state.offset(), "scrolled");
        }
        consumed
    }

    fn on_render_overlay(&self, cx: &RenderContext, renderer: &mut dyn Renderer) {
        if !self.show_scrollbars {
            return;
        }
        let frame = cx.frame();
        let thumb_color = if cx.is_hovered() {
            self.style.thumb_hover_color
        } else {
            self.style.thumb_color
        };

        if self.state.can_scroll_y() {
            if self.style.show_track {
                let track = ScrollbarGeometry::vertical_track(frame, &self.style);
                renderer.submit_quad(track, self.style.track_color);
            }
            let thumb = ScrollbarGeometry::vertical_thumb(&self.state, frame, &self.style);
            renderer.submit_quad(thumb, thumb_color);
        }

        if self.state.can_scroll_x() {
            if self.style.show_track {
                let track = ScrollbarGeometry::horizontal_track(frame, &self.style);
                renderer.submit_quad(track, self.style.track_color);
            }
            let thumb = ScrollbarGeometry::horizontal_thumb(&self.state, frame, &self.style);
            renderer.submit_quad(thumb, thumb_color);
        }
    }

    fn invalidate(&mut self) {
        self.dirty = true;
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ScrollState {
        let mut state = ScrollState::default();
        state.set_content_size(500., 1000.);
        state.set_viewport_size(200., 300.);
        state
    }

    #[test]
    fn initial_offset_is_zero() {
        let state = ScrollState::default();
        assert_eq!(state.offset(), Vector2::new(0., 0.));
        assert_eq!(state.direction(), ScrollDirection::Both);
        assert_eq!(state.scroll_speed(), DEFAULT_SCROLL_SPEED);
    }

    #[test]
    fn max_scroll() {
        let state = state();
        assert_eq!(state.max_scroll_x(), 300.);
        assert_eq!(state.max_scroll_y(), 700.);
        assert!(state.can_scroll_x());
        assert!(state.can_scroll_y());

        let mut fits = ScrollState::default();
        fits.set_content_size(100., 200.);
        fits.set_viewport_size(200., 300.);
        assert!(!fits.can_scroll_x());
        assert!(!fits.can_scroll_y());
        assert_eq!(fits.thumb_ratio_x(), 1.);
        assert_eq!(fits.thumb_ratio_y(), 1.);
    }

    #[test]
    fn clamping() {
        let mut state = state();
        state.scroll_by(50., 100.);
        assert_eq!(state.offset(), Vector2::new(50., 100.));

        state.set_scroll(-100., -100.);
        assert_eq!(state.offset(), Vector2::new(0., 0.));

        state.set_scroll(1000., 2000.);
        assert_eq!(state.offset(), Vector2::new(300., 700.));

        state.scroll_to_start();
        assert_eq!(state.offset(), Vector2::new(0., 0.));
        state.scroll_to_end();
        assert_eq!(state.offset(), Vector2::new(300., 700.));
    }

    #[test]
    fn scroll_by_clamps_to_max() {
        let mut state = ScrollState::new(ScrollDirection::Vertical);
        state.set_content_size(100., 1000.);
        state.set_viewport_size(100., 400.);
        assert_eq!(state.max_scroll_y(), 600.);
        state.scroll_by(0., 10000.);
        assert_eq!(state.scroll_y(), 600.);
        assert_eq!(state.scroll_y_normalized(), 1.);
    }

    #[test]
    fn normalized_offsets() {
        let mut state = state();
        assert_eq!(state.scroll_normalized(), Vector2::new(0., 0.));
        state.set_scroll(150., 350.);
        assert_eq!(state.scroll_normalized(), Vector2::new(0.5, 0.5));
        state.scroll_to_end();
        assert_eq!(state.scroll_normalized(), Vector2::new(1., 1.));

        // no division by zero when nothing can scroll
        let empty = ScrollState::default();
        assert_eq!(empty.scroll_normalized(), Vector2::new(0., 0.));
    }

    #[test]
    fn thumb_ratios() {
        let state = state();
        assert_eq!(state.thumb_ratio_x(), 0.4);
        assert_eq!(state.thumb_ratio_y(), 0.3);
    }

    #[test]
    fn direction_limits_axes() {
        let mut state = state();
        state.set_scroll(100., 100.);
        state.set_direction(ScrollDirection::Vertical);
        assert_eq!(state.offset(), Vector2::new(0., 100.));
        assert!(!state.can_scroll_x());

        state.set_scroll(100., 100.);
        assert_eq!(state.scroll_x(), 0.);
    }

    #[test]
    fn wheel_events() {
        let mut state = state();
        state.set_direction(ScrollDirection::Vertical);
        assert!(state.handle_scroll(&MouseEvent::wheel(0., 0., 0., -2.)));
        assert_eq!(state.scroll_y(), 40.);

        let mut state = self::state();
        state.set_direction(ScrollDirection::Horizontal);
        assert!(state.handle_scroll(&MouseEvent::wheel(0., 0., -2., 0.)));
        assert!(state.scroll_x() > 0.);

        let mut state = self::state();
        state.set_direction(ScrollDirection::Vertical);
        state.set_scroll_speed(100.);
        state.handle_scroll(&MouseEvent::wheel(0., 0., 0., -1.));
        assert_eq!(state.scroll_y(), 100.);

        // already at the top, scrolling up does nothing
        let mut state = self::state();
        assert!(!state.handle_scroll(&MouseEvent::wheel(0., 0., 0., 1.)));

        let mut fits = ScrollState::new(ScrollDirection::Vertical);
        fits.set_content_size(100., 100.);
        fits.set_viewport_size(200., 200.);
        assert!(!fits.handle_scroll(&MouseEvent::wheel(0., 0., 0., -2.)));
    }

    #[test]
    fn style_defaults() {
        let style = ScrollbarStyle::default();
        assert_eq!(style.width, 8.);
        assert_eq!(style.min_thumb_length, 20.);
        assert!(style.show_track);
    }

    fn geometry_state() -> ScrollState {
        let mut state = ScrollState::default();
        state.set_content_size(200., 1000.);
        state.set_viewport_size(200., 300.);
        state
    }

    #[test]
    fn vertical_thumb() {
        let viewport = Rect::xywh(50., 50., 200., 300.);
        let style = ScrollbarStyle::default();
        let mut state = geometry_state();

        let thumb = ScrollbarGeometry::vertical_thumb(&state, viewport, &style);
        assert_eq!(thumb, Rect::xywh(242., 50., 8., 90.));

        state.scroll_to_end();
        let thumb = ScrollbarGeometry::vertical_thumb(&state, viewport, &style);
        assert_eq!(thumb.y(), 260.);

        let track = ScrollbarGeometry::vertical_track(viewport, &style);
        assert_eq!(track, Rect::xywh(242., 50., 8., 300.));
    }

    #[test]
    fn horizontal_thumb_sits_at_bottom() {
        let viewport = Rect::xywh(50., 50., 200., 300.);
        let style = ScrollbarStyle::default();
        let mut state = ScrollState::default();
        state.set_content_size(500., 200.);
        state.set_viewport_size(200., 200.);

        let thumb = ScrollbarGeometry::horizontal_thumb(&state, viewport, &style);
        assert_eq!(thumb.y(), 342.);
        assert!(thumb.width() > 0.);
    }

    #[test]
    fn thumb_limits() {
        let viewport = Rect::xywh(50., 50., 200., 300.);
        let style = ScrollbarStyle::default();

        let mut huge = ScrollState::default();
        huge.set_content_size(200., 10000.);
        huge.set_viewport_size(200., 300.);
        let thumb = ScrollbarGeometry::vertical_thumb(&huge, viewport, &style);
        assert!(thumb.height() >= style.min_thumb_length);

        let mut fits = ScrollState::default();
        fits.set_content_size(100., 200.);
        fits.set_viewport_size(200., 300.);
        let thumb = ScrollbarGeometry::vertical_thumb(&fits, viewport, &style);
        assert_eq!(thumb.size, Vector2::new(0., 0.));
    }
}
