//! Widgets: the per-element behavior that isn't a component.

use crate::backend::Renderer;
use crate::context::{EventContext, RenderContext};
use crate::events::{KeyboardEvent, MouseEvent};
use cgmath::Vector2;
use core::any::Any;
use core::fmt;
use tracing::trace;

/// For downcasting trait objects.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A widget: what an element draws and how it reacts to input.
///
/// Every hook returns whether it consumed the event and does nothing by default. Elements without
/// a widget behave as if they had `()`.
///
/// # Reentrancy
/// While a hook runs, the widget is not reachable through the tree (so `ElementTree::widget` on
/// the element returns `None`). Structural changes have to go through
/// [`EventContext::commands`] and are applied once the current dispatch finishes.
pub trait Widget: AsAny + fmt::Debug {
    /// A button went down this frame over the element.
    fn on_click(&mut self, cx: &mut EventContext, event: &MouseEvent) -> bool {
        let _ = (cx, event);
        false
    }

    /// The cursor is over the element.
    fn on_hover(&mut self, cx: &mut EventContext, event: &MouseEvent) -> bool {
        let _ = (cx, event);
        false
    }

    /// A button is held over the element.
    fn on_drag(&mut self, cx: &mut EventContext, event: &MouseEvent) -> bool {
        let _ = (cx, event);
        false
    }

    /// The wheel moved over the element.
    fn on_scroll(&mut self, cx: &mut EventContext, event: &MouseEvent) -> bool {
        let _ = (cx, event);
        false
    }

    /// The element, or one of its descendants, has focus and a key event arrived.
    fn on_key_press(&mut self, cx: &mut EventContext, event: &KeyboardEvent) -> bool {
        let _ = (cx, event);
        false
    }

    fn on_focus(&mut self, cx: &mut EventContext) -> bool {
        let _ = cx;
        false
    }

    fn on_blur(&mut self, cx: &mut EventContext) -> bool {
        let _ = cx;
        false
    }

    /// Handles a mouse event for the element and its subtree.
    ///
    /// The default is [`bubble_down`]. Override this to capture input exclusively, e.g. in a modal
    /// that calls `bubble_down` first and then returns true while visible.
    fn process_mouse_event(&mut self, cx: &mut EventContext, event: &MouseEvent) -> bool {
        bubble_down(self, cx, event)
    }

    /// Draws the element. `cx.frame()` is the element rectangle in window space.
    fn render(&self, cx: &RenderContext, renderer: &mut dyn Renderer) {
        let _ = (cx, renderer);
    }

    /// Natural content size, if the widget knows it (e.g. measured text).
    fn measure(&self) -> Option<Vector2<f64>> {
        None
    }
}

/// A widget that does nothing.
impl Widget for () {}

/// The default mouse event propagation.
///
/// 1. invisible elements don't participate;
/// 2. the hover flag follows the cursor;
/// 3. children are offered the event topmost first, and the first one to consume it wins;
/// 4. otherwise, if the cursor is inside, components get a chance, then the widget's own hooks in
///    the order click, scroll, drag, hover. Each hook only runs if the event is of its sort.
pub fn bubble_down<W: Widget + ?Sized>(
    widget: &mut W,
    cx: &mut EventContext,
    event: &MouseEvent,
) -> bool {
    if !cx.is_visible() {
        return false;
    }

    let inside = cx.contains(event.location);
    cx.set_hovered(inside);

    if cx.dispatch_to_children(event) {
        return true;
    }

    if !inside {
        return false;
    }

    if cx.dispatch_to_components(event) {
        return true;
    }

    let consumed = (event.any_pressed() && widget.on_click(cx, event))
        || (event.is_scroll() && widget.on_scroll(cx, event))
        || (event.any_down() && widget.on_drag(cx, event))
        || widget.on_hover(cx, event);

    if consumed {
        trace!(element = ?cx.id(), "mouse event consumed");
    }
    consumed
}
