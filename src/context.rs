//! Handles given to widgets and components while the tree calls into them.

use crate::component::ComponentType;
use crate::constraint::ConstraintComponent;
use crate::deferred::CommandSender;
use crate::element::ElementId;
use crate::error::TreeError;
use crate::events::MouseEvent;
use crate::rect::{Insets, Rect};
use crate::tree::ElementTree;
use cgmath::{Point2, Vector2};

/// Event context for one element.
///
/// Gives a widget access to its own element state and lets it pass events on to its children.
pub struct EventContext<'a> {
    tree: &'a mut ElementTree,
    id: ElementId,
}

impl<'a> EventContext<'a> {
    pub(crate) fn new(tree: &'a mut ElementTree, id: ElementId) -> EventContext<'a> {
        EventContext { tree, id }
    }

    /// The element being handled.
    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn tree(&self) -> &ElementTree {
        &*self.tree
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.tree.parent(self.id)
    }

    pub fn children(&self) -> &[ElementId] {
        self.tree.children(self.id)
    }

    /// Bounds relative to the parent.
    pub fn bounds(&self) -> Rect {
        self.tree.bounds(self.id).unwrap_or_else(Rect::zero)
    }

    pub fn absolute_bounds(&self) -> Rect {
        self.tree.absolute_bounds(self.id).unwrap_or_else(Rect::zero)
    }

    /// Tests a point (in the same space as event locations) against the element.
    pub fn contains(&self, point: Point2<f64>) -> bool {
        self.tree.contains(self.id, point)
    }

    pub fn is_visible(&self) -> bool {
        self.tree.is_visible(self.id)
    }

    pub fn is_hovered(&self) -> bool {
        self.tree.is_hovered(self.id)
    }

    pub fn is_focused(&self) -> bool {
        self.tree.is_focused(self.id)
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        if let Some(node) = self.tree.node_mut(self.id) {
            node.hovered = hovered;
        }
    }

    pub fn set_position(&mut self, x: f64, y: f64) -> Result<(), TreeError> {
        self.tree.set_position(self.id, x, y)
    }

    pub fn set_size(&mut self, width: f64, height: f64) -> Result<(), TreeError> {
        self.tree.set_size(self.id, width, height)
    }

    pub fn component<C: ComponentType>(&self) -> Option<&C> {
        self.tree.component(self.id)
    }

    pub fn component_mut<C: ComponentType>(&mut self) -> Option<&mut C> {
        self.tree.component_mut(self.id)
    }

    /// Queue for structural changes, applied after the current dispatch.
    pub fn commands(&self) -> CommandSender {
        self.tree.commands()
    }

    /// Asks for keyboard focus once the current dispatch is over.
    pub fn request_focus(&self) {
        self.tree.commands().set_focus(Some(self.id));
    }

    /// Offers the event to the children, topmost first. Returns true if one consumed it.
    ///
    /// Scroll containers only pass on events inside their bounds, translated into content space.
    /// Children that don't get to see the event lose their hover flag.
    pub fn dispatch_to_children(&mut self, event: &MouseEvent) -> bool {
        let event = match self.tree.scroll_offset(self.id) {
            Some(offset) => {
                if !self.contains(event.location) {
                    for child in self.children().to_vec() {
                        self.tree.clear_hover(child);
                    }
                    return false;
                }
                event.translated(offset)
            }
            None => *event,
        };

        let mut consumed = false;
        for child in self.children().to_vec().into_iter().rev() {
            if consumed {
                // covered by the consumer
                self.tree.clear_hover(child);
            } else {
                consumed = self.tree.dispatch_mouse_event(child, &event);
            }
        }
        consumed
    }

    /// Offers the event to the element's components. Returns true if one consumed it.
    pub fn dispatch_to_components(&mut self, event: &MouseEvent) -> bool {
        self.tree.dispatch_to_components(self.id, event)
    }
}

/// Context for a component, pointing at its owner.
pub struct ComponentContext<'a> {
    tree: &'a mut ElementTree,
    owner: ElementId,
}

impl<'a> ComponentContext<'a> {
    pub(crate) fn new(tree: &'a mut ElementTree, owner: ElementId) -> ComponentContext<'a> {
        ComponentContext { tree, owner }
    }

    pub fn owner(&self) -> ElementId {
        self.owner
    }

    pub fn tree(&self) -> &ElementTree {
        &*self.tree
    }

    /// Owner bounds relative to its parent.
    pub fn bounds(&self) -> Rect {
        self.tree.bounds(self.owner).unwrap_or_else(Rect::zero)
    }

    pub fn size(&self) -> Vector2<f64> {
        self.bounds().size
    }

    pub fn padding(&self) -> Insets {
        self.tree.padding(self.owner).unwrap_or_default()
    }

    /// Size of the owner's parent, or the viewport if the owner is the root.
    pub fn parent_size(&self) -> Option<Vector2<f64>> {
        match self.tree.parent(self.owner) {
            Some(parent) => self.tree.bounds(parent).map(|bounds| bounds.size),
            None => self.tree.viewport(),
        }
    }

    /// Natural content size of the owner.
    pub fn measure(&self) -> Vector2<f64> {
        self.tree
            .measure(self.owner)
            .unwrap_or_else(|| self.size())
    }

    /// The owner's visible children, in order.
    pub fn visible_children(&self) -> Vec<ElementId> {
        self.tree.visible_children(self.owner)
    }

    /// The visible children the owner's layout positions. Anchored children place themselves.
    pub fn layout_children(&self) -> Vec<ElementId> {
        self.tree.layout_children(self.owner)
    }

    pub fn child_size(&self, child: ElementId) -> Vector2<f64> {
        self.tree
            .bounds(child)
            .map(|bounds| bounds.size)
            .unwrap_or_else(|| Vector2::new(0., 0.))
    }

    /// Moves and resizes a child of the owner. Children sized by their own constraints are only
    /// moved.
    ///
    /// Unlike `ElementTree::set_bounds`, this doesn't mark the owner dirty again.
    pub fn place_child(&mut self, child: ElementId, mut frame: Rect) {
        if self.tree.parent(child) != Some(self.owner) {
            return;
        }
        let sized = self
            .tree
            .component::<ConstraintComponent>(child)
            .map_or(false, |constraint| constraint.size().is_some());
        if sized {
            frame.size = self.child_size(child);
        }
        self.tree.apply_frame(child, frame);
    }

    /// Moves and resizes the owner. The parent is marked dirty where the change affects it.
    pub fn apply_frame(&mut self, frame: Rect) {
        self.tree.apply_constrained_frame(self.owner, frame);
    }

    /// See `ElementTree::calculate_content_size_from_children`.
    pub fn content_size_from_children(&self) -> Vector2<f64> {
        self.tree
            .calculate_content_size_from_children(self.owner)
            .unwrap_or_else(|| Vector2::new(0., 0.))
    }
}

/// Render context for one element.
pub struct RenderContext<'a> {
    tree: &'a ElementTree,
    id: ElementId,
    frame: Rect,
}

impl<'a> RenderContext<'a> {
    pub(crate) fn new(tree: &'a ElementTree, id: ElementId, frame: Rect) -> RenderContext<'a> {
        RenderContext { tree, id, frame }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn tree(&self) -> &ElementTree {
        self.tree
    }

    /// The element rectangle in window space, scroll offsets applied.
    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn is_hovered(&self) -> bool {
        self.tree.is_hovered(self.id)
    }

    pub fn is_focused(&self) -> bool {
        self.tree.is_focused(self.id)
    }
}
