use crate::backend::Renderer;
use crate::component::{AnyComponent, ComponentKind, ComponentType, Components};
use crate::constraint::ConstraintComponent;
use crate::context::{ComponentContext, EventContext, RenderContext};
use crate::deferred::{CommandSender, TreeCommand};
use crate::element::{Element, ElementId};
use crate::error::TreeError;
use crate::events::{KeyboardEvent, MouseEvent};
use crate::layout::{LayoutComponent, LayoutFrame};
use crate::rect::{Insets, Rect};
use crate::scroll::ScrollComponent;
use crate::widget::Widget;
use cgmath::{EuclideanSpace, Point2, Vector2};
use crossbeam::channel::{self, Receiver, TryRecvError};
use std::collections::HashMap;
use tracing::{debug, trace, warn};

/// Upper bound on resolve passes per `resolve_layout`. Elements that measure their content can
/// need a second pass once their children have resolved their own constraints.
const MAX_RESOLVE_PASSES: usize = 8;

/// An element in the tree.
#[derive(Debug)]
pub(crate) struct ElementNode {
    pub(crate) bounds: Rect,
    pub(crate) padding: Insets,
    pub(crate) visible: bool,
    pub(crate) focused: bool,
    pub(crate) hovered: bool,
    pub(crate) widget: Option<Box<dyn Widget>>,
    pub(crate) components: Components,
    pub(crate) parent: Option<ElementId>,
    /// In z-order; the last child is on top.
    pub(crate) children: Vec<ElementId>,
}

/// A tree of elements.
///
/// Every element except the root is owned by its parent; removing an element destroys its
/// subtree along with all attached components.
#[derive(Debug)]
pub struct ElementTree {
    nodes: HashMap<ElementId, ElementNode>,
    root: ElementId,
    focused: Option<ElementId>,
    viewport: Option<Vector2<f64>>,
    commands: CommandSender,
    command_recv: Receiver<TreeCommand>,
}

impl ElementTree {
    /// Creates a tree with the given root element.
    pub fn new(root: Element) -> ElementTree {
        let (sender, command_recv) = channel::unbounded();
        let root_id = root.id();

        let mut tree = ElementTree {
            nodes: HashMap::new(),
            root: root_id,
            focused: None,
            viewport: None,
            commands: CommandSender::new(sender),
            command_recv,
        };
        tree.insert(None, root);
        tree
    }

    /// Moves a detached element (and everything it carries) into the node store.
    fn insert(&mut self, parent: Option<ElementId>, element: Element) -> ElementId {
        let Element {
            id,
            bounds,
            padding,
            visible,
            widget,
            components,
            children,
        } = element;

        self.nodes.insert(
            id,
            ElementNode {
                bounds,
                padding,
                visible,
                focused: false,
                hovered: false,
                widget,
                components: Components::default(),
                parent,
                children: Vec::new(),
            },
        );

        for component in components {
            self.attach(id, component);
        }

        for child in children {
            let child_id = self.insert(Some(id), child);
            if let Some(node) = self.nodes.get_mut(&id) {
                node.children.push(child_id);
            }
        }

        id
    }

    /// Destroys an element and its subtree. Returns how many elements were destroyed.
    fn destroy(&mut self, id: ElementId) -> usize {
        let mut node = match self.nodes.remove(&id) {
            Some(node) => node,
            None => return 0,
        };

        for mut component in node.components.drain() {
            component.as_component_mut().on_detach();
        }
        if self.focused == Some(id) {
            self.focused = None;
        }

        let mut count = 1;
        for child in node.children {
            count += self.destroy(child);
        }
        count
    }

    pub(crate) fn node_mut(&mut self, id: ElementId) -> Option<&mut ElementNode> {
        self.nodes.get_mut(&id)
    }

    fn try_node(&self, id: ElementId) -> Result<&ElementNode, TreeError> {
        self.nodes.get(&id).ok_or(TreeError::NoSuchElement(id))
    }

    fn try_node_mut(&mut self, id: ElementId) -> Result<&mut ElementNode, TreeError> {
        self.nodes.get_mut(&id).ok_or(TreeError::NoSuchElement(id))
    }

    /// The root element.
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Number of elements in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Never true; there is always a root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn has_element(&self, id: ElementId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.nodes.get(&id).and_then(|node| node.parent)
    }

    /// Children in z-order (last is topmost). Empty if the element doesn't exist.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.nodes
            .get(&id)
            .map(|node| &node.children[..])
            .unwrap_or(&[])
    }

    pub(crate) fn visible_children(&self, id: ElementId) -> Vec<ElementId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|child| self.is_visible(*child))
            .collect()
    }

    /// Visible children that aren't anchored by their own constraints.
    pub(crate) fn layout_children(&self, id: ElementId) -> Vec<ElementId> {
        self.visible_children(id)
            .into_iter()
            .filter(|child| {
                !self
                    .component::<ConstraintComponent>(*child)
                    .map_or(false, ConstraintComponent::anchors_position)
            })
            .collect()
    }

    /// Clears the hover flag on an element and its subtree.
    pub(crate) fn clear_hover(&mut self, id: ElementId) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.hovered = false;
                stack.extend(node.children.iter().copied());
            }
        }
    }

    /// Bounds relative to the parent.
    pub fn bounds(&self, id: ElementId) -> Option<Rect> {
        self.nodes.get(&id).map(|node| node.bounds)
    }

    /// Bounds in root space: the element bounds translated by every ancestor's origin.
    pub fn absolute_bounds(&self, id: ElementId) -> Option<Rect> {
        let node = self.nodes.get(&id)?;
        let mut bounds = node.bounds;
        let mut parent = node.parent;
        while let Some(id) = parent {
            let node = self.nodes.get(&id)?;
            bounds = bounds + node.bounds.origin.to_vec();
            parent = node.parent;
        }
        Some(bounds)
    }

    /// Tests a point against the element's absolute bounds.
    pub fn contains(&self, id: ElementId, point: Point2<f64>) -> bool {
        self.absolute_bounds(id)
            .map_or(false, |bounds| bounds.contains(point))
    }

    pub fn padding(&self, id: ElementId) -> Option<Insets> {
        self.nodes.get(&id).map(|node| node.padding)
    }

    pub fn is_visible(&self, id: ElementId) -> bool {
        self.nodes.get(&id).map_or(false, |node| node.visible)
    }

    pub fn is_focused(&self, id: ElementId) -> bool {
        self.nodes.get(&id).map_or(false, |node| node.focused)
    }

    pub fn is_hovered(&self, id: ElementId) -> bool {
        self.nodes.get(&id).map_or(false, |node| node.hovered)
    }

    /// The element with keyboard focus.
    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    /// Size the root element resolves its constraints against.
    pub fn viewport(&self) -> Option<Vector2<f64>> {
        self.viewport
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Some(Vector2::new(width, height));
        let root = self.root;
        self.invalidate_kinds(root, &[ComponentKind::Constraint]);
    }

    /// Natural content size of an element.
    ///
    /// This is the widget's own measurement if it has one. Otherwise it's the extent of the visible
    /// children (as the element's layout would arrange them, if it has one) plus padding. Elements
    /// without either report their current size.
    pub fn measure(&self, id: ElementId) -> Option<Vector2<f64>> {
        let node = self.nodes.get(&id)?;
        if let Some(size) = node.widget.as_deref().and_then(|widget| widget.measure()) {
            return Some(size);
        }
        if self.visible_children(id).is_empty() {
            return Some(node.bounds.size);
        }
        self.calculate_content_size_from_children(id)
    }

    /// Extent of the visible children, padding included.
    ///
    /// With a layout component this asks the layout strategy about the children it positions, so
    /// the result matches what the layout would produce. Otherwise it's the bounding box of the
    /// children as currently placed.
    pub fn calculate_content_size_from_children(&self, id: ElementId) -> Option<Vector2<f64>> {
        let node = self.nodes.get(&id)?;

        if let Some(layout) = node.components.get::<LayoutComponent>() {
            let frame = LayoutFrame::new(node.bounds.size, node.padding);
            let sizes: Vec<_> = self
                .layout_children(id)
                .iter()
                .filter_map(|child| self.bounds(*child))
                .map(|bounds| bounds.size)
                .collect();
            return Some(layout.strategy().content_size(&frame, &sizes));
        }

        let mut extent = Vector2::new(node.padding.horizontal(), node.padding.vertical());
        let children = self.visible_children(id);
        for bounds in children.iter().filter_map(|child| self.bounds(*child)) {
            extent.x = extent.x.max(bounds.max_x() + node.padding.right);
            extent.y = extent.y.max(bounds.max_y() + node.padding.bottom);
        }
        Some(extent)
    }

    /// Returns the widget if it is of type `W`.
    pub fn widget<W: Widget>(&self, id: ElementId) -> Option<&W> {
        let widget = self.nodes.get(&id)?.widget.as_deref()?;
        widget.as_any().downcast_ref()
    }

    /// Returns the widget if it is of type `W`.
    pub fn widget_mut<W: Widget>(&mut self, id: ElementId) -> Option<&mut W> {
        let widget = self.nodes.get_mut(&id)?.widget.as_deref_mut()?;
        widget.as_any_mut().downcast_mut()
    }

    /// Adds a child on top of the parent's existing children.
    ///
    /// Returns the child's ID, which stays valid until the child is removed.
    pub fn add_child(&mut self, parent: ElementId, element: Element) -> Result<ElementId, TreeError> {
        self.try_node(parent)?;
        let id = self.insert(Some(parent), element);
        self.try_node_mut(parent)?.children.push(id);
        self.children_changed(parent);
        debug!(?parent, child = ?id, "added child");
        Ok(id)
    }

    /// Removes a child and destroys its subtree.
    ///
    /// Must not be called while the subtree is being traversed; use [`CommandSender`] from inside
    /// handlers.
    pub fn remove_child(&mut self, parent: ElementId, child: ElementId) -> Result<(), TreeError> {
        let node = self.try_node_mut(parent)?;
        let position = node
            .children
            .iter()
            .position(|id| *id == child)
            .ok_or(TreeError::NotAChild { parent, child })?;
        node.children.remove(position);

        let destroyed = self.destroy(child);
        self.children_changed(parent);
        debug!(?parent, ?child, destroyed, "removed child");
        Ok(())
    }

    /// Removes and destroys all children.
    pub fn clear_children(&mut self, id: ElementId) -> Result<(), TreeError> {
        let children = std::mem::take(&mut self.try_node_mut(id)?.children);
        let destroyed: usize = children.into_iter().map(|child| self.destroy(child)).sum();
        self.children_changed(id);
        debug!(element = ?id, destroyed, "cleared children");
        Ok(())
    }

    pub fn set_position(&mut self, id: ElementId, x: f64, y: f64) -> Result<(), TreeError> {
        let node = self.try_node_mut(id)?;
        node.bounds.origin = Point2::new(x, y);
        let parent = node.parent;
        if let Some(parent) = parent {
            self.invalidate_kinds(parent, &[ComponentKind::Scroll]);
        }
        Ok(())
    }

    /// Resizes an element. Its own layout, its children's constraints and its parent's layout all
    /// become dirty.
    pub fn set_size(&mut self, id: ElementId, width: f64, height: f64) -> Result<(), TreeError> {
        let node = self.try_node_mut(id)?;
        node.bounds.size = Vector2::new(width, height);
        let parent = node.parent;
        self.size_changed(id);
        if let Some(parent) = parent {
            self.children_changed(parent);
        }
        Ok(())
    }

    pub fn set_bounds(&mut self, id: ElementId, bounds: Rect) -> Result<(), TreeError> {
        self.set_position(id, bounds.x(), bounds.y())?;
        self.set_size(id, bounds.width(), bounds.height())
    }

    pub fn set_padding(&mut self, id: ElementId, padding: Insets) -> Result<(), TreeError> {
        self.try_node_mut(id)?.padding = padding;
        self.invalidate_kinds(id, &[ComponentKind::Layout, ComponentKind::Scroll]);
        Ok(())
    }

    /// Shows or hides an element. Hidden elements don't render, receive events, or take part in
    /// their parent's layout.
    pub fn set_visible(&mut self, id: ElementId, visible: bool) -> Result<(), TreeError> {
        let node = self.try_node_mut(id)?;
        if node.visible == visible {
            return Ok(());
        }
        node.visible = visible;
        let parent = node.parent;
        if let Some(parent) = parent {
            self.children_changed(parent);
        }
        Ok(())
    }

    pub fn set_hovered(&mut self, id: ElementId, hovered: bool) -> Result<(), TreeError> {
        self.try_node_mut(id)?.hovered = hovered;
        Ok(())
    }

    /// Moves keyboard focus, calling `on_blur` on the old and `on_focus` on the new element.
    pub fn set_focus(&mut self, id: Option<ElementId>) -> Result<(), TreeError> {
        if let Some(id) = id {
            self.try_node(id)?;
        }
        if self.focused == id {
            return Ok(());
        }

        if let Some(previous) = self.focused.take() {
            if let Some(node) = self.nodes.get_mut(&previous) {
                node.focused = false;
            }
            self.with_widget(previous, |widget, cx| widget.on_blur(cx));
        }

        if let Some(id) = id {
            self.focused = Some(id);
            if let Some(node) = self.nodes.get_mut(&id) {
                node.focused = true;
            }
            self.with_widget(id, |widget, cx| widget.on_focus(cx));
        }
        debug!(focused = ?self.focused, "focus changed");
        Ok(())
    }

    /// Marks all of an element's components dirty.
    pub fn invalidate(&mut self, id: ElementId) -> Result<(), TreeError> {
        self.try_node_mut(id)?.components.invalidate_all();
        Ok(())
    }

    fn invalidate_kinds(&mut self, id: ElementId, kinds: &[ComponentKind]) {
        if let Some(node) = self.nodes.get_mut(&id) {
            for kind in kinds {
                node.components.invalidate(*kind);
            }
        }
    }

    /// Bookkeeping after an element's set of children or their sizes changed.
    ///
    /// An element that fits its content has to measure again.
    fn children_changed(&mut self, id: ElementId) {
        self.invalidate_kinds(id, &[ComponentKind::Layout, ComponentKind::Scroll]);
        if self
            .component::<ConstraintComponent>(id)
            .map_or(false, ConstraintComponent::fits_content)
        {
            self.invalidate_kinds(id, &[ComponentKind::Constraint]);
        }
    }

    /// Bookkeeping after an element changed size.
    fn size_changed(&mut self, id: ElementId) {
        self.invalidate_kinds(id, &[ComponentKind::Layout, ComponentKind::Scroll]);
        for child in self.children(id).to_vec() {
            self.invalidate_kinds(child, &[ComponentKind::Constraint]);
        }
    }

    /// Sets bounds on behalf of the parent's layout.
    ///
    /// The parent is not marked dirty; its layout is what asked for this.
    pub(crate) fn apply_frame(&mut self, id: ElementId, frame: Rect) {
        let resized = match self.nodes.get_mut(&id) {
            Some(node) => {
                let resized = node.bounds.size != frame.size;
                node.bounds = frame;
                resized
            }
            None => return,
        };
        if resized {
            self.size_changed(id);
        }
    }

    /// Sets bounds on behalf of the element's own constraint.
    ///
    /// A parent that lays out or measures its children has to look at them again.
    pub(crate) fn apply_constrained_frame(&mut self, id: ElementId, frame: Rect) {
        let (previous, parent) = match self.nodes.get(&id) {
            Some(node) => (node.bounds, node.parent),
            None => return,
        };
        if previous == frame {
            return;
        }
        self.apply_frame(id, frame);

        let parent = match parent {
            Some(parent) => parent,
            None => return,
        };
        if previous.size != frame.size {
            self.children_changed(parent);
        } else {
            self.invalidate_kinds(parent, &[ComponentKind::Scroll]);
        }
    }

    /// Attaches a component, replacing (and detaching) one of the same kind.
    pub fn add_component<C: ComponentType>(
        &mut self,
        id: ElementId,
        component: C,
    ) -> Result<(), TreeError> {
        self.try_node(id)?;
        self.attach(id, component.into_any());
        Ok(())
    }

    fn attach(&mut self, id: ElementId, mut component: AnyComponent) {
        let kind = component.kind();
        if let Some(mut previous) = self
            .nodes
            .get_mut(&id)
            .and_then(|node| node.components.take(kind))
        {
            previous.as_component_mut().on_detach();
            debug!(element = ?id, ?kind, "replaced component");
        }

        component
            .as_component_mut()
            .on_attach(&mut ComponentContext::new(self, id));

        if let Some(node) = self.nodes.get_mut(&id) {
            node.components.insert(component);
            debug!(element = ?id, ?kind, "attached component");
        }
    }

    /// Detaches and drops a component. Returns false if there was none.
    pub fn remove_component<C: ComponentType>(&mut self, id: ElementId) -> bool {
        let removed = self
            .nodes
            .get_mut(&id)
            .and_then(|node| node.components.take(C::kind()));
        match removed {
            Some(mut component) => {
                component.as_component_mut().on_detach();
                debug!(element = ?id, kind = ?C::kind(), "detached component");
                true
            }
            None => false,
        }
    }

    pub fn component<C: ComponentType>(&self, id: ElementId) -> Option<&C> {
        self.nodes.get(&id)?.components.get()
    }

    pub fn component_mut<C: ComponentType>(&mut self, id: ElementId) -> Option<&mut C> {
        self.nodes.get_mut(&id)?.components.get_mut()
    }

    pub fn has_component<C: ComponentType>(&self, id: ElementId) -> bool {
        self.nodes
            .get(&id)
            .map_or(false, |node| node.components.contains(C::kind()))
    }

    /// Runs `f` with a component taken out of its element.
    fn with_component<R>(
        &mut self,
        id: ElementId,
        kind: ComponentKind,
        f: impl FnOnce(&mut AnyComponent, &mut ComponentContext) -> R,
    ) -> Option<R> {
        let mut component = self.nodes.get_mut(&id)?.components.take(kind)?;
        let result = f(&mut component, &mut ComponentContext::new(self, id));
        if let Some(node) = self.nodes.get_mut(&id) {
            node.components.insert(component);
        }
        Some(result)
    }

    /// Runs `f` with a widget taken out of its element.
    ///
    /// Elements without a widget get `()`.
    fn with_widget<R>(
        &mut self,
        id: ElementId,
        f: impl FnOnce(&mut dyn Widget, &mut EventContext) -> R,
    ) -> Option<R> {
        let mut widget = self.nodes.get_mut(&id)?.widget.take();
        let result = {
            let mut cx = EventContext::new(self, id);
            match widget.as_deref_mut() {
                Some(widget) => f(widget, &mut cx),
                None => f(&mut (), &mut cx),
            }
        };
        if let Some(node) = self.nodes.get_mut(&id) {
            node.widget = widget;
        }
        Some(result)
    }

    /// Current scroll offset if the element is a scroll container.
    pub(crate) fn scroll_offset(&self, id: ElementId) -> Option<Vector2<f64>> {
        self.component::<ScrollComponent>(id)
            .map(ScrollComponent::offset)
    }

    /// Brings every dirty constraint, layout and scroll state up to date.
    ///
    /// Elements are visited top-down; each resolves its constraint, then its layout, then its
    /// children, then its scroll state (which needs the children's final sizes). A child resolving
    /// its constraint can dirty its parent again, so passes repeat until nothing is dirty.
    pub fn resolve_layout(&mut self) {
        let root = self.root;
        for pass in 1..=MAX_RESOLVE_PASSES {
            self.resolve_element(root);
            if !self.has_dirty_components() {
                return;
            }
            trace!(pass, "layout not settled yet");
        }
        warn!(passes = MAX_RESOLVE_PASSES, "layout did not settle");
    }

    fn has_dirty_components(&self) -> bool {
        self.nodes
            .values()
            .any(|node| node.components.iter().any(|component| component.is_dirty()))
    }

    fn resolve_element(&mut self, id: ElementId) {
        self.resolve_component(id, ComponentKind::Constraint);
        if self.resolve_component(id, ComponentKind::Layout) {
            self.invalidate_kinds(id, &[ComponentKind::Scroll]);
        }
        for child in self.children(id).to_vec() {
            self.resolve_element(child);
        }
        self.resolve_component(id, ComponentKind::Scroll);
    }

    /// Resolves one component. Returns whether it was dirty.
    fn resolve_component(&mut self, id: ElementId, kind: ComponentKind) -> bool {
        self.with_component(id, kind, |component, cx| {
            let dirty = component.as_component().is_dirty();
            component.as_component_mut().resolve(cx);
            dirty
        })
        .unwrap_or(false)
    }

    /// Runs one frame of updates: resolves layout, calls `on_update` on every component of every
    /// visible element, then applies deferred commands.
    pub fn update(&mut self, delta_time: f64) {
        self.resolve_layout();
        let root = self.root;
        self.update_element(root, delta_time);
        self.apply_deferred();
    }

    fn update_element(&mut self, id: ElementId, delta_time: f64) {
        let kinds = match self.nodes.get(&id) {
            Some(node) if node.visible => node.components.kinds(),
            _ => return,
        };
        for kind in kinds {
            self.with_component(id, kind, |component, cx| {
                component.as_component_mut().on_update(cx, delta_time)
            });
        }
        for child in self.children(id).to_vec() {
            self.update_element(child, delta_time);
        }
    }

    /// Resolves layout and draws the tree.
    ///
    /// Each visible element draws its widget, then its children, then its component overlays.
    /// Children of scroll containers are clipped to the container and shifted by its offset.
    pub fn render(&mut self, renderer: &mut dyn Renderer) {
        self.resolve_layout();
        self.render_element(self.root, Point2::new(0., 0.), renderer);
    }

    fn render_element(&self, id: ElementId, origin: Point2<f64>, renderer: &mut dyn Renderer) {
        let node = match self.nodes.get(&id) {
            Some(node) if node.visible => node,
            _ => return,
        };

        let frame = node.bounds + origin.to_vec();
        let cx = RenderContext::new(self, id, frame);

        if let Some(widget) = &node.widget {
            widget.render(&cx, renderer);
        }

        let scroll = node.components.get::<ScrollComponent>();
        let child_origin = match scroll {
            Some(scroll) => {
                renderer.push_scissor(frame);
                frame.origin - scroll.offset()
            }
            None => frame.origin,
        };

        for child in &node.children {
            self.render_element(*child, child_origin, renderer);
        }

        if scroll.is_some() {
            renderer.pop_scissor();
        }

        for component in node.components.iter() {
            component.on_render_overlay(&cx, renderer);
        }
    }

    /// Dispatches a mouse event from the root down. Returns true if anything consumed it.
    ///
    /// Pending layout is resolved first, and deferred commands are applied afterwards.
    pub fn process_mouse_event(&mut self, event: &MouseEvent) -> bool {
        self.resolve_layout();
        let root = self.root;
        let consumed = self.dispatch_mouse_event(root, event);
        self.apply_deferred();
        consumed
    }

    /// Lets one element (and its subtree) handle a mouse event.
    pub(crate) fn dispatch_mouse_event(&mut self, id: ElementId, event: &MouseEvent) -> bool {
        self.with_widget(id, |widget, cx| widget.process_mouse_event(cx, event))
            .unwrap_or(false)
    }

    pub(crate) fn dispatch_to_components(&mut self, id: ElementId, event: &MouseEvent) -> bool {
        let kinds = match self.nodes.get(&id) {
            Some(node) => node.components.kinds(),
            None => return false,
        };
        kinds.into_iter().any(|kind| {
            self.with_component(id, kind, |component, cx| {
                component.as_component_mut().on_mouse_event(cx, event)
            })
            .unwrap_or(false)
        })
    }

    /// Offers a key event to the focused element, then to its ancestors. Returns true if anything
    /// consumed it.
    pub fn process_key_event(&mut self, event: &KeyboardEvent) -> bool {
        let mut target = self.focused;
        let mut consumed = false;

        while let Some(id) = target {
            if !self.is_visible(id) {
                target = self.parent(id);
                continue;
            }
            if self
                .with_widget(id, |widget, cx| widget.on_key_press(cx, event))
                .unwrap_or(false)
            {
                trace!(element = ?id, key = ?event.key, "key event consumed");
                consumed = true;
                break;
            }
            target = self.parent(id);
        }

        self.apply_deferred();
        consumed
    }

    /// Returns a handle for queueing structural changes.
    pub fn commands(&self) -> CommandSender {
        self.commands.clone()
    }

    /// Applies all queued commands, including ones queued while applying. Returns how many were
    /// applied.
    pub fn apply_deferred(&mut self) -> usize {
        let mut applied = 0;
        loop {
            match self.command_recv.try_recv() {
                Ok(command) => {
                    self.apply_command(command);
                    applied += 1;
                }
                // the tree holds a sender, so the channel can't disconnect
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        if applied > 0 {
            debug!(applied, "applied deferred commands");
        }
        applied
    }

    fn apply_command(&mut self, command: TreeCommand) {
        let result = match command {
            TreeCommand::AddChild { parent, element } => self.add_child(parent, element).map(drop),
            TreeCommand::RemoveChild { parent, child } => self.remove_child(parent, child),
            TreeCommand::ClearChildren(id) => self.clear_children(id),
            TreeCommand::SetVisible { id, visible } => self.set_visible(id, visible),
            TreeCommand::SetFocus(id) => self.set_focus(id),
            TreeCommand::Invalidate(id) => self.invalidate(id),
        };
        if let Err(err) = result {
            warn!(%err, "dropping stale deferred command");
        }
    }
}
