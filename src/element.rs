//! Detached elements.

use crate::component::{AnyComponent, ComponentType};
use crate::rect::{Insets, Rect};
use crate::widget::Widget;
use core::fmt;
use uuid::Uuid;

/// Element identifier.
///
/// Assigned when an [`Element`] is created, so it stays the same before and after the element
/// moves into a tree.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u32, u16, u16, [u8; 8]);

impl ElementId {
    /// Creates a new random element ID.
    pub fn new() -> ElementId {
        let uuid = Uuid::new_v4();
        let (a, b, c, d) = uuid.as_fields();
        ElementId(a, b, c, *d)
    }

    fn uuid(&self) -> Uuid {
        Uuid::from_fields(self.0, self.1, self.2, &self.3)
    }
}

impl Default for ElementId {
    fn default() -> Self {
        ElementId::new()
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ElementId({})", self.uuid())
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.uuid())
    }
}

/// An element that is not (yet) part of a tree.
///
/// Build it up with the `with_*` methods and hand it to `ElementTree::new` or
/// `ElementTree::add_child`; the tree takes ownership of it, its children and its components.
#[derive(Debug)]
pub struct Element {
    pub(crate) id: ElementId,
    pub(crate) bounds: Rect,
    pub(crate) padding: Insets,
    pub(crate) visible: bool,
    pub(crate) widget: Option<Box<dyn Widget>>,
    pub(crate) components: Vec<AnyComponent>,
    pub(crate) children: Vec<Element>,
}

impl Element {
    /// Creates an element with the given bounds, relative to its future parent.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Element {
        Element::from_rect(Rect::xywh(x, y, width, height))
    }

    pub fn from_rect(bounds: Rect) -> Element {
        Element {
            id: ElementId::new(),
            bounds,
            padding: Insets::default(),
            visible: true,
            widget: None,
            components: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn with_widget<W: Widget>(mut self, widget: W) -> Element {
        self.widget = Some(Box::new(widget));
        self
    }

    pub fn with_padding(mut self, padding: Insets) -> Element {
        self.padding = padding;
        self
    }

    /// Attaches a component once the element enters a tree. Replaces a component of the same kind.
    pub fn with_component<C: ComponentType>(mut self, component: C) -> Element {
        self.components.retain(|c| c.kind() != C::kind());
        self.components.push(component.into_any());
        self
    }

    /// Appends a child on top of the existing ones.
    pub fn with_child(mut self, child: Element) -> Element {
        self.children.push(child);
        self
    }

    /// Starts out invisible.
    pub fn hidden(mut self) -> Element {
        self.visible = false;
        self
    }
}
