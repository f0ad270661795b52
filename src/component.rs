//! Components: behavior attached to elements.
//!
//! An element holds at most one component of each [`ComponentKind`]. The set of kinds is closed,
//! so component storage is an enum keyed by kind rather than a type map, and typed access goes
//! through [`ComponentType`].

use crate::backend::Renderer;
use crate::constraint::ConstraintComponent;
use crate::context::RenderContext;
use crate::events::MouseEvent;
use crate::layout::LayoutComponent;
use crate::scroll::ScrollComponent;
use core::fmt;
use std::collections::BTreeMap;

pub use crate::context::ComponentContext;

/// Component kinds.
///
/// Ordered the way they resolve on an element. Scroll resolves after the element's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComponentKind {
    Constraint,
    Layout,
    Scroll,
}

/// A behavior attached to an element.
///
/// All hooks have no-op defaults.
pub trait Component: fmt::Debug {
    /// Called once when the component is attached to an element.
    fn on_attach(&mut self, cx: &mut ComponentContext) {
        let _ = cx;
    }

    /// Called once when the component is detached, either explicitly, by replacement, or because
    /// the element was destroyed.
    fn on_detach(&mut self) {}

    /// Called once per update walk.
    fn on_update(&mut self, cx: &mut ComponentContext, delta_time: f64) {
        let _ = (cx, delta_time);
    }

    /// Offered mouse events before the owner's own hooks. Returns true if consumed.
    fn on_mouse_event(&mut self, cx: &mut ComponentContext, event: &MouseEvent) -> bool {
        let _ = (cx, event);
        false
    }

    /// Draws on top of the owner and its children.
    fn on_render_overlay(&self, cx: &RenderContext, renderer: &mut dyn Renderer) {
        let _ = (cx, renderer);
    }

    /// Brings the owner up to date if the component is dirty.
    fn resolve(&mut self, cx: &mut ComponentContext) {
        let _ = cx;
    }

    /// Marks the component dirty.
    fn invalidate(&mut self) {}

    fn is_dirty(&self) -> bool {
        false
    }
}

/// A concrete component type.
pub trait ComponentType: Component + Sized + 'static {
    fn kind() -> ComponentKind;
    fn into_any(self) -> AnyComponent;
    fn from_any(component: &AnyComponent) -> Option<&Self>;
    fn from_any_mut(component: &mut AnyComponent) -> Option<&mut Self>;
    fn from_any_owned(component: AnyComponent) -> Option<Self>;
}

/// Any component.
#[derive(Debug)]
pub enum AnyComponent {
    Constraint(ConstraintComponent),
    Layout(LayoutComponent),
    Scroll(ScrollComponent),
}

impl AnyComponent {
    pub fn kind(&self) -> ComponentKind {
        match self {
            AnyComponent::Constraint(_) => ComponentKind::Constraint,
            AnyComponent::Layout(_) => ComponentKind::Layout,
            AnyComponent::Scroll(_) => ComponentKind::Scroll,
        }
    }

    pub fn as_component(&self) -> &dyn Component {
        match self {
            AnyComponent::Constraint(c) => c,
            AnyComponent::Layout(c) => c,
            AnyComponent::Scroll(c) => c,
        }
    }

    pub fn as_component_mut(&mut self) -> &mut dyn Component {
        match self {
            AnyComponent::Constraint(c) => c,
            AnyComponent::Layout(c) => c,
            AnyComponent::Scroll(c) => c,
        }
    }
}

macro_rules! impl_component_type {
    ($variant:ident, $type:ty) => {
        impl ComponentType for $type {
            fn kind() -> ComponentKind {
                ComponentKind::$variant
            }
            fn into_any(self) -> AnyComponent {
                AnyComponent::$variant(self)
            }
            fn from_any(component: &AnyComponent) -> Option<&Self> {
                match component {
                    AnyComponent::$variant(c) => Some(c),
                    _ => None,
                }
            }
            fn from_any_mut(component: &mut AnyComponent) -> Option<&mut Self> {
                match component {
                    AnyComponent::$variant(c) => Some(c),
                    _ => None,
                }
            }
            fn from_any_owned(component: AnyComponent) -> Option<Self> {
                match component {
                    AnyComponent::$variant(c) => Some(c),
                    _ => None,
                }
            }
        }

        impl From<$type> for AnyComponent {
            fn from(this: $type) -> AnyComponent {
                AnyComponent::$variant(this)
            }
        }
    };
}

impl_component_type!(Constraint, ConstraintComponent);
impl_component_type!(Layout, LayoutComponent);
impl_component_type!(Scroll, ScrollComponent);

/// The components attached to one element.
#[derive(Debug, Default)]
pub struct Components {
    map: BTreeMap<ComponentKind, AnyComponent>,
}

impl Components {
    pub fn get<C: ComponentType>(&self) -> Option<&C> {
        self.map.get(&C::kind()).and_then(C::from_any)
    }

    pub fn get_mut<C: ComponentType>(&mut self) -> Option<&mut C> {
        self.map.get_mut(&C::kind()).and_then(C::from_any_mut)
    }

    pub fn contains(&self, kind: ComponentKind) -> bool {
        self.map.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Inserts a component, returning the one it replaced.
    pub(crate) fn insert(&mut self, component: AnyComponent) -> Option<AnyComponent> {
        self.map.insert(component.kind(), component)
    }

    pub(crate) fn take(&mut self, kind: ComponentKind) -> Option<AnyComponent> {
        self.map.remove(&kind)
    }

    pub(crate) fn kinds(&self) -> Vec<ComponentKind> {
        self.map.keys().copied().collect()
    }

    pub(crate) fn invalidate(&mut self, kind: ComponentKind) {
        if let Some(component) = self.map.get_mut(&kind) {
            component.as_component_mut().invalidate();
        }
    }

    pub(crate) fn invalidate_all(&mut self) {
        for component in self.map.values_mut() {
            component.as_component_mut().invalidate();
        }
    }

    /// Iterates in kind order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Component> {
        self.map.values().map(AnyComponent::as_component)
    }

    pub(crate) fn drain(&mut self) -> Vec<AnyComponent> {
        std::mem::take(&mut self.map).into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::Anchor;
    use crate::layout::{Alignment, VerticalLayout};

    #[test]
    fn one_per_kind() {
        let mut components = Components::default();
        assert!(components
            .insert(LayoutComponent::new(VerticalLayout::default()).into_any())
            .is_none());
        assert!(components
            .insert(ScrollComponent::vertical().into_any())
            .is_none());

        let replaced =
            components.insert(LayoutComponent::new(VerticalLayout::new(4., Alignment::End)).into_any());
        assert_eq!(replaced.map(|c| c.kind()), Some(ComponentKind::Layout));
        assert_eq!(components.len(), 2);

        let layout = components.get::<LayoutComponent>().and_then(|c| c.strategy_as::<VerticalLayout>());
        assert_eq!(layout.map(|l| l.gap), Some(4.));
        assert!(components.get::<ConstraintComponent>().is_none());
    }

    #[test]
    fn typed_access_through_any() {
        let any: AnyComponent = ConstraintComponent::anchored(Anchor::fill(3.)).into();
        assert_eq!(any.kind(), ConstraintComponent::kind());
        assert!(LayoutComponent::from_any(&any).is_none());
        let constraint = ConstraintComponent::from_any_owned(any);
        assert_eq!(constraint.map(|c| c.anchor()), Some(Anchor::fill(3.)));
    }

    #[test]
    fn kinds_are_ordered() {
        let mut components = Components::default();
        components.insert(ScrollComponent::default().into_any());
        components.insert(ConstraintComponent::anchored(Anchor::default()).into_any());
        components.insert(LayoutComponent::new(VerticalLayout::default()).into_any());
        assert_eq!(
            components.kinds(),
            vec![
                ComponentKind::Constraint,
                ComponentKind::Layout,
                ComponentKind::Scroll
            ]
        );
    }
}
