//! A retained-mode element tree.
//!
//! Elements own their children and carry a widget (what they draw, how they react to input) plus
//! up to one component of each kind: constraints, layout and scrolling. Input goes through the
//! tree by bubbling down from the root, or through a [`RegionDispatcher`] for overlays that don't
//! fit in one subtree. Drawing goes to a [`Renderer`] supplied by the application.

pub mod backend;
pub mod color;
pub mod component;
pub mod constraint;
mod context;
mod deferred;
mod element;
mod error;
pub mod events;
pub mod layout;
mod rect;
pub mod region;
pub mod scroll;
mod tree;
mod widget;

pub use backend::{DrawCommand, DrawList, Renderer};
pub use color::Color;
pub use component::{Component, ComponentKind, ComponentType};
pub use constraint::{Anchor, ConstraintComponent, Edge, SizeConstraint, SizeConstraints};
pub use context::{ComponentContext, EventContext, RenderContext};
pub use deferred::{CommandSender, TreeCommand};
pub use element::{Element, ElementId};
pub use error::TreeError;
pub use events::{KeyboardEvent, MouseButton, MouseEvent};
pub use layout::{Alignment, Layout, LayoutComponent, LayoutDirection};
pub use rect::{Insets, Rect};
pub use region::{RegionDispatcher, RegionHandle, RegionHandler};
pub use scroll::{ScrollComponent, ScrollDirection, ScrollState};
pub use tree::ElementTree;
pub use widget::{bubble_down, AsAny, Widget};
