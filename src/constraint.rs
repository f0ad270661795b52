//! Edge anchoring and size constraints.

use crate::component::{Component, ComponentContext};
use crate::rect::Rect;
use bitflags::bitflags;
use cgmath::Vector2;
use tracing::trace;

bitflags! {
    /// A set of element edges.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Edge: u8 {
        const LEFT = 1;
        const RIGHT = 1 << 1;
        const TOP = 1 << 2;
        const BOTTOM = 1 << 3;

        const TOP_LEFT = Self::TOP.bits() | Self::LEFT.bits();
        const TOP_RIGHT = Self::TOP.bits() | Self::RIGHT.bits();
        const BOTTOM_LEFT = Self::BOTTOM.bits() | Self::LEFT.bits();
        const BOTTOM_RIGHT = Self::BOTTOM.bits() | Self::RIGHT.bits();
        const HORIZONTAL = Self::LEFT.bits() | Self::RIGHT.bits();
        const VERTICAL = Self::TOP.bits() | Self::BOTTOM.bits();
        const ALL = Self::HORIZONTAL.bits() | Self::VERTICAL.bits();
    }
}

/// Per-edge margins against the parent.
///
/// If both margins on an axis are set the element stretches between them. If only one is set the
/// element keeps its size and sits at that distance from the edge. If neither is set the element
/// sits at 0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Anchor {
    pub left: Option<f64>,
    pub right: Option<f64>,
    pub top: Option<f64>,
    pub bottom: Option<f64>,
}

impl Anchor {
    pub fn top_left(margin: f64) -> Anchor {
        Anchor {
            left: Some(margin),
            top: Some(margin),
            ..Anchor::default()
        }
    }

    pub fn top_right(margin: f64) -> Anchor {
        Anchor {
            right: Some(margin),
            top: Some(margin),
            ..Anchor::default()
        }
    }

    pub fn bottom_left(margin: f64) -> Anchor {
        Anchor {
            left: Some(margin),
            bottom: Some(margin),
            ..Anchor::default()
        }
    }

    pub fn bottom_right(margin: f64) -> Anchor {
        Anchor {
            right: Some(margin),
            bottom: Some(margin),
            ..Anchor::default()
        }
    }

    /// Stretches between the left and right edges.
    pub fn stretch_horizontal(left: f64, right: f64) -> Anchor {
        Anchor {
            left: Some(left),
            right: Some(right),
            ..Anchor::default()
        }
    }

    /// Stretches between the top and bottom edges.
    pub fn stretch_vertical(top: f64, bottom: f64) -> Anchor {
        Anchor {
            top: Some(top),
            bottom: Some(bottom),
            ..Anchor::default()
        }
    }

    /// Fills the parent, minus `margin` on every edge.
    pub fn fill(margin: f64) -> Anchor {
        Anchor {
            left: Some(margin),
            right: Some(margin),
            top: Some(margin),
            bottom: Some(margin),
        }
    }

    pub fn with_left(mut self, margin: f64) -> Anchor {
        self.left = Some(margin);
        self
    }

    pub fn with_right(mut self, margin: f64) -> Anchor {
        self.right = Some(margin);
        self
    }

    pub fn with_top(mut self, margin: f64) -> Anchor {
        self.top = Some(margin);
        self
    }

    pub fn with_bottom(mut self, margin: f64) -> Anchor {
        self.bottom = Some(margin);
        self
    }

    /// Returns the set of edges that have a margin.
    pub fn edges(&self) -> Edge {
        let mut edges = Edge::empty();
        edges.set(Edge::LEFT, self.left.is_some());
        edges.set(Edge::RIGHT, self.right.is_some());
        edges.set(Edge::TOP, self.top.is_some());
        edges.set(Edge::BOTTOM, self.bottom.is_some());
        edges
    }

    /// True if any edge has a margin.
    pub fn has_anchor(&self) -> bool {
        !self.edges().is_empty()
    }

    /// Removes all margins.
    pub fn clear(&mut self) {
        *self = Anchor::default();
    }

    /// Positions an element of the given size inside a parent of the given size.
    ///
    /// The result is in parent coordinates. Stretched extents never go below zero.
    pub fn resolve(&self, size: Vector2<f64>, parent: Vector2<f64>) -> Rect {
        let (x, width) = resolve_axis(self.left, self.right, size.x, parent.x);
        let (y, height) = resolve_axis(self.top, self.bottom, size.y, parent.y);
        Rect::xywh(x, y, width, height)
    }
}

fn resolve_axis(start: Option<f64>, end: Option<f64>, size: f64, parent: f64) -> (f64, f64) {
    match (start, end) {
        (Some(start), Some(end)) => (start, (parent - start - end).max(0.)),
        (Some(start), None) => (start, size),
        (None, Some(end)) => (parent - size - end, size),
        (None, None) => (0., size),
    }
}

/// How one axis of an element is sized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeConstraint {
    /// A fixed size in points.
    Fixed(f64),
    /// A fraction of the parent's size. Clamped to 0..=1.
    Percent(f64),
    /// The element's natural content size, clamped to `min..=max`.
    FitContent { min: f64, max: f64 },
}

impl SizeConstraint {
    /// Fit content without bounds.
    pub fn fit_content() -> SizeConstraint {
        SizeConstraint::FitContent {
            min: 0.,
            max: f64::INFINITY,
        }
    }

    /// Resolves the size given the parent's size and the element's natural size on this axis.
    pub fn resolve(&self, parent: f64, natural: f64) -> f64 {
        match *self {
            SizeConstraint::Fixed(size) => size,
            SizeConstraint::Percent(fraction) => fraction.clamp(0., 1.) * parent,
            SizeConstraint::FitContent { min, max } => natural.max(min).min(max),
        }
    }

    fn needs_measure(&self) -> bool {
        matches!(self, SizeConstraint::FitContent { .. })
    }
}

/// Size constraints for both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeConstraints {
    pub width: SizeConstraint,
    pub height: SizeConstraint,
}

impl SizeConstraints {
    pub fn new(width: SizeConstraint, height: SizeConstraint) -> SizeConstraints {
        SizeConstraints { width, height }
    }

    pub fn fixed(width: f64, height: f64) -> SizeConstraints {
        SizeConstraints::new(SizeConstraint::Fixed(width), SizeConstraint::Fixed(height))
    }

    pub fn percent(width: f64, height: f64) -> SizeConstraints {
        SizeConstraints::new(SizeConstraint::Percent(width), SizeConstraint::Percent(height))
    }

    /// The full size of the parent.
    pub fn full() -> SizeConstraints {
        SizeConstraints::percent(1., 1.)
    }

    pub fn resolve(&self, parent: Vector2<f64>, natural: Vector2<f64>) -> Vector2<f64> {
        Vector2::new(
            self.width.resolve(parent.x, natural.x),
            self.height.resolve(parent.y, natural.y),
        )
    }

    fn needs_measure(&self) -> bool {
        self.width.needs_measure() || self.height.needs_measure()
    }
}

/// Sizes and positions the owner against its parent.
///
/// Size is resolved first, then the anchor places (or stretches) the element. Without size
/// constraints the element keeps its current size, and on axes without an anchor it keeps its
/// current position. Anchored elements are not positioned by their parent's layout. The root
/// element resolves against the tree viewport, if one was set.
#[derive(Debug)]
pub struct ConstraintComponent {
    anchor: Anchor,
    size: Option<SizeConstraints>,
    dirty: bool,
    passes: usize,
}

impl ConstraintComponent {
    pub fn new(anchor: Anchor, size: SizeConstraints) -> ConstraintComponent {
        ConstraintComponent {
            anchor,
            size: Some(size),
            dirty: true,
            passes: 0,
        }
    }

    /// Only anchors; the size is left alone.
    pub fn anchored(anchor: Anchor) -> ConstraintComponent {
        ConstraintComponent {
            anchor,
            size: None,
            dirty: true,
            passes: 0,
        }
    }

    /// Only sizes; the position is left to the parent's layout.
    pub fn sized(size: SizeConstraints) -> ConstraintComponent {
        ConstraintComponent::new(Anchor::default(), size)
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn set_anchor(&mut self, anchor: Anchor) {
        self.anchor = anchor;
        self.dirty = true;
    }

    pub fn size(&self) -> Option<SizeConstraints> {
        self.size
    }

    pub fn set_size(&mut self, size: Option<SizeConstraints>) {
        self.size = size;
        self.dirty = true;
    }

    /// True if the owner's size depends on its content.
    pub fn fits_content(&self) -> bool {
        self.size.map_or(false, |size| size.needs_measure())
    }

    /// True if the anchor positions the owner, which takes it out of its parent's layout.
    pub fn anchors_position(&self) -> bool {
        self.anchor.has_anchor()
    }

    /// How many times this component has recomputed the owner frame.
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Resolves the owner frame right away, dirty or not.
    pub fn apply(&mut self, cx: &mut ComponentContext) {
        self.dirty = false;

        let parent = match cx.parent_size() {
            Some(parent) => parent,
            // a root without a viewport has nothing to resolve against
            None => return,
        };

        let current = cx.size();
        let size = match self.size {
            Some(size) => {
                let natural = if size.needs_measure() {
                    cx.measure()
                } else {
                    current
                };
                size.resolve(parent, natural)
            }
            None => current,
        };

        // axes without an anchor keep their position
        let mut frame = self.anchor.resolve(size, parent);
        let origin = cx.bounds().origin;
        if self.anchor.left.is_none() && self.anchor.right.is_none() {
            frame.origin.x = origin.x;
        }
        if self.anchor.top.is_none() && self.anchor.bottom.is_none() {
            frame.origin.y = origin.y;
        }
        cx.apply_frame(frame);
        self.passes += 1;
        trace!(owner = ?cx.owner(), ?frame, "constraints resolved");
    }
}

impl Component for ConstraintComponent {
    fn on_attach(&mut self, _cx: &mut ComponentContext) {
        self.dirty = true;
    }

    fn resolve(&mut self, cx: &mut ComponentContext) {
        if self.dirty {
            self.apply(cx);
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

    fn parent() -> Vector2<f64> {
        Vector2::new(400., 300.)
    }

    fn size() -> Vector2<f64> {
        Vector2::new(100., 50.)
    }

    #[test]
    fn single_edge_keeps_size() {
        let rect = Anchor::default().with_right(20.).resolve(size(), parent());
        assert_eq!(rect, Rect::xywh(280., 0., 100., 50.));

        let rect = Anchor::bottom_right(15.).resolve(size(), parent());
        assert_eq!(rect, Rect::xywh(285., 235., 100., 50.));

        let rect = Anchor::top_left(15.).resolve(size(), parent());
        assert_eq!(rect, Rect::xywh(15., 15., 100., 50.));
    }

    #[test]
    fn opposing_edges_stretch() {
        let rect = Anchor::stretch_horizontal(10., 20.).resolve(size(), parent());
        assert_eq!(rect, Rect::xywh(10., 0., 370., 50.));

        let rect = Anchor::fill(10.).resolve(size(), parent());
        assert_eq!(rect, Rect::xywh(10., 10., 380., 280.));
    }

    #[test]
    fn stretch_never_goes_negative() {
        let rect = Anchor::stretch_vertical(200., 200.).resolve(size(), parent());
        assert_eq!(rect.height(), 0.);
    }

    #[test]
    fn no_edges_sits_at_origin() {
        let anchor = Anchor::default();
        assert!(!anchor.has_anchor());
        assert_eq!(anchor.resolve(size(), parent()), Rect::xywh(0., 0., 100., 50.));
    }

    #[test]
    fn edge_flags() {
        assert_eq!(Anchor::top_left(0.).edges(), Edge::TOP_LEFT);
        assert_eq!(Anchor::fill(0.).edges(), Edge::ALL);
        assert_eq!(Anchor::stretch_horizontal(0., 0.).edges(), Edge::HORIZONTAL);

        let mut anchor = Anchor::bottom_right(5.);
        assert!(anchor.edges().contains(Edge::BOTTOM));
        anchor.clear();
        assert!(!anchor.has_anchor());
    }

    #[test]
    fn size_constraints() {
        assert_eq!(SizeConstraint::Fixed(120.).resolve(400., 10.), 120.);
        assert_eq!(SizeConstraint::Percent(0.5).resolve(400., 10.), 200.);
        assert_eq!(SizeConstraint::Percent(1.5).resolve(400., 10.), 400.);
        assert_eq!(SizeConstraint::Percent(-1.).resolve(400., 10.), 0.);

        let fit = SizeConstraint::FitContent { min: 50., max: 150. };
        assert_eq!(fit.resolve(400., 10.), 50.);
        assert_eq!(fit.resolve(400., 100.), 100.);
        assert_eq!(fit.resolve(400., 300.), 150.);
        assert_eq!(SizeConstraint::fit_content().resolve(400., 1000.), 1000.);
    }

    #[test]
    fn full_size() {
        let full = SizeConstraints::full().resolve(parent(), size());
        assert_eq!(full, parent());
    }
}
