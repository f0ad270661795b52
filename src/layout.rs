//! Layout strategies.
//!
//! A strategy is a pure function from a container frame and the natural sizes of its (visible)
//! children to one rectangle per child, relative to the container. Strategies never look at the
//! tree; [`LayoutComponent`] does the plumbing.

use crate::component::{Component, ComponentContext};
use crate::rect::{Insets, Rect};
use crate::widget::AsAny;
use cgmath::Vector2;
use core::fmt;
use tracing::trace;

/// Cross-axis (or, for [`StackLayout`], per-axis) placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    /// Flush with the leading padding edge.
    #[default]
    Start,
    /// Centered within the *full* container dimension, ignoring padding.
    Center,
    /// Flush with the trailing padding edge.
    End,
    /// Fills the content extent. This is the only alignment that changes child sizes.
    Stretch,
}

/// The primary axis of a directional layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutDirection {
    #[default]
    Horizontal,
    Vertical,
}

/// The container as seen by a layout strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutFrame {
    /// Full container size.
    pub size: Vector2<f64>,
    pub padding: Insets,
}

impl LayoutFrame {
    pub fn new(size: Vector2<f64>, padding: Insets) -> LayoutFrame {
        LayoutFrame { size, padding }
    }

    /// A frame without padding.
    pub fn sized(width: f64, height: f64) -> LayoutFrame {
        LayoutFrame::new(Vector2::new(width, height), Insets::default())
    }

    /// The container rectangle inset by padding, in container coordinates.
    pub fn content_rect(&self) -> Rect {
        Rect::xywh(0., 0., self.size.x, self.size.y).inset_by(self.padding)
    }
}

/// A layout strategy.
pub trait Layout: AsAny + fmt::Debug {
    /// Computes one rectangle per child, in order.
    ///
    /// `children` holds the current size of each child. The returned sizes equal the inputs except
    /// where the strategy stretches.
    fn layout(&self, frame: &LayoutFrame, children: &[Vector2<f64>]) -> Vec<Rect>;

    /// The size the container would need to show all children without clipping, padding included.
    fn content_size(&self, frame: &LayoutFrame, children: &[Vector2<f64>]) -> Vector2<f64>;
}

/// Places a child of length `child` on an axis of length `extent`.
///
/// Returns the position and length.
fn align(
    alignment: Alignment,
    extent: f64,
    pad_start: f64,
    pad_end: f64,
    child: f64,
) -> (f64, f64) {
    match alignment {
        Alignment::Start => (pad_start, child),
        Alignment::Center => ((extent - child) / 2., child),
        Alignment::End => (extent - pad_end - child, child),
        Alignment::Stretch => (pad_start, (extent - pad_start - pad_end).max(0.)),
    }
}

fn sum_with_gaps(extents: impl Iterator<Item = f64>, gap: f64) -> f64 {
    let mut total = 0.;
    let mut count = 0;
    for extent in extents {
        total += extent;
        count += 1;
    }
    if count > 1 {
        total += gap * (count - 1) as f64;
    }
    total
}

fn max_of(extents: impl Iterator<Item = f64>) -> f64 {
    extents.fold(0., f64::max)
}

/// Stacks children top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VerticalLayout {
    pub gap: f64,
    pub alignment: Alignment,
}

impl VerticalLayout {
    pub fn new(gap: f64, alignment: Alignment) -> VerticalLayout {
        VerticalLayout { gap, alignment }
    }
}

impl Layout for VerticalLayout {
    fn layout(&self, frame: &LayoutFrame, children: &[Vector2<f64>]) -> Vec<Rect> {
        let padding = frame.padding;
        let mut y = padding.top;

        children
            .iter()
            .map(|size| {
                let (x, width) = align(
                    self.alignment,
                    frame.size.x,
                    padding.left,
                    padding.right,
                    size.x,
                );
                let rect = Rect::xywh(x, y, width, size.y);
                y += size.y + self.gap;
                rect
            })
            .collect()
    }

    fn content_size(&self, frame: &LayoutFrame, children: &[Vector2<f64>]) -> Vector2<f64> {
        Vector2::new(
            max_of(children.iter().map(|s| s.x)) + frame.padding.horizontal(),
            sum_with_gaps(children.iter().map(|s| s.y), self.gap) + frame.padding.vertical(),
        )
    }
}

/// Stacks children left to right.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HorizontalLayout {
    pub gap: f64,
    pub alignment: Alignment,
}

impl HorizontalLayout {
    pub fn new(gap: f64, alignment: Alignment) -> HorizontalLayout {
        HorizontalLayout { gap, alignment }
    }
}

impl Layout for HorizontalLayout {
    fn layout(&self, frame: &LayoutFrame, children: &[Vector2<f64>]) -> Vec<Rect> {
        let padding = frame.padding;
        let mut x = padding.left;

        children
            .iter()
            .map(|size| {
                let (y, height) = align(
                    self.alignment,
                    frame.size.y,
                    padding.top,
                    padding.bottom,
                    size.y,
                );
                let rect = Rect::xywh(x, y, size.x, height);
                x += size.x + self.gap;
                rect
            })
            .collect()
    }

    fn content_size(&self, frame: &LayoutFrame, children: &[Vector2<f64>]) -> Vector2<f64> {
        Vector2::new(
            sum_with_gaps(children.iter().map(|s| s.x), self.gap) + frame.padding.horizontal(),
            max_of(children.iter().map(|s| s.y)) + frame.padding.vertical(),
        )
    }
}

/// Row-major grid with a fixed column count.
///
/// Column width is derived from the container; every child keeps its natural size and rows are
/// as tall as their tallest child.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub columns: usize,
    pub h_gap: f64,
    pub v_gap: f64,
}

impl GridLayout {
    pub fn new(columns: usize, h_gap: f64, v_gap: f64) -> GridLayout {
        GridLayout {
            columns,
            h_gap,
            v_gap,
        }
    }

    fn column_count(&self) -> usize {
        self.columns.max(1)
    }

    fn cell_width(&self, frame: &LayoutFrame) -> f64 {
        let columns = self.column_count() as f64;
        let content = frame.content_rect();
        ((content.width() - (columns - 1.) * self.h_gap) / columns).max(0.)
    }

    fn row_heights(&self, children: &[Vector2<f64>]) -> Vec<f64> {
        children
            .chunks(self.column_count())
            .map(|row| max_of(row.iter().map(|s| s.y)))
            .collect()
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        GridLayout::new(1, 0., 0.)
    }
}

impl Layout for GridLayout {
    fn layout(&self, frame: &LayoutFrame, children: &[Vector2<f64>]) -> Vec<Rect> {
        let columns = self.column_count();
        let cell_width = self.cell_width(frame);
        let row_heights = self.row_heights(children);
        let mut rects = Vec::with_capacity(children.len());
        let mut y = frame.padding.top;

        for (row, cells) in children.chunks(columns).enumerate() {
            for (column, size) in cells.iter().enumerate() {
                let x = frame.padding.left + column as f64 * (cell_width + self.h_gap);
                rects.push(Rect::xywh(x, y, size.x, size.y));
            }
            y += row_heights[row] + self.v_gap;
        }

        rects
    }

    fn content_size(&self, frame: &LayoutFrame, children: &[Vector2<f64>]) -> Vector2<f64> {
        let rows = self.row_heights(children);
        Vector2::new(
            frame.size.x,
            sum_with_gaps(rows.into_iter(), self.v_gap) + frame.padding.vertical(),
        )
    }
}

/// Layers every child over the same origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StackLayout {
    pub h_align: Alignment,
    pub v_align: Alignment,
}

impl StackLayout {
    pub fn new(h_align: Alignment, v_align: Alignment) -> StackLayout {
        StackLayout { h_align, v_align }
    }

    /// Centers everything on both axes.
    pub fn centered() -> StackLayout {
        StackLayout::new(Alignment::Center, Alignment::Center)
    }
}

impl Layout for StackLayout {
    fn layout(&self, frame: &LayoutFrame, children: &[Vector2<f64>]) -> Vec<Rect> {
        let padding = frame.padding;
        children
            .iter()
            .map(|size| {
                let (x, width) =
                    align(self.h_align, frame.size.x, padding.left, padding.right, size.x);
                let (y, height) =
                    align(self.v_align, frame.size.y, padding.top, padding.bottom, size.y);
                Rect::xywh(x, y, width, height)
            })
            .collect()
    }

    fn content_size(&self, frame: &LayoutFrame, children: &[Vector2<f64>]) -> Vector2<f64> {
        Vector2::new(
            max_of(children.iter().map(|s| s.x)) + frame.padding.horizontal(),
            max_of(children.iter().map(|s| s.y)) + frame.padding.vertical(),
        )
    }
}

/// Spreads children along one axis so that the first and last touch the content edges.
///
/// The gap is derived from the leftover space. A single child is centered on the primary axis
/// using the full container dimension.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JustifyLayout {
    pub direction: LayoutDirection,
    pub cross_align: Alignment,
}

impl JustifyLayout {
    pub fn new(direction: LayoutDirection, cross_align: Alignment) -> JustifyLayout {
        JustifyLayout {
            direction,
            cross_align,
        }
    }

    pub fn horizontal() -> JustifyLayout {
        JustifyLayout::new(LayoutDirection::Horizontal, Alignment::Start)
    }

    pub fn vertical() -> JustifyLayout {
        JustifyLayout::new(LayoutDirection::Vertical, Alignment::Start)
    }
}

impl Layout for JustifyLayout {
    fn layout(&self, frame: &LayoutFrame, children: &[Vector2<f64>]) -> Vec<Rect> {
        let padding = frame.padding;

        // (extent, pad start, pad end) on the primary and cross axes
        let (primary, cross) = match self.direction {
            LayoutDirection::Horizontal => (
                (frame.size.x, padding.left, padding.right),
                (frame.size.y, padding.top, padding.bottom),
            ),
            LayoutDirection::Vertical => (
                (frame.size.y, padding.top, padding.bottom),
                (frame.size.x, padding.left, padding.right),
            ),
        };
        let primary_of = |size: &Vector2<f64>| match self.direction {
            LayoutDirection::Horizontal => size.x,
            LayoutDirection::Vertical => size.y,
        };
        let cross_of = |size: &Vector2<f64>| match self.direction {
            LayoutDirection::Horizontal => size.y,
            LayoutDirection::Vertical => size.x,
        };

        let (mut position, gap) = match children {
            [] => return Vec::new(),
            [only] => ((primary.0 - primary_of(only)) / 2., 0.),
            _ => {
                let available = primary.0 - primary.1 - primary.2;
                let total: f64 = children.iter().map(primary_of).sum();
                (primary.1, (available - total) / (children.len() - 1) as f64)
            }
        };

        children
            .iter()
            .map(|size| {
                let length = primary_of(size);
                let (cross_pos, cross_len) =
                    align(self.cross_align, cross.0, cross.1, cross.2, cross_of(size));
                let rect = match self.direction {
                    LayoutDirection::Horizontal => {
                        Rect::xywh(position, cross_pos, length, cross_len)
                    }
                    LayoutDirection::Vertical => Rect::xywh(cross_pos, position, cross_len, length),
                };
                position += length + gap;
                rect
            })
            .collect()
    }

    fn content_size(&self, frame: &LayoutFrame, children: &[Vector2<f64>]) -> Vector2<f64> {
        let padding = frame.padding;
        match self.direction {
            LayoutDirection::Horizontal => Vector2::new(
                children.iter().map(|s| s.x).sum::<f64>() + padding.horizontal(),
                max_of(children.iter().map(|s| s.y)) + padding.vertical(),
            ),
            LayoutDirection::Vertical => Vector2::new(
                max_of(children.iter().map(|s| s.x)) + padding.horizontal(),
                children.iter().map(|s| s.y).sum::<f64>() + padding.vertical(),
            ),
        }
    }
}

/// Positions the owner's visible children with a layout strategy.
///
/// Children anchored by a [`ConstraintComponent`](crate::constraint::ConstraintComponent) are left
/// alone.
///
/// Recomputes at most once per invalidation, during the tree's next resolve pass.
#[derive(Debug)]
pub struct LayoutComponent {
    strategy: Box<dyn Layout>,
    dirty: bool,
    passes: usize,
    content_size: Vector2<f64>,
}

impl LayoutComponent {
    pub fn new<L: Layout>(strategy: L) -> LayoutComponent {
        LayoutComponent {
            strategy: Box::new(strategy),
            dirty: true,
            passes: 0,
            content_size: Vector2::new(0., 0.),
        }
    }

    /// The current strategy.
    pub fn strategy(&self) -> &dyn Layout {
        &*self.strategy
    }

    /// Returns the strategy if it is of type `L`.
    pub fn strategy_as<L: Layout>(&self) -> Option<&L> {
        (*self.strategy).as_any().downcast_ref()
    }

    /// Returns the strategy for modification if it is of type `L`. Marks the layout dirty.
    pub fn strategy_as_mut<L: Layout>(&mut self) -> Option<&mut L> {
        self.dirty = true;
        (*self.strategy).as_any_mut().downcast_mut()
    }

    /// Swaps the strategy out.
    pub fn set_strategy<L: Layout>(&mut self, strategy: L) {
        self.strategy = Box::new(strategy);
        self.dirty = true;
    }

    /// How many times this component has recomputed its children.
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Content size reported by the strategy during the last recompute.
    pub fn content_size(&self) -> Vector2<f64> {
        self.content_size
    }

    /// Lays out the owner's visible children right away, dirty or not.
    pub fn apply(&mut self, cx: &mut ComponentContext) {
        let frame = LayoutFrame::new(cx.size(), cx.padding());
        let children = cx.layout_children();
        let sizes: Vec<_> = children.iter().map(|child| cx.child_size(*child)).collect();
        let rects = self.strategy.layout(&frame, &sizes);

        for (child, rect) in children.iter().zip(rects) {
            cx.place_child(*child, rect);
        }

        self.content_size = self.strategy.content_size(&frame, &sizes);
        self.dirty = false;
        self.passes += 1;
        trace!(owner = ?cx.owner(), children = children.len(), "layout recomputed");
    }
}

impl Component for LayoutComponent {
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

    fn sizes(list: &[(f64, f64)]) -> Vec<Vector2<f64>> {
        list.iter().map(|(w, h)| Vector2::new(*w, *h)).collect()
    }

    #[test]
    fn vertical_stacks_with_gap() {
        let layout = VerticalLayout::new(10., Alignment::Start);
        let rects = layout.layout(&LayoutFrame::sized(200., 300.), &sizes(&[(100., 30.); 3]));
        let ys: Vec<_> = rects.iter().map(|r| r.y()).collect();
        assert_eq!(ys, vec![0., 40., 80.]);
        assert!(rects.iter().all(|r| r.x() == 0.));
    }

    #[test]
    fn vertical_center_ignores_padding() {
        let layout = VerticalLayout::new(8., Alignment::Center);
        let frame = LayoutFrame::new(Vector2::new(200., 400.), Insets::new(30., 0., 5., 5.));
        let rects = layout.layout(&frame, &sizes(&[(50., 20.), (100., 20.), (75., 20.)]));

        assert_eq!(rects[0].x(), 75.);
        assert_eq!(rects[1].x(), 50.);
        assert_eq!(rects[2].x(), 62.5);
        assert_eq!(rects[0].y(), 5.);
        assert_eq!(rects[1].y(), 33.);
        assert_eq!(rects[2].y(), 61.);
    }

    #[test]
    fn vertical_end_and_stretch() {
        let frame = LayoutFrame::sized(200., 300.);
        let children = sizes(&[(100., 30.)]);

        let end = VerticalLayout::new(0., Alignment::End).layout(&frame, &children);
        assert_eq!(end[0].x(), 100.);

        let padded = LayoutFrame::new(Vector2::new(200., 300.), Insets::uniform(10.));
        let stretch = VerticalLayout::new(0., Alignment::Stretch).layout(&padded, &children);
        assert_eq!(stretch[0], Rect::xywh(10., 10., 180., 30.));
    }

    #[test]
    fn horizontal_stacks_with_gap() {
        let layout = HorizontalLayout::new(5., Alignment::Center);
        let rects = layout.layout(&LayoutFrame::sized(300., 100.), &sizes(&[(50., 20.), (60., 40.)]));
        assert_eq!(rects[0], Rect::xywh(0., 40., 50., 20.));
        assert_eq!(rects[1], Rect::xywh(55., 30., 60., 40.));
    }

    #[test]
    fn grid_rows_and_columns() {
        let layout = GridLayout::new(3, 0., 0.);
        let rects = layout.layout(&LayoutFrame::sized(300., 400.), &sizes(&[(80., 40.); 6]));

        assert_eq!((rects[0].x(), rects[0].y()), (0., 0.));
        assert_eq!(rects[1].x(), 100.);
        assert_eq!(rects[2].x(), 200.);
        assert_eq!(rects[3].y(), 40.);
        assert_eq!(rects[4].x(), 100.);
        assert_eq!(rects[5].x(), 200.);
        assert_eq!(rects[5].size, Vector2::new(80., 40.));
    }

    #[test]
    fn grid_gaps_and_tall_rows() {
        let layout = GridLayout::new(3, 10., 15.);
        let rects = layout.layout(&LayoutFrame::sized(300., 400.), &sizes(&[(80., 40.); 6]));
        assert_eq!(rects[3].y(), 55.);

        let mixed = sizes(&[(10., 10.), (10., 60.), (10., 10.)]);
        let rects = GridLayout::new(2, 0., 0.).layout(&LayoutFrame::sized(100., 100.), &mixed);
        assert_eq!(rects[2].y(), 60.);
    }

    #[test]
    fn stack_alignments() {
        let frame = LayoutFrame::new(Vector2::new(200., 100.), Insets::uniform(10.));
        let children = sizes(&[(50., 20.)]);

        let centered = StackLayout::centered().layout(&frame, &children);
        assert_eq!(centered[0], Rect::xywh(75., 40., 50., 20.));

        let corner = StackLayout::new(Alignment::End, Alignment::End).layout(&frame, &children);
        assert_eq!(corner[0], Rect::xywh(140., 70., 50., 20.));

        let fill = StackLayout::new(Alignment::Stretch, Alignment::Start).layout(&frame, &children);
        assert_eq!(fill[0], Rect::xywh(10., 10., 180., 20.));
    }

    #[test]
    fn justify_derives_gap() {
        let layout = JustifyLayout::horizontal();
        let rects = layout.layout(&LayoutFrame::sized(220., 50.), &sizes(&[(40., 20.); 3]));
        let xs: Vec<_> = rects.iter().map(|r| r.x()).collect();
        assert_eq!(xs, vec![0., 90., 180.]);

        let rects = layout.layout(&LayoutFrame::sized(300., 50.), &sizes(&[(50., 20.); 3]));
        let xs: Vec<_> = rects.iter().map(|r| r.x()).collect();
        assert_eq!(xs, vec![0., 125., 250.]);
    }

    #[test]
    fn justify_centers_single_child() {
        let rects =
            JustifyLayout::horizontal().layout(&LayoutFrame::sized(300., 50.), &sizes(&[(50., 20.)]));
        assert_eq!(rects[0].x(), 125.);

        let rects =
            JustifyLayout::vertical().layout(&LayoutFrame::sized(50., 300.), &sizes(&[(20., 50.)]));
        assert_eq!(rects[0].y(), 125.);
    }

    #[test]
    fn content_sizes() {
        let frame = LayoutFrame::new(Vector2::new(200., 100.), Insets::uniform(5.));
        let children = sizes(&[(50., 20.), (80., 30.)]);

        let vertical = VerticalLayout::new(10., Alignment::Start).content_size(&frame, &children);
        assert_eq!(vertical, Vector2::new(90., 70.));

        let horizontal = HorizontalLayout::new(10., Alignment::Start).content_size(&frame, &children);
        assert_eq!(horizontal, Vector2::new(150., 40.));

        let empty = VerticalLayout::new(10., Alignment::Start).content_size(&frame, &[]);
        assert_eq!(empty, Vector2::new(10., 10.));
    }
}
