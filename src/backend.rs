//! Traits for rendering backends.

use crate::color::Color;
use crate::rect::Rect;
use cgmath::Point2;

/// An opaque texture reference owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// Texture coordinates for a textured quad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvRect {
    pub min: Point2<f64>,
    pub max: Point2<f64>,
}

impl Default for UvRect {
    fn default() -> Self {
        UvRect {
            min: Point2::new(0., 0.),
            max: Point2::new(1., 1.),
        }
    }
}

/// A rendering backend.
///
/// The tree hands one of these to every widget and component while rendering. All rectangles are
/// in window space.
pub trait Renderer {
    /// Draws a filled rectangle.
    fn submit_quad(&mut self, rect: Rect, color: Color);

    /// Draws a textured rectangle, tinted by `color`.
    fn submit_textured_quad(&mut self, rect: Rect, color: Color, uv: UvRect, texture: TextureId);

    /// Draws a line segment.
    fn submit_line(&mut self, from: Point2<f64>, to: Point2<f64>, thickness: f64, color: Color);

    /// Draws a run of text with its top left corner at `origin`.
    fn submit_text(&mut self, text: &str, origin: Point2<f64>, size: f64, color: Color);

    /// Restricts drawing to `rect` (intersected with the current clip) until the matching
    /// `pop_scissor`.
    fn push_scissor(&mut self, rect: Rect);

    /// Restores the clip that was active before the last `push_scissor`.
    fn pop_scissor(&mut self);
}

/// A recorded draw command.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Quad {
        rect: Rect,
        color: Color,
        clip: Option<Rect>,
    },
    TexturedQuad {
        rect: Rect,
        color: Color,
        uv: UvRect,
        texture: TextureId,
        clip: Option<Rect>,
    },
    Line {
        from: Point2<f64>,
        to: Point2<f64>,
        thickness: f64,
        color: Color,
        clip: Option<Rect>,
    },
    Text {
        text: String,
        origin: Point2<f64>,
        size: f64,
        color: Color,
        clip: Option<Rect>,
    },
}

impl DrawCommand {
    /// The clip rectangle that was active when this command was recorded.
    pub fn clip(&self) -> Option<Rect> {
        match self {
            DrawCommand::Quad { clip, .. }
            | DrawCommand::TexturedQuad { clip, .. }
            | DrawCommand::Line { clip, .. }
            | DrawCommand::Text { clip, .. } => *clip,
        }
    }
}

/// A renderer that records commands instead of drawing them.
///
/// Useful for batching backends (which sort the list before submitting it) and for tests.
#[derive(Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
    scissors: Vec<Rect>,
}

impl DrawList {
    pub fn new() -> DrawList {
        DrawList::default()
    }

    /// Returns all recorded commands in submission order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Takes the recorded commands out, leaving the list empty.
    pub fn drain(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// The current clip rectangle, if any.
    pub fn current_scissor(&self) -> Option<Rect> {
        self.scissors.last().copied()
    }

    /// Current depth of the scissor stack.
    pub fn scissor_depth(&self) -> usize {
        self.scissors.len()
    }

    /// Returns all quads, in order.
    pub fn quads(&self) -> impl Iterator<Item = (Rect, Color)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Quad { rect, color, .. } => Some((*rect, *color)),
            _ => None,
        })
    }
}

impl Renderer for DrawList {
    fn submit_quad(&mut self, rect: Rect, color: Color) {
        let clip = self.current_scissor();
        self.commands.push(DrawCommand::Quad { rect, color, clip });
    }

    fn submit_textured_quad(&mut self, rect: Rect, color: Color, uv: UvRect, texture: TextureId) {
        let clip = self.current_scissor();
        self.commands.push(DrawCommand::TexturedQuad {
            rect,
            color,
            uv,
            texture,
            clip,
        });
    }

    fn submit_line(&mut self, from: Point2<f64>, to: Point2<f64>, thickness: f64, color: Color) {
        let clip = self.current_scissor();
        self.commands.push(DrawCommand::Line {
            from,
            to,
            thickness,
            color,
            clip,
        });
    }

    fn submit_text(&mut self, text: &str, origin: Point2<f64>, size: f64, color: Color) {
        let clip = self.current_scissor();
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            origin,
            size,
            color,
            clip,
        });
    }

    fn push_scissor(&mut self, rect: Rect) {
        // nested scissors can only shrink the visible area
        let clip = match self.current_scissor() {
            Some(current) => current
                .intersect(rect)
                .unwrap_or_else(|| rect.with_size(cgmath::Vector2::new(0., 0.))),
            None => rect,
        };
        self.scissors.push(clip);
    }

    fn pop_scissor(&mut self) {
        self.scissors.pop();
    }
}
