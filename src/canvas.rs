//! The drawing surface the layout engine writes to.
//!
//! Coordinates are PDF points with the origin in the bottom-left corner of the page.  A
//! [`Canvas`] only has to place what it is told; all page-break decisions are made by
//! [`crate::layout::LayoutEngine`].

/// Font faces available to the layout engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontStyle {
    #[default]
    Regular,
    Bold,
}

/// Rendering backend used by the layout engine.
pub trait Canvas {
    /// Finishes the current page and starts a new one.
    fn new_page(&mut self);

    /// Draws a single line of text with its baseline at `(x, y)`.
    fn draw_text(&mut self, x: f64, y: f64, text: &str, font: FontStyle, size: f64);

    /// Draws wrapped paragraph markup whose top edge sits at `(x, y)`.
    ///
    /// Returns the height the paragraph occupied after wrapping to `max_width`.
    fn draw_paragraph(&mut self, markup: &str, x: f64, y: f64, max_width: f64, max_height: f64)
        -> f64;

    /// Draws the image behind `reference` with its bottom-left corner at `(x, y)`.
    fn draw_image(&mut self, reference: &str, x: f64, y: f64, width: f64, height: f64);

    /// Draws a horizontal rule from `x1` to `x2` at height `y`.
    fn draw_line(&mut self, x1: f64, x2: f64, y: f64);
}

/// A single recorded drawing call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    NewPage,
    Text {
        x: f64,
        y: f64,
        text: String,
        font: FontStyle,
        size: f64,
    },
    Paragraph {
        markup: String,
        x: f64,
        y: f64,
        max_width: f64,
        height: f64,
    },
    Image {
        reference: String,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Line {
        x1: f64,
        x2: f64,
        y: f64,
    },
}

/// Canvas that records every call instead of producing a document.
///
/// Paragraph heights are simulated as one line of `line_height` per `<br />` separated line, so
/// the cursor arithmetic of the engine can be checked without a PDF backend.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordingCanvas {
    ops: Vec<DrawOp>,
    line_height: f64,
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self::new(12.0)
    }
}

impl RecordingCanvas {
    /// Creates an empty recording with the given simulated line height.
    pub fn new(line_height: f64) -> Self {
        Self {
            ops: Vec::new(),
            line_height,
        }
    }

    /// Returns the recorded operations in call order.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Consumes the canvas and returns the recorded operations.
    pub fn into_ops(self) -> Vec<DrawOp> {
        self.ops
    }

    /// Number of page breaks recorded so far.
    pub fn page_breaks(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::NewPage))
            .count()
    }
}

impl Canvas for RecordingCanvas {
    fn new_page(&mut self) {
        self.ops.push(DrawOp::NewPage);
    }

    fn draw_text(&mut self, x: f64, y: f64, text: &str, font: FontStyle, size: f64) {
        self.ops.push(DrawOp::Text {
            x,
            y,
            text: text.to_string(),
            font,
            size,
        });
    }

    fn draw_paragraph(
        &mut self,
        markup: &str,
        x: f64,
        y: f64,
        max_width: f64,
        max_height: f64,
    ) -> f64 {
        let lines = markup.matches("<br />").count() + 1;
        let height = (lines as f64 * self.line_height).min(max_height);
        self.ops.push(DrawOp::Paragraph {
            markup: markup.to_string(),
            x,
            y,
            max_width,
            height,
        });
        height
    }

    fn draw_image(&mut self, reference: &str, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(DrawOp::Image {
            reference: reference.to_string(),
            x,
            y,
            width,
            height,
        });
    }

    fn draw_line(&mut self, x1: f64, x2: f64, y: f64) {
        self.ops.push(DrawOp::Line { x1, x2, y });
    }
}
