//! [`Canvas`] implementation that writes a PDF with `printpdf`.
//!
//! Text uses the built-in Helvetica faces.  Pages are created lazily: a page break only takes
//! effect once something is drawn, so a break after the last hero does not leave a blank page.

use std::io::BufWriter;

use image::DynamicImage;
use log::warn;
use printpdf::{
    BuiltinFont, Image, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point,
};

use crate::canvas::{Canvas, FontStyle};
use crate::elements::{natural_size_mm, ImageResolver};
use crate::error::RenderError;
use crate::layout::{PAGE_TOP, PAGE_WIDTH};
use crate::paragraph::{self, ParagraphStyle};
use crate::richtext::{self, Inline, Span};

const LAYER_NAME: &str = "Layer 1";
const MM_PER_INCH: f64 = 25.4;
const POINTS_PER_INCH: f64 = 72.0;
const IMAGE_DPI: f64 = 300.0;

fn mm(points: f64) -> Mm {
    Mm(points * MM_PER_INCH / POINTS_PER_INCH)
}

/// A PDF document under construction.
pub struct PdfCanvas {
    document: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    resolver: Box<dyn ImageResolver>,
    paragraph_style: ParagraphStyle,
    pages: usize,
    pending_page: bool,
}

impl PdfCanvas {
    /// Opens a new US Letter document titled `title`.
    pub fn new(title: &str, resolver: Box<dyn ImageResolver>) -> Result<Self, RenderError> {
        let (document, page, layer) =
            PdfDocument::new(title, mm(PAGE_WIDTH), mm(PAGE_TOP), LAYER_NAME);
        let regular = document
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(RenderError::pdf)?;
        let bold = document
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(RenderError::pdf)?;
        let layer = document.get_page(page).get_layer(layer);

        Ok(Self {
            document,
            layer,
            regular,
            bold,
            resolver,
            paragraph_style: ParagraphStyle::default(),
            pages: 1,
            pending_page: false,
        })
    }

    /// Number of pages created so far.
    pub fn page_count(&self) -> usize {
        self.pages
    }

    /// Serializes the document.
    pub fn into_bytes(self) -> Result<Vec<u8>, RenderError> {
        let mut writer = BufWriter::new(Vec::new());
        self.document
            .save(&mut writer)
            .map_err(RenderError::pdf)?;
        writer
            .into_inner()
            .map_err(|err| RenderError::Io(err.into_error()))
    }

    fn font(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
        }
    }

    fn current_layer(&mut self) -> PdfLayerReference {
        if self.pending_page {
            let (page, layer) = self
                .document
                .add_page(mm(PAGE_WIDTH), mm(PAGE_TOP), LAYER_NAME);
            self.layer = self.document.get_page(page).get_layer(layer);
            self.pages += 1;
            self.pending_page = false;
        }
        self.layer.clone()
    }

    fn parse_or_plain(markup: &str) -> Vec<Inline> {
        richtext::parse_markup(markup).unwrap_or_else(|err| {
            warn!("Drawing paragraph as plain text, markup is invalid: {err}");
            vec![Inline::Text(Span::new(markup))]
        })
    }

    fn place_image(&mut self, image: DynamicImage, x: f64, y: f64, width: f64, height: f64) {
        let image = DynamicImage::ImageRgb8(image.to_rgb8());
        let (natural_width, natural_height) = natural_size_mm(&image, IMAGE_DPI);
        if natural_width <= f64::EPSILON || natural_height <= f64::EPSILON {
            return;
        }

        let scale_x = mm(width).0 / natural_width;
        let scale_y = mm(height).0 / natural_height;
        let layer = self.current_layer();
        Image::from_dynamic_image(&image).add_to_layer(
            layer,
            Some(mm(x)),
            Some(mm(y)),
            None,
            Some(scale_x),
            Some(scale_y),
            Some(IMAGE_DPI),
        );
    }
}

impl Canvas for PdfCanvas {
    fn new_page(&mut self) {
        self.pending_page = true;
    }

    fn draw_text(&mut self, x: f64, y: f64, text: &str, font: FontStyle, size: f64) {
        let layer = self.current_layer();
        layer.use_text(text, size, mm(x), mm(y), self.font(font));
    }

    fn draw_paragraph(
        &mut self,
        markup: &str,
        x: f64,
        y: f64,
        max_width: f64,
        max_height: f64,
    ) -> f64 {
        let items = Self::parse_or_plain(markup);
        let style = self.paragraph_style;
        let wrapped = paragraph::wrap(&items, max_width, max_height, &style);

        let layer = self.current_layer();
        for (index, line) in wrapped.lines.iter().enumerate() {
            let baseline = y - style.font_size - index as f64 * style.leading;
            for segment in &line.segments {
                layer.use_text(
                    segment.text.as_str(),
                    style.font_size,
                    mm(x + segment.x_offset),
                    mm(baseline),
                    self.font(segment.font),
                );
            }
        }

        wrapped.height()
    }

    fn draw_image(&mut self, reference: &str, x: f64, y: f64, width: f64, height: f64) {
        match self.resolver.resolve(reference) {
            Ok(image) => self.place_image(image, x, y, width, height),
            Err(err) => warn!("Skipping image: {err}"),
        }
    }

    fn draw_line(&mut self, x1: f64, x2: f64, y: f64) {
        let layer = self.current_layer();
        layer.add_shape(Line {
            points: vec![
                (Point::new(mm(x1), mm(y)), false),
                (Point::new(mm(x2), mm(y)), false),
            ],
            is_closed: false,
            has_fill: false,
            has_stroke: true,
            is_clipping_path: false,
        });
    }
}
