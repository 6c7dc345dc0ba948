//! Places grouped heroes on fixed-size pages.
//!
//! The engine walks the groups in order and keeps a [`LayoutCursor`]: the vertical position on
//! the current page (PDF points from the bottom edge) and the number of page items placed so far.
//! A page item is either a shared-occupation heading or a hero.  Once a page holds
//! [`MAX_PAGE_ITEMS`] items the engine asks the canvas for a new page and resets the cursor.
//!
//! Every hero occupies a fixed image slot.  Its four info paragraphs are drawn beside the image
//! and move the cursor by whatever height the canvas reports, but the cursor snaps back to the
//! bottom of the image slot afterwards, so the image alone decides how far each hero advances.

use crate::canvas::{Canvas, FontStyle};
use crate::grouping::{is_shared_occupation, GroupedRecords};
use crate::model::HeroRecord;
use crate::richtext::escape_markup;

/// Points per inch.
pub const INCH: f64 = 72.0;

/// Height of a page and initial cursor position.
pub const PAGE_TOP: f64 = 11.0 * INCH;

/// Page width (US Letter).
pub const PAGE_WIDTH: f64 = 8.5 * INCH;

/// Left edge of headings, separators and ungrouped images.
pub const HEADING_MARGIN: f64 = INCH;

/// Left edge of info paragraphs outside a shared-occupation group.
pub const INFO_MARGIN: f64 = 2.5 * INCH;

/// Extra indentation of images and info paragraphs inside a shared-occupation group.
pub const GROUP_INDENT: f64 = INCH / 2.0;

/// Vertical slot reserved for each hero's thumbnail.
pub const IMAGE_SLOT: f64 = 640.0 / 5.0;

/// Thumbnail size.
pub const IMAGE_WIDTH: f64 = 480.0 / 5.0;
pub const IMAGE_HEIGHT: f64 = 640.0 / 5.0;

/// The thumbnail sits this far above the bottom of its slot.
pub const IMAGE_RAISE: f64 = 20.0;

/// Box info paragraphs are wrapped into.
pub const PARAGRAPH_WIDTH: f64 = 5.0 * INCH;
pub const PARAGRAPH_MAX_HEIGHT: f64 = 11.0 * INCH;

/// Gap added below every info paragraph.
pub const PARAGRAPH_GAP: f64 = 12.0;

/// Cursor advance after a heading.
pub const HEADING_ADVANCE: f64 = INCH / 2.0;

/// Cursor advance after a group separator.
pub const SEPARATOR_ADVANCE: f64 = INCH / 4.0;

/// Cursor advance after every hero.
pub const ENTRY_GAP: f64 = INCH / 4.0;

/// Length of the group separator.
pub const SEPARATOR_WIDTH: f64 = 6.5 * INCH;

pub const TITLE_FONT_SIZE: f64 = 18.0;
pub const GROUP_HEADING_FONT_SIZE: f64 = 16.0;

/// Page items allowed on one page.
pub const MAX_PAGE_ITEMS: usize = 5;

/// Position of the engine on the current page.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutCursor {
    /// Vertical position in points from the bottom edge.
    pub bottom: f64,
    /// Headings and heroes placed on the current page.
    pub page_items: usize,
    /// 1-based index of the current page.
    pub page: usize,
    /// Whether anything was drawn on the current page.
    pub page_has_content: bool,
    /// Font of the last text line drawn.
    pub font: FontStyle,
    /// Size of the last text line drawn.
    pub font_size: f64,
}

impl Default for LayoutCursor {
    fn default() -> Self {
        Self {
            bottom: PAGE_TOP,
            page_items: 0,
            page: 1,
            page_has_content: false,
            font: FontStyle::Regular,
            font_size: TITLE_FONT_SIZE,
        }
    }
}

impl LayoutCursor {
    fn next_page(&mut self) {
        *self = Self {
            page: self.page + 1,
            ..Self::default()
        };
    }
}

/// Page on which a shared-occupation heading was drawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionMark {
    pub title: String,
    pub page: usize,
}

/// What a layout run produced.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutSummary {
    /// Pages that received content.
    pub pages: usize,
    /// Page breaks signalled to the canvas.
    pub page_breaks: usize,
    /// Heroes placed.
    pub heroes: usize,
    /// Shared-occupation headings in drawing order.
    pub sections: Vec<SectionMark>,
    /// Cursor state after the last hero.
    pub cursor: LayoutCursor,
}

/// Lays out grouped heroes onto a [`Canvas`].
///
/// The engine holds no state between runs; laying out the same groups twice produces the same
/// sequence of canvas calls.
#[derive(Clone, Debug, Default)]
pub struct LayoutEngine {
    title: Option<String>,
}

impl LayoutEngine {
    /// Creates an engine without a document title.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws `title` at the top of the first page.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Lays out every group in order.
    pub fn layout<C: Canvas + ?Sized>(
        &self,
        groups: &GroupedRecords,
        canvas: &mut C,
    ) -> LayoutSummary {
        let mut run = LayoutRun {
            canvas,
            cursor: LayoutCursor::default(),
            page_breaks: 0,
            heroes: 0,
            sections: Vec::new(),
            last_content_page: 0,
        };

        if let Some(title) = &self.title {
            run.draw_heading(title, TITLE_FONT_SIZE);
        }

        for (key, members) in groups.iter() {
            run.place_group(key, members);
        }

        LayoutSummary {
            pages: run.last_content_page,
            page_breaks: run.page_breaks,
            heroes: run.heroes,
            sections: run.sections,
            cursor: run.cursor,
        }
    }
}

struct LayoutRun<'a, C: Canvas + ?Sized> {
    canvas: &'a mut C,
    cursor: LayoutCursor,
    page_breaks: usize,
    heroes: usize,
    sections: Vec<SectionMark>,
    last_content_page: usize,
}

impl<C: Canvas + ?Sized> LayoutRun<'_, C> {
    fn place_group(&mut self, key: &str, members: &[HeroRecord]) {
        let shared = is_shared_occupation(key, members);
        let mut info_x = INFO_MARGIN;
        let mut image_x = HEADING_MARGIN;

        if shared {
            // A heading needs room for at least one member on the same page.
            if self.cursor.page_items + 2 > MAX_PAGE_ITEMS {
                self.break_page();
            }
            info_x += GROUP_INDENT;
            image_x += GROUP_INDENT;
            self.sections.push(SectionMark {
                title: key.to_string(),
                page: self.cursor.page,
            });
            self.draw_heading(key, GROUP_HEADING_FONT_SIZE);
            self.cursor.page_items += 1;
        }

        for (index, hero) in members.iter().enumerate() {
            self.place_hero(hero, image_x, info_x);

            if shared && index + 1 == members.len() {
                self.canvas.draw_line(
                    HEADING_MARGIN,
                    HEADING_MARGIN + SEPARATOR_WIDTH,
                    self.cursor.bottom,
                );
                self.cursor.bottom -= SEPARATOR_ADVANCE;
            }

            self.cursor.bottom -= ENTRY_GAP;

            if self.cursor.page_items >= MAX_PAGE_ITEMS {
                self.break_page();
            }
        }
    }

    fn place_hero(&mut self, hero: &HeroRecord, image_x: f64, info_x: f64) {
        self.cursor.page_items += 1;
        self.heroes += 1;
        self.mark_content();

        let image_bottom = self.cursor.bottom - IMAGE_SLOT;
        self.canvas.draw_image(
            hero.image_ref(),
            image_x,
            image_bottom + IMAGE_RAISE,
            IMAGE_WIDTH,
            IMAGE_HEIGHT,
        );

        for (label, value) in hero_fields(hero) {
            self.draw_info_paragraph(label, &value, info_x);
        }

        self.cursor.bottom = image_bottom;
    }

    fn draw_heading(&mut self, text: &str, size: f64) {
        self.mark_content();
        self.canvas
            .draw_text(HEADING_MARGIN, self.cursor.bottom, text, FontStyle::Regular, size);
        self.cursor.font = FontStyle::Regular;
        self.cursor.font_size = size;
        self.cursor.bottom -= HEADING_ADVANCE;
    }

    fn draw_info_paragraph(&mut self, label: &str, value: &str, x: f64) {
        let markup = info_markup(label, value);
        let height = self.canvas.draw_paragraph(
            &markup,
            x,
            self.cursor.bottom,
            PARAGRAPH_WIDTH,
            PARAGRAPH_MAX_HEIGHT,
        );
        self.cursor.bottom -= height + PARAGRAPH_GAP;
    }

    fn break_page(&mut self) {
        self.canvas.new_page();
        self.page_breaks += 1;
        self.cursor.next_page();
    }

    fn mark_content(&mut self) {
        self.cursor.page_has_content = true;
        self.last_content_page = self.cursor.page;
    }
}

/// The four labelled fields shown next to each hero, in drawing order.
pub fn hero_fields(hero: &HeroRecord) -> [(&'static str, String); 4] {
    [
        ("Full name", hero.full_name().to_string()),
        ("Alter Egos", hero.alter_egos().join(", ")),
        ("Aliases", hero.aliases().join(", ")),
        ("Place of Birth", hero.place_of_birth().to_string()),
    ]
}

/// Builds the paragraph markup for one labelled field.
pub fn info_markup(label: &str, value: &str) -> String {
    let value = escape_markup(value).replace('\n', "<br />");
    format!("<b>{}:</b> {}", escape_markup(label), value)
}
