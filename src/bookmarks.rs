//! Bookmark management utilities built on top of `lopdf`.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document, Object, ObjectId};
use thiserror::Error;

use crate::layout::SectionMark;

/// Errors that can occur while adding an outline to a rendered report.
#[derive(Debug, Error)]
pub enum BookmarkError {
    #[error("Failed to parse PDF bytes: {0}")]
    Parse(#[from] lopdf::Error),

    #[error("PDF catalog entry is missing")]
    MissingCatalog,

    #[error("PDF catalog entry is not a dictionary")]
    InvalidCatalog,

    /// `page_number` is 1-based.
    #[error("Heading {section_index} refers to missing page {page_number} for bookmark destination")]
    MissingPage {
        section_index: usize,
        page_number: usize,
    },
}

impl From<std::io::Error> for BookmarkError {
    fn from(err: std::io::Error) -> Self {
        Self::Parse(err.into())
    }
}

/// Adds a flat outline with one entry per occupation heading.
///
/// The function opens the provided PDF bytes using `lopdf`, builds an `/Outlines`
/// dictionary, and points each entry at `/Dest [page /Fit]` for the page the
/// heading was drawn on.  Documents without headings are returned unchanged.
pub fn apply_heading_bookmarks(
    pdf_bytes: &[u8],
    headings: &[SectionMark],
) -> Result<Vec<u8>, BookmarkError> {
    if headings.is_empty() {
        return Ok(pdf_bytes.to_vec());
    }

    let mut document = Document::load_mem(pdf_bytes)?;

    let pages = document.get_pages();
    let outline_entries = collect_outline_entries(&mut document, headings, &pages)?;

    let outlines_id = document.new_object_id();
    link_outline_entries(outlines_id, &mut document, &outline_entries);

    insert_outlines_root(outlines_id, &mut document, &outline_entries)?;

    let mut buffer = Vec::new();
    document.save_to(&mut buffer).map_err(BookmarkError::from)?;
    Ok(buffer)
}

struct OutlineEntry {
    object_id: ObjectId,
    page_ref: ObjectId,
    title: String,
}

fn collect_outline_entries(
    document: &mut Document,
    headings: &[SectionMark],
    pages: &BTreeMap<u32, ObjectId>,
) -> Result<Vec<OutlineEntry>, BookmarkError> {
    headings
        .iter()
        .enumerate()
        .map(|(index, heading)| {
            let page_ref = u32::try_from(heading.page)
                .ok()
                .and_then(|page| pages.get(&page).copied())
                .ok_or(BookmarkError::MissingPage {
                    section_index: index,
                    page_number: heading.page,
                })?;

            Ok(OutlineEntry {
                object_id: document.new_object_id(),
                page_ref,
                title: heading.title.clone(),
            })
        })
        .collect()
}

fn link_outline_entries(
    outlines_id: ObjectId,
    document: &mut Document,
    entries: &[OutlineEntry],
) {
    for (index, entry) in entries.iter().enumerate() {
        let mut dictionary = Dictionary::new();
        dictionary.set("Title", Object::string_literal(entry.title.as_str()));
        dictionary.set(
            "Dest",
            Object::Array(vec![
                Object::Reference(entry.page_ref),
                Object::Name("Fit".into()),
            ]),
        );
        dictionary.set("Parent", Object::Reference(outlines_id));

        if let Some(previous) = index.checked_sub(1).and_then(|prev| entries.get(prev)) {
            dictionary.set("Prev", Object::Reference(previous.object_id));
        }
        if let Some(next) = entries.get(index + 1) {
            dictionary.set("Next", Object::Reference(next.object_id));
        }

        document
            .objects
            .insert(entry.object_id, Object::Dictionary(dictionary));
    }
}

fn insert_outlines_root(
    outlines_id: ObjectId,
    document: &mut Document,
    entries: &[OutlineEntry],
) -> Result<(), BookmarkError> {
    let catalog_id = document
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| BookmarkError::MissingCatalog)?;

    let mut outlines = Dictionary::new();
    outlines.set("Type", Object::Name("Outlines".into()));
    outlines.set("Count", Object::Integer(entries.len() as i64));
    if let (Some(first), Some(last)) = (entries.first(), entries.last()) {
        outlines.set("First", Object::Reference(first.object_id));
        outlines.set("Last", Object::Reference(last.object_id));
    }
    document
        .objects
        .insert(outlines_id, Object::Dictionary(outlines));

    document
        .objects
        .get_mut(&catalog_id)
        .ok_or(BookmarkError::MissingCatalog)?
        .as_dict_mut()
        .map_err(|_| BookmarkError::InvalidCatalog)?
        .set("Outlines", Object::Reference(outlines_id));

    Ok(())
}
