//! Report construction helpers.
//!
//! [`ReportBuilder`] wires the layout engine to a [`PdfCanvas`] and writes `<name>.pdf`.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::elements::{DefaultImageResolver, ImageResolver};
use crate::error::RenderError;
use crate::grouping::GroupedRecords;
use crate::layout::{LayoutEngine, LayoutSummary};
use crate::pdf::PdfCanvas;

/// Title drawn at the top of the first page.
pub const DEFAULT_TITLE: &str = "The Super Heroes API - DC Comics";

/// Base name of the output file.
pub const DEFAULT_FILE_NAME: &str = "super_heroes";

/// A rendered report.
pub struct RenderedReport {
    pub bytes: Vec<u8>,
    pub summary: LayoutSummary,
}

/// Builder for superhero reports pre-configured with the crate defaults.
pub struct ReportBuilder {
    file_name: String,
    title: String,
    output_dir: Option<PathBuf>,
    resolver: Option<Box<dyn ImageResolver>>,
    #[cfg(feature = "bookmarks")]
    bookmarks: bool,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_FILE_NAME)
    }
}

impl ReportBuilder {
    /// Creates a builder writing `<file_name>.pdf`.
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            title: DEFAULT_TITLE.to_string(),
            output_dir: None,
            resolver: None,
            #[cfg(feature = "bookmarks")]
            bookmarks: true,
        }
    }

    /// Sets the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Writes the report into `dir` instead of the working directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Replaces the default HTTP/filesystem image resolver.
    pub fn with_image_resolver(mut self, resolver: impl ImageResolver + 'static) -> Self {
        self.resolver = Some(Box::new(resolver));
        self
    }

    /// Enables or disables the outline entries for occupation headings.
    #[cfg(feature = "bookmarks")]
    pub fn with_bookmarks(mut self, bookmarks: bool) -> Self {
        self.bookmarks = bookmarks;
        self
    }

    /// Path the report is written to.
    pub fn output_path(&self) -> PathBuf {
        let file = format!("{}.pdf", self.file_name);
        match &self.output_dir {
            Some(dir) => dir.join(file),
            None => PathBuf::from(file),
        }
    }

    /// Lays out `groups` and returns the document bytes.
    pub fn render(self, groups: &GroupedRecords) -> Result<RenderedReport, RenderError> {
        let resolver: Box<dyn ImageResolver> = match self.resolver {
            Some(resolver) => resolver,
            None => Box::new(DefaultImageResolver::new()?),
        };

        let mut canvas = PdfCanvas::new(&self.title, resolver)?;
        let summary = LayoutEngine::new()
            .with_title(self.title.as_str())
            .layout(groups, &mut canvas);
        let bytes = canvas.into_bytes()?;

        #[cfg(feature = "bookmarks")]
        let bytes = if self.bookmarks {
            crate::bookmarks::apply_heading_bookmarks(&bytes, &summary.sections)?
        } else {
            bytes
        };

        Ok(RenderedReport { bytes, summary })
    }

    /// Renders the report and writes it to [`ReportBuilder::output_path`].
    pub fn write(self, groups: &GroupedRecords) -> Result<(PathBuf, LayoutSummary), RenderError> {
        let path = self.output_path();
        let report = self.render(groups)?;
        write_file(&path, &report.bytes)?;
        info!(
            "Created Superheroes PDF '{}' ({} pages, {} heroes)",
            path.display(),
            report.summary.pages,
            report.summary.heroes
        );
        Ok((path, report.summary))
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), RenderError> {
    fs::write(path, bytes).map_err(|source| RenderError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_appends_extension() {
        assert_eq!(
            ReportBuilder::default().output_path(),
            PathBuf::from("super_heroes.pdf")
        );
        assert_eq!(
            ReportBuilder::new("dc").with_output_dir("out").output_path(),
            Path::new("out").join("dc.pdf")
        );
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let err = write_file(Path::new("/__superhero_pdf_missing__/report.pdf"), b"%PDF")
            .unwrap_err();
        assert!(matches!(err, RenderError::Write { .. }));
    }
}
