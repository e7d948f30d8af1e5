//! End-to-end extraction: page capture in, windowed table out.

use serde::Serialize;

use crate::bootstrap::BootstrapParser;
use crate::document::PageCapture;
use crate::error::SnapshotError;
use crate::grid::decode_grid;
use crate::locator::{LocatorMarkers, locate_bootstrap};
use crate::render::render_markdown;
use crate::slice::{DEFAULT_MAX_ROWS, SliceOptions};

/// Message returned when the window matched nothing.
pub const NO_DATA_MESSAGE: &str = "No data in the specified range.";

/// Result of one extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetContent {
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
    pub truncated: bool,
    pub markdown: String,
    #[serde(skip)]
    pub max_rows: usize,
}

impl SheetContent {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Human-readable report: header line, table, and a note when capped.
    pub fn summary(&self) -> String {
        if self.total_rows == 0 {
            return NO_DATA_MESSAGE.to_string();
        }

        let mut out = format!("Sheet content ({} rows matched):", self.total_rows);
        if !self.markdown.is_empty() {
            out.push_str("\n\n");
            out.push_str(&self.markdown);
        }
        if self.truncated {
            out.push_str(&format!(
                "\n\n(Showing first {} of {} rows; max_rows = {}. \
                 Narrow the range or raise max_rows to see more.)",
                self.rows.len(),
                self.total_rows,
                self.max_rows
            ));
        }
        out
    }
}

/// Reads spreadsheet content out of a captured page.
///
/// Stateless apart from configuration; one reader can serve any number of
/// concurrent calls.
pub struct SnapshotReader {
    markers: LocatorMarkers,
    parser: BootstrapParser,
    default_max_rows: usize,
}

impl Default for SnapshotReader {
    fn default() -> Self {
        Self::new(LocatorMarkers::default())
    }
}

impl SnapshotReader {
    pub fn new(markers: LocatorMarkers) -> Self {
        Self {
            markers,
            parser: BootstrapParser::new(),
            default_max_rows: DEFAULT_MAX_ROWS,
        }
    }

    /// Cap applied when a call does not pass `max_rows`.
    pub fn with_default_max_rows(mut self, max_rows: usize) -> Self {
        self.default_max_rows = max_rows;
        self
    }

    pub fn with_parser(mut self, parser: BootstrapParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn markers(&self) -> &LocatorMarkers {
        &self.markers
    }

    pub fn default_max_rows(&self) -> usize {
        self.default_max_rows
    }

    pub fn read(
        &self,
        capture: &PageCapture,
        options: &SliceOptions,
    ) -> Result<SheetContent, SnapshotError> {
        let script = locate_bootstrap(&capture.document, &self.markers);
        let snapshot = self
            .parser
            .parse(script, capture.snapshot.as_ref(), &self.markers.variable)?;

        let bounds = options.bounds(self.default_max_rows);
        let grid = decode_grid(&snapshot, &bounds)?;
        let markdown = render_markdown(&grid.rows);

        Ok(SheetContent {
            rows: grid.rows,
            total_rows: grid.total_rows,
            truncated: grid.truncated,
            markdown,
            max_rows: bounds.max_rows,
        })
    }
}
