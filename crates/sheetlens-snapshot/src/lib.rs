//! # Sheetlens Snapshot
//!
//! Reads the spreadsheet application's in-page data model and turns it into
//! a windowed, rectangular table.
//!
//! ## Pipeline
//!
//! ```text
//! PageCapture ──► locate_bootstrap ──► BootstrapParser ──► decode_grid ──► render_markdown
//!                  (script text)        (snapshot JSON)     (cells, window)   (pipe table)
//! ```
//!
//! Decoding is a single pass over the snapshot's chunks: the row/column
//! window is applied while chunks are decoded, and the true number of
//! matching rows is still counted past the `max_rows` cap.
//!
//! ## Failure model
//!
//! - Missing script, undecodable assignment, or a snapshot without
//!   `changes.firstchunk` abort the call with a [`SnapshotError`].
//! - A single malformed chunk is skipped.
//! - Cell decoding never fails; unknown shapes become `""`.

pub mod bootstrap;
pub mod cell;
pub mod coords;
pub mod document;
mod error;
pub mod grid;
pub mod locator;
pub mod normalize;
mod reader;
pub mod render;
pub mod slice;

pub use bootstrap::{BootstrapParser, ExtractStrategy, Extracted, JsonParseCall, ObjectLiteral};
pub use cell::{CellValue, decode_block, decode_cell};
pub use coords::{column_index, column_letters, parse_a1, to_a1};
pub use document::{PageCapture, PageDocument, ScriptSource};
pub use error::{ChunkError, ErrorKind, SnapshotError};
pub use grid::{GridSlice, decode_grid};
pub use locator::{
    DEFAULT_BODY_CHILD_INDEX, DEFAULT_COMPANION_MARKER, DEFAULT_SNAPSHOT_VARIABLE, LocatorMarkers,
    locate_bootstrap,
};
pub use normalize::normalize_row;
pub use reader::{NO_DATA_MESSAGE, SheetContent, SnapshotReader};
pub use render::render_markdown;
pub use slice::{DEFAULT_MAX_ROWS, SliceOptions, WindowBounds};
