//! Row/column window requested by the caller.

use serde::{Deserialize, Serialize};

/// Public default for the number of rows materialized per call.
pub const DEFAULT_MAX_ROWS: usize = 50;

/// Caller-facing window. Bounds are 1-based and inclusive; omitted bounds
/// mean "from the start" / "to the end".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceOptions {
    #[serde(default, alias = "startRow")]
    pub start_row: Option<i64>,
    #[serde(default, alias = "endRow")]
    pub end_row: Option<i64>,
    #[serde(default, alias = "startCol")]
    pub start_col: Option<i64>,
    #[serde(default, alias = "endCol")]
    pub end_col: Option<i64>,
    #[serde(default, alias = "maxRows")]
    pub max_rows: Option<usize>,
}

impl SliceOptions {
    pub fn rows(mut self, start: i64, end: i64) -> Self {
        self.start_row = Some(start);
        self.end_row = Some(end);
        self
    }

    pub fn cols(mut self, start: i64, end: i64) -> Self {
        self.start_col = Some(start);
        self.end_col = Some(end);
        self
    }

    pub fn max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }

    /// Resolve to 0-based inclusive bounds, using `default_max_rows` when
    /// the caller gave no cap.
    pub fn bounds(&self, default_max_rows: usize) -> WindowBounds {
        let (start_row, end_row) = zero_based(self.start_row, self.end_row);
        let (start_col, end_col) = zero_based(self.start_col, self.end_col);
        WindowBounds {
            start_row,
            end_row,
            start_col,
            end_col,
            max_rows: self.max_rows.unwrap_or(default_max_rows),
        }
    }
}

fn zero_based(start: Option<i64>, end: Option<i64>) -> (usize, Option<usize>) {
    let start_idx = start.map_or(0, to_index);
    let end_idx = end.map(|e| to_index(e).max(start_idx));
    (start_idx, end_idx)
}

/// 1-based position to 0-based index, clamped to the first row or column.
fn to_index(position: i64) -> usize {
    if position <= 1 {
        return 0;
    }
    usize::try_from(position - 1).unwrap_or(usize::MAX)
}

/// 0-based inclusive window plus the materialization cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowBounds {
    pub start_row: usize,
    pub end_row: Option<usize>,
    pub start_col: usize,
    pub end_col: Option<usize>,
    pub max_rows: usize,
}

impl WindowBounds {
    pub fn is_before_rows(&self, row: usize) -> bool {
        row < self.start_row
    }

    pub fn is_past_rows(&self, row: usize) -> bool {
        self.end_row.is_some_and(|end| row > end)
    }

    pub fn contains_col(&self, col: usize) -> bool {
        col >= self.start_col && self.end_col.is_none_or(|end| col <= end)
    }
}
