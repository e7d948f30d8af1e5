//! Chunk decoding fused with windowing.
//!
//! The snapshot keeps the grid under `changes.firstchunk` as a list of
//! `[chunkId, payload]` entries. `payload` is a JSON string that decodes to
//! `[meta, ..., flatCells]`:
//!
//! - `meta[1]` first row, `meta[3]` first column, `meta[4]` columns per row;
//! - `flatCells` holds `colCount` column blocks per row, row-major.
//!
//! Chunks are walked once, in stored order, applying the window as they are
//! decoded so that large sheets are never materialized in full.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};

use crate::cell::decode_block;
use crate::error::{ChunkError, SnapshotError};
use crate::normalize::normalize_row;
use crate::slice::WindowBounds;

const META_ROW_START: usize = 1;
const META_COL_START: usize = 3;
const META_COL_COUNT: usize = 4;

/// Rows matching a window, capped, plus the true match count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSlice {
    pub rows: Vec<Vec<String>>,
    /// Matching non-empty rows, including those beyond the cap.
    pub total_rows: usize,
    pub truncated: bool,
}

/// One decoded chunk.
#[derive(Debug)]
struct Chunk {
    row_start: usize,
    col_start: usize,
    col_count: usize,
    cells: Vec<Value>,
}

impl Chunk {
    fn from_entry(entry: &Value) -> Result<Self, ChunkError> {
        let payload = entry.get(1).ok_or(ChunkError::MissingPayload)?;
        let decoded = match payload {
            Value::String(encoded) => serde_json::from_str(encoded)?,
            // Already decoded by the page.
            Value::Array(_) => payload.clone(),
            _ => return Err(ChunkError::MissingPayload),
        };
        let Value::Array(mut parts) = decoded else {
            return Err(ChunkError::NotAnArray);
        };

        let cells = match parts.pop() {
            Some(Value::Array(cells)) if !parts.is_empty() => cells,
            _ => Vec::new(),
        };
        let meta = parts.first();

        Ok(Self {
            row_start: meta_index(meta, META_ROW_START),
            col_start: meta_index(meta, META_COL_START),
            col_count: meta_index(meta, META_COL_COUNT),
            cells,
        })
    }
}

/// Non-negative integer at `meta[index]`, or 0.
fn meta_index(meta: Option<&Value>, index: usize) -> usize {
    let Some(value) = meta.and_then(|m| m.get(index)) else {
        return 0;
    };
    if let Some(n) = value.as_u64() {
        return usize::try_from(n).unwrap_or(0);
    }
    value
        .as_f64()
        .filter(|f| f.is_finite() && *f >= 0.0)
        .map_or(0, |f| f as usize)
}

/// Decode every chunk of `snapshot`, keeping rows inside `bounds`.
pub fn decode_grid(snapshot: &Value, bounds: &WindowBounds) -> Result<GridSlice, SnapshotError> {
    let entries = snapshot
        .pointer("/changes/firstchunk")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            SnapshotError::InvalidStructure("changes.firstchunk is not an array".to_string())
        })?;

    let mut slice = GridSlice::default();

    for (index, entry) in entries.iter().enumerate() {
        let chunk = match Chunk::from_entry(entry) {
            Ok(chunk) => chunk,
            Err(e) => {
                debug!(chunk = index, error = %e, "skipping undecodable chunk");
                continue;
            }
        };
        if chunk.cells.is_empty() || chunk.col_count == 0 {
            trace!(chunk = index, "skipping empty chunk");
            continue;
        }
        collect_chunk_rows(&chunk, bounds, &mut slice);
    }

    slice.truncated = slice.total_rows > bounds.max_rows;
    Ok(slice)
}

fn collect_chunk_rows(chunk: &Chunk, bounds: &WindowBounds, slice: &mut GridSlice) {
    for (stride, blocks) in chunk.cells.chunks(chunk.col_count).enumerate() {
        // A row index past usize::MAX is past any window.
        let Some(row) = chunk.row_start.checked_add(stride) else {
            break;
        };
        if bounds.is_before_rows(row) {
            continue;
        }
        // Rows only increase within a chunk.
        if bounds.is_past_rows(row) {
            break;
        }

        let decoded = blocks
            .iter()
            .enumerate()
            .filter(|(local, _)| {
                chunk
                    .col_start
                    .checked_add(*local)
                    .is_some_and(|col| bounds.contains_col(col))
            })
            .map(|(_, block)| Some(decode_block(block)));
        let cells = normalize_row(decoded);
        if cells.is_empty() {
            continue;
        }

        slice.total_rows += 1;
        if slice.rows.len() < bounds.max_rows {
            slice.rows.push(cells);
        }
    }
}

#[cfg(test)]
#[path = "grid_tests.rs"]
mod tests;
