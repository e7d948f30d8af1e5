//! Spreadsheet tools.

mod get_content;
mod set_cells;

pub use get_content::{GetContentParams, SheetGetContentTool};
pub use set_cells::{CellUpdate, SetCellsParams, SheetSetCellsTool};

use sheetlens_protocols::error::ToolError;

/// Reject calls whose context was cancelled before any page work started.
fn ensure_not_cancelled(ctx: &sheetlens_protocols::tool::ToolContext) -> Result<(), ToolError> {
    if ctx.is_cancelled() {
        return Err(ToolError::Cancelled);
    }
    Ok(())
}

fn invalid_params(e: serde_json::Error) -> ToolError {
    ToolError::InvalidParameters(e.to_string())
}
