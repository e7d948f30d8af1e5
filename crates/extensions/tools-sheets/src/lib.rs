//! Spreadsheet tools extension.
//!
//! Exposes `sheets_get_content`, which reads a windowed table out of the
//! spreadsheet's bootstrap snapshot, and `sheets_set_cells`, which writes
//! values into A1-addressed cells. Both talk to the page through
//! [`SheetPage`], so they run the same against a live browser tab or a
//! saved page.

mod extension;
pub mod page;
pub mod tools;

pub use extension::SheetToolsExtension;
pub use page::{PageError, ScriptEvaluator, ScriptPage, SheetPage};
pub use tools::{SheetGetContentTool, SheetSetCellsTool};
