//! CLI definitions for sheetlens.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// sheetlens CLI.
#[derive(Parser)]
#[command(name = "sheetlens")]
#[command(about = "Read spreadsheet content out of a page's bootstrap snapshot")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: <config dir>/sheetlens/config.toml)
    #[arg(short, long, global = true, env = "SHEETLENS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Read a window of a saved spreadsheet page as a table
    Read {
        /// Saved HTML of the spreadsheet page
        html: PathBuf,

        /// JSON file holding the page's already-evaluated snapshot object
        #[arg(long)]
        snapshot: Option<PathBuf>,

        #[command(flatten)]
        window: WindowArgs,

        /// Print the structured result as JSON instead of the table
        #[arg(long)]
        json: bool,
    },

    /// List the tools and their parameter schemas
    Tools,

    /// Convert between A1 references and 1-based row/column pairs
    A1 {
        #[command(subcommand)]
        action: A1Action,
    },
}

/// Row/column window; bounds are 1-based and inclusive.
#[derive(Args, Debug, Default)]
pub(crate) struct WindowArgs {
    #[arg(long)]
    pub start_row: Option<i64>,

    #[arg(long)]
    pub end_row: Option<i64>,

    #[arg(long)]
    pub start_col: Option<i64>,

    #[arg(long)]
    pub end_col: Option<i64>,

    /// Maximum rows to return (default from config)
    #[arg(long)]
    pub max_rows: Option<usize>,
}

impl WindowArgs {
    /// Tool parameters for `sheets_get_content`, omitting unset bounds.
    pub fn to_params(&self, page_id: &str) -> serde_json::Value {
        let mut params = serde_json::json!({ "page_id": page_id });
        let fields = [
            ("start_row", self.start_row),
            ("end_row", self.end_row),
            ("start_col", self.start_col),
            ("end_col", self.end_col),
            ("max_rows", self.max_rows.map(|n| n as i64)),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                params[key] = serde_json::json!(value);
            }
        }
        params
    }
}

#[derive(Subcommand)]
pub(crate) enum A1Action {
    /// Row and column to an A1 reference
    From { row: u32, col: u32 },

    /// A1 reference to row and column
    Parse { reference: String },
}
