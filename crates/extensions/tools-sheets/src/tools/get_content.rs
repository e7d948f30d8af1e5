//! `sheets_get_content`: read a window of the sheet as a table.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use sheetlens_protocols::error::ToolError;
use sheetlens_protocols::tool::{Tool, ToolContext, ToolDefinition, ToolResult};
use sheetlens_snapshot::{SliceOptions, SnapshotReader};

use crate::page::SheetPage;

use super::{ensure_not_cancelled, invalid_params};

#[derive(Debug, Deserialize)]
pub struct GetContentParams {
    #[serde(alias = "pageId")]
    pub page_id: String,

    #[serde(flatten)]
    pub window: SliceOptions,
}

impl GetContentParams {
    fn parse(params: serde_json::Value) -> Result<Self, ToolError> {
        let params: Self = serde_json::from_value(params).map_err(invalid_params)?;
        if params.window.max_rows == Some(0) {
            return Err(ToolError::InvalidParameters(
                "max_rows must be at least 1".to_string(),
            ));
        }
        Ok(params)
    }
}

pub struct SheetGetContentTool {
    definition: ToolDefinition,
    page: Arc<dyn SheetPage>,
    reader: Arc<SnapshotReader>,
}

impl SheetGetContentTool {
    pub fn new(page: Arc<dyn SheetPage>, reader: Arc<SnapshotReader>) -> Self {
        let definition = ToolDefinition::new(
            "sheets_get_content",
            "Sheets Get Content",
            "Read spreadsheet cells as a markdown table. Bounds are 1-based and inclusive; \
             omitted bounds mean the start or end of the sheet.",
        )
        .with_parameters_schema(parameters_schema(reader.default_max_rows()));

        Self {
            definition,
            page,
            reader,
        }
    }
}

fn parameters_schema(default_max_rows: usize) -> serde_json::Value {
    let bound = |description: &str| {
        serde_json::json!({ "type": "integer", "minimum": 1, "description": description })
    };
    serde_json::json!({
        "type": "object",
        "properties": {
            "page_id": { "type": "string", "description": "Page holding the spreadsheet" },
            "start_row": bound("First row to include"),
            "end_row": bound("Last row to include"),
            "start_col": bound("First column to include (A = 1)"),
            "end_col": bound("Last column to include (A = 1)"),
            "max_rows": {
                "type": "integer",
                "minimum": 1,
                "default": default_max_rows,
                "description": "Maximum number of rows returned"
            }
        },
        "required": ["page_id"]
    })
}

#[async_trait]
impl Tool for SheetGetContentTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    fn validate(&self, params: &serde_json::Value) -> Result<(), ToolError> {
        GetContentParams::parse(params.clone()).map(|_| ())
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let params = GetContentParams::parse(params)?;
        ensure_not_cancelled(&ctx)?;

        info!(
            page_id = %params.page_id,
            session_id = %ctx.session_id,
            correlation_id = %ctx.correlation_id,
            "Reading sheet content"
        );

        let capture = self
            .page
            .capture(&params.page_id)
            .await
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

        match self.reader.read(&capture, &params.window) {
            Ok(content) => {
                let output = serde_json::to_value(&content)
                    .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;
                Ok(ToolResult::success_json(content.summary(), output))
            }
            Err(e) => {
                warn!(page_id = %params.page_id, error = %e, "Sheet snapshot unreadable");
                Ok(ToolResult::error(e.to_string())
                    .with_metadata("kind", serde_json::json!(e.kind().as_str())))
            }
        }
    }
}
