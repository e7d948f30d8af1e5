//! `sheets_set_cells`: write values into one or more cells.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use sheetlens_protocols::error::ToolError;
use sheetlens_protocols::tool::{Tool, ToolContext, ToolDefinition, ToolResult};
use sheetlens_protocols::types::RiskLevel;
use sheetlens_snapshot::{parse_a1, to_a1};

use crate::page::SheetPage;

use super::{ensure_not_cancelled, invalid_params};

/// One target cell: either an A1 reference or a 1-based row/column pair.
#[derive(Debug, Clone, Deserialize)]
pub struct CellUpdate {
    #[serde(default)]
    pub cell: Option<String>,
    #[serde(default)]
    pub row: Option<u32>,
    #[serde(default, alias = "column")]
    pub col: Option<u32>,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl CellUpdate {
    /// Normalized A1 reference. A valid `cell` wins over `row`/`col`.
    pub fn resolve(&self) -> Result<String, String> {
        let from_cell = self.cell.as_deref().and_then(parse_a1);
        if let Some(a1) = from_cell.and_then(|(row, col)| to_a1(row, col)) {
            return Ok(a1);
        }

        match (self.row, self.col) {
            (Some(row), Some(col)) => to_a1(row, col)
                .ok_or_else(|| format!("row {} / col {} is not a valid cell", row, col)),
            _ => match &self.cell {
                Some(cell) => Err(format!("'{}' is not a valid A1 reference", cell)),
                None => Err("each update needs `cell` or both `row` and `col`".to_string()),
            },
        }
    }

    /// Text typed into the cell.
    pub fn text(&self) -> String {
        match &self.value {
            serde_json::Value::Null => String::new(),
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SetCellsParams {
    #[serde(alias = "pageId")]
    pub page_id: String,

    #[serde(default)]
    pub updates: Option<Vec<CellUpdate>>,
}

impl SetCellsParams {
    /// Split raw parameters into the page id and its updates; a call
    /// without `updates` is a single update.
    pub fn parse(raw: serde_json::Value) -> Result<(String, Vec<CellUpdate>), ToolError> {
        let params: SetCellsParams =
            serde_json::from_value(raw.clone()).map_err(invalid_params)?;
        let updates = match params.updates {
            Some(updates) if updates.is_empty() => {
                return Err(ToolError::InvalidParameters(
                    "`updates` must not be empty".to_string(),
                ));
            }
            Some(updates) => updates,
            None => vec![serde_json::from_value(raw).map_err(invalid_params)?],
        };
        Ok((params.page_id, updates))
    }
}

#[derive(Debug, Serialize)]
struct CellReport {
    cell: String,
    value: String,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub struct SheetSetCellsTool {
    definition: ToolDefinition,
    page: Arc<dyn SheetPage>,
}

impl SheetSetCellsTool {
    pub fn new(page: Arc<dyn SheetPage>) -> Self {
        let target = serde_json::json!({
            "cell": { "type": "string", "description": "A1 reference, e.g. B12" },
            "row": { "type": "integer", "minimum": 1 },
            "col": { "type": "integer", "minimum": 1, "description": "A = 1" },
            "value": { "description": "Text or number to enter" }
        });
        let definition = ToolDefinition::new(
            "sheets_set_cells",
            "Sheets Set Cells",
            "Write values into spreadsheet cells. Pass one {cell | row+col, value} \
             or a batch as `updates`.",
        )
        .with_parameters_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "page_id": { "type": "string" },
                "cell": target["cell"],
                "row": target["row"],
                "col": target["col"],
                "value": target["value"],
                "updates": {
                    "type": "array",
                    "items": { "type": "object", "properties": target }
                }
            },
            "required": ["page_id"]
        }))
        .with_risk_level(RiskLevel::Medium);

        Self { definition, page }
    }
}

#[async_trait]
impl Tool for SheetSetCellsTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let (page_id, updates) = SetCellsParams::parse(params)?;

        let targets = updates
            .iter()
            .enumerate()
            .map(|(i, update)| {
                update
                    .resolve()
                    .map(|cell| (cell, update.text()))
                    .map_err(|e| ToolError::InvalidParameters(format!("update {}: {}", i, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        ensure_not_cancelled(&ctx)?;
        info!(
            page_id = %page_id,
            session_id = %ctx.session_id,
            correlation_id = %ctx.correlation_id,
            cells = targets.len(),
            "Writing sheet cells"
        );

        let mut reports = Vec::with_capacity(targets.len());
        for (cell, value) in targets {
            let error = self
                .page
                .write_cell(&page_id, &cell, &value)
                .await
                .err()
                .map(|e| {
                    warn!(page_id = %page_id, cell = %cell, error = %e, "Cell write failed");
                    e.to_string()
                });
            reports.push(CellReport {
                success: error.is_none(),
                error,
                cell,
                value,
            });
        }

        let total = reports.len();
        let failed = reports.iter().filter(|r| !r.success).count();
        let updated = total - failed;
        let content = render_report(&reports, updated);
        let output = serde_json::json!({
            "results": reports,
            "updated": updated,
            "failed": failed,
        });

        if failed == 0 {
            return Ok(ToolResult::success_json(content, output));
        }

        let mut result =
            ToolResult::error(format!("{} of {} cell writes failed", failed, total))
                .with_structured_output(output);
        result.content = content;
        Ok(result)
    }
}

fn render_report(reports: &[CellReport], updated: usize) -> String {
    let mut out = format!("Updated {} of {} cells:", updated, reports.len());
    for report in reports {
        match &report.error {
            None => out.push_str(&format!("\n- {} = {:?}", report.cell, report.value)),
            Some(e) => out.push_str(&format!("\n- {} failed: {}", report.cell, e)),
        }
    }
    out
}
