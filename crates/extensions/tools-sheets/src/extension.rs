//! Spreadsheet tools extension.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;

use sheetlens_protocols::error::ExtensionError;
use sheetlens_protocols::extension::{Extension, ExtensionContext, ExtensionManifest, Provides};
use sheetlens_protocols::types::Version;
use sheetlens_snapshot::{LocatorMarkers, SnapshotReader};

use crate::page::SheetPage;
use crate::tools::{SheetGetContentTool, SheetSetCellsTool};

/// Registers `sheets_get_content` and `sheets_set_cells` against one page source.
///
/// Builder settings can be overridden at initialization by the context
/// config keys `variable`, `companion_marker`, `body_child_index` and
/// `default_max_rows`.
pub struct SheetToolsExtension {
    manifest: ExtensionManifest,
    page: Arc<dyn SheetPage>,
    markers: LocatorMarkers,
    default_max_rows: Option<usize>,
}

impl SheetToolsExtension {
    pub fn new(page: Arc<dyn SheetPage>) -> Self {
        let mut manifest =
            ExtensionManifest::new("tools-sheets", "Spreadsheet Tools", Version::new(0, 1, 0))
                .with_description(
                    "Read spreadsheet content from the page's bootstrap snapshot and write cells",
                );
        manifest.provides = Provides {
            tools: vec![
                "sheets_get_content".to_string(),
                "sheets_set_cells".to_string(),
            ],
        };

        Self {
            manifest,
            page,
            markers: LocatorMarkers::default(),
            default_max_rows: None,
        }
    }

    pub fn markers(mut self, markers: LocatorMarkers) -> Self {
        self.markers = markers;
        self
    }

    /// Row cap for calls that do not pass `max_rows`.
    pub fn default_max_rows(mut self, max_rows: usize) -> Self {
        self.default_max_rows = Some(max_rows);
        self
    }

    fn apply_config(&mut self, ctx: &ExtensionContext) -> Result<(), ExtensionError> {
        if let Some(variable) = ctx.get_config::<String>("variable") {
            self.markers.variable = variable;
        }
        if let Some(companion) = ctx.get_config::<String>("companion_marker") {
            self.markers.companion = companion;
        }
        if let Some(index) = ctx.get_config::<usize>("body_child_index") {
            self.markers.body_child_index = index;
        }
        if let Some(max_rows) = ctx.get_config::<usize>("default_max_rows") {
            self.default_max_rows = Some(max_rows);
        }

        if self.default_max_rows == Some(0) {
            return Err(ExtensionError::InitializationFailed(
                "default_max_rows must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    fn reader(&self) -> SnapshotReader {
        let reader = SnapshotReader::new(self.markers.clone());
        match self.default_max_rows {
            Some(max_rows) => reader.with_default_max_rows(max_rows),
            None => reader,
        }
    }
}

#[async_trait]
impl Extension for SheetToolsExtension {
    fn manifest(&self) -> &ExtensionManifest {
        &self.manifest
    }

    async fn initialize(&mut self, ctx: ExtensionContext) -> Result<(), ExtensionError> {
        self.apply_config(&ctx)?;
        let reader = Arc::new(self.reader());

        ctx.tool_registry.register_tool(Arc::new(SheetGetContentTool::new(
            self.page.clone(),
            reader.clone(),
        )))?;
        ctx.tool_registry
            .register_tool(Arc::new(SheetSetCellsTool::new(self.page.clone())))?;

        tracing::info!(
            variable = %self.markers.variable,
            default_max_rows = reader.default_max_rows(),
            "Spreadsheet tools extension initialized"
        );
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
#[path = "extension_tests.rs"]
mod tests;
