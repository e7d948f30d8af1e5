//! The extension wired to a script-evaluating page, end to end.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};

use sheetlens_protocols::error::ExtensionError;
use sheetlens_protocols::extension::{Extension, ExtensionContext, ToolRegistryAccess};
use sheetlens_protocols::tool::{Tool, ToolContext};
use sheetlens_snapshot::{LocatorMarkers, PageCapture, PageDocument};
use sheetlens_tools_sheets::{PageError, ScriptEvaluator, ScriptPage, SheetToolsExtension};

/// Answers the capture script from a saved HTML page and records write scripts.
struct SavedPage {
    html: String,
    scripts: Mutex<Vec<String>>,
}

#[async_trait]
impl ScriptEvaluator for SavedPage {
    async fn evaluate(&self, _page_id: &str, script: &str) -> Result<Value, PageError> {
        self.scripts.lock().push(script.to_string());
        if script.contains("bodyChildren") {
            let capture = PageCapture::new(PageDocument::from_html(&self.html));
            return Ok(serde_json::to_value(capture)?);
        }
        Ok(json!({"ok": true}))
    }
}

#[derive(Default)]
struct Registry {
    tools: Mutex<Vec<Arc<dyn Tool>>>,
}

impl Registry {
    fn get(&self, id: &str) -> Arc<dyn Tool> {
        self.tools
            .lock()
            .iter()
            .find(|t| t.definition().id == id)
            .cloned()
            .unwrap()
    }
}

impl ToolRegistryAccess for Registry {
    fn register_tool(&self, tool: Arc<dyn Tool>) -> Result<(), ExtensionError> {
        self.tools.lock().push(tool);
        Ok(())
    }

    fn unregister_tool(&self, tool_id: &str) -> Result<(), ExtensionError> {
        self.tools.lock().retain(|t| t.definition().id != tool_id);
        Ok(())
    }
}

fn sheet_html() -> String {
    let payload = json!([
        [null, 0, null, 0, 2],
        [
            {"3": "Region"}, {"3": "Sales"},
            {"3": "North"}, {"3": 1200},
            {"3": "South"}, {"3": [{"3": "9"}, {"3": "80"}]}
        ]
    ])
    .to_string();
    let snapshot = json!({"changes": {"firstchunk": [["chunk-0", payload]]}});
    format!(
        "<html><body><div></div><div></div><div></div><div></div>\
         <script>var bootstrapData = {}; init();</script></body></html>",
        snapshot
    )
}

async fn setup() -> (Arc<SavedPage>, Arc<Registry>) {
    let evaluator = Arc::new(SavedPage {
        html: sheet_html(),
        scripts: Mutex::new(Vec::new()),
    });
    let page = ScriptPage::new(evaluator.clone(), &LocatorMarkers::default());
    let registry = Arc::new(Registry::default());
    let mut ext = SheetToolsExtension::new(Arc::new(page));
    ext.initialize(ExtensionContext::new(json!({}), registry.clone()))
        .await
        .unwrap();
    (evaluator, registry)
}

#[tokio::test]
async fn test_read_saved_page() {
    let (_, registry) = setup().await;
    let result = registry
        .get("sheets_get_content")
        .execute(json!({"page_id": "tab"}), ToolContext::new("it"))
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(
        result.content,
        "Sheet content (3 rows matched):\n\n\
         | Region | Sales |\n|---|---|\n| North | 1200 |\n| South | 980 |"
    );
}

#[tokio::test]
async fn test_read_column_window() {
    let (_, registry) = setup().await;
    let result = registry
        .get("sheets_get_content")
        .execute(
            json!({"pageId": "tab", "startCol": 2, "endCol": 2, "startRow": 2}),
            ToolContext::new("it"),
        )
        .await
        .unwrap();
    assert_eq!(
        result.structured_output.unwrap()["rows"],
        json!([["1200"], ["980"]])
    );
}

#[tokio::test]
async fn test_write_goes_through_page_script() {
    let (evaluator, registry) = setup().await;
    let result = registry
        .get("sheets_set_cells")
        .execute(
            json!({"page_id": "tab", "updates": [{"row": 4, "col": 1, "value": "East"}]}),
            ToolContext::new("it"),
        )
        .await
        .unwrap();

    assert!(result.success);
    let scripts = evaluator.scripts.lock();
    assert_eq!(scripts.len(), 1);
    assert!(scripts[0].contains(r#""A4""#));
    assert!(scripts[0].contains(r#""East""#));
}
