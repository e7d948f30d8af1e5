//! The seam between the tools and a spreadsheet page.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use sheetlens_snapshot::{LocatorMarkers, PageCapture};

#[derive(Debug, Error)]
pub enum PageError {
    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Script evaluation failed: {0}")]
    Evaluation(String),

    #[error("Unexpected page response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("Write to {cell} rejected: {message}")]
    WriteRejected { cell: String, message: String },

    #[error("Operation not supported: {0}")]
    Unsupported(String),
}

/// A spreadsheet page the tools can read from and write to.
#[async_trait]
pub trait SheetPage: Send + Sync {
    /// Capture the script view of the page and its live snapshot, if any.
    async fn capture(&self, page_id: &str) -> Result<PageCapture, PageError>;

    /// Write `value` into the cell at A1 reference `cell`.
    async fn write_cell(&self, page_id: &str, cell: &str, value: &str) -> Result<(), PageError>;
}

/// Evaluates a JavaScript expression in a page and returns its JSON value.
#[async_trait]
pub trait ScriptEvaluator: Send + Sync {
    async fn evaluate(
        &self,
        page_id: &str,
        script: &str,
    ) -> Result<serde_json::Value, PageError>;
}

#[async_trait]
impl<E: ScriptEvaluator + ?Sized> ScriptEvaluator for Arc<E> {
    async fn evaluate(
        &self,
        page_id: &str,
        script: &str,
    ) -> Result<serde_json::Value, PageError> {
        (**self).evaluate(page_id, script).await
    }
}

/// [`SheetPage`] over anything that can run JavaScript in the page.
pub struct ScriptPage<E> {
    evaluator: E,
    capture_script: String,
}

impl<E: ScriptEvaluator> ScriptPage<E> {
    pub fn new(evaluator: E, markers: &LocatorMarkers) -> Self {
        Self {
            evaluator,
            capture_script: capture_script(&markers.variable),
        }
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }
}

#[async_trait]
impl<E: ScriptEvaluator> SheetPage for ScriptPage<E> {
    async fn capture(&self, page_id: &str) -> Result<PageCapture, PageError> {
        let value = self.evaluator.evaluate(page_id, &self.capture_script).await?;
        let capture: PageCapture = serde_json::from_value(value)?;
        debug!(
            page_id,
            body_children = capture.document.body_children.len(),
            scripts = capture.document.scripts.len(),
            live_snapshot = capture.snapshot.is_some(),
            "Captured page"
        );
        Ok(capture)
    }

    async fn write_cell(&self, page_id: &str, cell: &str, value: &str) -> Result<(), PageError> {
        let script = write_script(cell, value);
        let outcome: WriteOutcome =
            serde_json::from_value(self.evaluator.evaluate(page_id, &script).await?)?;
        if outcome.ok {
            Ok(())
        } else {
            Err(PageError::WriteRejected {
                cell: cell.to_string(),
                message: outcome.error.unwrap_or_else(|| "unknown failure".to_string()),
            })
        }
    }
}

#[derive(Debug, Deserialize)]
struct WriteOutcome {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// JSON-quote a string for embedding in a script.
fn js_string(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

/// Collects body children, every script text and the live snapshot in one evaluation.
pub(crate) fn capture_script(variable: &str) -> String {
    format!(
        r#"(() => {{
  const body = document.body;
  const bodyChildren = body
    ? Array.from(body.children).map((el) => (el.tagName === "SCRIPT" ? el.textContent || "" : null))
    : [];
  const scripts = Array.from(document.scripts).map((el) => el.textContent || "");
  const live = window[{var}];
  return {{
    document: {{ bodyChildren, scripts }},
    snapshot: live && typeof live === "object" ? live : null,
  }};
}})()"#,
        var = js_string(variable)
    )
}

/// Selects the cell through the name box, then commits `value` through the cell editor.
pub(crate) fn write_script(cell: &str, value: &str) -> String {
    format!(
        r##"(() => {{
  const enter = (el) => el.dispatchEvent(new KeyboardEvent("keydown", {{ key: "Enter", keyCode: 13, bubbles: true }}));
  const box = document.querySelector("#t-name-box");
  if (!box) return {{ ok: false, error: "name box not found" }};
  box.focus();
  box.value = {cell};
  enter(box);
  const editor = document.querySelector(".cell-input");
  if (!editor) return {{ ok: false, error: "cell editor not found" }};
  editor.focus();
  editor.textContent = {value};
  editor.dispatchEvent(new InputEvent("input", {{ bubbles: true }}));
  enter(editor);
  return {{ ok: true }};
}})()"##,
        cell = js_string(cell),
        value = js_string(value)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use serde_json::json;

    struct ScriptedEvaluator {
        response: serde_json::Value,
        seen: Mutex<Vec<String>>,
    }

    impl ScriptedEvaluator {
        fn new(response: serde_json::Value) -> Self {
            Self {
                response,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ScriptEvaluator for ScriptedEvaluator {
        async fn evaluate(
            &self,
            page_id: &str,
            script: &str,
        ) -> Result<serde_json::Value, PageError> {
            if page_id == "missing" {
                return Err(PageError::PageNotFound(page_id.to_string()));
            }
            if page_id == "crashed" {
                return Err(PageError::Evaluation("Target closed".to_string()));
            }
            self.seen.lock().push(script.to_string());
            Ok(self.response.clone())
        }
    }

    #[test]
    fn test_capture_script_quotes_variable() {
        let script = capture_script("bootstrapData");
        assert!(script.contains(r#"window["bootstrapData"]"#));
        assert!(script.contains("bodyChildren"));
    }

    #[test]
    fn test_write_script_escapes_value() {
        let script = write_script("B2", "say \"hi\"\n");
        assert!(script.contains(r#"box.value = "B2";"#));
        assert!(script.contains(r#"editor.textContent = "say \"hi\"\n";"#));
    }

    #[tokio::test]
    async fn test_capture_deserializes_response() {
        let evaluator = ScriptedEvaluator::new(json!({
            "document": {
                "bodyChildren": [null, "var bootstrapData = {};"],
                "scripts": ["var bootstrapData = {};"]
            },
            "snapshot": {"changes": {"firstchunk": []}}
        }));
        let page = ScriptPage::new(evaluator, &LocatorMarkers::default());

        let capture = page.capture("tab-1").await.unwrap();
        assert_eq!(capture.document.body_children.len(), 2);
        assert_eq!(capture.document.scripts.len(), 1);
        assert!(capture.snapshot.is_some());
        assert!(page.evaluator().seen.lock()[0].contains("bootstrapData"));
    }

    #[tokio::test]
    async fn test_capture_null_snapshot() {
        let evaluator = ScriptedEvaluator::new(json!({
            "document": {"bodyChildren": [], "scripts": []},
            "snapshot": null
        }));
        let page = ScriptPage::new(evaluator, &LocatorMarkers::default());
        assert!(page.capture("tab-1").await.unwrap().snapshot.is_none());
    }

    #[tokio::test]
    async fn test_capture_bad_shape() {
        let page = ScriptPage::new(ScriptedEvaluator::new(json!("nope")), &LocatorMarkers::default());
        assert!(matches!(
            page.capture("tab-1").await,
            Err(PageError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_capture_unknown_page() {
        let page = ScriptPage::new(ScriptedEvaluator::new(json!({})), &LocatorMarkers::default());
        assert!(matches!(
            page.capture("missing").await,
            Err(PageError::PageNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_write_cell_evaluation_failure() {
        let page = ScriptPage::new(ScriptedEvaluator::new(json!({"ok": true})), &LocatorMarkers::default());
        let err = page.write_cell("crashed", "A1", "x").await.unwrap_err();
        assert!(err.to_string().contains("Target closed"));
    }

    #[tokio::test]
    async fn test_write_cell_ok() {
        let page = ScriptPage::new(ScriptedEvaluator::new(json!({"ok": true})), &LocatorMarkers::default());
        page.write_cell("tab-1", "C3", "42").await.unwrap();
        assert!(page.evaluator().seen.lock()[0].contains(r#""C3""#));
    }

    #[tokio::test]
    async fn test_write_cell_rejected() {
        let page = ScriptPage::new(
            ScriptedEvaluator::new(json!({"ok": false, "error": "name box not found"})),
            &LocatorMarkers::default(),
        );
        let err = page.write_cell("tab-1", "A1", "x").await.unwrap_err();
        assert_eq!(err.to_string(), "Write to A1 rejected: name box not found");
    }
}
