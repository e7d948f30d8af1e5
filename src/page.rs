//! Saved-page source for the sheet tools.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use sheetlens_snapshot::{PageCapture, PageDocument};
use sheetlens_tools_sheets::{PageError, SheetPage};

/// Serves captures from HTML files on disk; the page id is the file path.
///
/// An optional JSON file stands in for the page's live snapshot object.
pub(crate) struct FilePage {
    snapshot: Option<PathBuf>,
}

impl FilePage {
    pub fn new(snapshot: Option<PathBuf>) -> Self {
        Self { snapshot }
    }
}

async fn read_file(path: &Path) -> Result<String, PageError> {
    tokio::fs::read_to_string(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => PageError::PageNotFound(path.display().to_string()),
        _ => PageError::Evaluation(format!("{}: {}", path.display(), e)),
    })
}

#[async_trait]
impl SheetPage for FilePage {
    async fn capture(&self, page_id: &str) -> Result<PageCapture, PageError> {
        let html = read_file(Path::new(page_id)).await?;
        let mut capture = PageCapture::new(PageDocument::from_html(&html));

        if let Some(path) = &self.snapshot {
            let text = read_file(path).await?;
            capture = capture.with_snapshot(serde_json::from_str(&text)?);
        }

        debug!(
            page_id,
            scripts = capture.document.scripts.len(),
            live_snapshot = capture.snapshot.is_some(),
            "Loaded saved page"
        );
        Ok(capture)
    }

    async fn write_cell(&self, _page_id: &str, _cell: &str, _value: &str) -> Result<(), PageError> {
        Err(PageError::Unsupported("saved pages are read-only".to_string()))
    }
}
