//! Locates the script carrying the spreadsheet bootstrap snapshot.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::ScriptSource;

/// Variable the application assigns its snapshot to.
pub const DEFAULT_SNAPSHOT_VARIABLE: &str = "bootstrapData";

/// Text that only the application's own bootstrap script carries.
pub const DEFAULT_COMPANION_MARKER: &str = "firstchunk";

/// Body child position where the bootstrap script normally sits.
pub const DEFAULT_BODY_CHILD_INDEX: usize = 4;

/// Markers identifying the bootstrap script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorMarkers {
    /// Snapshot-assignment marker; also the variable name the parser extracts.
    pub variable: String,

    /// Companion marker confirming the script belongs to the application.
    pub companion: String,

    /// Fast-path sibling index under `<body>`.
    pub body_child_index: usize,
}

impl Default for LocatorMarkers {
    fn default() -> Self {
        Self {
            variable: DEFAULT_SNAPSHOT_VARIABLE.to_string(),
            companion: DEFAULT_COMPANION_MARKER.to_string(),
            body_child_index: DEFAULT_BODY_CHILD_INDEX,
        }
    }
}

impl LocatorMarkers {
    /// Whether a script text carries both markers.
    pub fn matches(&self, text: &str) -> bool {
        text.contains(&self.variable) && text.contains(&self.companion)
    }
}

/// Find the bootstrap script text.
///
/// Checks the body child at the configured index first, then scans every
/// script. `None` is not an error here; the parser reports it.
pub fn locate_bootstrap<'a>(
    source: &'a dyn ScriptSource,
    markers: &LocatorMarkers,
) -> Option<&'a str> {
    if let Some(text) = source.body_child_script(markers.body_child_index) {
        if markers.matches(text) {
            debug!(index = markers.body_child_index, "bootstrap found at body fast path");
            return Some(text);
        }
    }

    let found = source.scripts().find(|text| markers.matches(text));
    if found.is_some() {
        debug!("bootstrap found by script scan");
    } else {
        debug!(variable = %markers.variable, "no bootstrap script on page");
    }
    found
}
