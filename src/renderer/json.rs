//! JSON output of layout snapshots

use crate::layout::LayoutSnapshot;

/// Serialize a snapshot as pretty-printed JSON
pub fn render_json(snapshot: &LayoutSnapshot) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(snapshot)
}
