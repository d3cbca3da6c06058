// Structured document: the snapshot as pretty JSON, every key always present

use crate::models::Snapshot;

pub fn render_json(snapshot: &Snapshot) -> String {
    match serde_json::to_string_pretty(snapshot) {
        Ok(mut document) => {
            document.push('\n');
            document
        }
        Err(e) => {
            tracing::warn!(error = %e, operation = "render_json", "falling back to empty document");
            let empty = serde_json::json!({
                "os": {}, "network": {}, "cpu": {}, "disk": {}, "memory": {}, "session": {}
            });
            format!("{empty:#}\n")
        }
    }
}
