//! Server-side history script
//!
//! The same bounded loop as [`crate::pagination::paginate`], written in
//! VKScript so that one `execute` call makes all of a batch's fetches.

use crate::pagination::{MAX_FETCHES, PAGE_SIZE};
use crate::types::PeerId;

const HISTORY_SCRIPT: &str = r#"var peer_id = PEERID;
var processed = PROCESSED;

var response = API.messages.getHistory({"offset": processed, "count": PAGE_SIZE, "peer_id": peer_id});
processed = processed + response.items.length;

var i = 1;

var messages = response.items;
var count = response.count;

while (i < MAX_FETCHES && processed < count) {
    response = API.messages.getHistory({"offset": processed, "count": PAGE_SIZE, "peer_id": peer_id});
    messages = messages + response.items;

    processed = processed + response.items.length;
    i = i + 1;
};

return {"count": count, "processed": processed, "messages": messages};
"#;

/// Render the history script for one batch
pub fn render_history_script(peer_id: PeerId, processed: u64) -> String {
    HISTORY_SCRIPT
        .replace("PEERID", &peer_id.to_string())
        .replace("PROCESSED", &processed.to_string())
        .replace("PAGE_SIZE", &PAGE_SIZE.to_string())
        .replace("MAX_FETCHES", &MAX_FETCHES.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_all_placeholders() {
        let code = render_history_script(2_000_000_001, 400);

        assert!(code.starts_with("var peer_id = 2000000001;\nvar processed = 400;"));
        assert!(code.contains(r#""count": 200, "peer_id": peer_id"#));
        assert!(code.contains("while (i < 25 && processed < count)"));
        for placeholder in ["PEERID", "PROCESSED", "PAGE_SIZE", "MAX_FETCHES"] {
            assert!(!code.contains(placeholder), "{placeholder} left in script");
        }
    }

    #[test]
    fn test_render_negative_peer() {
        let code = render_history_script(-42, 0);
        assert!(code.starts_with("var peer_id = -42;\nvar processed = 0;"));
    }
}
