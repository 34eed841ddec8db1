//! Drag-payload wire format.
//!
//! When a palette entry starts a drag, the template is serialized to JSON and
//! attached to the drag event under several MIME-type keys so every browser
//! family can read at least one of them back. The drop handler tries the keys
//! in reader priority order and silently gives up on malformed data.

use serde::{Deserialize, Serialize};

use riveter_types::ConfigMap;

use crate::catalog::ActionTemplate;

/// Keys the payload is duplicated under at drag start, in writer order.
pub const MIME_KEYS: [&str; 4] = ["application/json", "text/plain", "text", "string"];

/// Keys tried when reading a drop, most reliable first.
const READ_ORDER: [&str; 4] = ["text/plain", "application/json", "text", "string"];

/// The record attached to a drag event for one palette template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub icon: String,
    #[serde(default)]
    pub config: ConfigMap,
    pub marketplace: String,
    pub color: String,
    pub description: String,
}

impl From<&ActionTemplate> for DragPayload {
    fn from(t: &ActionTemplate) -> Self {
        Self {
            kind: t.kind.clone(),
            name: t.name.clone(),
            icon: t.icon.clone(),
            config: t.config.clone(),
            marketplace: t.marketplace.clone(),
            color: t.color.clone(),
            description: t.description.clone(),
        }
    }
}

impl DragPayload {
    /// Serialize the payload under every supported MIME key.
    ///
    /// Returns `(key, json)` pairs in writer order. Serialization of a
    /// payload cannot fail; the data holds no non-JSON values.
    pub fn encode(&self) -> Vec<(&'static str, String)> {
        let json = serde_json::to_string(self).unwrap_or_default();
        MIME_KEYS.iter().map(|k| (*k, json.clone())).collect()
    }

    /// Decode a payload from the populated entries of a drop event.
    ///
    /// Tries keys in reader priority order; blank values and malformed JSON
    /// are skipped. Returns `None` when nothing usable was attached — the
    /// drop is then ignored, leaving prior state untouched.
    pub fn decode<'a, I>(entries: I) -> Option<DragPayload>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let entries: Vec<(&str, &str)> = entries.into_iter().collect();
        for key in READ_ORDER {
            let Some((_, raw)) = entries.iter().find(|(k, _)| *k == key) else {
                continue;
            };
            if raw.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<DragPayload>(raw) {
                Ok(payload) => return Some(payload),
                Err(err) => {
                    tracing::debug!(key, %err, "discarding malformed drag payload");
                }
            }
        }
        None
    }
}
