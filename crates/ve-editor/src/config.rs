//! Editor configuration.

use serde::{Deserialize, Serialize};
use ve_core::SNAP_TOLERANCE;
use ve_core::model::Container;

/// Configuration for a `VisualEditor` session.
///
/// Every field has a default, so a host may pass a partial JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Snap distance in pixels, inclusive. Default: **5**.
    pub snap_tolerance: f64,

    /// Maximum history depth; the oldest entry is dropped past it.
    /// `0` keeps everything. Default: **200**.
    pub history_limit: usize,

    /// Canvas size for a new, empty document. Default: **800 x 600**.
    pub default_container: Container,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap_tolerance: SNAP_TOLERANCE,
            history_limit: 200,
            default_container: Container::default(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
