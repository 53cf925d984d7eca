//! The opaque props bag forwarded to the update subscriber.
//!
//! The store does not interpret these beyond passing them through; they
//! carry renderer concerns (initial draw, camera position, transition
//! timing) plus whatever extra keys the wrapper wants downstream.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateProps {
    #[serde(default)]
    pub initial: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree_position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_time: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UpdateProps {
    pub fn initial() -> Self {
        Self {
            initial: true,
            ..Self::default()
        }
    }
}
