//! Layout output model.
//!
//! One [`LayoutNode`] per visible appearance of a person. Nodes reference
//! each other by `tid`, the layout-unique id (`person.id`, or
//! `person.id--xN` for the N-th duplicate appearance), so the output is a
//! plain serializable value with no interior pointers.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    /// Layout-unique id; distinguishes duplicate appearances of a person.
    pub tid: String,
    /// The person this appearance shows.
    pub id: String,

    pub x: f64,
    pub y: f64,

    /// Enter coordinates for animation: where this card flies in from.
    /// Set by [`crate::transitions::apply_transitions`], not the engine.
    #[serde(rename = "_x", default, skip_serializing_if = "Option::is_none")]
    pub enter_x: Option<f64>,
    #[serde(rename = "_y", default, skip_serializing_if = "Option::is_none")]
    pub enter_y: Option<f64>,

    /// Generation distance from the focus; negative above it.
    pub depth: i32,

    pub is_ancestry: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub sibling: bool,
    /// Spouse card injected beside its partner rather than positioned by
    /// the tree walk.
    #[serde(default, skip_serializing_if = "is_false")]
    pub added: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub main: bool,

    /// For an `added` card: the tid of the partner it stands beside.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spouse: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spouses: Vec<String>,

    /// Edge endpoints: where this node's incoming edge starts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub from: Vec<String>,
    /// Downward edges registered back onto this node by its children.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to: Vec<String>,
    /// Upward edges from the focus to its parent cards.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to_ancestry: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_spouse: Option<String>,

    /// Child-attach point of a spouse card: the midpoint between the
    /// partners for the first spouse, the card itself otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sx: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sy: Option<f64>,

    /// Parent-side attach point: where this card's edge to its parents
    /// connects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psx: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psy: Option<f64>,

    /// Number of appearances of this person, when more than one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate: Option<usize>,

    /// Signed toggle timestamp of a duplicate-branch appearance.
    #[serde(rename = "_toggle", default, skip_serializing_if = "Option::is_none")]
    pub toggle: Option<i64>,
    /// Shared id correlating the appearances of one duplicate group.
    #[serde(rename = "_toggle_id", default, skip_serializing_if = "Option::is_none")]
    pub toggle_id: Option<String>,

    /// True iff every id in the person's relations appears in the layout;
    /// renderers show an expand affordance when false.
    pub all_rels_displayed: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_private: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutDim {
    pub width: f64,
    pub height: f64,
    /// Offsets that translate layout coordinates into a top-left-origin
    /// canvas.
    pub x_off: f64,
    pub y_off: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub nodes: Vec<LayoutNode>,
    pub dim: LayoutDim,
    pub main_id: String,
    pub is_horizontal: bool,
}

impl Layout {
    pub fn node(&self, tid: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.tid == tid)
    }

    pub fn main_node(&self) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.main)
    }
}
