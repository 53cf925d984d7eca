//! Animation coordinates.
//!
//! The engine recomputes every card from scratch; continuity across
//! relayouts comes from `_x/_y`: a card that survived keeps its previous
//! position there, a card entering the layout starts at its spouse,
//! parent, or parent-side attach point, and an exiting card slides out
//! toward its quadrant.

use crate::node::{Layout, LayoutNode};
use rustc_hash::FxHashMap;

const EXIT_DISTANCE: f64 = 400.0;

/// Threads enter coordinates from `prev` into `next`.
pub fn apply_transitions(prev: Option<&Layout>, next: &mut Layout) {
    let prev_pos: FxHashMap<&str, (f64, f64)> = prev
        .map(|l| {
            l.nodes
                .iter()
                .map(|n| (n.tid.as_str(), (n.x, n.y)))
                .collect()
        })
        .unwrap_or_default();
    let next_pos: FxHashMap<String, (f64, f64)> = next
        .nodes
        .iter()
        .map(|n| (n.tid.clone(), (n.x, n.y)))
        .collect();

    for n in next.nodes.iter_mut() {
        let (ex, ey) = match prev_pos.get(n.tid.as_str()) {
            Some(&p) => p,
            None => enter_point(n, &next_pos),
        };
        n.enter_x = Some(ex);
        n.enter_y = Some(ey);
    }
}

fn enter_point(n: &LayoutNode, pos: &FxHashMap<String, (f64, f64)>) -> (f64, f64) {
    if let Some(at) = n.spouse.as_ref().and_then(|s| pos.get(s)) {
        return *at;
    }
    if n.is_ancestry {
        if let Some(at) = n.from.first().and_then(|f| pos.get(f)) {
            return *at;
        }
    }
    if let (Some(psx), Some(psy)) = (n.psx, n.psy) {
        return (psx, psy);
    }
    (n.x, n.y)
}

/// Where a card removed by the latest relayout should slide to.
pub fn exit_position(n: &LayoutNode) -> (f64, f64) {
    let dx = if n.x > 0.0 { 1.0 } else { -1.0 };
    let dy = if n.y > 0.0 { 1.0 } else { -1.0 };
    (n.x + EXIT_DISTANCE * dx, n.y + EXIT_DISTANCE * dy)
}
