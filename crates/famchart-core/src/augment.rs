//! Placeholder-spouse augmentation.
//!
//! Downstream layout assumes every child has a father slot and a mother
//! slot filled so child edges can attach to the midpoint between two
//! parent cards. This pass materializes a single `to_add` spouse per
//! person and direction for every child missing the second parent, links
//! it on both sides, and back-fills the child's empty slot.
//!
//! Running the pass twice is a no-op: the first run leaves no child with
//! an empty parent slot whose other slot is set.

use crate::graph::PersonGraph;
use crate::model::{Gender, Person};

/// Extends the graph with `to_add` placeholder spouses. Placeholders are
/// later consumed by the edit operations when a real partner is added or
/// linked.
pub fn add_placeholder_spouses(graph: &mut PersonGraph) {
    for pid in graph.ids() {
        // A male single parent is missing a mother next to him, a female
        // one a father. Handle both directions independently so malformed
        // mixed-slot data still converges.
        complete_parent(graph, &pid, Gender::Female);
        complete_parent(graph, &pid, Gender::Male);
    }
}

/// Gives `pid`'s children a second parent of gender `missing` when their
/// other slot already points at `pid`.
fn complete_parent(graph: &mut PersonGraph, pid: &str, missing: Gender) {
    let Some(p) = graph.get(pid) else {
        return;
    };
    let orphans: Vec<String> = p
        .rels
        .children
        .iter()
        .filter(|cid| {
            graph.get(cid).is_some_and(|c| {
                c.rels.parent_slot(missing).is_none()
                    && c.rels.parent_slot(missing.opposite()).as_deref() == Some(pid)
            })
        })
        .cloned()
        .collect();
    if orphans.is_empty() {
        return;
    }

    let existing = p
        .rels
        .spouses
        .iter()
        .find(|sid| {
            graph
                .get(sid)
                .is_some_and(|s| s.to_add && s.gender() == Some(missing))
        })
        .cloned();
    let qid = match existing {
        Some(id) => id,
        None => {
            let id = graph.new_person_id();
            graph.insert(Person::placeholder(id.clone(), missing));
            if let Some(q) = graph.get_mut(&id) {
                q.rels.spouses.push(pid.to_string());
            }
            if let Some(p) = graph.get_mut(pid) {
                p.rels.spouses.push(id.clone());
            }
            id
        }
    };

    for cid in orphans {
        if let Some(c) = graph.get_mut(&cid) {
            *c.rels.parent_slot_mut(missing) = Some(qid.clone());
        }
        if let Some(q) = graph.get_mut(&qid) {
            if !q.rels.children.contains(&cid) {
                q.rels.children.push(cid);
            }
        }
    }
}
