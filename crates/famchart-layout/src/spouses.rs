//! Spouse placement and parent attach points.
//!
//! Spouses are not part of the tidy-tree walk; they are injected beside
//! their partner afterwards, walking the arena in reverse so deeper
//! generations settle before the couples above them. The partner shifts
//! sideways to make room (left for men, spouses fanning out to the right;
//! mirrored for women), and ancestor couples are pulled to exactly one
//! separation around their midpoint.

use crate::config::ChartConfig;
use crate::engine::TNode;
use famchart_core::{Gender, PersonGraph};
use std::cmp::Ordering;

pub(crate) fn place_spouses(
    graph: &PersonGraph,
    nodes: &mut Vec<TNode>,
    cfg: &ChartConfig,
    nsep: f64,
) {
    let initial = nodes.len();
    for i in (0..initial).rev() {
        tighten_parent_couple(nodes, i, nsep);

        if nodes[i].is_ancestry {
            continue;
        }
        let Some(person) = graph.get(&nodes[i].person_id) else {
            continue;
        };
        let mut spouse_ids: Vec<String> = person
            .rels
            .spouses
            .iter()
            .filter(|s| graph.contains(s))
            .cloned()
            .collect();
        if spouse_ids.is_empty() {
            continue;
        }
        if let Some(cmp) = &cfg.sort_spouses {
            spouse_ids.sort_by(|a, b| match (graph.get(a), graph.get(b)) {
                (Some(pa), Some(pb)) => cmp(pa, pb),
                _ => Ordering::Equal,
            });
        }

        let side = if person.gender() == Some(Gender::Male) {
            -1.0
        } else {
            1.0
        };
        let count = spouse_ids.len() as f64;
        nodes[i].x += count / 2.0 * nsep * side;
        for (j, sid) in spouse_ids.into_iter().enumerate() {
            let mut sp = TNode::new(sid, nodes[i].depth, false);
            sp.added = true;
            sp.spouse_of = Some(i);
            sp.x = nodes[i].x - nsep * (j as f64 + 1.0) * side;
            sp.y = nodes[i].y;
            // The first spouse owns the midpoint between the partners;
            // further spouses attach children directly under themselves.
            sp.sx = Some(if j == 0 { sp.x + nsep / 2.0 * side } else { sp.x });
            sp.sy = Some(sp.y);
            let idx = nodes.len();
            nodes.push(sp);
            nodes[i].spouses.push(idx);
        }
    }
}

/// An ancestor pair spreads during the tidy walk when one side carries a
/// wide subtree; pull the two cards back to one separation around their
/// midpoint and link them as spouses.
fn tighten_parent_couple(nodes: &mut [TNode], i: usize, nsep: f64) {
    if nodes[i].parents.len() != 2 {
        return;
    }
    let p1 = nodes[i].parents[0];
    let p2 = nodes[i].parents[1];
    let mid = (nodes[p1].x + nodes[p2].x) / 2.0;
    let (left, right) = if nodes[p1].x <= nodes[p2].x {
        (p1, p2)
    } else {
        (p2, p1)
    };
    nodes[left].x = mid - nsep / 2.0;
    nodes[right].x = mid + nsep / 2.0;
    if !nodes[p1].spouses.contains(&p2) {
        nodes[p1].spouses.push(p2);
    }
    if !nodes[p2].spouses.contains(&p1) {
        nodes[p2].spouses.push(p1);
    }
}

/// Finds, for every laid-out descendant, the card its upward edge should
/// attach to: among the layout parent and its spouse cards, the one that
/// is a biological parent, preferring the injected spouse card when both
/// parents are present so edges meet the midpoint between the couple.
pub(crate) fn compute_parent_attach(graph: &PersonGraph, nodes: &mut [TNode]) {
    for i in 0..nodes.len() {
        if nodes[i].main || nodes[i].is_ancestry || nodes[i].added || nodes[i].sibling {
            continue;
        }
        let Some(p1) = nodes[i].tree_parent else {
            continue;
        };
        let Some(person) = graph.get(&nodes[i].person_id) else {
            continue;
        };
        let bio: Vec<&str> = [&person.rels.father, &person.rels.mother]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect();

        let mut candidates: Vec<usize> = vec![p1];
        candidates.extend(nodes[p1].spouses.iter().copied());
        let matching: Vec<usize> = candidates
            .into_iter()
            .filter(|&c| bio.contains(&nodes[c].person_id.as_str()))
            .collect();
        let chosen = matching
            .iter()
            .copied()
            .find(|&c| nodes[c].added)
            .or_else(|| matching.first().copied())
            .unwrap_or(p1);

        nodes[i].psx = Some(nodes[chosen].sx.unwrap_or(nodes[chosen].x));
        nodes[i].psy = Some(nodes[chosen].sy.unwrap_or(nodes[chosen].y));
    }
}
