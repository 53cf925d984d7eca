//! Siblings of the focus.
//!
//! Siblings share at least one parent with the focus and sit on its row,
//! attached to the focus's parent cards. They are split around the focus:
//! the sorted first half fans out to the left of the leftmost card of the
//! focus couple, the rest to the right of the rightmost.

use crate::config::ChartConfig;
use crate::engine::TNode;
use famchart_core::PersonGraph;
use std::cmp::Ordering;

pub(crate) fn place_siblings(
    graph: &PersonGraph,
    nodes: &mut Vec<TNode>,
    main_id: &str,
    cfg: &ChartConfig,
    nsep: f64,
) {
    if !cfg.show_siblings_of_main || cfg.one_level_rels {
        return;
    }
    if nodes[0].parents.is_empty() {
        return;
    }
    let Some(focus) = graph.get(main_id) else {
        return;
    };
    let father = focus.rels.father.as_deref();
    let mother = focus.rels.mother.as_deref();

    let mut sibs: Vec<String> = graph
        .iter()
        .filter(|p| p.id != main_id)
        .filter(|p| {
            (father.is_some() && p.rels.father.as_deref() == father)
                || (mother.is_some() && p.rels.mother.as_deref() == mother)
        })
        .map(|p| p.id.clone())
        .collect();
    if sibs.is_empty() {
        return;
    }

    if let Some(cmp) = &cfg.sort_children {
        sibs.sort_by(|a, b| match (graph.get(a), graph.get(b)) {
            (Some(pa), Some(pb)) => cmp(pa, pb),
            _ => Ordering::Equal,
        });
    }
    // Motherless siblings lead (they land on the left flank), fatherless
    // ones trail (right flank), everyone else keeps their order.
    sibs.sort_by_key(|sid| {
        graph
            .get(sid)
            .map(|p| {
                if p.rels.mother.is_none() {
                    0
                } else if p.rels.father.is_none() {
                    2
                } else {
                    1
                }
            })
            .unwrap_or(1)
    });

    // The focus couple's extent decides where each flank starts.
    let mut min_x = nodes[0].x;
    let mut max_x = nodes[0].x;
    for &sp in &nodes[0].spouses {
        min_x = min_x.min(nodes[sp].x);
        max_x = max_x.max(nodes[sp].x);
    }

    let parents = nodes[0].parents.clone();
    let psx = match parents.as_slice() {
        [a, b] => (nodes[*a].x + nodes[*b].x) / 2.0,
        [a] => nodes[*a].x,
        _ => nodes[0].x,
    };
    let psy = parents.first().map(|&a| nodes[a].y).unwrap_or(nodes[0].y);

    let left_count = sibs.len().div_ceil(2);
    for (idx, sid) in sibs.into_iter().enumerate() {
        let mut s = TNode::new(sid, 0, false);
        s.sibling = true;
        s.y = nodes[0].y;
        s.x = if idx < left_count {
            min_x - nsep * (left_count - idx) as f64
        } else {
            max_x + nsep * (idx - left_count + 1) as f64
        };
        s.parents = parents.clone();
        s.psx = Some(psx);
        s.psy = Some(psy);
        nodes.push(s);
    }
}
