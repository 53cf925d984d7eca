//! Hierarchy construction for the two sides of the chart.
//!
//! The progeny hierarchy grows down from the focus through `children`;
//! the ancestry hierarchy grows up through `[father, mother]`. Both carry
//! person ids as node data and cap their depth, which doubles as a
//! termination guard against malformed cyclic data.

use crate::config::ChartConfig;
use famchart_core::{Gender, PersonGraph};
use tidytree::Hierarchy;

pub(crate) fn progeny_hierarchy(
    graph: &PersonGraph,
    main_id: &str,
    cfg: &ChartConfig,
) -> Hierarchy<String> {
    let max_depth = side_depth(cfg, cfg.progeny_depth, graph);
    Hierarchy::build(main_id.to_string(), Some(max_depth), |id, _| {
        ordered_children(graph, id, cfg)
    })
}

pub(crate) fn ancestry_hierarchy(
    graph: &PersonGraph,
    main_id: &str,
    cfg: &ChartConfig,
) -> Hierarchy<String> {
    let max_depth = side_depth(cfg, cfg.ancestry_depth, graph);
    Hierarchy::build(main_id.to_string(), Some(max_depth), |id, _| {
        let Some(p) = graph.get(id) else {
            return Vec::new();
        };
        [&p.rels.father, &p.rels.mother]
            .into_iter()
            .flatten()
            .filter(|pid| {
                let known = graph.contains(pid);
                if !known {
                    tracing::warn!(target: "famchart", person = %id, missing = %pid, "skipping unresolved parent id");
                }
                known
            })
            .cloned()
            .collect()
    })
}

fn side_depth(cfg: &ChartConfig, side: Option<u32>, graph: &PersonGraph) -> usize {
    if cfg.one_level_rels {
        1
    } else {
        // The graph size caps recursion even if the data smuggles a cycle.
        side.map(|d| d as usize).unwrap_or(graph.len())
    }
}

/// A person's children in display order: user comparator first, then
/// in-flight drafts to the end, then grouped by the parent's spouse
/// sequence (earlier spouses first, mirrored for female parents so the
/// spouse row reads outward from the focus).
pub(crate) fn ordered_children(graph: &PersonGraph, pid: &str, cfg: &ChartConfig) -> Vec<String> {
    let Some(p) = graph.get(pid) else {
        return Vec::new();
    };
    let mut kids: Vec<String> = p
        .rels
        .children
        .iter()
        .filter(|cid| {
            let known = graph.contains(cid);
            if !known {
                tracing::warn!(target: "famchart", person = %pid, missing = %cid, "skipping unresolved child id");
            }
            known
        })
        .cloned()
        .collect();

    if let Some(cmp) = &cfg.sort_children {
        kids.sort_by(|a, b| match (graph.get(a), graph.get(b)) {
            (Some(pa), Some(pb)) => cmp(pa, pb),
            _ => std::cmp::Ordering::Equal,
        });
    }
    kids.sort_by_key(|cid| graph.get(cid).is_some_and(|c| c.new_rel_data.is_some()));

    let mut spouse_rank: Vec<&String> = p.rels.spouses.iter().collect();
    if p.gender() == Some(Gender::Female) {
        spouse_rank.reverse();
    }
    kids.sort_by_key(|cid| {
        other_parent_id(graph, cid, pid)
            .and_then(|other| spouse_rank.iter().position(|s| **s == other))
            .unwrap_or(usize::MAX)
    });
    kids
}

/// The parent of `child_id` that is not `parent_id`.
pub(crate) fn other_parent_id(
    graph: &PersonGraph,
    child_id: &str,
    parent_id: &str,
) -> Option<String> {
    let c = graph.get(child_id)?;
    [&c.rels.father, &c.rels.mother]
        .into_iter()
        .flatten()
        .find(|p| *p != parent_id)
        .cloned()
}
