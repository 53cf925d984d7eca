//! Duplicate-branch resolution.
//!
//! A branch reached through more than one line (consanguinity, merged
//! family lines) appears once per path. Each appearance keeps its cards,
//! but only appearances whose toggle is positive keep their subtree; the
//! rest collapse to a handle the renderer draws from the shared
//! `toggle_id`. Toggle values are signed millisecond timestamps stored on
//! the person, keyed by the path context: the hierarchy parent on the
//! ancestry side, the `(parent, spouse)` pair on the progeny side.

use crate::config::ChartConfig;
use crate::hierarchy::other_parent_id;
use famchart_core::PersonGraph;
use rustc_hash::{FxHashMap, FxHashSet};
use tidytree::Hierarchy;

/// Toggle key for appearances sitting directly above or below the focus.
pub(crate) const MAIN_CONTEXT: &str = "main";

#[derive(Debug, Clone)]
pub(crate) struct ToggleState {
    pub value: i64,
    pub toggle_id: String,
}

/// A progeny-side toggle, kept around so the final pass can surface the
/// handle on the matching spouse card as well.
#[derive(Debug, Clone)]
pub(crate) struct ProgenyToggle {
    pub parent_id: String,
    pub spouse_id: Option<String>,
    pub value: i64,
    pub toggle_id: String,
}

pub(crate) fn resolve_ancestry(
    graph: &mut PersonGraph,
    h: &mut Hierarchy<String>,
    cfg: &ChartConfig,
) -> FxHashMap<usize, ToggleState> {
    let mut out = FxHashMap::default();
    let order = h.pre_order();
    let mut grouped: FxHashSet<usize> = FxHashSet::default();
    let mut detached: FxHashSet<usize> = FxHashSet::default();

    for &idx in &order {
        if grouped.contains(&idx) || detached.contains(&idx) {
            continue;
        }
        let Some(key) = branch_key(h, idx) else {
            continue;
        };
        let members: Vec<usize> = order
            .iter()
            .copied()
            .filter(|j| !detached.contains(j))
            .filter(|&j| branch_key(h, j).as_deref() == Some(key.as_str()))
            .collect();
        if members.len() < 2 {
            continue;
        }
        grouped.extend(members.iter().copied());
        let toggle_id = toggle_id_for(&key);

        let mut states: Vec<(usize, String, i64)> = members
            .iter()
            .map(|&m| {
                let context = match h.node(m).parent {
                    Some(p) if p != h.root() => h.node(p).data.clone(),
                    _ => MAIN_CONTEXT.to_string(),
                };
                let value = graph
                    .get(&h.node(m).data)
                    .and_then(|p| p.tgdp.get(&context))
                    .copied()
                    .unwrap_or(-1);
                (m, context, value)
            })
            .collect();
        if cfg.on_toggle_one_close_others {
            enforce_single_open(&mut states, |graph: &mut PersonGraph, m, context, value| {
                if let Some(p) = graph.get_mut(&h.node(m).data) {
                    p.tgdp.insert(context.to_string(), value);
                }
            }, graph);
        }

        for (m, _, value) in &states {
            out.insert(
                *m,
                ToggleState {
                    value: *value,
                    toggle_id: toggle_id.clone(),
                },
            );
            if *value < 0 {
                detach_subtree(h, *m, &mut detached);
            }
        }
    }
    out
}

pub(crate) fn resolve_progeny(
    graph: &mut PersonGraph,
    h: &mut Hierarchy<String>,
    cfg: &ChartConfig,
) -> (FxHashMap<usize, ToggleState>, Vec<ProgenyToggle>) {
    let mut out = FxHashMap::default();
    let mut records = Vec::new();
    let order = h.pre_order();
    let mut grouped: FxHashSet<usize> = FxHashSet::default();
    let mut detached: FxHashSet<usize> = FxHashSet::default();

    for &idx in &order {
        if idx == h.root() || grouped.contains(&idx) || detached.contains(&idx) {
            continue;
        }
        let Some(key) = branch_key(h, idx) else {
            continue;
        };
        let members: Vec<usize> = order
            .iter()
            .copied()
            .filter(|&j| j != h.root() && !detached.contains(&j))
            .filter(|&j| branch_key(h, j).as_deref() == Some(key.as_str()))
            .collect();
        if members.len() < 2 {
            continue;
        }
        grouped.extend(members.iter().copied());
        let toggle_id = toggle_id_for(&key);

        // Context is the pair of parents the appearance hangs under: the
        // hierarchy parent plus the member's other biological parent.
        let mut states: Vec<(usize, (String, Option<String>), i64)> = members
            .iter()
            .map(|&m| {
                let parent_id = match h.node(m).parent {
                    Some(p) => h.node(p).data.clone(),
                    None => MAIN_CONTEXT.to_string(),
                };
                let spouse_id = other_parent_id(graph, &h.node(m).data, &parent_id);
                let value = graph
                    .get(&h.node(m).data)
                    .and_then(|p| p.tgdp_sp.get(&parent_id))
                    .and_then(|by_spouse| by_spouse.get(spouse_id.as_deref().unwrap_or("")))
                    .copied()
                    .unwrap_or(-1);
                (m, (parent_id, spouse_id), value)
            })
            .collect();
        if cfg.on_toggle_one_close_others {
            enforce_single_open(&mut states, |graph: &mut PersonGraph, m, context, value| {
                if let Some(p) = graph.get_mut(&h.node(m).data) {
                    p.tgdp_sp
                        .entry(context.0.clone())
                        .or_default()
                        .insert(context.1.clone().unwrap_or_default(), value);
                }
            }, graph);
        }

        for (m, (parent_id, spouse_id), value) in &states {
            out.insert(
                *m,
                ToggleState {
                    value: *value,
                    toggle_id: toggle_id.clone(),
                },
            );
            records.push(ProgenyToggle {
                parent_id: parent_id.clone(),
                spouse_id: spouse_id.clone(),
                value: *value,
                toggle_id: toggle_id.clone(),
            });
            // A collapsed appearance hides the co-parent's cards with it;
            // park her toggle states so they survive until the branch
            // reopens.
            let co_parent = spouse_id.clone();
            if *value < 0 {
                if let Some(sp) = co_parent.and_then(|id| graph.get_mut(&id)) {
                    if !sp.tgdp_sp.is_empty() && sp.tgdp_sp_stash.is_empty() {
                        sp.tgdp_sp_stash = std::mem::take(&mut sp.tgdp_sp);
                    }
                }
                detach_subtree(h, *m, &mut detached);
            } else if let Some(sp) = co_parent.and_then(|id| graph.get_mut(&id)) {
                if !sp.tgdp_sp_stash.is_empty() {
                    sp.tgdp_sp = std::mem::take(&mut sp.tgdp_sp_stash);
                }
            }
        }
    }
    (out, records)
}

/// When every appearance is collapsed, the first one opens; when several
/// are open, the most recent timestamp wins and the rest flip shut. The
/// decisions are written back through `write` so they stick across
/// relayouts.
fn enforce_single_open<C: Clone>(
    states: &mut [(usize, C, i64)],
    write: impl Fn(&mut PersonGraph, usize, &C, i64),
    graph: &mut PersonGraph,
) {
    if states.iter().all(|(_, _, v)| *v < 0) {
        let (m, context, v) = &mut states[0];
        *v = 1;
        let context = context.clone();
        write(graph, *m, &context, 1);
        return;
    }
    let best = states
        .iter()
        .filter(|(_, _, v)| *v > 0)
        .map(|(_, _, v)| *v)
        .max()
        .unwrap_or(0);
    let mut kept = false;
    for (m, context, v) in states.iter_mut() {
        if *v > 0 {
            if *v == best && !kept {
                kept = true;
            } else {
                *v = -*v;
                let context = context.clone();
                write(graph, *m, &context, *v);
            }
        }
    }
}

/// The identity of a branch: the person it belongs to plus the set of
/// child ids below it. Two appearances of the same person always carry
/// the same children, so equal keys mean "same branch, different path".
fn branch_key(h: &Hierarchy<String>, idx: usize) -> Option<String> {
    let mut ids = h.child_data(idx, |d| d.clone());
    if ids.is_empty() {
        return None;
    }
    ids.sort();
    Some(format!("{}\u{2}{}", h.node(idx).data, ids.join("\u{1}")))
}

fn toggle_id_for(key: &str) -> String {
    format!("tg:{}", key.replace(['\u{1}', '\u{2}'], "+"))
}

fn detach_subtree(h: &mut Hierarchy<String>, idx: usize, detached: &mut FxHashSet<usize>) {
    let mut stack: Vec<usize> = h.node(idx).children.to_vec();
    while let Some(i) = stack.pop() {
        if detached.insert(i) {
            stack.extend(h.node(i).children.iter().copied());
        }
    }
    h.clear_children(idx);
}
