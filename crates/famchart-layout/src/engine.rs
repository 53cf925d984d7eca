//! The layout pipeline.
//!
//! Two hierarchies (progeny down, ancestry up) are built from the graph,
//! trimmed, cleaned of duplicate branches, laid out with the tidy-tree
//! algorithm, merged around the focus, then decorated: spouse cards,
//! parent attach points, siblings, privacy, layout-unique ids, edge
//! endpoints and canvas dimensions.

use crate::config::{ChartConfig, TreeSide};
use crate::duplicates::{self, ProgenyToggle, ToggleState};
use crate::error::{Error, Result};
use crate::hierarchy;
use crate::node::{Layout, LayoutDim, LayoutNode};
use crate::{edges, privacy, siblings, spouses};
use famchart_core::{augment, Person, PersonGraph};
use rustc_hash::{FxHashMap, FxHashSet};
use tidytree::{Hierarchy, TreeLayout};

/// One appearance of a person while the pipeline runs: interlinked by
/// index inside a flat arena, emitted as tid-linked [`LayoutNode`]s.
#[derive(Debug, Clone)]
pub(crate) struct TNode {
    pub person_id: String,
    pub x: f64,
    pub y: f64,
    pub depth: i32,
    pub is_ancestry: bool,
    pub added: bool,
    pub sibling: bool,
    pub main: bool,
    pub tree_parent: Option<usize>,
    pub spouse_of: Option<usize>,
    pub spouses: Vec<usize>,
    pub parents: Vec<usize>,
    pub children: Vec<usize>,
    pub from: Vec<usize>,
    pub to: Vec<usize>,
    pub to_ancestry: Vec<usize>,
    pub from_spouse: Option<usize>,
    pub sx: Option<f64>,
    pub sy: Option<f64>,
    pub psx: Option<f64>,
    pub psy: Option<f64>,
    pub toggle: Option<i64>,
    pub toggle_id: Option<String>,
    pub duplicate: Option<usize>,
    pub all_rels_displayed: bool,
    pub is_private: bool,
    pub tid: String,
}

impl TNode {
    pub(crate) fn new(person_id: String, depth: i32, is_ancestry: bool) -> Self {
        Self {
            person_id,
            x: 0.0,
            y: 0.0,
            depth,
            is_ancestry,
            added: false,
            sibling: false,
            main: false,
            tree_parent: None,
            spouse_of: None,
            spouses: Vec::new(),
            parents: Vec::new(),
            children: Vec::new(),
            from: Vec::new(),
            to: Vec::new(),
            to_ancestry: Vec::new(),
            from_spouse: None,
            sx: None,
            sy: None,
            psx: None,
            psy: None,
            toggle: None,
            toggle_id: None,
            duplicate: None,
            all_rels_displayed: false,
            is_private: false,
            tid: String::new(),
        }
    }
}

/// Computes the layout for `main_id` (or the first person when unset).
///
/// Mutates the graph in two documented ways: placeholder augmentation
/// when `single_parent_empty_card` is on, and duplicate-toggle defaults
/// written back so forced states survive relayouts.
pub fn calculate_tree(
    graph: &mut PersonGraph,
    main_id: Option<&str>,
    cfg: &ChartConfig,
) -> Result<Layout> {
    if cfg.single_parent_empty_card {
        augment::add_placeholder_spouses(graph);
    }
    let main_id = match main_id.filter(|id| graph.contains(id)) {
        Some(id) => id.to_string(),
        None => graph
            .first_id()
            .map(str::to_string)
            .ok_or(Error::EmptyGraph)?,
    };
    let (nsep, lsep) = cfg.effective_separations();

    let mut progeny = hierarchy::progeny_hierarchy(graph, &main_id, cfg);
    let mut ancestry = hierarchy::ancestry_hierarchy(graph, &main_id, cfg);
    if let Some(hook) = &cfg.modify_tree_hierarchy {
        hook(&mut progeny, TreeSide::Progeny);
        hook(&mut ancestry, TreeSide::Ancestry);
    }

    let mut progeny_toggles: FxHashMap<usize, ToggleState> = FxHashMap::default();
    let mut ancestry_toggles: FxHashMap<usize, ToggleState> = FxHashMap::default();
    let mut spouse_toggles: Vec<ProgenyToggle> = Vec::new();
    if cfg.duplicate_branch_toggle {
        ancestry_toggles = duplicates::resolve_ancestry(graph, &mut ancestry, cfg);
        let (toggles, records) = duplicates::resolve_progeny(graph, &mut progeny, cfg);
        progeny_toggles = toggles;
        spouse_toggles = records;
    }

    TreeLayout::new()
        .node_size(nsep, lsep)
        .separation(progeny_separation(graph))
        .layout(&mut progeny);
    TreeLayout::new()
        .node_size(nsep, lsep)
        .separation(|_, _| 1.0)
        .layout(&mut ancestry);

    let mut nodes = merge(&progeny, &ancestry, &progeny_toggles, &ancestry_toggles);
    wire_tree_links(&mut nodes);
    spouses::place_spouses(graph, &mut nodes, cfg, nsep);
    spouses::compute_parent_attach(graph, &mut nodes);
    siblings::place_siblings(graph, &mut nodes, &main_id, cfg, nsep);
    if cfg.is_horizontal {
        flip_axes(&mut nodes);
    }
    mark_all_rels_displayed(graph, &mut nodes);
    privacy::mark_private(graph, &mut nodes, cfg);
    assign_tids(&mut nodes);
    edges::assign_edges(graph, &mut nodes)?;
    attach_spouse_toggles(&mut nodes, &spouse_toggles);

    let dim = dimensions(&nodes, cfg);
    Ok(emit(nodes, dim, main_id, cfg.is_horizontal))
}

/// Sibling separation for the progeny side, in node-size units: a base
/// gap, widened for half-siblings and cousins, plus room for the spouse
/// cards both nodes will grow.
fn progeny_separation(
    graph: &PersonGraph,
) -> impl Fn(&tidytree::Node<String>, &tidytree::Node<String>) -> f64 + '_ {
    move |a, b| {
        let pa = graph.get(&a.data);
        let pb = graph.get(&b.data);
        let fa = pa.and_then(|p| p.rels.father.as_deref());
        let fb = pb.and_then(|p| p.rels.father.as_deref());
        let ma = pa.and_then(|p| p.rels.mother.as_deref());
        let mb = pb.and_then(|p| p.rels.mother.as_deref());

        let mut sep = 1.0;
        match (fa == fb, ma == mb) {
            (true, true) => {}
            (false, false) => sep += 0.25,
            _ => sep += 0.125,
        }
        let spouse_count =
            |p: Option<&Person>| p.map(|p| p.rels.spouses.len()).unwrap_or(0);
        sep += 0.5 * (spouse_count(pa) + spouse_count(pb)) as f64;
        sep
    }
}

/// Concatenates the laid-out hierarchies into one arena: progeny first
/// (the shared root is the focus), then ancestry with flipped y and
/// negated depth, aligned over the focus.
fn merge(
    progeny: &Hierarchy<String>,
    ancestry: &Hierarchy<String>,
    progeny_toggles: &FxHashMap<usize, ToggleState>,
    ancestry_toggles: &FxHashMap<usize, ToggleState>,
) -> Vec<TNode> {
    let mut nodes: Vec<TNode> = Vec::new();

    let mut pmap: FxHashMap<usize, usize> = FxHashMap::default();
    for i in progeny.descendants() {
        let hn = progeny.node(i);
        let mut n = TNode::new(hn.data.clone(), hn.depth as i32, false);
        n.x = hn.x;
        n.y = hn.y;
        n.tree_parent = hn.parent.map(|p| pmap[&p]);
        if let Some(t) = progeny_toggles.get(&i) {
            n.toggle = Some(t.value);
            n.toggle_id = Some(t.toggle_id.clone());
        }
        pmap.insert(i, nodes.len());
        nodes.push(n);
    }
    nodes[0].main = true;

    let x_shift = nodes[0].x - ancestry.node(ancestry.root()).x;
    let mut amap: FxHashMap<usize, usize> = FxHashMap::default();
    amap.insert(ancestry.root(), 0);
    for i in ancestry.descendants() {
        if i == ancestry.root() {
            if let Some(t) = ancestry_toggles.get(&i) {
                nodes[0].toggle = Some(t.value);
                nodes[0].toggle_id = Some(t.toggle_id.clone());
            }
            continue;
        }
        let hn = ancestry.node(i);
        let mut n = TNode::new(hn.data.clone(), -(hn.depth as i32), true);
        n.x = hn.x + x_shift;
        n.y = -hn.y;
        n.tree_parent = hn.parent.map(|p| amap[&p]);
        if let Some(t) = ancestry_toggles.get(&i) {
            n.toggle = Some(t.value);
            n.toggle_id = Some(t.toggle_id.clone());
        }
        amap.insert(i, nodes.len());
        nodes.push(n);
    }
    nodes
}

/// Partitions each node's tree children into `parents` (ancestry side,
/// where hierarchy children are the person's parents) or `children`.
fn wire_tree_links(nodes: &mut [TNode]) {
    for i in 1..nodes.len() {
        if let Some(tp) = nodes[i].tree_parent {
            if nodes[i].is_ancestry {
                nodes[tp].parents.push(i);
            } else {
                nodes[tp].children.push(i);
            }
        }
    }
}

fn flip_axes(nodes: &mut [TNode]) {
    for n in nodes.iter_mut() {
        std::mem::swap(&mut n.x, &mut n.y);
        std::mem::swap(&mut n.sx, &mut n.sy);
        std::mem::swap(&mut n.psx, &mut n.psy);
    }
}

fn mark_all_rels_displayed(graph: &PersonGraph, nodes: &mut [TNode]) {
    let displayed: FxHashSet<String> = nodes.iter().map(|n| n.person_id.clone()).collect();
    for n in nodes.iter_mut() {
        let Some(p) = graph.get(&n.person_id) else {
            continue;
        };
        n.all_rels_displayed = p.rels.all_ids().iter().all(|id| displayed.contains(*id));
    }
}

/// First appearance keeps the person id; the N-th duplicate appearance
/// gets `id--xN`. Every appearance of a multiply-shown person carries the
/// total count.
fn assign_tids(nodes: &mut [TNode]) {
    let mut total: FxHashMap<String, usize> = FxHashMap::default();
    for n in nodes.iter() {
        *total.entry(n.person_id.clone()).or_insert(0) += 1;
    }
    let mut seen: FxHashMap<String, usize> = FxHashMap::default();
    for n in nodes.iter_mut() {
        let occurrence = seen.entry(n.person_id.clone()).or_insert(0);
        *occurrence += 1;
        n.tid = if *occurrence == 1 {
            n.person_id.clone()
        } else {
            format!("{}--x{}", n.person_id, *occurrence - 1)
        };
        let count = total[&n.person_id];
        if count > 1 {
            n.duplicate = Some(count);
        }
    }
}

/// Surfaces progeny-side toggle handles on the spouse card of the
/// affected couple, so the renderer can draw the handle between the
/// parents whose branch is collapsed.
fn attach_spouse_toggles(nodes: &mut [TNode], toggles: &[ProgenyToggle]) {
    for t in toggles {
        let Some(spouse_id) = &t.spouse_id else {
            continue;
        };
        for i in 0..nodes.len() {
            if !nodes[i].added || nodes[i].person_id != *spouse_id {
                continue;
            }
            let partner_matches = nodes[i]
                .spouse_of
                .is_some_and(|p| nodes[p].person_id == t.parent_id);
            if partner_matches {
                nodes[i].toggle = Some(t.value);
                nodes[i].toggle_id = Some(t.toggle_id.clone());
            }
        }
    }
}

fn dimensions(nodes: &[TNode], cfg: &ChartConfig) -> LayoutDim {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for n in nodes {
        min_x = min_x.min(n.x);
        max_x = max_x.max(n.x);
        min_y = min_y.min(n.y);
        max_y = max_y.max(n.y);
    }
    LayoutDim {
        width: max_x - min_x + cfg.node_separation,
        height: max_y - min_y + cfg.level_separation,
        x_off: -min_x + cfg.node_separation / 2.0,
        y_off: -min_y + cfg.level_separation / 2.0,
    }
}

fn emit(nodes: Vec<TNode>, dim: LayoutDim, main_id: String, is_horizontal: bool) -> Layout {
    let tids: Vec<String> = nodes.iter().map(|n| n.tid.clone()).collect();
    let to_tids = |ids: &[usize]| ids.iter().map(|&i| tids[i].clone()).collect::<Vec<_>>();
    let out = nodes
        .iter()
        .map(|n| LayoutNode {
            tid: n.tid.clone(),
            id: n.person_id.clone(),
            x: n.x,
            y: n.y,
            enter_x: None,
            enter_y: None,
            depth: n.depth,
            is_ancestry: n.is_ancestry,
            sibling: n.sibling,
            added: n.added,
            main: n.main,
            spouse: n.spouse_of.map(|i| tids[i].clone()),
            parents: to_tids(&n.parents),
            children: to_tids(&n.children),
            spouses: to_tids(&n.spouses),
            from: to_tids(&n.from),
            to: to_tids(&n.to),
            to_ancestry: to_tids(&n.to_ancestry),
            from_spouse: n.from_spouse.map(|i| tids[i].clone()),
            sx: n.sx,
            sy: n.sy,
            psx: n.psx,
            psy: n.psy,
            duplicate: n.duplicate,
            toggle: n.toggle,
            toggle_id: n.toggle_id.clone(),
            all_rels_displayed: n.all_rels_displayed,
            is_private: n.is_private,
        })
        .collect();
    Layout {
        nodes: out,
        dim,
        main_id,
        is_horizontal,
    }
}
