//! Privacy marking.
//!
//! Privacy is contagious along parent and spouse links: a person is
//! private when the configured predicate matches them, one of their
//! parents, or one of their spouses, transitively. Computed as a fixpoint
//! from the matching seeds so spouse cycles terminate. Placeholders never
//! participate.

use crate::config::ChartConfig;
use crate::engine::TNode;
use famchart_core::PersonGraph;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

pub(crate) fn mark_private(graph: &PersonGraph, nodes: &mut [TNode], cfg: &ChartConfig) {
    let Some(condition) = &cfg.private_cards_condition else {
        return;
    };

    let mut private: FxHashSet<String> = FxHashSet::default();
    let mut queue: VecDeque<String> = VecDeque::new();
    for p in graph.iter() {
        if p.is_real() && condition(p) {
            private.insert(p.id.clone());
            queue.push_back(p.id.clone());
        }
    }

    // Privacy flows downward to children and across to spouses.
    while let Some(src) = queue.pop_front() {
        for p in graph.iter() {
            if !p.is_real() || private.contains(&p.id) {
                continue;
            }
            let inherits = p.rels.father.as_deref() == Some(src.as_str())
                || p.rels.mother.as_deref() == Some(src.as_str())
                || p.rels.spouses.iter().any(|s| *s == src);
            if inherits {
                private.insert(p.id.clone());
                queue.push_back(p.id.clone());
            }
        }
    }

    for n in nodes.iter_mut() {
        n.is_private = private.contains(&n.person_id);
    }
}
