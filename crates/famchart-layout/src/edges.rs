//! Edge endpoints.
//!
//! Each card records where its connections start and end, by arena index
//! (tids at emission): the focus sends upward edges to its parent cards,
//! ancestors chain upward through `from`/`to`, descendants draw from
//! their layout parent and the matching spouse card (registering the
//! back-pointer on both), spouse cards hang off their partner, siblings
//! draw from the focus's parents.

use crate::engine::TNode;
use crate::error::{Error, Result};
use crate::hierarchy;
use famchart_core::PersonGraph;

pub(crate) fn assign_edges(graph: &PersonGraph, nodes: &mut [TNode]) -> Result<()> {
    for i in 0..nodes.len() {
        if nodes[i].main {
            nodes[i].to_ancestry = nodes[i].parents.clone();
            continue;
        }
        if nodes[i].added {
            nodes[i].from_spouse = nodes[i].spouse_of;
            continue;
        }
        if nodes[i].is_ancestry {
            let Some(parent) = nodes[i].tree_parent else {
                return Err(Error::Inconsistent {
                    message: format!("ancestor card {} has no tree parent", nodes[i].person_id),
                });
            };
            nodes[i].from = vec![parent];
            nodes[i].to = nodes[i].parents.clone();
            continue;
        }
        if nodes[i].sibling {
            nodes[i].from = nodes[i].parents.clone();
            continue;
        }

        let Some(p1) = nodes[i].tree_parent else {
            return Err(Error::Inconsistent {
                message: format!("descendant card {} has no tree parent", nodes[i].person_id),
            });
        };
        let other = hierarchy::other_parent_id(graph, &nodes[i].person_id, &nodes[p1].person_id);
        let p2 = other.and_then(|o| {
            nodes[p1]
                .spouses
                .iter()
                .copied()
                .find(|&s| nodes[s].person_id == o)
        });
        let mut from = vec![p1];
        from.extend(p2);
        for &f in &from {
            nodes[f].to.push(i);
        }
        nodes[i].from = from;
    }
    Ok(())
}
