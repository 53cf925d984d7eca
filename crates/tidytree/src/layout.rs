//! Reingold-Tilford tidy layout.
//!
//! Post-order walk assigns each node a preliminary x within its parent's
//! frame, resolving subtree overlap by scanning the left contour of the
//! subtree being placed against the right contours of every already-placed
//! sibling subtree. When a conflict forces a subtree to the right, the
//! shift is spread linearly over the siblings between the conflict source
//! and the shifted subtree, which is what keeps interior gaps even.
//!
//! The separation function is consulted with the two concrete nodes facing
//! each other across a gap, so callers can widen gaps based on node data
//! (the default mirrors d3: 1 between siblings, 2 between cousins).

use crate::hierarchy::{Hierarchy, Node};

pub struct TreeLayout<'a, T> {
    dx: f64,
    dy: f64,
    separation: Box<dyn Fn(&Node<T>, &Node<T>) -> f64 + 'a>,
}

impl<T> Default for TreeLayout<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> TreeLayout<'a, T> {
    pub fn new() -> Self {
        Self {
            dx: 1.0,
            dy: 1.0,
            separation: Box::new(|a, b| if a.parent == b.parent { 1.0 } else { 2.0 }),
        }
    }

    /// Horizontal unit (multiplies every x) and per-level vertical step.
    pub fn node_size(mut self, dx: f64, dy: f64) -> Self {
        self.dx = dx;
        self.dy = dy;
        self
    }

    /// Pairwise gap, in multiples of the horizontal unit, between two nodes
    /// adjacent across a subtree boundary.
    pub fn separation<F>(mut self, f: F) -> Self
    where
        F: Fn(&Node<T>, &Node<T>) -> f64 + 'a,
    {
        self.separation = Box::new(f);
        self
    }

    /// Assigns `x`/`y` to every reachable node. The root lands at `(0, 0)`.
    pub fn layout(&self, h: &mut Hierarchy<T>) {
        let mut st = Walk {
            prelim: vec![0.0; h.arena_len()],
            shift: vec![0.0; h.arena_len()],
        };
        self.first_walk(h, &mut st, h.root());

        // Second walk: accumulate subtree shifts top-down and normalize so
        // the root sits at x = 0.
        let offset = -st.prelim[h.root()];
        let mut stack = vec![(h.root(), 0.0)];
        while let Some((v, modsum)) = stack.pop() {
            let x = (st.prelim[v] + modsum + offset) * self.dx;
            let y = h.node(v).depth as f64 * self.dy;
            let children: Vec<usize> = h.node(v).children.clone();
            let child_mod = modsum + st.shift[v];
            {
                let node = h.node_mut(v);
                node.x = x;
                node.y = y;
            }
            stack.extend(children.into_iter().map(|c| (c, child_mod)));
        }
    }

    fn first_walk(&self, h: &Hierarchy<T>, st: &mut Walk, v: usize) {
        let children: Vec<usize> = h.node(v).children.clone();
        for &c in &children {
            self.first_walk(h, st, c);
        }
        if children.is_empty() {
            st.prelim[v] = 0.0;
            return;
        }

        for k in 1..children.len() {
            self.place_child(h, st, &children, k);
        }

        let first = children[0];
        let last = children[children.len() - 1];
        st.prelim[v] = (st.prelim[first] + st.prelim[last]) / 2.0;
    }

    /// Places `children[k]` one separation to the right of its left
    /// sibling, then pushes it further right until its subtree clears every
    /// previously-placed sibling subtree. A residual shift caused by a
    /// non-adjacent sibling is spread linearly over the siblings between
    /// the conflict source and `k`, which keeps interior gaps even.
    fn place_child(&self, h: &Hierarchy<T>, st: &mut Walk, children: &[usize], k: usize) {
        let c = children[k];
        let prev = children[k - 1];
        let base = st.prelim[prev] + (self.separation)(h.node(c), h.node(prev));
        let delta = base - st.prelim[c];
        st.prelim[c] += delta;
        st.shift[c] += delta;

        let left = self.contour(h, st, c, false);
        let mut shift = 0.0f64;
        let mut source = k - 1;
        for (j, &sib) in children.iter().enumerate().take(k).rev() {
            let right = self.contour(h, st, sib, true);
            for depth in 0..right.len().min(left.len()) {
                let r = &right[depth];
                let l = &left[depth];
                let gap = (self.separation)(h.node(r.node), h.node(l.node));
                let needed = r.x + gap - l.x;
                if needed > shift {
                    shift = needed;
                    source = j;
                }
            }
        }
        if shift <= 0.0 {
            return;
        }

        st.prelim[c] += shift;
        st.shift[c] += shift;
        for (j, &sib) in children.iter().enumerate().take(k).skip(source + 1) {
            let frac = (j - source) as f64 / (k - source) as f64;
            st.prelim[sib] += shift * frac;
            st.shift[sib] += shift * frac;
        }
    }

    /// Left (min-x) or right (max-x) contour of the subtree rooted at `v`,
    /// indexed by depth relative to `v`, carrying the node that owns each
    /// extreme so the separation function can inspect it.
    fn contour(&self, h: &Hierarchy<T>, st: &Walk, v: usize, rightmost: bool) -> Vec<ContourEntry> {
        let mut out: Vec<Option<ContourEntry>> = Vec::new();
        let mut stack = vec![(v, 0.0f64, 0usize)];
        while let Some((n, modsum, depth)) = stack.pop() {
            let x = st.prelim[n] + modsum;
            if out.len() <= depth {
                out.resize(depth + 1, None);
            }
            let slot = &mut out[depth];
            let better = match slot {
                None => true,
                Some(e) => {
                    if rightmost {
                        x > e.x
                    } else {
                        x < e.x
                    }
                }
            };
            if better {
                *slot = Some(ContourEntry { x, node: n });
            }
            let child_mod = modsum + st.shift[n];
            stack.extend(h.node(n).children.iter().map(|&c| (c, child_mod, depth + 1)));
        }
        out.into_iter().flatten().collect()
    }
}

struct Walk {
    prelim: Vec<f64>,
    /// Offset applied to the whole subtree below a node (the classic "mod").
    shift: Vec<f64>,
}

#[derive(Debug, Clone)]
struct ContourEntry {
    x: f64,
    node: usize,
}
