use tidytree::{Hierarchy, TreeLayout};

/// Builds a hierarchy from `(id, children)` edge lists.
fn tree(edges: &[(&str, &[&str])]) -> Hierarchy<String> {
    let root = edges[0].0.to_string();
    Hierarchy::build(root, None, |id, _| {
        edges
            .iter()
            .find(|(p, _)| p == id)
            .map(|(_, kids)| kids.iter().map(|k| k.to_string()).collect())
            .unwrap_or_default()
    })
}

fn pos(h: &Hierarchy<String>, id: &str) -> (f64, f64) {
    let i = h
        .descendants()
        .into_iter()
        .find(|&i| h.node(i).data == id)
        .unwrap();
    (h.node(i).x, h.node(i).y)
}

#[test]
fn root_sits_at_origin() {
    let mut h = tree(&[("r", &["a", "b"])]);
    TreeLayout::new().layout(&mut h);
    assert_eq!(pos(&h, "r"), (0.0, 0.0));
}

#[test]
fn two_leaves_straddle_the_root() {
    let mut h = tree(&[("r", &["a", "b"])]);
    TreeLayout::new().layout(&mut h);
    assert_eq!(pos(&h, "a"), (-0.5, 1.0));
    assert_eq!(pos(&h, "b"), (0.5, 1.0));
}

#[test]
fn three_leaves_center_on_the_middle_child() {
    let mut h = tree(&[("r", &["a", "b", "c"])]);
    TreeLayout::new().layout(&mut h);
    assert_eq!(pos(&h, "a").0, -1.0);
    assert_eq!(pos(&h, "b").0, 0.0);
    assert_eq!(pos(&h, "c").0, 1.0);
}

#[test]
fn node_size_scales_both_axes() {
    let mut h = tree(&[("r", &["a", "b"])]);
    TreeLayout::new().node_size(250.0, 150.0).layout(&mut h);
    assert_eq!(pos(&h, "a"), (-125.0, 150.0));
    assert_eq!(pos(&h, "b"), (125.0, 150.0));
}

#[test]
fn cousins_get_the_wider_default_gap() {
    let mut h = tree(&[("r", &["a", "b"]), ("a", &["a1"]), ("b", &["b1"])]);
    TreeLayout::new().layout(&mut h);
    // Cousins a1/b1 must be 2 apart (default cousin separation), which
    // pushes the parents to +/-1 as well.
    assert_eq!(pos(&h, "a1").0, -1.0);
    assert_eq!(pos(&h, "b1").0, 1.0);
    assert_eq!(pos(&h, "a").0, -1.0);
    assert_eq!(pos(&h, "b").0, 1.0);
    assert_eq!(pos(&h, "r").0, 0.0);
}

#[test]
fn parent_centers_over_an_uneven_pair() {
    let mut h = tree(&[("r", &["a", "b"]), ("a", &["a1", "a2"])]);
    TreeLayout::new().layout(&mut h);
    assert_eq!(pos(&h, "a1").0, -1.0);
    assert_eq!(pos(&h, "a2").0, 0.0);
    assert_eq!(pos(&h, "a").0, -0.5);
    assert_eq!(pos(&h, "b").0, 0.5);
}

#[test]
fn deep_conflict_spreads_interior_siblings() {
    // p and r carry three-level chains; q is a leaf caught between them.
    // The chains conflict at depth 1..3 and force r right; q must end up
    // midway between p and r rather than glued to p.
    let mut h = tree(&[
        ("r0", &["p", "q", "r"]),
        ("p", &["p1"]),
        ("p1", &["p2", "p3"]),
        ("r", &["r1"]),
        ("r1", &["r2", "r3"]),
    ]);
    TreeLayout::new().layout(&mut h);
    let (px, _) = pos(&h, "p");
    let (qx, _) = pos(&h, "q");
    let (rx, _) = pos(&h, "r");
    assert!(px < qx && qx < rx);
    assert!((qx - px - (rx - qx)).abs() < 1e-9);
    // The grandchildren of p and r keep at least the cousin gap.
    assert!(pos(&h, "r2").0 - pos(&h, "p3").0 >= 2.0 - 1e-9);
}

#[test]
fn custom_separation_widens_sibling_gaps() {
    let mut h = tree(&[("r", &["a", "b"])]);
    TreeLayout::new().separation(|_, _| 2.0).layout(&mut h);
    assert_eq!(pos(&h, "a").0, -1.0);
    assert_eq!(pos(&h, "b").0, 1.0);
}

#[test]
fn detached_subtrees_are_ignored() {
    let mut h = tree(&[("r", &["a", "b"]), ("a", &["a1", "a2"])]);
    let a = h
        .descendants()
        .into_iter()
        .find(|&i| h.node(i).data == "a")
        .unwrap();
    h.clear_children(a);
    TreeLayout::new().layout(&mut h);
    assert_eq!(pos(&h, "a").0, -0.5);
    assert_eq!(pos(&h, "b").0, 0.5);
    assert_eq!(h.descendants().len(), 3);
}

#[test]
fn build_respects_max_depth() {
    let h = Hierarchy::build(0u32, Some(2), |n, _| vec![n * 2 + 1, n * 2 + 2]);
    assert_eq!(h.height(), 2);
    assert_eq!(h.descendants().len(), 7);
}
