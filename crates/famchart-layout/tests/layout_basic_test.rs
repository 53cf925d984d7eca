use famchart_core::{edit, Gender, Person, PersonGraph, RelType};
use famchart_layout::{calculate_tree, ChartConfig};

fn person(id: &str, gender: Gender) -> Person {
    let mut p = Person::new(id);
    p.set_gender(Some(gender));
    p
}

/// A(M) and B(F) married, with son C. Focus C.
fn couple_with_child() -> PersonGraph {
    let mut a = person("A", Gender::Male);
    let mut b = person("B", Gender::Female);
    let mut c = person("C", Gender::Male);
    a.rels.spouses.push("B".into());
    b.rels.spouses.push("A".into());
    a.rels.children.push("C".into());
    b.rels.children.push("C".into());
    c.rels.father = Some("A".into());
    c.rels.mother = Some("B".into());
    PersonGraph::from_persons(vec![a, b, c])
}

#[test]
fn single_child_with_both_parents_known() {
    let mut g = couple_with_child();
    let cfg = ChartConfig::default();
    let layout = calculate_tree(&mut g, Some("C"), &cfg).unwrap();

    assert_eq!(layout.nodes.len(), 3);
    assert_eq!(layout.main_id, "C");

    let c = layout.node("C").unwrap();
    assert_eq!((c.x, c.y), (0.0, 0.0));
    assert!(c.main);
    assert_eq!(c.depth, 0);
    assert!(c.to.is_empty());
    assert_eq!(c.to_ancestry, vec!["A".to_string(), "B".to_string()]);

    let a = layout.node("A").unwrap();
    assert_eq!((a.x, a.y), (-125.0, -150.0));
    assert!(a.is_ancestry);
    assert_eq!(a.depth, -1);
    assert_eq!(a.from, vec!["C".to_string()]);

    let b = layout.node("B").unwrap();
    assert_eq!((b.x, b.y), (125.0, -150.0));
}

#[test]
fn dimensions_pad_one_separation_per_axis() {
    let mut g = couple_with_child();
    let layout = calculate_tree(&mut g, Some("C"), &ChartConfig::default()).unwrap();
    assert_eq!(layout.dim.width, 500.0);
    assert_eq!(layout.dim.height, 300.0);
    assert_eq!(layout.dim.x_off, 250.0);
    assert_eq!(layout.dim.y_off, 225.0);
}

#[test]
fn missing_focus_falls_back_to_the_first_person() {
    let mut g = couple_with_child();
    let layout = calculate_tree(&mut g, None, &ChartConfig::default()).unwrap();
    assert_eq!(layout.main_id, "A");
    let layout = calculate_tree(&mut g, Some("nobody"), &ChartConfig::default()).unwrap();
    assert_eq!(layout.main_id, "A");
}

#[test]
fn layout_is_deterministic() {
    let cfg = ChartConfig::default();
    let mut g1 = couple_with_child();
    let mut g2 = couple_with_child();
    let l1 = calculate_tree(&mut g1, Some("C"), &cfg).unwrap();
    let l2 = calculate_tree(&mut g2, Some("C"), &cfg).unwrap();
    assert_eq!(l1, l2);
}

#[test]
fn ancestors_rise_and_descendants_sink() {
    // G -> A -> C, focus A: one ancestor above, one child below.
    let mut g = PersonGraph::from_persons(vec![person("G", Gender::Male)]);
    edit::add_relative(&mut g, "G", RelType::Son, person("A", Gender::Male), None).unwrap();
    edit::add_relative(&mut g, "A", RelType::Son, person("C", Gender::Male), None).unwrap();

    let layout = calculate_tree(&mut g, Some("A"), &ChartConfig::default()).unwrap();
    let a = layout.node("A").unwrap();
    assert_eq!(a.depth, 0);
    let anc = layout.node("G").unwrap();
    assert!(anc.y < 0.0 && anc.is_ancestry && anc.depth == -1);
    let desc = layout.node("C").unwrap();
    assert!(desc.y > 0.0 && !desc.is_ancestry && desc.depth == 1);
}

#[test]
fn augmentor_inserts_an_empty_mother_card() {
    let mut a = person("A", Gender::Male);
    a.rels.children.push("C".into());
    let mut c = person("C", Gender::Female);
    c.rels.father = Some("A".into());
    let mut g = PersonGraph::from_persons(vec![a, c]);

    let cfg = ChartConfig::default().with_single_parent_empty_card(true);
    let layout = calculate_tree(&mut g, Some("C"), &cfg).unwrap();

    assert_eq!(layout.nodes.len(), 3);
    let mother_id = g.get("C").unwrap().rels.mother.clone().unwrap();
    assert!(g.get(&mother_id).unwrap().to_add);
    assert!(g.get("A").unwrap().rels.spouses.contains(&mother_id));
    let mother_card = layout.node(&mother_id).unwrap();
    assert!(mother_card.is_ancestry);

    // Saving real data for the placeholder must not spawn another one.
    let mut data = g.get(&mother_id).unwrap().data.clone();
    data.insert("first name".into(), serde_json::Value::String("Beth".into()));
    edit::submit_person_data(&mut g, &mother_id, data).unwrap();
    edit::move_to_added(&mut g, &mother_id).unwrap();
    let layout = calculate_tree(&mut g, Some("C"), &cfg).unwrap();
    assert_eq!(layout.nodes.len(), 3);
    assert_eq!(g.len(), 3);
}

#[test]
fn all_rels_displayed_tracks_trimmed_branches() {
    let mut g = PersonGraph::from_persons(vec![person("A", Gender::Male)]);
    edit::add_relative(&mut g, "A", RelType::Son, person("B", Gender::Male), None).unwrap();
    edit::add_relative(&mut g, "B", RelType::Son, person("C", Gender::Male), None).unwrap();

    let cfg = ChartConfig::default().with_progeny_depth(Some(1));
    let layout = calculate_tree(&mut g, Some("A"), &cfg).unwrap();
    assert!(layout.node("C").is_none());
    assert!(layout.node("A").unwrap().all_rels_displayed);
    assert!(!layout.node("B").unwrap().all_rels_displayed);

    let cfg = ChartConfig::default();
    let layout = calculate_tree(&mut g, Some("A"), &cfg).unwrap();
    assert!(layout.node("B").unwrap().all_rels_displayed);
}

#[test]
fn one_level_rels_trims_both_sides() {
    let mut g = PersonGraph::from_persons(vec![person("G", Gender::Male)]);
    edit::add_relative(&mut g, "G", RelType::Son, person("A", Gender::Male), None).unwrap();
    edit::add_relative(&mut g, "A", RelType::Son, person("B", Gender::Male), None).unwrap();
    edit::add_relative(&mut g, "B", RelType::Son, person("C", Gender::Male), None).unwrap();

    let cfg = ChartConfig::default().with_one_level_rels(true);
    let layout = calculate_tree(&mut g, Some("A"), &cfg).unwrap();
    assert!(layout.node("G").is_some());
    assert!(layout.node("B").is_some());
    assert!(layout.node("C").is_none());
}

#[test]
fn horizontal_mode_swaps_the_axes() {
    let mut g = couple_with_child();
    let cfg = ChartConfig::default().with_horizontal(true);
    let layout = calculate_tree(&mut g, Some("C"), &cfg).unwrap();
    assert!(layout.is_horizontal);

    let c = layout.node("C").unwrap();
    assert_eq!((c.x, c.y), (0.0, 0.0));
    // Ancestors sit to the left, spread vertically by the swapped
    // separation (level_separation plays the sibling-gap role).
    let a = layout.node("A").unwrap();
    let b = layout.node("B").unwrap();
    assert_eq!((a.x, a.y), (-250.0, -75.0));
    assert_eq!((b.x, b.y), (-250.0, 75.0));
}
