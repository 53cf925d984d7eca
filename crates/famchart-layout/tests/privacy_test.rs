use famchart_core::{Gender, Person, PersonGraph};
use famchart_layout::{calculate_tree, ChartConfig};
use serde_json::Value;

fn person(id: &str, gender: Gender) -> Person {
    let mut p = Person::new(id);
    p.set_gender(Some(gender));
    p
}

fn private_person(id: &str, gender: Gender) -> Person {
    let mut p = person(id, gender);
    p.data.insert("private".into(), Value::Bool(true));
    p
}

fn cfg_with_privacy() -> ChartConfig {
    ChartConfig::default().with_private_cards_condition(Box::new(|p| {
        p.data
            .get("private")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }))
}

/// C's spouse D descends from the private E.
fn graph() -> PersonGraph {
    let mut a = person("A", Gender::Male);
    let mut b = person("B", Gender::Female);
    a.rels.spouses = vec!["B".into()];
    b.rels.spouses = vec!["A".into()];
    a.rels.children = vec!["C".into()];
    b.rels.children = vec!["C".into()];
    let mut c = person("C", Gender::Male);
    c.rels.father = Some("A".into());
    c.rels.mother = Some("B".into());
    c.rels.spouses = vec!["D".into()];
    let mut d = person("D", Gender::Female);
    d.rels.spouses = vec!["C".into()];
    d.rels.father = Some("E".into());
    let mut e = private_person("E", Gender::Male);
    e.rels.children = vec!["D".into()];
    PersonGraph::from_persons(vec![a, b, c, d, e])
}

#[test]
fn privacy_spreads_through_parents_and_spouses() {
    let mut g = graph();
    let layout = calculate_tree(&mut g, Some("C"), &cfg_with_privacy()).unwrap();

    // D inherits from her father E, C from his spouse D.
    assert!(layout.node("D").unwrap().is_private);
    assert!(layout.node("C").unwrap().is_private);
    // C's parents are upstream of the private line and stay public.
    assert!(!layout.node("A").unwrap().is_private);
    assert!(!layout.node("B").unwrap().is_private);
}

#[test]
fn no_predicate_means_nobody_is_private() {
    let mut g = graph();
    let layout = calculate_tree(&mut g, Some("C"), &ChartConfig::default()).unwrap();
    assert!(layout.nodes.iter().all(|n| !n.is_private));
}

#[test]
fn placeholders_never_turn_private() {
    // A private single father gets a placeholder spouse; the placeholder
    // stays public.
    let mut a = private_person("A", Gender::Male);
    a.rels.children = vec!["C".into()];
    let mut c = person("C", Gender::Female);
    c.rels.father = Some("A".into());
    let mut g = PersonGraph::from_persons(vec![a, c]);

    let cfg = cfg_with_privacy().with_single_parent_empty_card(true);
    let layout = calculate_tree(&mut g, Some("C"), &cfg).unwrap();

    let placeholder_id = g.get("C").unwrap().rels.mother.clone().unwrap();
    assert!(layout.node("C").unwrap().is_private);
    assert!(!layout.node(&placeholder_id).unwrap().is_private);
}
