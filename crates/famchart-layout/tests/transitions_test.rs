use famchart_core::{Gender, Person, PersonGraph};
use famchart_layout::{calculate_tree, transitions, ChartConfig};

fn person(id: &str, gender: Gender) -> Person {
    let mut p = Person::new(id);
    p.set_gender(Some(gender));
    p
}

fn couple_with_child() -> PersonGraph {
    let mut a = person("A", Gender::Male);
    let mut b = person("B", Gender::Female);
    a.rels.spouses = vec!["B".into()];
    b.rels.spouses = vec!["A".into()];
    a.rels.children = vec!["C".into()];
    b.rels.children = vec!["C".into()];
    let mut c = person("C", Gender::Male);
    c.rels.father = Some("A".into());
    c.rels.mother = Some("B".into());
    PersonGraph::from_persons(vec![a, b, c])
}

#[test]
fn surviving_cards_carry_their_previous_position() {
    let mut g = couple_with_child();
    let cfg = ChartConfig::default();
    let prev = calculate_tree(&mut g, Some("C"), &cfg).unwrap();
    let mut next = calculate_tree(&mut g, Some("A"), &cfg).unwrap();
    transitions::apply_transitions(Some(&prev), &mut next);

    // C was the focus at (0,0); now it is A's child but animates from
    // its old spot.
    let c = next.node("C").unwrap();
    assert_eq!((c.enter_x, c.enter_y), (Some(0.0), Some(0.0)));
}

#[test]
fn entering_ancestors_start_at_their_child_card() {
    let mut g = couple_with_child();
    let cfg = ChartConfig::default();
    let mut layout = calculate_tree(&mut g, Some("C"), &cfg).unwrap();
    transitions::apply_transitions(None, &mut layout);

    let a = layout.node("A").unwrap();
    assert_eq!((a.enter_x, a.enter_y), (Some(0.0), Some(0.0)));
}

#[test]
fn entering_spouses_start_at_their_partner() {
    let mut f = person("F", Gender::Female);
    f.rels.spouses = vec!["H".into()];
    let mut h = person("H", Gender::Male);
    h.rels.spouses = vec!["F".into()];
    let mut g = PersonGraph::from_persons(vec![f, h]);

    let mut layout = calculate_tree(&mut g, Some("F"), &ChartConfig::default()).unwrap();
    transitions::apply_transitions(None, &mut layout);

    let f = layout.node("F").unwrap();
    let h = layout.node("H").unwrap();
    assert_eq!((h.enter_x, h.enter_y), (Some(f.x), Some(f.y)));
}

#[test]
fn entering_descendants_start_at_the_parent_side_point() {
    let mut g = couple_with_child();
    let mut layout = calculate_tree(&mut g, Some("A"), &ChartConfig::default()).unwrap();
    transitions::apply_transitions(None, &mut layout);

    let c = layout.node("C").unwrap();
    assert_eq!(c.enter_x, c.psx);
    assert_eq!(c.enter_y, c.psy);
}

#[test]
fn exits_slide_outward_by_quadrant() {
    let node = |x: f64, y: f64| {
        let mut g = couple_with_child();
        let layout = calculate_tree(&mut g, Some("C"), &ChartConfig::default()).unwrap();
        let mut n = layout.node("C").unwrap().clone();
        n.x = x;
        n.y = y;
        n
    };
    assert_eq!(transitions::exit_position(&node(10.0, 20.0)), (410.0, 420.0));
    assert_eq!(
        transitions::exit_position(&node(-10.0, 20.0)),
        (-410.0, 420.0)
    );
    assert_eq!(
        transitions::exit_position(&node(0.0, 0.0)),
        (-400.0, -400.0)
    );
}
