use famchart_core::refattrs::{ref_key, split_ref_key};
use famchart_core::{edit, Gender, Person, PersonGraph, RelType};
use serde_json::Value;

fn person(id: &str, gender: Gender) -> Person {
    let mut p = Person::new(id);
    p.set_gender(Some(gender));
    p
}

fn married_pair() -> PersonGraph {
    let mut g = PersonGraph::from_persons(vec![person("A", Gender::Male)]);
    edit::add_relative(&mut g, "A", RelType::Spouse, person("W", Gender::Female), None).unwrap();
    g
}

#[test]
fn ref_keys_split_and_rebuild() {
    assert_eq!(split_ref_key("wedding__ref__W"), Some(("wedding", "W")));
    assert_eq!(ref_key("wedding", "W"), "wedding__ref__W");
    assert_eq!(split_ref_key("plain field"), None);
    assert_eq!(split_ref_key("__ref__W"), None);
    assert_eq!(split_ref_key("wedding__ref__"), None);
}

#[test]
fn submitting_a_ref_field_mirrors_it() {
    let mut g = married_pair();
    let mut data = g.get("A").unwrap().data.clone();
    data.insert("wedding__ref__W".into(), Value::String("1999".into()));
    edit::submit_person_data(&mut g, "A", data).unwrap();

    assert_eq!(
        g.get("W").unwrap().data.get("wedding__ref__A"),
        Some(&Value::String("1999".into()))
    );
}

#[test]
fn dropping_a_ref_field_drops_the_mirror() {
    let mut g = married_pair();
    let mut data = g.get("A").unwrap().data.clone();
    data.insert("wedding__ref__W".into(), Value::String("1999".into()));
    edit::submit_person_data(&mut g, "A", data.clone()).unwrap();

    data.remove("wedding__ref__W");
    edit::submit_person_data(&mut g, "A", data).unwrap();
    assert!(!g.get("W").unwrap().data.contains_key("wedding__ref__A"));
}

#[test]
fn updating_a_ref_field_overwrites_the_mirror() {
    let mut g = married_pair();
    let mut data = g.get("A").unwrap().data.clone();
    data.insert("wedding__ref__W".into(), Value::String("1999".into()));
    edit::submit_person_data(&mut g, "A", data.clone()).unwrap();

    data.insert("wedding__ref__W".into(), Value::String("2001".into()));
    edit::submit_person_data(&mut g, "A", data).unwrap();
    assert_eq!(
        g.get("W").unwrap().data.get("wedding__ref__A"),
        Some(&Value::String("2001".into()))
    );
}
