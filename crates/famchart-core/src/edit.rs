//! Graph edit operations.
//!
//! Every operation here is a pure mutation on the person graph: validate,
//! then rewrite both sides of each touched relation so reciprocity holds
//! when the call returns. Nothing performs I/O; persistence sits outside
//! the core.

use crate::error::{Error, Result};
use crate::graph::PersonGraph;
use crate::model::{Gender, NewRelData, Person, RelType};
use crate::refattrs;
use rustc_hash::FxHashSet;
use serde_json::Map;

/// Sentinel for "create a placeholder second parent" in
/// [`NewRelData::other_parent_id`].
pub const NEW_PARENT_SENTINEL: &str = "_new";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The person and every reference to them is gone.
    Removed,
    /// The person held the graph together and was demoted to an unknown
    /// blank card instead (gender kept, all other data dropped).
    Demoted,
}

/// Allocates a fresh person with the given attributes.
pub fn create_new_person(graph: &PersonGraph, data: Map<String, serde_json::Value>) -> Person {
    let mut p = Person::new(graph.new_person_id());
    p.data = data;
    p
}

/// A new person whose gender is implied by the relation being created.
pub fn create_person_with_gender_from_rel(
    graph: &PersonGraph,
    rel_type: RelType,
    target_gender: Option<Gender>,
) -> Person {
    let mut p = Person::new(graph.new_person_id());
    p.set_gender(Some(rel_type.derived_gender(target_gender)));
    p
}

/// A not-yet-wired relative card carrying `_new_rel_data`, shown by the
/// chart at the end of the relevant spouse group until the form is
/// submitted.
pub fn draft_relative(graph: &PersonGraph, target_id: &str, rel_type: RelType) -> Result<Person> {
    let target = graph.get(target_id).ok_or_else(|| Error::UnknownPerson {
        id: target_id.to_string(),
    })?;
    let mut p = create_person_with_gender_from_rel(graph, rel_type, target.gender());
    p.new_rel_data = Some(NewRelData {
        rel_type,
        other_parent_id: None,
    });
    Ok(p)
}

/// Inserts `person` into the graph wired as `rel_type` of `target_id`.
///
/// For children, `other_parent_id` optionally names the second parent;
/// [`NEW_PARENT_SENTINEL`] requests a fresh placeholder partner. Returns
/// the new person's id.
pub fn add_relative(
    graph: &mut PersonGraph,
    target_id: &str,
    rel_type: RelType,
    mut person: Person,
    other_parent_id: Option<&str>,
) -> Result<String> {
    if !graph.contains(target_id) {
        return Err(Error::UnknownPerson {
            id: target_id.to_string(),
        });
    }
    if graph.contains(&person.id) {
        return Err(Error::InvalidRelation {
            message: format!("person {} already exists in the graph", person.id),
        });
    }
    person.new_rel_data = None;
    let id = person.id.clone();

    // The relation implies a gender; fill it in when the caller left it
    // unset so parent-slot consistency holds.
    if person.gender().is_none() {
        let target_gender = graph.get(target_id).and_then(Person::gender);
        person.set_gender(Some(rel_type.derived_gender(target_gender)));
    }
    graph.insert(person);

    let wired = match rel_type {
        RelType::Son | RelType::Daughter => wire_child(graph, &id, target_id, other_parent_id),
        RelType::Father | RelType::Mother => wire_parent(graph, &id, target_id, rel_type),
        RelType::Spouse => wire_spouse(graph, &id, target_id),
    };
    if let Err(e) = wired {
        // Roll back the half-wired insert, references included.
        remove_all_references(graph, &id);
        graph.remove(&id);
        return Err(e);
    }
    Ok(id)
}

/// Wires an existing person as `rel_type` of `target_id`. Same wiring as
/// [`add_relative`], but nothing is created; used by the "link existing"
/// form flow on a candidate from [`link_candidates`].
pub fn link_existing_relative(
    graph: &mut PersonGraph,
    target_id: &str,
    rel_type: RelType,
    existing_id: &str,
    other_parent_id: Option<&str>,
) -> Result<()> {
    for id in [target_id, existing_id] {
        if !graph.contains(id) {
            return Err(Error::UnknownPerson { id: id.to_string() });
        }
    }
    if target_id == existing_id {
        return Err(Error::InvalidRelation {
            message: "cannot relate a person to themselves".to_string(),
        });
    }

    match rel_type {
        RelType::Son | RelType::Daughter => {
            if ancestor_set(graph, target_id).contains(existing_id) {
                return Err(Error::WouldCreateCycle {
                    id: existing_id.to_string(),
                    target: target_id.to_string(),
                    rel: "child",
                });
            }
            wire_child(graph, existing_id, target_id, other_parent_id)
        }
        RelType::Father | RelType::Mother => {
            if descendant_set(graph, target_id).contains(existing_id) {
                return Err(Error::WouldCreateCycle {
                    id: existing_id.to_string(),
                    target: target_id.to_string(),
                    rel: "parent",
                });
            }
            let slot_gender = match rel_type {
                RelType::Father => Gender::Male,
                _ => Gender::Female,
            };
            if graph
                .get(existing_id)
                .and_then(Person::gender)
                .is_some_and(|g| g != slot_gender)
            {
                return Err(Error::InvalidRelation {
                    message: format!("{existing_id} has the wrong gender for that parent slot"),
                });
            }
            wire_parent(graph, existing_id, target_id, rel_type)
        }
        RelType::Spouse => wire_spouse(graph, existing_id, target_id),
    }
}

/// Real persons eligible for "link existing" against `target_id`:
/// excludes the target, placeholders, in-flight drafts, current spouses,
/// and, for parent/child links, anyone already in the target's ancestor
/// or descendant set (children additionally exclude descendants of the
/// target's partners).
pub fn link_candidates(graph: &PersonGraph, target_id: &str, rel_type: RelType) -> Vec<String> {
    let Some(target) = graph.get(target_id) else {
        return Vec::new();
    };

    let mut blocked: FxHashSet<String> = FxHashSet::default();
    if rel_type.is_parent() || rel_type.is_child() {
        blocked.extend(ancestor_set(graph, target_id));
        blocked.extend(descendant_set(graph, target_id));
    }
    if rel_type.is_child() {
        for sp in &target.rels.spouses {
            blocked.extend(descendant_set(graph, sp));
        }
    }

    let wanted_gender = match rel_type {
        RelType::Father => Some(Gender::Male),
        RelType::Mother => Some(Gender::Female),
        RelType::Son => Some(Gender::Male),
        RelType::Daughter => Some(Gender::Female),
        RelType::Spouse => None,
    };

    graph
        .iter()
        .filter(|p| p.id != target_id)
        .filter(|p| p.is_real())
        .filter(|p| p.new_rel_data.is_none())
        .filter(|p| !target.rels.spouses.contains(&p.id))
        .filter(|p| !blocked.contains(&p.id))
        .filter(|p| wanted_gender.is_none() || p.gender() == wanted_gender)
        .map(|p| p.id.clone())
        .collect()
}

/// Clears the placeholder flag once real data has been saved for a
/// `to_add` card. The id is kept, so relations pointing at it stay valid.
pub fn move_to_added(graph: &mut PersonGraph, id: &str) -> Result<()> {
    let person = graph.get_mut(id).ok_or_else(|| Error::UnknownPerson {
        id: id.to_string(),
    })?;
    person.to_add = false;
    Ok(())
}

/// Replaces a person's attributes from a form submission, mirroring
/// relation-scoped fields and refusing gender changes for persons with
/// real children.
pub fn submit_person_data(
    graph: &mut PersonGraph,
    id: &str,
    data: Map<String, serde_json::Value>,
) -> Result<()> {
    let person = graph.get(id).ok_or_else(|| Error::UnknownPerson {
        id: id.to_string(),
    })?;

    let new_gender = data
        .get(crate::model::GENDER_KEY)
        .and_then(serde_json::Value::as_str)
        .and_then(Gender::parse);
    if new_gender != person.gender() {
        let has_real_child = person
            .rels
            .children
            .iter()
            .any(|c| graph.get(c).is_some_and(Person::is_real));
        if has_real_child {
            return Err(Error::GenderLocked { id: id.to_string() });
        }
    }

    // Relation-scoped fields dropped by this submission lose their mirror
    // on the other person.
    let removed: Vec<(String, String)> = person
        .data
        .keys()
        .filter(|k| !data.contains_key(*k))
        .filter_map(|k| refattrs::split_ref_key(k))
        .map(|(field, other)| (refattrs::ref_key(field, id), other.to_string()))
        .collect();
    for (mirror_key, other_id) in removed {
        if let Some(other) = graph.get_mut(&other_id) {
            other.data.remove(&mirror_key);
        }
    }

    if let Some(person) = graph.get_mut(id) {
        person.data = data;
        person.new_rel_data = None;
    }
    refattrs::mirror_ref_fields(graph, id);
    Ok(())
}

/// Deletes a person, or demotes them to an unknown card when removing
/// them would leave a relative unable to reach the first person in the
/// graph. Cascades away placeholder spouses left childless, and reseeds a
/// blank person if the graph ends up empty.
pub fn delete_person(graph: &mut PersonGraph, id: &str) -> Result<DeleteOutcome> {
    if !graph.contains(id) {
        return Err(Error::UnknownPerson { id: id.to_string() });
    }

    let anchor = graph
        .iter()
        .map(|p| p.id.clone())
        .find(|pid| pid != id);
    let holds_graph_together = match &anchor {
        Some(anchor) => !graph.relatives_connected_without(id, anchor),
        None => false,
    };

    if holds_graph_together {
        refattrs::strip_ref_mirrors(graph, id);
        if let Some(p) = graph.get_mut(id) {
            let gender = p.gender();
            p.data = Map::new();
            p.set_gender(gender);
            p.unknown = true;
            p.to_add = false;
            p.new_rel_data = None;
        }
        return Ok(DeleteOutcome::Demoted);
    }

    remove_all_references(graph, id);
    refattrs::strip_ref_mirrors(graph, id);
    graph.remove(id);

    // Placeholders exist only to co-parent; drop any left childless.
    loop {
        let dead: Vec<String> = graph
            .iter()
            .filter(|p| p.to_add && p.rels.children.is_empty())
            .map(|p| p.id.clone())
            .collect();
        if dead.is_empty() {
            break;
        }
        for d in dead {
            remove_all_references(graph, &d);
            graph.remove(&d);
        }
    }

    if graph.is_empty() {
        graph.seed_blank();
    }
    Ok(DeleteOutcome::Removed)
}

/// Detaches or restores a person's parent links. Hiding moves both parent
/// slots into `_rels`; showing moves them back unchanged.
pub fn toggle_ancestry(graph: &mut PersonGraph, id: &str) -> Result<()> {
    let person = graph.get_mut(id).ok_or_else(|| Error::UnknownPerson {
        id: id.to_string(),
    })?;
    let hidden = person.hidden_rels.father.is_some() || person.hidden_rels.mother.is_some();
    if hidden {
        if let Some(f) = person.hidden_rels.father.take() {
            person.rels.father = Some(f);
        }
        if let Some(m) = person.hidden_rels.mother.take() {
            person.rels.mother = Some(m);
        }
    } else {
        person.hidden_rels.father = person.rels.father.take();
        person.hidden_rels.mother = person.rels.mother.take();
    }
    Ok(())
}

/// Detaches or restores a person's children. The child ids move between
/// `rels.children` and `_rels.children` on the person *and* on each
/// co-parent, so the layout sees the branch as absent from both sides.
pub fn toggle_progeny(graph: &mut PersonGraph, id: &str) -> Result<()> {
    let person = graph.get(id).ok_or_else(|| Error::UnknownPerson {
        id: id.to_string(),
    })?;
    let hiding = person.hidden_rels.children.is_empty();

    let kids: Vec<String> = if hiding {
        person.rels.children.clone()
    } else {
        person.hidden_rels.children.clone()
    };

    for cid in &kids {
        let co_parents: Vec<String> = graph
            .get(cid)
            .map(|c| {
                [&c.rels.father, &c.rels.mother]
                    .into_iter()
                    .flatten()
                    .filter(|p| *p != id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        for co in co_parents {
            if let Some(co) = graph.get_mut(&co) {
                move_child_entry(co, cid, hiding);
            }
        }
    }
    if let Some(person) = graph.get_mut(id) {
        if hiding {
            person.hidden_rels.children = std::mem::take(&mut person.rels.children);
        } else {
            person.rels.children = std::mem::take(&mut person.hidden_rels.children);
        }
    }
    Ok(())
}

fn move_child_entry(parent: &mut Person, child_id: &str, hide: bool) {
    let (from, to) = if hide {
        (&mut parent.rels.children, &mut parent.hidden_rels.children)
    } else {
        (&mut parent.hidden_rels.children, &mut parent.rels.children)
    };
    if let Some(pos) = from.iter().position(|c| c == child_id) {
        let id = from.remove(pos);
        to.push(id);
    }
}

/// Flips the duplicate-branch toggle for an ancestry appearance of
/// `person_id` reached through `parent_key` (a person id, or `"main"` for
/// the appearance right above the focus). Expanding stamps the current
/// time so "most recently opened" wins under one-open-at-a-time configs.
pub fn toggle_ancestry_duplicate(
    graph: &mut PersonGraph,
    person_id: &str,
    parent_key: &str,
) -> Result<()> {
    let person = graph.get_mut(person_id).ok_or_else(|| Error::UnknownPerson {
        id: person_id.to_string(),
    })?;
    let now = crate::time::now_millis();
    let current = person.tgdp.get(parent_key).copied().unwrap_or(-1);
    person
        .tgdp
        .insert(parent_key.to_string(), if current < 0 { now } else { -now });
    Ok(())
}

/// Flips the duplicate-branch toggle for a progeny appearance of
/// `person_id` in the `(parent, spouse)` context.
pub fn toggle_progeny_duplicate(
    graph: &mut PersonGraph,
    person_id: &str,
    parent_id: &str,
    spouse_id: Option<&str>,
) -> Result<()> {
    let person = graph.get_mut(person_id).ok_or_else(|| Error::UnknownPerson {
        id: person_id.to_string(),
    })?;
    let now = crate::time::now_millis();
    let slot = person
        .tgdp_sp
        .entry(parent_id.to_string())
        .or_default()
        .entry(spouse_id.unwrap_or("").to_string())
        .or_insert(-1);
    *slot = if *slot < 0 { now } else { -now };
    Ok(())
}

/// All ancestor ids of `id` (transitive over father/mother).
pub fn ancestor_set(graph: &PersonGraph, id: &str) -> FxHashSet<String> {
    let mut out = FxHashSet::default();
    let mut stack = vec![id.to_string()];
    while let Some(cur) = stack.pop() {
        let Some(p) = graph.get(&cur) else { continue };
        for parent in [&p.rels.father, &p.rels.mother].into_iter().flatten() {
            if out.insert(parent.clone()) {
                stack.push(parent.clone());
            }
        }
    }
    out
}

/// All descendant ids of `id` (transitive over children).
pub fn descendant_set(graph: &PersonGraph, id: &str) -> FxHashSet<String> {
    let mut out = FxHashSet::default();
    let mut stack = vec![id.to_string()];
    while let Some(cur) = stack.pop() {
        let Some(p) = graph.get(&cur) else { continue };
        for child in &p.rels.children {
            if out.insert(child.clone()) {
                stack.push(child.clone());
            }
        }
    }
    out
}

// ─── wiring ──────────────────────────────────────────────────────────────

fn wire_child(
    graph: &mut PersonGraph,
    child_id: &str,
    target_id: &str,
    other_parent_id: Option<&str>,
) -> Result<()> {
    let target_gender = graph
        .get(target_id)
        .and_then(Person::gender)
        .unwrap_or(Gender::Male);

    set_parent(graph, child_id, target_id, target_gender)?;

    match other_parent_id {
        Some(NEW_PARENT_SENTINEL) => {
            let qid = graph.new_person_id();
            graph.insert(Person::placeholder(qid.clone(), target_gender.opposite()));
            link_spouses(graph, target_id, &qid);
            set_parent(graph, child_id, &qid, target_gender.opposite())?;
        }
        Some(other) => {
            if !graph.contains(other) {
                return Err(Error::UnknownPerson {
                    id: other.to_string(),
                });
            }
            let other_gender = graph
                .get(other)
                .and_then(Person::gender)
                .unwrap_or(target_gender.opposite());
            if other_gender == target_gender {
                return Err(Error::InvalidRelation {
                    message: format!(
                        "{other} cannot co-parent with {target_id}: both fill the same parent slot"
                    ),
                });
            }
            link_spouses(graph, target_id, other);
            set_parent(graph, child_id, other, other_gender)?;
        }
        None => {}
    }
    Ok(())
}

fn wire_parent(
    graph: &mut PersonGraph,
    parent_id: &str,
    target_id: &str,
    rel_type: RelType,
) -> Result<()> {
    let slot_gender = match rel_type {
        RelType::Father => Gender::Male,
        _ => Gender::Female,
    };
    let slot_name = match slot_gender {
        Gender::Male => "father",
        Gender::Female => "mother",
    };

    let occupant = graph
        .get(target_id)
        .and_then(|t| t.rels.parent_slot(slot_gender).clone());
    if let Some(occupant) = occupant {
        if occupant == parent_id {
            return Ok(());
        }
        if graph.get(&occupant).is_some_and(|p| p.to_add) {
            remove_all_references(graph, &occupant);
            graph.remove(&occupant);
        } else {
            return Err(Error::SlotOccupied {
                target: target_id.to_string(),
                slot: slot_name,
            });
        }
    }

    if let Some(p) = graph.get_mut(parent_id) {
        if p.gender().is_none() {
            p.set_gender(Some(slot_gender));
        }
    }
    set_parent(graph, target_id, parent_id, slot_gender)?;

    // An existing other-gender parent becomes the new parent's spouse.
    let other = graph
        .get(target_id)
        .and_then(|t| t.rels.parent_slot(slot_gender.opposite()).clone());
    if let Some(other) = other {
        if other != parent_id {
            link_spouses(graph, parent_id, &other);
        }
    }
    Ok(())
}

fn wire_spouse(graph: &mut PersonGraph, spouse_id: &str, target_id: &str) -> Result<()> {
    if spouse_id == target_id {
        return Err(Error::InvalidRelation {
            message: "cannot marry a person to themselves".to_string(),
        });
    }

    // A placeholder of the same gender is consumed: the real spouse takes
    // over its children, then the placeholder goes away.
    let new_gender = graph.get(spouse_id).and_then(Person::gender);
    let placeholder = graph.get(target_id).and_then(|t| {
        t.rels
            .spouses
            .iter()
            .find(|sid| {
                graph.get(sid).is_some_and(|s| {
                    s.to_add && (new_gender.is_none() || s.gender() == new_gender)
                })
            })
            .cloned()
    });
    if let Some(pid) = placeholder {
        let slot_gender = graph
            .get(&pid)
            .and_then(Person::gender)
            .unwrap_or(Gender::Female);
        let kids: Vec<String> = graph
            .get(&pid)
            .map(|p| p.rels.children.clone())
            .unwrap_or_default();
        for cid in kids {
            set_parent(graph, &cid, spouse_id, slot_gender)?;
        }
        remove_all_references(graph, &pid);
        graph.remove(&pid);
    }

    link_spouses(graph, target_id, spouse_id);
    Ok(())
}

/// Points `child_id`'s parent slot for `parent_gender` at `parent_id` and
/// appends the child on the parent, both sides idempotent.
fn set_parent(
    graph: &mut PersonGraph,
    child_id: &str,
    parent_id: &str,
    parent_gender: Gender,
) -> Result<()> {
    let child = graph.get_mut(child_id).ok_or_else(|| Error::UnknownPerson {
        id: child_id.to_string(),
    })?;
    *child.rels.parent_slot_mut(parent_gender) = Some(parent_id.to_string());
    let parent = graph.get_mut(parent_id).ok_or_else(|| Error::UnknownPerson {
        id: parent_id.to_string(),
    })?;
    if !parent.rels.children.iter().any(|c| c == child_id) {
        parent.rels.children.push(child_id.to_string());
    }
    Ok(())
}

fn link_spouses(graph: &mut PersonGraph, a: &str, b: &str) {
    if let Some(pa) = graph.get_mut(a) {
        if !pa.rels.spouses.iter().any(|s| s == b) {
            pa.rels.spouses.push(b.to_string());
        }
    }
    if let Some(pb) = graph.get_mut(b) {
        if !pb.rels.spouses.iter().any(|s| s == a) {
            pb.rels.spouses.push(a.to_string());
        }
    }
}

/// Erases every reference to `id` from every other person's live and
/// hidden relation slots.
fn remove_all_references(graph: &mut PersonGraph, id: &str) {
    for p in graph.iter_mut() {
        for rels in [&mut p.rels, &mut p.hidden_rels] {
            if rels.father.as_deref() == Some(id) {
                rels.father = None;
            }
            if rels.mother.as_deref() == Some(id) {
                rels.mother = None;
            }
            rels.spouses.retain(|s| s != id);
            rels.children.retain(|c| c != id);
        }
    }
}
