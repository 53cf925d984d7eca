//! Form descriptors.
//!
//! The core assembles a declarative description of the edit form for a
//! person (gender radio, free-form fields, one relation-scoped field per
//! spouse, an optional link-existing selector) and the wrapper's form UI
//! renders it and posts the submission back through
//! [`crate::FamilyChart::submit_form`].

use crate::Result;
use famchart_core::{edit, refattrs, Error as GraphError, Gender, Person, PersonGraph, RelType};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum FieldKind {
    Text,
    Textarea,
    Select { options: Vec<String> },
    /// A relation-scoped field, expanded into one input per spouse.
    Rel,
}

/// What the wrapper wants on its forms, in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub key: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: FieldKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenderInput {
    pub value: Option<Gender>,
    /// Locked when the person has real children: flipping it would break
    /// the parent slots pointing at them.
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormField {
    pub key: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    pub value: Value,
    /// For relation-scoped fields: the spouse this instance refers to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_other_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkExisting {
    pub rel_type: RelType,
    pub candidate_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormDescriptor {
    pub person_id: String,
    /// Set for add-relative forms: the not-yet-inserted draft record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<Person>,
    pub gender: GenderInput,
    pub fields: Vec<FormField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_existing: Option<LinkExisting>,
}

/// Form for editing an existing person.
pub fn build_edit_form(
    graph: &PersonGraph,
    person_id: &str,
    defs: &[FieldDef],
) -> Result<FormDescriptor> {
    let person = graph.get(person_id).ok_or_else(|| GraphError::UnknownPerson {
        id: person_id.to_string(),
    })?;
    let gender_locked = person
        .rels
        .children
        .iter()
        .any(|c| graph.get(c).is_some_and(Person::is_real));
    Ok(FormDescriptor {
        person_id: person_id.to_string(),
        draft: None,
        gender: GenderInput {
            value: person.gender(),
            disabled: gender_locked,
        },
        fields: expand_fields(person, defs),
        link_existing: None,
    })
}

/// Form for adding a relative of `rel_type` to `target_id`: carries a
/// draft person with derived gender and the link-existing candidates.
pub fn build_relative_form(
    graph: &PersonGraph,
    target_id: &str,
    rel_type: RelType,
    defs: &[FieldDef],
) -> Result<FormDescriptor> {
    let draft = edit::draft_relative(graph, target_id, rel_type)?;
    Ok(FormDescriptor {
        person_id: draft.id.clone(),
        gender: GenderInput {
            value: draft.gender(),
            disabled: false,
        },
        fields: expand_fields(&draft, defs),
        link_existing: Some(LinkExisting {
            rel_type,
            candidate_ids: edit::link_candidates(graph, target_id, rel_type),
        }),
        draft: Some(draft),
    })
}

fn expand_fields(person: &Person, defs: &[FieldDef]) -> Vec<FormField> {
    let mut fields = Vec::new();
    for def in defs {
        match &def.kind {
            FieldKind::Rel => {
                for spouse in &person.rels.spouses {
                    let key = refattrs::ref_key(&def.key, spouse);
                    fields.push(FormField {
                        value: person.data.get(&key).cloned().unwrap_or(Value::Null),
                        key,
                        label: def.label.clone(),
                        kind: FieldKind::Text,
                        ref_other_id: Some(spouse.clone()),
                    });
                }
            }
            kind => fields.push(FormField {
                key: def.key.clone(),
                label: def.label.clone(),
                kind: kind.clone(),
                value: person.data.get(&def.key).cloned().unwrap_or(Value::Null),
                ref_other_id: None,
            }),
        }
    }
    fields
}
