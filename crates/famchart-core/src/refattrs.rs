//! Relation-scoped attributes.
//!
//! An attribute that describes a pair (a marriage date, a wedding place)
//! lives on both persons under a mangled key: `<field>__ref__<other-id>`
//! on one side mirrors `<field>__ref__<self-id>` on the other. Mirrors are
//! pushed on every data submission and removed when either side loses the
//! field or the person is deleted.

use crate::graph::PersonGraph;

pub const REF_MARKER: &str = "__ref__";

/// Splits `<field>__ref__<other-id>` into `(field, other_id)`.
pub fn split_ref_key(key: &str) -> Option<(&str, &str)> {
    key.split_once(REF_MARKER)
        .filter(|(field, other)| !field.is_empty() && !other.is_empty())
}

pub fn ref_key(field: &str, other_id: &str) -> String {
    format!("{field}{REF_MARKER}{other_id}")
}

/// Copies every relation-scoped value on `id` onto the referenced person
/// under the reversed key.
pub fn mirror_ref_fields(graph: &mut PersonGraph, id: &str) {
    let Some(person) = graph.get(id) else {
        return;
    };
    let mirrors: Vec<(String, String, serde_json::Value)> = person
        .data
        .iter()
        .filter_map(|(key, value)| {
            let (field, other) = split_ref_key(key)?;
            Some((other.to_string(), ref_key(field, id), value.clone()))
        })
        .collect();
    for (other_id, key, value) in mirrors {
        match graph.get_mut(&other_id) {
            Some(other) => {
                other.data.insert(key, value);
            }
            None => {
                tracing::warn!(target: "famchart", owner = %id, missing = %other_id, "relation-scoped attribute references unknown person");
            }
        }
    }
}

/// Removes every `<field>__ref__<id>` mirror across the graph. Used when
/// `id` is deleted or demoted to an unknown card.
pub fn strip_ref_mirrors(graph: &mut PersonGraph, id: &str) {
    for person in graph.iter_mut() {
        person
            .data
            .retain(|key, _| split_ref_key(key).map(|(_, other)| other != id).unwrap_or(true));
    }
}
