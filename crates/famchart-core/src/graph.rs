//! The person graph: an insertion-ordered id -> person map.
//!
//! Insertion order is load order and defines "the first person", which the
//! store falls back to when no focus is set and the delete operation uses
//! as its connectivity anchor.

use crate::model::Person;
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::de::{Deserializer, SeqAccess, Visitor};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonGraph {
    persons: IndexMap<String, Person>,
}

impl PersonGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_persons(persons: Vec<Person>) -> Self {
        let mut map = IndexMap::with_capacity(persons.len());
        for p in persons {
            if map.insert(p.id.clone(), p).is_some() {
                tracing::warn!(target: "famchart", "duplicate person id replaced earlier record");
            }
        }
        Self { persons: map }
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.persons.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Person> {
        self.persons.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Person> {
        self.persons.get_mut(id)
    }

    pub fn first(&self) -> Option<&Person> {
        self.persons.values().next()
    }

    pub fn first_id(&self) -> Option<&str> {
        self.persons.keys().next().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Person> {
        self.persons.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Person> {
        self.persons.values_mut()
    }

    pub fn ids(&self) -> Vec<String> {
        self.persons.keys().cloned().collect()
    }

    pub fn insert(&mut self, person: Person) {
        self.persons.insert(person.id.clone(), person);
    }

    /// Removes the record itself; the caller is responsible for cleaning
    /// references (see [`crate::edit::delete_person`]).
    pub fn remove(&mut self, id: &str) -> Option<Person> {
        self.persons.shift_remove(id)
    }

    /// A fresh id not present in the graph.
    pub fn new_person_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if !self.contains(&id) {
                return id;
            }
        }
    }

    /// Inserts a blank person so the chart always has a focus. Returns the
    /// new id. Only meaningful on an empty graph.
    pub fn seed_blank(&mut self) -> String {
        let id = self.new_person_id();
        self.insert(Person::new(id.clone()));
        id
    }

    /// Ids referenced by some relation slot that do not resolve, reported
    /// as `(owner, missing)`. These indicate a programming error upstream;
    /// they are logged, never silently repaired.
    pub fn dangling_ids(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        for p in self.persons.values() {
            for id in p.rels.all_ids().into_iter().chain(p.hidden_rels.all_ids()) {
                if !self.contains(id) {
                    tracing::warn!(target: "famchart", owner = %p.id, missing = %id, "dangling relation id");
                    out.push((p.id.clone(), id.to_string()));
                }
            }
        }
        out
    }

    /// Relation neighbors over both live and hidden slots. Hidden slots
    /// count: a detached branch is still family for connectivity purposes.
    pub fn neighbors(&self, id: &str) -> Vec<String> {
        let Some(p) = self.get(id) else {
            return Vec::new();
        };
        let mut out: Vec<String> = Vec::new();
        for r in p.rels.all_ids().into_iter().chain(p.hidden_rels.all_ids()) {
            if !out.iter().any(|o| o == r) {
                out.push(r.to_string());
            }
        }
        out
    }

    /// Breadth-first reachability from `from` to `to`, optionally refusing
    /// to pass through `excluding`.
    pub fn connected(&self, from: &str, to: &str, excluding: Option<&str>) -> bool {
        if Some(from) == excluding || Some(to) == excluding {
            return false;
        }
        if from == to {
            return true;
        }
        let mut seen: FxHashSet<String> = FxHashSet::default();
        let mut queue: VecDeque<String> = VecDeque::from([from.to_string()]);
        seen.insert(from.to_string());
        while let Some(cur) = queue.pop_front() {
            for n in self.neighbors(&cur) {
                if Some(n.as_str()) == excluding || !self.contains(&n) {
                    continue;
                }
                if n == to {
                    return true;
                }
                if seen.insert(n.clone()) {
                    queue.push_back(n);
                }
            }
        }
        false
    }

    /// Whether `id` can reach the first person in the graph.
    pub fn connected_to_first_person(&self, id: &str) -> bool {
        match self.first_id() {
            Some(first) => self.connected(id, first, None),
            None => false,
        }
    }

    /// Whether every relative of `candidate` stays connected to `anchor`
    /// when `candidate` is taken out of the graph.
    pub fn relatives_connected_without(&self, candidate: &str, anchor: &str) -> bool {
        let Some(p) = self.get(candidate) else {
            return true;
        };
        let mut relatives = p.rels.all_ids();
        relatives.extend(p.hidden_rels.all_ids());
        relatives
            .into_iter()
            .filter(|r| *r != anchor)
            .all(|r| self.connected(r, anchor, Some(candidate)))
    }
}

impl From<Vec<Person>> for PersonGraph {
    fn from(persons: Vec<Person>) -> Self {
        Self::from_persons(persons)
    }
}

impl Serialize for PersonGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.persons.len()))?;
        for p in self.persons.values() {
            seq.serialize_element(p)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for PersonGraph {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = PersonGraph;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a sequence of person records")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut persons = Vec::new();
                while let Some(p) = seq.next_element::<Person>()? {
                    persons.push(p);
                }
                Ok(PersonGraph::from_persons(persons))
            }
        }
        deserializer.deserialize_seq(V)
    }
}
