//! Person records.
//!
//! A person is an opaque id, a free-form attribute map, and four relation
//! slots. Everything else on the struct is bookkeeping the chart needs to
//! carry between layouts: detached relations from hide toggles, the
//! placeholder/unknown flags, in-flight new-relation data, and the
//! duplicate-branch toggle timestamps.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Reserved attribute key holding `"M"` or `"F"`.
pub const GENDER_KEY: &str = "gender";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }

    pub fn parse(s: &str) -> Option<Gender> {
        match s {
            "M" => Some(Gender::Male),
            "F" => Some(Gender::Female),
            _ => None,
        }
    }

    pub fn opposite(self) -> Gender {
        match self {
            Gender::Male => Gender::Female,
            Gender::Female => Gender::Male,
        }
    }
}

/// The kind of relative being created or linked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelType {
    Father,
    Mother,
    Son,
    Daughter,
    Spouse,
}

impl RelType {
    pub fn is_parent(self) -> bool {
        matches!(self, RelType::Father | RelType::Mother)
    }

    pub fn is_child(self) -> bool {
        matches!(self, RelType::Son | RelType::Daughter)
    }

    /// Gender implied by the relation: daughters and mothers are female,
    /// a spouse takes the opposite of the target, everything else male.
    pub fn derived_gender(self, target_gender: Option<Gender>) -> Gender {
        match self {
            RelType::Daughter | RelType::Mother => Gender::Female,
            RelType::Spouse => match target_gender {
                Some(g) => g.opposite(),
                None => Gender::Female,
            },
            RelType::Father | RelType::Son => Gender::Male,
        }
    }
}

/// Relation slots. Spouse and children order is significant: layout sorts
/// children by the spouse sequence and places spouses in listed order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rels {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spouses: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,
}

impl Rels {
    pub fn is_empty(&self) -> bool {
        self.father.is_none()
            && self.mother.is_none()
            && self.spouses.is_empty()
            && self.children.is_empty()
    }

    /// The parent slot a person of gender `g` occupies on their children.
    pub fn parent_slot(&self, g: Gender) -> &Option<String> {
        match g {
            Gender::Male => &self.father,
            Gender::Female => &self.mother,
        }
    }

    pub fn parent_slot_mut(&mut self, g: Gender) -> &mut Option<String> {
        match g {
            Gender::Male => &mut self.father,
            Gender::Female => &mut self.mother,
        }
    }

    /// Every id mentioned in any slot, in slot order.
    pub fn all_ids(&self) -> Vec<&str> {
        let mut out = Vec::new();
        if let Some(f) = &self.father {
            out.push(f.as_str());
        }
        if let Some(m) = &self.mother {
            out.push(m.as_str());
        }
        out.extend(self.spouses.iter().map(String::as_str));
        out.extend(self.children.iter().map(String::as_str));
        out
    }
}

/// In-flight data about a relation being created through a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRelData {
    pub rel_type: RelType,
    /// For children: the id of the second parent, or `"_new"` to request a
    /// placeholder partner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_parent_id: Option<String>,
}

/// Per-parent toggle timestamps for duplicated ancestry branches.
/// Positive means expanded, negative collapsed; the magnitude is a Unix
/// millisecond timestamp so recency comparisons are a max over values.
pub type ToggleMap = BTreeMap<String, i64>;

/// Per-(parent, spouse) toggle timestamps for duplicated progeny branches.
pub type SpouseToggleMap = BTreeMap<String, BTreeMap<String, i64>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub data: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Rels::is_empty")]
    pub rels: Rels,

    /// Relations detached by hide toggles, restorable unchanged.
    #[serde(default, rename = "_rels", skip_serializing_if = "Rels::is_empty")]
    pub hidden_rels: Rels,

    /// Placeholder spouse created so a child has two parents.
    #[serde(default, skip_serializing_if = "is_false")]
    pub to_add: bool,

    /// Demoted blank card: kept in the graph because removing it would
    /// disconnect relatives.
    #[serde(default, skip_serializing_if = "is_false")]
    pub unknown: bool,

    #[serde(
        default,
        rename = "_new_rel_data",
        skip_serializing_if = "Option::is_none"
    )]
    pub new_rel_data: Option<NewRelData>,

    #[serde(default, rename = "_tgdp", skip_serializing_if = "BTreeMap::is_empty")]
    pub tgdp: ToggleMap,

    #[serde(default, rename = "_tgdp_sp", skip_serializing_if = "BTreeMap::is_empty")]
    pub tgdp_sp: SpouseToggleMap,

    /// Stashed `tgdp_sp` of a co-parent whose children are hidden inside a
    /// collapsed duplicate branch; restored when the branch reopens.
    #[serde(default, rename = "__tgdp_sp", skip_serializing_if = "BTreeMap::is_empty")]
    pub tgdp_sp_stash: SpouseToggleMap,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Person {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data: Map::new(),
            rels: Rels::default(),
            hidden_rels: Rels::default(),
            to_add: false,
            unknown: false,
            new_rel_data: None,
            tgdp: BTreeMap::new(),
            tgdp_sp: BTreeMap::new(),
            tgdp_sp_stash: BTreeMap::new(),
        }
    }

    /// A `to_add` placeholder: an id, a gender, nothing else.
    pub fn placeholder(id: impl Into<String>, gender: Gender) -> Self {
        let mut p = Self::new(id);
        p.to_add = true;
        p.set_gender(Some(gender));
        p
    }

    pub fn gender(&self) -> Option<Gender> {
        self.data
            .get(GENDER_KEY)
            .and_then(Value::as_str)
            .and_then(Gender::parse)
    }

    pub fn set_gender(&mut self, gender: Option<Gender>) {
        match gender {
            Some(g) => {
                self.data
                    .insert(GENDER_KEY.to_string(), Value::String(g.as_str().to_string()));
            }
            None => {
                self.data.remove(GENDER_KEY);
            }
        }
    }

    /// True for real persons: not a placeholder.
    pub fn is_real(&self) -> bool {
        !self.to_add
    }
}
