#![forbid(unsafe_code)]

//! Family-tree person graph (headless).
//!
//! The semantic core underneath the chart: person records linked by
//! father/mother/spouse/children references, the placeholder augmentation
//! that gives every child two parents, and the edit operations (add
//! relative, link existing, delete, hide/show branches) that mutate the
//! graph while preserving its invariants:
//!
//! - relations are reciprocal (a child's `father` is a person whose
//!   `children` contains the child, spouses list each other)
//! - a person referenced as `father` is male, as `mother` female
//! - no relation slot holds an id that does not resolve
//! - nobody is their own ancestor
//! - deleting a person that holds the graph together demotes them to an
//!   `unknown` blank card instead of removing them

pub mod augment;
pub mod edit;
pub mod error;
pub mod graph;
pub mod model;
pub mod refattrs;
pub mod time;

pub use error::{Error, Result};
pub use graph::PersonGraph;
pub use model::{Gender, NewRelData, Person, RelType, Rels};
