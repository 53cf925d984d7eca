#![forbid(unsafe_code)]

//! Tidy tree layout.
//!
//! A contour-scanning implementation of the Reingold-Tilford "tidy"
//! drawing algorithm, exposed in the shape popularized by d3-hierarchy's
//! `tree()`: build a hierarchy from a root datum and a children accessor,
//! then run a layout configured with a node size and a pairwise
//! separation function.
//!
//! Coordinates are assigned so that the root sits at `(0, 0)`, siblings are
//! spread along x with a gap of `separation(a, b) * node_size.0`, and each
//! depth level advances y by `node_size.1`.

pub mod hierarchy;
pub mod layout;

pub use hierarchy::{Hierarchy, Node};
pub use layout::TreeLayout;
