#![forbid(unsafe_code)]

//! Two-sided family-tree layout engine (headless).
//!
//! Takes a person graph and a focus id and produces positioned cards and
//! edge endpoints for a renderer: the focus at the origin, ancestors
//! growing upward, descendants downward, spouses beside their partners,
//! optional siblings beside the focus. Shared branches reached through
//! more than one line become duplicate appearances with per-context
//! expand/collapse toggles so the on-screen structure stays a tree even
//! when the data is not.
//!
//! The engine is deterministic for a given graph, focus and configuration,
//! and never partially returns: a well-formed graph always lays out, an
//! inconsistent one surfaces an [`Error`] without half-written state.

pub mod config;
mod duplicates;
mod edges;
mod engine;
pub mod error;
mod hierarchy;
pub mod node;
mod privacy;
mod siblings;
mod spouses;
pub mod transitions;

pub use config::{ChartConfig, TreeSide};
pub use engine::calculate_tree;
pub use error::{Error, Result};
pub use node::{Layout, LayoutDim, LayoutNode};
