#![forbid(unsafe_code)]

//! `famchart` is a headless, renderer-agnostic family-tree chart core.
//!
//! It owns a person graph, recomputes a two-sided tree layout around a
//! focusable person on every change, and hands positioned cards and edge
//! endpoints to whatever draws them. Editing goes through the store:
//! add/link relatives, delete (with articulation-point demotion), hide
//! and show branches, expand and collapse duplicated lines.
//!
//! Rendering, form UI and persistence are collaborators, not parts of
//! this crate: a renderer consumes [`Layout`] values, a form UI consumes
//! [`form::FormDescriptor`]s, and persistence implements
//! [`storage::PersonStorage`].

pub mod form;
pub mod props;
pub mod storage;
pub mod store;

pub use famchart_core::{
    edit, refattrs, time, Gender, NewRelData, Person, PersonGraph, RelType, Rels,
};
pub use famchart_layout::{
    transitions, ChartConfig, Layout, LayoutDim, LayoutNode, TreeSide,
};
pub use props::UpdateProps;
pub use store::FamilyChart;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Graph(#[from] famchart_core::Error),
    #[error(transparent)]
    Layout(#[from] famchart_layout::Error),
}
