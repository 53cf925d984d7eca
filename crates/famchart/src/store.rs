//! The reactive store.
//!
//! Owns the person graph, the current focus, the last computed layout and
//! the configuration. Every mutation goes through here; `update_tree`
//! re-runs the layout engine and notifies the subscriber exactly once per
//! call. The store is total: an empty graph grows a blank person, a focus
//! deleted out from under the chart recovers through the focus history.

use crate::props::UpdateProps;
use crate::Result;
use famchart_core::edit::{self, DeleteOutcome};
use famchart_core::{Person, PersonGraph, RelType};
use famchart_layout::{calculate_tree, transitions, ChartConfig, Layout, LayoutNode};
use serde_json::Map;
use std::fmt;

const MAIN_HISTORY_LIMIT: usize = 10;
const SNAPSHOT_LIMIT: usize = 50;

type UpdateSubscriber = Box<dyn FnMut(&UpdateProps)>;

#[derive(Clone)]
struct Snapshot {
    graph: PersonGraph,
    main_id: Option<String>,
}

pub struct FamilyChart {
    graph: PersonGraph,
    main_id: Option<String>,
    main_id_history: Vec<String>,
    tree: Option<Layout>,
    config: ChartConfig,
    on_update: Option<UpdateSubscriber>,
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
}

impl Default for FamilyChart {
    fn default() -> Self {
        Self::new()
    }
}

impl FamilyChart {
    /// An empty chart. The first `update_tree` seeds a blank person so
    /// there is always something to focus.
    pub fn new() -> Self {
        Self {
            graph: PersonGraph::new(),
            main_id: None,
            main_id_history: Vec::new(),
            tree: None,
            config: ChartConfig::default(),
            on_update: None,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: ChartConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the configuration; takes effect on the next
    /// [`FamilyChart::update_tree`].
    pub fn set_config(&mut self, config: ChartConfig) {
        self.config = config;
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn set_on_update(&mut self, subscriber: impl FnMut(&UpdateProps) + 'static) {
        self.on_update = Some(Box::new(subscriber));
    }

    /// Replaces the whole graph. The focus and its history are kept; a
    /// focus that no longer resolves recovers on the next update.
    pub fn update_data(&mut self, persons: Vec<Person>) {
        self.graph = PersonGraph::from_persons(persons);
    }

    /// Re-points the chart at `id`, remembering the previous focus in a
    /// bounded, deduplicated history.
    pub fn update_main_id(&mut self, id: &str) {
        if self.main_id.as_deref() == Some(id) {
            return;
        }
        if let Some(prev) = self.main_id.take() {
            self.main_id_history.retain(|h| *h != prev);
            self.main_id_history.push(prev);
            if self.main_id_history.len() > MAIN_HISTORY_LIMIT {
                self.main_id_history.remove(0);
            }
        }
        self.main_id = Some(id.to_string());
    }

    /// The most recent previously-focused person that still exists, else
    /// the first person in the graph.
    pub fn get_last_available_main_datum(&self) -> Option<&Person> {
        self.main_id_history
            .iter()
            .rev()
            .find_map(|id| self.graph.get(id))
            .or_else(|| self.graph.first())
    }

    /// Recomputes the layout and notifies the subscriber once. Adopts the
    /// engine's focus choice when none is set, and recovers a deleted
    /// focus by walking the history.
    pub fn update_tree(&mut self, props: UpdateProps) -> Result<&Layout> {
        if self.graph.is_empty() {
            let id = self.graph.seed_blank();
            tracing::warn!(target: "famchart", seeded = %id, "graph was empty; inserted blank person");
        }
        if let Some(current) = self.main_id.clone() {
            if !self.graph.contains(&current) {
                let recovered = self
                    .get_last_available_main_datum()
                    .map(|p| p.id.clone());
                tracing::warn!(target: "famchart", missing = %current, "focus no longer exists; recovering from history");
                self.main_id = recovered;
            }
        }

        let mut layout = calculate_tree(&mut self.graph, self.main_id.as_deref(), &self.config)?;
        if self.main_id.is_none() {
            self.main_id = Some(layout.main_id.clone());
        }
        transitions::apply_transitions(self.tree.as_ref(), &mut layout);
        self.tree = Some(layout);

        if let Some(subscriber) = self.on_update.as_mut() {
            subscriber(&props);
        }
        match self.tree.as_ref() {
            Some(tree) => Ok(tree),
            None => Err(famchart_layout::Error::Inconsistent {
                message: "layout missing right after recomputation".to_string(),
            }
            .into()),
        }
    }

    // ─── read access ─────────────────────────────────────────────────

    pub fn get_data(&self) -> &PersonGraph {
        &self.graph
    }

    pub fn get_datum(&self, id: &str) -> Option<&Person> {
        self.graph.get(id)
    }

    pub fn get_main_id(&self) -> Option<&str> {
        self.main_id.as_deref()
    }

    pub fn get_main_datum(&self) -> Option<&Person> {
        self.main_id.as_deref().and_then(|id| self.graph.get(id))
    }

    pub fn get_tree(&self) -> Option<&Layout> {
        self.tree.as_ref()
    }

    pub fn get_tree_datum(&self, tid: &str) -> Option<&LayoutNode> {
        self.tree.as_ref().and_then(|t| t.node(tid))
    }

    pub fn get_tree_main_datum(&self) -> Option<&LayoutNode> {
        self.tree.as_ref().and_then(|t| t.main_node())
    }

    // ─── edit operations ─────────────────────────────────────────────

    pub fn add_relative(
        &mut self,
        target_id: &str,
        rel_type: RelType,
        person: Person,
        other_parent_id: Option<&str>,
    ) -> Result<String> {
        self.with_snapshot(|g| edit::add_relative(g, target_id, rel_type, person, other_parent_id))
    }

    pub fn link_existing_relative(
        &mut self,
        target_id: &str,
        rel_type: RelType,
        existing_id: &str,
        other_parent_id: Option<&str>,
    ) -> Result<()> {
        self.with_snapshot(|g| {
            edit::link_existing_relative(g, target_id, rel_type, existing_id, other_parent_id)
        })
    }

    pub fn link_candidates(&self, target_id: &str, rel_type: RelType) -> Vec<String> {
        edit::link_candidates(&self.graph, target_id, rel_type)
    }

    pub fn delete_person(&mut self, id: &str) -> Result<DeleteOutcome> {
        self.with_snapshot(|g| edit::delete_person(g, id))
    }

    /// Applies a form submission: replaces attributes, mirrors
    /// relation-scoped fields, and promotes a placeholder to a real card.
    pub fn submit_form(&mut self, id: &str, data: Map<String, serde_json::Value>) -> Result<()> {
        self.with_snapshot(|g| {
            edit::submit_person_data(g, id, data)?;
            edit::move_to_added(g, id)
        })
    }

    pub fn toggle_ancestry(&mut self, id: &str) -> Result<()> {
        self.with_snapshot(|g| edit::toggle_ancestry(g, id))
    }

    pub fn toggle_progeny(&mut self, id: &str) -> Result<()> {
        self.with_snapshot(|g| edit::toggle_progeny(g, id))
    }

    pub fn toggle_ancestry_duplicate(&mut self, person_id: &str, parent_key: &str) -> Result<()> {
        self.with_snapshot(|g| edit::toggle_ancestry_duplicate(g, person_id, parent_key))
    }

    pub fn toggle_progeny_duplicate(
        &mut self,
        person_id: &str,
        parent_id: &str,
        spouse_id: Option<&str>,
    ) -> Result<()> {
        self.with_snapshot(|g| edit::toggle_progeny_duplicate(g, person_id, parent_id, spouse_id))
    }

    // ─── undo / redo ─────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        let Some(snap) = self.undo_stack.pop() else {
            return false;
        };
        self.redo_stack.push(self.current_snapshot());
        self.restore(snap);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(snap) = self.redo_stack.pop() else {
            return false;
        };
        self.undo_stack.push(self.current_snapshot());
        self.restore(snap);
        true
    }

    fn current_snapshot(&self) -> Snapshot {
        Snapshot {
            graph: self.graph.clone(),
            main_id: self.main_id.clone(),
        }
    }

    fn restore(&mut self, snap: Snapshot) {
        self.graph = snap.graph;
        self.main_id = snap.main_id;
    }

    /// Runs a graph mutation with undo bookkeeping: the pre-state is
    /// pushed only when the operation succeeds, so failed operations
    /// leave both the graph and the stacks untouched.
    fn with_snapshot<T>(
        &mut self,
        f: impl FnOnce(&mut PersonGraph) -> famchart_core::Result<T>,
    ) -> Result<T> {
        let snap = self.current_snapshot();
        match f(&mut self.graph) {
            Ok(value) => {
                self.undo_stack.push(snap);
                if self.undo_stack.len() > SNAPSHOT_LIMIT {
                    self.undo_stack.remove(0);
                }
                self.redo_stack.clear();
                Ok(value)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl fmt::Debug for FamilyChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FamilyChart")
            .field("persons", &self.graph.len())
            .field("main_id", &self.main_id)
            .field("main_id_history", &self.main_id_history)
            .field("has_tree", &self.tree.is_some())
            .field("config", &self.config)
            .field("subscribed", &self.on_update.is_some())
            .field("undo_depth", &self.undo_stack.len())
            .finish()
    }
}
