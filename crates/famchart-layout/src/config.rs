//! Chart configuration.
//!
//! A plain struct of knobs plus optional boxed hooks, assembled with
//! builder-style `with_*` calls. Hooks receive person records (or a built
//! hierarchy) and never the mutable graph; the engine owns mutation.

use famchart_core::Person;
use std::cmp::Ordering;
use std::fmt;
use tidytree::Hierarchy;

/// Which of the two hierarchies a hook is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeSide {
    Ancestry,
    Progeny,
}

pub type SortPersonsFn = Box<dyn Fn(&Person, &Person) -> Ordering>;
pub type PersonPredicate = Box<dyn Fn(&Person) -> bool>;
pub type ModifyHierarchyFn = Box<dyn Fn(&mut Hierarchy<String>, TreeSide)>;

pub struct ChartConfig {
    /// Horizontal gap between adjacent cards, in layout units.
    pub node_separation: f64,
    /// Vertical gap between generations.
    pub level_separation: f64,
    /// Run the placeholder-spouse augmentation before building hierarchies.
    pub single_parent_empty_card: bool,
    /// Swap the roles of the two separations, then swap x/y at the end.
    pub is_horizontal: bool,
    /// Trim both sides to a single generation.
    pub one_level_rels: bool,
    pub ancestry_depth: Option<u32>,
    pub progeny_depth: Option<u32>,
    pub show_siblings_of_main: bool,
    /// Detect duplicated branches and give each appearance a toggle.
    pub duplicate_branch_toggle: bool,
    /// Keep only the most recently opened appearance of a duplicate group
    /// expanded.
    pub on_toggle_one_close_others: bool,
    pub sort_children: Option<SortPersonsFn>,
    pub sort_spouses: Option<SortPersonsFn>,
    /// Invoked once per built hierarchy, before layout.
    pub modify_tree_hierarchy: Option<ModifyHierarchyFn>,
    /// Marks matching persons (and, transitively, their partners and
    /// descendants-of-care) as private.
    pub private_cards_condition: Option<PersonPredicate>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            node_separation: 250.0,
            level_separation: 150.0,
            single_parent_empty_card: false,
            is_horizontal: false,
            one_level_rels: false,
            ancestry_depth: None,
            progeny_depth: None,
            show_siblings_of_main: false,
            duplicate_branch_toggle: false,
            on_toggle_one_close_others: false,
            sort_children: None,
            sort_spouses: None,
            modify_tree_hierarchy: None,
            private_cards_condition: None,
        }
    }
}

impl ChartConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_separations(mut self, node: f64, level: f64) -> Self {
        self.node_separation = node;
        self.level_separation = level;
        self
    }

    pub fn with_single_parent_empty_card(mut self, on: bool) -> Self {
        self.single_parent_empty_card = on;
        self
    }

    pub fn with_horizontal(mut self, on: bool) -> Self {
        self.is_horizontal = on;
        self
    }

    pub fn with_one_level_rels(mut self, on: bool) -> Self {
        self.one_level_rels = on;
        self
    }

    pub fn with_ancestry_depth(mut self, depth: Option<u32>) -> Self {
        self.ancestry_depth = depth;
        self
    }

    pub fn with_progeny_depth(mut self, depth: Option<u32>) -> Self {
        self.progeny_depth = depth;
        self
    }

    pub fn with_siblings_of_main(mut self, on: bool) -> Self {
        self.show_siblings_of_main = on;
        self
    }

    pub fn with_duplicate_branch_toggle(mut self, on: bool) -> Self {
        self.duplicate_branch_toggle = on;
        self
    }

    pub fn with_one_close_others(mut self, on: bool) -> Self {
        self.on_toggle_one_close_others = on;
        self
    }

    pub fn with_sort_children(mut self, f: SortPersonsFn) -> Self {
        self.sort_children = Some(f);
        self
    }

    pub fn with_sort_spouses(mut self, f: SortPersonsFn) -> Self {
        self.sort_spouses = Some(f);
        self
    }

    pub fn with_modify_tree_hierarchy(mut self, f: ModifyHierarchyFn) -> Self {
        self.modify_tree_hierarchy = Some(f);
        self
    }

    pub fn with_private_cards_condition(mut self, f: PersonPredicate) -> Self {
        self.private_cards_condition = Some(f);
        self
    }

    /// Effective `(node, level)` separations after the horizontal swap.
    pub(crate) fn effective_separations(&self) -> (f64, f64) {
        if self.is_horizontal {
            (self.level_separation, self.node_separation)
        } else {
            (self.node_separation, self.level_separation)
        }
    }
}

impl fmt::Debug for ChartConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartConfig")
            .field("node_separation", &self.node_separation)
            .field("level_separation", &self.level_separation)
            .field("single_parent_empty_card", &self.single_parent_empty_card)
            .field("is_horizontal", &self.is_horizontal)
            .field("one_level_rels", &self.one_level_rels)
            .field("ancestry_depth", &self.ancestry_depth)
            .field("progeny_depth", &self.progeny_depth)
            .field("show_siblings_of_main", &self.show_siblings_of_main)
            .field("duplicate_branch_toggle", &self.duplicate_branch_toggle)
            .field("on_toggle_one_close_others", &self.on_toggle_one_close_others)
            .field("sort_children", &self.sort_children.is_some())
            .field("sort_spouses", &self.sort_spouses.is_some())
            .field("modify_tree_hierarchy", &self.modify_tree_hierarchy.is_some())
            .field("private_cards_condition", &self.private_cards_condition.is_some())
            .finish()
    }
}
