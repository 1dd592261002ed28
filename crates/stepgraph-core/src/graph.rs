//! Immutable recipe graphs.
//!
//! A [`RecipeGraph`] is the dependency DAG of one procedure. An edge `(u, v)`
//! means `u` must be completed before `v` can begin. Node `0` is the implicit
//! start, and nodes described as `END` are structural sinks.
//!
//! Graphs are validated once at construction and never mutated afterwards,
//! so a single graph is shared (via [`std::sync::Arc`] in a [`RecipeBook`])
//! by every recording of its procedure.
//!
//! ```text
//!   0 ──▶ 1 ──▶ 2 ──▶ 3 (END)
//!   │           ▲
//!   └──▶ 4 ─────┘
//! ```
//!
//! # Examples
//!
//! ```rust
//! use stepgraph_core::graph::RecipeGraph;
//!
//! let graph = RecipeGraph::new(
//!     [(0, "START"), (1, "Boil-Boil water"), (2, "END")],
//!     [(0, 1), (1, 2)],
//! )
//! .unwrap();
//!
//! assert!(graph.descendants(0).contains(&2));
//! assert_eq!(graph.roots(), vec![1]);
//! ```

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::{
    error::{CoreError, Result},
    models::{Step, END_DESCRIPTION, START_STEP_ID},
};

pub mod source;


pub use source::{RecipeBook, RecipeSource};

type Adjacency = BTreeMap<i64, BTreeSet<i64>>;

/// Dependency DAG of one procedure.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeGraph {
    steps: BTreeMap<i64, String>,
    successors: Adjacency,
    predecessors: Adjacency,
}

impl RecipeGraph {
    /// Builds and validates a graph from step descriptions and prerequisite
    /// edges.
    ///
    /// # Errors
    ///
    /// - `CoreError::UnknownStep` if an edge endpoint has no description
    /// - `CoreError::MissingStartNode` if there is no step `0`
    /// - `CoreError::CyclicGraph` if the edges contain a cycle
    /// - `CoreError::UnreachableStep` if a step has no path from `0`
    pub fn new<S, D, E>(steps: S, edges: E) -> Result<Self>
    where
        S: IntoIterator<Item = (i64, D)>,
        D: Into<String>,
        E: IntoIterator<Item = (i64, i64)>,
    {
        let steps: BTreeMap<i64, String> = steps
            .into_iter()
            .map(|(id, description)| (id, description.into()))
            .collect();
        if !steps.contains_key(&START_STEP_ID) {
            return Err(CoreError::MissingStartNode);
        }

        let mut successors: Adjacency = steps.keys().map(|id| (*id, BTreeSet::new())).collect();
        let mut predecessors = successors.clone();
        for (u, v) in edges {
            for id in [u, v] {
                if !steps.contains_key(&id) {
                    return Err(CoreError::UnknownStep { id });
                }
            }
            successors.entry(u).or_default().insert(v);
            predecessors.entry(v).or_default().insert(u);
        }

        let graph = Self {
            steps,
            successors,
            predecessors,
        };
        graph.check_acyclic()?;
        graph.check_reachable()?;
        Ok(graph)
    }

    /// Kahn's algorithm: any node left with unmet in-degree is on a cycle.
    fn check_acyclic(&self) -> Result<()> {
        let mut in_degree: BTreeMap<i64, usize> = self
            .predecessors
            .iter()
            .map(|(id, preds)| (*id, preds.len()))
            .collect();
        let mut queue: VecDeque<i64> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(id, _)| *id)
            .collect();

        let mut visited = 0;
        while let Some(node) = queue.pop_front() {
            visited += 1;
            for next in &self.successors[&node] {
                if let Some(degree) = in_degree.get_mut(next) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(*next);
                    }
                }
            }
        }

        if visited == self.steps.len() {
            Ok(())
        } else {
            let nodes = in_degree
                .into_iter()
                .filter(|(_, degree)| *degree > 0)
                .map(|(id, _)| id)
                .collect();
            Err(CoreError::CyclicGraph { nodes })
        }
    }

    fn check_reachable(&self) -> Result<()> {
        let reachable = self.descendants(START_STEP_ID);
        match self
            .nodes()
            .find(|id| *id != START_STEP_ID && !reachable.contains(id))
        {
            Some(id) => Err(CoreError::UnreachableStep { id }),
            None => Ok(()),
        }
    }

    /// All step ids in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = i64> + '_ {
        self.steps.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.steps.contains_key(&id)
    }

    pub fn description(&self, id: i64) -> Option<&str> {
        self.steps.get(&id).map(String::as_str)
    }

    pub fn step(&self, id: i64) -> Option<Step> {
        self.description(id).map(|d| Step::new(id, d))
    }

    /// Whether the node is a structural END sink.
    pub fn is_end(&self, id: i64) -> bool {
        self.description(id) == Some(END_DESCRIPTION)
    }

    /// Direct prerequisites of a node.
    pub fn predecessors(&self, id: i64) -> impl Iterator<Item = i64> + '_ {
        self.predecessors.get(&id).into_iter().flatten().copied()
    }

    /// Direct dependents of a node.
    pub fn successors(&self, id: i64) -> impl Iterator<Item = i64> + '_ {
        self.successors.get(&id).into_iter().flatten().copied()
    }

    /// Every node with a path to `id`, excluding `id` itself.
    pub fn ancestors(&self, id: i64) -> BTreeSet<i64> {
        walk(&self.predecessors, id)
    }

    /// Every node reachable from `id`, excluding `id` itself.
    pub fn descendants(&self, id: i64) -> BTreeSet<i64> {
        walk(&self.successors, id)
    }

    /// Actionable steps that only depend on the start node.
    pub fn roots(&self) -> Vec<i64> {
        self.nodes()
            .filter(|id| *id != START_STEP_ID && !self.is_end(*id))
            .filter(|id| self.predecessors(*id).all(|p| p == START_STEP_ID))
            .collect()
    }

    /// Ids of every step carrying exactly this description.
    pub fn ids_for_description(&self, description: &str) -> Vec<i64> {
        self.steps
            .iter()
            .filter(|(_, d)| d.as_str() == description)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Iterate canonical steps in id order.
    pub fn steps(&self) -> impl Iterator<Item = Step> + '_ {
        self.steps.iter().map(|(id, d)| Step::new(*id, d.as_str()))
    }
}

fn walk(adjacency: &Adjacency, start: i64) -> BTreeSet<i64> {
    let mut seen = BTreeSet::new();
    let mut queue: VecDeque<i64> = VecDeque::from([start]);
    while let Some(node) = queue.pop_front() {
        for next in adjacency.get(&node).into_iter().flatten() {
            if seen.insert(*next) {
                queue.push_back(*next);
            }
        }
    }
    seen.remove(&start);
    seen
}
