//! Next-step and missing-step inference over a recipe graph.
//!
//! Both functions take the ids "passed" at a cut point of a recording and
//! classify every other actionable node of the graph:
//!
//! - **next**: all direct prerequisites passed, and nothing downstream of it
//!   passed yet.
//! - **missing**: some ancestor passed and some descendant passed, but the
//!   node itself was never touched.
//!
//! A node with a passed descendant can never be "next", and a "missing" node
//! always has one, so the two classifications are disjoint for every graph
//! shape.
//!
//! The start node `0` is always treated as passed. END sinks and the start
//! node itself are never reported.

use std::collections::BTreeSet;

use log::warn;

use crate::{graph::RecipeGraph, models::Step, models::START_STEP_ID};

/// Copies the caller's ids into a set that always contains the start node.
fn passed_set(passed: &[i64]) -> BTreeSet<i64> {
    let mut set: BTreeSet<i64> = passed.iter().copied().collect();
    if !set.insert(START_STEP_ID) {
        warn!("Start step found in passed steps");
    }
    set
}

fn candidates<'g>(
    graph: &'g RecipeGraph,
    passed: &'g BTreeSet<i64>,
) -> impl Iterator<Item = i64> + 'g {
    graph
        .nodes()
        .filter(move |id| !graph.is_end(*id) && !passed.contains(id))
}

fn describe(graph: &RecipeGraph, ids: impl Iterator<Item = i64>) -> Vec<Step> {
    ids.filter_map(|id| graph.step(id)).collect()
}

/// Steps that are valid to perform next.
///
/// An empty result means there is no next step (for example after the last
/// step of the recipe); it is not an error.
///
/// # Examples
///
/// ```rust
/// use stepgraph_core::{graph::RecipeGraph, reachability::next_steps};
///
/// let graph = RecipeGraph::new(
///     [(0, "START"), (1, "Boil-Boil water"), (2, "Steep-Steep tea"), (3, "END")],
///     [(0, 1), (1, 2), (2, 3)],
/// )
/// .unwrap();
///
/// let next = next_steps(&graph, &[1]);
/// assert_eq!(next.len(), 1);
/// assert_eq!(next[0].step_id, 2);
/// ```
pub fn next_steps(graph: &RecipeGraph, passed: &[i64]) -> Vec<Step> {
    let passed = passed_set(passed);
    let next = candidates(graph, &passed).filter(|id| {
        let prerequisites_done = graph.predecessors(*id).all(|p| passed.contains(&p));
        // once anything downstream is done this node is missing, not next
        let superseded = graph.descendants(*id).iter().any(|d| passed.contains(d));
        prerequisites_done && !superseded
    });
    describe(graph, next)
}

/// Steps skipped between two performed steps.
///
/// # Examples
///
/// ```rust
/// use stepgraph_core::{graph::RecipeGraph, reachability::missing_steps};
///
/// let graph = RecipeGraph::new(
///     [(0, "START"), (1, "Boil-Boil water"), (2, "Steep-Steep tea"), (3, "END")],
///     [(0, 1), (1, 2), (2, 3)],
/// )
/// .unwrap();
///
/// let missing = missing_steps(&graph, &[2]);
/// assert_eq!(missing.len(), 1);
/// assert_eq!(missing[0].step_id, 1);
/// ```
pub fn missing_steps(graph: &RecipeGraph, passed: &[i64]) -> Vec<Step> {
    let passed = passed_set(passed);
    let missing = candidates(graph, &passed).filter(|id| {
        let before = graph.ancestors(*id).iter().any(|a| passed.contains(a));
        let after = graph.descendants(*id).iter().any(|d| passed.contains(d));
        before && after
    });
    describe(graph, missing)
}
