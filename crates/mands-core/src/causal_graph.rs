// Rust guideline compliant 2026-02-06

//! Causal graph of a planning task.
//!
//! There is an arc `u -> v` if some operator has a precondition or effect
//! condition on `u` and an effect on `v`, and arcs in both directions
//! between variables affected by the same operator.

use crate::Task;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::BTreeSet;

/// Variable dependency graph.
#[derive(Debug, Clone)]
pub struct CausalGraph {
    /// Node `i` is task variable `i`.
    graph: DiGraph<usize, ()>,
}

impl CausalGraph {
    /// Builds the causal graph of `task`.
    pub fn new(task: &Task) -> Self {
        let mut graph = DiGraph::with_capacity(task.num_variables(), 0);
        for var in 0..task.num_variables() {
            graph.add_node(var);
        }

        let mut arcs: BTreeSet<(usize, usize)> = BTreeSet::new();
        for op in &task.operators {
            let effect_vars: BTreeSet<usize> = op.effects.iter().map(|e| e.fact.var).collect();
            for effect in &op.effects {
                let target = effect.fact.var;
                // Preconditions and effect conditions feed the effect
                for source in op
                    .preconditions
                    .iter()
                    .chain(&effect.conditions)
                    .map(|fact| fact.var)
                {
                    if source != target {
                        arcs.insert((source, target));
                    }
                }
            }
            // Co-occurring effects depend on each other
            for &u in &effect_vars {
                for &v in &effect_vars {
                    if u != v {
                        arcs.insert((u, v));
                    }
                }
            }
        }
        for (from, to) in arcs {
            graph.add_edge(NodeIndex::new(from), NodeIndex::new(to), ());
        }
        Self { graph }
    }

    /// Variables with an arc from `var`, in increasing order.
    pub fn successors(&self, var: usize) -> Vec<usize> {
        let mut successors: Vec<usize> = self
            .graph
            .neighbors(NodeIndex::new(var))
            .map(|node| node.index())
            .collect();
        successors.sort_unstable();
        successors.dedup();
        successors
    }

    /// Strongly connected components in topological order, each sorted.
    pub fn strongly_connected_components(&self) -> Vec<Vec<usize>> {
        // tarjan_scc yields components in reverse topological order
        let mut sccs: Vec<Vec<usize>> = tarjan_scc(&self.graph)
            .into_iter()
            .map(|scc| {
                let mut vars: Vec<usize> = scc.into_iter().map(|node| node.index()).collect();
                vars.sort_unstable();
                vars
            })
            .collect();
        sccs.reverse();
        sccs
    }

    /// Number of arcs.
    pub fn num_arcs(&self) -> usize {
        self.graph.edge_count()
    }
}
