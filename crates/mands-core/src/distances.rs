// Rust guideline compliant 2026-02-06

//! Abstract distances of a transition system.
//!
//! Forward distances (g) are shortest paths from the initial state, goal
//! distances (h) shortest paths to any goal state. Both are computed with
//! petgraph's Dijkstra over label group costs; goal distances run on the
//! reversed graph from a virtual node connected to every goal state.

use crate::types::{StateEquivalenceRelation, INF};
use crate::TransitionSystem;
use petgraph::algo::dijkstra;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use tracing::debug;

/// Distance information for one component.
#[derive(Debug, Clone, Default)]
pub struct Distances {
    init_distances: Vec<u32>,
    goal_distances: Vec<u32>,
    max_f: u32,
    max_g: u32,
    max_h: u32,
    computed: bool,
}

impl Distances {
    /// Creates distances that still have to be computed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether distances are valid for the current transition system.
    pub fn are_distances_computed(&self) -> bool {
        self.computed
    }

    /// Computes g and h for every state of `ts`.
    ///
    /// # Returns
    ///
    /// A mask flagging every state that is unreachable (g = ∞) or
    /// irrelevant (h = ∞). Both kinds are dead ends and are pruned together.
    pub fn compute_distances(&mut self, ts: &TransitionSystem, silent: bool) -> Vec<bool> {
        let num_states = ts.get_size();
        self.init_distances = vec![INF; num_states];
        self.goal_distances = vec![INF; num_states];

        if let Some(init) = ts.get_init_state() {
            let graph = build_graph(ts, false);
            for (node, dist) in dijkstra(&graph, NodeIndex::new(init), None, |e| *e.weight()) {
                self.init_distances[node.index()] = dist;
            }
        }

        if ts.goal_states().iter().any(|&goal| goal) {
            let graph = build_graph(ts, true);
            let virtual_goal = NodeIndex::new(num_states);
            for (node, dist) in dijkstra(&graph, virtual_goal, None, |e| *e.weight()) {
                if node != virtual_goal {
                    self.goal_distances[node.index()] = dist;
                }
            }
        }

        self.computed = true;
        self.compute_maxima();

        let prune: Vec<bool> = (0..num_states)
            .map(|state| self.init_distances[state] == INF || self.goal_distances[state] == INF)
            .collect();
        if !silent {
            let num_pruned = prune.iter().filter(|&&p| p).count();
            debug!(
                "{}distances computed, {} of {} states unreachable or irrelevant",
                ts.tag(),
                num_pruned,
                num_states
            );
        }
        prune
    }

    /// Updates distances after `ts` has been abstracted by `relation`.
    ///
    /// Values are carried over when all states of each class agree on g
    /// and h; otherwise they are recomputed on the abstracted system.
    ///
    /// # Returns
    ///
    /// True if the maximal f value did not change.
    ///
    /// # Panics
    ///
    /// Panics if distances were not computed before the abstraction.
    pub fn apply_abstraction(
        &mut self,
        relation: &StateEquivalenceRelation,
        ts: &TransitionSystem,
        silent: bool,
    ) -> bool {
        assert!(self.computed, "distances must be computed before abstraction");
        let old_max_f = self.max_f;

        let mut init_distances = Vec::with_capacity(relation.len());
        let mut goal_distances = Vec::with_capacity(relation.len());
        let mut homogeneous = true;
        for class in relation {
            let Some(&representative) = class.first() else {
                homogeneous = false;
                break;
            };
            let g = self.init_distances[representative];
            let h = self.goal_distances[representative];
            if class
                .iter()
                .any(|&state| self.init_distances[state] != g || self.goal_distances[state] != h)
            {
                homogeneous = false;
                break;
            }
            init_distances.push(g);
            goal_distances.push(h);
        }

        if homogeneous {
            self.init_distances = init_distances;
            self.goal_distances = goal_distances;
            self.compute_maxima();
        } else {
            if !silent {
                debug!("{}abstraction mixes distances, recomputing", ts.tag());
            }
            self.compute_distances(ts, true);
        }
        self.max_f == old_max_f
    }

    fn compute_maxima(&mut self) {
        self.max_f = 0;
        self.max_g = 0;
        self.max_h = 0;
        for (&g, &h) in self.init_distances.iter().zip(&self.goal_distances) {
            if g != INF && h != INF {
                self.max_g = self.max_g.max(g);
                self.max_h = self.max_h.max(h);
                self.max_f = self.max_f.max(g.saturating_add(h));
            }
        }
    }

    /// Distance from the initial state to `state`.
    ///
    /// # Panics
    ///
    /// Panics if distances have not been computed.
    pub fn get_init_distance(&self, state: usize) -> u32 {
        assert!(self.computed, "distances not computed");
        self.init_distances[state]
    }

    /// Distance from `state` to the nearest goal state.
    ///
    /// # Panics
    ///
    /// Panics if distances have not been computed.
    pub fn get_goal_distance(&self, state: usize) -> u32 {
        assert!(self.computed, "distances not computed");
        self.goal_distances[state]
    }

    /// Goal distances of all states.
    pub fn goal_distances(&self) -> &[u32] {
        &self.goal_distances
    }

    /// Maximal finite f value.
    pub fn get_max_f(&self) -> u32 {
        self.max_f
    }

    /// Maximal finite g value.
    pub fn get_max_g(&self) -> u32 {
        self.max_g
    }

    /// Maximal finite h value.
    pub fn get_max_h(&self) -> u32 {
        self.max_h
    }
}

/// Builds the state graph of `ts`, keeping the cheapest edge between two
/// states. The reversed graph gets an extra node linked to every goal.
fn build_graph(ts: &TransitionSystem, reversed: bool) -> DiGraph<(), u32> {
    let num_states = ts.get_size();
    let mut cheapest: HashMap<(usize, usize), u32> = HashMap::new();
    for group in ts.label_groups() {
        for t in group.transitions() {
            let key = if reversed {
                (t.target, t.src)
            } else {
                (t.src, t.target)
            };
            let cost = cheapest.entry(key).or_insert(group.cost());
            *cost = (*cost).min(group.cost());
        }
    }

    let extra = usize::from(reversed);
    let mut graph = DiGraph::with_capacity(num_states + extra, cheapest.len() + num_states);
    for _ in 0..num_states + extra {
        graph.add_node(());
    }
    for ((from, to), cost) in cheapest {
        graph.add_edge(NodeIndex::new(from), NodeIndex::new(to), cost);
    }
    if reversed {
        let virtual_goal = NodeIndex::new(num_states);
        for (state, &goal) in ts.goal_states().iter().enumerate() {
            if goal {
                graph.add_edge(virtual_goal, NodeIndex::new(state), 0);
            }
        }
    }
    graph
}
