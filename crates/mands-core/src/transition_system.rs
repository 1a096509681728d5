// Rust guideline compliant 2026-02-06

//! Abstract transition systems over label groups.
//!
//! Labels that induce exactly the same transitions are kept together in one
//! [`LabelGroup`]. Every mutating operation leaves the system normalized:
//! transitions of each group sorted and duplicate-free, no two groups with
//! identical transitions, every active label in exactly one group.

use crate::types::{AbstractionMapping, LabelMapping, StateEquivalenceRelation};
use crate::{Error, Labels, Result};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info};

/// A transition between two abstract states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Transition {
    /// Source state.
    pub src: usize,
    /// Target state.
    pub target: usize,
}

impl Transition {
    /// Creates a new transition.
    pub fn new(src: usize, target: usize) -> Self {
        Self { src, target }
    }

    /// Whether source and target coincide.
    pub fn is_self_loop(&self) -> bool {
        self.src == self.target
    }
}

/// Locally equivalent labels and the transitions they share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelGroup {
    labels: Vec<usize>,
    transitions: Vec<Transition>,
    cost: u32,
}

impl LabelGroup {
    /// Labels of the group in increasing order.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Sorted, duplicate-free transitions.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Minimum cost over the labels of the group.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    fn recompute_cost(&mut self, labels: &Labels) {
        self.cost = self
            .labels
            .iter()
            .map(|&label| labels.get_label_cost(label))
            .min()
            .unwrap_or(u32::MAX);
    }
}

/// An abstract transition system (one factor of the factored system).
#[derive(Debug, Clone)]
pub struct TransitionSystem {
    /// Task variables whose product this system abstracts.
    incorporated_variables: Vec<usize>,
    num_states: usize,
    groups: Vec<LabelGroup>,
    /// Group of every label ever created; `None` for inactive labels.
    label_to_group: Vec<Option<usize>>,
    goal_states: Vec<bool>,
    /// `None` once the initial state has been pruned.
    init_state: Option<usize>,
}

impl TransitionSystem {
    /// Creates a normalized transition system.
    ///
    /// # Arguments
    ///
    /// * `incorporated_variables` - Task variables covered by the system
    /// * `num_states` - Number of abstract states
    /// * `label_transitions` - Transitions of every label, indexed by label
    ///   number; inactive labels are ignored
    /// * `labels` - The shared label set
    /// * `goal_states` - Goal flag per state
    /// * `init_state` - Initial state, if any
    ///
    /// # Panics
    ///
    /// Panics if `goal_states` does not have `num_states` entries.
    pub fn new(
        incorporated_variables: Vec<usize>,
        num_states: usize,
        label_transitions: Vec<Vec<Transition>>,
        labels: &Labels,
        goal_states: Vec<bool>,
        init_state: Option<usize>,
    ) -> Self {
        assert_eq!(goal_states.len(), num_states);
        let groups = label_transitions
            .into_iter()
            .enumerate()
            .filter(|(label, _)| labels.is_active(*label))
            .map(|(label, transitions)| LabelGroup {
                labels: vec![label],
                transitions,
                cost: labels.get_label_cost(label),
            })
            .collect();
        let mut ts = Self {
            incorporated_variables,
            num_states,
            groups,
            label_to_group: vec![None; labels.get_size()],
            goal_states,
            init_state,
        };
        ts.normalize();
        ts
    }

    /// Sorts and deduplicates transitions, merges groups with identical
    /// transitions, drops groups without labels and rebuilds the label index.
    fn normalize(&mut self) {
        let mut canonical: Vec<LabelGroup> = Vec::with_capacity(self.groups.len());
        let mut by_transitions: HashMap<Vec<Transition>, usize> = HashMap::new();
        for mut group in std::mem::take(&mut self.groups) {
            if group.labels.is_empty() {
                continue;
            }
            group.transitions.sort_unstable();
            group.transitions.dedup();
            match by_transitions.get(&group.transitions) {
                Some(&id) => {
                    let target = &mut canonical[id];
                    target.labels.extend(group.labels);
                    target.cost = target.cost.min(group.cost);
                }
                None => {
                    by_transitions.insert(group.transitions.clone(), canonical.len());
                    canonical.push(group);
                }
            }
        }

        self.label_to_group.iter_mut().for_each(|slot| *slot = None);
        for (id, group) in canonical.iter_mut().enumerate() {
            group.labels.sort_unstable();
            for &label in &group.labels {
                self.label_to_group[label] = Some(id);
            }
        }
        self.groups = canonical;
    }

    /// Applies an abstraction to the states of the system.
    ///
    /// # Arguments
    ///
    /// * `relation` - The classes of the abstraction, in new-state order
    /// * `mapping` - Old state to new state, `None` for pruned states
    /// * `silent` - Suppress log output
    ///
    /// # Returns
    ///
    /// True if the number of states strictly decreased. A relation with one
    /// class per state leaves the system untouched.
    ///
    /// # Panics
    ///
    /// Panics if the relation has an empty class, has more classes than
    /// there are states, or the mapping does not cover every state.
    pub fn apply_abstraction(
        &mut self,
        relation: &StateEquivalenceRelation,
        mapping: &AbstractionMapping,
        silent: bool,
    ) -> bool {
        assert_eq!(mapping.len(), self.num_states);
        assert!(
            relation.iter().all(|class| !class.is_empty()),
            "empty equivalence class"
        );
        let new_num_states = relation.len();
        assert!(new_num_states <= self.num_states);
        if new_num_states == self.num_states {
            if !silent {
                debug!("{}not applying abstraction (same number of states)", self.tag());
            }
            return false;
        }
        if !silent {
            info!(
                "{}applying abstraction ({} to {} states)",
                self.tag(),
                self.num_states,
                new_num_states
            );
        }

        for group in &mut self.groups {
            group.transitions = group
                .transitions
                .iter()
                .filter_map(|t| match (mapping[t.src], mapping[t.target]) {
                    (Some(src), Some(target)) => Some(Transition::new(src, target)),
                    _ => None,
                })
                .collect();
        }

        let mut goal_states = vec![false; new_num_states];
        for (state, new_state) in mapping.iter().enumerate() {
            if let Some(new_state) = *new_state {
                if self.goal_states[state] {
                    goal_states[new_state] = true;
                }
            }
        }
        self.goal_states = goal_states;
        self.init_state = self.init_state.and_then(|init| mapping[init]);
        self.num_states = new_num_states;
        self.normalize();
        true
    }

    /// Applies label reduction to the system.
    ///
    /// # Arguments
    ///
    /// * `mapping` - `(new_label, old_labels)` pairs already applied to `labels`
    /// * `labels` - The shared label set after the reduction
    /// * `only_equivalent_labels` - Whether every reduced label set is known
    ///   to lie in a single group of this system (true for every system but
    ///   the one the reduction was computed for)
    ///
    /// # Panics
    ///
    /// Panics if `only_equivalent_labels` is set but old labels are spread
    /// over several groups.
    pub fn apply_label_reduction(
        &mut self,
        mapping: &LabelMapping,
        labels: &Labels,
        only_equivalent_labels: bool,
    ) {
        if self.label_to_group.len() < labels.get_size() {
            self.label_to_group.resize(labels.get_size(), None);
        }

        if only_equivalent_labels {
            for (new_label, old_labels) in mapping {
                let group_id = self.label_to_group[old_labels[0]]
                    .unwrap_or_else(|| panic!("label {} has no group", old_labels[0]));
                for &old in old_labels {
                    assert_eq!(
                        self.label_to_group[old],
                        Some(group_id),
                        "reduced labels must be locally equivalent"
                    );
                    self.label_to_group[old] = None;
                }
                let group = &mut self.groups[group_id];
                group.labels.retain(|label| !old_labels.contains(label));
                group.labels.push(*new_label);
                group.labels.sort_unstable();
                group.recompute_cost(labels);
                self.label_to_group[*new_label] = Some(group_id);
            }
            return;
        }

        for (new_label, old_labels) in mapping {
            let old_groups: BTreeSet<usize> = old_labels
                .iter()
                .map(|&old| {
                    self.label_to_group[old]
                        .unwrap_or_else(|| panic!("label {} has no group", old))
                })
                .collect();
            let mut transitions = Vec::new();
            for &group_id in &old_groups {
                transitions.extend_from_slice(&self.groups[group_id].transitions);
                self.groups[group_id]
                    .labels
                    .retain(|label| !old_labels.contains(label));
                self.groups[group_id].recompute_cost(labels);
            }
            for &old in old_labels {
                self.label_to_group[old] = None;
            }
            self.groups.push(LabelGroup {
                labels: vec![*new_label],
                transitions,
                cost: labels.get_label_cost(*new_label),
            });
            self.label_to_group[*new_label] = Some(self.groups.len() - 1);
        }
        self.normalize();
    }

    /// Builds the synchronized product of two transition systems.
    ///
    /// Product state `(s1, s2)` gets index `s1 * |ts2| + s2`. A label has a
    /// transition `(s1, s2) -> (t1, t2)` iff it has `s1 -> t1` in `ts1` and
    /// `s2 -> t2` in `ts2`.
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfMemory` if the product state space cannot be
    /// allocated.
    pub fn merge(
        labels: &Labels,
        ts1: &TransitionSystem,
        ts2: &TransitionSystem,
        silent: bool,
    ) -> Result<TransitionSystem> {
        if !silent {
            info!("Merging {} and {}", ts1.description(), ts2.description());
        }
        let size1 = ts1.num_states;
        let size2 = ts2.num_states;
        let product_size = size1
            .checked_mul(size2)
            .ok_or(Error::OutOfMemory { requested: usize::MAX })?;

        let mut goal_states = Vec::new();
        goal_states
            .try_reserve_exact(product_size)
            .map_err(|_| Error::OutOfMemory {
                requested: product_size,
            })?;
        for s1 in 0..size1 {
            for s2 in 0..size2 {
                goal_states.push(ts1.goal_states[s1] && ts2.goal_states[s2]);
            }
        }
        let init_state = match (ts1.init_state, ts2.init_state) {
            (Some(init1), Some(init2)) => Some(init1 * size2 + init2),
            _ => None,
        };

        let mut groups = Vec::new();
        for group1 in &ts1.groups {
            // Split the labels of group1 by their group in ts2.
            let mut blocks: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
            for &label in &group1.labels {
                let group2 = ts2
                    .group_id_of_label(label)
                    .unwrap_or_else(|| panic!("active label {} missing in {}", label, ts2.tag()));
                blocks.entry(group2).or_default().push(label);
            }
            for (group2, block_labels) in blocks {
                let transitions2 = &ts2.groups[group2].transitions;
                let mut transitions =
                    Vec::with_capacity(group1.transitions.len() * transitions2.len());
                for t1 in &group1.transitions {
                    for t2 in transitions2 {
                        transitions.push(Transition::new(
                            t1.src * size2 + t2.src,
                            t1.target * size2 + t2.target,
                        ));
                    }
                }
                let mut group = LabelGroup {
                    labels: block_labels,
                    transitions,
                    cost: u32::MAX,
                };
                group.recompute_cost(labels);
                groups.push(group);
            }
        }

        let mut incorporated_variables = ts1.incorporated_variables.clone();
        incorporated_variables.extend_from_slice(&ts2.incorporated_variables);
        incorporated_variables.sort_unstable();

        let mut product = TransitionSystem {
            incorporated_variables,
            num_states: product_size,
            groups,
            label_to_group: vec![None; labels.get_size()],
            goal_states,
            init_state,
        };
        product.normalize();
        Ok(product)
    }

    /// Number of abstract states.
    pub fn get_size(&self) -> usize {
        self.num_states
    }

    /// Initial state, `None` if it has been pruned.
    pub fn get_init_state(&self) -> Option<usize> {
        self.init_state
    }

    /// Whether `state` is a goal state.
    pub fn is_goal_state(&self, state: usize) -> bool {
        self.goal_states[state]
    }

    /// Goal flag per state.
    pub fn goal_states(&self) -> &[bool] {
        &self.goal_states
    }

    /// A system is solvable as long as its initial state survives pruning.
    pub fn is_solvable(&self) -> bool {
        self.init_state.is_some()
    }

    /// Whether some state is not a goal state, i.e. the system constrains
    /// the goal.
    pub fn is_goal_relevant(&self) -> bool {
        self.goal_states.iter().any(|&goal| !goal)
    }

    /// Label groups of the system.
    pub fn label_groups(&self) -> &[LabelGroup] {
        &self.groups
    }

    /// Group containing `label`, if the label is active.
    pub fn group_of_label(&self, label: usize) -> Option<&LabelGroup> {
        self.label_to_group
            .get(label)
            .copied()
            .flatten()
            .map(|id| &self.groups[id])
    }

    /// Index of the group containing `label`, if the label is active.
    pub fn group_id_of_label(&self, label: usize) -> Option<usize> {
        self.label_to_group.get(label).copied().flatten()
    }

    /// Transitions induced by `label` (empty for inactive labels).
    pub fn transitions_of_label(&self, label: usize) -> &[Transition] {
        self.group_of_label(label)
            .map(|group| group.transitions())
            .unwrap_or(&[])
    }

    /// Total number of transitions over all groups.
    pub fn num_transitions(&self) -> usize {
        self.groups.iter().map(|group| group.transitions.len()).sum()
    }

    /// Checks that every group's transitions are sorted and duplicate-free.
    pub fn are_transitions_sorted_unique(&self) -> bool {
        self.groups
            .iter()
            .all(|group| group.transitions.windows(2).all(|pair| pair[0] < pair[1]))
    }

    /// Task variables incorporated into this system.
    pub fn incorporated_variables(&self) -> &[usize] {
        &self.incorporated_variables
    }

    /// Short description of the incorporated variables.
    pub fn description(&self) -> String {
        if self.incorporated_variables.len() == 1 {
            format!("atomic transition system #{}", self.incorporated_variables[0])
        } else {
            format!("transition system {:?}", self.incorporated_variables)
        }
    }

    /// Prefix for log lines about this system.
    pub fn tag(&self) -> String {
        let description = self.description();
        let mut chars = description.chars();
        match chars.next() {
            Some(first) => format!("{}{}: ", first.to_uppercase(), chars.as_str()),
            None => String::new(),
        }
    }

    /// Logs size statistics.
    pub fn statistics(&self) {
        info!(
            "{}{} states, {} arcs, {} label groups",
            self.tag(),
            self.num_states,
            self.num_transitions(),
            self.groups.len()
        );
    }
}
