// Rust guideline compliant 2026-02-06

//! The factored transition system.
//!
//! An arena of component slots addressed by stable indices. A slot is either
//! active, holding a transition system together with its heuristic
//! representation and distances, or dead. Merging kills both inputs and
//! appends the product; indices are never handed out twice, except that
//! [`FactoredTransitionSystem::release_copies`] takes back the slots of
//! tentative copies.

use crate::representation::HeuristicRepresentation;
use crate::types::{LabelMapping, StateEquivalenceRelation, INF};
use crate::{Distances, Labels, Result, TransitionSystem};
use std::borrow::Cow;
use tracing::{info, warn};

/// One factor: transition system, representation and distances.
#[derive(Debug, Clone)]
pub struct Component {
    ts: TransitionSystem,
    representation: HeuristicRepresentation,
    distances: Distances,
}

impl Component {
    /// Bundles the three parts of a component.
    pub fn new(
        ts: TransitionSystem,
        representation: HeuristicRepresentation,
        distances: Distances,
    ) -> Self {
        Self {
            ts,
            representation,
            distances,
        }
    }

    /// The transition system.
    pub fn transition_system(&self) -> &TransitionSystem {
        &self.ts
    }

    /// The heuristic representation.
    pub fn representation(&self) -> &HeuristicRepresentation {
        &self.representation
    }

    /// The distances.
    pub fn distances(&self) -> &Distances {
        &self.distances
    }
}

#[derive(Debug, Clone)]
enum Slot {
    Active(Box<Component>),
    Dead,
}

/// What survives finalization: enough to evaluate states.
#[derive(Debug, Clone)]
struct FinalAbstraction {
    index: usize,
    representation: HeuristicRepresentation,
    distances: Distances,
}

/// Collection of components evolving under merging and shrinking.
#[derive(Debug)]
pub struct FactoredTransitionSystem {
    labels: Labels,
    slots: Vec<Slot>,
    final_abstraction: Option<FinalAbstraction>,
    solvable: bool,
    /// Arena size before the first outstanding copy.
    copy_watermark: Option<usize>,
    relative_pruning_per_iteration: Vec<f64>,
}

impl FactoredTransitionSystem {
    /// Creates the factored system and prunes every component.
    ///
    /// # Arguments
    ///
    /// * `labels` - The shared label set
    /// * `components` - Initial components, usually one per task variable
    /// * `finalize_if_unsolvable` - Finalize on the first unsolvable component
    pub fn new(labels: Labels, components: Vec<Component>, finalize_if_unsolvable: bool) -> Self {
        let mut fts = Self {
            labels,
            slots: components
                .into_iter()
                .map(|component| Slot::Active(Box::new(component)))
                .collect(),
            final_abstraction: None,
            solvable: true,
            copy_watermark: None,
            relative_pruning_per_iteration: Vec::new(),
        };
        for index in 0..fts.slots.len() {
            fts.compute_distances_and_prune(index, false);
            if finalize_if_unsolvable && !fts.get_ts(index).is_solvable() {
                info!("{}unsolvable", fts.get_ts(index).tag());
                fts.finalize(Some(index));
                break;
            }
        }
        fts
    }

    fn component(&self, index: usize) -> &Component {
        match self.slots.get(index) {
            Some(Slot::Active(component)) => component,
            _ => panic!("component {} is not active", index),
        }
    }

    fn component_mut(&mut self, index: usize) -> &mut Component {
        match self.slots.get_mut(index) {
            Some(Slot::Active(component)) => component,
            _ => panic!("component {} is not active", index),
        }
    }

    fn take_component(&mut self, index: usize) -> Component {
        match std::mem::replace(&mut self.slots[index], Slot::Dead) {
            Slot::Active(component) => *component,
            Slot::Dead => panic!("component {} is not active", index),
        }
    }

    /// Prunes the flagged states of a component.
    ///
    /// Every kept state becomes its own class; flagged states are dropped.
    /// Unless `silent`, the fraction of removed states is recorded.
    ///
    /// # Panics
    ///
    /// Panics if the component is not active or the mask has the wrong size.
    pub fn discard_states(&mut self, index: usize, to_be_pruned: &[bool], silent: bool) {
        let num_states = self.get_ts(index).get_size();
        assert_eq!(to_be_pruned.len(), num_states);
        let relation: StateEquivalenceRelation = (0..num_states)
            .filter(|&state| !to_be_pruned[state])
            .map(|state| vec![state])
            .collect();
        self.apply_abstraction(index, &relation, silent);
        if !silent {
            let new_size = self.get_ts(index).get_size();
            let ratio = if num_states == 0 {
                0.0
            } else {
                1.0 - new_size as f64 / num_states as f64
            };
            self.relative_pruning_per_iteration.push(ratio);
        }
    }

    /// Recomputes distances of a component and prunes unreachable and
    /// irrelevant states.
    ///
    /// # Panics
    ///
    /// Panics if the component is not active.
    pub fn compute_distances_and_prune(&mut self, index: usize, silent: bool) {
        let component = self.component_mut(index);
        let to_be_pruned = component.distances.compute_distances(&component.ts, silent);
        self.discard_states(index, &to_be_pruned, silent);
        debug_assert!(self.is_component_valid(index));
    }

    /// Applies a state equivalence relation to a component.
    ///
    /// Non-empty classes are numbered in the order of the relation; states
    /// in no class are pruned. Pruning a state with finite distances may cut
    /// paths of other states, so distances are then recomputed and newly
    /// dead states pruned as well.
    ///
    /// # Returns
    ///
    /// True if the component actually shrank.
    ///
    /// # Panics
    ///
    /// Panics if the component is not active or a state occurs in two classes.
    pub fn apply_abstraction(
        &mut self,
        index: usize,
        relation: &StateEquivalenceRelation,
        silent: bool,
    ) -> bool {
        let relation: Cow<'_, StateEquivalenceRelation> = if relation.iter().any(Vec::is_empty) {
            Cow::Owned(
                relation
                    .iter()
                    .filter(|class| !class.is_empty())
                    .cloned()
                    .collect(),
            )
        } else {
            Cow::Borrowed(relation)
        };

        let Component {
            ts,
            representation,
            distances,
        } = self.component_mut(index);

        let mut mapping = vec![None; ts.get_size()];
        for (class_no, class) in relation.iter().enumerate() {
            for &state in class {
                assert!(mapping[state].is_none(), "state {} in two classes", state);
                mapping[state] = Some(class_no);
            }
        }
        let prunes_live_state = distances.are_distances_computed()
            && mapping.iter().enumerate().any(|(state, new_state)| {
                new_state.is_none()
                    && distances.get_init_distance(state) != INF
                    && distances.get_goal_distance(state) != INF
            });

        let shrunk = ts.apply_abstraction(&relation, &mapping, silent);
        if shrunk {
            let f_preserving = distances.apply_abstraction(&relation, ts, silent);
            if !silent && !f_preserving {
                warn!("{}simplification was not f-preserving!", ts.tag());
            }
            representation.apply_abstraction_to_lookup_table(&mapping);
            if prunes_live_state {
                self.compute_distances_and_prune(index, true);
            }
        }
        debug_assert!(self.is_component_valid(index));
        shrunk
    }

    /// Applies label reductions to the labels and every active component.
    ///
    /// # Arguments
    ///
    /// * `label_mapping` - `(new_label, old_labels)` pairs; new labels must be
    ///   numbered consecutively from the current label count
    /// * `combinable_index` - Component the reduction was computed for; only
    ///   there may reduced labels come from different label groups
    ///
    /// # Panics
    ///
    /// Panics if a new label number does not match the label count.
    pub fn apply_label_reduction(&mut self, label_mapping: &LabelMapping, combinable_index: usize) {
        for (new_label, old_labels) in label_mapping {
            assert_eq!(*new_label, self.labels.get_size());
            self.labels.reduce_labels(old_labels);
        }
        let labels = &self.labels;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if let Slot::Active(component) = slot {
                let only_equivalent_labels = index != combinable_index;
                component
                    .ts
                    .apply_label_reduction(label_mapping, labels, only_equivalent_labels);
                if !only_equivalent_labels {
                    // Merged groups may offer cheaper transitions.
                    component.distances.compute_distances(&component.ts, true);
                }
            }
        }
    }

    /// Merges two components into their synchronized product.
    ///
    /// # Arguments
    ///
    /// * `index1` - First component
    /// * `index2` - Second component
    /// * `invalidating_merge` - Kill both inputs (the regular case); otherwise
    ///   they stay active and the new node gets clones of their representations
    /// * `finalize_if_unsolvable` - Finalize on the product if it is unsolvable
    ///
    /// # Returns
    ///
    /// The index of the product component.
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfMemory` if the product cannot be allocated. The
    /// inputs are left untouched in that case.
    ///
    /// # Panics
    ///
    /// Panics if the indices are equal or a component is not active.
    pub fn merge(
        &mut self,
        index1: usize,
        index2: usize,
        invalidating_merge: bool,
        finalize_if_unsolvable: bool,
    ) -> Result<usize> {
        assert_ne!(index1, index2, "cannot merge a component with itself");
        let silent = !invalidating_merge || !finalize_if_unsolvable;
        let size1 = self.get_ts(index1).get_size();
        let size2 = self.get_ts(index2).get_size();
        let product = TransitionSystem::merge(
            &self.labels,
            self.get_ts(index1),
            self.get_ts(index2),
            silent,
        )?;
        let lookup_table = HeuristicRepresentation::product_table(size1, size2)?;

        let (left, right) = if invalidating_merge {
            let left = self.take_component(index1).representation;
            let right = self.take_component(index2).representation;
            (left, right)
        } else {
            (
                self.get_representation(index1).clone(),
                self.get_representation(index2).clone(),
            )
        };
        let representation = HeuristicRepresentation::Merge {
            left: Box::new(left),
            right: Box::new(right),
            lookup_table,
        };

        self.slots.push(Slot::Active(Box::new(Component::new(
            product,
            representation,
            Distances::new(),
        ))));
        let new_index = self.slots.len() - 1;
        self.compute_distances_and_prune(new_index, silent);
        if finalize_if_unsolvable && !self.get_ts(new_index).is_solvable() {
            info!("{}unsolvable", self.get_ts(new_index).tag());
            self.finalize(Some(new_index));
        }
        Ok(new_index)
    }

    /// Ends the construction.
    ///
    /// With `None` the single remaining active component becomes final. With
    /// `Some(index)` the given component is unsolvable: the system is marked
    /// unsolvable and everything except that component is discarded. In both
    /// cases all transition systems are dropped.
    ///
    /// # Panics
    ///
    /// Panics if already finalized, if `None` is given while more or less
    /// than one component is active, or if the given component is not active.
    pub fn finalize(&mut self, index: Option<usize>) {
        assert!(!self.is_finalized(), "already finalized");
        let final_index = match index {
            None => {
                assert!(self.solvable);
                let active = self.active_indices();
                assert_eq!(active.len(), 1, "exactly one component must remain");
                active[0]
            }
            Some(index) => {
                self.solvable = false;
                index
            }
        };
        let component = self.take_component(final_index);
        self.final_abstraction = Some(FinalAbstraction {
            index: final_index,
            representation: component.representation,
            distances: component.distances,
        });
        self.slots.iter_mut().for_each(|slot| *slot = Slot::Dead);
        self.copy_watermark = None;
    }

    /// Abstract goal distance of a concrete state.
    ///
    /// # Returns
    ///
    /// `None` if the state maps to a pruned abstract state (a dead end),
    /// otherwise its goal distance.
    ///
    /// # Panics
    ///
    /// Panics if the system has not been finalized.
    pub fn get_cost(&self, state: &[usize]) -> Option<u32> {
        let Some(final_abstraction) = &self.final_abstraction else {
            panic!("get_cost requires a finalized factored transition system");
        };
        let abstract_state = final_abstraction.representation.get_abstract_state(state)?;
        let cost = final_abstraction.distances.get_goal_distance(abstract_state);
        debug_assert_ne!(cost, INF);
        Some(cost)
    }

    /// Appends a deep copy of a component and returns its index.
    ///
    /// Copies are meant for tentative merges and must be discarded with
    /// [`release_copies`](Self::release_copies).
    ///
    /// # Panics
    ///
    /// Panics if the component is not active.
    pub fn copy(&mut self, index: usize) -> usize {
        let copy = self.component(index).clone();
        if self.copy_watermark.is_none() {
            self.copy_watermark = Some(self.slots.len());
        }
        self.slots.push(Slot::Active(Box::new(copy)));
        self.slots.len() - 1
    }

    /// Drops every slot appended since the first outstanding copy.
    ///
    /// # Panics
    ///
    /// Panics if there are no outstanding copies.
    pub fn release_copies(&mut self) {
        let Some(watermark) = self.copy_watermark.take() else {
            panic!("release_copies called without outstanding copies");
        };
        self.slots.truncate(watermark);
    }

    /// Discards a component without merging it.
    ///
    /// # Panics
    ///
    /// Panics if the component is not active.
    pub fn remove(&mut self, index: usize) {
        self.take_component(index);
    }

    /// Whether `index` has ever been handed out.
    pub fn is_index_valid(&self, index: usize) -> bool {
        index < self.slots.len()
    }

    /// Whether the slot holds a live component.
    pub fn is_active(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(Slot::Active(_)))
    }

    /// Whether the component has computed distances and normalized transitions.
    pub fn is_component_valid(&self, index: usize) -> bool {
        match self.slots.get(index) {
            Some(Slot::Active(component)) => {
                component.distances.are_distances_computed()
                    && component.ts.are_transitions_sorted_unique()
            }
            _ => false,
        }
    }

    /// Whether [`finalize`](Self::finalize) has been called.
    pub fn is_finalized(&self) -> bool {
        self.final_abstraction.is_some()
    }

    /// Whether no component has been found unsolvable.
    pub fn is_solvable(&self) -> bool {
        self.solvable
    }

    /// Index chosen by finalization.
    pub fn final_index(&self) -> Option<usize> {
        self.final_abstraction.as_ref().map(|fin| fin.index)
    }

    /// Distances kept after finalization.
    pub fn final_distances(&self) -> Option<&Distances> {
        self.final_abstraction.as_ref().map(|fin| &fin.distances)
    }

    /// Representation kept after finalization.
    pub fn final_representation(&self) -> Option<&HeuristicRepresentation> {
        self.final_abstraction.as_ref().map(|fin| &fin.representation)
    }

    /// The component at `index`, `None` if the slot is dead or out of range.
    pub fn get_component(&self, index: usize) -> Option<&Component> {
        match self.slots.get(index) {
            Some(Slot::Active(component)) => Some(component),
            _ => None,
        }
    }

    /// Transition system of an active component.
    ///
    /// # Panics
    ///
    /// Panics if the component is not active.
    pub fn get_ts(&self, index: usize) -> &TransitionSystem {
        &self.component(index).ts
    }

    /// Distances of an active component.
    ///
    /// # Panics
    ///
    /// Panics if the component is not active.
    pub fn get_dist(&self, index: usize) -> &Distances {
        &self.component(index).distances
    }

    /// Heuristic representation of an active component.
    ///
    /// # Panics
    ///
    /// Panics if the component is not active.
    pub fn get_representation(&self, index: usize) -> &HeuristicRepresentation {
        &self.component(index).representation
    }

    /// Number of slots ever allocated (live or dead).
    pub fn get_size(&self) -> usize {
        self.slots.len()
    }

    /// Indices of all active components in increasing order.
    pub fn active_indices(&self) -> Vec<usize> {
        (0..self.slots.len())
            .filter(|&index| self.is_active(index))
            .collect()
    }

    /// Number of active components.
    pub fn num_active(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Active(_)))
            .count()
    }

    /// The shared labels.
    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Number of active labels.
    pub fn get_num_labels(&self) -> usize {
        self.labels.compute_number_active_labels()
    }

    /// Goal distance of the initial state of a component (`INF` if pruned).
    ///
    /// # Panics
    ///
    /// Panics if the component is not active.
    pub fn get_init_state_goal_distance(&self, index: usize) -> u32 {
        let component = self.component(index);
        match component.ts.get_init_state() {
            Some(init) => component.distances.get_goal_distance(init),
            None => INF,
        }
    }

    /// Fraction of states removed by every non-silent pruning step.
    pub fn relative_pruning_per_iteration(&self) -> &[f64] {
        &self.relative_pruning_per_iteration
    }

    /// Logs size and distance statistics of a component.
    ///
    /// # Panics
    ///
    /// Panics if the component is not active.
    pub fn statistics(&self, index: usize) {
        let component = self.component(index);
        component.ts.statistics();
        let dist = &component.distances;
        if !dist.are_distances_computed() {
            info!("{}distances not computed", component.ts.tag());
        } else if component.ts.is_solvable() {
            info!(
                "{}init h={}, max f={}, max g={}, max h={}",
                component.ts.tag(),
                self.get_init_state_goal_distance(index),
                dist.get_max_f(),
                dist.get_max_g(),
                dist.get_max_h()
            );
        } else {
            info!("{}transition system is unsolvable", component.ts.tag());
        }
    }
}
