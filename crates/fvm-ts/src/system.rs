//! Labeled transition system container.

use indexmap::{IndexMap, IndexSet};
use std::fmt::Debug;
use std::hash::Hash;
use thiserror::Error;

/// Insertion-ordered set. Iteration order is reproducible across runs.
pub type Set<T> = IndexSet<T, ahash::RandomState>;

/// Insertion-ordered map.
pub type Map<K, V> = IndexMap<K, V, ahash::RandomState>;

/// Anything usable as a state, action or atomic proposition.
pub trait Element: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> Element for T {}

/// Transition system error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TsError {
    #[error("state not found: {state}")]
    StateNotFound { state: String },

    #[error("action not found: {action}")]
    ActionNotFound { action: String },

    #[error("atomic proposition not found: {proposition}")]
    PropositionNotFound { proposition: String },

    #[error("state {state} is used by a transition")]
    StateInUse { state: String },

    #[error("action {action} is used by a transition")]
    ActionInUse { action: String },

    #[error("atomic proposition {proposition} is used by a label")]
    PropositionInUse { proposition: String },

    #[error("{0} is not supported")]
    Unsupported(&'static str),
}

pub type TsResult<T> = Result<T, TsError>;

pub(crate) fn state_not_found<S: Debug>(state: &S) -> TsError {
    TsError::StateNotFound {
        state: format!("{:?}", state),
    }
}

/// A single transition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transition<S, A> {
    pub from: S,
    pub action: A,
    pub to: S,
}

impl<S, A> Transition<S, A> {
    pub fn new(from: S, action: A, to: S) -> Self {
        Self { from, action, to }
    }
}

/// Per-state adjacency and label.
#[derive(Debug, Clone)]
struct StateEntry<S, A, P> {
    /// (action, target)
    outgoing: Set<(A, S)>,
    /// (action, source)
    incoming: Set<(A, S)>,
    label: Set<P>,
}

impl<S, A, P> Default for StateEntry<S, A, P> {
    fn default() -> Self {
        Self {
            outgoing: Set::default(),
            incoming: Set::default(),
            label: Set::default(),
        }
    }
}

/// A labeled transition system over states `S`, actions `A` and atomic
/// propositions `P`.
///
/// Transitions and labels only ever mention states of the system. Actions
/// and propositions are registered as soon as a transition or label uses
/// them.
#[derive(Debug, Clone)]
pub struct TransitionSystem<S, A, P> {
    name: String,
    states: Map<S, StateEntry<S, A, P>>,
    initial: Set<S>,
    actions: Set<A>,
    propositions: Set<P>,
    transition_count: usize,
}

impl<S: Element, A: Element, P: Element> Default for TransitionSystem<S, A, P> {
    fn default() -> Self {
        Self::new("")
    }
}

impl<S: Element, A: Element, P: Element> TransitionSystem<S, A, P> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            states: Map::default(),
            initial: Set::default(),
            actions: Set::default(),
            propositions: Set::default(),
            transition_count: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    // === Mutation ===

    /// Add a state. Returns false if it was already present.
    pub fn add_state(&mut self, state: S) -> bool {
        if self.states.contains_key(&state) {
            return false;
        }
        self.states.insert(state, StateEntry::default());
        true
    }

    /// Add a state (if new) and mark it initial.
    pub fn add_initial_state(&mut self, state: S) {
        self.add_state(state.clone());
        self.initial.insert(state);
    }

    /// Mark or unmark an existing state as initial.
    pub fn set_initial(&mut self, state: &S, initial: bool) -> TsResult<()> {
        self.require_state(state)?;
        if initial {
            self.initial.insert(state.clone());
        } else {
            self.initial.shift_remove(state);
        }
        Ok(())
    }

    pub fn add_action(&mut self, action: A) -> bool {
        self.actions.insert(action)
    }

    pub fn add_atomic_proposition(&mut self, proposition: P) -> bool {
        self.propositions.insert(proposition)
    }

    /// Add a transition between two existing states. Returns false if the
    /// transition was already present.
    pub fn add_transition(&mut self, from: S, action: A, to: S) -> TsResult<bool> {
        self.require_state(&from)?;
        self.require_state(&to)?;
        self.actions.insert(action.clone());

        let added = match self.states.get_mut(&from) {
            Some(entry) => entry.outgoing.insert((action.clone(), to.clone())),
            None => return Err(state_not_found(&from)),
        };
        if !added {
            return Ok(false);
        }
        if let Some(entry) = self.states.get_mut(&to) {
            entry.incoming.insert((action, from));
        }
        self.transition_count += 1;
        Ok(true)
    }

    /// Remove a transition. Returns false if it was not present.
    pub fn remove_transition(&mut self, from: &S, action: &A, to: &S) -> bool {
        let key = (action.clone(), to.clone());
        let removed = self
            .states
            .get_mut(from)
            .map(|entry| entry.outgoing.shift_remove(&key))
            .unwrap_or(false);
        if !removed {
            return false;
        }
        if let Some(entry) = self.states.get_mut(to) {
            entry.incoming.shift_remove(&(action.clone(), from.clone()));
        }
        self.transition_count -= 1;
        true
    }

    /// Add an atomic proposition to the label of an existing state.
    pub fn add_to_label(&mut self, state: &S, proposition: P) -> TsResult<()> {
        let entry = self
            .states
            .get_mut(state)
            .ok_or_else(|| state_not_found(state))?;
        entry.label.insert(proposition.clone());
        self.propositions.insert(proposition);
        Ok(())
    }

    pub fn remove_label(&mut self, state: &S, proposition: &P) -> TsResult<bool> {
        let entry = self
            .states
            .get_mut(state)
            .ok_or_else(|| state_not_found(state))?;
        Ok(entry.label.shift_remove(proposition))
    }

    /// Remove a state that no transition mentions. Its label goes with it.
    pub fn remove_state(&mut self, state: &S) -> TsResult<()> {
        let entry = self.states.get(state).ok_or_else(|| state_not_found(state))?;
        if !entry.outgoing.is_empty() || !entry.incoming.is_empty() {
            return Err(TsError::StateInUse {
                state: format!("{:?}", state),
            });
        }
        self.states.shift_remove(state);
        self.initial.shift_remove(state);
        Ok(())
    }

    pub fn remove_action(&mut self, action: &A) -> TsResult<()> {
        if !self.actions.contains(action) {
            return Err(TsError::ActionNotFound {
                action: format!("{:?}", action),
            });
        }
        let in_use = self
            .states
            .values()
            .any(|entry| entry.outgoing.iter().any(|(a, _)| a == action));
        if in_use {
            return Err(TsError::ActionInUse {
                action: format!("{:?}", action),
            });
        }
        self.actions.shift_remove(action);
        Ok(())
    }

    pub fn remove_atomic_proposition(&mut self, proposition: &P) -> TsResult<()> {
        if !self.propositions.contains(proposition) {
            return Err(TsError::PropositionNotFound {
                proposition: format!("{:?}", proposition),
            });
        }
        if self.states.values().any(|entry| entry.label.contains(proposition)) {
            return Err(TsError::PropositionInUse {
                proposition: format!("{:?}", proposition),
            });
        }
        self.propositions.shift_remove(proposition);
        Ok(())
    }

    /// Remove a state together with every transition touching it.
    pub(crate) fn purge_state(&mut self, state: &S) {
        let Some(entry) = self.states.shift_remove(state) else {
            return;
        };
        self.initial.shift_remove(state);
        for (action, to) in &entry.outgoing {
            if let Some(target) = self.states.get_mut(to) {
                target.incoming.shift_remove(&(action.clone(), state.clone()));
            }
        }
        for (action, from) in &entry.incoming {
            if let Some(source) = self.states.get_mut(from) {
                source.outgoing.shift_remove(&(action.clone(), state.clone()));
            }
        }
        // Self-loops appear in both sets but are one transition
        let self_loops = entry.outgoing.iter().filter(|(_, to)| to == state).count();
        self.transition_count -= entry.outgoing.len() + entry.incoming.len() - self_loops;
    }

    // === Queries ===

    pub fn contains_state(&self, state: &S) -> bool {
        self.states.contains_key(state)
    }

    pub fn is_initial(&self, state: &S) -> bool {
        self.initial.contains(state)
    }

    pub fn states(&self) -> impl Iterator<Item = &S> + '_ {
        self.states.keys()
    }

    pub fn initial_states(&self) -> &Set<S> {
        &self.initial
    }

    pub fn actions(&self) -> &Set<A> {
        &self.actions
    }

    pub fn atomic_propositions(&self) -> &Set<P> {
        &self.propositions
    }

    /// Label of a state.
    pub fn label(&self, state: &S) -> TsResult<&Set<P>> {
        self.states
            .get(state)
            .map(|entry| &entry.label)
            .ok_or_else(|| state_not_found(state))
    }

    /// Outgoing `(action, target)` pairs of a state.
    pub fn successors(&self, state: &S) -> TsResult<&Set<(A, S)>> {
        self.states
            .get(state)
            .map(|entry| &entry.outgoing)
            .ok_or_else(|| state_not_found(state))
    }

    /// Incoming `(action, source)` pairs of a state.
    pub fn predecessors(&self, state: &S) -> TsResult<&Set<(A, S)>> {
        self.states
            .get(state)
            .map(|entry| &entry.incoming)
            .ok_or_else(|| state_not_found(state))
    }

    pub fn has_transition(&self, from: &S, action: &A, to: &S) -> bool {
        self.states
            .get(from)
            .map(|entry| entry.outgoing.contains(&(action.clone(), to.clone())))
            .unwrap_or(false)
    }

    /// All transitions, grouped by source state in insertion order.
    pub fn transitions(&self) -> impl Iterator<Item = Transition<S, A>> + '_ {
        self.states.iter().flat_map(|(from, entry)| {
            entry
                .outgoing
                .iter()
                .map(move |(action, to)| Transition::new(from.clone(), action.clone(), to.clone()))
        })
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn transition_count(&self) -> usize {
        self.transition_count
    }

    pub(crate) fn require_state(&self, state: &S) -> TsResult<()> {
        if self.states.contains_key(state) {
            Ok(())
        } else {
            Err(state_not_found(state))
        }
    }
}
