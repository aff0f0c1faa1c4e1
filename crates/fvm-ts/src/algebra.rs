//! Post/pre images, reachability and determinism.
//!
//! Every query validates the states it is given before computing anything:
//! a state outside the system is an error, never an empty answer.

use crate::system::{Element, Set, TransitionSystem, TsResult};
use std::collections::VecDeque;
use tracing::debug;

impl<S: Element, A: Element, P: Element> TransitionSystem<S, A, P> {
    /// Direct successors of `state`.
    pub fn post(&self, state: &S) -> TsResult<Set<S>> {
        Ok(self.successors(state)?.iter().map(|(_, to)| to.clone()).collect())
    }

    /// Successors of `state` via `action`.
    pub fn post_action(&self, state: &S, action: &A) -> TsResult<Set<S>> {
        Ok(self
            .successors(state)?
            .iter()
            .filter(|(a, _)| a == action)
            .map(|(_, to)| to.clone())
            .collect())
    }

    /// Union of [`post`](Self::post) over `states`.
    pub fn post_set<'a>(&self, states: impl IntoIterator<Item = &'a S>) -> TsResult<Set<S>>
    where
        S: 'a,
    {
        let mut out = Set::default();
        for state in states {
            out.extend(self.successors(state)?.iter().map(|(_, to)| to.clone()));
        }
        Ok(out)
    }

    /// Union of [`post_action`](Self::post_action) over `states`.
    pub fn post_set_action<'a>(
        &self,
        states: impl IntoIterator<Item = &'a S>,
        action: &A,
    ) -> TsResult<Set<S>>
    where
        S: 'a,
    {
        let mut out = Set::default();
        for state in states {
            out.extend(self.post_action(state, action)?);
        }
        Ok(out)
    }

    /// Direct predecessors of `state`.
    pub fn pre(&self, state: &S) -> TsResult<Set<S>> {
        Ok(self
            .predecessors(state)?
            .iter()
            .map(|(_, from)| from.clone())
            .collect())
    }

    /// Predecessors of `state` via `action`.
    pub fn pre_action(&self, state: &S, action: &A) -> TsResult<Set<S>> {
        Ok(self
            .predecessors(state)?
            .iter()
            .filter(|(a, _)| a == action)
            .map(|(_, from)| from.clone())
            .collect())
    }

    pub fn pre_set<'a>(&self, states: impl IntoIterator<Item = &'a S>) -> TsResult<Set<S>>
    where
        S: 'a,
    {
        let mut out = Set::default();
        for state in states {
            out.extend(self.pre(state)?);
        }
        Ok(out)
    }

    pub fn pre_set_action<'a>(
        &self,
        states: impl IntoIterator<Item = &'a S>,
        action: &A,
    ) -> TsResult<Set<S>>
    where
        S: 'a,
    {
        let mut out = Set::default();
        for state in states {
            out.extend(self.pre_action(state, action)?);
        }
        Ok(out)
    }

    /// A state is terminal when it has no successors.
    pub fn is_terminal(&self, state: &S) -> TsResult<bool> {
        Ok(self.successors(state)?.is_empty())
    }

    /// All states reachable from an initial state, in breadth-first order.
    pub fn reach(&self) -> Set<S> {
        let mut visited: Set<S> = Set::default();
        let mut queue: VecDeque<&S> = VecDeque::new();

        for state in self.initial_states() {
            if visited.insert(state.clone()) {
                queue.push_back(state);
            }
        }

        while let Some(state) = queue.pop_front() {
            let Ok(successors) = self.successors(state) else {
                continue;
            };
            for (_, to) in successors {
                if visited.insert(to.clone()) {
                    queue.push_back(to);
                }
            }
        }
        visited
    }

    /// At most one initial state, and no `(state, action)` with two
    /// distinct targets.
    pub fn is_action_deterministic(&self) -> bool {
        if self.initial_states().len() > 1 {
            return false;
        }
        self.states().all(|state| {
            let Ok(successors) = self.successors(state) else {
                return true;
            };
            let mut seen: Set<&A> = Set::default();
            // Outgoing pairs are unique, so a repeated action means two targets
            successors.iter().all(|(action, _)| seen.insert(action))
        })
    }

    /// At most one initial state, and no state with two distinct
    /// successors carrying the same label.
    pub fn is_ap_deterministic(&self) -> bool {
        if self.initial_states().len() > 1 {
            return false;
        }
        self.states().all(|state| {
            let Ok(post) = self.post(state) else {
                return true;
            };
            let labels: Vec<&Set<P>> = post.iter().filter_map(|s| self.label(s).ok()).collect();
            labels
                .iter()
                .enumerate()
                .all(|(i, a)| labels[i + 1..].iter().all(|b| a != b))
        })
    }

    /// The sub-system induced by `keep`: those states, the transitions
    /// between them, their labels and initial flags. Actions and atomic
    /// propositions are carried over unchanged.
    pub fn restrict_to<'a>(&self, keep: impl IntoIterator<Item = &'a S>) -> TsResult<Self>
    where
        S: 'a,
    {
        let mut sub = Self::new(self.name());
        for action in self.actions() {
            sub.add_action(action.clone());
        }
        for proposition in self.atomic_propositions() {
            sub.add_atomic_proposition(proposition.clone());
        }

        let keep: Vec<&S> = keep.into_iter().collect();
        for &state in &keep {
            self.require_state(state)?;
            sub.add_state(state.clone());
            if self.is_initial(state) {
                sub.add_initial_state(state.clone());
            }
            for proposition in self.label(state)? {
                sub.add_to_label(state, proposition.clone())?;
            }
        }
        for &state in &keep {
            for (action, to) in self.successors(state)? {
                if sub.contains_state(to) {
                    sub.add_transition(state.clone(), action.clone(), to.clone())?;
                }
            }
        }
        Ok(sub)
    }

    /// Drop every state not reachable from an initial state, along with the
    /// transitions leaving it. Returns the number of removed states.
    pub fn prune_unreachable(&mut self) -> usize {
        let reachable = self.reach();
        let unreachable: Vec<S> = self
            .states()
            .filter(|s| !reachable.contains(*s))
            .cloned()
            .collect();
        for state in &unreachable {
            self.purge_state(state);
        }
        debug!(
            removed = unreachable.len(),
            remaining = self.state_count(),
            "pruned unreachable states"
        );
        unreachable.len()
    }
}
