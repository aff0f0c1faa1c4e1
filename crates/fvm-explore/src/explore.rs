//! Breadth-first frontier shared by the program-graph and channel-system
//! constructors.
//!
//! The state set of the system under construction doubles as the seen set:
//! a state is labelled and enqueued exactly once, when first discovered.

use crate::config::ExploreConfig;
use crate::error::{ExploreError, ExploreResult};
use crate::state::Labeled;
use fvm_eval::{Evaluation, Semantics};
use fvm_ts::{Element, TransitionSystem};
use std::collections::VecDeque;
use std::sync::atomic::Ordering;
use tracing::{debug, info};

pub(crate) struct Frontier<'c, S> {
    ts: TransitionSystem<S, String, String>,
    queue: VecDeque<S>,
    config: &'c ExploreConfig,
    explored: usize,
}

impl<'c, S: Element + Labeled> Frontier<'c, S> {
    pub(crate) fn new(name: &str, config: &'c ExploreConfig) -> Self {
        Self {
            ts: TransitionSystem::new(name),
            queue: VecDeque::new(),
            config,
            explored: 0,
        }
    }

    /// Register an initial state; new states are labelled and enqueued.
    pub(crate) fn add_initial(&mut self, state: S) -> ExploreResult<()> {
        if !self.ts.contains_state(&state) {
            self.admit(state.clone())?;
        }
        self.ts.add_initial_state(state);
        Ok(())
    }

    /// Record `from --action--> to`, admitting `to` if it is new.
    pub(crate) fn discover(&mut self, from: &S, action: String, to: S) -> ExploreResult<()> {
        if !self.ts.contains_state(&to) {
            self.admit(to.clone())?;
        }
        self.ts.add_transition(from.clone(), action, to)?;
        Ok(())
    }

    fn admit(&mut self, state: S) -> ExploreResult<()> {
        self.ts.add_state(state.clone());
        for label in state.labels() {
            self.ts.add_to_label(&state, label)?;
        }
        self.queue.push_back(state);
        Ok(())
    }

    /// Next state to expand, if any remain.
    pub(crate) fn pop(&mut self) -> Option<S> {
        let state = self.queue.pop_front()?;
        self.explored += 1;

        if let Some(ref p) = self.config.progress {
            p.explored.fetch_add(1, Ordering::Relaxed);
            p.states.store(self.ts.state_count(), Ordering::Relaxed);
            p.transitions.store(self.ts.transition_count(), Ordering::Relaxed);
            p.queue_len.store(self.queue.len(), Ordering::Relaxed);
        }

        let interval = self.config.progress_interval;
        if interval > 0 && self.explored % interval == 0 {
            debug!(
                explored = self.explored,
                states = self.ts.state_count(),
                transitions = self.ts.transition_count(),
                queue = self.queue.len(),
                "exploration progress"
            );
        }
        Some(state)
    }

    pub(crate) fn initial_count(&self) -> usize {
        self.ts.initial_states().len()
    }

    pub(crate) fn finish(self) -> TransitionSystem<S, String, String> {
        if let Some(ref p) = self.config.progress {
            p.states.store(self.ts.state_count(), Ordering::Relaxed);
            p.transitions.store(self.ts.transition_count(), Ordering::Relaxed);
            p.queue_len.store(0, Ordering::Relaxed);
        }
        info!(
            name = self.ts.name(),
            states = self.ts.state_count(),
            transitions = self.ts.transition_count(),
            "construction complete"
        );
        self.ts
    }
}

/// Run an initialization alternative statement by statement from `base`.
pub(crate) fn initialize(
    semantics: &Semantics,
    base: &Evaluation,
    statements: &[String],
) -> ExploreResult<Evaluation> {
    let mut eval = base.clone();
    for statement in statements {
        eval = semantics
            .effect(&eval, statement)
            .map_err(|source| ExploreError::Initialization {
                statement: statement.clone(),
                source,
            })?;
    }
    Ok(eval)
}
