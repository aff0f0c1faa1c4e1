//! Execution fragments.

use crate::system::{Element, TransitionSystem};

/// An alternating sequence `s0 a1 s1 a2 s2 ...` that starts and ends with a
/// state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlternatingSequence<S, A> {
    head: S,
    steps: Vec<(A, S)>,
}

impl<S, A> AlternatingSequence<S, A> {
    pub fn new(head: S) -> Self {
        Self {
            head,
            steps: Vec::new(),
        }
    }

    /// Append an `(action, state)` step.
    pub fn then(mut self, action: A, state: S) -> Self {
        self.steps.push((action, state));
        self
    }

    pub fn push(&mut self, action: A, state: S) {
        self.steps.push((action, state));
    }

    pub fn head(&self) -> &S {
        &self.head
    }

    pub fn last(&self) -> &S {
        self.steps.last().map(|(_, s)| s).unwrap_or(&self.head)
    }

    pub fn steps(&self) -> &[(A, S)] {
        &self.steps
    }

    /// Number of actions in the sequence.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Consecutive `(from, action, to)` triples.
    pub fn triples(&self) -> impl Iterator<Item = (&S, &A, &S)> + '_ {
        let sources = std::iter::once(&self.head).chain(self.steps.iter().map(|(_, s)| s));
        sources
            .zip(self.steps.iter())
            .map(|(from, (action, to))| (from, action, to))
    }
}

impl<S: Element, A: Element, P: Element> TransitionSystem<S, A, P> {
    /// Every consecutive triple is a transition of this system. A sequence
    /// mentioning a state outside the system is not a fragment.
    pub fn is_execution_fragment(&self, seq: &AlternatingSequence<S, A>) -> bool {
        self.contains_state(seq.head())
            && seq
                .triples()
                .all(|(from, action, to)| self.has_transition(from, action, to))
    }

    pub fn is_initial_execution_fragment(&self, seq: &AlternatingSequence<S, A>) -> bool {
        self.is_execution_fragment(seq) && self.is_initial(seq.head())
    }

    /// A fragment whose last state is terminal.
    pub fn is_maximal_execution_fragment(&self, seq: &AlternatingSequence<S, A>) -> bool {
        // a fragment's states all belong to the system, so the lookup succeeds
        self.is_execution_fragment(seq) && matches!(self.is_terminal(seq.last()), Ok(true))
    }

    /// Initial and maximal.
    pub fn is_execution(&self, seq: &AlternatingSequence<S, A>) -> bool {
        self.is_initial_execution_fragment(seq) && self.is_maximal_execution_fragment(seq)
    }
}
