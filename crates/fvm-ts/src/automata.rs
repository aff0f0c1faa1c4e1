//! Büchi automata, LTL formulas and the operations over them that this
//! library does not provide.
//!
//! The types are complete enough to build inputs; the operations always
//! fail with [`TsError::Unsupported`].

use crate::system::{Element, Map, Set, TransitionSystem, TsError, TsResult};
use std::collections::BTreeSet;

/// A letter: the set of atomic propositions that hold.
pub type Letter<L> = BTreeSet<L>;

/// Nondeterministic automaton over letters of `L` with one accepting set.
#[derive(Debug, Clone)]
pub struct Automaton<Q, L: Ord> {
    initial: Set<Q>,
    accepting: Set<Q>,
    transitions: Map<Q, Map<Letter<L>, Set<Q>>>,
}

impl<Q: Element, L: Element + Ord> Default for Automaton<Q, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Q: Element, L: Element + Ord> Automaton<Q, L> {
    pub fn new() -> Self {
        Self {
            initial: Set::default(),
            accepting: Set::default(),
            transitions: Map::default(),
        }
    }

    pub fn add_state(&mut self, state: Q) {
        self.transitions.entry(state).or_default();
    }

    pub fn set_initial(&mut self, state: Q) {
        self.add_state(state.clone());
        self.initial.insert(state);
    }

    pub fn set_accepting(&mut self, state: Q) {
        self.add_state(state.clone());
        self.accepting.insert(state);
    }

    pub fn add_transition(&mut self, from: Q, letter: Letter<L>, to: Q) {
        self.add_state(to.clone());
        self.transitions
            .entry(from)
            .or_default()
            .entry(letter)
            .or_default()
            .insert(to);
    }

    /// States reachable from `state` by reading `letter`.
    pub fn next_states(&self, state: &Q, letter: &Letter<L>) -> Option<&Set<Q>> {
        self.transitions.get(state)?.get(letter)
    }

    pub fn states(&self) -> impl Iterator<Item = &Q> + '_ {
        self.transitions.keys()
    }

    pub fn initial_states(&self) -> &Set<Q> {
        &self.initial
    }

    pub fn accepting_states(&self) -> &Set<Q> {
        &self.accepting
    }
}

/// Generalized automaton: one accepting set per color.
#[derive(Debug, Clone)]
pub struct MultiColorAutomaton<Q, L: Ord> {
    automaton: Automaton<Q, L>,
    colors: Map<usize, Set<Q>>,
}

impl<Q: Element, L: Element + Ord> Default for MultiColorAutomaton<Q, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Q: Element, L: Element + Ord> MultiColorAutomaton<Q, L> {
    pub fn new() -> Self {
        Self {
            automaton: Automaton::new(),
            colors: Map::default(),
        }
    }

    pub fn automaton(&self) -> &Automaton<Q, L> {
        &self.automaton
    }

    pub fn automaton_mut(&mut self) -> &mut Automaton<Q, L> {
        &mut self.automaton
    }

    pub fn set_accepting(&mut self, state: Q, color: usize) {
        self.automaton.add_state(state.clone());
        self.colors.entry(color).or_default().insert(state);
    }

    pub fn colors(&self) -> impl Iterator<Item = usize> + '_ {
        self.colors.keys().copied()
    }

    pub fn accepting_states(&self, color: usize) -> Option<&Set<Q>> {
        self.colors.get(&color)
    }
}

/// LTL formula over atomic propositions `L`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ltl<L> {
    True,
    Ap(L),
    Not(Box<Ltl<L>>),
    And(Box<Ltl<L>>, Box<Ltl<L>>),
    Next(Box<Ltl<L>>),
    Until(Box<Ltl<L>>, Box<Ltl<L>>),
}

/// Outcome of checking an omega-regular property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationResult<S> {
    Succeeded,
    /// Lasso-shaped counterexample: `prefix` followed by `cycle` forever.
    Failed { prefix: Vec<S>, cycle: Vec<S> },
}

/// Product of a transition system with an automaton over its propositions.
pub fn product<S, A, P, Q>(
    _ts: &TransitionSystem<S, A, P>,
    _aut: &Automaton<Q, P>,
) -> TsResult<TransitionSystem<(S, Q), A, Q>>
where
    S: Element,
    A: Element,
    P: Element + Ord,
    Q: Element,
{
    Err(TsError::Unsupported("product of a transition system and an automaton"))
}

/// Check `ts` against an automaton accepting the violating words.
pub fn verify_omega_regular<S, A, P, Q>(
    _ts: &TransitionSystem<S, A, P>,
    _aut: &Automaton<Q, P>,
) -> TsResult<VerificationResult<S>>
where
    S: Element,
    A: Element,
    P: Element + Ord,
    Q: Element,
{
    Err(TsError::Unsupported("omega-regular verification"))
}

pub fn ltl_to_nba<L: Element + Ord>(_ltl: &Ltl<L>) -> TsResult<Automaton<usize, L>> {
    Err(TsError::Unsupported("LTL to NBA translation"))
}

pub fn gnba_to_nba<Q: Element, L: Element + Ord>(
    _gnba: &MultiColorAutomaton<Q, L>,
) -> TsResult<Automaton<(Q, usize), L>> {
    Err(TsError::Unsupported("GNBA to NBA reduction"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter(aps: &[&'static str]) -> Letter<&'static str> {
        aps.iter().copied().collect()
    }

    fn sample() -> Automaton<u8, &'static str> {
        let mut aut = Automaton::new();
        aut.set_initial(0);
        aut.set_accepting(1);
        aut.add_transition(0, letter(&["p"]), 1);
        aut.add_transition(1, letter(&[]), 1);
        aut
    }

    #[test]
    fn test_automaton_construction() {
        let aut = sample();
        assert_eq!(aut.states().count(), 2);
        assert!(aut.next_states(&0, &letter(&["p"])).unwrap().contains(&1));
        assert!(aut.next_states(&0, &letter(&["q"])).is_none());

        let mut gnba: MultiColorAutomaton<u8, &'static str> = MultiColorAutomaton::new();
        gnba.automaton_mut().set_initial(0);
        gnba.set_accepting(0, 1);
        gnba.set_accepting(2, 3);
        assert_eq!(gnba.colors().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(gnba.automaton().states().count(), 2);
    }

    #[test]
    fn test_operations_are_unsupported() {
        let mut ts: TransitionSystem<u8, char, &'static str> = TransitionSystem::new("ts");
        ts.add_initial_state(0);
        let aut = sample();

        assert!(matches!(product(&ts, &aut), Err(TsError::Unsupported(_))));
        assert!(matches!(
            verify_omega_regular(&ts, &aut),
            Err(TsError::Unsupported(_))
        ));
        let formula = Ltl::Until(Box::new(Ltl::True), Box::new(Ltl::Ap("p")));
        assert!(matches!(ltl_to_nba(&formula), Err(TsError::Unsupported(_))));
        assert!(matches!(
            gnba_to_nba(&MultiColorAutomaton::<u8, &'static str>::new()),
            Err(TsError::Unsupported(_))
        ));
    }
}
