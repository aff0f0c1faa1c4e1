//! Generic labeled transition systems.
//!
//! A [`TransitionSystem`] is generic over its state, action and atomic
//! proposition types. Model constructors in other crates fill one in by
//! exploration; this crate provides the container, post/pre algebra,
//! execution fragments and the interleaving of two systems.

mod algebra;
pub mod automata;
pub mod execution;
pub mod product;
pub mod system;

pub use automata::{Automaton, Ltl, MultiColorAutomaton, VerificationResult};
pub use execution::AlternatingSequence;
pub use product::{interleave, interleave_with_handshake};
pub use system::{Element, Map, Set, Transition, TransitionSystem, TsError, TsResult};
