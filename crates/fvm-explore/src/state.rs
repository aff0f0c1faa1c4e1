//! Composite states of constructed transition systems.
//!
//! States are value types: equality is component-wise. Each caches a 64-bit
//! fingerprint at construction and shares its payload through `Arc`, so
//! cloning a state into the queue, the state set and a transition is an
//! atomic increment rather than a deep copy.

use crate::circuit::Valuation;
use fvm_eval::{binding_labels, Evaluation};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A location of a program graph. Its `Display` form is its label token.
pub trait Location: Clone + Eq + Hash + fmt::Debug + fmt::Display {}

impl<T: Clone + Eq + Hash + fmt::Debug + fmt::Display> Location for T {}

/// States that derive their own atomic propositions.
pub trait Labeled {
    fn labels(&self) -> Vec<String>;
}

fn fingerprint<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = ahash::AHasher::default();
    value.hash(&mut hasher);
    hasher.finish()
}

fn write_evaluation(f: &mut fmt::Formatter<'_>, eval: &Evaluation) -> fmt::Result {
    write!(f, "{{")?;
    for (i, (name, value)) in eval.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{} = {}", name, value)?;
    }
    write!(f, "}}")
}

/// A program-graph state: one location and the variable evaluation.
#[derive(Debug, Clone)]
pub struct PgState<L> {
    location: L,
    eval: Arc<Evaluation>,
    fp: u64,
}

impl<L: Location> PgState<L> {
    pub fn new(location: L, eval: Evaluation) -> Self {
        let fp = fingerprint(&(&location, &eval));
        Self {
            location,
            eval: Arc::new(eval),
            fp,
        }
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    pub fn eval(&self) -> &Evaluation {
        &self.eval
    }

    #[inline]
    pub fn fingerprint(&self) -> u64 {
        self.fp
    }
}

impl<L: PartialEq> PartialEq for PgState<L> {
    fn eq(&self, other: &Self) -> bool {
        self.fp == other.fp && self.location == other.location && self.eval == other.eval
    }
}

impl<L: Eq> Eq for PgState<L> {}

impl<L> Hash for PgState<L> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.fp);
    }
}

impl<L: fmt::Display> fmt::Display for PgState<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, ", self.location)?;
        write_evaluation(f, &self.eval)?;
        write!(f, ")")
    }
}

impl<L: Location> Labeled for PgState<L> {
    fn labels(&self) -> Vec<String> {
        std::iter::once(self.location.to_string())
            .chain(binding_labels(&self.eval))
            .collect()
    }
}

/// A channel-system state: location `i` belongs to process `i`; the
/// evaluation is shared by all processes.
#[derive(Debug, Clone)]
pub struct ChannelState<L> {
    locations: Arc<[L]>,
    eval: Arc<Evaluation>,
    fp: u64,
}

impl<L: Location> ChannelState<L> {
    pub fn new(locations: Vec<L>, eval: Evaluation) -> Self {
        let fp = fingerprint(&(&locations, &eval));
        Self {
            locations: locations.into(),
            eval: Arc::new(eval),
            fp,
        }
    }

    pub fn locations(&self) -> &[L] {
        &self.locations
    }

    pub fn eval(&self) -> &Evaluation {
        &self.eval
    }

    #[inline]
    pub fn fingerprint(&self) -> u64 {
        self.fp
    }

    /// The state after processes `(index, location)` move and the
    /// evaluation becomes `eval`. Other processes stay put.
    pub fn advance(&self, moves: &[(usize, &L)], eval: Evaluation) -> Self {
        let mut locations = self.locations.to_vec();
        for &(index, location) in moves {
            locations[index] = location.clone();
        }
        Self::new(locations, eval)
    }
}

impl<L: PartialEq> PartialEq for ChannelState<L> {
    fn eq(&self, other: &Self) -> bool {
        self.fp == other.fp && self.locations == other.locations && self.eval == other.eval
    }
}

impl<L: Eq> Eq for ChannelState<L> {}

impl<L> Hash for ChannelState<L> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.fp);
    }
}

impl<L: fmt::Display> fmt::Display for ChannelState<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "([")?;
        for (i, location) in self.locations.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", location)?;
        }
        write!(f, "], ")?;
        write_evaluation(f, &self.eval)?;
        write!(f, ")")
    }
}

impl<L: Location> Labeled for ChannelState<L> {
    fn labels(&self) -> Vec<String> {
        self.locations
            .iter()
            .map(|l| l.to_string())
            .chain(binding_labels(&self.eval))
            .collect()
    }
}

/// A circuit state: the current inputs and register contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CircuitState {
    pub inputs: Valuation,
    pub registers: Valuation,
}

impl CircuitState {
    pub fn new(inputs: Valuation, registers: Valuation) -> Self {
        Self { inputs, registers }
    }
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits = |v: &Valuation| {
            v.values()
                .map(|&b| if b { '1' } else { '0' })
                .collect::<String>()
        };
        write!(f, "(in={}, reg={})", bits(&self.inputs), bits(&self.registers))
    }
}
