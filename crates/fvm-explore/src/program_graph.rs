//! Program graphs and their structural interleaving.

use crate::state::Location;
use fvm_ts::Set;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// A guarded transition `from --[condition] action--> to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PgTransition<L> {
    pub from: L,
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub action: String,
    pub to: L,
}

impl<L> PgTransition<L> {
    pub fn new(from: L, condition: impl Into<String>, action: impl Into<String>, to: L) -> Self {
        Self {
            from,
            condition: condition.into(),
            action: action.into(),
            to,
        }
    }
}

/// A sequential process as guarded transitions between locations.
///
/// Each initialization is one alternative: an ordered list of statements
/// run from the empty evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "L: Serialize",
    deserialize = "L: Deserialize<'de> + Eq + Hash"
))]
pub struct ProgramGraph<L> {
    #[serde(default)]
    name: String,
    #[serde(default)]
    locations: Set<L>,
    initial_locations: Set<L>,
    #[serde(default)]
    initializations: Set<Vec<String>>,
    #[serde(default)]
    transitions: Set<PgTransition<L>>,
}

impl<L: Location> Default for ProgramGraph<L> {
    fn default() -> Self {
        Self::new("")
    }
}

impl<L: Location> ProgramGraph<L> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locations: Set::default(),
            initial_locations: Set::default(),
            initializations: Set::default(),
            transitions: Set::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn add_location(&mut self, location: L) -> bool {
        self.locations.insert(location)
    }

    /// Mark a location initial, adding it if needed.
    pub fn set_initial(&mut self, location: L, initial: bool) {
        if initial {
            self.locations.insert(location.clone());
            self.initial_locations.insert(location);
        } else {
            self.initial_locations.shift_remove(&location);
        }
    }

    pub fn add_initialization(&mut self, statements: Vec<String>) -> bool {
        self.initializations.insert(statements)
    }

    /// Add a transition. Its endpoints become locations.
    pub fn add_transition(&mut self, transition: PgTransition<L>) -> bool {
        self.locations.insert(transition.from.clone());
        self.locations.insert(transition.to.clone());
        self.transitions.insert(transition)
    }

    pub fn locations(&self) -> &Set<L> {
        &self.locations
    }

    /// Locations, including those only mentioned by transitions or as
    /// initial in a deserialized graph.
    pub(crate) fn all_locations(&self) -> Set<&L> {
        self.locations
            .iter()
            .chain(&self.initial_locations)
            .chain(self.transitions.iter().flat_map(|t| [&t.from, &t.to]))
            .collect()
    }

    pub fn initial_locations(&self) -> &Set<L> {
        &self.initial_locations
    }

    pub fn initializations(&self) -> &Set<Vec<String>> {
        &self.initializations
    }

    pub fn transitions(&self) -> &Set<PgTransition<L>> {
        &self.transitions
    }

    /// Transitions grouped by source location.
    pub(crate) fn outgoing_index(&self) -> fvm_ts::Map<&L, Vec<&PgTransition<L>>> {
        let mut index: fvm_ts::Map<&L, Vec<&PgTransition<L>>> = fvm_ts::Map::default();
        for transition in &self.transitions {
            index.entry(&transition.from).or_default().push(transition);
        }
        index
    }
}

/// A location of an interleaved program graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocationPair<L1, L2> {
    pub first: L1,
    pub second: L2,
}

impl<L1, L2> LocationPair<L1, L2> {
    pub fn new(first: L1, second: L2) -> Self {
        Self { first, second }
    }
}

impl<L1: fmt::Display, L2: fmt::Display> fmt::Display for LocationPair<L1, L2> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {}>", self.first, self.second)
    }
}

fn alternatives(initializations: &Set<Vec<String>>) -> Vec<&[String]> {
    if initializations.is_empty() {
        vec![&[][..]]
    } else {
        initializations.iter().map(Vec::as_slice).collect()
    }
}

/// Structural interleaving `pg1 ||| pg2`.
///
/// Locations are all pairs; each transition of one graph is replicated for
/// every location of the other. Initial locations pair up, and
/// initializations are the pairwise concatenations; a side without
/// initializations contributes one empty alternative.
pub fn interleave_program_graphs<L1: Location, L2: Location>(
    pg1: &ProgramGraph<L1>,
    pg2: &ProgramGraph<L2>,
) -> ProgramGraph<LocationPair<L1, L2>> {
    let mut pg = ProgramGraph::new(format!("{} ||| {}", pg1.name(), pg2.name()));
    let locations1 = pg1.all_locations();
    let locations2 = pg2.all_locations();

    for &l1 in &locations1 {
        for &l2 in &locations2 {
            pg.add_location(LocationPair::new(l1.clone(), l2.clone()));
        }
    }

    for t in pg1.transitions() {
        for &l2 in &locations2 {
            pg.add_transition(PgTransition::new(
                LocationPair::new(t.from.clone(), l2.clone()),
                t.condition.clone(),
                t.action.clone(),
                LocationPair::new(t.to.clone(), l2.clone()),
            ));
        }
    }
    for t in pg2.transitions() {
        for &l1 in &locations1 {
            pg.add_transition(PgTransition::new(
                LocationPair::new(l1.clone(), t.from.clone()),
                t.condition.clone(),
                t.action.clone(),
                LocationPair::new(l1.clone(), t.to.clone()),
            ));
        }
    }

    for l1 in pg1.initial_locations() {
        for l2 in pg2.initial_locations() {
            pg.set_initial(LocationPair::new(l1.clone(), l2.clone()), true);
        }
    }

    if !pg1.initializations().is_empty() || !pg2.initializations().is_empty() {
        for init1 in alternatives(pg1.initializations()) {
            for init2 in alternatives(pg2.initializations()) {
                pg.add_initialization(init1.iter().chain(init2).cloned().collect());
            }
        }
    }

    pg
}
