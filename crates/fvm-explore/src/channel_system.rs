//! Channel systems: program graphs running concurrently.

use crate::program_graph::ProgramGraph;
use crate::state::Location;
use serde::{Deserialize, Serialize};
use std::hash::Hash;

/// An ordered collection of processes. A process is identified by its
/// position, and location `i` of every composite state belongs to process
/// `i`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "L: Serialize",
    deserialize = "L: Deserialize<'de> + Eq + Hash"
))]
pub struct ChannelSystem<L> {
    program_graphs: Vec<ProgramGraph<L>>,
}

impl<L: Location> Default for ChannelSystem<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Location> ChannelSystem<L> {
    pub fn new() -> Self {
        Self {
            program_graphs: Vec::new(),
        }
    }

    /// Append a process; returns its index.
    pub fn add_program_graph(&mut self, pg: ProgramGraph<L>) -> usize {
        self.program_graphs.push(pg);
        self.program_graphs.len() - 1
    }

    pub fn program_graphs(&self) -> &[ProgramGraph<L>] {
        &self.program_graphs
    }

    pub fn len(&self) -> usize {
        self.program_graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.program_graphs.is_empty()
    }
}

impl<L: Location> FromIterator<ProgramGraph<L>> for ChannelSystem<L> {
    fn from_iter<I: IntoIterator<Item = ProgramGraph<L>>>(iter: I) -> Self {
        Self {
            program_graphs: iter.into_iter().collect(),
        }
    }
}
