//! Explicit-state construction of transition systems.
//!
//! Program graphs, channel systems and sequential circuits are expanded
//! into [`fvm_ts::TransitionSystem`]s by exhaustive breadth-first
//! exploration. Guards and actions are interpreted through a
//! [`fvm_eval::Semantics`] bundle supplied by the caller.
//!
//! ```ignore
//! let semantics = Semantics::standard();
//! let ts = transition_system_from_cs(&cs, &semantics, &ExploreConfig::default())?;
//! println!("{} states", ts.state_count());
//! ```

pub mod channel_system;
pub mod circuit;
pub mod config;
pub mod error;
mod explore;
pub mod from_circuit;
pub mod from_cs;
pub mod from_pg;
pub mod program_graph;
pub mod state;

pub use channel_system::ChannelSystem;
pub use circuit::{Circuit, CircuitError, LogicExpr, RuleCircuit, Valuation};
pub use config::{ExploreConfig, ProgressCounters};
pub use error::{ExploreError, ExploreResult};
pub use from_circuit::{transition_system_from_circuit, valuations, CircuitTransitionSystem};
pub use from_cs::{transition_system_from_cs, CsTransitionSystem};
pub use from_pg::{transition_system_from_pg, PgTransitionSystem};
pub use program_graph::{interleave_program_graphs, LocationPair, PgTransition, ProgramGraph};
pub use state::{ChannelState, CircuitState, Labeled, Location, PgState};
