//! Error types for model construction.

use crate::circuit::CircuitError;
use fvm_eval::EvalError;
use fvm_ts::TsError;
use thiserror::Error;

/// Construction error.
///
/// Blocked transitions are not errors; these are the conditions that stop
/// a construction outright.
#[derive(Debug, Error)]
pub enum ExploreError {
    #[error(transparent)]
    System(#[from] TsError),

    #[error("initialization statement '{statement}' failed: {source}")]
    Initialization {
        statement: String,
        #[source]
        source: EvalError,
    },

    #[error("circuit error: {0}")]
    Circuit(#[from] CircuitError),

    #[error("cannot enumerate valuations of {count} signals")]
    TooManySignals { count: usize },
}

pub type ExploreResult<T> = Result<T, ExploreError>;
