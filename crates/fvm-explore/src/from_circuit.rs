//! Transition system of a sequential circuit.

use crate::circuit::{Circuit, Valuation};
use crate::error::{ExploreError, ExploreResult};
use crate::state::CircuitState;
use fvm_ts::TransitionSystem;
use tracing::{debug, info};

/// Transition system produced from a circuit. Actions are input valuations.
pub type CircuitTransitionSystem = TransitionSystem<CircuitState, Valuation, String>;

/// Every valuation of `names`, in binary counting order with the first name
/// as the most significant bit.
pub fn valuations(names: &[String]) -> ExploreResult<Vec<Valuation>> {
    let width = names.len();
    let count = u32::try_from(width)
        .ok()
        .and_then(|w| 1usize.checked_shl(w))
        .ok_or(ExploreError::TooManySignals { count: width })?;

    Ok((0..count)
        .map(|bits| {
            names
                .iter()
                .enumerate()
                .map(|(j, name)| (name.clone(), (bits >> (width - 1 - j)) & 1 == 1))
                .collect()
        })
        .collect())
}

/// Build the transition system of `circuit`, restricted to its reachable
/// part.
///
/// States are all (inputs, registers) valuations. Initial states have every
/// register false, with any inputs. From each state, reading the next input
/// valuation (the action) moves to that input with the updated registers.
/// A state is labelled with the names of its true inputs, registers and
/// outputs.
pub fn transition_system_from_circuit<C: Circuit + ?Sized>(
    circuit: &C,
) -> ExploreResult<CircuitTransitionSystem> {
    let inputs = valuations(circuit.input_names())?;
    let registers = valuations(circuit.register_names())?;
    let mut ts = CircuitTransitionSystem::new("circuit");

    for name in circuit
        .register_names()
        .iter()
        .chain(circuit.input_names())
        .chain(circuit.output_names())
    {
        ts.add_atomic_proposition(name.clone());
    }

    for reg in &registers {
        for inp in &inputs {
            ts.add_state(CircuitState::new(inp.clone(), reg.clone()));
        }
    }

    let cleared: Valuation = circuit
        .register_names()
        .iter()
        .map(|name| (name.clone(), false))
        .collect();
    for inp in &inputs {
        ts.add_initial_state(CircuitState::new(inp.clone(), cleared.clone()));
        ts.add_action(inp.clone());
    }

    let states: Vec<CircuitState> = ts.states().cloned().collect();
    for state in &states {
        let next_registers = circuit.update_registers(&state.inputs, &state.registers)?;
        for action in &inputs {
            let target = CircuitState::new(action.clone(), next_registers.clone());
            ts.add_transition(state.clone(), action.clone(), target)?;
        }

        let outputs = circuit.compute_outputs(&state.inputs, &state.registers)?;
        let true_names = state
            .registers
            .iter()
            .chain(&state.inputs)
            .chain(&outputs)
            .filter(|(_, &value)| value)
            .map(|(name, _)| name.clone());
        for name in true_names {
            ts.add_to_label(state, name)?;
        }
    }
    debug!(
        states = ts.state_count(),
        transitions = ts.transition_count(),
        "enumerated circuit valuations"
    );

    ts.prune_unreachable();
    info!(
        states = ts.state_count(),
        transitions = ts.transition_count(),
        "construction complete"
    );
    Ok(ts)
}
