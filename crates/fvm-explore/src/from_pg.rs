//! Transition system of a program graph.

use crate::config::ExploreConfig;
use crate::error::ExploreResult;
use crate::explore::{initialize, Frontier};
use crate::program_graph::ProgramGraph;
use crate::state::{Location, PgState};
use fvm_eval::{Evaluation, Semantics};
use fvm_ts::TransitionSystem;
use tracing::{debug, trace};

/// Transition system produced from a program graph.
pub type PgTransitionSystem<L> = TransitionSystem<PgState<L>, String, String>;

/// Expand `pg` into its transition system by breadth-first exploration.
///
/// Initial states pair each initial location with each initialization
/// alternative (or the empty evaluation when there are none). From every
/// reached state, each outgoing transition whose guard holds and whose
/// action has an effect yields a transition; anything else is blocked and
/// silently skipped. States are labelled with their location and one
/// `name = value` proposition per variable.
pub fn transition_system_from_pg<L: Location>(
    pg: &ProgramGraph<L>,
    semantics: &Semantics,
    config: &ExploreConfig,
) -> ExploreResult<PgTransitionSystem<L>> {
    let mut frontier = Frontier::new(pg.name(), config);

    for location in pg.initial_locations() {
        if pg.initializations().is_empty() {
            frontier.add_initial(PgState::new(location.clone(), Evaluation::new()))?;
        }
        for statements in pg.initializations() {
            let eval = initialize(semantics, &Evaluation::new(), statements)?;
            frontier.add_initial(PgState::new(location.clone(), eval))?;
        }
    }
    debug!(count = frontier.initial_count(), "generated initial states");

    let outgoing = pg.outgoing_index();
    while let Some(state) = frontier.pop() {
        let Some(transitions) = outgoing.get(state.location()) else {
            continue;
        };
        for transition in transitions {
            match semantics.holds(state.eval(), &transition.condition) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    trace!(
                        state = %state,
                        condition = %transition.condition,
                        error = %e,
                        "guard blocked"
                    );
                    continue;
                }
            }
            match semantics.effect(state.eval(), &transition.action) {
                Ok(eval) => {
                    let next = PgState::new(transition.to.clone(), eval);
                    frontier.discover(&state, transition.action.clone(), next)?;
                }
                Err(e) => {
                    trace!(
                        state = %state,
                        action = %transition.action,
                        error = %e,
                        "action blocked"
                    );
                }
            }
        }
    }

    Ok(frontier.finish())
}
