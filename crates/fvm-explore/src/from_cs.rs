//! Transition system of a channel system.
//!
//! Per explored state, every process contributes its enabled transitions.
//! Ordinary actions move one process. Communication actions never fire on
//! their own: a send and a receive on the same channel, enabled in two
//! different processes at the same state, fire together as one transition
//! labelled `send|receive`.

use crate::channel_system::ChannelSystem;
use crate::config::ExploreConfig;
use crate::error::ExploreResult;
use crate::explore::{initialize, Frontier};
use crate::program_graph::PgTransition;
use crate::state::{ChannelState, Location};
use fvm_eval::{Communication, Direction, Evaluation, Semantics};
use fvm_ts::TransitionSystem;
use smallvec::SmallVec;
use tracing::{debug, trace};

/// Transition system produced from a channel system.
pub type CsTransitionSystem<L> = TransitionSystem<ChannelState<L>, String, String>;

/// An enabled communication waiting for a partner within one state's scan.
struct Pending<'a, L> {
    process: usize,
    transition: &'a PgTransition<L>,
    comm: Communication<'a>,
}

type PendingList<'a, L> = SmallVec<[Pending<'a, L>; 4]>;

/// Initial states: a left-to-right fold over the processes. Each step
/// extends every partial state with each initialization alternative of the
/// next process (run on the evaluation so far) and each of its initial
/// locations.
fn initial_states<L: Location>(
    cs: &ChannelSystem<L>,
    semantics: &Semantics,
) -> ExploreResult<Vec<ChannelState<L>>> {
    let mut partial: Vec<(Vec<L>, Evaluation)> = vec![(Vec::new(), Evaluation::new())];

    for pg in cs.program_graphs() {
        let alternatives: Vec<&[String]> = if pg.initializations().is_empty() {
            vec![&[][..]]
        } else {
            pg.initializations().iter().map(Vec::as_slice).collect()
        };

        let mut next = Vec::with_capacity(partial.len() * alternatives.len());
        for (locations, eval) in &partial {
            for &statements in &alternatives {
                let eval = initialize(semantics, eval, statements)?;
                for location in pg.initial_locations() {
                    let mut locations = locations.clone();
                    locations.push(location.clone());
                    next.push((locations, eval.clone()));
                }
            }
        }
        partial = next;
    }

    Ok(partial
        .into_iter()
        .map(|(locations, eval)| ChannelState::new(locations, eval))
        .collect())
}

/// Expand `cs` into its transition system by breadth-first exploration.
///
/// Every legal firing is enumerated: independent moves of each process and
/// every compatible send/receive pairing across distinct processes. Guards
/// that do not hold, effects that fail and rejected pairings produce no
/// transition.
pub fn transition_system_from_cs<L: Location>(
    cs: &ChannelSystem<L>,
    semantics: &Semantics,
    config: &ExploreConfig,
) -> ExploreResult<CsTransitionSystem<L>> {
    let name = cs
        .program_graphs()
        .iter()
        .map(|pg| pg.name())
        .collect::<Vec<_>>()
        .join(" | ");
    let mut frontier = Frontier::new(&name, config);

    for state in initial_states(cs, semantics)? {
        frontier.add_initial(state)?;
    }
    debug!(
        processes = cs.len(),
        count = frontier.initial_count(),
        "generated initial states"
    );

    let indices: Vec<_> = cs.program_graphs().iter().map(|pg| pg.outgoing_index()).collect();
    let syntax = semantics.channels();

    while let Some(state) = frontier.pop() {
        let mut sends: PendingList<'_, L> = SmallVec::new();
        let mut receives: PendingList<'_, L> = SmallVec::new();

        for (process, index) in indices.iter().enumerate() {
            let Some(transitions) = index.get(&state.locations()[process]) else {
                continue;
            };
            for &transition in transitions {
                match semantics.holds(state.eval(), &transition.condition) {
                    Ok(true) => {}
                    Ok(false) => continue,
                    Err(e) => {
                        trace!(
                            state = %state,
                            process,
                            condition = %transition.condition,
                            error = %e,
                            "guard blocked"
                        );
                        continue;
                    }
                }

                let Some(comm) = syntax.classify(&transition.action) else {
                    match semantics.effect(state.eval(), &transition.action) {
                        Ok(eval) => {
                            let next = state.advance(&[(process, &transition.to)], eval);
                            frontier.discover(&state, transition.action.clone(), next)?;
                        }
                        Err(e) => {
                            trace!(
                                state = %state,
                                process,
                                action = %transition.action,
                                error = %e,
                                "action blocked"
                            );
                        }
                    }
                    continue;
                };

                let partners = match comm.direction.complement() {
                    Direction::Send => &sends,
                    Direction::Receive => &receives,
                };
                for partner in partners
                    .iter()
                    .filter(|p| p.process != process && p.comm.channel == comm.channel)
                {
                    let (send, receive) = match comm.direction {
                        Direction::Send => (transition, partner.transition),
                        Direction::Receive => (partner.transition, transition),
                    };
                    let action = syntax.pair(&send.action, &receive.action);
                    match semantics.communicate(state.eval(), &action) {
                        Ok(eval) => {
                            let moves = [
                                (process, &transition.to),
                                (partner.process, &partner.transition.to),
                            ];
                            let next = state.advance(&moves, eval);
                            frontier.discover(&state, action, next)?;
                        }
                        Err(e) => {
                            trace!(
                                state = %state,
                                action = %action,
                                error = %e,
                                "communication blocked"
                            );
                        }
                    }
                }

                let pending = Pending {
                    process,
                    transition,
                    comm,
                };
                match comm.direction {
                    Direction::Send => sends.push(pending),
                    Direction::Receive => receives.push(pending),
                }
            }
        }
    }

    Ok(frontier.finish())
}
