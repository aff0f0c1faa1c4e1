//! Interleaving of two transition systems, optionally synchronized on a set
//! of handshake actions.

use crate::system::{Element, Set, TransitionSystem, TsResult};
use std::collections::VecDeque;
use tracing::info;

/// `ts1 ||| ts2`: every action moves exactly one component.
pub fn interleave<S1, S2, A, P>(
    ts1: &TransitionSystem<S1, A, P>,
    ts2: &TransitionSystem<S2, A, P>,
) -> TsResult<TransitionSystem<(S1, S2), A, P>>
where
    S1: Element,
    S2: Element,
    A: Element,
    P: Element,
{
    interleave_with_handshake(ts1, ts2, &Set::default())
}

/// `ts1 ||H ts2`: actions in `handshake` fire only when both components
/// take them together; all other actions move one component and hold the
/// other.
///
/// Every pair of component states is registered and labelled with the union
/// of the component labels, but only pairs reachable from the initial pairs
/// have outgoing transitions. Use [`TransitionSystem::prune_unreachable`]
/// for the reachable part alone.
pub fn interleave_with_handshake<S1, S2, A, P>(
    ts1: &TransitionSystem<S1, A, P>,
    ts2: &TransitionSystem<S2, A, P>,
    handshake: &Set<A>,
) -> TsResult<TransitionSystem<(S1, S2), A, P>>
where
    S1: Element,
    S2: Element,
    A: Element,
    P: Element,
{
    let name = if handshake.is_empty() {
        format!("{} ||| {}", ts1.name(), ts2.name())
    } else {
        format!("{} ||H {}", ts1.name(), ts2.name())
    };
    let mut ts = TransitionSystem::new(name);

    for action in ts1.actions().iter().chain(ts2.actions()) {
        ts.add_action(action.clone());
    }
    for proposition in ts1
        .atomic_propositions()
        .iter()
        .chain(ts2.atomic_propositions())
    {
        ts.add_atomic_proposition(proposition.clone());
    }

    for s1 in ts1.states() {
        for s2 in ts2.states() {
            let pair = (s1.clone(), s2.clone());
            ts.add_state(pair.clone());
            for proposition in ts1.label(s1)?.iter().chain(ts2.label(s2)?) {
                ts.add_to_label(&pair, proposition.clone())?;
            }
        }
    }

    let mut queue = VecDeque::new();
    let mut seen: Set<(S1, S2)> = Set::default();
    for s1 in ts1.initial_states() {
        for s2 in ts2.initial_states() {
            let pair = (s1.clone(), s2.clone());
            ts.add_initial_state(pair.clone());
            if seen.insert(pair.clone()) {
                queue.push_back(pair);
            }
        }
    }

    while let Some(pair) = queue.pop_front() {
        let (s1, s2) = &pair;
        let mut targets: Vec<(A, (S1, S2))> = Vec::new();

        for (action, t1) in ts1.successors(s1)? {
            if handshake.contains(action) {
                for (other, t2) in ts2.successors(s2)? {
                    if other == action {
                        targets.push((action.clone(), (t1.clone(), t2.clone())));
                    }
                }
            } else {
                targets.push((action.clone(), (t1.clone(), s2.clone())));
            }
        }
        for (action, t2) in ts2.successors(s2)? {
            if !handshake.contains(action) {
                targets.push((action.clone(), (s1.clone(), t2.clone())));
            }
        }

        for (action, target) in targets {
            ts.add_transition(pair.clone(), action, target.clone())?;
            if seen.insert(target.clone()) {
                queue.push_back(target);
            }
        }
    }

    info!(
        name = ts.name(),
        states = ts.state_count(),
        reachable = seen.len(),
        transitions = ts.transition_count(),
        "interleaving complete"
    );
    Ok(ts)
}
