//! Semaphore-based mutual exclusion, built both as an interleaved program
//! graph and as a channel system.

use fvm_eval::{Semantics, Value};
use fvm_explore::{
    interleave_program_graphs, transition_system_from_cs, transition_system_from_pg,
    ChannelSystem, ExploreConfig, LocationPair, PgTransition, ProgramGraph,
};
use fvm_ts::{interleave_with_handshake, AlternatingSequence, Set, TransitionSystem};

fn process(name: &str) -> ProgramGraph<String> {
    let noncrit = format!("{}_noncrit", name);
    let crit = format!("{}_crit", name);
    let mut pg = ProgramGraph::new(name);
    pg.set_initial(noncrit.clone(), true);
    pg.add_initialization(vec!["y := 1".to_string()]);
    pg.add_transition(PgTransition::new(noncrit.clone(), "y > 0", "y := y - 1", crit.clone()));
    pg.add_transition(PgTransition::new(crit, "", "y := y + 1", noncrit));
    pg
}

#[test]
fn interleaved_semaphore_excludes_both_critical() {
    let pg = interleave_program_graphs(&process("p"), &process("q"));
    assert_eq!(pg.locations().len(), 4);
    assert_eq!(pg.initializations().len(), 1);

    let ts = transition_system_from_pg(&pg, &Semantics::standard(), &ExploreConfig::default())
        .unwrap();
    assert_eq!(ts.state_count(), 3);
    assert_eq!(ts.transition_count(), 4);

    let both = LocationPair::new("p_crit".to_string(), "q_crit".to_string());
    assert!(ts.states().all(|s| s.location() != &both));
    for state in ts.states() {
        let critical = state.location().first.ends_with("crit")
            || state.location().second.ends_with("crit");
        let y = if critical { 0 } else { 1 };
        assert_eq!(state.eval().get("y"), Some(&Value::Int(y)));
        assert!(ts.label(state).unwrap().contains(&format!("y = {}", y)));
    }
    assert_eq!(ts.reach().len(), 3);
}

#[test]
fn channel_system_matches_interleaving() {
    let cs: ChannelSystem<String> = [process("p"), process("q")].into_iter().collect();
    let ts = transition_system_from_cs(&cs, &Semantics::standard(), &ExploreConfig::default())
        .unwrap();
    assert_eq!(ts.state_count(), 3);
    assert_eq!(ts.transition_count(), 4);
    assert!(ts
        .states()
        .all(|s| !(s.locations()[0] == "p_crit" && s.locations()[1] == "q_crit")));
}

#[test]
fn execution_fragments_follow_the_system() {
    let pg = interleave_program_graphs(&process("p"), &process("q"));
    let ts = transition_system_from_pg(&pg, &Semantics::standard(), &ExploreConfig::default())
        .unwrap();
    let start = ts.initial_states().first().unwrap().clone();
    let (action, entered) = ts
        .successors(&start)
        .unwrap()
        .iter()
        .find(|(_, s)| s.location().first == "p_crit")
        .cloned()
        .unwrap();
    let (back, returned) = ts.successors(&entered).unwrap().first().cloned().unwrap();
    assert_eq!(returned, start);

    let run = AlternatingSequence::new(start.clone())
        .then(action.clone(), entered.clone())
        .then(back, returned);
    assert!(ts.is_initial_execution_fragment(&run));
    assert!(!ts.is_maximal_execution_fragment(&run));

    let bogus = AlternatingSequence::new(entered).then(action, start);
    assert!(!ts.is_execution_fragment(&bogus));
}

fn lamp(name: &str) -> TransitionSystem<String, String, String> {
    let off = format!("{}_off", name);
    let on = format!("{}_on", name);
    let mut ts = TransitionSystem::new(name);
    ts.add_initial_state(off.clone());
    ts.add_state(on.clone());
    ts.add_transition(off.clone(), "toggle".to_string(), on.clone()).unwrap();
    ts.add_transition(on.clone(), "toggle".to_string(), off).unwrap();
    ts.add_transition(on.clone(), format!("{}_dim", name), on.clone()).unwrap();
    ts.add_to_label(&on, format!("{}_lit", name)).unwrap();
    ts
}

#[test]
fn handshake_keeps_lamps_in_step() {
    let mut handshake = Set::default();
    handshake.insert("toggle".to_string());
    let mut ts = interleave_with_handshake(&lamp("a"), &lamp("b"), &handshake).unwrap();
    assert_eq!(ts.state_count(), 4);

    let pruned = ts.prune_unreachable();
    assert_eq!(pruned, 2);
    let both_on = ("a_on".to_string(), "b_on".to_string());
    assert!(ts.contains_state(&both_on));
    let label = ts.label(&both_on).unwrap();
    assert!(label.contains("a_lit") && label.contains("b_lit"));
    assert!(ts.has_transition(&both_on, &"a_dim".to_string(), &both_on));
    assert!(ts.is_action_deterministic());
}
