use fvm_eval::{Semantics, Value};
use fvm_explore::{
    transition_system_from_cs, transition_system_from_pg, ChannelSystem, ExploreConfig,
    PgTransition, ProgramGraph,
};
use proptest::prelude::*;

fn counter(bound: i64, step: i64) -> ProgramGraph<String> {
    let mut pg = ProgramGraph::new("counter");
    pg.set_initial("loop".to_string(), true);
    pg.add_initialization(vec!["x := 0".to_string()]);
    pg.add_transition(PgTransition::new(
        "loop".to_string(),
        format!("x + {} <= {}", step, bound),
        format!("x := x + {}", step),
        "loop".to_string(),
    ));
    pg
}

proptest! {
    #[test]
    fn counter_reaches_every_multiple(bound in 0i64..40, step in 1i64..5) {
        let pg = counter(bound, step);
        let ts = transition_system_from_pg(&pg, &Semantics::standard(), &ExploreConfig::default())
            .unwrap();
        let expected = (bound / step + 1) as usize;
        prop_assert_eq!(ts.state_count(), expected);
        prop_assert_eq!(ts.transition_count(), expected - 1);
        prop_assert_eq!(ts.reach().len(), expected);
        let terminal: Vec<_> = ts.states().filter(|s| ts.is_terminal(s).unwrap()).collect();
        prop_assert_eq!(terminal.len(), 1);
        prop_assert_eq!(terminal[0].eval().get("x"), Some(&Value::Int(bound / step * step)));
    }

    #[test]
    fn every_sent_value_is_received(
        values in proptest::collection::btree_set(-50i64..50, 1..6)
    ) {
        let mut sender = ProgramGraph::new("sender");
        sender.set_initial("s0".to_string(), true);
        for v in &values {
            let send = format!("_c!{}", v);
            sender.add_transition(PgTransition::new("s0".to_string(), "", send, "s1".to_string()));
        }
        let mut receiver = ProgramGraph::new("receiver");
        receiver.set_initial("r0".to_string(), true);
        let receive = PgTransition::new("r0".to_string(), "", "_c?got", "r1".to_string());
        receiver.add_transition(receive);

        let cs: ChannelSystem<String> = [sender, receiver].into_iter().collect();
        let ts = transition_system_from_cs(&cs, &Semantics::standard(), &ExploreConfig::default())
            .unwrap();
        prop_assert_eq!(ts.transition_count(), values.len());
        prop_assert_eq!(ts.state_count(), values.len() + 1);
        for v in &values {
            let received = ts.states().any(|s| s.eval().get("got") == Some(&Value::Int(*v)));
            prop_assert!(received);
        }
    }
}
