//! End-to-end channel-system construction.

use fvm_eval::{ChannelSyntax, Semantics, Value};
use fvm_explore::{
    transition_system_from_cs, ChannelState, ChannelSystem, ExploreConfig, PgTransition,
    ProgramGraph, ProgressCounters,
};
use std::sync::atomic::Ordering;
use std::sync::Arc;

fn single_step(name: &str, from: &str, action: &str, to: &str) -> ProgramGraph<String> {
    let mut pg = ProgramGraph::new(name);
    pg.set_initial(from.to_string(), true);
    pg.add_transition(PgTransition::new(from.to_string(), "", action, to.to_string()));
    pg
}

fn edge(pg: &mut ProgramGraph<String>, from: &str, condition: &str, action: &str, to: &str) {
    pg.add_transition(PgTransition::new(from.to_string(), condition, action, to.to_string()));
}

#[test]
fn rendezvous_binds_received_value() {
    let cs: ChannelSystem<String> = [
        single_step("sender", "s0", "_ch!1", "s1"),
        single_step("receiver", "r0", "_ch?x", "r1"),
    ]
    .into_iter()
    .collect();

    let ts = transition_system_from_cs(&cs, &Semantics::standard(), &ExploreConfig::default())
        .unwrap();

    assert_eq!(ts.transition_count(), 1);
    let transitions: Vec<_> = ts.transitions().collect();
    let t = &transitions[0];
    assert_eq!(t.action, "_ch!1|_ch?x");
    assert_eq!(t.from.locations(), &["s0".to_string(), "r0".to_string()]);
    assert_eq!(t.to.locations(), &["s1".to_string(), "r1".to_string()]);
    assert_eq!(t.to.eval().get("x"), Some(&Value::Int(1)));

    // Neither half fires alone
    assert!(!ts.actions().contains("_ch!1"));
    assert!(!ts.actions().contains("_ch?x"));
    assert!(ts.is_terminal(&t.to).unwrap());
}

#[test]
fn custom_channel_syntax() {
    let syntax = ChannelSyntax {
        marker: '#',
        send: '>',
        receive: '<',
        separator: '&',
    };
    let semantics = Semantics::standard_with(syntax);
    let config = ExploreConfig::default();

    let cs: ChannelSystem<String> = [
        single_step("a", "a0", "#link>40 + 2", "a1"),
        single_step("b", "b0", "#link<got", "b1"),
    ]
    .into_iter()
    .collect();
    let ts = transition_system_from_cs(&cs, &semantics, &config).unwrap();
    let t = ts.transitions().next().unwrap();
    assert_eq!(t.action, "#link>40 + 2&#link<got");
    assert_eq!(t.to.eval().get("got"), Some(&Value::Int(42)));

    // the default marker is an ordinary identifier character here
    let cs: ChannelSystem<String> = [single_step("c", "c0", "_tmp := 1", "c1")]
        .into_iter()
        .collect();
    let ts = transition_system_from_cs(&cs, &semantics, &config).unwrap();
    assert_eq!(ts.transition_count(), 1);
}

#[test]
fn ping_pong_cycle() {
    // ping sends, waits for the echo, repeats; pong echoes the value back
    let mut ping = ProgramGraph::new("ping");
    ping.set_initial("send".to_string(), true);
    ping.add_initialization(vec!["n := 0".to_string()]);
    edge(&mut ping, "send", "n < 2", "_req!n", "wait");
    edge(&mut ping, "wait", "", "_rep?n", "bump");
    edge(&mut ping, "bump", "", "n := n + 1", "send");

    let mut pong = ProgramGraph::new("pong");
    pong.set_initial("idle".to_string(), true);
    pong.add_initialization(vec!["m := 0".to_string()]);
    edge(&mut pong, "idle", "", "_req?m", "reply");
    edge(&mut pong, "reply", "", "_rep!m", "idle");

    let cs: ChannelSystem<String> = [ping, pong].into_iter().collect();
    let progress = Arc::new(ProgressCounters::new());
    let config = ExploreConfig {
        progress: Some(progress.clone()),
        progress_interval: 1,
        ..Default::default()
    };
    let ts = transition_system_from_cs(&cs, &Semantics::standard(), &config).unwrap();

    // two rounds of three steps each, then ping stops at n = 2
    let done = ChannelState::new(
        vec!["send".to_string(), "idle".to_string()],
        [("m".to_string(), Value::Int(1)), ("n".to_string(), Value::Int(2))]
            .into_iter()
            .collect(),
    );
    assert!(ts.contains_state(&done));
    assert!(ts.is_terminal(&done).unwrap());
    assert_eq!(ts.state_count(), 7);
    assert!(ts.is_action_deterministic());
    assert_eq!(progress.explored.load(Ordering::Relaxed), ts.state_count());
    assert_eq!(progress.states.load(Ordering::Relaxed), ts.state_count());
    assert_eq!(progress.queue_len.load(Ordering::Relaxed), 0);
}
