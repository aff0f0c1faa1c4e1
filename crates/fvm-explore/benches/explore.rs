//! Criterion benchmarks for model construction.
//!
//! Run with: cargo bench -p fvm-explore

use criterion::{criterion_group, criterion_main, Criterion};
use fvm_eval::Semantics;
use fvm_explore::{
    transition_system_from_circuit, transition_system_from_cs, transition_system_from_pg,
    ChannelSystem, ExploreConfig, LogicExpr, PgTransition, ProgramGraph, RuleCircuit,
};

/// Producer sends 0..max over `c`, consumer accumulates into `sum`.
fn producer_consumer(max: i64) -> ChannelSystem<String> {
    let mut producer = ProgramGraph::new("producer");
    producer.set_initial("p".to_string(), true);
    producer.add_initialization(vec!["i := 0".to_string()]);
    producer.add_transition(PgTransition::new(
        "p".to_string(),
        format!("i < {}", max),
        "_c!i",
        "q".to_string(),
    ));
    producer.add_transition(PgTransition::new(
        "q".to_string(),
        "",
        "i := i + 1",
        "p".to_string(),
    ));

    let mut consumer = ProgramGraph::new("consumer");
    consumer.set_initial("r".to_string(), true);
    consumer.add_initialization(vec!["sum := 0; v := 0".to_string()]);
    consumer.add_transition(PgTransition::new("r".to_string(), "", "_c?v", "s".to_string()));
    consumer.add_transition(PgTransition::new(
        "s".to_string(),
        "",
        "sum := sum + v",
        "r".to_string(),
    ));

    [producer, consumer].into_iter().collect()
}

fn counter(max: i64) -> ProgramGraph<String> {
    let mut pg = ProgramGraph::new("counter");
    pg.set_initial("l".to_string(), true);
    pg.add_initialization(vec!["x := 0; y := 0".to_string()]);
    for var in ["x", "y"] {
        pg.add_transition(PgTransition::new(
            "l".to_string(),
            format!("{} < {}", var, max),
            format!("{} := {} + 1", var, var),
            "l".to_string(),
        ));
    }
    pg
}

/// `width`-bit shift register fed by a single input.
fn shift_register(width: usize) -> RuleCircuit {
    let registers: Vec<String> = (0..width).map(|i| format!("r{}", i)).collect();
    let mut c = RuleCircuit::new(["in"], registers.clone(), ["out"]);
    let mut previous = "in".to_string();
    for reg in &registers {
        c.add_rule(reg.clone(), LogicExpr::signal(previous.clone())).unwrap();
        previous = reg.clone();
    }
    c.add_rule("out", LogicExpr::signal(previous)).unwrap();
    c
}

fn benchmarks(c: &mut Criterion) {
    let config = ExploreConfig::default();
    let semantics = Semantics::standard();

    let pg = counter(60);
    c.bench_function("pg_counter_60x60", |b| {
        b.iter(|| transition_system_from_pg(&pg, &semantics, &config).unwrap())
    });

    let cs = producer_consumer(40);
    c.bench_function("cs_producer_consumer_40", |b| {
        b.iter(|| transition_system_from_cs(&cs, &semantics, &config).unwrap())
    });

    let circuit = shift_register(8);
    c.bench_function("circuit_shift_register_8", |b| {
        b.iter(|| transition_system_from_circuit(&circuit).unwrap())
    });
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
