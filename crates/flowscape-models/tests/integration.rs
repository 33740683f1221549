//! Integration tests for the reference models through the dispatcher.
//!
//! These tests exercise model selection and propagation the way the
//! engine drives it, not individual models in isolation.

use flowscape_core::{Cell, RunConfig};
use flowscape_graph::LocationGraph;
use flowscape_model::{FlowModelKind, RunContext};
use flowscape_models::{standard_dispatcher, ALTITUDE_FEATURE};
use flowscape_test_utils::{graph_from_means, rv_layer, zero_means};
use indexmap::IndexMap;

fn ctx(rows: u32, cols: u32) -> RunContext {
    RunContext::new(RunConfig::default(), rows, cols)
}

fn delivered_total(graph: &LocationGraph) -> f64 {
    graph
        .iter()
        .flat_map(|loc| {
            let cell = loc.cell;
            loc.cache
                .snapshot()
                .into_iter()
                .filter(move |c| c.destination == Some(cell))
        })
        .map(|c| c.actual_weight.mean())
        .sum()
}

#[test]
fn standard_dispatcher_registers_every_kind() {
    let dispatcher = standard_dispatcher();
    for kind in FlowModelKind::ALL {
        assert!(dispatcher.supports(kind), "missing {kind}");
    }
}

#[test]
fn every_model_respects_the_supply_bound() {
    // Supply 6, demand 4: no model may deliver more than either.
    let source = vec![vec![6.0, 0.0, 0.0]];
    let usage = vec![vec![0.0, 0.0, 4.0]];
    let dispatcher = standard_dispatcher();
    for kind in FlowModelKind::ALL {
        let graph = graph_from_means(source.clone(), zero_means(1, 3), usage.clone());
        dispatcher.dispatch(kind, &graph, &ctx(1, 3)).unwrap();
        let delivered = delivered_total(&graph);
        assert!(delivered <= 4.0 + 1e-9, "{kind} delivered {delivered}");
    }
}

#[test]
fn sinks_reduce_delivery_under_every_model() {
    let source = vec![vec![10.0, 0.0, 0.0]];
    let sink = vec![vec![0.0, 3.0, 0.0]];
    let usage = vec![vec![0.0, 0.0, 10.0]];
    let dispatcher = standard_dispatcher();
    for kind in FlowModelKind::ALL {
        let open = graph_from_means(source.clone(), zero_means(1, 3), usage.clone());
        let hazed = graph_from_means(source.clone(), sink.clone(), usage.clone());
        dispatcher.dispatch(kind, &open, &ctx(1, 3)).unwrap();
        dispatcher.dispatch(kind, &hazed, &ctx(1, 3)).unwrap();
        assert!(
            delivered_total(&hazed) < delivered_total(&open),
            "{kind} ignored the sink"
        );
    }
}

#[test]
fn line_of_sight_occlusion_only_affects_line_of_sight() {
    // A ridge between source and use stops sight but not proximity.
    let source = rv_layer(vec![vec![10.0, 0.0, 0.0]]);
    let sink = rv_layer(vec![vec![0.0; 3]]);
    let usage = rv_layer(vec![vec![0.0, 0.0, 10.0]]);
    let mut features = IndexMap::new();
    features.insert(ALTITUDE_FEATURE.to_string(), rv_layer(vec![vec![0.0, 50.0, 0.0]]));

    let dispatcher = standard_dispatcher();

    let sight = LocationGraph::build(&source, &sink, &usage, &features).unwrap();
    dispatcher
        .dispatch(FlowModelKind::LineOfSight, &sight, &ctx(1, 3))
        .unwrap();
    assert_eq!(delivered_total(&sight), 0.0);

    let walk = LocationGraph::build(&source, &sink, &usage, &features).unwrap();
    dispatcher
        .dispatch(FlowModelKind::Proximity, &walk, &ctx(1, 3))
        .unwrap();
    assert!(delivered_total(&walk) > 0.0);
}

#[test]
fn dispatch_is_deterministic_across_repeat_runs() {
    let source = vec![vec![5.0, 0.0], vec![0.0, 3.0]];
    let usage = vec![vec![0.0, 2.0], vec![4.0, 0.0]];
    let dispatcher = standard_dispatcher();
    for kind in FlowModelKind::ALL {
        let first = graph_from_means(source.clone(), zero_means(2, 2), usage.clone());
        let second = graph_from_means(source.clone(), zero_means(2, 2), usage.clone());
        dispatcher.dispatch(kind, &first, &ctx(2, 2)).unwrap();
        dispatcher.dispatch(kind, &second, &ctx(2, 2)).unwrap();
        assert!(
            (delivered_total(&first) - delivered_total(&second)).abs() < 1e-12,
            "{kind} is nondeterministic"
        );
    }
}

#[test]
fn multiple_sources_all_reach_a_shared_use() {
    let graph = graph_from_means(
        vec![vec![4.0, 0.0, 4.0]],
        zero_means(1, 3),
        vec![vec![0.0, 10.0, 0.0]],
    );
    standard_dispatcher()
        .dispatch(FlowModelKind::Proximity, &graph, &ctx(1, 3))
        .unwrap();
    let origins: Vec<Cell> = graph
        .get(Cell::new(0, 1))
        .unwrap()
        .cache
        .snapshot()
        .into_iter()
        .filter(|c| c.destination == Some(Cell::new(0, 1)))
        .map(|c| c.origin)
        .collect();
    assert!(origins.contains(&Cell::new(0, 0)));
    assert!(origins.contains(&Cell::new(0, 2)));
}
