//! Derivation of the fifteen named result layers from carrier caches.

use crate::names::*;
use flowscape_core::RandVar;
use flowscape_graph::LocationGraph;
use flowscape_space::{Layer, RvLayer};
use indexmap::IndexMap;

/// Compute the fifteen named result layers at working resolution.
///
/// Theoretical layers come straight from the working-resolution
/// inputs; everything else is derived from the carrier caches:
///
/// - Use metrics sum the weights of carriers whose destination is the
///   cell; Source metrics re-attribute those same deliveries to each
///   carrier's origin, so a delivery is counted exactly once on each
///   side.
/// - Sink-Actual sums the absorbed amounts recorded where absorption
///   happened.
/// - Flow metrics sum the weights of every carrier deposited at the
///   cell, whatever its role, which is what makes them
///   model-dependent.
/// - Blocked is possible minus actual; Inaccessible is theoretical
///   minus possible minus blocked, floored at zero. The possible
///   bucket is capped at the theoretical value and blocked at the
///   remaining headroom, so the buckets never overrun the potential.
///
/// The derived categories partition the theoretical potential: per
/// cell, `inaccessible + possible + blocked <= theoretical` up to
/// distributional rounding, with `actual <= possible` per delivery.
pub fn analyze(
    graph: &LocationGraph,
    source: &RvLayer,
    sink: &RvLayer,
    usage: &RvLayer,
) -> IndexMap<String, Layer<f64>> {
    let (rows, cols) = source.dims();
    let zeroes = || Layer::filled(rows, cols, 0.0).expect("non-empty working grid");

    let mut source_possible = zeroes();
    let mut source_actual = zeroes();
    let mut sink_actual = zeroes();
    let mut use_possible = zeroes();
    let mut use_actual = zeroes();
    let mut flow_possible = zeroes();
    let mut flow_actual = zeroes();

    for location in graph.iter() {
        let cell = location.cell;
        for carrier in location.cache.snapshot() {
            let possible = carrier.possible_weight.mean();
            let actual = carrier.actual_weight.mean();
            *flow_possible.get_mut(cell).expect("graph within grid") += possible;
            *flow_actual.get_mut(cell).expect("graph within grid") += actual;
            *sink_actual.get_mut(cell).expect("graph within grid") += carrier.absorbed.mean();
            if carrier.destination == Some(cell) {
                *use_possible.get_mut(cell).expect("graph within grid") += possible;
                *use_actual.get_mut(cell).expect("graph within grid") += actual;
                *source_possible
                    .get_mut(carrier.origin)
                    .expect("origin within grid") += possible;
                *source_actual
                    .get_mut(carrier.origin)
                    .expect("origin within grid") += actual;
            }
        }
    }

    let means = |layer: &RvLayer| layer.map(RandVar::mean);
    let source_theoretical = means(source);
    let sink_theoretical = means(sink);
    let use_theoretical = means(usage);

    let sub = |a: &Layer<f64>, b: &Layer<f64>| -> Layer<f64> {
        let cells = a
            .cells()
            .iter()
            .zip(b.cells())
            .map(|(x, y)| (x - y).max(0.0))
            .collect();
        Layer::from_cells(rows, cols, cells).expect("aligned operands")
    };

    // Per-cell partition of the theoretical potential. Possible is
    // capped at theoretical and blocked at the remaining headroom;
    // inaccessible takes whatever neither bucket reached, so the
    // three never sum past the potential.
    let partition = |theoretical: &Layer<f64>,
                     possible: &Layer<f64>,
                     actual: &Layer<f64>|
     -> (Layer<f64>, Layer<f64>, Layer<f64>) {
        let mut inaccessible = Vec::with_capacity(theoretical.cell_count());
        let mut capped = Vec::with_capacity(theoretical.cell_count());
        let mut blocked = Vec::with_capacity(theoretical.cell_count());
        for ((&t, &p), &a) in theoretical
            .cells()
            .iter()
            .zip(possible.cells())
            .zip(actual.cells())
        {
            let poss = p.min(t);
            let blk = (p - a).max(0.0).min(t - poss);
            inaccessible.push((t - poss - blk).max(0.0));
            capped.push(poss);
            blocked.push(blk);
        }
        let build =
            |cells: Vec<f64>| Layer::from_cells(rows, cols, cells).expect("aligned operands");
        (build(inaccessible), build(capped), build(blocked))
    };

    let (source_inaccessible, source_possible, source_blocked) =
        partition(&source_theoretical, &source_possible, &source_actual);
    let (use_inaccessible, use_possible, use_blocked) =
        partition(&use_theoretical, &use_possible, &use_actual);
    let flow_blocked = sub(&flow_possible, &flow_actual);

    let mut results = IndexMap::with_capacity(RESULT_NAMES.len());
    let mut put = |name: &str, layer: Layer<f64>| {
        results.insert(name.to_string(), layer);
    };
    put(SOURCE_THEORETICAL, source_theoretical);
    put(SOURCE_INACCESSIBLE, source_inaccessible);
    put(SOURCE_POSSIBLE, source_possible);
    put(SOURCE_BLOCKED, source_blocked);
    put(SOURCE_ACTUAL, source_actual);
    put(SINK_THEORETICAL, sink_theoretical);
    put(SINK_ACTUAL, sink_actual);
    put(USE_THEORETICAL, use_theoretical);
    put(USE_INACCESSIBLE, use_inaccessible);
    put(USE_POSSIBLE, use_possible);
    put(USE_BLOCKED, use_blocked);
    put(USE_ACTUAL, use_actual);
    put(FLOW_POSSIBLE, flow_possible);
    put(FLOW_BLOCKED, flow_blocked);
    put(FLOW_ACTUAL, flow_actual);
    results
}
