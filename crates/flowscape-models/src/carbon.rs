//! Well-mixed carbon model.

use flowscape_core::{Cell, ModelError, RandVar};
use flowscape_graph::{LocationGraph, ServiceCarrier};
use flowscape_model::{FlowModel, RunContext};

/// Atmosphere-mixed service flow.
///
/// Carbon sequestration has no spatial routing: the atmosphere mixes
/// the service, so every use draws from every source in proportion to
/// source magnitude, and sinks (here, processes re-releasing stored
/// carbon) absorb a global pro-rata share before anything is
/// delivered. Each source/use pair yields one carrier whose route is
/// just the two endpoints; absorption is recorded separately at the
/// sink cells themselves.
#[derive(Debug, Default)]
pub struct Carbon;

impl Carbon {
    /// Create the model. No parameters.
    pub fn new() -> Self {
        Self
    }
}

impl FlowModel for Carbon {
    fn name(&self) -> &str {
        "carbon"
    }

    fn propagate(&self, graph: &LocationGraph, ctx: &RunContext) -> Result<(), ModelError> {
        let sources: Vec<(Cell, RandVar)> = graph
            .iter()
            .filter(|loc| loc.source.mean() > 0.0)
            .map(|loc| (loc.cell, loc.source.clone()))
            .collect();
        let uses: Vec<(Cell, f64)> = graph
            .iter()
            .filter(|loc| loc.usage.mean() > 0.0)
            .map(|loc| (loc.cell, loc.usage.mean()))
            .collect();
        if sources.is_empty() || uses.is_empty() {
            return Ok(());
        }

        let total_source: f64 = sources.iter().map(|(_, rv)| rv.mean()).sum();
        let total_use: f64 = uses.iter().map(|(_, demand)| demand).sum();
        let total_sink: f64 = graph.iter().map(|loc| loc.sink.mean()).sum();

        // Fraction of each source that is deliverable at all, and the
        // fraction surviving global sink absorption. Both are shares
        // of the mixed pool, not per-path quantities.
        let deliverable = total_use.min(total_source) / total_source;
        let available = (total_source - total_sink).max(0.0);
        let surviving = (available / total_source).min(1.0);

        for (origin, source) in &sources {
            for (use_cell, demand) in &uses {
                let use_share = demand / total_use;
                let possible = source.scale(deliverable * use_share);
                if possible.mean() < ctx.trans_threshold() {
                    continue;
                }
                let actual = possible.scale(surviving);
                graph
                    .get(*use_cell)
                    .expect("use cells in bounds")
                    .cache
                    .deposit(ServiceCarrier {
                        origin: *origin,
                        destination: Some(*use_cell),
                        possible_weight: possible,
                        actual_weight: actual,
                        absorbed: RandVar::zero(),
                        route: vec![*origin, *use_cell],
                    });
            }
        }

        // Absorption is credited where the sinks sit: each sink cell
        // removes its capacity (scaled down when capacity outstrips
        // supply), attributed across sources by magnitude.
        if total_sink > 0.0 {
            let absorption = total_source.min(total_sink) / total_sink;
            for location in graph.iter().filter(|loc| loc.sink.mean() > 0.0) {
                for (origin, source) in &sources {
                    let share = source.mean() / total_source;
                    let absorbed = location.sink.scale(absorption * share);
                    if absorbed.mean() < ctx.trans_threshold() {
                        continue;
                    }
                    location.cache.deposit(ServiceCarrier {
                        origin: *origin,
                        destination: None,
                        possible_weight: absorbed.clone(),
                        actual_weight: RandVar::zero(),
                        absorbed,
                        route: vec![*origin, location.cell],
                    });
                }
            }
        }
        Ok(())
    }
}
