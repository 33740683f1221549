//! Straight-line visibility model.

use flowscape_core::{Cell, ModelError, RandVar};
use flowscape_graph::{LocationGraph, ServiceCarrier};
use flowscape_model::{for_each_active_source, resolved_worker_count, FlowModel, RunContext};

/// Feature layer name carrying terrain elevation.
///
/// When the layer is absent every cell reads as elevation zero and no
/// ray is ever occluded.
pub const ALTITUDE_FEATURE: &str = "altitude";

/// Visual-access propagation along sight lines.
///
/// Each active source (a scenic feature) is tested against every use
/// (a viewpoint) within `radius`. The sight line is walked cell by
/// cell; the view is blocked when intervening terrain (the
/// [`ALTITUDE_FEATURE`] feature) rises above the straight line
/// between the source and use elevations. Sinks along the ray act as
/// haze, absorbing from the actual weight; occlusion zeroes the
/// actual weight but leaves the possible weight intact, so blocked
/// visibility stays accounted.
#[derive(Debug)]
pub struct LineOfSight {
    radius: f64,
    decay: f64,
}

/// Builder for [`LineOfSight`].
#[derive(Debug)]
pub struct LineOfSightBuilder {
    radius: f64,
    decay: f64,
}

impl LineOfSightBuilder {
    /// Maximum sight distance in cells. Default 40.
    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Per-cell-distance multiplicative decay, in `(0, 1]`. Default 0.95.
    pub fn decay(mut self, decay: f64) -> Self {
        self.decay = decay;
        self
    }

    /// Validate and build the model.
    pub fn build(self) -> Result<LineOfSight, ModelError> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(ModelError::ExecutionFailed {
                reason: format!("radius must be positive, got {}", self.radius),
            });
        }
        if !self.decay.is_finite() || self.decay <= 0.0 || self.decay > 1.0 {
            return Err(ModelError::ExecutionFailed {
                reason: format!("decay must be in (0, 1], got {}", self.decay),
            });
        }
        Ok(LineOfSight {
            radius: self.radius,
            decay: self.decay,
        })
    }
}

impl Default for LineOfSight {
    fn default() -> Self {
        Self {
            radius: 40.0,
            decay: 0.95,
        }
    }
}

/// Cells along the segment from `a` to `b`, inclusive of both ends.
///
/// Uniform parametric stepping with one sample per major-axis step;
/// equivalent to a supercover-free Bresenham walk, which is enough
/// for occlusion testing.
fn ray_cells(a: Cell, b: Cell) -> Vec<Cell> {
    let steps = (b.row.abs_diff(a.row)).max(b.col.abs_diff(a.col));
    if steps == 0 {
        return vec![a];
    }
    let mut cells = Vec::with_capacity(steps as usize + 1);
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let row = a.row as f64 + (b.row as f64 - a.row as f64) * t;
        let col = a.col as f64 + (b.col as f64 - a.col as f64) * t;
        cells.push(Cell::new(row.round() as u32, col.round() as u32));
    }
    cells.dedup();
    cells
}

impl LineOfSight {
    /// Create a builder with default parameters.
    pub fn builder() -> LineOfSightBuilder {
        LineOfSightBuilder {
            radius: 40.0,
            decay: 0.95,
        }
    }

    fn sight_one(&self, graph: &LocationGraph, ctx: &RunContext, origin: Cell, viewpoint: Cell) {
        let k = ctx.max_states();
        let source_loc = graph.get(origin).expect("in-bounds origin");
        let view_loc = graph.get(viewpoint).expect("in-bounds viewpoint");

        let dr = viewpoint.row as f64 - origin.row as f64;
        let dc = viewpoint.col as f64 - origin.col as f64;
        let distance = dr.hypot(dc);
        if distance > self.radius {
            return;
        }
        let possible = source_loc.source.scale(self.decay.powf(distance));
        if possible.mean() < ctx.trans_threshold() {
            return;
        }

        let route = ray_cells(origin, viewpoint);
        let h_origin = source_loc.feature(ALTITUDE_FEATURE).mean();
        let h_view = view_loc.feature(ALTITUDE_FEATURE).mean();

        let mut remaining = possible.clone();
        let mut blocked = false;
        let last = route.len() - 1;
        for (i, &cell) in route.iter().enumerate().skip(1) {
            if i == last {
                break;
            }
            let loc = graph.get(cell).expect("ray cells in bounds");
            let t = i as f64 / last as f64;
            let sight_height = h_origin + (h_view - h_origin) * t;
            if loc.feature(ALTITUDE_FEATURE).mean() > sight_height {
                blocked = true;
            }
            // Haze: sinks attenuate whatever is still in transit.
            if loc.sink.mean() > 0.0 && remaining.mean() > 0.0 {
                let absorbed = remaining.min_mean(&loc.sink).clone();
                remaining = remaining.saturating_sub(&absorbed, k);
                loc.cache.deposit(ServiceCarrier {
                    origin,
                    destination: None,
                    possible_weight: possible.clone(),
                    actual_weight: remaining.clone(),
                    absorbed,
                    route: route[..=i].to_vec(),
                });
            }
        }

        let actual = if blocked {
            RandVar::zero()
        } else {
            remaining.min_mean(&view_loc.usage).clone()
        };
        let deposit_at: &[Cell] = if route.len() == 1 {
            route.as_slice()
        } else {
            &route[1..]
        };
        for &stop in deposit_at {
            let stop_loc = graph.get(stop).expect("ray cells in bounds");
            stop_loc.cache.deposit(ServiceCarrier {
                origin,
                destination: Some(viewpoint),
                possible_weight: possible.clone(),
                actual_weight: actual.clone(),
                absorbed: RandVar::zero(),
                route: route.clone(),
            });
        }
    }
}

impl FlowModel for LineOfSight {
    fn name(&self) -> &str {
        "line_of_sight"
    }

    fn propagate(&self, graph: &LocationGraph, ctx: &RunContext) -> Result<(), ModelError> {
        let viewpoints: Vec<Cell> = graph
            .iter()
            .filter(|loc| loc.usage.mean() > 0.0)
            .map(|loc| loc.cell)
            .collect();
        let workers = resolved_worker_count(None);
        for_each_active_source(graph, workers, |origin| {
            for &viewpoint in &viewpoints {
                self.sight_one(graph, ctx, origin, viewpoint);
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowscape_core::RunConfig;
    use flowscape_graph::LocationGraph;
    use flowscape_space::zero_layer;
    use flowscape_test_utils::{rv_layer, zero_means};
    use indexmap::IndexMap;

    fn ctx() -> RunContext {
        RunContext::new(RunConfig::default(), 1, 3)
    }

    fn delivered_at(graph: &LocationGraph, cell: Cell) -> Vec<ServiceCarrier> {
        graph
            .get(cell)
            .unwrap()
            .cache
            .snapshot()
            .into_iter()
            .filter(|c| c.destination == Some(cell))
            .collect()
    }

    fn graph_with_altitude(
        source: Vec<Vec<f64>>,
        usage: Vec<Vec<f64>>,
        altitude: Vec<Vec<f64>>,
    ) -> LocationGraph {
        let source = rv_layer(source);
        let usage = rv_layer(usage);
        let sink = zero_layer(source.rows(), source.cols()).unwrap();
        let mut features = IndexMap::new();
        features.insert(ALTITUDE_FEATURE.to_string(), rv_layer(altitude));
        LocationGraph::build(&source, &sink, &usage, &features).unwrap()
    }

    #[test]
    fn ray_cells_cover_straight_line() {
        let cells = ray_cells(Cell::new(0, 0), Cell::new(0, 3));
        assert_eq!(
            cells,
            vec![
                Cell::new(0, 0),
                Cell::new(0, 1),
                Cell::new(0, 2),
                Cell::new(0, 3),
            ]
        );
    }

    #[test]
    fn ray_cells_degenerate_pair() {
        assert_eq!(ray_cells(Cell::new(2, 2), Cell::new(2, 2)), vec![Cell::new(2, 2)]);
    }

    #[test]
    fn builder_rejects_bad_parameters() {
        assert!(LineOfSight::builder().radius(0.0).build().is_err());
        assert!(LineOfSight::builder().decay(2.0).build().is_err());
        assert!(LineOfSight::builder().decay(f64::NAN).build().is_err());
    }

    #[test]
    fn open_terrain_delivers() {
        let graph = graph_with_altitude(
            vec![vec![10.0, 0.0, 0.0]],
            vec![vec![0.0, 0.0, 10.0]],
            zero_means(1, 3),
        );
        LineOfSight::default().propagate(&graph, &ctx()).unwrap();
        let deliveries = delivered_at(&graph, Cell::new(0, 2));
        assert_eq!(deliveries.len(), 1);
        let expected = 10.0 * 0.95f64.powf(2.0);
        assert!((deliveries[0].possible_weight.mean() - expected).abs() < 1e-9);
        assert!((deliveries[0].actual_weight.mean() - expected).abs() < 1e-9);
    }

    #[test]
    fn ridge_blocks_but_keeps_possible() {
        let graph = graph_with_altitude(
            vec![vec![10.0, 0.0, 0.0]],
            vec![vec![0.0, 0.0, 10.0]],
            vec![vec![0.0, 50.0, 0.0]],
        );
        LineOfSight::default().propagate(&graph, &ctx()).unwrap();
        let deliveries = delivered_at(&graph, Cell::new(0, 2));
        assert_eq!(deliveries.len(), 1);
        assert!(deliveries[0].possible_weight.mean() > 0.0);
        assert!(deliveries[0].actual_weight.is_zero());
    }

    #[test]
    fn haze_attenuates_but_does_not_block() {
        let source = vec![vec![10.0, 0.0, 0.0]];
        let usage = vec![vec![0.0, 0.0, 10.0]];
        let sink = vec![vec![0.0, 2.0, 0.0]];
        let graph = LocationGraph::build(
            &rv_layer(source),
            &rv_layer(sink),
            &rv_layer(usage),
            &IndexMap::new(),
        )
        .unwrap();
        LineOfSight::default().propagate(&graph, &ctx()).unwrap();
        let deliveries = delivered_at(&graph, Cell::new(0, 2));
        let possible = 10.0 * 0.95f64.powf(2.0);
        assert!((deliveries[0].possible_weight.mean() - possible).abs() < 1e-9);
        assert!((deliveries[0].actual_weight.mean() - (possible - 2.0)).abs() < 1e-9);
    }

    #[test]
    fn out_of_radius_viewpoint_ignored() {
        let graph = graph_with_altitude(
            vec![vec![10.0, 0.0, 0.0]],
            vec![vec![0.0, 0.0, 10.0]],
            zero_means(1, 3),
        );
        let model = LineOfSight::builder().radius(1.0).build().unwrap();
        model.propagate(&graph, &ctx()).unwrap();
        assert!(delivered_at(&graph, Cell::new(0, 2)).is_empty());
    }
}
