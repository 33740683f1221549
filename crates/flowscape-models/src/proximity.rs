//! Distance-decayed proximity benefit model.

use flowscape_core::{BenefitType, Cell, ModelError, RandVar};
use flowscape_graph::{LocationGraph, ServiceCarrier};
use flowscape_model::{for_each_active_source, resolved_worker_count, FlowModel, RunContext};
use std::collections::{HashMap, VecDeque};

/// Proximity benefit propagation.
///
/// Each active source radiates benefit outward over the 8-connected
/// neighbour graph by breadth-first traversal. The possible weight
/// decays multiplicatively per step; sinks absorb from the actual
/// weight in passing; uses reached along the way receive a delivery
/// capped by their demand. Traversal stops when the possible weight
/// falls below the run's transmission threshold.
///
/// Rival benefit claims from the use's shared remaining demand, so
/// competing sources split a use rather than each satisfying it, and
/// the weight continuing past the use drops by the amount delivered.
/// Non-rival benefit continues undiminished and leaves the demand
/// stock untouched.
///
/// # Construction
///
/// ```
/// use flowscape_models::Proximity;
///
/// let model = Proximity::builder().decay(0.5).build().unwrap();
/// ```
#[derive(Debug)]
pub struct Proximity {
    decay: f64,
}

/// Builder for [`Proximity`].
#[derive(Debug)]
pub struct ProximityBuilder {
    decay: f64,
}

impl ProximityBuilder {
    /// Per-step multiplicative decay, in `(0, 1]`. Default 0.8.
    pub fn decay(mut self, decay: f64) -> Self {
        self.decay = decay;
        self
    }

    /// Validate and build the model.
    pub fn build(self) -> Result<Proximity, ModelError> {
        if !self.decay.is_finite() || self.decay <= 0.0 || self.decay > 1.0 {
            return Err(ModelError::ExecutionFailed {
                reason: format!("decay must be in (0, 1], got {}", self.decay),
            });
        }
        Ok(Proximity { decay: self.decay })
    }
}

impl Default for Proximity {
    fn default() -> Self {
        Self { decay: 0.8 }
    }
}

/// Per-cell state of one source's breadth-first traversal.
struct PathState {
    parent: Option<Cell>,
    possible: RandVar,
    actual: RandVar,
}

impl Proximity {
    /// Create a builder with default parameters.
    pub fn builder() -> ProximityBuilder {
        ProximityBuilder { decay: 0.8 }
    }

    /// Reconstruct the origin-to-`cell` route from BFS parents.
    fn route_to(states: &HashMap<Cell, PathState>, cell: Cell) -> Vec<Cell> {
        let mut route = vec![cell];
        let mut cursor = cell;
        while let Some(parent) = states.get(&cursor).and_then(|s| s.parent) {
            route.push(parent);
            cursor = parent;
        }
        route.reverse();
        route
    }

    /// Trace one source cell's benefit outward, depositing carriers.
    fn trace_source(&self, graph: &LocationGraph, ctx: &RunContext, origin: Cell) {
        let k = ctx.max_states();
        let threshold = ctx.trans_threshold();
        let rival = ctx.config().benefit_type == BenefitType::Rival;
        let start = graph
            .get(origin)
            .expect("runner hands in-bounds cells")
            .source
            .clone();

        let mut states: HashMap<Cell, PathState> = HashMap::new();
        let mut queue: VecDeque<Cell> = VecDeque::new();
        states.insert(
            origin,
            PathState {
                parent: None,
                possible: start.clone(),
                actual: start,
            },
        );
        queue.push_back(origin);

        while let Some(cell) = queue.pop_front() {
            let location = graph.get(cell).expect("visited cells in bounds");
            let (possible, mut actual) = {
                let state = &states[&cell];
                (state.possible.clone(), state.actual.clone())
            };

            // Sink absorption, bounded by both the sink capacity and
            // the remaining actual weight.
            if location.sink.mean() > 0.0 {
                let absorbed = actual.min_mean(&location.sink).clone();
                actual = actual.saturating_sub(&absorbed, k);
                location.cache.deposit(ServiceCarrier {
                    origin,
                    destination: None,
                    possible_weight: possible.clone(),
                    actual_weight: actual.clone(),
                    absorbed,
                    route: Self::route_to(&states, cell),
                });
            }

            // Delivery to a consuming use. Rival deliveries claim
            // against the location's shared remaining demand, so
            // sources competing for the same use split it instead of
            // each satisfying it in full.
            if location.usage.mean() > 0.0 {
                let delivered = if rival {
                    location.claim_demand(&actual, k)
                } else {
                    actual.min_mean(&location.usage).clone()
                };
                let route = Self::route_to(&states, cell);
                // The origin cell only receives a deposit when it is
                // itself the consuming use; transit flow is recorded
                // from the first step outward.
                let deposit_at: &[Cell] = if route.len() == 1 {
                    route.as_slice()
                } else {
                    &route[1..]
                };
                for &stop in deposit_at {
                    let stop_loc = graph.get(stop).expect("route cells in bounds");
                    stop_loc.cache.deposit(ServiceCarrier {
                        origin,
                        destination: Some(cell),
                        possible_weight: possible.clone(),
                        actual_weight: delivered.clone(),
                        absorbed: RandVar::zero(),
                        route: route.clone(),
                    });
                }
                if rival {
                    actual = actual.saturating_sub(&delivered, k);
                }
            }

            // Record the post-absorption, post-delivery state so
            // children expand from it.
            if let Some(state) = states.get_mut(&cell) {
                state.actual = actual.clone();
            }

            for &nb in &location.neighbours {
                if states.contains_key(&nb) {
                    continue;
                }
                let next_possible = possible.scale(self.decay);
                if next_possible.mean() < threshold {
                    continue;
                }
                states.insert(
                    nb,
                    PathState {
                        parent: Some(cell),
                        possible: next_possible,
                        actual: actual.scale(self.decay),
                    },
                );
                queue.push_back(nb);
            }
        }
    }
}

impl FlowModel for Proximity {
    fn name(&self) -> &str {
        "proximity"
    }

    fn propagate(&self, graph: &LocationGraph, ctx: &RunContext) -> Result<(), ModelError> {
        let workers = resolved_worker_count(None);
        for_each_active_source(graph, workers, |origin| {
            self.trace_source(graph, ctx, origin);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowscape_core::RunConfig;
    use flowscape_test_utils::{graph_from_means, zero_means};

    fn ctx() -> RunContext {
        RunContext::new(RunConfig::default(), 2, 2)
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

    #[test]
    fn builder_rejects_bad_decay() {
        for decay in [0.0, -1.0, 1.5, f64::NAN] {
            assert!(Proximity::builder().decay(decay).build().is_err());
        }
    }

    #[test]
    fn benefit_reaches_diagonal_use() {
        let graph = graph_from_means(
            vec![vec![5.0, 0.0], vec![0.0, 0.0]],
            zero_means(2, 2),
            vec![vec![0.0, 0.0], vec![0.0, 5.0]],
        );
        let model = Proximity::default();
        model.propagate(&graph, &ctx()).unwrap();

        let deliveries = delivered_at(&graph, Cell::new(1, 1));
        assert_eq!(deliveries.len(), 1);
        let carrier = &deliveries[0];
        assert_eq!(carrier.origin, Cell::new(0, 0));
        // One diagonal step at default decay 0.8.
        assert!((carrier.possible_weight.mean() - 4.0).abs() < 1e-9);
        assert!((carrier.actual_weight.mean() - 4.0).abs() < 1e-9);
        assert_eq!(carrier.route, vec![Cell::new(0, 0), Cell::new(1, 1)]);
    }

    #[test]
    fn delivery_capped_by_demand() {
        let graph = graph_from_means(
            vec![vec![10.0, 0.0]],
            zero_means(1, 2),
            vec![vec![0.0, 2.0]],
        );
        Proximity::default().propagate(&graph, &ctx()).unwrap();
        let deliveries = delivered_at(&graph, Cell::new(0, 1));
        assert_eq!(deliveries.len(), 1);
        assert!((deliveries[0].actual_weight.mean() - 2.0).abs() < 1e-9);
        assert!((deliveries[0].possible_weight.mean() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn sink_absorbs_en_route() {
        // Source at col 0, sink at col 1, use at col 2.
        let graph = graph_from_means(
            vec![vec![10.0, 0.0, 0.0]],
            vec![vec![0.0, 3.0, 0.0]],
            vec![vec![0.0, 0.0, 10.0]],
        );
        Proximity::default().propagate(&graph, &ctx()).unwrap();

        let sink_records: Vec<_> = graph
            .get(Cell::new(0, 1))
            .unwrap()
            .cache
            .snapshot()
            .into_iter()
            .filter(|c| !c.absorbed.is_zero())
            .collect();
        assert_eq!(sink_records.len(), 1);
        assert!((sink_records[0].absorbed.mean() - 3.0).abs() < 1e-9);

        let deliveries = delivered_at(&graph, Cell::new(0, 2));
        assert_eq!(deliveries.len(), 1);
        // Two steps of decay on possible: 10 * 0.8^2 = 6.4. Actual lost
        // 3.0 to the sink at step one before the second decay:
        // (10*0.8 - 3) * 0.8 = 4.0.
        assert!((deliveries[0].possible_weight.mean() - 6.4).abs() < 1e-9);
        assert!((deliveries[0].actual_weight.mean() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn traversal_prunes_below_threshold() {
        // decay 0.1: one step leaves 0.1, two steps 0.01 < 0.011.
        let graph = graph_from_means(
            vec![vec![1.0, 0.0, 0.0]],
            zero_means(1, 3),
            vec![vec![0.0, 0.0, 1.0]],
        );
        let ctx = RunContext::new(
            RunConfig {
                trans_threshold: 0.011,
                ..RunConfig::default()
            },
            1,
            3,
        );
        let model = Proximity::builder().decay(0.1).build().unwrap();
        model.propagate(&graph, &ctx).unwrap();
        assert!(delivered_at(&graph, Cell::new(0, 2)).is_empty());
    }

    #[test]
    fn rival_consumption_depletes_downstream() {
        // Two uses in a row; rival delivery at the first starves the
        // second.
        let graph = graph_from_means(
            vec![vec![4.0, 0.0, 0.0]],
            zero_means(1, 3),
            vec![vec![0.0, 10.0, 10.0]],
        );
        Proximity::default().propagate(&graph, &ctx()).unwrap();
        let near = delivered_at(&graph, Cell::new(0, 1));
        let far = delivered_at(&graph, Cell::new(0, 2));
        assert!((near[0].actual_weight.mean() - 3.2).abs() < 1e-9);
        // All actual flow was consumed at the first use.
        assert!(far[0].actual_weight.is_zero());
        // But possible flow is unaffected by rival capture.
        assert!((far[0].possible_weight.mean() - 2.56).abs() < 1e-9);
    }

    #[test]
    fn rival_sources_split_shared_demand() {
        // Two sources flank one rival use of 5; each offers 3.2 after
        // one step of decay, and together they are bounded by the
        // demand rather than each meeting it in full.
        let graph = graph_from_means(
            vec![vec![4.0, 0.0, 4.0]],
            zero_means(1, 3),
            vec![vec![0.0, 5.0, 0.0]],
        );
        Proximity::default().propagate(&graph, &ctx()).unwrap();
        let total: f64 = delivered_at(&graph, Cell::new(0, 1))
            .iter()
            .map(|c| c.actual_weight.mean())
            .sum();
        assert!((total - 5.0).abs() < 1e-9);
    }

    #[test]
    fn non_rival_consumption_shares() {
        let graph = graph_from_means(
            vec![vec![4.0, 0.0, 0.0]],
            zero_means(1, 3),
            vec![vec![0.0, 10.0, 10.0]],
        );
        let ctx = RunContext::new(
            RunConfig {
                benefit_type: flowscape_core::BenefitType::NonRival,
                ..RunConfig::default()
            },
            1,
            3,
        );
        Proximity::default().propagate(&graph, &ctx).unwrap();
        let far = delivered_at(&graph, Cell::new(0, 2));
        assert!((far[0].actual_weight.mean() - 2.56).abs() < 1e-9);
    }

    #[test]
    fn self_use_delivers_in_place() {
        let graph = graph_from_means(vec![vec![5.0]], zero_means(1, 1), vec![vec![2.0]]);
        Proximity::default().propagate(&graph, &ctx()).unwrap();
        let deliveries = delivered_at(&graph, Cell::new(0, 0));
        assert_eq!(deliveries.len(), 1);
        assert!((deliveries[0].actual_weight.mean() - 2.0).abs() < 1e-9);
        assert_eq!(deliveries[0].route, vec![Cell::new(0, 0)]);
    }
}
