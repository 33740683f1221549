//! The [`FlowModel`] trait.

use crate::context::RunContext;
use flowscape_core::ModelError;
use flowscape_graph::LocationGraph;

/// A pluggable flow-propagation model.
///
/// # Contract
///
/// - `propagate()` distributes flow over the location graph,
///   depositing a [`ServiceCarrier`] into the cache of every location
///   it traverses: provenance (originating source), destination
///   (consuming use, when reached), the amounts transmitted, and the
///   path taken.
/// - Carriers whose possible weight mean falls below the context's
///   transmission threshold must be pruned, not propagated.
/// - `actual_weight` never exceeds `possible_weight`.
/// - Models read the graph and context; they mutate nothing but the
///   carrier caches. Caches support concurrent append, so models are
///   free to traverse in parallel.
/// - `&self` — models are stateless between runs.
///
/// # Object safety
///
/// The trait is object-safe; the dispatcher stores models as
/// `Box<dyn FlowModel>`.
///
/// [`ServiceCarrier`]: flowscape_graph::ServiceCarrier
pub trait FlowModel: Send + Sync + 'static {
    /// Human-readable name for error reporting.
    fn name(&self) -> &str;

    /// Distribute flow over the graph, depositing carrier records.
    fn propagate(&self, graph: &LocationGraph, ctx: &RunContext) -> Result<(), ModelError>;
}
