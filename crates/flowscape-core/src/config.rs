//! Immutable per-run configuration.

/// Whether a source, sink, or use layer represents a finite stock or
/// an effectively unlimited one.
///
/// Finite supplies deplete as flow is routed; infinite supplies do
/// not (e.g. an open-water sink, or a scenic vista whose visibility
/// is not consumed).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SupplyType {
    /// The layer's values are a depletable stock.
    Finite,
    /// The layer's values never deplete.
    Infinite,
}

/// Whether consumption of the service by one use excludes others.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BenefitType {
    /// Consumption is exclusive: what one use receives, another cannot.
    Rival,
    /// Consumption is shared: every use can receive the full flow.
    NonRival,
}

/// Run-scoped simulation parameters.
///
/// Created once at the start of a run, never mutated afterwards, and
/// shared read-only with the flow model and the analyzer via the run
/// context. A new run builds a fresh configuration; nothing leaks
/// across runs.
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    /// Maximum number of discrete states a [`RandVar`](crate::RandVar)
    /// may track. Minimum 1. Default 10.
    pub rv_max_states: usize,
    /// Transmission threshold: propagation models prune carriers whose
    /// possible weight mean falls below this. Positive. Default 0.01.
    pub trans_threshold: f64,
    /// Supply classification of the source layer.
    pub source_type: SupplyType,
    /// Supply classification of the sink layer.
    pub sink_type: SupplyType,
    /// Supply classification of the use layer.
    pub use_type: SupplyType,
    /// Rivalness of service consumption.
    pub benefit_type: BenefitType,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            rv_max_states: 10,
            trans_threshold: 0.01,
            source_type: SupplyType::Finite,
            sink_type: SupplyType::Finite,
            use_type: SupplyType::Finite,
            benefit_type: BenefitType::Rival,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = RunConfig::default();
        assert_eq!(cfg.rv_max_states, 10);
        assert_eq!(cfg.trans_threshold, 0.01);
        assert_eq!(cfg.benefit_type, BenefitType::Rival);
    }
}
