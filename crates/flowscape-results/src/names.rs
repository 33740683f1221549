//! Canonical result-layer names.
//!
//! Fifteen layers, fixed for every run and every model. Sinks get no
//! Inaccessible layer; the asymmetry is deliberate (sink capacity that
//! no flow ever reaches is not a loss to anyone) and consumers should
//! not infer a sixteenth name.

/// Raw source potential at working resolution.
pub const SOURCE_THEORETICAL: &str = "Source - Theoretical";
/// Source potential from which no use was reachable at all.
pub const SOURCE_INACCESSIBLE: &str = "Source - Inaccessible";
/// Source potential deliverable absent obstruction.
pub const SOURCE_POSSIBLE: &str = "Source - Possible";
/// Source potential prevented by sinks or occlusion.
pub const SOURCE_BLOCKED: &str = "Source - Blocked";
/// Source potential actually delivered.
pub const SOURCE_ACTUAL: &str = "Source - Actual";

/// Raw sink capacity.
pub const SINK_THEORETICAL: &str = "Sink - Theoretical";
/// Flow actually absorbed at each sink.
pub const SINK_ACTUAL: &str = "Sink - Actual";

/// Raw use demand.
pub const USE_THEORETICAL: &str = "Use - Theoretical";
/// Demand that no source could reach at all.
pub const USE_INACCESSIBLE: &str = "Use - Inaccessible";
/// Demand satisfiable absent obstruction.
pub const USE_POSSIBLE: &str = "Use - Possible";
/// Demand satisfaction prevented by sinks or occlusion.
pub const USE_BLOCKED: &str = "Use - Blocked";
/// Demand actually satisfied.
pub const USE_ACTUAL: &str = "Use - Actual";

/// Flow through each cell absent obstruction.
pub const FLOW_POSSIBLE: &str = "Flow - Possible";
/// Flow through each cell that obstruction prevented.
pub const FLOW_BLOCKED: &str = "Flow - Blocked";
/// Flow actually passing through each cell.
pub const FLOW_ACTUAL: &str = "Flow - Actual";

/// All result-layer names in canonical emission order.
pub const RESULT_NAMES: [&str; 15] = [
    SOURCE_THEORETICAL,
    SOURCE_INACCESSIBLE,
    SOURCE_POSSIBLE,
    SOURCE_BLOCKED,
    SOURCE_ACTUAL,
    SINK_THEORETICAL,
    SINK_ACTUAL,
    USE_THEORETICAL,
    USE_INACCESSIBLE,
    USE_POSSIBLE,
    USE_BLOCKED,
    USE_ACTUAL,
    FLOW_POSSIBLE,
    FLOW_BLOCKED,
    FLOW_ACTUAL,
];
