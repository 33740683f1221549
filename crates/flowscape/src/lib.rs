//! Flowscape: ecosystem service flow simulation over raster landscapes.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all Flowscape sub-crates. For most users, adding `flowscape`
//! as a single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use flowscape::prelude::*;
//!
//! // A 2×2 landscape: a source of 5 in one corner, a use of 5 in the
//! // opposite corner, no sinks.
//! let rv = |v: f64| RandVar::scalar(v);
//! let source = Layer::from_rows(vec![vec![rv(5.0), rv(0.0)], vec![rv(0.0), rv(0.0)]]).unwrap();
//! let usage = Layer::from_rows(vec![vec![rv(0.0), rv(0.0)], vec![rv(0.0), rv(5.0)]]).unwrap();
//!
//! let config = ScenarioConfig {
//!     source_layer: source,
//!     use_layer: usage,
//!     flow_model: FlowModelKind::Proximity,
//!     ..ScenarioConfig::default()
//! };
//! let results = run_scenario(&config, &mut DiscardResults)
//!     .unwrap()
//!     .expect("programmatic mode returns results");
//!
//! // One diagonal hop at the default decay of 0.8 delivers 4.0.
//! let delivered = results.layer("Use - Actual").unwrap();
//! assert!((delivered.cells()[3] - 4.0).abs() < 1e-9);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `flowscape-core` | Cells, distribution values, run configuration, model errors |
//! | [`space`] | `flowscape-space` | Layer grids, neighbourhoods, resampling and thresholding |
//! | [`graph`] | `flowscape-graph` | Location graph and carrier caches |
//! | [`model`] | `flowscape-model` | Flow model trait, dispatcher, worker fan-out |
//! | [`models`] | `flowscape-models` | Reference models (proximity, line of sight, carbon) |
//! | [`results`] | `flowscape-results` | Result analysis, upsampling, publishing |
//! | [`engine`] | `flowscape-engine` | Scenario configuration and the run pipeline |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Cells, distribution values, and run configuration
/// (`flowscape-core`).
///
/// [`types::RandVar`] is the probabilistic cell value every layer and
/// carrier carries.
pub use flowscape_core as types;

/// Layer grids, neighbourhoods, and multi-resolution resampling
/// (`flowscape-space`).
///
/// Provides [`space::Layer`], clipped 8-connectivity, and the
/// preprocessing operators ([`space::downsample`],
/// [`space::threshold`], [`space::upsample`]).
pub use flowscape_space as space;

/// The location graph and per-location carrier caches
/// (`flowscape-graph`).
pub use flowscape_graph as graph;

/// Flow model trait, run context, and dispatcher
/// (`flowscape-model`).
///
/// The [`model::FlowModel`] trait is the extension point for
/// user-defined propagation models.
pub use flowscape_model as model;

/// Reference flow model implementations (`flowscape-models`).
///
/// Includes [`models::Proximity`], [`models::LineOfSight`], and
/// [`models::Carbon`], plus [`models::standard_dispatcher`] with all
/// three registered.
pub use flowscape_models as models;

/// Result analysis, upsampling, and publishing
/// (`flowscape-results`).
///
/// The fifteen canonical result-layer names live here alongside
/// [`results::analyze`] and the [`results::ResultConsumer`] seam.
pub use flowscape_results as results;

/// Scenario configuration and the end-to-end run pipeline
/// (`flowscape-engine`).
pub use flowscape_engine as engine;

/// Common imports for typical Flowscape usage.
///
/// ```rust
/// use flowscape::prelude::*;
/// ```
///
/// This imports the most frequently used types: the scenario
/// configuration and runner, the model enumeration, layers and cells,
/// and the result types.
pub mod prelude {
    // Cells and distribution values
    pub use flowscape_core::{BenefitType, Cell, RandVar, SupplyType};

    // Layers
    pub use flowscape_space::{Layer, RvLayer};

    // Models
    pub use flowscape_model::{FlowModel, FlowModelKind};

    // Results
    pub use flowscape_results::{ResultConsumer, RunResults, RESULT_NAMES};

    // Engine
    pub use flowscape_engine::{
        run_scenario, ConfigError, DiscardResults, ResultMode, ScenarioConfig,
    };
}
