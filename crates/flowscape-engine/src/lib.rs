//! Scenario configuration and the end-to-end run pipeline.
//!
//! A [`ScenarioConfig`] bundles the native-resolution input layers
//! with every run parameter. [`run_scenario`] validates it eagerly,
//! preprocesses the layers down to working resolution, builds the
//! location graph, dispatches the selected flow model, analyzes the
//! fifteen result layers, and publishes them back at native
//! resolution. One deterministic pass per call; a run either fails
//! before the pipeline starts or completes it.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod config;
mod run;

pub use config::{ConfigError, ResultMode, ScenarioConfig};
pub use run::{run_scenario, DiscardResults};
