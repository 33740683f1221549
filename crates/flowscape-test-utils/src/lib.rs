//! Test fixtures for Flowscape development.
//!
//! Provides layer and graph constructors from plain mean grids, so
//! tests can state scenarios as nested `f64` literals.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use flowscape_core::RandVar;
use flowscape_graph::LocationGraph;
use flowscape_space::{Layer, RvLayer};
use indexmap::IndexMap;

/// Build an [`RvLayer`] of degenerate distributions from nested mean
/// values.
pub fn rv_layer(means: Vec<Vec<f64>>) -> RvLayer {
    Layer::from_rows(
        means
            .into_iter()
            .map(|row| row.into_iter().map(RandVar::scalar).collect())
            .collect(),
    )
    .expect("fixture grids are rectangular and non-empty")
}

/// An all-zero nested mean grid, convenient for absent layers.
pub fn zero_means(rows: usize, cols: usize) -> Vec<Vec<f64>> {
    vec![vec![0.0; cols]; rows]
}

/// Build a location graph from nested source/sink/use mean grids and
/// no flow features.
pub fn graph_from_means(
    source: Vec<Vec<f64>>,
    sink: Vec<Vec<f64>>,
    usage: Vec<Vec<f64>>,
) -> LocationGraph {
    LocationGraph::build(
        &rv_layer(source),
        &rv_layer(sink),
        &rv_layer(usage),
        &IndexMap::new(),
    )
    .expect("fixture layers are aligned")
}
