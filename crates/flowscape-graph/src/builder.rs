//! Construction of the location graph from aligned layers.

use crate::error::GraphError;
use crate::location::{CarrierCache, Location};
use flowscape_core::Cell;
use flowscape_space::{neighbours_of, RvLayer};
use indexmap::IndexMap;
use std::sync::Mutex;

/// The full landscape graph: one [`Location`] per grid cell.
///
/// Built atomically for a run from aligned working-resolution layers
/// and retained until analysis completes. Locations are stored in
/// row-major order and looked up by [`Cell`].
#[derive(Debug)]
pub struct LocationGraph {
    rows: u32,
    cols: u32,
    locations: Vec<Location>,
}

impl LocationGraph {
    /// Build the graph from aligned source, sink, use, and named
    /// flow-feature layers.
    ///
    /// The source layer defines the grid bounds; every other layer
    /// must match its dimensions exactly (the engine substitutes
    /// synthesized zero layers for absent optional inputs before
    /// calling this). Neighbour sets are precomputed per cell —
    /// clipped 8-connectivity, no wraparound.
    pub fn build(
        source: &RvLayer,
        sink: &RvLayer,
        usage: &RvLayer,
        features: &IndexMap<String, RvLayer>,
    ) -> Result<Self, GraphError> {
        let (rows, cols) = source.dims();
        let check = |name: &str, layer: &RvLayer| -> Result<(), GraphError> {
            if !source.aligned_with(layer) {
                return Err(GraphError::LayerMismatch {
                    layer: name.to_string(),
                    expected: (rows, cols),
                    found: layer.dims(),
                });
            }
            Ok(())
        };
        check("sink", sink)?;
        check("use", usage)?;
        for (name, layer) in features {
            check(name, layer)?;
        }

        // Per-cell construction is order-free; a simple row-major pass
        // keeps the graph layout cache-friendly for the analyzer.
        let mut locations = Vec::with_capacity(rows as usize * cols as usize);
        for index in 0..rows as usize * cols as usize {
            let cell = Cell::from_index(index, cols);
            let feature_values = features
                .iter()
                .map(|(name, layer)| {
                    let value = layer.get(cell).expect("aligned layer in bounds").clone();
                    (name.clone(), value)
                })
                .collect();
            let usage_value = usage.get(cell).expect("aligned layer in bounds").clone();
            locations.push(Location {
                cell,
                neighbours: neighbours_of(rows, cols, cell),
                source: source.get(cell).expect("in bounds").clone(),
                sink: sink.get(cell).expect("aligned layer in bounds").clone(),
                remaining_use: Mutex::new(usage_value.clone()),
                usage: usage_value,
                features: feature_values,
                cache: CarrierCache::new(),
            });
        }
        Ok(Self {
            rows,
            cols,
            locations,
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Total location count.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// `false` — construction always yields at least one location.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// The location at `cell`, or `None` out of bounds.
    pub fn get(&self, cell: Cell) -> Option<&Location> {
        (cell.row < self.rows && cell.col < self.cols)
            .then(|| &self.locations[cell.index(self.cols)])
    }

    /// Iterate over all locations in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter()
    }
}
