//! Native-resolution result packaging and the consumer seam.

use flowscape_space::{upsample, Layer, RvLayer, SpaceError};
use indexmap::IndexMap;

/// The complete product of one scenario run, at native resolution.
///
/// Holds the fifteen named result layers plus the original inputs, so
/// a consumer can render or persist a run without re-reading anything.
#[derive(Clone, Debug)]
pub struct RunResults {
    /// The named result layers, in canonical order, at native
    /// resolution.
    pub layers: IndexMap<String, Layer<f64>>,
    /// The native-resolution source layer the run started from.
    pub source: RvLayer,
    /// The native-resolution sink layer (all-zero when the scenario
    /// had none).
    pub sink: RvLayer,
    /// The native-resolution use layer.
    pub usage: RvLayer,
    /// The named flow-feature layers the model consumed, at native
    /// resolution.
    pub flow_layers: IndexMap<String, RvLayer>,
}

impl RunResults {
    /// Look up a result layer by its canonical name.
    pub fn layer(&self, name: &str) -> Option<&Layer<f64>> {
        self.layers.get(name)
    }
}

/// Receives the results of a run.
///
/// Interactive front ends implement this to push layers to a display;
/// the programmatic path skips it and returns [`RunResults`] directly.
pub trait ResultConsumer {
    /// Accept the finished results. Called exactly once per run.
    fn consume(&mut self, results: RunResults);
}

/// Resample every working-resolution result layer back up to the
/// native `rows × cols`, preserving insertion order.
pub fn upsample_results(
    working: &IndexMap<String, Layer<f64>>,
    factor: f64,
    rows: u32,
    cols: u32,
) -> Result<IndexMap<String, Layer<f64>>, SpaceError> {
    let mut native = IndexMap::with_capacity(working.len());
    for (name, layer) in working {
        native.insert(name.clone(), upsample(layer, factor, rows, cols)?);
    }
    Ok(native)
}
