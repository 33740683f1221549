//! The scoped run context.

use flowscape_core::RunConfig;
use std::sync::Arc;

/// Run-scoped, read-only context shared by the dispatcher, the flow
/// model, and the analyzer.
///
/// Established once per run and dropped at run end. Worker threads
/// share it by cloning (the configuration sits behind an `Arc`).
/// Never a process-wide singleton: concurrent runs each build their
/// own context and cannot observe each other's.
#[derive(Clone, Debug)]
pub struct RunContext {
    config: Arc<RunConfig>,
    rows: u32,
    cols: u32,
}

impl RunContext {
    /// Establish a context for one run over a working grid of
    /// `rows × cols`.
    pub fn new(config: RunConfig, rows: u32, cols: u32) -> Self {
        Self {
            config: Arc::new(config),
            rows,
            cols,
        }
    }

    /// The immutable run configuration.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Working-grid row count.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Working-grid column count.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Shorthand for the state budget of [`RandVar`] operations.
    ///
    /// [`RandVar`]: flowscape_core::RandVar
    pub fn max_states(&self) -> usize {
        self.config.rv_max_states
    }

    /// Shorthand for the transmission threshold models prune below.
    pub fn trans_threshold(&self) -> f64 {
        self.config.trans_threshold
    }
}
