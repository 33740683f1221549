//! Result analysis, upsampling, and publishing.
//!
//! The analyzer turns populated carrier caches into the fixed set of
//! fifteen named result layers; the publisher resamples them back to
//! native resolution and hands the full mapping, together with the
//! original inputs, to a [`ResultConsumer`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod analyzer;
mod names;
mod publish;

pub use analyzer::analyze;
pub use names::{
    FLOW_ACTUAL, FLOW_BLOCKED, FLOW_POSSIBLE, RESULT_NAMES, SINK_ACTUAL, SINK_THEORETICAL,
    SOURCE_ACTUAL, SOURCE_BLOCKED, SOURCE_INACCESSIBLE, SOURCE_POSSIBLE, SOURCE_THEORETICAL,
    USE_ACTUAL, USE_BLOCKED, USE_INACCESSIBLE, USE_POSSIBLE, USE_THEORETICAL,
};
pub use publish::{upsample_results, ResultConsumer, RunResults};
