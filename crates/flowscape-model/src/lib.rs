//! Flow model trait, run context, and dispatcher.
//!
//! A [`FlowModel`] distributes service flow over a
//! [`LocationGraph`](flowscape_graph::LocationGraph), depositing
//! carrier records as it goes. The [`Dispatcher`] is the pure
//! selection/invocation boundary between the engine and the
//! registered models, keyed by the fixed [`FlowModelKind`]
//! enumeration.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod context;
mod dispatch;
mod model;
mod runner;

pub use context::RunContext;
pub use dispatch::{DispatchError, Dispatcher, FlowModelKind};
pub use model::FlowModel;
pub use runner::{for_each_active_source, resolved_worker_count};
