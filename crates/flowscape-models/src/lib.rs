//! Reference flow-propagation models.
//!
//! Three concrete [`FlowModel`](flowscape_model::FlowModel)
//! implementations back the dispatcher's fixed enumeration:
//!
//! - [`Proximity`]: distance-decayed benefit diffusion over the
//!   neighbour graph, with en-route sink absorption.
//! - [`LineOfSight`]: straight-line visibility with terrain occlusion
//!   from the `altitude` feature and haze attenuation from sinks.
//! - [`Carbon`]: a well-mixed service where every use draws from every
//!   source pro rata and sinks absorb a global share.
//!
//! All three honor the carrier contract: delivered flow is recorded as
//! [`ServiceCarrier`](flowscape_graph::ServiceCarrier) deposits along
//! the delivery route, actual never exceeds possible, and carriers
//! below the transmission threshold are pruned.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod carbon;
mod line_of_sight;
mod proximity;
mod registry;

pub use carbon::Carbon;
pub use line_of_sight::{LineOfSight, LineOfSightBuilder, ALTITUDE_FEATURE};
pub use proximity::{Proximity, ProximityBuilder};
pub use registry::standard_dispatcher;
