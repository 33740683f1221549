//! Location graph and concurrent carrier caches.
//!
//! The [`LocationGraph`] is the spatial data model propagation models
//! traverse: one [`Location`] per grid cell, carrying the preprocessed
//! source/sink/use values, named flow-feature values, a precomputed
//! clipped 8-neighbour set, and a concurrently-appendable
//! [`CarrierCache`] that models deposit [`ServiceCarrier`] records
//! into.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod builder;
mod error;
mod location;

pub use builder::LocationGraph;
pub use error::GraphError;
pub use location::{CarrierCache, Location, ServiceCarrier};
