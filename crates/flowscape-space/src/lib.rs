//! Layer grids, neighbourhoods, and multi-resolution resampling.
//!
//! A [`Layer`] is a rectangular grid of cell values — [`RandVar`]s on
//! the way in, plain numeric aggregates on the way out. This crate
//! also provides clipped 8-connectivity ([`neighbours_of`]) and the
//! preprocessing operators: expected-value and direction-aggregating
//! downsampling, thresholding, zero-layer synthesis, and upsampling
//! back to native resolution.
//!
//! [`RandVar`]: flowscape_core::RandVar

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod error;
mod layer;
mod neighbours;
mod resample;

pub use error::SpaceError;
pub use layer::{Layer, RvLayer};
pub use neighbours::neighbours_of;
pub use resample::{
    downsample, downsample_directions, threshold, upsample, working_dims, zero_layer,
    FLOW_DIRECTIONS_LAYER,
};
