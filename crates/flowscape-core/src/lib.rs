//! Core types for the Flowscape ecosystem-service simulation engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the probabilistic cell value ([`RandVar`]), grid cell identity
//! ([`Cell`]), the immutable per-run configuration ([`RunConfig`]),
//! and the model error taxonomy.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod cell;
mod config;
mod error;
mod randvar;

pub use cell::Cell;
pub use config::{BenefitType, RunConfig, SupplyType};
pub use error::ModelError;
pub use randvar::{RandVar, RandVarError};
