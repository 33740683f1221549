//! Locations, carrier records, and the per-location carrier cache.

use flowscape_core::{Cell, RandVar};
use indexmap::IndexMap;
use smallvec::SmallVec;
use std::sync::Mutex;

/// One unit of routed service flow.
///
/// Models deposit a carrier into the cache of every location they
/// traverse. The weights are the flow as of the deposit location:
/// `possible_weight` is the flow absent sink obstruction,
/// `actual_weight` the flow after absorption (never above possible),
/// and `absorbed` the amount the deposit location's sink removed.
#[derive(Clone, Debug, PartialEq)]
pub struct ServiceCarrier {
    /// The source cell this flow originated from.
    pub origin: Cell,
    /// The consuming use cell, set when the carrier terminates at a
    /// use location.
    pub destination: Option<Cell>,
    /// Flow that could arrive absent sink obstruction.
    pub possible_weight: RandVar,
    /// Flow that actually arrives after sink absorption.
    pub actual_weight: RandVar,
    /// Amount absorbed by the sink at the deposit location.
    pub absorbed: RandVar,
    /// Path from origin to the deposit location, inclusive.
    pub route: Vec<Cell>,
}

impl ServiceCarrier {
    /// A fresh carrier leaving its origin with the given weight and
    /// nothing yet absorbed.
    pub fn departing(origin: Cell, weight: RandVar) -> Self {
        Self {
            origin,
            destination: None,
            possible_weight: weight.clone(),
            actual_weight: weight,
            absorbed: RandVar::zero(),
            route: vec![origin],
        }
    }
}

/// Append-only, concurrently-writable collection of carrier records.
///
/// Each [`Location`] exclusively owns one cache; propagation models
/// append from multiple worker threads with no ordering guarantee and
/// no lost updates. A single mutex per cell is sufficient — appends
/// are short and contention is limited to paths crossing the same
/// cell.
#[derive(Debug, Default)]
pub struct CarrierCache {
    records: Mutex<Vec<ServiceCarrier>>,
}

impl CarrierCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a carrier record. Safe to call from any thread.
    pub fn deposit(&self, carrier: ServiceCarrier) {
        self.records
            .lock()
            .expect("carrier cache poisoned")
            .push(carrier);
    }

    /// Clone out the deposited records for analysis.
    pub fn snapshot(&self) -> Vec<ServiceCarrier> {
        self.records
            .lock()
            .expect("carrier cache poisoned")
            .clone()
    }

    /// Number of deposited records.
    pub fn len(&self) -> usize {
        self.records.lock().expect("carrier cache poisoned").len()
    }

    /// `true` when no carrier has been deposited.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One cell of the landscape graph.
///
/// Built once per run by the graph builder and retained, with its
/// cache, until the result analyzer has finished.
#[derive(Debug)]
pub struct Location {
    /// Grid identity.
    pub cell: Cell,
    /// Precomputed clipped 8-neighbour set.
    pub neighbours: SmallVec<[Cell; 8]>,
    /// Service production at this cell.
    pub source: RandVar,
    /// Absorption capacity at this cell.
    pub sink: RandVar,
    /// Service demand at this cell.
    pub usage: RandVar,
    /// Demand not yet claimed by rival deliveries. Starts equal to
    /// `usage` and only decreases.
    pub remaining_use: Mutex<RandVar>,
    /// Named flow-feature values (elevation, slope, flow directions).
    pub features: IndexMap<String, RandVar>,
    /// Carrier records deposited by the propagation model.
    pub cache: CarrierCache,
}

impl Location {
    /// The named feature value at this cell, zero when the feature
    /// layer was absent.
    pub fn feature(&self, name: &str) -> RandVar {
        self.features.get(name).cloned().unwrap_or_else(RandVar::zero)
    }

    /// Atomically claim up to `offer` against this cell's remaining
    /// demand, decrementing the shared stock by the amount granted.
    ///
    /// Rival deliveries route through here, so sources competing for
    /// the same use split its demand instead of each satisfying it in
    /// full.
    pub fn claim_demand(&self, offer: &RandVar, max_states: usize) -> RandVar {
        let mut remaining = self.remaining_use.lock().expect("demand stock poisoned");
        let granted = offer.min_mean(&remaining).clone();
        *remaining = remaining.saturating_sub(&granted, max_states);
        granted
    }
}
