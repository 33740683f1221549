//! Discrete random variables: the probabilistic cell value.
//!
//! Every cell in a Flowscape layer holds a [`RandVar`] rather than a
//! plain scalar: a discrete probability distribution over f64 values.
//! The state count is bounded by the run's `rv_max_states` budget;
//! every combining operation coarsens its result back within budget by
//! merging nearest-valued states, which preserves the mean exactly.

use smallvec::{smallvec, SmallVec};
use std::fmt;

/// Inline capacity for the state vector. Most landscape cells are
/// degenerate (a single state), so four states inline covers the
/// common case without heap allocation.
type States = SmallVec<[(f64, f64); 4]>;

/// Tolerance used when merging duplicate state values.
const VALUE_EPS: f64 = 1e-12;

/// Errors from [`RandVar`] construction.
#[derive(Clone, Debug, PartialEq)]
pub enum RandVarError {
    /// No states were supplied.
    Empty,
    /// A state value was NaN or infinite.
    NonFiniteValue {
        /// The offending value.
        value: f64,
    },
    /// A probability was negative, NaN, or the total mass was zero.
    InvalidProbability {
        /// The offending probability.
        probability: f64,
    },
}

impl fmt::Display for RandVarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "random variable needs at least one state"),
            Self::NonFiniteValue { value } => {
                write!(f, "state value must be finite, got {value}")
            }
            Self::InvalidProbability { probability } => {
                write!(f, "invalid probability mass {probability}")
            }
        }
    }
}

impl std::error::Error for RandVarError {}

/// A discrete probability distribution over f64 values.
///
/// States are kept sorted by value with strictly positive
/// probabilities summing to 1. The canonical [`zero`](RandVar::zero)
/// is the identity element for [`add`](RandVar::add) and
/// [`average`](RandVar::average); threshold comparisons go through
/// [`mean`](RandVar::mean).
#[derive(Clone, Debug, PartialEq)]
pub struct RandVar {
    states: States,
}

impl RandVar {
    /// The canonical zero: all mass at 0.0.
    pub fn zero() -> Self {
        Self {
            states: smallvec![(0.0, 1.0)],
        }
    }

    /// A degenerate distribution with all mass at `value`.
    ///
    /// Non-finite values collapse to zero rather than poisoning
    /// downstream arithmetic; use [`from_states`](Self::from_states)
    /// when construction should fail loudly instead.
    pub fn scalar(value: f64) -> Self {
        if !value.is_finite() {
            return Self::zero();
        }
        Self {
            states: smallvec![(value, 1.0)],
        }
    }

    /// Build a distribution from `(value, probability)` pairs.
    ///
    /// Probabilities are renormalized to sum to 1; duplicate values
    /// are merged. Fails on empty input, non-finite values, or
    /// non-positive total mass.
    pub fn from_states(
        states: impl IntoIterator<Item = (f64, f64)>,
    ) -> Result<Self, RandVarError> {
        let mut collected: States = SmallVec::new();
        for (value, probability) in states {
            if !value.is_finite() {
                return Err(RandVarError::NonFiniteValue { value });
            }
            if !probability.is_finite() || probability < 0.0 {
                return Err(RandVarError::InvalidProbability { probability });
            }
            if probability > 0.0 {
                collected.push((value, probability));
            }
        }
        if collected.is_empty() {
            return Err(RandVarError::Empty);
        }
        let total: f64 = collected.iter().map(|(_, p)| p).sum();
        if total <= 0.0 || !total.is_finite() {
            return Err(RandVarError::InvalidProbability { probability: total });
        }
        for (_, p) in collected.iter_mut() {
            *p /= total;
        }
        Ok(Self::normalized(collected))
    }

    /// Sort by value and merge states whose values coincide.
    fn normalized(mut states: States) -> Self {
        states.sort_by(|a, b| a.0.partial_cmp(&b.0).expect("finite values"));
        let mut merged: States = SmallVec::new();
        for (value, probability) in states {
            match merged.last_mut() {
                Some((v, p)) if (value - *v).abs() <= VALUE_EPS => *p += probability,
                _ => merged.push((value, probability)),
            }
        }
        Self { states: merged }
    }

    /// The expected value `Σ vᵢ·pᵢ`.
    pub fn mean(&self) -> f64 {
        self.states.iter().map(|(v, p)| v * p).sum()
    }

    /// Number of discrete states currently tracked.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// The `(value, probability)` states in ascending value order.
    pub fn states(&self) -> &[(f64, f64)] {
        &self.states
    }

    /// `true` when all mass sits at 0.0.
    pub fn is_zero(&self) -> bool {
        self.states.len() == 1 && self.states[0].0.abs() <= VALUE_EPS
    }

    /// Mean-preserving combination of several distributions.
    ///
    /// This is the aggregation operator used by downsampling: an
    /// equal-weight mixture of the inputs, coarsened to `max_states`.
    /// The mean of the result equals the arithmetic mean of the input
    /// means. An empty slice yields [`zero`](Self::zero).
    pub fn average(vars: &[Self], max_states: usize) -> Self {
        if vars.is_empty() {
            return Self::zero();
        }
        let weight = 1.0 / vars.len() as f64;
        let mut states: States = SmallVec::new();
        for var in vars {
            for &(value, probability) in var.states.iter() {
                states.push((value, probability * weight));
            }
        }
        Self::normalized(states).coarsen(max_states)
    }

    /// Distribution of the sum `self + other`, coarsened to `max_states`.
    pub fn add(&self, other: &Self, max_states: usize) -> Self {
        self.combine(other, max_states, |a, b| a + b)
    }

    /// Distribution of the difference `self - other`, clamped at zero
    /// per state pair, coarsened to `max_states`.
    pub fn saturating_sub(&self, other: &Self, max_states: usize) -> Self {
        self.combine(other, max_states, |a, b| (a - b).max(0.0))
    }

    fn combine(&self, other: &Self, max_states: usize, op: impl Fn(f64, f64) -> f64) -> Self {
        let mut states: States = SmallVec::with_capacity(self.states.len() * other.states.len());
        for &(va, pa) in self.states.iter() {
            for &(vb, pb) in other.states.iter() {
                states.push((op(va, vb), pa * pb));
            }
        }
        Self::normalized(states).coarsen(max_states)
    }

    /// Whichever of the two distributions has the smaller mean.
    ///
    /// Used by models to cap a flow weight by a capacity (sink
    /// absorption, remaining use demand) without leaving the
    /// distributional representation.
    pub fn min_mean<'a>(&'a self, other: &'a Self) -> &'a Self {
        if self.mean() <= other.mean() {
            self
        } else {
            other
        }
    }

    /// Multiply every state value by a non-negative factor.
    pub fn scale(&self, factor: f64) -> Self {
        debug_assert!(factor.is_finite() && factor >= 0.0);
        Self {
            states: self.states.iter().map(|&(v, p)| (v * factor, p)).collect(),
        }
    }

    /// Reduce the state count to at most `max_states` by repeatedly
    /// merging the adjacent pair with the smallest value gap.
    ///
    /// The merged state takes the probability-weighted value, so the
    /// mean is preserved exactly. A no-op when already within budget.
    pub fn coarsen(mut self, max_states: usize) -> Self {
        let max_states = max_states.max(1);
        while self.states.len() > max_states {
            let mut best = 0;
            let mut best_gap = f64::INFINITY;
            for i in 0..self.states.len() - 1 {
                let gap = self.states[i + 1].0 - self.states[i].0;
                if gap < best_gap {
                    best_gap = gap;
                    best = i;
                }
            }
            let (v1, p1) = self.states[best];
            let (v2, p2) = self.states[best + 1];
            let p = p1 + p2;
            self.states[best] = ((v1 * p1 + v2 * p2) / p, p);
            self.states.remove(best + 1);
        }
        self
    }
}

impl Default for RandVar {
    fn default() -> Self {
        Self::zero()
    }
}
