//! Scenario configuration, validation, and error types.
//!
//! [`ScenarioConfig`] is the single input bundle for a run.
//! [`validate()`](ScenarioConfig::validate) checks structural
//! invariants eagerly, before any computation; nothing partial is ever
//! produced from an invalid configuration.

use std::error::Error;
use std::fmt;

use flowscape_core::{BenefitType, SupplyType};
use flowscape_graph::GraphError;
use flowscape_model::{DispatchError, FlowModelKind};
use flowscape_space::{zero_layer, RvLayer, SpaceError};
use indexmap::IndexMap;

/// How the engine delivers a finished run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultMode {
    /// Return [`RunResults`](flowscape_results::RunResults) to the
    /// caller.
    Programmatic,
    /// Hand the results to the caller-supplied consumer; the
    /// presentation itself is external.
    Interactive,
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`ScenarioConfig::validate()`] or raised by
/// the pipeline stages [`run_scenario`](crate::run_scenario) drives.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// A present layer does not match the source layer's dimensions.
    MisalignedLayer {
        /// The offending layer's name.
        layer: String,
        /// The source layer's dimensions.
        expected: (u32, u32),
        /// The offending layer's dimensions.
        found: (u32, u32),
    },
    /// A source/sink/use threshold is negative or non-finite.
    InvalidThreshold {
        /// Which threshold.
        name: &'static str,
        /// The invalid value.
        value: f64,
    },
    /// `trans_threshold` is zero, negative, or non-finite.
    InvalidTransThreshold {
        /// The invalid value.
        value: f64,
    },
    /// `rv_max_states` is zero.
    InvalidMaxStates,
    /// `downscaling_factor` is below 1.0 or non-finite.
    InvalidDownscaling {
        /// The invalid value.
        value: f64,
    },
    /// A preprocessing operation failed.
    Space(SpaceError),
    /// Graph construction failed.
    Graph(GraphError),
    /// Model selection or propagation failed.
    Dispatch(DispatchError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MisalignedLayer {
                layer,
                expected,
                found,
            } => write!(
                f,
                "layer '{layer}' is {}x{}, expected {}x{}",
                found.0, found.1, expected.0, expected.1
            ),
            Self::InvalidThreshold { name, value } => {
                write!(f, "{name} must be finite and non-negative, got {value}")
            }
            Self::InvalidTransThreshold { value } => {
                write!(f, "trans_threshold must be finite and positive, got {value}")
            }
            Self::InvalidMaxStates => write!(f, "rv_max_states must be at least 1"),
            Self::InvalidDownscaling { value } => {
                write!(
                    f,
                    "downscaling_factor must be finite and at least 1.0, got {value}"
                )
            }
            Self::Space(e) => write!(f, "preprocessing: {e}"),
            Self::Graph(e) => write!(f, "graph: {e}"),
            Self::Dispatch(e) => write!(f, "dispatch: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Space(e) => Some(e),
            Self::Graph(e) => Some(e),
            Self::Dispatch(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SpaceError> for ConfigError {
    fn from(e: SpaceError) -> Self {
        Self::Space(e)
    }
}

impl From<GraphError> for ConfigError {
    fn from(e: GraphError) -> Self {
        Self::Graph(e)
    }
}

impl From<DispatchError> for ConfigError {
    fn from(e: DispatchError) -> Self {
        Self::Dispatch(e)
    }
}

// ── ScenarioConfig ─────────────────────────────────────────────────

/// Complete configuration for one scenario run.
///
/// Construct with struct-update syntax over [`Default`]:
///
/// ```
/// use flowscape_engine::ScenarioConfig;
/// use flowscape_space::zero_layer;
///
/// let config = ScenarioConfig {
///     source_layer: zero_layer(4, 4).unwrap(),
///     use_layer: zero_layer(4, 4).unwrap(),
///     ..ScenarioConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct ScenarioConfig {
    /// Native-resolution source layer. Defines the grid bounds.
    pub source_layer: RvLayer,
    /// Native-resolution sink layer. `None` means no sinks; the
    /// pipeline substitutes an all-zero layer.
    pub sink_layer: Option<RvLayer>,
    /// Native-resolution use layer.
    pub use_layer: RvLayer,
    /// Named flow-feature layers the model may consult. The reserved
    /// name `flow-directions` selects direction-aware downsampling.
    pub flow_layers: IndexMap<String, RvLayer>,
    /// Source values with a mean below this become zero after
    /// downsampling. Non-negative. Default 0.0.
    pub source_threshold: f64,
    /// Sink threshold, as above. Default 0.0.
    pub sink_threshold: f64,
    /// Use threshold, as above. Default 0.0.
    pub use_threshold: f64,
    /// Transmission threshold models prune below. Positive. Default
    /// 0.01.
    pub trans_threshold: f64,
    /// Maximum discrete states per distribution value. Minimum 1.
    /// Default 10.
    pub rv_max_states: usize,
    /// Native-to-working resolution divisor. Finite, at least 1.0.
    /// Default 1.0 (no resampling).
    pub downscaling_factor: f64,
    /// Supply classification of the source layer.
    pub source_type: SupplyType,
    /// Supply classification of the sink layer.
    pub sink_type: SupplyType,
    /// Supply classification of the use layer.
    pub use_type: SupplyType,
    /// Rivalness of service consumption.
    pub benefit_type: BenefitType,
    /// Which propagation model to run.
    pub flow_model: FlowModelKind,
    /// How to deliver the finished results.
    pub result_type: ResultMode,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        let placeholder = zero_layer(1, 1).expect("1x1 layer is valid");
        Self {
            source_layer: placeholder.clone(),
            sink_layer: None,
            use_layer: placeholder,
            flow_layers: IndexMap::new(),
            source_threshold: 0.0,
            sink_threshold: 0.0,
            use_threshold: 0.0,
            trans_threshold: 0.01,
            rv_max_states: 10,
            downscaling_factor: 1.0,
            source_type: SupplyType::Finite,
            sink_type: SupplyType::Finite,
            use_type: SupplyType::Finite,
            benefit_type: BenefitType::Rival,
            flow_model: FlowModelKind::Proximity,
            result_type: ResultMode::Programmatic,
        }
    }
}

impl ScenarioConfig {
    /// Validate all structural invariants, eagerly and without
    /// producing anything.
    ///
    /// Checks grid alignment of every present layer against the
    /// source layer, threshold ranges, and parameter ranges. The
    /// pipeline refuses to start on the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let expected = self.source_layer.dims();
        let check = |name: &str, layer: &RvLayer| -> Result<(), ConfigError> {
            if !self.source_layer.aligned_with(layer) {
                return Err(ConfigError::MisalignedLayer {
                    layer: name.to_string(),
                    expected,
                    found: layer.dims(),
                });
            }
            Ok(())
        };
        if let Some(sink) = &self.sink_layer {
            check("sink", sink)?;
        }
        check("use", &self.use_layer)?;
        for (name, layer) in &self.flow_layers {
            check(name, layer)?;
        }

        for (name, value) in [
            ("source_threshold", self.source_threshold),
            ("sink_threshold", self.sink_threshold),
            ("use_threshold", self.use_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }
        if !self.trans_threshold.is_finite() || self.trans_threshold <= 0.0 {
            return Err(ConfigError::InvalidTransThreshold {
                value: self.trans_threshold,
            });
        }
        if self.rv_max_states == 0 {
            return Err(ConfigError::InvalidMaxStates);
        }
        if !self.downscaling_factor.is_finite() || self.downscaling_factor < 1.0 {
            return Err(ConfigError::InvalidDownscaling {
                value: self.downscaling_factor,
            });
        }
        Ok(())
    }
}
