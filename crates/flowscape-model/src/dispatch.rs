//! Model selection and dispatch.

use crate::context::RunContext;
use crate::model::FlowModel;
use flowscape_core::ModelError;
use flowscape_graph::LocationGraph;
use indexmap::IndexMap;
use std::error::Error;
use std::fmt;
use std::str::FromStr;

/// The fixed enumeration of supported propagation models.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowModelKind {
    /// Distance-decayed proximity benefit.
    Proximity,
    /// Straight-line visibility with terrain occlusion.
    LineOfSight,
    /// Atmosphere-mixed carbon sequestration.
    Carbon,
}

impl FlowModelKind {
    /// The canonical configuration name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Proximity => "Proximity",
            Self::LineOfSight => "LineOfSight",
            Self::Carbon => "Carbon",
        }
    }

    /// All supported kinds, in declaration order.
    pub const ALL: [FlowModelKind; 3] = [Self::Proximity, Self::LineOfSight, Self::Carbon];
}

impl fmt::Display for FlowModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlowModelKind {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Proximity" => Ok(Self::Proximity),
            "LineOfSight" => Ok(Self::LineOfSight),
            "Carbon" => Ok(Self::Carbon),
            other => Err(DispatchError::UnsupportedModel {
                name: other.to_string(),
            }),
        }
    }
}

/// Errors from model selection and invocation.
#[derive(Clone, Debug, PartialEq)]
pub enum DispatchError {
    /// The requested model name is not in the supported enumeration,
    /// or no implementation was registered for it. A precondition
    /// failure at the boundary — never a silent no-op.
    UnsupportedModel {
        /// The unrecognized name.
        name: String,
    },
    /// The selected model failed during propagation.
    Model(ModelError),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedModel { name } => {
                write!(f, "unsupported flow model '{name}'")
            }
            Self::Model(e) => write!(f, "flow model failed: {e}"),
        }
    }
}

impl Error for DispatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Model(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ModelError> for DispatchError {
    fn from(e: ModelError) -> Self {
        Self::Model(e)
    }
}

/// The pure selection/invocation boundary between the engine and the
/// registered flow models.
///
/// Performs no propagation logic itself: [`dispatch`](Self::dispatch)
/// looks up the registered implementation for a kind and invokes it
/// against the graph. Registration happens once per run; the
/// reference model crate provides a fully-populated registry.
#[derive(Default)]
pub struct Dispatcher {
    models: IndexMap<FlowModelKind, Box<dyn FlowModel>>,
}

impl Dispatcher {
    /// An empty dispatcher with no registered models.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the implementation for a model kind, replacing any
    /// previous registration.
    pub fn register(&mut self, kind: FlowModelKind, model: Box<dyn FlowModel>) {
        self.models.insert(kind, model);
    }

    /// `true` when an implementation is registered for `kind`.
    pub fn supports(&self, kind: FlowModelKind) -> bool {
        self.models.contains_key(&kind)
    }

    /// Select and invoke the model registered for `kind`.
    pub fn dispatch(
        &self,
        kind: FlowModelKind,
        graph: &LocationGraph,
        ctx: &RunContext,
    ) -> Result<(), DispatchError> {
        let model = self
            .models
            .get(&kind)
            .ok_or_else(|| DispatchError::UnsupportedModel {
                name: kind.as_str().to_string(),
            })?;
        model.propagate(graph, ctx)?;
        Ok(())
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registered", &self.models.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowscape_core::RunConfig;
    use flowscape_space::zero_layer;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn empty_graph(rows: u32, cols: u32) -> LocationGraph {
        let zero = zero_layer(rows, cols).unwrap();
        LocationGraph::build(&zero, &zero, &zero, &IndexMap::new()).unwrap()
    }

    struct CountingModel {
        invocations: Arc<AtomicUsize>,
    }

    impl CountingModel {
        fn new() -> Self {
            Self {
                invocations: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn invocations(&self) -> Arc<AtomicUsize> {
            Arc::clone(&self.invocations)
        }
    }

    impl FlowModel for CountingModel {
        fn name(&self) -> &str {
            "counting"
        }

        fn propagate(&self, _graph: &LocationGraph, _ctx: &RunContext) -> Result<(), ModelError> {
            self.invocations.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn parse_recognizes_all_kinds() {
        for kind in FlowModelKind::ALL {
            assert_eq!(kind.as_str().parse::<FlowModelKind>().unwrap(), kind);
        }
    }

    #[test]
    fn parse_rejects_unknown_name() {
        match "Unknown".parse::<FlowModelKind>() {
            Err(DispatchError::UnsupportedModel { name }) => assert_eq!(name, "Unknown"),
            other => panic!("expected UnsupportedModel, got {other:?}"),
        }
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert!("proximity".parse::<FlowModelKind>().is_err());
    }

    #[test]
    fn dispatch_unregistered_kind_fails() {
        let dispatcher = Dispatcher::new();
        let graph = empty_graph(2, 2);
        let ctx = RunContext::new(RunConfig::default(), 2, 2);
        match dispatcher.dispatch(FlowModelKind::Proximity, &graph, &ctx) {
            Err(DispatchError::UnsupportedModel { name }) => assert_eq!(name, "Proximity"),
            other => panic!("expected UnsupportedModel, got {other:?}"),
        }
    }

    #[test]
    fn dispatch_invokes_registered_model() {
        let mut dispatcher = Dispatcher::new();
        let model = CountingModel::new();
        let invocations = model.invocations();
        dispatcher.register(FlowModelKind::Proximity, Box::new(model));
        let graph = empty_graph(2, 2);
        let ctx = RunContext::new(RunConfig::default(), 2, 2);
        dispatcher
            .dispatch(FlowModelKind::Proximity, &graph, &ctx)
            .unwrap();
        assert_eq!(invocations.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn model_error_wraps_into_dispatch_error() {
        let err: DispatchError = ModelError::ExecutionFailed {
            reason: "no route".to_string(),
        }
        .into();
        assert!(matches!(err, DispatchError::Model(_)));
        assert!(format!("{err}").contains("no route"));
    }
}
