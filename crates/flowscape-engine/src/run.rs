//! The end-to-end scenario pipeline.

use crate::config::{ConfigError, ResultMode, ScenarioConfig};
use flowscape_core::RunConfig;
use flowscape_graph::LocationGraph;
use flowscape_model::RunContext;
use flowscape_models::standard_dispatcher;
use flowscape_results::{analyze, upsample_results, ResultConsumer, RunResults};
use flowscape_space::{
    downsample, downsample_directions, threshold, zero_layer, RvLayer, SpaceError,
    FLOW_DIRECTIONS_LAYER,
};
use indexmap::IndexMap;

/// A consumer that drops everything it is given.
///
/// Programmatic callers pass this when no interactive delivery is
/// wanted; the results come back as the return value instead.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiscardResults;

impl ResultConsumer for DiscardResults {
    fn consume(&mut self, _results: RunResults) {}
}

/// Run one scenario from native-resolution inputs to published
/// results.
///
/// The pipeline: validate the configuration, resample and threshold
/// every layer down to working resolution (synthesizing zero layers
/// for absent inputs), build the location graph, establish the run
/// context, dispatch the selected flow model, analyze the fifteen
/// result layers, and upsample them back to native resolution.
///
/// Delivery follows `result_type`: `Programmatic` returns
/// `Ok(Some(results))` and never touches `consumer`; `Interactive`
/// hands the results to `consumer` and returns `Ok(None)`.
///
/// One deterministic pass; a run either fails before the pipeline
/// starts or completes it.
pub fn run_scenario(
    config: &ScenarioConfig,
    consumer: &mut dyn ResultConsumer,
) -> Result<Option<RunResults>, ConfigError> {
    config.validate()?;

    let (rows, cols) = config.source_layer.dims();
    let factor = config.downscaling_factor;
    let max_states = config.rv_max_states;

    let prepare = |layer: &RvLayer, cutoff: f64| -> Result<RvLayer, SpaceError> {
        Ok(threshold(&downsample(layer, factor, max_states)?, cutoff))
    };
    let source = prepare(&config.source_layer, config.source_threshold)?;
    let (wrows, wcols) = source.dims();
    let sink = match &config.sink_layer {
        Some(layer) => prepare(layer, config.sink_threshold)?,
        None => zero_layer(wrows, wcols)?,
    };
    let usage = prepare(&config.use_layer, config.use_threshold)?;

    let mut features = IndexMap::with_capacity(config.flow_layers.len());
    for (name, layer) in &config.flow_layers {
        // Direction codes would be destroyed by expected-value
        // averaging; the reserved layer gets the vector aggregator.
        let working = if name == FLOW_DIRECTIONS_LAYER {
            downsample_directions(layer, factor)?
        } else {
            downsample(layer, factor, max_states)?
        };
        features.insert(name.clone(), working);
    }

    let graph = LocationGraph::build(&source, &sink, &usage, &features)?;
    let ctx = RunContext::new(
        RunConfig {
            rv_max_states: max_states,
            trans_threshold: config.trans_threshold,
            source_type: config.source_type,
            sink_type: config.sink_type,
            use_type: config.use_type,
            benefit_type: config.benefit_type,
        },
        wrows,
        wcols,
    );
    standard_dispatcher().dispatch(config.flow_model, &graph, &ctx)?;

    let working_results = analyze(&graph, &source, &sink, &usage);
    let layers = upsample_results(&working_results, factor, rows, cols)?;

    let native_sink = match &config.sink_layer {
        Some(layer) => layer.clone(),
        None => zero_layer(rows, cols)?,
    };
    let results = RunResults {
        layers,
        source: config.source_layer.clone(),
        sink: native_sink,
        usage: config.use_layer.clone(),
        flow_layers: config.flow_layers.clone(),
    };

    match config.result_type {
        ResultMode::Programmatic => Ok(Some(results)),
        ResultMode::Interactive => {
            consumer.consume(results);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowscape_core::Cell;
    use flowscape_results::{SOURCE_THEORETICAL, USE_ACTUAL};
    use flowscape_test_utils::rv_layer;

    fn diagonal_config() -> ScenarioConfig {
        ScenarioConfig {
            source_layer: rv_layer(vec![vec![5.0, 0.0], vec![0.0, 0.0]]),
            use_layer: rv_layer(vec![vec![0.0, 0.0], vec![0.0, 5.0]]),
            ..ScenarioConfig::default()
        }
    }

    #[test]
    fn programmatic_run_returns_results() {
        let results = run_scenario(&diagonal_config(), &mut DiscardResults)
            .unwrap()
            .expect("programmatic mode returns results");
        assert_eq!(*results.layers[SOURCE_THEORETICAL].get(Cell::new(0, 0)).unwrap(), 5.0);
        assert!((results.layers[USE_ACTUAL].get(Cell::new(1, 1)).unwrap() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn interactive_run_feeds_the_consumer() {
        struct Recording(Option<RunResults>);
        impl ResultConsumer for Recording {
            fn consume(&mut self, results: RunResults) {
                self.0 = Some(results);
            }
        }

        let config = ScenarioConfig {
            result_type: ResultMode::Interactive,
            ..diagonal_config()
        };
        let mut consumer = Recording(None);
        let returned = run_scenario(&config, &mut consumer).unwrap();
        assert!(returned.is_none());
        let results = consumer.0.expect("consumer received results");
        assert_eq!(results.layers.len(), 15);
    }

    #[test]
    fn invalid_config_fails_before_any_work() {
        let config = ScenarioConfig {
            trans_threshold: -1.0,
            ..diagonal_config()
        };
        assert!(matches!(
            run_scenario(&config, &mut DiscardResults),
            Err(ConfigError::InvalidTransThreshold { .. })
        ));
    }
}
