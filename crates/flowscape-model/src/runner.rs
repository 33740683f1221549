//! Worker fan-out over active source locations.
//!
//! Propagation is embarrassingly parallel over sources: each source
//! cell's traversal is independent, and carrier caches accept
//! concurrent appends. Models hand their per-source traversal to
//! [`for_each_active_source`], which fans the active source cells out
//! to a scoped worker pool over a channel.

use crossbeam_channel::bounded;
use flowscape_core::{Cell, ModelError};
use flowscape_graph::LocationGraph;
use std::sync::Mutex;
use std::thread;

/// Resolve the worker count for a parallel traversal.
///
/// `None` auto-detects from `available_parallelism`; explicit values
/// are clamped to `[1, 64]`. Never zero — a zero-worker pool would
/// silently propagate nothing.
pub fn resolved_worker_count(requested: Option<usize>) -> usize {
    match requested {
        Some(n) => n.clamp(1, 64),
        None => thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
            .clamp(1, 16),
    }
}

/// Run `visit` once per active source location (mean source value
/// above zero), distributed across `workers` threads.
///
/// Visit order is unspecified; traversals must be order-independent.
/// The first error any worker reports is returned after all workers
/// drain.
pub fn for_each_active_source<F>(
    graph: &LocationGraph,
    workers: usize,
    visit: F,
) -> Result<(), ModelError>
where
    F: Fn(Cell) -> Result<(), ModelError> + Send + Sync,
{
    let active: Vec<Cell> = graph
        .iter()
        .filter(|loc| loc.source.mean() > 0.0)
        .map(|loc| loc.cell)
        .collect();
    if active.is_empty() {
        return Ok(());
    }
    let workers = workers.clamp(1, active.len());

    let (tx, rx) = bounded::<Cell>(active.len());
    for cell in active {
        tx.send(cell).expect("bounded queue sized to worklist");
    }
    drop(tx);

    let first_error: Mutex<Option<ModelError>> = Mutex::new(None);
    thread::scope(|scope| {
        for _ in 0..workers {
            let rx = rx.clone();
            let visit = &visit;
            let first_error = &first_error;
            scope.spawn(move || {
                while let Ok(cell) = rx.recv() {
                    if let Err(e) = visit(cell) {
                        let mut slot = first_error.lock().expect("error slot poisoned");
                        slot.get_or_insert(e);
                    }
                }
            });
        }
    });

    match first_error.into_inner().expect("error slot poisoned") {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowscape_core::RandVar;
    use flowscape_space::{zero_layer, Layer};
    use indexmap::IndexMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn graph_with_sources(source: Vec<Vec<f64>>) -> LocationGraph {
        let source = Layer::from_rows(
            source
                .into_iter()
                .map(|row| row.into_iter().map(RandVar::scalar).collect())
                .collect(),
        )
        .unwrap();
        let (rows, cols) = source.dims();
        let zero = zero_layer(rows, cols).unwrap();
        LocationGraph::build(&source, &zero, &zero, &IndexMap::new()).unwrap()
    }

    #[test]
    fn worker_count_clamps() {
        assert_eq!(resolved_worker_count(Some(0)), 1);
        assert_eq!(resolved_worker_count(Some(500)), 64);
        let auto = resolved_worker_count(None);
        assert!((1..=16).contains(&auto));
    }

    #[test]
    fn visits_each_active_source_once() {
        let graph = graph_with_sources(vec![vec![1.0, 0.0], vec![2.0, 3.0]]);
        let visits = AtomicUsize::new(0);
        for_each_active_source(&graph, 4, |cell| {
            assert!(graph.get(cell).unwrap().source.mean() > 0.0);
            visits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .unwrap();
        assert_eq!(visits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn no_active_sources_is_a_no_op() {
        let graph = graph_with_sources(vec![vec![0.0; 3]; 3]);
        for_each_active_source(&graph, 4, |_| {
            panic!("no source should be visited");
        })
        .unwrap();
    }

    #[test]
    fn first_worker_error_surfaces() {
        let graph = graph_with_sources(vec![vec![1.0, 1.0]]);
        let result = for_each_active_source(&graph, 2, |cell| {
            Err(ModelError::InvalidWeight { cell })
        });
        assert!(matches!(result, Err(ModelError::InvalidWeight { .. })));
    }
}
