//! Parallel isoline worker pool.
//!
//! Worker threads trace one isovalue each over a shared, read-only grid.
//! Results are sent via crossbeam channels back to the calling thread, which
//! rebuilds them in caller order.

use crossbeam::channel::{unbounded, Receiver, Sender};
use std::sync::Arc;

use crate::config::WorkerConfig;
use crate::error::{IsolineError, Result};
use crate::marching_squares::{trace_isovalue, Grid, IsolineCollection, IsolineMap};

/// One isovalue to trace, sent from the calling thread to a worker
pub struct IsolineRequest<'a> {
    /// Position of the isovalue in the caller's list.
    pub index: usize,
    pub isovalue: f64,
    pub grid: Arc<Grid<'a>>,
}

/// Result sent from a worker back to the calling thread
#[derive(Debug)]
pub struct IsolineResult {
    pub index: usize,
    pub isovalue: f64,
    pub outcome: Result<IsolineCollection>,
}

/// Worker pool for parallel isoline tracing
pub struct IsolineWorkerPool {
    pool: rayon::ThreadPool,
    thread_count: usize,
    batch_size: usize,
    result_tx: Sender<IsolineResult>,
    result_rx: Receiver<IsolineResult>,
}

impl IsolineWorkerPool {
    pub fn new(config: &WorkerConfig) -> Result<Self> {
        let threads = config.resolved_threads();
        let batch_size = config.batch_size.max(1);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("isoline-worker-{}", i))
            .build()?;

        // Unbounded so a batch of any size reports every request.
        let (result_tx, result_rx) = unbounded();

        log::debug!(
            "[IsolineWorkerPool] {} threads ({} cpus detected), batch size {}",
            threads,
            num_cpus::get(),
            batch_size
        );

        Ok(Self {
            pool,
            thread_count: threads,
            batch_size,
            result_tx,
            result_rx,
        })
    }

    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Runs one batch to completion. Every request produces exactly one
    /// result on the pool's channel, whatever the batch size.
    pub fn process_batch(&self, batch: Vec<IsolineRequest<'_>>) {
        if batch.is_empty() {
            return;
        }

        let result_tx = &self.result_tx;
        self.pool.scope(|scope| {
            for request in batch {
                let tx = result_tx.clone();
                scope.spawn(move |_| {
                    let outcome = trace_isovalue(&request.grid, request.isovalue);
                    let _ = tx.send(IsolineResult {
                        index: request.index,
                        isovalue: request.isovalue,
                        outcome,
                    });
                });
            }
        });
    }

    /// Traces every isovalue over `grid`. The returned map iterates in the
    /// order of `isovalues` regardless of which worker finished first.
    pub fn compute_iso_lines(&mut self, grid: Arc<Grid<'_>>, isovalues: &[f64]) -> Result<IsolineMap> {
        self.drain_stale();

        let mut slots: Vec<Option<IsolineResult>> = Vec::with_capacity(isovalues.len());
        slots.resize_with(isovalues.len(), || None);

        for (batch_index, chunk) in isovalues.chunks(self.batch_size).enumerate() {
            let first = batch_index * self.batch_size;
            let batch = chunk
                .iter()
                .enumerate()
                .map(|(offset, &isovalue)| IsolineRequest {
                    index: first + offset,
                    isovalue,
                    grid: Arc::clone(&grid),
                })
                .collect();

            self.process_batch(batch);

            let mut received = 0;
            for result in self.result_rx.try_iter() {
                if let Some(slot) = slots.get_mut(result.index) {
                    *slot = Some(result);
                    received += 1;
                }
            }
            log::trace!(
                "[IsolineWorkerPool] batch {}: {}/{} results",
                batch_index,
                received,
                chunk.len()
            );
        }

        assemble(slots)
    }

    /// Discards results left over from an earlier call.
    fn drain_stale(&mut self) {
        while self.result_rx.try_recv().is_ok() {}
    }
}

/// Rebuilds per-index results into a map in caller order. The earliest
/// failed isovalue decides the error; no partial map is returned.
fn assemble(slots: Vec<Option<IsolineResult>>) -> Result<IsolineMap> {
    let mut map = IsolineMap::with_capacity(slots.len());
    for slot in slots {
        let result = slot.ok_or(IsolineError::WorkerDisconnected)?;
        map.insert(result.isovalue, result.outcome?);
    }
    Ok(map)
}
