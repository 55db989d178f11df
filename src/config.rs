//! Sizing for the parallel isoline worker pool.
//! The sequential entry point needs no configuration.

/// Fraction of detected CPUs to use for worker threads (numerator).
const THREAD_CPU_NUMERATOR: usize = 3;
/// Fraction of detected CPUs to use for worker threads (denominator).
const THREAD_CPU_DENOMINATOR: usize = 4;
/// Minimum number of worker threads.
const MIN_WORKER_THREADS: usize = 2;
/// Default number of isovalues dispatched per batch.
const DEFAULT_BATCH_SIZE: usize = 256;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Worker thread count; 0 picks a count from the detected CPUs.
    pub num_threads: usize,
    /// Isovalues dispatched to the pool before results are drained.
    pub batch_size: usize,
}

impl WorkerConfig {
    pub fn new(num_threads: usize, batch_size: usize) -> Self {
        Self {
            num_threads,
            batch_size: batch_size.max(1),
        }
    }

    pub fn with_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Thread count the pool will actually use.
    pub fn resolved_threads(&self) -> usize {
        if self.num_threads == 0 {
            ((num_cpus::get() * THREAD_CPU_NUMERATOR) / THREAD_CPU_DENOMINATOR)
                .max(MIN_WORKER_THREADS)
        } else {
            self.num_threads
        }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self::new(0, DEFAULT_BATCH_SIZE)
    }
}
