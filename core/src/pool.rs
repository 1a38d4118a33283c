//! Bounded concurrent execution of probe work.
//!
//! Work is cut into batches. Within a batch at most `max_workers` items are in flight;
//! a batch is drained completely before the next one is started, which keeps the number
//! of live sockets and pending futures flat no matter how large the scan is.

use std::future::Future;

use tokio::task::JoinSet;
use tracing::debug;

/// Completion count reported to progress observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub completed: usize,
    /// Tasks that panicked or were cancelled. Their items produced no result.
    pub failed: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    max_workers: usize,
    batch_size: usize,
    progress_every: usize,
}

impl WorkerPool {
    /// All three knobs are clamped to at least one.
    pub fn new(max_workers: usize, batch_size: usize, progress_every: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
            batch_size: batch_size.max(1),
            progress_every: progress_every.max(1),
        }
    }

    /// Runs `work` on every item and hands each output to `on_result`.
    ///
    /// `on_result` and `on_progress` run on the calling task only, so they may hold
    /// exclusive state without locking. Progress fires every `progress_every`
    /// completions and once more on the final one. `total` is only used for progress.
    pub async fn run<I, T, W, Fut, R, P>(
        &self,
        items: impl IntoIterator<Item = I>,
        total: usize,
        work: W,
        mut on_result: R,
        mut on_progress: P,
    ) -> PoolStats
    where
        W: Fn(I) -> Fut,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
        R: FnMut(T),
        P: FnMut(Progress),
    {
        let mut stats = PoolStats::default();
        let mut items = items.into_iter();

        loop {
            let batch: Vec<I> = items.by_ref().take(self.batch_size).collect();
            if batch.is_empty() {
                break;
            }
            debug!("starting batch of {} items", batch.len());

            let mut pending = batch.into_iter();
            let mut in_flight: JoinSet<T> = JoinSet::new();
            loop {
                while in_flight.len() < self.max_workers {
                    match pending.next() {
                        Some(item) => {
                            in_flight.spawn(work(item));
                        }
                        None => break,
                    }
                }

                let Some(joined) = in_flight.join_next().await else {
                    break;
                };
                stats.completed += 1;
                match joined {
                    Ok(output) => on_result(output),
                    Err(e) => {
                        debug!("worker task failed: {e}");
                        stats.failed += 1;
                    }
                }

                if stats.completed % self.progress_every == 0 || stats.completed == total {
                    on_progress(Progress {
                        completed: stats.completed,
                        total,
                    });
                }
            }
        }

        stats
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
