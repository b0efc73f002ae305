//! Worker pool for chunk builds.
//!
//! Decouples "a chunk is needed" from "block until it is built": the
//! streamer submits coordinates and drains completions as they arrive.
//! There is no cancellation; submitted jobs run to completion and stale
//! results are discarded by the caller.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::trace;

use crate::chunk::{Chunk, ChunkCoord};
use crate::terrain::{BuildError, ChunkBuilder};

/// Result of one build job.
pub struct BuildOutcome {
    pub coord: ChunkCoord,
    pub result: Result<Chunk, BuildError>,
}

/// Fixed set of worker threads consuming chunk-coordinate jobs.
pub struct BuildPool {
    jobs: Sender<ChunkCoord>,
    completions: Receiver<BuildOutcome>,
    workers: Vec<JoinHandle<()>>,
}

impl BuildPool {
    /// Spawn `workers` threads running builds against the shared builder.
    pub fn spawn(builder: Arc<ChunkBuilder>, workers: usize) -> Self {
        let workers = workers.max(1);
        let (job_tx, job_rx) = unbounded::<ChunkCoord>();
        let (done_tx, done_rx) = unbounded::<BuildOutcome>();

        let handles = (0..workers)
            .map(|index| {
                let jobs = job_rx.clone();
                let completions = done_tx.clone();
                let builder = Arc::clone(&builder);
                thread::Builder::new()
                    .name(format!("chunk-build-{index}"))
                    .spawn(move || {
                        for coord in jobs.iter() {
                            trace!(%coord, "building chunk");
                            let result = builder.build(coord);
                            if completions.send(BuildOutcome { coord, result }).is_err() {
                                // Receiver dropped; the pool is shutting down.
                                break;
                            }
                        }
                    })
                    .expect("spawn chunk build worker")
            })
            .collect();

        Self {
            jobs: job_tx,
            completions: done_rx,
            workers: handles,
        }
    }

    /// Queue a coordinate for building.
    pub fn submit(&self, coord: ChunkCoord) {
        // Workers outlive the sender, so the channel cannot be closed here.
        self.jobs.send(coord).expect("build pool job channel closed");
    }

    /// Take one completed build, if any is ready.
    pub fn try_recv(&self) -> Option<BuildOutcome> {
        self.completions.try_recv().ok()
    }

    /// Wait up to `timeout` for one completed build.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<BuildOutcome> {
        self.completions.recv_timeout(timeout).ok()
    }

    /// Worker thread count.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }
}

impl Drop for BuildPool {
    fn drop(&mut self) {
        // Closing the job channel lets workers drain and exit.
        let (closed, _) = unbounded();
        self.jobs = closed;
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                tracing::warn!("chunk build worker panicked during shutdown");
            }
        }
    }
}
