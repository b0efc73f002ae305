//! Observer-driven chunk streaming.
//!
//! Tracks the observer's chunk coordinate and incrementally reconciles the
//! live chunk set against the square neighborhood around it: newly-needed
//! chunks are submitted to the build pool, stale chunks are destroyed, and
//! completed builds are drained as they arrive.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::Vec3;
use thiserror::Error;
use tracing::{debug, info, trace, warn};

use voxelstream_core::resolve_seed;

use crate::chunk::{Chunk, ChunkCoord};
use crate::config::{ConfigError, WorldConfig};
use crate::material::{BlockTemplateProvider, MaterialCache};
use crate::pool::{BuildOutcome, BuildPool};
use crate::terrain::ChunkBuilder;

/// Observer Y below which a respawn is requested.
pub const RESPAWN_Y: f32 = -10.0;

/// Where the streamer reads the observer's world position from.
///
/// The source may briefly have no position (e.g. respawn in progress);
/// such ticks are skipped.
pub trait ObserverSource: Send + Sync {
    fn position(&self) -> Option<Vec3>;
}

/// Receives respawn requests when the observer falls out of the world.
///
/// The streamer only signals; repositioning the observer is the
/// collaborator's job, as is debouncing repeated signals.
pub trait PlayerLifecycle: Send + Sync {
    fn request_respawn(&self);
}

/// Injected collaborators, supplied once at startup.
pub struct StreamerDeps {
    pub observer: Arc<dyn ObserverSource>,
    pub templates: Arc<dyn BlockTemplateProvider>,
    pub lifecycle: Arc<dyn PlayerLifecycle>,
}

/// Startup failures. The orchestrating layer owns any retry loop.
#[derive(Debug, Error)]
pub enum ReadyError {
    #[error("observer position source has no position yet")]
    ObserverUnavailable,
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
}

/// Streaming counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamStats {
    /// Chunks inserted into the live set.
    pub built: u64,
    /// Chunks destroyed after leaving the needed set.
    pub destroyed: u64,
    /// Builds that failed and await resubmission.
    pub failed: u64,
    /// Completed builds dropped because they were no longer needed.
    pub discarded: u64,
    /// Reconciliation passes run.
    pub reconciliations: u64,
    /// Respawn requests signalled.
    pub respawns: u64,
}

/// The square neighborhood of chunks within Chebyshev `render_distance`
/// of `center`.
pub fn needed_set(center: ChunkCoord, render_distance: i32) -> BTreeSet<ChunkCoord> {
    let mut needed = BTreeSet::new();
    for x in -render_distance..=render_distance {
        for z in -render_distance..=render_distance {
            needed.insert(ChunkCoord::new(center.x + x, center.z + z));
        }
    }
    needed
}

/// Top-level streaming controller.
///
/// Between a reconciliation and the completion of its builds the live set
/// is a subset of the needed set; once pending builds drain (see
/// [`WorldStreamer::settle`]) the two are equal.
pub struct WorldStreamer {
    config: WorldConfig,
    world_seed: u64,
    observer: Arc<dyn ObserverSource>,
    lifecycle: Arc<dyn PlayerLifecycle>,
    pool: BuildPool,
    live: BTreeMap<ChunkCoord, Chunk>,
    pending: BTreeSet<ChunkCoord>,
    failed: BTreeSet<ChunkCoord>,
    current_chunk: ChunkCoord,
    last_position: Vec3,
    distance_moved: f32,
    stats: StreamStats,
}

impl WorldStreamer {
    /// Two-phase startup: validates the configuration, resolves the world
    /// seed, and fails fast if the observer has no position yet.
    ///
    /// On success the initial neighborhood is already submitted for
    /// building; call [`Self::settle`] to block until it is live.
    pub fn ready(deps: StreamerDeps, config: WorldConfig) -> Result<Self, ReadyError> {
        config.validate()?;

        let position = deps
            .observer
            .position()
            .ok_or(ReadyError::ObserverUnavailable)?;

        let world_seed = resolve_seed(config.seed);
        let materials = MaterialCache::new(deps.templates);
        let builder = Arc::new(ChunkBuilder::new(world_seed, &config, materials));
        let pool = BuildPool::spawn(builder, config.effective_workers());

        let current_chunk = Self::chunk_at(position, config.chunk_size);
        info!(
            world_seed,
            %current_chunk,
            render_distance = config.render_distance,
            workers = pool.worker_count(),
            "world streamer ready"
        );

        let mut streamer = Self {
            config,
            world_seed,
            observer: deps.observer,
            lifecycle: deps.lifecycle,
            pool,
            live: BTreeMap::new(),
            pending: BTreeSet::new(),
            failed: BTreeSet::new(),
            current_chunk,
            last_position: position,
            distance_moved: 0.0,
            stats: StreamStats::default(),
        };
        streamer.reconcile();
        Ok(streamer)
    }

    /// Advance one tick: track the observer, reconcile on chunk crossings
    /// or accumulated movement, and drain completed builds.
    pub fn tick(&mut self) {
        let Some(position) = self.observer.position() else {
            trace!("observer position unavailable; skipping tick");
            return;
        };

        if position.y < RESPAWN_Y {
            warn!(y = position.y, "observer fell below the world; requesting respawn");
            self.stats.respawns += 1;
            self.lifecycle.request_respawn();
        }

        self.distance_moved += position.distance(self.last_position);
        self.last_position = position;

        let chunk = Self::chunk_at(position, self.config.chunk_size);
        let movement_threshold = self.config.chunk_size as f32 / 2.0;
        if chunk != self.current_chunk || self.distance_moved > movement_threshold {
            debug!(from = %self.current_chunk, to = %chunk, "reconciliation triggered");
            self.current_chunk = chunk;
            self.distance_moved = 0.0;
            self.reconcile();
        }

        self.drain_completions();
        self.check_consistency();
    }

    /// Block until no builds are pending or `timeout` elapses.
    ///
    /// Returns true when the live set equals the needed set on return.
    /// Useful after startup and teleports, where the caller wants the
    /// strict postcondition rather than eventual convergence.
    pub fn settle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while !self.pending.is_empty() {
            let Some(remaining) = deadline.checked_duration_since(Instant::now()) else {
                break;
            };
            match self.pool.recv_timeout(remaining) {
                Some(outcome) => self.apply_outcome(outcome),
                None => break,
            }
        }
        self.check_consistency();
        self.is_converged()
    }

    /// True when every needed chunk is live and nothing else is.
    pub fn is_converged(&self) -> bool {
        let needed = needed_set(self.current_chunk, self.config.render_distance);
        self.pending.is_empty()
            && self.live.len() == needed.len()
            && needed.iter().all(|coord| self.live.contains_key(coord))
    }

    /// Chunk coordinate the observer currently occupies.
    pub fn current_chunk(&self) -> ChunkCoord {
        self.current_chunk
    }

    /// Resolved world seed (never 0).
    pub fn world_seed(&self) -> u64 {
        self.world_seed
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    /// Coordinates of currently live chunks, in deterministic order.
    pub fn live_coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.live.keys().copied()
    }

    pub fn live_len(&self) -> usize {
        self.live.len()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Fetch a live chunk.
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.live.get(&coord)
    }

    fn chunk_at(position: Vec3, chunk_size: i32) -> ChunkCoord {
        ChunkCoord::from_world(
            position.x.floor() as i32,
            position.z.floor() as i32,
            chunk_size,
        )
    }

    /// Diff the live set against a single snapshot of the needed set:
    /// destroy stale chunks, submit builds for missing ones.
    fn reconcile(&mut self) {
        let needed = needed_set(self.current_chunk, self.config.render_distance);

        let stale: Vec<ChunkCoord> = self
            .live
            .keys()
            .filter(|coord| !needed.contains(coord))
            .copied()
            .collect();
        for coord in stale {
            self.live.remove(&coord);
            self.stats.destroyed += 1;
            debug!(%coord, "destroyed chunk outside render distance");
        }
        self.failed.retain(|coord| needed.contains(coord));

        for &coord in &needed {
            if !self.live.contains_key(&coord) && !self.pending.contains(&coord) {
                self.failed.remove(&coord);
                self.pending.insert(coord);
                self.pool.submit(coord);
            }
        }

        self.stats.reconciliations += 1;
    }

    fn drain_completions(&mut self) {
        while let Some(outcome) = self.pool.try_recv() {
            self.apply_outcome(outcome);
        }
    }

    fn apply_outcome(&mut self, outcome: BuildOutcome) {
        let coord = outcome.coord;
        self.pending.remove(&coord);
        match outcome.result {
            Ok(chunk) => {
                let still_needed = coord.chebyshev_distance(self.current_chunk)
                    <= self.config.render_distance;
                if !still_needed || self.live.contains_key(&coord) {
                    self.stats.discarded += 1;
                    debug!(%coord, "discarding stale chunk build");
                } else {
                    debug!(%coord, blocks = chunk.block_count(), "chunk live");
                    self.live.insert(coord, chunk);
                    self.stats.built += 1;
                }
            }
            Err(err) => {
                self.failed.insert(coord);
                self.stats.failed += 1;
                warn!(%coord, error = %err, "chunk build failed; retrying on next reconciliation");
            }
        }
    }

    /// The event-driven trigger path alone must keep the bookkeeping
    /// coherent; no periodic forced reconciliation exists to paper over
    /// missed triggers.
    fn check_consistency(&self) {
        if cfg!(debug_assertions) {
            let needed = needed_set(self.current_chunk, self.config.render_distance);
            debug_assert!(
                self.live.keys().all(|coord| needed.contains(coord)),
                "live chunk outside the needed set"
            );
            debug_assert!(
                needed.iter().all(|coord| {
                    self.live.contains_key(coord)
                        || self.pending.contains(coord)
                        || self.failed.contains(coord)
                }),
                "needed coordinate neither live, pending, nor awaiting retry"
            );
            debug_assert!(
                self.live.keys().all(|coord| !self.pending.contains(coord)),
                "coordinate both live and pending"
            );
        }
    }
}
