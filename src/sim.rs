//! Fixed-cadence simulation loop driving the world streamer.

use std::time::Duration;

use tracing::info;
use voxelstream_core::SimTick;
use voxelstream_world::{StreamStats, WorldStreamer};

use crate::observer::ScriptedObserver;

/// How long to wait for outstanding builds after the last tick.
const FINAL_SETTLE: Duration = Duration::from_secs(30);

/// Parameters for one headless run.
pub struct SimOptions {
    /// Ticks to drive before settling.
    pub max_ticks: u64,
    /// Sleep between ticks; zero runs the simulation flat out.
    pub tick_interval: Duration,
    /// Tick at which the observer is dropped below the world, to exercise
    /// the respawn path.
    pub plunge_tick: Option<u64>,
}

/// What a run did, for the end-of-run summary.
pub struct RunSummary {
    pub ticks: SimTick,
    pub stats: StreamStats,
    pub final_live_chunks: usize,
    pub converged: bool,
}

/// Drive the streamer along the scripted patrol for `max_ticks` ticks,
/// then settle outstanding builds.
pub fn run(
    streamer: &mut WorldStreamer,
    observer: &ScriptedObserver,
    options: &SimOptions,
) -> RunSummary {
    let mut tick = SimTick::ZERO;
    for t in 0..options.max_ticks {
        if options.plunge_tick == Some(t) {
            observer.plunge();
        }
        observer.advance(t);
        streamer.tick();
        tick = tick.advance(1);

        if !options.tick_interval.is_zero() {
            std::thread::sleep(options.tick_interval);
        }
    }

    let converged = streamer.settle(FINAL_SETTLE);
    let summary = RunSummary {
        ticks: tick,
        stats: streamer.stats(),
        final_live_chunks: streamer.live_len(),
        converged,
    };
    info!(
        ticks = summary.ticks.0,
        built = summary.stats.built,
        destroyed = summary.stats.destroyed,
        failed = summary.stats.failed,
        reconciliations = summary.stats.reconciliations,
        respawns = summary.stats.respawns,
        live = summary.final_live_chunks,
        converged = summary.converged,
        "run complete"
    );
    summary
}
