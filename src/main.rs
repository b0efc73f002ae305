//! voxelstream - chunk-streamed procedural voxel terrain
//!
//! Headless harness: drives the world streamer with a scripted observer.

mod config;
mod observer;
mod sim;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use std::env;

use anyhow::Context;
use tracing::info;

use observer::{ScriptedObserver, SolidCubeProvider, SpawnLifecycle};
use sim::SimOptions;
use voxelstream_world::{StreamerDeps, WorldStreamer};

fn main() -> anyhow::Result<ExitCode> {
    // Initialize tracing with INFO level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting voxelstream v{}", env!("CARGO_PKG_VERSION"));

    let cli = CliOptions::parse(env::args().skip(1));

    let mut world_config = match cli.config_path.as_deref() {
        Some(path) => config::load_from_path(path),
        None => config::load(),
    };
    if let Some(seed) = cli.world_seed {
        world_config.seed = seed;
    }
    if let Some(value) = cli.render_distance {
        world_config.render_distance = value.clamp(1, 16);
    }
    if let Some(workers) = cli.build_workers {
        world_config.build_workers = workers;
    }

    let observer = ScriptedObserver::new();
    let lifecycle = SpawnLifecycle::new(observer.clone());
    let deps = StreamerDeps {
        observer: observer.clone(),
        templates: Arc::new(SolidCubeProvider),
        lifecycle,
    };
    let mut streamer =
        WorldStreamer::ready(deps, world_config).context("world streamer failed to start")?;

    let options = SimOptions {
        max_ticks: cli.max_ticks.unwrap_or(1200),
        tick_interval: Duration::from_millis(cli.tick_ms.unwrap_or(0)),
        plunge_tick: cli.plunge_tick,
    };
    let summary = sim::run(&mut streamer, &observer, &options);

    if summary.converged {
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::error!("live chunk set did not converge before shutdown");
        Ok(ExitCode::FAILURE)
    }
}

#[derive(Debug, Default)]
struct CliOptions {
    config_path: Option<PathBuf>,
    world_seed: Option<u64>,
    max_ticks: Option<u64>,
    render_distance: Option<i32>,
    build_workers: Option<usize>,
    tick_ms: Option<u64>,
    plunge_tick: Option<u64>,
}

impl CliOptions {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> Self {
        let mut opts = CliOptions::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    if let Some(path) = args.next() {
                        opts.config_path = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--config requires a file path");
                    }
                }
                "--world-seed" => parse_value(&mut args, "--world-seed", &mut opts.world_seed),
                "--max-ticks" => parse_value(&mut args, "--max-ticks", &mut opts.max_ticks),
                "--render-distance" => {
                    parse_value(&mut args, "--render-distance", &mut opts.render_distance)
                }
                "--build-workers" => {
                    parse_value(&mut args, "--build-workers", &mut opts.build_workers)
                }
                "--tick-ms" => parse_value(&mut args, "--tick-ms", &mut opts.tick_ms),
                "--plunge-tick" => parse_value(&mut args, "--plunge-tick", &mut opts.plunge_tick),
                other => {
                    tracing::warn!("Ignoring unknown argument: {other}");
                }
            }
        }

        opts
    }
}

fn parse_value<I, T>(args: &mut I, flag: &str, slot: &mut Option<T>)
where
    I: Iterator<Item = String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match args.next() {
        Some(raw) => match raw.parse::<T>() {
            Ok(value) => *slot = Some(value),
            Err(err) => {
                tracing::error!(%err, value = %raw, "{flag} could not be parsed");
            }
        },
        None => {
            tracing::error!("{flag} requires a value");
        }
    }
}
