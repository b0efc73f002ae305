use serde::{Deserialize, Serialize};
use thiserror::Error;

/// World generation and streaming configuration, immutable after startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorldConfig {
    /// World seed; 0 means "generate a random seed" at startup.
    pub seed: u64,
    /// Edge length of a chunk's square footprint, in world columns.
    pub chunk_size: i32,
    /// Chebyshev radius, in chunks, kept live around the observer.
    pub render_distance: i32,
    /// Horizontal scale of the base noise octave.
    pub noise_scale: f64,
    /// Vertical amplitude of the base noise octave.
    pub height_scale: f64,
    /// Height of the water surface; submerged columns get a water block here.
    pub water_level: i32,
    /// Build pool worker count; 0 selects the default of one worker.
    pub build_workers: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            chunk_size: 16,
            render_distance: 3,
            noise_scale: 20.0,
            height_scale: 10.0,
            water_level: 3,
            build_workers: 0,
        }
    }
}

impl WorldConfig {
    /// Reject configurations the streamer cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size <= 0 {
            return Err(ConfigError::ChunkSize(self.chunk_size));
        }
        if self.render_distance < 0 {
            return Err(ConfigError::RenderDistance(self.render_distance));
        }
        if !(self.noise_scale > 0.0) {
            return Err(ConfigError::NoiseScale(self.noise_scale));
        }
        Ok(())
    }

    /// Effective worker count (0 falls back to a single worker).
    pub fn effective_workers(&self) -> usize {
        self.build_workers.max(1)
    }
}

/// Invalid configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("chunk_size must be positive, got {0}")]
    ChunkSize(i32),
    #[error("render_distance must be non-negative, got {0}")]
    RenderDistance(i32),
    #[error("noise_scale must be positive, got {0}")]
    NoiseScale(f64),
}
