//! Terrain classification and chunk building.
//!
//! Builds one chunk at a time: a terrain block per column, water fill for
//! submerged columns, and an occasional tree above the water line.

use glam::IVec3;
use rand::Rng;
use thiserror::Error;
use tracing::{debug, instrument};

use voxelstream_core::chunk_rng;

use crate::chunk::{Block, Chunk, ChunkCoord};
use crate::config::WorldConfig;
use crate::heightfield::HeightField;
use crate::material::{MaterialCache, MaterialCategory, MaterialError};
use crate::trees::place_tree;

/// Per-column probability of rolling a tree.
const TREE_PROBABILITY: f64 = 0.02;

/// Heights below this sit under grass (see [`TerrainClassifier::classify`]).
const GRASS_CEILING: i32 = 8;

/// Heights below this sit under dirt; everything above is mountain stone.
const DIRT_CEILING: i32 = 12;

/// Total height-to-material mapping.
///
/// The five intervals partition the integer line: contiguous, gapless,
/// non-overlapping. Any `i32` classifies, however degenerate.
#[derive(Debug, Clone, Copy)]
pub struct TerrainClassifier {
    water_level: i32,
}

impl TerrainClassifier {
    pub fn new(water_level: i32) -> Self {
        Self { water_level }
    }

    pub fn classify(&self, int_height: i32) -> MaterialCategory {
        if int_height < self.water_level - 1 {
            MaterialCategory::Stone // submerged rock
        } else if int_height < self.water_level {
            MaterialCategory::Sand // shoreline
        } else if int_height < GRASS_CEILING {
            MaterialCategory::Grass
        } else if int_height < DIRT_CEILING {
            MaterialCategory::Dirt
        } else {
            MaterialCategory::Stone // mountain
        }
    }
}

/// Chunk build failures; no partially-built chunk ever escapes.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("material resolution failed: {0}")]
    Material(#[from] MaterialError),
}

/// Builds complete chunks from the height field.
///
/// Builds are pure functions of (world seed, chunk coordinate): the
/// per-chunk RNG makes a chunk's trees independent of build order and
/// worker assignment.
pub struct ChunkBuilder {
    world_seed: u64,
    chunk_size: i32,
    water_level: i32,
    height_field: HeightField,
    classifier: TerrainClassifier,
    materials: MaterialCache,
}

impl ChunkBuilder {
    pub fn new(world_seed: u64, config: &WorldConfig, materials: MaterialCache) -> Self {
        Self {
            world_seed,
            chunk_size: config.chunk_size,
            water_level: config.water_level,
            height_field: HeightField::new(world_seed, config.noise_scale, config.height_scale),
            classifier: TerrainClassifier::new(config.water_level),
            materials,
        }
    }

    pub fn height_field(&self) -> &HeightField {
        &self.height_field
    }

    pub fn classifier(&self) -> &TerrainClassifier {
        &self.classifier
    }

    /// Build the full block set for one chunk.
    #[instrument(skip(self), fields(coord = %coord, world_seed = self.world_seed))]
    pub fn build(&self, coord: ChunkCoord) -> Result<Chunk, BuildError> {
        let (start_x, start_z) = coord.origin(self.chunk_size);
        let mut rng = chunk_rng(self.world_seed, coord.x, coord.z);
        let mut blocks = Vec::new();

        for local_z in 0..self.chunk_size {
            for local_x in 0..self.chunk_size {
                let world_x = start_x + local_x;
                let world_z = start_z + local_z;

                let int_height = self.height_field.column_height(world_x, world_z);
                let category = self.classifier.classify(int_height);
                blocks.push(self.make_block(IVec3::new(world_x, int_height, world_z), category)?);

                if int_height < self.water_level {
                    // Terrain and water coexist at submerged columns.
                    blocks.push(self.make_block(
                        IVec3::new(world_x, self.water_level, world_z),
                        MaterialCategory::Water,
                    )?);
                }

                let roll = rng.gen::<f64>();
                if roll < TREE_PROBABILITY && int_height > self.water_level {
                    let anchor = IVec3::new(world_x, int_height + 1, world_z);
                    for (position, tree_category) in place_tree(anchor, &mut rng) {
                        // Clip to the footprint; neighbors grow their own trees.
                        if !coord.contains_column(position.x, position.z, self.chunk_size) {
                            continue;
                        }
                        blocks.push(self.make_block(position, tree_category)?);
                    }
                }
            }
        }

        debug!(blocks = blocks.len(), "chunk build complete");
        Ok(Chunk::new(coord, blocks))
    }

    fn make_block(&self, position: IVec3, category: MaterialCategory) -> Result<Block, BuildError> {
        let appearance = self.materials.resource_for(category)?;
        Ok(Block {
            position,
            category,
            appearance,
        })
    }
}
