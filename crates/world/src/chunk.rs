use std::fmt;

use glam::IVec3;

use crate::material::{MaterialCategory, SharedAppearance};

/// Chunk coordinate (X,Z) in chunk space.
/// Implements Ord for deterministic iteration in BTreeMap/BTreeSet (sorts by x, then z).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Map a world-space column to the chunk containing it.
    ///
    /// Uses euclidean division so negative world coordinates floor toward
    /// negative infinity instead of truncating toward zero.
    pub fn from_world(world_x: i32, world_z: i32, chunk_size: i32) -> Self {
        Self {
            x: world_x.div_euclid(chunk_size),
            z: world_z.div_euclid(chunk_size),
        }
    }

    /// World-space column of this chunk's minimum corner.
    pub fn origin(self, chunk_size: i32) -> (i32, i32) {
        (self.x * chunk_size, self.z * chunk_size)
    }

    /// Chebyshev distance to another chunk, in chunks.
    pub fn chebyshev_distance(self, other: ChunkCoord) -> i32 {
        let dx = (self.x - other.x).abs();
        let dz = (self.z - other.z).abs();
        dx.max(dz)
    }

    /// True when the world column lies inside this chunk's footprint.
    pub fn contains_column(self, world_x: i32, world_z: i32, chunk_size: i32) -> bool {
        ChunkCoord::from_world(world_x, world_z, chunk_size) == self
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// A placed voxel owned by its chunk.
#[derive(Debug, Clone)]
pub struct Block {
    /// World-space position.
    pub position: IVec3,
    /// Discrete material classification.
    pub category: MaterialCategory,
    /// Shared appearance resource resolved through the material cache.
    pub appearance: SharedAppearance,
}

impl Block {
    pub fn is_transparent(&self) -> bool {
        self.category.is_transparent()
    }
}

/// A generated square column of terrain, built and destroyed as a unit.
#[derive(Debug)]
pub struct Chunk {
    coord: ChunkCoord,
    blocks: Vec<Block>,
}

impl Chunk {
    pub fn new(coord: ChunkCoord, blocks: Vec<Block>) -> Self {
        Self { coord, blocks }
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// True when every block lies within this chunk's footprint.
    pub fn footprint_is_consistent(&self, chunk_size: i32) -> bool {
        self.blocks
            .iter()
            .all(|b| self.coord.contains_column(b.position.x, b.position.z, chunk_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_world_floors_toward_negative_infinity() {
        assert_eq!(ChunkCoord::from_world(0, 0, 16), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_world(15, 15, 16), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_world(16, 0, 16), ChunkCoord::new(1, 0));
        assert_eq!(ChunkCoord::from_world(-1, -1, 16), ChunkCoord::new(-1, -1));
        assert_eq!(ChunkCoord::from_world(-16, -17, 16), ChunkCoord::new(-1, -2));
    }

    #[test]
    fn origin_round_trips_through_from_world() {
        for coord in [
            ChunkCoord::new(0, 0),
            ChunkCoord::new(3, -2),
            ChunkCoord::new(-7, 11),
        ] {
            let (ox, oz) = coord.origin(16);
            assert_eq!(ChunkCoord::from_world(ox, oz, 16), coord);
            assert_eq!(ChunkCoord::from_world(ox + 15, oz + 15, 16), coord);
        }
    }

    #[test]
    fn chebyshev_distance_is_max_axis_delta() {
        let a = ChunkCoord::new(0, 0);
        assert_eq!(a.chebyshev_distance(ChunkCoord::new(3, 1)), 3);
        assert_eq!(a.chebyshev_distance(ChunkCoord::new(-2, -5)), 5);
        assert_eq!(a.chebyshev_distance(a), 0);
    }

    #[test]
    fn contains_column_matches_footprint() {
        let coord = ChunkCoord::new(-1, 0);
        assert!(coord.contains_column(-16, 0, 16));
        assert!(coord.contains_column(-1, 15, 16));
        assert!(!coord.contains_column(0, 0, 16));
        assert!(!coord.contains_column(-17, 0, 16));
    }

    #[test]
    fn coords_sort_by_x_then_z() {
        let mut coords = vec![
            ChunkCoord::new(1, 0),
            ChunkCoord::new(0, 1),
            ChunkCoord::new(0, 0),
            ChunkCoord::new(-1, 2),
        ];
        coords.sort();
        assert_eq!(
            coords,
            vec![
                ChunkCoord::new(-1, 2),
                ChunkCoord::new(0, 0),
                ChunkCoord::new(0, 1),
                ChunkCoord::new(1, 0),
            ]
        );
    }
}
