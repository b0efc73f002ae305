//! Procedural tree stamping.
//!
//! Emits the trunk and canopy cells for one tree around an anchor column.
//! Whether a tree is placed at all is the chunk builder's decision; this
//! module only decides shape.

use glam::IVec3;
use rand::Rng;

use crate::material::MaterialCategory;

/// Trunk height range in blocks (upper bound exclusive).
const TRUNK_HEIGHT_RANGE: std::ops::Range<i32> = 3..6;

/// Canopy radius range in blocks (upper bound exclusive).
const CANOPY_RADIUS_RANGE: std::ops::Range<i32> = 2..4;

/// Stamp one tree anchored at `anchor` (the block above ground level).
///
/// The trunk stacks vertically from the anchor; the canopy is the upper half
/// of a sphere whose base plane sits on the trunk's top block. The offset
/// coinciding with the trunk top is skipped so the trunk stays visible.
pub fn place_tree(anchor: IVec3, rng: &mut impl Rng) -> Vec<(IVec3, MaterialCategory)> {
    let trunk_height = rng.gen_range(TRUNK_HEIGHT_RANGE);
    let radius = rng.gen_range(CANOPY_RADIUS_RANGE);

    let mut cells = Vec::new();

    for y in 0..trunk_height {
        cells.push((anchor + IVec3::new(0, y, 0), MaterialCategory::TreeTrunk));
    }

    let canopy_base = trunk_height - 1;
    for dx in -radius..=radius {
        for dz in -radius..=radius {
            for dy in 0..radius {
                if dx * dx + dy * dy + dz * dz > radius * radius {
                    continue;
                }
                if dx == 0 && dy == 0 && dz == 0 {
                    // Trunk top already occupies this cell.
                    continue;
                }
                cells.push((
                    anchor + IVec3::new(dx, canopy_base + dy, dz),
                    MaterialCategory::TreeLeaf,
                ));
            }
        }
    }

    cells
}
