//! Property tests for terrain classification and height sampling.

use proptest::prelude::*;
use voxelstream_world::{HeightField, MaterialCategory, TerrainClassifier};

proptest! {
    /// Every integer height maps to exactly one category, and the category
    /// matches the interval the height falls in: the five intervals
    /// partition the integer line with no gaps and no overlaps.
    #[test]
    fn classification_partitions_the_height_line(height in any::<i32>()) {
        let water_level = 3;
        let classifier = TerrainClassifier::new(water_level);
        let category = classifier.classify(height);

        let expected = if height < water_level - 1 {
            MaterialCategory::Stone
        } else if height < water_level {
            MaterialCategory::Sand
        } else if height < 8 {
            MaterialCategory::Grass
        } else if height < 12 {
            MaterialCategory::Dirt
        } else {
            MaterialCategory::Stone
        };
        prop_assert_eq!(category, expected);
    }

    /// Neighboring heights never skip over an interval: walking the height
    /// line visits Stone, Sand, Grass, Dirt, Stone in order.
    #[test]
    fn classification_is_contiguous(height in -64i32..64) {
        let classifier = TerrainClassifier::new(3);
        let here = classifier.classify(height);
        let above = classifier.classify(height + 1);
        let allowed = matches!(
            (here, above),
            (MaterialCategory::Stone, MaterialCategory::Stone)
                | (MaterialCategory::Stone, MaterialCategory::Sand)
                | (MaterialCategory::Sand, MaterialCategory::Grass)
                | (MaterialCategory::Grass, MaterialCategory::Grass)
                | (MaterialCategory::Grass, MaterialCategory::Dirt)
                | (MaterialCategory::Dirt, MaterialCategory::Dirt)
                | (MaterialCategory::Dirt, MaterialCategory::Stone)
        );
        prop_assert!(allowed, "jump from {:?} to {:?} at height {}", here, above, height);
    }

    /// Two independently constructed height fields agree bit-for-bit.
    #[test]
    fn height_sampling_is_deterministic(
        seed in any::<u64>(),
        x in -10_000i32..10_000,
        z in -10_000i32..10_000,
    ) {
        let a = HeightField::new(seed, 20.0, 10.0);
        let b = HeightField::new(seed, 20.0, 10.0);
        prop_assert_eq!(a.height(x, z), b.height(x, z));
        prop_assert_eq!(a.column_height(x, z), b.column_height(x, z));
    }

    /// Heights stay within the envelope implied by the octave amplitudes.
    #[test]
    fn height_envelope_holds(
        seed in any::<u64>(),
        x in -10_000i32..10_000,
        z in -10_000i32..10_000,
    ) {
        let hf = HeightField::new(seed, 20.0, 10.0);
        let h = hf.height(x, z);
        prop_assert!((-0.01..=12.01).contains(&h), "height {} out of envelope", h);
    }
}
