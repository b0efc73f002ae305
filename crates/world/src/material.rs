//! Material categories and the shared appearance cache.
//!
//! Appearances are keyed by the discrete [`MaterialCategory`] so lookup never
//! depends on floating-point color comparisons.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Render queue position for opaque geometry.
const RENDER_ORDER_OPAQUE: i32 = 2000;

/// Render queue position for alpha-blended geometry (drawn after opaques).
const RENDER_ORDER_TRANSPARENT: i32 = 3000;

/// Discrete terrain/material classification driving appearance selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MaterialCategory {
    Grass,
    Dirt,
    Stone,
    Water,
    Sand,
    TreeTrunk,
    TreeLeaf,
}

impl MaterialCategory {
    /// Get all categories (for iteration).
    pub fn all() -> &'static [MaterialCategory] {
        &[
            MaterialCategory::Grass,
            MaterialCategory::Dirt,
            MaterialCategory::Stone,
            MaterialCategory::Water,
            MaterialCategory::Sand,
            MaterialCategory::TreeTrunk,
            MaterialCategory::TreeLeaf,
        ]
    }

    /// Water is the only transparent category.
    pub fn is_transparent(self) -> bool {
        matches!(self, MaterialCategory::Water)
    }

    /// Base RGBA color for this category.
    pub fn base_color(self) -> [f32; 4] {
        match self {
            MaterialCategory::Grass => [0.4, 0.7, 0.2, 1.0],
            MaterialCategory::Dirt => [0.6, 0.4, 0.2, 1.0],
            MaterialCategory::Stone => [0.5, 0.5, 0.5, 1.0],
            MaterialCategory::Water => [0.2, 0.4, 0.8, 0.7],
            MaterialCategory::Sand => [0.9, 0.8, 0.5, 1.0],
            MaterialCategory::TreeTrunk => [0.3, 0.2, 0.1, 1.0],
            MaterialCategory::TreeLeaf => [0.2, 0.5, 0.1, 1.0],
        }
    }
}

/// Renderable appearance derived from a category.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockAppearance {
    /// RGBA tint applied to the block template.
    pub color: [f32; 4],
    /// Alpha-blended rendering.
    pub transparent: bool,
    /// Whether the depth buffer is written (off for transparents).
    pub depth_write: bool,
    /// Render queue position.
    pub render_order: i32,
}

/// Appearance handle shared by every block of a category.
pub type SharedAppearance = Arc<BlockAppearance>;

/// Base primitive the cache recolors per category.
#[derive(Debug, Clone)]
pub struct BlockTemplate {
    /// Untinted base color of the shared cube primitive.
    pub base_color: [f32; 4],
}

/// Supplies the renderable primitive chunk builds instantiate.
///
/// May be unavailable (e.g. before assets finish loading); callers treat
/// `None` as a per-attempt failure and retry later.
pub trait BlockTemplateProvider: Send + Sync {
    fn template(&self) -> Option<BlockTemplate>;
}

/// Material resolution failures.
#[derive(Debug, Error)]
pub enum MaterialError {
    /// The shared block template is not available yet.
    #[error("block template provider has no template available")]
    TemplateUnavailable,
}

/// Lazy per-category appearance cache.
///
/// Entries are created on first use and live for the cache's lifetime.
/// Insertion is mutex-guarded because chunk builds run on worker threads.
pub struct MaterialCache {
    provider: Arc<dyn BlockTemplateProvider>,
    entries: Mutex<HashMap<MaterialCategory, SharedAppearance>>,
}

impl MaterialCache {
    pub fn new(provider: Arc<dyn BlockTemplateProvider>) -> Self {
        Self {
            provider,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Get or create the shared appearance for a category.
    ///
    /// Repeated calls for the same category return the same handle. A missing
    /// template yields an error and caches nothing.
    pub fn resource_for(&self, category: MaterialCategory) -> Result<SharedAppearance, MaterialError> {
        let mut entries = self.entries.lock().expect("material cache lock poisoned");
        if let Some(existing) = entries.get(&category) {
            return Ok(Arc::clone(existing));
        }

        let template = self
            .provider
            .template()
            .ok_or(MaterialError::TemplateUnavailable)?;
        let appearance = Arc::new(Self::derive_appearance(&template, category));
        entries.insert(category, Arc::clone(&appearance));
        Ok(appearance)
    }

    /// Number of categories resolved so far.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("material cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn derive_appearance(template: &BlockTemplate, category: MaterialCategory) -> BlockAppearance {
        let tint = category.base_color();
        let base = template.base_color;
        let color = [
            base[0] * tint[0],
            base[1] * tint[1],
            base[2] * tint[2],
            base[3] * tint[3],
        ];
        let transparent = category.is_transparent();
        BlockAppearance {
            color,
            transparent,
            depth_write: !transparent,
            render_order: if transparent {
                RENDER_ORDER_TRANSPARENT
            } else {
                RENDER_ORDER_OPAQUE
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct WhiteCubeProvider;

    impl BlockTemplateProvider for WhiteCubeProvider {
        fn template(&self) -> Option<BlockTemplate> {
            Some(BlockTemplate {
                base_color: [1.0, 1.0, 1.0, 1.0],
            })
        }
    }

    struct MissingProvider;

    impl BlockTemplateProvider for MissingProvider {
        fn template(&self) -> Option<BlockTemplate> {
            None
        }
    }

    #[test]
    fn repeated_lookups_return_the_same_handle() {
        let cache = MaterialCache::new(Arc::new(WhiteCubeProvider));
        let a = cache.resource_for(MaterialCategory::Grass).unwrap();
        let b = cache.resource_for(MaterialCategory::Grass).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn distinct_categories_get_distinct_entries() {
        let cache = MaterialCache::new(Arc::new(WhiteCubeProvider));
        let grass = cache.resource_for(MaterialCategory::Grass).unwrap();
        let stone = cache.resource_for(MaterialCategory::Stone).unwrap();
        assert!(!Arc::ptr_eq(&grass, &stone));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn every_category_resolves() {
        let cache = MaterialCache::new(Arc::new(WhiteCubeProvider));
        for &category in MaterialCategory::all() {
            let appearance = cache.resource_for(category).unwrap();
            assert_eq!(appearance.color, category.base_color());
        }
        assert_eq!(cache.len(), MaterialCategory::all().len());
    }

    #[test]
    fn only_water_is_transparent() {
        for &category in MaterialCategory::all() {
            assert_eq!(
                category.is_transparent(),
                category == MaterialCategory::Water
            );
        }
    }

    #[test]
    fn water_appearance_uses_transparent_render_settings() {
        let cache = MaterialCache::new(Arc::new(WhiteCubeProvider));
        let water = cache.resource_for(MaterialCategory::Water).unwrap();
        assert!(water.transparent);
        assert!(!water.depth_write);
        assert_eq!(water.render_order, RENDER_ORDER_TRANSPARENT);

        let grass = cache.resource_for(MaterialCategory::Grass).unwrap();
        assert!(!grass.transparent);
        assert!(grass.depth_write);
        assert_eq!(grass.render_order, RENDER_ORDER_OPAQUE);
    }

    #[test]
    fn missing_template_surfaces_as_error_and_caches_nothing() {
        let cache = MaterialCache::new(Arc::new(MissingProvider));
        let err = cache.resource_for(MaterialCategory::Grass);
        assert!(matches!(err, Err(MaterialError::TemplateUnavailable)));
        assert!(cache.is_empty());
    }
}
