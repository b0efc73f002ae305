//! Concrete streamer collaborators for the headless harness.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use glam::Vec3;
use tracing::info;
use voxelstream_world::{BlockTemplate, BlockTemplateProvider, ObserverSource, PlayerLifecycle};

/// Where respawned observers land; high enough to drop onto the terrain.
pub const SPAWN_POSITION: Vec3 = Vec3::new(0.0, 20.0, 0.0);

/// Ticks spent walking each leg of the rectangular patrol path.
const LEG_TICKS: u64 = 200;

/// Distance walked per tick.
const WALK_STEP: f32 = 0.9;

/// Deterministic scripted observer: patrols a rectangle around the spawn
/// point, crossing chunk boundaries on every leg.
pub struct ScriptedObserver {
    position: Mutex<Vec3>,
}

impl ScriptedObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            position: Mutex::new(SPAWN_POSITION),
        })
    }

    /// Advance one tick along the patrol path.
    pub fn advance(&self, tick: u64) {
        let mut pos = self.position.lock().expect("observer position lock poisoned");
        match (tick / LEG_TICKS) % 4 {
            0 => pos.x += WALK_STEP,
            1 => pos.z += WALK_STEP,
            2 => pos.x -= WALK_STEP,
            _ => pos.z -= WALK_STEP,
        }
    }

    /// Drop below the world, as if fallen through ungenerated terrain.
    pub fn plunge(&self) {
        let mut pos = self.position.lock().expect("observer position lock poisoned");
        pos.y = -12.0;
        info!(x = pos.x, z = pos.z, "observer plunged below the world");
    }

    pub fn reset_to(&self, position: Vec3) {
        *self.position.lock().expect("observer position lock poisoned") = position;
    }
}

impl ObserverSource for ScriptedObserver {
    fn position(&self) -> Option<Vec3> {
        Some(*self.position.lock().expect("observer position lock poisoned"))
    }
}

/// Lifecycle collaborator that resets the observer to the spawn point.
///
/// Only the position is reset; whatever heading the observer's script is
/// on continues from the spawn point.
pub struct SpawnLifecycle {
    observer: Arc<ScriptedObserver>,
    respawns: AtomicU64,
}

impl SpawnLifecycle {
    pub fn new(observer: Arc<ScriptedObserver>) -> Arc<Self> {
        Arc::new(Self {
            observer,
            respawns: AtomicU64::new(0),
        })
    }

    pub fn respawn_count(&self) -> u64 {
        self.respawns.load(Ordering::SeqCst)
    }
}

impl PlayerLifecycle for SpawnLifecycle {
    fn request_respawn(&self) {
        self.respawns.fetch_add(1, Ordering::SeqCst);
        info!(spawn = ?SPAWN_POSITION, "respawning observer");
        self.observer.reset_to(SPAWN_POSITION);
    }
}

/// Always-available solid cube template.
pub struct SolidCubeProvider;

impl BlockTemplateProvider for SolidCubeProvider {
    fn template(&self) -> Option<BlockTemplate> {
        Some(BlockTemplate {
            base_color: [1.0, 1.0, 1.0, 1.0],
        })
    }
}
