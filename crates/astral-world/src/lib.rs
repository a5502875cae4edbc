//! World composition root: owns the planets, the two worker pools, the
//! main-thread task queue, and the pipeline counters.
//!
//! Generation and meshing run on any pool thread; GPU uploads only happen
//! inside [`World::process_main_thread_tasks`], which the caller invokes
//! once per frame from the thread that owns the graphics context.

use std::path::PathBuf;
use std::sync::Arc;

use glam::Vec3;
use tracing::{info, trace};

use astral_mesh::AtlasLayout;
use astral_planet::{ChunkDraw, CounterSnapshot, MainThreadQueue, PipelineContext, PipelineCounters, Planet};
use astral_pool::ChunkThreadPool;
use astral_render::GpuContext;
use astral_terrain::MaterialTable;
use astral_voxel::{BlockRegistry, ChunkStore};

/// Construction parameters for a [`World`].
#[derive(Clone, Debug)]
pub struct WorldSettings {
    /// World name; also the per-world snapshot subdirectory.
    pub name: String,
    /// Root directory for chunk snapshots. `None` disables persistence.
    pub data_dir: Option<PathBuf>,
    /// Streaming radius in chunks.
    pub render_distance: i32,
    /// Pipeline submissions per planet per update.
    pub max_chunks_per_frame: usize,
    /// Worker threads for generation and I/O; 0 sizes from the CPU count.
    pub generation_threads: usize,
    /// Worker threads for mesh building; 0 sizes from the CPU count.
    pub mesh_threads: usize,
    /// Texture atlas columns for UV mapping.
    pub atlas_columns: u32,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            name: "world".into(),
            data_dir: None,
            render_distance: 8,
            max_chunks_per_frame: 8,
            generation_threads: 0,
            mesh_threads: 0,
            atlas_columns: 10,
        }
    }
}

pub struct World {
    registry: Arc<BlockRegistry>,
    materials: MaterialTable,
    atlas: AtlasLayout,
    store: Option<Arc<ChunkStore>>,
    planets: Vec<Planet>,
    generation_pool: ChunkThreadPool,
    mesh_pool: ChunkThreadPool,
    main_tasks: Arc<MainThreadQueue>,
    counters: Arc<PipelineCounters>,
    render_distance: i32,
    max_chunks_per_frame: usize,
}

impl World {
    pub fn new(registry: Arc<BlockRegistry>, settings: WorldSettings) -> Self {
        let materials = MaterialTable::resolve(&registry);
        let atlas = AtlasLayout::new(settings.atlas_columns, settings.atlas_columns);

        // Generation tasks hit the disk and the noise fields, so they get
        // the bigger pool; mesh tasks are short and frequent.
        let gen_threads = if settings.generation_threads > 0 {
            settings.generation_threads
        } else {
            ChunkThreadPool::auto_threads(2, 2)
        };
        let mesh_threads = if settings.mesh_threads > 0 {
            settings.mesh_threads
        } else {
            (num_cpus::get() / 4).max(1)
        };

        let store = settings
            .data_dir
            .as_ref()
            .map(|dir| Arc::new(ChunkStore::new(dir.join(&settings.name))));

        info!(
            world = %settings.name,
            gen_threads,
            mesh_threads,
            persistence = store.is_some(),
            "world created"
        );

        Self {
            registry,
            materials,
            atlas,
            store,
            planets: Vec::new(),
            generation_pool: ChunkThreadPool::new("chunk-gen", gen_threads),
            mesh_pool: ChunkThreadPool::new("chunk-mesh", mesh_threads),
            main_tasks: Arc::new(MainThreadQueue::new()),
            counters: Arc::new(PipelineCounters::new()),
            render_distance: settings.render_distance,
            max_chunks_per_frame: settings.max_chunks_per_frame,
        }
    }

    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    pub fn planets(&self) -> &[Planet] {
        &self.planets
    }

    pub fn add_planet(&mut self, name: impl Into<String>, center: Vec3, radius: f32, seed: u32) {
        self.planets.push(Planet::new(
            name,
            center,
            radius,
            seed,
            &self.registry,
            self.render_distance,
            self.max_chunks_per_frame,
        ));
    }

    /// Advances every planet's chunk streaming for this frame.
    pub fn update(&mut self, camera: Vec3) {
        let ctx = PipelineContext {
            registry: &self.registry,
            materials: &self.materials,
            atlas: &self.atlas,
            store: self.store.as_ref(),
            generation_pool: &self.generation_pool,
            mesh_pool: &self.mesh_pool,
            main_tasks: &self.main_tasks,
            counters: &self.counters,
        };
        for planet in &mut self.planets {
            planet.update(camera, &ctx);
        }
    }

    /// Runs the deferred GPU work for this frame. Call from the thread that
    /// owns the context. Without a context the queued tasks are discarded;
    /// the owning chunks stay mesh-ready and are re-enqueued next update.
    pub fn process_main_thread_tasks(&self, gpu: Option<&GpuContext>) -> usize {
        match gpu {
            Some(ctx) => self.main_tasks.drain(ctx),
            None => {
                let dropped = self.main_tasks.clear();
                if dropped > 0 {
                    trace!(dropped, "no GPU context, upload tasks discarded");
                }
                dropped
            }
        }
    }

    /// Draw list across every planet.
    pub fn visible_meshes(&self, camera: Vec3) -> Vec<ChunkDraw> {
        self.planets
            .iter()
            .flat_map(|planet| planet.visible_meshes(camera))
            .collect()
    }

    pub fn counters(&self) -> CounterSnapshot {
        self.counters.snapshot()
    }

    pub fn pending_main_thread_tasks(&self) -> usize {
        self.main_tasks.len()
    }

    /// Drains both pools and joins their workers. Safe to call twice.
    pub fn shutdown(&mut self) {
        self.generation_pool.shutdown();
        self.mesh_pool.shutdown();
        self.main_tasks.clear();
        info!(counters = ?self.counters.snapshot(), "world shut down");
    }
}

impl Drop for World {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use astral_voxel::ChunkState;
    use glam::IVec3;

    fn test_settings() -> WorldSettings {
        WorldSettings {
            name: "testworld".into(),
            render_distance: 1,
            max_chunks_per_frame: 64,
            generation_threads: 2,
            mesh_threads: 1,
            ..WorldSettings::default()
        }
    }

    fn test_world(settings: WorldSettings) -> World {
        let registry = Arc::new(BlockRegistry::with_defaults());
        let mut world = World::new(registry, settings);
        world.add_planet("alpha", Vec3::ZERO, 24.0, 42);
        world
    }

    #[test]
    fn test_update_streams_chunks() {
        let mut world = test_world(test_settings());
        world.update(Vec3::new(24.0, 0.0, 0.0));
        world.shutdown();

        assert!(world.counters().generated > 0);
        let planet = &world.planets()[0];
        assert!(planet.chunk_count() > 0);
        assert_eq!(
            planet.chunk(IVec3::new(1, 0, 0)).unwrap().state(),
            ChunkState::DataReady
        );
    }

    #[test]
    fn test_headless_tasks_are_discarded() {
        let mut world = test_world(test_settings());
        let camera = Vec3::new(24.0, 0.0, 0.0);

        // Three updates walk the nearest chunks to mesh-ready and enqueue
        // their uploads; each update needs the previous stage joined, so
        // shutdown is not an option here, so poll the counters instead.
        world.update(camera);
        wait_for(|| world.counters().generated > 0);
        world.update(camera);
        wait_for(|| world.counters().meshed > 0);
        world.update(camera);

        assert!(world.pending_main_thread_tasks() > 0);
        let dropped = world.process_main_thread_tasks(None);
        assert!(dropped > 0);
        assert_eq!(world.pending_main_thread_tasks(), 0);
        // Nothing reached the terminal state without a context.
        assert!(world.visible_meshes(camera).is_empty());
        world.shutdown();
    }

    #[test]
    fn test_persistence_writes_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = test_settings();
        settings.data_dir = Some(dir.path().to_path_buf());
        let mut world = test_world(settings);

        world.update(Vec3::new(24.0, 0.0, 0.0));
        world.shutdown();

        // Snapshots land under <data_dir>/<world_name>/.
        let world_dir = dir.path().join("testworld");
        let saved = std::fs::read_dir(&world_dir).unwrap().count();
        assert!(saved > 0);
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let mut world = test_world(test_settings());
        world.update(Vec3::new(24.0, 0.0, 0.0));
        world.shutdown();
        world.shutdown();
        assert_eq!(world.pending_main_thread_tasks(), 0);
    }

    #[test]
    fn test_multiple_planets_stream_independently() {
        let mut world = test_world(test_settings());
        world.add_planet("beta", Vec3::new(1000.0, 0.0, 0.0), 24.0, 7);

        // Camera near alpha only; beta is past its far-clear range.
        world.update(Vec3::new(24.0, 0.0, 0.0));
        world.shutdown();

        assert!(world.planets()[0].chunk_count() > 0);
        assert_eq!(world.planets()[1].chunk_count(), 0);
    }

    fn wait_for(mut condition: impl FnMut() -> bool) {
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(10);
        while !condition() {
            assert!(std::time::Instant::now() < deadline, "timed out");
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
    }
}
