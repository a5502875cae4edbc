//! Per-planet chunk streaming: active-set computation, budgeted pipeline
//! advancement, and distance-based eviction.

use std::sync::Arc;

use glam::{IVec3, Vec3};
use rustc_hash::FxHashMap;
use tracing::{debug, info};

use astral_mesh::AtlasLayout;
use astral_pool::ChunkThreadPool;
use astral_render::GpuChunkMesh;
use astral_terrain::{MaterialTable, PlanetShell, TerrainGenerator};
use astral_voxel::{BlockRegistry, CHUNK_SIZE, ChunkState, ChunkStore};

use crate::chunk::Chunk;
use crate::tasks::{MainThreadQueue, PipelineCounters};

/// Half the diagonal of a unit cube, used for the sphere/chunk overlap test.
const HALF_DIAGONAL: f32 = 0.866;

/// Eviction kicks in at this multiple of the generation distance, and the
/// render cutoff sits between the two so chunks stop drawing before they are
/// dropped.
const EVICTION_FACTOR: f32 = 1.5;
const RENDER_CUTOFF_FACTOR: f32 = 1.25;
const FAR_CLEAR_FACTOR: f32 = 3.0;

/// Shared services a planet needs during one update, owned by the world.
pub struct PipelineContext<'a> {
    pub registry: &'a Arc<BlockRegistry>,
    pub materials: &'a MaterialTable,
    pub atlas: &'a AtlasLayout,
    pub store: Option<&'a Arc<ChunkStore>>,
    pub generation_pool: &'a ChunkThreadPool,
    pub mesh_pool: &'a ChunkThreadPool,
    pub main_tasks: &'a Arc<MainThreadQueue>,
    pub counters: &'a Arc<PipelineCounters>,
}

/// A fully initialized chunk's draw inputs for the renderer.
pub struct ChunkDraw {
    pub origin: IVec3,
    pub mesh: Arc<GpuChunkMesh>,
}

/// One planetary body and the sparse chunk grid around it.
pub struct Planet {
    name: String,
    shell: PlanetShell,
    generator: Arc<TerrainGenerator>,
    chunks: FxHashMap<IVec3, Arc<Chunk>>,
    /// Chunk coordinates inside render distance as of the last update;
    /// rendering iterates only this list.
    active: Vec<IVec3>,
    render_distance: i32,
    max_chunks_per_frame: usize,
}

impl Planet {
    pub fn new(
        name: impl Into<String>,
        center: Vec3,
        radius: f32,
        seed: u32,
        registry: &BlockRegistry,
        render_distance: i32,
        max_chunks_per_frame: usize,
    ) -> Self {
        let name = name.into();
        let shell = PlanetShell { center, radius };
        info!(
            planet = %name,
            radius,
            seed,
            render_distance,
            "planet created"
        );
        Self {
            name,
            shell,
            generator: Arc::new(TerrainGenerator::new(registry, seed, Some(shell))),
            chunks: FxHashMap::default(),
            active: Vec::new(),
            render_distance: render_distance.max(1),
            max_chunks_per_frame: max_chunks_per_frame.max(1),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn center(&self) -> Vec3 {
        self.shell.center
    }

    pub fn radius(&self) -> f32 {
        self.shell.radius
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn chunk(&self, coords: IVec3) -> Option<&Arc<Chunk>> {
        self.chunks.get(&coords)
    }

    /// World-space distance covered by the render distance.
    fn max_generation_distance(&self) -> f32 {
        (self.render_distance * CHUNK_SIZE as i32) as f32
    }

    fn chunk_center_world(coords: IVec3) -> Vec3 {
        (coords * CHUNK_SIZE as i32).as_vec3() + Vec3::splat(CHUNK_SIZE as f32 * 0.5)
    }

    /// Streams chunks around the camera: creates missing chunks, submits the
    /// next pipeline stage for existing ones (nearest first, up to the
    /// per-frame budget), and evicts chunks left far behind.
    pub fn update(&mut self, camera: Vec3, ctx: &PipelineContext<'_>) {
        let gen_dist = self.max_generation_distance();

        // Camera nowhere near the planet: drop everything at once. Voxel
        // data is already persisted, so this loses no work.
        if (camera - self.shell.center).length() > self.shell.radius + FAR_CLEAR_FACTOR * gen_dist {
            if !self.chunks.is_empty() {
                let dropped = self.chunks.len();
                self.chunks.clear();
                self.active.clear();
                ctx.counters.record_evicted(dropped as u64);
                info!(planet = %self.name, dropped, "camera left planet, chunk map cleared");
            }
            return;
        }

        let camera_chunk = (camera / CHUNK_SIZE as f32).floor().as_ivec3();
        let rd = self.render_distance;
        let shell_reach = self.shell.radius + CHUNK_SIZE as f32 * HALF_DIAGONAL;

        let mut candidates: Vec<IVec3> = Vec::new();
        for dx in -rd..=rd {
            for dy in -rd..=rd {
                for dz in -rd..=rd {
                    let offset = IVec3::new(dx, dy, dz);
                    if offset.length_squared() > rd * rd {
                        continue;
                    }
                    let coords = camera_chunk + offset;
                    // Skip chunks whose cube cannot touch the planet volume.
                    let center_dist = (Self::chunk_center_world(coords) - self.shell.center)
                        .length();
                    if center_dist <= shell_reach {
                        candidates.push(coords);
                    }
                }
            }
        }
        candidates.sort_by_key(|c| (*c - camera_chunk).length_squared());

        let mut submitted = 0usize;
        for &coords in &candidates {
            if submitted >= self.max_chunks_per_frame {
                break;
            }
            let chunk = match self.chunks.get(&coords) {
                Some(chunk) => Arc::clone(chunk),
                None => {
                    let chunk = Arc::new(Chunk::new(coords));
                    chunk.set_planet_context(Some(self.shell));
                    self.chunks.insert(coords, Arc::clone(&chunk));
                    chunk
                }
            };

            // Only submissions that enqueue work consume budget; chunks
            // mid-stage or already terminal cost nothing.
            match chunk.state() {
                ChunkState::Uninitialized => {
                    self.submit_generation(chunk, ctx);
                    submitted += 1;
                }
                ChunkState::DataReady => {
                    self.submit_meshing(chunk, ctx);
                    submitted += 1;
                }
                ChunkState::MeshReady => {
                    Self::submit_upload(chunk, ctx);
                    submitted += 1;
                }
                _ => {}
            }
        }

        self.active = candidates;
        self.evict_distant(camera, gen_dist, ctx);
    }

    fn submit_generation(&self, chunk: Arc<Chunk>, ctx: &PipelineContext<'_>) {
        let registry = Arc::clone(ctx.registry);
        let materials = *ctx.materials;
        let generator = Arc::clone(&self.generator);
        let store = ctx.store.map(Arc::clone);
        let counters = Arc::clone(ctx.counters);
        ctx.generation_pool.execute(move || {
            if chunk.generate_data(&registry, &materials, &generator, store.as_deref()) {
                counters.record_generated();
            }
        });
    }

    fn submit_meshing(&self, chunk: Arc<Chunk>, ctx: &PipelineContext<'_>) {
        let registry = Arc::clone(ctx.registry);
        let atlas = *ctx.atlas;
        let counters = Arc::clone(ctx.counters);
        ctx.mesh_pool.execute(move || {
            if chunk.build_mesh(&registry, &atlas) {
                counters.record_meshed();
            }
        });
    }

    fn submit_upload(chunk: Arc<Chunk>, ctx: &PipelineContext<'_>) {
        let counters = Arc::clone(ctx.counters);
        ctx.main_tasks.push(Box::new(move |gpu| {
            if chunk.initialize_gpu(gpu) {
                counters.record_uploaded();
            }
        }));
    }

    fn evict_distant(&mut self, camera: Vec3, gen_dist: f32, ctx: &PipelineContext<'_>) {
        let cutoff = gen_dist * EVICTION_FACTOR;
        let before = self.chunks.len();
        self.chunks
            .retain(|&coords, _| (Self::chunk_center_world(coords) - camera).length() <= cutoff);
        let evicted = before - self.chunks.len();
        if evicted > 0 {
            ctx.counters.record_evicted(evicted as u64);
            debug!(planet = %self.name, evicted, "evicted distant chunks");
        }
    }

    /// Draw list for this frame: terminal-state chunks from the last active
    /// set, within a cutoff slightly past generation distance so chunks
    /// fade out before they are evicted rather than popping at the edge.
    ///
    /// A chunk rewound for a rebuild keeps drawing its previous GPU mesh
    /// until the replacement upload lands, so context changes do not make
    /// already-visible terrain blink out.
    pub fn visible_meshes(&self, camera: Vec3) -> Vec<ChunkDraw> {
        let cutoff = self.max_generation_distance() * RENDER_CUTOFF_FACTOR;
        self.active
            .iter()
            .filter_map(|coords| self.chunks.get(coords))
            .filter(|chunk| {
                chunk.state() == ChunkState::FullyInitialized || chunk.needs_rebuild()
            })
            .filter(|chunk| (Self::chunk_center_world(chunk.coords()) - camera).length() <= cutoff)
            .filter_map(|chunk| {
                chunk.gpu_mesh().map(|mesh| ChunkDraw {
                    origin: chunk.origin(),
                    mesh,
                })
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
