//! One chunk's voxel data, mesh, and lifecycle state machine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use glam::IVec3;
use tracing::{debug, error, trace};

use astral_mesh::{AtlasLayout, ChunkMeshData, build_chunk_mesh};
use astral_render::{GpuChunkMesh, GpuContext};
use astral_terrain::{MaterialTable, PlanetShell, TerrainGenerator};
use astral_voxel::{
    AtomicChunkState, BlockRegistry, CHUNK_SIZE, ChunkData, ChunkState, ChunkStore,
};

/// A worker panicking while holding a chunk lock leaves a partially written
/// buffer, but the stage that wrote it never advances the state machine, so
/// nothing downstream reads it. Recovering the guard keeps the chunk usable
/// for a reset instead of poisoning every later access.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One 16³ voxel region and everything derived from it.
///
/// The atomic `state` field is the only guard against two workers running the
/// same stage: each stage method starts with a compare-and-swap from its
/// required predecessor state and silently returns `false` when it loses.
/// The voxel grid and mesh buffers each have their own lock so meshing never
/// reads a half-written grid, but no stage holds both locks at once.
pub struct Chunk {
    coords: IVec3,
    state: AtomicChunkState,
    needs_rebuild: AtomicBool,
    shell: Mutex<Option<PlanetShell>>,
    voxels: Mutex<ChunkData>,
    mesh: Mutex<ChunkMeshData>,
    gpu: Mutex<Option<Arc<GpuChunkMesh>>>,
}

impl Chunk {
    /// Creates an empty chunk at the given chunk-grid coordinates.
    pub fn new(coords: IVec3) -> Self {
        Self {
            coords,
            state: AtomicChunkState::new(ChunkState::Uninitialized),
            needs_rebuild: AtomicBool::new(false),
            shell: Mutex::new(None),
            voxels: Mutex::new(ChunkData::new()),
            mesh: Mutex::new(ChunkMeshData::new()),
            gpu: Mutex::new(None),
        }
    }

    /// Chunk-grid coordinates.
    pub fn coords(&self) -> IVec3 {
        self.coords
    }

    /// World-space position of the chunk's minimum corner.
    pub fn origin(&self) -> IVec3 {
        self.coords * CHUNK_SIZE as i32
    }

    pub fn state(&self) -> ChunkState {
        self.state.load()
    }

    /// True from a context reset until the next GPU upload completes. While
    /// set, the previous GPU mesh (if any) is still valid to draw and the
    /// render path keeps using it.
    pub fn needs_rebuild(&self) -> bool {
        self.needs_rebuild.load(Ordering::Acquire)
    }

    /// Attaches (or detaches) the planet shell this chunk generates against,
    /// rewinding the lifecycle so the chunk regenerates under the new
    /// context.
    pub fn set_planet_context(&self, shell: Option<PlanetShell>) {
        *lock(&self.shell) = shell;
        self.needs_rebuild.store(true, Ordering::Release);
        self.state.store(ChunkState::Uninitialized);
        trace!(coords = ?self.coords, "chunk context reset");
    }

    /// Stage 1: fill the voxel grid, from a snapshot when one exists, else
    /// by procedural generation (persisting the result for next time).
    ///
    /// Returns `false` without touching any data when the chunk is not
    /// `Uninitialized` or another worker claimed the stage first.
    pub fn generate_data(
        &self,
        registry: &BlockRegistry,
        materials: &MaterialTable,
        generator: &TerrainGenerator,
        store: Option<&ChunkStore>,
    ) -> bool {
        if !self
            .state
            .transition(ChunkState::Uninitialized, ChunkState::DataGenerating)
        {
            return false;
        }

        let origin = self.origin();
        let loaded = store.and_then(|s| s.load(origin.to_array()));
        match loaded {
            Some(data) => {
                *lock(&self.voxels) = data;
                trace!(coords = ?self.coords, "chunk restored from snapshot");
            }
            None => {
                {
                    let mut voxels = lock(&self.voxels);
                    generator.generate(registry, materials, origin, &mut voxels);
                }
                if let Some(store) = store {
                    let voxels = lock(&self.voxels);
                    if let Err(err) = store.save(origin.to_array(), &voxels) {
                        // Regenerable next session; the in-memory grid is intact.
                        debug!(coords = ?self.coords, %err, "chunk snapshot save failed");
                    }
                }
            }
        }

        self.state.store(ChunkState::DataReady);
        true
    }

    /// Fills the voxel grid procedurally with no snapshot I/O and no state
    /// change. Generation is a pure function of the generator and the chunk
    /// coordinates, so repeated calls on fresh chunks agree exactly.
    pub fn generate_terrain_data_only(
        &self,
        registry: &BlockRegistry,
        materials: &MaterialTable,
        generator: &TerrainGenerator,
    ) {
        let mut voxels = lock(&self.voxels);
        generator.generate(registry, materials, self.origin(), &mut voxels);
    }

    /// Stage 2: rebuild the CPU mesh from the voxel grid.
    pub fn build_mesh(&self, registry: &BlockRegistry, atlas: &AtlasLayout) -> bool {
        if !self
            .state
            .transition(ChunkState::DataReady, ChunkState::MeshBuilding)
        {
            return false;
        }

        let built = {
            let voxels = lock(&self.voxels);
            build_chunk_mesh(&voxels, registry, atlas)
        };
        *lock(&self.mesh) = built;

        self.state.store(ChunkState::MeshReady);
        true
    }

    /// Stage 3: upload the mesh to the GPU. Context-thread only.
    ///
    /// A failed upload rolls the state back to `MeshReady` so the next frame
    /// retries instead of leaving the chunk stuck. A chunk whose mesh came
    /// out empty (all air, or fully enclosed) completes with no GPU buffers.
    pub fn initialize_gpu(&self, ctx: &GpuContext) -> bool {
        if !self
            .state
            .transition(ChunkState::MeshReady, ChunkState::GpuInitializing)
        {
            return false;
        }

        let uploaded = {
            let mesh = lock(&self.mesh);
            if mesh.is_empty() {
                None
            } else {
                match GpuChunkMesh::upload(ctx, &mesh) {
                    Ok(gpu_mesh) => Some(Arc::new(gpu_mesh)),
                    Err(err) => {
                        error!(coords = ?self.coords, %err, "chunk mesh upload failed");
                        self.state.store(ChunkState::MeshReady);
                        return false;
                    }
                }
            }
        };

        *lock(&self.gpu) = uploaded;
        self.needs_rebuild.store(false, Ordering::Release);
        self.state.store(ChunkState::FullyInitialized);
        true
    }

    /// Handle to the uploaded mesh, when one exists.
    pub fn gpu_mesh(&self) -> Option<Arc<GpuChunkMesh>> {
        lock(&self.gpu).clone()
    }

    /// Copy of the current voxel grid.
    pub fn clone_voxels(&self) -> ChunkData {
        lock(&self.voxels).clone()
    }

    /// Number of faces in the current CPU mesh.
    pub fn mesh_face_count(&self) -> usize {
        lock(&self.mesh).face_count()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
