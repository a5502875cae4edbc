//! Block registry, chunk voxel storage, lifecycle states, and chunk snapshot
//! persistence.
//!
//! The registry is built once during startup (before any chunk work is
//! scheduled) and is read-only afterwards, so it can be shared across worker
//! threads behind a plain `Arc` with no interior locking.

pub mod chunk;
pub mod definitions;
pub mod registry;
pub mod snapshot;
pub mod state;

pub use chunk::{CHUNK_SIZE, CHUNK_VOLUME, ChunkData};
pub use definitions::load_definitions_dir;
pub use registry::{
    AIR, BiomeContext, BlockDefinition, BlockId, BlockRegistry, BlockRenderData, ContextKey,
    DEFAULT_BIOME, DEFAULT_PLANET, MAX_BLOCK_TYPES, PlanetContext, RegistryError,
};
pub use snapshot::{ChunkStore, SnapshotError};
pub use state::{AtomicChunkState, ChunkState};
