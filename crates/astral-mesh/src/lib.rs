//! CPU-side chunk mesh construction.
//!
//! Walks a chunk's voxel grid, asks the registry which faces are visible,
//! and emits an interleaved vertex/index buffer ready for GPU upload. Pure
//! CPU work, safe to run on any worker thread.

pub mod atlas;
pub mod build;
pub mod face;
pub mod vertex;

pub use atlas::AtlasLayout;
pub use build::{ChunkMeshData, build_chunk_mesh};
pub use face::FaceDirection;
pub use vertex::{CHUNK_VERTEX_ATTRIBUTES, CHUNK_VERTEX_LAYOUT, ChunkVertex};
