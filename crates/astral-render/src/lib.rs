//! GPU device ownership and chunk mesh uploads.
//!
//! [`GpuContext`] owns the wgpu device and queue and remembers which thread
//! created it; all buffer creation is restricted to that thread.
//! [`GpuChunkMesh`] holds the uploaded vertex and index buffers for one chunk.

pub mod chunk_mesh;
pub mod context;

pub use chunk_mesh::{GpuChunkMesh, UploadError};
pub use context::{GpuContext, acquire_headless_context};
