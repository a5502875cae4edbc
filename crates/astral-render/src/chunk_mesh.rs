//! GPU-resident chunk mesh: wgpu buffer handles for vertex/index data.

use astral_mesh::ChunkMeshData;
use wgpu::util::DeviceExt;

use crate::context::GpuContext;

/// Errors from uploading a chunk mesh to the GPU.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// Upload attempted from a thread other than the context owner.
    #[error("upload attempted off the GPU context thread")]
    NotContextThread,

    /// Mesh data exceeds the device's maximum buffer size.
    #[error("mesh buffer of {size} bytes exceeds device limit of {limit} bytes")]
    BufferTooLarge { size: u64, limit: u64 },
}

/// A chunk mesh that has been uploaded to the GPU.
///
/// Holds wgpu buffer handles and the metadata needed to issue draw calls.
/// Buffers are explicitly destroyed on drop to release GPU memory promptly
/// when chunks are evicted.
pub struct GpuChunkMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    /// Number of indices (used in `draw_indexed`).
    pub index_count: u32,
    /// Number of vertices.
    pub vertex_count: u32,
}

impl GpuChunkMesh {
    /// Upload a [`ChunkMeshData`] to the GPU, creating new buffers.
    ///
    /// Must be called from the context-owning thread; callers off that
    /// thread get [`UploadError::NotContextThread`] instead of a device
    /// validation error at an unpredictable later point.
    pub fn upload(ctx: &GpuContext, mesh: &ChunkMeshData) -> Result<Self, UploadError> {
        if !ctx.is_context_thread() {
            return Err(UploadError::NotContextThread);
        }

        let vertex_bytes = mesh.vertex_bytes();
        let index_bytes = mesh.index_bytes();
        let limit = ctx.max_buffer_size();
        let largest = vertex_bytes.len().max(index_bytes.len()) as u64;
        if largest > limit {
            return Err(UploadError::BufferTooLarge {
                size: largest,
                limit,
            });
        }

        let vertex_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("chunk_vertex_buffer"),
                contents: vertex_bytes,
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("chunk_index_buffer"),
                contents: index_bytes,
                usage: wgpu::BufferUsages::INDEX,
            });

        Ok(Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            vertex_count: mesh.vertices.len() as u32,
        })
    }

    /// Total GPU memory consumed by this mesh's buffers in bytes.
    pub fn total_gpu_bytes(&self) -> u64 {
        self.vertex_buffer.size() + self.index_buffer.size()
    }

    /// Bind this mesh's buffers to a render pass.
    pub fn bind<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
    }

    /// Issue an indexed draw call for this mesh.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass) {
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

impl Drop for GpuChunkMesh {
    fn drop(&mut self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::acquire_headless_context;
    use astral_mesh::{AtlasLayout, build_chunk_mesh};
    use astral_voxel::{BlockId, BlockRegistry, ChunkData};

    fn single_voxel_mesh() -> ChunkMeshData {
        let registry = BlockRegistry::with_defaults();
        let mut data = ChunkData::new();
        data.set(8, 8, 8, BlockId(1));
        build_chunk_mesh(&data, &registry, &AtlasLayout::default())
    }

    #[test]
    fn test_upload_creates_valid_buffers() {
        let Some(ctx) = acquire_headless_context() else {
            return; // graceful skip when no GPU
        };
        let mesh = single_voxel_mesh();
        let gpu_mesh = GpuChunkMesh::upload(&ctx, &mesh).unwrap();

        assert_eq!(gpu_mesh.vertex_count, 24);
        assert_eq!(gpu_mesh.index_count, 36);
        assert_eq!(gpu_mesh.total_gpu_bytes(), 24 * 20 + 36 * 4);
    }

    #[test]
    fn test_upload_off_thread_rejected() {
        let Some(ctx) = acquire_headless_context() else {
            return;
        };
        let ctx = std::sync::Arc::new(ctx);
        let remote = std::sync::Arc::clone(&ctx);
        let result = std::thread::spawn(move || {
            let mesh = single_voxel_mesh();
            GpuChunkMesh::upload(&remote, &mesh).err()
        })
        .join()
        .unwrap();
        assert!(matches!(result, Some(UploadError::NotContextThread)));
    }
}
