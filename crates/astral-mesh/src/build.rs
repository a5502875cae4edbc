//! Face-culled chunk mesh construction.

use astral_voxel::{AIR, BlockRegistry, CHUNK_SIZE, ChunkData};
use glam::IVec3;

use crate::atlas::AtlasLayout;
use crate::face::FaceDirection;
use crate::vertex::ChunkVertex;

/// CPU-side mesh for one chunk: interleaved vertices plus a `u32` index
/// buffer, four vertices and six indices per emitted face.
#[derive(Debug, Default)]
pub struct ChunkMeshData {
    pub vertices: Vec<ChunkVertex>,
    pub indices: Vec<u32>,
}

impl ChunkMeshData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn face_count(&self) -> usize {
        self.indices.len() / 6
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    fn push_face(&mut self, voxel: IVec3, face: FaceDirection, atlas: &AtlasLayout, slot: u16) {
        let base = self.vertices.len() as u32;
        let (uv_origin, uv_tile) = atlas.uv_rect(slot);
        let corners = face.corners();
        let uvs = FaceDirection::corner_uvs();

        for (corner, uv) in corners.iter().zip(uvs.iter()) {
            self.vertices.push(ChunkVertex {
                position: [
                    voxel.x as f32 + corner[0],
                    voxel.y as f32 + corner[1],
                    voxel.z as f32 + corner[2],
                ],
                uv: [
                    uv_origin[0] + uv[0] * uv_tile[0],
                    uv_origin[1] + uv[1] * uv_tile[1],
                ],
            });
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
}

/// Builds the visible-face mesh for one chunk.
///
/// A face is emitted when the registry's cull test says the neighbor does
/// not hide it. Neighbors outside the chunk are unknown here, so boundary
/// faces are always emitted; the overdraw is bounded and avoids cross-chunk
/// data dependencies in the pipeline.
pub fn build_chunk_mesh(
    data: &ChunkData,
    registry: &BlockRegistry,
    atlas: &AtlasLayout,
) -> ChunkMeshData {
    let mut mesh = ChunkMeshData::new();
    let size = CHUNK_SIZE as i32;

    for x in 0..CHUNK_SIZE {
        for y in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                let current = data.get(x, y, z);
                if current == AIR {
                    continue;
                }
                let slot = registry.render_data(current).texture_atlas_index;
                let voxel = IVec3::new(x as i32, y as i32, z as i32);

                for face in FaceDirection::ALL {
                    let neighbor_pos = voxel + face.offset();
                    let visible = if neighbor_pos.x < 0
                        || neighbor_pos.y < 0
                        || neighbor_pos.z < 0
                        || neighbor_pos.x >= size
                        || neighbor_pos.y >= size
                        || neighbor_pos.z >= size
                    {
                        true
                    } else {
                        let neighbor = data.get(
                            neighbor_pos.x as usize,
                            neighbor_pos.y as usize,
                            neighbor_pos.z as usize,
                        );
                        registry.should_render_face(current, neighbor)
                    };

                    if visible {
                        mesh.push_face(voxel, face, atlas, slot);
                    }
                }
            }
        }
    }

    mesh
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
