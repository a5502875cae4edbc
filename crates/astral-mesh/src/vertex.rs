//! Canonical chunk vertex type and `wgpu::VertexBufferLayout`.
//!
//! Every chunk render pipeline references [`CHUNK_VERTEX_LAYOUT`] so the
//! CPU-side struct and the shader inputs cannot drift apart.
//!
//! | Location | Offset | Format    | Field              |
//! |----------|--------|-----------|--------------------|
//! | 0        | 0      | Float32x3 | position (chunk-local) |
//! | 1        | 12     | Float32x2 | atlas uv           |

use std::mem;

use bytemuck::{Pod, Zeroable};
use wgpu::{VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

/// Interleaved chunk mesh vertex: 20 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ChunkVertex {
    /// Position relative to the chunk's min corner.
    pub position: [f32; 3],
    /// Texture coordinates into the atlas.
    pub uv: [f32; 2],
}

/// Vertex attributes for the chunk mesh format.
pub const CHUNK_VERTEX_ATTRIBUTES: [VertexAttribute; 2] = [
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 0,
        shader_location: 0,
    },
    VertexAttribute {
        format: VertexFormat::Float32x2,
        offset: 12,
        shader_location: 1,
    },
];

/// The vertex buffer layout for all chunk mesh render pipelines.
pub const CHUNK_VERTEX_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
    array_stride: mem::size_of::<ChunkVertex>() as u64,
    step_mode: VertexStepMode::Vertex,
    attributes: &CHUNK_VERTEX_ATTRIBUTES,
};

// ---------------------------------------------------------------------------
// Compile-time validation
// ---------------------------------------------------------------------------

const _: () = assert!(
    mem::size_of::<ChunkVertex>() == 20,
    "ChunkVertex size changed, update CHUNK_VERTEX_LAYOUT"
);
const _: () = assert!(CHUNK_VERTEX_ATTRIBUTES[0].offset == 0);
const _: () = assert!(CHUNK_VERTEX_ATTRIBUTES[1].offset == 12);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_stride_matches_struct_size() {
        assert_eq!(
            CHUNK_VERTEX_LAYOUT.array_stride,
            mem::size_of::<ChunkVertex>() as u64
        );
    }

    #[test]
    fn test_shader_locations_are_sequential() {
        for (i, attr) in CHUNK_VERTEX_ATTRIBUTES.iter().enumerate() {
            assert_eq!(attr.shader_location, i as u32);
        }
    }

    #[test]
    fn test_layout_is_valid_for_wgpu_pipeline() {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            force_fallback_adapter: true,
            ..Default::default()
        }));

        let Ok(adapter) = adapter else {
            // No adapter available (headless CI without GPU), skip.
            return;
        };

        let Ok((device, _queue)) =
            pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default()))
        else {
            return;
        };

        let shader_source = r#"
            @vertex
            fn vs_main(
                @location(0) position: vec3<f32>,
                @location(1) uv: vec2<f32>,
            ) -> @builtin(position) vec4<f32> {
                return vec4<f32>(position + vec3<f32>(uv, 0.0), 1.0);
            }

            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                return vec4<f32>(1.0, 1.0, 1.0, 1.0);
            }
        "#;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("test_chunk_shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let _pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("test_chunk_pipeline"),
            layout: None,
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[CHUNK_VERTEX_LAYOUT],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: wgpu::TextureFormat::Bgra8UnormSrgb,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview_mask: None,
            cache: None,
        });
    }

    #[test]
    fn test_vertex_bytes_roundtrip() {
        let vertex = ChunkVertex {
            position: [1.0, 2.0, 3.0],
            uv: [0.25, 0.75],
        };
        let bytes: &[u8] = bytemuck::bytes_of(&vertex);
        assert_eq!(bytes.len(), 20);
        let back: &ChunkVertex = bytemuck::from_bytes(bytes);
        assert_eq!(*back, vertex);
    }
}
