use std::path::Path;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::assets;

use super::ctx::{RenderCtx, RenderTarget};
use super::error::{CompilationError, ShaderStage};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct QuadVertex {
    pos: [f32; 3],
    color: [f32; 4],
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

// Positions are normalized device coordinates; the vertex stage passes them
// through untransformed.
const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [0.5, -0.5, 0.0], color: [1.0, 0.0, 0.0, 1.0] }, // bottom right
    QuadVertex { pos: [-0.5, 0.5, 0.0], color: [0.0, 1.0, 0.0, 1.0] }, // top left
    QuadVertex { pos: [0.5, 0.5, 0.0], color: [0.0, 0.0, 1.0, 1.0] },  // top right
    QuadVertex { pos: [-0.5, -0.5, 0.0], color: [1.0, 1.0, 0.0, 1.0] }, // bottom left
];

const QUAD_INDICES: [u16; 6] = [
    2, 1, 0, // top right triangle
    0, 1, 3, // bottom left triangle
];

struct CompiledQuad {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
}

/// A compiled GPU program plus its quad geometry.
///
/// Compile once, draw every frame. Until `compile` succeeds, and if it never
/// does, `draw` is a no-op, so a scene that chose to degrade after a
/// compilation failure keeps rendering an empty frame rather than crashing.
pub struct ShaderQuad {
    vertex_src: Option<String>,
    fragment_src: Option<String>,
    compiled: Option<CompiledQuad>,
}

impl ShaderQuad {
    /// Builds an uncompiled quad from in-memory WGSL sources.
    pub fn new(vertex_src: impl Into<String>, fragment_src: impl Into<String>) -> Self {
        Self {
            vertex_src: Some(vertex_src.into()),
            fragment_src: Some(fragment_src.into()),
            compiled: None,
        }
    }

    /// Builds an uncompiled quad from WGSL source files.
    ///
    /// Unreadable files leave the source absent; `compile` reports that as a
    /// `CompilationError` for the corresponding stage.
    pub fn from_files(vertex_path: impl AsRef<Path>, fragment_path: impl AsRef<Path>) -> Self {
        Self {
            vertex_src: assets::load_text(vertex_path),
            fragment_src: assets::load_text(fragment_path),
            compiled: None,
        }
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled.is_some()
    }

    /// Compiles both shader stages, links the pipeline, and uploads the quad
    /// geometry. Each step runs under a validation error scope so a rejected
    /// source comes back as a `CompilationError` with the backend diagnostic
    /// instead of a device panic.
    pub fn compile(&mut self, ctx: &RenderCtx<'_>) -> Result<(), CompilationError> {
        let vertex_src = require_source(&self.vertex_src, ShaderStage::Vertex)?;
        let fragment_src = require_source(&self.fragment_src, ShaderStage::Fragment)?;

        let vertex_module = create_module(ctx.device, "kestrel quad vs", vertex_src)
            .map_err(|log| CompilationError {
                stage: ShaderStage::Vertex,
                log,
            })?;

        let fragment_module = create_module(ctx.device, "kestrel quad fs", fragment_src)
            .map_err(|log| CompilationError {
                stage: ShaderStage::Fragment,
                log,
            })?;

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("kestrel quad pipeline layout"),
                bind_group_layouts: &[],
                immediate_size: 0,
            });

        // Pipeline creation validates interface matching between the stages;
        // failures here are link errors.
        let error_scope = ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let pipeline = ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("kestrel quad pipeline"),
                layout: Some(&pipeline_layout),

                vertex: wgpu::VertexState {
                    module: &vertex_module,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[QuadVertex::layout()],
                },

                fragment: Some(wgpu::FragmentState {
                    module: &fragment_module,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.surface_format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),

                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },

                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });

        if let Some(err) = pollster::block_on(error_scope.pop()) {
            return Err(CompilationError {
                stage: ShaderStage::Link,
                log: err.to_string(),
            });
        }

        let vertex_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("kestrel quad vbo"),
                contents: bytemuck::cast_slice(&QUAD_VERTICES),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("kestrel quad ibo"),
                contents: bytemuck::cast_slice(&QUAD_INDICES),
                usage: wgpu::BufferUsages::INDEX,
            });

        self.compiled = Some(CompiledQuad {
            pipeline,
            vertex_buffer,
            index_buffer,
        });

        Ok(())
    }

    /// Records the quad into the current frame. No-op until compiled.
    pub fn draw(&self, target: &mut RenderTarget<'_>) {
        let Some(compiled) = self.compiled.as_ref() else {
            return;
        };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("kestrel quad pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&compiled.pipeline);
        rpass.set_vertex_buffer(0, compiled.vertex_buffer.slice(..));
        rpass.set_index_buffer(compiled.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
    }
}

fn require_source(src: &Option<String>, stage: ShaderStage) -> Result<&str, CompilationError> {
    src.as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| CompilationError {
            stage,
            log: "shader source is missing or empty".into(),
        })
}

/// Creates a shader module under a validation error scope, turning a rejected
/// source into the backend's diagnostic string.
fn create_module(
    device: &wgpu::Device,
    label: &str,
    source: &str,
) -> Result<wgpu::ShaderModule, String> {
    let error_scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    match pollster::block_on(error_scope.pop()) {
        Some(err) => Err(err.to_string()),
        None => Ok(module),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_source_is_a_compilation_error() {
        let err = require_source(&None, ShaderStage::Vertex).unwrap_err();
        assert_eq!(err.stage, ShaderStage::Vertex);
    }

    #[test]
    fn blank_source_is_a_compilation_error() {
        let err = require_source(&Some("  \n".into()), ShaderStage::Fragment).unwrap_err();
        assert_eq!(err.stage, ShaderStage::Fragment);
    }

    #[test]
    fn present_source_passes_through() {
        let src = Some("@vertex fn vs_main() {}".to_string());
        assert_eq!(
            require_source(&src, ShaderStage::Vertex).unwrap(),
            "@vertex fn vs_main() {}"
        );
    }

    #[test]
    fn unreadable_files_leave_draw_inert() {
        let quad = ShaderQuad::from_files("/nonexistent/v.wgsl", "/nonexistent/f.wgsl");
        assert!(!quad.is_compiled());
    }
}
