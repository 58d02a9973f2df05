use crate::error::{RenderError, Result};
use crate::mesh::{GeometryType, Mesh, Submesh, VertexLayout};
use crate::shader::{ShaderLibrary, FRAGMENT_MAIN, VERTEX_MAIN};

use super::descriptor::PipelineDescriptor;

/// Immutable, validated render pipeline.
///
/// Built once and reused for every frame that draws the mesh it was
/// validated against.
pub struct PipelineState {
    label: String,
    color_format: wgpu::TextureFormat,
    geometry: GeometryType,
    vertex_layout: VertexLayout,
    pipeline: wgpu::RenderPipeline,
}

impl PipelineState {
    /// Validates `desc` against `mesh_layout` and builds the pipeline.
    pub fn new(
        device: &wgpu::Device,
        desc: &PipelineDescriptor<'_>,
        mesh_layout: &VertexLayout,
    ) -> Result<Self> {
        desc.validate(mesh_layout)?;

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(desc.label),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let attributes = desc.vertex_layout.wgpu_attributes();
        let buffers = [wgpu::VertexBufferLayout {
            array_stride: desc.vertex_layout.stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &attributes,
        }];

        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(desc.label),
            layout: Some(&layout),

            vertex: wgpu::VertexState {
                module: desc.vertex_function.module(),
                entry_point: Some(desc.vertex_function.name()),
                compilation_options: Default::default(),
                buffers: &buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: desc.fragment_function.module(),
                entry_point: Some(desc.fragment_function.name()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: desc.color_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: desc.geometry.topology(),
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: desc.cull_mode,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });
        if let Some(err) = pollster::block_on(scope.pop()) {
            return Err(RenderError::resource("render pipeline", err));
        }

        log::info!(
            "built pipeline '{}' ({:?}, {:?})",
            desc.label,
            desc.color_format,
            desc.geometry
        );

        Ok(Self {
            label: desc.label.to_string(),
            color_format: desc.color_format,
            geometry: desc.geometry,
            vertex_layout: desc.vertex_layout.clone(),
            pipeline,
        })
    }

    /// Builds the pipeline for `mesh` from `vertex_main` / `fragment_main`
    /// in `library`, using the mesh's own layout and first submesh topology.
    pub fn for_mesh(
        device: &wgpu::Device,
        library: &ShaderLibrary,
        color_format: wgpu::TextureFormat,
        mesh: &Mesh,
    ) -> Result<Self> {
        let submesh = mesh.first_submesh()?;

        let desc = PipelineDescriptor {
            color_format,
            geometry: submesh.geometry,
            ..PipelineDescriptor::new(
                "mesh pipeline",
                library.function(VERTEX_MAIN)?,
                library.function(FRAGMENT_MAIN)?,
                mesh.layout().clone(),
            )
        };

        Self::new(device, &desc, mesh.layout())
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn color_format(&self) -> wgpu::TextureFormat {
        self.color_format
    }

    pub fn geometry(&self) -> GeometryType {
        self.geometry
    }

    pub fn vertex_layout(&self) -> &VertexLayout {
        &self.vertex_layout
    }

    pub fn raw(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    /// Checks that this pipeline can draw `submesh` of `mesh` into a
    /// `format` target.
    pub fn check_compatible(
        &self,
        mesh: &Mesh,
        submesh: &Submesh,
        format: wgpu::TextureFormat,
    ) -> Result<()> {
        if let Some(diff) = self.vertex_layout.mismatch(mesh.layout()) {
            return Err(RenderError::LayoutMismatch(diff));
        }
        if self.geometry != submesh.geometry {
            return Err(RenderError::LayoutMismatch(format!(
                "pipeline '{}' draws {:?} but the submesh holds {:?}",
                self.label, self.geometry, submesh.geometry
            )));
        }
        if self.color_format != format {
            return Err(RenderError::LayoutMismatch(format!(
                "pipeline '{}' outputs {:?} but the target is {:?}",
                self.label, self.color_format, format
            )));
        }
        Ok(())
    }
}
