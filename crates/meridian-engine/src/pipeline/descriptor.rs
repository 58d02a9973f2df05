use crate::error::{RenderError, Result};
use crate::mesh::{AttributeKind, GeometryType, VertexLayout};
use crate::shader::{EntryPoint, ShaderFunction, ShaderStage};

/// Everything needed to build a [`PipelineState`](super::PipelineState).
#[derive(Debug, Clone)]
pub struct PipelineDescriptor<'a> {
    pub label: &'a str,
    /// Output pixel format of color attachment 0.
    pub color_format: wgpu::TextureFormat,
    pub vertex_function: ShaderFunction<'a>,
    pub fragment_function: ShaderFunction<'a>,
    /// Layout of vertex buffer 0; must equal the mesh's layout.
    pub vertex_layout: VertexLayout,
    pub geometry: GeometryType,
    pub cull_mode: Option<wgpu::Face>,
}

impl<'a> PipelineDescriptor<'a> {
    /// Descriptor with the default output format (`Bgra8Unorm`), triangles,
    /// and no culling.
    pub fn new(
        label: &'a str,
        vertex_function: ShaderFunction<'a>,
        fragment_function: ShaderFunction<'a>,
        vertex_layout: VertexLayout,
    ) -> Self {
        Self {
            label,
            color_format: wgpu::TextureFormat::Bgra8Unorm,
            vertex_function,
            fragment_function,
            vertex_layout,
            geometry: GeometryType::Triangles,
            cull_mode: None,
        }
    }

    /// Validates this descriptor against the layout of the mesh it will draw.
    pub fn validate(&self, mesh_layout: &VertexLayout) -> Result<()> {
        validate_pipeline(
            self.vertex_function.entry_point(),
            self.fragment_function.entry_point(),
            &self.vertex_layout,
            mesh_layout,
        )
    }
}

/// CPU-side pipeline validation.
///
/// Checks stages, then that the descriptor's layout equals the mesh layout,
/// then that every vertex input the shader reads is provided with a
/// matching numeric type.
pub(crate) fn validate_pipeline(
    vertex: &EntryPoint,
    fragment: &EntryPoint,
    layout: &VertexLayout,
    mesh_layout: &VertexLayout,
) -> Result<()> {
    expect_stage(vertex, ShaderStage::Vertex)?;
    expect_stage(fragment, ShaderStage::Fragment)?;

    layout
        .validate()
        .map_err(RenderError::LayoutMismatch)?;

    if let Some(diff) = layout.mismatch(mesh_layout) {
        return Err(RenderError::LayoutMismatch(diff));
    }

    for input in &vertex.inputs {
        let Some(attr) = layout.attribute_at(input.location) else {
            return Err(RenderError::LayoutMismatch(format!(
                "`{}` reads @location({}) which the vertex layout does not provide",
                vertex.name, input.location
            )));
        };
        let supplied = AttributeKind::of(attr.format);
        if input.kind != Some(supplied) {
            return Err(RenderError::LayoutMismatch(format!(
                "`{}` reads @location({}) as {:?} but the vertex layout supplies {:?}",
                vertex.name, input.location, input.kind, attr.format
            )));
        }
    }

    Ok(())
}

fn expect_stage(entry: &EntryPoint, expected: ShaderStage) -> Result<()> {
    if entry.stage == expected {
        Ok(())
    } else {
        Err(RenderError::StageMismatch {
            name: entry.name.clone(),
            expected: expected.name(),
        })
    }
}
