use wgpu::util::DeviceExt;

use crate::error::{RenderError, Result};

use super::data::{GeometryType, MeshData};
use super::sphere::{self, SphereDescriptor};
use super::vertex::{MeshVertex, VertexLayout};

/// Index buffer for one drawable range of a [`Mesh`].
pub struct Submesh {
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub index_format: wgpu::IndexFormat,
    pub geometry: GeometryType,
}

/// Mesh resident in GPU memory.
///
/// Immutable after upload; renderers borrow it while encoding.
pub struct Mesh {
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    layout: VertexLayout,
    submeshes: Vec<Submesh>,
}

impl Mesh {
    /// Uploads CPU mesh data into vertex/index buffers.
    ///
    /// Fails with `ResourceCreation` when the layout or buffer sizes exceed
    /// the device limits.
    pub fn upload(device: &wgpu::Device, label: &str, data: &MeshData) -> Result<Self> {
        data.validate().map_err(RenderError::InvalidGeometry)?;

        let layout = data.layout();
        let vertex_bytes: &[u8] = bytemuck::cast_slice(&data.vertices);
        check_limits(
            &layout,
            vertex_bytes.len() as u64,
            data.indices.bytes(0..data.indices.len()).len() as u64,
            &device.limits(),
        )?;

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} vbo")),
            contents: vertex_bytes,
            usage: wgpu::BufferUsages::VERTEX,
        });

        let submeshes = data
            .submeshes
            .iter()
            .enumerate()
            .map(|(i, sm)| {
                let start = sm.first_index as usize;
                let end = start + sm.index_count as usize;
                let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{label} ibo {i}")),
                    contents: data.indices.bytes(start..end),
                    usage: wgpu::BufferUsages::INDEX,
                });
                Submesh {
                    index_buffer,
                    index_count: sm.index_count,
                    index_format: data.indices.format(),
                    geometry: sm.geometry,
                }
            })
            .collect();

        log::debug!(
            "uploaded mesh '{label}': {} vertices ({} bytes), {} submesh(es)",
            data.vertex_count(),
            vertex_bytes.len(),
            data.submeshes.len()
        );

        Ok(Self {
            vertex_buffer,
            vertex_count: data.vertex_count() as u32,
            layout,
            submeshes,
        })
    }

    /// Generates and uploads a sphere.
    ///
    /// Buffer sizes are checked against the device limits before any
    /// geometry is generated.
    pub fn sphere(device: &wgpu::Device, desc: &SphereDescriptor) -> Result<Self> {
        desc.validate()?;
        let (vertex_bytes, index_bytes) = desc.byte_sizes();
        check_limits(&MeshVertex::layout(), vertex_bytes, index_bytes, &device.limits())?;

        let data = sphere::generate(desc)?;
        Self::upload(device, "sphere", &data)
    }

    pub fn vertex_buffer(&self) -> &wgpu::Buffer {
        &self.vertex_buffer
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Layout of the vertex buffer; pipelines must be built against it.
    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    pub fn submeshes(&self) -> &[Submesh] {
        &self.submeshes
    }

    pub fn first_submesh(&self) -> Result<&Submesh> {
        self.submeshes
            .first()
            .ok_or_else(|| RenderError::GeometryAbsent("mesh has no submeshes".to_string()))
    }
}

/// Rejects layouts and sizes the device cannot accept.
pub(crate) fn check_limits(
    layout: &VertexLayout,
    vertex_bytes: u64,
    index_bytes: u64,
    limits: &wgpu::Limits,
) -> Result<()> {
    layout
        .validate()
        .map_err(|e| RenderError::resource("vertex layout", e))?;

    if layout.stride > limits.max_vertex_buffer_array_stride as u64 {
        return Err(RenderError::resource(
            "vertex layout",
            format!(
                "stride {} exceeds device limit {}",
                layout.stride, limits.max_vertex_buffer_array_stride
            ),
        ));
    }
    if layout.attributes.len() > limits.max_vertex_attributes as usize {
        return Err(RenderError::resource(
            "vertex layout",
            format!(
                "{} attributes exceed device limit {}",
                layout.attributes.len(),
                limits.max_vertex_attributes
            ),
        ));
    }
    if vertex_bytes > limits.max_buffer_size {
        return Err(RenderError::resource(
            "vertex buffer",
            format!("{vertex_bytes} bytes exceed device limit {}", limits.max_buffer_size),
        ));
    }
    if index_bytes > limits.max_buffer_size {
        return Err(RenderError::resource(
            "index buffer",
            format!("{index_bytes} bytes exceed device limit {}", limits.max_buffer_size),
        ));
    }

    Ok(())
}
