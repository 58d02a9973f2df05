use bytemuck::{Pod, Zeroable};

/// Meaning of a vertex attribute.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum VertexSemantic {
    Position,
    Normal,
    TexCoord,
}

/// Numeric type a vertex attribute presents to the shader.
///
/// A shader input must have the same kind as the attribute feeding it;
/// component counts may differ.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AttributeKind {
    /// `f32` (float, unorm and snorm formats).
    Float,
    /// `f64`.
    Double,
    Uint,
    Sint,
}

impl AttributeKind {
    pub fn of(format: wgpu::VertexFormat) -> Self {
        use wgpu::VertexFormat as F;
        match format {
            F::Uint8 | F::Uint8x2 | F::Uint8x4 | F::Uint16 | F::Uint16x2 | F::Uint16x4 => {
                AttributeKind::Uint
            }
            F::Uint32 | F::Uint32x2 | F::Uint32x3 | F::Uint32x4 => AttributeKind::Uint,
            F::Sint8 | F::Sint8x2 | F::Sint8x4 | F::Sint16 | F::Sint16x2 | F::Sint16x4 => {
                AttributeKind::Sint
            }
            F::Sint32 | F::Sint32x2 | F::Sint32x3 | F::Sint32x4 => AttributeKind::Sint,
            F::Float64 | F::Float64x2 | F::Float64x3 | F::Float64x4 => AttributeKind::Double,
            _ => AttributeKind::Float,
        }
    }
}

/// One attribute inside an interleaved vertex buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VertexAttributeDesc {
    pub semantic: VertexSemantic,
    pub format: wgpu::VertexFormat,
    /// Byte offset from the start of the vertex.
    pub offset: u64,
    /// Shader input location (`@location(n)`).
    pub location: u32,
}

/// Description of an interleaved vertex buffer.
///
/// Pipelines are only built against a layout equal to the mesh's own layout,
/// so equality here is the contract between mesh provisioning and pipeline
/// construction.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct VertexLayout {
    pub stride: u64,
    pub attributes: Vec<VertexAttributeDesc>,
}

impl VertexLayout {
    pub fn new(stride: u64, attributes: Vec<VertexAttributeDesc>) -> Self {
        Self { stride, attributes }
    }

    /// Attribute bound to shader input `location`.
    pub fn attribute_at(&self, location: u32) -> Option<&VertexAttributeDesc> {
        self.attributes.iter().find(|a| a.location == location)
    }

    /// Checks that attributes fit inside the stride and do not share locations.
    pub fn validate(&self) -> Result<(), String> {
        if self.attributes.is_empty() {
            return Err("vertex layout has no attributes".to_string());
        }

        for (i, attr) in self.attributes.iter().enumerate() {
            let end = attr.offset + attr.format.size();
            if end > self.stride {
                return Err(format!(
                    "attribute {i} ({:?}) ends at byte {end}, past stride {}",
                    attr.semantic, self.stride
                ));
            }
            if attr.offset % 4 != 0 {
                return Err(format!("attribute {i} offset {} is not 4-byte aligned", attr.offset));
            }
            if self.attributes[..i].iter().any(|a| a.location == attr.location) {
                return Err(format!("location {} is bound twice", attr.location));
            }
        }

        Ok(())
    }

    /// Describes the first difference between `self` and `other`, if any.
    pub fn mismatch(&self, other: &VertexLayout) -> Option<String> {
        if self.attributes.len() != other.attributes.len() {
            return Some(format!(
                "attribute count {} does not match mesh attribute count {}",
                self.attributes.len(),
                other.attributes.len()
            ));
        }

        for (i, (a, b)) in self.attributes.iter().zip(&other.attributes).enumerate() {
            if a.format != b.format {
                return Some(format!(
                    "attribute {i} format {:?} does not match mesh format {:?}",
                    a.format, b.format
                ));
            }
            if a.offset != b.offset {
                return Some(format!(
                    "attribute {i} offset {} does not match mesh offset {}",
                    a.offset, b.offset
                ));
            }
            if a.location != b.location {
                return Some(format!(
                    "attribute {i} location {} does not match mesh location {}",
                    a.location, b.location
                ));
            }
        }

        if self.stride != other.stride {
            return Some(format!(
                "stride {} does not match mesh stride {}",
                self.stride, other.stride
            ));
        }

        None
    }

    pub(crate) fn wgpu_attributes(&self) -> Vec<wgpu::VertexAttribute> {
        self.attributes
            .iter()
            .map(|a| wgpu::VertexAttribute {
                format: a.format,
                offset: a.offset,
                shader_location: a.location,
            })
            .collect()
    }
}

/// Interleaved vertex produced by the geometry generators.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    /// Layout matching this struct's memory layout.
    pub fn layout() -> VertexLayout {
        const F3: u64 = std::mem::size_of::<[f32; 3]>() as u64;

        VertexLayout::new(
            std::mem::size_of::<MeshVertex>() as u64,
            vec![
                VertexAttributeDesc {
                    semantic: VertexSemantic::Position,
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    location: 0,
                },
                VertexAttributeDesc {
                    semantic: VertexSemantic::Normal,
                    format: wgpu::VertexFormat::Float32x3,
                    offset: F3,
                    location: 1,
                },
                VertexAttributeDesc {
                    semantic: VertexSemantic::TexCoord,
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 2 * F3,
                    location: 2,
                },
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_vertex_layout_is_consistent() {
        let layout = MeshVertex::layout();
        assert_eq!(layout.stride, 32);
        assert_eq!(layout.attributes.len(), 3);
        assert!(layout.validate().is_ok());
        assert_eq!(
            layout.attribute_at(0).map(|a| a.semantic),
            Some(VertexSemantic::Position)
        );
        assert!(layout.attribute_at(3).is_none());
    }

    #[test]
    fn attribute_kind_follows_format() {
        assert_eq!(AttributeKind::of(wgpu::VertexFormat::Float32x3), AttributeKind::Float);
        assert_eq!(AttributeKind::of(wgpu::VertexFormat::Unorm8x4), AttributeKind::Float);
        assert_eq!(AttributeKind::of(wgpu::VertexFormat::Uint16x2), AttributeKind::Uint);
        assert_eq!(AttributeKind::of(wgpu::VertexFormat::Sint32), AttributeKind::Sint);
        assert_eq!(AttributeKind::of(wgpu::VertexFormat::Float64x2), AttributeKind::Double);
    }

    #[test]
    fn identical_layouts_have_no_mismatch() {
        assert_eq!(MeshVertex::layout().mismatch(&MeshVertex::layout()), None);
    }

    #[test]
    fn attribute_count_mismatch_is_reported() {
        let mut partial = MeshVertex::layout();
        partial.attributes.truncate(1);
        let msg = partial.mismatch(&MeshVertex::layout()).unwrap();
        assert!(msg.contains("attribute count 1"), "{msg}");
    }

    #[test]
    fn attribute_format_mismatch_is_reported() {
        let mut wrong = MeshVertex::layout();
        wrong.attributes[0].format = wgpu::VertexFormat::Float32x4;
        let msg = wrong.mismatch(&MeshVertex::layout()).unwrap();
        assert!(msg.contains("attribute 0 format"), "{msg}");
    }

    #[test]
    fn attribute_past_stride_is_invalid() {
        let mut layout = MeshVertex::layout();
        layout.stride = 24;
        assert!(layout.validate().is_err());
    }

    #[test]
    fn duplicate_locations_are_invalid() {
        let mut layout = MeshVertex::layout();
        layout.attributes[2].location = 0;
        assert!(layout.validate().unwrap_err().contains("location 0"));
    }
}
