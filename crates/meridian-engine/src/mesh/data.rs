use glam::Vec3;

use super::vertex::{MeshVertex, VertexLayout};

/// Primitive type a submesh is drawn with.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum GeometryType {
    #[default]
    Triangles,
    Lines,
    Points,
}

impl GeometryType {
    pub fn topology(self) -> wgpu::PrimitiveTopology {
        match self {
            GeometryType::Triangles => wgpu::PrimitiveTopology::TriangleList,
            GeometryType::Lines => wgpu::PrimitiveTopology::LineList,
            GeometryType::Points => wgpu::PrimitiveTopology::PointList,
        }
    }
}

/// Index data in the narrowest type able to address every vertex.
#[derive(Debug, Clone, PartialEq)]
pub enum Indices {
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl Indices {
    /// Narrows to `u16` when all of `vertex_count` vertices are addressable.
    pub fn compact(indices: Vec<u32>, vertex_count: usize) -> Self {
        if vertex_count <= u16::MAX as usize + 1 {
            Indices::U16(indices.into_iter().map(|i| i as u16).collect())
        } else {
            Indices::U32(indices)
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Indices::U16(v) => v.len(),
            Indices::U32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn format(&self) -> wgpu::IndexFormat {
        match self {
            Indices::U16(_) => wgpu::IndexFormat::Uint16,
            Indices::U32(_) => wgpu::IndexFormat::Uint32,
        }
    }

    pub fn get(&self, i: usize) -> Option<u32> {
        match self {
            Indices::U16(v) => v.get(i).map(|&x| x as u32),
            Indices::U32(v) => v.get(i).copied(),
        }
    }

    /// Raw bytes of `range` (in indices).
    pub fn bytes(&self, range: std::ops::Range<usize>) -> &[u8] {
        match self {
            Indices::U16(v) => bytemuck::cast_slice(&v[range]),
            Indices::U32(v) => bytemuck::cast_slice(&v[range]),
        }
    }
}

/// A contiguous index range drawn with one primitive type.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SubmeshData {
    pub first_index: u32,
    pub index_count: u32,
    pub geometry: GeometryType,
}

/// CPU-side mesh as produced by a geometry generator.
#[derive(Debug, Clone)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Indices,
    pub submeshes: Vec<SubmeshData>,
}

impl MeshData {
    /// Wraps vertices + indices as a single-submesh mesh.
    pub fn single(vertices: Vec<MeshVertex>, indices: Vec<u32>, geometry: GeometryType) -> Self {
        let index_count = u32::try_from(indices.len()).unwrap_or(u32::MAX);
        let indices = Indices::compact(indices, vertices.len());
        Self {
            vertices,
            indices,
            submeshes: vec![SubmeshData {
                first_index: 0,
                index_count,
                geometry,
            }],
        }
    }

    pub fn layout(&self) -> VertexLayout {
        MeshVertex::layout()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Axis-aligned bounds as `(min, max)`; `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut it = self.vertices.iter().map(|v| Vec3::from_array(v.position));
        let first = it.next()?;
        Some(it.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }

    /// Checks submesh ranges and index values.
    pub fn validate(&self) -> Result<(), String> {
        if self.vertices.is_empty() {
            return Err("mesh has no vertices".to_string());
        }

        if self.indices.len() > u32::MAX as usize {
            return Err(format!("{} indices exceed a 32-bit draw", self.indices.len()));
        }

        let vertex_count = self.vertices.len() as u64;
        let max = (0..self.indices.len())
            .filter_map(|i| self.indices.get(i))
            .max()
            .unwrap_or(0);
        if max as u64 >= vertex_count {
            return Err(format!("index {max} out of range for {vertex_count} vertices"));
        }

        for (i, sm) in self.submeshes.iter().enumerate() {
            let end = sm.first_index as usize + sm.index_count as usize;
            if sm.index_count == 0 || end > self.indices.len() {
                return Err(format!(
                    "submesh {i} range {}..{end} is empty or exceeds {} indices",
                    sm.first_index,
                    self.indices.len()
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32, z: f32) -> MeshVertex {
        MeshVertex {
            position: [x, y, z],
            normal: [0.0, 0.0, 1.0],
            uv: [0.0, 0.0],
        }
    }

    #[test]
    fn indices_compact_to_u16_at_boundary() {
        assert_eq!(Indices::compact(vec![0, 1, 2], 65_536).format(), wgpu::IndexFormat::Uint16);
        assert_eq!(Indices::compact(vec![0, 1, 2], 65_537).format(), wgpu::IndexFormat::Uint32);
    }

    #[test]
    fn index_bytes_follow_format() {
        let idx = Indices::compact(vec![0, 1, 2, 3], 4);
        assert_eq!(idx.bytes(0..4).len(), 8);
        assert_eq!(idx.bytes(1..3).len(), 4);
    }

    #[test]
    fn bounds_cover_all_vertices() {
        let mesh = MeshData::single(
            vec![v(-1.0, 0.0, 2.0), v(3.0, -4.0, 0.0), v(0.0, 5.0, -6.0)],
            vec![0, 1, 2],
            GeometryType::Triangles,
        );
        let (lo, hi) = mesh.bounds().unwrap();
        assert_eq!(lo, Vec3::new(-1.0, -4.0, -6.0));
        assert_eq!(hi, Vec3::new(3.0, 5.0, 2.0));
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mesh = MeshData::single(vec![v(0.0, 0.0, 0.0)], vec![0, 1, 0], GeometryType::Triangles);
        assert!(mesh.validate().unwrap_err().contains("index 1"));
    }

    #[test]
    fn submesh_past_end_is_rejected() {
        let mut mesh = MeshData::single(
            vec![v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(0.0, 1.0, 0.0)],
            vec![0, 1, 2],
            GeometryType::Triangles,
        );
        mesh.submeshes[0].index_count = 6;
        assert!(mesh.validate().is_err());
    }
}
