//! UV-sphere (ellipsoid) generator.
//!
//! Grid convention: `radial` columns around the Y axis and `vertical` rows from
//! the north pole (+Y) to the south pole. Vertices form a
//! `(radial + 1) x (vertical + 1)` grid; the seam column and both pole rows
//! are duplicated per column so each vertex carries its own texcoord.
//!
//! Triangle output keeps the degenerate triangles of the pole rows, so every
//! grid quad contributes exactly two triangles:
//! `index_count = radial * vertical * 6`.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::error::{RenderError, Result};

use super::data::{GeometryType, MeshData};
use super::vertex::MeshVertex;

/// Parameters for [`generate`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SphereDescriptor {
    /// Full bounding-box size per axis; radii are half of this.
    pub extent: [f32; 3],
    /// `[radial, vertical]` segment counts.
    pub segments: [u32; 2],
    /// Point normals toward the center and flip triangle winding.
    pub inward_normals: bool,
    pub geometry: GeometryType,
}

impl Default for SphereDescriptor {
    fn default() -> Self {
        Self {
            extent: [0.76, 0.75, 0.75],
            segments: [100, 100],
            inward_normals: false,
            geometry: GeometryType::Triangles,
        }
    }
}

impl SphereDescriptor {
    pub const MIN_RADIAL: u32 = 3;
    pub const MIN_VERTICAL: u32 = 2;

    pub fn vertex_count(&self) -> usize {
        let [radial, vertical] = self.segments;
        (radial as usize + 1).saturating_mul(vertical as usize + 1)
    }

    pub fn index_count(&self) -> usize {
        let quads = (self.segments[0] as usize).saturating_mul(self.segments[1] as usize);
        match self.geometry {
            GeometryType::Triangles => quads.saturating_mul(6),
            GeometryType::Lines => quads.saturating_mul(4),
            GeometryType::Points => self.vertex_count(),
        }
    }

    /// Vertex and index buffer sizes in bytes of the generated sphere.
    pub fn byte_sizes(&self) -> (u64, u64) {
        let index_size = if self.vertex_count() <= u16::MAX as usize + 1 { 2 } else { 4 };
        let vertex_bytes = (self.vertex_count() as u64)
            .saturating_mul(std::mem::size_of::<MeshVertex>() as u64);
        (vertex_bytes, (self.index_count() as u64).saturating_mul(index_size))
    }

    pub fn validate(&self) -> Result<()> {
        let [radial, vertical] = self.segments;
        if radial < Self::MIN_RADIAL || vertical < Self::MIN_VERTICAL {
            return Err(RenderError::InvalidGeometry(format!(
                "sphere needs at least {}x{} segments, got {radial}x{vertical}",
                Self::MIN_RADIAL,
                Self::MIN_VERTICAL
            )));
        }
        if self.extent.iter().any(|e| !e.is_finite() || *e <= 0.0) {
            return Err(RenderError::InvalidGeometry(format!(
                "sphere extent must be positive and finite, got {:?}",
                self.extent
            )));
        }
        if self.vertex_count() > u32::MAX as usize {
            return Err(RenderError::InvalidGeometry(format!(
                "{radial}x{vertical} segments exceed the addressable vertex count"
            )));
        }
        if self.index_count() > u32::MAX as usize {
            return Err(RenderError::InvalidGeometry(format!(
                "{radial}x{vertical} segments need {} indices, more than a draw can address",
                self.index_count()
            )));
        }
        Ok(())
    }
}

/// Generates sphere geometry as a single-submesh [`MeshData`].
pub fn generate(desc: &SphereDescriptor) -> Result<MeshData> {
    desc.validate()?;

    let [radial, vertical] = desc.segments;
    let radii = Vec3::from_array(desc.extent) * 0.5;
    let normal_sign = if desc.inward_normals { -1.0 } else { 1.0 };

    let mut vertices = Vec::with_capacity(desc.vertex_count());
    for row in 0..=vertical {
        let v = row as f32 / vertical as f32;
        let theta = v * PI;
        // Pin the poles so they are exact regardless of sin(PI) rounding.
        let (sin_t, cos_t) = if row == 0 {
            (0.0, 1.0)
        } else if row == vertical {
            (0.0, -1.0)
        } else {
            theta.sin_cos()
        };

        for col in 0..=radial {
            let u = col as f32 / radial as f32;
            let (sin_p, cos_p) = (u * TAU).sin_cos();

            let unit = Vec3::new(sin_t * cos_p, cos_t, sin_t * sin_p);
            let position = unit * radii;
            // Ellipsoid normal: gradient of the implicit surface.
            let normal = (unit / radii).normalize_or_zero() * normal_sign;

            vertices.push(MeshVertex {
                position: position.to_array(),
                normal: normal.to_array(),
                uv: [u, v],
            });
        }
    }

    let indices = match desc.geometry {
        GeometryType::Triangles => triangle_indices(radial, vertical, desc.inward_normals),
        GeometryType::Lines => line_indices(radial, vertical),
        GeometryType::Points => (0..vertices.len() as u32).collect(),
    };

    debug_assert_eq!(indices.len(), desc.index_count());
    log::debug!(
        "generated sphere {radial}x{vertical} ({:?}): {} vertices, {} indices",
        desc.geometry,
        vertices.len(),
        indices.len()
    );

    Ok(MeshData::single(vertices, indices, desc.geometry))
}

/// Corner indices `(a, b, c, d)` of a grid quad: `a` top-left, `b` below
/// `a`, `c` below `d`, `d` right of `a`.
fn quad(radial: u32, row: u32, col: u32) -> (u32, u32, u32, u32) {
    let stride = radial + 1;
    let a = row * stride + col;
    let b = a + stride;
    (a, b, b + 1, a + 1)
}

fn triangle_indices(radial: u32, vertical: u32, inward: bool) -> Vec<u32> {
    let mut out = Vec::with_capacity(radial as usize * vertical as usize * 6);
    for row in 0..vertical {
        for col in 0..radial {
            let (a, b, c, d) = quad(radial, row, col);
            // Counter-clockwise seen from outside.
            if inward {
                out.extend_from_slice(&[a, b, d, d, b, c]);
            } else {
                out.extend_from_slice(&[a, d, b, d, c, b]);
            }
        }
    }
    out
}

fn line_indices(radial: u32, vertical: u32) -> Vec<u32> {
    let mut out = Vec::with_capacity(radial as usize * vertical as usize * 4);
    for row in 0..vertical {
        for col in 0..radial {
            let (a, b, _, d) = quad(radial, row, col);
            out.extend_from_slice(&[a, d, a, b]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Indices;

    fn sphere(segments: [u32; 2], geometry: GeometryType) -> SphereDescriptor {
        SphereDescriptor {
            segments,
            geometry,
            ..SphereDescriptor::default()
        }
    }

    #[test]
    fn default_sphere_counts() {
        let mesh = generate(&SphereDescriptor::default()).unwrap();
        assert_eq!(mesh.vertex_count(), 101 * 101);
        assert_eq!(mesh.index_count(), 100 * 100 * 6);
        assert_eq!(mesh.indices.format(), wgpu::IndexFormat::Uint16);
        assert_eq!(mesh.submeshes.len(), 1);
        assert_eq!(mesh.submeshes[0].index_count, 60_000);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn generation_is_deterministic() {
        let a = generate(&SphereDescriptor::default()).unwrap();
        let b = generate(&SphereDescriptor::default()).unwrap();
        assert_eq!(a.vertices, b.vertices);
        assert_eq!(a.indices, b.indices);
    }

    #[test]
    fn bounds_match_half_extent() {
        let mesh = generate(&SphereDescriptor::default()).unwrap();
        let (lo, hi) = mesh.bounds().unwrap();
        assert!((hi.x - 0.38).abs() < 1e-4 && (lo.x + 0.38).abs() < 1e-4);
        assert!((hi.y - 0.375).abs() < 1e-6 && (lo.y + 0.375).abs() < 1e-6);
        assert!((hi.z - 0.375).abs() < 1e-4 && (lo.z + 0.375).abs() < 1e-4);
    }

    #[test]
    fn normals_point_outward_by_default() {
        let mesh = generate(&sphere([16, 8], GeometryType::Triangles)).unwrap();
        for v in &mesh.vertices {
            let p = Vec3::from_array(v.position);
            let n = Vec3::from_array(v.normal);
            assert!(p.dot(n) > 0.0, "normal {n:?} at {p:?}");
            assert!((n.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn inward_normals_are_negated() {
        let out = generate(&sphere([16, 8], GeometryType::Triangles)).unwrap();
        let inward = generate(&SphereDescriptor {
            inward_normals: true,
            ..sphere([16, 8], GeometryType::Triangles)
        })
        .unwrap();
        for (a, b) in out.vertices.iter().zip(&inward.vertices) {
            assert_eq!(a.position, b.position);
            assert_eq!(Vec3::from_array(a.normal), -Vec3::from_array(b.normal));
        }
        assert_ne!(out.indices, inward.indices);
    }

    #[test]
    fn outward_triangles_face_outward() {
        let mesh = generate(&sphere([12, 6], GeometryType::Triangles)).unwrap();
        let Indices::U16(idx) = &mesh.indices else { panic!("expected u16 indices") };
        let pos = |i: u16| Vec3::from_array(mesh.vertices[i as usize].position);

        for tri in idx.chunks_exact(3) {
            let (a, b, c) = (pos(tri[0]), pos(tri[1]), pos(tri[2]));
            let n = (b - a).cross(c - a);
            if n.length() < 1e-7 {
                continue; // degenerate pole triangle
            }
            assert!(n.dot((a + b + c) / 3.0) > 0.0);
        }
    }

    #[test]
    fn pole_rows_are_exact() {
        let mesh = generate(&sphere([8, 4], GeometryType::Triangles)).unwrap();
        let top = mesh.vertices.first().unwrap().position;
        let bottom = mesh.vertices.last().unwrap().position;
        assert_eq!(top, [0.0, 0.375, 0.0]);
        assert_eq!(bottom, [0.0, -0.375, 0.0]);
    }

    #[test]
    fn line_and_point_counts() {
        let lines = generate(&sphere([10, 5], GeometryType::Lines)).unwrap();
        assert_eq!(lines.index_count(), 10 * 5 * 4);
        assert_eq!(lines.submeshes[0].geometry, GeometryType::Lines);

        let points = generate(&sphere([10, 5], GeometryType::Points)).unwrap();
        assert_eq!(points.index_count(), 11 * 6);
    }

    #[test]
    fn dense_sphere_switches_to_u32_indices() {
        let mesh = generate(&sphere([300, 300], GeometryType::Triangles)).unwrap();
        assert_eq!(mesh.vertex_count(), 301 * 301);
        assert_eq!(mesh.indices.format(), wgpu::IndexFormat::Uint32);
    }

    #[test]
    fn rejects_too_few_segments() {
        let err = generate(&sphere([2, 10], GeometryType::Triangles)).unwrap_err();
        assert!(matches!(err, RenderError::InvalidGeometry(_)));
        let err = generate(&sphere([10, 1], GeometryType::Triangles)).unwrap_err();
        assert!(matches!(err, RenderError::InvalidGeometry(_)));
    }

    #[test]
    fn rejects_degenerate_extent() {
        let desc = SphereDescriptor {
            extent: [1.0, 0.0, 1.0],
            ..SphereDescriptor::default()
        };
        assert!(matches!(generate(&desc), Err(RenderError::InvalidGeometry(_))));
    }

    #[test]
    fn index_count_past_u32_is_rejected_before_generating() {
        // 30001^2 vertices still fit u32, six indices per quad do not.
        let desc = sphere([30_000, 30_000], GeometryType::Triangles);
        assert!(desc.vertex_count() <= u32::MAX as usize);
        let err = generate(&desc).unwrap_err();
        assert!(matches!(err, RenderError::InvalidGeometry(msg) if msg.contains("indices")));

        let err = sphere([u32::MAX, u32::MAX], GeometryType::Points).validate().unwrap_err();
        assert!(matches!(err, RenderError::InvalidGeometry(_)));
    }

    #[test]
    fn byte_sizes_follow_index_width() {
        assert_eq!(SphereDescriptor::default().byte_sizes(), (10_201 * 32, 60_000 * 2));
        let dense = sphere([300, 300], GeometryType::Triangles);
        assert_eq!(dense.byte_sizes(), (301 * 301 * 32, 300 * 300 * 6 * 4));
    }
}
