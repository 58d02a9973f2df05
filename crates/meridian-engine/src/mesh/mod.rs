//! Mesh provisioning.
//!
//! Geometry is generated on the CPU as [`MeshData`], then uploaded into GPU
//! buffers as a [`Mesh`]. The mesh's [`VertexLayout`] travels with it so the
//! pipeline can be built against the exact buffer layout.

mod data;
mod gpu;
pub mod sphere;
mod vertex;

pub use data::{GeometryType, Indices, MeshData, SubmeshData};
pub use gpu::{Mesh, Submesh};
pub use sphere::SphereDescriptor;
pub use vertex::{AttributeKind, MeshVertex, VertexAttributeDesc, VertexLayout, VertexSemantic};
