//! Meridian engine crate.
//!
//! Renders one mesh with one pipeline: device acquisition, mesh
//! provisioning, pipeline construction, and frame submission, plus the
//! window runtime that drives them.

pub mod core;
pub mod device;
pub mod error;
pub mod logging;
pub mod mesh;
pub mod paint;
pub mod pipeline;
pub mod render;
pub mod scene;
pub mod shader;
pub mod window;

pub use error::RenderError;
