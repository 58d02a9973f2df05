//! Shader compilation and reflection.
//!
//! WGSL is parsed and validated with naga up front so that compile errors are
//! returned as values. Entry points are then looked up by name, like a
//! function library.

mod library;
mod reflect;

pub use library::{ShaderFunction, ShaderLibrary};
pub use reflect::{reflect, reflect_with, EntryPoint, ShaderInput, ShaderStage};

/// Sphere shader: passes positions through as clip-space and fills solid red.
pub const SPHERE_SHADER: &str = include_str!("shaders/sphere.wgsl");

/// Vertex entry point name in [`SPHERE_SHADER`].
pub const VERTEX_MAIN: &str = "vertex_main";

/// Fragment entry point name in [`SPHERE_SHADER`].
pub const FRAGMENT_MAIN: &str = "fragment_main";
