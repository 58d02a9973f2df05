use naga::valid::{Capabilities, ValidationFlags, Validator};

use crate::error::{RenderError, Result};
use crate::mesh::AttributeKind;

/// Pipeline stage of a shader entry point.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Compute,
}

impl ShaderStage {
    pub fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
            ShaderStage::Compute => "compute",
        }
    }
}

/// A `@location` input of an entry point.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ShaderInput {
    pub location: u32,
    /// `None` for types no vertex attribute can feed.
    pub kind: Option<AttributeKind>,
}

/// Reflected entry point of a compiled shader.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct EntryPoint {
    pub name: String,
    pub stage: ShaderStage,
    /// `@location` inputs consumed by the entry point, in declaration order.
    pub inputs: Vec<ShaderInput>,
}

impl EntryPoint {
    pub fn input_locations(&self) -> Vec<u32> {
        self.inputs.iter().map(|i| i.location).collect()
    }
}

/// Parses and validates WGSL for a device without optional features.
pub fn reflect(source: &str) -> Result<Vec<EntryPoint>> {
    reflect_with(source, wgpu::Features::empty())
}

/// Parses and validates WGSL against the shader capabilities `features`
/// enable, returning its entry points.
///
/// Errors carry naga's rendered diagnostic (with source snippet).
pub fn reflect_with(source: &str, features: wgpu::Features) -> Result<Vec<EntryPoint>> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| RenderError::ShaderCompilation {
        message: e.emit_to_string(source),
    })?;

    Validator::new(ValidationFlags::all(), capabilities(features))
        .validate(&module)
        .map_err(|e| RenderError::ShaderCompilation {
            message: e.emit_to_string(source),
        })?;

    let entry_points = module
        .entry_points
        .iter()
        .filter_map(|ep| {
            let stage = match ep.stage {
                naga::ShaderStage::Vertex => ShaderStage::Vertex,
                naga::ShaderStage::Fragment => ShaderStage::Fragment,
                naga::ShaderStage::Compute => ShaderStage::Compute,
                #[allow(unreachable_patterns)]
                _ => return None,
            };
            Some(EntryPoint {
                name: ep.name.clone(),
                stage,
                inputs: inputs(&module, &ep.function),
            })
        })
        .collect();

    Ok(entry_points)
}

/// Shader capabilities a device with `features` supports.
fn capabilities(features: wgpu::Features) -> Capabilities {
    use wgpu::Features as F;

    let mut caps = Capabilities::default();
    caps.set(Capabilities::FLOAT64, features.contains(F::SHADER_F64));
    caps.set(Capabilities::SHADER_FLOAT16, features.contains(F::SHADER_F16));
    caps.set(Capabilities::SHADER_INT64, features.contains(F::SHADER_INT64));
    caps.set(Capabilities::IMMEDIATES, features.contains(F::IMMEDIATES));
    caps.set(Capabilities::PRIMITIVE_INDEX, features.contains(F::SHADER_PRIMITIVE_INDEX));
    caps.set(Capabilities::MULTIVIEW, features.contains(F::MULTIVIEW));
    caps.set(Capabilities::CLIP_DISTANCE, features.contains(F::CLIP_DISTANCES));
    caps.set(
        Capabilities::DUAL_SOURCE_BLENDING,
        features.contains(F::DUAL_SOURCE_BLENDING),
    );
    caps
}

fn inputs(module: &naga::Module, function: &naga::Function) -> Vec<ShaderInput> {
    let mut out = Vec::new();
    for arg in &function.arguments {
        match &arg.binding {
            Some(naga::Binding::Location { location, .. }) => out.push(ShaderInput {
                location: *location,
                kind: input_kind(module, arg.ty),
            }),
            Some(naga::Binding::BuiltIn(_)) => {}
            None => {
                if let naga::TypeInner::Struct { members, .. } = &module.types[arg.ty].inner {
                    out.extend(members.iter().filter_map(|m| match m.binding {
                        Some(naga::Binding::Location { location, .. }) => Some(ShaderInput {
                            location,
                            kind: input_kind(module, m.ty),
                        }),
                        _ => None,
                    }));
                }
            }
        }
    }
    out
}

fn input_kind(module: &naga::Module, ty: naga::Handle<naga::Type>) -> Option<AttributeKind> {
    let scalar = match &module.types[ty].inner {
        naga::TypeInner::Scalar(scalar) => *scalar,
        naga::TypeInner::Vector { scalar, .. } => *scalar,
        _ => return None,
    };
    match scalar.kind {
        naga::ScalarKind::Float if scalar.width == 8 => Some(AttributeKind::Double),
        naga::ScalarKind::Float => Some(AttributeKind::Float),
        naga::ScalarKind::Uint => Some(AttributeKind::Uint),
        naga::ScalarKind::Sint => Some(AttributeKind::Sint),
        _ => None,
    }
}
