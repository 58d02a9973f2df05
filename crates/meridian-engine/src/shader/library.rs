use crate::error::{RenderError, Result};

use super::reflect::{self, EntryPoint, ShaderStage};

/// A compiled shader module plus its reflected entry points.
pub struct ShaderLibrary {
    label: String,
    module: wgpu::ShaderModule,
    entry_points: Vec<EntryPoint>,
}

impl ShaderLibrary {
    /// Compiles WGSL source.
    ///
    /// The source is validated against the device's features before it
    /// reaches the device; anything the device still rejects is caught in a
    /// validation error scope. Both come back as `ShaderCompilation`.
    pub fn new(device: &wgpu::Device, label: &str, source: &str) -> Result<Self> {
        let entry_points = reflect::reflect_with(source, device.features())?;

        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });
        if let Some(err) = pollster::block_on(scope.pop()) {
            return Err(RenderError::ShaderCompilation {
                message: err.to_string(),
            });
        }

        log::debug!(
            "compiled shader library '{label}' with entry points {:?}",
            entry_points.iter().map(|e| e.name.as_str()).collect::<Vec<_>>()
        );

        Ok(Self {
            label: label.to_string(),
            module,
            entry_points,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn module(&self) -> &wgpu::ShaderModule {
        &self.module
    }

    pub fn entry_points(&self) -> &[EntryPoint] {
        &self.entry_points
    }

    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.entry_points.iter().map(|e| e.name.as_str())
    }

    /// Looks up an entry point by name.
    pub fn function(&self, name: &str) -> Result<ShaderFunction<'_>> {
        self.entry_points
            .iter()
            .find(|e| e.name == name)
            .map(|entry| ShaderFunction {
                module: &self.module,
                entry,
            })
            .ok_or_else(|| RenderError::FunctionNotFound {
                name: name.to_string(),
            })
    }
}

/// A named entry point borrowed from a [`ShaderLibrary`].
#[derive(Clone, Copy)]
pub struct ShaderFunction<'a> {
    module: &'a wgpu::ShaderModule,
    entry: &'a EntryPoint,
}

impl<'a> ShaderFunction<'a> {
    pub fn name(&self) -> &'a str {
        &self.entry.name
    }

    pub fn stage(&self) -> ShaderStage {
        self.entry.stage
    }

    pub fn entry_point(&self) -> &'a EntryPoint {
        self.entry
    }

    pub fn module(&self) -> &'a wgpu::ShaderModule {
        self.module
    }
}

impl std::fmt::Debug for ShaderFunction<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShaderFunction")
            .field("name", &self.entry.name)
            .field("stage", &self.entry.stage)
            .finish()
    }
}
