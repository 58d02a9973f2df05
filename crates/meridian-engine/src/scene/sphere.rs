use crate::error::Result;
use crate::mesh::{Mesh, SphereDescriptor};
use crate::paint::Color;
use crate::pipeline::PipelineState;
use crate::render::{submit_frame, DrawableSource, RenderCtx};
use crate::shader::{ShaderLibrary, SPHERE_SHADER};

/// A single sphere drawn in solid red.
pub struct SphereScene {
    mesh: Mesh,
    pipeline: PipelineState,
    frames: u64,
}

impl SphereScene {
    /// Runs mesh provisioning and pipeline construction.
    pub fn new(
        ctx: &RenderCtx<'_>,
        color_format: wgpu::TextureFormat,
        sphere: &SphereDescriptor,
    ) -> Result<Self> {
        let mesh = Mesh::sphere(ctx.device, sphere)?;
        let library = ShaderLibrary::new(ctx.device, "sphere shader", SPHERE_SHADER)?;
        let pipeline = PipelineState::for_mesh(ctx.device, &library, color_format, &mesh)?;

        log::info!(
            "sphere scene ready: {} vertices, {} indices",
            mesh.vertex_count(),
            mesh.first_submesh()?.index_count
        );

        Ok(Self {
            mesh,
            pipeline,
            frames: 0,
        })
    }

    /// Builds the scene for `target`'s device and format.
    pub fn for_target<S>(target: &S, sphere: &SphereDescriptor) -> Result<Self>
    where
        S: DrawableSource + ?Sized,
    {
        Self::new(&target.render_ctx(), target.color_format(), sphere)
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn pipeline(&self) -> &PipelineState {
        &self.pipeline
    }

    /// Frames submitted so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Draws one frame into `target`.
    pub fn draw<S>(&mut self, target: &mut S, clear: Color) -> Result<wgpu::SubmissionIndex>
    where
        S: DrawableSource + ?Sized,
    {
        let index = submit_frame(target, clear, &self.pipeline, &self.mesh)?;
        self.frames += 1;
        Ok(index)
    }
}
