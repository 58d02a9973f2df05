use crate::error::Result;
use crate::mesh::Mesh;
use crate::paint::Color;
use crate::pipeline::PipelineState;

use super::DrawableSource;

/// Records and submits one frame drawing the first submesh of `mesh`.
///
/// Device, mesh, and pipeline are borrowed and reused across frames; the
/// drawable and command encoder live only inside this call. Nothing is
/// submitted unless every prerequisite (submesh, compatible pipeline,
/// drawable) is present.
pub fn submit_frame<S>(
    target: &mut S,
    clear: Color,
    pipeline: &PipelineState,
    mesh: &Mesh,
) -> Result<wgpu::SubmissionIndex>
where
    S: DrawableSource + ?Sized,
{
    let submesh = mesh.first_submesh()?;
    pipeline.check_compatible(mesh, submesh, target.color_format())?;

    let drawable = target.acquire()?;

    let submission = {
        let ctx = target.render_ctx();
        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("meridian frame encoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("meridian mesh pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &drawable.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear.into()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(pipeline.raw());
            rpass.set_vertex_buffer(0, mesh.vertex_buffer().slice(..));
            rpass.set_index_buffer(submesh.index_buffer.slice(..), submesh.index_format);
            rpass.draw_indexed(0..submesh.index_count, 0, 0..1);
        }

        ctx.queue.submit(std::iter::once(encoder.finish()))
    };

    log::trace!(
        "submitted frame: {} indices ({:?}) into {}x{}",
        submesh.index_count,
        submesh.index_format,
        drawable.width,
        drawable.height
    );

    target.present(drawable);
    Ok(submission)
}
