use crate::error::RenderError;

/// What the surface owner did about a failed texture acquisition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// The surface was configured again; the next frame can acquire.
    Reconfigured,
    /// Nothing to repair; this frame is dropped.
    SkipFrame,
    /// The device cannot continue (out of memory).
    Fatal,
}

impl SurfaceErrorAction {
    /// Classifies `err`. `Reconfigured` means the caller must configure the
    /// surface again before the next acquisition.
    pub fn classify(err: &wgpu::SurfaceError) -> Self {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => Self::Reconfigured,
            wgpu::SurfaceError::OutOfMemory => Self::Fatal,
            wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => Self::SkipFrame,
        }
    }

    /// Error handed back to the frame loop; only `Fatal` stops it.
    pub fn frame_error(self, err: &wgpu::SurfaceError) -> RenderError {
        match self {
            Self::Fatal => RenderError::resource("surface texture", err),
            Self::Reconfigured | Self::SkipFrame => {
                RenderError::FrameResourceUnavailable(format!("no current drawable: {err} ({self:?})"))
            }
        }
    }
}
