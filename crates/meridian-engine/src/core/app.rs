use winit::event::WindowEvent;

use crate::device::Gpu;
use crate::error::RenderError;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by binaries.
pub trait App {
    /// Called once, after the device and surface exist and before the first frame.
    ///
    /// Long-lived GPU state (meshes, pipelines) is built here.
    fn init(&mut self, gpu: &Gpu<'_>) -> Result<(), RenderError>;

    /// Called for window events before the runtime handles them.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called for every frame the runtime decides to draw.
    ///
    /// Non-fatal errors skip the frame; fatal ones stop the runtime.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl, RenderError>;
}
