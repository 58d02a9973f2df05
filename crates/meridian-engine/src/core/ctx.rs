use crate::device::Gpu;
use crate::paint::Color;

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    /// Device, queue, and the window surface to draw into.
    pub gpu: &'a mut Gpu<'w>,
    /// Background color of the view.
    pub clear: Color,
    /// Index of this frame since startup.
    pub frame_index: u64,
}
