use crate::device::Drawable;
use crate::error::Result;

use super::RenderCtx;

/// Something that hands out one drawable per frame and presents it.
///
/// Implemented by the window surface ([`Gpu`](crate::device::Gpu)) and by
/// [`OffscreenTarget`](crate::device::OffscreenTarget).
pub trait DrawableSource {
    /// Device and queue that own the drawables.
    fn render_ctx(&self) -> RenderCtx<'_>;

    /// Pixel format of every drawable this source returns.
    fn color_format(&self) -> wgpu::TextureFormat;

    /// Returns the drawable for the current frame.
    ///
    /// Fails with `FrameResourceUnavailable` when none is available right now.
    fn acquire(&mut self) -> Result<Drawable>;

    /// Presents (or releases) a drawable after its commands were submitted.
    fn present(&mut self, drawable: Drawable);
}
