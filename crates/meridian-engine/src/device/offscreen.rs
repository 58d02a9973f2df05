use crate::error::{RenderError, Result};
use crate::render::{DrawableSource, RenderCtx};

use super::{Drawable, HeadlessGpu};

const BYTES_PER_PIXEL: u32 = 4;

/// Texture render target whose contents can be read back to the CPU.
///
/// A zero-sized target owns no texture and yields no drawable, like a
/// minimized window.
pub struct OffscreenTarget {
    device: wgpu::Device,
    queue: wgpu::Queue,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
    texture: Option<wgpu::Texture>,
}

impl OffscreenTarget {
    /// Supported formats: 8-bit RGBA/BGRA, unorm or sRGB.
    pub fn new(gpu: &HeadlessGpu, width: u32, height: u32, format: wgpu::TextureFormat) -> Result<Self> {
        if !is_readable_format(format) {
            return Err(RenderError::resource(
                "offscreen target",
                format!("unsupported readback format {format:?}"),
            ));
        }

        let mut target = Self {
            device: gpu.device().clone(),
            queue: gpu.queue().clone(),
            format,
            width: 0,
            height: 0,
            texture: None,
        };
        target.resize(width, height)?;
        Ok(target)
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Recreates the backing texture; zero in either dimension drops it.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.width = width;
        self.height = height;

        if width == 0 || height == 0 {
            self.texture = None;
            return Ok(());
        }

        let max = self.device.limits().max_texture_dimension_2d;
        if width > max || height > max {
            self.texture = None;
            return Err(RenderError::resource(
                "offscreen texture",
                format!("{width}x{height} exceeds device limit {max}"),
            ));
        }

        self.texture = Some(self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("meridian offscreen target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        }));

        Ok(())
    }

    /// Copies the current texture contents into CPU memory.
    ///
    /// Blocks until the GPU has finished all submitted work.
    pub fn read_pixels(&self) -> Result<Pixels> {
        let texture = self.texture.as_ref().ok_or_else(|| {
            RenderError::FrameResourceUnavailable("offscreen target has zero size".to_string())
        })?;

        let (width, height) = (self.width, self.height);
        let unpadded = width * BYTES_PER_PIXEL;
        let padded = padded_bytes_per_row(width);

        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("meridian readback buffer"),
            size: padded as u64 * height as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("meridian readback encoder"),
            });
        encoder.copy_texture_to_buffer(
            texture.as_image_copy(),
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let slice = buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });

        self.device
            .poll(wgpu::PollType::wait_indefinitely())
            .map_err(|e| RenderError::resource("readback", e))?;

        rx.recv()
            .map_err(|e| RenderError::resource("readback", e))?
            .map_err(|e| RenderError::resource("readback mapping", e))?;

        let mut data = Vec::with_capacity((unpadded * height) as usize);
        {
            let mapped = slice.get_mapped_range();
            for row in mapped.chunks_exact(padded as usize) {
                data.extend_from_slice(&row[..unpadded as usize]);
            }
        }
        buffer.unmap();

        Ok(Pixels {
            width,
            height,
            format: self.format,
            data,
        })
    }
}

impl DrawableSource for OffscreenTarget {
    fn render_ctx(&self) -> RenderCtx<'_> {
        RenderCtx::new(&self.device, &self.queue)
    }

    fn color_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    fn acquire(&mut self) -> Result<Drawable> {
        let texture = self.texture.as_ref().ok_or_else(|| {
            RenderError::FrameResourceUnavailable("offscreen target has zero size".to_string())
        })?;
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Ok(Drawable::offscreen(view, self.width, self.height))
    }

    fn present(&mut self, drawable: Drawable) {
        drawable.present();
    }
}

/// Tightly packed 8-bit pixels in the target's channel order.
#[derive(Debug, Clone)]
pub struct Pixels {
    pub width: u32,
    pub height: u32,
    pub format: wgpu::TextureFormat,
    pub data: Vec<u8>,
}

impl Pixels {
    /// Pixel at `(x, y)` (top-left origin) as RGBA bytes.
    pub fn rgba(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * BYTES_PER_PIXEL) as usize;
        let px = &self.data[i..i + BYTES_PER_PIXEL as usize];
        Some(if is_bgra(self.format) {
            [px[2], px[1], px[0], px[3]]
        } else {
            [px[0], px[1], px[2], px[3]]
        })
    }

    /// Number of pixels equal to `rgba`.
    pub fn count(&self, rgba: [u8; 4]) -> usize {
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .filter(|&(x, y)| self.rgba(x, y) == Some(rgba))
            .count()
    }
}

fn padded_bytes_per_row(width: u32) -> u32 {
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    (width * BYTES_PER_PIXEL).div_ceil(align) * align
}

fn is_bgra(format: wgpu::TextureFormat) -> bool {
    matches!(
        format,
        wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
    )
}

fn is_readable_format(format: wgpu::TextureFormat) -> bool {
    is_bgra(format)
        || matches!(
            format,
            wgpu::TextureFormat::Rgba8Unorm | wgpu::TextureFormat::Rgba8UnormSrgb
        )
}
