use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::error::{RenderError, Result};
use crate::render::{DrawableSource, RenderCtx};

use super::adapter::open_device;
use super::surface;
use super::{Drawable, GpuInit, SurfaceErrorAction};

/// Owns wgpu core objects bound to a window.
///
/// - creates and stores Adapter/Device/Queue
/// - creates and configures the Surface (swapchain)
/// - hands out one [`Drawable`] per frame
pub struct Gpu<'w> {
    window: &'w Window,

    /// Surface bound to the window; the window must outlive it.
    surface: wgpu::Surface<'w>,

    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,

    /// Active surface configuration.
    config: wgpu::SurfaceConfiguration,

    /// Current drawable size in physical pixels.
    size: PhysicalSize<u32>,
}

impl<'w> Gpu<'w> {
    /// Creates a GPU context bound to a window.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        if size.width == 0 || size.height == 0 {
            return Err(RenderError::resource("surface", "window has zero size"));
        }

        let GpuInit {
            prefer_srgb,
            present_mode,
            alpha_mode,
            required_features,
            required_limits,
            desired_maximum_frame_latency,
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| RenderError::resource("surface", e))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| RenderError::DeviceUnavailable(e.to_string()))?;

        let (device, queue) =
            open_device(&adapter, "meridian device", required_features, required_limits).await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&surface_caps, prefer_srgb)
            .ok_or_else(|| RenderError::resource("surface", "no supported surface formats"))?;

        let alpha_mode = surface::choose_alpha_mode(&surface_caps, alpha_mode);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency,
        };

        surface.configure(&device, &config);
        log::info!("surface configured: {}x{} {format:?}", size.width, size.height);

        Ok(Self {
            window,
            surface,
            adapter,
            device,
            queue,
            config,
            size,
        })
    }

    /// Returns the active surface format.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Returns the current drawable size (physical pixels).
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Reconfigures the surface after a resize.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        surface::apply_resize(
            &self.surface,
            &self.device,
            &mut self.config,
            &mut self.size,
            new_size,
        );
    }

    /// Converts a `SurfaceError` into a higher-level action, reconfiguring
    /// the surface when that can recover it.
    pub fn handle_surface_error(&mut self, err: &wgpu::SurfaceError) -> SurfaceErrorAction {
        surface::map_surface_error(&self.surface, &self.device, &self.config, self.size, err)
    }
}

impl DrawableSource for Gpu<'_> {
    fn render_ctx(&self) -> RenderCtx<'_> {
        RenderCtx::new(&self.device, &self.queue)
    }

    fn color_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    fn acquire(&mut self) -> Result<Drawable> {
        if self.size.width == 0 || self.size.height == 0 {
            return Err(RenderError::FrameResourceUnavailable(
                "surface has zero size".to_string(),
            ));
        }

        match self.surface.get_current_texture() {
            Ok(surface_texture) => {
                if surface_texture.suboptimal {
                    log::debug!("surface texture is suboptimal");
                }
                Ok(Drawable::surface(surface_texture))
            }
            Err(err) => {
                let action = self.handle_surface_error(&err);
                Err(action.frame_error(&err))
            }
        }
    }

    fn present(&mut self, drawable: Drawable) {
        self.window.pre_present_notify();
        drawable.present();
    }
}
