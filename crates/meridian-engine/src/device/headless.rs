use crate::error::{RenderError, Result};
use crate::render::RenderCtx;

use super::adapter::open_device;
use super::HeadlessInit;

/// GPU device without a window, for offscreen rendering and tests.
pub struct HeadlessGpu {
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl HeadlessGpu {
    /// Acquires an adapter and device.
    ///
    /// Fails with `DeviceUnavailable` when no adapter matches `init`.
    pub async fn new(init: HeadlessInit) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: init.backends,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: None,
                force_fallback_adapter: init.force_fallback_adapter,
            })
            .await
            .map_err(|e| RenderError::DeviceUnavailable(e.to_string()))?;

        let (device, queue) = open_device(
            &adapter,
            "meridian headless device",
            wgpu::Features::empty(),
            init.required_limits,
        )
        .await?;

        Ok(Self {
            adapter,
            device,
            queue,
        })
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

    pub fn render_ctx(&self) -> RenderCtx<'_> {
        RenderCtx::new(&self.device, &self.queue)
    }
}
