use crate::error::{RenderError, Result};

/// Requests the logical device and its queue from `adapter`.
pub(crate) async fn open_device(
    adapter: &wgpu::Adapter,
    label: &str,
    required_features: wgpu::Features,
    required_limits: wgpu::Limits,
) -> Result<(wgpu::Device, wgpu::Queue)> {
    let info = adapter.get_info();
    log::info!(
        "using adapter '{}' ({:?}, {:?})",
        info.name,
        info.backend,
        info.device_type
    );

    // Never ask for more than the adapter offers.
    let required_limits = required_limits.using_resolution(adapter.limits());

    adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some(label),
            required_features,
            required_limits,
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        })
        .await
        .map_err(|e| RenderError::resource("device and command queue", e))
}
