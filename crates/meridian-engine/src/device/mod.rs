//! GPU device + surface management.
//!
//! This module is responsible for:
//! - acquiring the adapter, device, and queue (windowed or headless)
//! - creating & configuring the window surface
//! - handing out per-frame drawables (surface textures or offscreen textures)

mod adapter;
mod error;
mod frame;
mod gpu;
mod headless;
mod init;
mod offscreen;
mod surface;

pub use error::SurfaceErrorAction;
pub use frame::Drawable;
pub use gpu::Gpu;
pub use headless::HeadlessGpu;
pub use init::{GpuInit, HeadlessInit};
pub use offscreen::{OffscreenTarget, Pixels};
