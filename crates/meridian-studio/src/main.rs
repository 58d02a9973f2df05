use anyhow::Result;

use meridian_engine::core::{App, AppControl, FrameCtx};
use meridian_engine::device::{Gpu, GpuInit};
use meridian_engine::logging::{init_logging, LoggingConfig};
use meridian_engine::mesh::SphereDescriptor;
use meridian_engine::render::DrawableSource;
use meridian_engine::scene::SphereScene;
use meridian_engine::window::{FrameMode, Runtime, ViewConfig};
use meridian_engine::RenderError;

/// Draws the default sphere into the window.
struct SphereApp {
    sphere: SphereDescriptor,
    scene: Option<SphereScene>,
}

impl App for SphereApp {
    fn init(&mut self, gpu: &Gpu<'_>) -> Result<(), RenderError> {
        self.scene = Some(SphereScene::for_target(gpu, &self.sphere)?);
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl, RenderError> {
        let scene = self
            .scene
            .as_mut()
            .ok_or_else(|| RenderError::GeometryAbsent("scene was not initialized".to_string()))?;

        scene.draw(&mut *ctx.gpu, ctx.clear)?;
        if ctx.frame_index == 0 {
            log::info!(
                "first frame submitted ({:?})",
                ctx.gpu.color_format()
            );
        }

        Ok(AppControl::Continue)
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let view = ViewConfig {
        frame_mode: FrameMode::from_env(),
        ..ViewConfig::default()
    };
    log::info!("opening {:?} view ({:?})", view.title, view.frame_mode);

    let app = SphereApp {
        sphere: SphereDescriptor::default(),
        scene: None,
    };

    Runtime::run(view, GpuInit::default(), app)
}
