use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx};
use crate::device::{Gpu, GpuInit};
use crate::error::RenderError;
use crate::paint::Color;

/// Environment variable selecting the [`FrameMode`].
pub const FRAME_MODE_ENV: &str = "MERIDIAN_FRAME_MODE";

/// How often the runtime asks the app for a frame.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum FrameMode {
    /// Draw once, and again only when the surface content is lost (resize).
    #[default]
    Once,
    /// Draw on every redraw, requesting the next one immediately.
    Continuous,
}

impl FrameMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "once" => Some(FrameMode::Once),
            "continuous" | "loop" => Some(FrameMode::Continuous),
            _ => None,
        }
    }

    /// Reads `MERIDIAN_FRAME_MODE`; unset or unrecognized values give the default.
    pub fn from_env() -> Self {
        match std::env::var(FRAME_MODE_ENV) {
            Ok(value) => Self::parse(&value).unwrap_or_else(|| {
                log::warn!("ignoring unknown {FRAME_MODE_ENV}={value:?}");
                FrameMode::default()
            }),
            Err(_) => FrameMode::default(),
        }
    }
}

/// Presentable view configuration.
#[derive(Debug, Clone)]
pub struct ViewConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub clear_color: Color,
    pub frame_mode: FrameMode,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            title: "Meridian".to_string(),
            initial_size: LogicalSize::new(600.0, 600.0),
            clear_color: Color::CREAM,
            frame_mode: FrameMode::Once,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the view and drives `app` until the window closes or a fatal
    /// error occurs; the fatal error is returned.
    pub fn run<A>(view: ViewConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(view, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure {
            Some(err) => Err(anyhow::Error::new(err).context("renderer stopped")),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    view: ViewConfig,
    gpu_init: GpuInit,
    app: A,

    entry: Option<WindowEntry>,
    frame_index: u64,
    /// Set when the surface has no valid content yet.
    needs_frame: bool,
    failure: Option<RenderError>,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(view: ViewConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            view,
            gpu_init,
            app,
            entry: None,
            frame_index: 0,
            needs_frame: true,
            failure: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: RenderError) {
        log::error!("{err}");
        self.failure = Some(err);
        event_loop.exit();
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<(), RenderError> {
        let attrs = Window::default_attributes()
            .with_title(self.view.title.clone())
            .with_inner_size(self.view.initial_size);

        let window = event_loop
            .create_window(attrs)
            .map_err(|e| RenderError::resource("window", e))?;

        let gpu_init = self.gpu_init.clone();
        let entry = WindowEntry::try_new(window, |w| pollster::block_on(Gpu::new(w, gpu_init)))?;

        let app = &mut self.app;
        entry.with_gpu(|gpu| app.init(gpu))?;

        entry.with_window(|w| w.request_redraw());
        self.entry = Some(entry);
        Ok(())
    }

    fn draw_frame(&mut self, event_loop: &ActiveEventLoop) {
        if self.view.frame_mode == FrameMode::Once && !self.needs_frame {
            return;
        }

        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (app, entry) = (&mut self.app, self.entry.as_mut());
        let Some(entry) = entry else { return };

        let clear = self.view.clear_color;
        let frame_index = self.frame_index;

        let result = entry.with_gpu_mut(|gpu| {
            let mut ctx = FrameCtx {
                gpu,
                clear,
                frame_index,
            };
            app.on_frame(&mut ctx)
        });

        match result {
            Ok(control) => {
                self.frame_index += 1;
                self.needs_frame = false;
                if control == AppControl::Exit {
                    event_loop.exit();
                }
            }
            Err(err) if !err.is_fatal() => {
                // Keep `needs_frame` so the next redraw retries.
                log::warn!("frame {frame_index} skipped: {err}");
            }
            Err(err) => self.fail(event_loop, err),
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        if let Err(err) = self.create_window_entry(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        let redraw = self.view.frame_mode == FrameMode::Continuous || self.needs_frame;
        if let (true, Some(entry)) = (redraw, self.entry.as_ref()) {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.app.on_window_event(&event) == AppControl::Exit {
            event_loop.exit();
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                self.entry = None;
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                    entry.with_window(|w| w.request_redraw());
                    self.needs_frame = true;
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.entry.as_mut() {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                    self.needs_frame = true;
                }
            }

            WindowEvent::RedrawRequested => self.draw_frame(event_loop),

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_mode_parses_case_insensitively() {
        assert_eq!(FrameMode::parse("once"), Some(FrameMode::Once));
        assert_eq!(FrameMode::parse(" Continuous "), Some(FrameMode::Continuous));
        assert_eq!(FrameMode::parse("loop"), Some(FrameMode::Continuous));
        assert_eq!(FrameMode::parse("sometimes"), None);
    }

    #[test]
    fn default_view_matches_playground() {
        let view = ViewConfig::default();
        assert_eq!(view.initial_size, LogicalSize::new(600.0, 600.0));
        assert_eq!(view.clear_color, Color::rgba(1.0, 1.0, 0.8, 1.0));
        assert_eq!(view.frame_mode, FrameMode::Once);
    }
}
