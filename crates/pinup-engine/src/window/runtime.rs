use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use anyhow::{Context, Result, anyhow};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId, WindowLevel};

use crate::core::{App, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::winit::translate_window_event;
use crate::input::{InputFrame, InputState};

use super::cancel::{CancelToken, RuntimeWaker, Wake};
use super::control::WindowGeometry;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    /// Initial inner size in physical pixels; the widget resizes to its image right away.
    pub initial_size: PhysicalSize<u32>,
    pub transparent: bool,
    pub always_on_top: bool,
    pub decorations: bool,
    pub resizable: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "image widget".to_string(),
            initial_size: PhysicalSize::new(400, 400),
            transparent: true,
            always_on_top: true,
            decorations: false,
            resizable: false,
        }
    }
}

/// Entry point for the runtime.
///
/// Owns the event loop until [`Runtime::run`] consumes it; must be created on
/// the main thread.
pub struct Runtime {
    event_loop: EventLoop<Wake>,
    config: RuntimeConfig,
    gpu_init: GpuInit,
}

impl Runtime {
    pub fn new(config: RuntimeConfig, gpu_init: GpuInit) -> Result<Self> {
        let event_loop = EventLoop::<Wake>::with_user_event()
            .build()
            .context("failed to create winit EventLoop")?;

        Ok(Self {
            event_loop,
            config,
            gpu_init,
        })
    }

    /// Returns a handle that can wake the loop from other threads.
    pub fn waker(&self) -> RuntimeWaker {
        RuntimeWaker {
            proxy: self.event_loop.create_proxy(),
        }
    }

    /// Runs `app` until the window closes, `cancel` fires, or a frame fails.
    ///
    /// Frame errors and panics end the loop and are returned here.
    pub fn run<A>(self, app: A, cancel: CancelToken) -> Result<()>
    where
        A: 'static + App,
    {
        let mut state = AppState::new(self.config, self.gpu_init, app, cancel);

        self.event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        state.finish()
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    input_frame: InputFrame,
    geometry: WindowGeometry,
    close_requested: bool,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,
    cancel: CancelToken,

    entry: Option<WindowEntry>,
    failure: Option<anyhow::Error>,
    stopped: bool,
}

impl<A> AppState<A>
where
    A: App + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A, cancel: CancelToken) -> Self {
        Self {
            config,
            gpu_init,
            app,
            cancel,
            entry: None,
            failure: None,
            stopped: false,
        }
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let level = if self.config.always_on_top {
            WindowLevel::AlwaysOnTop
        } else {
            WindowLevel::Normal
        };

        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size)
            .with_transparent(self.config.transparent)
            .with_decorations(self.config.decorations)
            .with_resizable(self.config.resizable)
            .with_window_level(level);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let geometry = WindowGeometry::from_window(&window);
        let gpu_init = self.gpu_init.clone();

        let entry = WindowEntryTryBuilder {
            input_state: InputState::default(),
            input_frame: InputFrame::default(),
            geometry,
            close_requested: false,
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")?;

        self.entry = Some(entry);
        Ok(())
    }

    fn start_app(&mut self) -> Result<()> {
        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (app, entry) = (&mut self.app, &mut self.entry);
        let Some(entry) = entry.as_mut() else {
            return Err(anyhow!("window was not created"));
        };

        entry.with_mut(|fields| {
            let max_extent = fields.gpu.max_texture_dimension();
            let mut ctx = FrameCtx {
                window: WindowCtx::new(
                    fields.window,
                    fields.geometry,
                    fields.close_requested,
                    max_extent,
                ),
                gpu: fields.gpu,
                input: fields.input_frame,
            };
            guarded("startup", || app.on_start(&mut ctx))
        })
    }

    fn run_frame(&mut self, event_loop: &ActiveEventLoop) {
        let (app, entry) = (&mut self.app, &mut self.entry);
        let Some(entry) = entry.as_mut() else {
            return;
        };

        let result = entry.with_mut(|fields| {
            let result = {
                let max_extent = fields.gpu.max_texture_dimension();
                let mut ctx = FrameCtx {
                    window: WindowCtx::new(
                        fields.window,
                        fields.geometry,
                        fields.close_requested,
                        max_extent,
                    ),
                    gpu: fields.gpu,
                    input: fields.input_frame,
                };
                guarded("frame", || app.on_frame(&mut ctx))
            };

            // Events not consumed by the app must not leak into the next frame.
            fields.input_frame.clear();
            result
        });

        match result {
            Ok(AppControl::Continue) => {}
            Ok(AppControl::Exit) => self.stop(event_loop),
            Err(e) => {
                self.fail(event_loop, e.context("frame failed"));
                return;
            }
        }

        let close = self
            .entry
            .as_ref()
            .is_some_and(|e| e.with_close_requested(|c| *c));
        if close {
            log::info!("window close requested");
            self.stop(event_loop);
        }
    }

    /// Returns true when the loop was stopped by cancellation.
    fn check_cancel(&mut self, event_loop: &ActiveEventLoop) -> bool {
        if !self.cancel.is_cancelled() {
            return false;
        }
        log::info!("cancellation requested; stopping");
        self.stop(event_loop);
        true
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.failure.is_none() {
            self.failure = Some(err);
        }
        self.stop(event_loop);
    }

    /// Releases app resources, then drops the GPU context and window.
    fn stop(&mut self, event_loop: &ActiveEventLoop) {
        self.shutdown();
        event_loop.exit();
    }

    fn shutdown(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;

        if self.entry.is_some() {
            self.app.on_exit();
        }
        self.entry = None;
        log::debug!("runtime shut down");
    }

    fn finish(mut self) -> Result<()> {
        self.shutdown();
        match self.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl<A> ApplicationHandler<Wake> for AppState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() || self.stopped {
            return;
        }

        if let Err(e) = self.create_window_entry(event_loop) {
            self.fail(event_loop, e);
            return;
        }

        if let Err(e) = self.start_app() {
            self.fail(event_loop, e.context("widget startup failed"));
            return;
        }

        if let Some(entry) = self.entry.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, _event: Wake) {
        self.check_cancel(event_loop);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.stopped {
            event_loop.exit();
            return;
        }

        if self.check_cancel(event_loop) {
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw: one loop iteration per presented frame.
        if let Some(entry) = self.entry.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.stopped {
            event_loop.exit();
            return;
        }

        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        entry.with_mut(|fields| {
            if let Some(ev) = translate_window_event(fields.input_state, &event) {
                fields.input_state.apply_event(fields.input_frame, ev);
            }
        });

        match &event {
            WindowEvent::CloseRequested => {
                log::info!("window closed by the platform");
                self.stop(event_loop);
            }

            WindowEvent::Resized(new_size) => {
                entry.with_mut(|fields| {
                    fields.gpu.resize(*new_size);
                    fields.geometry.size = (new_size.width as i32, new_size.height as i32);
                    fields.window.request_redraw();
                });
            }

            WindowEvent::Moved(pos) => {
                entry.with_geometry_mut(|g| g.position = (pos.x, pos.y));
            }

            WindowEvent::RedrawRequested => self.run_frame(event_loop),

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
    }
}

/// Runs `f`, converting a panic into an error so it can be returned from [`Runtime::run`].
fn guarded<T>(stage: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(anyhow!("{stage} panicked: {}", panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guarded_passes_results_through() {
        assert_eq!(guarded("frame", || Ok(7)).unwrap(), 7);

        let err = guarded::<()>("frame", || Err(anyhow!("not bound"))).unwrap_err();
        assert_eq!(err.to_string(), "not bound");
    }

    #[test]
    fn guarded_converts_str_panic() {
        let err = guarded::<()>("frame", || panic!("boom")).unwrap_err();
        assert_eq!(err.to_string(), "frame panicked: boom");
    }

    #[test]
    fn guarded_converts_formatted_panic() {
        let err = guarded::<()>("startup", || panic!("bad size {}", 3)).unwrap_err();
        assert_eq!(err.to_string(), "startup panicked: bad size 3");
    }

    #[test]
    fn default_config_describes_a_floating_widget() {
        let cfg = RuntimeConfig::default();
        assert!(cfg.transparent && cfg.always_on_top);
        assert!(!cfg.decorations && !cfg.resizable);
        assert_eq!(cfg.initial_size, PhysicalSize::new(400, 400));
    }
}
