use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::window::Window;

use crate::device::Gpu;
use crate::input::InputFrame;
use crate::render::RenderCtx;
use crate::window::{WindowControl, WindowGeometry, fit_within};

use super::app::AppControl;

/// Per-frame window handle.
///
/// Geometry reads come from the runtime's tracked [`WindowGeometry`]; writes
/// update it immediately and forward the request to the platform.
pub struct WindowCtx<'a> {
    window: &'a Window,
    geometry: &'a mut WindowGeometry,
    close_requested: &'a mut bool,
    max_extent: i32,
}

impl<'a> WindowCtx<'a> {
    pub(crate) fn new(
        window: &'a Window,
        geometry: &'a mut WindowGeometry,
        close_requested: &'a mut bool,
        max_extent: u32,
    ) -> Self {
        Self {
            window,
            geometry,
            close_requested,
            max_extent: i32::try_from(max_extent).unwrap_or(i32::MAX),
        }
    }

    pub fn window(&self) -> &Window {
        self.window
    }
}

impl WindowControl for WindowCtx<'_> {
    fn size(&self) -> (i32, i32) {
        self.geometry.size
    }

    fn set_size(&mut self, width: i32, height: i32) {
        let (width, height) = fit_within(width, height, self.max_extent);
        self.geometry.size = (width, height);

        // `Some` means the platform applied the size synchronously.
        let requested = PhysicalSize::new(width as u32, height as u32);
        if let Some(actual) = self.window.request_inner_size(requested) {
            self.geometry.size = (actual.width as i32, actual.height as i32);
        }
    }

    fn position(&self) -> (i32, i32) {
        self.geometry.position
    }

    fn set_position(&mut self, x: i32, y: i32) {
        self.geometry.position = (x, y);
        self.window.set_outer_position(PhysicalPosition::new(x, y));
    }

    fn max_extent(&self) -> i32 {
        self.max_extent
    }

    fn request_close(&mut self) {
        *self.close_requested = true;
    }

    fn close_requested(&self) -> bool {
        *self.close_requested
    }
}

/// Per-frame context passed to `core::App` callbacks.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub input: &'a mut InputFrame,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Acquires a frame, clears it to `clear`, runs `draw` inside a single
    /// render pass, then presents.
    ///
    /// Surface loss is handled here: recoverable errors skip the frame, fatal
    /// ones return `AppControl::Exit`. An error from `draw` is returned as-is
    /// and the frame is not presented.
    pub fn render<E, F>(&mut self, clear: wgpu::Color, draw: F) -> Result<AppControl, E>
    where
        F: FnOnce(&RenderCtx<'_>, &mut wgpu::RenderPass<'_>) -> Result<(), E>,
    {
        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                log::debug!("surface error: {err}");
                let action = self.gpu.handle_surface_error(err);
                if action.is_fatal() {
                    log::error!("surface lost irrecoverably");
                    return Ok(AppControl::Exit);
                }
                return Ok(AppControl::Continue);
            }
        };

        let rctx = RenderCtx::new(self.gpu);

        // The pass borrows the encoder; it must end before submit() takes the frame.
        {
            let attachment = self.gpu.color_attachment(&frame.view, wgpu::LoadOp::Clear(clear));
            let mut pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("pinup quad pass"),
                color_attachments: &[Some(attachment)],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            draw(&rctx, &mut pass)?;
        }

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);

        Ok(AppControl::Continue)
    }
}
