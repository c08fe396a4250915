use anyhow::Result;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
///
/// All callbacks run on the event-loop thread.
pub trait App {
    /// Called once after the window and GPU context exist, before the first frame.
    fn on_start(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<()>;

    /// Called once per loop iteration. Pending input is in `ctx.input`.
    ///
    /// An error ends the loop and is returned from `Runtime::run`.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl>;

    /// Called once before the GPU context is torn down, if `on_start` ran.
    fn on_exit(&mut self) {}
}
