//! Renderer-facing context.
//!
//! GPU resources in `gfx` are created against a `RenderCtx` so they never
//! hold on to the `Gpu` itself.

mod ctx;

pub use ctx::RenderCtx;
