//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the widget window, and wires them to the GPU
//! layer. Everything touching the window or the GPU runs on the thread that
//! called [`Runtime::run`]; only [`CancelToken`] and [`RuntimeWaker`] cross
//! threads.

mod cancel;
mod control;
mod runtime;

pub use cancel::{CancelToken, RuntimeWaker, Wake};
pub use control::{WindowControl, WindowGeometry, fit_within};
pub use runtime::{Runtime, RuntimeConfig};
