//! pinup engine crate.
//!
//! Window runtime, GPU context and the image widget built on top of them.

pub mod core;
pub mod device;
pub mod gfx;
pub mod handlers;
pub mod input;
pub mod logging;
pub mod picture;
pub mod render;
pub mod widget;
pub mod window;
