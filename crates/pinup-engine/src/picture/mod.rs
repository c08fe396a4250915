//! Image decoding.
//!
//! Turns files or byte streams into tightly packed RGBA pixel buffers that the
//! texture layer can upload. The built-in default image lives here too.

mod asset;
mod decode;

pub use asset::{DEFAULT_IMAGE, default_picture};
pub use decode::{Picture, PictureError, decode_bytes, open, resolve_path};
