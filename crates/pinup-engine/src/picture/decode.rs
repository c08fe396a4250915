use std::path::{Path, PathBuf};

use thiserror::Error;

/// Decoded RGBA8 image.
///
/// `stride` is the byte length of one row. Decoding always produces tightly
/// packed rows (`stride == width * 4`); buffers built with
/// [`Picture::from_raw_parts`] may carry padding, which the texture layer
/// rejects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    width: u32,
    height: u32,
    stride: usize,
    pixels: Vec<u8>,
}

impl Picture {
    pub fn from_rgba(image: image::RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            stride: width as usize * 4,
            pixels: image.into_raw(),
        }
    }

    /// Wraps an existing buffer without validating its layout.
    pub fn from_raw_parts(width: u32, height: u32, stride: usize, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            stride,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Copies the pixels into an `image` buffer, or `None` if the layout is not tightly packed.
    pub(crate) fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        if self.stride != self.width as usize * 4 {
            return None;
        }
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }
}

#[derive(Debug, Error)]
pub enum PictureError {
    #[error("failed to read image {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Decodes an in-memory image of any enabled format.
pub fn decode_bytes(bytes: &[u8]) -> Result<Picture, PictureError> {
    let image = image::load_from_memory(bytes)?;
    Ok(Picture::from_rgba(image.to_rgba8()))
}

/// Reads and decodes the image at `path`.
///
/// Relative paths that do not exist are retried next to the executable.
pub fn open(path: &Path) -> Result<Picture, PictureError> {
    let resolved = resolve_path(path);
    let bytes = std::fs::read(&resolved).map_err(|source| PictureError::Read {
        path: resolved.clone(),
        source,
    })?;

    log::debug!("decoding {} ({} bytes)", resolved.display(), bytes.len());
    decode_bytes(&bytes)
}

/// Returns `path`, or its executable-relative counterpart when `path` is
/// relative, missing, and the counterpart exists.
pub fn resolve_path(path: &Path) -> PathBuf {
    if path.exists() || path.is_absolute() {
        return path.to_path_buf();
    }

    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(path)));

    match beside_exe {
        Some(candidate) if candidate.exists() => {
            log::debug!("resolved {} to {}", path.display(), candidate.display());
            candidate
        }
        _ => path.to_path_buf(),
    }
}
