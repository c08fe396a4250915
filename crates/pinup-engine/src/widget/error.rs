use thiserror::Error;

use crate::gfx::GfxError;
use crate::picture::PictureError;

#[derive(Debug, Error)]
pub enum WidgetError {
    #[error(transparent)]
    Gfx(#[from] GfxError),

    #[error(transparent)]
    Picture(#[from] PictureError),

    #[error("no image is loaded")]
    NoImage,
}
