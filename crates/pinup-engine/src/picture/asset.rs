use super::decode::{Picture, PictureError, decode_bytes};

/// Built-in 400×400 PNG shown when no user image is given or resolvable.
pub const DEFAULT_IMAGE: &[u8] = include_bytes!("../../assets/default.png");

/// Decodes [`DEFAULT_IMAGE`].
pub fn default_picture() -> Result<Picture, PictureError> {
    decode_bytes(DEFAULT_IMAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    #[test]
    fn default_image_is_png() {
        assert!(DEFAULT_IMAGE.starts_with(&PNG_SIGNATURE));
        assert_eq!(
            image::guess_format(DEFAULT_IMAGE).unwrap(),
            image::ImageFormat::Png
        );
    }

    #[test]
    fn default_image_decodes_to_widget_size() {
        let pic = default_picture().unwrap();
        assert_eq!((pic.width(), pic.height()), (400, 400));
        assert_eq!(pic.stride(), 400 * 4);
        assert_eq!(pic.pixels().len(), 400 * 400 * 4);
    }
}
