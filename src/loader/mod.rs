//! Image loading.
//!
//! Any format supported by the `image` crate is decoded and converted to
//! 3-channel, 8-bit, interleaved RGB.

use std::path::Path;

use image::DynamicImage;

use crate::error::{GfwxEncodeError, Result};
use crate::DecodedImage;

/// Decode the image at `path` as 3-channel color.
pub fn load<P: AsRef<Path>>(path: P) -> Result<DecodedImage> {
    let path = path.as_ref();
    let image = image::open(path).map_err(|e| GfwxEncodeError::ImageLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    log::debug!(
        "Decoded {} as {:?} ({}x{})",
        path.display(),
        image.color(),
        image.width(),
        image.height()
    );

    Ok(from_dynamic(image))
}

/// Convert an already-decoded image to interleaved RGB.
pub fn from_dynamic(image: DynamicImage) -> DecodedImage {
    let rgb = image.into_rgb8();
    let (width, height) = rgb.dimensions();
    DecodedImage::new(width, height, 3, rgb.into_raw())
}
