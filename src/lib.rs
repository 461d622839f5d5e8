//! GFWX Encoder Library
//!
//! Converts a decoded raster image into a GFWX wavelet-compressed artifact.
//! The work is split into two steps that run once per invocation:
//!
//! - **Configuration**: user strings are validated into an
//!   [`EncodingRequest`] before any image is touched.
//! - **Encoding**: an output buffer is sized from the image, the codec is
//!   invoked exactly once and the written byte range is persisted.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use gfwx_encode::{loader, EncodeInvoker, EncodingRequest};
//!
//! let request = EncodingRequest::from_raw("in.png", "out.gfwx", "512", "cubic", "contextual")?;
//! let image = loader::load(request.input_path())?;
//! let outcome = EncodeInvoker::new().run(&image, &request)?;
//! println!("{} bytes", outcome.bytes_written);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;

// Re-export commonly used types
pub use codec::{Codec, CompressContext, GfwxCodec, HeaderConfig};
pub use config::{
    BitDepth, ChannelOrder, EncoderKind, EncodingRequest, FilterKind, QuantizationMode,
    RequestDefaults,
};
pub use error::{GfwxEncodeError, Result};
pub use pipeline::{estimate_buffer_capacity, EncodeInvoker, EncodeOutcome, OutputBuffer};

/// A decoded, interleaved, row-major image.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Number of interleaved channels.
    pub channels: u16,
    /// Bytes per channel sample (1 or 2).
    pub bytes_per_sample: usize,
    /// Order of the color channels in `pixel_data`.
    pub channel_order: ChannelOrder,
    /// Raw pixel data.
    pub pixel_data: Vec<u8>,
}

impl DecodedImage {
    /// Create an 8-bit image in the loader's native channel order.
    pub fn new(width: u32, height: u32, channels: u16, pixel_data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            channels,
            bytes_per_sample: 1,
            channel_order: ChannelOrder::LOADER_NATIVE,
            pixel_data,
        }
    }

    /// Number of pixels.
    pub fn pixel_count(&self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Byte stride of a single pixel.
    pub fn bytes_per_pixel(&self) -> usize {
        self.channels as usize * self.bytes_per_sample
    }

    /// Calculate the expected size of pixel data in bytes.
    pub fn expected_size(&self) -> usize {
        self.pixel_count().saturating_mul(self.bytes_per_pixel())
    }

    /// Validate that pixel data size matches expected size.
    pub fn validate(&self) -> Result<()> {
        let expected = self.expected_size();
        if self.pixel_data.len() != expected {
            return Err(GfwxEncodeError::Encode(format!(
                "Pixel data size mismatch: expected {} bytes, got {}",
                expected,
                self.pixel_data.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoded_image_sizes() {
        let image = DecodedImage::new(4, 3, 3, vec![0; 36]);
        assert_eq!(image.pixel_count(), 12);
        assert_eq!(image.bytes_per_pixel(), 3);
        assert_eq!(image.expected_size(), 36);
    }

    #[test]
    fn test_decoded_image_validation() {
        let image = DecodedImage::new(8, 8, 3, vec![0; 8 * 8 * 3]);
        assert!(image.validate().is_ok());

        let bad_image = DecodedImage::new(8, 8, 3, vec![0; 100]);
        assert!(bad_image.validate().is_err());
    }
}
