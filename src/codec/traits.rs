//! Codec trait definitions.

use crate::config::{
    BitDepth, ChannelOrder, EncoderKind, EncodingRequest, FilterKind, QuantizationMode,
};
use crate::error::Result;
use crate::DecodedImage;

/// Flat header record handed to the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderConfig {
    /// Image width in pixels (taken from the image).
    pub width: u32,
    /// Image height in pixels (taken from the image).
    pub height: u32,
    /// Number of layers.
    pub layers: u16,
    /// Number of interleaved channels.
    pub channels: u16,
    /// Bit depth policy.
    pub bit_depth: BitDepth,
    /// Quality in `1..=1024`.
    pub quality: u16,
    /// Chroma quality divisor.
    pub chroma_scale: u8,
    /// Block size exponent.
    pub block_size: u8,
    /// Quantization mode.
    pub quantization: QuantizationMode,
    /// Prediction filter.
    pub filter: FilterKind,
    /// Entropy-coding strategy.
    pub encoder: EncoderKind,
    /// Channel order of the pixel buffer.
    pub intent: ChannelOrder,
}

impl HeaderConfig {
    /// Map a request onto a header for `image`.
    pub fn new(request: &EncodingRequest, image: &DecodedImage) -> Self {
        let fixed = request.defaults();
        Self {
            width: image.width,
            height: image.height,
            layers: fixed.layers,
            channels: fixed.channels,
            bit_depth: fixed.bit_depth,
            quality: request.quality(),
            chroma_scale: fixed.chroma_scale,
            block_size: fixed.block_size,
            quantization: fixed.quantization,
            filter: request.filter(),
            encoder: request.encoder(),
            intent: fixed.intent,
        }
    }
}

/// Optional auxiliary inputs to a compress call.
///
/// Passing `None` to [`Codec::compress`] leaves every auxiliary input absent.
#[derive(Default)]
pub struct CompressContext {
    /// Channel transform program; the codec's identity program when absent.
    pub color_transform: Option<gfwx::ColorTransformProgram>,
    /// Opaque metadata block stored alongside the header.
    pub metadata: Option<Vec<u8>>,
}

/// A single-shot image compressor.
pub trait Codec: Send + Sync {
    /// Human-readable codec name.
    fn name(&self) -> &'static str;

    /// Compress `image` into `dest`.
    ///
    /// # Returns
    /// The number of bytes written to the start of `dest`.
    fn compress(
        &self,
        image: &DecodedImage,
        header: &HeaderConfig,
        dest: &mut [u8],
        context: Option<&CompressContext>,
    ) -> Result<usize>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_takes_dimensions_from_image() {
        let request =
            EncodingRequest::from_raw("in.png", "out.gfwx", "300", "cubic", "contextual").unwrap();
        let image = DecodedImage::new(17, 5, 3, vec![0; 17 * 5 * 3]);

        let header = HeaderConfig::new(&request, &image);
        assert_eq!((header.width, header.height), (17, 5));
        assert_eq!(header.quality, 300);
        assert_eq!(header.filter, FilterKind::Cubic);
        assert_eq!(header.encoder, EncoderKind::Contextual);
        assert_eq!(header.layers, 1);
        assert_eq!(header.channels, 3);
        assert_eq!(header.bit_depth, BitDepth::Auto);
        assert_eq!(header.chroma_scale, 8);
        assert_eq!(header.block_size, 7);
        assert_eq!(header.quantization, QuantizationMode::Scalar);
        assert_eq!(header.intent, ChannelOrder::Rgb);
    }

    #[test]
    fn test_default_context_is_empty() {
        let context = CompressContext::default();
        assert!(context.color_transform.is_none());
        assert!(context.metadata.is_none());
    }
}
