//! GFWX codec adapter.
//!
//! Wraps the `gfwx` crate's simple compress entry point.

use std::io;

use gfwx::{ColorTransformProgram, CompressError, HeaderBuilder};

use crate::config::{ChannelOrder, EncoderKind, FilterKind, QuantizationMode};
use crate::error::{GfwxEncodeError, Result};
use crate::DecodedImage;

use super::traits::{Codec, CompressContext, HeaderConfig};

/// GFWX wavelet codec.
#[derive(Debug, Default, Clone, Copy)]
pub struct GfwxCodec;

impl GfwxCodec {
    /// Create a new GFWX codec instance.
    pub fn new() -> Self {
        Self
    }

    /// Build the codec's header from the flat record.
    fn build_header(&self, header: &HeaderConfig, bytes_per_sample: usize) -> Result<gfwx::Header> {
        let bit_depth = header.bit_depth.resolve(bytes_per_sample);
        if bit_depth != 8 {
            return Err(GfwxEncodeError::Encode(format!(
                "{}-bit samples are not supported",
                bit_depth
            )));
        }

        let builder = HeaderBuilder {
            width: header.width,
            height: header.height,
            layers: header.layers,
            channels: header.channels,
            quality: header.quality,
            chroma_scale: header.chroma_scale,
            block_size: header.block_size,
            filter: map_filter(header.filter),
            encoder: map_encoder(header.encoder),
            intent: map_intent(header.intent),
            metadata_size: 0,
        };

        let mut built = builder
            .build()
            .map_err(|e| GfwxEncodeError::Encode(format!("invalid header: {:?}", e)))?;
        built.quantization = match header.quantization {
            QuantizationMode::Scalar => gfwx::Quantization::Scalar,
        };
        Ok(built)
    }
}

fn map_filter(filter: FilterKind) -> gfwx::Filter {
    match filter {
        FilterKind::Linear => gfwx::Filter::Linear,
        FilterKind::Cubic => gfwx::Filter::Cubic,
    }
}

fn map_encoder(encoder: EncoderKind) -> gfwx::Encoder {
    match encoder {
        EncoderKind::Fast => gfwx::Encoder::Fast,
        EncoderKind::Turbo => gfwx::Encoder::Turbo,
        EncoderKind::Contextual => gfwx::Encoder::Contextual,
    }
}

fn map_intent(order: ChannelOrder) -> gfwx::Intent {
    match order {
        ChannelOrder::Rgb => gfwx::Intent::RGB,
        ChannelOrder::Bgr => gfwx::Intent::BGR,
    }
}

fn too_small(capacity: usize) -> GfwxEncodeError {
    GfwxEncodeError::Encode(format!("output buffer of {} bytes is too small", capacity))
}

impl Codec for GfwxCodec {
    fn name(&self) -> &'static str {
        "GFWX"
    }

    fn compress(
        &self,
        image: &DecodedImage,
        header: &HeaderConfig,
        dest: &mut [u8],
        context: Option<&CompressContext>,
    ) -> Result<usize> {
        if header.width != image.width || header.height != image.height {
            return Err(GfwxEncodeError::Encode(format!(
                "header is {}x{} but image is {}x{}",
                header.width, header.height, image.width, image.height
            )));
        }
        if header.channels != image.channels {
            return Err(GfwxEncodeError::Encode(format!(
                "header declares {} channels but image has {}",
                header.channels, image.channels
            )));
        }
        if header.intent != image.channel_order {
            return Err(GfwxEncodeError::Encode(format!(
                "header declares {} channel order but image is {}",
                header.intent, image.channel_order
            )));
        }
        image.validate()?;

        let identity = ColorTransformProgram::new();
        let color_transform = match context {
            Some(ctx) => {
                if ctx.metadata.as_ref().map_or(false, |m| !m.is_empty()) {
                    return Err(GfwxEncodeError::Encode(
                        "metadata blocks are not supported".into(),
                    ));
                }
                ctx.color_transform.as_ref().unwrap_or(&identity)
            }
            None => &identity,
        };

        let gfwx_header = self.build_header(header, image.bytes_per_sample)?;
        let capacity = dest.len();

        gfwx::compress_simple(&image.pixel_data, &gfwx_header, color_transform, dest).map_err(
            |e| match e {
                CompressError::Overflow => too_small(capacity),
                CompressError::IOErr(ref io_err) if io_err.kind() == io::ErrorKind::WriteZero => {
                    too_small(capacity)
                }
                other => GfwxEncodeError::Encode(other.to_string()),
            },
        )
    }
}
