//! Encoding parameters: user-selectable kinds, fixed defaults and the
//! validated [`EncodingRequest`].

use std::fmt;
use std::path::PathBuf;

use crate::error::{GfwxEncodeError, Result};

/// Highest accepted quality; this value selects lossless coding.
pub const QUALITY_MAX: u16 = 1024;

/// Wavelet prediction filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Linear interpolation in the lifting step.
    Linear,
    /// Cubic interpolation in the lifting step.
    Cubic,
}

/// Entropy-coding strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderKind {
    /// Fastest coding, lowest ratio.
    Fast,
    /// Balanced speed and ratio.
    Turbo,
    /// Context modelling, best ratio.
    Contextual,
}

/// Accepted filter tokens.
pub const FILTER_TOKENS: &[(&str, FilterKind)] =
    &[("linear", FilterKind::Linear), ("cubic", FilterKind::Cubic)];

/// Accepted encoder tokens.
pub const ENCODER_TOKENS: &[(&str, EncoderKind)] = &[
    ("fast", EncoderKind::Fast),
    ("turbo", EncoderKind::Turbo),
    ("contextual", EncoderKind::Contextual),
];

fn lookup<T: Copy>(table: &[(&str, T)], token: &str) -> Option<T> {
    table
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, kind)| *kind)
}

fn token_of<T: Copy + PartialEq>(table: &[(&'static str, T)], kind: T) -> &'static str {
    table
        .iter()
        .find(|(_, k)| *k == kind)
        .map(|(name, _)| *name)
        .unwrap_or("?")
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(token_of(FILTER_TOKENS, *self))
    }
}

impl fmt::Display for EncoderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(token_of(ENCODER_TOKENS, *self))
    }
}

/// Sample bit depth written to the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitDepth {
    /// Chosen from the sample type of the decoded image.
    Auto,
    /// 8 bits per sample.
    Eight,
    /// 16 bits per sample.
    Sixteen,
}

impl BitDepth {
    /// Resolve to a concrete bit count for samples of `bytes_per_sample` bytes.
    pub fn resolve(self, bytes_per_sample: usize) -> u8 {
        match self {
            BitDepth::Eight => 8,
            BitDepth::Sixteen => 16,
            BitDepth::Auto if bytes_per_sample >= 2 => 16,
            BitDepth::Auto => 8,
        }
    }
}

/// Quantization mode. The codec offers a single one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantizationMode {
    /// Scalar quantization.
    Scalar,
}

/// Byte order of the color channels in the raw pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder {
    /// Red, green, blue.
    Rgb,
    /// Blue, green, red.
    Bgr,
}

impl ChannelOrder {
    /// Order produced by the image loader. The `image` crate decodes to RGB.
    pub const LOADER_NATIVE: ChannelOrder = ChannelOrder::Rgb;
}

impl fmt::Display for ChannelOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelOrder::Rgb => f.write_str("RGB"),
            ChannelOrder::Bgr => f.write_str("BGR"),
        }
    }
}

/// Header fields that are not user-configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestDefaults {
    /// Number of image layers.
    pub layers: u16,
    /// Number of interleaved channels.
    pub channels: u16,
    /// Bit depth policy.
    pub bit_depth: BitDepth,
    /// Chroma quality is divided by this value.
    pub chroma_scale: u8,
    /// Block size exponent.
    pub block_size: u8,
    /// Quantization mode.
    pub quantization: QuantizationMode,
    /// Channel order declared to the codec.
    pub intent: ChannelOrder,
}

impl RequestDefaults {
    /// The fixed values baked into every request.
    pub const FIXED: RequestDefaults = RequestDefaults {
        layers: 1,
        channels: 3,
        bit_depth: BitDepth::Auto,
        chroma_scale: 8,
        block_size: 7,
        quantization: QuantizationMode::Scalar,
        intent: ChannelOrder::LOADER_NATIVE,
    };
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self::FIXED
    }
}

/// Parse a quality value. Zero and values above [`QUALITY_MAX`] are rejected.
pub fn parse_quality(text: &str) -> Result<u16> {
    match text.parse::<u16>() {
        Ok(quality) if quality > 0 && quality <= QUALITY_MAX => Ok(quality),
        _ => Err(GfwxEncodeError::InvalidQuality(text.to_string())),
    }
}

/// Parse a filter token (exact, case-sensitive).
pub fn parse_filter(text: &str) -> Result<FilterKind> {
    lookup(FILTER_TOKENS, text).ok_or_else(|| GfwxEncodeError::InvalidFilter(text.to_string()))
}

/// Parse an encoder token (exact, case-sensitive).
pub fn parse_encoder(text: &str) -> Result<EncoderKind> {
    lookup(ENCODER_TOKENS, text).ok_or_else(|| GfwxEncodeError::InvalidEncoder(text.to_string()))
}

/// A validated, immutable encoding request.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodingRequest {
    input_path: PathBuf,
    output_path: PathBuf,
    quality: u16,
    filter: FilterKind,
    encoder: EncoderKind,
    defaults: RequestDefaults,
}

impl EncodingRequest {
    /// Validate raw values into a request.
    ///
    /// Quality, filter and encoder are checked in that order; the first
    /// failure is returned.
    pub fn from_raw(
        input: &str,
        output: &str,
        quality: &str,
        filter: &str,
        encoder: &str,
    ) -> Result<Self> {
        if input.is_empty() || output.is_empty() {
            return Err(GfwxEncodeError::Usage(
                "input and output paths must not be empty".into(),
            ));
        }

        let quality = parse_quality(quality)?;
        let filter = parse_filter(filter)?;
        let encoder = parse_encoder(encoder)?;

        Ok(Self {
            input_path: PathBuf::from(input),
            output_path: PathBuf::from(output),
            quality,
            filter,
            encoder,
            defaults: RequestDefaults::FIXED,
        })
    }

    /// Source image path.
    pub fn input_path(&self) -> &PathBuf {
        &self.input_path
    }

    /// Destination path for the compressed artifact.
    pub fn output_path(&self) -> &PathBuf {
        &self.output_path
    }

    /// Quality in `1..=1024`.
    pub fn quality(&self) -> u16 {
        self.quality
    }

    /// Prediction filter.
    pub fn filter(&self) -> FilterKind {
        self.filter
    }

    /// Entropy-coding strategy.
    pub fn encoder(&self) -> EncoderKind {
        self.encoder
    }

    /// Fixed header fields.
    pub fn defaults(&self) -> &RequestDefaults {
        &self.defaults
    }
}
