//! Encoding pipeline.
//!
//! Sizes the output buffer, runs the codec exactly once and writes the
//! produced byte range to disk. There is no retry: a codec that needs more
//! room than [`estimate_buffer_capacity`] provides is reported as an error.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::codec::{Codec, GfwxCodec, HeaderConfig};
use crate::config::EncodingRequest;
use crate::error::{GfwxEncodeError, Result};
use crate::DecodedImage;

/// Smallest buffer ever allocated, enough for a bare header.
pub const MIN_BUFFER_CAPACITY: usize = 256;

/// Headroom over the raw image size for incompressible inputs.
pub const BUFFER_SAFETY_FACTOR: usize = 2;

/// Worst-case compressed size for `image`.
///
/// `max(256, pixels * bytes_per_pixel * 2)`, saturating on overflow.
pub fn estimate_buffer_capacity(image: &DecodedImage) -> usize {
    image
        .pixel_count()
        .saturating_mul(image.bytes_per_pixel())
        .saturating_mul(BUFFER_SAFETY_FACTOR)
        .max(MIN_BUFFER_CAPACITY)
}

/// Fixed-size destination for compressed bytes.
#[derive(Debug)]
pub struct OutputBuffer {
    bytes: Vec<u8>,
}

impl OutputBuffer {
    /// Allocate a zero-filled buffer of `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: vec![0; capacity],
        }
    }

    /// Allocate a buffer sized by [`estimate_buffer_capacity`].
    pub fn for_image(image: &DecodedImage) -> Self {
        Self::with_capacity(estimate_buffer_capacity(image))
    }

    /// Capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// The whole buffer, for the codec to write into.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// The first `len` bytes, or `None` if `len` exceeds the capacity.
    pub fn written(&self, len: usize) -> Option<&[u8]> {
        self.bytes.get(..len)
    }
}

/// Summary of a completed encode.
#[derive(Debug, Clone)]
pub struct EncodeOutcome {
    /// Where the artifact was written.
    pub output_path: PathBuf,
    /// Raw pixel bytes fed to the codec.
    pub original_size: usize,
    /// Allocated buffer capacity.
    pub capacity: usize,
    /// Bytes produced by the codec and written to disk.
    pub bytes_written: usize,
    /// Time spent inside the codec, in microseconds.
    pub compress_time_us: u64,
}

impl EncodeOutcome {
    /// Raw size divided by compressed size.
    pub fn compression_ratio(&self) -> f64 {
        if self.bytes_written == 0 {
            0.0
        } else {
            self.original_size as f64 / self.bytes_written as f64
        }
    }
}

/// Runs a codec once per request.
pub struct EncodeInvoker {
    codec: Box<dyn Codec>,
}

impl EncodeInvoker {
    /// Create an invoker backed by the GFWX codec.
    pub fn new() -> Self {
        Self::with_codec(Box::new(GfwxCodec::new()))
    }

    /// Create an invoker backed by `codec`.
    pub fn with_codec(codec: Box<dyn Codec>) -> Self {
        Self { codec }
    }

    /// Compress `image` into `buffer` and return the byte count.
    pub fn encode(
        &self,
        image: &DecodedImage,
        request: &EncodingRequest,
        buffer: &mut OutputBuffer,
    ) -> Result<usize> {
        let header = HeaderConfig::new(request, image);
        log::debug!("{} header: {:?}", self.codec.name(), header);

        let capacity = buffer.capacity();
        let written = self
            .codec
            .compress(image, &header, buffer.as_mut_slice(), None)?;

        if written > capacity {
            return Err(GfwxEncodeError::Encode(format!(
                "codec reported {} bytes for a {} byte buffer",
                written, capacity
            )));
        }
        if written == 0 {
            log::warn!("{} produced an empty stream", self.codec.name());
        }

        Ok(written)
    }

    /// Estimate, encode and persist.
    pub fn run(&self, image: &DecodedImage, request: &EncodingRequest) -> Result<EncodeOutcome> {
        let mut buffer = OutputBuffer::for_image(image);
        log::debug!(
            "Allocated {} byte output buffer for {}x{} image",
            buffer.capacity(),
            image.width,
            image.height
        );

        let start = Instant::now();
        let bytes_written = self.encode(image, request, &mut buffer)?;
        let compress_time_us = start.elapsed().as_micros() as u64;
        log::debug!("Compression took {} microseconds", compress_time_us);

        persist(request.output_path(), &buffer, bytes_written)?;

        Ok(EncodeOutcome {
            output_path: request.output_path().clone(),
            original_size: image.pixel_data.len(),
            capacity: buffer.capacity(),
            bytes_written,
            compress_time_us,
        })
    }
}

impl Default for EncodeInvoker {
    fn default() -> Self {
        Self::new()
    }
}

/// Write the first `len` bytes of `buffer` to `path`, replacing any existing file.
pub fn persist<P: AsRef<Path>>(path: P, buffer: &OutputBuffer, len: usize) -> Result<()> {
    let path = path.as_ref();
    let bytes = buffer.written(len).ok_or_else(|| {
        GfwxEncodeError::Encode(format!(
            "cannot write {} bytes from a {} byte buffer",
            len,
            buffer.capacity()
        ))
    })?;

    let output_err = |source: std::io::Error| GfwxEncodeError::Output {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::create(path).map_err(output_err)?;
    file.write_all(bytes).map_err(output_err)?;

    log::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
