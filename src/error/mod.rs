//! Error types for the GFWX encoder.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for the library.
pub type Result<T> = std::result::Result<T, GfwxEncodeError>;

/// Main error type for the encoder.
///
/// Every variant is terminal for the process and maps to exit code 1.
#[derive(Error, Debug)]
pub enum GfwxEncodeError {
    /// Wrong number of arguments or an unparsable command line.
    #[error("{0}")]
    Usage(String),

    /// Quality is not a decimal integer in `1..=1024`.
    #[error("Wrong quality value '{0}': expected an integer in 1..=1024")]
    InvalidQuality(String),

    /// Unknown filter token.
    #[error("Wrong filter value '{0}': expected one of linear, cubic")]
    InvalidFilter(String),

    /// Unknown encoder token.
    #[error("Wrong encoder value '{0}': expected one of fast, turbo, contextual")]
    InvalidEncoder(String),

    /// The source image could not be read or decoded.
    #[error("Failed to load image {}: {reason}", path.display())]
    ImageLoad {
        /// Path that was being loaded.
        path: PathBuf,
        /// Loader diagnostic.
        reason: String,
    },

    /// The codec rejected the input or reported an unusable result.
    #[error("Encode error: {0}")]
    Encode(String),

    /// The compressed artifact could not be written.
    #[error("I/O error: cannot write {}: {source}", path.display())]
    Output {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostics_name_the_parameter() {
        let quality = GfwxEncodeError::InvalidQuality("0".into()).to_string();
        assert!(quality.contains("quality"));
        assert!(quality.contains("'0'"));

        let filter = GfwxEncodeError::InvalidFilter("bicubic".into()).to_string();
        assert!(filter.contains("filter"));

        let encoder = GfwxEncodeError::InvalidEncoder("slow".into()).to_string();
        assert!(encoder.contains("encoder"));
    }

    #[test]
    fn test_diagnostics_are_single_line() {
        let err = GfwxEncodeError::Output {
            path: PathBuf::from("/nowhere/out.gfwx"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let text = err.to_string();
        assert!(!text.contains('\n'));
        assert!(text.contains("/nowhere/out.gfwx"));
    }
}
