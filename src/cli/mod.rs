//! Command-line interface for the GFWX encoder.

use std::ffi::OsString;

use clap::error::ErrorKind;
use clap::Parser;

use crate::config::EncodingRequest;
use crate::error::{GfwxEncodeError, Result};
use crate::loader;
use crate::pipeline::{EncodeInvoker, EncodeOutcome};

/// Program name shown in diagnostics.
pub const PROGRAM: &str = "gfwx-encode";

/// GFWX Encoder
///
/// Compresses a raster image into a GFWX wavelet artifact.
#[derive(Parser, Debug)]
#[command(name = PROGRAM)]
#[command(version)]
#[command(about = "Compress an image with the GFWX wavelet codec")]
#[command(long_about = None)]
#[command(allow_negative_numbers = true)]
pub struct Cli {
    /// Source image file
    #[arg(value_name = "INPUT")]
    pub input: String,

    /// Destination for the compressed artifact (overwritten)
    #[arg(value_name = "OUTPUT.GFWX")]
    pub output: String,

    /// Quality, from 1 to 1024 (1024 is lossless)
    #[arg(value_name = "QUALITY")]
    pub quality: String,

    /// Lifting filter: linear or cubic
    #[arg(value_name = "FILTER", allow_hyphen_values = true)]
    pub filter: String,

    /// Entropy encoder: fast, turbo or contextual
    #[arg(value_name = "ENCODER", allow_hyphen_values = true)]
    pub encoder: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Validate the positional values into a request.
    pub fn request(&self) -> Result<EncodingRequest> {
        EncodingRequest::from_raw(
            &self.input,
            &self.output,
            &self.quality,
            &self.filter,
            &self.encoder,
        )
    }
}

/// One-line usage synopsis.
pub fn usage() -> String {
    format!("Usage: {} INPUT OUTPUT.GFWX QUALITY FILTER ENCODER", PROGRAM)
}

/// Collapse a clap failure into a single-line usage error.
pub fn usage_error(err: &clap::Error) -> GfwxEncodeError {
    let reason = match err.kind() {
        ErrorKind::MissingRequiredArgument => "missing arguments",
        ErrorKind::UnknownArgument => "unexpected argument",
        _ => "invalid arguments",
    };
    GfwxEncodeError::Usage(format!("{}. {}", reason, usage()))
}

/// Parse `argv` (program name first) into a validated request.
///
/// The argument count is checked before any value is parsed.
pub fn build<I, T>(argv: I) -> Result<EncodingRequest>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(argv).map_err(|e| usage_error(&e))?;
    cli.request()
}

fn init_logging(verbose: bool, quiet: bool) {
    // By default stderr carries warnings and the final error line only.
    if verbose {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
            .try_init();
    } else if !quiet {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
            .try_init();
    }
}

/// Run the CLI application.
pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.quiet);

    let request = cli.request()?;

    if !cli.quiet {
        println!("quality: {}", request.quality());
        println!("filter: {}", request.filter());
        println!("encoder: {}", request.encoder());
        println!("intent: {}", request.defaults().intent);
    }

    let image = loader::load(request.input_path())?;
    log::info!(
        "Loaded {} ({}x{}, {} channels)",
        request.input_path().display(),
        image.width,
        image.height,
        image.channels
    );

    let outcome = EncodeInvoker::new().run(&image, &request)?;

    if !cli.quiet {
        print_outcome(&outcome);
    }

    Ok(())
}

fn print_outcome(outcome: &EncodeOutcome) {
    println!(
        "wrote {} bytes to {}",
        outcome.bytes_written,
        outcome.output_path.display()
    );
    println!("compression took {} microseconds", outcome.compress_time_us);
    log::debug!(
        "Buffer capacity {} bytes, compression ratio {:.2}:1",
        outcome.capacity,
        outcome.compression_ratio()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EncoderKind, FilterKind};
    use tempfile::TempDir;

    #[test]
    fn test_build_valid() {
        let request =
            build(["gfwx-encode", "in.png", "out.gfwx", "50", "linear", "fast"]).unwrap();
        assert_eq!(request.quality(), 50);
        assert_eq!(request.filter(), FilterKind::Linear);
        assert_eq!(request.encoder(), EncoderKind::Fast);
    }

    #[test]
    fn test_build_missing_encoder_is_usage_error() {
        // Quality is invalid too, but the count is checked first.
        let err = build(["gfwx-encode", "in.png", "out.gfwx", "0", "linear"]).unwrap_err();
        assert!(matches!(err, GfwxEncodeError::Usage(_)));
        assert!(err.to_string().contains("Usage:"));
    }

    #[test]
    fn test_build_no_arguments_is_usage_error() {
        assert!(matches!(
            build(["gfwx-encode"]),
            Err(GfwxEncodeError::Usage(_))
        ));
    }

    #[test]
    fn test_build_surplus_argument_is_usage_error() {
        let err = build([
            "gfwx-encode", "in.png", "out.gfwx", "50", "linear", "fast", "extra",
        ])
        .unwrap_err();
        assert!(matches!(err, GfwxEncodeError::Usage(_)));
    }

    #[test]
    fn test_negative_quality_reaches_validation() {
        let err = build(["gfwx-encode", "in.png", "out.gfwx", "-5", "linear", "fast"])
            .unwrap_err();
        assert!(matches!(err, GfwxEncodeError::InvalidQuality(_)));
    }

    #[test]
    fn test_build_reports_first_invalid_value() {
        let err = build(["gfwx-encode", "in", "out", "2000", "bicubic", "slow"]).unwrap_err();
        assert!(matches!(err, GfwxEncodeError::InvalidQuality(_)));

        let err = build(["gfwx-encode", "in", "out", "20", "bicubic", "slow"]).unwrap_err();
        assert!(matches!(err, GfwxEncodeError::InvalidFilter(_)));

        let err = build(["gfwx-encode", "in", "out", "20", "cubic", "slow"]).unwrap_err();
        assert!(matches!(err, GfwxEncodeError::InvalidEncoder(_)));
    }

    #[test]
    fn test_hyphen_tokens_reach_validation() {
        let err = build(["gfwx-encode", "in.png", "out.gfwx", "50", "-x", "fast"]).unwrap_err();
        assert!(matches!(err, GfwxEncodeError::InvalidFilter(ref t) if t == "-x"));

        let err = build(["gfwx-encode", "in.png", "out.gfwx", "50", "cubic", "-x"]).unwrap_err();
        assert!(matches!(err, GfwxEncodeError::InvalidEncoder(ref t) if t == "-x"));
    }

    #[test]
    fn test_flags_are_not_positionals() {
        let cli = Cli::try_parse_from([
            "gfwx-encode", "-q", "in.png", "out.gfwx", "50", "cubic", "turbo",
        ])
        .unwrap();
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert!(cli.request().is_ok());
    }

    #[test]
    fn test_run_validates_before_loading() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.gfwx");
        let cli = Cli::try_parse_from([
            "gfwx-encode",
            "-q",
            "does-not-exist.png",
            output.to_str().unwrap(),
            "50",
            "bicubic",
            "fast",
        ])
        .unwrap();

        let err = run(cli).unwrap_err();
        assert!(matches!(err, GfwxEncodeError::InvalidFilter(_)));
        assert!(!output.exists());
    }

    #[test]
    fn test_run_reports_missing_input() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.gfwx");
        let cli = Cli::try_parse_from([
            "gfwx-encode",
            "-q",
            dir.path().join("missing.png").to_str().unwrap(),
            output.to_str().unwrap(),
            "50",
            "linear",
            "fast",
        ])
        .unwrap();

        assert!(matches!(
            run(cli),
            Err(GfwxEncodeError::ImageLoad { .. })
        ));
        assert!(!output.exists());
    }

    #[test]
    fn test_usage_line() {
        assert_eq!(
            usage(),
            "Usage: gfwx-encode INPUT OUTPUT.GFWX QUALITY FILTER ENCODER"
        );
    }
}
