//! Codec seam.
//!
//! This module provides the `Codec` trait, the flat [`HeaderConfig`] record
//! and the GFWX implementation.

mod gfwx_codec;
mod traits;

pub use self::gfwx_codec::GfwxCodec;
pub use self::traits::{Codec, CompressContext, HeaderConfig};
