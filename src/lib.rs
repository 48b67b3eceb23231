pub mod cache;
pub mod codec;
pub mod config;
pub mod convert;
pub mod error;
pub mod pipeline;
pub mod record;
pub mod report;
pub mod source;

pub use codec::{Codec, DecodeLimits, ImageRsCodec, Quality, RawImage};
pub use convert::{CancellationToken, ConvertedImage, Converter, convert};
pub use error::{ConvertError, Result};
