// HLS command engine - independent of the CLI

pub mod core;
pub mod encoder;
pub mod validate;

pub use self::core::*;
pub use encoder::{AudioCodec, EncoderFamily, VideoCodec, VideoEncoder};
pub use validate::{Notice, ValidationError, ValidationReport, validate, validate_report};
