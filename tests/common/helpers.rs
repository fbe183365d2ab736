#![allow(dead_code)]

use hlscmd::engine::{CompiledCommand, EncodingConfig, RawOptions, compile, validate};

/// Options with the default form paths and everything else unset
pub fn base_options() -> RawOptions {
    RawOptions::new("input.mp4", "output", "playlist")
}

pub fn validated(raw: &RawOptions) -> EncodingConfig {
    validate(raw).unwrap_or_else(|e| panic!("options should validate: {}", e))
}

pub fn compile_options(raw: &RawOptions) -> CompiledCommand {
    compile(&validated(raw))
}

/// Rendered display string for a set of options
pub fn render_options(raw: &RawOptions) -> String {
    compile_options(raw).render()
}

/// Unquoted argv for a set of options
pub fn argv(raw: &RawOptions) -> Vec<String> {
    compile_options(raw).arguments().map(str::to_string).collect()
}

pub fn transcode(encoder: &str, resolution: &str, bitrate: &str) -> RawOptions {
    RawOptions {
        video_encoder: Some(encoder.to_string()),
        resolution: Some(resolution.to_string()),
        video_bitrate: Some(bitrate.to_string()),
        ..base_options()
    }
}
