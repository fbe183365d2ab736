//! Encoder catalogue: canonical ffmpeg identifiers and per-family tuning

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Video Encoders
// ============================================================================

/// Video encoders that re-encode the stream (stream copy is modeled separately)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoEncoder {
    LibX264,      // Software H.264
    Nvenc,        // NVIDIA NVENC H.264
    Qsv,          // Intel Quick Sync H.264
    VideoToolbox, // Apple VideoToolbox H.264
}

/// Hardware family of a video encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EncoderFamily {
    Software,
    Nvidia,
    Intel,
    Apple,
}

impl VideoEncoder {
    pub const ALL: [VideoEncoder; 4] = [
        VideoEncoder::LibX264,
        VideoEncoder::Nvenc,
        VideoEncoder::Qsv,
        VideoEncoder::VideoToolbox,
    ];

    /// Get the FFmpeg encoder name
    pub fn ffmpeg_name(&self) -> &'static str {
        match self {
            Self::LibX264 => "libx264",
            Self::Nvenc => "h264_nvenc",
            Self::Qsv => "h264_qsv",
            Self::VideoToolbox => "h264_videotoolbox",
        }
    }

    pub fn family(&self) -> EncoderFamily {
        match self {
            Self::LibX264 => EncoderFamily::Software,
            Self::Nvenc => EncoderFamily::Nvidia,
            Self::Qsv => EncoderFamily::Intel,
            Self::VideoToolbox => EncoderFamily::Apple,
        }
    }

    /// Check if this is a hardware encoder
    pub fn is_hardware(&self) -> bool {
        self.family() != EncoderFamily::Software
    }

    /// Get user-friendly display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::LibX264 => "H.264 Software (CPU, widest compatibility)",
            Self::Nvenc => "H.264 NVENC (NVIDIA)",
            Self::Qsv => "H.264 Quick Sync (Intel)",
            Self::VideoToolbox => "H.264 VideoToolbox (macOS)",
        }
    }

    /// Encoder-specific arguments emitted after the video bitrate
    pub fn tuning_args(&self) -> &'static [&'static str] {
        match self.family() {
            EncoderFamily::Software => &["-preset", "fast"],
            EncoderFamily::Nvidia => &["-preset", "p4", "-rc", "cbr"],
            EncoderFamily::Intel => &["-preset", "medium"],
            EncoderFamily::Apple => &["-allow_sw", "1"],
        }
    }
}

impl fmt::Display for VideoEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ffmpeg_name())
    }
}

/// Video codec selection: stream copy or one of the re-encoding encoders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoCodec {
    Copy,
    Encode(VideoEncoder),
}

impl VideoCodec {
    pub fn ffmpeg_name(&self) -> &'static str {
        match self {
            Self::Copy => "copy",
            Self::Encode(encoder) => encoder.ffmpeg_name(),
        }
    }

    /// All identifiers accepted on input, in menu order
    pub fn identifiers() -> impl Iterator<Item = &'static str> {
        std::iter::once("copy").chain(VideoEncoder::ALL.iter().map(|e| e.ffmpeg_name()))
    }
}

impl FromStr for VideoCodec {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("copy") {
            return Ok(Self::Copy);
        }
        VideoEncoder::ALL
            .iter()
            .find(|e| e.ffmpeg_name().eq_ignore_ascii_case(s))
            .map(|e| Self::Encode(*e))
            .ok_or(())
    }
}

// ============================================================================
// Audio Encoders
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioCodec {
    Copy,
    Aac,
}

impl AudioCodec {
    pub const ALL: [AudioCodec; 2] = [AudioCodec::Copy, AudioCodec::Aac];

    pub fn ffmpeg_name(&self) -> &'static str {
        match self {
            Self::Copy => "copy",
            Self::Aac => "aac",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Copy => "Stream copy (keep original audio)",
            Self::Aac => "AAC (re-encode, adjustable bitrate)",
        }
    }
}

impl FromStr for AudioCodec {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .iter()
            .find(|c| c.ffmpeg_name().eq_ignore_ascii_case(s))
            .copied()
            .ok_or(())
    }
}
