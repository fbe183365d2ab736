use serde::Serialize;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::engine::encoder::{AudioCodec, VideoCodec, VideoEncoder};

/// Allowed HLS segment durations in seconds
pub const SEGMENT_SECONDS_RANGE: RangeInclusive<u32> = 1..=10;

/// Allowed key rotation periods in segments (0 = fixed key)
pub const KEY_ROTATION_RANGE: RangeInclusive<u32> = 0..=100;

/// Bitrate in kilobits per second
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "String")]
pub struct Bitrate {
    kbps: u32,
}

impl Bitrate {
    pub const fn kbps(kbps: u32) -> Self {
        Self { kbps }
    }

    pub fn as_kbps(&self) -> u32 {
        self.kbps
    }
}

impl fmt::Display for Bitrate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}k", self.kbps)
    }
}

impl From<Bitrate> for String {
    fn from(b: Bitrate) -> Self {
        b.to_string()
    }
}

impl FromStr for Bitrate {
    type Err = ();

    /// Accepts "6000k", "6000" (kbps) and "6M"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (digits, multiplier) = if let Some(n) = s.strip_suffix(['k', 'K']) {
            (n, 1)
        } else if let Some(n) = s.strip_suffix(['m', 'M']) {
            (n, 1000)
        } else {
            (s, 1)
        };
        let value: u32 = digits.trim().parse().map_err(|_| ())?;
        value
            .checked_mul(multiplier)
            .filter(|kbps| *kbps > 0)
            .map(Bitrate::kbps)
            .ok_or(())
    }
}

/// Output resolution presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Resolution {
    Original,
    #[serde(rename = "4K")]
    Uhd4k,
    #[serde(rename = "2K")]
    Qhd2k,
    #[serde(rename = "1080p")]
    P1080,
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "480p")]
    P480,
    #[serde(rename = "360p")]
    P360,
}

impl Resolution {
    pub const ALL: [Resolution; 7] = [
        Resolution::Original,
        Resolution::Uhd4k,
        Resolution::Qhd2k,
        Resolution::P1080,
        Resolution::P720,
        Resolution::P480,
        Resolution::P360,
    ];

    /// Pixel dimensions, None for Original
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match self {
            Self::Original => None,
            Self::Uhd4k => Some((3840, 2160)),
            Self::Qhd2k => Some((2560, 1440)),
            Self::P1080 => Some((1920, 1080)),
            Self::P720 => Some((1280, 720)),
            Self::P480 => Some((854, 480)),
            Self::P360 => Some((640, 360)),
        }
    }

    /// Value for ffmpeg's `-s` flag ("WxH")
    pub fn size_arg(&self) -> Option<String> {
        self.dimensions().map(|(w, h)| format!("{}x{}", w, h))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Uhd4k => "4K",
            Self::Qhd2k => "2K",
            Self::P1080 => "1080p",
            Self::P720 => "720p",
            Self::P480 => "480p",
            Self::P360 => "360p",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Resolution {
    type Err = ();

    /// Accepts labels ("1080p", "4k", "original") or pixel strings ("1920x1080")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .iter()
            .find(|r| {
                r.label().eq_ignore_ascii_case(s)
                    || r.size_arg().is_some_and(|dims| dims.eq_ignore_ascii_case(s))
            })
            .copied()
            .ok_or(())
    }
}

/// HLS playlist type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaylistType {
    #[default]
    Vod,
}

impl PlaylistType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vod => "vod",
        }
    }
}

impl FromStr for PlaylistType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("vod") {
            Ok(Self::Vod)
        } else {
            Err(())
        }
    }
}

/// AES-128 segment encryption settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncryptionPolicy {
    /// Segments per key; 0 keeps a single fixed key
    pub key_rotation_period: u32,
    /// URI written into the key info file for players to fetch the key
    pub key_uri: String,
}

/// Re-encode parameters; only exists when the video is not stream-copied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VideoEncode {
    pub encoder: VideoEncoder,
    pub resolution: Resolution,
    pub bitrate: Bitrate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum VideoSettings {
    Copy,
    Encode(VideoEncode),
}

impl VideoSettings {
    pub fn codec(&self) -> VideoCodec {
        match self {
            Self::Copy => VideoCodec::Copy,
            Self::Encode(v) => VideoCodec::Encode(v.encoder),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AudioSettings {
    Copy,
    Aac { bitrate: Bitrate },
}

impl AudioSettings {
    pub fn codec(&self) -> AudioCodec {
        match self {
            Self::Copy => AudioCodec::Copy,
            Self::Aac { .. } => AudioCodec::Aac,
        }
    }

    pub fn bitrate(&self) -> Option<Bitrate> {
        match self {
            Self::Copy => None,
            Self::Aac { bitrate } => Some(*bitrate),
        }
    }
}

/// A validated description of one transcode/segment job.
///
/// Only `engine::validate` constructs this type, so every value that reaches
/// the compiler already satisfies the bitrate menu, range and path rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodingConfig {
    input_path: String,
    output_dir: String,
    output_name: String,
    video: VideoSettings,
    audio: AudioSettings,
    segment_seconds: u32,
    playlist_type: PlaylistType,
    encryption: Option<EncryptionPolicy>,
}

impl EncodingConfig {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        input_path: String,
        output_dir: String,
        output_name: String,
        video: VideoSettings,
        audio: AudioSettings,
        segment_seconds: u32,
        playlist_type: PlaylistType,
        encryption: Option<EncryptionPolicy>,
    ) -> Self {
        Self {
            input_path,
            output_dir,
            output_name,
            video,
            audio,
            segment_seconds,
            playlist_type,
            encryption,
        }
    }

    pub fn input_path(&self) -> &str {
        &self.input_path
    }

    pub fn output_dir(&self) -> &str {
        &self.output_dir
    }

    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    pub fn video(&self) -> &VideoSettings {
        &self.video
    }

    pub fn audio(&self) -> &AudioSettings {
        &self.audio
    }

    pub fn segment_seconds(&self) -> u32 {
        self.segment_seconds
    }

    pub fn playlist_type(&self) -> PlaylistType {
        self.playlist_type
    }

    pub fn encryption(&self) -> Option<&EncryptionPolicy> {
        self.encryption.as_ref()
    }

    /// Join a file name onto the output directory with a forward slash
    pub fn output_file(&self, file_name: &str) -> String {
        if self.output_dir == "/" {
            format!("/{}", file_name)
        } else {
            format!("{}/{}", self.output_dir, file_name)
        }
    }
}
