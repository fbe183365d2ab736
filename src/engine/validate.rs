//! Validation of raw options into an `EncodingConfig`.
//!
//! Validation is all-or-nothing: a config is only produced when every field
//! checks out. Fields that do not apply to the selected encoders are dropped
//! and reported as notices rather than errors.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::engine::core::menus::{
    AUDIO_BITRATE_MENU, DEFAULT_KEY_URI, DEFAULT_SEGMENT_SECONDS, video_bitrate_menu,
};
use crate::engine::core::{
    AudioSettings, Bitrate, EncodingConfig, EncryptionPolicy, KEY_ROTATION_RANGE, PlaylistType,
    RawOptions, Resolution, SEGMENT_SECONDS_RANGE, VideoEncode, VideoSettings,
};
use crate::engine::encoder::{AudioCodec, VideoCodec};

/// Validation error types
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("Missing required field '{field}'")]
    MissingField { field: &'static str },

    #[error("Field '{field}' value '{value}' is out of range (allowed: {allowed})")]
    OutOfRange {
        field: &'static str,
        value: String,
        allowed: String,
    },

    #[error("Field '{field}' is invalid: {reason}")]
    InvalidCombination { field: &'static str, reason: String },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field }
            | Self::OutOfRange { field, .. }
            | Self::InvalidCombination { field, .. } => field,
        }
    }
}

/// A raw field that was supplied but does not apply to the validated config
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub config: EncodingConfig,
    pub notices: Vec<Notice>,
}

/// Validate raw options, returning the first error found
pub fn validate(raw: &RawOptions) -> Result<EncodingConfig, ValidationError> {
    let mut notices = Vec::new();
    CheckedFields::check(raw, &mut notices).into_config()
}

/// Validate raw options, reporting every invalid field at once
pub fn validate_report(raw: &RawOptions) -> Result<ValidationReport, Vec<ValidationError>> {
    let mut notices = Vec::new();
    let checked = CheckedFields::check(raw, &mut notices);

    let errors = checked.errors();
    if !errors.is_empty() {
        debug!(count = errors.len(), "options rejected");
        return Err(errors);
    }

    for notice in &notices {
        debug!(field = notice.field, "{}", notice.message);
    }

    checked
        .into_config()
        .map(|config| ValidationReport { config, notices })
        .map_err(|e| vec![e])
}

type Checked<T> = Result<T, ValidationError>;

/// Per-field outcome, kept separate so all errors can be reported together
struct CheckedFields {
    input_path: Checked<String>,
    output_dir: Checked<String>,
    output_name: Checked<String>,
    video: Checked<VideoSettings>,
    audio: Checked<AudioSettings>,
    segment_seconds: Checked<u32>,
    playlist_type: Checked<PlaylistType>,
    encryption: Checked<Option<EncryptionPolicy>>,
}

impl CheckedFields {
    fn check(raw: &RawOptions, notices: &mut Vec<Notice>) -> Self {
        Self {
            input_path: required_path("input_path", raw.input_path.as_deref()),
            output_dir: check_output_dir(raw.output_dir.as_deref()),
            output_name: check_output_name(raw.output_name.as_deref()),
            video: check_video(raw, notices),
            audio: check_audio(raw, notices),
            segment_seconds: check_segment_seconds(raw.segment_seconds),
            playlist_type: check_playlist_type(present(&raw.playlist_type)),
            encryption: check_encryption(raw, notices),
        }
    }

    fn errors(&self) -> Vec<ValidationError> {
        [
            self.input_path.as_ref().err(),
            self.output_dir.as_ref().err(),
            self.output_name.as_ref().err(),
            self.video.as_ref().err(),
            self.audio.as_ref().err(),
            self.segment_seconds.as_ref().err(),
            self.playlist_type.as_ref().err(),
            self.encryption.as_ref().err(),
        ]
        .into_iter()
        .flatten()
        .cloned()
        .collect()
    }

    fn into_config(self) -> Result<EncodingConfig, ValidationError> {
        Ok(EncodingConfig::new(
            self.input_path?,
            self.output_dir?,
            self.output_name?,
            self.video?,
            self.audio?,
            self.segment_seconds?,
            self.playlist_type?,
            self.encryption?,
        ))
    }
}

/// Treat blank form values as unset
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn dropped(field: &'static str, reason: &str) -> Notice {
    Notice {
        field,
        message: format!("'{}' ignored: {}", field, reason),
    }
}

fn required_path(field: &'static str, value: Option<&str>) -> Checked<String> {
    let value = value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ValidationError::MissingField { field })?;

    if value.contains('\0') {
        return Err(ValidationError::InvalidCombination {
            field,
            reason: "contains a NUL byte".to_string(),
        });
    }
    Ok(value.to_string())
}

/// Strip trailing slashes; a lone root stays "/". A directory that is blank
/// once its slashes are gone counts as missing.
fn check_output_dir(value: Option<&str>) -> Checked<String> {
    let dir = required_path("output_dir", value)?;
    let trimmed = dir.trim_end_matches('/');
    if !trimmed.is_empty() && trimmed.trim().is_empty() {
        return Err(ValidationError::MissingField {
            field: "output_dir",
        });
    }
    if trimmed.is_empty() {
        Ok("/".to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

fn check_output_name(value: Option<&str>) -> Checked<String> {
    let name = required_path("output_name", value)?;
    if name.contains(['/', '\\']) {
        return Err(ValidationError::InvalidCombination {
            field: "output_name",
            reason: format!("'{}' must be a bare name without path separators", name),
        });
    }
    Ok(name)
}

fn check_video(raw: &RawOptions, notices: &mut Vec<Notice>) -> Checked<VideoSettings> {
    let codec = match present(&raw.video_encoder) {
        None => VideoCodec::Copy,
        Some(s) => s.parse::<VideoCodec>().map_err(|_| ValidationError::OutOfRange {
            field: "video_encoder",
            value: s.to_string(),
            allowed: VideoCodec::identifiers().collect::<Vec<_>>().join(", "),
        })?,
    };

    let encoder = match codec {
        VideoCodec::Copy => {
            if present(&raw.resolution).is_some() {
                notices.push(dropped("resolution", "video stream is copied"));
            }
            if present(&raw.video_bitrate).is_some() {
                notices.push(dropped("video_bitrate", "video stream is copied"));
            }
            return Ok(VideoSettings::Copy);
        }
        VideoCodec::Encode(encoder) => encoder,
    };

    let resolution = match present(&raw.resolution) {
        None => Resolution::Original,
        Some(s) => s.parse::<Resolution>().map_err(|_| ValidationError::OutOfRange {
            field: "resolution",
            value: s.to_string(),
            allowed: Resolution::ALL
                .iter()
                .map(|r| r.label())
                .collect::<Vec<_>>()
                .join(", "),
        })?,
    };

    let menu = video_bitrate_menu(resolution);
    let bitrate = match present(&raw.video_bitrate) {
        None => menu.default_bitrate(),
        Some(s) => {
            let bitrate: Bitrate = s.parse().map_err(|_| ValidationError::OutOfRange {
                field: "video_bitrate",
                value: s.to_string(),
                allowed: menu.describe(),
            })?;
            if !menu.contains(bitrate) {
                return Err(ValidationError::InvalidCombination {
                    field: "video_bitrate",
                    reason: format!(
                        "{} is not offered at resolution {} (choose one of {})",
                        bitrate,
                        resolution,
                        menu.describe()
                    ),
                });
            }
            bitrate
        }
    };

    Ok(VideoSettings::Encode(VideoEncode {
        encoder,
        resolution,
        bitrate,
    }))
}

fn check_audio(raw: &RawOptions, notices: &mut Vec<Notice>) -> Checked<AudioSettings> {
    let codec = match present(&raw.audio_encoder) {
        None => AudioCodec::Copy,
        Some(s) => s.parse::<AudioCodec>().map_err(|_| ValidationError::OutOfRange {
            field: "audio_encoder",
            value: s.to_string(),
            allowed: AudioCodec::ALL
                .iter()
                .map(|c| c.ffmpeg_name())
                .collect::<Vec<_>>()
                .join(", "),
        })?,
    };

    match codec {
        AudioCodec::Copy => {
            if present(&raw.audio_bitrate).is_some() {
                notices.push(dropped("audio_bitrate", "audio stream is copied"));
            }
            Ok(AudioSettings::Copy)
        }
        AudioCodec::Aac => {
            let bitrate = match present(&raw.audio_bitrate) {
                None => AUDIO_BITRATE_MENU.default_bitrate(),
                Some(s) => s
                    .parse::<Bitrate>()
                    .ok()
                    .filter(|b| AUDIO_BITRATE_MENU.contains(*b))
                    .ok_or_else(|| ValidationError::OutOfRange {
                        field: "audio_bitrate",
                        value: s.to_string(),
                        allowed: AUDIO_BITRATE_MENU.describe(),
                    })?,
            };
            Ok(AudioSettings::Aac { bitrate })
        }
    }
}

fn range_text(range: &std::ops::RangeInclusive<u32>) -> String {
    format!("{}-{}", range.start(), range.end())
}

fn check_segment_seconds(value: Option<i64>) -> Checked<u32> {
    let Some(seconds) = value else {
        return Ok(DEFAULT_SEGMENT_SECONDS);
    };
    u32::try_from(seconds)
        .ok()
        .filter(|s| SEGMENT_SECONDS_RANGE.contains(s))
        .ok_or_else(|| ValidationError::OutOfRange {
            field: "segment_seconds",
            value: seconds.to_string(),
            allowed: range_text(&SEGMENT_SECONDS_RANGE),
        })
}

fn check_playlist_type(value: Option<&str>) -> Checked<PlaylistType> {
    match value {
        None => Ok(PlaylistType::default()),
        Some(s) => s.parse::<PlaylistType>().map_err(|_| ValidationError::OutOfRange {
            field: "playlist_type",
            value: s.to_string(),
            allowed: PlaylistType::Vod.as_str().to_string(),
        }),
    }
}

fn check_encryption(
    raw: &RawOptions,
    notices: &mut Vec<Notice>,
) -> Checked<Option<EncryptionPolicy>> {
    if !raw.encryption_enabled.unwrap_or(false) {
        if raw.key_rotation_period.is_some() {
            notices.push(dropped("key_rotation_period", "encryption is disabled"));
        }
        if present(&raw.key_uri).is_some() {
            notices.push(dropped("key_uri", "encryption is disabled"));
        }
        return Ok(None);
    }

    let key_rotation_period = match raw.key_rotation_period {
        None => 0,
        Some(period) => u32::try_from(period)
            .ok()
            .filter(|p| KEY_ROTATION_RANGE.contains(p))
            .ok_or_else(|| ValidationError::OutOfRange {
                field: "key_rotation_period",
                value: period.to_string(),
                allowed: range_text(&KEY_ROTATION_RANGE),
            })?,
    };

    let key_uri = present(&raw.key_uri).unwrap_or(DEFAULT_KEY_URI);
    if key_uri.contains(['\n', '\r', '\0']) {
        return Err(ValidationError::InvalidCombination {
            field: "key_uri",
            reason: "must be a single line".to_string(),
        });
    }

    Ok(Some(EncryptionPolicy {
        key_rotation_period,
        key_uri: key_uri.to_string(),
    }))
}
