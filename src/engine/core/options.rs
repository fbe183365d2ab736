use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::types::{EncodingConfig, VideoSettings};

/// Loosely typed option bag as submitted by a form, a CLI or an options file.
///
/// Every field is optional; `engine::validate` applies defaults and rejects
/// inconsistent combinations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawOptions {
    #[serde(alias = "inputPath")]
    pub input_path: Option<String>,
    #[serde(alias = "outputDir")]
    pub output_dir: Option<String>,
    #[serde(alias = "outputName")]
    pub output_name: Option<String>,

    #[serde(alias = "videoEncoder")]
    pub video_encoder: Option<String>,
    pub resolution: Option<String>,
    #[serde(alias = "videoBitrate")]
    pub video_bitrate: Option<String>,

    #[serde(alias = "audioEncoder")]
    pub audio_encoder: Option<String>,
    #[serde(alias = "audioBitrate")]
    pub audio_bitrate: Option<String>,

    #[serde(alias = "segmentSeconds")]
    pub segment_seconds: Option<i64>,
    #[serde(alias = "playlistType")]
    pub playlist_type: Option<String>,

    #[serde(alias = "encryptionEnabled")]
    pub encryption_enabled: Option<bool>,
    #[serde(alias = "keyRotationPeriod")]
    pub key_rotation_period: Option<i64>,
    #[serde(alias = "keyUri")]
    pub key_uri: Option<String>,
}

impl RawOptions {
    pub fn new(input_path: &str, output_dir: &str, output_name: &str) -> Self {
        Self {
            input_path: Some(input_path.to_string()),
            output_dir: Some(output_dir.to_string()),
            output_name: Some(output_name.to_string()),
            ..Self::default()
        }
    }

    /// Load options from a `.toml` or `.json` file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read options file: {}", path.display()))?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse options file: {}", path.display())),
            Some("toml") => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse options file: {}", path.display())),
            _ => bail!(
                "Unsupported options file (expected .toml or .json): {}",
                path.display()
            ),
        }
    }

    /// Overlay: fields set in `other` win over fields set in `self`
    pub fn merge(self, other: RawOptions) -> RawOptions {
        RawOptions {
            input_path: other.input_path.or(self.input_path),
            output_dir: other.output_dir.or(self.output_dir),
            output_name: other.output_name.or(self.output_name),
            video_encoder: other.video_encoder.or(self.video_encoder),
            resolution: other.resolution.or(self.resolution),
            video_bitrate: other.video_bitrate.or(self.video_bitrate),
            audio_encoder: other.audio_encoder.or(self.audio_encoder),
            audio_bitrate: other.audio_bitrate.or(self.audio_bitrate),
            segment_seconds: other.segment_seconds.or(self.segment_seconds),
            playlist_type: other.playlist_type.or(self.playlist_type),
            encryption_enabled: other.encryption_enabled.or(self.encryption_enabled),
            key_rotation_period: other.key_rotation_period.or(self.key_rotation_period),
            key_uri: other.key_uri.or(self.key_uri),
        }
    }
}

impl From<&EncodingConfig> for RawOptions {
    fn from(cfg: &EncodingConfig) -> Self {
        let (video_encoder, resolution, video_bitrate) = match cfg.video() {
            VideoSettings::Copy => ("copy".to_string(), None, None),
            VideoSettings::Encode(v) => (
                v.encoder.ffmpeg_name().to_string(),
                Some(v.resolution.label().to_string()),
                Some(v.bitrate.to_string()),
            ),
        };

        RawOptions {
            input_path: Some(cfg.input_path().to_string()),
            output_dir: Some(cfg.output_dir().to_string()),
            output_name: Some(cfg.output_name().to_string()),
            video_encoder: Some(video_encoder),
            resolution,
            video_bitrate,
            audio_encoder: Some(cfg.audio().codec().ffmpeg_name().to_string()),
            audio_bitrate: cfg.audio().bitrate().map(|b| b.to_string()),
            segment_seconds: Some(i64::from(cfg.segment_seconds())),
            playlist_type: Some(cfg.playlist_type().as_str().to_string()),
            encryption_enabled: Some(cfg.encryption().is_some()),
            key_rotation_period: cfg.encryption().map(|e| i64::from(e.key_rotation_period)),
            key_uri: cfg.encryption().map(|e| e.key_uri.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_snake_and_camel_case() {
        let snake: RawOptions = toml::from_str(
            r#"
            input_path = "in.mp4"
            video_encoder = "libx264"
            segment_seconds = 6
            "#,
        )
        .unwrap();
        let camel: RawOptions = serde_json::from_str(
            r#"{"inputPath": "in.mp4", "videoEncoder": "libx264", "segmentSeconds": 6}"#,
        )
        .unwrap();
        assert_eq!(snake, camel);
        assert_eq!(snake.segment_seconds, Some(6));
        assert_eq!(snake.output_dir, None);
    }

    #[test]
    fn test_merge_prefers_overlay() {
        let base = RawOptions {
            video_encoder: Some("copy".into()),
            segment_seconds: Some(10),
            ..RawOptions::new("a.mp4", "out", "playlist")
        };
        let overlay = RawOptions {
            video_encoder: Some("h264_qsv".into()),
            ..RawOptions::default()
        };
        let merged = base.merge(overlay);
        assert_eq!(merged.video_encoder.as_deref(), Some("h264_qsv"));
        assert_eq!(merged.segment_seconds, Some(10));
        assert_eq!(merged.input_path.as_deref(), Some("a.mp4"));
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.yaml");
        fs::write(&path, "input_path: a.mp4").unwrap();
        assert!(RawOptions::load(&path).is_err());
    }

    #[test]
    fn test_load_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.toml");
        fs::write(&path, "input_path = \"a.mp4\"\nencryption_enabled = true\n").unwrap();
        let raw = RawOptions::load(&path).unwrap();
        assert_eq!(raw.input_path.as_deref(), Some("a.mp4"));
        assert_eq!(raw.encryption_enabled, Some(true));
    }
}
