//! Config file defaults layered under options files and flags

use hlscmd::config::Config;
use hlscmd::engine::{Compiler, RawOptions, compile, validate};
use std::fs;

#[test]
fn test_config_file_defaults_fill_options() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[tool]
ffmpeg_path = "/opt/ffmpeg/bin/ffmpeg"

[defaults]
output_dir = "/srv/hls"
video_encoder = "libx264"
audio_encoder = "aac"
segment_seconds = 6
"#,
    )?;

    let config = Config::load_from(&path)?;
    let raw = config.apply_defaults(RawOptions {
        input_path: Some("movie.mp4".into()),
        ..RawOptions::default()
    });

    let cfg = validate(&raw)?;
    assert_eq!(cfg.output_dir(), "/srv/hls");
    assert_eq!(cfg.output_name(), "playlist");
    assert_eq!(cfg.segment_seconds(), 6);

    let cmd = Compiler::new(config.tool.ffmpeg_path.as_str())
        .compile(&cfg)
        .render();
    assert!(cmd.starts_with("/opt/ffmpeg/bin/ffmpeg -y -i \"movie.mp4\""));
    assert!(cmd.contains("-c:v libx264 -b:v 6000k -preset fast -c:a aac -b:a 128k"));
    Ok(())
}

#[test]
fn test_options_file_overrides_config_and_flags_override_file() {
    let dir = tempfile::tempdir().unwrap();
    let options_path = dir.path().join("job.json");
    fs::write(
        &options_path,
        r#"{
            "inputPath": "in.mp4",
            "videoEncoder": "h264_nvenc",
            "resolution": "720p",
            "videoBitrate": "4000k",
            "segmentSeconds": 2
        }"#,
    )
    .unwrap();

    let from_file = RawOptions::load(&options_path).unwrap();
    let flags = RawOptions {
        video_bitrate: Some("2500k".into()),
        ..RawOptions::default()
    };
    let raw = Config::default().apply_defaults(from_file.merge(flags));

    let cfg = validate(&raw).unwrap();
    let args: Vec<String> = compile(&cfg).arguments().map(str::to_string).collect();
    assert!(args.windows(2).any(|w| w == ["-c:v", "h264_nvenc"]));
    assert!(args.windows(2).any(|w| w == ["-b:v", "2500k"]));
    assert!(args.windows(2).any(|w| w == ["-hls_time", "2"]));
    assert_eq!(cfg.output_dir(), "output");
}

#[test]
fn test_config_key_uri_used_only_when_encrypting() {
    let mut config = Config::default();
    config.defaults.key_uri = "https://keys.example.com/k".to_string();

    let plain = config.apply_defaults(RawOptions::new("in.mp4", "out", "pl"));
    assert_eq!(plain.key_uri, None);

    let encrypted = config.apply_defaults(RawOptions {
        encryption_enabled: Some(true),
        ..RawOptions::new("in.mp4", "out", "pl")
    });
    let cmd = compile(&validate(&encrypted).unwrap());
    assert_eq!(
        cmd.keyinfo_contents().as_deref(),
        Some("https://keys.example.com/k\nout/enc.key\n")
    );
}
