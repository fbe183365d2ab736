//! End-to-end option → command scenarios

use crate::common::assertions::*;
use crate::common::helpers::*;
use hlscmd::engine::{Compiler, RawOptions, VideoEncoder};

#[test]
fn test_stream_copy_has_no_encode_flags() {
    let cmd = render_options(&base_options());
    assert_cmd_contains(&cmd, "-c:v copy -c:a copy -f hls -hls_time 10 -hls_playlist_type vod");

    let args = argv(&base_options());
    for flag in ["-s", "-b:v", "-b:a", "-preset", "-rc", "-allow_sw", "-hls_enc"] {
        assert_no_flag(&args, flag);
    }
}

#[test]
fn test_libx264_full_encode() {
    let raw = RawOptions {
        audio_encoder: Some("aac".into()),
        audio_bitrate: Some("128k".into()),
        ..transcode("libx264", "1920x1080", "6000k")
    };
    assert_cmd_contains(
        &render_options(&raw),
        "-c:v libx264 -s 1920x1080 -b:v 6000k -preset fast -c:a aac -b:a 128k",
    );
}

#[test]
fn test_nvenc_uses_cbr_preset() {
    let cmd = render_options(&transcode("h264_nvenc", "1280x720", "3000k"));
    assert_cmd_contains(&cmd, "-preset p4 -rc cbr");
    assert_cmd_not_contains(&cmd, "-preset fast");
}

#[test]
fn test_qsv_uses_medium_preset() {
    let args = argv(&transcode("h264_qsv", "480p", "1500k"));
    assert_arg_pair(&args, "-s", "854x480");
    assert_arg_pair(&args, "-b:v", "1500k");
    assert_arg_pair(&args, "-preset", "medium");
    assert_no_flag(&args, "-rc");
}

#[test]
fn test_videotoolbox_allows_software_fallback() {
    let args = argv(&transcode("h264_videotoolbox", "4K", "20000k"));
    assert_arg_pair(&args, "-s", "3840x2160");
    assert_arg_pair(&args, "-allow_sw", "1");
    assert_no_flag(&args, "-preset");
}

#[test]
fn test_exactly_one_tuning_family_per_encoder() {
    for encoder in VideoEncoder::ALL {
        let args = argv(&transcode(encoder.ffmpeg_name(), "720p", "3000k"));
        let tuning_flags = args
            .iter()
            .filter(|a| matches!(a.as_str(), "-preset" | "-allow_sw"))
            .count();
        assert_eq!(tuning_flags, 1, "{}: {:?}", encoder, args);
    }
}

#[test]
fn test_segment_seconds_flow_through() {
    let raw = RawOptions {
        segment_seconds: Some(4),
        ..base_options()
    };
    assert_eq!(flag_value(&argv(&raw), "-hls_time"), Some("4"));
}

#[test]
fn test_paths_derived_from_output_dir() {
    let raw = RawOptions::new("/media/in/movie.mov", "/srv/hls/movie/", "index");
    let cmd = compile_options(&raw);
    assert_eq!(cmd.output_playlist_path(), "/srv/hls/movie/index.m3u8");
    assert_eq!(cmd.segment_pattern(), "/srv/hls/movie/segment_%03d.ts");

    let args: Vec<_> = cmd.arguments().collect();
    assert_eq!(args.last(), Some(&"/srv/hls/movie/index.m3u8"));
    assert_eq!(
        flag_value(&argv(&raw), "-hls_segment_filename"),
        Some("/srv/hls/movie/segment_%03d.ts")
    );
}

#[test]
fn test_output_file_is_last_and_input_after_y() {
    let args = argv(&transcode("libx264", "720p", "2000k"));
    assert_eq!(&args[..4], ["ffmpeg", "-y", "-i", "input.mp4"]);
    assert_eq!(args.last().map(String::as_str), Some("output/playlist.m3u8"));
}

#[test]
fn test_custom_program() {
    let cfg = validated(&base_options());
    let cmd = Compiler::new("/usr/local/bin/ffmpeg").compile(&cfg);
    assert!(cmd.render().starts_with("/usr/local/bin/ffmpeg -y -i \"input.mp4\""));
    assert_eq!(cmd.to_command().get_program(), "/usr/local/bin/ffmpeg");
}

#[test]
fn test_paths_with_spaces_survive_posix_render() {
    let raw = RawOptions::new("my videos/clip one.mp4", "hls out", "clip one");
    let cmd = compile_options(&raw);
    let split = shlex::split(&cmd.render_posix()).expect("posix render should split");
    assert_eq!(split, argv(&raw));
    assert_cmd_contains(&cmd.render(), "-i \"my videos/clip one.mp4\"");
}
