//! AES-128 encryption flags and key file paths

use crate::common::assertions::*;
use crate::common::helpers::*;
use hlscmd::engine::RawOptions;

fn encrypted(rotation: Option<i64>) -> RawOptions {
    RawOptions {
        encryption_enabled: Some(true),
        key_rotation_period: rotation,
        ..base_options()
    }
}

#[test]
fn test_fixed_key_has_no_rotation_flag() {
    let cmd = render_options(&encrypted(Some(0)));
    assert_cmd_contains(&cmd, "-hls_enc 1");
    assert_cmd_contains(&cmd, "-hls_key_info_file \"output/enc.keyinfo\"");
    assert_cmd_not_contains(&cmd, "-hls_key_rotation_period");
}

#[test]
fn test_rotation_period_emitted() {
    let cmd = render_options(&encrypted(Some(20)));
    assert_cmd_contains(&cmd, "-hls_key_rotation_period 20");
}

#[test]
fn test_rotation_upper_bound() {
    let args = argv(&encrypted(Some(100)));
    assert_arg_pair(&args, "-hls_key_rotation_period", "100");
}

#[test]
fn test_key_paths_sit_next_to_playlist() {
    let raw = RawOptions {
        output_dir: Some("/var/www/hls".into()),
        ..encrypted(None)
    };
    let cmd = compile_options(&raw);
    assert_eq!(cmd.key_file_path(), Some("/var/www/hls/enc.key"));
    assert_eq!(cmd.key_info_file_path(), Some("/var/www/hls/enc.keyinfo"));
    assert_eq!(
        cmd.keyinfo_contents().as_deref(),
        Some("enc.key\n/var/www/hls/enc.key\n")
    );
}

#[test]
fn test_encryption_flags_precede_playlist() {
    let args = argv(&encrypted(Some(5)));
    let enc = args.iter().position(|a| a == "-hls_enc").unwrap();
    let segments = args
        .iter()
        .position(|a| a == "-hls_segment_filename")
        .unwrap();
    assert!(segments < enc);
    assert_eq!(args.last().map(String::as_str), Some("output/playlist.m3u8"));
}

#[test]
fn test_disabled_encryption_ignores_rotation() {
    let raw = RawOptions {
        encryption_enabled: Some(false),
        key_rotation_period: Some(20),
        ..base_options()
    };
    let args = argv(&raw);
    assert_no_flag(&args, "-hls_enc");
    assert_no_flag(&args, "-hls_key_info_file");
    assert_no_flag(&args, "-hls_key_rotation_period");
}
