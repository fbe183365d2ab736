use serde::{Serialize, Serializer};
use std::process::Command;
use tracing::debug;

use super::types::{
    AudioSettings, Bitrate, EncodingConfig, EncryptionPolicy, VideoSettings,
};

const DEFAULT_PROGRAM: &str = "ffmpeg";
const SEGMENT_FILE_PATTERN: &str = "segment_%03d.ts";
const KEY_FILE_NAME: &str = "enc.key";
const KEY_INFO_FILE_NAME: &str = "enc.keyinfo";

/// One argv entry. Paths are kept apart so display rendering can quote them.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Arg {
    Plain(String),
    Path(String),
}

impl Arg {
    fn as_str(&self) -> &str {
        match self {
            Arg::Plain(s) | Arg::Path(s) => s,
        }
    }
}

#[derive(Debug, Default)]
struct ArgList {
    args: Vec<Arg>,
}

impl ArgList {
    fn arg(&mut self, arg: impl Into<String>) -> &mut Self {
        self.args.push(Arg::Plain(arg.into()));
        self
    }

    fn args(&mut self, args: &[&str]) -> &mut Self {
        for arg in args {
            self.arg(*arg);
        }
        self
    }

    fn path(&mut self, path: &str) -> &mut Self {
        self.args.push(Arg::Path(path.to_string()));
        self
    }
}

/// Human-readable overview of a compiled job
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobSummary {
    pub segment_seconds: u32,
    pub playlist_type: &'static str,
    pub video_encoder: &'static str,
    pub resolution: Option<&'static str>,
    pub video_bitrate: Option<Bitrate>,
    pub audio_encoder: &'static str,
    pub audio_bitrate: Option<Bitrate>,
    pub encryption: Option<&'static str>,
    pub key_rotation_period: Option<u32>,
}

impl From<&EncodingConfig> for JobSummary {
    fn from(cfg: &EncodingConfig) -> Self {
        let (resolution, video_bitrate) = match cfg.video() {
            VideoSettings::Copy => (None, None),
            VideoSettings::Encode(v) => (Some(v.resolution.label()), Some(v.bitrate)),
        };
        Self {
            segment_seconds: cfg.segment_seconds(),
            playlist_type: cfg.playlist_type().as_str(),
            video_encoder: cfg.video().codec().ffmpeg_name(),
            resolution,
            video_bitrate,
            audio_encoder: cfg.audio().codec().ffmpeg_name(),
            audio_bitrate: cfg.audio().bitrate(),
            encryption: cfg.encryption().map(|_| "AES-128"),
            key_rotation_period: cfg.encryption().map(|e| e.key_rotation_period),
        }
    }
}

/// Ordered ffmpeg invocation plus the paths it will produce
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledCommand {
    #[serde(rename = "arguments", serialize_with = "serialize_args")]
    args: Vec<Arg>,
    output_playlist_path: String,
    segment_pattern: String,
    key_file_path: Option<String>,
    key_info_file_path: Option<String>,
    #[serde(skip)]
    key_uri: Option<String>,
    summary: JobSummary,
}

fn serialize_args<S: Serializer>(args: &[Arg], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(args.iter().map(Arg::as_str))
}

impl CompiledCommand {
    /// Unquoted argv, program first
    pub fn arguments(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(Arg::as_str)
    }

    pub fn program(&self) -> &str {
        self.args.first().map(Arg::as_str).unwrap_or(DEFAULT_PROGRAM)
    }

    pub fn output_playlist_path(&self) -> &str {
        &self.output_playlist_path
    }

    pub fn segment_pattern(&self) -> &str {
        &self.segment_pattern
    }

    pub fn key_file_path(&self) -> Option<&str> {
        self.key_file_path.as_deref()
    }

    pub fn key_info_file_path(&self) -> Option<&str> {
        self.key_info_file_path.as_deref()
    }

    pub fn summary(&self) -> &JobSummary {
        &self.summary
    }

    /// Display form: path arguments always wrapped in double quotes
    pub fn render(&self) -> String {
        self.args
            .iter()
            .enumerate()
            .map(|(i, arg)| match arg {
                Arg::Path(p) => double_quote(p),
                Arg::Plain(s) if i == 0 && !is_shell_safe(s) => double_quote(s),
                Arg::Plain(s) => s.clone(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Minimal POSIX shell quoting
    pub fn render_posix(&self) -> String {
        shlex::try_join(self.arguments()).unwrap_or_else(|_| self.render())
    }

    /// Build (but do not spawn) a process for an external launcher
    pub fn to_command(&self) -> Command {
        let mut args = self.arguments();
        let mut cmd = Command::new(args.next().unwrap_or(DEFAULT_PROGRAM));
        cmd.args(args);
        cmd
    }

    /// Contents ffmpeg expects in the key info file: key URI, then key file path
    pub fn keyinfo_contents(&self) -> Option<String> {
        match (&self.key_uri, &self.key_file_path) {
            (Some(uri), Some(path)) => Some(format!("{}\n{}\n", uri, path)),
            _ => None,
        }
    }
}

fn is_shell_safe(s: &str) -> bool {
    !s.is_empty()
        && s.chars().all(|c| {
            c.is_ascii_alphanumeric()
                || matches!(c, '-' | '_' | '.' | '/' | ':' | '+' | '@' | '%' | ',' | '=')
        })
}

/// Wrap in double quotes, escaping the characters a POSIX shell still
/// interprets inside them
fn double_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

fn apply_video_settings(args: &mut ArgList, video: &VideoSettings) {
    args.arg("-c:v").arg(video.codec().ffmpeg_name());

    if let VideoSettings::Encode(v) = video {
        if let Some(size) = v.resolution.size_arg() {
            args.arg("-s").arg(size);
        }
        args.arg("-b:v").arg(v.bitrate.to_string());
        args.args(v.encoder.tuning_args());
    }
}

fn apply_audio_settings(args: &mut ArgList, audio: &AudioSettings) {
    args.arg("-c:a").arg(audio.codec().ffmpeg_name());

    if let Some(bitrate) = audio.bitrate() {
        args.arg("-b:a").arg(bitrate.to_string());
    }
}

fn apply_hls_settings(args: &mut ArgList, cfg: &EncodingConfig, segment_pattern: &str) {
    args.arg("-f").arg("hls");
    args.arg("-hls_time").arg(cfg.segment_seconds().to_string());
    args.arg("-hls_playlist_type")
        .arg(cfg.playlist_type().as_str());
    args.arg("-hls_segment_filename").path(segment_pattern);
}

/// Returns (key file, key info file)
fn apply_encryption(
    args: &mut ArgList,
    cfg: &EncodingConfig,
    policy: &EncryptionPolicy,
) -> (String, String) {
    let key_file = cfg.output_file(KEY_FILE_NAME);
    let key_info_file = cfg.output_file(KEY_INFO_FILE_NAME);

    args.arg("-hls_key_info_file").path(&key_info_file);
    args.arg("-hls_enc").arg("1");
    if policy.key_rotation_period > 0 {
        args.arg("-hls_key_rotation_period")
            .arg(policy.key_rotation_period.to_string());
    }

    (key_file, key_info_file)
}

/// Compiles validated configs into ffmpeg invocations. Holds no per-call state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compiler {
    program: String,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl Compiler {
    /// A blank program name falls back to `ffmpeg`
    pub fn new(program: impl Into<String>) -> Self {
        let program = program.into();
        if program.trim().is_empty() {
            return Self::default();
        }
        Self { program }
    }

    pub fn compile(&self, cfg: &EncodingConfig) -> CompiledCommand {
        let segment_pattern = cfg.output_file(SEGMENT_FILE_PATTERN);
        let output_playlist_path = cfg.output_file(&format!("{}.m3u8", cfg.output_name()));

        let mut args = ArgList::default();
        args.arg(self.program.as_str()).arg("-y");
        args.arg("-i").path(cfg.input_path());

        apply_video_settings(&mut args, cfg.video());
        apply_audio_settings(&mut args, cfg.audio());
        apply_hls_settings(&mut args, cfg, &segment_pattern);

        let key_paths = cfg
            .encryption()
            .map(|policy| apply_encryption(&mut args, cfg, policy));

        args.path(&output_playlist_path);

        debug!(
            args = args.args.len(),
            output = %output_playlist_path,
            encrypted = key_paths.is_some(),
            "compiled hls command"
        );

        let (key_file_path, key_info_file_path) = key_paths.unzip();
        CompiledCommand {
            args: args.args,
            output_playlist_path,
            segment_pattern,
            key_file_path,
            key_info_file_path,
            key_uri: cfg.encryption().map(|e| e.key_uri.clone()),
            summary: JobSummary::from(cfg),
        }
    }
}

/// Compile with the default `ffmpeg` program name
pub fn compile(cfg: &EncodingConfig) -> CompiledCommand {
    Compiler::default().compile(cfg)
}
