use clap::{ArgAction, Args, Parser, Subcommand};
use hlscmd::engine::RawOptions;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hlscmd")]
#[command(about = "Compile HLS transcoding options into an ffmpeg command", long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Read settings from this config file instead of the default location
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate options and print the ffmpeg command (nothing is executed)
    Compile(CompileArgs),

    /// Show the video bitrate menus (all resolutions, or just one)
    Menus {
        /// Resolution label or pixel size, e.g. 1080p or 1920x1080
        resolution: Option<String>,
    },

    /// List supported encoders and their tuning flags
    Encoders,

    /// Show config status and location, or create default config if missing
    InitConfig,
}

#[derive(Args, Debug, Default)]
pub struct CompileArgs {
    /// Source media path
    #[arg(value_name = "INPUT")]
    pub input: Option<String>,

    /// Options file (.toml or .json); flags override its values
    #[arg(long, value_name = "FILE")]
    pub options: Option<PathBuf>,

    /// Directory for the playlist and segments
    #[arg(short = 'o', long)]
    pub output_dir: Option<String>,

    /// Playlist base name, without extension
    #[arg(short = 'n', long)]
    pub output_name: Option<String>,

    /// copy, libx264, h264_nvenc, h264_qsv or h264_videotoolbox
    #[arg(long)]
    pub video_encoder: Option<String>,

    /// original, 4K, 2K, 1080p, 720p, 480p, 360p (or WxH)
    #[arg(long)]
    pub resolution: Option<String>,

    /// Must be on the resolution's menu, e.g. 6000k
    #[arg(long)]
    pub video_bitrate: Option<String>,

    /// copy or aac
    #[arg(long)]
    pub audio_encoder: Option<String>,

    /// 192k, 128k, 96k or 64k
    #[arg(long)]
    pub audio_bitrate: Option<String>,

    /// Segment duration in seconds (1-10)
    #[arg(long, allow_negative_numbers = true)]
    pub segment_seconds: Option<i64>,

    /// Enable AES-128 segment encryption
    #[arg(long, conflicts_with = "no_encrypt")]
    pub encrypt: bool,

    /// Disable encryption even if the options file enables it
    #[arg(long, conflicts_with = "encrypt")]
    pub no_encrypt: bool,

    /// Segments per encryption key (0 = fixed key, max 100)
    #[arg(long, allow_negative_numbers = true)]
    pub key_rotation_period: Option<i64>,

    /// Key URI written into the key info file
    #[arg(long)]
    pub key_uri: Option<String>,

    /// Print the compiled command, paths and summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Quote with minimal POSIX shell quoting instead of quoting every path
    #[arg(long, conflicts_with = "json")]
    pub posix: bool,

    /// Also print the playlist, segment and key file paths
    #[arg(long)]
    pub show_paths: bool,

    /// Also print the contents the key info file must have
    #[arg(long)]
    pub keyinfo: bool,
}

impl CompileArgs {
    /// Options given on the command line; unset flags stay unset
    pub fn to_raw_options(&self) -> RawOptions {
        let encryption_enabled = if self.encrypt {
            Some(true)
        } else if self.no_encrypt {
            Some(false)
        } else {
            None
        };

        RawOptions {
            input_path: self.input.clone(),
            output_dir: self.output_dir.clone(),
            output_name: self.output_name.clone(),
            video_encoder: self.video_encoder.clone(),
            resolution: self.resolution.clone(),
            video_bitrate: self.video_bitrate.clone(),
            audio_encoder: self.audio_encoder.clone(),
            audio_bitrate: self.audio_bitrate.clone(),
            segment_seconds: self.segment_seconds,
            playlist_type: None,
            encryption_enabled,
            key_rotation_period: self.key_rotation_period,
            key_uri: self.key_uri.clone(),
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
