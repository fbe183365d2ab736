mod hls_cmd;
pub mod menus;
mod options;
mod types;

pub use hls_cmd::{CompiledCommand, Compiler, JobSummary, compile};
pub use menus::{AUDIO_BITRATE_MENU, BitrateMenu, video_bitrate_menu};
pub use options::RawOptions;
pub use types::{
    AudioSettings, Bitrate, EncodingConfig, EncryptionPolicy, KEY_ROTATION_RANGE, PlaylistType,
    Resolution, SEGMENT_SECONDS_RANGE, VideoEncode, VideoSettings,
};
