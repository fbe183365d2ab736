//! Bitrate menus offered per resolution, plus the fixed audio menu.

use super::types::{Bitrate, Resolution};

/// The bitrates a resolution may be encoded at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitrateMenu {
    pub options: [Bitrate; 4],
    /// Index of the preselected option
    default_index: usize,
    pub hint: &'static str,
}

impl BitrateMenu {
    pub fn contains(&self, bitrate: Bitrate) -> bool {
        self.options.contains(&bitrate)
    }

    pub fn default_index(&self) -> usize {
        self.default_index
    }

    /// Preselected option, falling back to the first entry
    pub fn default_bitrate(&self) -> Bitrate {
        self.options
            .get(self.default_index)
            .copied()
            .unwrap_or(self.options[0])
    }

    /// "8000k, 6000k, 4500k, 3000k"
    pub fn describe(&self) -> String {
        self.options
            .iter()
            .map(|b| b.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

const fn menu(options: [u32; 4], hint: &'static str) -> BitrateMenu {
    BitrateMenu {
        options: [
            Bitrate::kbps(options[0]),
            Bitrate::kbps(options[1]),
            Bitrate::kbps(options[2]),
            Bitrate::kbps(options[3]),
        ],
        default_index: 1,
        hint,
    }
}

static MENU_4K: BitrateMenu = menu([30000, 20000, 15000, 12000], "4K: 12-30 Mbps recommended");
static MENU_2K: BitrateMenu = menu([15000, 12000, 9000, 6000], "2K: 6-15 Mbps recommended");
static MENU_1080P: BitrateMenu = menu([8000, 6000, 4500, 3000], "1080p: 3-8 Mbps recommended");
static MENU_720P: BitrateMenu = menu([4000, 3000, 2500, 2000], "720p: 2-4 Mbps recommended");
static MENU_480P: BitrateMenu = menu([2500, 2000, 1500, 1000], "480p: 1-2.5 Mbps recommended");
static MENU_360P: BitrateMenu = menu([1500, 1000, 800, 500], "360p: 0.5-1.5 Mbps recommended");
static MENU_ORIGINAL: BitrateMenu = menu(
    [8000, 6000, 4000, 2000],
    "Pick a bitrate that suits the source resolution",
);

/// Video bitrate menu for a resolution. Encoder-agnostic.
pub fn video_bitrate_menu(resolution: Resolution) -> &'static BitrateMenu {
    match resolution {
        Resolution::Uhd4k => &MENU_4K,
        Resolution::Qhd2k => &MENU_2K,
        Resolution::P1080 => &MENU_1080P,
        Resolution::P720 => &MENU_720P,
        Resolution::P480 => &MENU_480P,
        Resolution::P360 => &MENU_360P,
        Resolution::Original => &MENU_ORIGINAL,
    }
}

pub static AUDIO_BITRATE_MENU: BitrateMenu = BitrateMenu {
    options: [
        Bitrate::kbps(192),
        Bitrate::kbps(128),
        Bitrate::kbps(96),
        Bitrate::kbps(64),
    ],
    default_index: 1,
    hint: "192k music, 128k standard, 96k medium, 64k speech",
};

pub const DEFAULT_SEGMENT_SECONDS: u32 = 10;
pub const DEFAULT_KEY_URI: &str = "enc.key";
