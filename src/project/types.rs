use dvdforged_common::{EntryType, LangCode};
use dvdforged_ifo::attributes::{
    AudioContent, AudioFormat, DolbyMode, Quantization, SampleRate, VideoDesc,
};
use dvdforged_ifo::model::{ChapterKind, Pts};
use dvdforged_ifo::nav::NavProgram;
use serde::{Deserialize, Serialize};

/// Video Manager menus as described in a project file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MenuProject {
    /// Menu video attributes
    #[serde(default)]
    pub video: VideoDesc,

    #[serde(default)]
    pub audio: Vec<AudioStream>,

    #[serde(default)]
    pub subpictures: Vec<SubpictureStream>,

    /// Menu VOBs in the order they are laid out on disc
    #[serde(default)]
    pub vobs: Vec<VobFile>,

    #[serde(default)]
    pub palettes: Vec<Palette>,

    #[serde(default)]
    pub languages: Vec<MenuLanguage>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AudioStream {
    #[serde(default)]
    pub format: AudioFormat,

    #[serde(default)]
    pub quantization: Quantization,

    #[serde(default)]
    pub dolby: DolbyMode,

    #[serde(default)]
    pub lang: Option<LangCode>,

    #[serde(default)]
    pub channels: u8,

    #[serde(default)]
    pub sample_rate: SampleRate,

    #[serde(default)]
    pub content: AudioContent,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SubpictureStream {
    #[serde(default)]
    pub lang: Option<LangCode>,

    #[serde(default)]
    pub content: u8,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VobFile {
    pub file: String,

    /// VOBUs in sector order; sectors count from the start of the menu VOB set
    #[serde(default)]
    pub vobus: Vec<VobuRange>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct VobuRange {
    pub start: u32,
    pub end: u32,
    pub cell: u8,
}

/// A named subpicture color table (up to 16 `0xYYCrCb` values).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Palette {
    pub name: String,
    pub colors: Vec<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MenuLanguage {
    pub lang: LangCode,

    #[serde(default)]
    pub pgcs: Vec<MenuPgc>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MenuPgc {
    #[serde(default)]
    pub entries: Vec<EntryType>,

    /// Name of a palette from the `palettes` list
    #[serde(default)]
    pub palette: Option<String>,

    #[serde(default)]
    pub pre: Option<NavProgram>,

    #[serde(default)]
    pub post: Option<NavProgram>,

    /// Still time after the last cell, 255 for infinite
    #[serde(default)]
    pub pause: u8,

    #[serde(default)]
    pub buttons: Vec<MenuButton>,

    #[serde(default)]
    pub subpicture_streams: Vec<SubpictureMapping>,

    #[serde(default)]
    pub sources: Vec<MenuSource>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MenuButton {
    pub name: String,

    #[serde(default)]
    pub commands: Option<NavProgram>,
}

/// Stream ids used for one subpicture track in each display mode.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct SubpictureMapping {
    pub track: usize,

    #[serde(default)]
    pub normal: Option<u8>,

    #[serde(default)]
    pub widescreen: Option<u8>,

    #[serde(default)]
    pub letterbox: Option<u8>,

    #[serde(default)]
    pub panscan: Option<u8>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MenuSource {
    /// File name of one of the project's `vobs`
    pub vob: String,

    #[serde(default)]
    pub cells: Vec<MenuCell>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MenuCell {
    /// Start time in 90 kHz ticks
    #[serde(default)]
    pub start: Pts,

    /// End time in 90 kHz ticks
    #[serde(default)]
    pub end: Pts,

    #[serde(default)]
    pub chapter: ChapterKind,

    #[serde(default)]
    pub pause: u8,

    /// First VOB cell id played
    pub first_cell: u8,

    /// Last VOB cell id played (defaults to `first_cell`)
    #[serde(default)]
    pub last_cell: Option<u8>,

    #[serde(default)]
    pub commands: Option<NavProgram>,
}
