//! Video, audio and subpicture stream attributes and their on-disc encoding.
//!
//! Each descriptor field is an enum whose `Unspecified` variant is zero and
//! whose other variants carry the code used by the bit packing. The encoder
//! is total: fields left unspecified and absent tracks encode as zero.

use std::fmt::Debug;

use tracing::warn;

/// Audio tracks a stream set can describe.
pub const MAX_AUDIO_TRACKS: usize = 8;
/// Subpicture tracks a stream set can describe.
pub const MAX_SUBPICTURE_TRACKS: usize = 32;

/// Length of one encoded attribute block.
pub const ATTRIBUTE_BLOCK_LEN: usize = 0x56 + MAX_SUBPICTURE_TRACKS * 6;

const AUDIO_COUNT: usize = 0x02;
const AUDIO_ENTRIES: usize = 0x04;
const AUDIO_ENTRY_LEN: usize = 8;
const SUBPICTURE_COUNT: usize = 0x54;
const SUBPICTURE_ENTRIES: usize = 0x56;
const SUBPICTURE_ENTRY_LEN: usize = 6;

macro_rules! attribute_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $code:expr),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serialize", serde(rename_all = "snake_case"))]
        #[repr(u8)]
        pub enum $name {
            #[default]
            Unspecified = 0,
            $($variant = $code),+
        }

        impl $name {
            pub fn code(self) -> u8 {
                self as u8
            }
        }
    };
}

attribute_enum!(
    /// MPEG video coding mode.
    MpegVersion { Mpeg1 = 1, Mpeg2 = 2 }
);
attribute_enum!(
    /// Coded picture size.
    VideoResolution { Full720 = 1, Full704 = 2, Full352 = 3, Half352 = 4 }
);
attribute_enum!(
    /// Broadcast standard.
    VideoFormat { Ntsc = 1, Pal = 2 }
);
attribute_enum!(
    /// Display aspect ratio.
    AspectRatio { Ratio4x3 = 1, Ratio16x9 = 2 }
);
attribute_enum!(
    /// Widescreen display permissions.
    WidescreenMode { NoLetterbox = 1, NoPanscan = 2, Crop = 3 }
);
attribute_enum!(
    /// Frame rate code.
    FrameRate {
        NtscFilm = 1,
        Film = 2,
        Pal = 3,
        Ntsc = 4,
        Fps30 = 5,
        PalField = 6,
        NtscField = 7,
        Fps60 = 8,
    }
);
attribute_enum!(
    /// Audio coding format.
    AudioFormat { Ac3 = 1, Mp2 = 2, Pcm = 3, Dts = 4 }
);
attribute_enum!(
    /// Audio sample quantization.
    Quantization { Bits16 = 1, Bits20 = 2, Bits24 = 3, Drc = 4 }
);
attribute_enum!(
    /// Dolby surround application mode.
    DolbyMode { Surround = 1 }
);
attribute_enum!(
    /// Whether a language code accompanies the track.
    LangPresence { NoLang = 1, Lang = 2 }
);
attribute_enum!(
    /// Audio sample rate.
    SampleRate { Khz48 = 1, Khz96 = 2 }
);
attribute_enum!(
    /// Audio code extension.
    AudioContent { Normal = 1, Impaired = 2, Comments1 = 3, Comments2 = 4 }
);

impl FrameRate {
    /// Clock ticks per second adjustment for this rate (90090 for the
    /// 1000/1001 family).
    pub fn denominator(self) -> u32 {
        match self {
            Self::NtscFilm | Self::Ntsc | Self::NtscField => 90090,
            _ => 90000,
        }
    }

    /// Nominal frame rate.
    pub fn nominal(self) -> u32 {
        match self {
            Self::Unspecified => 0,
            Self::NtscFilm | Self::Film => 24,
            Self::Pal => 25,
            Self::Ntsc | Self::Fps30 => 30,
            Self::PalField => 50,
            Self::NtscField | Self::Fps60 => 60,
        }
    }
}

/// Closed-caption line-21 field flags.
pub const CAPTION_FIELD1: u8 = 1;
pub const CAPTION_FIELD2: u8 = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct VideoDesc {
    pub mpeg: MpegVersion,
    pub resolution: VideoResolution,
    pub format: VideoFormat,
    pub aspect: AspectRatio,
    pub widescreen: WidescreenMode,
    pub frame_rate: FrameRate,
    pub caption: u8,
}

impl VideoDesc {
    /// Frame rate in effect: the explicit rate, else the one implied by the
    /// broadcast standard, else the one implied by `default_format`.
    pub fn effective_rate(&self, default_format: VideoFormat) -> FrameRate {
        if self.frame_rate != FrameRate::Unspecified {
            return self.frame_rate;
        }
        let format = match self.format {
            VideoFormat::Unspecified => default_format,
            f => f,
        };
        match format {
            VideoFormat::Pal => FrameRate::Pal,
            _ => FrameRate::Ntsc,
        }
    }

    pub fn is_unspecified(&self) -> bool {
        *self == Self::default()
    }

    /// The packed 16-bit video attribute word.
    pub fn encode(&self) -> u16 {
        let mut word = 0u16;
        if self.mpeg == MpegVersion::Mpeg2 {
            word |= 0x4000;
        }
        match self.widescreen {
            WidescreenMode::NoLetterbox => word |= 0x0100,
            WidescreenMode::NoPanscan => word |= 0x0200,
            _ => {}
        }
        if self.aspect == AspectRatio::Ratio16x9 {
            word |= 0x0c00;
        }
        if self.format == VideoFormat::Pal {
            word |= 0x1000;
        }
        if self.caption & CAPTION_FIELD1 != 0 {
            word |= 0x0080;
        }
        if self.caption & CAPTION_FIELD2 != 0 {
            word |= 0x0040;
        }
        word | (u16::from(self.resolution.code().saturating_sub(1)) << 3)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct AudioDesc {
    pub format: AudioFormat,
    pub quantization: Quantization,
    pub dolby: DolbyMode,
    pub lang_presence: LangPresence,
    pub lang: [u8; 2],
    /// Channel count; zero when unspecified.
    pub channels: u8,
    pub sample_rate: SampleRate,
    pub content: AudioContent,
}

impl AudioDesc {
    fn encode_into(&self, entry: &mut [u8]) {
        entry[0] = self.format.code().saturating_sub(1) << 6;
        if self.lang_presence == LangPresence::Lang {
            entry[0] |= 0x04;
            entry[2..4].copy_from_slice(&self.lang);
        }
        if self.dolby == DolbyMode::Surround {
            entry[0] |= 0x02;
            entry[7] = 0x08;
        }
        entry[1] = (self.quantization.code().saturating_sub(1) << 6)
            | (self.sample_rate.code().saturating_sub(1) << 4)
            | (self.channels.saturating_sub(1) & 0x07);
        entry[5] = self.content.code();
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct SubpictureDesc {
    pub lang_presence: LangPresence,
    pub lang: [u8; 2],
    pub content: u8,
    /// Stream id for normal, widescreen, letterbox and pan-scan display,
    /// `0x80 | id` when defined.
    pub id_map: [u8; 4],
}

impl SubpictureDesc {
    fn encode_into(&self, entry: &mut [u8]) {
        if self.lang_presence == LangPresence::Lang {
            entry[0] = 0x01;
            entry[2..4].copy_from_slice(&self.lang);
        }
        entry[5] = self.content;
    }
}

/// Stream attributes of everything sharing one sector space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamAttributes {
    pub video: VideoDesc,
    pub audio: [AudioDesc; MAX_AUDIO_TRACKS],
    pub num_audio: usize,
    pub subpictures: [SubpictureDesc; MAX_SUBPICTURE_TRACKS],
    pub num_subpictures: usize,
}

impl Default for StreamAttributes {
    fn default() -> Self {
        Self {
            video: VideoDesc::default(),
            audio: [AudioDesc::default(); MAX_AUDIO_TRACKS],
            num_audio: 0,
            subpictures: [SubpictureDesc::default(); MAX_SUBPICTURE_TRACKS],
            num_subpictures: 0,
        }
    }
}

impl StreamAttributes {
    /// Pack the attribute block.
    pub fn encode(&self) -> [u8; ATTRIBUTE_BLOCK_LEN] {
        let mut block = [0u8; ATTRIBUTE_BLOCK_LEN];
        block[..2].copy_from_slice(&self.video.encode().to_be_bytes());

        let num_audio = self.num_audio.min(MAX_AUDIO_TRACKS);
        block[AUDIO_COUNT + 1] = num_audio as u8;
        for (i, ad) in self.audio[..num_audio].iter().enumerate() {
            let at = AUDIO_ENTRIES + i * AUDIO_ENTRY_LEN;
            ad.encode_into(&mut block[at..at + AUDIO_ENTRY_LEN]);
        }

        let num_subpictures = self.num_subpictures.min(MAX_SUBPICTURE_TRACKS);
        block[SUBPICTURE_COUNT + 1] = num_subpictures as u8;
        for (i, sp) in self.subpictures[..num_subpictures].iter().enumerate() {
            let at = SUBPICTURE_ENTRIES + i * SUBPICTURE_ENTRY_LEN;
            sp.encode_into(&mut block[at..at + SUBPICTURE_ENTRY_LEN]);
        }
        block
    }
}

/// Record `value` into `slot` if unset; on disagreement keep the first value
/// and warn once per distinct conflicting value, remembered in `shadow`.
///
/// Returns `true` when `value` conflicted with the recorded attribute.
pub(crate) fn merge_attr<T>(slot: &mut T, shadow: &mut T, value: T, name: &str) -> bool
where
    T: Copy + PartialEq + Default + Debug,
{
    if value == T::default() {
        return false;
    }
    if *slot == T::default() {
        *slot = value;
        return false;
    }
    if *slot == value {
        return false;
    }
    if *shadow != value {
        warn!(
            "attribute '{}' differs between sources: keeping {:?}, ignoring {:?}",
            name, slot, value
        );
        *shadow = value;
    }
    true
}

impl StreamAttributes {
    pub(crate) fn merge_video(&mut self, shadow: &mut Self, vd: &VideoDesc) -> bool {
        let (v, w) = (&mut self.video, &mut shadow.video);
        let mut conflict = false;
        conflict |= merge_attr(&mut v.mpeg, &mut w.mpeg, vd.mpeg, "mpeg");
        conflict |= merge_attr(&mut v.resolution, &mut w.resolution, vd.resolution, "resolution");
        conflict |= merge_attr(&mut v.format, &mut w.format, vd.format, "format");
        conflict |= merge_attr(&mut v.aspect, &mut w.aspect, vd.aspect, "aspect");
        conflict |= merge_attr(&mut v.widescreen, &mut w.widescreen, vd.widescreen, "widescreen");
        conflict |= merge_attr(&mut v.frame_rate, &mut w.frame_rate, vd.frame_rate, "framerate");
        conflict |= merge_attr(&mut v.caption, &mut w.caption, vd.caption, "caption");
        conflict
    }

    pub(crate) fn merge_audio(&mut self, shadow: &mut Self, track: usize, ad: &AudioDesc) -> bool {
        self.num_audio = self.num_audio.max(track + 1);
        let (a, w) = (&mut self.audio[track], &mut shadow.audio[track]);
        let mut conflict = false;
        conflict |= merge_attr(&mut a.format, &mut w.format, ad.format, "audio format");
        conflict |= merge_attr(&mut a.quantization, &mut w.quantization, ad.quantization, "quant");
        conflict |= merge_attr(&mut a.dolby, &mut w.dolby, ad.dolby, "dolby");
        conflict |= merge_attr(&mut a.lang_presence, &mut w.lang_presence, ad.lang_presence, "audio lang presence");
        conflict |= merge_attr(&mut a.lang, &mut w.lang, ad.lang, "audio lang");
        conflict |= merge_attr(&mut a.channels, &mut w.channels, ad.channels, "channels");
        conflict |= merge_attr(&mut a.sample_rate, &mut w.sample_rate, ad.sample_rate, "samplerate");
        conflict |= merge_attr(&mut a.content, &mut w.content, ad.content, "audio content");
        conflict
    }

    pub(crate) fn merge_subpicture(
        &mut self,
        shadow: &mut Self,
        track: usize,
        sp: &SubpictureDesc,
    ) -> bool {
        self.num_subpictures = self.num_subpictures.max(track + 1);
        let (s, w) = (&mut self.subpictures[track], &mut shadow.subpictures[track]);
        let mut conflict = false;
        conflict |= merge_attr(&mut s.lang_presence, &mut w.lang_presence, sp.lang_presence, "subpicture lang presence");
        conflict |= merge_attr(&mut s.lang, &mut w.lang, sp.lang, "subpicture lang");
        conflict |= merge_attr(&mut s.content, &mut w.content, sp.content, "subpicture content");
        for (mode, id) in sp.id_map.iter().enumerate() {
            conflict |= merge_attr(&mut s.id_map[mode], &mut w.id_map[mode], *id, "subpicture stream id");
        }
        conflict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_word_bits() {
        let vd = VideoDesc {
            mpeg: MpegVersion::Mpeg2,
            resolution: VideoResolution::Full720,
            format: VideoFormat::Pal,
            aspect: AspectRatio::Ratio16x9,
            widescreen: WidescreenMode::NoPanscan,
            frame_rate: FrameRate::Pal,
            caption: CAPTION_FIELD1,
        };
        assert_eq!(vd.encode(), 0x4000 | 0x1000 | 0x0c00 | 0x0200 | 0x0080);

        let half = VideoDesc {
            resolution: VideoResolution::Half352,
            caption: CAPTION_FIELD2,
            widescreen: WidescreenMode::NoLetterbox,
            ..Default::default()
        };
        assert_eq!(half.encode(), (3 << 3) | 0x0040 | 0x0100);
    }

    #[test]
    fn test_empty_attributes_encode_to_zero() {
        let block = StreamAttributes::default().encode();
        assert!(block.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_audio_entry_layout() {
        let mut attrs = StreamAttributes::default();
        attrs.audio[0] = AudioDesc {
            format: AudioFormat::Pcm,
            quantization: Quantization::Bits20,
            dolby: DolbyMode::Surround,
            lang_presence: LangPresence::Lang,
            lang: *b"en",
            channels: 2,
            sample_rate: SampleRate::Khz96,
            content: AudioContent::Comments1,
        };
        attrs.num_audio = 1;
        let block = attrs.encode();
        assert_eq!(block[3], 1);
        assert_eq!(block[4], (2 << 6) | 0x04 | 0x02);
        assert_eq!(block[5], (1 << 6) | (1 << 4) | 1);
        assert_eq!(&block[6..8], b"en");
        assert_eq!(block[9], 3);
        assert_eq!(block[11], 0x08);
    }

    #[test]
    fn test_subpicture_entry_layout() {
        let mut attrs = StreamAttributes::default();
        attrs.subpictures[1] = SubpictureDesc {
            lang_presence: LangPresence::Lang,
            lang: *b"fr",
            content: 1,
            id_map: [0x81, 0, 0, 0],
        };
        attrs.num_subpictures = 2;
        let block = attrs.encode();
        assert_eq!(block[0x55], 2);
        let at = 0x56 + 6;
        assert_eq!(block[at], 0x01);
        assert_eq!(&block[at + 2..at + 4], b"fr");
        assert_eq!(block[at + 5], 1);
        // Track 0 left unspecified.
        assert_eq!(&block[0x56..0x5c], &[0; 6]);
    }

    #[test]
    fn test_effective_rate() {
        let vd = VideoDesc::default();
        assert_eq!(vd.effective_rate(VideoFormat::Ntsc), FrameRate::Ntsc);
        assert_eq!(vd.effective_rate(VideoFormat::Pal), FrameRate::Pal);

        let pal = VideoDesc {
            format: VideoFormat::Pal,
            ..Default::default()
        };
        assert_eq!(pal.effective_rate(VideoFormat::Ntsc), FrameRate::Pal);

        let film = VideoDesc {
            frame_rate: FrameRate::NtscFilm,
            ..Default::default()
        };
        assert_eq!(film.effective_rate(VideoFormat::Pal), FrameRate::NtscFilm);
        assert_eq!(FrameRate::NtscFilm.denominator(), 90090);
        assert_eq!(FrameRate::Pal.denominator(), 90000);
    }

    #[test]
    fn test_merge_keeps_first_value() {
        let mut slot = VideoFormat::Unspecified;
        let mut shadow = VideoFormat::Unspecified;
        assert!(!merge_attr(&mut slot, &mut shadow, VideoFormat::Ntsc, "format"));
        assert_eq!(slot, VideoFormat::Ntsc);
        assert!(merge_attr(&mut slot, &mut shadow, VideoFormat::Pal, "format"));
        assert_eq!(slot, VideoFormat::Ntsc);
        assert_eq!(shadow, VideoFormat::Pal);
        assert!(!merge_attr(&mut slot, &mut shadow, VideoFormat::Unspecified, "format"));
    }
}
