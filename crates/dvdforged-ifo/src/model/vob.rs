//! Sector maps of multiplexed VOB files and the stream set they share.

use crate::attributes::{
    AudioDesc, StreamAttributes, SubpictureDesc, VideoDesc, MAX_AUDIO_TRACKS,
    MAX_SUBPICTURE_TRACKS,
};
use crate::{Error, Result};

/// One video object unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vobu {
    /// First sector, relative to the start of the VOB file set.
    pub sector: u32,
    pub last_sector: u32,
    /// `vob id << 8 | cell id`.
    pub cell_tag: u16,
}

impl Vobu {
    pub fn new(sector: u32, last_sector: u32, vob_id: u8, cell_id: u8) -> Self {
        Self {
            sector,
            last_sector,
            cell_tag: cell_tag(vob_id, cell_id),
        }
    }

    pub fn vob_id(&self) -> u16 {
        self.cell_tag >> 8
    }

    pub fn cell_id(&self) -> u8 {
        (self.cell_tag & 0xff) as u8
    }
}

/// Tag shared by every VOBU of one cell. VOB ids are 1-based.
pub fn cell_tag(vob_id: u8, cell_id: u8) -> u16 {
    (u16::from(vob_id) << 8) | u16::from(cell_id)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vob {
    pub file_name: String,
    pub vobus: Vec<Vobu>,
}

impl Vob {
    pub fn new(file_name: impl Into<String>, vobus: Vec<Vobu>) -> Self {
        Self {
            file_name: file_name.into(),
            vobus,
        }
    }

    /// First and last VOBU carrying `tag`.
    pub fn cell_extent(&self, tag: u16) -> Option<(&Vobu, &Vobu)> {
        let first = self.vobus.iter().find(|v| v.cell_tag == tag)?;
        let last = self.vobus.iter().rev().find(|v| v.cell_tag == tag)?;
        Some((first, last))
    }
}

/// Reference to a PGC that contributes sectors to a [`VobGroup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PgcRef {
    /// Index of the language group (or 0 for a titles group).
    pub group: usize,
    pub pgc: usize,
}

/// Everything sharing one sector space.
#[derive(Debug, Clone, Default)]
pub struct VobGroup {
    pub streams: StreamAttributes,
    /// Last conflicting value seen per attribute.
    pub conflicts: StreamAttributes,
    pub vobs: Vec<Vob>,
    pub all_pgcs: Vec<PgcRef>,
}

impl VobGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a VOB, returning its index (its VOB id is `index + 1`).
    pub fn add_vob(&mut self, vob: Vob) -> usize {
        self.vobs.push(vob);
        self.vobs.len() - 1
    }

    pub fn has_video(&self) -> bool {
        !self.vobs.is_empty()
    }

    pub fn num_vobus(&self) -> usize {
        self.vobs.iter().map(|v| v.vobus.len()).sum()
    }

    /// Sectors occupied by the VOB file set.
    pub fn sector_count(&self) -> u32 {
        self.vobs
            .iter()
            .rev()
            .find_map(|v| v.vobus.last())
            .map_or(0, |v| v.last_sector + 1)
    }

    pub fn observe_video(&mut self, vd: &VideoDesc) -> bool {
        self.streams.merge_video(&mut self.conflicts, vd)
    }

    pub fn observe_audio(&mut self, track: usize, ad: &AudioDesc) -> Result<bool> {
        if track >= MAX_AUDIO_TRACKS {
            return Err(Error::invalid_model(format!(
                "audio track {} exceeds the {} track limit",
                track + 1,
                MAX_AUDIO_TRACKS
            )));
        }
        Ok(self.streams.merge_audio(&mut self.conflicts, track, ad))
    }

    pub fn observe_subpicture(&mut self, track: usize, sp: &SubpictureDesc) -> Result<bool> {
        if track >= MAX_SUBPICTURE_TRACKS {
            return Err(Error::invalid_model(format!(
                "subpicture track {} exceeds the {} track limit",
                track + 1,
                MAX_SUBPICTURE_TRACKS
            )));
        }
        Ok(self.streams.merge_subpicture(&mut self.conflicts, track, sp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{AudioFormat, VideoFormat};

    #[test]
    fn test_cell_tag_split() {
        let v = Vobu::new(10, 20, 2, 7);
        assert_eq!(v.cell_tag, 0x0207);
        assert_eq!(v.vob_id(), 2);
        assert_eq!(v.cell_id(), 7);
    }

    #[test]
    fn test_cell_extent() {
        let vob = Vob::new(
            "menu.vob",
            vec![
                Vobu::new(0, 9, 1, 1),
                Vobu::new(10, 19, 1, 1),
                Vobu::new(20, 29, 1, 2),
            ],
        );
        let (first, last) = vob.cell_extent(cell_tag(1, 1)).unwrap();
        assert_eq!(first.sector, 0);
        assert_eq!(last.last_sector, 19);
        assert!(vob.cell_extent(cell_tag(1, 3)).is_none());
    }

    #[test]
    fn test_sector_count() {
        let mut vg = VobGroup::new();
        assert_eq!(vg.sector_count(), 0);
        vg.add_vob(Vob::new("a", vec![Vobu::new(0, 99, 1, 1)]));
        vg.add_vob(Vob::new("b", vec![Vobu::new(100, 149, 2, 1)]));
        assert_eq!(vg.sector_count(), 150);
        assert_eq!(vg.num_vobus(), 2);
    }

    #[test]
    fn test_observe_records_conflict() {
        let mut vg = VobGroup::new();
        let ntsc = VideoDesc {
            format: VideoFormat::Ntsc,
            ..Default::default()
        };
        let pal = VideoDesc {
            format: VideoFormat::Pal,
            ..Default::default()
        };
        assert!(!vg.observe_video(&ntsc));
        assert!(vg.observe_video(&pal));
        assert_eq!(vg.streams.video.format, VideoFormat::Ntsc);
        assert_eq!(vg.conflicts.video.format, VideoFormat::Pal);
    }

    #[test]
    fn test_observe_audio_tracks() {
        let mut vg = VobGroup::new();
        let ac3 = AudioDesc {
            format: AudioFormat::Ac3,
            ..Default::default()
        };
        assert!(!vg.observe_audio(1, &ac3).unwrap());
        assert_eq!(vg.streams.num_audio, 2);
        assert!(vg.observe_audio(8, &ac3).is_err());
    }
}
