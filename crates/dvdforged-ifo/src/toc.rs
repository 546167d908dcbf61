//! The Video Manager control file.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::attributes::{FrameRate, VideoDesc, VideoFormat};
use crate::buffer::ByteBuffer;
use crate::layout::{SectorLayoutPlanner, SectorSink, WriterSink};
use crate::model::Workset;
use crate::nav::{NavCompiler, COMMAND_LEN};
use crate::tables::{
    CellAddressTable, MenuPgcTable, TitleSearchTable, VobuAddressMap, VtsAttributeTable,
};
use crate::Result;

/// Signature at the start of the Video Manager control file.
pub const VMG_SIGNATURE: &[u8; 12] = b"DVDVIDEO-VMG";

/// Longest provider string the header holds.
pub const PROVIDER_ID_LEN: usize = 31;

/// Byte offset of the first-play program chain.
const FIRST_PLAY: usize = 0x400;

/// First-play jumps.
const JUMP_VMGM_TITLE_MENU: [u8; COMMAND_LEN] = [0x30, 0x06, 0x00, 0x00, 0x00, 0x42, 0x00, 0x00];
const JUMP_VTSM_1: [u8; COMMAND_LEN] = [0x30, 0x06, 0x00, 0x01, 0x01, 0x83, 0x00, 0x00];
const JUMP_TITLE_1: [u8; COMMAND_LEN] = [0x30, 0x02, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00];

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct TocOptions {
    /// Stamped into the header, truncated to [`PROVIDER_ID_LEN`] bytes.
    pub provider_id: String,
    /// Broadcast standard assumed when nothing says otherwise.
    pub default_format: VideoFormat,
}

impl Default for TocOptions {
    fn default() -> Self {
        Self {
            provider_id: format!("dvdforged {}", env!("CARGO_PKG_VERSION")),
            default_format: VideoFormat::Ntsc,
        }
    }
}

/// Sector addresses of one generated file. Absent tables are 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct TocLayout {
    pub tt_srpt: u32,
    pub pgci_ut: u32,
    pub vts_atrt: u32,
    pub c_adt: u32,
    pub vobu_admap: u32,
    /// Sectors in the control file (and in its backup).
    pub ifo_sectors: u32,
    pub menu_vob_sectors: u32,
    /// First sector after the Video Manager set, where titleset 1 starts.
    pub vts_start: u32,
}

/// Builds `VIDEO_TS.IFO`.
pub struct TocGenerator<'c> {
    options: TocOptions,
    compiler: &'c dyn NavCompiler,
}

impl<'c> TocGenerator<'c> {
    pub fn new(options: TocOptions, compiler: &'c dyn NavCompiler) -> Self {
        Self { options, compiler }
    }

    pub fn options(&self) -> &TocOptions {
        &self.options
    }

    /// Frame rate of the menus, falling back to the titles and then to the
    /// default standard.
    pub fn frame_rate(&self, ws: &Workset<'_>) -> FrameRate {
        let default = self.options.default_format;
        let menu = &ws.menus.vob_group.streams.video;
        if !menu.is_unspecified() {
            return menu.effective_rate(default);
        }
        if let Some(titles) = ws.titles.and_then(|t| t.vob_group.as_ref()) {
            if !titles.streams.video.is_unspecified() {
                return titles.streams.video.effective_rate(default);
            }
        }
        VideoDesc::default().effective_rate(default)
    }

    /// Plan every table, then write the header followed by the tables.
    pub fn generate(&self, ws: &Workset<'_>, sink: &mut dyn SectorSink) -> Result<TocLayout> {
        let rate = self.frame_rate(ws);
        let menus = ws.menus;
        let menu_pgcs = menus.has_pgcs();
        let menu_vobs = menus.vob_group.has_video();

        let pgc_table = MenuPgcTable::new(menus, ws.colors, self.compiler, rate);
        let atrt = VtsAttributeTable::new(ws.titlesets);
        let c_adt = CellAddressTable::new(&menus.vob_group);
        let admap = VobuAddressMap::new(&menus.vob_group);

        // The title search table's start sectors depend on the layout
        // itself, but its size does not.
        let mut planner = SectorLayoutPlanner::new(1);
        let mut layout = TocLayout {
            tt_srpt: planner.place(&TitleSearchTable::new(ws.titlesets, 0))?,
            ..TocLayout::default()
        };
        if menu_pgcs {
            layout.pgci_ut = planner.place(&pgc_table)?;
        }
        layout.vts_atrt = planner.place(&atrt)?;
        if menu_vobs {
            layout.c_adt = planner.place(&c_adt)?;
            layout.vobu_admap = planner.place(&admap)?;
        }
        layout.ifo_sectors = planner.next_sector();
        if menu_vobs {
            layout.menu_vob_sectors = menus.vob_group.sector_count();
        }
        layout.vts_start = layout.ifo_sectors * 2 + layout.menu_vob_sectors;
        debug!("VMG layout: {:?}", layout);

        let header = self.header(ws, &layout, rate);
        sink.write_sectors(header.as_slice())?;
        planner.commit(&TitleSearchTable::new(ws.titlesets, layout.vts_start), sink)?;
        if menu_pgcs {
            planner.commit(&pgc_table, sink)?;
        }
        planner.commit(&atrt, sink)?;
        if menu_vobs {
            planner.commit(&c_adt, sink)?;
            planner.commit(&admap, sink)?;
        }
        Ok(layout)
    }

    /// Generate into memory.
    pub fn to_vec(&self, ws: &Workset<'_>) -> Result<(Vec<u8>, TocLayout)> {
        let mut sink = WriterSink::new(Vec::new());
        let layout = self.generate(ws, &mut sink)?;
        Ok((sink.into_inner()?, layout))
    }

    /// Generate and write to `path`; nothing is written if generation fails.
    pub fn write_file(&self, ws: &Workset<'_>, path: &Path) -> Result<TocLayout> {
        let (data, layout) = self.to_vec(ws)?;
        fs::write(path, data)?;
        Ok(layout)
    }

    fn header(&self, ws: &Workset<'_>, layout: &TocLayout, rate: FrameRate) -> ByteBuffer {
        let menus = ws.menus;
        let mut buf = ByteBuffer::sector();
        buf.write_bytes(0, VMG_SIGNATURE);
        buf.write_u32(0x0c, layout.vts_start - 1);
        buf.write_u32(0x1c, layout.ifo_sectors - 1);
        buf.write_u8(0x21, 0x11); // version 1.1
        buf.write_u8(0x27, 1); // volumes
        buf.write_u8(0x29, 1); // volume number
        buf.write_u8(0x2a, 1); // side
        buf.write_u16(0x3e, ws.titlesets.len() as u16);
        let provider = self.options.provider_id.as_bytes();
        buf.write_bytes(0x40, &provider[..provider.len().min(PROVIDER_ID_LEN)]);
        buf.write_u32(0x84, FIRST_PLAY as u32);

        if menus.vob_group.has_video() {
            buf.write_u32(0xc0, layout.ifo_sectors);
            buf.write_bytes(0x100, &menus.vob_group.streams.encode());
        }
        buf.write_u32(0xc4, layout.tt_srpt);
        buf.write_u32(0xc8, layout.pgci_ut);
        buf.write_u32(0xd0, layout.vts_atrt);
        buf.write_u32(0xd8, layout.c_adt);
        buf.write_u32(0xdc, layout.vobu_admap);

        // First-play PGC: no cells, a single pre-command.
        let flag: u8 = if rate.denominator() == 90090 { 3 } else { 1 };
        buf.write_u8(FIRST_PLAY + 7, flag << 6);
        buf.write_u16(FIRST_PLAY + 0xe4, 0xec);
        let jump = if menus.has_pgcs() {
            JUMP_VMGM_TITLE_MENU
        } else if ws.titlesets.titlesets().first().is_some_and(|v| v.has_menu) {
            JUMP_VTSM_1
        } else {
            JUMP_TITLE_1
        };
        let table = FIRST_PLAY + 0xec;
        let commands = [jump];
        buf.write_u16(table, commands.len() as u16);
        for (i, command) in commands.iter().enumerate() {
            buf.write_bytes(table + 8 + i * COMMAND_LEN, command);
        }
        let end = 7 + COMMAND_LEN * commands.len();
        buf.write_u16(table + 6, end as u16);
        buf.write_u16(0x82, (table + end) as u16);
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::StreamAttributes;
    use crate::buffer::{read_u16, read_u32, SECTOR_SIZE};
    use crate::model::{ColorArena, MenuGroup, TocSummary, VtsDef};
    use crate::nav::RawCommandCompiler;

    fn titlesets(menu: bool) -> TocSummary {
        let mut toc = TocSummary::new();
        let attrs = StreamAttributes::default();
        toc.push(VtsDef::from_attributes(menu.then_some(&attrs), &attrs, vec![1], 1000, [0; 4]))
            .unwrap();
        toc
    }

    fn generate(toc: &TocSummary, menus: &MenuGroup) -> (Vec<u8>, TocLayout) {
        let colors = ColorArena::new();
        let ws = Workset {
            titlesets: toc,
            menus,
            titles: None,
            colors: &colors,
        };
        TocGenerator::new(TocOptions::default(), &RawCommandCompiler)
            .to_vec(&ws)
            .unwrap()
    }

    #[test]
    fn test_header_without_menus() {
        let toc = titlesets(false);
        let (out, layout) = generate(&toc, &MenuGroup::new());
        assert_eq!(&out[..12], VMG_SIGNATURE);
        assert_eq!(out.len(), 3 * SECTOR_SIZE);
        assert_eq!(layout.ifo_sectors, 3);
        assert_eq!(layout.vts_start, 6);
        assert_eq!(read_u32(&out, 0x0c), 5);
        assert_eq!(read_u32(&out, 0x1c), 2);
        assert_eq!(read_u16(&out, 0x3e), 1);
        assert_eq!(read_u32(&out, 0x84), 0x400);
        assert_eq!(read_u32(&out, 0xc4), 1);
        assert_eq!(read_u32(&out, 0xd0), 2);
        for pointer in [0xc0, 0xc8, 0xd8, 0xdc] {
            assert_eq!(read_u32(&out, pointer), 0, "pointer {pointer:#x}");
        }
        assert!(out[0x40..0x40 + PROVIDER_ID_LEN].starts_with(b"dvdforged "));
    }

    #[test]
    fn test_first_play_program() {
        let toc = titlesets(false);
        let (out, _) = generate(&toc, &MenuGroup::new());
        // NTSC default: 30 fps flag.
        assert_eq!(out[0x407], 0xc0);
        assert_eq!(read_u16(&out, 0x4e4), 0xec);
        assert_eq!(read_u16(&out, 0x4ec), 1);
        assert_eq!(read_u16(&out, 0x4f2), 15);
        assert_eq!(read_u16(&out, 0x82), 0x4fb);
        assert_eq!(out[0x4f4..0x4fc], JUMP_TITLE_1);

        let toc = titlesets(true);
        let (out, _) = generate(&toc, &MenuGroup::new());
        assert_eq!(out[0x4f4..0x4fc], JUMP_VTSM_1);
    }

    #[test]
    fn test_pal_default_format() {
        let toc = titlesets(false);
        let menus = MenuGroup::new();
        let colors = ColorArena::new();
        let ws = Workset {
            titlesets: &toc,
            menus: &menus,
            titles: None,
            colors: &colors,
        };
        let options = TocOptions {
            default_format: VideoFormat::Pal,
            ..TocOptions::default()
        };
        let generator = TocGenerator::new(options, &RawCommandCompiler);
        assert_eq!(generator.frame_rate(&ws), FrameRate::Pal);
        let (out, _) = generator.to_vec(&ws).unwrap();
        assert_eq!(out[0x407], 0x40);
    }

    #[test]
    fn test_provider_id_is_truncated() {
        let toc = titlesets(false);
        let menus = MenuGroup::new();
        let colors = ColorArena::new();
        let ws = Workset {
            titlesets: &toc,
            menus: &menus,
            titles: None,
            colors: &colors,
        };
        let options = TocOptions {
            provider_id: "x".repeat(40),
            ..TocOptions::default()
        };
        let (out, _) = TocGenerator::new(options, &RawCommandCompiler)
            .to_vec(&ws)
            .unwrap();
        assert_eq!(out[0x40 + PROVIDER_ID_LEN - 1], b'x');
        assert_eq!(out[0x40 + PROVIDER_ID_LEN], 0);
    }
}
