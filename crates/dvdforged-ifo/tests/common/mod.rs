//! Fixtures shared by the integration tests: synthetic titleset control
//! files and small menu models.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use dvdforged_common::paths::{init_disc_dirs, vts_ifo_path};
use dvdforged_common::{EntryType, GroupRole};
use dvdforged_ifo::buffer::{ByteBuffer, SECTOR_SIZE};
use dvdforged_ifo::model::{
    Cell, ChapterKind, MenuGroup, ProgramChain, ProgramChainGroup, Source, Vob, Vobu,
};
use dvdforged_ifo::scan::VTS_SIGNATURE;

/// What a fixture titleset looks like.
#[derive(Debug, Clone)]
pub struct VtsFixture {
    pub chapters: Vec<u16>,
    pub num_sectors: u32,
    pub has_menu: bool,
    pub category: [u8; 4],
}

impl VtsFixture {
    pub fn new(chapters: &[u16], num_sectors: u32) -> Self {
        Self {
            chapters: chapters.to_vec(),
            num_sectors,
            has_menu: false,
            category: [0; 4],
        }
    }

    pub fn with_menu(mut self) -> Self {
        self.has_menu = true;
        self
    }

    /// Header sector plus a chapter table, as a titleset authoring run
    /// would leave them.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = ByteBuffer::sector();
        buf.write_bytes(0, VTS_SIGNATURE);
        buf.write_u32(0x0c, self.num_sectors - 1);
        buf.write_u8(0x21, 0x11);
        buf.write_bytes(0x22, &self.category);
        if self.has_menu {
            buf.write_u32(0xc0, 3);
        }
        // Recognisable attribute bytes.
        buf.write_u16(0x100, 0x4000);
        buf.write_u16(0x200, 0x5000);

        let ptt = SECTOR_SIZE;
        let mut offset = 8 + self.chapters.len() * 4;
        buf.write_u16(ptt, self.chapters.len() as u16);
        for (i, &n) in self.chapters.iter().enumerate() {
            buf.write_u32(ptt + 8 + i * 4, offset as u32);
            for chapter in 0..n as usize {
                buf.write_u16(ptt + offset + chapter * 4, 1);
                buf.write_u16(ptt + offset + chapter * 4 + 2, chapter as u16 + 1);
            }
            offset += n as usize * 4;
        }
        buf.write_u32(ptt + 4, (offset - 1) as u32);
        buf.ensure_capacity(2 * SECTOR_SIZE);
        buf.as_slice().to_vec()
    }

    /// Write as `VTS_<number>_0.IFO` under `base`.
    pub fn write(&self, base: &Path, number: u32) -> PathBuf {
        init_disc_dirs(base).unwrap();
        let path = vts_ifo_path(base, number);
        fs::write(&path, self.to_bytes()).unwrap();
        path
    }
}

/// A disc tree with one single-chapter title and nothing else.
pub fn single_title_disc(base: &Path) {
    VtsFixture::new(&[1], 1000).write(base, 1);
}

/// Menu VOB with two cells: VOBUs at sectors 0..9, 10..19 (cell 1) and
/// 20..29 (cell 2).
pub fn menu_vob() -> Vob {
    Vob::new(
        "menu.vob",
        vec![
            Vobu::new(0, 9, 1, 1),
            Vobu::new(10, 19, 1, 1),
            Vobu::new(20, 29, 1, 2),
        ],
    )
}

/// A PGC playing both cells of VOB `vob`.
pub fn menu_pgc(vob: usize) -> ProgramChain {
    ProgramChain {
        sources: vec![Source::new(
            "menu.mpg",
            vec![
                Cell::new(0, 90_000, 1, 2).with_chapter(ChapterKind::ChapterAndProgram),
                Cell::new(90_000, 180_000, 2, 3),
            ],
        )
        .with_vob(vob)],
        ..ProgramChain::new()
    }
}

/// English VMGM menus with one VOB and the given PGCs.
pub fn menus_with(pgcs: Vec<ProgramChain>) -> MenuGroup {
    let mut menus = MenuGroup::new();
    menus.vob_group.add_vob(menu_vob());
    menus
        .add_group(
            "en",
            ProgramChainGroup::with_pgcs(GroupRole::VideoManagerMenu, pgcs),
        )
        .unwrap();
    menus
}

/// A titles group whose PGCs claim the given entries.
pub fn titles_with_entries(entries: &[Option<EntryType>]) -> ProgramChainGroup {
    let pgcs = entries
        .iter()
        .map(|e| ProgramChain {
            entries: e.map(Into::into).unwrap_or_default(),
            ..ProgramChain::new()
        })
        .collect();
    ProgramChainGroup::with_pgcs(GroupRole::Titles, pgcs)
}
