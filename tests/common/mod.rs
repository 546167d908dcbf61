//! Disc trees and menu projects for the CLI tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use dvdforged_common::paths::{init_disc_dirs, vts_ifo_path};
use dvdforged_ifo::buffer::{ByteBuffer, SECTOR_SIZE};
use dvdforged_ifo::scan::VTS_SIGNATURE;

/// Write a `VTS_<number>_0.IFO` whose titles have the given chapter counts.
pub fn write_titleset(base: &Path, number: u32, chapters: &[u16], num_sectors: u32) -> PathBuf {
    let mut buf = ByteBuffer::sector();
    buf.write_bytes(0, VTS_SIGNATURE);
    buf.write_u32(0x0c, num_sectors - 1);
    buf.write_u8(0x21, 0x11);
    buf.write_u16(0x200, 0x5000);

    let ptt = SECTOR_SIZE;
    let mut offset = 8 + chapters.len() * 4;
    buf.write_u16(ptt, chapters.len() as u16);
    for (i, &n) in chapters.iter().enumerate() {
        buf.write_u32(ptt + 8 + i * 4, offset as u32);
        offset += n as usize * 4;
    }
    buf.write_u32(ptt + 4, (offset - 1) as u32);
    buf.ensure_capacity(2 * SECTOR_SIZE);

    init_disc_dirs(base).unwrap();
    let path = vts_ifo_path(base, number);
    fs::write(&path, buf.as_slice()).unwrap();
    path
}

/// Menu project with one English title menu playing two cells of a
/// 30-sector VOB.
pub const MENU_PROJECT: &str = r#"
[video]
mpeg = "mpeg2"
format = "ntsc"
aspect = "ratio4x3"

[[vobs]]
file = "menu.vob"
vobus = [
    { start = 0, end = 9, cell = 1 },
    { start = 10, end = 19, cell = 1 },
    { start = 20, end = 29, cell = 2 },
]

[[palettes]]
name = "main"
colors = [0x108080, 0xeb8080, 0x515af0]

[[languages]]
lang = "en"

[[languages.pgcs]]
entries = ["title"]
palette = "main"
pause = 255
post = "30 02 00 00 00 01 00 00"
buttons = [{ name = "play" }]

[[languages.pgcs.sources]]
vob = "menu.vob"
cells = [
    { end = 90000, chapter = "chapter_and_program", first_cell = 1 },
    { start = 90000, end = 180000, first_cell = 2 },
]
"#;

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}
