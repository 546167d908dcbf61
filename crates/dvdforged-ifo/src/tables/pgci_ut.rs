//! Menu program chain table: per language, the menu PGCs and everything a
//! player needs to run them.

use tracing::debug;

use super::TableBuilder;
use crate::attributes::{FrameRate, MAX_AUDIO_TRACKS, MAX_SUBPICTURE_TRACKS};
use crate::buffer::ByteBuffer;
use crate::model::{
    cell_tag, ColorArena, MenuGroup, ProgramChain, ProgramChainGroup, Pts, VobGroup,
    SUBPICTURE_UNMAPPED,
};
use crate::nav::{compile_checked, CommandSlot, CompileContext, NavCompiler, COMMAND_LEN};
use crate::time::{encode_frames, ticks_to_frames};
use crate::{Error, Result};

const HEADER_LEN: usize = 8;
const SEARCH_POINTER_LEN: usize = 8;
const COMMAND_TABLE: usize = 0xec;
const CELL_PLAYBACK_LEN: usize = 24;
const CELL_POSITION_LEN: usize = 4;

pub struct MenuPgcTable<'a> {
    menus: &'a MenuGroup,
    colors: &'a ColorArena,
    compiler: &'a dyn NavCompiler,
    /// Clock used for every playback time in the table.
    rate: FrameRate,
}

/// One VOB cell as played by a PGC.
#[derive(Debug)]
struct PlayedCell {
    vob_id: u16,
    cell_id: u8,
    starts_program: bool,
    duration: Pts,
    pause: u8,
    /// 1-based index into the cell command list, 0 for none.
    command: u8,
    first_sector: u32,
    last_vobu_sector: u32,
    last_sector: u32,
}

fn align(p: usize, to: usize) -> usize {
    (p + to - 1) / to * to
}

impl<'a> MenuPgcTable<'a> {
    pub fn new(
        menus: &'a MenuGroup,
        colors: &'a ColorArena,
        compiler: &'a dyn NavCompiler,
        rate: FrameRate,
    ) -> Self {
        Self {
            menus,
            colors,
            compiler,
            rate,
        }
    }

    fn build_unit(&self, buf: &mut ByteBuffer, base: usize, group: &ProgramChainGroup) -> Result<usize> {
        let count = group.pgcs.len();
        buf.write_u16(base, count as u16);
        let mut p = base + HEADER_LEN + count * SEARCH_POINTER_LEN;
        for (i, pgc) in group.pgcs.iter().enumerate() {
            let srp = base + HEADER_LEN + i * SEARCH_POINTER_LEN;
            let category = pgc
                .entries
                .iter()
                .next()
                .map_or(0, |entry| 0x80 | entry.id());
            buf.write_u8(srp, category);
            buf.write_u32(srp + 4, (p - base) as u32);
            p = align(self.build_pgc(buf, p, group, i, pgc)?, 4);
        }
        buf.write_u32(base + 4, (p - base - 1) as u32);
        Ok(p)
    }

    /// Expand source cells into the VOB cells they cover, compiling cell
    /// commands along the way.
    fn resolve_cells(
        &self,
        group: &ProgramChainGroup,
        index: usize,
        pgc: &ProgramChain,
    ) -> Result<(Vec<PlayedCell>, Vec<u8>)> {
        let vobs: &VobGroup = &self.menus.vob_group;
        let mut played = Vec::with_capacity(pgc.num_cells());
        let mut commands = Vec::new();
        let mut cell_index = 0;
        for source in &pgc.sources {
            let vob_index = source.vob.ok_or_else(|| {
                Error::invalid_model(format!("source {} has no VOB", source.file_name))
            })?;
            let vob = vobs.vobs.get(vob_index).ok_or_else(|| {
                Error::invalid_model(format!(
                    "source {} refers to VOB {} of {}",
                    source.file_name,
                    vob_index + 1,
                    vobs.vobs.len()
                ))
            })?;
            for cell in &source.cells {
                let mut command = 0;
                if let Some(program) = &cell.commands {
                    let ctx = CompileContext {
                        role: group.role,
                        pgc: index,
                        slot: CommandSlot::Cell(cell_index),
                        num_buttons: pgc.buttons.len(),
                    };
                    let code = compile_checked(self.compiler, program, &ctx)?;
                    if code.len() != COMMAND_LEN {
                        return Err(Error::compile(
                            ctx.to_string(),
                            format!("a cell command must be one instruction, got {}", code.len() / COMMAND_LEN),
                        ));
                    }
                    commands.extend_from_slice(&code);
                    command = u8::try_from(commands.len() / COMMAND_LEN).map_err(|_| {
                        Error::invalid_model(format!(
                            "{} has more than 255 cell commands",
                            ctx
                        ))
                    })?;
                }
                let first = played.len();
                for id in cell.vob_cell_ids() {
                    let tag = cell_tag((vob_index + 1) as u8, id);
                    let (head, tail) = vob.cell_extent(tag).ok_or_else(|| {
                        Error::invalid_model(format!(
                            "cell {} not found in {}",
                            id, vob.file_name
                        ))
                    })?;
                    played.push(PlayedCell {
                        vob_id: head.vob_id(),
                        cell_id: id,
                        starts_program: false,
                        duration: 0,
                        pause: 0,
                        command: 0,
                        first_sector: head.sector,
                        last_vobu_sector: tail.sector,
                        last_sector: tail.last_sector,
                    });
                }
                if played.len() > first {
                    played[first].starts_program = cell.chapter.starts_program();
                    played[first].duration = cell.duration();
                    let last = played.len() - 1;
                    played[last].pause = cell.pause;
                    played[last].command = command;
                }
                cell_index += 1;
            }
        }
        Ok((played, commands))
    }

    fn compile_slot(
        &self,
        group: &ProgramChainGroup,
        index: usize,
        pgc: &ProgramChain,
        slot: CommandSlot,
    ) -> Result<Vec<u8>> {
        let program = match slot {
            CommandSlot::Pre => pgc.pre_commands.as_ref(),
            CommandSlot::Post => pgc.post_commands.as_ref(),
            CommandSlot::Cell(_) => None,
        };
        let Some(program) = program else {
            return Ok(Vec::new());
        };
        let ctx = CompileContext {
            role: group.role,
            pgc: index,
            slot,
            num_buttons: pgc.buttons.len(),
        };
        compile_checked(self.compiler, program, &ctx)
    }

    fn build_pgc(
        &self,
        buf: &mut ByteBuffer,
        base: usize,
        group: &ProgramChainGroup,
        index: usize,
        pgc: &ProgramChain,
    ) -> Result<usize> {
        let (cells, cell_commands) = self.resolve_cells(group, index, pgc)?;
        let pre = self.compile_slot(group, index, pgc, CommandSlot::Pre)?;
        let post = self.compile_slot(group, index, pgc, CommandSlot::Post)?;
        let streams = &self.menus.vob_group.streams;

        let programs: Vec<usize> = cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.starts_program)
            .map(|(i, _)| i + 1)
            .collect();
        let total: Pts = cells.iter().map(|c| c.duration).sum();

        let too_many = |what: &str, count: usize| {
            Error::invalid_model(format!(
                "{} PGC {} has {} {}, at most 255 fit",
                group.role,
                index + 1,
                count,
                what
            ))
        };
        let num_cells = u8::try_from(cells.len()).map_err(|_| too_many("cells", cells.len()))?;
        let num_programs =
            u8::try_from(programs.len()).map_err(|_| too_many("programs", programs.len()))?;
        buf.write_u8(base + 2, num_programs);
        buf.write_u8(base + 3, num_cells);
        buf.write_u32(base + 4, encode_frames(ticks_to_frames(total, self.rate), self.rate));

        for track in 0..streams.num_audio.min(MAX_AUDIO_TRACKS) {
            buf.write_u16(base + 0x0c + track * 2, 0x8000 | ((track as u16) << 8));
        }
        let unmapped = pgc
            .subpicture_map
            .iter()
            .all(|modes| modes.iter().all(|&m| m == SUBPICTURE_UNMAPPED));
        for track in 0..streams.num_subpictures.min(MAX_SUBPICTURE_TRACKS) {
            let at = base + 0x1c + track * 4;
            if unmapped {
                buf.write_bytes(at, &[0x80 | track as u8, track as u8, track as u8, track as u8]);
                continue;
            }
            let modes = pgc.subpicture_map[track];
            if modes.iter().all(|&m| m == SUBPICTURE_UNMAPPED) {
                continue;
            }
            for (mode, &id) in modes.iter().enumerate() {
                if id != SUBPICTURE_UNMAPPED {
                    buf.write_u8(at + mode, id & 0x1f);
                }
            }
            buf.write_u8(at, buf.read_u8(at) | 0x80);
        }

        buf.write_u8(base + 0xa2, pgc.pause);
        if let Some(info) = pgc.colors.and_then(|id| self.colors.get(id)) {
            for slot in 0..16 {
                buf.write_u32(base + 0xa4 + slot * 4, info.disc_value(slot));
            }
        }

        // Command table.
        let npre = pre.len() / COMMAND_LEN;
        let npost = post.len() / COMMAND_LEN;
        let ncell = cell_commands.len() / COMMAND_LEN;
        let table = base + COMMAND_TABLE;
        buf.write_u16(base + 0xe4, COMMAND_TABLE as u16);
        buf.write_u16(table, npre as u16);
        buf.write_u16(table + 2, npost as u16);
        buf.write_u16(table + 4, ncell as u16);
        buf.write_u16(table + 6, (7 + COMMAND_LEN * (npre + npost + ncell)) as u16);
        let mut p = table + 8;
        for code in [&pre, &post, &cell_commands] {
            buf.write_bytes(p, code);
            p += code.len();
        }

        if !cells.is_empty() {
            buf.write_u16(base + 0xe6, (p - base) as u16);
            // Program entries are cell numbers, bounded by `num_cells`.
            for &cell in &programs {
                buf.write_u8(p, cell as u8);
                p += 1;
            }
            p = align(p, 2);

            buf.write_u16(base + 0xe8, (p - base) as u16);
            for cell in &cells {
                buf.write_u8(p + 2, cell.pause);
                buf.write_u8(p + 3, cell.command);
                buf.write_u32(p + 4, encode_frames(ticks_to_frames(cell.duration, self.rate), self.rate));
                buf.write_u32(p + 8, cell.first_sector);
                buf.write_u32(p + 16, cell.last_vobu_sector);
                buf.write_u32(p + 20, cell.last_sector);
                p += CELL_PLAYBACK_LEN;
            }

            buf.write_u16(base + 0xea, (p - base) as u16);
            for cell in &cells {
                buf.write_u16(p, cell.vob_id);
                buf.write_u8(p + 3, cell.cell_id);
                p += CELL_POSITION_LEN;
            }
        }
        debug!(
            "{} PGC {}: {} programs, {} cells, {} bytes",
            group.role,
            index + 1,
            programs.len(),
            cells.len(),
            p - base
        );
        Ok(p)
    }
}

impl TableBuilder for MenuPgcTable<'_> {
    fn name(&self) -> &'static str {
        "VMGM_PGCI_UT"
    }

    fn build(&self, buf: &mut ByteBuffer) -> Result<usize> {
        let groups = &self.menus.groups;
        buf.write_u16(0, groups.len() as u16);
        let mut p = HEADER_LEN + groups.len() * 8;
        for (i, lang) in groups.iter().enumerate() {
            let entry = HEADER_LEN + i * 8;
            buf.write_bytes(entry, &lang.lang.bytes());
            buf.write_u8(entry + 3, lang.group.all_entries.existence_flags());
            buf.write_u32(entry + 4, p as u32);
            p = self.build_unit(buf, p, &lang.group)?;
        }
        buf.write_u32(4, (p - 1) as u32);
        Ok(p)
    }
}
