//! Menu project files: a TOML description of the Video Manager menus.
//!
//! A project names the menu VOBs with their VOBU sector maps, the palettes,
//! and per language the menu program chains that play them. Loading turns
//! it into the [`MenuGroup`] and [`ColorArena`] the generator consumes.

mod types;

pub use types::*;

use anyhow::{Context, Result};
use dvdforged_common::{GroupRole, LangCode};
use dvdforged_ifo::attributes::{AudioDesc, LangPresence, SubpictureDesc, MAX_SUBPICTURE_TRACKS};
use dvdforged_ifo::model::{
    Button, Cell, ColorId, ColorInfo, ProgramChain, ProgramChainGroup, Source, Vob, Vobu,
    COLOR_UNUSED, SUBPICTURE_UNMAPPED,
};
use dvdforged_ifo::{ColorArena, MenuGroup};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Load a menu project from a TOML file
pub fn load_project(path: &Path) -> Result<MenuProject> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read menu project: {:?}", path))?;

    let project: MenuProject = toml::from_str(&content)
        .with_context(|| format!("Failed to parse menu project: {:?}", path))?;

    tracing::debug!(
        "Loaded menu project {:?}: {} VOBs, {} languages",
        path,
        project.vobs.len(),
        project.languages.len()
    );

    Ok(project)
}

/// Palettes by name, stored in the arena on first use.
struct PaletteTable {
    palettes: HashMap<String, (ColorInfo, Option<ColorId>)>,
}

impl PaletteTable {
    fn new(palettes: &[Palette]) -> Result<Self> {
        let mut table = HashMap::new();
        for palette in palettes {
            if palette.colors.len() > 16 {
                anyhow::bail!(
                    "Palette '{}' has {} colors, at most 16 are allowed",
                    palette.name,
                    palette.colors.len()
                );
            }
            let mut colors = [COLOR_UNUSED; 16];
            for (slot, &color) in colors.iter_mut().zip(&palette.colors) {
                if color > 0x00ff_ffff {
                    anyhow::bail!(
                        "Palette '{}' color {:#x} is not a 24-bit value",
                        palette.name,
                        color
                    );
                }
                *slot = color;
            }
            if table
                .insert(palette.name.clone(), (ColorInfo::new(colors), None))
                .is_some()
            {
                anyhow::bail!("Palette '{}' is defined twice", palette.name);
            }
        }
        Ok(Self { palettes: table })
    }

    fn reference(&mut self, name: &str, arena: &mut ColorArena) -> Result<ColorId> {
        let Some((info, id)) = self.palettes.get_mut(name) else {
            anyhow::bail!("Unknown palette '{}'", name);
        };
        match *id {
            Some(existing) => {
                arena.retain(existing);
                Ok(existing)
            }
            None => {
                let new_id = arena.insert(*info);
                *id = Some(new_id);
                Ok(new_id)
            }
        }
    }
}

impl MenuProject {
    /// Build the menu data model, registering palettes in a fresh arena.
    pub fn into_model(self) -> Result<(MenuGroup, ColorArena)> {
        let mut menus = MenuGroup::new();
        let mut colors = ColorArena::new();
        let vobs = &mut menus.vob_group;

        if !self.video.is_unspecified() {
            vobs.observe_video(&self.video);
        }
        for (track, stream) in self.audio.iter().enumerate() {
            vobs.observe_audio(track, &audio_desc(stream))?;
        }
        for (track, stream) in self.subpictures.iter().enumerate() {
            vobs.observe_subpicture(track, &subpicture_desc(stream))?;
        }

        let mut vob_index = HashMap::new();
        let mut next_sector = 0u32;
        for (i, file) in self.vobs.iter().enumerate() {
            let vob_id = u8::try_from(i + 1)
                .with_context(|| format!("Too many menu VOBs ({})", self.vobs.len()))?;
            let mut vobus = Vec::with_capacity(file.vobus.len());
            for range in &file.vobus {
                if range.end < range.start || range.start < next_sector {
                    anyhow::bail!(
                        "VOBU {}-{} in '{}' is out of sector order",
                        range.start,
                        range.end,
                        file.file
                    );
                }
                next_sector = range.end + 1;
                vobus.push(Vobu::new(range.start, range.end, vob_id, range.cell));
            }
            let index = vobs.add_vob(Vob::new(file.file.clone(), vobus));
            if vob_index.insert(file.file.as_str(), index).is_some() {
                anyhow::bail!("Menu VOB '{}' is listed twice", file.file);
            }
        }

        let mut palettes = PaletteTable::new(&self.palettes)?;
        let mut seen = HashSet::new();
        for language in &self.languages {
            if !seen.insert(language.lang) {
                anyhow::bail!("Menus for language '{}' are defined twice", language.lang);
            }
            let mut group = ProgramChainGroup::new(GroupRole::VideoManagerMenu);
            for (n, pgc) in language.pgcs.iter().enumerate() {
                let chain = build_pgc(pgc, &vob_index, &mut palettes, &mut colors)
                    .with_context(|| format!("[{}] menu PGC {}", language.lang, n + 1))?;
                group.pgcs.push(chain);
            }
            menus.add_group(language.lang.as_str(), group)?;
        }

        Ok((menus, colors))
    }
}

fn audio_desc(stream: &AudioStream) -> AudioDesc {
    let (lang_presence, lang) = language_fields(stream.lang);
    AudioDesc {
        format: stream.format,
        quantization: stream.quantization,
        dolby: stream.dolby,
        lang_presence,
        lang,
        channels: stream.channels,
        sample_rate: stream.sample_rate,
        content: stream.content,
    }
}

fn subpicture_desc(stream: &SubpictureStream) -> SubpictureDesc {
    let (lang_presence, lang) = language_fields(stream.lang);
    SubpictureDesc {
        lang_presence,
        lang,
        content: stream.content,
        ..Default::default()
    }
}

fn language_fields(lang: Option<LangCode>) -> (LangPresence, [u8; 2]) {
    match lang {
        Some(code) => (LangPresence::Lang, code.bytes()),
        None => (LangPresence::Unspecified, [0; 2]),
    }
}

fn build_pgc(
    def: &MenuPgc,
    vob_index: &HashMap<&str, usize>,
    palettes: &mut PaletteTable,
    arena: &mut ColorArena,
) -> Result<ProgramChain> {
    let mut pgc = ProgramChain::new();
    pgc.entries = def.entries.iter().copied().collect();
    pgc.pre_commands = def.pre.clone();
    pgc.post_commands = def.post.clone();
    pgc.pause = def.pause;
    pgc.buttons = def
        .buttons
        .iter()
        .map(|b| Button {
            name: b.name.clone(),
            commands: b.commands.clone(),
        })
        .collect();

    for mapping in &def.subpicture_streams {
        if mapping.track >= MAX_SUBPICTURE_TRACKS {
            anyhow::bail!("Subpicture track {} is out of range", mapping.track);
        }
        let modes = [
            mapping.normal,
            mapping.widescreen,
            mapping.letterbox,
            mapping.panscan,
        ];
        for (slot, id) in pgc.subpicture_map[mapping.track].iter_mut().zip(modes) {
            *slot = match id {
                Some(id) if usize::from(id) < MAX_SUBPICTURE_TRACKS => 0x80 | id,
                Some(id) => anyhow::bail!("Subpicture stream id {} is out of range", id),
                None => SUBPICTURE_UNMAPPED,
            };
        }
    }

    for source in &def.sources {
        let Some(&vob) = vob_index.get(source.vob.as_str()) else {
            anyhow::bail!("Source refers to unknown VOB '{}'", source.vob);
        };
        let cells = source
            .cells
            .iter()
            .map(build_cell)
            .collect::<Result<Vec<_>>>()?;
        pgc.sources.push(Source::new(source.vob.clone(), cells).with_vob(vob));
    }

    if let Some(name) = &def.palette {
        pgc.colors = Some(palettes.reference(name, arena)?);
    }

    Ok(pgc)
}

fn build_cell(def: &MenuCell) -> Result<Cell> {
    let last = def.last_cell.unwrap_or(def.first_cell);
    if last < def.first_cell {
        anyhow::bail!("Cell range {}-{} is reversed", def.first_cell, last);
    }
    let end = last
        .checked_add(1)
        .with_context(|| format!("Cell id {} is out of range", last))?;

    let mut cell = Cell::new(def.start, def.end, def.first_cell, end).with_chapter(def.chapter);
    cell.pause = def.pause;
    cell.commands = def.commands.clone();
    Ok(cell)
}
