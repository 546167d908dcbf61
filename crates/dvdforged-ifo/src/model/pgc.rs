//! Program chains, their sources and cells, and the groups they live in.

use std::ops::Range;

use dvdforged_common::{EntryTypes, GroupRole, LangCode};

use super::color::ColorId;
use super::vob::VobGroup;
use crate::nav::NavProgram;
use crate::{Error, Result};

/// Timestamp in 90 kHz clock ticks.
pub type Pts = i64;

/// Still time meaning "wait forever".
pub const INFINITE_PAUSE: u8 = 255;

/// Subpicture map entry for a display mode with no stream.
pub const SUBPICTURE_UNMAPPED: u8 = 127;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "snake_case"))]
pub enum ChapterKind {
    #[default]
    Neither,
    /// Starts a chapter, which implies a program.
    ChapterAndProgram,
    ProgramOnly,
}

impl ChapterKind {
    pub fn starts_program(self) -> bool {
        !matches!(self, Self::Neither)
    }
}

/// A contiguous playback segment within a source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    pub start_pts: Pts,
    pub end_pts: Pts,
    pub chapter: ChapterKind,
    pub pause: u8,
    /// First VOB cell id covered by this cell.
    pub start_cell_id: u8,
    /// One past the last VOB cell id; equals the next cell's `start_cell_id`.
    pub end_cell_id: u8,
    pub commands: Option<NavProgram>,
}

impl Cell {
    pub fn new(start_pts: Pts, end_pts: Pts, start_cell_id: u8, end_cell_id: u8) -> Self {
        Self {
            start_pts,
            end_pts,
            start_cell_id,
            end_cell_id,
            ..Default::default()
        }
    }

    pub fn with_chapter(mut self, chapter: ChapterKind) -> Self {
        self.chapter = chapter;
        self
    }

    /// VOB cell ids this cell spans.
    pub fn vob_cell_ids(&self) -> Range<u8> {
        self.start_cell_id..self.end_cell_id
    }

    pub fn duration(&self) -> Pts {
        (self.end_pts - self.start_pts).max(0)
    }
}

/// An input video file and the cells cut from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Source {
    pub file_name: String,
    pub cells: Vec<Cell>,
    /// Index into the owning [`VobGroup::vobs`], set once the file is laid out.
    pub vob: Option<usize>,
}

impl Source {
    pub fn new(file_name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            file_name: file_name.into(),
            cells,
            vob: None,
        }
    }

    pub fn with_vob(mut self, vob: usize) -> Self {
        self.vob = Some(vob);
        self
    }
}

/// An interactive menu button.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Button {
    pub name: String,
    pub commands: Option<NavProgram>,
}

/// One program chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramChain {
    pub sources: Vec<Source>,
    pub buttons: Vec<Button>,
    pub entries: EntryTypes,
    pub pre_commands: Option<NavProgram>,
    pub post_commands: Option<NavProgram>,
    pub colors: Option<ColorId>,
    /// Stream id per subpicture track and display mode, `0x80 | id` when
    /// mapped, [`SUBPICTURE_UNMAPPED`] otherwise.
    pub subpicture_map: [[u8; 4]; 32],
    /// Still time after the last cell.
    pub pause: u8,
}

impl Default for ProgramChain {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            buttons: Vec::new(),
            entries: EntryTypes::NONE,
            pre_commands: None,
            post_commands: None,
            colors: None,
            subpicture_map: [[SUBPICTURE_UNMAPPED; 4]; 32],
            pause: 0,
        }
    }
}

impl ProgramChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.sources.iter().flat_map(|s| s.cells.iter())
    }

    pub fn num_chapters(&self) -> usize {
        self.cells()
            .filter(|c| c.chapter == ChapterKind::ChapterAndProgram)
            .count()
    }

    pub fn num_programs(&self) -> usize {
        self.cells().filter(|c| c.chapter.starts_program()).count()
    }

    /// Number of VOB cells played.
    pub fn num_cells(&self) -> usize {
        self.cells().map(|c| c.vob_cell_ids().len()).sum()
    }
}

/// Program chains sharing a role.
#[derive(Debug, Clone)]
pub struct ProgramChainGroup {
    pub role: GroupRole,
    pub pgcs: Vec<ProgramChain>,
    /// Union of entry types claimed, filled in by validation.
    pub all_entries: EntryTypes,
    /// Number of distinct entry types claimed.
    pub num_entries: usize,
    /// Own sector space; only titles groups have one.
    pub vob_group: Option<VobGroup>,
}

impl ProgramChainGroup {
    pub fn new(role: GroupRole) -> Self {
        Self {
            role,
            pgcs: Vec::new(),
            all_entries: EntryTypes::NONE,
            num_entries: 0,
            vob_group: matches!(role, GroupRole::Titles).then(VobGroup::new),
        }
    }

    pub fn with_pgcs(role: GroupRole, pgcs: Vec<ProgramChain>) -> Self {
        Self {
            pgcs,
            ..Self::new(role)
        }
    }
}

/// Menus for one language.
#[derive(Debug, Clone)]
pub struct LanguageGroup {
    pub lang: LangCode,
    pub group: ProgramChainGroup,
}

/// All menus of a domain, sharing one sector space across languages.
#[derive(Debug, Clone, Default)]
pub struct MenuGroup {
    pub groups: Vec<LanguageGroup>,
    pub vob_group: VobGroup,
}

impl MenuGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the menus for `lang`, which must be a two-letter code.
    pub fn add_group(&mut self, lang: &str, group: ProgramChainGroup) -> Result<()> {
        let lang = LangCode::parse(lang)?;
        if !group.role.is_menu() {
            return Err(Error::invalid_model(format!(
                "language group '{}' must hold menus, not {}",
                lang, group.role
            )));
        }
        self.groups.push(LanguageGroup { lang, group });
        Ok(())
    }

    pub fn has_pgcs(&self) -> bool {
        self.groups.iter().any(|g| !g.group.pgcs.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pgc_with_cells(cells: Vec<Cell>) -> ProgramChain {
        ProgramChain {
            sources: vec![Source::new("a.vob", cells)],
            ..Default::default()
        }
    }

    #[test]
    fn test_derived_counts() {
        let pgc = pgc_with_cells(vec![
            Cell::new(0, 900, 1, 2).with_chapter(ChapterKind::ChapterAndProgram),
            Cell::new(900, 1800, 2, 4).with_chapter(ChapterKind::ProgramOnly),
            Cell::new(1800, 2700, 4, 5),
        ]);
        assert_eq!(pgc.num_chapters(), 1);
        assert_eq!(pgc.num_programs(), 2);
        assert_eq!(pgc.num_cells(), 4);
    }

    #[test]
    fn test_cell_duration_clamps() {
        assert_eq!(Cell::new(100, 50, 1, 2).duration(), 0);
        assert_eq!(Cell::new(0, 90_000, 1, 2).duration(), 90_000);
    }

    #[test]
    fn test_only_titles_own_vob_group() {
        assert!(ProgramChainGroup::new(GroupRole::Titles).vob_group.is_some());
        assert!(ProgramChainGroup::new(GroupRole::TitlesetMenu)
            .vob_group
            .is_none());
    }

    #[test]
    fn test_add_group_validates_language() {
        let mut menus = MenuGroup::new();
        menus
            .add_group("EN", ProgramChainGroup::new(GroupRole::VideoManagerMenu))
            .unwrap();
        assert_eq!(menus.groups[0].lang.as_str(), "en");
        assert!(menus
            .add_group("eng", ProgramChainGroup::new(GroupRole::VideoManagerMenu))
            .is_err());
        assert!(menus
            .add_group("de", ProgramChainGroup::new(GroupRole::Titles))
            .is_err());
        assert!(!menus.has_pgcs());
    }

    #[test]
    fn test_default_subpicture_map_unmapped() {
        let pgc = ProgramChain::new();
        assert!(pgc
            .subpicture_map
            .iter()
            .flatten()
            .all(|&m| m == SUBPICTURE_UNMAPPED));
    }
}
