//! Summaries of authored titlesets and the generation input.

use super::color::ColorArena;
use super::pgc::{MenuGroup, ProgramChainGroup};
use crate::attributes::{StreamAttributes, ATTRIBUTE_BLOCK_LEN};
use crate::{Error, Result};

/// Titlesets that fit a one-sector title search table.
pub const MAX_TITLESETS: usize = 170;

/// Size of the attribute copy taken from a titleset control file.
pub const VTS_SUMMARY_LEN: usize = 0x300;

/// What the Video Manager needs to know about one titleset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VtsDef {
    pub has_menu: bool,
    /// Chapter count of each title.
    pub chapters: Vec<u16>,
    pub num_sectors: u32,
    /// Titleset category, bytes 0x22..0x26 of its control file.
    pub category: [u8; 4],
    /// Bytes 0x100..0x400 of its control file.
    pub summary: Box<[u8; VTS_SUMMARY_LEN]>,
}

impl VtsDef {
    /// Summary for a titleset being authored now, encoding its attributes
    /// directly instead of reading them back from disc.
    pub fn from_attributes(
        menu: Option<&StreamAttributes>,
        titles: &StreamAttributes,
        chapters: Vec<u16>,
        num_sectors: u32,
        category: [u8; 4],
    ) -> Self {
        let mut summary = Box::new([0u8; VTS_SUMMARY_LEN]);
        if let Some(menu) = menu {
            summary[..ATTRIBUTE_BLOCK_LEN].copy_from_slice(&menu.encode());
        }
        summary[0x100..0x100 + ATTRIBUTE_BLOCK_LEN].copy_from_slice(&titles.encode());
        Self {
            has_menu: menu.is_some(),
            chapters,
            num_sectors,
            category,
            summary,
        }
    }

    pub fn num_titles(&self) -> usize {
        self.chapters.len()
    }
}

/// Ordered titleset summaries, capped at [`MAX_TITLESETS`].
#[derive(Debug, Clone, Default)]
pub struct TocSummary {
    titlesets: Vec<VtsDef>,
}

impl TocSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, vts: VtsDef) -> Result<()> {
        if self.titlesets.len() >= MAX_TITLESETS {
            return Err(Error::TooManyTitlesets { max: MAX_TITLESETS });
        }
        self.titlesets.push(vts);
        Ok(())
    }

    pub fn titlesets(&self) -> &[VtsDef] {
        &self.titlesets
    }

    pub fn len(&self) -> usize {
        self.titlesets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titlesets.is_empty()
    }

    /// Titles across all titlesets.
    pub fn total_titles(&self) -> usize {
        self.titlesets.iter().map(VtsDef::num_titles).sum()
    }
}

/// Everything one generation run reads.
#[derive(Debug, Clone, Copy)]
pub struct Workset<'a> {
    pub titlesets: &'a TocSummary,
    pub menus: &'a MenuGroup,
    /// Titles group, when generating alongside one.
    pub titles: Option<&'a ProgramChainGroup>,
    pub colors: &'a ColorArena,
}
