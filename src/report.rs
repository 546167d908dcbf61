//! Serializable summaries printed by the CLI.

use dvdforged_ifo::{TocLayout, VtsDef};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// What was read back from one `VTS_nn_0.IFO`.
#[derive(Debug, Clone, Serialize)]
pub struct TitlesetReport {
    pub file: PathBuf,
    pub has_menu: bool,
    pub titles: usize,
    /// Chapter count per title
    pub chapters: Vec<u16>,
    pub num_sectors: u32,
    /// Category bytes as hex
    pub category: String,
    /// Packed menu and title video attribute words as hex
    pub menu_video: String,
    pub title_video: String,
}

impl TitlesetReport {
    pub fn new(file: &Path, vts: &VtsDef) -> Self {
        Self {
            file: file.to_path_buf(),
            has_menu: vts.has_menu,
            titles: vts.num_titles(),
            chapters: vts.chapters.clone(),
            num_sectors: vts.num_sectors,
            category: hex::encode(vts.category),
            menu_video: hex::encode(&vts.summary[..2]),
            title_video: hex::encode(&vts.summary[0x100..0x102]),
        }
    }
}

/// Outcome of writing a Video Manager.
#[derive(Debug, Clone, Serialize)]
pub struct TocReport {
    pub ifo: PathBuf,
    pub backup: PathBuf,
    pub titlesets: usize,
    pub titles: usize,
    pub layout: TocLayout,
}
