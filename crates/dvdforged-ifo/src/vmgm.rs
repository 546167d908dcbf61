//! Building a Video Manager for an existing disc tree.

use std::path::Path;

use dvdforged_common::paths::{init_disc_dirs, video_ts_dir, vmg_bup_path, vmg_ifo_path};
use dvdforged_common::EntryType;
use tracing::info;

use crate::model::{ColorArena, MenuGroup, PgcRef, ProgramChainGroup, TocSummary, Workset};
use crate::propagate::propagate_colors;
use crate::scan::scan_titlesets;
use crate::toc::{TocGenerator, TocLayout};
use crate::validate::{force_entry, validate_all};
use crate::Result;

/// What a run produced.
#[derive(Debug, Clone)]
pub struct GeneratedVmgm {
    pub titlesets: TocSummary,
    pub layout: TocLayout,
}

/// Validate the menus (and titles, when given) and settle color sharing.
///
/// Every VMGM language group that has PGCs ends up with a title menu entry.
pub fn prepare_menus(
    menus: &mut MenuGroup,
    mut titles: Option<&mut ProgramChainGroup>,
    colors: &mut ColorArena,
) -> Result<()> {
    validate_all(menus, titles.as_deref_mut())?;
    for (i, lang) in menus.groups.iter_mut().enumerate() {
        menus
            .vob_group
            .all_pgcs
            .extend((0..lang.group.pgcs.len()).map(|pgc| PgcRef { group: i, pgc }));
        propagate_colors(&mut lang.group, colors);
        force_entry(&mut lang.group, EntryType::Title);
    }
    if let Some(titles) = titles {
        let count = titles.pgcs.len();
        if let Some(vobs) = titles.vob_group.as_mut() {
            vobs.all_pgcs
                .extend((0..count).map(|pgc| PgcRef { group: 0, pgc }));
        }
        propagate_colors(titles, colors);
    }
    Ok(())
}

/// Write `VIDEO_TS.IFO` and `VIDEO_TS.BUP` under `base`, describing every
/// titleset already authored there.
///
/// Nothing is written unless validation passes.
pub fn generate_vmgm(
    base: &Path,
    menus: &mut MenuGroup,
    mut titles: Option<&mut ProgramChainGroup>,
    colors: &mut ColorArena,
    generator: &TocGenerator<'_>,
) -> Result<GeneratedVmgm> {
    prepare_menus(menus, titles.as_deref_mut(), colors)?;

    info!("Creating table of contents");
    init_disc_dirs(base)?;
    let titlesets = scan_titlesets(&video_ts_dir(base))?;

    let ws = Workset {
        titlesets: &titlesets,
        menus,
        titles: titles.as_deref(),
        colors,
    };
    let layout = generator.write_file(&ws, &vmg_ifo_path(base))?;
    generator.write_file(&ws, &vmg_bup_path(base))?;
    info!(
        "Wrote {} sectors for {} titlesets",
        layout.ifo_sectors,
        titlesets.len()
    );

    Ok(GeneratedVmgm { titlesets, layout })
}
