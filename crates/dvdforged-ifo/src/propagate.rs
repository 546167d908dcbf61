//! Color table sharing between program chains that play the same VOB.
//!
//! Subpicture colors live in the VOB's button and subtitle streams, so every
//! PGC playing a given VOB must use one palette. A PGC without a palette
//! adopts the palette of any PGC it shares a VOB with.

use std::fmt;

use tracing::warn;

use crate::model::{ColorArena, ProgramChainGroup};

/// Two PGCs sharing a VOB but holding different palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConflict {
    /// 0-based index of the PGC whose palette was being propagated.
    pub from: usize,
    /// 0-based index of the PGC that already had another palette.
    pub to: usize,
}

impl fmt::Display for ColorConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Conflict in colormap between PGC {} and {}",
            self.from + 1,
            self.to + 1
        )
    }
}

/// One propagation sweep over `group`.
pub fn share_colors(
    group: &mut ProgramChainGroup,
    arena: &mut ColorArena,
    report: bool,
) -> Vec<ColorConflict> {
    sweep(group, arena, report).0
}

/// Returns the conflicts seen and whether any PGC adopted a palette.
fn sweep(
    group: &mut ProgramChainGroup,
    arena: &mut ColorArena,
    report: bool,
) -> (Vec<ColorConflict>, bool) {
    let pgcs = &mut group.pgcs;
    let mut conflicts = Vec::new();
    let mut adopted = false;
    for i in 0..pgcs.len() {
        let Some(colors) = pgcs[i].colors else {
            continue;
        };
        let vobs: Vec<usize> = pgcs[i].sources.iter().filter_map(|s| s.vob).collect();
        for vob in vobs {
            for other in 0..pgcs.len() {
                if !pgcs[other].sources.iter().any(|s| s.vob == Some(vob)) {
                    continue;
                }
                match pgcs[other].colors {
                    None => {
                        if arena.retain(colors) {
                            pgcs[other].colors = Some(colors);
                            adopted = true;
                        }
                    }
                    Some(existing) if existing != colors => {
                        let conflict = ColorConflict { from: i, to: other };
                        if !conflicts.contains(&conflict) {
                            if report {
                                warn!("{}", conflict);
                            }
                            conflicts.push(conflict);
                        }
                    }
                    Some(_) => {}
                }
            }
        }
    }
    (conflicts, adopted)
}

/// Share palettes until stable, then report what still conflicts.
///
/// Silent sweeps repeat until one adopts nothing, so a conflict is only
/// reported once sharing has reached every PGC it can.
pub fn propagate_colors(group: &mut ProgramChainGroup, arena: &mut ColorArena) -> Vec<ColorConflict> {
    while sweep(group, arena, false).1 {}
    share_colors(group, arena, true)
}
