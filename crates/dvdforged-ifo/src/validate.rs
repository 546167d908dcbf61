//! Structural checks over the program chain graph.
//!
//! Problems are collected across the whole graph and reported together as
//! one [`Error::Validation`]; fixable ones are corrected in place with a
//! warning.

use dvdforged_common::{EntryType, EntryTypes};
use tracing::warn;

use crate::model::{ChapterKind, MenuGroup, ProgramChainGroup, INFINITE_PAUSE};
use crate::{Error, Result};

/// Check one group, correcting what can be corrected and returning every
/// problem that cannot.
///
/// Fills in `all_entries` and `num_entries` as a side effect.
pub fn validate_group(group: &mut ProgramChainGroup) -> Vec<String> {
    let allowed = group.role.allowed_entries();
    let mut errors = Vec::new();
    let mut claimed: [Option<usize>; 8] = [None; 8];
    let mut all = EntryTypes::NONE;

    for (i, pgc) in group.pgcs.iter_mut().enumerate() {
        if pgc.post_commands.is_none() {
            if let Some(last) = pgc.sources.last_mut().and_then(|s| s.cells.last_mut()) {
                last.pause = INFINITE_PAUSE;
            }
        }

        for entry in pgc.entries.iter() {
            let slot = &mut claimed[entry.id() as usize];
            match *slot {
                Some(first) => errors.push(format!(
                    "Multiple definitions for entry {} in {} PGC {} and PGC {}",
                    entry,
                    group.role,
                    first + 1,
                    i + 1
                )),
                None => *slot = Some(i),
            }
        }
        for entry in pgc.entries.difference(allowed).iter() {
            errors.push(format!(
                "Entry {} is not allowed for menu type {} (PGC {})",
                entry,
                group.role,
                i + 1
            ));
        }
        all |= pgc.entries;

        let mut first = true;
        for source in &mut pgc.sources {
            if source.cells.is_empty() {
                warn!("Source has no cells ({}) in PGC {}", source.file_name, i + 1);
                continue;
            }
            if first {
                if source.cells[0].chapter != ChapterKind::ChapterAndProgram {
                    warn!(
                        "First cell is not marked as a chapter in PGC {}, setting chapter flag",
                        i + 1
                    );
                    source.cells[0].chapter = ChapterKind::ChapterAndProgram;
                }
                first = false;
            }
            for (n, pair) in source.cells.windows(2).enumerate() {
                if pair[0].end_cell_id != pair[1].start_cell_id {
                    errors.push(format!(
                        "Cells {} and {} of {} in PGC {} are not contiguous ({} != {})",
                        n + 1,
                        n + 2,
                        source.file_name,
                        i + 1,
                        pair[0].end_cell_id,
                        pair[1].start_cell_id
                    ));
                }
            }
        }
    }

    group.all_entries = all;
    group.num_entries = all.len();
    errors
}

fn into_result(errors: Vec<String>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(errors))
    }
}

fn menu_errors(menus: &mut MenuGroup) -> Vec<String> {
    let mut errors = Vec::new();
    for lang in &mut menus.groups {
        let code = lang.lang;
        errors.extend(
            validate_group(&mut lang.group)
                .into_iter()
                .map(|e| format!("[{}] {}", code, e)),
        );
    }
    errors
}

/// Validate a titles group.
pub fn validate_titles(group: &mut ProgramChainGroup) -> Result<()> {
    into_result(validate_group(group))
}

/// Validate every language group of `menus`, failing once at the end.
pub fn validate_menus(menus: &mut MenuGroup) -> Result<()> {
    into_result(menu_errors(menus))
}

/// Validate menus and, when present, the titles group in one batch.
pub fn validate_all(menus: &mut MenuGroup, titles: Option<&mut ProgramChainGroup>) -> Result<()> {
    let mut errors = menu_errors(menus);
    if let Some(titles) = titles {
        errors.extend(validate_group(titles));
    }
    into_result(errors)
}

/// Give the first PGC of `group` the `entry` type unless some PGC already
/// claims it. Groups without PGCs are left alone.
pub fn force_entry(group: &mut ProgramChainGroup, entry: EntryType) {
    let Some(first) = group.pgcs.first_mut() else {
        return;
    };
    if !group.all_entries.contains(entry) {
        first.entries.insert(entry);
        group.all_entries.insert(entry);
        group.num_entries += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cell, ProgramChain, Source};
    use crate::nav::NavProgram;
    use dvdforged_common::GroupRole;

    fn pgc(entries: EntryTypes) -> ProgramChain {
        ProgramChain {
            sources: vec![Source::new("a.vob", vec![Cell::new(0, 100, 1, 2)])],
            entries,
            ..ProgramChain::new()
        }
    }

    #[test]
    fn test_duplicate_title_entry_names_both_pgcs() {
        let mut group = ProgramChainGroup::with_pgcs(
            GroupRole::Titles,
            vec![pgc(EntryType::Title.into()), pgc(EntryType::Title.into())],
        );
        let errors = validate_group(&mut group);
        let dup = errors
            .iter()
            .find(|e| e.starts_with("Multiple definitions"))
            .unwrap();
        assert!(dup.contains("PGC 1"));
        assert!(dup.contains("PGC 2"));
        // Titles may not claim entries at all.
        assert_eq!(
            errors.iter().filter(|e| e.contains("not allowed")).count(),
            2
        );
        assert!(matches!(validate_titles(&mut group), Err(Error::Validation(_))));
    }

    #[test]
    fn test_disallowed_entry_for_vmgm() {
        let mut group = ProgramChainGroup::with_pgcs(
            GroupRole::VideoManagerMenu,
            vec![pgc(EntryType::Root.into())],
        );
        let errors = validate_group(&mut group);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("root"));
        assert!(errors[0].contains("VMGM"));
    }

    #[test]
    fn test_entries_are_accumulated() {
        let mut group = ProgramChainGroup::with_pgcs(
            GroupRole::TitlesetMenu,
            vec![
                pgc([EntryType::Root, EntryType::Audio].into_iter().collect()),
                pgc(EntryType::Ptt.into()),
            ],
        );
        assert!(validate_group(&mut group).is_empty());
        assert_eq!(group.num_entries, 3);
        assert!(group.all_entries.contains(EntryType::Ptt));
    }

    #[test]
    fn test_first_cell_becomes_chapter() {
        let mut group = ProgramChainGroup::with_pgcs(
            GroupRole::VideoManagerMenu,
            vec![ProgramChain {
                sources: vec![
                    Source::new("empty.vob", Vec::new()),
                    Source::new("a.vob", vec![Cell::new(0, 10, 1, 2), Cell::new(10, 20, 2, 3)]),
                ],
                ..ProgramChain::new()
            }],
        );
        assert!(validate_group(&mut group).is_empty());
        let cells = &group.pgcs[0].sources[1].cells;
        assert_eq!(cells[0].chapter, ChapterKind::ChapterAndProgram);
        assert_eq!(cells[1].chapter, ChapterKind::Neither);
    }

    #[test]
    fn test_last_cell_pause_without_post_commands() {
        let mut with_post = pgc(EntryTypes::NONE);
        with_post.post_commands = Some(NavProgram::new("30 02 00 00 00 01 00 00"));
        let mut group = ProgramChainGroup::with_pgcs(
            GroupRole::VideoManagerMenu,
            vec![pgc(EntryTypes::NONE), with_post],
        );
        validate_group(&mut group);
        assert_eq!(group.pgcs[0].sources[0].cells[0].pause, INFINITE_PAUSE);
        assert_eq!(group.pgcs[1].sources[0].cells[0].pause, 0);
    }

    #[test]
    fn test_cell_ids_must_chain() {
        let mut group = ProgramChainGroup::with_pgcs(
            GroupRole::VideoManagerMenu,
            vec![ProgramChain {
                sources: vec![Source::new(
                    "a.vob",
                    vec![Cell::new(0, 10, 1, 2), Cell::new(10, 20, 3, 4)],
                )],
                ..ProgramChain::new()
            }],
        );
        let errors = validate_group(&mut group);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("not contiguous"));
    }

    #[test]
    fn test_menu_errors_are_batched_across_languages() {
        let mut menus = MenuGroup::new();
        for lang in ["en", "fr"] {
            menus
                .add_group(
                    lang,
                    ProgramChainGroup::with_pgcs(
                        GroupRole::VideoManagerMenu,
                        vec![pgc(EntryType::Subtitle.into())],
                    ),
                )
                .unwrap();
        }
        match validate_menus(&mut menus) {
            Err(Error::Validation(errors)) => {
                assert_eq!(errors.len(), 2);
                assert!(errors[0].starts_with("[en]"));
                assert!(errors[1].starts_with("[fr]"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_titles_and_menus_share_one_batch() {
        let mut menus = MenuGroup::new();
        menus
            .add_group(
                "en",
                ProgramChainGroup::with_pgcs(
                    GroupRole::VideoManagerMenu,
                    vec![pgc(EntryType::Root.into())],
                ),
            )
            .unwrap();
        let mut titles = ProgramChainGroup::with_pgcs(
            GroupRole::Titles,
            vec![pgc(EntryTypes::NONE), pgc(EntryTypes::NONE)],
        );
        assert!(validate_titles(&mut titles).is_ok());
        titles.pgcs[1].entries = EntryType::Ptt.into();
        match validate_all(&mut menus, Some(&mut titles)) {
            Err(Error::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_force_entry() {
        let mut group = ProgramChainGroup::with_pgcs(
            GroupRole::VideoManagerMenu,
            vec![pgc(EntryTypes::NONE), pgc(EntryTypes::NONE)],
        );
        validate_group(&mut group);
        force_entry(&mut group, EntryType::Title);
        assert!(group.pgcs[0].entries.contains(EntryType::Title));
        assert_eq!(group.num_entries, 1);

        // Already claimed by the second PGC: nothing moves.
        let mut group = ProgramChainGroup::with_pgcs(
            GroupRole::VideoManagerMenu,
            vec![pgc(EntryTypes::NONE), pgc(EntryType::Title.into())],
        );
        validate_group(&mut group);
        force_entry(&mut group, EntryType::Title);
        assert!(group.pgcs[0].entries.is_empty());

        let mut empty = ProgramChainGroup::new(GroupRole::VideoManagerMenu);
        force_entry(&mut empty, EntryType::Title);
        assert!(empty.all_entries.is_empty());
    }
}
