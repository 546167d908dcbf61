//! Reading back the parts of an authored titleset that the Video Manager
//! repeats.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use dvdforged_common::paths::{parse_vts_ifo_name, MAX_TITLESET_NUMBER};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::buffer::{read_u16, read_u32, SECTOR_SIZE};
use crate::model::{TocSummary, VtsDef, VTS_SUMMARY_LEN};
use crate::{Error, Result};

/// Signature at the start of every titleset control file.
pub const VTS_SIGNATURE: &[u8; 12] = b"DVDVIDEO-VTS";

/// The header sector and the first sector of the chapter table.
const SCAN_LEN: usize = 2 * SECTOR_SIZE;

/// Extract a titleset summary from the first two sectors of its control file.
///
/// `data` must hold at least two sectors. Returns `None` when the last-sector
/// field of the header or of the chapter table is out of range.
pub fn parse_vts_ifo(data: &[u8]) -> Option<VtsDef> {
    let (header, ptt) = data.split_at(SECTOR_SIZE);

    let mut category = [0u8; 4];
    category.copy_from_slice(&header[0x22..0x26]);
    let mut summary = Box::new([0u8; VTS_SUMMARY_LEN]);
    summary.copy_from_slice(&header[0x100..0x100 + VTS_SUMMARY_LEN]);

    // Chapter counts from the spacing of the per-title chapter lists.
    let titles = read_u16(ptt, 0) as usize;
    let mut chapters = Vec::with_capacity(titles);
    if titles > 0 {
        let mut first = 8 + titles as u32 * 4;
        for i in 0..titles - 1 {
            let next = read_u32(ptt, 12 + i * 4);
            chapters.push((next.saturating_sub(first) / 4) as u16);
            first = next;
        }
        let end = read_u32(ptt, 4).checked_add(1)?;
        chapters.push((end.saturating_sub(first) / 4) as u16);
    }

    Some(VtsDef {
        has_menu: read_u32(header, 0xc0) != 0,
        chapters,
        num_sectors: read_u32(header, 0x0c).checked_add(1)?,
        category,
        summary,
    })
}

/// Scan one titleset control file.
pub fn scan_ifo(path: &Path) -> Result<VtsDef> {
    let file = File::open(path).map_err(|source| Error::CannotOpen {
        path: path.to_path_buf(),
        source,
    })?;
    let mut data = Vec::with_capacity(SCAN_LEN);
    file.take(SCAN_LEN as u64).read_to_end(&mut data)?;
    if data.len() < SCAN_LEN {
        return Err(Error::TruncatedIfo {
            path: path.to_path_buf(),
            len: data.len(),
        });
    }
    if &data[..VTS_SIGNATURE.len()] != VTS_SIGNATURE {
        warn!("{:?} does not start with a titleset signature", path);
    }
    let vts = parse_vts_ifo(&data).ok_or_else(|| Error::InvalidIfo {
        path: path.to_path_buf(),
    })?;
    debug!(
        "{:?}: {} titles, {} sectors, menu: {}",
        path,
        vts.num_titles(),
        vts.num_sectors,
        vts.has_menu
    );
    Ok(vts)
}

/// Find `VTS_nn_0.IFO` files in a `VIDEO_TS` directory, in titleset order.
///
/// Numbering must start at 1 and have no holes.
pub fn discover_titlesets(video_ts: &Path) -> Result<Vec<PathBuf>> {
    let mut found: BTreeMap<u32, String> = BTreeMap::new();
    for entry in WalkDir::new(video_ts)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let Some(number) = parse_vts_ifo_name(&name) else {
            continue;
        };
        if number == 0 {
            return Err(Error::TitlesetZero { name });
        }
        if let Some(first) = found.get(&number) {
            return Err(Error::DuplicateTitleset {
                number,
                first: first.clone(),
                second: name,
            });
        }
        found.insert(number, name);
    }

    let contiguous = (1..=MAX_TITLESET_NUMBER)
        .take_while(|n| found.contains_key(n))
        .count() as u32;
    if let Some((&number, name)) = found.range(contiguous + 1..).next() {
        return Err(Error::TitlesetGap {
            number,
            name: name.clone(),
        });
    }
    if found.is_empty() {
        return Err(Error::NoTitlesets);
    }
    Ok(found.into_values().map(|name| video_ts.join(name)).collect())
}

/// Discover and scan every titleset under `video_ts`.
pub fn scan_titlesets(video_ts: &Path) -> Result<TocSummary> {
    let mut toc = TocSummary::new();
    for path in discover_titlesets(video_ts)? {
        info!("Scanning {:?}", path);
        toc.push(scan_ifo(&path)?)?;
    }
    Ok(toc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::ByteBuffer;
    use std::fs;
    use tempfile::tempdir;

    fn ifo(chapters: &[u16], sectors: u32, menu: bool) -> Vec<u8> {
        let mut buf = ByteBuffer::sector();
        buf.write_bytes(0, VTS_SIGNATURE);
        buf.write_u32(0x0c, sectors - 1);
        buf.write_bytes(0x22, &[0, 1, 2, 3]);
        buf.write_u8(0x100, 0x55);
        buf.write_u8(0x3ff, 0xaa);
        if menu {
            buf.write_u32(0xc0, 7);
        }
        let ptt = SECTOR_SIZE;
        let mut offset = 8 + chapters.len() * 4;
        buf.write_u16(ptt, chapters.len() as u16);
        for (i, &n) in chapters.iter().enumerate() {
            buf.write_u32(ptt + 8 + i * 4, offset as u32);
            offset += n as usize * 4;
        }
        buf.write_u32(ptt + 4, offset as u32 - 1);
        buf.ensure_capacity(2 * SECTOR_SIZE);
        buf.as_slice().to_vec()
    }

    #[test]
    fn test_parse_header_and_chapters() {
        let vts = parse_vts_ifo(&ifo(&[3, 1, 12], 900, true)).unwrap();
        assert!(vts.has_menu);
        assert_eq!(vts.num_sectors, 900);
        assert_eq!(vts.category, [0, 1, 2, 3]);
        assert_eq!(vts.summary[0], 0x55);
        assert_eq!(vts.summary[VTS_SUMMARY_LEN - 1], 0xaa);
        assert_eq!(vts.chapters, vec![3, 1, 12]);
    }

    #[test]
    fn test_parse_no_titles() {
        let vts = parse_vts_ifo(&ifo(&[], 10, false)).unwrap();
        assert!(!vts.has_menu);
        assert!(vts.chapters.is_empty());
    }

    #[test]
    fn test_parse_rejects_last_sector_overflow() {
        let mut data = ifo(&[1], 10, false);
        data[0x0c..0x10].copy_from_slice(&[0xff; 4]);
        assert!(parse_vts_ifo(&data).is_none());

        let mut data = ifo(&[1], 10, false);
        data[SECTOR_SIZE + 4..SECTOR_SIZE + 8].copy_from_slice(&[0xff; 4]);
        assert!(parse_vts_ifo(&data).is_none());
    }

    #[test]
    fn test_scan_invalid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("VTS_01_0.IFO");
        let mut data = ifo(&[1], 10, false);
        data[0x0c..0x10].copy_from_slice(&[0xff; 4]);
        fs::write(&path, data).unwrap();
        match scan_ifo(&path).unwrap_err() {
            Error::InvalidIfo { path: p } => assert_eq!(p, path),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_scan_missing_file() {
        let dir = tempdir().unwrap();
        let err = scan_ifo(&dir.path().join("VTS_01_0.IFO")).unwrap_err();
        assert!(matches!(err, Error::CannotOpen { .. }));
    }

    #[test]
    fn test_scan_truncated_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("VTS_01_0.IFO");
        fs::write(&path, vec![0u8; SECTOR_SIZE]).unwrap();
        match scan_ifo(&path).unwrap_err() {
            Error::TruncatedIfo { len, .. } => assert_eq!(len, SECTOR_SIZE),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_discovery_order_and_filter() {
        let dir = tempdir().unwrap();
        for name in ["VTS_02_0.IFO", "vts_01_0.ifo", "VTS_01_1.VOB", "VTS_01_0.BUP", "VIDEO_TS.IFO"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        let paths = discover_titlesets(dir.path()).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["vts_01_0.ifo", "VTS_02_0.IFO"]);
    }

    #[test]
    fn test_discovery_errors() {
        let dir = tempdir().unwrap();
        assert!(matches!(discover_titlesets(dir.path()), Err(Error::NoTitlesets)));

        fs::write(dir.path().join("VTS_01_0.IFO"), b"").unwrap();
        fs::write(dir.path().join("VTS_03_0.IFO"), b"").unwrap();
        match discover_titlesets(dir.path()) {
            Err(Error::TitlesetGap { number, .. }) => assert_eq!(number, 3),
            other => panic!("unexpected {other:?}"),
        }

        fs::write(dir.path().join("vts_01_0.ifo"), b"").unwrap();
        assert!(matches!(
            discover_titlesets(dir.path()),
            Err(Error::DuplicateTitleset { number: 1, .. })
        ));

        let zero = tempdir().unwrap();
        fs::write(zero.path().join("VTS_00_0.IFO"), b"").unwrap();
        assert!(matches!(discover_titlesets(zero.path()), Err(Error::TitlesetZero { .. })));
    }
}
