//! Path utilities for the on-disc directory layout.
//!
//! An authored disc tree has a `VIDEO_TS` directory holding the control
//! files and an (empty) `AUDIO_TS` directory. Titleset control files are
//! named `VTS_nn_0.IFO`; the Video Manager files are `VIDEO_TS.IFO` and its
//! backup `VIDEO_TS.BUP`.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

pub const VIDEO_TS: &str = "VIDEO_TS";
pub const AUDIO_TS: &str = "AUDIO_TS";

/// Highest titleset number a file name can carry.
pub const MAX_TITLESET_NUMBER: u32 = 99;

pub fn video_ts_dir(base: &Path) -> PathBuf {
    base.join(VIDEO_TS)
}

pub fn audio_ts_dir(base: &Path) -> PathBuf {
    base.join(AUDIO_TS)
}

/// Primary Video Manager control file.
pub fn vmg_ifo_path(base: &Path) -> PathBuf {
    video_ts_dir(base).join("VIDEO_TS.IFO")
}

/// Backup Video Manager control file.
pub fn vmg_bup_path(base: &Path) -> PathBuf {
    video_ts_dir(base).join("VIDEO_TS.BUP")
}

/// Primary control file of titleset `number`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use dvdforged_common::paths::vts_ifo_path;
///
/// let p = vts_ifo_path(Path::new("/disc"), 7);
/// assert!(p.ends_with("VIDEO_TS/VTS_07_0.IFO"));
/// ```
pub fn vts_ifo_path(base: &Path, number: u32) -> PathBuf {
    video_ts_dir(base).join(format!("VTS_{number:02}_0.IFO"))
}

/// Extract the titleset number from a `VTS_nn_0.IFO` file name.
///
/// Matching is case-insensitive. Returns `None` for anything else,
/// including the Video Manager files. Titleset `00` parses as `Some(0)`;
/// rejecting it is left to the caller.
///
/// # Examples
///
/// ```
/// use dvdforged_common::paths::parse_vts_ifo_name;
///
/// assert_eq!(parse_vts_ifo_name("VTS_01_0.IFO"), Some(1));
/// assert_eq!(parse_vts_ifo_name("vts_12_0.ifo"), Some(12));
/// assert_eq!(parse_vts_ifo_name("VTS_01_1.VOB"), None);
/// assert_eq!(parse_vts_ifo_name("VIDEO_TS.IFO"), None);
/// ```
pub fn parse_vts_ifo_name(name: &str) -> Option<u32> {
    let bytes = name.as_bytes();
    if bytes.len() != 12
        || !bytes[..4].eq_ignore_ascii_case(b"VTS_")
        || !bytes[6..].eq_ignore_ascii_case(b"_0.IFO")
    {
        return None;
    }
    let (tens, ones) = (bytes[4], bytes[5]);
    if !tens.is_ascii_digit() || !ones.is_ascii_digit() {
        return None;
    }
    Some(u32::from(tens - b'0') * 10 + u32::from(ones - b'0'))
}

/// Create `<base>`, `<base>/VIDEO_TS` and `<base>/AUDIO_TS` if absent.
///
/// Existing directories are not an error.
pub fn init_disc_dirs(base: &Path) -> Result<()> {
    for dir in [base.to_path_buf(), video_ts_dir(base), audio_ts_dir(base)] {
        std::fs::create_dir_all(&dir).map_err(|source| Error::CreateDir {
            path: dir.clone(),
            source,
        })?;
    }
    Ok(())
}
