//! Title search pointer table: one entry per title on the disc.

use super::TableBuilder;
use crate::buffer::ByteBuffer;
use crate::model::TocSummary;
use crate::{Error, Result};

/// Title type: one sequential PGC, jump/link/call allowed everywhere,
/// chapter and time play/search user operations not inhibited.
pub const TITLE_TYPE: u8 = 0x3c;

const HEADER_LEN: usize = 8;
const ENTRY_LEN: usize = 12;

pub struct TitleSearchTable<'a> {
    toc: &'a TocSummary,
    /// Sector at which the first titleset starts.
    vts_start: u32,
}

impl<'a> TitleSearchTable<'a> {
    pub fn new(toc: &'a TocSummary, vts_start: u32) -> Self {
        Self { toc, vts_start }
    }
}

impl TableBuilder for TitleSearchTable<'_> {
    fn name(&self) -> &'static str {
        "TT_SRPT"
    }

    fn build(&self, buf: &mut ByteBuffer) -> Result<usize> {
        let mut p = HEADER_LEN;
        let mut start = self.vts_start;
        let mut titles = 0u16;
        for (vtsn, vts) in self.toc.titlesets().iter().enumerate() {
            let vts_number = u8::try_from(vtsn + 1)
                .map_err(|_| Error::invalid_model(format!("titleset #{} does not fit one byte", vtsn + 1)))?;
            for (ttn, &chapters) in vts.chapters.iter().enumerate() {
                let title = u8::try_from(ttn + 1).map_err(|_| {
                    Error::invalid_model(format!("titleset #{} has more than 255 titles", vtsn + 1))
                })?;
                buf.write_u8(p, TITLE_TYPE);
                buf.write_u8(p + 1, 1); // angles
                buf.write_u16(p + 2, chapters);
                buf.write_u8(p + 6, vts_number);
                buf.write_u8(p + 7, title);
                buf.write_u32(p + 8, start);
                titles += 1;
                p += ENTRY_LEN;
            }
            start = start.checked_add(vts.num_sectors).ok_or_else(|| {
                Error::invalid_model(format!("titleset #{} ends beyond the last addressable sector", vtsn + 1))
            })?;
        }
        buf.write_u16(0, titles);
        buf.write_u32(4, (p - 1) as u32);
        Ok(p)
    }
}
