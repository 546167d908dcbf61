//! VTS attribute table: a copy of every titleset's stream attributes.

use super::TableBuilder;
use crate::buffer::ByteBuffer;
use crate::model::{TocSummary, VTS_SUMMARY_LEN};
use crate::Result;

/// Size of one per-titleset record.
pub const VTS_ATRT_ENTRY_LEN: usize = 8 + VTS_SUMMARY_LEN;

pub struct VtsAttributeTable<'a> {
    toc: &'a TocSummary,
}

impl<'a> VtsAttributeTable<'a> {
    pub fn new(toc: &'a TocSummary) -> Self {
        Self { toc }
    }
}

impl TableBuilder for VtsAttributeTable<'_> {
    fn name(&self) -> &'static str {
        "VMG_VTS_ATRT"
    }

    fn build(&self, buf: &mut ByteBuffer) -> Result<usize> {
        let count = self.toc.len();
        let first = 8 + count * 4;
        buf.write_u16(0, count as u16);
        for (i, vts) in self.toc.titlesets().iter().enumerate() {
            let record = first + i * VTS_ATRT_ENTRY_LEN;
            buf.write_u32(8 + i * 4, record as u32);
            buf.write_u32(record, (VTS_ATRT_ENTRY_LEN - 1) as u32);
            buf.write_bytes(record + 4, &vts.category);
            buf.write_bytes(record + 8, &vts.summary[..]);
        }
        let end = first + count * VTS_ATRT_ENTRY_LEN;
        buf.write_u32(4, (end - 1) as u32);
        Ok(end)
    }
}
