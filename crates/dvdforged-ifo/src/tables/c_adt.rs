//! Cell address table: the sector extent of every cell of every VOB.

use tracing::warn;

use super::TableBuilder;
use crate::buffer::ByteBuffer;
use crate::model::VobGroup;
use crate::Result;

const HEADER_LEN: usize = 8;
const ENTRY_LEN: usize = 12;

pub struct CellAddressTable<'a> {
    vobs: &'a VobGroup,
}

impl<'a> CellAddressTable<'a> {
    pub fn new(vobs: &'a VobGroup) -> Self {
        Self { vobs }
    }
}

impl TableBuilder for CellAddressTable<'_> {
    fn name(&self) -> &'static str {
        "C_ADT"
    }

    fn build(&self, buf: &mut ByteBuffer) -> Result<usize> {
        let mut p = HEADER_LEN;
        for vob in &self.vobs.vobs {
            let Some(last) = vob.vobus.last() else {
                warn!("VOB {} has no VOBUs", vob.file_name);
                continue;
            };
            for (i, vobu) in vob.vobus.iter().enumerate() {
                if i > 0 && vobu.cell_tag == vob.vobus[i - 1].cell_tag {
                    continue;
                }
                if i > 0 {
                    // Close the previous cell.
                    buf.write_u32(p + 8, vob.vobus[i - 1].last_sector);
                    p += ENTRY_LEN;
                }
                buf.write_u16(p, vobu.vob_id());
                buf.write_u8(p + 2, vobu.cell_id());
                buf.write_u32(p + 4, vobu.sector);
            }
            buf.write_u32(p + 8, last.last_sector);
            p += ENTRY_LEN;
        }
        buf.write_u16(0, self.vobs.vobs.len() as u16);
        buf.write_u32(4, (p - 1) as u32);
        Ok(p)
    }
}
