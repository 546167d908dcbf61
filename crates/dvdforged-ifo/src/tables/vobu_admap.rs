//! VOBU address map: the start sector of every VOBU, for seeking.

use super::TableBuilder;
use crate::buffer::ByteBuffer;
use crate::model::VobGroup;
use crate::Result;

pub struct VobuAddressMap<'a> {
    vobs: &'a VobGroup,
}

impl<'a> VobuAddressMap<'a> {
    pub fn new(vobs: &'a VobGroup) -> Self {
        Self { vobs }
    }
}

impl TableBuilder for VobuAddressMap<'_> {
    fn name(&self) -> &'static str {
        "VOBU_ADMAP"
    }

    fn build(&self, buf: &mut ByteBuffer) -> Result<usize> {
        let mut p = 4;
        for vobu in self.vobs.vobs.iter().flat_map(|v| v.vobus.iter()) {
            buf.write_u32(p, vobu.sector);
            p += 4;
        }
        buf.write_u32(0, (p - 1) as u32);
        Ok(p)
    }
}
