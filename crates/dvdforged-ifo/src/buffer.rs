//! Growable, sector-rounded scratch buffer with positional big-endian writers.
//!
//! Every table builder writes into a [`ByteBuffer`] at absolute offsets. The
//! backing region only ever grows in whole 2048-byte sectors and newly added
//! space is zeroed, so a builder can leave reserved fields untouched and
//! back-patch earlier entries freely.

use bytes::{Buf, BytesMut};

/// Disc addressing unit.
pub const SECTOR_SIZE: usize = 2048;

/// Round `len` up to the next whole sector.
pub fn round_to_sector(len: usize) -> usize {
    len.div_ceil(SECTOR_SIZE) * SECTOR_SIZE
}

/// Number of sectors needed to hold `len` bytes.
pub fn sectors_for(len: usize) -> u32 {
    len.div_ceil(SECTOR_SIZE) as u32
}

/// Zero-initialised byte region addressed by absolute offset.
#[derive(Debug, Default)]
pub struct ByteBuffer {
    data: BytesMut,
}

impl ByteBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer pre-grown to exactly one zeroed sector.
    pub fn sector() -> Self {
        let mut buf = Self::new();
        buf.ensure_capacity(SECTOR_SIZE);
        buf
    }

    /// Grow to at least `len` bytes, rounded up to a whole sector.
    pub fn ensure_capacity(&mut self, len: usize) {
        if len > self.data.len() {
            self.data.resize(round_to_sector(len), 0);
        }
    }

    pub fn write_u8(&mut self, offset: usize, value: u8) {
        self.ensure_capacity(offset + 1);
        self.data[offset] = value;
    }

    pub fn write_u16(&mut self, offset: usize, value: u16) {
        self.write_bytes(offset, &value.to_be_bytes());
    }

    pub fn write_u32(&mut self, offset: usize, value: u32) {
        self.write_bytes(offset, &value.to_be_bytes());
    }

    pub fn write_bytes(&mut self, offset: usize, bytes: &[u8]) {
        self.ensure_capacity(offset + bytes.len());
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    pub fn read_u8(&self, offset: usize) -> u8 {
        self.data.get(offset).copied().unwrap_or(0)
    }

    pub fn read_u16(&self, offset: usize) -> u16 {
        read_u16(&self.data, offset)
    }

    pub fn read_u32(&self, offset: usize) -> u32 {
        read_u32(&self.data, offset)
    }

    /// Discard all content and release the backing memory.
    pub fn reset(&mut self) {
        self.data = BytesMut::new();
    }

    /// Allocated length; always a whole number of sectors.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// The first `len` bytes padded with zeros to the next sector boundary.
    pub fn padded(&mut self, len: usize) -> &[u8] {
        self.ensure_capacity(len);
        &self.data[..round_to_sector(len)]
    }
}

/// Big-endian u16 at `offset`, zero if out of range.
pub fn read_u16(buf: &[u8], offset: usize) -> u16 {
    match buf.get(offset..offset + 2) {
        Some(mut b) => b.get_u16(),
        None => 0,
    }
}

/// Big-endian u32 at `offset`, zero if out of range.
pub fn read_u32(buf: &[u8], offset: usize) -> u32 {
    match buf.get(offset..offset + 4) {
        Some(mut b) => b.get_u32(),
        None => 0,
    }
}
