//! Two-pass sector layout.
//!
//! The Video Manager header points at tables that follow it, and those
//! tables only learn their size by being built. The planner therefore
//! builds every table twice: [`SectorLayoutPlanner::place`] builds into a
//! [`NullSink`] to learn the footprint and hands out the start sector, then
//! [`SectorLayoutPlanner::commit`] rebuilds the same tables in the same order
//! into the real sink and checks each one still fits its slot.

use std::io::Write;

use tracing::debug;

use crate::buffer::{sectors_for, ByteBuffer, SECTOR_SIZE};
use crate::tables::TableBuilder;
use crate::{Error, Result};

/// Destination for whole sectors.
pub trait SectorSink {
    fn write_sectors(&mut self, data: &[u8]) -> Result<()>;
}

/// Sink that only counts.
#[derive(Debug, Default)]
pub struct NullSink {
    written: u64,
}

impl NullSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn written(&self) -> u64 {
        self.written
    }
}

impl SectorSink for NullSink {
    fn write_sectors(&mut self, data: &[u8]) -> Result<()> {
        self.written += data.len() as u64;
        Ok(())
    }
}

/// Sink over any writer; a file, or a `Vec<u8>` in tests.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    inner: W,
    written: u64,
}

impl<W: Write> WriterSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flush and return the writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> SectorSink for WriterSink<W> {
    fn write_sectors(&mut self, data: &[u8]) -> Result<()> {
        debug_assert_eq!(data.len() % SECTOR_SIZE, 0);
        self.inner.write_all(data)?;
        self.written += data.len() as u64;
        Ok(())
    }
}

/// Where one table landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub name: &'static str,
    pub sector: u32,
    pub sectors: u32,
}

/// Owns the scratch buffer and the running sector counter.
#[derive(Debug)]
pub struct SectorLayoutPlanner {
    buf: ByteBuffer,
    next_sector: u32,
    placements: Vec<Placement>,
    committed: usize,
}

impl SectorLayoutPlanner {
    /// Planner whose first table starts at `first_sector`.
    pub fn new(first_sector: u32) -> Self {
        Self {
            buf: ByteBuffer::new(),
            next_sector: first_sector,
            placements: Vec::new(),
            committed: 0,
        }
    }

    /// Measure `table` and reserve its sectors; returns its start sector.
    pub fn place(&mut self, table: &dyn TableBuilder) -> Result<u32> {
        let sectors = self.emit(table, &mut NullSink::new())?;
        let sector = self.next_sector;
        debug!("{} at sector {} ({} sectors)", table.name(), sector, sectors);
        self.placements.push(Placement {
            name: table.name(),
            sector,
            sectors,
        });
        self.next_sector += sectors;
        Ok(sector)
    }

    /// First sector after everything placed so far.
    pub fn next_sector(&self) -> u32 {
        self.next_sector
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Build the next placed table for real.
    pub fn commit(&mut self, table: &dyn TableBuilder, sink: &mut dyn SectorSink) -> Result<()> {
        let Some(&planned) = self.placements.get(self.committed) else {
            return Err(Error::Layout(format!("{} was never placed", table.name())));
        };
        if planned.name != table.name() {
            return Err(Error::Layout(format!(
                "expected {} next, got {}",
                planned.name,
                table.name()
            )));
        }
        let sectors = self.emit(table, sink)?;
        if sectors != planned.sectors {
            return Err(Error::Layout(format!(
                "{} planned {} sectors, wrote {}",
                planned.name, planned.sectors, sectors
            )));
        }
        self.committed += 1;
        Ok(())
    }

    /// Whether every placed table has been committed.
    pub fn is_complete(&self) -> bool {
        self.committed == self.placements.len()
    }

    fn emit(&mut self, table: &dyn TableBuilder, sink: &mut dyn SectorSink) -> Result<u32> {
        self.buf.reset();
        let len = table.build(&mut self.buf)?;
        sink.write_sectors(self.buf.padded(len))?;
        Ok(sectors_for(len))
    }
}
