//! Builders for the sector-aligned tables that follow the Video Manager header.
//!
//! Each builder writes its table into a freshly reset [`ByteBuffer`] at
//! offsets relative to the table start and reports the logical length. The
//! layout planner pads the result to a whole sector.

mod c_adt;
mod pgci_ut;
mod tt_srpt;
mod vobu_admap;
mod vts_atrt;

pub use c_adt::CellAddressTable;
pub use pgci_ut::MenuPgcTable;
pub use tt_srpt::{TitleSearchTable, TITLE_TYPE};
pub use vobu_admap::VobuAddressMap;
pub use vts_atrt::{VtsAttributeTable, VTS_ATRT_ENTRY_LEN};

use crate::buffer::ByteBuffer;
use crate::Result;

/// A table emitted once to be measured and once for real.
pub trait TableBuilder {
    /// Short on-disc name, used in logs and layout checks.
    fn name(&self) -> &'static str;

    /// Write the table into `buf` and return its length in bytes.
    fn build(&self, buf: &mut ByteBuffer) -> Result<usize>;
}
