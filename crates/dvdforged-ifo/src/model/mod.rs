//! The authoring data model consumed by the generator.
//!
//! It is built once per run by a front-end, adjusted in place by validation
//! and color propagation, and read-only afterwards.

mod color;
mod pgc;
mod toc;
mod vob;

pub use color::{ColorArena, ColorId, ColorInfo, COLOR_UNUSED};
pub use pgc::{
    Button, Cell, ChapterKind, LanguageGroup, MenuGroup, ProgramChain, ProgramChainGroup, Pts,
    Source, INFINITE_PAUSE, SUBPICTURE_UNMAPPED,
};
pub use toc::{TocSummary, VtsDef, Workset, MAX_TITLESETS, VTS_SUMMARY_LEN};
pub use vob::{cell_tag, PgcRef, Vob, VobGroup, Vobu};
