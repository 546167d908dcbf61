//! Dvdforged-Ifo: DVD-Video Video Manager generation
//!
//! This crate turns a menu/title data model plus the titlesets already
//! authored on disc into `VIDEO_TS.IFO` and its `VIDEO_TS.BUP` backup.
//!
//! # Modules
//!
//! - `model` - Program chains, cells, VOB sector maps, color tables, titleset summaries
//! - `attributes` - Video/audio/subpicture descriptors and their packed encoding
//! - `validate` - Entry-type and chapter checks over the program chain graph
//! - `propagate` - Palette sharing between PGCs that play the same VOB
//! - `scan` - Reading back `VTS_nn_0.IFO` files
//! - `tables` - TT_SRPT, VMGM_PGCI_UT, VMG_VTS_ATRT, C_ADT and VOBU_ADMAP builders
//! - `layout` - Two-pass sector layout
//! - `toc` - The Video Manager header and first-play program
//! - `nav` - Seam to the navigation command compiler
//!
//! # Architecture
//!
//! The header points at tables that follow it, so generation runs twice:
//!
//! 1. Each table is built into a discarding sink to learn its sector count
//! 2. Start sectors are handed out and written into the in-memory header
//! 3. The header is written, then every table is rebuilt into the real sink
//!
//! Both passes build from the same read-only [`model::Workset`]; a table
//! that comes out a different size the second time is a [`Error::Layout`].

pub mod attributes;
pub mod buffer;
pub mod error;
pub mod layout;
pub mod model;
pub mod nav;
pub mod propagate;
pub mod scan;
pub mod tables;
pub mod time;
pub mod toc;
pub mod validate;
pub mod vmgm;

pub use error::{Error, Result};
pub use layout::{NullSink, SectorLayoutPlanner, SectorSink, WriterSink};
pub use model::{ColorArena, MenuGroup, ProgramChainGroup, TocSummary, VtsDef, Workset};
pub use nav::{NavCompiler, RawCommandCompiler};
pub use scan::{scan_ifo, scan_titlesets};
pub use toc::{TocGenerator, TocLayout, TocOptions};
pub use vmgm::{generate_vmgm, GeneratedVmgm};
