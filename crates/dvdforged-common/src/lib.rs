//! Dvdforged-Common: Shared types, constants, and utilities.
//!
//! This crate provides common functionality used across dvdforged:
//!
//! - **Core Types**: Language codes, menu entry types, and program chain group roles
//! - **Path Utilities**: The `VIDEO_TS`/`AUDIO_TS` layout of an authored disc tree
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use dvdforged_common::{EntryType, EntryTypes, GroupRole, LangCode};
//! use dvdforged_common::paths::parse_vts_ifo_name;
//!
//! let lang = LangCode::parse("EN").unwrap();
//! assert_eq!(lang.as_str(), "en");
//!
//! let allowed = GroupRole::VideoManagerMenu.allowed_entries();
//! assert!(allowed.contains(EntryType::Title));
//! assert!(!allowed.contains(EntryType::Root));
//! assert_eq!(EntryTypes::from_bits(0x0c).len(), 2);
//!
//! assert_eq!(parse_vts_ifo_name("VTS_03_0.IFO"), Some(3));
//! ```

pub mod error;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
