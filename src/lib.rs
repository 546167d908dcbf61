//! Dvdforged - DVD-Video authoring tool
//!
//! This library crate exposes the CLI's configuration, menu project loading
//! and report types for integration testing.

pub mod config;
pub mod project;
pub mod report;
