#![warn(clippy::all)]

//! Readers and writers for the containers of `subsurface-core` and for tabular borehole data
//!
//! Containers are stored either as a binary pair (a `.json` header next to a `.le` payload) or as a self-describing
//! `.ssa` archive. Use [read_container](crate::base::read_container) and [write_container](crate::base::write_container)
//! to pick the format from the file extension.

/// Base traits and the extension-based factory
pub mod base;
/// Binary pair files (`.json` header + `.le` payload)
pub mod binary;
/// Self-describing dataset archives (`.ssa`)
pub mod archive;
/// Delimited text readers for collar, survey, lithology and assay tables
pub mod tables;
