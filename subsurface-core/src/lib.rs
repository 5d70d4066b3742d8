#![warn(clippy::all)]

//! Core data structures for geoscientific spatial data
//!
//! Subsurface provides two validated containers that readers, writers and visualizers can agree on: the
//! [UnstructuredData](crate::containers::UnstructuredData) type for vertices with cell connectivity (point clouds,
//! boreholes, surfaces, volume meshes) and the [StructuredData](crate::containers::StructuredData) type for gridded
//! fields. The [elements](crate::elements) module provides typed views over both.

pub extern crate nalgebra;
pub extern crate ndarray;
extern crate self as subsurface_core;

pub mod containers;
/// Named n-dimensional arrays with coordinates and attributes
pub mod dataset;
/// Typed geometric views over the containers
pub mod elements;
/// Useful mathematical tools when working with spatial data
pub mod math;
/// Row types of the tabular borehole sources
pub mod tables;

mod error;
pub use self::error::*;
