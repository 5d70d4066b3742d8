#![warn(clippy::all)]

//! Algorithms that build containers from raw geoscientific data
//!
//! The [boreholes](crate::boreholes) module turns collar, survey, lithology and assay tables into a single validated
//! [LineSet](subsurface_core::elements::LineSet).

pub mod boreholes;
