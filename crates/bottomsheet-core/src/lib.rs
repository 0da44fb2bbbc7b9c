//! Bottom Sheet Core
//!
//! Shared building blocks for the bottom sheet engine: geometry with
//! device-pixel rounding, vector math, collections, logging and profiling.

pub mod alloc;
pub mod geometry;
pub mod logging;
pub mod math;
pub mod profiling;
