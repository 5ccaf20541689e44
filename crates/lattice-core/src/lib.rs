//! Core types shared by the lattice layout engines.
//!
//! This crate provides the foundational types used across the other lattice crates:
//! - Geometry value types (sizes, points, rects, insets) and pixel snapping
//! - Dirty flags and the `LayoutItem` trait for batch dirty queries
//! - Layout context, result and cache records
//! - FNV-1a structural hashing for cache keys
//! - Small-inline scratch buffers
//! - Error types

pub mod buffer;
pub mod dirty;
pub mod errors;
pub mod geometry;
pub mod hash;
pub mod types;

pub use buffer::*;
pub use dirty::*;
pub use errors::*;
pub use geometry::*;
pub use hash::*;
pub use types::*;
