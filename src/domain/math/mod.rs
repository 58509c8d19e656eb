//! Coordinate algebra and range aggregation.

pub mod affine;
pub mod segment_tree;

pub use affine::*;
pub use segment_tree::*;
